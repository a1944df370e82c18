extern crate cbindgen;

use std::{env, fs};

fn main() {
    println!("cargo:rerun-if-changed=src/ffi.rs");
    println!("cargo:rerun-if-changed=src/phase.rs");

    if env::var_os("CARGO_FEATURE_FFI").is_none() {
        return;
    }

    let Ok(crate_dir) = env::var("CARGO_MANIFEST_DIR") else {
        return;
    };

    let bindings = cbindgen::Builder::new()
        .with_crate(crate_dir)
        .with_language(cbindgen::Language::C)
        .with_namespaces(&["TrafficSignal", "ffi"])
        .with_cpp_compat(true)
        .with_pragma_once(true)
        .with_item_prefix("tsig_")
        .generate();

    match bindings {
        Ok(bindings) => {
            if let Err(e) = fs::create_dir_all("./shared") {
                println!("cargo:warning=Unable to create bindings directory: {e}");
                return;
            }
            bindings.write_to_file("./shared/bindings.h");
        }
        Err(e) => println!("cargo:warning=Unable to generate C bindings: {e}"),
    }
}
