use std::sync::Once;

use tracing::debug;
use tracing_error::ErrorLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::Result;

static INSTALL_REPORT_HOOK: Once = Once::new();

/// Installs a formatting subscriber and the `color_eyre` report hooks.
///
/// `RUST_LOG` takes precedence over `default_filter`. Safe to call more than
/// once; only the first subscriber and hook are kept.
pub fn init_logging(default_filter: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))?;

    // another subscriber may already be installed (tests, host application)
    if let Err(e) = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_thread_names(true))
        .with(ErrorLayer::default())
        .try_init()
    {
        debug!("Keeping existing tracing subscriber: {e}");
    }

    let mut hook_result = Ok(());
    INSTALL_REPORT_HOOK.call_once(|| hook_result = color_eyre::install());
    hook_result
}
