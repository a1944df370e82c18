mod channel;
mod stop_latch;
