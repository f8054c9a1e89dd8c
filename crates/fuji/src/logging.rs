//! Logging utilities

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    env_logger::init();
}

/// Initialize logging, ignoring the call if a logger is already installed
pub fn try_init() -> bool {
    env_logger::try_init().is_ok()
}
