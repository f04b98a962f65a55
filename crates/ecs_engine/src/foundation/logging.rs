//! Logging setup
//!
//! The engine logs through the `log` facade. Binaries call [`init`] once at
//! startup; `RUST_LOG` overrides the default filter.

pub use log::{debug, error, info, trace, warn};

/// Default filter for the given debug setting
pub const fn default_filter(debug: bool) -> &'static str {
    if debug {
        "debug"
    } else {
        "info"
    }
}

/// Initialize the logging system
///
/// Calling it again, or after another logger was installed, is harmless.
pub fn init(debug: bool) {
    let env = env_logger::Env::default().default_filter_or(default_filter(debug));
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::debug!("Logger already initialised");
    }
}
