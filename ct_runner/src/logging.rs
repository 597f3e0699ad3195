//! Logging setup for the runner.
//!
//! Game progress is printed through the `log` facade by `card_table`; this
//! module only installs `env_logger` behind it.

use env_logger::Env;

/// Filter used when `RUST_LOG` is not set.
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

/// Initialize logging
///
/// `RUST_LOG` takes precedence over the default filter. Targets are hidden so
/// the game's lines read as plain narration.
///
/// # Example
///
/// ```ignore
/// logging::init(false);
/// log::info!("Runner starting");
/// ```
pub fn init(verbose: bool) {
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter(verbose)))
        .format_target(false)
        .init();
}
