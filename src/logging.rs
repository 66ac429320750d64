//! Logger setup for the `wayfarer` binary and tests.
//!
//! Systems log through the `log` facade: mode transitions at `info`,
//! binding changes and tuning at `debug`, per-frame detail at `trace`.
use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initializes the global logger.
///
/// When `verbose` is `true`, debug messages are printed; otherwise only info
/// and above. `RUST_LOG` overrides both. Returns `false` when a logger was
/// already installed, which lets tests call `init` repeatedly.
#[must_use = "a false return means another logger is active"]
pub fn init(verbose: bool) -> bool {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let env = Env::default().default_filter_or(level.to_string());
    let mut builder = Builder::from_env(env);
    builder.format_timestamp_millis();

    builder.try_init().is_ok()
}
