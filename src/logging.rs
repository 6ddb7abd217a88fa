// Logging initialization for the command line binary

use env_logger::{Builder, Target};
use log::LevelFilter;

/// Map `-v`/`-q` onto a level filter. Without flags only warnings and errors
/// are shown so regular output stays readable.
pub fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
    match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Warn,
        (false, 1) => LevelFilter::Info,
        (false, 2) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    }
}

/// Log to stderr. `RUST_LOG` still applies on top of the chosen level.
pub fn init_cli_logging(verbose: u8, quiet: bool) {
    let level = level_for(verbose, quiet);
    Builder::new()
        .target(Target::Stderr)
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_secs()
        .format_module_path(false)
        .init();
    log::debug!("logging initialized with level: {:?}", level);
}
