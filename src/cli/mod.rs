//! Command-line interface components
//!
//! Argument parsing and logging setup shared by the server and client
//! binaries. The core service never touches this module.

pub mod args;

pub use args::Cli;

use tracing_subscriber::{fmt, EnvFilter};

/// Map a repeated `-v` count to a log level: 0 = warn, 1 = info,
/// 2 or more = debug.
pub fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Initialize the global tracing subscriber for a binary.
pub fn init_logging(verbose: u8) {
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("urlfetcher={}", log_level(verbose)).parse().unwrap());

    fmt().with_env_filter(filter).with_target(false).init();
}
