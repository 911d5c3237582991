//! Logging setup for the `src` binary.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the binary (or to tests that want to see the output).
//!
//! ```ignore
//! use srclib::observability::init_tracing;
//!
//! fn main() {
//!     init_tracing(cli.verbosity);
//!     // ...
//! }
//! ```

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Level used for `-v` repeated `verbosity` times.
pub fn level_for_verbosity(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install a stderr subscriber. `RUST_LOG` overrides the verbosity flag.
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init_tracing(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "srclib={level},src={level},warn",
            level = level_for_verbosity(verbosity)
        ))
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbosity >= 2)
        .try_init();
}
