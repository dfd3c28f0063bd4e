//! Structured logging setup: a `tracing-subscriber` `EnvFilter` honoring
//! `RUST_LOG`, defaulting to `info` (or `debug` under `-v`), writing
//! human-readable output to stderr so stdout stays reserved for dump and
//! report output other tools might consume (§6 Added — Logging).

use tracing_subscriber::EnvFilter;

/// `verbosity` is the number of times `-v` was passed on the command line.
pub fn init(verbosity: u8) {
    let default_level = if verbosity > 0 { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
