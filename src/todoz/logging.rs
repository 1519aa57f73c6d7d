//! Diagnostics go to stderr through `tracing`, so they never mix with the
//! list rendered on stdout.
//!
//! `RUST_LOG` wins when set. Otherwise the level is `warn`, or `debug` with
//! `--verbose`. `TODOZ_LOG_FORMAT=json` switches to JSON lines.

use tracing_subscriber::EnvFilter;

pub const LOG_FORMAT_ENV: &str = "TODOZ_LOG_FORMAT";

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "todoz=debug"
    } else {
        "todoz=warn"
    }
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let is_json = std::env::var(LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if is_json {
        let _ = subscriber.json().try_init();
    } else {
        let _ = subscriber.try_init();
    }
}
