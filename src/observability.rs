//! Observability utilities.
//!
//! Diagnostic logging only. Simulation status lines ("is eating", "died", …)
//! are the program's output and go through the configured `Reporter`, never
//! through tracing. Diagnostics therefore write to stderr, keeping stdout
//! clean for the event log.

use std::sync::OnceLock;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// Initialize the tracing subscriber once for the process.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Output is compact
/// text unless `DINING_LOG_FORMAT=json` asks for JSON lines.
pub fn init_tracing() {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let registry = tracing_subscriber::registry().with(filter);

        let result = if json_format_requested() {
            registry
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .try_init()
        } else {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .try_init()
        };
        if let Err(err) = result {
            eprintln!("tracing init skipped: {err}");
        }
    });
}

fn json_format_requested() -> bool {
    std::env::var("DINING_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"))
}
