//! Telemetry initialization (tracing/tracing-subscriber).
//!
//! LOG_LEVEL takes a tracing filter ("debug", or full directives such as
//! "info,registration=debug,c2c_backend=debug"). LOG_FORMAT selects
//! "pretty" (default) or "json" structured output. Targets, file and line
//! are included so form-lifecycle logs are easy to trace back; the HTTP
//! TraceLayer adds per-request spans on top of this.

use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVES: &str =
    "info,registration=debug,c2c_backend=debug,tower_http=info,axum=info";

pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("LOG_LEVEL")
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    // JSON and pretty builders are different types; init in each arm.
    if matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json")) {
        builder.json().init();
    } else {
        builder.init();
    }
}
