//! Structured logging via **tracing**.
//!
//! All diagnostics go to stderr as JSON so stdout stays clean for the
//! rewrite report. Filtering follows the usual `RUST_LOG` conventions
//! (e.g. `RUST_LOG=excise=debug`).

/// Initializes the global tracing collector (subscriber).
///
/// Call once at the beginning of the application's runtime.
pub fn init_structured_logging() {
    tracing_subscriber::fmt()
        .json()
        .with_ansi(false)
        .with_level(true)
        .with_target(true)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}
