use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` wins when set. Otherwise the launcher logs at info (debug when
/// verbose) and dependencies stay at warn.
fn launcher_filter(verbose: bool) -> EnvFilter {
    let default = if verbose {
        "warn,local_ai_services=debug"
    } else {
        "warn,local_ai_services=info"
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Compact console output. Lines emitted while handling one service carry a
/// `service{name=...}` prefix from the coordinator's span.
///
/// A second call in the same process is ignored.
pub fn init_cli_logger(verbose: bool) {
    let _ = tracing_subscriber::registry()
        .with(launcher_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(verbose)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init();
}

/// JSON log lines, for running the launcher under a process manager that
/// collects structured output. The service span is written as a field.
pub fn init_json_logger() {
    let _ = tracing_subscriber::registry()
        .with(launcher_filter(false))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .json()
                .with_current_span(true)
                .with_span_list(false),
        )
        .try_init();
}
