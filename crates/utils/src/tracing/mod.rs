use flexlayout_core::{DEFAULT_LOG_FILTER, FLEXLAYOUT_LOG_VAR};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Re-export tracing macros for convenience
pub use tracing::{debug, error, info, instrument, span, trace, warn, Level, Span};

/// Initialize the tracing system
///
/// The filter comes from `RUST_LOG`, then `FLEXLAYOUT_LOG`, then falls back to
/// `info`. Events go to stderr in the compact format. Returns an error if a
/// global subscriber is already installed.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(is_tty())
        .compact()
        .with_target(true)
        .with_thread_ids(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter()?)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

fn env_filter() -> Result<EnvFilter, tracing_subscriber::filter::ParseError> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_from_env(FLEXLAYOUT_LOG_VAR))
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))
}

/// Check if we're running in a TTY environment
fn is_tty() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stderr())
}
