use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "QUOTEFETCH_LOG";
const DEFAULT_DIRECTIVE: &str = "warn";

/// Installs the stderr subscriber. Stdout carries only the envelope.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// `QUOTEFETCH_LOG` wins over `RUST_LOG`; unparsable directives fall back to
/// warnings only.
fn env_filter() -> EnvFilter {
    std::env::var(LOG_ENV)
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}
