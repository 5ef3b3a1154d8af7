use crate::core::config::LoggingConfig;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber for the CMS binary
///
/// `RUST_LOG` takes precedence over `logging.level`. Console output is used
/// when `logging.console` is set or the format is `console`; otherwise each
/// event is written as one flat JSON object.
pub fn init_tracing(config: &LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));
    let registry = tracing_subscriber::registry().with(env_filter);

    if config.console || config.format == "console" {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    } else {
        registry
            .with(fmt::layer().json().flatten_event(true).with_current_span(false))
            .init();
    }
}
