//! Tracing subscriber setup.
//!
//! Production runs emit JSON lines; everything else gets colored text.
//! `LOG_FORMAT=json|pretty` overrides the environment-derived choice.

use crate::config::get_environment;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    /// Resolve the format from `LOG_FORMAT`, falling back to the app environment.
    pub fn resolve(environment: &str, explicit: Option<&str>) -> Self {
        match explicit.map(|s| s.trim().to_ascii_lowercase()) {
            Some(ref f) if f == "json" => LogFormat::Json,
            Some(ref f) if f == "pretty" || f == "text" => LogFormat::Pretty,
            _ => {
                if matches!(environment, "production" | "prod") {
                    LogFormat::Json
                } else {
                    LogFormat::Pretty
                }
            }
        }
    }

    pub fn from_env() -> Self {
        let explicit = std::env::var("LOG_FORMAT").ok();
        Self::resolve(&get_environment(), explicit.as_deref())
    }
}

/// Install the global subscriber. Returns false when one is already set,
/// which happens when several test binaries share a process.
pub fn init_logging() -> bool {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let result = match LogFormat::from_env() {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(false)
                    .with_writer(std::io::stdout),
            )
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_ansi(true)
                    .with_writer(std::io::stdout),
            )
            .try_init(),
    };
    result.is_ok()
}
