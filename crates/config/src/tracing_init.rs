use std::env;

use tracing_subscriber::{fmt, EnvFilter};

const FALLBACK_DIRECTIVES: &str = "info";

/// Install the global fmt subscriber.
///
/// `RUST_LOG` wins when set; otherwise `level` (the configured `LOG_LEVEL`)
/// is used. Unparseable directives fall back to `info`.
pub fn init_tracing(level: &str) {
    let directives = filter_directives(level);
    let (filter, rejected) = match EnvFilter::try_new(&directives) {
        Ok(filter) => (filter, None),
        Err(e) => (EnvFilter::new(FALLBACK_DIRECTIVES), Some(e)),
    };

    fmt().with_env_filter(filter).with_target(true).init();

    if let Some(e) = rejected {
        tracing::warn!(%directives, error = %e, "invalid log filter, using info");
    }
}

fn filter_directives(level: &str) -> String {
    env::var("RUST_LOG")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or_else(|| Some(level.trim().to_owned()).filter(|v| !v.is_empty()))
        .unwrap_or_else(|| FALLBACK_DIRECTIVES.to_owned())
}
