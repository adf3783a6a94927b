use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::settings::AppEnvironment;

/// Installs the global subscriber: JSON lines in production, human-readable
/// output everywhere else. `RUST_LOG` overrides the default `info` filter.
pub fn init_tracing(env: &AppEnvironment) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if *env == AppEnvironment::Production {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer())
            .init();
    }
}
