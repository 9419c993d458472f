use tracing_subscriber::{fmt, EnvFilter};

use crate::settings::AppEnvironment;

/// Installs the global subscriber. Production logs are JSON lines, everything else is human-readable.
/// `RUST_LOG` overrides the default `info` filter.
pub fn init_tracing(env: &AppEnvironment) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = fmt().with_env_filter(filter).with_target(false);

    let result = match env {
        AppEnvironment::Production => builder.json().try_init(),
        _ => builder.try_init(),
    };

    if let Err(e) = result {
        eprintln!("tracing subscriber already installed: {e}");
    }
}
