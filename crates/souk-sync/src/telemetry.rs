use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::SyncError;

/// Install the global tracing subscriber. `RUST_LOG` controls the filter;
/// the default is `info`.
pub fn init() -> Result<(), SyncError> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init()
        .map_err(|err| SyncError::Logging(err.to_string()))
}
