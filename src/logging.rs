use std::sync::Once;

use tracing_error::ErrorLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::formatter::{TickFormatter, TickLayer};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "warn,rogueweb=info";

static INIT: Once = Once::new();

/// Installs the global subscriber. Later calls are no-ops, so tests and binaries may both call it.
pub fn setup_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(TickLayer)
            .with(fmt::layer().event_format(TickFormatter))
            .with(ErrorLayer::default())
            .try_init();
    });
}
