//! Process-wide `tracing` setup for hosts running the simulator.

use crate::capture::CaptureLayer;
use tracing_subscriber::{
    EnvFilter, Layer as _, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError,
};

/// Filter applied to console output when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info";

/// Install console output filtered by `RUST_LOG` plus the [`CaptureLayer`].
///
/// The filter only applies to the console; transcripts see every event.
pub fn try_init() -> Result<(), TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(filter))
        .with(CaptureLayer::new())
        .try_init()
}

/// Like [`try_init`], ignoring an already installed subscriber.
pub fn init() {
    if let Err(error) = try_init() {
        tracing::debug!(%error, "global subscriber already installed");
    }
}
