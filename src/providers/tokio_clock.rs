//! Tokio-based clock implementation.

use async_trait::async_trait;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::traits::Clock;

/// Production clock implementation using Tokio's time functions.
///
/// # Examples
///
/// ```rust
/// use across_bridge::providers::TokioClock;
/// use across_bridge::traits::Clock;
///
/// let clock = TokioClock::new();
/// assert!(clock.unix_timestamp() > 0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TokioClock;

impl TokioClock {
    /// Creates a new Tokio clock instance.
    pub fn new() -> Self {
        Self
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    fn unix_timestamp(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default()
    }
}
