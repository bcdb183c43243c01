use std::time::Duration;

use rand::{Rng, SeedableRng};
use tokio_util::sync::CancellationToken;

/// Fixed suspend standing in for a round-trip measurement.
pub const PING_DELAY: Duration = Duration::from_millis(500);

pub const PING_MIN_MS: f64 = 20.0;
pub const PING_MAX_MS: f64 = 50.0;

/// Waits out the ping delay, then samples a latency value uniformly in
/// [20, 50) ms. Returns `None` if the run is cancelled before the delay
/// elapses.
pub(crate) async fn measure(token: &CancellationToken) -> Option<f64> {
    tokio::select! {
        biased;
        _ = token.cancelled() => None,
        _ = tokio::time::sleep(PING_DELAY) => {
            let mut rng = rand::rngs::StdRng::from_entropy();
            Some(rng.gen_range(PING_MIN_MS..PING_MAX_MS))
        }
    }
}
