use std::f64::consts::PI;
use std::time::Duration;

use rand::{Rng, SeedableRng};
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::TestUpdate;

/// Range the base upload rate is drawn from, in Mbps.
pub const BASE_RATE_MIN_MBPS: f64 = 20.0;
pub const BASE_RATE_MAX_MBPS: f64 = 50.0;

/// Per-tick jitter bounds applied on top of the envelope.
const JITTER_MIN: f64 = 0.8;
const JITTER_MAX: f64 = 1.2;

/// Cooperative tick interval, roughly one display frame.
const TICK: Duration = Duration::from_millis(16);

/// Ease-in-out envelope over progress `p` in [0, 1]: rises from 0,
/// peaks at 1.
pub fn envelope(progress: f64) -> f64 {
    ((progress * PI - PI / 2.0).sin() + 1.0) / 2.0
}

/// Produces the synthetic upload-rate curve. No network traffic is
/// involved; the curve exists so the uploading stage has a plausible
/// time-varying readout.
#[derive(Debug)]
pub struct UploadSimulator {
    base_rate_mbps: f64,
    duration: Duration,
}

impl UploadSimulator {
    pub fn new(base_rate_mbps: f64, duration: Duration) -> Self {
        Self {
            base_rate_mbps,
            duration,
        }
    }

    /// Emits jittered rate samples every tick until the simulated duration
    /// elapses, then holds the base rate. The token is checked on every
    /// tick; cancellation zeroes the displayed rate and emits nothing
    /// further. Returns `false` when cancelled.
    pub async fn run(
        &self,
        token: &CancellationToken,
        updates: &mpsc::Sender<TestUpdate>,
    ) -> bool {
        let started = Instant::now();
        let total_secs = self.duration.as_secs_f64().max(f64::EPSILON);
        let mut ticker = tokio::time::interval(TICK);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut rng = rand::rngs::StdRng::from_entropy();

        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    let _ = updates.send(TestUpdate::Speed(0.0)).await;
                    return false;
                }
                _ = ticker.tick() => {
                    let progress = (started.elapsed().as_secs_f64() / total_secs).min(1.0);
                    let jitter = rng.gen_range(JITTER_MIN..JITTER_MAX);
                    let rate = self.base_rate_mbps * envelope(progress) * jitter;
                    let _ = updates.send(TestUpdate::Speed(rate)).await;

                    if progress >= 1.0 {
                        // Hold at the base rate while the result settles.
                        let _ = updates.send(TestUpdate::Speed(self.base_rate_mbps)).await;
                        return true;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn speeds(updates: Vec<TestUpdate>) -> Vec<f64> {
        updates
            .into_iter()
            .filter_map(|update| match update {
                TestUpdate::Speed(mbps) => Some(mbps),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn envelope_is_ease_in_out() {
        assert!(envelope(0.0).abs() < 1e-9);
        assert!((envelope(0.5) - 0.5).abs() < 1e-9);
        assert!((envelope(1.0) - 1.0).abs() < 1e-9);
        assert!(envelope(0.25) < 0.5);
        assert!(envelope(0.75) > 0.5);
    }

    #[tokio::test(start_paused = true)]
    async fn completed_run_ends_at_base_rate() {
        let (tx, mut rx) = mpsc::channel(256);
        let token = CancellationToken::new();
        let sim = UploadSimulator::new(30.0, Duration::from_millis(200));

        let finished = sim.run(&token, &tx).await;
        drop(tx);
        assert!(finished);

        let mut seen = Vec::new();
        while let Some(update) = rx.recv().await {
            seen.push(update);
        }
        let rates = speeds(seen);
        assert!(!rates.is_empty());
        assert_eq!(*rates.last().unwrap(), 30.0);
        // Jittered samples stay within envelope * jitter bounds.
        assert!(rates.iter().all(|r| *r >= 0.0 && *r <= 30.0 * JITTER_MAX));
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_zeroes_and_stops() {
        let (tx, mut rx) = mpsc::channel(256);
        let token = CancellationToken::new();
        let sim = UploadSimulator::new(40.0, Duration::from_secs(60));

        let runner = tokio::spawn({
            let token = token.clone();
            async move { sim.run(&token, &tx).await }
        });

        // Let a few ticks through, then cancel.
        let mut first = Vec::new();
        for _ in 0..3 {
            if let Some(update) = rx.recv().await {
                first.push(update);
            }
        }
        token.cancel();
        let finished = runner.await.unwrap();
        assert!(!finished);

        let mut rest = Vec::new();
        while let Some(update) = rx.recv().await {
            rest.push(update);
        }
        let rates = speeds(rest);
        // The final emission zeroes the display and nothing follows it.
        assert_eq!(*rates.last().unwrap(), 0.0);
    }
}
