use std::time::{Duration, Instant};

/// One observation in the download byte log, relative to stage start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedSample {
    pub timestamp_ms: u64,
    pub cumulative_bytes: u64,
}

/// Minimum spacing between externally visible rate updates.
const EMIT_INTERVAL: Duration = Duration::from_millis(100);

/// Accounts bytes arriving on the download stream and computes the
/// cumulative-average rate since the stage began. Emission is throttled to
/// one update per 100ms; the first chunk always produces an update and the
/// caller reports the final rate unconditionally on completion.
#[derive(Debug)]
pub struct ThroughputSampler {
    started: Instant,
    cumulative_bytes: u64,
    samples: Vec<SpeedSample>,
    last_emitted: Option<Instant>,
}

impl ThroughputSampler {
    pub fn new(started: Instant) -> Self {
        Self {
            started,
            cumulative_bytes: 0,
            samples: Vec::new(),
            last_emitted: None,
        }
    }

    /// Records a chunk arrival. Returns the current rate when an update is
    /// due, `None` while the throttle window is still open.
    pub fn record(&mut self, chunk_len: usize, now: Instant) -> Option<f64> {
        self.cumulative_bytes += chunk_len as u64;
        self.samples.push(SpeedSample {
            timestamp_ms: now.duration_since(self.started).as_millis() as u64,
            cumulative_bytes: self.cumulative_bytes,
        });

        let due = match self.last_emitted {
            None => true,
            Some(last) => now.duration_since(last) >= EMIT_INTERVAL,
        };
        if due {
            self.last_emitted = Some(now);
            Some(self.rate_at(now))
        } else {
            None
        }
    }

    /// Cumulative-average rate in Mbps at `now`: total bytes over total
    /// elapsed time since the stage began. Zero elapsed reports 0.0.
    pub fn rate_at(&self, now: Instant) -> f64 {
        let secs = now.duration_since(self.started).as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        self.cumulative_bytes as f64 * 8.0 / (secs * 1_000_000.0)
    }

    pub fn total_bytes(&self) -> u64 {
        self.cumulative_bytes
    }

    #[allow(dead_code)]
    pub fn samples(&self) -> &[SpeedSample] {
        &self.samples
    }
}
