pub mod download;
pub mod ping;
pub mod sampler;
pub mod sequencer;
pub mod upload;

use thiserror::Error;

use crate::profiles::SizeLabel;

/// The stage the current test run is in. Transitions are strictly
/// sequential; cancellation forces any in-flight stage back to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestStage {
    Idle,
    Ping,
    Downloading,
    Uploading,
    Finished,
}

/// Final metrics of one completed run. Built exactly once, at the
/// transition into `Finished`. Speeds carry one decimal; ping keeps the
/// raw sample and is rounded only for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestResult {
    pub download_mbps: f64,
    pub upload_mbps: f64,
    pub ping_ms: f64,
}

impl TestResult {
    /// The zero-speed result reported when the download stage fails but a
    /// ping sample was already taken.
    pub fn failed(ping_ms: f64) -> Self {
        Self {
            download_mbps: 0.0,
            upload_mbps: 0.0,
            ping_ms,
        }
    }
}

#[derive(Debug, Error)]
pub enum SpeedError {
    #[error("download of the {label} payload failed with HTTP status {status}")]
    Download { status: u16, label: SizeLabel },
    #[error("download of the {label} payload returned an empty body")]
    EmptyBody { label: SizeLabel },
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

/// Messages the sequencer emits towards the presentation layer.
#[derive(Debug)]
pub enum TestUpdate {
    Stage(TestStage),
    Ping(f64),
    /// Live rate on the gauge, in Mbps. Emitted during the download and
    /// upload stages; a trailing `0.0` follows cancellation.
    Speed(f64),
    DownloadComplete(f64),
    Finished(TestResult),
    Cancelled,
    Failed {
        error: SpeedError,
        /// Present for download failures (zero speeds, preserved ping),
        /// absent for unexpected errors.
        result: Option<TestResult>,
    },
}

/// How a sequencer run resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RunOutcome {
    Complete(TestResult),
    Cancelled,
    Failed,
}

/// Rounds a rate to the single decimal place results are reported with.
pub fn round_mbps(mbps: f64) -> f64 {
    (mbps * 10.0).round() / 10.0
}
