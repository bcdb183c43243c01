use std::time::Duration;

use rand::{Rng, SeedableRng};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::download::{self, DownloadStatus};
use super::upload::{UploadSimulator, BASE_RATE_MAX_MBPS, BASE_RATE_MIN_MBPS};
use super::{ping, round_mbps, RunOutcome, SpeedError, TestResult, TestStage, TestUpdate};
use crate::profiles::FileProfile;

/// Pause after the simulated upload curve before the final rate is drawn.
const SETTLE_DELAY: Duration = Duration::from_millis(200);

/// Drives one test run through ping, download, and upload, emitting
/// `TestUpdate`s along the way. Strictly sequential: a stage begins only
/// after the previous one has released its resources and reported its
/// terminal figure. The cancellation token is borrowed for this run only.
pub struct StageSequencer {
    profile: FileProfile,
    updates: mpsc::Sender<TestUpdate>,
    token: CancellationToken,
}

impl StageSequencer {
    pub fn new(
        profile: FileProfile,
        updates: mpsc::Sender<TestUpdate>,
        token: CancellationToken,
    ) -> Self {
        Self {
            profile,
            updates,
            token,
        }
    }

    pub async fn run(self) -> RunOutcome {
        debug!(label = %self.profile.label, "test run starting");

        self.stage(TestStage::Ping).await;
        let Some(ping_ms) = ping::measure(&self.token).await else {
            return self.cancelled().await;
        };
        self.send(TestUpdate::Ping(ping_ms)).await;

        self.stage(TestStage::Downloading).await;
        let download_mbps =
            match download::run(&self.profile, &self.token, &self.updates).await {
                Ok(DownloadStatus::Complete(mbps)) => mbps,
                Ok(DownloadStatus::Cancelled) => return self.cancelled().await,
                Err(error @ (SpeedError::Download { .. } | SpeedError::EmptyBody { .. })) => {
                    return self.download_failed(error, ping_ms).await;
                }
                Err(error) => {
                    warn!(%error, "test run failed unexpectedly");
                    self.send(TestUpdate::Failed {
                        error,
                        result: None,
                    })
                    .await;
                    self.stage(TestStage::Idle).await;
                    return RunOutcome::Failed;
                }
            };
        self.send(TestUpdate::DownloadComplete(download_mbps)).await;

        self.stage(TestStage::Uploading).await;
        let mut rng = rand::rngs::StdRng::from_entropy();
        let base_rate = rng.gen_range(BASE_RATE_MIN_MBPS..BASE_RATE_MAX_MBPS);
        let simulator = UploadSimulator::new(base_rate, self.profile.upload_duration());
        if !simulator.run(&self.token, &self.updates).await {
            return self.cancelled().await;
        }
        tokio::select! {
            biased;
            _ = self.token.cancelled() => return self.cancelled().await,
            _ = tokio::time::sleep(SETTLE_DELAY) => {}
        }
        let upload_mbps = round_mbps(base_rate * rng.gen_range(0.9..1.1));

        let result = TestResult {
            download_mbps,
            upload_mbps,
            ping_ms,
        };
        debug!(?result, "test run complete");
        self.send(TestUpdate::Finished(result)).await;
        self.stage(TestStage::Finished).await;
        RunOutcome::Complete(result)
    }

    /// A genuine download failure: report zero speeds with the ping that
    /// was already measured, and land on `Finished` rather than `Idle`.
    async fn download_failed(self, error: SpeedError, ping_ms: f64) -> RunOutcome {
        warn!(%error, "download stage failed");
        let result = TestResult::failed(ping_ms);
        self.send(TestUpdate::Failed {
            error,
            result: Some(result),
        })
        .await;
        self.stage(TestStage::Finished).await;
        RunOutcome::Failed
    }

    /// Cooperative abort: zero the display, emit no result, return to idle.
    async fn cancelled(self) -> RunOutcome {
        debug!(label = %self.profile.label, "test run cancelled");
        self.send(TestUpdate::Speed(0.0)).await;
        self.send(TestUpdate::Cancelled).await;
        self.stage(TestStage::Idle).await;
        RunOutcome::Cancelled
    }

    async fn stage(&self, stage: TestStage) {
        self.send(TestUpdate::Stage(stage)).await;
    }

    async fn send(&self, update: TestUpdate) {
        // The receiver going away mid-run is fine; the run still unwinds
        // through its normal path.
        let _ = self.updates.send(update).await;
    }
}
