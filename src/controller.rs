use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::profiles::FileProfile;
use crate::speedtest::sequencer::StageSequencer;
use crate::speedtest::{RunOutcome, TestUpdate};

/// Externally facing start/stop surface for test runs. Owns the
/// cancellation token of the active run; the sequencer only ever holds a
/// clone for the duration of that run.
pub struct TestController {
    current: Option<ActiveRun>,
}

struct ActiveRun {
    token: CancellationToken,
    task: JoinHandle<RunOutcome>,
}

impl TestController {
    pub fn new() -> Self {
        Self { current: None }
    }

    pub fn is_running(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|run| !run.task.is_finished())
    }

    /// Launches a run against `profile` and hands back its update stream.
    /// Re-entrancy guard: returns `None`, leaving the active run untouched,
    /// until that run reaches a terminal stage.
    pub fn start(&mut self, profile: FileProfile) -> Option<mpsc::Receiver<TestUpdate>> {
        if self.is_running() {
            debug!("start ignored, a run is already active");
            return None;
        }

        let (tx, rx) = mpsc::channel(32);
        let token = CancellationToken::new();
        let sequencer = StageSequencer::new(profile, tx, token.clone());
        let task = tokio::spawn(sequencer.run());
        self.current = Some(ActiveRun { token, task });
        Some(rx)
    }

    /// Signals the active run's token. Idempotent; a no-op when nothing is
    /// running or the run already finished.
    pub fn stop(&mut self) {
        if let Some(run) = &self.current {
            run.token.cancel();
        }
    }
}

impl Default for TestController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::testutil::{local_profile, spawn_payload_server, ServeMode};

    async fn wait_until_idle(controller: &TestController) {
        tokio::time::timeout(Duration::from_secs(10), async {
            while controller.is_running() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("run did not settle");
    }

    #[tokio::test]
    async fn stop_without_a_run_is_a_noop() {
        let mut controller = TestController::new();
        assert!(!controller.is_running());
        controller.stop();
        controller.stop();
        assert!(!controller.is_running());
    }

    #[tokio::test]
    async fn start_is_rejected_while_a_run_is_active() {
        let addr = spawn_payload_server(
            "200 OK",
            10_000_000,
            ServeMode::Stall { stall_after: 65_536 },
        )
        .await;
        let mut controller = TestController::new();

        let rx = controller.start(local_profile(addr, 10_000_000));
        assert!(rx.is_some());
        assert!(controller.is_running());

        // The guard leaves the active run untouched.
        assert!(controller.start(local_profile(addr, 10_000_000)).is_none());
        assert!(controller.is_running());

        controller.stop();
        let mut rx = rx.unwrap();
        while rx.recv().await.is_some() {}
        wait_until_idle(&controller).await;

        // A fresh run is accepted once the previous one settled.
        assert!(controller.start(local_profile(addr, 10_000_000)).is_some());
        controller.stop();
    }

    #[tokio::test]
    async fn stop_cancels_the_active_run() {
        let addr = spawn_payload_server(
            "200 OK",
            10_000_000,
            ServeMode::Stall { stall_after: 65_536 },
        )
        .await;
        let mut controller = TestController::new();
        let mut rx = controller.start(local_profile(addr, 10_000_000)).unwrap();

        controller.stop();
        // stop is idempotent.
        controller.stop();

        let mut cancelled = false;
        while let Some(update) = rx.recv().await {
            if matches!(update, TestUpdate::Cancelled) {
                cancelled = true;
            }
            assert!(!matches!(update, TestUpdate::Finished(_)));
        }
        assert!(cancelled);
    }
}
