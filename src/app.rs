use crossterm::event::{self, KeyCode, KeyEventKind};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

use crate::advice::generate_advice;
use crate::config::Settings;
use crate::controller::TestController;
use crate::i18n::{self, TextKey};
use crate::ipinfo::ServerInfo;
use crate::profiles::{FileProfile, SizeLabel};
use crate::speedtest::{SpeedError, TestResult, TestStage, TestUpdate};

/// Presentational state fed by the sequencer's update stream. Single
/// writer per direction: the sequencer drives stage/speed through the
/// channel, the app only writes the token via the controller.
pub struct App {
    pub stage: TestStage,
    pub current_speed: f64,
    pub live_ping: Option<f64>,
    pub result: Option<TestResult>,
    pub error: Option<String>,
    pub advice: Option<String>,
    pub server_info: Option<ServerInfo>,
    pub settings: Settings,
    pub selected_size: SizeLabel,
    pub should_quit: bool,

    controller: TestController,
    updates: Option<mpsc::Receiver<TestUpdate>>,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        Self {
            stage: TestStage::Idle,
            current_speed: 0.0,
            live_ping: None,
            result: None,
            error: None,
            advice: None,
            server_info: None,
            settings,
            selected_size: SizeLabel::DEFAULT,
            should_quit: false,
            controller: TestController::new(),
            updates: None,
        }
    }

    pub fn text(&self, key: TextKey) -> &'static str {
        i18n::text(self.settings.locale, key)
    }

    pub fn is_running(&self) -> bool {
        self.controller.is_running()
    }

    pub fn handle_key_event(&mut self, key: event::KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Char('q') => {
                self.stop_test();
                self.should_quit = true;
            }
            KeyCode::Enter => {
                if !self.is_running() {
                    self.start_test();
                }
            }
            KeyCode::Esc => {
                if self.is_running() {
                    self.stop_test();
                }
            }
            KeyCode::Char('l') => {
                self.settings.locale = self.settings.locale.toggle();
                self.refresh_localized();
            }
            KeyCode::Tab | KeyCode::Right => {
                if !self.is_running() {
                    self.selected_size = self.selected_size.next();
                }
            }
            KeyCode::BackTab | KeyCode::Left => {
                if !self.is_running() {
                    self.selected_size = self.selected_size.prev();
                }
            }
            _ => {}
        }
    }

    /// Kicks off a run for the selected size. A no-op while a run is
    /// active; prior results are discarded only once the start is
    /// accepted.
    pub fn start_test(&mut self) {
        let profile = FileProfile::for_label(self.selected_size);
        let Some(rx) = self.controller.start(profile) else {
            return;
        };
        self.updates = Some(rx);
        self.stage = TestStage::Ping;
        self.current_speed = 0.0;
        self.live_ping = None;
        self.result = None;
        self.error = None;
        self.advice = None;
    }

    /// Signals the active run and zeroes the display immediately, without
    /// waiting for the sequencer to unwind.
    pub fn stop_test(&mut self) {
        self.controller.stop();
        self.updates = None;
        self.stage = TestStage::Idle;
        self.current_speed = 0.0;
        self.live_ping = None;
    }

    /// Drains pending sequencer updates. Called once per draw tick.
    pub fn poll_updates(&mut self) {
        let Some(rx) = self.updates.as_mut() else {
            return;
        };
        let mut pending = Vec::new();
        let mut disconnected = false;
        loop {
            match rx.try_recv() {
                Ok(update) => pending.push(update),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    disconnected = true;
                    break;
                }
            }
        }
        for update in pending {
            self.apply_update(update);
        }
        if disconnected {
            self.updates = None;
        }
    }

    pub fn set_server_info(&mut self, info: ServerInfo) {
        self.server_info = Some(info);
    }

    fn apply_update(&mut self, update: TestUpdate) {
        match update {
            TestUpdate::Stage(stage) => {
                self.stage = stage;
                if matches!(stage, TestStage::Downloading | TestStage::Uploading) {
                    self.current_speed = 0.0;
                }
            }
            TestUpdate::Ping(ms) => self.live_ping = Some(ms),
            TestUpdate::Speed(mbps) => self.current_speed = mbps,
            TestUpdate::DownloadComplete(mbps) => self.current_speed = mbps,
            TestUpdate::Finished(result) => {
                self.advice = Some(generate_advice(&result, self.settings.locale));
                self.result = Some(result);
                self.current_speed = 0.0;
            }
            TestUpdate::Cancelled => {
                self.current_speed = 0.0;
                self.result = None;
            }
            TestUpdate::Failed { error, result } => {
                self.error = Some(self.error_message(&error));
                self.result = result;
                self.advice = None;
                self.current_speed = 0.0;
            }
        }
    }

    fn error_message(&self, error: &SpeedError) -> String {
        let locale = self.settings.locale;
        match error {
            SpeedError::Download { status, label } => i18n::text_with(
                locale,
                TextKey::DownloadFailed,
                &[
                    ("file", label.to_string()),
                    ("status", status.to_string()),
                ],
            ),
            SpeedError::EmptyBody { label } => i18n::text_with(
                locale,
                TextKey::DownloadEmpty,
                &[("file", label.to_string())],
            ),
            SpeedError::Unexpected(_) => i18n::text(locale, TextKey::GenericError).to_owned(),
        }
    }

    /// Re-derives locale-dependent derived text after a language switch.
    fn refresh_localized(&mut self) {
        if let Some(result) = self.result {
            self.advice = Some(generate_advice(&result, self.settings.locale));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speedtest::round_mbps;

    fn app() -> App {
        App::new(Settings::default())
    }

    #[tokio::test]
    async fn finished_update_sets_result_and_advice() {
        let mut app = app();
        let result = TestResult {
            download_mbps: 120.0,
            upload_mbps: 40.0,
            ping_ms: 21.0,
        };
        app.apply_update(TestUpdate::Finished(result));
        assert_eq!(app.result, Some(result));
        assert!(app.advice.is_some());
        assert_eq!(app.current_speed, 0.0);
    }

    #[tokio::test]
    async fn download_failure_is_localized_with_label_and_status() {
        let mut app = app();
        app.apply_update(TestUpdate::Failed {
            error: SpeedError::Download {
                status: 404,
                label: SizeLabel::Mb100,
            },
            result: Some(TestResult::failed(30.0)),
        });
        let message = app.error.expect("error surfaced");
        assert!(message.contains("100MB"));
        assert!(message.contains("404"));
        let result = app.result.expect("zeroed result kept");
        assert_eq!(result.download_mbps, 0.0);
        assert_eq!(result.ping_ms, 30.0);
    }

    #[tokio::test]
    async fn stop_when_idle_changes_nothing() {
        let mut app = app();
        app.result = Some(TestResult {
            download_mbps: round_mbps(55.55),
            upload_mbps: 20.0,
            ping_ms: 25.0,
        });
        app.stop_test();
        assert_eq!(app.stage, TestStage::Idle);
        assert!(app.result.is_some());
        assert!(!app.is_running());
    }

    #[tokio::test]
    async fn language_toggle_relocalizes_advice() {
        let mut app = app();
        let result = TestResult {
            download_mbps: 120.0,
            upload_mbps: 40.0,
            ping_ms: 21.0,
        };
        app.apply_update(TestUpdate::Finished(result));
        let english = app.advice.clone().unwrap();
        app.settings.locale = app.settings.locale.toggle();
        app.refresh_localized();
        assert_ne!(app.advice.unwrap(), english);
    }
}
