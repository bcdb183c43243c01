mod advice;
mod app;
mod config;
mod controller;
mod i18n;
mod ipinfo;
mod profiles;
mod speedtest;
#[cfg(test)]
mod testutil;
mod ui;

use std::time::Duration;

use anyhow::Result;
use app::App;
use config::Settings;
use crossterm::event::{self, Event};
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;
use ui::draw_ui;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("netgauge=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings::load();

    let mut terminal = ratatui::init();
    terminal.clear()?;

    let result = run_app(&mut terminal, settings).await;

    ratatui::restore();
    result
}

async fn run_app(terminal: &mut DefaultTerminal, settings: Settings) -> Result<()> {
    let mut app = App::new(settings);

    // Metadata lookup runs in the background; the test never waits on it.
    let (info_tx, mut info_rx) = mpsc::channel(1);
    tokio::spawn(async move {
        let _ = info_tx.send(ipinfo::fetch_server_info().await).await;
    });

    loop {
        terminal.draw(|frame| draw_ui(frame, &app))?;

        app.poll_updates();
        if let Ok(info) = info_rx.try_recv() {
            app.set_server_info(info);
        }

        if let Some(Event::Key(key)) = poll_event(Duration::from_millis(30))? {
            app.handle_key_event(key);
        }

        if app.should_quit {
            break;
        }
    }

    app.settings.save();
    Ok(())
}

fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}
