use crate::app::App;
use crate::i18n::TextKey;
use crate::profiles::SizeLabel;
use crate::speedtest::TestStage;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

// Color Palette - Elegant & Minimal
const ACCENT: Color = Color::Rgb(100, 149, 237); // Cornflower blue
const SUCCESS: Color = Color::Rgb(134, 194, 156); // Soft green
const INFO: Color = Color::Rgb(147, 180, 220); // Soft blue
const WARN: Color = Color::Rgb(220, 180, 130); // Soft amber
const ERROR: Color = Color::Rgb(220, 120, 120); // Soft red
const TEXT_PRIMARY: Color = Color::Rgb(230, 230, 230);
const TEXT_SECONDARY: Color = Color::Rgb(160, 160, 160);
const TEXT_MUTED: Color = Color::Rgb(100, 100, 100);
const BORDER: Color = Color::Rgb(60, 60, 65);

/// Gauge full-scale, in Mbps.
const GAUGE_MAX_MBPS: f64 = 500.0;

pub fn draw_ui(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Min(6),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .split(area);

    draw_header(frame, chunks[0], app);
    draw_gauge(frame, chunks[1], app);
    draw_result_tiles(frame, chunks[2], app);

    let panels =
        Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(chunks[3]);
    draw_server_info(frame, panels[0], app);
    draw_advice(frame, panels[1], app);

    draw_size_selector(frame, chunks[4], app);
    draw_help(frame, chunks[5], app);
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(BORDER));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::horizontal([
        Constraint::Length(12),
        Constraint::Min(10),
        Constraint::Length(20),
    ])
    .split(inner);

    let title = Paragraph::new(app.text(TextKey::AppTitle))
        .style(Style::default().fg(TEXT_PRIMARY).add_modifier(Modifier::BOLD));
    frame.render_widget(title, chunks[0]);

    let (status, color) = match app.stage {
        TestStage::Idle => (app.text(TextKey::Ready), TEXT_MUTED),
        TestStage::Ping => (app.text(TextKey::TestingPing), WARN),
        TestStage::Downloading => (app.text(TextKey::TestingDownload), SUCCESS),
        TestStage::Uploading => (app.text(TextKey::TestingUpload), INFO),
        TestStage::Finished => (app.text(TextKey::TestComplete), ACCENT),
    };
    let status_text = Paragraph::new(status)
        .style(Style::default().fg(color))
        .alignment(Alignment::Center);
    frame.render_widget(status_text, chunks[1]);

    frame.render_widget(
        Paragraph::new(stage_indicator(app)).alignment(Alignment::Right),
        chunks[2],
    );
}

fn stage_indicator(app: &App) -> Line<'static> {
    let stages = [
        (TestStage::Ping, "ping"),
        (TestStage::Downloading, "down"),
        (TestStage::Uploading, "up"),
    ];

    let mut spans = Vec::new();
    for (i, (stage, label)) in stages.iter().enumerate() {
        let is_active = app.stage == *stage;
        let is_complete = match app.stage {
            TestStage::Downloading => *stage == TestStage::Ping,
            TestStage::Uploading => {
                *stage == TestStage::Ping || *stage == TestStage::Downloading
            }
            TestStage::Finished => true,
            _ => false,
        };

        let style = if is_active {
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
        } else if is_complete {
            Style::default().fg(TEXT_SECONDARY)
        } else {
            Style::default().fg(TEXT_MUTED)
        };
        spans.push(Span::styled(*label, style));
        if i < stages.len() - 1 {
            spans.push(Span::styled(" / ", Style::default().fg(TEXT_MUTED)));
        }
    }
    Line::from(spans)
}

fn draw_gauge(frame: &mut Frame, area: Rect, app: &App) {
    let label_key = match app.stage {
        TestStage::Ping => TextKey::Ping,
        TestStage::Downloading => TextKey::Download,
        TestStage::Uploading => TextKey::Upload,
        _ => TextKey::Speed,
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BORDER))
        .title(Span::styled(
            app.text(label_key),
            Style::default().fg(TEXT_SECONDARY),
        ));

    let ratio = (app.current_speed / GAUGE_MAX_MBPS).clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .block(block)
        .gauge_style(Style::default().fg(ACCENT))
        .ratio(ratio)
        .label(Span::styled(
            format!("{:.1} {}", app.current_speed, app.text(TextKey::Mbps)),
            Style::default().fg(TEXT_PRIMARY).add_modifier(Modifier::BOLD),
        ));
    frame.render_widget(gauge, area);
}

fn draw_result_tiles(frame: &mut Frame, area: Rect, app: &App) {
    let tiles = Layout::horizontal([
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
    ])
    .split(area);

    // Ping is shown as soon as it is measured; speeds only land with the
    // final result.
    let ping = app
        .result
        .map(|r| r.ping_ms)
        .or(app.live_ping)
        .map(|ms| format!("{ms:.0}"));
    let download = app.result.map(|r| format!("{:.1}", r.download_mbps));
    let upload = app.result.map(|r| format!("{:.1}", r.upload_mbps));

    draw_tile(
        frame,
        tiles[0],
        app.text(TextKey::Ping),
        ping,
        app.text(TextKey::Ms),
        WARN,
        app.stage == TestStage::Ping,
    );
    draw_tile(
        frame,
        tiles[1],
        app.text(TextKey::Download),
        download,
        app.text(TextKey::Mbps),
        SUCCESS,
        app.stage == TestStage::Downloading,
    );
    draw_tile(
        frame,
        tiles[2],
        app.text(TextKey::Upload),
        upload,
        app.text(TextKey::Mbps),
        INFO,
        app.stage == TestStage::Uploading,
    );
}

fn draw_tile(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    value: Option<String>,
    unit: &str,
    color: Color,
    active: bool,
) {
    let border = if active { color } else { BORDER };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(Span::styled(
            label.to_owned(),
            Style::default().fg(TEXT_SECONDARY),
        ));

    let line = match value {
        Some(value) => Line::from(vec![
            Span::styled(
                value,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(unit.to_owned(), Style::default().fg(TEXT_MUTED)),
        ]),
        None => Line::from(Span::styled("--", Style::default().fg(TEXT_MUTED))),
    };
    let tile = Paragraph::new(line)
        .block(block)
        .alignment(Alignment::Center);
    frame.render_widget(tile, area);
}

fn draw_server_info(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BORDER))
        .title(Span::styled(
            app.text(TextKey::ServerInfoTitle),
            Style::default().fg(TEXT_SECONDARY),
        ));

    let row = |label: &str, value: &str| {
        Line::from(vec![
            Span::styled(format!("{label}: "), Style::default().fg(TEXT_MUTED)),
            Span::styled(value.to_owned(), Style::default().fg(TEXT_PRIMARY)),
        ])
    };

    let lines = match &app.server_info {
        Some(info) => vec![
            row(app.text(TextKey::IpLabel), &info.ip),
            row(app.text(TextKey::IspLabel), &info.isp),
            row(app.text(TextKey::OrgLabel), &info.org),
            row(app.text(TextKey::CityLabel), &info.city),
            row(app.text(TextKey::CountryLabel), &info.country),
        ],
        None => vec![Line::from(Span::styled(
            app.text(TextKey::Loading),
            Style::default().fg(TEXT_MUTED),
        ))],
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_advice(frame: &mut Frame, area: Rect, app: &App) {
    let (title, body, color) = if let Some(error) = &app.error {
        (app.text(TextKey::ErrorTitle), error.clone(), ERROR)
    } else if let Some(advice) = &app.advice {
        (app.text(TextKey::AdviceTitle), advice.clone(), TEXT_PRIMARY)
    } else {
        (
            app.text(TextKey::AdviceTitle),
            app.text(TextKey::Tagline).to_owned(),
            TEXT_MUTED,
        )
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BORDER))
        .title(Span::styled(title, Style::default().fg(TEXT_SECONDARY)));
    let paragraph = Paragraph::new(body)
        .style(Style::default().fg(color))
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(paragraph, area);
}

fn draw_size_selector(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BORDER))
        .title(Span::styled(
            app.text(TextKey::FileSizeLabel),
            Style::default().fg(TEXT_SECONDARY),
        ));

    let mut spans = Vec::new();
    for (i, label) in SizeLabel::ALL.iter().enumerate() {
        let style = if *label == app.selected_size {
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT_SECONDARY)
        };
        spans.push(Span::styled(label.to_string(), style));
        if i < SizeLabel::ALL.len() - 1 {
            spans.push(Span::styled("   ", Style::default().fg(TEXT_MUTED)));
        }
    }

    let selector = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(selector, area);
}

fn draw_help(frame: &mut Frame, area: Rect, app: &App) {
    let hint = if app.is_running() {
        TextKey::StopHint
    } else {
        TextKey::StartHint
    };
    let help = Line::from(vec![
        Span::styled(app.text(hint), Style::default().fg(TEXT_SECONDARY)),
        Span::styled("  ·  ", Style::default().fg(TEXT_MUTED)),
        Span::styled(app.text(TextKey::SizeHint), Style::default().fg(TEXT_MUTED)),
        Span::styled("  ·  ", Style::default().fg(TEXT_MUTED)),
        Span::styled(
            app.text(TextKey::LanguageHint),
            Style::default().fg(TEXT_MUTED),
        ),
        Span::styled("  ·  ", Style::default().fg(TEXT_MUTED)),
        Span::styled(app.text(TextKey::QuitHint), Style::default().fg(TEXT_MUTED)),
    ]);
    frame.render_widget(Paragraph::new(help).alignment(Alignment::Center), area);
}
