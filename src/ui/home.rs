use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::mood::MOODS;
use crate::store::Progress;

const BANNER: &str = r#"
 ███████╗████████╗██████╗ ███████╗███████╗███████╗ ██████╗ █████╗ ██████╗ ███████╗
 ██╔════╝╚══██╔══╝██╔══██╗██╔════╝██╔════╝██╔════╝██╔════╝██╔══██╗██╔══██╗██╔════╝
 ███████╗   ██║   ██████╔╝█████╗  ███████╗███████╗██║     ███████║██║  ██║█████╗
 ╚════██║   ██║   ██╔══██╗██╔══╝  ╚════██║╚════██║██║     ██╔══██║██║  ██║██╔══╝
 ███████║   ██║   ██║  ██║███████╗███████║███████║╚██████╗██║  ██║██████╔╝███████╗
 ╚══════╝   ╚═╝   ╚═╝  ╚═╝╚══════╝╚══════╝╚══════╝ ╚═════╝╚═╝  ╚═╝╚═════╝ ╚══════╝"#;

fn intensity_bar(intensity: u8) -> String {
    let filled = intensity.min(10) as usize;
    format!("{}{}", "●".repeat(filled), "○".repeat(10 - filled))
}

pub fn render_home(frame: &mut Frame, area: Rect, mood_cursor: usize, progress: &Progress) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // Banner
            Constraint::Length(2), // Subtitle
            Constraint::Min(10),   // Moods + summary
            Constraint::Length(1), // Footer
        ])
        .split(area);

    let banner = Paragraph::new(BANNER)
        .style(Style::default().fg(Color::Rgb(120, 220, 180)))
        .alignment(Alignment::Center);
    frame.render_widget(banner, chunks[0]);

    let subtitle = Paragraph::new(Line::from(Span::styled(
        "  🌿 Take a breath. How are you feeling right now?  ",
        Style::default()
            .fg(Color::Rgb(255, 220, 120))
            .add_modifier(Modifier::BOLD | Modifier::ITALIC),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(subtitle, chunks[1]);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[2]);

    let mut mood_lines = vec![Line::from("")];
    for (i, mood) in MOODS.iter().enumerate() {
        let selected = i == mood_cursor;
        let marker = if selected { "▶" } else { " " };
        let label_style = if selected {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(mood.color)
        };
        mood_lines.push(Line::from(vec![
            Span::styled(format!("  {marker} "), Style::default().fg(Color::Rgb(255, 220, 80))),
            Span::styled(format!("[{}] ", i + 1), Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
            Span::styled(format!("{} ", mood.emoji), Style::default()),
            Span::styled(format!("{:<10}", mood.label), label_style),
            Span::styled(intensity_bar(mood.intensity), Style::default().fg(mood.color)),
        ]));
        mood_lines.push(Line::from(""));
    }
    let moods = Paragraph::new(mood_lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(70, 160, 140)))
            .title(" 💭 Mood Check-in: ↑↓ Select, Enter to Continue ")
            .title_style(Style::default().fg(Color::Rgb(150, 240, 190)).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(moods, cols[0]);

    let mut summary = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Sessions    ", Style::default().fg(Color::Rgb(140, 140, 160))),
            Span::styled(progress.total_sessions.to_string(), Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("  Streak      ", Style::default().fg(Color::Rgb(140, 140, 160))),
            Span::styled(format!("{} day(s)", progress.streak_days), Style::default().fg(Color::Rgb(255, 160, 60)).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("  Level       ", Style::default().fg(Color::Rgb(140, 140, 160))),
            Span::styled(progress.level().to_string(), Style::default().fg(Color::Rgb(150, 240, 190)).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(""),
        Line::from(Span::styled("  ⌨ Keys", Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD))),
    ];
    for (keys, what) in [
        ("1-6 / Enter", "Pick a mood"),
        ("S", "Skip check-in"),
        ("P", "Progress"),
        ("Tab", "Switch tabs"),
        ("q / Ctrl+C", "Quit"),
    ] {
        summary.push(Line::from(vec![
            Span::styled(format!("    {keys:<14}"), Style::default().fg(Color::Rgb(80, 200, 255))),
            Span::styled(what, Style::default().fg(Color::Rgb(140, 140, 140))),
        ]));
    }
    let summary = Paragraph::new(summary).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(70, 160, 140)))
            .title(" 📈 Your Journey ")
            .title_style(Style::default().fg(Color::Rgb(150, 240, 190)).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(summary, cols[1]);

    let footer = Paragraph::new(Line::from(vec![
        Span::styled("  🦀 ", Style::default().fg(Color::Rgb(255, 100, 50))),
        Span::styled(concat!("v", env!("CARGO_PKG_VERSION")), Style::default().fg(Color::Rgb(80, 80, 100))),
        Span::styled("  │  ", Style::default().fg(Color::Rgb(40, 40, 60))),
        Span::styled("Small breaks, big difference", Style::default().fg(Color::Rgb(100, 100, 130))),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(footer, chunks[3]);
}
