pub mod complete;
pub mod home;
pub mod progress;
pub mod select;
pub mod tabs;

use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::{App, View};
use crate::coach;

pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status line
        ])
        .split(frame.area());

    tabs::render_tabs(frame, app, chunks[0]);

    match app.view {
        View::Home => home::render_home(frame, chunks[1], app.mood_cursor, app.store.progress()),
        View::GameSelect => select::render_select(frame, chunks[1], app.selected_game, app.mood),
        View::Playing => app.game_mut().render(frame, chunks[1]),
        View::Complete => complete::render_complete(frame, chunks[1], app),
        View::Progress => progress::render_progress(frame, chunks[1], &app.store),
    }

    if let Some(status) = &app.status {
        let line = Paragraph::new(Line::from(Span::styled(
            format!(" {status}"),
            Style::default().fg(Color::Rgb(255, 220, 80)),
        )));
        frame.render_widget(line, chunks[2]);
    }

    // Coach overlay renders on top of everything
    if app.show_coach && app.view == View::Complete {
        if let Some(result) = &app.last_result {
            let lines = coach::advice(app.mood, result.game, result.score, app.store.progress());
            render_coach(frame, frame.area(), &lines);
        }
    }
}

fn render_coach(frame: &mut Frame, area: Rect, advice: &[String]) {
    let overlay_w = 60u16.min(area.width.saturating_sub(4));
    let overlay_h = (advice.len() as u16 * 2 + 6).min(area.height.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(overlay_w)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_h)) / 2;
    let overlay_area = Rect::new(x, y, overlay_w, overlay_h);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Rgb(120, 220, 160)))
        .title(" 🧘 Coach Check-in ")
        .title_style(Style::default().fg(Color::Rgb(150, 240, 190)).add_modifier(Modifier::BOLD))
        .style(Style::default().bg(Color::Rgb(15, 20, 25)));
    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    let mut lines = vec![Line::from("")];
    for text in advice {
        lines.push(Line::from(Span::styled(
            format!("  {text}"),
            Style::default().fg(Color::Rgb(210, 220, 230)),
        )));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(vec![
        Span::styled("  Enter", Style::default().fg(Color::Rgb(80, 200, 255)).add_modifier(Modifier::BOLD)),
        Span::styled(" / ", Style::default().fg(Color::Rgb(100, 100, 130))),
        Span::styled("Esc", Style::default().fg(Color::Rgb(80, 200, 255)).add_modifier(Modifier::BOLD)),
        Span::styled(" close", Style::default().fg(Color::Rgb(100, 100, 130))),
    ]));

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .style(Style::default().bg(Color::Rgb(15, 20, 25)));
    frame.render_widget(p, inner);
}
