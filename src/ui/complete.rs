use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::App;
use crate::store::achievement_title;

fn verdict(score: u32) -> (&'static str, Color) {
    match score {
        100.. => ("Amazing! You really let it out.", Color::Rgb(255, 215, 0)),
        60..=99 => ("Nice session. Hope you feel lighter.", Color::Rgb(150, 240, 190)),
        _ => ("Every minute counts. Be gentle with yourself.", Color::Rgb(140, 180, 255)),
    }
}

pub fn render_complete(frame: &mut Frame, area: Rect, app: &App) {
    let Some(result) = &app.last_result else {
        return;
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(70, 160, 140)))
        .title(format!(" ✨ {} Complete ", result.game.name()))
        .title_style(Style::default().fg(Color::Rgb(150, 240, 190)).add_modifier(Modifier::BOLD));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let (message, color) = verdict(result.score);
    let best = app.store.best_score(result.game.id()).unwrap_or(result.score);
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(color).add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(vec![
            Span::styled("Score  ", Style::default().fg(Color::Rgb(140, 140, 160))),
            Span::styled(result.score.to_string(), Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
            Span::styled("    Best  ", Style::default().fg(Color::Rgb(140, 140, 160))),
            Span::styled(best.to_string(), Style::default().fg(Color::White)),
        ]),
        Line::from(vec![
            Span::styled("Time  ", Style::default().fg(Color::Rgb(140, 140, 160))),
            Span::styled(
                format!("{}:{:02}", result.duration_secs / 60, result.duration_secs % 60),
                Style::default().fg(Color::Cyan),
            ),
        ]),
        Line::from(""),
    ];

    if let Some(mood) = app.mood {
        lines.push(Line::from(vec![
            Span::styled("You came in feeling ", Style::default().fg(Color::Rgb(140, 140, 160))),
            Span::styled(format!("{} {}", mood.emoji, mood.label), Style::default().fg(mood.color)),
        ]));
        lines.push(Line::from(""));
    }

    for id in &result.unlocked {
        lines.push(Line::from(vec![
            Span::styled("🏆 ", Style::default()),
            Span::styled(achievement_title(id), Style::default().fg(Color::Rgb(255, 215, 0)).add_modifier(Modifier::BOLD)),
        ]));
    }
    if !result.unlocked.is_empty() {
        lines.push(Line::from(""));
    }

    lines.push(Line::from(vec![
        Span::styled("Enter", Style::default().fg(Color::Rgb(80, 200, 255)).add_modifier(Modifier::BOLD)),
        Span::styled(" play again  ", Style::default().fg(Color::Rgb(100, 100, 130))),
        Span::styled("S", Style::default().fg(Color::Rgb(80, 200, 255)).add_modifier(Modifier::BOLD)),
        Span::styled(" share  ", Style::default().fg(Color::Rgb(100, 100, 130))),
        Span::styled("C", Style::default().fg(Color::Rgb(80, 200, 255)).add_modifier(Modifier::BOLD)),
        Span::styled(" coach  ", Style::default().fg(Color::Rgb(100, 100, 130))),
        Span::styled("G", Style::default().fg(Color::Rgb(80, 200, 255)).add_modifier(Modifier::BOLD)),
        Span::styled(" games  ", Style::default().fg(Color::Rgb(100, 100, 130))),
        Span::styled("H", Style::default().fg(Color::Rgb(80, 200, 255)).add_modifier(Modifier::BOLD)),
        Span::styled(" home", Style::default().fg(Color::Rgb(100, 100, 130))),
    ]));

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_bands() {
        assert_eq!(verdict(250).1, Color::Rgb(255, 215, 0));
        assert_eq!(verdict(60).1, Color::Rgb(150, 240, 190));
        assert_eq!(verdict(0).1, Color::Rgb(140, 180, 255));
    }
}
