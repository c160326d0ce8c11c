use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::games::GameId;
use crate::store::{SessionStore, ACHIEVEMENTS};

const RECENT: usize = 8;

fn game_name(id: &str) -> &str {
    GameId::from_id(id).map_or(id, |g| g.name())
}

pub fn render_progress(frame: &mut Frame, area: Rect, store: &SessionStore) {
    let progress = store.progress();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(11), Constraint::Min(5)])
        .split(area);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    // Stats
    let stats_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(70, 160, 140)))
        .title(" 📊 Progress ")
        .title_style(Style::default().fg(Color::Rgb(150, 240, 190)).add_modifier(Modifier::BOLD));
    let stats_inner = stats_block.inner(top[0]);
    frame.render_widget(stats_block, top[0]);

    let stat_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(1)])
        .split(stats_inner);

    let favorite = progress.favorite_game.as_deref().map_or("-", game_name);
    let minutes: u32 = store.sessions().iter().map(|s| s.duration_secs).sum::<u32>() / 60;
    let label = Style::default().fg(Color::Rgb(140, 140, 160));
    let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
    let stats = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Total sessions      ", label),
            Span::styled(progress.total_sessions.to_string(), value),
        ]),
        Line::from(vec![
            Span::styled("  Favourite game      ", label),
            Span::styled(favorite.to_string(), value),
        ]),
        Line::from(vec![
            Span::styled("  Minutes relaxing    ", label),
            Span::styled(minutes.to_string(), value),
        ]),
        Line::from(vec![
            Span::styled("  Stress reduction    ", label),
            Span::styled(format!("{}%", progress.average_stress_reduction), value),
        ]),
        Line::from(vec![
            Span::styled("  Streak              ", label),
            Span::styled(format!("🔥 {} day(s)", progress.streak_days), value),
        ]),
    ];
    frame.render_widget(Paragraph::new(stats), stat_rows[0]);

    let level = progress.level();
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Rgb(120, 220, 160)).bg(Color::Rgb(30, 40, 40)))
        .ratio(level as f64 / 10.0)
        .label(format!("Level {level}/10"));
    frame.render_widget(gauge, stat_rows[1]);

    // Achievements
    let mut lines = vec![Line::from("")];
    for (id, title) in ACHIEVEMENTS {
        let line = if progress.achievements.contains(id) {
            Line::from(vec![
                Span::styled("  🏆 ", Style::default()),
                Span::styled(title, Style::default().fg(Color::Rgb(255, 215, 0)).add_modifier(Modifier::BOLD)),
            ])
        } else {
            Line::from(vec![
                Span::styled("  🔒 ", Style::default()),
                Span::styled(title, Style::default().fg(Color::Rgb(80, 80, 100))),
            ])
        };
        lines.push(line);
    }
    let achievements = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(70, 160, 140)))
            .title(format!(" 🏅 Achievements {}/{} ", progress.achievements.len(), ACHIEVEMENTS.len()))
            .title_style(Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(achievements, top[1]);

    // Recent sessions
    let header = Row::new(vec!["When", "Game", "Mood", "Time", "Score"])
        .style(Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD));
    let recent: Vec<Row> = store
        .recent(RECENT)
        .map(|s| {
            Row::new(vec![
                s.timestamp.format("%Y-%m-%d %H:%M").to_string(),
                game_name(&s.game).to_string(),
                s.mood.clone(),
                format!("{}:{:02}", s.duration_secs / 60, s.duration_secs % 60),
                s.score.to_string(),
            ])
            .style(Style::default().fg(Color::Rgb(200, 200, 220)))
        })
        .collect();

    let table = if recent.is_empty() {
        Table::new(
            vec![Row::new(vec!["No sessions yet. Pick a mood on the Home tab to begin."])
                .style(Style::default().fg(Color::Rgb(80, 80, 100)))],
            [Constraint::Percentage(100)],
        )
    } else {
        Table::new(
            recent,
            [
                Constraint::Length(17),
                Constraint::Length(13),
                Constraint::Length(12),
                Constraint::Length(6),
                Constraint::Length(6),
            ],
        )
        .header(header)
    };
    let table = table.block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(50, 100, 140)))
            .title(" 🕒 Recent Sessions ")
            .title_style(Style::default().fg(Color::Rgb(120, 180, 255)).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(table, rows[1]);
}
