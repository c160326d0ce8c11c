use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::games::GameId;
use crate::mood::Mood;

struct GameTile {
    icon: &'static str,
    desc: &'static str,
    color: Color,
    border_color: Color,
}

fn tile(game: GameId) -> GameTile {
    match game {
        GameId::Breathing => GameTile { icon: "🌬️", desc: "Guided 4-4-6\nbreathing", color: Color::Rgb(120, 180, 255), border_color: Color::Rgb(60, 90, 140) },
        GameId::BubblePop => GameTile { icon: "🫧", desc: "Pop rising\nbubbles", color: Color::Rgb(96, 200, 250), border_color: Color::Rgb(40, 100, 130) },
        GameId::Drawing => GameTile { icon: "🎨", desc: "Paint freely\nwith the mouse", color: Color::Rgb(236, 120, 180), border_color: Color::Rgb(120, 50, 90) },
        GameId::AngerSmash => GameTile { icon: "💥", desc: "Smash targets,\nbuild combos", color: Color::Rgb(255, 110, 80), border_color: Color::Rgb(140, 50, 40) },
    }
}

fn render_game_tile(frame: &mut Frame, area: Rect, game: GameId, selected: bool, recommended: bool) {
    let tile = tile(game);
    let border_color = if selected { Color::Rgb(255, 220, 80) } else { tile.border_color };
    let border_type = if selected { BorderType::Double } else { BorderType::Rounded };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 { return; }

    let name_color = if selected { Color::Rgb(255, 255, 255) } else { tile.color };
    let mut lines = vec![Line::from(vec![
        Span::styled(format!("[{}] ", game.index() + 1), Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
        Span::styled(format!("{} ", tile.icon), Style::default()),
        Span::styled(game.name(), Style::default().fg(name_color).add_modifier(Modifier::BOLD)),
    ])];

    for desc_line in tile.desc.split('\n') {
        lines.push(Line::from(Span::styled(
            desc_line,
            Style::default().fg(if selected { Color::Rgb(180, 180, 200) } else { Color::Rgb(120, 120, 140) }),
        )));
    }

    if recommended {
        lines.push(Line::from(Span::styled("★ Recommended", Style::default().fg(Color::Rgb(150, 240, 190)))));
    }
    if selected {
        lines.push(Line::from(Span::styled(
            "▶ Enter to play",
            Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD),
        )));
    }

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn game_controls(game: GameId) -> Vec<(&'static str, &'static str)> {
    match game {
        GameId::Breathing => vec![
            ("Space", "Start / Pause"),
            ("R", "Restart"),
            ("Esc", "Back to games"),
        ],
        GameId::BubblePop => vec![
            ("Click", "Pop a bubble"),
            ("P", "Pause"),
            ("R", "Restart"),
            ("Esc", "Back to games"),
        ],
        GameId::Drawing => vec![
            ("Drag", "Paint"),
            ("← → / 1-0", "Pick colour"),
            ("↑ ↓", "Brush size"),
            ("E / C", "Eraser / Clear"),
            ("Enter", "Finish drawing"),
            ("Esc", "Back to games"),
        ],
        GameId::AngerSmash => vec![
            ("Space", "Start"),
            ("Click", "Smash a target"),
            ("P", "Pause"),
            ("R", "Reset"),
            ("Esc", "Back to games"),
        ],
    }
}

pub fn render_select(frame: &mut Frame, area: Rect, selected_game: usize, mood: Option<&Mood>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),  // Mood line
            Constraint::Length(14), // Tiles
            Constraint::Min(6),     // Controls
        ])
        .split(area);

    let mood_line = match mood {
        Some(m) => Line::from(vec![
            Span::styled("  Feeling ", Style::default().fg(Color::Rgb(140, 140, 160))),
            Span::styled(format!("{} {}", m.emoji, m.label), Style::default().fg(m.color).add_modifier(Modifier::BOLD)),
            Span::styled("  ·  these games tend to help", Style::default().fg(Color::Rgb(140, 140, 160))),
        ]),
        None => Line::from(Span::styled(
            "  Pick whatever feels right",
            Style::default().fg(Color::Rgb(140, 140, 160)),
        )),
    };
    frame.render_widget(Paragraph::new(mood_line), chunks[0]);

    let games_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(70, 160, 140)))
        .title(" 🎮 Games: ↑↓←→ Select, Enter to Play ")
        .title_style(Style::default().fg(Color::Rgb(150, 240, 190)).add_modifier(Modifier::BOLD));
    let games_inner = games_block.inner(chunks[1]);
    frame.render_widget(games_block, chunks[1]);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
        .split(games_inner);

    for (r, row) in rows.iter().enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
            .split(*row);
        for (c, col) in cols.iter().enumerate() {
            let game = GameId::all()[r * 2 + c];
            let recommended = mood.is_some_and(|m| m.recommends(game));
            render_game_tile(frame, *col, game, selected_game == game.index(), recommended);
        }
    }

    let game = GameId::all()
        .get(selected_game)
        .copied()
        .unwrap_or(GameId::Breathing);
    let mut lines = vec![Line::from("")];
    for (keys, what) in game_controls(game) {
        lines.push(Line::from(vec![
            Span::styled(format!("    {keys:<16}"), Style::default().fg(Color::Rgb(80, 200, 255))),
            Span::styled(what, Style::default().fg(Color::Rgb(140, 140, 140))),
        ]));
    }
    let controls = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(50, 100, 140)))
            .title(format!(" 🎮 {} Control ", game.name()))
            .title_style(Style::default().fg(tile(game).color).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(controls, chunks[2]);
}
