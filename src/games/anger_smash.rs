use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::prelude::*;
use ratatui::widgets::*;
use tracing::debug;

use crate::engine::{
    ComboBonus, EngineError, EntityKind, Hit, Motion, Session, SessionConfig, SpawnEdge, State,
};
use crate::games::field::{self, BACKGROUND};
use crate::games::Game;
use crate::sound::Cue;

/// Unsmashed targets fade and vanish after this long.
const TARGET_LIFETIME: Duration = Duration::from_secs(9);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Target {
    Box,
    Plate,
    Balloon,
    Ice,
    PowerUp,
}

impl EntityKind for Target {
    fn points(&self) -> u32 {
        match self {
            Target::Box => 10,
            Target::Plate => 15,
            Target::Balloon => 20,
            Target::Ice => 25,
            Target::PowerUp => 50,
        }
    }
}

impl Target {
    fn glyph(&self) -> char {
        match self {
            Target::Box => '▓',
            Target::Plate => '○',
            Target::Balloon => '●',
            Target::Ice => '▒',
            Target::PowerUp => '★',
        }
    }

    fn color(&self) -> Color {
        match self {
            Target::Box => Color::Rgb(180, 120, 60),
            Target::Plate => Color::Rgb(230, 230, 230),
            Target::Balloon => Color::Rgb(240, 80, 80),
            Target::Ice => Color::Rgb(140, 220, 255),
            Target::PowerUp => Color::Rgb(255, 215, 0),
        }
    }
}

pub fn config(session_secs: u32) -> SessionConfig<Target> {
    SessionConfig {
        session_secs,
        spawn_period: Duration::from_millis(1500),
        motion_period: Duration::from_millis(16),
        cap: 8,
        categories: vec![
            (Target::Box, 1),
            (Target::Plate, 1),
            (Target::Balloon, 1),
            (Target::Ice, 1),
            (Target::PowerUp, 1),
        ],
        size_range: (5.0, 7.0),
        spawn_edge: SpawnEdge::Anywhere,
        motion: Motion::Still,
        lifetime: Some(TARGET_LIFETIME),
        combo_window: Duration::from_secs(2),
    }
}

/// Click targets as fast as you can; quick streaks earn a combo bonus.
pub struct AngerSmash {
    session: Session<Target, ComboBonus>,
    rng: StdRng,
    field_area: Rect,
    smashed: u32,
    best_combo: u32,
    last_hit: Option<Hit<Target>>,
    cues: Vec<Cue>,
}

impl AngerSmash {
    pub fn new(session_secs: u32) -> Result<Self, EngineError> {
        Ok(Self {
            session: Session::new(config(session_secs), ComboBonus::default())?,
            rng: StdRng::from_entropy(),
            field_area: Rect::default(),
            smashed: 0,
            best_combo: 0,
            last_hit: None,
            cues: Vec::new(),
        })
    }

    fn smash_at(&mut self, column: u16, row: u16) {
        let Some(point) = field::cell_to_point(self.field_area, column, row) else {
            return;
        };
        let Some(id) = self.session.hit_test(point) else {
            return;
        };
        let Some(hit) = self.session.interact(id) else {
            return;
        };
        self.smashed += 1;
        self.best_combo = self.best_combo.max(hit.combo);
        self.cues.push(match hit.kind {
            Target::PowerUp => Cue::PowerUp,
            _ => Cue::Smash,
        });
        self.last_hit = Some(hit);
    }

    fn render_field(&self, width: usize, height: usize) -> Vec<Line<'static>> {
        let mut grid = field::blank_grid(width, height, BACKGROUND);
        let lifetime = self.session.config().lifetime;
        for target in self.session.entities() {
            let color = if target.vitality(lifetime) < 0.3 {
                Color::DarkGray
            } else {
                target.kind.color()
            };
            field::paint_entity(
                &mut grid,
                target,
                target.kind.glyph(),
                Style::default().fg(color).bg(BACKGROUND),
            );
            field::label_entity(
                &mut grid,
                target,
                &format!("+{}", target.points),
                Style::default()
                    .fg(Color::Black)
                    .bg(color)
                    .add_modifier(Modifier::BOLD),
            );
        }
        field::grid_to_lines(grid)
    }

    fn render_start_screen(&self, frame: &mut Frame, area: Rect) {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "💥 ANGER SMASH 💥",
                Style::default().fg(Color::Rgb(255, 100, 80)).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Smash the targets before the clock runs out.",
                Style::default().fg(Color::Gray),
            )),
            Line::from(Span::styled(
                "Hit them quickly in a row to build a combo.",
                Style::default().fg(Color::Gray),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("▓ 10  ", Style::default().fg(Target::Box.color())),
                Span::styled("○ 15  ", Style::default().fg(Target::Plate.color())),
                Span::styled("● 20  ", Style::default().fg(Target::Balloon.color())),
                Span::styled("▒ 25  ", Style::default().fg(Target::Ice.color())),
                Span::styled("★ 50", Style::default().fg(Target::PowerUp.color())),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "Press SPACE or ENTER to start",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
        ];
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
    }
}

impl Game for AngerSmash {
    fn update(&mut self, dt: Duration) -> Option<u32> {
        let done = self.session.advance(dt, &mut self.rng)?;
        debug!(score = done.final_score, secs = done.played.as_secs(), "anger smash finished");
        self.cues.push(Cue::Complete);
        Some(done.final_score)
    }

    fn handle_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(' ') | KeyCode::Enter => match self.session.state() {
                State::Idle => {
                    self.session.start();
                }
                State::Ended => {
                    self.reset();
                    self.session.start();
                }
                _ => {}
            },
            KeyCode::Char('p') | KeyCode::Char('P') => self.session.toggle_pause(),
            KeyCode::Char('r') | KeyCode::Char('R') => self.reset(),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent) {
        if let MouseEventKind::Down(MouseButton::Left) = event.kind {
            self.smash_at(event.column, event.row);
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(230, 80, 60)))
            .title(" 💥 Anger Smash ")
            .title_style(Style::default().fg(Color::Rgb(255, 140, 100)).add_modifier(Modifier::BOLD));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(4),
                Constraint::Length(1),
            ])
            .split(inner);

        let mut status = vec![
            Span::styled(
                format!(" Score: {} ", self.session.score()),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("Time: {}s ", self.session.remaining_secs()),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("Smashed: {} ", self.smashed),
                Style::default().fg(Color::Green),
            ),
        ];
        if self.session.combo() > 1 {
            status.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
            status.push(Span::styled(
                format!("🔥 Combo x{} ", self.session.combo()),
                Style::default().fg(Color::Rgb(255, 140, 0)).add_modifier(Modifier::BOLD),
            ));
        }
        if let Some(hit) = self.last_hit {
            status.push(Span::styled(
                format!(" +{}", hit.awarded),
                Style::default().fg(hit.kind.color()),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(status)), chunks[0]);

        self.field_area = chunks[1];
        self.session.set_field(field::field_size(chunks[1]));

        if self.session.state() == State::Idle {
            self.render_start_screen(frame, chunks[1]);
        } else {
            let lines = self.render_field(chunks[1].width as usize, chunks[1].height as usize);
            frame.render_widget(Paragraph::new(lines), chunks[1]);
        }

        let help = match self.session.state() {
            State::Ended => Line::from(vec![
                Span::styled(" 💪 Feeling better? ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
                Span::styled(
                    format!("Smashed {} targets, best combo x{}", self.smashed, self.best_combo),
                    Style::default().fg(Color::Gray),
                ),
            ]),
            State::Paused => Line::from(Span::styled(
                " ⏸ PAUSED - Press P to resume ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
            _ => Line::from(vec![
                Span::styled(" Click Smash ", Style::default().fg(Color::DarkGray)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("Space Start ", Style::default().fg(Color::DarkGray)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("P Pause ", Style::default().fg(Color::DarkGray)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("R Reset ", Style::default().fg(Color::DarkGray)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("Esc Menu", Style::default().fg(Color::DarkGray)),
            ]),
        };
        frame.render_widget(Paragraph::new(help), chunks[2]);
    }

    fn reset(&mut self) {
        self.session.reset();
        self.smashed = 0;
        self.best_combo = 0;
        self.last_hit = None;
        self.cues.clear();
    }

    fn get_score(&self) -> u32 {
        self.session.score()
    }

    fn is_game_over(&self) -> bool {
        self.session.is_ended()
    }

    fn played_secs(&self) -> u32 {
        self.session.played().as_secs() as u32
    }

    fn drain_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }
}
