use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::prelude::*;
use ratatui::widgets::*;
use tracing::debug;

use crate::engine::{
    EngineError, EntityKind, FlatPoints, Motion, Session, SessionConfig, SpawnEdge, State,
};
use crate::games::field::{self, BACKGROUND};
use crate::games::Game;
use crate::sound::Cue;

const BUBBLE_POINTS: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Bubble {
    Pink,
    Blue,
    Green,
    Purple,
    Yellow,
    Indigo,
}

impl EntityKind for Bubble {
    fn points(&self) -> u32 {
        BUBBLE_POINTS
    }
}

impl Bubble {
    fn color(&self) -> Color {
        match self {
            Bubble::Pink => Color::Rgb(244, 114, 182),
            Bubble::Blue => Color::Rgb(96, 165, 250),
            Bubble::Green => Color::Rgb(74, 222, 128),
            Bubble::Purple => Color::Rgb(192, 132, 252),
            Bubble::Yellow => Color::Rgb(250, 204, 21),
            Bubble::Indigo => Color::Rgb(129, 140, 248),
        }
    }
}

pub fn config(session_secs: u32) -> SessionConfig<Bubble> {
    SessionConfig {
        session_secs,
        spawn_period: Duration::from_millis(800),
        motion_period: Duration::from_millis(16),
        cap: 40,
        categories: vec![
            (Bubble::Pink, 1),
            (Bubble::Blue, 1),
            (Bubble::Green, 1),
            (Bubble::Purple, 1),
            (Bubble::Yellow, 1),
            (Bubble::Indigo, 1),
        ],
        size_range: (3.0, 6.0),
        spawn_edge: SpawnEdge::Bottom,
        motion: Motion::Rise {
            min_speed: 3.0,
            max_speed: 9.0,
        },
        lifetime: None,
        combo_window: Duration::from_secs(2),
    }
}

/// Rising bubbles, popped with the mouse. Starts as soon as it is opened.
pub struct BubblePop {
    session: Session<Bubble, FlatPoints>,
    rng: StdRng,
    field_area: Rect,
    popped: u32,
    cues: Vec<Cue>,
}

impl BubblePop {
    pub fn new(session_secs: u32) -> Result<Self, EngineError> {
        let mut session = Session::new(config(session_secs), FlatPoints)?;
        session.start();
        Ok(Self {
            session,
            rng: StdRng::from_entropy(),
            field_area: Rect::default(),
            popped: 0,
            cues: Vec::new(),
        })
    }

    fn pop_at(&mut self, column: u16, row: u16) {
        let Some(point) = field::cell_to_point(self.field_area, column, row) else {
            return;
        };
        let Some(id) = self.session.hit_test(point) else {
            return;
        };
        if self.session.interact(id).is_some() {
            self.popped += 1;
            self.cues.push(Cue::Pop);
        }
    }

    fn render_field(&self, width: usize, height: usize) -> Vec<Line<'static>> {
        let mut grid = field::blank_grid(width, height, BACKGROUND);
        for bubble in self.session.entities() {
            let color = bubble.kind.color();
            field::paint_entity(
                &mut grid,
                bubble,
                '░',
                Style::default().fg(color).bg(BACKGROUND),
            );
            field::label_entity(
                &mut grid,
                bubble,
                "◦",
                Style::default().fg(Color::White).bg(BACKGROUND),
            );
        }
        field::grid_to_lines(grid)
    }
}

impl Game for BubblePop {
    fn update(&mut self, dt: Duration) -> Option<u32> {
        let done = self.session.advance(dt, &mut self.rng)?;
        debug!(score = done.final_score, secs = done.played.as_secs(), "bubble pop finished");
        self.cues.push(Cue::Complete);
        Some(done.final_score)
    }

    fn handle_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('r') | KeyCode::Char('R') => self.reset(),
            KeyCode::Char('p') | KeyCode::Char('P') => self.session.toggle_pause(),
            KeyCode::Enter | KeyCode::Char(' ') if self.session.is_ended() => self.reset(),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent) {
        if let MouseEventKind::Down(MouseButton::Left) = event.kind {
            self.pop_at(event.column, event.row);
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(96, 165, 250)))
            .title(" 🫧 Bubble Pop ")
            .title_style(Style::default().fg(Color::Rgb(150, 200, 255)).add_modifier(Modifier::BOLD));

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

        let status = Line::from(vec![
            Span::styled(" 🫧 ", Style::default()),
            Span::styled(
                format!("Score: {} ", self.session.score()),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("Time Left: {}s ", self.session.remaining_secs()),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("Popped: {} ", self.popped),
                Style::default().fg(Color::Green),
            ),
        ]);
        frame.render_widget(Paragraph::new(status), chunks[0]);

        self.field_area = chunks[1];
        self.session.set_field(field::field_size(chunks[1]));
        let lines = self.render_field(chunks[1].width as usize, chunks[1].height as usize);
        frame.render_widget(Paragraph::new(lines), chunks[1]);

        if self.session.entities().is_empty() && self.session.state() == State::Running {
            let hint = Paragraph::new(vec![
                Line::from(Span::styled("Pop the bubbles!", Style::default().fg(Color::White).add_modifier(Modifier::BOLD))),
                Line::from(Span::styled("Click them to burst them and release your stress", Style::default().fg(Color::Gray))),
            ])
            .alignment(Alignment::Center);
            let y = chunks[1].y + chunks[1].height / 2;
            frame.render_widget(hint, Rect::new(chunks[1].x, y.saturating_sub(1), chunks[1].width, 2));
        }

        let help = match self.session.state() {
            State::Ended => Line::from(vec![
                Span::styled(" 🎉 Great job! ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
                Span::styled(format!(
                    "Final score {} from {} bubbles",
                    self.session.final_score().unwrap_or_default(),
                    self.popped
                ), Style::default().fg(Color::Gray)),
            ]),
            State::Paused => Line::from(Span::styled(
                " ⏸ PAUSED - Press P to resume ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
            _ => Line::from(vec![
                Span::styled(" Click Pop ", Style::default().fg(Color::DarkGray)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("P Pause ", Style::default().fg(Color::DarkGray)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("R Restart ", Style::default().fg(Color::DarkGray)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("Esc Menu", Style::default().fg(Color::DarkGray)),
            ]),
        };
        frame.render_widget(Paragraph::new(help), chunks[2]);
    }

    fn reset(&mut self) {
        self.session.reset();
        self.session.start();
        self.popped = 0;
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
