use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::engine::{Countdown, State};
use crate::games::field::{self, BACKGROUND};
use crate::games::Game;
use crate::sound::Cue;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Inhale,
    Hold,
    Exhale,
}

impl Phase {
    pub fn secs(&self) -> u32 {
        match self {
            Phase::Inhale => 4,
            Phase::Hold => 4,
            Phase::Exhale => 6,
        }
    }

    fn next(&self) -> Phase {
        match self {
            Phase::Inhale => Phase::Hold,
            Phase::Hold => Phase::Exhale,
            Phase::Exhale => Phase::Inhale,
        }
    }

    fn prompt(&self) -> &'static str {
        match self {
            Phase::Inhale => "Breathe in...",
            Phase::Hold => "Hold...",
            Phase::Exhale => "Breathe out...",
        }
    }

    fn color(&self) -> Color {
        match self {
            Phase::Inhale => Color::Rgb(96, 165, 250),
            Phase::Hold => Color::Rgb(192, 132, 252),
            Phase::Exhale => Color::Rgb(74, 222, 128),
        }
    }
}

/// Guided 4-4-6 breathing. A full run always scores 100.
pub struct Breathing {
    total_cycles: u32,
    completed: u32,
    phase: Phase,
    timer: Countdown,
    state: State,
    played: Duration,
    cues: Vec<Cue>,
}

impl Breathing {
    pub fn new(total_cycles: u32) -> Self {
        Self {
            total_cycles: total_cycles.max(1),
            completed: 0,
            phase: Phase::Inhale,
            timer: Countdown::new(Phase::Inhale.secs()),
            state: State::Idle,
            played: Duration::ZERO,
            cues: Vec::new(),
        }
    }

    fn score_for(&self, cycles: u32) -> u32 {
        let score = (cycles as f64 * 100.0 / self.total_cycles as f64).round() as u32;
        score.min(100)
    }

    fn toggle(&mut self) {
        self.state = match self.state {
            State::Idle | State::Paused => State::Running,
            State::Running => State::Paused,
            State::Ended => return,
        };
    }

    // Seconds into the current phase, including the partial second.
    fn phase_elapsed(&self) -> f32 {
        let whole = (self.timer.initial() - self.timer.remaining()) as f32;
        whole + (1.0 - self.timer.until_due().as_secs_f32())
    }

    /// How full the lungs are, 0.0 to 1.0.
    fn fullness(&self) -> f32 {
        let t = (self.phase_elapsed() / self.phase.secs() as f32).clamp(0.0, 1.0);
        match (self.state, self.phase) {
            (State::Idle, _) => 0.0,
            (State::Ended, _) => 0.0,
            (_, Phase::Inhale) => t,
            (_, Phase::Hold) => 1.0,
            (_, Phase::Exhale) => 1.0 - t,
        }
    }

    fn render_circle(&self, width: usize, height: usize) -> Vec<Line<'static>> {
        let mut grid = field::blank_grid(width, height, BACKGROUND);
        let cx = width as f32 / 2.0;
        let cy = height as f32 * field::UNITS_PER_ROW / 2.0;
        let max_radius = (width as f32 / 2.0).min(cy) * 0.9;
        let radius = max_radius * (0.3 + 0.7 * self.fullness());
        let style = Style::default().fg(self.phase.color()).bg(BACKGROUND);

        for (row, cells) in grid.iter_mut().enumerate() {
            for (col, cell) in cells.iter_mut().enumerate() {
                let dx = col as f32 + 0.5 - cx;
                let dy = (row as f32 + 0.5) * field::UNITS_PER_ROW - cy;
                let d = (dx * dx + dy * dy).sqrt();
                if d <= radius {
                    *cell = (if d > radius - 1.5 { '█' } else { '░' }, style);
                }
            }
        }
        field::grid_to_lines(grid)
    }
}

impl Game for Breathing {
    fn update(&mut self, dt: Duration) -> Option<u32> {
        let mut budget = dt;
        while self.state == State::Running && !budget.is_zero() {
            let step = self.timer.until_due().min(budget);
            budget -= step;
            self.played += step;
            self.timer.tick(step);
            if !self.timer.is_finished() {
                continue;
            }

            if self.phase == Phase::Exhale {
                self.completed += 1;
                if self.completed >= self.total_cycles {
                    self.state = State::Ended;
                    self.cues.push(Cue::Complete);
                    return Some(self.score_for(self.completed));
                }
            }
            self.phase = self.phase.next();
            self.timer.restart(self.phase.secs());
            self.cues.push(Cue::Breath);
        }
        None
    }

    fn handle_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(' ') | KeyCode::Enter => {
                if self.state == State::Ended {
                    self.reset();
                }
                self.toggle();
            }
            KeyCode::Char('p') | KeyCode::Char('P') => {
                if matches!(self.state, State::Running | State::Paused) {
                    self.toggle();
                }
            }
            KeyCode::Char('r') | KeyCode::Char('R') => self.reset(),
            _ => {}
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(120, 180, 255)))
            .title(" 🌬️ Breathing ")
            .title_style(Style::default().fg(Color::Rgb(170, 210, 255)).add_modifier(Modifier::BOLD));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(4),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(inner);

        let (headline, color) = match self.state {
            State::Idle => ("Find a comfortable position".to_string(), Color::White),
            State::Paused => ("Paused".to_string(), Color::Yellow),
            State::Ended => ("Well done. Notice how you feel.".to_string(), Color::Green),
            State::Running => (
                format!("{}  {}s", self.phase.prompt(), self.timer.remaining()),
                self.phase.color(),
            ),
        };
        let header = Paragraph::new(vec![
            Line::from(Span::styled(headline, Style::default().fg(color).add_modifier(Modifier::BOLD))),
            Line::from(Span::styled(
                format!("Cycle {} of {}", (self.completed + 1).min(self.total_cycles), self.total_cycles),
                Style::default().fg(Color::Gray),
            )),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(header, chunks[0]);

        let lines = self.render_circle(chunks[1].width as usize, chunks[1].height as usize);
        frame.render_widget(Paragraph::new(lines), chunks[1]);

        let ratio = self.completed as f64 / self.total_cycles as f64;
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(Color::Rgb(96, 165, 250)).bg(Color::Rgb(30, 30, 50)))
            .ratio(ratio.clamp(0.0, 1.0))
            .label(format!("{}/{} cycles", self.completed, self.total_cycles));
        frame.render_widget(gauge, chunks[2]);

        let help = Line::from(vec![
            Span::styled(" Space Start/Pause ", Style::default().fg(Color::DarkGray)),
            Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
            Span::styled("R Restart ", Style::default().fg(Color::DarkGray)),
            Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
            Span::styled("Esc Menu", Style::default().fg(Color::DarkGray)),
        ]);
        frame.render_widget(Paragraph::new(help), chunks[3]);
    }

    fn reset(&mut self) {
        self.completed = 0;
        self.phase = Phase::Inhale;
        self.timer.restart(Phase::Inhale.secs());
        self.state = State::Idle;
        self.played = Duration::ZERO;
        self.cues.clear();
    }

    fn get_score(&self) -> u32 {
        self.score_for(self.completed)
    }

    fn is_game_over(&self) -> bool {
        self.state == State::Ended
    }

    fn played_secs(&self) -> u32 {
        self.played.as_secs() as u32
    }

    fn drain_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};

    fn space() -> KeyEvent {
        KeyEvent {
            code: KeyCode::Char(' '),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn phases_follow_four_four_six() {
        let mut game = Breathing::new(8);
        game.handle_input(space());

        game.update(Duration::from_millis(3900));
        assert_eq!(game.phase, Phase::Inhale);
        game.update(Duration::from_millis(100));
        assert_eq!(game.phase, Phase::Hold);
        game.update(Duration::from_secs(4));
        assert_eq!(game.phase, Phase::Exhale);
        game.update(Duration::from_secs(6));
        assert_eq!(game.phase, Phase::Inhale);
        assert_eq!(game.completed, 1);
        assert_eq!(game.drain_cues(), vec![Cue::Breath; 3]);
    }

    #[test]
    fn eight_cycles_score_one_hundred_once() {
        let mut game = Breathing::new(8);
        game.handle_input(space());

        let mut reports = Vec::new();
        for _ in 0..(120 * 60) {
            if let Some(score) = game.update(Duration::from_millis(16)) {
                reports.push(score);
            }
        }
        assert_eq!(reports, vec![100]);
        assert!(game.is_game_over());
        assert_eq!(game.played_secs(), 112);
    }

    #[test]
    fn one_long_update_finishes_the_run() {
        let mut game = Breathing::new(2);
        game.handle_input(space());
        assert_eq!(game.update(Duration::from_secs(60)), Some(100));
        assert_eq!(game.played_secs(), 28);
        assert_eq!(game.update(Duration::from_secs(60)), None);
    }

    #[test]
    fn pausing_freezes_the_guide() {
        let mut game = Breathing::new(8);
        assert_eq!(game.update(Duration::from_secs(30)), None);
        assert_eq!(game.played_secs(), 0);

        game.handle_input(space());
        game.update(Duration::from_secs(2));
        game.handle_input(space());
        game.update(Duration::from_secs(30));
        assert_eq!(game.phase, Phase::Inhale);
        assert_eq!(game.played_secs(), 2);
    }

    #[test]
    fn partial_runs_score_proportionally() {
        let mut game = Breathing::new(8);
        game.handle_input(space());
        game.update(Duration::from_secs(14 * 4));
        assert_eq!(game.completed, 4);
        assert_eq!(game.get_score(), 50);

        game.reset();
        assert_eq!(game.get_score(), 0);
        assert!(!game.is_game_over());
    }
}
