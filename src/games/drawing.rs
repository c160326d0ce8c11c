use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::prelude::*;
use ratatui::widgets::*;
use tracing::{debug, info};

use crate::games::field;
use crate::games::Game;
use crate::sound::Cue;

const CANVAS_BG: Color = Color::Rgb(245, 240, 230);
/// Five minutes of drawing earns the full score.
const FULL_SCORE_SECS: f64 = 300.0;
const MAX_BRUSH: u16 = 3;
const SAVE_FILE: &str = "my-mindful-drawing.txt";

pub const PALETTE: [Color; 12] = [
    Color::Rgb(20, 20, 20),
    Color::Rgb(239, 68, 68),
    Color::Rgb(249, 115, 22),
    Color::Rgb(234, 179, 8),
    Color::Rgb(34, 197, 94),
    Color::Rgb(20, 184, 166),
    Color::Rgb(59, 130, 246),
    Color::Rgb(99, 102, 241),
    Color::Rgb(168, 85, 247),
    Color::Rgb(236, 72, 153),
    Color::Rgb(120, 80, 50),
    Color::Rgb(150, 150, 150),
];

pub fn score_for(elapsed: Duration) -> u32 {
    let score = (elapsed.as_secs_f64() / FULL_SCORE_SECS * 100.0).round() as u32;
    score.min(100)
}

/// Free-form painting. There is no clock: the session ends when the user
/// says it does.
pub struct Drawing {
    canvas: Vec<Vec<Option<Color>>>,
    canvas_area: Rect,
    color: usize,
    brush: u16,
    eraser: bool,
    last_cell: Option<(i32, i32)>,
    elapsed: Duration,
    finish_requested: bool,
    finished: bool,
    strokes: u32,
    save_dir: PathBuf,
    saved: Option<PathBuf>,
    cues: Vec<Cue>,
}

impl Drawing {
    /// `save_dir` is where `S` writes the picture.
    pub fn new(save_dir: PathBuf) -> Self {
        Self {
            canvas: Vec::new(),
            canvas_area: Rect::default(),
            color: 0,
            brush: 1,
            eraser: false,
            last_cell: None,
            elapsed: Duration::ZERO,
            finish_requested: false,
            finished: false,
            strokes: 0,
            save_dir,
            saved: None,
            cues: Vec::new(),
        }
    }

    pub fn painted_cells(&self) -> usize {
        self.canvas.iter().flatten().filter(|c| c.is_some()).count()
    }

    fn resize(&mut self, width: u16, height: u16) {
        let (w, h) = (width as usize, height as usize);
        self.canvas.resize_with(h, Vec::new);
        for row in &mut self.canvas {
            row.resize(w, None);
        }
    }

    fn clear(&mut self) {
        for row in &mut self.canvas {
            row.fill(None);
        }
        self.last_cell = None;
    }

    fn dab(&mut self, x: i32, y: i32) {
        let paint = if self.eraser {
            None
        } else {
            Some(PALETTE[self.color])
        };
        let reach = self.brush as i32 - 1;
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                let (cx, cy) = (x + dx, y + dy);
                if cy < 0 || cx < 0 {
                    continue;
                }
                if let Some(cell) = self
                    .canvas
                    .get_mut(cy as usize)
                    .and_then(|row| row.get_mut(cx as usize))
                {
                    *cell = paint;
                }
            }
        }
    }

    /// The canvas as ANSI art, one line per row, readable with `cat`.
    fn to_ansi(&self) -> String {
        let mut out = String::new();
        for row in &self.canvas {
            for cell in row {
                match cell {
                    Some(Color::Rgb(r, g, b)) => out.push_str(&format!("\x1b[38;2;{r};{g};{b}m█")),
                    Some(_) => out.push('█'),
                    None => out.push_str("\x1b[0m "),
                }
            }
            out.push_str("\x1b[0m\n");
        }
        out
    }

    // Best effort, like sharing: a failed write is logged and forgotten.
    fn save(&mut self) {
        let path = self.save_dir.join(SAVE_FILE);
        match fs::write(&path, self.to_ansi()) {
            Ok(()) => {
                info!(path = %path.display(), cells = self.painted_cells(), "drawing saved");
                self.saved = Some(path);
            }
            Err(e) => debug!(path = %path.display(), error = %e, "saving drawing failed"),
        }
    }

    fn stroke_to(&mut self, column: u16, row: u16) {
        let area = self.canvas_area;
        let inside = column >= area.x
            && column < area.x + area.width
            && row >= area.y
            && row < area.y + area.height;
        if !inside || self.finished {
            self.last_cell = None;
            return;
        }
        let cell = ((column - area.x) as i32, (row - area.y) as i32);
        let from = self.last_cell.unwrap_or(cell);
        for (x, y) in field::line_cells(from.0, from.1, cell.0, cell.1) {
            self.dab(x, y);
        }
        self.last_cell = Some(cell);
    }
}

impl Game for Drawing {
    fn update(&mut self, dt: Duration) -> Option<u32> {
        if self.finished {
            return None;
        }
        if self.finish_requested {
            self.finished = true;
            self.cues.push(Cue::Complete);
            return Some(score_for(self.elapsed));
        }
        self.elapsed += dt;
        None
    }

    fn handle_input(&mut self, key: KeyEvent) {
        if let KeyCode::Char('s') | KeyCode::Char('S') = key.code {
            self.save();
            return;
        }
        if self.finished {
            if let KeyCode::Char('r') | KeyCode::Char('R') = key.code {
                self.reset();
            }
            return;
        }
        match key.code {
            KeyCode::Enter => self.finish_requested = true,
            KeyCode::Left | KeyCode::Char('h') => {
                self.color = (self.color + PALETTE.len() - 1) % PALETTE.len();
                self.eraser = false;
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.color = (self.color + 1) % PALETTE.len();
                self.eraser = false;
            }
            KeyCode::Up | KeyCode::Char('+') => self.brush = (self.brush + 1).min(MAX_BRUSH),
            KeyCode::Down | KeyCode::Char('-') => self.brush = self.brush.saturating_sub(1).max(1),
            KeyCode::Char('e') | KeyCode::Char('E') => self.eraser = !self.eraser,
            KeyCode::Char('c') | KeyCode::Char('C') => self.clear(),
            KeyCode::Char('r') | KeyCode::Char('R') => self.reset(),
            KeyCode::Char(c) if c.is_ascii_digit() => {
                let index = c.to_digit(10).map_or(0, |d| d as usize);
                let index = if index == 0 { 9 } else { index - 1 };
                self.color = index;
                self.eraser = false;
            }
            _ => {}
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent) {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.last_cell = None;
                self.strokes += 1;
                self.stroke_to(event.column, event.row);
            }
            MouseEventKind::Drag(MouseButton::Left) => self.stroke_to(event.column, event.row),
            MouseEventKind::Up(_) => self.last_cell = None,
            _ => {}
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(236, 72, 153)))
            .title(" 🎨 Drawing Pad ")
            .title_style(Style::default().fg(Color::Rgb(255, 150, 200)).add_modifier(Modifier::BOLD));

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

        let mut palette = vec![Span::styled(" ", Style::default())];
        for (i, color) in PALETTE.iter().enumerate() {
            let marker = if i == self.color && !self.eraser { "[██]" } else { " ██ " };
            palette.push(Span::styled(marker, Style::default().fg(*color)));
        }
        palette.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
        palette.push(Span::styled(
            format!("Brush {} ", self.brush),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ));
        if self.eraser {
            palette.push(Span::styled(
                "Eraser ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ));
        }
        palette.push(Span::styled(
            format!(
                "│ {}:{:02} │ {} strokes ",
                self.elapsed.as_secs() / 60,
                self.elapsed.as_secs() % 60,
                self.strokes
            ),
            Style::default().fg(Color::Cyan),
        ));
        if let Some(path) = &self.saved {
            palette.push(Span::styled(
                format!("│ 💾 {} ", path.display()),
                Style::default().fg(Color::Green),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(palette)), chunks[0]);

        self.canvas_area = chunks[1];
        self.resize(chunks[1].width, chunks[1].height);
        let lines: Vec<Line> = self
            .canvas
            .iter()
            .map(|row| {
                let spans: Vec<Span> = row
                    .iter()
                    .map(|cell| match cell {
                        Some(color) => Span::styled("█", Style::default().fg(*color).bg(CANVAS_BG)),
                        None => Span::styled(" ", Style::default().bg(CANVAS_BG)),
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), chunks[1]);

        let help = if self.finished {
            Line::from(vec![
                Span::styled(" 🖼️ Beautiful! ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
                Span::styled("S to save it, R to start a new drawing", Style::default().fg(Color::Gray)),
            ])
        } else {
            Line::from(vec![
                Span::styled(" Drag Paint ", Style::default().fg(Color::DarkGray)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("←→ Colour ", Style::default().fg(Color::DarkGray)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("↑↓ Brush ", Style::default().fg(Color::DarkGray)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("E Eraser ", Style::default().fg(Color::DarkGray)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("C Clear ", Style::default().fg(Color::DarkGray)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("S Save ", Style::default().fg(Color::DarkGray)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("Enter Done ", Style::default().fg(Color::DarkGray)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("Esc Menu", Style::default().fg(Color::DarkGray)),
            ])
        };
        frame.render_widget(Paragraph::new(help), chunks[2]);
    }

    fn reset(&mut self) {
        self.clear();
        self.color = 0;
        self.brush = 1;
        self.eraser = false;
        self.elapsed = Duration::ZERO;
        self.finish_requested = false;
        self.finished = false;
        self.strokes = 0;
        self.saved = None;
        self.cues.clear();
    }

    fn get_score(&self) -> u32 {
        score_for(self.elapsed)
    }

    fn is_game_over(&self) -> bool {
        self.finished
    }

    fn played_secs(&self) -> u32 {
        self.elapsed.as_secs() as u32
    }

    fn drain_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn pad() -> Drawing {
        let mut pad = Drawing::new(std::env::temp_dir());
        pad.canvas_area = Rect::new(2, 2, 30, 10);
        pad.resize(30, 10);
        pad
    }

    #[test]
    fn score_grows_with_time_and_caps() {
        assert_eq!(score_for(Duration::ZERO), 0);
        assert_eq!(score_for(Duration::from_secs(150)), 50);
        assert_eq!(score_for(Duration::from_secs(299)), 100);
        assert_eq!(score_for(Duration::from_secs(900)), 100);
    }

    #[test]
    fn dragging_paints_a_continuous_line() {
        let mut pad = pad();
        pad.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 2, 2));
        pad.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 12, 2));
        pad.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 12, 2));
        assert_eq!(pad.painted_cells(), 11);
        assert_eq!(pad.canvas[0][5], Some(PALETTE[0]));

        pad.handle_input(key(KeyCode::Char('e')));
        pad.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 7, 2));
        assert_eq!(pad.painted_cells(), 10);

        pad.handle_input(key(KeyCode::Char('c')));
        assert_eq!(pad.painted_cells(), 0);
    }

    #[test]
    fn brush_size_is_clamped() {
        let mut pad = pad();
        for _ in 0..5 {
            pad.handle_input(key(KeyCode::Up));
        }
        assert_eq!(pad.brush, 3);
        pad.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 10, 6));
        assert_eq!(pad.painted_cells(), 25);

        for _ in 0..5 {
            pad.handle_input(key(KeyCode::Down));
        }
        assert_eq!(pad.brush, 1);
    }

    #[test]
    fn strokes_outside_the_canvas_are_dropped() {
        let mut pad = pad();
        pad.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 0, 0));
        pad.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 50, 40));
        assert_eq!(pad.painted_cells(), 0);
    }

    #[test]
    fn save_writes_the_canvas_as_ansi_art() {
        let dir = tempfile::tempdir().unwrap();
        let mut pad = pad();
        pad.save_dir = dir.path().to_path_buf();
        pad.handle_input(key(KeyCode::Char('2')));
        pad.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 2, 2));
        pad.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 4, 2));

        pad.handle_input(key(KeyCode::Char('s')));
        let path = dir.path().join(SAVE_FILE);
        assert_eq!(pad.saved.as_deref(), Some(path.as_path()));
        let art = fs::read_to_string(&path).unwrap();
        assert_eq!(art.lines().count(), 10);
        assert_eq!(art.matches("\x1b[38;2;239;68;68m█").count(), 3);

        pad.handle_input(key(KeyCode::Char('r')));
        assert_eq!(pad.saved, None);
    }

    #[test]
    fn saving_into_a_missing_directory_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let mut pad = pad();
        pad.save_dir = dir.path().join("gone");
        pad.handle_input(key(KeyCode::Char('S')));
        assert_eq!(pad.saved, None);
        assert!(!pad.is_game_over());
    }

    #[test]
    fn enter_finishes_with_a_single_report() {
        let mut pad = pad();
        pad.update(Duration::from_secs(60));
        assert_eq!(pad.update(Duration::from_secs(30)), None);

        pad.handle_input(key(KeyCode::Enter));
        assert_eq!(pad.update(Duration::from_secs(5)), Some(30));
        assert_eq!(pad.drain_cues(), vec![Cue::Complete]);
        assert_eq!(pad.update(Duration::from_secs(5)), None);
        assert!(pad.is_game_over());
        assert_eq!(pad.played_secs(), 90);

        pad.handle_input(key(KeyCode::Char('r')));
        assert!(!pad.is_game_over());
        assert_eq!(pad.get_score(), 0);
    }
}
