use std::time::{Duration, Instant};

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use tracing::{info, warn};

use crate::coach;
use crate::config::Config;
use crate::engine::{Countdown, EngineError};
use crate::games::anger_smash::AngerSmash;
use crate::games::breathing::Breathing;
use crate::games::bubble_pop::BubblePop;
use crate::games::drawing::Drawing;
use crate::games::{Game, GameId};
use crate::mood::{Mood, MOODS};
use crate::share;
use crate::sound::Bell;
use crate::store::{achievement_title, SessionReport, SessionStore};

const NO_MOOD: &str = "unspecified";
const COACH_DELAY_SECS: u32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    Home,
    GameSelect,
    Playing,
    Complete,
    Progress,
}

impl View {
    /// Views reachable from the tab bar.
    pub fn tabs() -> &'static [View] {
        &[View::Home, View::GameSelect, View::Progress]
    }

    pub fn title(&self) -> &str {
        match self {
            View::Home => " Home ",
            View::GameSelect | View::Playing | View::Complete => " Games ",
            View::Progress => " Progress ",
        }
    }

    pub fn tab_index(&self) -> usize {
        match self {
            View::Home => 0,
            View::GameSelect | View::Playing | View::Complete => 1,
            View::Progress => 2,
        }
    }
}

/// What the last finished session looked like, for the completion screen.
#[derive(Clone, Debug)]
pub struct SessionResult {
    pub game: GameId,
    pub score: u32,
    pub duration_secs: u32,
    pub unlocked: Vec<String>,
}

pub struct App {
    pub should_quit: bool,
    pub view: View,
    pub mood_cursor: usize,
    pub mood: Option<&'static Mood>,
    pub selected_game: usize,
    pub playing: GameId,
    pub breathing: Breathing,
    pub bubble_pop: BubblePop,
    pub drawing: Drawing,
    pub anger_smash: AngerSmash,
    pub store: SessionStore,
    pub show_coach: bool,
    pub status: Option<String>,
    pub last_result: Option<SessionResult>,
    coach_delay: Option<Countdown>,
    bell: Bell,
    last_tick: Instant,
}

impl App {
    pub fn new(config: &Config, store: SessionStore) -> Result<Self, EngineError> {
        let drawings = store.dir().to_path_buf();
        Ok(Self {
            should_quit: false,
            view: View::Home,
            mood_cursor: 0,
            mood: None,
            selected_game: 0,
            playing: GameId::Breathing,
            breathing: Breathing::new(config.games.breathing_cycles),
            bubble_pop: BubblePop::new(config.games.bubble_pop_secs)?,
            drawing: Drawing::new(drawings),
            anger_smash: AngerSmash::new(config.games.anger_smash_secs)?,
            store,
            show_coach: false,
            status: None,
            last_result: None,
            coach_delay: None,
            bell: Bell::new(config.app.bell),
            last_tick: Instant::now(),
        })
    }

    pub fn game(&self) -> &dyn Game {
        match self.playing {
            GameId::Breathing => &self.breathing,
            GameId::BubblePop => &self.bubble_pop,
            GameId::Drawing => &self.drawing,
            GameId::AngerSmash => &self.anger_smash,
        }
    }

    pub fn game_mut(&mut self) -> &mut dyn Game {
        match self.playing {
            GameId::Breathing => &mut self.breathing,
            GameId::BubblePop => &mut self.bubble_pop,
            GameId::Drawing => &mut self.drawing,
            GameId::AngerSmash => &mut self.anger_smash,
        }
    }

    pub fn on_tick(&mut self) {
        let now = Instant::now();
        let dt = now.saturating_duration_since(self.last_tick);
        self.last_tick = now;

        if self.view == View::Complete {
            self.tick_coach(dt);
        } else {
            self.coach_delay = None;
        }
        if self.view != View::Playing {
            return;
        }
        let finished = self.game_mut().update(dt);
        self.ring();
        if let Some(score) = finished {
            self.complete_session(score);
        }
    }

    pub fn on_mouse(&mut self, event: MouseEvent) {
        if self.view != View::Playing {
            return;
        }
        // Catch the clock up first so input never lands past the deadline.
        self.on_tick();
        if self.view != View::Playing || self.game().is_game_over() {
            return;
        }
        self.game_mut().handle_mouse(event);
        self.ring();
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if self.show_coach {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('c')) {
                self.show_coach = false;
            }
            return;
        }

        if self.view == View::Playing {
            self.on_tick();
            if self.view != View::Playing {
                return;
            }
            if key.code == KeyCode::Esc {
                self.game_mut().reset();
                self.view = View::GameSelect;
            } else {
                self.game_mut().handle_input(key);
                self.ring();
            }
            return;
        }

        // Global keys outside of a running game
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') if self.view == View::Home => {
                self.should_quit = true;
                return;
            }
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    self.prev_tab();
                } else {
                    self.next_tab();
                }
                return;
            }
            KeyCode::BackTab => {
                self.prev_tab();
                return;
            }
            KeyCode::Char('p') | KeyCode::Char('P') => {
                self.view = View::Progress;
                return;
            }
            KeyCode::Esc if self.view != View::Home => {
                self.view = View::Home;
                return;
            }
            _ => {}
        }

        match self.view {
            View::Home => self.home_key(key),
            View::GameSelect => self.select_key(key),
            View::Complete => self.complete_key(key),
            View::Progress | View::Playing => {}
        }
    }

    fn home_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.mood_cursor = (self.mood_cursor + MOODS.len() - 1) % MOODS.len(),
            KeyCode::Down => self.mood_cursor = (self.mood_cursor + 1) % MOODS.len(),
            KeyCode::Enter => self.choose_mood(Some(self.mood_cursor)),
            KeyCode::Char('s') | KeyCode::Char('S') => self.choose_mood(None),
            KeyCode::Char(c) => {
                if let Some(index) = c.to_digit(10).map(|d| d as usize) {
                    if (1..=MOODS.len()).contains(&index) {
                        self.choose_mood(Some(index - 1));
                    }
                }
            }
            _ => {}
        }
    }

    fn choose_mood(&mut self, index: Option<usize>) {
        self.mood = index.and_then(|i| MOODS.get(i));
        if let Some(mood) = self.mood {
            info!(mood = mood.id, intensity = mood.intensity, "mood selected");
            if let Some(first) = mood.games.first() {
                self.selected_game = first.index();
            }
        }
        self.view = View::GameSelect;
    }

    fn select_key(&mut self, key: KeyEvent) {
        let count = GameId::all().len();
        match key.code {
            KeyCode::Right => self.selected_game = (self.selected_game + 1) % count,
            KeyCode::Left => self.selected_game = (self.selected_game + count - 1) % count,
            // Two rows of two tiles
            KeyCode::Up | KeyCode::Down => self.selected_game = (self.selected_game + 2) % count,
            KeyCode::Enter => self.start_game(GameId::all()[self.selected_game]),
            KeyCode::Char(c) => {
                if let Some(index) = c.to_digit(10).map(|d| d as usize) {
                    if (1..=count).contains(&index) {
                        self.selected_game = index - 1;
                        self.start_game(GameId::all()[index - 1]);
                    }
                }
            }
            _ => {}
        }
    }

    fn complete_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Char('r') | KeyCode::Char('R') => self.start_game(self.playing),
            KeyCode::Char('s') | KeyCode::Char('S') => self.share_result(),
            KeyCode::Char('c') | KeyCode::Char('C') => {
                self.coach_delay = None;
                self.show_coach = true;
            }
            KeyCode::Char('g') | KeyCode::Char('G') => self.view = View::GameSelect,
            KeyCode::Char('h') | KeyCode::Char('H') => self.view = View::Home,
            _ => {}
        }
    }

    pub fn start_game(&mut self, game: GameId) {
        self.playing = game;
        self.game_mut().reset();
        self.status = None;
        self.show_coach = false;
        self.coach_delay = None;
        self.last_tick = Instant::now();
        self.view = View::Playing;
        info!(game = game.id(), "game started");
    }

    /// Persist the finished session and move to the completion screen.
    fn complete_session(&mut self, score: u32) {
        let duration_secs = self.game_mut().played_secs();
        let report = SessionReport {
            mood: self.mood.map_or(NO_MOOD, |m| m.label).to_string(),
            game: self.playing.id().to_string(),
            duration_secs,
            score,
            timestamp: Utc::now(),
        };

        let unlocked = match self.store.record(report) {
            Ok(unlocked) => unlocked,
            Err(e) => {
                warn!(error = %e, "could not save session");
                self.status = Some("Couldn't save this session to disk".to_string());
                Vec::new()
            }
        };
        if let Some(first) = unlocked.first() {
            self.status = Some(format!("🏆 Achievement unlocked: {}", achievement_title(first)));
        }

        self.coach_delay = coach::should_check_in(self.mood, score)
            .then(|| Countdown::new(COACH_DELAY_SECS));
        self.last_result = Some(SessionResult {
            game: self.playing,
            score,
            duration_secs,
            unlocked,
        });
        self.view = View::Complete;
    }

    // The coach waits a moment so the result screen is seen first.
    fn tick_coach(&mut self, dt: Duration) {
        let Some(delay) = self.coach_delay.as_mut() else {
            return;
        };
        delay.tick(dt);
        if delay.is_finished() {
            self.coach_delay = None;
            self.show_coach = true;
        }
    }

    fn share_result(&mut self) {
        let Some(result) = &self.last_result else {
            return;
        };
        if let Some(path) = share::share(self.store.dir(), result.game.name(), result.score) {
            self.status = Some(format!("Share text saved to {}", path.display()));
        }
    }

    fn ring(&mut self) {
        for cue in self.game_mut().drain_cues() {
            self.bell.play(cue);
        }
    }

    fn next_tab(&mut self) {
        let tabs = View::tabs();
        let idx = self.view.tab_index();
        self.view = tabs[(idx + 1) % tabs.len()];
    }

    fn prev_tab(&mut self) {
        let tabs = View::tabs();
        let idx = self.view.tab_index();
        self.view = tabs[(idx + tabs.len() - 1) % tabs.len()];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{MouseButton, MouseEventKind};
    use pretty_assertions::assert_eq;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use crate::ui;

    fn press(app: &mut App, code: KeyCode) {
        app.on_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    // Pretend the last tick happened `by` ago.
    fn rewind(app: &mut App, by: Duration) {
        app.last_tick = Instant::now().checked_sub(by).unwrap();
    }

    fn app(dir: &std::path::Path) -> App {
        let mut config = Config::default();
        config.app.bell = false;
        let catalog: Vec<&str> = GameId::all().iter().map(|g| g.id()).collect();
        let store = SessionStore::open(dir, &catalog).unwrap();
        App::new(&config, store).unwrap()
    }

    #[test]
    fn mood_choice_preselects_a_recommended_game() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());

        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.view, View::GameSelect);
        assert_eq!(app.mood.map(|m| m.id), Some("angry"));
        assert_eq!(app.selected_game, GameId::AngerSmash.index());

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.view, View::Home);
    }

    #[test]
    fn finished_session_is_recorded_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        press(&mut app, KeyCode::Char('s'));
        app.start_game(GameId::Drawing);
        assert_eq!(app.view, View::Playing);

        press(&mut app, KeyCode::Enter);
        app.on_tick();
        app.on_tick();

        assert_eq!(app.view, View::Complete);
        assert_eq!(app.store.sessions().len(), 1);
        let record = &app.store.sessions()[0];
        assert_eq!(record.game, "draw-pad");
        assert_eq!(record.mood, NO_MOOD);
        assert_eq!(record.score, 0);
        assert!(app.store.progress().achievements.contains("first-session"));
        assert!(app.status.as_deref().is_some_and(|s| s.contains("unlocked")));
    }

    #[test]
    fn intense_mood_with_low_score_brings_up_the_coach() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        press(&mut app, KeyCode::Char('3'));
        app.start_game(GameId::Drawing);
        press(&mut app, KeyCode::Enter);
        app.on_tick();
        assert_eq!(app.view, View::Complete);
        assert!(!app.show_coach);

        app.on_tick();
        assert!(!app.show_coach);
        rewind(&mut app, Duration::from_secs(2));
        app.on_tick();
        assert!(app.show_coach);

        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.view, View::Complete);
        press(&mut app, KeyCode::Esc);
        assert!(!app.show_coach);

        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.view, View::Playing);
        assert!(!app.drawing.is_game_over());
    }

    #[test]
    fn coach_is_dropped_when_leaving_the_result_screen() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        press(&mut app, KeyCode::Char('3'));
        app.start_game(GameId::Drawing);
        press(&mut app, KeyCode::Enter);
        app.on_tick();

        press(&mut app, KeyCode::Char('g'));
        rewind(&mut app, Duration::from_secs(3));
        app.on_tick();
        assert!(!app.show_coach);
        assert_eq!(app.view, View::GameSelect);
    }

    #[test]
    fn late_click_after_the_deadline_does_not_score() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        app.start_game(GameId::BubblePop);
        terminal.draw(|frame| ui::render(frame, &mut app)).unwrap();

        app.bubble_pop.update(Duration::from_millis(59_900));
        let buffer = terminal.draw(|frame| ui::render(frame, &mut app)).unwrap().buffer.clone();
        let (column, row) = (0..buffer.area.height)
            .flat_map(|y| (0..buffer.area.width).map(move |x| (x, y)))
            .find(|&(x, y)| buffer[(x, y)].symbol() == "◦")
            .unwrap();

        // The wall clock has run past the end but no tick has arrived yet.
        rewind(&mut app, Duration::from_secs(5));
        app.on_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        });

        assert_eq!(app.view, View::Complete);
        assert_eq!(app.store.sessions().len(), 1);
        assert_eq!(app.store.sessions()[0].score, 0);
        assert_eq!(app.store.sessions()[0].duration_secs, 60);
    }

    #[test]
    fn keys_in_a_game_catch_up_the_clock_first() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        app.start_game(GameId::BubblePop);
        app.bubble_pop.update(Duration::from_millis(59_500));

        rewind(&mut app, Duration::from_secs(1));
        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.view, View::Complete);
        assert_eq!(app.store.sessions().len(), 1);
    }

    #[test]
    fn escape_abandons_a_game_without_recording() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        app.start_game(GameId::AngerSmash);
        press(&mut app, KeyCode::Char(' '));
        app.on_tick();
        press(&mut app, KeyCode::Esc);

        assert_eq!(app.view, View::GameSelect);
        assert!(app.store.sessions().is_empty());
        assert!(!app.anger_smash.is_game_over());
    }

    #[test]
    fn sharing_writes_into_the_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        app.start_game(GameId::Drawing);
        press(&mut app, KeyCode::Enter);
        app.on_tick();
        press(&mut app, KeyCode::Char('s'));

        assert!(dir.path().join("share.txt").exists());
        assert!(app.status.is_some());
    }

    #[test]
    fn tabs_cycle_through_top_level_views() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.view, View::GameSelect);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.view, View::Progress);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.view, View::GameSelect);
        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.view, View::Progress);
    }
}
