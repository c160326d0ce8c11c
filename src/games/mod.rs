pub mod anger_smash;
pub mod breathing;
pub mod bubble_pop;
pub mod drawing;
pub mod field;

use std::time::Duration;

use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::prelude::*;

use crate::sound::Cue;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameId {
    Breathing,
    BubblePop,
    Drawing,
    AngerSmash,
}

impl GameId {
    pub fn all() -> &'static [GameId] {
        &[
            GameId::Breathing,
            GameId::BubblePop,
            GameId::Drawing,
            GameId::AngerSmash,
        ]
    }

    /// Stable identifier stored with every session.
    pub fn id(&self) -> &'static str {
        match self {
            GameId::Breathing => "breathing",
            GameId::BubblePop => "bubble-pop",
            GameId::Drawing => "draw-pad",
            GameId::AngerSmash => "anger-smash",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GameId::Breathing => "Breathing",
            GameId::BubblePop => "Bubble Pop",
            GameId::Drawing => "Drawing Pad",
            GameId::AngerSmash => "Anger Smash",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            GameId::Breathing => 0,
            GameId::BubblePop => 1,
            GameId::Drawing => 2,
            GameId::AngerSmash => 3,
        }
    }

    pub fn from_id(id: &str) -> Option<GameId> {
        GameId::all().iter().copied().find(|g| g.id() == id)
    }
}

pub trait Game {
    /// Advance by `dt`. Returns the final score on the update that finishes
    /// the session, and only then.
    fn update(&mut self, dt: Duration) -> Option<u32>;
    fn handle_input(&mut self, key: KeyEvent);
    fn handle_mouse(&mut self, _event: MouseEvent) {}
    fn render(&mut self, frame: &mut Frame, area: Rect);
    fn reset(&mut self);
    fn get_score(&self) -> u32;
    fn is_game_over(&self) -> bool;
    fn played_secs(&self) -> u32;
    /// Feedback cues raised since the last call.
    fn drain_cues(&mut self) -> Vec<Cue> {
        Vec::new()
    }
}
