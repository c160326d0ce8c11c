//! Reusable engine behind the entity mini-games.
//!
//! A [`Session`] owns everything one play-through needs: the countdown, the
//! motion and spawn timers, the live entities and the score. Games only pick
//! a [`SessionConfig`] and a [`scoring::ScoringPolicy`], feed elapsed time into
//! [`Session::advance`] and forward pointer hits to [`Session::interact`].

pub mod entity;
pub mod scoring;
pub mod session;
pub mod spawner;
pub mod timer;

use thiserror::Error;

pub use entity::{Entity, EntityKind, Vec2};
pub use scoring::{ComboBonus, FlatPoints};
pub use session::{Hit, Session, SessionConfig, State};
pub use spawner::{Motion, SpawnEdge};
pub use timer::Countdown;

#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("session length must be at least one second")]
    ZeroLength,
    #[error("{timer} period must be non-zero")]
    ZeroPeriod { timer: &'static str },
    #[error("at least one entity category is required")]
    NoCategories,
    #[error("category weights must contain a positive value")]
    InvalidWeights,
    #[error("invalid entity size range {min}..={max}")]
    InvalidSize { min: f32, max: f32 },
}
