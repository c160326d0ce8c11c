use std::fmt;
use std::ops::{Add, Mul};
use std::time::Duration;

/// Category of an entity. Each game defines a small enum and maps every
/// variant to the points it is worth.
pub trait EntityKind: Copy + PartialEq + fmt::Debug {
    fn points(&self) -> u32;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Point or extent in field units. The field is square-unit: games decide how
/// units map onto terminal cells.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// A transient object living inside one running session.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity<K> {
    pub id: EntityId,
    /// Centre of the entity.
    pub position: Vec2,
    pub kind: K,
    /// Edge length of the square bounding box.
    pub size: f32,
    pub points: u32,
    /// Units per second.
    pub velocity: Vec2,
    pub age: Duration,
}

impl<K> Entity<K> {
    pub fn contains(&self, point: Vec2) -> bool {
        let half = self.size / 2.0;
        (point.x - self.position.x).abs() <= half && (point.y - self.position.y).abs() <= half
    }

    /// True while any part of the bounding box overlaps a field of `bounds`.
    pub fn overlaps_field(&self, bounds: Vec2) -> bool {
        let half = self.size / 2.0;
        self.position.x + half > 0.0
            && self.position.x - half < bounds.x
            && self.position.y + half > 0.0
            && self.position.y - half < bounds.y
    }

    /// Fraction of the lifetime still left, 1.0 for entities that never expire.
    pub fn vitality(&self, lifetime: Option<Duration>) -> f32 {
        match lifetime {
            Some(total) if !total.is_zero() => {
                1.0 - (self.age.as_secs_f32() / total.as_secs_f32()).clamp(0.0, 1.0)
            }
            _ => 1.0,
        }
    }
}
