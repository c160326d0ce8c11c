use std::time::Duration;

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use super::entity::{Entity, EntityId, EntityKind, Vec2};
use super::EngineError;

/// Where new entities appear.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpawnEdge {
    /// Anywhere inside the field, fully visible.
    Anywhere,
    /// Centred on the bottom edge, at a random column.
    Bottom,
}

/// How live entities move on each motion tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Motion {
    Still,
    /// Float upwards at a random speed in units per second.
    Rise { min_speed: f32, max_speed: f32 },
}

pub struct Spawner<K> {
    kinds: Vec<K>,
    weights: WeightedIndex<u32>,
    cap: usize,
    size_range: (f32, f32),
    edge: SpawnEdge,
    motion: Motion,
    next_id: u64,
}

impl<K: EntityKind> Spawner<K> {
    pub fn new(
        categories: &[(K, u32)],
        cap: usize,
        size_range: (f32, f32),
        edge: SpawnEdge,
        motion: Motion,
    ) -> Result<Self, EngineError> {
        if categories.is_empty() {
            return Err(EngineError::NoCategories);
        }
        let weights = WeightedIndex::new(categories.iter().map(|(_, w)| *w))
            .map_err(|_| EngineError::InvalidWeights)?;
        Ok(Self {
            kinds: categories.iter().map(|(k, _)| *k).collect(),
            weights,
            cap,
            size_range,
            edge,
            motion,
            next_id: 1,
        })
    }

    /// Allocate the next id. Ids keep increasing across resets so a stale
    /// pointer event can never match an entity of a later run.
    pub fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Create one entity unless `live` already reached the cap.
    pub fn spawn<R: Rng + ?Sized>(
        &mut self,
        live: usize,
        field: Vec2,
        rng: &mut R,
    ) -> Option<Entity<K>> {
        if live >= self.cap {
            return None;
        }

        let kind = self.kinds[self.weights.sample(rng)];
        let (min, max) = self.size_range;
        let size = if max > min { rng.gen_range(min..=max) } else { min };
        let half = size / 2.0;

        let x = random_between(rng, half, field.x - half);
        let y = match self.edge {
            SpawnEdge::Anywhere => random_between(rng, half, field.y - half),
            SpawnEdge::Bottom => field.y,
        };

        let velocity = match self.motion {
            Motion::Still => Vec2::ZERO,
            Motion::Rise {
                min_speed,
                max_speed,
            } => {
                let speed = if max_speed > min_speed {
                    rng.gen_range(min_speed..=max_speed)
                } else {
                    min_speed
                };
                Vec2::new(0.0, -speed)
            }
        };

        Some(Entity {
            id: self.allocate_id(),
            position: Vec2::new(x, y),
            kind,
            size,
            points: kind.points(),
            velocity,
            age: Duration::ZERO,
        })
    }
}

// Small fields collapse the range to its midpoint instead of panicking.
fn random_between<R: Rng + ?Sized>(rng: &mut R, low: f32, high: f32) -> f32 {
    if high > low {
        rng.gen_range(low..high)
    } else {
        (low + high) / 2.0
    }
}
