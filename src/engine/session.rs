use std::time::Duration;

use rand::Rng;
use tracing::{debug, info};

use super::entity::{Entity, EntityId, EntityKind, Vec2};
use super::scoring::{Combo, ScoringPolicy};
use super::spawner::{Motion, SpawnEdge, Spawner};
use super::timer::{Countdown, Interval};
use super::EngineError;

const DEFAULT_FIELD: Vec2 = Vec2 { x: 80.0, y: 48.0 };

/// Parameters of one game variant.
#[derive(Clone, Debug)]
pub struct SessionConfig<K> {
    pub session_secs: u32,
    pub spawn_period: Duration,
    pub motion_period: Duration,
    /// Maximum number of live entities.
    pub cap: usize,
    /// Kinds with their relative spawn weights.
    pub categories: Vec<(K, u32)>,
    pub size_range: (f32, f32),
    pub spawn_edge: SpawnEdge,
    pub motion: Motion,
    /// Entities older than this fade out and are removed.
    pub lifetime: Option<Duration>,
    pub combo_window: Duration,
}

impl<K> SessionConfig<K> {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.session_secs == 0 {
            return Err(EngineError::ZeroLength);
        }
        if self.spawn_period.is_zero() {
            return Err(EngineError::ZeroPeriod { timer: "spawn" });
        }
        if self.motion_period.is_zero() {
            return Err(EngineError::ZeroPeriod { timer: "motion" });
        }
        if self.combo_window.is_zero() {
            return Err(EngineError::ZeroPeriod { timer: "combo" });
        }
        let (min, max) = self.size_range;
        if min <= 0.0 || max < min {
            return Err(EngineError::InvalidSize { min, max });
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Idle,
    Running,
    Paused,
    Ended,
}

/// Final report of a run, produced exactly once per start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Completion {
    pub final_score: u32,
    pub played: Duration,
}

/// Outcome of a successful interaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hit<K> {
    pub id: EntityId,
    pub kind: K,
    pub awarded: u32,
    /// Streak length after this hit.
    pub combo: u32,
}

// The timers of a run. They only exist inside `Phase::Running`, so leaving
// that phase on any path drops them.
#[derive(Debug)]
struct Clock {
    countdown: Countdown,
    motion: Interval,
    spawn: Interval,
}

#[derive(Clone, Copy, Default)]
struct Fired {
    countdown: bool,
    motion: bool,
    spawn: bool,
}

impl Clock {
    fn new<K>(config: &SessionConfig<K>) -> Self {
        Self {
            countdown: Countdown::new(config.session_secs),
            motion: Interval::new(config.motion_period),
            spawn: Interval::new(config.spawn_period),
        }
    }

    fn next_due(&self) -> Duration {
        self.countdown
            .until_due()
            .min(self.motion.until_due())
            .min(self.spawn.until_due())
    }

    fn elapse(&mut self, dt: Duration) -> Fired {
        Fired {
            countdown: self.countdown.tick(dt) > 0,
            motion: self.motion.tick(dt) > 0,
            spawn: self.spawn.tick(dt) > 0,
        }
    }
}

#[derive(Debug)]
enum Phase {
    Idle,
    Running { clock: Clock, paused: bool },
    Ended { final_score: u32 },
}

/// Tick-driven ephemeral-entity session: spawns entities, moves and expires
/// them, scores interactions and ends when the countdown runs out.
pub struct Session<K, S> {
    config: SessionConfig<K>,
    scoring: S,
    spawner: Spawner<K>,
    phase: Phase,
    entities: Vec<Entity<K>>,
    score: u32,
    combo: Combo,
    field: Vec2,
    played: Duration,
}

impl<K: EntityKind, S: ScoringPolicy> Session<K, S> {
    pub fn new(config: SessionConfig<K>, scoring: S) -> Result<Self, EngineError> {
        config.validate()?;
        let spawner = Spawner::new(
            &config.categories,
            config.cap,
            config.size_range,
            config.spawn_edge,
            config.motion,
        )?;
        let combo = Combo::new(config.combo_window);
        Ok(Self {
            config,
            scoring,
            spawner,
            phase: Phase::Idle,
            entities: Vec::new(),
            score: 0,
            combo,
            field: DEFAULT_FIELD,
            played: Duration::ZERO,
        })
    }

    pub fn config(&self) -> &SessionConfig<K> {
        &self.config
    }

    pub fn state(&self) -> State {
        match self.phase {
            Phase::Idle => State::Idle,
            Phase::Running { paused: false, .. } => State::Running,
            Phase::Running { paused: true, .. } => State::Paused,
            Phase::Ended { .. } => State::Ended,
        }
    }

    pub fn is_ended(&self) -> bool {
        matches!(self.phase, Phase::Ended { .. })
    }

    pub fn final_score(&self) -> Option<u32> {
        match self.phase {
            Phase::Ended { final_score } => Some(final_score),
            _ => None,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn combo(&self) -> u32 {
        self.combo.count()
    }

    pub fn played(&self) -> Duration {
        self.played
    }

    pub fn remaining_secs(&self) -> u32 {
        match &self.phase {
            Phase::Idle => self.config.session_secs,
            Phase::Running { clock, .. } => clock.countdown.remaining(),
            Phase::Ended { .. } => 0,
        }
    }

    pub fn entities(&self) -> &[Entity<K>] {
        &self.entities
    }

    /// Resize the playing field, usually from the game's render pass.
    pub fn set_field(&mut self, field: Vec2) {
        self.field = field;
    }

    /// `Idle -> Running`. Any other state is left untouched.
    pub fn start(&mut self) -> bool {
        if !matches!(self.phase, Phase::Idle) {
            return false;
        }
        debug!(secs = self.config.session_secs, "session started");
        self.phase = Phase::Running {
            clock: Clock::new(&self.config),
            paused: false,
        };
        true
    }

    pub fn toggle_pause(&mut self) {
        if let Phase::Running { paused, .. } = &mut self.phase {
            *paused = !*paused;
            debug!(paused = *paused, "session pause toggled");
        }
    }

    /// Back to `Idle` from any state: no entities, zero score, full timer.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.entities.clear();
        self.score = 0;
        self.combo.clear();
        self.played = Duration::ZERO;
        debug!("session reset");
    }

    /// Feed `dt` of wall-clock time to the running timers.
    ///
    /// Fires are processed in scheduled order, so a long `dt` behaves like the
    /// equivalent sequence of short ones. Returns the completion report on the
    /// call that drains the countdown and never again for this run.
    pub fn advance<R: Rng + ?Sized>(&mut self, dt: Duration, rng: &mut R) -> Option<Completion> {
        let mut budget = dt;
        loop {
            let (step, fired) = match &mut self.phase {
                Phase::Running {
                    clock,
                    paused: false,
                } => {
                    let mut step = clock.next_due().min(budget);
                    if let Some(expiry) = self.combo.until_expiry() {
                        step = step.min(expiry);
                    }
                    (step, clock.elapse(step))
                }
                _ => return None,
            };

            budget -= step;
            self.played += step;
            self.combo.elapse(step);

            if fired.countdown && self.remaining_secs() == 0 {
                return Some(self.finish());
            }
            if fired.motion {
                self.step_motion(self.config.motion_period);
            }
            if fired.spawn {
                self.spawn(rng);
            }
            if budget.is_zero() {
                return None;
            }
        }
    }

    /// Topmost live entity under `point`.
    pub fn hit_test(&self, point: Vec2) -> Option<EntityId> {
        self.entities
            .iter()
            .rev()
            .find(|e| e.contains(point))
            .map(|e| e.id)
    }

    /// Remove a live entity and score it. Missing entities, and sessions that
    /// are not actively running, make this a no-op.
    pub fn interact(&mut self, id: EntityId) -> Option<Hit<K>> {
        if self.state() != State::Running {
            return None;
        }
        let index = self.entities.iter().position(|e| e.id == id)?;
        let entity = self.entities.remove(index);

        let awarded = self.scoring.award(entity.points, self.combo.count());
        self.score = self.score.saturating_add(awarded);
        self.combo.hit();
        debug!(%id, awarded, combo = self.combo.count(), "entity hit");

        Some(Hit {
            id,
            kind: entity.kind,
            awarded,
            combo: self.combo.count(),
        })
    }

    fn finish(&mut self) -> Completion {
        let final_score = self.score;
        self.combo.clear();
        self.phase = Phase::Ended { final_score };
        info!(final_score, played_ms = self.played.as_millis() as u64, "session ended");
        Completion {
            final_score,
            played: self.played,
        }
    }

    fn step_motion(&mut self, dt: Duration) {
        let secs = dt.as_secs_f32();
        let field = self.field;
        let lifetime = self.config.lifetime;
        self.entities.retain_mut(|e| {
            e.position = e.position + e.velocity * secs;
            e.age += dt;
            let expired = lifetime.is_some_and(|l| e.age >= l);
            !expired && e.overlaps_field(field)
        });
    }

    fn spawn<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if let Some(entity) = self.spawner.spawn(self.entities.len(), self.field, rng) {
            self.entities.push(entity);
        }
    }
}

#[cfg(test)]
impl<K: EntityKind, S: ScoringPolicy> Session<K, S> {
    fn place(&mut self, kind: K, position: Vec2) -> EntityId {
        let id = self.spawner.allocate_id();
        self.entities.push(Entity {
            id,
            position,
            kind,
            size: 4.0,
            points: kind.points(),
            velocity: Vec2::ZERO,
            age: Duration::ZERO,
        });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scoring::{ComboBonus, FlatPoints};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[derive(Clone, Copy, Debug, PartialEq)]
    enum Item {
        Box,
        Plate,
    }

    impl EntityKind for Item {
        fn points(&self) -> u32 {
            match self {
                Item::Box => 10,
                Item::Plate => 15,
            }
        }
    }

    fn smash_config() -> SessionConfig<Item> {
        SessionConfig {
            session_secs: 90,
            spawn_period: Duration::from_millis(1500),
            motion_period: Duration::from_millis(16),
            cap: 8,
            categories: vec![(Item::Box, 1), (Item::Plate, 1)],
            size_range: (3.0, 5.0),
            spawn_edge: SpawnEdge::Anywhere,
            motion: Motion::Still,
            lifetime: None,
            combo_window: Duration::from_secs(2),
        }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn combo_scenario_scores_27() {
        let mut rng = rng();
        let mut session = Session::new(smash_config(), ComboBonus::default()).unwrap();
        session.start();

        session.advance(Duration::from_secs(2), &mut rng);
        let first = session.place(Item::Box, Vec2::new(10.0, 10.0));
        let hit = session.interact(first).unwrap();
        assert_eq!(hit.awarded, 10);
        assert_eq!(session.score(), 10);

        session.advance(Duration::from_secs(1), &mut rng);
        assert_eq!(session.combo(), 1);
        let second = session.place(Item::Plate, Vec2::new(30.0, 20.0));
        session.interact(second).unwrap();
        assert_eq!(session.score(), 27);
    }

    #[test]
    fn countdown_without_interaction_reports_zero_once() {
        let mut rng = rng();
        let mut config = smash_config();
        config.session_secs = 60;
        let mut session = Session::new(config, ComboBonus::default()).unwrap();
        session.start();

        let mut reports = Vec::new();
        let mut ticks = 0;
        for _ in 0..120 {
            let before = session.remaining_secs();
            if let Some(done) = session.advance(Duration::from_secs(1), &mut rng) {
                reports.push(done);
            }
            if session.remaining_secs() < before {
                ticks += 1;
            }
        }

        assert_eq!(ticks, 60);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].final_score, 0);
        assert_eq!(reports[0].played, Duration::from_secs(60));
        assert_eq!(session.state(), State::Ended);
    }

    #[test]
    fn one_large_step_behaves_like_many_small_ones() {
        let mut rng = rng();
        let mut session = Session::new(smash_config(), ComboBonus::default()).unwrap();
        session.start();

        let done = session.advance(Duration::from_secs(300), &mut rng).unwrap();
        assert_eq!(done.played, Duration::from_secs(90));
        assert!(session.entities().len() <= 8);
        assert!(session.advance(Duration::from_secs(5), &mut rng).is_none());
    }

    #[test]
    fn repeated_interaction_is_a_no_op() {
        let mut session = Session::new(smash_config(), ComboBonus::default()).unwrap();
        session.start();
        let id = session.place(Item::Plate, Vec2::new(5.0, 5.0));

        assert!(session.interact(id).is_some());
        let score = session.score();
        assert!(session.interact(id).is_none());
        assert_eq!(session.score(), score);
    }

    #[test]
    fn spawning_respects_cap_and_state() {
        let mut rng = rng();
        let mut session = Session::new(smash_config(), FlatPoints).unwrap();

        session.advance(Duration::from_secs(10), &mut rng);
        assert!(session.entities().is_empty());

        session.start();
        session.advance(Duration::from_millis(1500), &mut rng);
        assert_eq!(session.entities().len(), 1);

        session.toggle_pause();
        session.advance(Duration::from_secs(10), &mut rng);
        assert_eq!(session.entities().len(), 1);
        assert_eq!(session.remaining_secs(), 89);

        session.toggle_pause();
        session.advance(Duration::from_secs(30), &mut rng);
        assert_eq!(session.entities().len(), 8);
    }

    #[test]
    fn reset_clears_everything_and_stops_ticks() {
        let mut rng = rng();
        let mut session = Session::new(smash_config(), ComboBonus::default()).unwrap();
        session.start();
        session.advance(Duration::from_secs(5), &mut rng);
        let id = session.place(Item::Box, Vec2::new(5.0, 5.0));
        session.interact(id);

        session.reset();
        assert_eq!(session.state(), State::Idle);
        assert_eq!(session.score(), 0);
        assert_eq!(session.combo(), 0);
        assert!(session.entities().is_empty());
        assert_eq!(session.remaining_secs(), 90);

        assert!(session.advance(Duration::from_secs(200), &mut rng).is_none());
        assert!(session.entities().is_empty());
        assert_eq!(session.remaining_secs(), 90);
    }

    #[test]
    fn ended_session_needs_reset_before_restart() {
        let mut rng = rng();
        let mut config = smash_config();
        config.session_secs = 3;
        let mut session = Session::new(config, FlatPoints).unwrap();
        session.start();
        session.advance(Duration::from_secs(3), &mut rng).unwrap();

        assert!(!session.start());
        assert_eq!(session.final_score(), Some(0));

        session.reset();
        assert!(session.start());
        assert_eq!(session.remaining_secs(), 3);
    }

    #[test]
    fn interactions_are_ignored_unless_running() {
        let mut rng = rng();
        let mut config = smash_config();
        config.session_secs = 2;
        let mut session = Session::new(config, FlatPoints).unwrap();
        session.start();
        let id = session.place(Item::Box, Vec2::new(5.0, 5.0));

        session.toggle_pause();
        assert!(session.interact(id).is_none());
        session.toggle_pause();

        session.advance(Duration::from_secs(2), &mut rng).unwrap();
        assert!(session.interact(id).is_none());
        assert_eq!(session.final_score(), Some(0));
    }

    #[test]
    fn score_is_the_sum_of_awards() {
        let mut rng = rng();
        let mut session = Session::new(smash_config(), ComboBonus::default()).unwrap();
        session.start();

        let mut awarded = 0;
        let mut last = 0;
        for step in 0..60 {
            session.advance(Duration::from_millis(700), &mut rng);
            if step % 3 == 0 {
                let ids: Vec<EntityId> = session.entities().iter().map(|e| e.id).collect();
                for id in ids {
                    awarded += session.interact(id).map_or(0, |h| h.awarded);
                    assert!(session.score() >= last);
                    last = session.score();
                }
            }
        }
        assert_eq!(session.score(), awarded);
    }

    #[test]
    fn combo_expires_inside_one_long_step() {
        let mut rng = rng();
        let mut session = Session::new(smash_config(), ComboBonus::default()).unwrap();
        session.start();
        let a = session.place(Item::Box, Vec2::new(5.0, 5.0));
        session.interact(a);
        session.advance(Duration::from_millis(2500), &mut rng);
        assert_eq!(session.combo(), 0);

        let b = session.place(Item::Plate, Vec2::new(9.0, 9.0));
        assert_eq!(session.interact(b).unwrap().awarded, 15);
    }

    #[test]
    fn rising_entities_leave_through_the_top() {
        let mut rng = rng();
        let mut config = smash_config();
        config.spawn_edge = SpawnEdge::Bottom;
        config.motion = Motion::Rise {
            min_speed: 10.0,
            max_speed: 10.0,
        };
        config.size_range = (2.0, 2.0);
        config.spawn_period = Duration::from_secs(60);
        let mut session = Session::new(config, FlatPoints).unwrap();
        session.set_field(Vec2::new(40.0, 20.0));
        session.start();

        session.advance(Duration::from_secs(60), &mut rng);
        assert_eq!(session.entities().len(), 1);

        session.advance(Duration::from_secs(1), &mut rng);
        let y = session.entities()[0].position.y;
        assert!(y < 20.0 && y > 9.0);

        session.advance(Duration::from_millis(1200), &mut rng);
        assert!(session.entities().is_empty());
    }

    #[test]
    fn entities_fade_out_after_their_lifetime() {
        let mut rng = rng();
        let mut config = smash_config();
        config.lifetime = Some(Duration::from_secs(2));
        config.spawn_period = Duration::from_secs(30);
        let mut session = Session::new(config, FlatPoints).unwrap();
        session.start();

        session.advance(Duration::from_secs(30), &mut rng);
        assert_eq!(session.entities().len(), 1);
        session.advance(Duration::from_secs(1), &mut rng);
        assert!(session.entities()[0].vitality(session.config().lifetime) < 0.6);
        session.advance(Duration::from_millis(1100), &mut rng);
        assert!(session.entities().is_empty());
    }

    #[test]
    fn hit_test_prefers_the_topmost_entity() {
        let mut session = Session::new(smash_config(), FlatPoints).unwrap();
        let below = session.place(Item::Box, Vec2::new(10.0, 10.0));
        let above = session.place(Item::Plate, Vec2::new(11.0, 10.0));
        assert_eq!(session.hit_test(Vec2::new(10.5, 10.0)), Some(above));
        assert_eq!(session.hit_test(Vec2::new(8.5, 10.0)), Some(below));
        assert_eq!(session.hit_test(Vec2::new(40.0, 40.0)), None);
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let mut config = smash_config();
        config.session_secs = 0;
        assert!(matches!(
            Session::new(config, FlatPoints),
            Err(EngineError::ZeroLength)
        ));

        let mut config = smash_config();
        config.motion_period = Duration::ZERO;
        assert!(matches!(
            Session::new(config, FlatPoints),
            Err(EngineError::ZeroPeriod { timer: "motion" })
        ));

        let mut config = smash_config();
        config.size_range = (4.0, 2.0);
        assert!(Session::new(config, FlatPoints).is_err());
    }
}
