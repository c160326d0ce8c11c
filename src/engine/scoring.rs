use std::time::Duration;

/// Decides how many points one successful interaction is worth.
pub trait ScoringPolicy {
    /// `combo` is the streak length before this hit.
    fn award(&self, points: u32, combo: u32) -> u32;
}

/// The entity's own value, streaks ignored.
#[derive(Clone, Copy, Debug, Default)]
pub struct FlatPoints;

impl ScoringPolicy for FlatPoints {
    fn award(&self, points: u32, _combo: u32) -> u32 {
        points
    }
}

/// Entity value plus `per_step` for every hit already in the streak.
#[derive(Clone, Copy, Debug)]
pub struct ComboBonus {
    pub per_step: u32,
}

impl Default for ComboBonus {
    fn default() -> Self {
        Self { per_step: 2 }
    }
}

impl ScoringPolicy for ComboBonus {
    fn award(&self, points: u32, combo: u32) -> u32 {
        points.saturating_add(combo.saturating_mul(self.per_step))
    }
}

/// Streak counter that drops back to zero after `window` without a hit.
#[derive(Clone, Debug)]
pub struct Combo {
    count: u32,
    idle: Duration,
    window: Duration,
}

impl Combo {
    pub fn new(window: Duration) -> Self {
        Self {
            count: 0,
            idle: Duration::ZERO,
            window,
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn hit(&mut self) {
        self.count += 1;
        self.idle = Duration::ZERO;
    }

    /// Time until an active streak expires.
    pub fn until_expiry(&self) -> Option<Duration> {
        (self.count > 0).then(|| self.window.saturating_sub(self.idle))
    }

    pub fn elapse(&mut self, dt: Duration) {
        if self.count == 0 {
            return;
        }
        self.idle += dt;
        if self.idle >= self.window {
            self.clear();
        }
    }

    pub fn clear(&mut self) {
        self.count = 0;
        self.idle = Duration::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combo_bonus_adds_two_per_step() {
        let policy = ComboBonus::default();
        assert_eq!(policy.award(10, 0), 10);
        assert_eq!(policy.award(15, 1), 17);
        assert_eq!(policy.award(50, 4), 58);
    }

    #[test]
    fn flat_points_ignore_streaks() {
        assert_eq!(FlatPoints.award(10, 7), 10);
    }

    #[test]
    fn streak_expires_after_idle_window() {
        let mut combo = Combo::new(Duration::from_secs(2));
        combo.hit();
        combo.elapse(Duration::from_millis(1500));
        combo.hit();
        assert_eq!(combo.count(), 2);
        assert_eq!(combo.until_expiry(), Some(Duration::from_secs(2)));

        combo.elapse(Duration::from_secs(2));
        assert_eq!(combo.count(), 0);
        assert_eq!(combo.until_expiry(), None);
    }
}
