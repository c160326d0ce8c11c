use std::time::Duration;

/// Repeating timer that fires once every `period` of elapsed time.
///
/// Nothing runs in the background: the owner feeds it elapsed time through
/// [`Interval::tick`] and acts on the returned fire count. Dropping the
/// interval is all it takes to cancel it.
#[derive(Debug, Clone)]
pub struct Interval {
    period: Duration,
    elapsed: Duration,
}

impl Interval {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            elapsed: Duration::ZERO,
        }
    }

    /// Time left until the next fire.
    pub fn until_due(&self) -> Duration {
        self.period.saturating_sub(self.elapsed)
    }

    /// Advance by `dt` and return how many times the interval fired.
    pub fn tick(&mut self, dt: Duration) -> u32 {
        if self.period.is_zero() {
            return 0;
        }
        self.elapsed += dt;
        let mut fired = 0;
        while self.elapsed >= self.period {
            self.elapsed -= self.period;
            fired += 1;
        }
        fired
    }

    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}

/// Whole-second countdown built on a one second [`Interval`].
#[derive(Debug, Clone)]
pub struct Countdown {
    initial: u32,
    remaining: u32,
    ticker: Interval,
}

impl Countdown {
    pub fn new(secs: u32) -> Self {
        Self {
            initial: secs,
            remaining: secs,
            ticker: Interval::new(Duration::from_secs(1)),
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn initial(&self) -> u32 {
        self.initial
    }

    pub fn is_finished(&self) -> bool {
        self.remaining == 0
    }

    pub fn until_due(&self) -> Duration {
        self.ticker.until_due()
    }

    /// Advance by `dt`; returns the number of seconds actually counted down.
    /// A finished countdown never ticks again until reset.
    pub fn tick(&mut self, dt: Duration) -> u32 {
        if self.is_finished() {
            return 0;
        }
        let fired = self.ticker.tick(dt).min(self.remaining);
        self.remaining -= fired;
        fired
    }

    pub fn reset(&mut self) {
        self.remaining = self.initial;
        self.ticker.reset();
    }

    /// Restart with a different length, used by multi-phase timers.
    pub fn restart(&mut self, secs: u32) {
        self.initial = secs;
        self.reset();
    }
}
