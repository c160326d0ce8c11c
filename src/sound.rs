use std::io::{self, Write};
use std::time::{Duration, Instant};

use tracing::{debug, trace};

const MIN_GAP: Duration = Duration::from_millis(100);

/// Moments worth an audible nudge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Pop,
    Smash,
    PowerUp,
    Breath,
    Complete,
}

/// Terminal bell feedback, at most one ring per 100 ms whatever the cue.
/// Purely best effort: a terminal that can't ring, or a failed write, is
/// ignored.
pub struct Bell {
    enabled: bool,
    last: Option<Instant>,
}

impl Bell {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            last: None,
        }
    }

    pub fn play(&mut self, cue: Cue) {
        self.play_at(cue, Instant::now(), &mut io::stdout());
    }

    fn play_at<W: Write>(&mut self, cue: Cue, now: Instant, out: &mut W) -> bool {
        if !self.enabled {
            return false;
        }
        let too_soon = self
            .last
            .is_some_and(|last| now.saturating_duration_since(last) < MIN_GAP);
        if too_soon {
            trace!(?cue, "bell skipped");
            return false;
        }
        self.last = Some(now);
        if let Err(e) = out.write_all(b"\x07").and_then(|_| out.flush()) {
            debug!(?cue, error = %e, "bell failed");
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Unsupported, "no bell"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn rings_are_rate_limited() {
        let mut bell = Bell::new(true);
        let mut out = Vec::new();
        let start = Instant::now();
        assert!(bell.play_at(Cue::Pop, start, &mut out));
        assert!(!bell.play_at(Cue::Pop, start + Duration::from_millis(50), &mut out));
        assert!(!bell.play_at(Cue::Complete, start + Duration::from_millis(60), &mut out));
        assert!(!bell.play_at(Cue::PowerUp, start + Duration::from_millis(99), &mut out));
        assert!(bell.play_at(Cue::Smash, start + Duration::from_millis(200), &mut out));
        assert_eq!(out, b"\x07\x07");
    }

    #[test]
    fn disabled_or_failing_bell_is_silent() {
        let mut out = Vec::new();
        assert!(!Bell::new(false).play_at(Cue::Pop, Instant::now(), &mut out));
        assert!(out.is_empty());
        assert!(!Bell::new(true).play_at(Cue::Pop, Instant::now(), &mut Broken));
    }
}
