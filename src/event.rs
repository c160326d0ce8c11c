use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};

pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Tick,
}

pub struct EventHandler {
    rx: mpsc::Receiver<Event>,
}

/// How long to wait for input before the next tick is owed.
fn poll_timeout(last_tick: Instant, now: Instant, tick_rate: Duration) -> Duration {
    tick_rate.saturating_sub(now.saturating_duration_since(last_tick))
}

// Ticks follow the clock, not the input stream: a flood of events that are
// never forwarded must not starve them.
fn tick_due(last_tick: Instant, now: Instant, tick_rate: Duration) -> bool {
    now.saturating_duration_since(last_tick) >= tick_rate
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::channel();
        let tick_rate = Duration::from_millis(tick_rate_ms);

        thread::spawn(move || {
            let mut last_tick = Instant::now();
            loop {
                let timeout = poll_timeout(last_tick, Instant::now(), tick_rate);
                if event::poll(timeout).unwrap_or(false) {
                    let forwarded = match event::read() {
                        Ok(event::Event::Key(key)) if key.kind == KeyEventKind::Press => {
                            Some(Event::Key(key))
                        }
                        // Hover noise is dropped; games only care about presses and drags.
                        Ok(event::Event::Mouse(mouse)) if mouse.kind != MouseEventKind::Moved => {
                            Some(Event::Mouse(mouse))
                        }
                        _ => None,
                    };
                    if let Some(event) = forwarded {
                        if tx.send(event).is_err() {
                            return;
                        }
                    }
                }

                let now = Instant::now();
                if tick_due(last_tick, now, tick_rate) {
                    last_tick = now;
                    if tx.send(Event::Tick).is_err() {
                        return;
                    }
                }
            }
        });

        Self { rx }
    }

    pub fn next(&self) -> io::Result<Event> {
        self.rx.recv().map_err(io::Error::other)
    }
}
