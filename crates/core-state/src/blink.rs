//! Cursor blink driven by polled ticks.
//!
//! No timer lives here: the owner's event loop delivers ticks carrying a
//! monotonic `Instant` and the toggle fires once the interval has elapsed
//! since the previous toggle.

use std::time::{Duration, Instant};

pub const DEFAULT_BLINK_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct CursorBlink {
    interval: Duration,
    shown: bool,
    visible: bool,
    last_toggle: Option<Instant>,
    last_tick: Option<Instant>,
}

impl Default for CursorBlink {
    fn default() -> Self {
        Self::new(DEFAULT_BLINK_INTERVAL)
    }
}

impl CursorBlink {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            shown: true,
            visible: true,
            last_toggle: None,
            last_tick: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether the cursor is currently drawn.
    pub fn is_visible(&self) -> bool {
        self.shown && self.visible
    }

    /// Whether the cursor participates in blinking at all (e.g. focus).
    pub fn is_shown(&self) -> bool {
        self.shown
    }

    pub fn set_shown(&mut self, shown: bool) {
        self.shown = shown;
        self.visible = true;
        self.last_toggle = None;
    }

    /// Make the cursor solid and restart the interval from the latest tick.
    /// Returns true when a hidden cursor became visible.
    pub fn restart(&mut self) -> bool {
        if !self.shown {
            return false;
        }
        let revealed = !self.visible;
        self.visible = true;
        self.last_toggle = self.last_tick;
        revealed
    }

    /// Process a tick; returns true when visibility toggled.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.shown {
            return false;
        }
        self.last_tick = Some(now);
        match self.last_toggle {
            None => {
                self.last_toggle = Some(now);
                false
            }
            Some(last) if now.saturating_duration_since(last) > self.interval => {
                self.visible = !self.visible;
                self.last_toggle = Some(now);
                true
            }
            Some(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_after_interval() {
        let t0 = Instant::now();
        let mut b = CursorBlink::new(Duration::from_millis(100));
        assert!(!b.tick(t0));
        assert!(!b.tick(t0 + Duration::from_millis(50)));
        assert!(b.tick(t0 + Duration::from_millis(101)));
        assert!(!b.is_visible());
        assert!(!b.tick(t0 + Duration::from_millis(150)));
        assert!(b.tick(t0 + Duration::from_millis(202)));
        assert!(b.is_visible());
    }

    #[test]
    fn hidden_cursor_ignores_ticks() {
        let t0 = Instant::now();
        let mut b = CursorBlink::new(Duration::from_millis(10));
        b.set_shown(false);
        assert!(!b.tick(t0));
        assert!(!b.tick(t0 + Duration::from_secs(1)));
        assert!(!b.is_visible());
    }

    #[test]
    fn restart_makes_solid() {
        let t0 = Instant::now();
        let mut b = CursorBlink::new(Duration::from_millis(10));
        b.tick(t0);
        b.tick(t0 + Duration::from_millis(11));
        assert!(!b.is_visible());
        b.tick(t0 + Duration::from_millis(15));
        assert!(b.restart());
        assert!(b.is_visible());
        assert!(!b.restart());
        assert!(!b.tick(t0 + Duration::from_millis(24)));
        assert!(b.tick(t0 + Duration::from_millis(26)));
    }
}
