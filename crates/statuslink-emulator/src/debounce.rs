//! Counter-based input debouncing.
//!
//! Mechanical contacts chatter for a few milliseconds when they move. The
//! filter only accepts a new input pattern once it has been sampled
//! unchanged for `threshold` consecutive ticks; any flicker back to the
//! accepted pattern, or on to a third pattern, restarts the count.
//!
//! ```
//! use statuslink_emulator::Debouncer;
//!
//! let mut filter = Debouncer::new(3);
//! assert_eq!(filter.sample(0b10), None);
//! assert_eq!(filter.sample(0b10), None);
//! assert_eq!(filter.sample(0b10), Some(0b10));
//! assert_eq!(filter.accepted(), 0b10);
//! ```

/// Debounce filter over a small bit pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debouncer {
    threshold: u8,
    accepted: u8,
    candidate: u8,
    remaining: u8,
}

impl Debouncer {
    /// Create a filter whose accepted pattern starts at `0` (nothing
    /// asserted). A zero threshold is treated as 1.
    #[must_use]
    pub fn new(threshold: u8) -> Self {
        let threshold = threshold.max(1);
        Self {
            threshold,
            accepted: 0,
            candidate: 0,
            remaining: threshold,
        }
    }

    /// Feed one sample.
    ///
    /// Returns the newly accepted pattern on the tick it becomes stable, and
    /// `None` on every other tick.
    pub fn sample(&mut self, pattern: u8) -> Option<u8> {
        if pattern == self.accepted {
            self.candidate = pattern;
            self.remaining = self.threshold;
            return None;
        }

        if pattern != self.candidate {
            self.candidate = pattern;
            self.remaining = self.threshold;
        }

        self.remaining -= 1;
        if self.remaining > 0 {
            return None;
        }

        self.accepted = pattern;
        self.remaining = self.threshold;
        Some(pattern)
    }

    #[must_use]
    pub fn accepted(&self) -> u8 {
        self.accepted
    }

    /// Ticks the current candidate still has to hold.
    #[must_use]
    pub fn remaining(&self) -> u8 {
        self.remaining
    }

    #[must_use]
    pub fn threshold(&self) -> u8 {
        self.threshold
    }
}
