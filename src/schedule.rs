//! Slideshow and animation timing decisions.
//!
//! The engine never arms timers itself: operations that change timing return
//! a [`Schedule`] instruction and the presentation layer realizes it. Every
//! instruction means "cancel whatever was armed for this slot, then arm
//! this", so at most one slideshow timer and one animation timer ever exist.

use std::fmt;
use std::time::Duration;

/// Next-timer instruction for one timer slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Nothing scheduled; cancel any armed timer.
    Idle,
    /// One-shot after the given delay.
    Once(Duration),
    /// Recurring with the given period.
    Every(Duration),
}

/// How a slideshow tick advances the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceMode {
    /// `move_by(+1)` with retry.
    Sequential,
    /// Uniform random non-zero offset, never landing on the start.
    Random,
}

/// Signed slideshow delay accumulator.
///
/// Zero disables the slideshow; a positive value advances randomly and a
/// negative one sequentially, both with a period of the absolute value in
/// seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Slideshow {
    delay: i64,
}

impl Slideshow {
    #[must_use]
    pub fn new(delay: i64) -> Self {
        Self { delay }
    }

    #[must_use]
    pub fn delay(&self) -> i64 {
        self.delay
    }

    /// Add `delta` steps to the signed delay and return the timer
    /// instruction for the new state.
    pub fn adjust(&mut self, delta: i64) -> Schedule {
        self.delay += delta;
        self.schedule()
    }

    /// Timer instruction matching the current delay.
    #[must_use]
    pub fn schedule(&self) -> Schedule {
        if self.delay == 0 {
            Schedule::Idle
        } else {
            Schedule::Every(Duration::from_secs(self.delay.unsigned_abs()))
        }
    }

    /// Advance mode encoded by the sign, `None` while disabled.
    #[must_use]
    pub fn mode(&self) -> Option<AdvanceMode> {
        match self.delay {
            0 => None,
            d if d > 0 => Some(AdvanceMode::Random),
            _ => Some(AdvanceMode::Sequential),
        }
    }
}

impl fmt::Display for Slideshow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode() {
            None => f.write_str("Off"),
            Some(AdvanceMode::Sequential) => {
                write!(f, "Sequential {}s", self.delay.unsigned_abs())
            }
            Some(AdvanceMode::Random) => write!(f, "Random {}s", self.delay.unsigned_abs()),
        }
    }
}

/// Animation-frame instruction for a frame with the given display delay.
///
/// Only a finite positive delay keeps the self-rescheduling chain going; a
/// zero or missing delay means the frame is terminal and the timer slot is
/// cancelled.
#[must_use]
pub fn frame_schedule(delay: Option<Duration>) -> Schedule {
    match delay {
        Some(d) if !d.is_zero() => Schedule::Once(d),
        _ => Schedule::Idle,
    }
}
