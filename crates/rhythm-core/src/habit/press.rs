//! Press-and-hold classification.
//!
//! A press released before the threshold registers exactly one tap
//! increment; a press held to the threshold fires a hold (the edit
//! gesture) exactly once, and the following release registers nothing.
//! Caller-polled like the runner -- no internal timer.

use serde::{Deserialize, Serialize};

/// Default hold threshold in milliseconds.
pub const DEFAULT_LONG_PRESS_MS: u64 = 800;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PressOutcome {
    /// Released before the threshold: one increment.
    Tap,
    /// Held to the threshold: open the edit flow instead.
    Hold,
}

/// Debounce state for one pointer press.
#[derive(Debug, Clone)]
pub struct PressTracker {
    threshold_ms: u64,
    pressed_at_ms: Option<u64>,
    hold_fired: bool,
}

impl Default for PressTracker {
    fn default() -> Self {
        Self::new(DEFAULT_LONG_PRESS_MS)
    }
}

impl PressTracker {
    pub fn new(threshold_ms: u64) -> Self {
        Self {
            threshold_ms,
            pressed_at_ms: None,
            hold_fired: false,
        }
    }

    /// Arm the tracker at the moment the pointer goes down.
    pub fn press(&mut self, now_ms: u64) {
        self.pressed_at_ms = Some(now_ms);
        self.hold_fired = false;
    }

    /// Poll while the pointer is held. Fires `Hold` exactly once when
    /// the press reaches the threshold.
    pub fn poll(&mut self, now_ms: u64) -> Option<PressOutcome> {
        let pressed_at = self.pressed_at_ms?;
        if self.hold_fired || now_ms.saturating_sub(pressed_at) < self.threshold_ms {
            return None;
        }
        self.hold_fired = true;
        Some(PressOutcome::Hold)
    }

    /// Disarm on pointer release. A release before the threshold is a
    /// tap; after a fired hold it is nothing.
    pub fn release(&mut self, now_ms: u64) -> Option<PressOutcome> {
        let pressed_at = self.pressed_at_ms.take()?;
        let fired = self.hold_fired;
        self.hold_fired = false;
        if fired {
            return None;
        }
        if now_ms.saturating_sub(pressed_at) >= self.threshold_ms {
            Some(PressOutcome::Hold)
        } else {
            Some(PressOutcome::Tap)
        }
    }

    /// Classify a complete press of a known duration (CLI entry point).
    pub fn classify(threshold_ms: u64, held_ms: u64) -> PressOutcome {
        if held_ms >= threshold_ms {
            PressOutcome::Hold
        } else {
            PressOutcome::Tap
        }
    }
}
