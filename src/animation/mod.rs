//! Wall-clock driven value, visibility and hover transitions.
//!
//! There are no background timers: the host passes the current timestamp
//! (milliseconds) into every sampling call, so animation speed is
//! independent of frame rate and fully deterministic in tests.

use serde::{Deserialize, Serialize};

const BACK_C1: f64 = 1.701_58;
const BACK_C3: f64 = BACK_C1 + 1.0;

/// Fraction of full emphasis applied to a series dimmed by a sibling hover.
pub const HOVER_DIMMED_FACTOR: f64 = 0.15;

/// Overshooting entrance curve: rises past 1 before settling back.
#[must_use]
pub fn back_ease(t: f64) -> f64 {
    let shifted = t - 1.0;
    1.0 + BACK_C3 * shifted.powi(3) + BACK_C1 * shifted.powi(2)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Easing {
    #[default]
    Linear,
    BackOut,
}

impl Easing {
    #[must_use]
    fn apply(self, progress: f64) -> f64 {
        match self {
            Self::Linear => progress,
            Self::BackOut => back_ease(progress),
        }
    }
}

/// One animated quantity.
///
/// The start-value/start-time pair is captured only at the instant the
/// target changes, never per frame, so progress is monotonic within a
/// transition and retargeting mid-flight never snaps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    start_time_ms: f64,
    duration_ms: f64,
    start_value: f64,
    target: f64,
    easing: Easing,
}

impl Transition {
    #[must_use]
    pub fn settled(value: f64, duration_ms: f64, easing: Easing) -> Self {
        Self {
            start_time_ms: f64::NEG_INFINITY,
            duration_ms,
            start_value: value,
            target: value,
            easing,
        }
    }

    #[must_use]
    pub fn started(now_ms: f64, from: f64, to: f64, duration_ms: f64, easing: Easing) -> Self {
        Self {
            start_time_ms: now_ms,
            duration_ms,
            start_value: from,
            target: to,
            easing,
        }
    }

    #[must_use]
    pub fn target(self) -> f64 {
        self.target
    }

    #[must_use]
    pub fn is_settled(self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }

    /// Current value at `now_ms`.
    #[must_use]
    pub fn sample(self, now_ms: f64) -> f64 {
        let eased = self.easing.apply(self.progress(now_ms));
        self.start_value + (self.target - self.start_value) * eased
    }

    /// Redirects the transition toward `new_target`.
    ///
    /// A no-op when the target is unchanged; otherwise the current in-flight
    /// value becomes the new start value so the change is seamless.
    pub fn retarget(&mut self, now_ms: f64, new_target: f64) {
        if new_target == self.target {
            return;
        }
        self.start_value = self.sample(now_ms);
        self.start_time_ms = now_ms;
        self.target = new_target;
    }

    fn progress(self, now_ms: f64) -> f64 {
        if !self.duration_ms.is_finite() || self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_time_ms) / self.duration_ms).clamp(0.0, 1.0)
    }
}

/// Per-series animation state machine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesAnimation {
    entrance: Transition,
    visibility: Transition,
    hover: Transition,
}

impl SeriesAnimation {
    /// Fresh series: entrance plays immediately, fully visible, undimmed.
    #[must_use]
    pub fn new(now_ms: f64, value_duration_ms: f64, hover_duration_ms: f64) -> Self {
        Self {
            entrance: Transition::started(now_ms, 0.0, 1.0, value_duration_ms, Easing::BackOut),
            visibility: Transition::settled(1.0, value_duration_ms, Easing::Linear),
            hover: Transition::settled(1.0, hover_duration_ms, Easing::Linear),
        }
    }

    /// Replays the entrance transition, used when the series data changes.
    pub fn restart_entrance(&mut self, now_ms: f64) {
        let duration = self.entrance.duration_ms;
        self.entrance = Transition::started(now_ms, 0.0, 1.0, duration, Easing::BackOut);
    }

    pub fn set_visible(&mut self, now_ms: f64, visible: bool) {
        self.visibility
            .retarget(now_ms, if visible { 1.0 } else { 0.0 });
    }

    /// `emphasized = false` dims the series while a sibling is hovered.
    pub fn set_emphasized(&mut self, now_ms: f64, emphasized: bool) {
        self.hover
            .retarget(now_ms, if emphasized { 1.0 } else { HOVER_DIMMED_FACTOR });
    }

    #[must_use]
    pub fn visibility_factor(self, now_ms: f64) -> f64 {
        self.visibility.sample(now_ms).clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn hover_factor(self, now_ms: f64) -> f64 {
        self.hover.sample(now_ms).clamp(HOVER_DIMMED_FACTOR, 1.0)
    }

    /// Multiplier applied to rendered values.
    ///
    /// Uses `visibility²` so a shrinking series and its axis range (which
    /// shrinks with `visibility¹`) diverge, keeping the animated shape
    /// visually anchored instead of jumping.
    #[must_use]
    pub fn value_factor(self, now_ms: f64) -> f64 {
        let visibility = self.visibility_factor(now_ms);
        self.entrance.sample(now_ms) * visibility * visibility
    }

    /// Multiplier applied to range contributions.
    #[must_use]
    pub fn range_factor(self, now_ms: f64) -> f64 {
        self.visibility_factor(now_ms)
    }

    #[must_use]
    pub fn is_idle(self, now_ms: f64) -> bool {
        self.entrance.is_settled(now_ms)
            && self.visibility.is_settled(now_ms)
            && self.hover.is_settled(now_ms)
    }
}
