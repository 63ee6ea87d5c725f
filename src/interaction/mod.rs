//! Pan/zoom gesture state and view-range overrides.
//!
//! Each interactive series owns a [`SeriesViewState`]. While a gesture is
//! active the state holds a tentative override range per dimension; the
//! override supersedes auto-fit until [`SeriesViewState::reset`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::types::{Point, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum InteractionMode {
    #[default]
    Idle,
    Panning,
}

/// Per-axis gesture permissions carried by every series.
///
/// Series sharing an axis must agree on these flags; divergence is rejected
/// at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionFlags {
    pub pan_x: bool,
    pub pan_y: bool,
    pub zoom_x: bool,
    pub zoom_y: bool,
}

impl Default for InteractionFlags {
    fn default() -> Self {
        Self {
            pan_x: true,
            pan_y: true,
            zoom_x: true,
            zoom_y: true,
        }
    }
}

impl InteractionFlags {
    #[must_use]
    pub const fn none() -> Self {
        Self {
            pan_x: false,
            pan_y: false,
            zoom_x: false,
            zoom_y: false,
        }
    }
}

/// Gesture anchor captured at pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct PanAnchor {
    pointer: Point,
    x_range: (f64, f64),
    y_range: (f64, f64),
}

/// Pan/zoom override state of one series.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SeriesViewState {
    view_x: Option<(f64, f64)>,
    view_y: Option<(f64, f64)>,
    mode: InteractionMode,
    anchor: Option<PanAnchor>,
}

impl SeriesViewState {
    #[must_use]
    pub fn mode(self) -> InteractionMode {
        self.mode
    }

    #[must_use]
    pub fn is_panning(self) -> bool {
        self.mode == InteractionMode::Panning
    }

    /// Active X override, `None` when the range derives from data.
    #[must_use]
    pub fn view_x(self) -> Option<(f64, f64)> {
        self.view_x
    }

    #[must_use]
    pub fn view_y(self) -> Option<(f64, f64)> {
        self.view_y
    }

    #[must_use]
    pub fn has_override(self) -> bool {
        self.view_x.is_some() || self.view_y.is_some()
    }

    /// Starts a pan, snapshotting the currently resolved padded ranges.
    pub fn begin_pan(&mut self, pointer: Point, x_range: (f64, f64), y_range: (f64, f64)) {
        self.mode = InteractionMode::Panning;
        self.anchor = Some(PanAnchor {
            pointer,
            x_range,
            y_range,
        });
    }

    /// Translates the screen delta since pointer-down into new override
    /// ranges, using the anchored snapshot and the current plot size.
    ///
    /// Each call overwrites the previous tentative range outright, so an
    /// abandoned gesture needs no rollback.
    pub fn pan_to(&mut self, pointer: Point, plot: Rect, flags: InteractionFlags) {
        let Some(anchor) = self.anchor else {
            return;
        };

        if flags.pan_x {
            let width = plot.width();
            if width > 0.0 {
                let span = anchor.x_range.1 - anchor.x_range.0;
                // Dragging left reveals higher X values.
                let delta = -(pointer.x - anchor.pointer.x) / width * span;
                self.view_x = Some((anchor.x_range.0 + delta, anchor.x_range.1 + delta));
            }
        }

        if flags.pan_y {
            let height = plot.height();
            if height > 0.0 {
                let span = anchor.y_range.1 - anchor.y_range.0;
                // Screen Y is inverted: dragging down reveals higher values.
                let delta = (pointer.y - anchor.pointer.y) / height * span;
                self.view_y = Some((anchor.y_range.0 + delta, anchor.y_range.1 + delta));
            }
        }
    }

    /// Ends the gesture; the override ranges persist until reset.
    pub fn end_pan(&mut self) {
        self.mode = InteractionMode::Idle;
        self.anchor = None;
    }

    /// Applies an instantaneous zoom around per-dimension anchor values.
    pub fn zoom(
        &mut self,
        factor: f64,
        anchor_x: f64,
        anchor_y: f64,
        x_range: (f64, f64),
        y_range: (f64, f64),
        flags: InteractionFlags,
    ) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }

        if flags.zoom_x {
            self.view_x = Some(zoom_range(x_range, anchor_x, factor));
        }
        if flags.zoom_y {
            self.view_y = Some(zoom_range(y_range, anchor_y, factor));
        }
    }

    /// Clears every override, reverting to auto-fit.
    pub fn reset(&mut self) {
        debug!("reset series view overrides");
        self.view_x = None;
        self.view_y = None;
        self.mode = InteractionMode::Idle;
        self.anchor = None;
    }
}

/// Scales a range around `anchor` so the anchored domain value keeps its
/// fractional position, which pins it to the same screen pixel.
#[must_use]
fn zoom_range(range: (f64, f64), anchor: f64, factor: f64) -> (f64, f64) {
    let (min, max) = range;
    let span = max - min;
    if !span.is_finite() || span <= 0.0 || !anchor.is_finite() {
        return range;
    }

    let fraction = ((anchor - min) / span).clamp(0.0, 1.0);
    let new_span = span * factor;
    let new_min = anchor - fraction * new_span;
    (new_min, new_min + new_span)
}
