use serde::{Deserialize, Serialize};

use crate::core::types::Rect;

/// Numeric mapping mode of an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ScaleKind {
    /// Uniform spacing in raw domain units.
    #[default]
    Linear,
    /// Uniform spacing in base-10 log units (domain clamped to > 0).
    Logarithmic,
}

/// Which plot-rectangle dimension a mapping runs along.
///
/// Horizontal maps left to right; Vertical maps bottom (low values) to top,
/// inverted relative to screen Y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisDimension {
    Horizontal,
    Vertical,
}

/// Fixed inset applied to both plot edges so extreme points are never
/// clipped by stroke width.
pub const PLOT_EDGE_INSET: f64 = 3.0;

const LOG_DOMAIN_EPSILON: f64 = 1e-6;

/// Domain-to-screen mapper over a resolved `[min, max]` range.
///
/// Construction sanitizes the range so that every mapping call afterwards is
/// total: degenerate geometry yields a deterministic edge coordinate instead
/// of an error surfacing mid-render.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleMapper {
    range_min: f64,
    range_max: f64,
    kind: ScaleKind,
}

impl ScaleMapper {
    #[must_use]
    pub fn new(range: (f64, f64), kind: ScaleKind) -> Self {
        let (mut min, mut max) = sanitize(range);
        if kind == ScaleKind::Logarithmic {
            min = min.max(LOG_DOMAIN_EPSILON);
            max = max.max(min * 1.1);
        }
        Self {
            range_min: min,
            range_max: max,
            kind,
        }
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_min, self.range_max)
    }

    #[must_use]
    pub fn kind(self) -> ScaleKind {
        self.kind
    }

    /// Maps a domain value to a screen coordinate along `dimension` of `plot`.
    #[must_use]
    pub fn to_screen(self, value: f64, plot: Rect, dimension: AxisDimension) -> f64 {
        let (near, far) = edges(plot, dimension);
        let t = self.normalize(value);
        near + t * (far - near)
    }

    /// Exact inverse of [`ScaleMapper::to_screen`] for the same inputs.
    #[must_use]
    pub fn to_domain(self, coordinate: f64, plot: Rect, dimension: AxisDimension) -> f64 {
        let (near, far) = edges(plot, dimension);
        let extent = far - near;
        if extent == 0.0 || !coordinate.is_finite() {
            return self.range_min;
        }
        let t = (coordinate - near) / extent;
        self.denormalize(t)
    }

    fn normalize(self, value: f64) -> f64 {
        if !value.is_finite() {
            return 0.0;
        }

        match self.kind {
            ScaleKind::Linear => {
                let span = self.range_max - self.range_min;
                if span == 0.0 {
                    return 0.0;
                }
                (value - self.range_min) / span
            }
            ScaleKind::Logarithmic => {
                let clamped = value.max(self.range_min);
                let log_min = self.range_min.log10();
                let log_span = self.range_max.log10() - log_min;
                if log_span == 0.0 {
                    return 0.0;
                }
                (clamped.log10() - log_min) / log_span
            }
        }
    }

    fn denormalize(self, t: f64) -> f64 {
        match self.kind {
            ScaleKind::Linear => self.range_min + t * (self.range_max - self.range_min),
            ScaleKind::Logarithmic => {
                let log_min = self.range_min.log10();
                let log_span = self.range_max.log10() - log_min;
                10_f64.powf(log_min + t * log_span)
            }
        }
    }
}

fn edges(plot: Rect, dimension: AxisDimension) -> (f64, f64) {
    match dimension {
        AxisDimension::Horizontal => (plot.left + PLOT_EDGE_INSET, plot.right - PLOT_EDGE_INSET),
        AxisDimension::Vertical => (plot.bottom - PLOT_EDGE_INSET, plot.top + PLOT_EDGE_INSET),
    }
}

fn sanitize(range: (f64, f64)) -> (f64, f64) {
    let (min, max) = range;
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    if min > max {
        return (max, min);
    }
    (min, max)
}
