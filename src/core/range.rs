//! Nice-number range and tick computation.
//!
//! The spacing ladder is fixed to `{1, 2, 5, 10} * 10^n` so that axis labels
//! stay readable regardless of the raw data envelope.

use serde::{Deserialize, Serialize};

/// Resolved "nice" axis scaling: expanded bounds plus tick spacing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NiceScaling {
    pub nice_min: f64,
    pub nice_max: f64,
    pub spacing: f64,
}

impl NiceScaling {
    /// Ascending tick values from `nice_min` to `nice_max` inclusive.
    #[must_use]
    pub fn tick_values(self) -> Vec<f64> {
        if !self.spacing.is_finite() || self.spacing <= 0.0 {
            return vec![self.nice_min, self.nice_max];
        }

        let mut values = Vec::new();
        let mut value = self.nice_min;
        // Half-spacing epsilon keeps the top tick despite accumulated float error.
        while value <= self.nice_max + self.spacing * 0.5 {
            values.push(value);
            value += self.spacing;
        }
        values
    }
}

/// Rounds a span to a nice magnitude.
///
/// With `round = false` the result is the smallest nice number >= the span
/// (used for the range itself). With `round = true` the nearest nice number
/// by threshold is chosen (used for tick spacing).
#[must_use]
pub fn nice_num(span: f64, round: bool) -> f64 {
    if !span.is_finite() || span <= 0.0 {
        return 1.0;
    }

    let exponent = span.log10().floor();
    let magnitude = 10_f64.powf(exponent);
    let fraction = span / magnitude;

    let nice_fraction = if round {
        if fraction < 1.5 {
            1.0
        } else if fraction < 3.0 {
            2.0
        } else if fraction < 7.0 {
            5.0
        } else {
            10.0
        }
    } else if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };

    nice_fraction * magnitude
}

/// Expands `[min, max]` to nice bounds with at most `max_ticks` labels.
///
/// A collapsed domain (`min == max`) is widened to one unit before rounding;
/// non-finite input falls back to the `[0, 1]` domain.
#[must_use]
pub fn resolve_nice_scaling(min: f64, max: f64, max_ticks: usize) -> NiceScaling {
    let (min, max) = sanitize_range(min, max);
    let max = if min == max { min + 1.0 } else { max };

    let raw_span = max - min;
    let nice_span = nice_num(raw_span, false);
    let divisions = max_ticks.saturating_sub(1).max(1) as f64;
    let spacing = nice_num(nice_span / divisions, true);

    NiceScaling {
        nice_min: (min / spacing).floor() * spacing,
        nice_max: (max / spacing).ceil() * spacing,
        spacing,
    }
}

/// Formats a tick value with precision derived from the spacing.
#[must_use]
pub fn format_tick_label(value: f64, spacing: f64) -> String {
    let decimals = if !spacing.is_finite() || spacing >= 1.0 || spacing <= 0.0 {
        0
    } else {
        (-spacing.log10().floor()) as usize
    };

    if decimals == 0 {
        // Avoid "-0" for values that round to zero.
        let rounded = if value.abs() < spacing.abs() * 0.01 {
            0.0
        } else {
            value
        };
        format!("{}", rounded.round() as i64)
    } else {
        format!("{value:.decimals$}")
    }
}

/// Domain of a categorical axis over `count` distinct categories.
///
/// Unpadded, the domain spans the category indices `[0, count - 1]`. Padding
/// expands symmetrically by `(count - 1) * padding` per side.
#[must_use]
pub fn categorical_domain(
    count: usize,
    min_padding: f64,
    max_padding: f64,
    padded: bool,
) -> (f64, f64) {
    if count == 0 {
        return (0.0, 1.0);
    }

    let last = (count - 1) as f64;
    if !padded || count == 1 {
        return (0.0, last.max(1.0));
    }

    let min_padding = sanitize_fraction(min_padding);
    let max_padding = sanitize_fraction(max_padding);
    (-last * min_padding, last + last * max_padding)
}

/// Replaces a degenerate `[min, max]` pair with a safe renderable domain.
#[must_use]
pub fn sanitize_range(min: f64, max: f64) -> (f64, f64) {
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    if min > max {
        return (max, min);
    }
    (min, max)
}

fn sanitize_fraction(fraction: f64) -> f64 {
    if fraction.is_finite() && fraction >= 0.0 {
        fraction
    } else {
        0.0
    }
}
