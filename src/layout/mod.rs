//! Two-pass measure/render layout protocol.
//!
//! Every chart element claims a margin from a shared rectangle in a fixed,
//! auditable order: title, legend (unless floating), X axis, primary Y axis,
//! secondary Y axis. What remains is the plot rectangle. A second pass
//! re-walks the same elements with the final plot rectangle so their strips
//! align to coordinates only known after all margins are subtracted.

use serde::{Deserialize, Serialize};

use crate::core::types::Rect;

const TITLE_GAP: f64 = 6.0;
const TICK_LABEL_GAP: f64 = 4.0;
const AXIS_TITLE_GAP: f64 = 4.0;
const LEGEND_PADDING: f64 = 8.0;
const LEGEND_MARKER_WIDTH: f64 = 14.0;
const LABEL_ROTATION_SIN: f64 = std::f64::consts::FRAC_1_SQRT_2;
const LABEL_ROTATION_COS: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// Host-supplied text metrics, the seam where the platform text stack sits.
pub trait TextMeasurer {
    /// Returns `(width, height)` of `text` at `font_size`.
    fn measure(&self, text: &str, font_size: f64) -> (f64, f64);
}

/// Deterministic character-cell metrics for tests and headless layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CharCellMeasurer {
    pub advance_ratio: f64,
    pub line_height_ratio: f64,
}

impl Default for CharCellMeasurer {
    fn default() -> Self {
        Self {
            advance_ratio: 0.6,
            line_height_ratio: 1.2,
        }
    }
}

impl TextMeasurer for CharCellMeasurer {
    fn measure(&self, text: &str, font_size: f64) -> (f64, f64) {
        let chars = text.chars().count() as f64;
        (
            chars * font_size * self.advance_ratio,
            font_size * self.line_height_ratio,
        )
    }
}

/// Ordered pipeline stages consumed by the layout driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutStage {
    Title,
    Legend,
    XAxis,
    PrimaryYAxis,
    SecondaryYAxis,
}

/// Fixed stage order; registration order never affects layout.
pub const STAGE_ORDER: [LayoutStage; 5] = [
    LayoutStage::Title,
    LayoutStage::Legend,
    LayoutStage::XAxis,
    LayoutStage::PrimaryYAxis,
    LayoutStage::SecondaryYAxis,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisPosition {
    Bottom,
    Left,
    Right,
}

/// Title margin input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleSpec {
    pub text: String,
    pub font_size: f64,
}

/// Legend margin input. A floating legend claims no margin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendSpec {
    pub entries: Vec<String>,
    pub font_size: f64,
    pub floating: bool,
}

/// Axis margin input: the rendered labels plus the type/title metadata that
/// drives strip sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisMarginSpec {
    pub position: AxisPosition,
    pub labels: Vec<String>,
    pub label_font_size: f64,
    pub title: Option<String>,
    pub title_font_size: f64,
    pub categorical: bool,
}

/// Full margin-protocol input for one chart frame.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutRequest {
    pub title: Option<TitleSpec>,
    pub legend: Option<LegendSpec>,
    pub x_axis: Option<AxisMarginSpec>,
    pub primary_y_axis: Option<AxisMarginSpec>,
    pub secondary_y_axis: Option<AxisMarginSpec>,
}

/// Final screen strips after both layout passes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartLayout {
    pub bounds: Rect,
    pub title_strip: Option<Rect>,
    pub legend_strip: Option<Rect>,
    pub x_axis_strip: Option<Rect>,
    pub primary_y_axis_strip: Option<Rect>,
    pub secondary_y_axis_strip: Option<Rect>,
    /// Remaining space where series geometry is drawn.
    pub plot: Rect,
    /// Whether dense categorical X labels were rotated to -45 degrees.
    pub x_labels_rotated: bool,
}

/// Runs the two-pass protocol over the fixed stage order.
#[must_use]
pub fn solve(request: &LayoutRequest, bounds: Rect, measurer: &dyn TextMeasurer) -> ChartLayout {
    let mut layout = ChartLayout {
        bounds,
        ..ChartLayout::default()
    };

    // Pass 1: measure. Each stage claims its margin from what is left.
    let mut remaining = bounds;
    let mut margins = Margins::default();
    for stage in STAGE_ORDER {
        remaining = measure_stage(stage, request, remaining, measurer, &mut margins);
    }
    layout.plot = remaining;
    layout.x_labels_rotated = margins.x_labels_rotated;

    // Pass 2: render. Strips are re-issued aligned to the final plot rect.
    for stage in STAGE_ORDER {
        render_stage(stage, request, bounds, layout.plot, &margins, &mut layout);
    }

    layout
}

#[derive(Debug, Default, Clone, Copy)]
struct Margins {
    title_height: f64,
    legend_width: f64,
    x_axis_height: f64,
    primary_y_width: f64,
    secondary_y_width: f64,
    x_labels_rotated: bool,
}

fn measure_stage(
    stage: LayoutStage,
    request: &LayoutRequest,
    remaining: Rect,
    measurer: &dyn TextMeasurer,
    margins: &mut Margins,
) -> Rect {
    match stage {
        LayoutStage::Title => {
            let Some(title) = &request.title else {
                return remaining;
            };
            let (_, height) = measurer.measure(&title.text, title.font_size);
            margins.title_height = height + TITLE_GAP;
            Rect::new(
                remaining.left,
                remaining.top + margins.title_height,
                remaining.right,
                remaining.bottom,
            )
        }
        LayoutStage::Legend => {
            let Some(legend) = &request.legend else {
                return remaining;
            };
            if legend.floating || legend.entries.is_empty() {
                return remaining;
            }
            let widest = legend
                .entries
                .iter()
                .map(|entry| measurer.measure(entry, legend.font_size).0)
                .fold(0.0, f64::max);
            margins.legend_width = widest + LEGEND_MARKER_WIDTH + LEGEND_PADDING * 2.0;
            Rect::new(
                remaining.left,
                remaining.top,
                remaining.right - margins.legend_width,
                remaining.bottom,
            )
        }
        LayoutStage::XAxis => {
            let Some(axis) = &request.x_axis else {
                return remaining;
            };
            let (height, rotated) = x_axis_margin(axis, remaining.width(), measurer);
            margins.x_axis_height = height;
            margins.x_labels_rotated = rotated;
            Rect::new(
                remaining.left,
                remaining.top,
                remaining.right,
                remaining.bottom - height,
            )
        }
        LayoutStage::PrimaryYAxis => {
            let Some(axis) = &request.primary_y_axis else {
                return remaining;
            };
            margins.primary_y_width = y_axis_margin(axis, measurer);
            Rect::new(
                remaining.left + margins.primary_y_width,
                remaining.top,
                remaining.right,
                remaining.bottom,
            )
        }
        LayoutStage::SecondaryYAxis => {
            let Some(axis) = &request.secondary_y_axis else {
                return remaining;
            };
            margins.secondary_y_width = y_axis_margin(axis, measurer);
            Rect::new(
                remaining.left,
                remaining.top,
                remaining.right - margins.secondary_y_width,
                remaining.bottom,
            )
        }
    }
}

fn render_stage(
    stage: LayoutStage,
    request: &LayoutRequest,
    bounds: Rect,
    plot: Rect,
    margins: &Margins,
    layout: &mut ChartLayout,
) {
    match stage {
        LayoutStage::Title => {
            if request.title.is_some() {
                layout.title_strip = Some(Rect::new(
                    bounds.left,
                    bounds.top,
                    bounds.right,
                    bounds.top + margins.title_height,
                ));
            }
        }
        LayoutStage::Legend => {
            if margins.legend_width > 0.0 {
                layout.legend_strip = Some(Rect::new(
                    bounds.right - margins.legend_width,
                    plot.top,
                    bounds.right,
                    plot.bottom,
                ));
            }
        }
        LayoutStage::XAxis => {
            if request.x_axis.is_some() {
                layout.x_axis_strip = Some(Rect::new(
                    plot.left,
                    plot.bottom,
                    plot.right,
                    plot.bottom + margins.x_axis_height,
                ));
            }
        }
        LayoutStage::PrimaryYAxis => {
            if request.primary_y_axis.is_some() {
                layout.primary_y_axis_strip = Some(Rect::new(
                    plot.left - margins.primary_y_width,
                    plot.top,
                    plot.left,
                    plot.bottom,
                ));
            }
        }
        LayoutStage::SecondaryYAxis => {
            if request.secondary_y_axis.is_some() {
                layout.secondary_y_axis_strip = Some(Rect::new(
                    plot.right,
                    plot.top,
                    plot.right + margins.secondary_y_width,
                    plot.bottom,
                ));
            }
        }
    }
}

/// Bottom-strip height for the X axis, rotating dense categorical labels.
///
/// Returns `(height, rotated)`. Labels rotate to -45 degrees when laid out
/// flat they would overlap; the strip then grows to the rotated bounding box.
fn x_axis_margin(
    axis: &AxisMarginSpec,
    available_width: f64,
    measurer: &dyn TextMeasurer,
) -> (f64, bool) {
    let mut max_width: f64 = 0.0;
    let mut max_height: f64 = 0.0;
    let mut total_width = 0.0;
    for label in &axis.labels {
        let (width, height) = measurer.measure(label, axis.label_font_size);
        max_width = max_width.max(width);
        max_height = max_height.max(height);
        total_width += width + TICK_LABEL_GAP;
    }

    let rotated = axis.categorical && total_width > available_width && available_width > 0.0;
    let label_height = if rotated {
        max_width * LABEL_ROTATION_SIN + max_height * LABEL_ROTATION_COS
    } else {
        max_height
    };

    let title_height = axis
        .title
        .as_ref()
        .map(|title| measurer.measure(title, axis.title_font_size).1 + AXIS_TITLE_GAP)
        .unwrap_or(0.0);

    (label_height + title_height + TICK_LABEL_GAP, rotated)
}

/// Side-strip width for a Y axis: widest label plus a rotated title line.
fn y_axis_margin(axis: &AxisMarginSpec, measurer: &dyn TextMeasurer) -> f64 {
    let widest = axis
        .labels
        .iter()
        .map(|label| measurer.measure(label, axis.label_font_size).0)
        .fold(0.0, f64::max);

    let title_width = axis
        .title
        .as_ref()
        .map(|title| measurer.measure(title, axis.title_font_size).1 + AXIS_TITLE_GAP)
        .unwrap_or(0.0);

    widest + title_width + TICK_LABEL_GAP
}
