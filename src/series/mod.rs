//! Series model: a closed set of kinds dispatched through a small
//! capability surface (range contribution, frame projection, hit-testing,
//! layout weights). New kinds extend the enum; there is no subclassing.

use std::f64::consts::TAU;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::partition::{TreemapItem, partition_weighted};
use crate::core::scale::{AxisDimension, ScaleMapper};
use crate::core::types::{DataPoint, Point, Rect};
use crate::hit::{POINTER_TOLERANCE, SectorGeometry, hit_marker, hit_polyline, hit_rects, hit_sectors};
use crate::interaction::InteractionFlags;

/// Kind tag deciding range, projection, hit-test and layout behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeriesKind {
    Line,
    Scatter,
    Bar,
    Heatmap,
    Pie,
    Treemap,
}

impl SeriesKind {
    /// Cartesian kinds draw inside the shared plot axes; plane-filling kinds
    /// (pie, treemap) own the whole plot and cannot mix with them.
    #[must_use]
    pub fn is_cartesian(self) -> bool {
        matches!(self, Self::Line | Self::Scatter | Self::Bar | Self::Heatmap)
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Scatter => "scatter",
            Self::Bar => "bar",
            Self::Heatmap => "heatmap",
            Self::Pie => "pie",
            Self::Treemap => "treemap",
        }
    }
}

/// One registered series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSpec {
    name: String,
    kind: SeriesKind,
    data: Vec<DataPoint>,
    /// Exact-decimal weights driving pie sweeps and treemap partitions.
    weights: Vec<Decimal>,
    visible: bool,
    interaction: InteractionFlags,
    marker_radius: f64,
    stroke_width: f64,
    donut_ratio: f64,
    explode_distance: f64,
}

impl SeriesSpec {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: SeriesKind) -> Self {
        Self {
            name: name.into(),
            kind,
            data: Vec::new(),
            weights: Vec::new(),
            visible: true,
            interaction: InteractionFlags::default(),
            marker_radius: 4.0,
            stroke_width: 2.0,
            donut_ratio: 0.0,
            explode_distance: 12.0,
        }
    }

    #[must_use]
    pub fn with_data(mut self, data: Vec<DataPoint>) -> Self {
        self.data = data;
        self
    }

    #[must_use]
    pub fn with_weights(mut self, weights: Vec<Decimal>) -> Self {
        self.weights = weights;
        self
    }

    #[must_use]
    pub fn with_interaction(mut self, interaction: InteractionFlags) -> Self {
        self.interaction = interaction;
        self
    }

    #[must_use]
    pub fn with_marker_radius(mut self, marker_radius: f64) -> Self {
        self.marker_radius = marker_radius;
        self
    }

    #[must_use]
    pub fn with_stroke_width(mut self, stroke_width: f64) -> Self {
        self.stroke_width = stroke_width;
        self
    }

    #[must_use]
    pub fn with_donut_ratio(mut self, donut_ratio: f64) -> Self {
        self.donut_ratio = donut_ratio.clamp(0.0, 0.95);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> SeriesKind {
        self.kind
    }

    #[must_use]
    pub fn data(&self) -> &[DataPoint] {
        &self.data
    }

    #[must_use]
    pub fn weights(&self) -> &[Decimal] {
        &self.weights
    }

    #[must_use]
    pub fn interaction(&self) -> InteractionFlags {
        self.interaction
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn set_data(&mut self, data: Vec<DataPoint>) {
        self.data = data;
    }

    /// Finite X envelope of the data, `None` when nothing contributes.
    #[must_use]
    pub fn x_envelope(&self) -> Option<(f64, f64)> {
        envelope(self.data.iter().map(|point| point.x))
    }

    /// Finite Y envelope scaled by `range_factor` (visibility fade).
    #[must_use]
    pub fn y_envelope(&self, range_factor: f64) -> Option<(f64, f64)> {
        let factor = if range_factor.is_finite() {
            range_factor.clamp(0.0, 1.0)
        } else {
            1.0
        };
        envelope(self.data.iter().map(|point| point.y * factor))
    }

    /// Layout weights consumed by the recursive partitioner.
    #[must_use]
    pub fn treemap_items(&self) -> Vec<TreemapItem> {
        self.weights
            .iter()
            .enumerate()
            .map(|(index, weight)| TreemapItem::new(*weight, index))
            .collect()
    }

    /// Projects the series into hit-testable frame geometry.
    ///
    /// `value_factor` perturbs the rendered values (entrance + visibility²);
    /// the mapping itself is untouched. `hovered_point` drives the pie
    /// explosion offset.
    #[must_use]
    pub fn project(
        &self,
        x_mapper: ScaleMapper,
        y_mapper: ScaleMapper,
        plot: Rect,
        value_factor: f64,
        hovered_point: Option<usize>,
    ) -> SeriesFrame {
        match self.kind {
            SeriesKind::Line => SeriesFrame::Polyline {
                vertices: self.project_points(x_mapper, y_mapper, plot, value_factor),
                stroke_width: self.stroke_width,
            },
            SeriesKind::Scatter => SeriesFrame::Markers {
                centers: self.project_points(x_mapper, y_mapper, plot, value_factor),
                radius: self.marker_radius,
            },
            SeriesKind::Bar => SeriesFrame::Rects {
                rects: self.project_bars(x_mapper, y_mapper, plot, value_factor),
            },
            SeriesKind::Heatmap => SeriesFrame::Rects {
                rects: self.project_heatmap_cells(x_mapper, y_mapper, plot),
            },
            SeriesKind::Pie => SeriesFrame::Sectors {
                sectors: self.project_sectors(plot, value_factor, hovered_point),
            },
            SeriesKind::Treemap => SeriesFrame::Rects {
                rects: self.project_treemap(plot),
            },
        }
    }

    fn project_points(
        &self,
        x_mapper: ScaleMapper,
        y_mapper: ScaleMapper,
        plot: Rect,
        value_factor: f64,
    ) -> Vec<Point> {
        self.data
            .iter()
            .map(|point| {
                Point::new(
                    x_mapper.to_screen(point.x, plot, AxisDimension::Horizontal),
                    y_mapper.to_screen(point.y * value_factor, plot, AxisDimension::Vertical),
                )
            })
            .collect()
    }

    fn project_bars(
        &self,
        x_mapper: ScaleMapper,
        y_mapper: ScaleMapper,
        plot: Rect,
        value_factor: f64,
    ) -> Vec<Rect> {
        const BAR_HALF_SLOT: f64 = 0.4;
        let baseline = y_mapper.to_screen(0.0, plot, AxisDimension::Vertical);
        self.data
            .iter()
            .map(|point| {
                let left = x_mapper.to_screen(point.x - BAR_HALF_SLOT, plot, AxisDimension::Horizontal);
                let right = x_mapper.to_screen(point.x + BAR_HALF_SLOT, plot, AxisDimension::Horizontal);
                let tip = y_mapper.to_screen(point.y * value_factor, plot, AxisDimension::Vertical);
                Rect::new(left, tip.min(baseline), right, tip.max(baseline))
            })
            .collect()
    }

    fn project_heatmap_cells(
        &self,
        x_mapper: ScaleMapper,
        y_mapper: ScaleMapper,
        plot: Rect,
    ) -> Vec<Rect> {
        self.data
            .iter()
            .map(|cell| {
                let left = x_mapper.to_screen(cell.x - 0.5, plot, AxisDimension::Horizontal);
                let right = x_mapper.to_screen(cell.x + 0.5, plot, AxisDimension::Horizontal);
                let low = y_mapper.to_screen(cell.y - 0.5, plot, AxisDimension::Vertical);
                let high = y_mapper.to_screen(cell.y + 0.5, plot, AxisDimension::Vertical);
                Rect::new(left, low.min(high), right, low.max(high))
            })
            .collect()
    }

    fn project_sectors(
        &self,
        plot: Rect,
        value_factor: f64,
        hovered_point: Option<usize>,
    ) -> Vec<SectorGeometry> {
        if self.weights.is_empty() {
            return Vec::new();
        }

        let center = plot.center();
        let radius_factor = value_factor.clamp(0.0, 1.5);
        let outer = (plot.width().min(plot.height()) / 2.0 - self.explode_distance).max(0.0)
            * radius_factor;
        let inner = outer * self.donut_ratio;

        // Same non-positive-weight fallback as the treemap pass.
        let weights: Vec<f64> = self
            .weights
            .iter()
            .map(|weight| {
                if *weight <= Decimal::ZERO {
                    1.0
                } else {
                    decimal_weight(*weight)
                }
            })
            .collect();
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return Vec::new();
        }

        let mut start = 0.0;
        weights
            .iter()
            .enumerate()
            .map(|(index, weight)| {
                let sweep = weight / total * TAU;
                let offset = if hovered_point == Some(index) {
                    let bisector = start + sweep / 2.0;
                    Point::new(
                        bisector.sin() * self.explode_distance,
                        -bisector.cos() * self.explode_distance,
                    )
                } else {
                    Point::default()
                };
                let sector = SectorGeometry {
                    center,
                    offset,
                    start_angle: start,
                    sweep,
                    inner_radius: inner,
                    outer_radius: outer,
                };
                start += sweep;
                sector
            })
            .collect()
    }

    fn project_treemap(&self, plot: Rect) -> Vec<Rect> {
        const TREEMAP_LEAF_PADDING: f64 = 1.0;
        let items = self.treemap_items();
        let mut rects = vec![Rect::default(); items.len()];
        for slot in partition_weighted(&items, plot, TREEMAP_LEAF_PADDING) {
            if let Some(entry) = rects.get_mut(slot.index) {
                *entry = slot.rect;
            }
        }
        rects
    }
}

fn decimal_weight(weight: Decimal) -> f64 {
    use rust_decimal::prelude::ToPrimitive;
    weight.to_f64().filter(|value| value.is_finite()).unwrap_or(0.0)
}

fn envelope(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for value in values {
        if !value.is_finite() {
            continue;
        }
        min = min.min(value);
        max = max.max(value);
    }
    (min <= max).then_some((min, max))
}

/// Screen geometry of one series for the current frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SeriesFrame {
    Markers { centers: Vec<Point>, radius: f64 },
    Polyline { vertices: Vec<Point>, stroke_width: f64 },
    Rects { rects: Vec<Rect> },
    Sectors { sectors: Vec<SectorGeometry> },
}

impl SeriesFrame {
    /// Resolves the data index under `pointer`, if any.
    #[must_use]
    pub fn hit(&self, pointer: Point) -> Option<usize> {
        match self {
            Self::Markers { centers, radius } => {
                hit_marker(pointer, centers, *radius, POINTER_TOLERANCE)
            }
            Self::Polyline {
                vertices,
                stroke_width,
            } => hit_polyline(pointer, vertices, *stroke_width, POINTER_TOLERANCE),
            Self::Rects { rects } => hit_rects(pointer, rects),
            Self::Sectors { sectors } => hit_sectors(pointer, sectors),
        }
    }
}
