use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::animation::SeriesAnimation;
use crate::core::axis::{AxisId, AxisSpec, RangeContribution};
use crate::core::scale::{AxisDimension, ScaleKind, ScaleMapper};
use crate::core::types::{DataPoint, Point, Rect};
use crate::error::{ChartError, ChartResult};
use crate::hit::HitTarget;
use crate::interaction::SeriesViewState;
use crate::layout::{
    AxisMarginSpec, AxisPosition, ChartLayout, LayoutRequest, LegendSpec, TextMeasurer, TitleSpec,
};
use crate::series::{SeriesFrame, SeriesSpec};

use super::engine_config::ChartEngineConfig;
use super::validation::{check_flag_consistency, check_kind_compatibility, check_value_axis_count};

/// Axis handle used by the range/scale entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisRef {
    X,
    Y(AxisId),
}

#[derive(Debug, Clone, PartialEq)]
struct SeriesEntry {
    spec: SeriesSpec,
    y_axis: AxisId,
    view: SeriesViewState,
    animation: SeriesAnimation,
}

/// Serializable view of the engine state for host-side persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSnapshot {
    pub config: ChartEngineConfig,
    pub series: Vec<SeriesSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSnapshot {
    pub name: String,
    pub kind: String,
    pub visible: bool,
    pub view_x: Option<(f64, f64)>,
    pub view_y: Option<(f64, f64)>,
}

/// Owning facade over axes, series, gestures and animation.
///
/// Single-threaded by design: the host calls into the engine once per
/// render request and forwards pointer events in down/move/up order from
/// the same thread. Every sampling entry point takes the current wall-clock
/// timestamp in milliseconds.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartEngine {
    config: ChartEngineConfig,
    x_axis: AxisSpec,
    y_axes: SmallVec<[AxisSpec; 2]>,
    series: Vec<SeriesEntry>,
    hovered: Option<HitTarget>,
    last_bounds: Option<Rect>,
    last_plot: Option<Rect>,
}

impl ChartEngine {
    #[must_use]
    pub fn new(config: ChartEngineConfig, x_axis: AxisSpec, primary_y_axis: AxisSpec) -> Self {
        Self {
            config,
            x_axis,
            y_axes: SmallVec::from_iter([primary_y_axis]),
            series: Vec::new(),
            hovered: None,
            last_bounds: None,
            last_plot: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ChartEngineConfig {
        &self.config
    }

    #[must_use]
    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    #[must_use]
    pub fn plot_rect(&self) -> Option<Rect> {
        self.last_plot
    }

    #[must_use]
    pub fn hovered(&self) -> Option<HitTarget> {
        self.hovered
    }

    #[must_use]
    pub fn primary_y_axis_id(&self) -> AxisId {
        self.y_axes[0].id()
    }

    /// Adds the secondary value axis.
    pub fn add_secondary_y_axis(&mut self, axis: AxisSpec) -> ChartResult<AxisId> {
        check_value_axis_count(self.y_axes.len() + 1)?;
        let id = axis.id();
        self.y_axes.push(axis);
        Ok(id)
    }

    /// Registers a category on the X axis, returning its stable index.
    pub fn register_x_category(&mut self, label: impl Into<String>) -> usize {
        self.x_axis.register_category(label)
    }

    /// Registers a series bound to `y_axis`, validating the configuration.
    ///
    /// Misconfiguration (incompatible kinds, divergent interaction flags on
    /// a shared axis, unknown axis) is rejected here so it can never
    /// surface mid-render.
    pub fn add_series(
        &mut self,
        spec: SeriesSpec,
        y_axis: AxisId,
        now_ms: f64,
    ) -> ChartResult<()> {
        if !self.y_axes.iter().any(|axis| axis.id() == y_axis) {
            return Err(ChartError::UnknownAxis(y_axis.raw()));
        }

        let existing_kinds: Vec<_> = self
            .series
            .iter()
            .map(|entry| (entry.spec.kind(), entry.spec.name().to_owned()))
            .collect();
        check_kind_compatibility(&spec, &existing_kinds)?;

        if spec.kind().is_cartesian() {
            let x_peers: Vec<_> = self
                .series
                .iter()
                .filter(|entry| entry.spec.kind().is_cartesian())
                .map(|entry| (entry.spec.interaction(), entry.spec.name().to_owned()))
                .collect();
            check_flag_consistency(&spec, self.x_axis.id(), true, &x_peers)?;

            let y_peers: Vec<_> = self
                .series
                .iter()
                .filter(|entry| entry.spec.kind().is_cartesian() && entry.y_axis == y_axis)
                .map(|entry| (entry.spec.interaction(), entry.spec.name().to_owned()))
                .collect();
            check_flag_consistency(&spec, y_axis, false, &y_peers)?;
        }

        debug!(
            series = spec.name(),
            kind = spec.kind().label(),
            "register series"
        );
        self.series.push(SeriesEntry {
            spec,
            y_axis,
            view: SeriesViewState::default(),
            animation: SeriesAnimation::new(
                now_ms,
                self.config.animation_duration_ms,
                self.config.hover_duration_ms,
            ),
        });
        self.invalidate_axes();
        Ok(())
    }

    /// Replaces the series data and replays its entrance transition.
    pub fn set_series_data(
        &mut self,
        name: &str,
        data: Vec<DataPoint>,
        now_ms: f64,
    ) -> ChartResult<()> {
        let index = self.series_index(name)?;
        trace!(series = name, count = data.len(), "replace series data");
        let entry = &mut self.series[index];
        entry.spec.set_data(data);
        entry.animation.restart_entrance(now_ms);
        self.invalidate_axes();
        Ok(())
    }

    /// Flips series visibility, starting a fade from the in-flight value.
    pub fn set_series_visible(&mut self, name: &str, visible: bool, now_ms: f64) -> ChartResult<()> {
        let index = self.series_index(name)?;
        let entry = &mut self.series[index];
        entry.spec.set_visible(visible);
        entry.animation.set_visible(now_ms, visible);
        self.invalidate_axes();
        Ok(())
    }

    /// Updates hover emphasis: the hovered series stays at full emphasis,
    /// siblings dim; clearing the hover restores everyone.
    pub fn set_hovered(&mut self, target: Option<HitTarget>, now_ms: f64) {
        if self.hovered == target {
            return;
        }
        self.hovered = target;
        for (index, entry) in self.series.iter_mut().enumerate() {
            let emphasized = target.is_none_or(|hit| hit.series == index);
            entry.animation.set_emphasized(now_ms, emphasized);
        }
    }

    #[must_use]
    pub fn hover_factor(&self, name: &str, now_ms: f64) -> Option<f64> {
        self.series
            .iter()
            .find(|entry| entry.spec.name() == name)
            .map(|entry| entry.animation.hover_factor(now_ms))
    }

    /// Resolves the `[min, max]` domain of an axis.
    pub fn resolve_range(
        &mut self,
        axis: AxisRef,
        padded: bool,
        now_ms: f64,
    ) -> ChartResult<(f64, f64)> {
        match axis {
            AxisRef::X => Ok(self.resolve_x(padded, now_ms)),
            AxisRef::Y(id) => {
                if !self.y_axes.iter().any(|axis| axis.id() == id) {
                    return Err(ChartError::UnknownAxis(id.raw()));
                }
                Ok(self.resolve_y(id, padded, now_ms))
            }
        }
    }

    /// Maps a domain value to a screen coordinate within `plot`.
    pub fn scale_value(
        &mut self,
        value: f64,
        axis: AxisRef,
        plot: Rect,
        now_ms: f64,
    ) -> ChartResult<f64> {
        let (mapper, dimension) = self.mapper_for(axis, now_ms)?;
        Ok(mapper.to_screen(value, plot, dimension))
    }

    /// Exact inverse of [`ChartEngine::scale_value`].
    pub fn unscale_coord(
        &mut self,
        coordinate: f64,
        axis: AxisRef,
        plot: Rect,
        now_ms: f64,
    ) -> ChartResult<f64> {
        let (mapper, dimension) = self.mapper_for(axis, now_ms)?;
        Ok(mapper.to_domain(coordinate, plot, dimension))
    }

    /// Runs the two-pass margin protocol and caches the resulting plot rect
    /// for pointer-event handling.
    pub fn layout(&mut self, bounds: Rect, measurer: &dyn TextMeasurer, now_ms: f64) -> ChartLayout {
        self.begin_frame(bounds, now_ms);

        let has_cartesian = self
            .series
            .iter()
            .any(|entry| entry.spec.kind().is_cartesian());

        let mut request = LayoutRequest {
            title: self.config.title.as_ref().map(|text| TitleSpec {
                text: text.clone(),
                font_size: self.config.title_font_size,
            }),
            ..LayoutRequest::default()
        };

        if !self.config.legend_hidden && !self.series.is_empty() {
            request.legend = Some(LegendSpec {
                entries: self
                    .series
                    .iter()
                    .map(|entry| entry.spec.name().to_owned())
                    .collect(),
                font_size: self.config.legend_font_size,
                floating: self.config.legend_floating,
            });
        }

        if has_cartesian {
            let x_range = self.resolve_x(true, now_ms);
            let x_labels: Vec<String> = self
                .x_axis
                .ticks(x_range, bounds.width())
                .iter()
                .map(|tick| tick.label.clone())
                .collect();
            request.x_axis = Some(AxisMarginSpec {
                position: AxisPosition::Bottom,
                labels: x_labels,
                label_font_size: self.x_axis.label_font_size(),
                title: self.x_axis.title().map(str::to_owned),
                title_font_size: self.x_axis.title_font_size(),
                categorical: self.x_axis.is_categorical(),
            });

            request.primary_y_axis =
                self.y_axis_margin_spec(0, AxisPosition::Left, bounds, now_ms);
            request.secondary_y_axis =
                self.y_axis_margin_spec(1, AxisPosition::Right, bounds, now_ms);
        }

        let layout = crate::layout::solve(&request, bounds, measurer);
        self.last_bounds = Some(bounds);
        self.last_plot = Some(layout.plot);
        layout
    }

    /// Projects every series into frame geometry, bottom-most first.
    #[must_use]
    pub fn frames(&mut self, now_ms: f64) -> Vec<SeriesFrame> {
        let Some(plot) = self.last_plot else {
            return Vec::new();
        };

        let x_mapper = ScaleMapper::new(self.resolve_x(true, now_ms), self.x_axis.scale_kind());
        let axis_meta: SmallVec<[(AxisId, ScaleKind); 2]> = self
            .y_axes
            .iter()
            .map(|axis| (axis.id(), axis.scale_kind()))
            .collect();
        let mut y_mappers: SmallVec<[(AxisId, ScaleMapper); 2]> = SmallVec::new();
        for (id, kind) in axis_meta {
            y_mappers.push((id, ScaleMapper::new(self.resolve_y(id, true, now_ms), kind)));
        }

        let hovered = self.hovered;
        self.series
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let y_mapper = y_mappers
                    .iter()
                    .find(|(id, _)| *id == entry.y_axis)
                    .map(|(_, mapper)| *mapper)
                    .unwrap_or(x_mapper);
                let hovered_point = hovered
                    .filter(|hit| hit.series == index)
                    .map(|hit| hit.point);
                entry.spec.project(
                    x_mapper,
                    y_mapper,
                    plot,
                    entry.animation.value_factor(now_ms),
                    hovered_point,
                )
            })
            .collect()
    }

    /// Resolves the element under the pointer, topmost series first.
    ///
    /// At most one element is hit per query; fully faded series are skipped.
    #[must_use]
    pub fn hit_test(&mut self, pointer: Point, now_ms: f64) -> Option<HitTarget> {
        let frames = self.frames(now_ms);
        let visibilities: Vec<f64> = self
            .series
            .iter()
            .map(|entry| entry.animation.visibility_factor(now_ms))
            .collect();

        frames
            .iter()
            .enumerate()
            .rev()
            .filter(|(index, _)| visibilities[*index] > 0.01)
            .find_map(|(index, frame)| {
                frame.hit(pointer).map(|point| HitTarget {
                    series: index,
                    point,
                })
            })
    }

    /// Pointer-down: arms a pan for every series permitted to pan, with the
    /// currently resolved padded ranges as the gesture snapshot.
    pub fn on_pointer_down(&mut self, pointer: Point, now_ms: f64) {
        let Some(plot) = self.last_plot else {
            return;
        };
        if !plot.contains(pointer) {
            return;
        }

        let x_range = self.resolve_x(true, now_ms);
        for index in 0..self.series.len() {
            let flags = self.series[index].spec.interaction();
            if !flags.pan_x && !flags.pan_y {
                continue;
            }
            let y_range = self.resolve_y(self.series[index].y_axis, true, now_ms);
            self.series[index].view.begin_pan(pointer, x_range, y_range);
        }
    }

    /// Pointer-move: continues an active pan, otherwise drives hover state.
    pub fn on_pointer_move(&mut self, pointer: Point, now_ms: f64) {
        let Some(plot) = self.last_plot else {
            return;
        };

        let any_panning = self.series.iter().any(|entry| entry.view.is_panning());
        if any_panning {
            for entry in &mut self.series {
                if entry.view.is_panning() {
                    let flags = entry.spec.interaction();
                    entry.view.pan_to(pointer, plot, flags);
                }
            }
            self.invalidate_axes();
            return;
        }

        let target = self.hit_test(pointer, now_ms);
        self.set_hovered(target, now_ms);
    }

    /// Pointer-up: finalizes the gesture; overrides persist until reset.
    pub fn on_pointer_up(&mut self) {
        for entry in &mut self.series {
            if entry.view.is_panning() {
                entry.view.end_pan();
            }
        }
    }

    /// Wheel zoom anchored at the domain value under the pointer.
    pub fn on_wheel(&mut self, pointer: Point, delta_y: f64, now_ms: f64) {
        let Some(plot) = self.last_plot else {
            return;
        };
        if !plot.contains(pointer) || delta_y == 0.0 || !delta_y.is_finite() {
            return;
        }

        let factor = if delta_y > 0.0 {
            self.config.zoom_out_factor
        } else {
            self.config.zoom_in_factor
        };

        let x_range = self.resolve_x(true, now_ms);
        let x_mapper = ScaleMapper::new(x_range, self.x_axis.scale_kind());
        let anchor_x = x_mapper.to_domain(pointer.x, plot, AxisDimension::Horizontal);

        for index in 0..self.series.len() {
            let flags = self.series[index].spec.interaction();
            if !flags.zoom_x && !flags.zoom_y {
                continue;
            }
            let y_axis = self.series[index].y_axis;
            let y_kind = self
                .y_axes
                .iter()
                .find(|axis| axis.id() == y_axis)
                .map(AxisSpec::scale_kind)
                .unwrap_or_default();
            let y_range = self.resolve_y(y_axis, true, now_ms);
            let y_mapper = ScaleMapper::new(y_range, y_kind);
            let anchor_y = y_mapper.to_domain(pointer.y, plot, AxisDimension::Vertical);

            self.series[index]
                .view
                .zoom(factor, anchor_x, anchor_y, x_range, y_range, flags);
        }
        self.invalidate_axes();
    }

    /// Clears every pan/zoom override, reverting to auto-fit.
    pub fn reset_view(&mut self) {
        debug!("reset view overrides");
        for entry in &mut self.series {
            entry.view.reset();
        }
        self.invalidate_axes();
    }

    #[must_use]
    pub fn is_panning(&self) -> bool {
        self.series.iter().any(|entry| entry.view.is_panning())
    }

    /// Serializes the persistable engine state.
    pub fn snapshot_json_pretty(&self) -> ChartResult<String> {
        let snapshot = ChartSnapshot {
            config: self.config.clone(),
            series: self
                .series
                .iter()
                .map(|entry| SeriesSnapshot {
                    name: entry.spec.name().to_owned(),
                    kind: entry.spec.kind().label().to_owned(),
                    visible: entry.spec.is_visible(),
                    view_x: entry.view.view_x(),
                    view_y: entry.view.view_y(),
                })
                .collect(),
        };
        serde_json::to_string_pretty(&snapshot)
            .map_err(|err| ChartError::InvalidData(format!("snapshot serialization: {err}")))
    }

    fn series_index(&self, name: &str) -> ChartResult<usize> {
        self.series
            .iter()
            .position(|entry| entry.spec.name() == name)
            .ok_or_else(|| {
                warn!(series = name, "unknown series");
                ChartError::UnknownSeries(name.to_owned())
            })
    }

    /// Invalidate every axis cache; called at each mutation site.
    fn invalidate_axes(&mut self) {
        self.x_axis.invalidate();
        for axis in &mut self.y_axes {
            axis.invalidate();
        }
    }

    /// Per-frame cache upkeep: a resize or an in-flight animation changes
    /// range contributions, so the affected caches are dropped eagerly.
    fn begin_frame(&mut self, bounds: Rect, now_ms: f64) {
        if self.last_bounds != Some(bounds) {
            trace!("bounds changed, invalidating axis caches");
            self.invalidate_axes();
        }
        if self
            .series
            .iter()
            .any(|entry| !entry.animation.is_idle(now_ms))
        {
            self.invalidate_axes();
        }
    }

    fn resolve_x(&mut self, padded: bool, now_ms: f64) -> (f64, f64) {
        let contributions: Vec<RangeContribution> = self
            .series
            .iter()
            .filter(|entry| entry.spec.kind().is_cartesian())
            .filter(|entry| entry.animation.visibility_factor(now_ms) > 0.0)
            .map(|entry| {
                let (data_min, data_max) = entry.spec.x_envelope().unwrap_or((f64::NAN, f64::NAN));
                RangeContribution {
                    data_min,
                    data_max,
                    view_override: entry.view.view_x(),
                }
            })
            .collect();
        self.x_axis.resolve(&contributions, padded)
    }

    fn resolve_y(&mut self, axis_id: AxisId, padded: bool, now_ms: f64) -> (f64, f64) {
        let contributions: Vec<RangeContribution> = self
            .series
            .iter()
            .filter(|entry| entry.y_axis == axis_id && entry.spec.kind().is_cartesian())
            .filter(|entry| entry.animation.visibility_factor(now_ms) > 0.0)
            .map(|entry| {
                let factor = entry.animation.range_factor(now_ms);
                let (data_min, data_max) = entry
                    .spec
                    .y_envelope(factor)
                    .unwrap_or((f64::NAN, f64::NAN));
                RangeContribution {
                    data_min,
                    data_max,
                    view_override: entry.view.view_y(),
                }
            })
            .collect();

        let Some(axis) = self.y_axes.iter_mut().find(|axis| axis.id() == axis_id) else {
            return (0.0, 1.0);
        };
        axis.resolve(&contributions, padded)
    }

    fn mapper_for(&mut self, axis: AxisRef, now_ms: f64) -> ChartResult<(ScaleMapper, AxisDimension)> {
        match axis {
            AxisRef::X => {
                let range = self.resolve_x(true, now_ms);
                Ok((
                    ScaleMapper::new(range, self.x_axis.scale_kind()),
                    AxisDimension::Horizontal,
                ))
            }
            AxisRef::Y(id) => {
                let kind = self
                    .y_axes
                    .iter()
                    .find(|axis| axis.id() == id)
                    .map(AxisSpec::scale_kind)
                    .ok_or(ChartError::UnknownAxis(id.raw()))?;
                let range = self.resolve_y(id, true, now_ms);
                Ok((ScaleMapper::new(range, kind), AxisDimension::Vertical))
            }
        }
    }

    fn y_axis_margin_spec(
        &mut self,
        slot: usize,
        position: AxisPosition,
        bounds: Rect,
        now_ms: f64,
    ) -> Option<AxisMarginSpec> {
        if slot >= self.y_axes.len() {
            return None;
        }
        let axis_id = self.y_axes[slot].id();
        let range = self.resolve_y(axis_id, true, now_ms);
        let axis = &mut self.y_axes[slot];
        let labels: Vec<String> = axis
            .ticks(range, bounds.height())
            .iter()
            .map(|tick| tick.label.clone())
            .collect();
        Some(AxisMarginSpec {
            position,
            labels,
            label_font_size: axis.label_font_size(),
            title: axis.title().map(str::to_owned),
            title_font_size: axis.title_font_size(),
            categorical: axis.is_categorical(),
        })
    }
}
