use indexmap::IndexSet;
use ordered_float::OrderedFloat;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::range::{
    NiceScaling, categorical_domain, format_tick_label, resolve_nice_scaling, sanitize_range,
};
use crate::core::scale::ScaleKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AxisId(u32);

impl AxisId {
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Whether axis positions are category indices or continuous numbers.
///
/// The tag is fixed at construction from the declared value kind of the
/// series accessor; it is never rediscovered per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DomainKind {
    #[default]
    Continuous,
    Categorical,
}

/// One axis label position, ascending by value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub value: f64,
    pub label: String,
}

/// Everything that can invalidate tick computation, as one equality-comparable
/// value. Key mismatch is the sole trigger for recomputation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AxisCacheKey {
    categorical: bool,
    category_count: usize,
    range_min: OrderedFloat<f64>,
    range_max: OrderedFloat<f64>,
    plot_extent: OrderedFloat<f64>,
    density: OrderedFloat<f64>,
    label_font_size: OrderedFloat<f64>,
    label_format: Option<String>,
    title: Option<String>,
    title_font_size: OrderedFloat<f64>,
}

/// Per-series range input consumed by [`AxisSpec::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RangeContribution {
    pub data_min: f64,
    pub data_max: f64,
    /// Active pan/zoom override; `None` derives the range from data.
    pub view_override: Option<(f64, f64)>,
}

impl RangeContribution {
    #[must_use]
    pub fn from_data(data_min: f64, data_max: f64) -> Self {
        Self {
            data_min,
            data_max,
            view_override: None,
        }
    }
}

/// Axis configuration plus the per-axis range/tick caches it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisSpec {
    id: AxisId,
    scale_kind: ScaleKind,
    domain_kind: DomainKind,
    categories: IndexSet<String>,
    explicit_min: Option<Decimal>,
    explicit_max: Option<Decimal>,
    min_padding: f64,
    max_padding: f64,
    max_ticks: usize,
    tick_density: f64,
    label_font_size: f64,
    label_format: Option<String>,
    title: Option<String>,
    title_font_size: f64,
    #[serde(skip)]
    cached_padded_range: Option<(f64, f64)>,
    #[serde(skip)]
    cached_raw_range: Option<(f64, f64)>,
    #[serde(skip)]
    tick_cache: Option<(AxisCacheKey, Vec<Tick>)>,
}

impl AxisSpec {
    #[must_use]
    pub fn continuous(id: AxisId, scale_kind: ScaleKind) -> Self {
        Self::new(id, scale_kind, DomainKind::Continuous)
    }

    #[must_use]
    pub fn categorical(id: AxisId) -> Self {
        Self::new(id, ScaleKind::Linear, DomainKind::Categorical)
    }

    fn new(id: AxisId, scale_kind: ScaleKind, domain_kind: DomainKind) -> Self {
        Self {
            id,
            scale_kind,
            domain_kind,
            categories: IndexSet::new(),
            explicit_min: None,
            explicit_max: None,
            min_padding: 0.05,
            max_padding: 0.05,
            max_ticks: 10,
            tick_density: 1.0,
            label_font_size: 12.0,
            label_format: None,
            title: None,
            title_font_size: 14.0,
            cached_padded_range: None,
            cached_raw_range: None,
            tick_cache: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> AxisId {
        self.id
    }

    #[must_use]
    pub fn scale_kind(&self) -> ScaleKind {
        self.scale_kind
    }

    #[must_use]
    pub fn domain_kind(&self) -> DomainKind {
        self.domain_kind
    }

    #[must_use]
    pub fn is_categorical(&self) -> bool {
        self.domain_kind == DomainKind::Categorical
    }

    #[must_use]
    pub fn max_ticks(&self) -> usize {
        self.max_ticks
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    #[must_use]
    pub fn label_font_size(&self) -> f64 {
        self.label_font_size
    }

    #[must_use]
    pub fn title_font_size(&self) -> f64 {
        self.title_font_size
    }

    #[must_use]
    pub fn categories(&self) -> &IndexSet<String> {
        &self.categories
    }

    #[must_use]
    pub fn with_paddings(mut self, min_padding: f64, max_padding: f64) -> Self {
        self.min_padding = min_padding;
        self.max_padding = max_padding;
        self.invalidate();
        self
    }

    #[must_use]
    pub fn with_max_ticks(mut self, max_ticks: usize) -> Self {
        self.max_ticks = max_ticks.max(2);
        self.invalidate();
        self
    }

    #[must_use]
    pub fn with_explicit_bounds(mut self, min: Option<Decimal>, max: Option<Decimal>) -> Self {
        self.explicit_min = min;
        self.explicit_max = max;
        self.invalidate();
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self.invalidate();
        self
    }

    #[must_use]
    pub fn with_label_format(mut self, format: impl Into<String>) -> Self {
        self.label_format = Some(format.into());
        self.invalidate();
        self
    }

    #[must_use]
    pub fn with_tick_density(mut self, density: f64) -> Self {
        self.tick_density = if density.is_finite() && density > 0.0 {
            density
        } else {
            1.0
        };
        self.invalidate();
        self
    }

    #[must_use]
    pub fn with_font_sizes(mut self, label_font_size: f64, title_font_size: f64) -> Self {
        self.label_font_size = label_font_size;
        self.title_font_size = title_font_size;
        self.invalidate();
        self
    }

    /// Registers a category, returning its stable index.
    pub fn register_category(&mut self, label: impl Into<String>) -> usize {
        let (index, inserted) = self.categories.insert_full(label.into());
        if inserted {
            self.invalidate();
        }
        index
    }

    /// Drops every cached range and tick set.
    ///
    /// Called at every known mutation site: data change, resize, option or
    /// view-range change. There is no time-based expiry.
    pub fn invalidate(&mut self) {
        trace!(axis = self.id.raw(), "invalidate axis caches");
        self.cached_padded_range = None;
        self.cached_raw_range = None;
        self.tick_cache = None;
    }

    /// Resolves the `[min, max]` domain for this axis.
    ///
    /// Active view overrides always win over auto-fit. The result is cached
    /// until [`AxisSpec::invalidate`] runs; repeated calls with no
    /// intervening change return the identical tuple.
    pub fn resolve(&mut self, contributions: &[RangeContribution], padded: bool) -> (f64, f64) {
        if let Some(cached) = self.cached(padded) {
            return cached;
        }

        let resolved = self.resolve_uncached(contributions, padded);
        if padded {
            self.cached_padded_range = Some(resolved);
        } else {
            self.cached_raw_range = Some(resolved);
        }
        resolved
    }

    fn cached(&self, padded: bool) -> Option<(f64, f64)> {
        if padded {
            self.cached_padded_range
        } else {
            self.cached_raw_range
        }
    }

    fn resolve_uncached(&self, contributions: &[RangeContribution], padded: bool) -> (f64, f64) {
        let overrides: Vec<(f64, f64)> = contributions
            .iter()
            .filter_map(|contribution| contribution.view_override)
            .filter(|(min, max)| min.is_finite() && max.is_finite())
            .collect();
        if !overrides.is_empty() {
            let min = overrides.iter().map(|(min, _)| *min).fold(f64::INFINITY, f64::min);
            let max = overrides
                .iter()
                .map(|(_, max)| *max)
                .fold(f64::NEG_INFINITY, f64::max);
            return sanitize_range(min, max);
        }

        if self.is_categorical() {
            return categorical_domain(
                self.categories.len(),
                self.min_padding,
                self.max_padding,
                padded,
            );
        }

        self.resolve_numeric(contributions, padded)
    }

    fn resolve_numeric(&self, contributions: &[RangeContribution], padded: bool) -> (f64, f64) {
        let mut data_min = f64::INFINITY;
        let mut data_max = f64::NEG_INFINITY;
        for contribution in contributions {
            if contribution.data_min.is_finite() {
                data_min = data_min.min(contribution.data_min);
            }
            if contribution.data_max.is_finite() {
                data_max = data_max.max(contribution.data_max);
            }
        }

        let pinned_min = self.explicit_min.and_then(decimal_bound);
        let pinned_max = self.explicit_max.and_then(decimal_bound);

        let mut min = pinned_min.unwrap_or(data_min);
        let mut max = pinned_max.unwrap_or(data_max);
        if !min.is_finite() || !max.is_finite() {
            return (0.0, 1.0);
        }
        (min, max) = sanitize_range(min, max);

        if !padded || (pinned_min.is_some() && pinned_max.is_some()) {
            if min == max {
                return (min, min + 1.0);
            }
            return (min, max);
        }

        let span = if max > min { max - min } else { 1.0 };
        let padded_min = if pinned_min.is_some() {
            min
        } else {
            min - span * self.min_padding
        };
        let padded_max = if pinned_max.is_some() {
            max
        } else {
            max + span * self.max_padding
        };

        let nice = resolve_nice_scaling(padded_min, padded_max, self.max_ticks);
        (
            if pinned_min.is_some() { min } else { nice.nice_min },
            if pinned_max.is_some() { max } else { nice.nice_max },
        )
    }

    /// Ticks for the resolved range, recomputed only on cache-key mismatch.
    pub fn ticks(&mut self, resolved: (f64, f64), plot_extent: f64) -> &[Tick] {
        let key = self.cache_key(resolved, plot_extent);
        let matches = self
            .tick_cache
            .as_ref()
            .is_some_and(|(cached_key, _)| *cached_key == key);
        if !matches {
            let ticks = self.compute_ticks(resolved);
            self.tick_cache = Some((key, ticks));
        }
        self.tick_cache
            .as_ref()
            .map(|(_, ticks)| ticks.as_slice())
            .unwrap_or(&[])
    }

    fn cache_key(&self, resolved: (f64, f64), plot_extent: f64) -> AxisCacheKey {
        AxisCacheKey {
            categorical: self.is_categorical(),
            category_count: self.categories.len(),
            range_min: OrderedFloat(round_key(resolved.0)),
            range_max: OrderedFloat(round_key(resolved.1)),
            plot_extent: OrderedFloat(round_key(plot_extent)),
            density: OrderedFloat(self.tick_density),
            label_font_size: OrderedFloat(self.label_font_size),
            label_format: self.label_format.clone(),
            title: self.title.clone(),
            title_font_size: OrderedFloat(self.title_font_size),
        }
    }

    fn compute_ticks(&self, resolved: (f64, f64)) -> Vec<Tick> {
        let (min, max) = sanitize_range(resolved.0, resolved.1);

        if self.is_categorical() {
            let first = min.ceil().max(0.0) as usize;
            return self
                .categories
                .iter()
                .enumerate()
                .skip(first)
                .take_while(|(index, _)| (*index as f64) <= max)
                .map(|(index, label)| Tick {
                    value: index as f64,
                    label: label.clone(),
                })
                .collect();
        }

        let effective_ticks = ((self.max_ticks as f64 * self.tick_density).round() as usize).max(2);
        match self.scale_kind {
            ScaleKind::Linear => linear_ticks(min, max, effective_ticks),
            ScaleKind::Logarithmic => log_ladder_ticks(min, max, effective_ticks),
        }
    }
}

fn decimal_bound(bound: Decimal) -> Option<f64> {
    bound.to_f64().filter(|value| value.is_finite())
}

fn round_key(value: f64) -> f64 {
    if value.is_finite() {
        (value * 1_000.0).round() / 1_000.0
    } else {
        0.0
    }
}

fn linear_ticks(min: f64, max: f64, max_ticks: usize) -> Vec<Tick> {
    let scaling: NiceScaling = resolve_nice_scaling(min, max, max_ticks);
    scaling
        .tick_values()
        .into_iter()
        .filter(|value| *value >= min - scaling.spacing * 1e-9 && *value <= max + scaling.spacing * 1e-9)
        .map(|value| Tick {
            label: format_tick_label(value, scaling.spacing),
            value,
        })
        .collect()
}

/// 1-2-5 ladder per decade, evenly thinned down to `max_ticks` entries.
fn log_ladder_ticks(min: f64, max: f64, max_ticks: usize) -> Vec<Tick> {
    let min = min.max(1e-6);
    let max = max.max(min * 1.1);
    let min_exp = min.log10().floor() as i32;
    let max_exp = max.log10().ceil() as i32;

    let mut values = Vec::new();
    for exp in min_exp..=max_exp {
        let decade = 10_f64.powi(exp);
        for multiplier in [1.0, 2.0, 5.0] {
            let candidate = decade * multiplier;
            if candidate >= min && candidate <= max {
                values.push(candidate);
            }
        }
    }
    if values.is_empty() {
        values.push(min);
        values.push(max);
    }

    if values.len() > max_ticks && max_ticks >= 2 {
        let last_index = values.len() - 1;
        let mut sampled = Vec::with_capacity(max_ticks);
        for step in 0..max_ticks {
            let ratio = step as f64 / (max_ticks - 1) as f64;
            let index = (ratio * last_index as f64).round() as usize;
            let value = values[index.min(last_index)];
            if sampled.last() != Some(&value) {
                sampled.push(value);
            }
        }
        values = sampled;
    }

    values
        .into_iter()
        .map(|value| Tick {
            label: format!("{value}"),
            value,
        })
        .collect()
}
