use serde::{Deserialize, Serialize};

/// Public engine bootstrap configuration.
///
/// This type is serializable so host applications can persist/load chart
/// setup without inventing their own ad-hoc format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartEngineConfig {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default = "default_title_font_size")]
    pub title_font_size: f64,
    #[serde(default = "default_legend_font_size")]
    pub legend_font_size: f64,
    /// A floating legend overlays the plot and claims no margin.
    #[serde(default)]
    pub legend_floating: bool,
    #[serde(default)]
    pub legend_hidden: bool,
    /// Duration of value-entrance and visibility transitions.
    #[serde(default = "default_animation_duration_ms")]
    pub animation_duration_ms: f64,
    /// Duration of hover emphasis transitions.
    #[serde(default = "default_hover_duration_ms")]
    pub hover_duration_ms: f64,
    /// Wheel-notch factor applied when zooming out (> 1).
    #[serde(default = "default_zoom_out_factor")]
    pub zoom_out_factor: f64,
    /// Wheel-notch factor applied when zooming in (< 1).
    #[serde(default = "default_zoom_in_factor")]
    pub zoom_in_factor: f64,
}

impl Default for ChartEngineConfig {
    fn default() -> Self {
        Self {
            title: None,
            title_font_size: default_title_font_size(),
            legend_font_size: default_legend_font_size(),
            legend_floating: false,
            legend_hidden: false,
            animation_duration_ms: default_animation_duration_ms(),
            hover_duration_ms: default_hover_duration_ms(),
            zoom_out_factor: default_zoom_out_factor(),
            zoom_in_factor: default_zoom_in_factor(),
        }
    }
}

impl ChartEngineConfig {
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_animation_durations(mut self, value_ms: f64, hover_ms: f64) -> Self {
        self.animation_duration_ms = value_ms;
        self.hover_duration_ms = hover_ms;
        self
    }

    #[must_use]
    pub fn with_floating_legend(mut self, floating: bool) -> Self {
        self.legend_floating = floating;
        self
    }
}

fn default_title_font_size() -> f64 {
    16.0
}

fn default_legend_font_size() -> f64 {
    12.0
}

fn default_animation_duration_ms() -> f64 {
    500.0
}

fn default_hover_duration_ms() -> f64 {
    250.0
}

fn default_zoom_out_factor() -> f64 {
    1.25
}

fn default_zoom_in_factor() -> f64 {
    0.8
}
