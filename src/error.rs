use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("chart supports at most two Y axes, got {count}")]
    TooManyValueAxes { count: usize },

    #[error("series '{series}' and '{other}' share axis {axis} with divergent interaction flags")]
    InconsistentInteractionFlags {
        axis: u32,
        series: String,
        other: String,
    },

    #[error("series '{series}' of kind {kind} cannot share a chart with {existing_kind} series")]
    IncompatibleSeriesKinds {
        series: String,
        kind: &'static str,
        existing_kind: &'static str,
    },

    #[error("unknown axis id {0}")]
    UnknownAxis(u32),

    #[error("unknown series '{0}'")]
    UnknownSeries(String),
}
