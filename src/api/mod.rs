mod engine;
mod engine_config;
mod validation;

pub use engine::{AxisRef, ChartEngine, ChartSnapshot, SeriesSnapshot};
pub use engine_config::ChartEngineConfig;
pub use validation::MAX_VALUE_AXES;
