//! chartgeom: layout, scaling, animation and hit-testing engine for 2D
//! charting surfaces.
//!
//! The crate turns abstract data coordinates into concrete screen geometry
//! and back: range/tick resolution, a two-pass measure/render layout
//! protocol, recursive treemap partitioning, wall-clock transitions and
//! pointer hit-testing. Drawing, theming and text rendering stay with the
//! host behind narrow interfaces.

pub mod animation;
pub mod api;
pub mod core;
pub mod error;
pub mod hit;
pub mod interaction;
pub mod layout;
pub mod series;
pub mod telemetry;

pub use api::{AxisRef, ChartEngine, ChartEngineConfig};
pub use error::{ChartError, ChartResult};
