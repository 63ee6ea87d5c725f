pub mod axis;
pub mod partition;
pub mod primitives;
pub mod range;
pub mod scale;
pub mod types;

pub use axis::{AxisCacheKey, AxisId, AxisSpec, DomainKind, RangeContribution, Tick};
pub use partition::{PartitionSlot, TreemapItem, partition_weighted};
pub use range::{NiceScaling, resolve_nice_scaling};
pub use scale::{AxisDimension, PLOT_EDGE_INSET, ScaleKind, ScaleMapper};
pub use types::{DataPoint, Point, Rect};
