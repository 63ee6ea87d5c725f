//! Registration-time configuration checks.
//!
//! A misconfigured chart must fail fast and visibly at the point of series
//! registration, never mid-render.

use tracing::warn;

use crate::core::axis::AxisId;
use crate::error::{ChartError, ChartResult};
use crate::interaction::InteractionFlags;
use crate::series::{SeriesKind, SeriesSpec};

/// Maximum number of value axes per chart (primary + secondary).
pub const MAX_VALUE_AXES: usize = 2;

pub(super) fn check_value_axis_count(count: usize) -> ChartResult<()> {
    if count > MAX_VALUE_AXES {
        warn!(count, "rejecting chart with too many value axes");
        return Err(ChartError::TooManyValueAxes { count });
    }
    Ok(())
}

/// Rejects mixing plane-filling kinds (pie, treemap) with anything else.
pub(super) fn check_kind_compatibility(
    candidate: &SeriesSpec,
    existing: &[(SeriesKind, String)],
) -> ChartResult<()> {
    for (kind, name) in existing {
        let compatible = if candidate.kind().is_cartesian() {
            kind.is_cartesian()
        } else {
            *kind == candidate.kind()
        };
        if !compatible {
            warn!(
                series = candidate.name(),
                kind = candidate.kind().label(),
                existing = name.as_str(),
                "rejecting incompatible series mix"
            );
            return Err(ChartError::IncompatibleSeriesKinds {
                series: candidate.name().to_owned(),
                kind: candidate.kind().label(),
                existing_kind: kind.label(),
            });
        }
    }
    Ok(())
}

/// Series sharing an axis must drive it identically.
///
/// Divergent pan/zoom flags would make "who drives the axis" ambiguous, so
/// the divergence is reported instead of silently resolved.
pub(super) fn check_flag_consistency(
    candidate: &SeriesSpec,
    axis: AxisId,
    dimension_is_x: bool,
    peers: &[(InteractionFlags, String)],
) -> ChartResult<()> {
    let flags = candidate.interaction();
    for (peer_flags, peer_name) in peers {
        let agrees = if dimension_is_x {
            peer_flags.pan_x == flags.pan_x && peer_flags.zoom_x == flags.zoom_x
        } else {
            peer_flags.pan_y == flags.pan_y && peer_flags.zoom_y == flags.zoom_y
        };
        if !agrees {
            warn!(
                series = candidate.name(),
                other = peer_name.as_str(),
                axis = axis.raw(),
                "rejecting divergent interaction flags on shared axis"
            );
            return Err(ChartError::InconsistentInteractionFlags {
                axis: axis.raw(),
                series: candidate.name().to_owned(),
                other: peer_name.clone(),
            });
        }
    }
    Ok(())
}
