//! Pointer hit-testing over already-computed frame geometry.
//!
//! Every strategy consumes the same screen coordinates the frame was laid
//! out with, including animated offsets, so hits always agree with what is
//! on screen. At most one element is hit per query; callers iterate series
//! topmost first and stop at the first hit.

use std::f64::consts::{FRAC_PI_2, TAU};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::types::{Point, Rect};

/// Extra slack added to marker radii and stroke widths so thin geometry
/// stays clickable.
pub const POINTER_TOLERANCE: f64 = 10.0;

/// Resolved hit: series index plus data index within the series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitTarget {
    pub series: usize,
    pub point: usize,
}

/// Nearest marker within `radius + tolerance`, by Euclidean distance.
#[must_use]
pub fn hit_marker(
    pointer: Point,
    centers: &[Point],
    radius: f64,
    tolerance: f64,
) -> Option<usize> {
    let (index, distance) = centers
        .iter()
        .enumerate()
        .map(|(index, center)| (index, pointer.distance_to(*center)))
        .min_by_key(|(_, distance)| OrderedFloat(*distance))?;

    (distance < radius + tolerance).then_some(index)
}

/// Widened-stroke containment over a polyline.
///
/// The pointer hits when it falls inside the stroke outline widened by
/// `tolerance`; the reported index is the path vertex nearest the pointer.
#[must_use]
pub fn hit_polyline(
    pointer: Point,
    vertices: &[Point],
    stroke_width: f64,
    tolerance: f64,
) -> Option<usize> {
    if vertices.len() < 2 {
        return hit_marker(pointer, vertices, stroke_width / 2.0, tolerance);
    }

    let contained = vertices
        .windows(2)
        .map(|pair| segment_distance(pointer, pair[0], pair[1]))
        .min_by_key(|distance| OrderedFloat(*distance))
        .is_some_and(|distance| distance <= stroke_width / 2.0 + tolerance);
    if !contained {
        return None;
    }

    vertices
        .iter()
        .enumerate()
        .min_by_key(|(_, vertex)| OrderedFloat(pointer.distance_to(**vertex)))
        .map(|(index, _)| index)
}

/// Rectangle containment, topmost (last) rectangle first.
#[must_use]
pub fn hit_rects(pointer: Point, rects: &[Rect]) -> Option<usize> {
    rects
        .iter()
        .enumerate()
        .rev()
        .find(|(_, rect)| rect.contains(pointer))
        .map(|(index, _)| index)
}

/// One pie/donut slice in screen space.
///
/// `start_angle` and `sweep` are radians measured clockwise from the
/// -90-degree (12 o'clock) reference used by slice layout. `offset` is the
/// current animated explosion displacement of the slice center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectorGeometry {
    pub center: Point,
    pub offset: Point,
    pub start_angle: f64,
    pub sweep: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
}

/// Angular-sector membership, topmost (last) slice first.
///
/// Each slice is tested against both its resting center and its currently
/// exploded center so a slice animating away from the pointer does not
/// flicker out of hover mid-transition.
#[must_use]
pub fn hit_sectors(pointer: Point, sectors: &[SectorGeometry]) -> Option<usize> {
    sectors
        .iter()
        .enumerate()
        .rev()
        .find(|(_, sector)| {
            sector_contains(pointer, sector.center, sector)
                || sector_contains(
                    pointer,
                    Point::new(
                        sector.center.x + sector.offset.x,
                        sector.center.y + sector.offset.y,
                    ),
                    sector,
                )
        })
        .map(|(index, _)| index)
}

fn sector_contains(pointer: Point, center: Point, sector: &SectorGeometry) -> bool {
    let dx = pointer.x - center.x;
    let dy = pointer.y - center.y;
    let radial = (dx * dx + dy * dy).sqrt();
    if radial < sector.inner_radius || radial > sector.outer_radius {
        return false;
    }

    let angle = normalize_angle(dy.atan2(dx) + FRAC_PI_2);
    let relative = normalize_angle(angle - sector.start_angle);
    relative < sector.sweep
}

fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle % TAU;
    if wrapped < 0.0 { wrapped + TAU } else { wrapped }
}

fn segment_distance(pointer: Point, a: Point, b: Point) -> f64 {
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let length_sq = abx * abx + aby * aby;
    if length_sq == 0.0 {
        return pointer.distance_to(a);
    }

    let t = (((pointer.x - a.x) * abx + (pointer.y - a.y) * aby) / length_sq).clamp(0.0, 1.0);
    pointer.distance_to(Point::new(a.x + t * abx, a.y + t * aby))
}
