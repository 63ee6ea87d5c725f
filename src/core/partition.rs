//! Recursive proportional rectangle subdivision.
//!
//! Used for treemap-style series and multi-series area division. The split
//! is a deterministic binary partition: halve the item list, divide the
//! rectangle proportionally to each half's weight sum, alternate the split
//! orientation per recursion level. Aspect ratios are unbounded.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::types::Rect;

/// Weighted input consumed by the partitioner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreemapItem {
    /// Exact-decimal weight; non-positive weights are replaced by uniform
    /// weight 1 for the partitioning pass.
    pub weight: Decimal,
    /// Caller-side payload reference, reported back on the assigned slot.
    pub index: usize,
}

impl TreemapItem {
    #[must_use]
    pub fn new(weight: Decimal, index: usize) -> Self {
        Self { weight, index }
    }
}

/// One leaf rectangle produced by the partition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartitionSlot {
    pub index: usize,
    pub rect: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SplitOrientation {
    Horizontal,
    Vertical,
}

impl SplitOrientation {
    fn flipped(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

/// Partitions `target` among `items` proportionally to their weights.
///
/// Each leaf is inset by `padding` on every edge. Any item with a
/// non-positive weight forces uniform weights for the whole pass, so the
/// split never divides by a non-positive total. Slots are returned in input
/// order; a degenerate branch aborts silently, leaving siblings laid out.
#[must_use]
pub fn partition_weighted(items: &[TreemapItem], target: Rect, padding: f64) -> Vec<PartitionSlot> {
    if items.is_empty() {
        return Vec::new();
    }

    let weights = sanitized_weights(items);
    let mut slots = Vec::with_capacity(items.len());
    split_recursive(items, &weights, target, padding, SplitOrientation::Horizontal, &mut slots);
    slots
}

fn sanitized_weights(items: &[TreemapItem]) -> Vec<Decimal> {
    let non_positive = items
        .iter()
        .filter(|item| item.weight <= Decimal::ZERO)
        .count();
    if non_positive > 0 {
        warn!(
            count = non_positive,
            "non-positive treemap weights replaced by weight 1 for this pass"
        );
    }
    items
        .iter()
        .map(|item| {
            if item.weight <= Decimal::ZERO {
                Decimal::ONE
            } else {
                item.weight
            }
        })
        .collect()
}

fn split_recursive(
    items: &[TreemapItem],
    weights: &[Decimal],
    target: Rect,
    padding: f64,
    orientation: SplitOrientation,
    slots: &mut Vec<PartitionSlot>,
) {
    if items.len() == 1 {
        slots.push(PartitionSlot {
            index: items[0].index,
            rect: target.inset(padding),
        });
        return;
    }

    let mid = items.len().div_ceil(2);
    let first_sum: Decimal = weights[..mid].iter().copied().sum();
    let second_sum: Decimal = weights[mid..].iter().copied().sum();
    let total = first_sum + second_sum;
    if total <= Decimal::ZERO {
        // Abort only this branch; sibling subtrees stay laid out.
        warn!("non-positive partition branch total, aborting branch");
        return;
    }

    let Some(ratio) = (first_sum / total).to_f64() else {
        return;
    };
    let ratio = ratio.clamp(0.0, 1.0);

    let (first_rect, second_rect) = match orientation {
        SplitOrientation::Horizontal => {
            let split_x = target.left + target.width() * ratio;
            (
                Rect::new(target.left, target.top, split_x, target.bottom),
                Rect::new(split_x, target.top, target.right, target.bottom),
            )
        }
        SplitOrientation::Vertical => {
            let split_y = target.top + target.height() * ratio;
            (
                Rect::new(target.left, target.top, target.right, split_y),
                Rect::new(target.left, split_y, target.right, target.bottom),
            )
        }
    };

    let flipped = orientation.flipped();
    split_recursive(&items[..mid], &weights[..mid], first_rect, padding, flipped, slots);
    split_recursive(&items[mid..], &weights[mid..], second_rect, padding, flipped, slots);
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{TreemapItem, partition_weighted};
    use crate::core::types::Rect;

    fn items(weights: &[i64]) -> Vec<TreemapItem> {
        weights
            .iter()
            .enumerate()
            .map(|(index, weight)| TreemapItem::new(Decimal::from(*weight), index))
            .collect()
    }

    #[test]
    fn reference_split_of_four_four_two() {
        let target = Rect::new(0.0, 0.0, 100.0, 100.0);
        let slots = partition_weighted(&items(&[4, 4, 2]), target, 0.0);
        assert_eq!(slots.len(), 3);

        // First cut is 80/20 along the width; the pair then splits vertically.
        let last = slots.iter().find(|slot| slot.index == 2).expect("slot 2");
        assert!((last.rect.width() - 20.0).abs() <= 1e-9);
        assert!((last.rect.height() - 100.0).abs() <= 1e-9);

        let area_sum: f64 = slots.iter().map(|slot| slot.rect.area()).sum();
        assert!((area_sum - target.area()).abs() <= 1e-9);
    }

    #[test]
    fn zero_weight_becomes_weight_one_for_the_pass() {
        let target = Rect::new(0.0, 0.0, 110.0, 30.0);
        let slots = partition_weighted(&items(&[5, 0, 5]), target, 0.0);
        assert_eq!(slots.len(), 3);

        let area_sum: f64 = slots.iter().map(|slot| slot.rect.area()).sum();
        assert!((area_sum - target.area()).abs() <= 1e-9);

        // Effective weights are [5, 1, 5]: the zero item still gets space.
        let middle = slots.iter().find(|slot| slot.index == 1).expect("slot 1");
        assert!((middle.rect.area() - target.area() / 11.0).abs() <= 1e-9);
    }

    #[test]
    fn degenerate_target_does_not_panic() {
        let target = Rect::new(10.0, 10.0, 10.0, 10.0);
        let slots = partition_weighted(&items(&[1, 2]), target, 2.0);
        assert_eq!(slots.len(), 2);
        for slot in slots {
            assert_eq!(slot.rect.area(), 0.0);
        }
    }

    #[test]
    fn single_item_gets_whole_rect_minus_padding() {
        let target = Rect::new(0.0, 0.0, 50.0, 40.0);
        let slots = partition_weighted(&items(&[7]), target, 4.0);
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].rect, Rect::new(4.0, 4.0, 46.0, 36.0));
    }
}
