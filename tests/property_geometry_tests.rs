use chartgeom::core::partition::{TreemapItem, partition_weighted};
use chartgeom::core::range::resolve_nice_scaling;
use chartgeom::core::scale::{AxisDimension, ScaleKind, ScaleMapper};
use chartgeom::core::types::{Point, Rect};
use chartgeom::interaction::{InteractionFlags, SeriesViewState};
use proptest::prelude::*;
use rust_decimal::Decimal;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(96))]

    #[test]
    fn linear_round_trip_over_arbitrary_ranges(
        min in -1.0e6f64..1.0e6,
        span in 1.0e-3f64..1.0e6,
        t in 0.0f64..1.0,
        width in 50.0f64..4000.0,
        height in 50.0f64..4000.0,
    ) {
        let range = (min, min + span);
        let value = min + t * span;
        let plot = Rect::new(0.0, 0.0, width, height);
        let mapper = ScaleMapper::new(range, ScaleKind::Linear);

        for dimension in [AxisDimension::Horizontal, AxisDimension::Vertical] {
            let px = mapper.to_screen(value, plot, dimension);
            let recovered = mapper.to_domain(px, plot, dimension);
            prop_assert!((recovered - value).abs() <= span * 1e-9 + 1e-9);
        }
    }

    #[test]
    fn log_round_trip_over_positive_ranges(
        min_exp in -3.0f64..3.0,
        span_decades in 0.5f64..6.0,
        t in 0.0f64..1.0,
        extent in 100.0f64..3000.0,
    ) {
        let min = 10f64.powf(min_exp);
        let max = min * 10f64.powf(span_decades);
        let value = min * 10f64.powf(t * span_decades);
        let plot = Rect::new(0.0, 0.0, extent, extent);
        let mapper = ScaleMapper::new((min, max), ScaleKind::Logarithmic);

        let px = mapper.to_screen(value, plot, AxisDimension::Horizontal);
        let recovered = mapper.to_domain(px, plot, AxisDimension::Horizontal);
        prop_assert!((recovered - value).abs() <= value * 1e-6);
    }

    #[test]
    fn nice_bounds_always_bracket_the_input(
        min in -1.0e6f64..1.0e6,
        span in 1.0e-3f64..1.0e6,
        max_ticks in 2usize..20,
    ) {
        let max = min + span;
        let scaling = resolve_nice_scaling(min, max, max_ticks);
        prop_assert!(scaling.nice_min <= min);
        prop_assert!(scaling.nice_max >= max);
        prop_assert!(scaling.nice_max > scaling.nice_min);
        prop_assert!(scaling.spacing > 0.0);
    }

    #[test]
    fn partition_conserves_area_for_any_weights(
        weights in prop::collection::vec(0i64..1000, 1..24),
        width in 10.0f64..2000.0,
        height in 10.0f64..2000.0,
    ) {
        let items: Vec<TreemapItem> = weights
            .iter()
            .enumerate()
            .map(|(index, weight)| TreemapItem::new(Decimal::from(*weight), index))
            .collect();
        let target = Rect::new(0.0, 0.0, width, height);
        let slots = partition_weighted(&items, target, 0.0);

        prop_assert_eq!(slots.len(), items.len());
        let area_sum: f64 = slots.iter().map(|slot| slot.rect.area()).sum();
        prop_assert!((area_sum - target.area()).abs() <= target.area() * 1e-9 + 1e-6);
    }

    #[test]
    fn pan_and_reverse_pan_cancel_out(
        dx in -400.0f64..400.0,
        dy in -300.0f64..300.0,
        x_min in -1000.0f64..1000.0,
        x_span in 1.0f64..1.0e4,
        y_min in -1000.0f64..1000.0,
        y_span in 1.0f64..1.0e4,
    ) {
        let plot = Rect::new(0.0, 0.0, 500.0, 400.0);
        let x_range = (x_min, x_min + x_span);
        let y_range = (y_min, y_min + y_span);
        let flags = InteractionFlags::default();

        let mut state = SeriesViewState::default();
        let start = Point::new(250.0, 200.0);
        let dragged = Point::new(start.x + dx, start.y + dy);

        state.begin_pan(start, x_range, y_range);
        state.pan_to(dragged, plot, flags);
        state.end_pan();

        let shifted_x = state.view_x().expect("x override");
        let shifted_y = state.view_y().expect("y override");
        state.begin_pan(dragged, shifted_x, shifted_y);
        state.pan_to(start, plot, flags);
        state.end_pan();

        let (rx_min, rx_max) = state.view_x().expect("restored x");
        let (ry_min, ry_max) = state.view_y().expect("restored y");
        prop_assert!((rx_min - x_range.0).abs() <= x_span * 1e-12 + 1e-9);
        prop_assert!((rx_max - x_range.1).abs() <= x_span * 1e-12 + 1e-9);
        prop_assert!((ry_min - y_range.0).abs() <= y_span * 1e-12 + 1e-9);
        prop_assert!((ry_max - y_range.1).abs() <= y_span * 1e-12 + 1e-9);
    }

    #[test]
    fn zoom_keeps_the_anchor_pixel_fixed(
        factor in 0.2f64..5.0,
        anchor_t in 0.05f64..0.95,
        min in -1.0e4f64..1.0e4,
        span in 1.0f64..1.0e5,
    ) {
        let plot = Rect::new(0.0, 0.0, 640.0, 480.0);
        let range = (min, min + span);
        let mapper = ScaleMapper::new(range, ScaleKind::Linear);
        let anchor = min + anchor_t * span;
        let anchor_px = mapper.to_screen(anchor, plot, AxisDimension::Horizontal);

        let mut state = SeriesViewState::default();
        state.zoom(factor, anchor, anchor, range, range, InteractionFlags::default());

        let zoomed = state.view_x().expect("zoomed range");
        let zoomed_mapper = ScaleMapper::new(zoomed, ScaleKind::Linear);
        let anchor_px_after = zoomed_mapper.to_screen(anchor, plot, AxisDimension::Horizontal);
        prop_assert!((anchor_px_after - anchor_px).abs() <= 1e-6);
    }
}
