use chartgeom::core::{AxisDimension, Rect, ScaleKind, ScaleMapper};

#[test]
fn linear_round_trip_within_tolerance() {
    let mapper = ScaleMapper::new((10.0, 110.0), ScaleKind::Linear);
    let plot = Rect::new(0.0, 0.0, 1000.0, 600.0);

    let original = 42.5;
    let px = mapper.to_screen(original, plot, AxisDimension::Horizontal);
    let recovered = mapper.to_domain(px, plot, AxisDimension::Horizontal);
    assert!((recovered - original).abs() <= 1e-9);
}

#[test]
fn log_round_trip_within_tolerance() {
    let mapper = ScaleMapper::new((1.0, 1000.0), ScaleKind::Logarithmic);
    let plot = Rect::new(0.0, 0.0, 800.0, 400.0);

    let original = 37.5;
    let px = mapper.to_screen(original, plot, AxisDimension::Vertical);
    let recovered = mapper.to_domain(px, plot, AxisDimension::Vertical);
    assert!((recovered - original).abs() / original <= 1e-9);
}

#[test]
fn log_value_ten_sits_one_third_along_the_span() {
    let mapper = ScaleMapper::new((1.0, 1000.0), ScaleKind::Logarithmic);
    // Width 306 leaves an inset span of 300.
    let plot = Rect::new(0.0, 0.0, 306.0, 100.0);
    let x = mapper.to_screen(10.0, plot, AxisDimension::Horizontal);
    assert!((x - 103.0).abs() <= 1e-9);
}

#[test]
fn x_maps_left_to_right_and_y_bottom_to_top() {
    let mapper = ScaleMapper::new((0.0, 1.0), ScaleKind::Linear);
    let plot = Rect::new(0.0, 0.0, 100.0, 100.0);

    assert!(
        mapper.to_screen(0.0, plot, AxisDimension::Horizontal)
            < mapper.to_screen(1.0, plot, AxisDimension::Horizontal)
    );
    assert!(
        mapper.to_screen(0.0, plot, AxisDimension::Vertical)
            > mapper.to_screen(1.0, plot, AxisDimension::Vertical)
    );
}

#[test]
fn edge_inset_keeps_extremes_off_the_border() {
    let mapper = ScaleMapper::new((0.0, 1.0), ScaleKind::Linear);
    let plot = Rect::new(100.0, 50.0, 500.0, 350.0);

    assert_eq!(mapper.to_screen(0.0, plot, AxisDimension::Horizontal), 103.0);
    assert_eq!(mapper.to_screen(1.0, plot, AxisDimension::Horizontal), 497.0);
    assert_eq!(mapper.to_screen(0.0, plot, AxisDimension::Vertical), 347.0);
    assert_eq!(mapper.to_screen(1.0, plot, AxisDimension::Vertical), 53.0);
}

#[test]
fn degenerate_range_maps_to_near_edge() {
    let mapper = ScaleMapper::new((7.0, 7.0), ScaleKind::Linear);
    let plot = Rect::new(0.0, 0.0, 100.0, 100.0);
    assert_eq!(mapper.to_screen(7.0, plot, AxisDimension::Horizontal), 3.0);
    assert_eq!(mapper.to_screen(99.0, plot, AxisDimension::Horizontal), 3.0);
}

#[test]
fn log_domain_is_clamped_positive() {
    let mapper = ScaleMapper::new((-5.0, 1000.0), ScaleKind::Logarithmic);
    let (min, max) = mapper.range();
    assert!(min > 0.0);
    assert!(max >= min * 1.1);

    // Values at or below the clamped floor collapse onto the near edge.
    let plot = Rect::new(0.0, 0.0, 100.0, 100.0);
    let at_floor = mapper.to_screen(min, plot, AxisDimension::Horizontal);
    let below_floor = mapper.to_screen(-80.0, plot, AxisDimension::Horizontal);
    assert_eq!(at_floor, below_floor);
}

#[test]
fn non_finite_values_do_not_poison_geometry() {
    let mapper = ScaleMapper::new((0.0, 100.0), ScaleKind::Linear);
    let plot = Rect::new(0.0, 0.0, 100.0, 100.0);
    let mapped = mapper.to_screen(f64::NAN, plot, AxisDimension::Horizontal);
    assert!(mapped.is_finite());
}
