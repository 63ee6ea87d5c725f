use chartgeom::api::{ChartEngine, ChartEngineConfig};
use chartgeom::core::axis::{AxisId, AxisSpec};
use chartgeom::core::scale::ScaleKind;
use chartgeom::core::types::{DataPoint, Rect};
use chartgeom::layout::{
    AxisMarginSpec, AxisPosition, CharCellMeasurer, LayoutRequest, LegendSpec, TextMeasurer,
    TitleSpec, solve,
};
use chartgeom::series::{SeriesKind, SeriesSpec};

const NOW: f64 = 0.0;

#[test]
fn margin_subtraction_follows_the_stage_order() {
    let request = LayoutRequest {
        title: Some(TitleSpec {
            text: "Quarterly revenue".to_owned(),
            font_size: 16.0,
        }),
        legend: Some(LegendSpec {
            entries: vec!["hardware".to_owned(), "services".to_owned()],
            font_size: 12.0,
            floating: false,
        }),
        x_axis: Some(AxisMarginSpec {
            position: AxisPosition::Bottom,
            labels: vec!["Q1".to_owned(), "Q2".to_owned(), "Q3".to_owned()],
            label_font_size: 12.0,
            title: Some("quarter".to_owned()),
            title_font_size: 14.0,
            categorical: true,
        }),
        primary_y_axis: Some(AxisMarginSpec {
            position: AxisPosition::Left,
            labels: vec!["0".to_owned(), "500".to_owned(), "1000".to_owned()],
            label_font_size: 12.0,
            title: None,
            title_font_size: 14.0,
            categorical: false,
        }),
        secondary_y_axis: Some(AxisMarginSpec {
            position: AxisPosition::Right,
            labels: vec!["0%".to_owned(), "100%".to_owned()],
            label_font_size: 12.0,
            title: None,
            title_font_size: 14.0,
            categorical: false,
        }),
    };

    let bounds = Rect::new(0.0, 0.0, 900.0, 600.0);
    let layout = solve(&request, bounds, &CharCellMeasurer::default());

    let title = layout.title_strip.expect("title");
    let legend = layout.legend_strip.expect("legend");
    let x_strip = layout.x_axis_strip.expect("x strip");
    let left = layout.primary_y_axis_strip.expect("left strip");
    let right = layout.secondary_y_axis_strip.expect("right strip");
    let plot = layout.plot;

    // Title claims the top of the full bounds.
    assert_eq!(title.top, bounds.top);
    assert!(plot.top >= title.bottom);
    // Legend sits outside the plot on the right, beyond the secondary axis.
    assert!(legend.left >= right.right - 1e-9);
    // Axis strips hug the plot rect on their sides.
    assert_eq!(left.right, plot.left);
    assert_eq!(right.left, plot.right);
    assert_eq!(x_strip.top, plot.bottom);
    assert!(!plot.is_degenerate());
}

#[test]
fn second_pass_strips_align_to_the_final_plot() {
    let request = LayoutRequest {
        x_axis: Some(AxisMarginSpec {
            position: AxisPosition::Bottom,
            labels: vec!["0".to_owned(), "50".to_owned(), "100".to_owned()],
            label_font_size: 12.0,
            title: None,
            title_font_size: 14.0,
            categorical: false,
        }),
        primary_y_axis: Some(AxisMarginSpec {
            position: AxisPosition::Left,
            labels: vec!["0".to_owned(), "250000".to_owned()],
            label_font_size: 12.0,
            title: None,
            title_font_size: 14.0,
            categorical: false,
        }),
        ..LayoutRequest::default()
    };

    let bounds = Rect::new(0.0, 0.0, 640.0, 480.0);
    let layout = solve(&request, bounds, &CharCellMeasurer::default());

    // Pass 1 measures the X strip against the pre-Y-margin width; pass 2
    // re-issues it spanning exactly the final plot width.
    let x_strip = layout.x_axis_strip.expect("x strip");
    assert_eq!(x_strip.left, layout.plot.left);
    assert_eq!(x_strip.right, layout.plot.right);
}

#[test]
fn rotation_kicks_in_only_for_dense_categorical_labels() {
    let dense_labels: Vec<String> = (0..30).map(|i| format!("segment-{i:02}-extended")).collect();

    let make_request = |categorical: bool| LayoutRequest {
        x_axis: Some(AxisMarginSpec {
            position: AxisPosition::Bottom,
            labels: dense_labels.clone(),
            label_font_size: 12.0,
            title: None,
            title_font_size: 14.0,
            categorical,
        }),
        ..LayoutRequest::default()
    };

    let bounds = Rect::new(0.0, 0.0, 500.0, 400.0);
    let measurer = CharCellMeasurer::default();

    let categorical = solve(&make_request(true), bounds, &measurer);
    let numeric = solve(&make_request(false), bounds, &measurer);

    assert!(categorical.x_labels_rotated);
    // Numeric axes never rotate; density is handled by tick thinning.
    assert!(!numeric.x_labels_rotated);

    let rotated_height = categorical.x_axis_strip.expect("strip").height();
    let flat_height = numeric.x_axis_strip.expect("strip").height();
    assert!(rotated_height > flat_height);
}

#[test]
fn engine_layout_omits_axis_strips_for_plane_filling_charts() {
    let config = ChartEngineConfig::default();
    let x_axis = AxisSpec::continuous(AxisId::new(0), ScaleKind::Linear);
    let y_axis = AxisSpec::continuous(AxisId::new(1), ScaleKind::Linear);
    let mut engine = ChartEngine::new(config, x_axis, y_axis);

    let pie = SeriesSpec::new("share", SeriesKind::Pie).with_weights(vec![
        rust_decimal::Decimal::from(3),
        rust_decimal::Decimal::from(7),
    ]);
    engine.add_series(pie, AxisId::new(1), NOW).expect("add pie");

    let layout = engine.layout(
        Rect::new(0.0, 0.0, 400.0, 400.0),
        &CharCellMeasurer::default(),
        NOW,
    );
    assert!(layout.x_axis_strip.is_none());
    assert!(layout.primary_y_axis_strip.is_none());
    assert!(layout.legend_strip.is_some());
}

#[test]
fn engine_layout_reserves_margins_for_cartesian_charts() {
    let config = ChartEngineConfig::default().with_title("Throughput");
    let x_axis = AxisSpec::continuous(AxisId::new(0), ScaleKind::Linear);
    let y_axis = AxisSpec::continuous(AxisId::new(1), ScaleKind::Linear).with_title("MB/s");
    let mut engine = ChartEngine::new(config, x_axis, y_axis);

    let data: Vec<DataPoint> = (0..20)
        .map(|i| DataPoint::new(f64::from(i), f64::from(i * i)))
        .collect();
    engine
        .add_series(
            SeriesSpec::new("throughput", SeriesKind::Line).with_data(data),
            AxisId::new(1),
            NOW,
        )
        .expect("add line");

    let bounds = Rect::new(0.0, 0.0, 800.0, 600.0);
    let layout = engine.layout(bounds, &CharCellMeasurer::default(), NOW);

    assert!(layout.title_strip.is_some());
    assert!(layout.x_axis_strip.is_some());
    assert!(layout.primary_y_axis_strip.is_some());
    assert!(layout.secondary_y_axis_strip.is_none());
    assert!(layout.plot.width() < bounds.width());
    assert!(layout.plot.height() < bounds.height());
}

#[test]
fn custom_measurer_drives_margin_sizes() {
    struct TallText;
    impl TextMeasurer for TallText {
        fn measure(&self, text: &str, font_size: f64) -> (f64, f64) {
            (text.chars().count() as f64 * font_size * 0.5, font_size * 3.0)
        }
    }

    let request = LayoutRequest {
        x_axis: Some(AxisMarginSpec {
            position: AxisPosition::Bottom,
            labels: vec!["0".to_owned()],
            label_font_size: 12.0,
            title: None,
            title_font_size: 14.0,
            categorical: false,
        }),
        ..LayoutRequest::default()
    };

    let bounds = Rect::new(0.0, 0.0, 400.0, 300.0);
    let tall = solve(&request, bounds, &TallText);
    let normal = solve(&request, bounds, &CharCellMeasurer::default());
    let tall_strip = tall.x_axis_strip.expect("tall strip");
    let normal_strip = normal.x_axis_strip.expect("normal strip");
    assert!(tall_strip.height() > normal_strip.height());
}
