use chartgeom::core::axis::{AxisId, AxisSpec, RangeContribution};
use chartgeom::core::scale::ScaleKind;
use rust_decimal::Decimal;

fn contribution(min: f64, max: f64) -> RangeContribution {
    RangeContribution::from_data(min, max)
}

#[test]
fn padded_numeric_range_expands_to_nice_bounds() {
    let mut axis = AxisSpec::continuous(AxisId::new(0), ScaleKind::Linear);
    let (min, max) = axis.resolve(&[contribution(3.0, 97.0)], true);
    assert!(min <= 3.0);
    assert!(max >= 97.0);
    // Nice expansion lands on spacing multiples.
    assert_eq!(min % 10.0, 0.0);
    assert_eq!(max % 10.0, 0.0);
}

#[test]
fn unpadded_numeric_range_is_the_data_envelope() {
    let mut axis = AxisSpec::continuous(AxisId::new(1), ScaleKind::Linear);
    let resolved = axis.resolve(&[contribution(3.0, 97.0), contribution(-4.0, 50.0)], false);
    assert_eq!(resolved, (-4.0, 97.0));
}

#[test]
fn explicit_decimal_bounds_pin_their_ends() {
    let mut axis = AxisSpec::continuous(AxisId::new(2), ScaleKind::Linear)
        .with_explicit_bounds(Some(Decimal::ZERO), Some(Decimal::from(250)));
    let resolved = axis.resolve(&[contribution(13.0, 197.0)], true);
    assert_eq!(resolved, (0.0, 250.0));
}

#[test]
fn one_pinned_end_still_pads_the_other() {
    let mut axis = AxisSpec::continuous(AxisId::new(3), ScaleKind::Linear)
        .with_explicit_bounds(Some(Decimal::ZERO), None);
    let (min, max) = axis.resolve(&[contribution(10.0, 97.0)], true);
    assert_eq!(min, 0.0);
    assert!(max >= 97.0);
}

#[test]
fn view_override_union_supersedes_auto_fit() {
    let mut axis = AxisSpec::continuous(AxisId::new(4), ScaleKind::Linear);
    let contributions = [
        RangeContribution {
            data_min: 0.0,
            data_max: 500.0,
            view_override: Some((10.0, 30.0)),
        },
        RangeContribution {
            data_min: 0.0,
            data_max: 500.0,
            view_override: Some((20.0, 45.0)),
        },
    ];
    assert_eq!(axis.resolve(&contributions, true), (10.0, 45.0));
}

#[test]
fn resolve_returns_identical_cached_tuple_until_invalidated() {
    let mut axis = AxisSpec::continuous(AxisId::new(5), ScaleKind::Linear);
    let contributions = [contribution(0.0, 97.0)];

    let first = axis.resolve(&contributions, true);
    let second = axis.resolve(&contributions, true);
    assert_eq!(first, second);

    // Without invalidation the cache also shadows changed contributions.
    let stale = axis.resolve(&[contribution(0.0, 9_999.0)], true);
    assert_eq!(stale, first);

    axis.invalidate();
    let fresh = axis.resolve(&[contribution(0.0, 9_999.0)], true);
    assert!(fresh.1 >= 9_999.0);
}

#[test]
fn nan_and_empty_inputs_fall_back_to_unit_domain() {
    let mut axis = AxisSpec::continuous(AxisId::new(6), ScaleKind::Linear);
    assert_eq!(axis.resolve(&[], true), (0.0, 1.0));

    axis.invalidate();
    let resolved = axis.resolve(&[contribution(f64::NAN, f64::NAN)], true);
    assert_eq!(resolved, (0.0, 1.0));
}

#[test]
fn categorical_resolution_counts_distinct_categories() {
    let mut axis = AxisSpec::categorical(AxisId::new(7));
    for label in ["mon", "tue", "wed", "thu", "fri"] {
        axis.register_category(label);
    }
    // Re-registering an existing label must not grow the domain.
    axis.register_category("tue");

    let (min, max) = axis.resolve(&[], true);
    assert!((min - (-0.2)).abs() <= 1e-12);
    assert!((max - 4.2).abs() <= 1e-12);
}

#[test]
fn categorical_ticks_carry_labels_in_registration_order() {
    let mut axis = AxisSpec::categorical(AxisId::new(8));
    for label in ["alpha", "beta", "gamma"] {
        axis.register_category(label);
    }
    let resolved = axis.resolve(&[], true);
    let ticks = axis.ticks(resolved, 400.0).to_vec();
    let labels: Vec<&str> = ticks.iter().map(|tick| tick.label.as_str()).collect();
    assert_eq!(labels, ["alpha", "beta", "gamma"]);
    assert_eq!(ticks[1].value, 1.0);
}

#[test]
fn linear_ticks_respect_max_tick_budget() {
    let mut axis = AxisSpec::continuous(AxisId::new(9), ScaleKind::Linear).with_max_ticks(5);
    let ticks = axis.ticks((0.0, 100.0), 500.0).to_vec();
    assert!(ticks.len() <= 6);
    assert!(ticks.len() >= 2);
    for pair in ticks.windows(2) {
        assert!(pair[0].value < pair[1].value);
    }
}

#[test]
fn log_ticks_follow_decade_ladder() {
    let mut axis = AxisSpec::continuous(AxisId::new(10), ScaleKind::Logarithmic);
    let ticks = axis.ticks((1.0, 1000.0), 500.0).to_vec();
    assert!(ticks.iter().any(|tick| tick.value == 1.0));
    assert!(ticks.iter().any(|tick| tick.value == 10.0 || tick.value == 100.0));
    for pair in ticks.windows(2) {
        assert!(pair[0].value < pair[1].value);
    }
}
