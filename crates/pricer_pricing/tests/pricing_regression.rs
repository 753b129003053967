//! End-to-end pricing regression and invariant tests.

use approx::assert_relative_eq;
use pricer_boundary::{
    classify_regime, critical_volatility, EngineConfig, ExerciseRegime, MarketParameters,
    OptionSide,
};
use pricer_pricing::engine::AmericanOptionEngine;
use pricer_pricing::greeks::{compute_greeks, GreeksConfig};
use pricer_pricing::PricingError;

fn engine() -> AmericanOptionEngine {
    AmericanOptionEngine::with_defaults()
}

/// Textbook benchmark: S=36, K=40, r=6%, q=2%, σ=20%, T=1
/// single-boundary American put against the trusted reference
/// 4.48927603.
#[test]
fn benchmark_single_boundary_put() {
    let params =
        MarketParameters::new(36.0, 40.0, 1.0, 0.06, 0.02, 0.20, OptionSide::Put).unwrap();
    let result = engine().price(&params).unwrap();

    assert_eq!(result.regime, ExerciseRegime::SingleBoundaryPositive);
    let reference = 4.489_276_03;
    assert!(
        (result.price - reference).abs() < 2e-3,
        "price {} deviates from reference {}",
        result.price,
        reference
    );
}

#[test]
fn negative_rate_classification_regression() {
    // r=-1%, q=-2%: double boundary at σ=10%, no exercise at σ=40%.
    assert_eq!(
        classify_regime(-0.01, -0.02, 0.10, OptionSide::Put),
        ExerciseRegime::DoubleBoundaryNegativeRates
    );
    assert_eq!(
        classify_regime(-0.01, -0.02, 0.40, OptionSide::Put),
        ExerciseRegime::NoEarlyExercise
    );
}

#[test]
fn american_dominates_european_across_regimes() {
    let cases = [
        (36.0, 40.0, 1.0, 0.06, 0.02, 0.20, OptionSide::Put),
        (100.0, 100.0, 0.5, 0.04, -0.01, 0.25, OptionSide::Put),
        (100.0, 100.0, 1.0, -0.01, -0.02, 0.10, OptionSide::Put),
        (100.0, 95.0, 1.0, 0.02, 0.06, 0.20, OptionSide::Call),
    ];
    for (s, k, t, r, q, v, side) in cases {
        let params = MarketParameters::new(s, k, t, r, q, v, side).unwrap();
        let result = engine().price(&params).unwrap();
        assert!(
            result.price >= result.european_price - 1e-9,
            "American {} below European {} for {:?}",
            result.price,
            result.european_price,
            (s, k, t, r, q, v, side)
        );
        assert!(result.early_exercise_premium >= 0.0);
    }
}

#[test]
fn american_dominates_intrinsic() {
    let params =
        MarketParameters::new(30.0, 40.0, 1.0, 0.06, 0.02, 0.20, OptionSide::Put).unwrap();
    let result = engine().price(&params).unwrap();
    assert!(result.price >= (params.strike - params.spot).max(0.0) - 1e-6);
}

#[test]
fn double_boundary_invariants() {
    let params =
        MarketParameters::new(100.0, 100.0, 1.0, -0.01, -0.02, 0.10, OptionSide::Put).unwrap();
    let result = engine().price(&params).unwrap();

    assert_eq!(result.regime, ExerciseRegime::DoubleBoundaryNegativeRates);

    let crossing = result.crossing_time.expect("double-boundary crossing");
    assert!((0.0..=params.maturity).contains(&crossing));

    let upper = result.upper_boundary.as_ref().expect("upper boundary");
    let lower = result.lower_boundary.as_ref().expect("lower boundary");
    // 0 ≤ lower(τ) ≤ upper(τ) ≤ K over the collocation times of the
    // live band, where the spectral encoding reproduces the refined
    // samples to round-off.
    let slack = 1e-4 * params.strike;
    for tau in pricer_boundary::kim::collocation_taus(32, params.maturity) {
        if tau > crossing {
            continue;
        }
        let u = upper.evaluate(tau).unwrap();
        let l = lower.evaluate(tau).unwrap();
        assert!(l >= 0.0, "lower({}) = {}", tau, l);
        assert!(l <= u + slack, "ordering violated at {}: {} > {}", tau, l, u);
        assert!(u <= params.strike + slack, "upper({}) = {}", tau, u);
    }
}

#[test]
fn price_converges_to_european_at_critical_volatility() {
    let (r, q) = (-0.01, -0.02);
    let sigma_star = critical_volatility(r, q).unwrap();

    // Just below σ* the band is vanishingly thin: the American price
    // must approach the European value continuously.
    let params = MarketParameters::new(100.0, 100.0, 1.0, r, q, sigma_star - 1e-4, OptionSide::Put)
        .unwrap();
    let result = engine().price(&params).unwrap();
    assert!(
        result.early_exercise_premium < 5e-2,
        "premium {} should vanish near σ*",
        result.early_exercise_premium
    );

    // Just above σ* the price is exactly European.
    let above = MarketParameters::new(100.0, 100.0, 1.0, r, q, sigma_star + 1e-4, OptionSide::Put)
        .unwrap();
    let euro = engine().price(&above).unwrap();
    assert_eq!(euro.price, euro.european_price);
    assert_relative_eq!(result.price, euro.european_price, max_relative = 2e-2);
}

#[test]
fn degenerate_combination_fails_fast() {
    let params =
        MarketParameters::new(100.0, 100.0, 1.0, 0.01, 0.05, 0.20, OptionSide::Put).unwrap();
    match engine().price(&params) {
        Err(PricingError::UnsupportedRegime(ExerciseRegime::Degenerate)) => {}
        other => panic!("expected degenerate failure, got {:?}", other.map(|r| r.price)),
    }
}

#[test]
fn invalid_inputs_fail_fast_without_clamping() {
    assert!(MarketParameters::new(36.0, 40.0, 1.0, 0.06, 0.02, -0.2, OptionSide::Put).is_err());
    assert!(MarketParameters::new(36.0, 40.0, 0.0, 0.06, 0.02, 0.2, OptionSide::Put).is_err());
    assert!(MarketParameters::new(0.0, 40.0, 1.0, 0.06, 0.02, 0.2, OptionSide::Put).is_err());
}

#[test]
fn spot_sweep_is_monotone_for_puts() {
    let engine = engine();
    let mut last = f64::INFINITY;
    for spot in [20.0, 28.0, 36.0, 44.0, 52.0] {
        let params =
            MarketParameters::new(spot, 40.0, 1.0, 0.06, 0.02, 0.20, OptionSide::Put).unwrap();
        let price = engine.price(&params).unwrap().price;
        assert!(
            price <= last + 1e-9,
            "put price must fall as spot rises: {} at S={}",
            price,
            spot
        );
        last = price;
    }
}

#[test]
fn deep_itm_put_equals_intrinsic_region() {
    // Spot far inside the exercise region: price pins to intrinsic.
    let params =
        MarketParameters::new(5.0, 40.0, 1.0, 0.06, 0.02, 0.20, OptionSide::Put).unwrap();
    let result = engine().price(&params).unwrap();
    assert_relative_eq!(result.price, 35.0, max_relative = 2e-2);
}

#[test]
fn greeks_match_closed_form_direction() {
    let params =
        MarketParameters::new(36.0, 40.0, 1.0, 0.06, 0.02, 0.20, OptionSide::Put).unwrap();
    let greeks = compute_greeks(&engine(), &params, &GreeksConfig::default()).unwrap();

    assert!((-1.0..0.0).contains(&greeks.delta));
    assert!(greeks.gamma > 0.0);
    assert!(greeks.vega > 0.0);
    // American put rho is negative but bounded by the European one.
    assert!(greeks.rho < 0.0);
}

#[test]
fn custom_config_prices_consistently() {
    let params =
        MarketParameters::new(36.0, 40.0, 1.0, 0.06, 0.02, 0.20, OptionSide::Put).unwrap();
    let coarse = AmericanOptionEngine::new(EngineConfig::default().with_grid_size(16))
        .unwrap()
        .price(&params)
        .unwrap();
    let fine = AmericanOptionEngine::new(EngineConfig::default().with_grid_size(48))
        .unwrap()
        .price(&params)
        .unwrap();
    // Refining the grid should not move the price materially.
    assert!(
        (coarse.price - fine.price).abs() < 5e-3,
        "grid sensitivity too high: {} vs {}",
        coarse.price,
        fine.price
    );
}

mod double_boundary_properties {
    use super::*;
    use pricer_boundary::{approximate_boundaries, refine_boundaries};
    use proptest::prelude::*;

    proptest! {
        // Full boundary solves are expensive; a handful of cases across
        // the box still covers the regime's corners.
        #![proptest_config(ProptestConfig::with_cases(8))]
        #[test]
        fn boundaries_stay_ordered_across_parameter_box(
            rate in -0.20f64..-0.005,
            spread in 0.005f64..0.20,
            vol_fraction in 0.3f64..0.9,
            maturity in 0.25f64..2.0,
        ) {
            let dividend = (rate - spread).max(-0.5);
            let sigma_star = critical_volatility(rate, dividend).unwrap();
            let vol = vol_fraction * sigma_star;
            prop_assume!(
                classify_regime(rate, dividend, vol, OptionSide::Put)
                    == ExerciseRegime::DoubleBoundaryNegativeRates
            );
            let params =
                MarketParameters::new(100.0, 100.0, maturity, rate, dividend, vol, OptionSide::Put)
                    .unwrap();

            let config = EngineConfig::default().with_grid_size(16);
            let seeds = approximate_boundaries(&params, &config).unwrap();
            let refined = refine_boundaries(&params, &seeds, &config).unwrap();

            let lower = refined.lower.expect("double-boundary solve");
            prop_assert!((0.0..=params.maturity).contains(&refined.crossing_time));
            // Monotone projection can move points on the residual scale,
            // so the ordering check allows that much slack.
            let slack = params.strike * (refined.residual + 1e-9);
            for (u, l) in refined.upper.values.iter().zip(lower.values.iter()) {
                prop_assert!(*l >= 0.0, "negative lower boundary {}", l);
                prop_assert!(*l <= *u + slack, "ordering violated: {} > {}", l, u);
                prop_assert!(*u <= params.strike + 1e-9, "upper {} above strike", u);
            }
        }
    }
}
