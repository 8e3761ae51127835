//! Formula engine: process settings to piece weight and dimensions

use crate::models::{CollapseReason, DerivedFactors, InputParameters, OutputResult};

/// Nominal piece at reference settings (1.5 bar, 25 g/L)
pub const WEIGHT_BASE_G: f64 = 1800.0;
pub const LENGTH_BASE_MM: f64 = 1200.0;
pub const WIDTH_BASE_MM: f64 = 800.0;

pub const REFERENCE_PRESSURE: f64 = 1.5;
pub const REFERENCE_DENSITY: f64 = 25.0;

const PRESSURE_COLLAPSE_THRESHOLD: f64 = 1.7;
const TEMP_COLLAPSE_THRESHOLD: f64 = 80.0;
const STEAM_TIME_COLLAPSE_THRESHOLD: f64 = 8.0;

const IDEAL_EXPANSION: f64 = 1.03;

pub const THERMAL_DELTA_THRESHOLD: f64 = 20.0;
pub const THERMAL_CONTRACTION: f64 = 0.02;

/// Factors and outputs of a single evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub params: InputParameters,
    pub factors: DerivedFactors,
    pub output: OutputResult,
}

/// Evaluate a parameter set
///
/// Pure and total: the same parameters always give bit-identical results.
pub fn evaluate(params: &InputParameters) -> Evaluation {
    let mut factors = DerivedFactors::default();

    accumulate_collapse(params, &mut factors);

    if in_ideal_window(params) {
        factors.expansion = IDEAL_EXPANSION;
        factors.ideal_conditions = true;
    }

    factors.contraction = contraction_for_delta(params.thermal_delta());
    factors.thermal_warning = factors.contraction > 0.0;

    let output = compute_output(params, &factors);

    Evaluation {
        params: *params,
        factors,
        output,
    }
}

fn accumulate_collapse(params: &InputParameters, factors: &mut DerivedFactors) {
    // Each rule reads the raw inputs; none excludes another
    let rules = [
        (
            params.steam_pressure,
            PRESSURE_COLLAPSE_THRESHOLD,
            0.1,
            CollapseReason::HighSteamPressure,
        ),
        (
            params.fixed_side_temp,
            TEMP_COLLAPSE_THRESHOLD,
            0.02,
            CollapseReason::FixedSideOverheat,
        ),
        (
            params.mobile_side_temp,
            TEMP_COLLAPSE_THRESHOLD,
            0.02,
            CollapseReason::MobileSideOverheat,
        ),
        (
            params.steam_time,
            STEAM_TIME_COLLAPSE_THRESHOLD,
            0.05,
            CollapseReason::ExcessiveSteamTime,
        ),
    ];

    for (value, threshold, rate, reason) in rules {
        if value > threshold {
            factors.collapse += (value - threshold) * rate;
            factors.collapse_reasons.push(reason);
        }
    }
}

/// Strict interior of the pressure/temperature window that earns the expansion bonus
pub fn in_ideal_window(params: &InputParameters) -> bool {
    let pressure_ok = params.steam_pressure > 1.2 && params.steam_pressure < 1.6;
    let fixed_ok = params.fixed_side_temp > 50.0 && params.fixed_side_temp < 70.0;
    let mobile_ok = params.mobile_side_temp > 40.0 && params.mobile_side_temp < 60.0;
    pressure_ok && fixed_ok && mobile_ok
}

/// Step penalty for mold-side temperature asymmetry
pub fn contraction_for_delta(delta: f64) -> f64 {
    if delta > THERMAL_DELTA_THRESHOLD {
        THERMAL_CONTRACTION
    } else {
        0.0
    }
}

/// Unrounded piece weight for a pressure and density under a given collapse
pub fn raw_weight(steam_pressure: f64, bead_density: f64, collapse: f64) -> f64 {
    WEIGHT_BASE_G
        * (steam_pressure / REFERENCE_PRESSURE)
        * (bead_density / REFERENCE_DENSITY)
        * (1.0 - collapse)
}

fn compute_output(params: &InputParameters, factors: &DerivedFactors) -> OutputResult {
    let p_offset = params.steam_pressure - REFERENCE_PRESSURE;

    // Left-to-right products; regrouping changes the last bits
    let weight = raw_weight(params.steam_pressure, params.bead_density, factors.collapse);
    let length = LENGTH_BASE_MM
        * (1.0 - p_offset * 0.05)
        * (1.0 - factors.collapse)
        * factors.expansion
        * (1.0 - factors.contraction);
    let width = WIDTH_BASE_MM
        * (1.0 - p_offset * 0.03)
        * (1.0 - factors.collapse)
        * factors.expansion
        * (1.0 - factors.contraction);

    OutputResult {
        weight_g: finalize(weight),
        length_mm: finalize(length),
        width_mm: finalize(width),
    }
}

/// Round to two decimals, then floor at zero
fn finalize(raw: f64) -> f64 {
    round2(raw).max(0.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl std::fmt::Display for Evaluation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Derived Factors ===")?;
        writeln!(f, "  Collapse:    {:.4}", self.factors.collapse)?;
        for reason in &self.factors.collapse_reasons {
            writeln!(f, "    - {}", reason)?;
        }
        writeln!(f, "  Expansion:   {:.2}", self.factors.expansion)?;
        writeln!(f, "  Contraction: {:.2}", self.factors.contraction)?;
        writeln!(f, "  Thermal delta: {:.0} °C", self.params.thermal_delta())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    fn params(p: f64, t: f64, fixed: f64, mobile: f64, density: f64) -> InputParameters {
        InputParameters::new(p, t, fixed, mobile, density).unwrap()
    }

    #[test]
    fn default_settings_hit_the_ideal_window() {
        let eval = evaluate(&InputParameters::default());

        assert_eq!(eval.factors.collapse, 0.0);
        assert!(eval.factors.collapse_reasons.is_empty());
        assert_eq!(eval.factors.expansion, 1.03);
        assert!(eval.factors.ideal_conditions);
        assert_eq!(eval.factors.contraction, 0.0);
        assert!(!eval.factors.thermal_warning);

        assert_eq!(eval.output.weight_g, 1800.0);
        assert_eq!(eval.output.length_mm, 1236.0);
        assert_eq!(eval.output.width_mm, 824.0);
    }

    #[test]
    fn overdriven_settings_accumulate_penalties() {
        let eval = evaluate(&params(1.9, 9.0, 90.0, 30.0, 25.0));

        assert_abs_diff_eq!(eval.factors.collapse, 0.27, epsilon = 1e-12);
        assert_eq!(
            eval.factors.collapse_reasons,
            vec![
                CollapseReason::HighSteamPressure,
                CollapseReason::FixedSideOverheat,
                CollapseReason::ExcessiveSteamTime,
            ]
        );
        assert_eq!(eval.factors.expansion, 1.0);
        assert!(!eval.factors.ideal_conditions);
        assert_eq!(eval.factors.contraction, 0.02);
        assert!(eval.factors.thermal_warning);

        assert_abs_diff_eq!(eval.output.weight_g, 1664.4, epsilon = 0.011);
        assert_abs_diff_eq!(eval.output.length_mm, 841.31, epsilon = 0.011);
        assert_abs_diff_eq!(eval.output.width_mm, 565.45, epsilon = 0.011);
    }

    #[test]
    fn both_sides_overheating_add_separate_terms() {
        let eval = evaluate(&params(1.0, 5.0, 90.0, 95.0, 25.0));

        assert_abs_diff_eq!(eval.factors.collapse, 0.2 + 0.3, epsilon = 1e-12);
        assert_eq!(
            eval.factors.collapse_reasons,
            vec![
                CollapseReason::FixedSideOverheat,
                CollapseReason::MobileSideOverheat
            ]
        );
    }

    #[test]
    fn thresholds_are_exclusive() {
        let eval = evaluate(&params(1.7, 8.0, 80.0, 80.0, 25.0));
        assert_eq!(eval.factors.collapse, 0.0);
        assert!(eval.factors.collapse_reasons.is_empty());
    }

    #[test]
    fn ideal_window_excludes_its_boundary() {
        let at_edge = evaluate(&params(1.2, 5.0, 60.0, 50.0, 25.0));
        assert_eq!(at_edge.factors.expansion, 1.0);
        assert!(!at_edge.factors.ideal_conditions);

        let inside = evaluate(&params(1.3, 5.0, 60.0, 50.0, 25.0));
        assert_eq!(inside.factors.expansion, 1.03);
        assert!(inside.factors.ideal_conditions);

        let fixed_edge = evaluate(&params(1.3, 5.0, 70.0, 50.0, 25.0));
        assert_eq!(fixed_edge.factors.expansion, 1.0);

        let mobile_edge = evaluate(&params(1.3, 5.0, 60.0, 40.0, 25.0));
        assert_eq!(mobile_edge.factors.expansion, 1.0);
    }

    #[test]
    fn contraction_is_a_step_at_twenty_degrees() {
        let at_21 = evaluate(&params(1.5, 5.0, 66.0, 45.0, 25.0));
        assert_eq!(at_21.factors.contraction, 0.02);
        assert!(at_21.factors.thermal_warning);

        let at_20 = evaluate(&params(1.5, 5.0, 65.0, 45.0, 25.0));
        assert_eq!(at_20.factors.contraction, 0.0);
        assert!(!at_20.factors.thermal_warning);

        assert_eq!(contraction_for_delta(70.0), contraction_for_delta(21.0));
    }

    #[test]
    fn collapse_penalizes_dimensions_as_pressure_rises() {
        let pressures = [1.75, 1.8, 1.85, 1.9, 1.95, 2.0];
        let evals: Vec<_> = pressures
            .iter()
            .map(|&p| evaluate(&params(p, 5.0, 61.0, 45.0, 25.0)))
            .collect();

        for pair in evals.windows(2) {
            assert!(pair[1].factors.collapse > pair[0].factors.collapse);
            assert!(pair[1].output.length_mm < pair[0].output.length_mm);
            assert!(pair[1].output.width_mm < pair[0].output.width_mm);
        }
    }

    #[test]
    fn weight_scales_with_density() {
        let light = evaluate(&params(1.5, 5.0, 61.0, 45.0, 15.0));
        let heavy = evaluate(&params(1.5, 5.0, 61.0, 45.0, 35.0));
        assert_eq!(light.output.weight_g, 1080.0);
        assert_eq!(heavy.output.weight_g, 2520.0);
        // density leaves dimensions untouched
        assert_eq!(light.output.length_mm, heavy.output.length_mm);
    }

    #[test]
    fn negative_results_are_floored() {
        assert_eq!(finalize(-12.345), 0.0);
        assert_eq!(finalize(-0.001), 0.0);
        assert_eq!(finalize(12.345_6), 12.35);
    }

    proptest! {
        #[test]
        fn outputs_never_negative(
            p in 0.5..=2.0f64,
            t in 1.0..=10.0f64,
            fixed in 30.0..=100.0f64,
            mobile in 30.0..=100.0f64,
            density in 15.0..=35.0f64,
        ) {
            let eval = evaluate(&params(p, t, fixed, mobile, density));
            prop_assert!(eval.output.weight_g >= 0.0);
            prop_assert!(eval.output.length_mm >= 0.0);
            prop_assert!(eval.output.width_mm >= 0.0);
        }

        #[test]
        fn evaluation_is_deterministic(
            p in 0.5..=2.0f64,
            t in 1.0..=10.0f64,
            fixed in 30.0..=100.0f64,
            mobile in 30.0..=100.0f64,
            density in 15.0..=35.0f64,
        ) {
            let input = params(p, t, fixed, mobile, density);
            let first = evaluate(&input);
            let second = evaluate(&input);
            prop_assert_eq!(first.output.weight_g.to_bits(), second.output.weight_g.to_bits());
            prop_assert_eq!(first.output.length_mm.to_bits(), second.output.length_mm.to_bits());
            prop_assert_eq!(first.output.width_mm.to_bits(), second.output.width_mm.to_bits());
        }

        #[test]
        fn reasons_present_iff_collapse(
            p in 0.5..=2.0f64,
            t in 1.0..=10.0f64,
            fixed in 30.0..=100.0f64,
            mobile in 30.0..=100.0f64,
        ) {
            let eval = evaluate(&params(p, t, fixed, mobile, 25.0));
            prop_assert_eq!(eval.factors.collapse_reasons.is_empty(), eval.factors.collapse == 0.0);
        }
    }
}
