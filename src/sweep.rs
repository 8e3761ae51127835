//! Parameter sweeps feeding the diagnostic charts
//!
//! A sweep is a lazy sequence of `(x, y)` samples over an inclusive range,
//! ascending in `x`. Cloning a sweep (or calling [`Sweep::restart`]) yields
//! a fresh pass over the same samples.

use crate::calculator::{self, Evaluation};
use crate::models::STEAM_PRESSURE;

pub const PRESSURE_SAMPLES: usize = 50;
pub const THERMAL_SAMPLES: usize = 100;
pub const THERMAL_DELTA_MAX: f64 = 50.0;

/// Uniformly spaced samples of `f` over `[start, end]`, endpoints included
#[derive(Debug, Clone)]
pub struct Sweep<F> {
    start: f64,
    end: f64,
    samples: usize,
    index: usize,
    f: F,
}

impl<F> Sweep<F>
where
    F: Fn(f64) -> f64 + Clone,
{
    pub fn new(start: f64, end: f64, samples: usize, f: F) -> Self {
        Self {
            start,
            end,
            samples,
            index: 0,
            f,
        }
    }

    /// A new pass from the first sample, leaving `self` untouched
    pub fn restart(&self) -> Self {
        Self::new(self.start, self.end, self.samples, self.f.clone())
    }

    fn x_at(&self, i: usize) -> f64 {
        if self.samples < 2 {
            return self.start;
        }
        if i + 1 == self.samples {
            return self.end;
        }
        let step = (self.end - self.start) / (self.samples - 1) as f64;
        self.start + step * i as f64
    }
}

impl<F> Iterator for Sweep<F>
where
    F: Fn(f64) -> f64 + Clone,
{
    type Item = (f64, f64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.samples {
            return None;
        }
        let x = self.x_at(self.index);
        self.index += 1;
        Some((x, (self.f)(x)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.samples - self.index;
        (remaining, Some(remaining))
    }
}

impl<F> ExactSizeIterator for Sweep<F> where F: Fn(f64) -> f64 + Clone {}

/// Unrounded weight across the full pressure range
///
/// The collapse value is taken from `eval` and held fixed for every sample;
/// only the pressure term of the weight formula varies.
pub fn pressure_sweep(eval: &Evaluation) -> Sweep<impl Fn(f64) -> f64 + Clone> {
    let density = eval.params.bead_density;
    let collapse = eval.factors.collapse;
    Sweep::new(
        STEAM_PRESSURE.min,
        STEAM_PRESSURE.max,
        PRESSURE_SAMPLES,
        move |p| calculator::raw_weight(p, density, collapse),
    )
}

/// Contraction step across mold-side temperature differences of 0..50 °C
pub fn thermal_sweep() -> Sweep<impl Fn(f64) -> f64 + Clone> {
    Sweep::new(
        0.0,
        THERMAL_DELTA_MAX,
        THERMAL_SAMPLES,
        calculator::contraction_for_delta,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::evaluate;
    use crate::models::InputParameters;
    use approx::assert_relative_eq;

    #[test]
    fn pressure_sweep_covers_slider_range() {
        let eval = evaluate(&InputParameters::default());
        let samples: Vec<_> = pressure_sweep(&eval).collect();

        assert_eq!(samples.len(), PRESSURE_SAMPLES);
        assert_eq!(samples[0].0, 0.5);
        assert_eq!(samples[PRESSURE_SAMPLES - 1].0, 2.0);
        assert!(samples.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn pressure_sweep_holds_collapse_fixed() {
        let params = InputParameters::new(1.9, 9.0, 90.0, 30.0, 25.0).unwrap();
        let eval = evaluate(&params);

        // At 0.5 bar a fresh evaluation would have no pressure collapse term,
        // but the sweep keeps the 0.27 from the current settings.
        let (x, y) = pressure_sweep(&eval).next().unwrap();
        assert_eq!(x, 0.5);
        assert_relative_eq!(y, 1800.0 * (0.5 / 1.5) * (1.0 - eval.factors.collapse));
        assert!(y < evaluate(&InputParameters { steam_pressure: 0.5, ..params }).output.weight_g);
    }

    #[test]
    fn pressure_sweep_matches_weight_at_current_pressure() {
        let eval = evaluate(&InputParameters::default());
        let (_, y) = pressure_sweep(&eval)
            .find(|(x, _)| (x - 1.5).abs() < 0.02)
            .unwrap();
        assert_relative_eq!(y, 1800.0 * (1.5 / 1.5), max_relative = 0.02);
    }

    #[test]
    fn thermal_sweep_is_a_step() {
        let samples: Vec<_> = thermal_sweep().collect();

        assert_eq!(samples.len(), THERMAL_SAMPLES);
        assert_eq!(samples[0], (0.0, 0.0));
        assert_eq!(samples[THERMAL_SAMPLES - 1], (50.0, 0.02));
        for (d, c) in samples {
            let expected = if d > 20.0 { 0.02 } else { 0.0 };
            assert_eq!(c, expected, "delta {d}");
        }
    }

    #[test]
    fn sweeps_are_restartable() {
        let mut sweep = thermal_sweep();
        let first: Vec<_> = sweep.by_ref().take(10).collect();
        assert_eq!(sweep.len(), THERMAL_SAMPLES - 10);

        let again: Vec<_> = sweep.restart().take(10).collect();
        assert_eq!(first, again);
    }

    #[test]
    fn cloned_sweep_replays_remaining_samples() {
        let eval = evaluate(&InputParameters::default());
        let sweep = pressure_sweep(&eval);
        let a: Vec<_> = sweep.clone().collect();
        let b: Vec<_> = sweep.collect();
        assert_eq!(a, b);
    }

    #[test]
    fn single_sample_sweep_yields_start() {
        let samples: Vec<_> = Sweep::new(3.0, 7.0, 1, |x| x * 2.0).collect();
        assert_eq!(samples, vec![(3.0, 6.0)]);
    }
}
