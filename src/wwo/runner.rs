//! Water Wave Optimization search loop.
//!
//! Runs a fixed-iteration population search over flattened rosters.
//! Every iteration each wave is propagated; improvements that also
//! beat the global best trigger breaking (greedy per-coordinate
//! refinement), and stalled waves are refracted toward the global
//! best. Wavelengths adapt to each wave's standing in the population
//! cost spread.
//!
//! All randomness comes from a caller-supplied generator, so a seeded
//! run is fully reproducible.
//!
//! # Reference
//! Zheng (2015), "Water wave optimization: A new nature-inspired
//! metaheuristic"

use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::cost::CostEvaluator;
use crate::error::ScheduleError;
use crate::models::Roster;
use crate::wwo::config::WwoConfig;
use crate::wwo::wave::Wave;

/// Best and worst population cost at one point of the run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostTracePoint {
    /// Global best cost seen so far.
    pub best: f64,
    /// Worst cost currently in the population.
    pub worst: f64,
}

/// Result of one optimization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WwoOutcome {
    /// Lowest-cost roster found, decoded back to shift codes.
    pub best_roster: Roster,
    /// Cost of `best_roster`.
    pub best_cost: f64,
    /// One [`CostTracePoint`] for the initial population plus one per
    /// iteration (`iterations + 1` entries).
    pub trace: Vec<CostTracePoint>,
}

/// Drives the WWO search for one unit.
#[derive(Debug)]
pub struct WwoRunner<'a> {
    evaluator: &'a CostEvaluator,
    config: &'a WwoConfig,
}

impl<'a> WwoRunner<'a> {
    /// Creates a runner; the hyperparameters are validated up front.
    pub fn new(evaluator: &'a CostEvaluator, config: &'a WwoConfig) -> Result<Self, ScheduleError> {
        config.validate()?;
        Ok(Self { evaluator, config })
    }

    /// Optimizes starting from `initial`, which seeds every wave.
    ///
    /// Global-best updates are serialized in wave order within an
    /// iteration; the best-holder index is refreshed once per
    /// iteration from the population costs.
    pub fn optimize<R: Rng>(
        &self,
        initial: &Roster,
        rng: &mut R,
    ) -> Result<WwoOutcome, ScheduleError> {
        let nurses = initial.nurses();
        let days = initial.days();
        let cfg = self.config;

        // Each wave owns an independent clone of the initial position.
        let seed_position = initial.to_levels();
        let seed_cost = self.evaluator.evaluate_levels(&seed_position)?;
        let mut waves: Vec<Wave> = (0..cfg.population)
            .map(|_| Wave::new(seed_position.clone(), seed_cost, cfg.lambda, cfg.hmax))
            .collect();

        let mut best_index = argmin(&waves);
        let mut best_position = waves[best_index].position.clone();
        let mut best_cost = waves[best_index].cost;
        let mut beta = cfg.beta_max;

        let mut trace = Vec::with_capacity(cfg.iterations + 1);
        trace.push(CostTracePoint {
            best: best_cost,
            worst: worst_cost(&waves),
        });

        for iteration in 0..cfg.iterations {
            for index in 0..waves.len() {
                let (new_position, new_cost) = self.propagate(&waves[index], rng)?;

                if new_cost < waves[index].cost {
                    waves[index].accept(new_position, new_cost, cfg.hmax);
                    if new_cost < best_cost && index != best_index {
                        self.breaking(&mut waves[index], beta, rng)?;
                        best_position = waves[index].position.clone();
                        best_cost = waves[index].cost;
                        trace!(iteration, index, best_cost, "new global best");
                    }
                } else {
                    waves[index].height -= 1;
                    if waves[index].height == 0 {
                        self.refract(&mut waves[index], &best_position, rng)?;
                        trace!(iteration, index, cost = waves[index].cost, "refracted");
                    }
                }
            }

            let min_cost = waves.iter().map(|w| w.cost).fold(f64::INFINITY, f64::min);
            let max_cost = worst_cost(&waves);
            best_index = argmin(&waves);
            for wave in &mut waves {
                let exponent =
                    -(wave.cost - min_cost + cfg.epsilon) / (max_cost - min_cost + cfg.epsilon);
                wave.wavelength *= cfg.alpha.powf(exponent);
            }
            beta = cfg.beta_max
                - (cfg.beta_max - cfg.beta_min) * (iteration + 1) as f64 / cfg.iterations as f64;

            trace.push(CostTracePoint {
                best: best_cost,
                worst: max_cost,
            });
            debug!(iteration, best_cost, worst = max_cost, "iteration done");
        }

        let best_roster = Roster::from_levels(nurses, days, &best_position)?;
        Ok(WwoOutcome {
            best_roster,
            best_cost,
            trace,
        })
    }

    /// Propagation: uniform perturbation of every coordinate scaled by
    /// the wave's wavelength and the bound span.
    fn propagate<R: Rng>(&self, wave: &Wave, rng: &mut R) -> Result<(Vec<f64>, f64), ScheduleError> {
        let span = self.config.bound_span();
        let mut position: Vec<f64> = wave
            .position
            .iter()
            .map(|&v| v + rng.random_range(-1.0..1.0) * span * wave.wavelength)
            .collect();
        self.handle_bounds(&mut position, rng);
        let cost = self.evaluator.evaluate_levels(&position)?;
        Ok((position, cost))
    }

    /// Breaking: greedy per-coordinate normal perturbation of a wave
    /// that just produced a new global best.
    ///
    /// The wavelength update uses the pre-move cost as its baseline at
    /// every accepted coordinate.
    fn breaking<R: Rng>(
        &self,
        wave: &mut Wave,
        beta: f64,
        rng: &mut R,
    ) -> Result<(), ScheduleError> {
        let cfg = self.config;
        let k = rng
            .random_range(1..cfg.k_max)
            .min(wave.position.len());
        let dimensions = rand::seq::index::sample(rng, wave.position.len(), k);

        for dimension in dimensions {
            let mut candidate = wave.position.clone();
            let z: f64 = rng.sample(StandardNormal);
            candidate[dimension] += z * beta * cfg.bound_span().abs();
            self.handle_bounds(&mut candidate, rng);
            let candidate_cost = self.evaluator.evaluate_levels(&candidate)?;

            if candidate_cost < wave.cost {
                wave.position[dimension] = candidate[dimension];
                wave.wavelength =
                    self.set_wavelength(wave.wavelength, wave.cost, candidate_cost, wave.cost);
                wave.cost = candidate_cost;
            }
        }
        Ok(())
    }

    /// Refraction: resamples a fully stalled wave around the midpoint
    /// between it and the global best, then resets its height and
    /// re-derives its wavelength from the observed fitness change.
    fn refract<R: Rng>(
        &self,
        wave: &mut Wave,
        best_position: &[f64],
        rng: &mut R,
    ) -> Result<(), ScheduleError> {
        let cost_before = wave.cost;
        let mut position: Vec<f64> = wave
            .position
            .iter()
            .zip(best_position)
            .map(|(&current, &best)| {
                let mu = (best + current) / 2.0;
                let sigma = (best - current).abs() / 2.0;
                let z: f64 = rng.sample(StandardNormal);
                mu + z * sigma
            })
            .collect();
        self.handle_bounds(&mut position, rng);
        let cost = self.evaluator.evaluate_levels(&position)?;

        wave.accept(position, cost, self.config.hmax);
        wave.wavelength = self.set_wavelength(wave.wavelength, cost_before, cost, cost_before);
        Ok(())
    }

    /// `wavelength + ((after + eps) - before) / (reference + eps)`.
    fn set_wavelength(&self, wavelength: f64, before: f64, after: f64, reference: f64) -> f64 {
        let eps = self.config.epsilon;
        wavelength + ((after + eps) - before) / (reference + eps)
    }

    /// Redraws every out-of-range coordinate uniformly within bounds.
    /// Shared by propagation, breaking, and refraction.
    fn handle_bounds<R: Rng>(&self, position: &mut [f64], rng: &mut R) {
        let (lower, upper) = (self.config.lower_bound, self.config.upper_bound);
        for value in position.iter_mut() {
            if *value < lower || *value > upper {
                *value = rng.random_range(lower..upper);
            }
        }
    }
}

fn argmin(waves: &[Wave]) -> usize {
    let mut index = 0;
    for (i, wave) in waves.iter().enumerate() {
        if wave.cost < waves[index].cost {
            index = i;
        }
    }
    index
}

fn worst_cost(waves: &[Wave]) -> f64 {
    waves
        .iter()
        .map(|w| w.cost)
        .fold(f64::NEG_INFINITY, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ShiftCode, StaffingDemand};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn sample_setup() -> (CostEvaluator, Roster) {
        let demand = StaffingDemand::uniform(5, [1, 1, 1]);
        let evaluator = CostEvaluator::new(demand, 10.0, 4, 5).unwrap();
        let mut rng = SmallRng::seed_from_u64(3);
        let roster = Roster::random(4, 5, &mut rng);
        (evaluator, roster)
    }

    #[test]
    fn test_rejects_invalid_config() {
        let (evaluator, _) = sample_setup();
        let config = WwoConfig::default().with_population(0);
        assert!(WwoRunner::new(&evaluator, &config).is_err());
    }

    #[test]
    fn test_trace_length_and_shape() {
        let (evaluator, roster) = sample_setup();
        let config = WwoConfig::default().with_population(5).with_iterations(8);
        let runner = WwoRunner::new(&evaluator, &config).unwrap();
        let mut rng = SmallRng::seed_from_u64(42);

        let outcome = runner.optimize(&roster, &mut rng).unwrap();
        assert_eq!(outcome.trace.len(), 9);
        assert_eq!(outcome.best_roster.nurses(), 4);
        assert_eq!(outcome.best_roster.days(), 5);
    }

    #[test]
    fn test_best_cost_is_non_increasing() {
        let (evaluator, roster) = sample_setup();
        let config = WwoConfig::default().with_population(8).with_iterations(20);
        let runner = WwoRunner::new(&evaluator, &config).unwrap();
        let mut rng = SmallRng::seed_from_u64(7);

        let outcome = runner.optimize(&roster, &mut rng).unwrap();
        for pair in outcome.trace.windows(2) {
            assert!(pair[1].best <= pair[0].best);
        }
        assert_eq!(outcome.trace.last().unwrap().best, outcome.best_cost);
    }

    #[test]
    fn test_best_roster_matches_best_cost() {
        let (evaluator, roster) = sample_setup();
        let config = WwoConfig::default().with_population(6).with_iterations(10);
        let runner = WwoRunner::new(&evaluator, &config).unwrap();
        let mut rng = SmallRng::seed_from_u64(11);

        let outcome = runner.optimize(&roster, &mut rng).unwrap();
        assert_eq!(evaluator.evaluate(&outcome.best_roster), outcome.best_cost);
    }

    #[test]
    fn test_best_cost_never_exceeds_initial() {
        let (evaluator, roster) = sample_setup();
        let initial_cost = evaluator.evaluate(&roster);
        let config = WwoConfig::default().with_population(5).with_iterations(15);
        let runner = WwoRunner::new(&evaluator, &config).unwrap();
        let mut rng = SmallRng::seed_from_u64(5);

        let outcome = runner.optimize(&roster, &mut rng).unwrap();
        assert!(outcome.best_cost <= initial_cost);
    }

    #[test]
    fn test_decoded_cells_stay_in_domain() {
        let (evaluator, roster) = sample_setup();
        let config = WwoConfig::default().with_population(4).with_iterations(12);
        let runner = WwoRunner::new(&evaluator, &config).unwrap();
        let mut rng = SmallRng::seed_from_u64(13);

        let outcome = runner.optimize(&roster, &mut rng).unwrap();
        for (_, _, shift) in outcome.best_roster.iter_cells() {
            assert!(matches!(
                shift,
                ShiftCode::Morning | ShiftCode::Afternoon | ShiftCode::Night | ShiftCode::Off
            ));
        }
    }

    #[test]
    fn test_runs_are_reproducible_with_seed() {
        let (evaluator, roster) = sample_setup();
        let config = WwoConfig::default().with_population(5).with_iterations(10);
        let runner = WwoRunner::new(&evaluator, &config).unwrap();

        let a = runner
            .optimize(&roster, &mut SmallRng::seed_from_u64(21))
            .unwrap();
        let b = runner
            .optimize(&roster, &mut SmallRng::seed_from_u64(21))
            .unwrap();
        assert_eq!(a.best_cost, b.best_cost);
        assert_eq!(a.best_roster, b.best_roster);
        assert_eq!(a.trace, b.trace);
    }

    #[test]
    fn test_single_wave_population() {
        // With one wave the breaking branch can never fire (the wave
        // is always the best-holder); the run must still complete.
        let (evaluator, roster) = sample_setup();
        let config = WwoConfig::default().with_population(1).with_iterations(6);
        let runner = WwoRunner::new(&evaluator, &config).unwrap();
        let mut rng = SmallRng::seed_from_u64(17);

        let outcome = runner.optimize(&roster, &mut rng).unwrap();
        assert_eq!(outcome.trace.len(), 7);
    }
}
