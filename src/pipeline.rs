//! Per-unit solve pipeline.
//!
//! Each hospital unit is an independent problem: repair an initial
//! roster, optimize it, report the result. [`solve_unit`] is a pure
//! function of the unit configuration, the hyperparameters, and the
//! random source, so units can be solved in any order (or, with
//! per-unit generators, in parallel).

use std::collections::BTreeMap;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ScheduleError;
use crate::models::{Roster, UnitConfig, UnitProblem};
use crate::wwo::{CostTracePoint, WwoConfig, WwoRunner};

/// Opaque identifier for a scheduling unit.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitId(pub String);

impl UnitId {
    /// Creates an identifier from a unit name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of solving one unit, shaped for the reporting layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitReport {
    /// Unit this report belongs to.
    pub unit: UnitId,
    /// Best roster found.
    pub best_roster: Roster,
    /// Cost of the best roster.
    pub best_cost: f64,
    /// Best/worst cost at initialization and after each iteration.
    pub trace: Vec<CostTracePoint>,
}

impl UnitReport {
    /// Best roster as a nurse × day table of shift labels.
    pub fn labels(&self) -> Vec<Vec<&'static str>> {
        self.best_roster.to_labels()
    }
}

/// Solves one unit end to end: validate, repair, optimize, report.
pub fn solve_unit<R: Rng>(
    unit: UnitId,
    config: UnitConfig,
    wwo: &WwoConfig,
    rng: &mut R,
) -> Result<UnitReport, ScheduleError> {
    let mut problem = UnitProblem::new(config, rng)?;
    info!(
        %unit,
        nurses = problem.config().nurses,
        days = problem.config().days,
        initial_cost = problem.current_cost(),
        "initial roster repaired"
    );

    let runner = WwoRunner::new(problem.evaluator(), wwo)?;
    let outcome = runner.optimize(problem.roster(), rng)?;
    // The best roster becomes the unit's current schedule.
    problem.set_roster(outcome.best_roster)?;
    info!(%unit, best_cost = outcome.best_cost, "optimization finished");

    Ok(UnitReport {
        unit,
        best_roster: problem.roster().clone(),
        best_cost: outcome.best_cost,
        trace: outcome.trace,
    })
}

/// Solves every unit in the map, in key order.
pub fn solve_units<R: Rng>(
    units: &BTreeMap<UnitId, UnitConfig>,
    wwo: &WwoConfig,
    rng: &mut R,
) -> Result<BTreeMap<UnitId, UnitReport>, ScheduleError> {
    let mut reports = BTreeMap::new();
    for (unit, config) in units {
        let report = solve_unit(unit.clone(), config.clone(), wwo, rng)?;
        reports.insert(unit.clone(), report);
    }
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn small_unit() -> UnitConfig {
        UnitConfig::new(5, 6, [2, 1, 1]).with_hard_multiplier(10.0)
    }

    #[test]
    fn test_solve_unit_end_to_end() {
        let wwo = WwoConfig::default().with_population(6).with_iterations(10);
        let mut rng = SmallRng::seed_from_u64(42);

        let report = solve_unit(UnitId::new("ICU"), small_unit(), &wwo, &mut rng).unwrap();
        assert_eq!(report.unit, UnitId::new("ICU"));
        assert_eq!(report.best_roster.nurses(), 6);
        assert_eq!(report.best_roster.days(), 5);
        assert_eq!(report.trace.len(), 11);

        let labels = report.labels();
        assert_eq!(labels.len(), 6);
        assert_eq!(labels[0].len(), 5);
    }

    #[test]
    fn test_reported_roster_is_the_scored_one() {
        // The roster carried by the report is the unit's final current
        // schedule, and its cost under the unit's own scoring matches
        // the reported best cost.
        let wwo = WwoConfig::default().with_population(6).with_iterations(10);
        let mut rng = SmallRng::seed_from_u64(99);
        let config = small_unit();

        let report = solve_unit(UnitId::new("ICU"), config.clone(), &wwo, &mut rng).unwrap();
        let evaluator = crate::cost::CostEvaluator::new(
            config.demand(),
            config.hard_constraint_multiplier,
            config.nurses,
            config.days,
        )
        .unwrap();
        assert_eq!(evaluator.evaluate(&report.best_roster), report.best_cost);
    }

    #[test]
    fn test_solve_unit_rejects_bad_config() {
        let wwo = WwoConfig::default();
        let mut rng = SmallRng::seed_from_u64(42);
        let bad = UnitConfig::new(0, 6, [1, 1, 1]);

        let err = solve_unit(UnitId::new("ER"), bad, &wwo, &mut rng).unwrap_err();
        assert!(matches!(err, ScheduleError::Configuration(_)));
    }

    #[test]
    fn test_solve_units_covers_every_unit() {
        let wwo = WwoConfig::default().with_population(4).with_iterations(5);
        let mut rng = SmallRng::seed_from_u64(42);

        let mut units = BTreeMap::new();
        units.insert(UnitId::new("ER"), UnitConfig::new(4, 5, [1, 1, 1]));
        units.insert(UnitId::new("ICU"), UnitConfig::new(4, 4, [1, 1, 1]));

        let reports = solve_units(&units, &wwo, &mut rng).unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[&UnitId::new("ER")].best_roster.nurses(), 5);
        assert_eq!(reports[&UnitId::new("ICU")].best_roster.nurses(), 4);
    }

    #[test]
    fn test_report_serde_round_trip() {
        let wwo = WwoConfig::default().with_population(3).with_iterations(4);
        let mut rng = SmallRng::seed_from_u64(42);
        let report = solve_unit(UnitId::new("OR"), small_unit(), &wwo, &mut rng).unwrap();

        let json = serde_json::to_string(&report).unwrap();
        let back: UnitReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.unit, report.unit);
        assert_eq!(back.best_roster, report.best_roster);
        assert_eq!(back.best_cost, report.best_cost);
    }
}
