//! Per-unit problem instance.
//!
//! A [`UnitProblem`] is created once per hospital unit from external
//! configuration. Construction validates the configuration, then runs
//! the repair engine to produce the unit's initial roster; that roster
//! is the "current schedule" the optimizer perturbs from.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::cost::CostEvaluator;
use crate::error::ScheduleError;
use crate::models::{Roster, StaffingDemand};
use crate::repair::RepairEngine;

/// Default planning horizon in days.
pub const DEFAULT_HORIZON_DAYS: usize = 30;

/// External configuration for one scheduling unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitConfig {
    /// Planning horizon in days.
    pub days: usize,
    /// Number of nurses in the unit.
    pub nurses: usize,
    /// Minimum nurse count per working shift
    /// (`[morning, afternoon, night]`), applied to every day.
    pub minimum_shift: [u32; 3],
    /// Penalty multiplier applied to the hard-constraint terms.
    pub hard_constraint_multiplier: f64,
    /// Reserved. Present in the configuration surface but not applied
    /// in the scoring formula; soft terms enter with weight 1.
    pub soft_constraint_multiplier: f64,
}

impl UnitConfig {
    /// Creates a configuration with both multipliers defaulted
    /// (hard = 1, soft reserved = 1).
    pub fn new(days: usize, nurses: usize, minimum_shift: [u32; 3]) -> Self {
        Self {
            days,
            nurses,
            minimum_shift,
            hard_constraint_multiplier: 1.0,
            soft_constraint_multiplier: 1.0,
        }
    }

    /// Creates a configuration over the default 30-day horizon.
    pub fn with_default_horizon(nurses: usize, minimum_shift: [u32; 3]) -> Self {
        Self::new(DEFAULT_HORIZON_DAYS, nurses, minimum_shift)
    }

    /// Sets the hard-constraint multiplier.
    pub fn with_hard_multiplier(mut self, multiplier: f64) -> Self {
        self.hard_constraint_multiplier = multiplier;
        self
    }

    /// Sets the reserved soft-constraint multiplier.
    pub fn with_soft_multiplier(mut self, multiplier: f64) -> Self {
        self.soft_constraint_multiplier = multiplier;
        self
    }

    /// Fails fast on malformed configuration.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.days == 0 {
            return Err(ScheduleError::configuration("horizon must be positive"));
        }
        if self.nurses == 0 {
            return Err(ScheduleError::configuration("unit size must be positive"));
        }
        if self.hard_constraint_multiplier < 0.0 {
            return Err(ScheduleError::configuration(format!(
                "hard constraint multiplier must be non-negative, got {}",
                self.hard_constraint_multiplier
            )));
        }
        if self.soft_constraint_multiplier < 0.0 {
            return Err(ScheduleError::configuration(format!(
                "soft constraint multiplier must be non-negative, got {}",
                self.soft_constraint_multiplier
            )));
        }
        self.demand().validate(self.days, self.nurses)
    }

    /// Expands the per-unit minimums into a per-day demand table.
    pub fn demand(&self) -> StaffingDemand {
        StaffingDemand::uniform(self.days, self.minimum_shift)
    }
}

/// A unit's scheduling problem: current roster, demand, and weights.
#[derive(Debug, Clone)]
pub struct UnitProblem {
    config: UnitConfig,
    evaluator: CostEvaluator,
    roster: Roster,
}

impl UnitProblem {
    /// Validates `config`, builds the initial roster through the
    /// repair engine, and assembles the evaluator.
    pub fn new<R: Rng>(config: UnitConfig, rng: &mut R) -> Result<Self, ScheduleError> {
        config.validate()?;
        let demand = config.demand();
        let roster = RepairEngine::new(demand.clone(), config.nurses, config.days).build(rng)?;
        let evaluator = CostEvaluator::new(
            demand,
            config.hard_constraint_multiplier,
            config.nurses,
            config.days,
        )?;
        Ok(Self {
            config,
            evaluator,
            roster,
        })
    }

    /// The unit configuration this problem was built from.
    pub fn config(&self) -> &UnitConfig {
        &self.config
    }

    /// The unit's cost evaluator.
    pub fn evaluator(&self) -> &CostEvaluator {
        &self.evaluator
    }

    /// Current candidate roster.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Replaces the current candidate roster.
    pub fn set_roster(&mut self, roster: Roster) -> Result<(), ScheduleError> {
        if roster.nurses() != self.config.nurses || roster.days() != self.config.days {
            return Err(ScheduleError::invariant(format!(
                "roster shape {}x{} does not match unit {}x{}",
                roster.nurses(),
                roster.days(),
                self.config.nurses,
                self.config.days
            )));
        }
        self.roster = roster;
        Ok(())
    }

    /// Cost of the current candidate roster.
    pub fn current_cost(&self) -> f64 {
        self.evaluator.evaluate(&self.roster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn sample_config() -> UnitConfig {
        UnitConfig::new(7, 6, [2, 1, 1]).with_hard_multiplier(10.0)
    }

    #[test]
    fn test_default_horizon_is_thirty_days() {
        let config = UnitConfig::with_default_horizon(28, [7, 7, 6]);
        assert_eq!(config.days, DEFAULT_HORIZON_DAYS);
        assert_eq!(config.days, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_horizon() {
        let config = UnitConfig::new(0, 6, [1, 1, 1]);
        assert!(matches!(
            config.validate(),
            Err(ScheduleError::Configuration(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_nurses() {
        let config = UnitConfig::new(7, 0, [1, 1, 1]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_multiplier() {
        let config = sample_config().with_hard_multiplier(-2.0);
        assert!(config.validate().is_err());
        let config = sample_config().with_soft_multiplier(-0.5);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unsatisfiable_demand() {
        let config = UnitConfig::new(7, 3, [2, 2, 2]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_problem_construction_repairs_roster() {
        let mut rng = SmallRng::seed_from_u64(42);
        let problem = UnitProblem::new(sample_config(), &mut rng).unwrap();

        let roster = problem.roster();
        assert_eq!(roster.nurses(), 6);
        assert_eq!(roster.days(), 7);
        // The repaired roster has no staffing deficit.
        assert_eq!(problem.evaluator().staffing_deficit(roster), 0);
    }

    #[test]
    fn test_set_roster_shape_check() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut problem = UnitProblem::new(sample_config(), &mut rng).unwrap();

        let wrong = Roster::random(2, 3, &mut rng);
        assert!(matches!(
            problem.set_roster(wrong),
            Err(ScheduleError::InvariantViolation(_))
        ));

        let right = Roster::random(6, 7, &mut rng);
        assert!(problem.set_roster(right).is_ok());
    }

    #[test]
    fn test_config_serde_round_trip() {
        let config = sample_config();
        let json = serde_json::to_string(&config).unwrap();
        let back: UnitConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
