//! Roster cost model.
//!
//! Scores a candidate roster against the unit's constraint set and
//! collapses the result into a single scalar:
//!
//! ```text
//! cost = hard_multiplier * (staffing_deficit + one_per_day + night_then_morning)
//!        + afternoon_then_morning + morning_then_night + night_off_afternoon
//! ```
//!
//! Hard terms count violations of rules a usable roster must satisfy.
//! Soft terms penalize fatigue-inducing shift sequences; the
//! night → off → afternoon recovery pattern is rewarded (negative).
//!
//! The evaluator is a pure function of the roster and the unit's
//! demand table: no hidden state, deterministic, safe to call
//! concurrently on independent rosters.

use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;
use crate::models::{Roster, ShiftCode, StaffingDemand, WORKING_SHIFTS};

/// Scores rosters for one unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostEvaluator {
    demand: StaffingDemand,
    hard_multiplier: f64,
    nurses: usize,
    days: usize,
}

impl CostEvaluator {
    /// Creates an evaluator for a unit of `nurses` nurses over `days` days.
    pub fn new(
        demand: StaffingDemand,
        hard_multiplier: f64,
        nurses: usize,
        days: usize,
    ) -> Result<Self, ScheduleError> {
        if hard_multiplier < 0.0 {
            return Err(ScheduleError::configuration(format!(
                "hard constraint multiplier must be non-negative, got {hard_multiplier}"
            )));
        }
        demand.validate(days, nurses)?;
        Ok(Self {
            demand,
            hard_multiplier,
            nurses,
            days,
        })
    }

    /// Total cost of a roster.
    pub fn evaluate(&self, roster: &Roster) -> f64 {
        let hard = self.staffing_deficit(roster)
            + self.one_shift_per_day(roster)
            + self.night_then_morning(roster);
        let soft = self.afternoon_then_morning(roster)
            + self.morning_then_night(roster)
            + self.night_off_afternoon(roster);
        self.hard_multiplier * hard as f64 + soft as f64
    }

    /// Total cost of a flattened level vector (the optimizer's view).
    ///
    /// Decodes through round + clamp first, so any real-valued input
    /// of the right length is scoreable.
    pub fn evaluate_levels(&self, levels: &[f64]) -> Result<f64, ScheduleError> {
        let roster = Roster::from_levels(self.nurses, self.days, levels)?;
        Ok(self.evaluate(&roster))
    }

    /// Hard term: sum over days and working shifts of
    /// `max(0, minimum - actual)`.
    pub fn staffing_deficit(&self, roster: &Roster) -> i64 {
        let mut deficit = 0i64;
        for day in 0..roster.days() {
            let counts = roster.daily_counts(day);
            for shift in WORKING_SHIFTS {
                let minimum = i64::from(self.demand.minimum(day, shift));
                let actual = counts[usize::from(shift.code())] as i64;
                deficit += (minimum - actual).max(0);
            }
        }
        deficit
    }

    /// Hard term: one shift per nurse per day.
    ///
    /// Always zero here: each roster cell holds a single code, so the
    /// constraint holds structurally. Kept as an explicit term so the
    /// scoring formula mirrors the full constraint taxonomy.
    pub fn one_shift_per_day(&self, _roster: &Roster) -> i64 {
        0
    }

    /// Hard term: number of Night assignments directly followed by a
    /// Morning assignment for the same nurse.
    pub fn night_then_morning(&self, roster: &Roster) -> i64 {
        self.count_adjacent(roster, ShiftCode::Night, ShiftCode::Morning)
    }

    /// Soft term: Afternoon followed by Morning the next day
    /// (physical fatigue: late evening straight into early start).
    pub fn afternoon_then_morning(&self, roster: &Roster) -> i64 {
        self.count_adjacent(roster, ShiftCode::Afternoon, ShiftCode::Morning)
    }

    /// Soft term: Morning followed by Night the next day
    /// (a rest gap long enough to sap motivation).
    pub fn morning_then_night(&self, roster: &Roster) -> i64 {
        self.count_adjacent(roster, ShiftCode::Morning, ShiftCode::Night)
    }

    /// Soft term: Night, then Off, then Afternoon — the preferred
    /// recovery pattern. Each occurrence contributes −1.
    pub fn night_off_afternoon(&self, roster: &Roster) -> i64 {
        let mut reward = 0i64;
        for nurse in 0..roster.nurses() {
            for day in 0..roster.days().saturating_sub(2) {
                if roster.get(nurse, day) == ShiftCode::Night
                    && roster.get(nurse, day + 1) == ShiftCode::Off
                    && roster.get(nurse, day + 2) == ShiftCode::Afternoon
                {
                    reward -= 1;
                }
            }
        }
        reward
    }

    fn count_adjacent(&self, roster: &Roster, first: ShiftCode, second: ShiftCode) -> i64 {
        let mut count = 0i64;
        for nurse in 0..roster.nurses() {
            for day in 0..roster.days().saturating_sub(1) {
                if roster.get(nurse, day) == first && roster.get(nurse, day + 1) == second {
                    count += 1;
                }
            }
        }
        count
    }
}
