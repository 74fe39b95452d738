//! Initial roster construction and feasibility repair.
//!
//! Builds a roster by drawing every cell uniformly at random, then
//! drives the per-day staffing deficit to zero with greedy local
//! moves, resolving night → morning adjacencies along the way.
//!
//! The repair is local and randomized: when a pass fails to reduce the
//! deficit (stall), the grid is discarded and rebuilt from a fresh
//! draw. Restarts are bounded; exhausting the budget is a typed
//! failure rather than an endless loop. A returned roster always has
//! zero staffing deficit, but residual adjacency violations can
//! survive — the optimizer's hard-penalty term handles the remainder.

use rand::Rng;
use tracing::debug;

use crate::error::ScheduleError;
use crate::models::{Roster, ShiftCode, StaffingDemand, SHIFT_CODES, WORKING_SHIFTS};

/// Default restart budget.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 50;
/// Default repair passes allowed per attempt before it counts as stalled.
pub const DEFAULT_MAX_PASSES: u32 = 200;

/// Builds staffing-feasible rosters for one unit.
#[derive(Debug, Clone)]
pub struct RepairEngine {
    demand: StaffingDemand,
    nurses: usize,
    days: usize,
    max_attempts: u32,
    max_passes: u32,
}

impl RepairEngine {
    /// Creates a repair engine for a unit of `nurses` nurses.
    pub fn new(demand: StaffingDemand, nurses: usize, days: usize) -> Self {
        Self {
            demand,
            nurses,
            days,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            max_passes: DEFAULT_MAX_PASSES,
        }
    }

    /// Overrides the restart budget.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Overrides the per-attempt pass budget.
    pub fn with_max_passes(mut self, max_passes: u32) -> Self {
        self.max_passes = max_passes;
        self
    }

    /// Produces a roster whose staffing deficit is zero.
    ///
    /// Draws a random grid and repairs it; on stall, redraws and tries
    /// again up to the attempt budget.
    pub fn build<R: Rng>(&self, rng: &mut R) -> Result<Roster, ScheduleError> {
        for attempt in 0..self.max_attempts {
            let mut roster = Roster::random(self.nurses, self.days, rng);
            if self.repair(&mut roster, rng) {
                return Ok(roster);
            }
            debug!(attempt, "repair stalled, redrawing roster");
        }
        Err(ScheduleError::InfeasibleInstance {
            attempts: self.max_attempts,
        })
    }

    /// Total staffing deficit: sum over days and working shifts of
    /// `max(0, minimum - actual)`. Zero means staffing-feasible.
    pub fn infeasibility(&self, roster: &Roster) -> i64 {
        let mut total = 0i64;
        for day in 0..roster.days() {
            let balance = self.demand.day_balance(day, &roster.daily_counts(day));
            total += balance.iter().map(|&b| (-b).max(0)).sum::<i64>();
        }
        total
    }

    /// Repairs in place until the deficit reaches zero. Returns `false`
    /// on stall (deficit unchanged after a full pass) or when the pass
    /// budget runs out.
    fn repair<R: Rng>(&self, roster: &mut Roster, rng: &mut R) -> bool {
        let mut score = self.infeasibility(roster);
        let mut passes = 0u32;
        while score != 0 {
            if passes >= self.max_passes {
                return false;
            }
            self.deficit_pass(roster);
            self.adjacency_sweep(roster, rng);

            let rescored = self.infeasibility(roster);
            if rescored == score {
                return false;
            }
            score = rescored;
            passes += 1;
        }
        true
    }

    /// One greedy pass: for every (day, shift) deficit, reassign
    /// nurses out of same-day surplus shifts until the deficit is
    /// covered or no donors remain.
    fn deficit_pass(&self, roster: &mut Roster) {
        for day in 0..roster.days() {
            let balance = self.demand.day_balance(day, &roster.daily_counts(day));
            for (i, &shift) in WORKING_SHIFTS.iter().enumerate() {
                let mut needed = (-balance[i]).max(0);
                if needed == 0 {
                    continue;
                }
                for donor_shift in self.surplus_shifts(roster, day) {
                    if needed == 0 {
                        break;
                    }
                    for nurse in roster.nurses_on(day, donor_shift) {
                        if needed == 0 {
                            break;
                        }
                        if self.try_move(roster, nurse, day, shift) {
                            needed -= 1;
                        }
                    }
                }
            }
        }
    }

    /// Shifts with a same-day surplus, in code order. Off always
    /// counts as surplus donor material since it has no minimum.
    fn surplus_shifts(&self, roster: &Roster, day: usize) -> Vec<ShiftCode> {
        let counts = roster.daily_counts(day);
        let balance = self.demand.day_balance(day, &counts);
        let mut donors = Vec::new();
        for (i, &shift) in WORKING_SHIFTS.iter().enumerate() {
            if balance[i] > 0 {
                donors.push(shift);
            }
        }
        if counts[usize::from(ShiftCode::Off.code())] > 0 {
            donors.push(ShiftCode::Off);
        }
        donors
    }

    /// Moves one nurse into `target` on `day`, guarding the
    /// night → morning adjacency in both directions:
    ///
    /// - into Morning after a Night: flip the prior Night to Afternoon
    ///   instead (the nurse is not moved);
    /// - into Night before a Morning: flip the next Morning to
    ///   Afternoon instead;
    /// - into Afternoon: unconditional.
    ///
    /// Returns `true` only when the nurse actually entered `target`.
    fn try_move(&self, roster: &mut Roster, nurse: usize, day: usize, target: ShiftCode) -> bool {
        match target {
            ShiftCode::Morning => {
                if day > 0 && roster.get(nurse, day - 1) == ShiftCode::Night {
                    roster.set(nurse, day - 1, ShiftCode::Afternoon);
                    false
                } else {
                    roster.set(nurse, day, ShiftCode::Morning);
                    true
                }
            }
            ShiftCode::Night => {
                if day + 1 < roster.days() && roster.get(nurse, day + 1) == ShiftCode::Morning {
                    roster.set(nurse, day + 1, ShiftCode::Afternoon);
                    false
                } else {
                    roster.set(nurse, day, ShiftCode::Night);
                    true
                }
            }
            ShiftCode::Afternoon => {
                roster.set(nurse, day, ShiftCode::Afternoon);
                true
            }
            ShiftCode::Off => false,
        }
    }

    /// Resolves night → morning adjacencies left behind by the greedy
    /// pass. Each violation is fixed by a fair coin flip: either the
    /// next-day Morning becomes a random non-Morning code, or the
    /// Night itself becomes a fully random code.
    fn adjacency_sweep<R: Rng>(&self, roster: &mut Roster, rng: &mut R) {
        let nights: Vec<(usize, usize)> = roster
            .iter_cells()
            .filter(|&(_, _, s)| s == ShiftCode::Night)
            .map(|(n, d, _)| (n, d))
            .collect();

        for (nurse, day) in nights {
            if day + 1 >= roster.days() || roster.get(nurse, day + 1) != ShiftCode::Morning {
                continue;
            }
            if rng.random_bool(0.5) {
                let replacement = SHIFT_CODES[rng.random_range(1..SHIFT_CODES.len())];
                roster.set(nurse, day + 1, replacement);
            } else {
                let replacement = SHIFT_CODES[rng.random_range(0..SHIFT_CODES.len())];
                roster.set(nurse, day, replacement);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_build_reaches_zero_deficit() {
        let demand = StaffingDemand::uniform(7, [2, 2, 1]);
        let engine = RepairEngine::new(demand, 8, 7);
        let mut rng = SmallRng::seed_from_u64(42);

        let roster = engine.build(&mut rng).unwrap();
        assert_eq!(roster.nurses(), 8);
        assert_eq!(roster.days(), 7);
        assert_eq!(engine.infeasibility(&roster), 0);
    }

    #[test]
    fn test_build_cells_stay_in_domain() {
        let demand = StaffingDemand::uniform(5, [1, 1, 1]);
        let engine = RepairEngine::new(demand, 4, 5);
        let mut rng = SmallRng::seed_from_u64(7);

        let roster = engine.build(&mut rng).unwrap();
        for (_, _, shift) in roster.iter_cells() {
            assert!(shift.code() <= 3);
        }
    }

    #[test]
    fn test_infeasibility_score() {
        let demand = StaffingDemand::uniform(2, [1, 1, 0]);
        let engine = RepairEngine::new(demand, 2, 2);
        use ShiftCode::{Afternoon, Morning, Off};
        // Day 0 covered, day 1 missing both working minimums.
        let roster =
            Roster::from_cells(2, 2, vec![Morning, Off, Afternoon, Off]).unwrap();
        assert_eq!(engine.infeasibility(&roster), 2);
    }

    #[test]
    fn test_impossible_demand_exhausts_attempts() {
        // 2 nurses can never cover 7 required slots per day.
        let demand = StaffingDemand::uniform(3, [3, 2, 2]);
        let engine = RepairEngine::new(demand, 2, 3).with_max_attempts(3);
        let mut rng = SmallRng::seed_from_u64(42);

        let err = engine.build(&mut rng).unwrap_err();
        assert_eq!(err, ScheduleError::InfeasibleInstance { attempts: 3 });
    }

    #[test]
    fn test_zero_attempt_budget() {
        let demand = StaffingDemand::uniform(2, [1, 0, 0]);
        let engine = RepairEngine::new(demand, 2, 2).with_max_attempts(0);
        let mut rng = SmallRng::seed_from_u64(42);
        assert!(engine.build(&mut rng).is_err());
    }

    #[test]
    fn test_build_is_reproducible_with_seed() {
        let demand = StaffingDemand::uniform(5, [2, 1, 1]);
        let engine = RepairEngine::new(demand, 6, 5);

        let a = engine.build(&mut SmallRng::seed_from_u64(9)).unwrap();
        let b = engine.build(&mut SmallRng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }
}
