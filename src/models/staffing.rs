//! Minimum staffing demand.
//!
//! Rows = days, columns = the three working shifts. The Off shift has
//! no minimum. In current use the demand is constant across the
//! horizon (one `[morning, afternoon, night]` triple per unit), but
//! the table keeps a per-day row so day-varying demand stays possible.

use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;
use crate::models::shift::{ShiftCode, WORKING_SHIFTS};

/// Minimum nurse counts per working shift per day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffingDemand {
    /// Per-day `[morning, afternoon, night]` minimums.
    rows: Vec<[u32; 3]>,
}

impl StaffingDemand {
    /// Builds a demand table with the same minimums on every day.
    pub fn uniform(days: usize, minimums: [u32; 3]) -> Self {
        Self {
            rows: vec![minimums; days],
        }
    }

    /// Builds a demand table from explicit per-day rows.
    pub fn per_day(rows: Vec<[u32; 3]>) -> Self {
        Self { rows }
    }

    /// Number of days covered.
    #[inline]
    pub fn days(&self) -> usize {
        self.rows.len()
    }

    /// Minimum count for a working shift on one day. Off is always 0.
    pub fn minimum(&self, day: usize, shift: ShiftCode) -> u32 {
        match shift {
            ShiftCode::Morning => self.rows[day][0],
            ShiftCode::Afternoon => self.rows[day][1],
            ShiftCode::Night => self.rows[day][2],
            ShiftCode::Off => 0,
        }
    }

    /// Checks that the demand covers `days` days and is satisfiable by
    /// `nurses` nurses on every day.
    pub fn validate(&self, days: usize, nurses: usize) -> Result<(), ScheduleError> {
        if self.days() != days {
            return Err(ScheduleError::configuration(format!(
                "staffing demand covers {} days, horizon is {days}",
                self.days()
            )));
        }
        for (day, row) in self.rows.iter().enumerate() {
            let total: u32 = row.iter().sum();
            if total as usize > nurses {
                return Err(ScheduleError::configuration(format!(
                    "day {day} requires {total} nurses, unit has {nurses}"
                )));
            }
        }
        Ok(())
    }

    /// Per-shift surplus (positive) or deficit (negative) of a count
    /// vector against this day's minimums, in working-shift order.
    pub fn day_balance(&self, day: usize, counts: &[usize; 4]) -> [i64; 3] {
        let mut balance = [0i64; 3];
        for (i, shift) in WORKING_SHIFTS.iter().enumerate() {
            let actual = counts[usize::from(shift.code())] as i64;
            balance[i] = actual - i64::from(self.minimum(day, *shift));
        }
        balance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_demand() {
        let d = StaffingDemand::uniform(3, [2, 1, 1]);
        assert_eq!(d.days(), 3);
        assert_eq!(d.minimum(0, ShiftCode::Morning), 2);
        assert_eq!(d.minimum(2, ShiftCode::Night), 1);
        assert_eq!(d.minimum(1, ShiftCode::Off), 0);
    }

    #[test]
    fn test_validate_day_mismatch() {
        let d = StaffingDemand::uniform(3, [1, 1, 1]);
        assert!(d.validate(4, 10).is_err());
    }

    #[test]
    fn test_validate_unsatisfiable() {
        let d = StaffingDemand::uniform(3, [4, 4, 4]);
        let err = d.validate(3, 10).unwrap_err();
        assert!(matches!(err, ScheduleError::Configuration(_)));
        assert!(d.validate(3, 12).is_ok());
    }

    #[test]
    fn test_day_balance() {
        let d = StaffingDemand::uniform(1, [2, 1, 1]);
        // counts: 1 morning, 3 afternoon, 0 night, 2 off
        let balance = d.day_balance(0, &[1, 3, 0, 2]);
        assert_eq!(balance, [-1, 2, -1]);
    }
}
