//! Roster (schedule grid) model.
//!
//! A roster is a nurse × day table of [`ShiftCode`], stored row-major.
//! Because every cell is a single code, "one shift per nurse per day"
//! holds by construction and never needs separate enforcement.
//!
//! The roster has two views: the discrete grid used by scoring and
//! reporting, and a flattened real-valued vector used by the
//! optimizer's perturbation operators. [`Roster::from_levels`] is the
//! decode boundary between them.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;
use crate::models::shift::{ShiftCode, SHIFT_CODES};

/// A complete shift roster for one unit.
///
/// Rows = nurses, columns = days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    nurses: usize,
    days: usize,
    /// Row-major cells: index = nurse * days + day.
    cells: Vec<ShiftCode>,
}

impl Roster {
    /// Creates a roster from explicit cells.
    ///
    /// Fails with an invariant violation if the cell count does not
    /// match `nurses × days`.
    pub fn from_cells(
        nurses: usize,
        days: usize,
        cells: Vec<ShiftCode>,
    ) -> Result<Self, ScheduleError> {
        if cells.len() != nurses * days {
            return Err(ScheduleError::invariant(format!(
                "roster shape mismatch: {} cells for {nurses} nurses x {days} days",
                cells.len()
            )));
        }
        Ok(Self {
            nurses,
            days,
            cells,
        })
    }

    /// Creates a roster with every cell drawn uniformly at random.
    pub fn random<R: Rng>(nurses: usize, days: usize, rng: &mut R) -> Self {
        let cells = (0..nurses * days)
            .map(|_| SHIFT_CODES[rng.random_range(0..SHIFT_CODES.len())])
            .collect();
        Self {
            nurses,
            days,
            cells,
        }
    }

    /// Decodes a flattened level vector back into a roster.
    ///
    /// Each value is rounded and clamped into the 0–3 code domain, so
    /// any real-valued input produces a structurally valid roster.
    /// Fails only on a shape mismatch.
    pub fn from_levels(nurses: usize, days: usize, levels: &[f64]) -> Result<Self, ScheduleError> {
        if levels.len() != nurses * days {
            return Err(ScheduleError::invariant(format!(
                "level vector length {} does not match {nurses} nurses x {days} days",
                levels.len()
            )));
        }
        let cells = levels.iter().map(|&v| ShiftCode::from_level(v)).collect();
        Ok(Self {
            nurses,
            days,
            cells,
        })
    }

    /// Number of nurses (rows).
    #[inline]
    pub fn nurses(&self) -> usize {
        self.nurses
    }

    /// Planning horizon in days (columns).
    #[inline]
    pub fn days(&self) -> usize {
        self.days
    }

    /// Shift assigned to `nurse` on `day`.
    #[inline]
    pub fn get(&self, nurse: usize, day: usize) -> ShiftCode {
        self.cells[nurse * self.days + day]
    }

    /// Reassigns `nurse` on `day`.
    #[inline]
    pub fn set(&mut self, nurse: usize, day: usize, shift: ShiftCode) {
        self.cells[nurse * self.days + day] = shift;
    }

    /// Counts nurses per shift on one day, indexed by shift code.
    pub fn daily_counts(&self, day: usize) -> [usize; 4] {
        let mut counts = [0usize; 4];
        for nurse in 0..self.nurses {
            counts[usize::from(self.get(nurse, day).code())] += 1;
        }
        counts
    }

    /// Nurses assigned `shift` on `day`.
    pub fn nurses_on(&self, day: usize, shift: ShiftCode) -> Vec<usize> {
        (0..self.nurses)
            .filter(|&n| self.get(n, day) == shift)
            .collect()
    }

    /// Flattens the grid into the optimizer's real-valued view.
    pub fn to_levels(&self) -> Vec<f64> {
        self.cells.iter().map(|s| s.level()).collect()
    }

    /// Exports the grid as presentation labels, one row per nurse.
    pub fn to_labels(&self) -> Vec<Vec<&'static str>> {
        (0..self.nurses)
            .map(|n| (0..self.days).map(|d| self.get(n, d).label()).collect())
            .collect()
    }

    /// Rebuilds a roster from a label table.
    pub fn from_labels(rows: &[Vec<String>]) -> Result<Self, ScheduleError> {
        let nurses = rows.len();
        let days = rows.first().map_or(0, |r| r.len());
        let mut cells = Vec::with_capacity(nurses * days);
        for row in rows {
            if row.len() != days {
                return Err(ScheduleError::invariant("ragged label table"));
            }
            for label in row {
                cells.push(ShiftCode::from_label(label)?);
            }
        }
        Self::from_cells(nurses, days, cells)
    }

    /// Iterates over `(nurse, day, shift)` cells in row-major order.
    pub fn iter_cells(&self) -> impl Iterator<Item = (usize, usize, ShiftCode)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, &s)| (i / self.days, i % self.days, s))
    }
}
