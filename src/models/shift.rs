//! Shift code vocabulary.
//!
//! Each roster cell holds exactly one [`ShiftCode`], stored as an
//! integer 0–3 so the optimizer can treat positions as continuous
//! values during perturbation. Labels are applied only at presentation
//! boundaries.

use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// Daily shift assignment for one nurse.
///
/// The integer codes are part of the crate's contract: the optimizer
/// perturbs them as real numbers and [`ShiftCode::from_level`] maps
/// them back into the discrete domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ShiftCode {
    /// Morning shift (code 0).
    Morning = 0,
    /// Afternoon shift (code 1).
    Afternoon = 1,
    /// Night shift (code 2).
    Night = 2,
    /// Day off (code 3).
    Off = 3,
}

/// All codes in numeric order. Index in this array = integer code.
pub const SHIFT_CODES: [ShiftCode; 4] = [
    ShiftCode::Morning,
    ShiftCode::Afternoon,
    ShiftCode::Night,
    ShiftCode::Off,
];

/// Working shifts subject to minimum staffing (Off has no minimum).
pub const WORKING_SHIFTS: [ShiftCode; 3] =
    [ShiftCode::Morning, ShiftCode::Afternoon, ShiftCode::Night];

impl ShiftCode {
    /// Integer code (0–3).
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Continuous value used by the optimizer's numeric view.
    #[inline]
    pub fn level(self) -> f64 {
        f64::from(self as u8)
    }

    /// Converts an integer code back to a shift.
    pub fn from_code(code: u8) -> Result<Self, ScheduleError> {
        SHIFT_CODES
            .get(usize::from(code))
            .copied()
            .ok_or_else(|| ScheduleError::invariant(format!("shift code {code} out of domain 0-3")))
    }

    /// Decodes a continuous optimizer value: round, then clamp to [0, 3].
    ///
    /// This is the single discretization point between the optimizer's
    /// real-valued view and the discrete shift domain.
    pub fn from_level(level: f64) -> Self {
        let code = level.round().clamp(0.0, 3.0) as u8;
        SHIFT_CODES[usize::from(code)]
    }

    /// Presentation label.
    pub fn label(self) -> &'static str {
        match self {
            ShiftCode::Morning => "Morning",
            ShiftCode::Afternoon => "Afternoon",
            ShiftCode::Night => "Night",
            ShiftCode::Off => "Off",
        }
    }

    /// Parses a presentation label back into a code.
    pub fn from_label(label: &str) -> Result<Self, ScheduleError> {
        match label {
            "Morning" => Ok(ShiftCode::Morning),
            "Afternoon" => Ok(ShiftCode::Afternoon),
            "Night" => Ok(ShiftCode::Night),
            "Off" => Ok(ShiftCode::Off),
            other => Err(ScheduleError::invariant(format!(
                "unknown shift label '{other}'"
            ))),
        }
    }
}
