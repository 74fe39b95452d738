//! Scheduling domain models.
//!
//! Core data types for the nurse shift scheduling problem: the shift
//! vocabulary, the roster grid, the minimum staffing table, and the
//! per-unit problem instance they assemble into.
//!
//! | Type | Role |
//! |------|------|
//! | [`ShiftCode`] | One of four daily shift assignments |
//! | [`Roster`] | Nurse × day grid of shift codes |
//! | [`StaffingDemand`] | Minimum nurse count per shift per day |
//! | [`UnitConfig`] / [`UnitProblem`] | Per-unit configuration and instance |

mod roster;
mod shift;
mod staffing;
mod unit;

pub use roster::Roster;
pub use shift::{ShiftCode, SHIFT_CODES, WORKING_SHIFTS};
pub use staffing::StaffingDemand;
pub use unit::{UnitConfig, UnitProblem, DEFAULT_HORIZON_DAYS};
