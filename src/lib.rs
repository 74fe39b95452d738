//! Nurse shift scheduling via Water Wave Optimization.
//!
//! Assigns each nurse in a hospital unit one of four daily shift codes
//! (Morning, Afternoon, Night, Off) over a planning horizon, meeting
//! minimum staffing per shift per day and avoiding a Night shift
//! directly followed by a Morning shift, while minimizing
//! fatigue-inducing shift sequences.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `ShiftCode`, `Roster`,
//!   `StaffingDemand`, `UnitConfig`, `UnitProblem`
//! - **`repair`**: Randomized-restart construction of a
//!   staffing-feasible initial roster
//! - **`cost`**: Pure hard/soft constraint scoring of any roster
//! - **`wwo`**: Population-based Water Wave Optimization over the
//!   continuous view of a roster
//! - **`pipeline`**: Per-unit solve (repair → optimize → report)
//!
//! # Usage
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::SmallRng;
//! use shiftwave::models::UnitConfig;
//! use shiftwave::pipeline::{solve_unit, UnitId};
//! use shiftwave::wwo::WwoConfig;
//!
//! let unit = UnitConfig::new(7, 8, [2, 2, 1]).with_hard_multiplier(10.0);
//! let wwo = WwoConfig::default().with_iterations(20);
//! let mut rng = SmallRng::seed_from_u64(42);
//!
//! let report = solve_unit(UnitId::new("ICU"), unit, &wwo, &mut rng).unwrap();
//! assert_eq!(report.labels().len(), 8);
//! ```
//!
//! Search is best-effort: neither the repair step nor the optimizer
//! guarantees a violation-free roster, only a bounded push toward one.
//!
//! # References
//!
//! - Zheng (2015), "Water wave optimization: A new nature-inspired
//!   metaheuristic"
//! - Burke et al. (2004), "The State of the Art of Nurse Rostering"

pub mod cost;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod repair;
pub mod wwo;

pub use error::ScheduleError;
