//! Water Wave Optimization over flattened rosters.
//!
//! The optimizer treats each candidate roster as a real-valued vector
//! (shift codes as continuous coordinates) and improves a population
//! of such vectors with three operators:
//!
//! - **propagation**: broad uniform perturbation, applied every iteration;
//! - **breaking**: local refinement of a wave that just set a new global best;
//! - **refraction**: resampling a stalled wave toward the global best.
//!
//! Decoding back to discrete shift codes happens only at evaluation
//! and reporting boundaries.
//!
//! # Reference
//! Zheng (2015), "Water wave optimization: A new nature-inspired
//! metaheuristic"

mod config;
mod runner;
mod wave;

pub use config::WwoConfig;
pub use runner::{CostTracePoint, WwoOutcome, WwoRunner};
pub use wave::Wave;
