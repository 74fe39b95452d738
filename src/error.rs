//! Error types for roster construction and optimization.
//!
//! Configuration problems are rejected before any repair or optimization
//! work starts. Repair exhaustion is a recoverable, typed failure.
//! Invariant violations indicate a programming error in the caller
//! (wrong grid shape, out-of-domain codes) and are never produced
//! during normal operation.

use thiserror::Error;

/// Errors produced by roster construction and the optimization pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleError {
    /// Input configuration failed validation before any work began.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The repair engine exhausted its restart budget without reaching
    /// a staffing-feasible roster.
    #[error("no feasible roster found within {attempts} repair attempts")]
    InfeasibleInstance { attempts: u32 },

    /// A structural invariant was broken (wrong grid shape, code outside
    /// the shift domain). Indicates a bug in the caller, not bad input.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

impl ScheduleError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation(message.into())
    }
}
