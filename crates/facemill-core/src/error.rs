//! Error types for toolpath calculation and program generation.

use std::io;
use thiserror::Error;

/// Errors raised while validating a parameter set.
///
/// The validator stops at the first failing rule, so a value of this type
/// always names exactly one offending section/field.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A required parameter or section is missing.
    #[error("Missing required parameter: {0}")]
    Missing(String),

    /// A parameter value is outside its valid range.
    #[error("Parameter '{name}' out of range: {value} (valid: {min}..{max})")]
    OutOfRange {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A parameter value is invalid for a reason other than a range.
    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue { name: String, reason: String },

    /// Parameters are individually valid but mutually incompatible.
    #[error("Incompatible parameters: {0}")]
    Incompatible(String),
}

/// Errors that can occur while generating or persisting a program.
#[derive(Error, Debug)]
pub enum ProgramError {
    /// Parameter validation failed; no geometry was computed.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A required machine setting or coolant entry is absent from the
    /// supplied configuration. Distinct from validation so callers can
    /// tell bad input from a bad environment.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Persistence failure; the generated program string is unaffected
    /// and the write may be retried.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for program generation and persistence.
pub type ProgramResult<T> = Result<T, ProgramError>;
