//! Error types for password parsing and record encoding

use thiserror::Error;

/// Hard failures of the codec
///
/// Checksum mismatches and unknown table references are not errors,
/// see [`crate::report::Warning`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordError {
    /// Password is not exactly 60 characters once whitespace is removed
    #[error("invalid password length: expected {expected} characters, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// A two-character token is not one of the known symbols
    #[error("invalid symbol {token:?} at position {position}")]
    InvalidSymbol { position: usize, token: String },

    /// A record field does not fit in its bit width
    #[error("field `{field}` value {value} does not fit in {bits} bits")]
    FieldRangeViolation {
        field: &'static str,
        value: u32,
        bits: u32,
    },
}
