//! Error types for rule compilation.
//!
//! None of these escape rule evaluation: [`compile`](crate::compile) and
//! [`evaluate`](crate::evaluate) turn them into never-matching predicates.
//! They are exposed so callers (and logs) can tell *why* a rule matches nothing.

use thiserror::Error;

use crate::registry::ValueType;

/// Reasons a rule or group cannot select anything.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuleError {
    /// The rule names a field the registry does not declare.
    #[error("unknown field '{0}'")]
    UnknownField(String),

    /// The operator code is not recognized at all.
    #[error("unknown operator '{0}'")]
    UnknownOperator(String),

    /// Operator is not valid for the field's value type.
    #[error("operator '{op}' is not valid for {value_type} fields")]
    TypeMismatch {
        op: &'static str,
        value_type: ValueType,
    },

    /// The rule value could not be read as the field's value type.
    #[error("value for field '{field}' is invalid: {source}")]
    Coercion {
        field: String,
        #[source]
        source: CoercionError,
    },

    /// The group has no active rules.
    #[error("rule group has no active rules")]
    EmptyRuleGroup,
}

/// Failure to read a raw rule value as a typed value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    #[error("value is empty")]
    Empty,

    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("'{0}' is not a date")]
    NotADate(String),

    /// `between` needs `start,end` with start not after end.
    #[error("'{0}' is not a valid date range")]
    BadRange(String),

    #[error("'{0}' is not one of the field's options")]
    UnknownOption(String),
}

/// Result type for rule operations.
pub type Result<T> = std::result::Result<T, RuleError>;
