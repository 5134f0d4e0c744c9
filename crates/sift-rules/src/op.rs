//! Rule operators.
//!
//! The [`Op`] enum defines all supported operators, and [`OPERATORS`] is the
//! ordered catalog a rule editor offers. Not all operators are valid for all
//! value types; [`Op::applies_to`] is the single source of truth.

use std::cmp::Ordering;

use crate::registry::ValueType;

const TEXTUAL: &[ValueType] = &[ValueType::Text, ValueType::Select];
const TEXTUAL_OR_NUMBER: &[ValueType] = &[ValueType::Text, ValueType::Select, ValueType::Number];
const NUMBER: &[ValueType] = &[ValueType::Number];
const DATE: &[ValueType] = &[ValueType::Date];

/// Operator of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    // Text, select and number
    /// Equal (case-insensitive for text).
    Equals,
    /// Not equal (case-insensitive for text).
    NotEquals,

    // Text and select
    /// Contains substring (case-insensitive).
    Contains,
    /// Does not contain substring (case-insensitive).
    NotContains,

    // Number
    GreaterThan,
    LessThan,
    GreaterEqual,
    LessEqual,

    // Date
    /// Strictly earlier than.
    Before,
    /// Strictly later than.
    After,
    /// Within an inclusive `start,end` range.
    Between,
}

/// Catalog entry describing an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorDescriptor {
    pub op: Op,
    /// Wire code stored in rules.
    pub code: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    /// Value types the operator may be composed with.
    pub applicable: &'static [ValueType],
}

impl OperatorDescriptor {
    /// Returns `true` if this operator is legal for the value type.
    pub fn applies_to(&self, value_type: ValueType) -> bool {
        self.applicable.contains(&value_type)
    }
}

/// All operators, in the order a rule editor lists them.
pub const OPERATORS: &[OperatorDescriptor] = &[
    descriptor(Op::Equals, TEXTUAL_OR_NUMBER),
    descriptor(Op::NotEquals, TEXTUAL_OR_NUMBER),
    descriptor(Op::Contains, TEXTUAL),
    descriptor(Op::NotContains, TEXTUAL),
    descriptor(Op::GreaterThan, NUMBER),
    descriptor(Op::LessThan, NUMBER),
    descriptor(Op::GreaterEqual, NUMBER),
    descriptor(Op::LessEqual, NUMBER),
    descriptor(Op::Before, DATE),
    descriptor(Op::After, DATE),
    descriptor(Op::Between, DATE),
];

const fn descriptor(op: Op, applicable: &'static [ValueType]) -> OperatorDescriptor {
    OperatorDescriptor {
        op,
        code: op.as_str(),
        label: op.label(),
        applicable,
    }
}

impl Op {
    /// Parses a wire code such as `greater_than`.
    pub fn from_code(code: &str) -> Option<Op> {
        OPERATORS
            .iter()
            .find(|d| d.code == code.trim())
            .map(|d| d.op)
    }

    /// Returns the catalog entry for this operator.
    pub fn descriptor(self) -> &'static OperatorDescriptor {
        // OPERATORS lists every variant in declaration order.
        &OPERATORS[self as usize]
    }

    /// Returns `true` if this operator may be used on fields of `value_type`.
    pub fn applies_to(self, value_type: ValueType) -> bool {
        self.descriptor().applies_to(value_type)
    }

    /// Returns `true` for the negated text operators.
    pub fn is_negated(self) -> bool {
        matches!(self, Op::NotEquals | Op::NotContains)
    }

    /// Evaluates an ordering-based comparison of `field` against the operand.
    ///
    /// `ordering` is `field.cmp(operand)`. Operators that are not
    /// ordering-based return `false`.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            Op::Equals => ordering == Ordering::Equal,
            Op::NotEquals => ordering != Ordering::Equal,
            Op::GreaterThan | Op::After => ordering == Ordering::Greater,
            Op::GreaterEqual => ordering != Ordering::Less,
            Op::LessThan | Op::Before => ordering == Ordering::Less,
            Op::LessEqual => ordering != Ordering::Greater,
            Op::Contains | Op::NotContains | Op::Between => false,
        }
    }

    /// Returns the wire code of this operator.
    pub const fn as_str(self) -> &'static str {
        match self {
            Op::Equals => "equals",
            Op::NotEquals => "not_equals",
            Op::Contains => "contains",
            Op::NotContains => "not_contains",
            Op::GreaterThan => "greater_than",
            Op::LessThan => "less_than",
            Op::GreaterEqual => "greater_equal",
            Op::LessEqual => "less_equal",
            Op::Before => "before",
            Op::After => "after",
            Op::Between => "between",
        }
    }

    /// Returns the display label of this operator.
    pub const fn label(self) -> &'static str {
        match self {
            Op::Equals => "equals",
            Op::NotEquals => "does not equal",
            Op::Contains => "contains",
            Op::NotContains => "does not contain",
            Op::GreaterThan => "greater than",
            Op::LessThan => "less than",
            Op::GreaterEqual => "greater than or equal to",
            Op::LessEqual => "less than or equal to",
            Op::Before => "before",
            Op::After => "after",
            Op::Between => "between",
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_matches_variant_order() {
        for (i, d) in OPERATORS.iter().enumerate() {
            assert_eq!(d.op as usize, i, "{} out of place", d.code);
            assert_eq!(d.op.descriptor().code, d.code);
        }
    }

    #[test]
    fn from_code_round_trips() {
        for d in OPERATORS {
            assert_eq!(Op::from_code(d.code), Some(d.op));
        }
        assert_eq!(Op::from_code(" greater_than "), Some(Op::GreaterThan));
        assert_eq!(Op::from_code("gt"), None);
        assert_eq!(Op::from_code(""), None);
    }

    #[test]
    fn applicability() {
        assert!(Op::Equals.applies_to(ValueType::Text));
        assert!(Op::Equals.applies_to(ValueType::Number));
        assert!(!Op::Equals.applies_to(ValueType::Date));
        assert!(Op::Contains.applies_to(ValueType::Select));
        assert!(!Op::Contains.applies_to(ValueType::Number));
        assert!(Op::GreaterThan.applies_to(ValueType::Number));
        assert!(!Op::GreaterThan.applies_to(ValueType::Text));
        assert!(Op::Between.applies_to(ValueType::Date));
        assert!(!Op::Before.applies_to(ValueType::Number));
    }

    #[test]
    fn eval_ordering() {
        assert!(Op::Equals.eval_ordering(Ordering::Equal));
        assert!(!Op::Equals.eval_ordering(Ordering::Less));
        assert!(Op::NotEquals.eval_ordering(Ordering::Greater));

        assert!(Op::GreaterThan.eval_ordering(Ordering::Greater));
        assert!(!Op::GreaterThan.eval_ordering(Ordering::Equal));
        assert!(Op::GreaterEqual.eval_ordering(Ordering::Equal));
        assert!(!Op::GreaterEqual.eval_ordering(Ordering::Less));

        assert!(Op::LessThan.eval_ordering(Ordering::Less));
        assert!(!Op::LessThan.eval_ordering(Ordering::Equal));
        assert!(Op::LessEqual.eval_ordering(Ordering::Equal));

        assert!(Op::Before.eval_ordering(Ordering::Less));
        assert!(!Op::Before.eval_ordering(Ordering::Equal));
        assert!(Op::After.eval_ordering(Ordering::Greater));

        assert!(!Op::Contains.eval_ordering(Ordering::Equal));
        assert!(!Op::Between.eval_ordering(Ordering::Equal));
    }

    #[test]
    fn display() {
        assert_eq!(Op::GreaterEqual.to_string(), "greater_equal");
        assert_eq!(Op::NotContains.label(), "does not contain");
    }
}
