//! Coercion of raw rule values into typed operands.
//!
//! Rule values arrive as the strings an operator typed. Before a rule can be
//! compared against records its value is read as the field's value type.

use crate::error::CoercionError;
use crate::op::Op;
use crate::registry::{FieldDescriptor, ValueType};
use crate::value::{Number, Timestamp};

/// Typed operand of a compiled rule.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    /// Lower-cased, trimmed needle for case-insensitive matching.
    Text(String),
    Number(Number),
    Date(Timestamp),
    /// Inclusive range for `between`.
    DateRange { start: Timestamp, end: Timestamp },
}

/// Reads `raw` as a value of `value_type`.
///
/// Date values are single dates here; use [`coerce_for`] to get the
/// `between` range form.
///
/// ```
/// use sift_rules::{coerce, Number, TypedValue, ValueType};
///
/// assert_eq!(coerce("50000", ValueType::Number), Ok(TypedValue::Number(Number::I64(50000))));
/// assert!(coerce("abc", ValueType::Number).is_err());
/// ```
pub fn coerce(raw: &str, value_type: ValueType) -> Result<TypedValue, CoercionError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoercionError::Empty);
    }
    match value_type {
        ValueType::Text | ValueType::Select => Ok(TypedValue::Text(trimmed.to_lowercase())),
        ValueType::Number => Number::parse(trimmed)
            .map(TypedValue::Number)
            .ok_or_else(|| CoercionError::NotANumber(trimmed.to_string())),
        ValueType::Date => Timestamp::parse(trimmed)
            .map(|(ts, _)| TypedValue::Date(ts))
            .ok_or_else(|| CoercionError::NotADate(trimmed.to_string())),
    }
}

/// Reads `raw` as the operand of `op` on `field`.
///
/// On top of [`coerce`] this parses `between` ranges and, for `equals` /
/// `not_equals` on select fields that declare options, requires the value to
/// be one of them.
pub fn coerce_for(field: &FieldDescriptor, op: Op, raw: &str) -> Result<TypedValue, CoercionError> {
    match (field.value_type, op) {
        (ValueType::Date, Op::Between) => coerce_range(raw),
        (ValueType::Select, Op::Equals | Op::NotEquals)
            if !field.options.is_empty() && field.option(raw).is_none() =>
        {
            Err(CoercionError::UnknownOption(raw.trim().to_string()))
        }
        (value_type, _) => coerce(raw, value_type),
    }
}

/// Parses `start,end` (or `start..end`) into an inclusive range.
///
/// A date-only end bound covers its whole day.
fn coerce_range(raw: &str) -> Result<TypedValue, CoercionError> {
    let bad = || CoercionError::BadRange(raw.trim().to_string());

    let (start, end) = raw
        .split_once(',')
        .or_else(|| raw.split_once(".."))
        .ok_or_else(bad)?;
    let (start, _) = Timestamp::parse(start).ok_or_else(bad)?;
    let (end, date_only) = Timestamp::parse(end).ok_or_else(bad)?;
    let end = if date_only { end.end_of_day() } else { end };

    if start > end {
        return Err(bad());
    }
    Ok(TypedValue::DateRange { start, end })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SelectOption;

    const JAN_1_2024: i64 = 1_704_067_200_000;
    const DAY: i64 = 86_400_000;

    #[test]
    fn text_is_trimmed_and_folded() {
        assert_eq!(
            coerce("  Retail ", ValueType::Text),
            Ok(TypedValue::Text("retail".into()))
        );
        assert_eq!(
            coerce("ÉLAN", ValueType::Select),
            Ok(TypedValue::Text("élan".into()))
        );
    }

    #[test]
    fn empty_value_fails_for_every_type() {
        for vt in [ValueType::Text, ValueType::Number, ValueType::Date, ValueType::Select] {
            assert_eq!(coerce("   ", vt), Err(CoercionError::Empty));
        }
    }

    #[test]
    fn numbers() {
        assert_eq!(
            coerce("50000", ValueType::Number),
            Ok(TypedValue::Number(Number::I64(50000)))
        );
        assert_eq!(
            coerce("19.99", ValueType::Number),
            Ok(TypedValue::Number(Number::F64(19.99)))
        );
        assert_eq!(
            coerce("abc", ValueType::Number),
            Err(CoercionError::NotANumber("abc".into()))
        );
    }

    #[test]
    fn dates() {
        assert_eq!(
            coerce("2024-01-01", ValueType::Date),
            Ok(TypedValue::Date(Timestamp(JAN_1_2024)))
        );
        assert_eq!(
            coerce("01/02/2024", ValueType::Date),
            Err(CoercionError::NotADate("01/02/2024".into()))
        );
    }

    #[test]
    fn between_ranges() {
        let field = FieldDescriptor::new("created_at", "Created", ValueType::Date);
        let expected = TypedValue::DateRange {
            start: Timestamp(JAN_1_2024),
            end: Timestamp(JAN_1_2024 + 2 * DAY - 1),
        };
        assert_eq!(
            coerce_for(&field, Op::Between, "2024-01-01,2024-01-02"),
            Ok(expected.clone())
        );
        assert_eq!(
            coerce_for(&field, Op::Between, "2024-01-01 .. 2024-01-02"),
            Ok(expected)
        );
        assert_eq!(
            coerce_for(&field, Op::Between, "2024-01-01T00:00:00Z,2024-01-01T12:00:00Z"),
            Ok(TypedValue::DateRange {
                start: Timestamp(JAN_1_2024),
                end: Timestamp(JAN_1_2024 + DAY / 2),
            })
        );
    }

    #[test]
    fn between_rejects_bad_ranges() {
        let field = FieldDescriptor::new("created_at", "Created", ValueType::Date);
        for raw in ["2024-01-01", "2024-01-05,2024-01-01", "x,2024-01-01", "2024-01-01,"] {
            assert_eq!(
                coerce_for(&field, Op::Between, raw),
                Err(CoercionError::BadRange(raw.to_string())),
                "{raw}"
            );
        }
    }

    #[test]
    fn select_options_restrict_equality() {
        let mut field = FieldDescriptor::new("type", "Type", ValueType::Select);
        field.options = vec![
            SelectOption::new("Retail", "Retail"),
            SelectOption::new("Wholesale", "Wholesale"),
        ];

        assert_eq!(
            coerce_for(&field, Op::Equals, "retail"),
            Ok(TypedValue::Text("retail".into()))
        );
        assert_eq!(
            coerce_for(&field, Op::NotEquals, "Distributor"),
            Err(CoercionError::UnknownOption("Distributor".into()))
        );
        // Substring operators are free-form even on select fields.
        assert_eq!(
            coerce_for(&field, Op::Contains, "sale"),
            Ok(TypedValue::Text("sale".into()))
        );
    }

    #[test]
    fn select_without_options_accepts_anything() {
        let field = FieldDescriptor::new("region", "Region", ValueType::Select);
        assert_eq!(
            coerce_for(&field, Op::Equals, "North"),
            Ok(TypedValue::Text("north".into()))
        );
    }
}
