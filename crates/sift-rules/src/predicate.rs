//! Compilation of a single rule into a record test.
//!
//! [`compile`] never fails. A rule that names an unknown field, pairs an
//! operator with the wrong value type, or carries a value that cannot be read
//! as the field's type becomes a predicate that matches nothing. The reason
//! is kept on the predicate and logged at debug level.

use tracing::debug;

use crate::coerce::{coerce_for, TypedValue};
use crate::error::{Result, RuleError};
use crate::op::Op;
use crate::record::Record;
use crate::registry::{FieldRegistry, ValueType};
use crate::rule::Rule;
use crate::value::Value;

/// A compiled rule.
#[derive(Debug, Clone, PartialEq)]
pub struct RulePredicate {
    rule_id: String,
    check: Check,
}

#[derive(Debug, Clone, PartialEq)]
enum Check {
    Never(RuleError),
    Compare {
        field: String,
        value_type: ValueType,
        op: Op,
        operand: TypedValue,
    },
}

/// Compiles `rule` against `registry`, degrading any problem to a
/// never-matching predicate.
pub fn compile(rule: &Rule, registry: &FieldRegistry) -> RulePredicate {
    let check = match build(rule, registry) {
        Ok(check) => check,
        Err(err) => {
            debug!(rule = %rule.id, field = %rule.field, error = %err, "rule matches nothing");
            Check::Never(err)
        }
    };
    RulePredicate {
        rule_id: rule.id.clone(),
        check,
    }
}

/// Compiles `rule`, reporting why it cannot match anything.
pub fn try_compile(rule: &Rule, registry: &FieldRegistry) -> Result<RulePredicate> {
    build(rule, registry).map(|check| RulePredicate {
        rule_id: rule.id.clone(),
        check,
    })
}

fn build(rule: &Rule, registry: &FieldRegistry) -> Result<Check> {
    let field = registry.describe(rule.field.trim())?;

    let op = Op::from_code(&rule.operator)
        .ok_or_else(|| RuleError::UnknownOperator(rule.operator.clone()))?;
    if !op.applies_to(field.value_type) {
        return Err(RuleError::TypeMismatch {
            op: op.as_str(),
            value_type: field.value_type,
        });
    }

    let operand = coerce_for(field, op, &rule.value).map_err(|source| RuleError::Coercion {
        field: field.name.clone(),
        source,
    })?;

    Ok(Check::Compare {
        field: field.name.clone(),
        value_type: field.value_type,
        op,
        operand,
    })
}

impl RulePredicate {
    /// A predicate that matches nothing, tagged with `reason`.
    pub fn never(rule_id: impl Into<String>, reason: RuleError) -> Self {
        RulePredicate {
            rule_id: rule_id.into(),
            check: Check::Never(reason),
        }
    }

    pub fn rule_id(&self) -> &str {
        &self.rule_id
    }

    /// Why this predicate can never match, if it cannot.
    pub fn error(&self) -> Option<&RuleError> {
        match &self.check {
            Check::Never(err) => Some(err),
            Check::Compare { .. } => None,
        }
    }

    /// Returns `true` if this predicate was degraded and matches nothing.
    pub fn is_never(&self) -> bool {
        self.error().is_some()
    }

    /// Tests a record.
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        match &self.check {
            Check::Never(_) => false,
            Check::Compare {
                field,
                value_type,
                op,
                operand,
            } => match_value(&record.field_value(field), *value_type, *op, operand),
        }
    }
}

/// Evaluates one field value. Missing or unreadable values never match,
/// negated operators included.
fn match_value(value: &Value<'_>, value_type: ValueType, op: Op, operand: &TypedValue) -> bool {
    match (value_type, operand) {
        (ValueType::Text | ValueType::Select, TypedValue::Text(needle)) => {
            match_text(value, op, needle)
        }
        (ValueType::Number, TypedValue::Number(n)) => value
            .as_number_lossy()
            .and_then(|field| field.compare(*n))
            .is_some_and(|ordering| op.eval_ordering(ordering)),
        (ValueType::Date, TypedValue::Date(ts)) => value
            .as_timestamp_lossy()
            .is_some_and(|field| op.eval_ordering(field.cmp(ts))),
        (ValueType::Date, TypedValue::DateRange { start, end }) => value
            .as_timestamp_lossy()
            .is_some_and(|field| (*start..=*end).contains(&field)),
        _ => false,
    }
}

/// Case-insensitive text matching. For lists, positive operators need one
/// matching element and negated operators need none.
fn match_text(value: &Value<'_>, op: Op, needle: &str) -> bool {
    let texts = value.texts();
    if texts.is_empty() {
        return false;
    }
    let hit = |text: &String| {
        let text = text.trim().to_lowercase();
        match op {
            Op::Equals | Op::NotEquals => text == needle,
            Op::Contains | Op::NotContains => text.contains(needle),
            _ => false,
        }
    };
    let any = texts.iter().any(hit);
    if op.is_negated() {
        !any
    } else {
        any
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoercionError;
    use serde_json::json;

    fn registry() -> FieldRegistry {
        FieldRegistry::new()
            .text("name", "Name")
            .text("tags", "Tags")
            .number("total_spent", "Total spent")
            .date("created_at", "Created")
            .select("type", "Type", [("Retail", "Retail"), ("Wholesale", "Wholesale")])
    }

    fn check(field: &str, op: &str, value: &str, record: serde_json::Value) -> bool {
        compile(&Rule::new("r", field, op, value), &registry()).matches(&record)
    }

    #[test]
    fn unknown_field_never_matches() {
        let pred = compile(&Rule::new("r", "ghost", "equals", "x"), &registry());
        assert_eq!(pred.error(), Some(&RuleError::UnknownField("ghost".into())));
        assert!(!pred.matches(&json!({"ghost": "x"})));
    }

    #[test]
    fn operator_must_fit_the_type() {
        let pred = compile(&Rule::new("r", "name", "greater_than", "a"), &registry());
        assert_eq!(
            pred.error(),
            Some(&RuleError::TypeMismatch {
                op: "greater_than",
                value_type: ValueType::Text
            })
        );
        assert!(!pred.matches(&json!({"name": "b"})));

        let pred = compile(&Rule::new("r", "name", "like", "a"), &registry());
        assert_eq!(pred.error(), Some(&RuleError::UnknownOperator("like".into())));
    }

    #[test]
    fn bad_number_never_matches() {
        let rule = Rule::new("r", "total_spent", "greater_than", "abc");
        assert_eq!(
            try_compile(&rule, &registry()),
            Err(RuleError::Coercion {
                field: "total_spent".into(),
                source: CoercionError::NotANumber("abc".into()),
            })
        );
        assert!(!check("total_spent", "greater_than", "abc", json!({"total_spent": 1})));
    }

    #[test]
    fn text_is_case_insensitive() {
        let record = json!({"name": "Acme Retail"});
        assert!(check("name", "equals", "acme retail", record.clone()));
        assert!(check("name", "contains", "RETAIL", record.clone()));
        assert!(!check("name", "not_contains", "retail", record.clone()));
        assert!(check("name", "not_equals", "acme", record.clone()));
        assert!(!check("name", "not_equals", "ACME RETAIL", record));
    }

    #[test]
    fn missing_values_never_match() {
        let record = json!({"other": 1});
        assert!(!check("name", "equals", "x", record.clone()));
        assert!(!check("name", "not_equals", "x", record.clone()));
        assert!(!check("name", "not_contains", "x", record.clone()));
        assert!(!check("total_spent", "not_equals", "5", record.clone()));
        assert!(!check("created_at", "before", "2030-01-01", record));
    }

    #[test]
    fn lists_match_any_element() {
        let record = json!({"tags": ["North", "Priority"]});
        assert!(check("tags", "equals", "priority", record.clone()));
        assert!(check("tags", "contains", "nor", record.clone()));
        assert!(!check("tags", "not_equals", "north", record.clone()));
        assert!(check("tags", "not_contains", "south", record.clone()));
        assert!(!check("tags", "equals", "south", json!({"tags": []})));
    }

    #[test]
    fn numbers_use_strict_ordering() {
        let record = json!({"total_spent": 50000});
        assert!(!check("total_spent", "greater_than", "50000", record.clone()));
        assert!(check("total_spent", "greater_equal", "50000", record.clone()));
        assert!(check("total_spent", "less_equal", "50000", record.clone()));
        assert!(!check("total_spent", "less_than", "50000", record.clone()));
        assert!(check("total_spent", "equals", "50000.0", record.clone()));
        assert!(check("total_spent", "greater_than", "49999.5", record));
        // Numeric text in the record is read as a number.
        assert!(check("total_spent", "less_than", "10", json!({"total_spent": "9"})));
        assert!(!check("total_spent", "less_than", "10", json!({"total_spent": "n/a"})));
    }

    #[test]
    fn dates_before_after() {
        let record = json!({"created_at": "2024-03-15"});
        assert!(check("created_at", "before", "2024-03-16", record.clone()));
        assert!(!check("created_at", "before", "2024-03-15", record.clone()));
        assert!(check("created_at", "after", "2024-03-14T23:59:59", record.clone()));
        assert!(!check("created_at", "after", "2024-03-15", record.clone()));
        assert!(!check("created_at", "after", "2024-03-01", json!({"created_at": "soon"})));
    }

    #[test]
    fn between_is_inclusive() {
        let range = "2024-03-01,2024-03-31";
        assert!(check("created_at", "between", range, json!({"created_at": "2024-03-01"})));
        assert!(check("created_at", "between", range, json!({"created_at": "2024-03-31"})));
        assert!(check(
            "created_at",
            "between",
            range,
            json!({"created_at": "2024-03-31T18:30:00Z"})
        ));
        assert!(!check("created_at", "between", range, json!({"created_at": "2024-04-01"})));
        assert!(!check("created_at", "between", range, json!({"created_at": "2024-02-29"})));
    }

    #[test]
    fn select_fields() {
        let record = json!({"type": "Wholesale"});
        assert!(check("type", "equals", "wholesale", record.clone()));
        assert!(check("type", "not_equals", "Retail", record.clone()));
        assert!(!check("type", "equals", "Distributor", json!({"type": "Distributor"})));
    }

    #[test]
    fn never_predicate_keeps_rule_id() {
        let pred = RulePredicate::never("x", RuleError::EmptyRuleGroup);
        assert_eq!(pred.rule_id(), "x");
        assert!(pred.is_never());
        assert!(!pred.matches(&json!({})));
    }
}
