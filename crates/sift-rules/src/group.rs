//! Rule group evaluation.
//!
//! A group with no active rules selects nothing. A segment whose rules are
//! still being filled in must not quietly resolve to "every customer".

use tracing::debug;

use crate::error::RuleError;
use crate::predicate::{compile, RulePredicate};
use crate::record::Record;
use crate::registry::FieldRegistry;
use crate::rule::{Combinator, RuleGroup};

/// A compiled rule group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupPredicate {
    combinator: Combinator,
    predicates: Vec<RulePredicate>,
}

/// Compiles the active rules of `group`, in insertion order.
///
/// ```
/// use serde_json::json;
/// use sift_rules::{evaluate, Combinator, FieldRegistry, Rule, RuleGroup};
///
/// let registry = FieldRegistry::new().number("total_spent", "Total spent");
/// let group = RuleGroup::with_rules(
///     Combinator::All,
///     [Rule::new("rule-1", "total_spent", "greater_than", "50000")],
/// );
///
/// let customers = vec![
///     json!({"id": 1, "total_spent": 60000}),
///     json!({"id": 2, "total_spent": 40000}),
/// ];
/// let matched = evaluate(&group, &registry).filter(&customers);
/// assert_eq!(matched, [&customers[0]]);
/// ```
pub fn evaluate(group: &RuleGroup, registry: &FieldRegistry) -> GroupPredicate {
    let predicates: Vec<RulePredicate> = group
        .active_rules()
        .map(|rule| compile(rule, registry))
        .collect();

    if predicates.is_empty() {
        debug!(rules = group.rules.len(), "{}", RuleError::EmptyRuleGroup);
    }

    GroupPredicate {
        combinator: group.combinator,
        predicates,
    }
}

impl GroupPredicate {
    /// Returns `true` when there was nothing to evaluate.
    pub fn is_vacuous(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn combinator(&self) -> Combinator {
        self.combinator
    }

    /// The compiled active rules, in insertion order.
    pub fn predicates(&self) -> &[RulePredicate] {
        &self.predicates
    }

    /// Tests a record. Vacuous groups match nothing.
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        if self.predicates.is_empty() {
            return false;
        }
        match self.combinator {
            Combinator::All => self.predicates.iter().all(|p| p.matches(record)),
            Combinator::Any => self.predicates.iter().any(|p| p.matches(record)),
        }
    }

    /// Returns references to the matching records, in input order.
    pub fn filter<'a, R: Record>(&self, records: &'a [R]) -> Vec<&'a R> {
        records.iter().filter(|r| self.matches(*r)).collect()
    }

    /// Counts the matching records.
    pub fn count<R: Record>(&self, records: &[R]) -> usize {
        records.iter().filter(|r| self.matches(*r)).count()
    }
}
