//! Sift rules - field registry and rule groups for in-memory records.
//!
//! An operator composes `{field, operator, value}` conditions and combines
//! them with ALL or ANY to select a subset of records: the customers in a
//! segment, or the carts a bundle activates for. This crate provides:
//!
//! - A [`FieldRegistry`] declaring each field's value type
//! - The fixed operator catalog per value type ([`OPERATORS`])
//! - [`Rule`] / [`RuleGroup`] values with pure editing transitions
//! - Compilation of rules ([`compile`]) and groups ([`evaluate`]) into
//!   predicates over any [`Record`]
//!
//! # Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use sift_rules::{evaluate, Combinator, FieldRegistry, RuleGroup, RuleKey};
//!
//! let registry = FieldRegistry::new()
//!     .number("total_spent", "Total spent")
//!     .select("type", "Type", [("Retail", "Retail"), ("Wholesale", "Wholesale")]);
//!
//! let mut group = RuleGroup::new(Combinator::All);
//! group.update("rule-1", RuleKey::Field, "total_spent");
//! group.update("rule-1", RuleKey::Operator, "greater_than");
//! group.update("rule-1", RuleKey::Value, "50000");
//!
//! let customers = vec![
//!     json!({"name": "Acme", "type": "Retail", "total_spent": 60000}),
//!     json!({"name": "Bolt", "type": "Wholesale", "total_spent": 40000}),
//! ];
//!
//! let segment = evaluate(&group, &registry);
//! let members = segment.filter(&customers);
//! assert_eq!(members.len(), 1);
//! assert_eq!(members[0]["name"], "Acme");
//! ```
//!
//! # Failure Semantics
//!
//! Rule evaluation never returns errors. A rule is degraded to "matches
//! nothing" when:
//!
//! - its field is not in the registry
//! - its operator is unknown or not legal for the field's type
//! - its value cannot be read as the field's type
//!
//! and a group with no active rules matches nothing at all. A malformed rule
//! therefore shows up as an empty result, never as an over-broad one.
//!
//! # Field Types and Operators
//!
//! | Type | Operators |
//! |------|-----------|
//! | Text, Select | `equals`, `not_equals`, `contains`, `not_contains` |
//! | Number | `equals`, `not_equals`, `greater_than`, `less_than`, `greater_equal`, `less_equal` |
//! | Date | `before`, `after`, `between` |

mod coerce;
mod error;
mod group;
mod op;
mod predicate;
mod record;
mod registry;
mod rule;
mod value;

// Re-export public API
pub use coerce::{coerce, coerce_for, TypedValue};
pub use error::{CoercionError, Result, RuleError};
pub use group::{evaluate, GroupPredicate};
pub use op::{Op, OperatorDescriptor, OPERATORS};
pub use predicate::{compile, try_compile, RulePredicate};
pub use record::Record;
pub use registry::{FieldDescriptor, FieldRegistry, SelectOption, ValueType};
pub use rule::{update_rule, Combinator, Rule, RuleGroup, RuleKey};
pub use value::{Number, Timestamp, Value};
