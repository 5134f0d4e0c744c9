//! Rules and rule groups as edited by an operator.
//!
//! These are plain, serializable values. All editing goes through pure
//! transitions ([`update_rule`] and the [`RuleGroup`] methods) so the
//! field-change cascade holds no matter which UI drives them.

use serde::{Deserialize, Serialize};

use crate::op::Op;
use crate::registry::FieldRegistry;

/// One `{field, operator, value}` condition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Unique within its group.
    pub id: String,
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub operator: String,
    #[serde(default)]
    pub value: String,
}

impl Rule {
    /// Creates an empty rule slot.
    pub fn empty(id: impl Into<String>) -> Self {
        Rule {
            id: id.into(),
            ..Rule::default()
        }
    }

    /// Creates a filled-in rule.
    pub fn new(
        id: impl Into<String>,
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Rule {
            id: id.into(),
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }

    /// A rule takes part in evaluation only when all three parts are filled.
    pub fn is_active(&self) -> bool {
        !self.field.trim().is_empty()
            && !self.operator.trim().is_empty()
            && !self.value.trim().is_empty()
    }
}

/// The editable parts of a [`Rule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKey {
    Field,
    Operator,
    Value,
}

/// Returns `rule` with `key` set to `value`.
///
/// Setting the field always clears the operator and value, even when the
/// field does not actually change: an operator chosen for one field type is
/// meaningless for another.
///
/// ```
/// use sift_rules::{update_rule, Rule, RuleKey};
///
/// let rule = Rule::new("rule-1", "total_spent", "greater_than", "50000");
/// let rule = update_rule(rule, RuleKey::Field, "created_at");
/// assert_eq!(rule.field, "created_at");
/// assert!(rule.operator.is_empty() && rule.value.is_empty());
/// ```
pub fn update_rule(rule: Rule, key: RuleKey, value: &str) -> Rule {
    match key {
        RuleKey::Field => Rule {
            id: rule.id,
            field: value.to_string(),
            operator: String::new(),
            value: String::new(),
        },
        RuleKey::Operator => Rule {
            operator: value.to_string(),
            ..rule
        },
        RuleKey::Value => Rule {
            value: value.to_string(),
            ..rule
        },
    }
}

/// How the rules of a group combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Combinator {
    /// Every active rule must match.
    #[default]
    All,
    /// At least one active rule must match.
    Any,
}

impl Combinator {
    pub fn as_str(self) -> &'static str {
        match self {
            Combinator::All => "all",
            Combinator::Any => "any",
        }
    }

    fn joiner(self) -> &'static str {
        match self {
            Combinator::All => " AND ",
            Combinator::Any => " OR ",
        }
    }
}

impl std::fmt::Display for Combinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An ordered list of rules plus a combinator.
///
/// A group always has at least one rule slot and rule ids are unique within
/// it. Empty slots stay in place until removed explicitly; they are skipped
/// at evaluation time. Deserialized groups go through [`RuleGroup::with_rules`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawRuleGroup")]
pub struct RuleGroup {
    pub rules: Vec<Rule>,
    pub combinator: Combinator,
}

#[derive(Deserialize)]
struct RawRuleGroup {
    #[serde(default)]
    rules: Vec<Rule>,
    #[serde(default)]
    combinator: Combinator,
}

impl From<RawRuleGroup> for RuleGroup {
    fn from(raw: RawRuleGroup) -> Self {
        RuleGroup::with_rules(raw.combinator, raw.rules)
    }
}

impl Default for RuleGroup {
    fn default() -> Self {
        RuleGroup::new(Combinator::All)
    }
}

impl RuleGroup {
    /// Creates a group with a single empty rule slot.
    pub fn new(combinator: Combinator) -> Self {
        RuleGroup {
            rules: vec![Rule::empty("rule-1")],
            combinator,
        }
    }

    /// Creates a group from existing rules.
    ///
    /// Rules with a blank id or an id already taken by an earlier rule get a
    /// fresh `rule-n` id. An empty list yields one empty slot.
    pub fn with_rules(combinator: Combinator, rules: impl IntoIterator<Item = Rule>) -> Self {
        let mut group = RuleGroup {
            rules: Vec::new(),
            combinator,
        };
        for mut rule in rules {
            if rule.id.trim().is_empty() || group.rule(&rule.id).is_some() {
                rule.id = group.next_id();
            }
            group.rules.push(rule);
        }
        if group.rules.is_empty() {
            let id = group.next_id();
            group.rules.push(Rule::empty(id));
        }
        group
    }

    /// Appends an empty rule slot and returns its id.
    pub fn add_rule(&mut self) -> String {
        let id = self.next_id();
        self.rules.push(Rule::empty(id.clone()));
        id
    }

    /// Removes the rule with `id`.
    ///
    /// Removing the last remaining slot replaces it with a fresh empty one.
    /// Unknown ids are ignored.
    pub fn remove_rule(&mut self, id: &str) {
        let before = self.rules.len();
        self.rules.retain(|r| r.id != id);
        if self.rules.len() == before {
            return;
        }
        if self.rules.is_empty() {
            let id = self.next_id();
            self.rules.push(Rule::empty(id));
        }
    }

    /// Applies [`update_rule`] to the rule with `id`. Unknown ids are ignored.
    pub fn update(&mut self, id: &str, key: RuleKey, value: &str) {
        if let Some(slot) = self.rules.iter_mut().find(|r| r.id == id) {
            *slot = update_rule(std::mem::take(slot), key, value);
        }
    }

    pub fn set_combinator(&mut self, combinator: Combinator) {
        self.combinator = combinator;
    }

    pub fn rule(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    /// Rules that take part in evaluation, in insertion order.
    pub fn active_rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(|r| r.is_active())
    }

    pub fn has_active_rules(&self) -> bool {
        self.active_rules().next().is_some()
    }

    /// Human-readable summary of the active rules.
    ///
    /// Field and operator labels come from the registry when known; unknown
    /// ones are shown as typed. Returns an empty string for a group with no
    /// active rules.
    pub fn describe(&self, registry: &FieldRegistry) -> String {
        self.active_rules()
            .map(|rule| {
                let field = registry
                    .describe(&rule.field)
                    .map(|f| f.display_label())
                    .unwrap_or(rule.field.as_str());
                let op = Op::from_code(&rule.operator)
                    .map(Op::label)
                    .unwrap_or(rule.operator.as_str());
                format!("{} {} {}", field, op, rule.value.trim())
            })
            .collect::<Vec<_>>()
            .join(self.combinator.joiner())
    }

    fn next_id(&self) -> String {
        (self.rules.len() + 1..)
            .map(|n| format!("rule-{n}"))
            .find(|id| self.rule(id).is_none())
            .unwrap_or_default()
    }
}
