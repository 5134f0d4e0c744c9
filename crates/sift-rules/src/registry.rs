//! Field registry: the per-feature catalog of filterable fields.
//!
//! A [`FieldRegistry`] tells the engine which fields exist, what type of
//! value each one holds, and therefore which operators make sense for it.
//! Anything not declared here is invisible to rules, filters and sorting.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RuleError};
use crate::op::{OperatorDescriptor, OPERATORS};

/// Value type of a registered field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// Free text.
    Text,
    /// Integer or decimal number.
    Number,
    /// Calendar date or date-time.
    Date,
    /// One of a fixed set of options.
    Select,
}

impl ValueType {
    /// Returns the lowercase name used in configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::Text => "text",
            ValueType::Number => "number",
            ValueType::Date => "date",
            ValueType::Select => "select",
        }
    }

    /// Returns `true` for types compared as strings.
    pub fn is_textual(self) -> bool {
        matches!(self, ValueType::Text | ValueType::Select)
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A selectable option of a [`ValueType::Select`] field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        SelectOption {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Declaration of one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Logical field name, as used in rules and records.
    pub name: String,
    /// Human-readable label. Defaults to the name.
    #[serde(default)]
    pub label: String,
    /// Value type, which fixes the legal operators.
    #[serde(rename = "type")]
    pub value_type: ValueType,
    /// Ordered options for select fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
}

impl FieldDescriptor {
    /// Creates a descriptor without options.
    pub fn new(name: impl Into<String>, label: impl Into<String>, value_type: ValueType) -> Self {
        FieldDescriptor {
            name: name.into(),
            label: label.into(),
            value_type,
            options: Vec::new(),
        }
    }

    /// Label for display, falling back to the field name.
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.name
        } else {
            &self.label
        }
    }

    /// Finds the option whose value matches `value` (case-insensitive).
    pub fn option(&self, value: &str) -> Option<&SelectOption> {
        self.options
            .iter()
            .find(|opt| opt.value.eq_ignore_ascii_case(value.trim()))
    }
}

/// Ordered catalog of field descriptors.
///
/// # Example
///
/// ```
/// use sift_rules::{FieldRegistry, ValueType};
///
/// let registry = FieldRegistry::new()
///     .text("name", "Name")
///     .number("total_spent", "Total spent")
///     .date("created_at", "Created")
///     .select("type", "Type", [("Retail", "Retail"), ("Wholesale", "Wholesale")]);
///
/// assert_eq!(registry.describe("total_spent").unwrap().value_type, ValueType::Number);
/// assert!(registry.describe("missing").is_err());
///
/// let codes: Vec<_> = registry.operators_for("created_at").iter().map(|o| o.code).collect();
/// assert_eq!(codes, ["before", "after", "between"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldRegistry {
    fields: Vec<FieldDescriptor>,
}

impl FieldRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        FieldRegistry::default()
    }

    /// Builds a registry from descriptors, keeping their order.
    pub fn from_fields(fields: impl IntoIterator<Item = FieldDescriptor>) -> Self {
        FieldRegistry {
            fields: fields.into_iter().collect(),
        }
    }

    /// Adds a descriptor. A later declaration of the same name shadows nothing;
    /// lookups return the first one.
    pub fn field(mut self, descriptor: FieldDescriptor) -> Self {
        self.fields.push(descriptor);
        self
    }

    /// Adds a text field.
    pub fn text(self, name: &str, label: &str) -> Self {
        self.field(FieldDescriptor::new(name, label, ValueType::Text))
    }

    /// Adds a number field.
    pub fn number(self, name: &str, label: &str) -> Self {
        self.field(FieldDescriptor::new(name, label, ValueType::Number))
    }

    /// Adds a date field.
    pub fn date(self, name: &str, label: &str) -> Self {
        self.field(FieldDescriptor::new(name, label, ValueType::Date))
    }

    /// Adds a select field with `(value, label)` options.
    pub fn select<'o, I>(self, name: &str, label: &str, options: I) -> Self
    where
        I: IntoIterator<Item = (&'o str, &'o str)>,
    {
        let mut descriptor = FieldDescriptor::new(name, label, ValueType::Select);
        descriptor.options = options
            .into_iter()
            .map(|(value, label)| SelectOption::new(value, label))
            .collect();
        self.field(descriptor)
    }

    /// Looks up a field by name.
    pub fn describe(&self, name: &str) -> Result<&FieldDescriptor> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| RuleError::UnknownField(name.to_string()))
    }

    /// Returns `true` if the field is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.describe(name).is_ok()
    }

    /// Operators legal for the field, in catalog order.
    ///
    /// Unknown fields get an empty list rather than an error so a rule editor
    /// can show "no operators available".
    pub fn operators_for(&self, name: &str) -> Vec<&'static OperatorDescriptor> {
        match self.describe(name) {
            Ok(field) => OPERATORS
                .iter()
                .filter(|op| op.applies_to(field.value_type))
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Iterates the descriptors in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
