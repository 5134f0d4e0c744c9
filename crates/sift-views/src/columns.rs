//! Column catalogs and visibility.
//!
//! Which columns a list shows is independent of what it filters or sorts by.
//! Toggling a column only flips set membership.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A displayable column of a list page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Record field the column shows.
    pub key: String,
    pub label: String,
    /// Shown when the page first loads.
    #[serde(default = "default_true")]
    pub default_visible: bool,
}

fn default_true() -> bool {
    true
}

impl Column {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Column {
            key: key.into(),
            label: label.into(),
            default_visible: true,
        }
    }

    /// Marks the column as hidden until the user enables it.
    pub fn hidden(mut self) -> Self {
        self.default_visible = false;
        self
    }
}

/// The catalog columns whose keys are in `visible`, in catalog order.
///
/// ```
/// use std::collections::BTreeSet;
/// use sift_views::{project, Column};
///
/// let catalog = [
///     Column::new("name", "Name"),
///     Column::new("email", "Email"),
///     Column::new("city", "City"),
/// ];
/// let visible = BTreeSet::from(["city".to_string(), "name".to_string()]);
/// let keys: Vec<_> = project(&catalog, &visible)
///     .iter()
///     .map(|c| c.key.as_str())
///     .collect();
/// assert_eq!(keys, ["name", "city"]);
/// ```
pub fn project<'a>(catalog: &'a [Column], visible: &BTreeSet<String>) -> Vec<&'a Column> {
    catalog
        .iter()
        .filter(|column| visible.contains(&column.key))
        .collect()
}

/// Returns `visible` with `key` added if absent, removed if present.
pub fn toggle(visible: &BTreeSet<String>, key: &str) -> BTreeSet<String> {
    let mut next = visible.clone();
    if !next.remove(key) {
        next.insert(key.to_string());
    }
    next
}

/// Keys of the columns shown by default.
pub fn default_visible(catalog: &[Column]) -> BTreeSet<String> {
    catalog
        .iter()
        .filter(|column| column.default_visible)
        .map(|column| column.key.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Column> {
        vec![
            Column::new("name", "Name"),
            Column::new("email", "Email"),
            Column::new("phone", "Phone").hidden(),
            Column::new("total_spent", "Total spent"),
        ]
    }

    fn keys(columns: Vec<&Column>) -> Vec<&str> {
        columns.into_iter().map(|c| c.key.as_str()).collect()
    }

    #[test]
    fn projection_keeps_catalog_order() {
        let catalog = catalog();
        let visible: BTreeSet<String> = ["total_spent", "name", "unknown"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(keys(project(&catalog, &visible)), ["name", "total_spent"]);
    }

    #[test]
    fn defaults_skip_hidden_columns() {
        let catalog = catalog();
        let visible = default_visible(&catalog);
        assert_eq!(keys(project(&catalog, &visible)), ["name", "email", "total_spent"]);
    }

    #[test]
    fn toggle_flips_membership() {
        let catalog = catalog();
        let visible = default_visible(&catalog);

        let with_phone = toggle(&visible, "phone");
        assert_eq!(
            keys(project(&catalog, &with_phone)),
            ["name", "email", "phone", "total_spent"]
        );

        let without_email = toggle(&with_phone, "email");
        assert!(!without_email.contains("email"));
        assert_eq!(toggle(&toggle(&visible, "phone"), "phone"), visible);
    }

    #[test]
    fn empty_selection_projects_nothing() {
        assert!(project(&catalog(), &BTreeSet::new()).is_empty());
    }

    #[test]
    fn default_visible_from_config() {
        let column: Column = serde_json::from_str(r#"{"key": "a", "label": "A"}"#).unwrap();
        assert!(column.default_visible);
    }
}
