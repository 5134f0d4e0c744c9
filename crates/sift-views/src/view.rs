//! The serializable state of a list page.
//!
//! A [`ViewDescription`] is everything the user has chosen on a list page:
//! search text, an optional rule group, per-field equality selections, the
//! sort token, the page, and the visible columns. It is plain data so a UI can
//! keep it in its own state store and ship it around as JSON.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use sift_rules::RuleGroup;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// What a list page should show.
///
/// # Example
///
/// ```
/// use sift_views::ViewDescription;
///
/// let view = ViewDescription::new()
///     .search("acme")
///     .filter_in("status", ["active", "paused"])
///     .sort("created_at_desc")
///     .page(2);
///
/// assert_eq!(view.page, 2);
/// assert_eq!(view.page_size, 10);
/// assert_eq!(view.equality_filters["status"], ["active", "paused"]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewDescription {
    pub search_text: String,
    /// `None` on pages without a rule builder; the rule stage is skipped.
    pub rule_group: Option<RuleGroup>,
    /// Field name to accepted values. Empty selections do not filter.
    pub equality_filters: BTreeMap<String, Vec<String>>,
    pub sort_token: String,
    /// 1-based.
    pub page: usize,
    pub page_size: usize,
    pub visible_columns: BTreeSet<String>,
}

impl Default for ViewDescription {
    fn default() -> Self {
        ViewDescription {
            search_text: String::new(),
            rule_group: None,
            equality_filters: BTreeMap::new(),
            sort_token: String::new(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            visible_columns: BTreeSet::new(),
        }
    }
}

impl ViewDescription {
    /// Creates a view on page 1 with nothing filtered.
    pub fn new() -> Self {
        ViewDescription::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    pub fn rules(mut self, group: RuleGroup) -> Self {
        self.rule_group = Some(group);
        self
    }

    /// Accepts records whose `field` equals `value`.
    pub fn filter_eq(self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filter_in(field, [value])
    }

    /// Accepts records whose `field` equals any of `values`.
    ///
    /// Replaces an earlier selection on the same field.
    pub fn filter_in<I, S>(mut self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.equality_filters
            .insert(field.into(), values.into_iter().map(Into::into).collect());
        self
    }

    pub fn sort(mut self, token: impl Into<String>) -> Self {
        self.sort_token = token.into();
        self
    }

    pub fn page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }

    pub fn columns<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.visible_columns = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Flips one column's visibility.
    pub fn toggle_column(mut self, key: &str) -> Self {
        self.visible_columns = crate::columns::toggle(&self.visible_columns, key);
        self
    }
}
