//! The collection pipeline behind every list page.
//!
//! [`Pipeline::run`] turns a raw in-memory collection plus a
//! [`ViewDescription`] into one page of results. Stages always run in this
//! order:
//!
//! 1. free-text search over the feature's searchable fields
//! 2. the view's rule group, when it has one
//! 3. per-field equality selections
//! 4. stable sort by the resolved sort token
//! 5. pagination
//!
//! `total_matched` is counted after stage 3, so it does not depend on the
//! requested page.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sift_rules::{evaluate, FieldRegistry, GroupPredicate, Number, Record, RuleGroup, ValueType};
use tracing::{debug, trace};

use crate::columns::{self, Column};
use crate::config::FeatureConfig;
use crate::ordering::{resolve, sort_records};
use crate::view::ViewDescription;

/// One page of a filtered, sorted collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultPage<T> {
    pub items: Vec<T>,
    /// Records that passed every filter, across all pages.
    pub total_matched: usize,
    /// Never less than 1, even when nothing matched.
    pub total_pages: usize,
    /// The page actually served, after clamping.
    pub page: usize,
    pub page_size: usize,
}

impl<T> ResultPage<T> {
    /// 1-based positions of the first and last item on this page, for
    /// "showing X to Y of Z" captions. `None` when the page is empty.
    pub fn range(&self) -> Option<(usize, usize)> {
        if self.items.is_empty() {
            return None;
        }
        let first = (self.page - 1) * self.page_size + 1;
        Some((first, first + self.items.len() - 1))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Converts the items, keeping the paging figures.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> ResultPage<U> {
        ResultPage {
            items: self.items.into_iter().map(f).collect(),
            total_matched: self.total_matched,
            total_pages: self.total_pages,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

/// Runs views over collections of one feature.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use sift_rules::FieldRegistry;
/// use sift_views::{Pipeline, ViewDescription};
///
/// let registry = FieldRegistry::new().text("name", "Name").number("price", "Price");
/// let pipeline = Pipeline::from_registry(registry, ["name"]);
///
/// let products = vec![
///     json!({"name": "Blue mug", "price": 12}),
///     json!({"name": "Red mug", "price": 9}),
///     json!({"name": "Teapot", "price": 30}),
/// ];
///
/// let page = pipeline.run(&products, &ViewDescription::new().search("MUG").sort("price_asc"));
/// assert_eq!(page.total_matched, 2);
/// assert_eq!(page.items[0]["name"], "Red mug");
/// ```
#[derive(Debug, Clone)]
pub struct Pipeline {
    registry: FieldRegistry,
    searchable: Vec<String>,
    columns: Vec<Column>,
}

impl Pipeline {
    pub fn new(config: &FeatureConfig) -> Self {
        Pipeline {
            registry: config.fields.clone(),
            searchable: config.searchable.clone(),
            columns: config.columns.clone(),
        }
    }

    /// A pipeline without a column catalog.
    pub fn from_registry(
        registry: FieldRegistry,
        searchable: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Pipeline {
            registry,
            searchable: searchable.into_iter().map(Into::into).collect(),
            columns: Vec::new(),
        }
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// A fresh view showing the default columns.
    pub fn default_view(&self) -> ViewDescription {
        ViewDescription {
            visible_columns: columns::default_visible(&self.columns),
            ..ViewDescription::default()
        }
    }

    /// Compiles a rule group against this feature's fields.
    pub fn segment(&self, group: &RuleGroup) -> GroupPredicate {
        evaluate(group, &self.registry)
    }

    /// The catalog columns the view shows, in catalog order.
    pub fn project_columns(&self, view: &ViewDescription) -> Vec<&Column> {
        columns::project(&self.columns, &view.visible_columns)
    }

    /// Produces the requested page of `records`.
    pub fn run<'a, R: Record>(
        &self,
        records: &'a [R],
        view: &ViewDescription,
    ) -> ResultPage<&'a R> {
        let mut matched: Vec<&'a R> = records.iter().collect();
        trace!(count = matched.len(), "pipeline input");

        let needle = view.search_text.trim().to_lowercase();
        if !needle.is_empty() {
            matched.retain(|record| self.search_matches(*record, &needle));
            trace!(count = matched.len(), "after search");
        }

        if let Some(group) = &view.rule_group {
            let predicate = self.segment(group);
            matched.retain(|record| predicate.matches(*record));
            trace!(count = matched.len(), "after rule group");
        }

        let selections = active_selections(&view.equality_filters);
        if !selections.is_empty() {
            match self.typed_selections(selections) {
                Some(selections) => {
                    matched.retain(|record| selections.iter().all(|s| s.matches(*record)))
                }
                None => matched.clear(),
            }
            trace!(count = matched.len(), "after equality filters");
        }

        let key = resolve(&view.sort_token, &self.registry);
        sort_records(&mut matched, key.as_ref());

        paginate(matched, view.page, view.page_size)
    }

    /// Attaches each selected field's value type. `None` when a field is not
    /// declared, in which case nothing can match.
    fn typed_selections<'v>(
        &self,
        selections: BTreeMap<&'v str, Vec<String>>,
    ) -> Option<Vec<Selection<'v>>> {
        selections
            .into_iter()
            .map(|(field, accepted)| match self.registry.describe(field) {
                Ok(descriptor) => Some(Selection {
                    field,
                    value_type: descriptor.value_type,
                    accepted,
                }),
                Err(err) => {
                    debug!(error = %err, "equality filter on unknown field; nothing matches");
                    None
                }
            })
            .collect()
    }

    fn search_matches<R: Record + ?Sized>(&self, record: &R, needle: &str) -> bool {
        self.searchable.iter().any(|field| {
            record
                .field_value(field)
                .texts()
                .iter()
                .any(|text| text.to_lowercase().contains(needle))
        })
    }
}

/// Lowercased accepted values per field, dropping empty selections.
fn active_selections(
    filters: &BTreeMap<String, Vec<String>>,
) -> BTreeMap<&str, Vec<String>> {
    filters
        .iter()
        .filter_map(|(field, values)| {
            let accepted: Vec<String> = values
                .iter()
                .map(|v| v.trim().to_lowercase())
                .filter(|v| !v.is_empty())
                .collect();
            (!accepted.is_empty()).then_some((field.as_str(), accepted))
        })
        .collect()
}

/// Accepted values for one field. OR within the field.
struct Selection<'v> {
    field: &'v str,
    value_type: ValueType,
    /// Trimmed and lowercased.
    accepted: Vec<String>,
}

impl Selection<'_> {
    fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        let value = record.field_value(self.field);
        if self.value_type == ValueType::Number {
            // Numbers compare by value, so "120.50" selects 120.5.
            let Some(number) = value.as_number_lossy() else {
                return false;
            };
            return self
                .accepted
                .iter()
                .filter_map(|a| Number::parse(a))
                .any(|a| number.compare(a) == Some(Ordering::Equal));
        }
        value
            .texts()
            .iter()
            .any(|text| self.accepted.contains(&text.trim().to_lowercase()))
    }
}

/// Cuts one page out of the matched items. Page and size below 1 are read as 1.
pub fn paginate<T>(items: Vec<T>, page: usize, page_size: usize) -> ResultPage<T> {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let total_matched = items.len();
    let total_pages = total_matched.div_ceil(page_size).max(1);

    let start = (page - 1).saturating_mul(page_size);
    let items: Vec<T> = items.into_iter().skip(start).take(page_size).collect();

    ResultPage {
        items,
        total_matched,
        total_pages,
        page,
        page_size,
    }
}
