//! Sort tokens and record ordering.
//!
//! List pages keep their sort choice as a single token such as `price_desc`
//! or `created_at:asc`. [`resolve`] turns it into a [`SortKey`] that compares
//! records by the field's declared value type.

use std::cmp::Ordering;

use deunicode::deunicode;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sift_rules::{FieldRegistry, Number, Record, Timestamp, Value, ValueType};
use tracing::debug;

static SORT_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<field>.+?)[_:](?P<dir>(?i:asc|desc))$")
        .expect("sort token pattern is valid")
});

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Applies this direction to an ordering.
    ///
    /// For `Asc`, returns the ordering unchanged.
    /// For `Desc`, reverses the ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }

    fn parse(text: &str) -> Option<Dir> {
        if text.eq_ignore_ascii_case("asc") {
            Some(Dir::Asc)
        } else if text.eq_ignore_ascii_case("desc") {
            Some(Dir::Desc)
        } else {
            None
        }
    }
}

impl std::fmt::Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A resolved sort: which field, which way, compared as which type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub dir: Dir,
    pub value_type: ValueType,
}

/// Resolves a sort token against the registry.
///
/// Accepted forms are `<field>_<dir>`, `<field>:<dir>` and a bare field name
/// (ascending). Returns `None` for an empty token, an unknown field or any
/// other shape; callers keep the input order in that case.
///
/// ```
/// use sift_views::{resolve, Dir};
/// use sift_rules::FieldRegistry;
///
/// let registry = FieldRegistry::new().number("total_spent", "Total spent");
/// let key = resolve("total_spent_desc", &registry).unwrap();
/// assert_eq!((key.field.as_str(), key.dir), ("total_spent", Dir::Desc));
/// assert!(resolve("", &registry).is_none());
/// assert!(resolve("price_desc", &registry).is_none());
/// ```
pub fn resolve(token: &str, registry: &FieldRegistry) -> Option<SortKey> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    let split = SORT_TOKEN.captures(token).and_then(|caps| {
        let field = caps.name("field")?.as_str();
        let dir = Dir::parse(caps.name("dir")?.as_str())?;
        Some((field, dir))
    });

    let candidates = split.into_iter().chain(std::iter::once((token, Dir::Asc)));
    for (field, dir) in candidates {
        if let Ok(descriptor) = registry.describe(field) {
            return Some(SortKey {
                field: descriptor.name.clone(),
                dir,
                value_type: descriptor.value_type,
            });
        }
    }

    debug!(token, "sort token does not name a known field; keeping input order");
    None
}

impl SortKey {
    pub fn new(field: impl Into<String>, dir: Dir, value_type: ValueType) -> Self {
        SortKey {
            field: field.into(),
            dir,
            value_type,
        }
    }

    /// The canonical token for this key, e.g. `price_desc`.
    pub fn token(&self) -> String {
        format!("{}_{}", self.field, self.dir)
    }

    /// Compares two records by this key.
    ///
    /// Dates that are missing or unreadable count as the oldest possible
    /// date. Missing text and numbers come after present ones before the
    /// direction is applied; NaN counts as a missing number.
    pub fn compare<R: Record + ?Sized>(&self, a: &R, b: &R) -> Ordering {
        let va = a.field_value(&self.field);
        let vb = b.field_value(&self.field);

        let ordering = match self.value_type {
            ValueType::Text | ValueType::Select => {
                missing_last(text_key(&va), text_key(&vb), |x, y| x.cmp(y))
            }
            ValueType::Number => missing_last(number_key(&va), number_key(&vb), |x, y| {
                x.compare(*y).unwrap_or(Ordering::Equal)
            }),
            ValueType::Date => date_key(&va).cmp(&date_key(&vb)),
        };
        self.dir.apply(ordering)
    }
}

/// Stable-sorts `items` by `key`; `None` leaves the order untouched.
pub fn sort_records<R: Record>(items: &mut [&R], key: Option<&SortKey>) {
    if let Some(key) = key {
        items.sort_by(|a, b| key.compare(*a, *b));
    }
}

/// Locale-insensitive-to-accents, case-folded sort key.
fn text_key(value: &Value<'_>) -> Option<String> {
    let texts = value.texts();
    if texts.is_empty() {
        return None;
    }
    Some(deunicode(&texts.join(", ")).to_lowercase())
}

/// Numeric sort key. NaN has no place in a total order and sorts as missing.
fn number_key(value: &Value<'_>) -> Option<Number> {
    value.as_number_lossy().filter(|n| !n.to_f64().is_nan())
}

fn date_key(value: &Value<'_>) -> Timestamp {
    value.as_timestamp_lossy().unwrap_or(Timestamp::OLDEST)
}

fn missing_last<T>(a: Option<T>, b: Option<T>, cmp: impl Fn(&T, &T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp(&a, &b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
