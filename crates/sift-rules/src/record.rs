//! Field access for records.
//!
//! The engine never looks inside a record on its own. It asks for one field
//! at a time through [`Record::field_value`], and only for fields the
//! registry declares.

use serde_json::{Map, Value as Json};

use crate::value::{Number, Value};

/// Trait for types that rules, filters and sorting can read from.
///
/// # Manual Implementation
///
/// ```
/// use sift_rules::{Number, Record, Value};
///
/// struct Customer {
///     name: String,
///     total_spent: u64,
///     tags: Vec<String>,
/// }
///
/// impl Record for Customer {
///     fn field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "name" => Value::Text(&self.name),
///             "total_spent" => Value::Number(Number::U64(self.total_spent)),
///             "tags" => Value::List(self.tags.iter().map(String::as_str).collect()),
///             _ => Value::None,
///         }
///     }
/// }
/// ```
///
/// JSON objects implement the trait directly, so mock datasets loaded with
/// `serde_json` can be filtered without a wrapper type.
pub trait Record {
    /// Returns the value of a field, or [`Value::None`] if it is absent.
    fn field_value(&self, field: &str) -> Value<'_>;
}

impl<R: Record + ?Sized> Record for &R {
    fn field_value(&self, field: &str) -> Value<'_> {
        (**self).field_value(field)
    }
}

impl Record for Map<String, Json> {
    fn field_value(&self, field: &str) -> Value<'_> {
        self.get(field).map_or(Value::None, json_value)
    }
}

impl Record for Json {
    fn field_value(&self, field: &str) -> Value<'_> {
        match self {
            Json::Object(map) => map.field_value(field),
            _ => Value::None,
        }
    }
}

fn json_value(json: &Json) -> Value<'_> {
    match json {
        Json::String(s) => Value::Text(s),
        Json::Number(n) => json_number(n).map_or(Value::None, Value::Number),
        Json::Bool(true) => Value::Text("true"),
        Json::Bool(false) => Value::Text("false"),
        Json::Array(items) => Value::List(items.iter().filter_map(Json::as_str).collect()),
        Json::Null | Json::Object(_) => Value::None,
    }
}

fn json_number(n: &serde_json::Number) -> Option<Number> {
    if let Some(i) = n.as_i64() {
        Some(Number::I64(i))
    } else if let Some(u) = n.as_u64() {
        Some(Number::U64(u))
    } else {
        n.as_f64().map(Number::F64)
    }
}
