//! Sift views - list pages over in-memory record collections.
//!
//! Every admin list page does the same thing with its data: search it, narrow
//! it with a rule group and per-field selections, sort it, cut out one page,
//! and decide which columns to show. This crate does that for any collection
//! of [`Record`](sift_rules::Record)s, driven by a serializable
//! [`ViewDescription`].
//!
//! # Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use sift_views::{catalogs, Pipeline};
//!
//! let customers = catalogs::customers().unwrap();
//! let pipeline = Pipeline::new(&customers);
//!
//! let records = vec![
//!     json!({"name": "Acme", "type": "Retail", "total_spent": 60000}),
//!     json!({"name": "Bolt", "type": "Wholesale", "total_spent": 40000}),
//!     json!({"name": "Crux", "type": "Retail", "total_spent": 1200}),
//! ];
//!
//! let view = pipeline
//!     .default_view()
//!     .filter_eq("type", "retail")
//!     .sort("total_spent_asc");
//! let page = pipeline.run(&records, &view);
//!
//! assert_eq!(page.total_matched, 2);
//! assert_eq!(page.items[0]["name"], "Crux");
//! assert_eq!(pipeline.project_columns(&view)[0].label, "Name");
//! ```
//!
//! # Modules
//!
//! - [`ordering`]: sort tokens such as `price_desc` and typed comparison
//! - [`columns`]: column catalogs, projection and toggling
//! - [`view`]: the page state a UI keeps
//! - [`pipeline`]: search, rules, equality filters, sort and pagination
//! - [`config`] and [`catalogs`]: feature configuration from YAML or JSON

pub mod catalogs;
pub mod columns;
pub mod config;
mod error;
pub mod ordering;
pub mod pipeline;
pub mod view;

// Re-export public API
pub use columns::{default_visible, project, toggle, Column};
pub use config::FeatureConfig;
pub use error::{ConfigError, Result};
pub use ordering::{resolve, sort_records, Dir, SortKey};
pub use pipeline::{paginate, Pipeline, ResultPage};
pub use view::{ViewDescription, DEFAULT_PAGE_SIZE};
