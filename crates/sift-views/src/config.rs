//! Declarative feature configuration.
//!
//! A feature (customer segments, bundle activation, an admin list page) is
//! described by its field registry, the fields free-text search looks at,
//! and its column catalog. Configurations load from YAML or JSON and are
//! validated on load: unlike rule evaluation, configuration mistakes are
//! reported to the caller.
//!
//! ```yaml
//! name: customers
//! fields:
//!   - name: name
//!     label: Name
//!     type: text
//!   - name: type
//!     label: Customer type
//!     type: select
//!     options:
//!       - { value: Retail, label: Retail }
//! searchable: [name]
//! columns:
//!   - { key: name, label: Name }
//!   - { key: notes, label: Notes, default_visible: false }
//! ```

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use sift_rules::{FieldRegistry, ValueType};

use crate::columns::{self, Column};
use crate::error::{ConfigError, Result};

/// Fields, search scope and columns of one list feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureConfig {
    pub name: String,
    pub fields: FieldRegistry,
    /// Fields that free-text search looks at.
    #[serde(default)]
    pub searchable: Vec<String>,
    #[serde(default)]
    pub columns: Vec<Column>,
}

impl FeatureConfig {
    /// Builds and validates a configuration in code.
    pub fn new(
        name: impl Into<String>,
        fields: FieldRegistry,
        searchable: impl IntoIterator<Item = impl Into<String>>,
        columns: impl IntoIterator<Item = Column>,
    ) -> Result<Self> {
        let config = FeatureConfig {
            name: name.into(),
            fields,
            searchable: searchable.into_iter().map(Into::into).collect(),
            columns: columns.into_iter().collect(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: FeatureConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: FeatureConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the configuration for inconsistencies.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for field in self.fields.fields() {
            if !seen.insert(field.name.as_str()) {
                return Err(ConfigError::DuplicateField {
                    feature: self.name.clone(),
                    field: field.name.clone(),
                });
            }
            if field.value_type == ValueType::Select && field.options.is_empty() {
                return Err(ConfigError::MissingOptions {
                    feature: self.name.clone(),
                    field: field.name.clone(),
                });
            }
        }

        if let Some(field) = self.searchable.iter().find(|f| !self.fields.contains(f)) {
            return Err(ConfigError::UnknownSearchField {
                feature: self.name.clone(),
                field: field.clone(),
            });
        }

        let mut keys = HashSet::new();
        if let Some(column) = self.columns.iter().find(|c| !keys.insert(c.key.as_str())) {
            return Err(ConfigError::DuplicateColumn {
                feature: self.name.clone(),
                key: column.key.clone(),
            });
        }

        Ok(())
    }

    /// Columns shown when the page first loads.
    pub fn default_columns(&self) -> BTreeSet<String> {
        columns::default_visible(&self.columns)
    }
}
