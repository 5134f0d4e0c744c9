//! Error types for loading feature configuration.

use thiserror::Error;

/// Errors that can occur when loading or validating a [`FeatureConfig`](crate::FeatureConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The YAML document could not be parsed.
    #[error("invalid YAML feature config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The JSON document could not be parsed.
    #[error("invalid JSON feature config: {0}")]
    Json(#[from] serde_json::Error),

    /// Two fields share a name.
    #[error("feature '{feature}' declares field '{field}' more than once")]
    DuplicateField { feature: String, field: String },

    /// A searchable field is not declared in the registry.
    #[error("feature '{feature}' searches undeclared field '{field}'")]
    UnknownSearchField { feature: String, field: String },

    /// Two columns share a key.
    #[error("feature '{feature}' declares column '{key}' more than once")]
    DuplicateColumn { feature: String, key: String },

    /// A select field has no options to choose from.
    #[error("select field '{field}' in feature '{feature}' has no options")]
    MissingOptions { feature: String, field: String },
}

/// Result type for configuration loading.
pub type Result<T> = std::result::Result<T, ConfigError>;
