//! Built-in feature catalogs, embedded at compile time.

use crate::config::FeatureConfig;
use crate::error::Result;

const CUSTOMERS: &str = include_str!("catalogs/customers.yaml");
const BUNDLES: &str = include_str!("catalogs/bundles.yaml");

/// Customer fields used to build segments.
pub fn customers() -> Result<FeatureConfig> {
    FeatureConfig::from_yaml_str(CUSTOMERS)
}

/// Cart and order fields used for bundle conditional activation.
pub fn bundles() -> Result<FeatureConfig> {
    FeatureConfig::from_yaml_str(BUNDLES)
}
