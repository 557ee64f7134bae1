//! Reference catalog loading from catalog.toml
//!
//! Popular destinations and activity templates only seed the city and activity
//! forms; they carry no ownership. The file is read once at start-up and the
//! entries are inserted by [`crate::core::catalog::seed_catalog`].

use crate::entities::ActivityCategory;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire catalog.toml file
#[derive(Debug, Default, Deserialize)]
pub struct CatalogConfig {
    /// Destinations offered when adding a city
    #[serde(default)]
    pub destinations: Vec<DestinationConfig>,
    /// Templates offered when adding an activity
    #[serde(default)]
    pub activity_templates: Vec<ActivityTemplateConfig>,
}

/// A single popular destination
#[derive(Debug, Deserialize, Clone)]
pub struct DestinationConfig {
    /// City name
    pub name: String,
    /// Country name
    pub country: String,
    /// Short blurb
    #[serde(default)]
    pub description: Option<String>,
    /// Best time of year to visit
    #[serde(default)]
    pub best_season: Option<String>,
    /// Rough daily spend for a visitor
    #[serde(default)]
    pub average_daily_cost: Option<f64>,
}

/// A single activity template
#[derive(Debug, Deserialize, Clone)]
pub struct ActivityTemplateConfig {
    /// Template name
    pub name: String,
    /// Upper-case category, e.g. `"SIGHTSEEING"`
    pub category: ActivityCategory,
    /// Short blurb
    #[serde(default)]
    pub description: Option<String>,
    /// Typical cost
    #[serde(default)]
    pub typical_cost: f64,
    /// Typical duration in minutes
    #[serde(default)]
    pub typical_duration_minutes: Option<i32>,
}

/// Loads the catalog from a TOML file
///
/// # Errors
/// Returns `Error::Config` if the file cannot be read or the TOML is invalid.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<CatalogConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read catalog file: {e}"),
    })?;

    parse_catalog(&contents)
}

/// Parses catalog TOML from a string
///
/// # Errors
/// Returns `Error::Config` if the TOML is invalid or a field has the wrong type.
pub fn parse_catalog(contents: &str) -> Result<CatalogConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse catalog.toml: {e}"),
    })
}
