//! Application settings loaded from environment variables.
//!
//! Values are read once at start-up (after `.env` has been loaded) and every
//! setting has a default, so an empty environment yields a usable local setup.

use super::database::get_database_url;
use crate::errors::{Error, Result};
use std::path::PathBuf;

/// Base URL share links are built on when `SHARE_BASE_URL` is unset.
pub const DEFAULT_SHARE_BASE_URL: &str = "http://localhost:3000";
/// Catalog file read when `CATALOG_PATH` is unset.
pub const DEFAULT_CATALOG_PATH: &str = "catalog.toml";

/// Process-wide settings
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Connection string for the database
    pub database_url: String,
    /// Public base URL that share links are appended to
    pub share_base_url: String,
    /// Location of the reference catalog TOML
    pub catalog_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: super::database::DEFAULT_DATABASE_URL.to_string(),
            share_base_url: DEFAULT_SHARE_BASE_URL.to_string(),
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
        }
    }
}

/// Builds the application configuration from the environment.
///
/// Reads `DATABASE_URL`, `SHARE_BASE_URL` and `CATALOG_PATH`.
///
/// # Errors
/// Returns `Error::Config` if `SHARE_BASE_URL` is not an http(s) URL.
pub fn load_app_config() -> Result<AppConfig> {
    let share_base_url = match std::env::var("SHARE_BASE_URL") {
        Ok(raw) => parse_share_base_url(&raw)?,
        Err(_) => DEFAULT_SHARE_BASE_URL.to_string(),
    };

    let catalog_path = std::env::var("CATALOG_PATH")
        .map_or_else(|_| PathBuf::from(DEFAULT_CATALOG_PATH), PathBuf::from);

    Ok(AppConfig {
        database_url: get_database_url(),
        share_base_url,
        catalog_path,
    })
}

fn parse_share_base_url(raw: &str) -> Result<String> {
    let url = raw.trim().trim_end_matches('/');
    let host = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    match host {
        Some(host) if !host.is_empty() => Ok(url.to_string()),
        _ => Err(Error::Config {
            message: format!("SHARE_BASE_URL must be an http(s) URL, got '{raw}'"),
        }),
    }
}
