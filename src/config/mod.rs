/// Application settings read from the environment
pub mod app;

/// Reference catalog loading from catalog.toml
pub mod catalog;

/// Database configuration and connection management
pub mod database;
