//! String-backed enumerations shared by several entities.
//!
//! Values are stored upper-case so the database stays readable from a SQL shell.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role of a registered user
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Regular account
    #[sea_orm(string_value = "USER")]
    User,
    /// Administrator account
    #[sea_orm(string_value = "ADMIN")]
    Admin,
}

/// Lifecycle status of a trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TripStatus {
    /// Still being assembled
    #[sea_orm(string_value = "PLANNING")]
    Planning,
    /// Planned and not yet started
    #[sea_orm(string_value = "UPCOMING")]
    Upcoming,
    /// Currently under way
    #[sea_orm(string_value = "ONGOING")]
    Ongoing,
    /// Finished
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
    /// Called off
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
}

/// Category of a planned activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityCategory {
    /// Landmarks and viewpoints
    #[sea_orm(string_value = "SIGHTSEEING")]
    Sightseeing,
    /// Restaurants, markets and tastings
    #[sea_orm(string_value = "FOOD")]
    Food,
    /// Outdoor and physical activities
    #[sea_orm(string_value = "ADVENTURE")]
    Adventure,
    /// Museums, galleries and heritage sites
    #[sea_orm(string_value = "CULTURE")]
    Culture,
    /// Shopping trips
    #[sea_orm(string_value = "SHOPPING")]
    Shopping,
    /// Bars, clubs and evening shows
    #[sea_orm(string_value = "NIGHTLIFE")]
    Nightlife,
    /// Spas, beaches and downtime
    #[sea_orm(string_value = "RELAXATION")]
    Relaxation,
    /// Getting from place to place
    #[sea_orm(string_value = "TRANSPORTATION")]
    Transportation,
    /// Check-ins and stays
    #[sea_orm(string_value = "ACCOMMODATION")]
    Accommodation,
    /// Anything else
    #[sea_orm(string_value = "OTHER")]
    Other,
}

/// Category of a logged expense.
///
/// Independent from the seven planned budget buckets: `Entertainment` and
/// `Health` have no planned counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpenseCategory {
    /// Lodging
    #[sea_orm(string_value = "ACCOMMODATION")]
    Accommodation,
    /// Fares, fuel and transfers
    #[sea_orm(string_value = "TRANSPORTATION")]
    Transportation,
    /// Meals and groceries
    #[sea_orm(string_value = "FOOD")]
    Food,
    /// Tickets and tours
    #[sea_orm(string_value = "ACTIVITIES")]
    Activities,
    /// Purchases and souvenirs
    #[sea_orm(string_value = "SHOPPING")]
    Shopping,
    /// Shows and nightlife
    #[sea_orm(string_value = "ENTERTAINMENT")]
    Entertainment,
    /// Medicine and insurance
    #[sea_orm(string_value = "HEALTH")]
    Health,
    /// Unplanned emergencies
    #[sea_orm(string_value = "EMERGENCY")]
    Emergency,
    /// Anything else
    #[sea_orm(string_value = "OTHER")]
    Other,
}

impl ExpenseCategory {
    /// Lower-case key used when comparing against planned budget buckets
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Accommodation => "accommodation",
            Self::Transportation => "transportation",
            Self::Food => "food",
            Self::Activities => "activities",
            Self::Shopping => "shopping",
            Self::Entertainment => "entertainment",
            Self::Health => "health",
            Self::Emergency => "emergency",
            Self::Other => "other",
        }
    }
}
