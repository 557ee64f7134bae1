//! Trip entity - The aggregate root of an itinerary.
//!
//! A trip belongs to exactly one user, owns an ordered list of cities and at most
//! one budget, and carries the visibility flag plus the optional share token that
//! grant public read access.

use super::sea_orm_active_enums::TripStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Trip database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "trips")]
pub struct Model {
    /// Unique identifier for the trip
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the owning user
    pub user_id: i64,
    /// Trip name (e.g., "Japan 2025")
    pub name: String,
    /// Free-form description
    pub description: Option<String>,
    /// Cover image reference
    pub cover_image: Option<String>,
    /// First day of the trip
    pub start_date: Date,
    /// Last day of the trip
    pub end_date: Date,
    /// Lifecycle status
    pub status: TripStatus,
    /// Whether anyone may read this trip
    pub is_public: bool,
    /// Unguessable token for public share links; at most one valid per trip
    #[sea_orm(unique)]
    pub share_token: Option<String>,
    /// Rough budget hint entered at creation time
    pub total_budget: Option<f64>,
    /// ISO currency code used for the trip
    pub currency: String,
    /// Free-form tags as a JSON array of strings
    pub tags: Json,
    /// When the trip was created
    pub created_at: DateTimeUtc,
    /// When the trip was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Trip and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each trip belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    /// One trip has many cities
    #[sea_orm(has_many = "super::city::Entity")]
    Cities,
    /// One trip has at most one budget
    #[sea_orm(has_one = "super::budget::Entity")]
    Budget,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::city::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cities.def()
    }
}

impl Related<super::budget::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Budget.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Decodes the stored tag array, skipping anything that is not a string.
    #[must_use]
    pub fn tag_list(&self) -> Vec<String> {
        self.tags
            .as_array()
            .map(|tags| {
                tags.iter()
                    .filter_map(|tag| tag.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}
