//! City entity - A stop on a trip.
//!
//! Cities are ordered within their trip by the `order` column.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// City database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cities")]
pub struct Model {
    /// Unique identifier for the city
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the trip this city belongs to
    pub trip_id: i64,
    /// City name
    pub name: String,
    /// Country name
    pub country: String,
    /// Arrival day
    pub arrival_date: Date,
    /// Departure day
    pub departure_date: Date,
    /// Latitude, if known
    pub latitude: Option<f64>,
    /// Longitude, if known
    pub longitude: Option<f64>,
    /// Free-form notes
    pub notes: Option<String>,
    /// Position among the trip's cities
    pub order: i32,
}

/// Defines relationships between City and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each city belongs to one trip
    #[sea_orm(
        belongs_to = "super::trip::Entity",
        from = "Column::TripId",
        to = "super::trip::Column::Id",
        on_delete = "Cascade"
    )]
    Trip,
    /// One city has many activities
    #[sea_orm(has_many = "super::activity::Entity")]
    Activities,
}

impl Related<super::trip::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trip.def()
    }
}

impl Related<super::activity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Activities.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
