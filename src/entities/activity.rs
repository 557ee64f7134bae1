//! Activity entity - Something planned in a city on a given day.
use super::sea_orm_active_enums::ActivityCategory;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Activity database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "activities")]
pub struct Model {
    /// Unique identifier for the activity
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the city this activity belongs to
    pub city_id: i64,
    /// Activity name
    pub name: String,
    /// Free-form description
    pub description: Option<String>,
    /// Activity category
    pub category: ActivityCategory,
    /// Day the activity takes place
    pub date: Date,
    /// Optional start time
    pub start_time: Option<Time>,
    /// Optional end time
    pub end_time: Option<Time>,
    /// Expected cost, never negative
    pub cost: f64,
    /// ISO currency code of `cost`
    pub currency: String,
    /// Address or place name
    pub location: Option<String>,
    /// Position among the city's activities
    pub order: i32,
}

/// Defines relationships between Activity and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each activity belongs to one city
    #[sea_orm(
        belongs_to = "super::city::Entity",
        from = "Column::CityId",
        to = "super::city::Column::Id",
        on_delete = "Cascade"
    )]
    City,
}

impl Related<super::city::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::City.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
