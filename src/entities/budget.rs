//! Budget entity - Planned spending for a trip.
//!
//! A trip has at most one budget; `trip_id` carries a unique constraint so a
//! second concurrent insert fails instead of overwriting the first.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Budget database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    /// Unique identifier for the budget
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the owning trip
    #[sea_orm(unique)]
    pub trip_id: i64,
    /// Overall amount the traveller intends to spend
    pub total_budget: f64,
    /// ISO currency code
    pub currency: String,
    /// Planned accommodation spend
    pub accommodation: f64,
    /// Planned transportation spend
    pub transportation: f64,
    /// Planned food spend
    pub food: f64,
    /// Planned activities spend
    pub activities: f64,
    /// Planned shopping spend
    pub shopping: f64,
    /// Emergency reserve
    pub emergency: f64,
    /// Anything else
    pub other: f64,
    /// When the budget was created
    pub created_at: DateTimeUtc,
    /// When the budget was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Budget and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each budget belongs to one trip
    #[sea_orm(
        belongs_to = "super::trip::Entity",
        from = "Column::TripId",
        to = "super::trip::Column::Id",
        on_delete = "Cascade"
    )]
    Trip,
    /// One budget has many expenses
    #[sea_orm(has_many = "super::expense::Entity")]
    Expenses,
}

impl Related<super::trip::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trip.def()
    }
}

impl Related<super::expense::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Planned amounts keyed by their lower-case bucket name.
    #[must_use]
    pub const fn planned_categories(&self) -> [(&'static str, f64); 7] {
        [
            ("accommodation", self.accommodation),
            ("transportation", self.transportation),
            ("food", self.food),
            ("activities", self.activities),
            ("shopping", self.shopping),
            ("emergency", self.emergency),
            ("other", self.other),
        ]
    }
}
