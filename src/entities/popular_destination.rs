//! Popular destination entity - Read-only catalog used to prefill city forms.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Popular destination database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "popular_destinations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub country: String,
    pub description: Option<String>,
    /// e.g. "Spring"
    pub best_season: Option<String>,
    pub average_daily_cost: Option<f64>,
}

/// Catalog rows stand alone
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
