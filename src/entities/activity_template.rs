//! Activity template entity - Read-only catalog used to prefill activity forms.

use super::sea_orm_active_enums::ActivityCategory;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Activity template database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "activity_templates")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub category: ActivityCategory,
    pub description: Option<String>,
    pub typical_cost: f64,
    pub typical_duration_minutes: Option<i32>,
}

/// Catalog rows stand alone
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
