//! Expense entity - One line of the append-only spending log of a budget.
use super::sea_orm_active_enums::ExpenseCategory;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Expense database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    /// Unique identifier for the expense
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the budget this expense is logged against
    pub budget_id: i64,
    /// Amount spent, never negative
    pub amount: f64,
    /// ISO currency code of `amount`
    pub currency: String,
    /// Spending category
    pub category: ExpenseCategory,
    /// When the money was spent
    pub date: DateTimeUtc,
    /// What it was for
    pub description: Option<String>,
    /// Reference to a stored receipt
    pub receipt_url: Option<String>,
}

/// Defines relationships between Expense and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each expense belongs to one budget
    #[sea_orm(
        belongs_to = "super::budget::Entity",
        from = "Column::BudgetId",
        to = "super::budget::Column::Id",
        on_delete = "Cascade"
    )]
    Budget,
}

impl Related<super::budget::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Budget.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
