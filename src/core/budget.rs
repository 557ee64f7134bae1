//! Budget and expense ledger.
//!
//! Each trip has at most one budget holding seven planned category amounts and an
//! append-only log of expenses. The reporting functions (`compute_summary`,
//! `breakdown`, `daily_spending`) are pure and operate on already-loaded rows;
//! the async functions load and authorize before handing rows to them.
//!
//! One budget per trip is checked inside the insert transaction and backed by a
//! unique constraint on `budgets.trip_id`, so a racing second insert surfaces as
//! `Error::Conflict` rather than a silent overwrite.

use crate::{
    core::{
        access::{Access, Resource, authorize},
        identity::UserId,
        validation::{normalize_currency, validate_amount},
    },
    entities::{Budget, Expense, ExpenseCategory, budget, expense, trip},
    errors::{Error, ResourceKind, Result},
};
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{info, instrument};

/// Attributes of a new budget. Planned amounts default to zero.
#[derive(Debug, Clone, Default)]
pub struct NewBudget {
    /// Overall budget
    pub total_budget: f64,
    /// Defaults to the trip's currency
    pub currency: Option<String>,
    /// Planned spend on lodging
    pub accommodation: f64,
    /// Planned spend on getting around
    pub transportation: f64,
    /// Planned spend on meals
    pub food: f64,
    /// Planned spend on activities
    pub activities: f64,
    /// Planned spend on shopping
    pub shopping: f64,
    /// Emergency reserve
    pub emergency: f64,
    /// Anything else
    pub other: f64,
}

/// Changes to a budget. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct BudgetPatch {
    /// New overall budget
    pub total_budget: Option<f64>,
    /// New currency code
    pub currency: Option<String>,
    /// New lodging amount
    pub accommodation: Option<f64>,
    /// New transportation amount
    pub transportation: Option<f64>,
    /// New food amount
    pub food: Option<f64>,
    /// New activities amount
    pub activities: Option<f64>,
    /// New shopping amount
    pub shopping: Option<f64>,
    /// New emergency reserve
    pub emergency: Option<f64>,
    /// New amount for anything else
    pub other: Option<f64>,
}

/// Attributes of a new expense
#[derive(Debug, Clone)]
pub struct NewExpense {
    /// Amount spent, must be non-negative
    pub amount: f64,
    /// Spending category
    pub category: ExpenseCategory,
    /// When it was spent; defaults to now
    pub date: Option<DateTime<Utc>>,
    /// Defaults to the budget's currency
    pub currency: Option<String>,
    /// What it was for
    pub description: Option<String>,
    /// Receipt reference
    pub receipt_url: Option<String>,
}

impl NewExpense {
    /// An expense with only amount and category set.
    #[must_use]
    pub const fn new(amount: f64, category: ExpenseCategory) -> Self {
        Self {
            amount,
            category,
            date: None,
            currency: None,
            description: None,
            receipt_url: None,
        }
    }
}

/// Headline figures for a budget
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetSummary {
    /// Overall budget
    pub total_budget: f64,
    /// Sum of the seven planned category amounts
    pub planned_total: f64,
    /// Sum of all expenses
    pub actual_spent: f64,
    /// `total_budget - actual_spent`, negative when over budget
    pub remaining: f64,
    /// Whether spending exceeds the overall budget
    pub is_over_budget: bool,
    /// Spending as a percentage of the overall budget; zero when the budget is zero
    pub percent_used: f64,
}

/// Planned versus actual spend for one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    /// Lower-case category key
    pub category: String,
    /// Planned amount, zero for categories without a planned bucket
    pub planned: f64,
    /// Actual spend
    pub actual: f64,
    /// `planned - actual`
    pub difference: f64,
}

/// Spending spread over the days of the trip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySpending {
    /// Length of the trip in days, at least one
    pub trip_days: i64,
    /// Overall budget divided by the trip length
    pub daily_budget_allowance: f64,
    /// Actual spend divided by the trip length
    pub average_daily: f64,
    /// Actual spend per calendar day
    pub by_date: BTreeMap<NaiveDate, f64>,
}

/// A budget with its expenses and summary
#[derive(Debug, Clone, Serialize)]
pub struct BudgetDetails {
    /// The budget
    pub budget: budget::Model,
    /// Expenses, newest first
    pub expenses: Vec<expense::Model>,
    /// Headline figures
    pub summary: BudgetSummary,
}

/// Everything the budget screen shows
#[derive(Debug, Clone, Serialize)]
pub struct BudgetReport {
    /// Headline figures
    pub summary: BudgetSummary,
    /// Per-category comparison
    pub breakdown: Vec<CategoryBreakdown>,
    /// Per-day figures
    pub daily: DailySpending,
}

/// Computes the headline figures for a budget.
#[must_use]
pub fn compute_summary(budget: &budget::Model, expenses: &[expense::Model]) -> BudgetSummary {
    let actual_spent: f64 = expenses.iter().map(|e| e.amount).sum();
    let planned_total: f64 = budget
        .planned_categories()
        .iter()
        .map(|(_, amount)| amount)
        .sum();
    let total_budget = budget.total_budget;

    let percent_used = if total_budget <= 0.0 {
        0.0
    } else {
        actual_spent * 100.0 / total_budget
    };

    BudgetSummary {
        total_budget,
        planned_total,
        actual_spent,
        remaining: total_budget - actual_spent,
        is_over_budget: actual_spent > total_budget,
        percent_used,
    }
}

/// Compares actual spend per category with the planned buckets.
///
/// The seven planned buckets always appear first, in a fixed order; spend in
/// categories without a bucket follows with `planned = 0`.
#[must_use]
pub fn breakdown(budget: &budget::Model, expenses: &[expense::Model]) -> Vec<CategoryBreakdown> {
    let mut actual: BTreeMap<&'static str, f64> = BTreeMap::new();
    for expense in expenses {
        *actual.entry(expense.category.key()).or_insert(0.0) += expense.amount;
    }

    let mut rows = Vec::new();
    for (category, planned) in budget.planned_categories() {
        let spent = actual.remove(category).unwrap_or(0.0);
        rows.push(CategoryBreakdown {
            category: category.to_string(),
            planned,
            actual: spent,
            difference: planned - spent,
        });
    }
    for (category, spent) in actual {
        rows.push(CategoryBreakdown {
            category: category.to_string(),
            planned: 0.0,
            actual: spent,
            difference: -spent,
        });
    }
    rows
}

/// Spreads the budget and the actual spend over the days of the trip.
///
/// A trip that starts and ends on the same day counts as one day.
#[must_use]
pub fn daily_spending(
    trip: &trip::Model,
    budget: &budget::Model,
    expenses: &[expense::Model],
) -> DailySpending {
    let trip_days = (trip.end_date - trip.start_date).num_days().max(1);

    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for expense in expenses {
        *by_date.entry(expense.date.date_naive()).or_insert(0.0) += expense.amount;
    }
    let actual_spent: f64 = by_date.values().sum();

    // Cast safety: trip lengths are far below 2^52 days.
    #[allow(clippy::cast_precision_loss)]
    let days = trip_days as f64;

    DailySpending {
        trip_days,
        daily_budget_allowance: budget.total_budget / days,
        average_daily: actual_spent / days,
        by_date,
    }
}

async fn expenses_of<C>(db: &C, budget_id: i64) -> Result<Vec<expense::Model>>
where
    C: ConnectionTrait,
{
    Expense::find()
        .filter(expense::Column::BudgetId.eq(budget_id))
        .order_by_desc(expense::Column::Date)
        .order_by_desc(expense::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Loads the expenses of an already-authorized budget and summarises them.
pub(crate) async fn load_budget_details<C>(db: &C, budget: budget::Model) -> Result<BudgetDetails>
where
    C: ConnectionTrait,
{
    let expenses = expenses_of(db, budget.id).await?;
    let summary = compute_summary(&budget, &expenses);
    Ok(BudgetDetails {
        budget,
        expenses,
        summary,
    })
}

async fn budget_for_trip<C>(db: &C, trip_id: i64) -> Result<Option<budget::Model>>
where
    C: ConnectionTrait,
{
    Budget::find()
        .filter(budget::Column::TripId.eq(trip_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates the budget of a trip the actor owns.
///
/// # Errors
/// - `Error::NotFound` / `Error::AccessDenied` from the ownership guard
/// - `Error::Conflict` if the trip already has a budget
/// - `Error::InvalidAmount` for negative amounts
#[instrument(skip(db, attrs))]
pub async fn create_budget(
    db: &DatabaseConnection,
    trip_id: i64,
    actor: UserId,
    attrs: NewBudget,
) -> Result<budget::Model> {
    for amount in [
        attrs.total_budget,
        attrs.accommodation,
        attrs.transportation,
        attrs.food,
        attrs.activities,
        attrs.shopping,
        attrs.emergency,
        attrs.other,
    ] {
        validate_amount(amount)?;
    }

    let txn = db.begin().await?;
    let trip = authorize(&txn, Some(actor), Resource::Trip(trip_id), Access::Write).await?;

    if budget_for_trip(&txn, trip_id).await?.is_some() {
        return Err(Error::Conflict {
            message: format!("Trip {trip_id} already has a budget"),
        });
    }

    let currency = match attrs.currency {
        Some(code) => normalize_currency(&code)?,
        None => trip.currency,
    };
    let now = Utc::now();
    let budget = budget::ActiveModel {
        trip_id: Set(trip_id),
        total_budget: Set(attrs.total_budget),
        currency: Set(currency),
        accommodation: Set(attrs.accommodation),
        transportation: Set(attrs.transportation),
        food: Set(attrs.food),
        activities: Set(attrs.activities),
        shopping: Set(attrs.shopping),
        emergency: Set(attrs.emergency),
        other: Set(attrs.other),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let result = budget.insert(&txn).await?;
    txn.commit().await?;

    info!(budget_id = result.id, trip_id, "Created budget");
    Ok(result)
}

/// Returns the budget of a trip with its expenses.
///
/// # Errors
/// - `Error::NotFound` if the trip or its budget does not exist
/// - `Error::AccessDenied` if the requester may not read the trip
pub async fn get_budget(
    db: &DatabaseConnection,
    trip_id: i64,
    requester: Option<UserId>,
) -> Result<BudgetDetails> {
    authorize(db, requester, Resource::Trip(trip_id), Access::Read).await?;
    let budget = budget_for_trip(db, trip_id)
        .await?
        .ok_or_else(|| Error::not_found(ResourceKind::Budget, format!("trip {trip_id}")))?;
    load_budget_details(db, budget).await
}

/// Applies a patch to a budget the actor owns.
#[instrument(skip(db, patch))]
pub async fn update_budget(
    db: &DatabaseConnection,
    budget_id: i64,
    actor: UserId,
    patch: BudgetPatch,
) -> Result<budget::Model> {
    authorize(db, Some(actor), Resource::Budget(budget_id), Access::Write).await?;
    let budget = Budget::find_by_id(budget_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found(ResourceKind::Budget, budget_id))?;

    let mut active: budget::ActiveModel = budget.into();
    if let Some(amount) = patch.total_budget {
        active.total_budget = Set(validate_amount(amount)?);
    }
    if let Some(code) = patch.currency {
        active.currency = Set(normalize_currency(&code)?);
    }
    if let Some(amount) = patch.accommodation {
        active.accommodation = Set(validate_amount(amount)?);
    }
    if let Some(amount) = patch.transportation {
        active.transportation = Set(validate_amount(amount)?);
    }
    if let Some(amount) = patch.food {
        active.food = Set(validate_amount(amount)?);
    }
    if let Some(amount) = patch.activities {
        active.activities = Set(validate_amount(amount)?);
    }
    if let Some(amount) = patch.shopping {
        active.shopping = Set(validate_amount(amount)?);
    }
    if let Some(amount) = patch.emergency {
        active.emergency = Set(validate_amount(amount)?);
    }
    if let Some(amount) = patch.other {
        active.other = Set(validate_amount(amount)?);
    }
    active.updated_at = Set(Utc::now());

    let updated = active.update(db).await?;
    info!(budget_id, "Updated budget");
    Ok(updated)
}

/// Deletes a budget and its expenses.
#[instrument(skip(db))]
pub async fn delete_budget(db: &DatabaseConnection, budget_id: i64, actor: UserId) -> Result<()> {
    authorize(db, Some(actor), Resource::Budget(budget_id), Access::Write).await?;

    let txn = db.begin().await?;
    Expense::delete_many()
        .filter(expense::Column::BudgetId.eq(budget_id))
        .exec(&txn)
        .await?;
    Budget::delete_by_id(budget_id).exec(&txn).await?;
    txn.commit().await?;

    info!(budget_id, "Deleted budget");
    Ok(())
}

/// Appends an expense to a budget the actor owns.
///
/// # Errors
/// - `Error::NotFound` / `Error::AccessDenied` from the ownership guard
/// - `Error::InvalidAmount` for a negative or non-finite amount
#[instrument(skip(db, attrs), fields(amount = attrs.amount))]
pub async fn add_expense(
    db: &DatabaseConnection,
    budget_id: i64,
    actor: UserId,
    attrs: NewExpense,
) -> Result<expense::Model> {
    authorize(db, Some(actor), Resource::Budget(budget_id), Access::Write).await?;
    let amount = validate_amount(attrs.amount)?;

    let budget = Budget::find_by_id(budget_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found(ResourceKind::Budget, budget_id))?;
    let currency = match attrs.currency {
        Some(code) => normalize_currency(&code)?,
        None => budget.currency,
    };

    let expense = expense::ActiveModel {
        budget_id: Set(budget_id),
        amount: Set(amount),
        currency: Set(currency),
        category: Set(attrs.category),
        date: Set(attrs.date.unwrap_or_else(Utc::now)),
        description: Set(attrs.description),
        receipt_url: Set(attrs.receipt_url),
        ..Default::default()
    };
    let result = expense.insert(db).await?;
    info!(expense_id = result.id, budget_id, "Logged expense");
    Ok(result)
}

/// Lists a budget's expenses, newest first.
pub async fn list_expenses(
    db: &DatabaseConnection,
    budget_id: i64,
    requester: Option<UserId>,
) -> Result<Vec<expense::Model>> {
    authorize(db, requester, Resource::Budget(budget_id), Access::Read).await?;
    expenses_of(db, budget_id).await
}

/// Builds the summary, category breakdown and daily figures for a trip's budget.
///
/// # Errors
/// - `Error::NotFound` if the trip or its budget does not exist
/// - `Error::AccessDenied` if the requester may not read the trip
#[instrument(skip(db))]
pub async fn budget_report(
    db: &DatabaseConnection,
    trip_id: i64,
    requester: Option<UserId>,
) -> Result<BudgetReport> {
    let trip = authorize(db, requester, Resource::Trip(trip_id), Access::Read).await?;
    let budget = budget_for_trip(db, trip_id)
        .await?
        .ok_or_else(|| Error::not_found(ResourceKind::Budget, format!("trip {trip_id}")))?;
    let expenses = expenses_of(db, budget.id).await?;

    Ok(BudgetReport {
        summary: compute_summary(&budget, &expenses),
        breakdown: breakdown(&budget, &expenses),
        daily: daily_spending(&trip, &budget, &expenses),
    })
}
