//! Shared test utilities for `Wanderplan`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test users, trips and their children with sensible defaults.

use crate::{
    core::{
        activity::{NewActivity, add_activity},
        budget::{NewBudget, NewExpense, add_expense, create_budget},
        city::{NewCity, add_city},
        identity::UserId,
        trip::{NewTrip, TripPatch, create_trip, update_trip},
        user::create_user,
    },
    entities::{self, ActivityCategory, ExpenseCategory, Role, TripStatus},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Shorthand for a calendar date. Panics on an invalid date, which is fine in tests.
#[allow(clippy::unwrap_used)]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// An unsaved trip row with id 1, for pure decisions and `MockDatabase` results.
pub fn sample_trip(owner: UserId, is_public: bool) -> entities::trip::Model {
    let now = chrono::Utc::now();
    entities::trip::Model {
        id: 1,
        user_id: owner,
        name: "Sample".to_string(),
        description: None,
        cover_image: None,
        start_date: date(2025, 3, 1),
        end_date: date(2025, 3, 10),
        status: TripStatus::Planning,
        is_public,
        share_token: None,
        total_budget: None,
        currency: "USD".to_string(),
        tags: serde_json::json!([]),
        created_at: now,
        updated_at: now,
    }
}

/// Creates a regular test user named "Test User".
pub async fn create_test_user(
    db: &DatabaseConnection,
    email: &str,
) -> Result<entities::user::Model> {
    create_user(db, email, "Test User", Role::User).await
}

/// Creates a test user with a custom role.
pub async fn create_custom_user(
    db: &DatabaseConnection,
    email: &str,
    role: Role,
) -> Result<entities::user::Model> {
    create_user(db, email, "Test User", role).await
}

/// Creates a test trip with sensible defaults.
///
/// # Defaults
/// * dates: 2025-03-01 to 2025-03-10
/// * currency: USD, private, status PLANNING
pub async fn create_test_trip(
    db: &DatabaseConnection,
    owner: UserId,
    name: &str,
) -> Result<entities::trip::Model> {
    create_trip(db, owner, NewTrip::new(name, date(2025, 3, 1), date(2025, 3, 10))).await
}

/// Creates a test trip with custom dates.
pub async fn create_custom_trip(
    db: &DatabaseConnection,
    owner: UserId,
    name: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<entities::trip::Model> {
    create_trip(db, owner, NewTrip::new(name, start_date, end_date)).await
}

/// Sets up a complete test environment with one user and one trip.
/// Returns (db, user, trip) for common test scenarios.
pub async fn setup_with_trip() -> Result<(
    DatabaseConnection,
    entities::user::Model,
    entities::trip::Model,
)> {
    let db = setup_test_db().await?;
    let user = create_test_user(&db, "traveler@example.com").await?;
    let trip = create_test_trip(&db, user.id, "Test Trip").await?;
    Ok((db, user, trip))
}

/// Appends a city in Japan staying 2025-03-01 to 2025-03-05.
pub async fn add_test_city(
    db: &DatabaseConnection,
    actor: UserId,
    trip_id: i64,
    name: &str,
) -> Result<entities::city::Model> {
    add_city(
        db,
        trip_id,
        actor,
        NewCity::new(name, "Japan", date(2025, 3, 1), date(2025, 3, 5)),
    )
    .await
}

/// Appends a sightseeing activity on 2025-03-02 with the given cost.
pub async fn add_test_activity(
    db: &DatabaseConnection,
    actor: UserId,
    city_id: i64,
    name: &str,
    cost: f64,
) -> Result<entities::activity::Model> {
    let mut attrs = NewActivity::new(name, ActivityCategory::Sightseeing, date(2025, 3, 2));
    attrs.cost = cost;
    add_activity(db, city_id, actor, attrs).await
}

/// Creates a budget with only the overall amount set.
pub async fn create_test_budget(
    db: &DatabaseConnection,
    actor: UserId,
    trip_id: i64,
    total_budget: f64,
) -> Result<entities::budget::Model> {
    create_budget(
        db,
        trip_id,
        actor,
        NewBudget {
            total_budget,
            ..Default::default()
        },
    )
    .await
}

/// Logs a food expense dated now.
pub async fn add_test_expense(
    db: &DatabaseConnection,
    actor: UserId,
    budget_id: i64,
    amount: f64,
) -> Result<entities::expense::Model> {
    add_expense(
        db,
        budget_id,
        actor,
        NewExpense::new(amount, ExpenseCategory::Food),
    )
    .await
}

/// Flips a trip to public without minting a token.
pub async fn make_public(
    db: &DatabaseConnection,
    owner: UserId,
    trip_id: i64,
) -> Result<entities::trip::Model> {
    update_trip(
        db,
        trip_id,
        owner,
        TripPatch {
            is_public: Some(true),
            ..Default::default()
        },
    )
    .await
}
