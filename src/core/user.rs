//! User business logic - registration lookups and account removal.
//!
//! Credentials live with an external collaborator; this module only keeps the
//! account row that trips hang off, and removes an account together with every
//! trip graph it owns.

use crate::{
    core::{identity::UserId, trip::delete_trip_graph},
    entities::{Role, Trip, User, trip, user},
    errors::{Error, ResourceKind, Result},
};
use sea_orm::{QuerySelect, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// Creates a user account.
///
/// The email is trimmed and lower-cased before it is stored.
///
/// # Errors
/// - `Error::InvalidArgument` if the email or name is blank
/// - `Error::Conflict` if another account already uses the email
#[instrument(skip(db))]
pub async fn create_user(
    db: &DatabaseConnection,
    email: &str,
    name: &str,
    role: Role,
) -> Result<user::Model> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(Error::invalid("A valid email address is required"));
    }
    if name.trim().is_empty() {
        return Err(Error::invalid("User name cannot be empty"));
    }

    let existing = User::find()
        .filter(user::Column::Email.eq(email.as_str()))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(Error::Conflict {
            message: format!("Email {email} is already registered"),
        });
    }

    let user = user::ActiveModel {
        email: Set(email),
        name: Set(name.trim().to_string()),
        role: Set(role),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let result = user.insert(db).await?;
    info!(user_id = result.id, "Registered user");
    Ok(result)
}

/// Finds a user by ID.
///
/// # Errors
/// Returns `Error::NotFound` if the user does not exist.
pub async fn get_user(db: &DatabaseConnection, user_id: UserId) -> Result<user::Model> {
    User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found(ResourceKind::User, user_id))
}

/// Deletes a user and every trip graph they own, in one transaction.
///
/// # Errors
/// Returns `Error::NotFound` if the user does not exist.
#[instrument(skip(db))]
pub async fn delete_user(db: &DatabaseConnection, user_id: UserId) -> Result<()> {
    let txn = db.begin().await?;

    User::find_by_id(user_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found(ResourceKind::User, user_id))?;

    let trip_ids: Vec<i64> = Trip::find()
        .select_only()
        .column(trip::Column::Id)
        .filter(trip::Column::UserId.eq(user_id))
        .into_tuple()
        .all(&txn)
        .await?;

    for trip_id in &trip_ids {
        delete_trip_graph(&txn, *trip_id).await?;
    }
    User::delete_by_id(user_id).exec(&txn).await?;

    txn.commit().await?;
    info!(user_id, trips = trip_ids.len(), "Deleted user");
    Ok(())
}
