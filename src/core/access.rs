//! Ownership guard - decides whether an actor may read or write a resource.
//!
//! Descendants do not store an owner. Ownership is re-derived by walking the
//! chain upward (Activity → City → Trip, Expense → Budget → Trip) and comparing
//! the trip's `user_id` with the actor. The first missing link on the way up is
//! reported as `NotFound`, before ownership is evaluated.

use crate::{
    core::identity::UserId,
    entities::{Activity, Budget, City, Expense, Trip, trip},
    errors::{Error, ResourceKind, Result},
};
use sea_orm::prelude::*;
use tracing::{debug, warn};

/// Access level an operation needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// View the resource and its descendants
    Read,
    /// Modify, delete or share the resource
    Write,
}

/// A guarded resource, identified by its primary key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// A trip
    Trip(i64),
    /// A city
    City(i64),
    /// An activity
    Activity(i64),
    /// A budget
    Budget(i64),
    /// An expense
    Expense(i64),
}

impl Resource {
    /// Kind and id, for error reporting
    #[must_use]
    pub const fn describe(self) -> (ResourceKind, i64) {
        match self {
            Self::Trip(id) => (ResourceKind::Trip, id),
            Self::City(id) => (ResourceKind::City, id),
            Self::Activity(id) => (ResourceKind::Activity, id),
            Self::Budget(id) => (ResourceKind::Budget, id),
            Self::Expense(id) => (ResourceKind::Expense, id),
        }
    }
}

/// Outcome of an ownership check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The actor owns the trip
    Allow,
    /// Not the owner, but the trip is public and only read access was requested
    AllowPublicRead,
    /// Not permitted
    Deny,
}

impl Decision {
    /// Whether the operation may proceed
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allow | Self::AllowPublicRead)
    }
}

/// Pure decision function over an already-resolved trip.
///
/// Writes always require ownership; reads are also open to anyone, including
/// anonymous actors, when the trip is public.
#[must_use]
pub fn decide(trip: &trip::Model, actor: Option<UserId>, access: Access) -> Decision {
    if actor == Some(trip.user_id) {
        return Decision::Allow;
    }
    match access {
        Access::Read if trip.is_public => Decision::AllowPublicRead,
        Access::Read | Access::Write => Decision::Deny,
    }
}

async fn find_trip<C>(db: &C, trip_id: i64) -> Result<trip::Model>
where
    C: ConnectionTrait,
{
    Trip::find_by_id(trip_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found(ResourceKind::Trip, trip_id))
}

async fn trip_of_city<C>(db: &C, city_id: i64) -> Result<trip::Model>
where
    C: ConnectionTrait,
{
    let city = City::find_by_id(city_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found(ResourceKind::City, city_id))?;
    find_trip(db, city.trip_id).await
}

async fn trip_of_budget<C>(db: &C, budget_id: i64) -> Result<trip::Model>
where
    C: ConnectionTrait,
{
    let budget = Budget::find_by_id(budget_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found(ResourceKind::Budget, budget_id))?;
    find_trip(db, budget.trip_id).await
}

/// Resolves the trip at the top of `resource`'s ownership chain.
///
/// # Errors
/// Returns `Error::NotFound` naming the first missing entity in the chain.
pub async fn owning_trip<C>(db: &C, resource: Resource) -> Result<trip::Model>
where
    C: ConnectionTrait,
{
    match resource {
        Resource::Trip(id) => find_trip(db, id).await,
        Resource::City(id) => trip_of_city(db, id).await,
        Resource::Activity(id) => {
            let activity = Activity::find_by_id(id)
                .one(db)
                .await?
                .ok_or_else(|| Error::not_found(ResourceKind::Activity, id))?;
            trip_of_city(db, activity.city_id).await
        }
        Resource::Budget(id) => trip_of_budget(db, id).await,
        Resource::Expense(id) => {
            let expense = Expense::find_by_id(id)
                .one(db)
                .await?
                .ok_or_else(|| Error::not_found(ResourceKind::Expense, id))?;
            trip_of_budget(db, expense.budget_id).await
        }
    }
}

/// Checks that `actor` may access `resource` and returns the owning trip.
///
/// # Errors
/// - `Error::NotFound` if the resource or any ancestor does not exist
/// - `Error::AccessDenied` if the decision is [`Decision::Deny`]
pub async fn authorize<C>(
    db: &C,
    actor: Option<UserId>,
    resource: Resource,
    access: Access,
) -> Result<trip::Model>
where
    C: ConnectionTrait,
{
    let trip = owning_trip(db, resource).await?;
    let decision = decide(&trip, actor, access);
    debug!(?resource, ?actor, ?access, ?decision, "Ownership check");

    if decision.is_allowed() {
        Ok(trip)
    } else {
        warn!(?resource, ?actor, ?access, "Access denied");
        let (kind, id) = resource.describe();
        Err(Error::access_denied(kind, id))
    }
}
