//! Activity business logic - the ordered plan inside a city.
//!
//! Ownership is derived through Activity → City → Trip by the ownership guard.

use crate::{
    core::{
        access::{Access, Resource, authorize},
        identity::UserId,
        ordering::{next_order, remove, reorder},
        validation::{normalize_currency, require_name, validate_amount},
    },
    entities::{Activity, ActivityCategory, activity},
    errors::{Error, ResourceKind, Result},
};
use chrono::{NaiveDate, NaiveTime};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// Attributes of a new activity
#[derive(Debug, Clone)]
pub struct NewActivity {
    /// Activity name
    pub name: String,
    /// Category
    pub category: ActivityCategory,
    /// Day it takes place
    pub date: NaiveDate,
    /// Optional start time
    pub start_time: Option<NaiveTime>,
    /// Optional end time
    pub end_time: Option<NaiveTime>,
    /// Expected cost, defaults to zero
    pub cost: f64,
    /// Defaults to the trip's currency
    pub currency: Option<String>,
    /// Free-form description
    pub description: Option<String>,
    /// Address or place name
    pub location: Option<String>,
}

impl NewActivity {
    /// An activity with only the required fields set and zero cost.
    #[must_use]
    pub fn new(name: impl Into<String>, category: ActivityCategory, date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            category,
            date,
            start_time: None,
            end_time: None,
            cost: 0.0,
            currency: None,
            description: None,
            location: None,
        }
    }
}

/// Changes to an activity. `None` leaves a field untouched; `Some(None)` clears a
/// nullable one.
#[derive(Debug, Clone, Default)]
pub struct ActivityPatch {
    /// New name
    pub name: Option<String>,
    /// New category
    pub category: Option<ActivityCategory>,
    /// New day
    pub date: Option<NaiveDate>,
    /// New start time, or `Some(None)` to remove it
    pub start_time: Option<Option<NaiveTime>>,
    /// New end time, or `Some(None)` to remove it
    pub end_time: Option<Option<NaiveTime>>,
    /// New expected cost
    pub cost: Option<f64>,
    /// New currency code
    pub currency: Option<String>,
    /// New description, or `Some(None)` to remove it
    pub description: Option<Option<String>>,
    /// New location, or `Some(None)` to remove it
    pub location: Option<Option<String>>,
}

fn validate_times(start: Option<NaiveTime>, end: Option<NaiveTime>) -> Result<()> {
    if let (Some(start), Some(end)) = (start, end) {
        if start >= end {
            return Err(Error::invalid(format!(
                "Activity end time {end} must be after start time {start}"
            )));
        }
    }
    Ok(())
}

async fn find_activity<C>(db: &C, activity_id: i64) -> Result<activity::Model>
where
    C: ConnectionTrait,
{
    Activity::find_by_id(activity_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found(ResourceKind::Activity, activity_id))
}

/// Appends an activity to a city the actor owns.
///
/// # Errors
/// - `Error::NotFound` / `Error::AccessDenied` from the ownership guard
/// - `Error::InvalidAmount` for a negative or non-finite cost
/// - `Error::InvalidArgument` for a blank name or an end time not after the start time
#[instrument(skip(db, attrs), fields(name = %attrs.name))]
pub async fn add_activity(
    db: &DatabaseConnection,
    city_id: i64,
    actor: UserId,
    attrs: NewActivity,
) -> Result<activity::Model> {
    let trip = authorize(db, Some(actor), Resource::City(city_id), Access::Write).await?;
    let name = require_name("Activity name", &attrs.name)?;
    let cost = validate_amount(attrs.cost)?;
    validate_times(attrs.start_time, attrs.end_time)?;
    let currency = match attrs.currency {
        Some(code) => normalize_currency(&code)?,
        None => trip.currency,
    };

    let txn = db.begin().await?;
    let order = next_order::<Activity, _>(&txn, city_id).await?;
    let activity = activity::ActiveModel {
        city_id: Set(city_id),
        name: Set(name),
        description: Set(attrs.description),
        category: Set(attrs.category),
        date: Set(attrs.date),
        start_time: Set(attrs.start_time),
        end_time: Set(attrs.end_time),
        cost: Set(cost),
        currency: Set(currency),
        location: Set(attrs.location),
        order: Set(order),
        ..Default::default()
    };
    let result = activity.insert(&txn).await?;
    txn.commit().await?;

    info!(activity_id = result.id, city_id, order, "Added activity");
    Ok(result)
}

/// Returns a single activity.
pub async fn get_activity(
    db: &DatabaseConnection,
    activity_id: i64,
    requester: Option<UserId>,
) -> Result<activity::Model> {
    authorize(db, requester, Resource::Activity(activity_id), Access::Read).await?;
    find_activity(db, activity_id).await
}

/// Lists a city's activities in order.
pub async fn list_activities(
    db: &DatabaseConnection,
    city_id: i64,
    requester: Option<UserId>,
) -> Result<Vec<activity::Model>> {
    authorize(db, requester, Resource::City(city_id), Access::Read).await?;
    Activity::find()
        .filter(activity::Column::CityId.eq(city_id))
        .order_by_asc(activity::Column::Order)
        .order_by_asc(activity::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Applies a patch to an activity the actor owns.
#[instrument(skip(db, patch))]
pub async fn update_activity(
    db: &DatabaseConnection,
    activity_id: i64,
    actor: UserId,
    patch: ActivityPatch,
) -> Result<activity::Model> {
    authorize(db, Some(actor), Resource::Activity(activity_id), Access::Write).await?;
    let activity = find_activity(db, activity_id).await?;

    validate_times(
        patch.start_time.unwrap_or(activity.start_time),
        patch.end_time.unwrap_or(activity.end_time),
    )?;

    let mut active: activity::ActiveModel = activity.into();
    if let Some(name) = patch.name {
        active.name = Set(require_name("Activity name", &name)?);
    }
    if let Some(category) = patch.category {
        active.category = Set(category);
    }
    if let Some(date) = patch.date {
        active.date = Set(date);
    }
    if let Some(start_time) = patch.start_time {
        active.start_time = Set(start_time);
    }
    if let Some(end_time) = patch.end_time {
        active.end_time = Set(end_time);
    }
    if let Some(cost) = patch.cost {
        active.cost = Set(validate_amount(cost)?);
    }
    if let Some(currency) = patch.currency {
        active.currency = Set(normalize_currency(&currency)?);
    }
    if let Some(description) = patch.description {
        active.description = Set(description);
    }
    if let Some(location) = patch.location {
        active.location = Set(location);
    }

    active.update(db).await.map_err(Into::into)
}

/// Deletes an activity. Its siblings keep their order values.
#[instrument(skip(db))]
pub async fn delete_activity(
    db: &DatabaseConnection,
    activity_id: i64,
    actor: UserId,
) -> Result<()> {
    authorize(db, Some(actor), Resource::Activity(activity_id), Access::Write).await?;
    remove::<Activity, _>(db, activity_id).await?;
    info!(activity_id, "Deleted activity");
    Ok(())
}

/// Reorders all activities of a city; `ordered_ids` must list every activity exactly once.
///
/// # Errors
/// - `Error::NotFound` / `Error::AccessDenied` from the ownership guard
/// - `Error::InvalidReorder` if `ordered_ids` is not a permutation of the city's activities
pub async fn reorder_activities(
    db: &DatabaseConnection,
    city_id: i64,
    actor: UserId,
    ordered_ids: &[i64],
) -> Result<Vec<activity::Model>> {
    authorize(db, Some(actor), Resource::City(city_id), Access::Write).await?;
    reorder::<Activity, _>(db, city_id, ordered_ids).await?;
    list_activities(db, city_id, Some(actor)).await
}
