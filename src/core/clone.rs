//! Trip cloner - copies a shared trip into another user's account.
//!
//! The whole copy (trip, cities, activities, budget) runs in one transaction, so
//! a failure part-way leaves nothing behind for the new owner. Expenses are
//! personal history and are never copied. The source trip and its token are
//! only read.

use crate::{
    core::{identity::UserId, share::find_shared_trip},
    entities::{
        Activity, Budget, City, TripStatus, User, activity, budget, city, trip,
    },
    errors::{Error, ResourceKind, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// Suffix appended to the name of a cloned trip.
pub const COPY_SUFFIX: &str = " (Copy)";

fn copied_trip(source: &trip::Model, new_owner: UserId) -> trip::ActiveModel {
    let now = Utc::now();
    trip::ActiveModel {
        user_id: Set(new_owner),
        name: Set(format!("{}{COPY_SUFFIX}", source.name)),
        description: Set(source.description.clone()),
        cover_image: Set(source.cover_image.clone()),
        start_date: Set(source.start_date),
        end_date: Set(source.end_date),
        status: Set(TripStatus::Planning),
        is_public: Set(false),
        share_token: Set(None),
        total_budget: Set(source.total_budget),
        currency: Set(source.currency.clone()),
        tags: Set(source.tags.clone()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
}

/// Deep-copies the public trip behind `share_token` into `new_owner`'s account.
///
/// Cities and activities keep their relative order, dates and costs; the budget
/// keeps its planned amounts but starts with no expenses. The copy is private.
///
/// # Errors
/// - `Error::NotFound` if the token does not resolve to a public trip, or the new owner does not exist
#[instrument(skip_all, fields(new_owner))]
pub async fn copy_trip(
    db: &DatabaseConnection,
    share_token: &str,
    new_owner: UserId,
) -> Result<trip::Model> {
    let txn = db.begin().await?;

    let source = find_shared_trip(&txn, share_token).await?;
    User::find_by_id(new_owner)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found(ResourceKind::User, new_owner))?;

    let copy = copied_trip(&source, new_owner).insert(&txn).await?;

    let cities = City::find()
        .filter(city::Column::TripId.eq(source.id))
        .order_by_asc(city::Column::Order)
        .order_by_asc(city::Column::Id)
        .all(&txn)
        .await?;

    let mut activity_count = 0usize;
    for (city_position, source_city) in cities.iter().enumerate() {
        let new_city = city::ActiveModel {
            trip_id: Set(copy.id),
            name: Set(source_city.name.clone()),
            country: Set(source_city.country.clone()),
            arrival_date: Set(source_city.arrival_date),
            departure_date: Set(source_city.departure_date),
            latitude: Set(source_city.latitude),
            longitude: Set(source_city.longitude),
            notes: Set(source_city.notes.clone()),
            order: Set(i32::try_from(city_position)?),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let activities = Activity::find()
            .filter(activity::Column::CityId.eq(source_city.id))
            .order_by_asc(activity::Column::Order)
            .order_by_asc(activity::Column::Id)
            .all(&txn)
            .await?;

        for (activity_position, source_activity) in activities.into_iter().enumerate() {
            activity::ActiveModel {
                city_id: Set(new_city.id),
                name: Set(source_activity.name),
                description: Set(source_activity.description),
                category: Set(source_activity.category),
                date: Set(source_activity.date),
                start_time: Set(source_activity.start_time),
                end_time: Set(source_activity.end_time),
                cost: Set(source_activity.cost),
                currency: Set(source_activity.currency),
                location: Set(source_activity.location),
                order: Set(i32::try_from(activity_position)?),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            activity_count += 1;
        }
    }

    let source_budget = Budget::find()
        .filter(budget::Column::TripId.eq(source.id))
        .one(&txn)
        .await?;
    if let Some(source_budget) = &source_budget {
        let now = Utc::now();
        budget::ActiveModel {
            trip_id: Set(copy.id),
            total_budget: Set(source_budget.total_budget),
            currency: Set(source_budget.currency.clone()),
            accommodation: Set(source_budget.accommodation),
            transportation: Set(source_budget.transportation),
            food: Set(source_budget.food),
            activities: Set(source_budget.activities),
            shopping: Set(source_budget.shopping),
            emergency: Set(source_budget.emergency),
            other: Set(source_budget.other),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;
    info!(
        source_trip_id = source.id,
        trip_id = copy.id,
        new_owner,
        cities = cities.len(),
        activities = activity_count,
        with_budget = source_budget.is_some(),
        "Cloned trip"
    );
    Ok(copy)
}
