//! City business logic - the ordered stops of a trip.
//!
//! All mutations are owner-only and go through the ownership guard on the parent
//! trip; ordering is delegated to [`crate::core::ordering`].

use crate::{
    core::{
        access::{Access, Resource, authorize},
        identity::UserId,
        ordering::{next_order, remove, reorder},
        trip::CityDetails,
        validation::{require_name, validate_date_range},
    },
    entities::{Activity, City, activity, city},
    errors::{Error, ResourceKind, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// Attributes of a new city
#[derive(Debug, Clone)]
pub struct NewCity {
    /// City name
    pub name: String,
    /// Country name
    pub country: String,
    /// Arrival day
    pub arrival_date: NaiveDate,
    /// Departure day
    pub departure_date: NaiveDate,
    /// Latitude, if known
    pub latitude: Option<f64>,
    /// Longitude, if known
    pub longitude: Option<f64>,
    /// Free-form notes
    pub notes: Option<String>,
}

impl NewCity {
    /// A city with only the required fields set.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        country: impl Into<String>,
        arrival_date: NaiveDate,
        departure_date: NaiveDate,
    ) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            arrival_date,
            departure_date,
            latitude: None,
            longitude: None,
            notes: None,
        }
    }
}

/// Changes to a city. `None` leaves a field untouched and `Some(None)` clears a
/// nullable one; order is changed only by reordering.
#[derive(Debug, Clone, Default)]
pub struct CityPatch {
    /// New name
    pub name: Option<String>,
    /// New country
    pub country: Option<String>,
    /// New arrival day
    pub arrival_date: Option<NaiveDate>,
    /// New departure day
    pub departure_date: Option<NaiveDate>,
    /// New latitude, or `Some(None)` to remove it
    pub latitude: Option<Option<f64>>,
    /// New longitude, or `Some(None)` to remove it
    pub longitude: Option<Option<f64>>,
    /// New notes, or `Some(None)` to remove them
    pub notes: Option<Option<String>>,
}

async fn find_city<C>(db: &C, city_id: i64) -> Result<city::Model>
where
    C: ConnectionTrait,
{
    City::find_by_id(city_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found(ResourceKind::City, city_id))
}

/// Appends a city to a trip the actor owns.
///
/// # Errors
/// - `Error::NotFound` / `Error::AccessDenied` from the ownership guard
/// - `Error::InvalidArgument` for blank names or departure before arrival
#[instrument(skip(db, attrs), fields(name = %attrs.name))]
pub async fn add_city(
    db: &DatabaseConnection,
    trip_id: i64,
    actor: UserId,
    attrs: NewCity,
) -> Result<city::Model> {
    authorize(db, Some(actor), Resource::Trip(trip_id), Access::Write).await?;
    let name = require_name("City name", &attrs.name)?;
    let country = require_name("Country", &attrs.country)?;
    validate_date_range(attrs.arrival_date, attrs.departure_date)?;

    let txn = db.begin().await?;
    let order = next_order::<City, _>(&txn, trip_id).await?;
    let city = city::ActiveModel {
        trip_id: Set(trip_id),
        name: Set(name),
        country: Set(country),
        arrival_date: Set(attrs.arrival_date),
        departure_date: Set(attrs.departure_date),
        latitude: Set(attrs.latitude),
        longitude: Set(attrs.longitude),
        notes: Set(attrs.notes),
        order: Set(order),
        ..Default::default()
    };
    let result = city.insert(&txn).await?;
    txn.commit().await?;

    info!(city_id = result.id, trip_id, order, "Added city");
    Ok(result)
}

/// Returns a city with its ordered activities.
pub async fn get_city(
    db: &DatabaseConnection,
    city_id: i64,
    requester: Option<UserId>,
) -> Result<CityDetails> {
    authorize(db, requester, Resource::City(city_id), Access::Read).await?;
    let city = find_city(db, city_id).await?;
    let activities = Activity::find()
        .filter(activity::Column::CityId.eq(city_id))
        .order_by_asc(activity::Column::Order)
        .order_by_asc(activity::Column::Id)
        .all(db)
        .await?;
    Ok(CityDetails { city, activities })
}

/// Lists a trip's cities in order.
pub async fn list_cities(
    db: &DatabaseConnection,
    trip_id: i64,
    requester: Option<UserId>,
) -> Result<Vec<city::Model>> {
    authorize(db, requester, Resource::Trip(trip_id), Access::Read).await?;
    City::find()
        .filter(city::Column::TripId.eq(trip_id))
        .order_by_asc(city::Column::Order)
        .order_by_asc(city::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Applies a patch to a city the actor owns.
///
/// # Errors
/// - `Error::NotFound` / `Error::AccessDenied` from the ownership guard
/// - `Error::InvalidArgument` if the resulting stay is reversed or a name is blank
#[instrument(skip(db, patch))]
pub async fn update_city(
    db: &DatabaseConnection,
    city_id: i64,
    actor: UserId,
    patch: CityPatch,
) -> Result<city::Model> {
    authorize(db, Some(actor), Resource::City(city_id), Access::Write).await?;
    let city = find_city(db, city_id).await?;

    let arrival = patch.arrival_date.unwrap_or(city.arrival_date);
    let departure = patch.departure_date.unwrap_or(city.departure_date);
    validate_date_range(arrival, departure)?;

    let mut active: city::ActiveModel = city.into();
    if let Some(name) = patch.name {
        active.name = Set(require_name("City name", &name)?);
    }
    if let Some(country) = patch.country {
        active.country = Set(require_name("Country", &country)?);
    }
    if patch.arrival_date.is_some() {
        active.arrival_date = Set(arrival);
    }
    if patch.departure_date.is_some() {
        active.departure_date = Set(departure);
    }
    if let Some(latitude) = patch.latitude {
        active.latitude = Set(latitude);
    }
    if let Some(longitude) = patch.longitude {
        active.longitude = Set(longitude);
    }
    if let Some(notes) = patch.notes {
        active.notes = Set(notes);
    }

    active.update(db).await.map_err(Into::into)
}

/// Deletes a city and its activities. Remaining cities keep their order values.
#[instrument(skip(db))]
pub async fn delete_city(db: &DatabaseConnection, city_id: i64, actor: UserId) -> Result<()> {
    authorize(db, Some(actor), Resource::City(city_id), Access::Write).await?;

    let txn = db.begin().await?;
    Activity::delete_many()
        .filter(activity::Column::CityId.eq(city_id))
        .exec(&txn)
        .await?;
    remove::<City, _>(&txn, city_id).await?;
    txn.commit().await?;

    info!(city_id, "Deleted city");
    Ok(())
}

/// Reorders all cities of a trip; `ordered_ids` must list every city exactly once.
///
/// # Errors
/// - `Error::NotFound` / `Error::AccessDenied` from the ownership guard
/// - `Error::InvalidReorder` if `ordered_ids` is not a permutation of the trip's cities
pub async fn reorder_cities(
    db: &DatabaseConnection,
    trip_id: i64,
    actor: UserId,
    ordered_ids: &[i64],
) -> Result<Vec<city::Model>> {
    authorize(db, Some(actor), Resource::Trip(trip_id), Access::Write).await?;
    reorder::<City, _>(db, trip_id, ordered_ids).await?;
    list_cities(db, trip_id, Some(actor)).await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_cities_append_in_order() -> Result<()> {
        let (db, owner, trip) = setup_with_trip().await?;

        let tokyo = add_city(
            &db,
            trip.id,
            owner.id,
            NewCity::new("Tokyo", "Japan", date(2025, 3, 1), date(2025, 3, 5)),
        )
        .await?;
        let kyoto = add_city(
            &db,
            trip.id,
            owner.id,
            NewCity::new("Kyoto", "Japan", date(2025, 3, 5), date(2025, 3, 10)),
        )
        .await?;

        assert_eq!(tokyo.order, 0);
        assert_eq!(kyoto.order, 1);

        let cities = list_cities(&db, trip.id, Some(owner.id)).await?;
        let names: Vec<&str> = cities.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Tokyo", "Kyoto"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_add_city_validation_and_access() -> Result<()> {
        let (db, owner, trip) = setup_with_trip().await?;
        let other = create_test_user(&db, "other@example.com").await?;

        let reversed = add_city(
            &db,
            trip.id,
            owner.id,
            NewCity::new("Osaka", "Japan", date(2025, 3, 6), date(2025, 3, 4)),
        )
        .await;
        assert!(matches!(reversed.unwrap_err(), Error::InvalidArgument { .. }));

        let foreign = add_city(
            &db,
            trip.id,
            other.id,
            NewCity::new("Osaka", "Japan", date(2025, 3, 4), date(2025, 3, 6)),
        )
        .await;
        assert!(matches!(foreign.unwrap_err(), Error::AccessDenied { .. }));

        let missing = add_city(
            &db,
            999,
            owner.id,
            NewCity::new("Osaka", "Japan", date(2025, 3, 4), date(2025, 3, 6)),
        )
        .await;
        assert!(matches!(
            missing.unwrap_err(),
            Error::NotFound {
                resource: ResourceKind::Trip,
                ..
            }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_reorder_cities() -> Result<()> {
        let (db, owner, trip) = setup_with_trip().await?;
        let a = add_test_city(&db, owner.id, trip.id, "A").await?;
        let b = add_test_city(&db, owner.id, trip.id, "B").await?;
        let c = add_test_city(&db, owner.id, trip.id, "C").await?;

        let cities = reorder_cities(&db, trip.id, owner.id, &[c.id, a.id, b.id]).await?;
        let pairs: Vec<(i64, i32)> = cities.iter().map(|c| (c.id, c.order)).collect();
        assert_eq!(pairs, vec![(c.id, 0), (a.id, 1), (b.id, 2)]);

        let partial = reorder_cities(&db, trip.id, owner.id, &[a.id, b.id]).await;
        assert!(matches!(partial.unwrap_err(), Error::InvalidReorder { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_and_delete_city() -> Result<()> {
        let (db, owner, trip) = setup_with_trip().await?;
        let city = add_test_city(&db, owner.id, trip.id, "Nara").await?;
        add_test_activity(&db, owner.id, city.id, "Deer park", 0.0).await?;

        let updated = update_city(
            &db,
            city.id,
            owner.id,
            CityPatch {
                notes: Some(Some("Day trip from Kyoto".to_string())),
                departure_date: Some(date(2025, 3, 2)),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(updated.notes.as_deref(), Some("Day trip from Kyoto"));
        assert_eq!(updated.departure_date, date(2025, 3, 2));

        let cleared = update_city(
            &db,
            city.id,
            owner.id,
            CityPatch {
                notes: Some(None),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(cleared.notes, None);
        assert_eq!(cleared.departure_date, date(2025, 3, 2));

        let reversed = update_city(
            &db,
            city.id,
            owner.id,
            CityPatch {
                departure_date: Some(date(2025, 2, 1)),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(reversed.unwrap_err(), Error::InvalidArgument { .. }));

        delete_city(&db, city.id, owner.id).await?;
        let gone = get_city(&db, city.id, Some(owner.id)).await;
        assert!(matches!(gone.unwrap_err(), Error::NotFound { .. }));
        assert!(Activity::find().all(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_public_city_readable_by_anyone() -> Result<()> {
        let (db, owner, trip) = setup_with_trip().await?;
        let city = add_test_city(&db, owner.id, trip.id, "Hakone").await?;

        let hidden = get_city(&db, city.id, None).await;
        assert!(matches!(hidden.unwrap_err(), Error::AccessDenied { .. }));

        make_public(&db, owner.id, trip.id).await?;
        let details = get_city(&db, city.id, None).await?;
        assert_eq!(details.city.id, city.id);
        Ok(())
    }
}
