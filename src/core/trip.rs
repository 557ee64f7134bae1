//! Trip business logic - the aggregate root.
//!
//! A trip owns its cities (and through them, activities) and at most one budget.
//! Reads go through the ownership guard with [`Access::Read`], so public trips are
//! visible to anyone; every mutation requires [`Access::Write`]. Deleting a trip
//! removes the whole graph in one transaction, children first.

use crate::{
    core::{
        access::{Access, Resource, authorize},
        budget::{BudgetDetails, load_budget_details},
        identity::UserId,
        validation::{
            DEFAULT_CURRENCY, normalize_currency, require_name, validate_amount,
            validate_date_range,
        },
    },
    entities::{
        Activity, Budget, City, Expense, Trip, TripStatus, User, activity, budget, city, expense,
        trip,
    },
    errors::{Error, ResourceKind, Result},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{
    PaginatorTrait, QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*,
};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Attributes of a new trip
#[derive(Debug, Clone)]
pub struct NewTrip {
    /// Trip name
    pub name: String,
    /// First day
    pub start_date: NaiveDate,
    /// Last day
    pub end_date: NaiveDate,
    /// Free-form description
    pub description: Option<String>,
    /// Cover image reference
    pub cover_image: Option<String>,
    /// Rough budget hint
    pub total_budget: Option<f64>,
    /// Currency code, defaults to USD
    pub currency: Option<String>,
    /// Free-form tags
    pub tags: Vec<String>,
}

impl NewTrip {
    /// A trip with only the required fields set.
    #[must_use]
    pub fn new(name: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            start_date,
            end_date,
            description: None,
            cover_image: None,
            total_budget: None,
            currency: None,
            tags: Vec::new(),
        }
    }
}

/// The fields of a trip an owner may change. `None` leaves a field untouched;
/// `Some(None)` clears a nullable one.
#[derive(Debug, Clone, Default)]
pub struct TripPatch {
    /// New name
    pub name: Option<String>,
    /// New description, or `Some(None)` to remove it
    pub description: Option<Option<String>>,
    /// New cover image, or `Some(None)` to remove it
    pub cover_image: Option<Option<String>>,
    /// New first day
    pub start_date: Option<NaiveDate>,
    /// New last day
    pub end_date: Option<NaiveDate>,
    /// New lifecycle status
    pub status: Option<TripStatus>,
    /// Make the trip public or private
    pub is_public: Option<bool>,
    /// New budget hint, or `Some(None)` to remove it
    pub total_budget: Option<Option<f64>>,
    /// New currency code
    pub currency: Option<String>,
    /// Replacement tag list
    pub tags: Option<Vec<String>>,
}

/// A city together with its ordered activities
#[derive(Debug, Clone, Serialize)]
pub struct CityDetails {
    /// The city
    pub city: city::Model,
    /// Activities in ascending order
    pub activities: Vec<activity::Model>,
}

/// A trip with its full graph, as returned by reads
#[derive(Debug, Clone, Serialize)]
pub struct TripDetails {
    /// The trip itself
    pub trip: trip::Model,
    /// Cities in ascending order, each with its activities
    pub cities: Vec<CityDetails>,
    /// The budget and its expenses, if one exists
    pub budget: Option<BudgetDetails>,
}

/// One page of a listing
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// 1-based page number
    pub page: u64,
    /// Requested page size
    pub page_size: u64,
    /// Total number of matching items
    pub total_items: u64,
    /// Total number of pages
    pub total_pages: u64,
}

fn tags_to_json(tags: Vec<String>) -> Json {
    let mut cleaned: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_string();
        if !tag.is_empty() && !cleaned.contains(&tag) {
            cleaned.push(tag);
        }
    }
    Json::from(cleaned)
}

fn optional_amount(amount: Option<f64>) -> Result<Option<f64>> {
    amount.map(validate_amount).transpose()
}

/// Creates a private trip with no cities and no budget.
///
/// # Errors
/// - `Error::NotFound` if the owner does not exist
/// - `Error::InvalidArgument` for a blank name, reversed dates or a bad currency
/// - `Error::InvalidAmount` for a negative budget hint
#[instrument(skip(db, attrs), fields(name = %attrs.name))]
pub async fn create_trip(
    db: &DatabaseConnection,
    owner_id: UserId,
    attrs: NewTrip,
) -> Result<trip::Model> {
    let name = require_name("Trip name", &attrs.name)?;
    validate_date_range(attrs.start_date, attrs.end_date)?;
    let total_budget = optional_amount(attrs.total_budget)?;
    let currency = normalize_currency(attrs.currency.as_deref().unwrap_or(DEFAULT_CURRENCY))?;

    User::find_by_id(owner_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found(ResourceKind::User, owner_id))?;

    let now = Utc::now();
    let trip = trip::ActiveModel {
        user_id: Set(owner_id),
        name: Set(name),
        description: Set(attrs.description),
        cover_image: Set(attrs.cover_image),
        start_date: Set(attrs.start_date),
        end_date: Set(attrs.end_date),
        status: Set(TripStatus::Planning),
        is_public: Set(false),
        share_token: Set(None),
        total_budget: Set(total_budget),
        currency: Set(currency),
        tags: Set(tags_to_json(attrs.tags)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let result = trip.insert(db).await?;
    info!(trip_id = result.id, owner_id, "Created trip");
    Ok(result)
}

/// Loads the cities, activities and budget of an already-authorized trip.
pub(crate) async fn load_trip_details<C>(db: &C, trip: trip::Model) -> Result<TripDetails>
where
    C: ConnectionTrait,
{
    let cities = City::find()
        .filter(city::Column::TripId.eq(trip.id))
        .order_by_asc(city::Column::Order)
        .order_by_asc(city::Column::Id)
        .all(db)
        .await?;

    let city_ids: Vec<i64> = cities.iter().map(|c| c.id).collect();
    let activities = if city_ids.is_empty() {
        Vec::new()
    } else {
        Activity::find()
            .filter(activity::Column::CityId.is_in(city_ids))
            .order_by_asc(activity::Column::Order)
            .order_by_asc(activity::Column::Id)
            .all(db)
            .await?
    };

    let mut by_city: HashMap<i64, Vec<activity::Model>> = HashMap::new();
    for activity in activities {
        by_city.entry(activity.city_id).or_default().push(activity);
    }

    let cities = cities
        .into_iter()
        .map(|city| {
            let activities = by_city.remove(&city.id).unwrap_or_default();
            CityDetails { city, activities }
        })
        .collect();

    let budget = match Budget::find()
        .filter(budget::Column::TripId.eq(trip.id))
        .one(db)
        .await?
    {
        Some(budget) => Some(load_budget_details(db, budget).await?),
        None => None,
    };

    Ok(TripDetails {
        trip,
        cities,
        budget,
    })
}

/// Returns a trip with its ordered cities, activities and budget.
///
/// `requester` may be `None` for anonymous access to a public trip.
///
/// # Errors
/// - `Error::NotFound` if the trip does not exist
/// - `Error::AccessDenied` if the trip is private and not owned by `requester`
#[instrument(skip(db))]
pub async fn get_trip(
    db: &DatabaseConnection,
    trip_id: i64,
    requester: Option<UserId>,
) -> Result<TripDetails> {
    let trip = authorize(db, requester, Resource::Trip(trip_id), Access::Read).await?;
    load_trip_details(db, trip).await
}

/// Applies a patch to a trip the actor owns.
///
/// The resulting date range must still be ordered.
///
/// # Errors
/// - `Error::NotFound` / `Error::AccessDenied` from the ownership guard
/// - `Error::InvalidArgument` / `Error::InvalidAmount` for invalid new values
#[instrument(skip(db, patch))]
pub async fn update_trip(
    db: &DatabaseConnection,
    trip_id: i64,
    actor: UserId,
    patch: TripPatch,
) -> Result<trip::Model> {
    let trip = authorize(db, Some(actor), Resource::Trip(trip_id), Access::Write).await?;

    let start_date = patch.start_date.unwrap_or(trip.start_date);
    let end_date = patch.end_date.unwrap_or(trip.end_date);
    validate_date_range(start_date, end_date)?;

    let mut active: trip::ActiveModel = trip.into();
    if let Some(name) = patch.name {
        active.name = Set(require_name("Trip name", &name)?);
    }
    if let Some(description) = patch.description {
        active.description = Set(description);
    }
    if let Some(cover_image) = patch.cover_image {
        active.cover_image = Set(cover_image);
    }
    if patch.start_date.is_some() {
        active.start_date = Set(start_date);
    }
    if patch.end_date.is_some() {
        active.end_date = Set(end_date);
    }
    if let Some(status) = patch.status {
        active.status = Set(status);
    }
    if let Some(is_public) = patch.is_public {
        active.is_public = Set(is_public);
    }
    if let Some(total_budget) = patch.total_budget {
        active.total_budget = Set(optional_amount(total_budget)?);
    }
    if let Some(currency) = patch.currency {
        active.currency = Set(normalize_currency(&currency)?);
    }
    if let Some(tags) = patch.tags {
        active.tags = Set(tags_to_json(tags));
    }
    active.updated_at = Set(Utc::now());

    let updated = active.update(db).await?;
    info!(trip_id, "Updated trip");
    Ok(updated)
}

/// Deletes a trip's whole graph: expenses, budget, activities, cities, trip.
///
/// Runs on the caller's connection so it can join a larger transaction.
pub(crate) async fn delete_trip_graph<C>(db: &C, trip_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    let budget_ids: Vec<i64> = Budget::find()
        .select_only()
        .column(budget::Column::Id)
        .filter(budget::Column::TripId.eq(trip_id))
        .into_tuple()
        .all(db)
        .await?;
    if !budget_ids.is_empty() {
        Expense::delete_many()
            .filter(expense::Column::BudgetId.is_in(budget_ids))
            .exec(db)
            .await?;
    }
    Budget::delete_many()
        .filter(budget::Column::TripId.eq(trip_id))
        .exec(db)
        .await?;

    let city_ids: Vec<i64> = City::find()
        .select_only()
        .column(city::Column::Id)
        .filter(city::Column::TripId.eq(trip_id))
        .into_tuple()
        .all(db)
        .await?;
    if !city_ids.is_empty() {
        Activity::delete_many()
            .filter(activity::Column::CityId.is_in(city_ids))
            .exec(db)
            .await?;
    }
    City::delete_many()
        .filter(city::Column::TripId.eq(trip_id))
        .exec(db)
        .await?;

    Trip::delete_by_id(trip_id).exec(db).await?;
    debug!(trip_id, "Deleted trip graph");
    Ok(())
}

/// Deletes a trip the actor owns, together with everything beneath it.
///
/// # Errors
/// `Error::NotFound` / `Error::AccessDenied` from the ownership guard.
#[instrument(skip(db))]
pub async fn delete_trip(db: &DatabaseConnection, trip_id: i64, actor: UserId) -> Result<()> {
    authorize(db, Some(actor), Resource::Trip(trip_id), Access::Write).await?;

    let txn = db.begin().await?;
    delete_trip_graph(&txn, trip_id).await?;
    txn.commit().await?;

    info!(trip_id, "Deleted trip");
    Ok(())
}

/// Lists the owner's trips, newest start date first.
///
/// `page` is 1-based.
///
/// # Errors
/// Returns `Error::InvalidArgument` if `page` or `page_size` is zero.
#[instrument(skip(db))]
pub async fn list_trips_for_user(
    db: &DatabaseConnection,
    owner_id: UserId,
    page: u64,
    page_size: u64,
    status: Option<TripStatus>,
) -> Result<Page<trip::Model>> {
    if page == 0 || page_size == 0 {
        return Err(Error::invalid("Page and page size must be at least 1"));
    }

    let mut query = Trip::find().filter(trip::Column::UserId.eq(owner_id));
    if let Some(status) = status {
        query = query.filter(trip::Column::Status.eq(status));
    }

    let paginator = query
        .order_by_desc(trip::Column::StartDate)
        .order_by_desc(trip::Column::Id)
        .paginate(db, page_size);

    let total_items = paginator.num_items().await?;
    let items = paginator.fetch_page(page - 1).await?;

    Ok(Page {
        items,
        page,
        page_size,
        total_items,
        total_pages: total_items.div_ceil(page_size),
    })
}

/// Upcoming trips of the owner relative to today's date.
pub async fn list_upcoming_trips(
    db: &DatabaseConnection,
    owner_id: UserId,
    limit: u64,
) -> Result<Vec<trip::Model>> {
    list_upcoming_trips_from(db, owner_id, Utc::now().date_naive(), limit).await
}

/// Trips starting on or after `today` that are still `PLANNING` or `UPCOMING`,
/// soonest first.
pub async fn list_upcoming_trips_from(
    db: &DatabaseConnection,
    owner_id: UserId,
    today: NaiveDate,
    limit: u64,
) -> Result<Vec<trip::Model>> {
    Trip::find()
        .filter(trip::Column::UserId.eq(owner_id))
        .filter(trip::Column::StartDate.gte(today))
        .filter(trip::Column::Status.is_in([TripStatus::Planning, TripStatus::Upcoming]))
        .order_by_asc(trip::Column::StartDate)
        .order_by_asc(trip::Column::Id)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_trip_defaults() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "u1@example.com").await?;

        let mut attrs = NewTrip::new("  Japan 2025 ", date(2025, 3, 1), date(2025, 3, 10));
        attrs.tags = vec!["food".to_string(), " food ".to_string(), "temples".to_string()];
        let trip = create_trip(&db, user.id, attrs).await?;

        assert_eq!(trip.name, "Japan 2025");
        assert_eq!(trip.status, TripStatus::Planning);
        assert!(!trip.is_public);
        assert!(trip.share_token.is_none());
        assert_eq!(trip.currency, "USD");
        assert_eq!(trip.tag_list(), vec!["food", "temples"]);

        let details = get_trip(&db, trip.id, Some(user.id)).await?;
        assert!(details.cities.is_empty());
        assert!(details.budget.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_trip_validation() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "u1@example.com").await?;

        let reversed = NewTrip::new("Backwards", date(2025, 3, 10), date(2025, 3, 1));
        let result = create_trip(&db, user.id, reversed).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidArgument { .. }));

        let mut negative = NewTrip::new("Broke", date(2025, 3, 1), date(2025, 3, 2));
        negative.total_budget = Some(-5.0);
        let result = create_trip(&db, user.id, negative).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidAmount { amount: -5.0 }
        ));

        let orphan = NewTrip::new("Nobody's", date(2025, 3, 1), date(2025, 3, 2));
        let result = create_trip(&db, 999, orphan).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound {
                resource: ResourceKind::User,
                ..
            }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_private_trip_hidden_from_others() -> Result<()> {
        let (db, _owner, trip) = setup_with_trip().await?;
        let other = create_test_user(&db, "other@example.com").await?;

        let as_other = get_trip(&db, trip.id, Some(other.id)).await;
        assert!(matches!(as_other.unwrap_err(), Error::AccessDenied { .. }));

        let anonymous = get_trip(&db, trip.id, None).await;
        assert!(matches!(anonymous.unwrap_err(), Error::AccessDenied { .. }));

        let missing = get_trip(&db, 4242, None).await;
        assert!(matches!(missing.unwrap_err(), Error::NotFound { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_public_trip_readable_but_not_writable() -> Result<()> {
        let (db, owner, trip) = setup_with_trip().await?;
        let other = create_test_user(&db, "other@example.com").await?;

        update_trip(
            &db,
            trip.id,
            owner.id,
            TripPatch {
                is_public: Some(true),
                ..Default::default()
            },
        )
        .await?;

        let details = get_trip(&db, trip.id, None).await?;
        assert_eq!(details.trip.id, trip.id);

        let write = update_trip(
            &db,
            trip.id,
            other.id,
            TripPatch {
                name: Some("Hijacked".to_string()),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(write.unwrap_err(), Error::AccessDenied { .. }));

        let delete = delete_trip(&db, trip.id, other.id).await;
        assert!(matches!(delete.unwrap_err(), Error::AccessDenied { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_trip_applies_whitelisted_fields() -> Result<()> {
        let (db, owner, trip) = setup_with_trip().await?;

        let updated = update_trip(
            &db,
            trip.id,
            owner.id,
            TripPatch {
                name: Some("Renamed".to_string()),
                status: Some(TripStatus::Upcoming),
                currency: Some("eur".to_string()),
                total_budget: Some(Some(2500.0)),
                end_date: Some(date(2025, 3, 12)),
                tags: Some(vec!["spring".to_string()]),
                ..Default::default()
            },
        )
        .await?;

        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.status, TripStatus::Upcoming);
        assert_eq!(updated.currency, "EUR");
        assert_eq!(updated.total_budget, Some(2500.0));
        assert_eq!(updated.end_date, date(2025, 3, 12));
        assert_eq!(updated.start_date, trip.start_date);
        assert_eq!(updated.tag_list(), vec!["spring"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_trip_clears_nullable_fields() -> Result<()> {
        let (db, owner, trip) = setup_with_trip().await?;
        update_trip(
            &db,
            trip.id,
            owner.id,
            TripPatch {
                description: Some(Some("Cherry blossoms".to_string())),
                total_budget: Some(Some(1800.0)),
                ..Default::default()
            },
        )
        .await?;

        let cleared = update_trip(
            &db,
            trip.id,
            owner.id,
            TripPatch {
                description: Some(None),
                total_budget: Some(None),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(cleared.description, None);
        assert_eq!(cleared.total_budget, None);
        assert_eq!(cleared.name, trip.name);

        let negative = update_trip(
            &db,
            trip.id,
            owner.id,
            TripPatch {
                total_budget: Some(Some(-1.0)),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(negative.unwrap_err(), Error::InvalidAmount { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_trip_rejects_reversed_dates() -> Result<()> {
        let (db, owner, trip) = setup_with_trip().await?;

        let result = update_trip(
            &db,
            trip.id,
            owner.id,
            TripPatch {
                end_date: Some(date(2025, 2, 1)),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::InvalidArgument { .. }));

        let unchanged = get_trip(&db, trip.id, Some(owner.id)).await?;
        assert_eq!(unchanged.trip.end_date, trip.end_date);
        Ok(())
    }

    #[tokio::test]
    async fn test_get_trip_returns_ordered_graph() -> Result<()> {
        let (db, owner, trip) = setup_with_trip().await?;
        let tokyo = add_test_city(&db, owner.id, trip.id, "Tokyo").await?;
        let kyoto = add_test_city(&db, owner.id, trip.id, "Kyoto").await?;
        add_test_activity(&db, owner.id, kyoto.id, "Fushimi Inari", 0.0).await?;
        add_test_activity(&db, owner.id, kyoto.id, "Gion walk", 0.0).await?;
        let budget = create_test_budget(&db, owner.id, trip.id, 1000.0).await?;
        add_test_expense(&db, owner.id, budget.id, 300.0).await?;

        let details = get_trip(&db, trip.id, Some(owner.id)).await?;
        let names: Vec<&str> = details.cities.iter().map(|c| c.city.name.as_str()).collect();
        assert_eq!(names, vec!["Tokyo", "Kyoto"]);
        assert_eq!(details.cities[0].city.id, tokyo.id);
        assert!(details.cities[0].activities.is_empty());

        let activities: Vec<&str> = details.cities[1]
            .activities
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(activities, vec!["Fushimi Inari", "Gion walk"]);

        let budget = details.budget.unwrap();
        assert_eq!(budget.expenses.len(), 1);
        assert_eq!(budget.summary.actual_spent, 300.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_trip_cascades() -> Result<()> {
        let (db, owner, trip) = setup_with_trip().await?;
        let city = add_test_city(&db, owner.id, trip.id, "Tokyo").await?;
        add_test_activity(&db, owner.id, city.id, "Shibuya crossing", 0.0).await?;
        let budget = create_test_budget(&db, owner.id, trip.id, 1000.0).await?;
        add_test_expense(&db, owner.id, budget.id, 10.0).await?;

        delete_trip(&db, trip.id, owner.id).await?;

        assert!(Trip::find_by_id(trip.id).one(&db).await?.is_none());
        assert!(City::find().all(&db).await?.is_empty());
        assert!(Activity::find().all(&db).await?.is_empty());
        assert!(Budget::find().all(&db).await?.is_empty());
        assert!(Expense::find().all(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_list_trips_for_user_paginates_newest_first() -> Result<()> {
        let db = setup_test_db().await?;
        let owner = create_test_user(&db, "owner@example.com").await?;
        let other = create_test_user(&db, "other@example.com").await?;

        for (name, month) in [("Jan", 1), ("Feb", 2), ("Mar", 3)] {
            create_trip(
                &db,
                owner.id,
                NewTrip::new(name, date(2025, month, 1), date(2025, month, 5)),
            )
            .await?;
        }
        create_test_trip(&db, other.id, "Not mine").await?;

        let first = list_trips_for_user(&db, owner.id, 1, 2, None).await?;
        assert_eq!(first.total_items, 3);
        assert_eq!(first.total_pages, 2);
        let names: Vec<&str> = first.items.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Mar", "Feb"]);

        let second = list_trips_for_user(&db, owner.id, 2, 2, None).await?;
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.items[0].name, "Jan");

        let completed =
            list_trips_for_user(&db, owner.id, 1, 10, Some(TripStatus::Completed)).await?;
        assert_eq!(completed.total_items, 0);

        let invalid = list_trips_for_user(&db, owner.id, 0, 10, None).await;
        assert!(matches!(invalid.unwrap_err(), Error::InvalidArgument { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_list_upcoming_trips() -> Result<()> {
        let db = setup_test_db().await?;
        let owner = create_test_user(&db, "owner@example.com").await?;
        let today = date(2025, 6, 1);

        create_trip(
            &db,
            owner.id,
            NewTrip::new("Past", date(2025, 1, 1), date(2025, 1, 5)),
        )
        .await?;
        let later = create_trip(
            &db,
            owner.id,
            NewTrip::new("Later", date(2025, 9, 1), date(2025, 9, 5)),
        )
        .await?;
        let soon = create_trip(
            &db,
            owner.id,
            NewTrip::new("Soon", date(2025, 6, 1), date(2025, 6, 3)),
        )
        .await?;
        let cancelled = create_trip(
            &db,
            owner.id,
            NewTrip::new("Cancelled", date(2025, 7, 1), date(2025, 7, 3)),
        )
        .await?;
        update_trip(
            &db,
            cancelled.id,
            owner.id,
            TripPatch {
                status: Some(TripStatus::Cancelled),
                ..Default::default()
            },
        )
        .await?;

        let upcoming = list_upcoming_trips_from(&db, owner.id, today, 10).await?;
        let ids: Vec<i64> = upcoming.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![soon.id, later.id]);

        let limited = list_upcoming_trips_from(&db, owner.id, today, 1).await?;
        assert_eq!(limited.len(), 1);
        Ok(())
    }
}
