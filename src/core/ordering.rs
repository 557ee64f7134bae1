//! Ordered child collections.
//!
//! Cities within a trip and activities within a city expose a strict total order
//! through an integer `order` column. New children are appended after the current
//! maximum; a reorder renumbers every sibling `0..n` inside a single transaction.
//! Deletion leaves gaps, which is fine because only the relative order matters.

use crate::{
    entities::{activity, city},
    errors::{Error, ResourceKind, Result},
};
use sea_orm::{QueryOrder, QuerySelect, TransactionTrait, prelude::*, sea_query::Expr};
use std::collections::HashSet;
use tracing::{info, instrument, warn};

/// An entity that lives in a parent-scoped ordered list.
pub trait OrderedChild: EntityTrait {
    /// Kind reported in errors
    const KIND: ResourceKind;

    /// Primary key column
    fn id_column() -> Self::Column;
    /// Foreign key to the parent
    fn parent_column() -> Self::Column;
    /// The `order` column
    fn order_column() -> Self::Column;
}

impl OrderedChild for city::Entity {
    const KIND: ResourceKind = ResourceKind::City;

    fn id_column() -> Self::Column {
        city::Column::Id
    }

    fn parent_column() -> Self::Column {
        city::Column::TripId
    }

    fn order_column() -> Self::Column {
        city::Column::Order
    }
}

impl OrderedChild for activity::Entity {
    const KIND: ResourceKind = ResourceKind::Activity;

    fn id_column() -> Self::Column {
        activity::Column::Id
    }

    fn parent_column() -> Self::Column {
        activity::Column::CityId
    }

    fn order_column() -> Self::Column {
        activity::Column::Order
    }
}

/// Returns the order value a newly appended child of `parent_id` should get.
///
/// The current maximum plus one, or zero when the parent has no children.
/// Existing siblings are never renumbered.
pub async fn next_order<E, C>(db: &C, parent_id: i64) -> Result<i32>
where
    E: OrderedChild,
    C: ConnectionTrait,
{
    let max_order: Option<Option<i32>> = E::find()
        .select_only()
        .column_as(Expr::col(E::order_column()).max(), "max_order")
        .filter(E::parent_column().eq(parent_id))
        .into_tuple()
        .one(db)
        .await?;

    match max_order.flatten() {
        Some(max) => max
            .checked_add(1)
            .ok_or_else(|| Error::invalid("order value overflow")),
        None => Ok(0),
    }
}

/// IDs of the children of `parent_id`, in their current order.
pub async fn sibling_ids<E, C>(db: &C, parent_id: i64) -> Result<Vec<i64>>
where
    E: OrderedChild,
    C: ConnectionTrait,
{
    E::find()
        .select_only()
        .column(E::id_column())
        .filter(E::parent_column().eq(parent_id))
        .order_by_asc(E::order_column())
        .order_by_asc(E::id_column())
        .into_tuple()
        .all(db)
        .await
        .map_err(Into::into)
}

/// Checks that `requested` is a permutation of `current`.
///
/// Partial lists are rejected: every sibling must appear exactly once, and
/// nothing else may appear.
pub fn validate_permutation(kind: ResourceKind, current: &[i64], requested: &[i64]) -> Result<()> {
    let current_set: HashSet<i64> = current.iter().copied().collect();
    let mut seen = HashSet::with_capacity(requested.len());

    for id in requested {
        if !current_set.contains(id) {
            return Err(Error::InvalidReorder {
                message: format!("{kind} {id} does not belong to this parent"),
            });
        }
        if !seen.insert(*id) {
            return Err(Error::InvalidReorder {
                message: format!("{kind} {id} appears more than once"),
            });
        }
    }

    if seen.len() != current_set.len() {
        return Err(Error::InvalidReorder {
            message: format!(
                "expected all {} children, got {}",
                current_set.len(),
                seen.len()
            ),
        });
    }

    Ok(())
}

/// Validates `ordered_ids` and renumbers the siblings on `db` without committing.
///
/// Callers run this on an open transaction; [`reorder`] is the usual entry point.
///
/// # Errors
/// Returns `Error::InvalidReorder` unless `ordered_ids` is a complete permutation
/// of the parent's current children. Nothing is written in that case.
pub async fn apply_reorder<E, C>(db: &C, parent_id: i64, ordered_ids: &[i64]) -> Result<()>
where
    E: OrderedChild,
    C: ConnectionTrait,
{
    let current = sibling_ids::<E, _>(db, parent_id).await?;
    if let Err(e) = validate_permutation(E::KIND, &current, ordered_ids) {
        warn!(parent_id, error = %e, "Rejected reorder");
        return Err(e);
    }

    for (position, id) in ordered_ids.iter().enumerate() {
        let position = i32::try_from(position)?;
        E::update_many()
            .col_expr(E::order_column(), Expr::value(position))
            .filter(E::id_column().eq(*id))
            .exec(db)
            .await?;
    }
    Ok(())
}

/// Assigns order `i` to the `i`-th ID of `ordered_ids`, atomically.
///
/// The whole renumbering runs in one transaction, so other connections see
/// either the old order or the new one.
///
/// # Errors
/// Returns `Error::InvalidReorder` unless `ordered_ids` is a complete permutation
/// of the parent's current children.
#[instrument(skip(db))]
pub async fn reorder<E, C>(db: &C, parent_id: i64, ordered_ids: &[i64]) -> Result<()>
where
    E: OrderedChild,
    C: TransactionTrait,
{
    let txn = db.begin().await?;
    apply_reorder::<E, _>(&txn, parent_id, ordered_ids).await?;
    txn.commit().await?;

    info!(parent_id, count = ordered_ids.len(), "Reordered {}", E::KIND);
    Ok(())
}

/// Removes a single child without renumbering its siblings.
///
/// # Errors
/// Returns `Error::NotFound` if no row was deleted.
pub async fn remove<E, C>(db: &C, child_id: i64) -> Result<()>
where
    E: OrderedChild,
    C: ConnectionTrait,
{
    let result = E::delete_many()
        .filter(E::id_column().eq(child_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::not_found(E::KIND, child_id));
    }
    Ok(())
}
