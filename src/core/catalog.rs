//! Reference catalogs - popular destinations and activity templates.
//!
//! Both tables are read-only to the rest of the system. Seeding is idempotent:
//! a destination already present (same name and country) or a template with the
//! same name is skipped, so the catalog file can be re-applied on every start.

use crate::{
    config::catalog::CatalogConfig,
    entities::{
        ActivityCategory, ActivityTemplate, PopularDestination, activity_template,
        popular_destination,
    },
    errors::Result,
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Serialize;
use tracing::{debug, info, instrument};

/// How many catalog rows a seeding pass inserted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    /// Destinations inserted
    pub destinations_added: usize,
    /// Activity templates inserted
    pub templates_added: usize,
}

/// Inserts catalog entries that are not in the database yet.
///
/// Runs in a single transaction.
///
/// # Errors
/// Returns a database error if any insert fails; nothing is written in that case.
#[instrument(skip_all)]
pub async fn seed_catalog(db: &DatabaseConnection, catalog: &CatalogConfig) -> Result<SeedSummary> {
    let txn = db.begin().await?;
    let mut summary = SeedSummary::default();

    for destination in &catalog.destinations {
        let existing = PopularDestination::find()
            .filter(popular_destination::Column::Name.eq(destination.name.as_str()))
            .filter(popular_destination::Column::Country.eq(destination.country.as_str()))
            .one(&txn)
            .await?;
        if existing.is_some() {
            debug!(name = %destination.name, "Destination already seeded");
            continue;
        }

        popular_destination::ActiveModel {
            name: Set(destination.name.clone()),
            country: Set(destination.country.clone()),
            description: Set(destination.description.clone()),
            best_season: Set(destination.best_season.clone()),
            average_daily_cost: Set(destination.average_daily_cost),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        summary.destinations_added += 1;
    }

    for template in &catalog.activity_templates {
        let existing = ActivityTemplate::find()
            .filter(activity_template::Column::Name.eq(template.name.as_str()))
            .one(&txn)
            .await?;
        if existing.is_some() {
            debug!(name = %template.name, "Activity template already seeded");
            continue;
        }

        activity_template::ActiveModel {
            name: Set(template.name.clone()),
            category: Set(template.category),
            description: Set(template.description.clone()),
            typical_cost: Set(template.typical_cost),
            typical_duration_minutes: Set(template.typical_duration_minutes),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        summary.templates_added += 1;
    }

    txn.commit().await?;
    info!(
        destinations_added = summary.destinations_added,
        templates_added = summary.templates_added,
        "Seeded reference catalog"
    );
    Ok(summary)
}

/// Lists popular destinations by name, optionally restricted to one country.
pub async fn list_popular_destinations(
    db: &DatabaseConnection,
    country: Option<&str>,
) -> Result<Vec<popular_destination::Model>> {
    let mut query = PopularDestination::find();
    if let Some(country) = country {
        query = query.filter(popular_destination::Column::Country.eq(country));
    }

    query
        .order_by_asc(popular_destination::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists activity templates by name, optionally restricted to one category.
pub async fn list_activity_templates(
    db: &DatabaseConnection,
    category: Option<ActivityCategory>,
) -> Result<Vec<activity_template::Model>> {
    let mut query = ActivityTemplate::find();
    if let Some(category) = category {
        query = query.filter(activity_template::Column::Category.eq(category));
    }

    query
        .order_by_asc(activity_template::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}
