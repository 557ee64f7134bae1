//! Share-token gateway.
//!
//! Minting a token makes a trip public and stores a fresh 256-bit random token on
//! it; the single `UPDATE` replaces any previous token, so at no point do two
//! tokens resolve to the same trip. Resolution additionally requires the trip to
//! still be public: a token alone is not enough.

use crate::{
    core::{
        access::{Access, Resource, authorize},
        identity::UserId,
        trip::{TripDetails, load_trip_details},
    },
    entities::{Trip, trip},
    errors::{Error, ResourceKind, Result},
};
use base64::Engine;
use chrono::Utc;
use rand::RngCore;
use sea_orm::{TransactionTrait, prelude::*, sea_query::Expr};
use serde::Serialize;
use tracing::{debug, info, instrument};

/// Number of random bytes in a share token (256 bits).
pub const SHARE_TOKEN_BYTES: usize = 32;

/// A freshly minted share link
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareLink {
    /// The token itself
    pub token: String,
    /// Public URL embedding the token
    pub url: String,
}

/// Generates a cryptographically secure, URL-safe random token.
///
/// Returns 256 random bits encoded as unpadded base64url (43 characters).
#[must_use]
pub fn generate_share_token() -> String {
    let mut random_bytes = [0u8; SHARE_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut random_bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(random_bytes)
}

/// Builds the public URL for a token.
#[must_use]
pub fn share_url(base_url: &str, token: &str) -> String {
    format!("{}/shared/{token}", base_url.trim_end_matches('/'))
}

/// Mints a new share token for a trip the actor owns and makes the trip public.
///
/// Any previous token stops resolving immediately. The ownership check and the
/// update share one transaction.
///
/// # Errors
/// `Error::NotFound` / `Error::AccessDenied` from the ownership guard, or
/// `Error::NotFound` if the trip disappeared before the token was stored.
#[instrument(skip(db))]
pub async fn mint_share_token(
    db: &DatabaseConnection,
    trip_id: i64,
    actor: UserId,
    base_url: &str,
) -> Result<ShareLink> {
    let txn = db.begin().await?;
    authorize(&txn, Some(actor), Resource::Trip(trip_id), Access::Write).await?;

    let token = generate_share_token();
    let result = Trip::update_many()
        .col_expr(trip::Column::ShareToken, Expr::value(token.clone()))
        .col_expr(trip::Column::IsPublic, Expr::value(true))
        .col_expr(trip::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(trip::Column::Id.eq(trip_id))
        .exec(&txn)
        .await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found(ResourceKind::Trip, trip_id));
    }
    txn.commit().await?;

    info!(trip_id, "Minted share token");
    Ok(ShareLink {
        url: share_url(base_url, &token),
        token,
    })
}

/// Clears a trip's share token so existing links stop working.
///
/// The trip's visibility flag is left as it is.
///
/// # Errors
/// `Error::NotFound` / `Error::AccessDenied` from the ownership guard, or
/// `Error::NotFound` if the trip disappeared before the update.
#[instrument(skip(db))]
pub async fn revoke_share_token(db: &DatabaseConnection, trip_id: i64, actor: UserId) -> Result<()> {
    let txn = db.begin().await?;
    authorize(&txn, Some(actor), Resource::Trip(trip_id), Access::Write).await?;

    let result = Trip::update_many()
        .col_expr(trip::Column::ShareToken, Expr::value(Option::<String>::None))
        .col_expr(trip::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(trip::Column::Id.eq(trip_id))
        .exec(&txn)
        .await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found(ResourceKind::Trip, trip_id));
    }
    txn.commit().await?;

    info!(trip_id, "Revoked share token");
    Ok(())
}

/// Finds the public trip holding `token`.
///
/// # Errors
/// Returns `Error::NotFound` if no trip holds the token or the trip is no longer public.
pub(crate) async fn find_shared_trip<C>(db: &C, token: &str) -> Result<trip::Model>
where
    C: ConnectionTrait,
{
    let trip = Trip::find()
        .filter(trip::Column::ShareToken.eq(token))
        .one(db)
        .await?;

    match trip {
        Some(trip) if trip.is_public => Ok(trip),
        Some(trip) => {
            debug!(trip_id = trip.id, "Share token points at a private trip");
            Err(Error::not_found(ResourceKind::ShareToken, "<redacted>"))
        }
        None => Err(Error::not_found(ResourceKind::ShareToken, "<redacted>")),
    }
}

/// Resolves a share token to the trip's full read view.
///
/// # Errors
/// Returns `Error::NotFound` if the token is unknown or the trip is no longer public.
#[instrument(skip_all)]
pub async fn resolve_share_token(db: &DatabaseConnection, token: &str) -> Result<TripDetails> {
    let trip = find_shared_trip(db, token).await?;
    load_trip_details(db, trip).await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::trip::{TripPatch, update_trip};
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    const BASE: &str = "https://wanderplan.example";

    #[test]
    fn test_generate_share_token_shape() {
        let token = generate_share_token();
        assert_eq!(token.len(), 43);
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
        assert_ne!(token, generate_share_token());
    }

    #[test]
    fn test_share_url() {
        assert_eq!(share_url("http://x/", "abc"), "http://x/shared/abc");
        assert_eq!(share_url("http://x", "abc"), "http://x/shared/abc");
    }

    #[tokio::test]
    async fn test_mint_makes_trip_public_and_resolves() -> Result<()> {
        let (db, owner, trip) = setup_with_trip().await?;
        add_test_city(&db, owner.id, trip.id, "Tokyo").await?;

        let link = mint_share_token(&db, trip.id, owner.id, BASE).await?;
        assert_eq!(link.url, format!("{BASE}/shared/{}", link.token));

        let details = resolve_share_token(&db, &link.token).await?;
        assert!(details.trip.is_public);
        assert_eq!(details.trip.share_token.as_deref(), Some(link.token.as_str()));
        assert_eq!(details.cities.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_remint_invalidates_old_token() -> Result<()> {
        let (db, owner, trip) = setup_with_trip().await?;

        let old = mint_share_token(&db, trip.id, owner.id, BASE).await?;
        let new = mint_share_token(&db, trip.id, owner.id, BASE).await?;
        assert_ne!(old.token, new.token);

        let stale = resolve_share_token(&db, &old.token).await;
        assert!(matches!(
            stale.unwrap_err(),
            Error::NotFound {
                resource: ResourceKind::ShareToken,
                ..
            }
        ));
        assert_eq!(resolve_share_token(&db, &new.token).await?.trip.id, trip.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_token_stops_resolving_when_trip_made_private() -> Result<()> {
        let (db, owner, trip) = setup_with_trip().await?;
        let link = mint_share_token(&db, trip.id, owner.id, BASE).await?;

        update_trip(
            &db,
            trip.id,
            owner.id,
            TripPatch {
                is_public: Some(false),
                ..Default::default()
            },
        )
        .await?;

        let result = resolve_share_token(&db, &link.token).await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_only_owner_can_mint_or_revoke() -> Result<()> {
        let (db, owner, trip) = setup_with_trip().await?;
        let other = create_test_user(&db, "other@example.com").await?;

        let mint = mint_share_token(&db, trip.id, other.id, BASE).await;
        assert!(matches!(mint.unwrap_err(), Error::AccessDenied { .. }));

        let link = mint_share_token(&db, trip.id, owner.id, BASE).await?;
        let revoke = revoke_share_token(&db, trip.id, other.id).await;
        assert!(matches!(revoke.unwrap_err(), Error::AccessDenied { .. }));

        revoke_share_token(&db, trip.id, owner.id).await?;
        let result = resolve_share_token(&db, &link.token).await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_mint_fails_when_trip_vanishes_before_update() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([vec![sample_trip(7, false)]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let result = mint_share_token(&db, 1, 7, BASE).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound {
                resource: ResourceKind::Trip,
                ..
            }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_revoke_fails_when_trip_vanishes_before_update() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([vec![sample_trip(7, true)]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let result = revoke_share_token(&db, 1, 7).await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_token() -> Result<()> {
        let db = setup_test_db().await?;
        let result = resolve_share_token(&db, "no-such-token").await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));
        Ok(())
    }
}
