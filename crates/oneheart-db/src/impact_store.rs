//! Impact log persistence. Append-only: rows are inserted, never updated.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use oneheart_types::{ImpactBreakdown, ImpactLog, ImpactLogId, ImpactReference, PlayerId};

use crate::codec::{reference_from_db, reference_to_db, to_i64, to_u64};
use crate::error::DbError;

/// Operations on the `impact_logs` table.
pub struct ImpactStore<'a> {
    pool: &'a PgPool,
}

impl<'a> ImpactStore<'a> {
    /// Create a new impact store bound to a connection pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch a player's impact logs created at or after `since` (all of
    /// them when `since` is `None`), newest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails or a row cannot be decoded.
    pub async fn for_player(
        &self,
        player_id: PlayerId,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<ImpactLog>, DbError> {
        let rows = sqlx::query_as::<_, ImpactRow>(
            r"SELECT id, player_id, reference_kind, reference_id, xp_awarded, tokens_awarded, impact_value, breakdown, created_at
              FROM impact_logs
              WHERE player_id = $1 AND ($2::TIMESTAMPTZ IS NULL OR created_at >= $2)
              ORDER BY created_at DESC, id DESC",
        )
        .bind(player_id.into_inner())
        .bind(since)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(ImpactRow::into_log).collect()
    }
}

/// Insert one impact log inside an open transaction.
pub(crate) async fn insert_impact_log(
    conn: &mut PgConnection,
    log: &ImpactLog,
) -> Result<(), DbError> {
    let (kind, reference_id) = reference_to_db(log.reference);
    let breakdown = serde_json::to_value(&log.breakdown)?;

    sqlx::query(
        r"INSERT INTO impact_logs (id, player_id, reference_kind, reference_id, xp_awarded, tokens_awarded, impact_value, breakdown, created_at)
          VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(log.id.into_inner())
    .bind(log.player_id.into_inner())
    .bind(kind)
    .bind(reference_id)
    .bind(to_i64(log.xp_awarded))
    .bind(to_i64(log.tokens_awarded))
    .bind(log.impact_value)
    .bind(&breakdown)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Whether `player_id` already has an impact log for `reference`.
pub(crate) async fn reference_exists(
    conn: &mut PgConnection,
    player_id: PlayerId,
    reference: ImpactReference,
) -> Result<bool, DbError> {
    let (kind, reference_id) = reference_to_db(reference);
    let exists: bool = sqlx::query_scalar(
        r"SELECT EXISTS (
              SELECT 1 FROM impact_logs
              WHERE player_id = $1 AND reference_kind = $2 AND reference_id = $3
          )",
    )
    .bind(player_id.into_inner())
    .bind(kind)
    .bind(reference_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(exists)
}

/// A row from the `impact_logs` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ImpactRow {
    /// Impact log UUID.
    pub id: Uuid,
    /// Player UUID.
    pub player_id: Uuid,
    /// Reference kind string.
    pub reference_kind: String,
    /// Referenced quest, mission, or expedition UUID.
    pub reference_id: Uuid,
    /// XP awarded.
    pub xp_awarded: i64,
    /// Tokens awarded.
    pub tokens_awarded: i64,
    /// Impact credits.
    pub impact_value: Decimal,
    /// Fund split and activity counts.
    pub breakdown: serde_json::Value,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl ImpactRow {
    /// Convert the row into a domain [`ImpactLog`].
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a column cannot be decoded.
    pub fn into_log(self) -> Result<ImpactLog, DbError> {
        let breakdown: ImpactBreakdown = serde_json::from_value(self.breakdown)?;
        Ok(ImpactLog {
            id: ImpactLogId::from(self.id),
            player_id: PlayerId::from(self.player_id),
            reference: reference_from_db(&self.reference_kind, self.reference_id)?,
            xp_awarded: to_u64("xp_awarded", self.xp_awarded)?,
            tokens_awarded: to_u64("tokens_awarded", self.tokens_awarded)?,
            impact_value: self.impact_value,
            breakdown,
            created_at: self.created_at,
        })
    }
}
