//! Token ledger persistence.
//!
//! The `token_ledger` table is append-only. Debits are appended under a
//! per-player transaction-scoped advisory lock, and the balance is re-read
//! under that lock before anything is inserted, so two concurrent debits
//! can never both pass the balance check.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use oneheart_types::{PlayerId, TokenLedgerEntry, TransactionId};

use crate::codec::{advisory_key, tx_type_from_db, tx_type_to_db};
use crate::error::DbError;
use crate::store::{AppendOutcome, BalanceGuard};

/// Operations on the `token_ledger` table.
pub struct TokenStore<'a> {
    pool: &'a PgPool,
}

impl<'a> TokenStore<'a> {
    /// Create a new token store bound to a connection pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Append `entries` in one transaction, checking `guard` first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if any statement fails. A failed guard
    /// is not an error; it is reported as [`AppendOutcome::Insufficient`].
    pub async fn append(
        &self,
        entries: &[TokenLedgerEntry],
        guard: Option<BalanceGuard>,
    ) -> Result<AppendOutcome, DbError> {
        let mut tx = self.pool.begin().await?;

        if let Some(guard) = guard {
            sqlx::query("SELECT pg_advisory_xact_lock($1)")
                .bind(advisory_key(guard.player_id.into_inner()))
                .execute(&mut *tx)
                .await?;

            let balance = balance_in(&mut tx, guard.player_id).await?;
            if guard.required > balance {
                tx.rollback().await?;
                return Ok(AppendOutcome::Insufficient { balance });
            }
        }

        for entry in entries {
            insert_token_entry(&mut tx, entry).await?;
        }

        tx.commit().await?;
        tracing::debug!(count = entries.len(), "Appended token entries");
        Ok(AppendOutcome::Appended)
    }

    /// Signed sum of a player's entries.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn balance_of(&self, player_id: PlayerId) -> Result<i64, DbError> {
        let mut conn = self.pool.acquire().await?;
        balance_in(&mut conn, player_id).await
    }

    /// A player's entries in the order they were appended.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails or a row cannot be decoded.
    pub async fn entries_for(&self, player_id: PlayerId) -> Result<Vec<TokenLedgerEntry>, DbError> {
        let rows = sqlx::query_as::<_, TokenRow>(
            r"SELECT id, player_id, amount, tx_type, source, created_at
              FROM token_ledger
              WHERE player_id = $1
              ORDER BY created_at, id",
        )
        .bind(player_id.into_inner())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TokenRow::into_entry).collect()
    }
}

/// Sum a player's entries on an open connection.
async fn balance_in(conn: &mut PgConnection, player_id: PlayerId) -> Result<i64, DbError> {
    let balance: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(amount), 0)::BIGINT FROM token_ledger WHERE player_id = $1",
    )
    .bind(player_id.into_inner())
    .fetch_one(&mut *conn)
    .await?;

    Ok(balance)
}

/// Insert one ledger entry inside an open transaction.
pub(crate) async fn insert_token_entry(
    conn: &mut PgConnection,
    entry: &TokenLedgerEntry,
) -> Result<(), DbError> {
    sqlx::query(
        r"INSERT INTO token_ledger (id, player_id, amount, tx_type, source, created_at)
          VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(entry.id.into_inner())
    .bind(entry.player_id.into_inner())
    .bind(entry.amount)
    .bind(tx_type_to_db(entry.tx_type))
    .bind(&entry.source)
    .bind(entry.created_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// A row from the `token_ledger` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TokenRow {
    /// Transaction UUID.
    pub id: Uuid,
    /// Player UUID.
    pub player_id: Uuid,
    /// Signed amount.
    pub amount: i64,
    /// Transaction type string.
    pub tx_type: String,
    /// Source tag.
    pub source: String,
    /// Append time.
    pub created_at: DateTime<Utc>,
}

impl TokenRow {
    /// Convert the row into a domain [`TokenLedgerEntry`].
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Decode`] for an unknown transaction type.
    pub fn into_entry(self) -> Result<TokenLedgerEntry, DbError> {
        Ok(TokenLedgerEntry {
            id: TransactionId::from(self.id),
            player_id: PlayerId::from(self.player_id),
            amount: self.amount,
            tx_type: tx_type_from_db(&self.tx_type)?,
            source: self.source,
            created_at: self.created_at,
        })
    }
}
