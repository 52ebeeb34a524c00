//! Player persistence.
//!
//! Players are inserted once and afterwards touched only by reward
//! application, which locks the row (see [`crate::reward_store`]).

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use oneheart_types::{Player, PlayerAttributes, PlayerId};

use crate::codec::{alignment_from_db, alignment_to_db, to_i32, to_i64, to_u32, to_u64};
use crate::error::DbError;

/// Column list shared by every player query.
const PLAYER_COLUMNS: &str = "id, name, level, xp_total, alignment, strength, wisdom, charisma, constitution, created_at";

/// Operations on the `players` table.
pub struct PlayerStore<'a> {
    pool: &'a PgPool,
}

impl<'a> PlayerStore<'a> {
    /// Create a new player store bound to a connection pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new player.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the insert fails.
    pub async fn insert(&self, player: &Player) -> Result<(), DbError> {
        sqlx::query(
            r"INSERT INTO players (id, name, level, xp_total, alignment, strength, wisdom, charisma, constitution, created_at)
              VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(player.id.into_inner())
        .bind(&player.name)
        .bind(to_i32(player.level))
        .bind(to_i64(player.xp_total))
        .bind(alignment_to_db(player.alignment))
        .bind(to_i32(player.attributes.strength))
        .bind(to_i32(player.attributes.wisdom))
        .bind(to_i32(player.attributes.charisma))
        .bind(to_i32(player.attributes.constitution))
        .bind(player.created_at)
        .execute(self.pool)
        .await?;

        tracing::debug!(player_id = %player.id, "Inserted player");
        Ok(())
    }

    /// Fetch a player by id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails or the row cannot be decoded.
    pub async fn get(&self, player_id: PlayerId) -> Result<Option<Player>, DbError> {
        let row = sqlx::query_as::<_, PlayerRow>(&format!(
            "SELECT {PLAYER_COLUMNS} FROM players WHERE id = $1"
        ))
        .bind(player_id.into_inner())
        .fetch_optional(self.pool)
        .await?;

        row.map(PlayerRow::into_player).transpose()
    }

    /// Fetch every player, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails or a row cannot be decoded.
    pub async fn list(&self) -> Result<Vec<Player>, DbError> {
        let rows = sqlx::query_as::<_, PlayerRow>(&format!(
            "SELECT {PLAYER_COLUMNS} FROM players ORDER BY created_at, id"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(PlayerRow::into_player).collect()
    }
}

/// Lock a player row for the rest of the transaction.
pub(crate) async fn lock_player(
    conn: &mut PgConnection,
    player_id: PlayerId,
) -> Result<Option<Player>, DbError> {
    let row = sqlx::query_as::<_, PlayerRow>(&format!(
        "SELECT {PLAYER_COLUMNS} FROM players WHERE id = $1 FOR UPDATE"
    ))
    .bind(player_id.into_inner())
    .fetch_optional(&mut *conn)
    .await?;

    row.map(PlayerRow::into_player).transpose()
}

/// A row from the `players` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PlayerRow {
    /// Player UUID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Current level.
    pub level: i32,
    /// Cumulative XP.
    pub xp_total: i64,
    /// Alignment string.
    pub alignment: String,
    /// Strength attribute.
    pub strength: i32,
    /// Wisdom attribute.
    pub wisdom: i32,
    /// Charisma attribute.
    pub charisma: i32,
    /// Constitution attribute.
    pub constitution: i32,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

impl PlayerRow {
    /// Convert the row into a domain [`Player`].
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Decode`] for an unknown alignment or a negative
    /// counter.
    pub fn into_player(self) -> Result<Player, DbError> {
        Ok(Player {
            id: PlayerId::from(self.id),
            name: self.name,
            level: to_u32("level", self.level)?,
            xp_total: to_u64("xp_total", self.xp_total)?,
            alignment: alignment_from_db(&self.alignment)?,
            attributes: PlayerAttributes {
                strength: to_u32("strength", self.strength)?,
                wisdom: to_u32("wisdom", self.wisdom)?,
                charisma: to_u32("charisma", self.charisma)?,
                constitution: to_u32("constitution", self.constitution)?,
            },
            created_at: self.created_at,
        })
    }
}
