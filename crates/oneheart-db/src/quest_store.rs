//! Quest and assignment persistence.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use oneheart_types::{AssignmentId, PlayerId, PlayerQuest, Quest, QuestId, QuestRequirements};

use crate::codec::{
    category_from_db, category_to_db, status_from_db, status_to_db, to_i32, to_i64, to_u32,
};
use crate::error::DbError;

/// Column list shared by every quest query.
const QUEST_COLUMNS: &str =
    "id, title, description, category, difficulty, base_xp, base_tokens, region_id, min_level, created_at";

/// A completed assignment together with the quest it refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedAssignment {
    /// The assignment row.
    pub assignment: PlayerQuest,
    /// The quest.
    pub quest: Quest,
}

/// Operations on the `quests` and `player_quests` tables.
pub struct QuestStore<'a> {
    pool: &'a PgPool,
}

impl<'a> QuestStore<'a> {
    /// Create a new quest store bound to a connection pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new quest.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the insert fails.
    pub async fn insert(&self, quest: &Quest) -> Result<(), DbError> {
        sqlx::query(
            r"INSERT INTO quests (id, title, description, category, difficulty, base_xp, base_tokens, region_id, min_level, created_at)
              VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(quest.id.into_inner())
        .bind(&quest.title)
        .bind(&quest.description)
        .bind(category_to_db(quest.category))
        .bind(to_i32(quest.difficulty))
        .bind(to_i32(quest.base_xp))
        .bind(to_i32(quest.base_tokens))
        .bind(&quest.region_id)
        .bind(quest.requirements.min_level.map(to_i32))
        .bind(quest.created_at)
        .execute(self.pool)
        .await?;

        tracing::debug!(quest_id = %quest.id, "Inserted quest");
        Ok(())
    }

    /// Fetch a quest by id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails or the row cannot be decoded.
    pub async fn get(&self, quest_id: QuestId) -> Result<Option<Quest>, DbError> {
        let row = sqlx::query_as::<_, QuestRow>(&format!(
            "SELECT {QUEST_COLUMNS} FROM quests WHERE id = $1"
        ))
        .bind(quest_id.into_inner())
        .fetch_optional(self.pool)
        .await?;

        row.map(QuestRow::into_quest).transpose()
    }

    /// Fetch the quests whose ids are in `quest_ids`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails or a row cannot be decoded.
    pub async fn get_many(&self, quest_ids: &[QuestId]) -> Result<Vec<Quest>, DbError> {
        if quest_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = quest_ids.iter().map(|q| q.into_inner()).collect();
        let rows = sqlx::query_as::<_, QuestRow>(&format!(
            "SELECT {QUEST_COLUMNS} FROM quests WHERE id = ANY($1)"
        ))
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(QuestRow::into_quest).collect()
    }

    /// Fetch up to `limit` quests with difficulty in `[min, max]`, easiest
    /// first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails or a row cannot be decoded.
    pub async fn in_difficulty_range(
        &self,
        min: u32,
        max: u32,
        limit: u32,
    ) -> Result<Vec<Quest>, DbError> {
        let rows = sqlx::query_as::<_, QuestRow>(&format!(
            "SELECT {QUEST_COLUMNS} FROM quests
             WHERE difficulty BETWEEN $1 AND $2
             ORDER BY difficulty, created_at, id
             LIMIT $3"
        ))
        .bind(to_i32(min))
        .bind(to_i32(max))
        .bind(i64::from(limit))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(QuestRow::into_quest).collect()
    }

    /// Insert a new assignment.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the insert fails.
    pub async fn insert_assignment(&self, assignment: &PlayerQuest) -> Result<(), DbError> {
        sqlx::query(
            r"INSERT INTO player_quests (id, player_id, quest_id, status, score, completed_at, proof_url, assigned_at)
              VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(assignment.id.into_inner())
        .bind(assignment.player_id.into_inner())
        .bind(assignment.quest_id.into_inner())
        .bind(status_to_db(assignment.status))
        .bind(assignment.score.map(to_i32))
        .bind(assignment.completed_at)
        .bind(&assignment.proof_url)
        .bind(assignment.assigned_at)
        .execute(self.pool)
        .await?;

        tracing::debug!(
            assignment_id = %assignment.id,
            player_id = %assignment.player_id,
            quest_id = %assignment.quest_id,
            "Inserted assignment"
        );
        Ok(())
    }

    /// Fetch a player's completed assignments with their quests, oldest
    /// completion first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails or a row cannot be decoded.
    pub async fn completed_for_player(
        &self,
        player_id: PlayerId,
    ) -> Result<Vec<CompletedAssignment>, DbError> {
        let rows = sqlx::query_as::<_, CompletedRow>(
            r"SELECT pq.id AS assignment_id, pq.player_id, pq.status, pq.score, pq.completed_at, pq.proof_url, pq.assigned_at,
                     q.id, q.title, q.description, q.category, q.difficulty, q.base_xp, q.base_tokens, q.region_id, q.min_level, q.created_at
              FROM player_quests pq
              JOIN quests q ON q.id = pq.quest_id
              WHERE pq.player_id = $1 AND pq.status = 'completed'
              ORDER BY pq.completed_at, pq.id",
        )
        .bind(player_id.into_inner())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(CompletedRow::into_completed).collect()
    }
}

/// Mark every open assignment of `player_id` to `quest_id` completed.
///
/// Returns the number of rows changed.
pub(crate) async fn complete_assignments(
    conn: &mut PgConnection,
    player_id: PlayerId,
    quest_id: QuestId,
    score: u32,
    proof_url: &str,
    completed_at: DateTime<Utc>,
) -> Result<u64, DbError> {
    let result = sqlx::query(
        r"UPDATE player_quests
          SET status = 'completed', score = $3, proof_url = $4, completed_at = $5
          WHERE player_id = $1 AND quest_id = $2 AND status = 'available'",
    )
    .bind(player_id.into_inner())
    .bind(quest_id.into_inner())
    .bind(to_i32(score))
    .bind(proof_url)
    .bind(completed_at)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}

/// A row from the `quests` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct QuestRow {
    /// Quest UUID.
    pub id: Uuid,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Category string.
    pub category: String,
    /// Difficulty 1 to 5.
    pub difficulty: i32,
    /// Advertised base XP.
    pub base_xp: i32,
    /// Advertised base tokens.
    pub base_tokens: i32,
    /// Region tag.
    pub region_id: String,
    /// Minimum level, if gated.
    pub min_level: Option<i32>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl QuestRow {
    /// Convert the row into a domain [`Quest`].
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Decode`] for an unknown category or a negative
    /// number.
    pub fn into_quest(self) -> Result<Quest, DbError> {
        Ok(Quest {
            id: QuestId::from(self.id),
            title: self.title,
            description: self.description,
            category: category_from_db(&self.category)?,
            difficulty: to_u32("difficulty", self.difficulty)?,
            base_xp: to_u32("base_xp", self.base_xp)?,
            base_tokens: to_u32("base_tokens", self.base_tokens)?,
            region_id: self.region_id,
            requirements: QuestRequirements {
                min_level: self.min_level.map(|l| to_u32("min_level", l)).transpose()?,
            },
            created_at: self.created_at,
        })
    }
}

/// A joined assignment and quest row.
#[derive(Debug, Clone, sqlx::FromRow)]
struct CompletedRow {
    assignment_id: Uuid,
    player_id: Uuid,
    status: String,
    score: Option<i32>,
    completed_at: Option<DateTime<Utc>>,
    proof_url: Option<String>,
    assigned_at: DateTime<Utc>,
    #[sqlx(flatten)]
    quest: QuestRow,
}

impl CompletedRow {
    fn into_completed(self) -> Result<CompletedAssignment, DbError> {
        let quest = self.quest.into_quest()?;
        Ok(CompletedAssignment {
            assignment: PlayerQuest {
                id: AssignmentId::from(self.assignment_id),
                player_id: PlayerId::from(self.player_id),
                quest_id: quest.id,
                status: status_from_db(&self.status)?,
                score: self.score.map(|s| to_u32("score", s)).transpose()?,
                completed_at: self.completed_at,
                proof_url: self.proof_url,
                assigned_at: self.assigned_at,
            },
            quest,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quest_row_decodes() {
        let row = QuestRow {
            id: Uuid::now_v7(),
            title: "Park Cleanup".to_owned(),
            description: String::new(),
            category: "cleanup".to_owned(),
            difficulty: 1,
            base_xp: 50,
            base_tokens: 5,
            region_id: "region_bangkok".to_owned(),
            min_level: None,
            created_at: Utc::now(),
        };
        let quest = row.into_quest();
        assert!(quest.is_ok());
        assert_eq!(quest.map(|q| q.difficulty).ok(), Some(1));
    }

    #[test]
    fn quest_row_with_bad_category_fails() {
        let row = QuestRow {
            id: Uuid::now_v7(),
            title: "x".to_owned(),
            description: String::new(),
            category: "gardening".to_owned(),
            difficulty: 1,
            base_xp: 0,
            base_tokens: 0,
            region_id: "r".to_owned(),
            min_level: Some(2),
            created_at: Utc::now(),
        };
        assert!(matches!(row.into_quest(), Err(DbError::Decode(_))));
    }
}
