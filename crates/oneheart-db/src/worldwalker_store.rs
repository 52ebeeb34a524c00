//! Expedition plan and global mission persistence.
//!
//! Plans are written once when created and read back to validate
//! completions. List-valued fields are stored as JSONB.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use oneheart_types::{
    ExpeditionId, ExpeditionPlan, ExpeditionRewards, GlobalMission, MissionId, Phase,
};

use crate::codec::{to_i32, to_i64, to_u32, to_u64};
use crate::error::DbError;

/// Operations on the `expeditions` and `global_missions` tables.
pub struct WorldwalkerStore<'a> {
    pool: &'a PgPool,
}

impl<'a> WorldwalkerStore<'a> {
    /// Create a new worldwalker store bound to a connection pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Expeditions
    // =========================================================================

    /// Insert an expedition plan.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if encoding or the insert fails.
    pub async fn insert_expedition(&self, plan: &ExpeditionPlan) -> Result<(), DbError> {
        let required_skills = serde_json::to_value(&plan.required_skills)?;
        let team = serde_json::to_value(&plan.team)?;
        let objectives = serde_json::to_value(&plan.objectives)?;

        sqlx::query(
            r"INSERT INTO expeditions
              (id, phase, region, difficulty, team_size, duration_days, reward_xp, reward_tokens, reward_credits, required_skills, team, objectives, created_at)
              VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(plan.id.into_inner())
        .bind(to_i32(plan.phase))
        .bind(&plan.region)
        .bind(to_i32(plan.difficulty))
        .bind(to_i32(plan.team_size))
        .bind(to_i32(plan.duration_days))
        .bind(to_i64(plan.rewards.xp))
        .bind(to_i64(plan.rewards.tokens))
        .bind(to_i64(plan.rewards.impact_credits))
        .bind(&required_skills)
        .bind(&team)
        .bind(&objectives)
        .bind(plan.created_at)
        .execute(self.pool)
        .await?;

        tracing::debug!(expedition_id = %plan.id, team = plan.team.len(), "Inserted expedition");
        Ok(())
    }

    /// Fetch an expedition plan by id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails or the row cannot be decoded.
    pub async fn get_expedition(
        &self,
        expedition_id: ExpeditionId,
    ) -> Result<Option<ExpeditionPlan>, DbError> {
        let row = sqlx::query_as::<_, ExpeditionRow>(
            r"SELECT id, phase, region, difficulty, team_size, duration_days, reward_xp, reward_tokens, reward_credits, required_skills, team, objectives, created_at
              FROM expeditions
              WHERE id = $1",
        )
        .bind(expedition_id.into_inner())
        .fetch_optional(self.pool)
        .await?;

        row.map(ExpeditionRow::into_plan).transpose()
    }

    // =========================================================================
    // Global missions
    // =========================================================================

    /// Insert a global mission.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if encoding or the insert fails.
    pub async fn insert_mission(&self, mission: &GlobalMission) -> Result<(), DbError> {
        let regions = serde_json::to_value(&mission.regions)?;
        let variations = serde_json::to_value(&mission.regional_variations)?;
        let checkpoints = serde_json::to_value(&mission.checkpoints)?;

        sqlx::query(
            r"INSERT INTO global_missions
              (id, theme, phase, regions, start_date, end_date, regional_variations, checkpoints, global_objective, global_impact_target)
              VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(mission.id.into_inner())
        .bind(&mission.theme)
        .bind(to_i32(mission.phase.number()))
        .bind(&regions)
        .bind(mission.start_date)
        .bind(mission.end_date)
        .bind(&variations)
        .bind(&checkpoints)
        .bind(&mission.global_objective)
        .bind(to_i64(mission.global_impact_target))
        .execute(self.pool)
        .await?;

        tracing::debug!(mission_id = %mission.id, "Inserted global mission");
        Ok(())
    }

    /// Fetch a global mission by id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails or the row cannot be decoded.
    pub async fn get_mission(&self, mission_id: MissionId) -> Result<Option<GlobalMission>, DbError> {
        let row = sqlx::query_as::<_, MissionRow>(
            r"SELECT id, theme, phase, regions, start_date, end_date, regional_variations, checkpoints, global_objective, global_impact_target
              FROM global_missions
              WHERE id = $1",
        )
        .bind(mission_id.into_inner())
        .fetch_optional(self.pool)
        .await?;

        row.map(MissionRow::into_mission).transpose()
    }
}

/// A row from the `expeditions` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ExpeditionRow {
    /// Expedition UUID.
    pub id: Uuid,
    /// Requested phase.
    pub phase: i32,
    /// Target region.
    pub region: String,
    /// Difficulty.
    pub difficulty: i32,
    /// Team size cap.
    pub team_size: i32,
    /// Duration in days.
    pub duration_days: i32,
    /// XP per member.
    pub reward_xp: i64,
    /// Tokens per member.
    pub reward_tokens: i64,
    /// Impact credits per member.
    pub reward_credits: i64,
    /// JSON array of role names.
    pub required_skills: serde_json::Value,
    /// JSON array of player UUIDs.
    pub team: serde_json::Value,
    /// JSON array of objective strings.
    pub objectives: serde_json::Value,
    /// Planning time.
    pub created_at: DateTime<Utc>,
}

impl ExpeditionRow {
    /// Convert the row into a domain [`ExpeditionPlan`].
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a column cannot be decoded.
    pub fn into_plan(self) -> Result<ExpeditionPlan, DbError> {
        Ok(ExpeditionPlan {
            id: ExpeditionId::from(self.id),
            phase: to_u32("phase", self.phase)?,
            region: self.region,
            difficulty: to_u32("difficulty", self.difficulty)?,
            required_skills: serde_json::from_value(self.required_skills)?,
            team: serde_json::from_value(self.team)?,
            team_size: to_u32("team_size", self.team_size)?,
            duration_days: to_u32("duration_days", self.duration_days)?,
            objectives: serde_json::from_value(self.objectives)?,
            rewards: ExpeditionRewards {
                xp: to_u64("reward_xp", self.reward_xp)?,
                tokens: to_u64("reward_tokens", self.reward_tokens)?,
                impact_credits: to_u64("reward_credits", self.reward_credits)?,
            },
            created_at: self.created_at,
        })
    }
}

/// A row from the `global_missions` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MissionRow {
    /// Mission UUID.
    pub id: Uuid,
    /// Theme.
    pub theme: String,
    /// Phase number.
    pub phase: i32,
    /// JSON array of regions.
    pub regions: serde_json::Value,
    /// Start time.
    pub start_date: DateTime<Utc>,
    /// End time.
    pub end_date: DateTime<Utc>,
    /// JSON array of regional variations.
    pub regional_variations: serde_json::Value,
    /// JSON array of checkpoints.
    pub checkpoints: serde_json::Value,
    /// Shared objective.
    pub global_objective: String,
    /// Impact target.
    pub global_impact_target: i64,
}

impl MissionRow {
    /// Convert the row into a domain [`GlobalMission`].
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a column cannot be decoded.
    pub fn into_mission(self) -> Result<GlobalMission, DbError> {
        let number = to_u32("phase", self.phase)?;
        let phase = Phase::from_number(number)
            .ok_or_else(|| DbError::Decode(format!("invalid mission phase: {number}")))?;
        Ok(GlobalMission {
            id: MissionId::from(self.id),
            theme: self.theme,
            phase,
            regions: serde_json::from_value(self.regions)?,
            start_date: self.start_date,
            end_date: self.end_date,
            regional_variations: serde_json::from_value(self.regional_variations)?,
            checkpoints: serde_json::from_value(self.checkpoints)?,
            global_objective: self.global_objective,
            global_impact_target: to_u64("global_impact_target", self.global_impact_target)?,
        })
    }
}
