//! Atomic reward application.
//!
//! A reward touches up to four tables: the player's XP and level, an impact
//! log, a token mint, and the matching assignments. All of it happens in
//! one transaction against the locked player row, so concurrent rewards for
//! the same player serialize and no XP increment is lost.

use sqlx::PgPool;

use crate::codec::{to_i32, to_i64};
use crate::error::DbError;
use crate::impact_store::{insert_impact_log, reference_exists};
use crate::player_store::lock_player;
use crate::quest_store::complete_assignments;
use crate::store::{RewardApplied, RewardOutcome, RewardWrite};
use crate::token_store::insert_token_entry;

/// Apply `write` in a single transaction.
///
/// `resolve_level` maps cumulative XP to a level. The stored level never
/// decreases.
pub(crate) async fn apply_reward(
    pool: &PgPool,
    write: &RewardWrite,
    resolve_level: fn(u64) -> u32,
) -> Result<RewardOutcome, DbError> {
    let mut tx = pool.begin().await?;

    let Some(mut player) = lock_player(&mut tx, write.player_id).await? else {
        tx.rollback().await?;
        return Ok(RewardOutcome::PlayerMissing);
    };

    if write.once_per_reference {
        if let Some(log) = &write.impact {
            if reference_exists(&mut tx, write.player_id, log.reference).await? {
                tx.rollback().await?;
                return Ok(RewardOutcome::Duplicate);
            }
        }
    }

    let previous_level = player.level;
    player.xp_total = player.xp_total.saturating_add(write.xp_delta);
    player.level = previous_level.max(resolve_level(player.xp_total));

    sqlx::query("UPDATE players SET xp_total = $2, level = GREATEST(level, $3) WHERE id = $1")
        .bind(write.player_id.into_inner())
        .bind(to_i64(player.xp_total))
        .bind(to_i32(player.level))
        .execute(&mut *tx)
        .await?;

    if let Some(log) = &write.impact {
        insert_impact_log(&mut tx, log).await?;
    }
    if let Some(mint) = &write.mint {
        insert_token_entry(&mut tx, mint).await?;
    }
    if let Some(done) = &write.completion {
        let completed = complete_assignments(
            &mut tx,
            write.player_id,
            done.quest_id,
            done.score,
            &done.proof_url,
            done.completed_at,
        )
        .await?;
        tracing::debug!(completed, quest_id = %done.quest_id, "Completed assignments");
    }

    tx.commit().await?;

    tracing::debug!(
        player_id = %write.player_id,
        xp_delta = write.xp_delta,
        level = player.level,
        "Applied reward"
    );

    Ok(RewardOutcome::Applied(RewardApplied {
        previous_level,
        player,
    }))
}
