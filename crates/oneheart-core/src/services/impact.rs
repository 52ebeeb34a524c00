//! Players, quests, assignments, and quest completion.

use chrono::{TimeDelta, Utc};
use tracing::{debug, info};

use oneheart_db::{AssignmentCompletion, LedgerStore, RewardOutcome, RewardWrite};
use oneheart_ledger::{TokenTransactionBuilder, sources};
use oneheart_types::{
    Alignment, AssignmentId, AssignmentStatus, HistoryEntry, ImpactLog, ImpactLogId,
    ImpactReference, Player, PlayerAttributes, PlayerHistory, PlayerId, PlayerQuest, PlayerStats,
    Quest, QuestCategory, QuestCompletion, QuestId, QuestRequirements, TokenTxType,
};

use super::{ServiceError, load_player, load_quest, to_amount};
use crate::level::{MAX_LEVEL, level_for, xp_to_next_level};
use crate::reward::{Activity, compute_impact};

/// Lowest quest difficulty.
pub const MIN_DIFFICULTY: u32 = 1;

/// Highest quest difficulty.
pub const MAX_DIFFICULTY: u32 = 5;

/// Most quests returned by [`list_quests_for_player`].
pub const AVAILABLE_QUEST_LIMIT: u32 = 10;

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

/// Input for [`create_player`].
#[derive(Debug, Clone, Default)]
pub struct NewPlayer {
    /// Display name.
    pub name: String,
    /// Declared alignment.
    pub alignment: Alignment,
    /// Character attributes.
    pub attributes: PlayerAttributes,
}

/// Register a player at level 1 with no XP.
///
/// # Errors
///
/// Returns [`ServiceError::Validation`] for a blank name, or
/// [`ServiceError::Store`] if the write fails.
pub async fn create_player(store: &LedgerStore, input: NewPlayer) -> Result<Player, ServiceError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(ServiceError::Validation("player name must not be empty".to_owned()));
    }
    let player = Player {
        id: PlayerId::new(),
        name: name.to_owned(),
        level: 1,
        xp_total: 0,
        alignment: input.alignment,
        attributes: input.attributes,
        created_at: Utc::now(),
    };
    store.insert_player(&player).await?;
    info!(player_id = %player.id, name = %player.name, "player created");
    Ok(player)
}

/// Input for [`create_quest`].
#[derive(Debug, Clone)]
pub struct NewQuest {
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Category.
    pub category: QuestCategory,
    /// Difficulty, 1 to 5.
    pub difficulty: u32,
    /// Informational base XP.
    pub base_xp: u32,
    /// Informational base tokens.
    pub base_tokens: u32,
    /// Region tag.
    pub region_id: String,
    /// Minimum level to be assigned, 1 to 10.
    pub min_level: Option<u32>,
}

/// Define a quest.
///
/// # Errors
///
/// Returns [`ServiceError::Validation`] for a blank title or region, a
/// difficulty outside 1 to 5, or a minimum level outside 1 to 10.
pub async fn create_quest(store: &LedgerStore, input: NewQuest) -> Result<Quest, ServiceError> {
    if input.title.trim().is_empty() {
        return Err(ServiceError::Validation("quest title must not be empty".to_owned()));
    }
    if input.region_id.trim().is_empty() {
        return Err(ServiceError::Validation("region_id must not be empty".to_owned()));
    }
    if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&input.difficulty) {
        return Err(ServiceError::Validation(format!(
            "difficulty must be in {MIN_DIFFICULTY}..={MAX_DIFFICULTY}, got {}",
            input.difficulty
        )));
    }
    if let Some(min_level) = input.min_level {
        if !(1..=MAX_LEVEL).contains(&min_level) {
            return Err(ServiceError::Validation(format!(
                "min_level must be in 1..={MAX_LEVEL}, got {min_level}"
            )));
        }
    }

    let quest = Quest {
        id: QuestId::new(),
        title: input.title.trim().to_owned(),
        description: input.description,
        category: input.category,
        difficulty: input.difficulty,
        base_xp: input.base_xp,
        base_tokens: input.base_tokens,
        region_id: input.region_id,
        requirements: QuestRequirements {
            min_level: input.min_level,
        },
        created_at: Utc::now(),
    };
    store.insert_quest(&quest).await?;
    info!(quest_id = %quest.id, title = %quest.title, category = ?quest.category, "quest created");
    Ok(quest)
}

// ---------------------------------------------------------------------------
// Assignment
// ---------------------------------------------------------------------------

/// Assign a quest to a player.
///
/// Repeated assignment of the same quest creates another open row.
///
/// # Errors
///
/// Returns [`ServiceError::NotFound`] for an unknown player or quest, and
/// [`ServiceError::Requirement`] when the player is below the quest's
/// minimum level.
pub async fn assign_quest(
    store: &LedgerStore,
    player_id: PlayerId,
    quest_id: QuestId,
) -> Result<PlayerQuest, ServiceError> {
    let player = load_player(store, player_id).await?;
    let quest = load_quest(store, quest_id).await?;

    if let Some(min_level) = quest.requirements.min_level {
        if player.level < min_level {
            return Err(ServiceError::Requirement(format!(
                "Minimum level {min_level} required"
            )));
        }
    }

    let assignment = PlayerQuest {
        id: AssignmentId::new(),
        player_id,
        quest_id,
        status: AssignmentStatus::Available,
        score: None,
        completed_at: None,
        proof_url: None,
        assigned_at: Utc::now(),
    };
    store.insert_assignment(&assignment).await?;
    debug!(%player_id, %quest_id, assignment_id = %assignment.id, "quest assigned");
    Ok(assignment)
}

/// Difficulty recommended for a level: `clamp(level / 2, 1, 5)`.
pub fn recommended_difficulty(level: u32) -> u32 {
    level
        .checked_div(2)
        .unwrap_or(0)
        .clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
}

/// Quests within one step of the player's recommended difficulty, easiest
/// first, at most [`AVAILABLE_QUEST_LIMIT`].
///
/// # Errors
///
/// Returns [`ServiceError::NotFound`] for an unknown player.
pub async fn list_quests_for_player(
    store: &LedgerStore,
    player_id: PlayerId,
) -> Result<Vec<Quest>, ServiceError> {
    let player = load_player(store, player_id).await?;
    let recommended = recommended_difficulty(player.level);
    let min = recommended.saturating_sub(1).max(MIN_DIFFICULTY);
    let max = recommended.saturating_add(1).min(MAX_DIFFICULTY);
    Ok(store
        .quests_in_difficulty_range(min, max, AVAILABLE_QUEST_LIMIT)
        .await?)
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

/// Input for [`complete_quest`].
#[derive(Debug, Clone)]
pub struct QuestSubmission {
    /// Completing player.
    pub player_id: PlayerId,
    /// Completed quest.
    pub quest_id: QuestId,
    /// Link to the proof.
    pub proof_url: String,
    /// Reported activity.
    pub activity: Activity,
}

/// Complete a quest: evaluate the reward, credit XP and level, log the
/// impact, mint tokens, and complete every open assignment of the quest,
/// all in one store write.
///
/// No mint is written when the reward is zero tokens. Completion does not
/// require an assignment.
///
/// # Errors
///
/// Returns [`ServiceError::Validation`] for a blank proof URL or
/// out-of-range activity, and [`ServiceError::NotFound`] for an unknown
/// player or quest.
pub async fn complete_quest(
    store: &LedgerStore,
    submission: QuestSubmission,
) -> Result<QuestCompletion, ServiceError> {
    submission.activity.validate()?;
    if submission.proof_url.trim().is_empty() {
        return Err(ServiceError::Validation("proof_url must not be empty".to_owned()));
    }

    let player = load_player(store, submission.player_id).await?;
    let quest = load_quest(store, submission.quest_id).await?;
    let result = compute_impact(&player, &quest, &submission.activity);
    let now = Utc::now();

    let mint = if result.tokens > 0 {
        Some(
            TokenTransactionBuilder::new(player.id, TokenTxType::Mint)
                .amount(to_amount(result.tokens)?)
                .source(sources::quest(quest.id))
                .build()?,
        )
    } else {
        None
    };

    let write = RewardWrite {
        player_id: player.id,
        xp_delta: result.final_xp,
        impact: Some(ImpactLog {
            id: ImpactLogId::new(),
            player_id: player.id,
            reference: ImpactReference::Quest(quest.id),
            xp_awarded: result.final_xp,
            tokens_awarded: result.tokens,
            impact_value: result.impact_credits,
            breakdown: result.fund_allocation.to_breakdown(),
            created_at: now,
        }),
        mint,
        completion: Some(AssignmentCompletion {
            quest_id: quest.id,
            score: submission.activity.authenticity_score,
            proof_url: submission.proof_url,
            completed_at: now,
        }),
        once_per_reference: false,
    };

    let applied = match store.apply_reward(&write, level_for).await? {
        RewardOutcome::Applied(applied) => applied,
        RewardOutcome::PlayerMissing | RewardOutcome::Duplicate => {
            return Err(ServiceError::not_found("player", player.id));
        }
    };

    let new_level = applied.player.level;
    let leveled_up = new_level > applied.previous_level;
    info!(
        player_id = %player.id,
        quest_id = %quest.id,
        xp = result.final_xp,
        tokens = result.tokens,
        level = new_level,
        leveled_up,
        "quest completed"
    );

    Ok(QuestCompletion {
        player_id: player.id,
        xp_awarded: result.final_xp,
        tokens_awarded: result.tokens,
        leveled_up,
        new_level,
        badges_earned: Vec::new(),
    })
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// Aggregate stats for a player.
///
/// # Errors
///
/// Returns [`ServiceError::NotFound`] for an unknown player.
pub async fn player_stats(store: &LedgerStore, player_id: PlayerId) -> Result<PlayerStats, ServiceError> {
    let player = load_player(store, player_id).await?;
    let token_balance = store.balance_of(player_id).await?;
    let completed = store.completed_assignments(player_id).await?;
    Ok(PlayerStats {
        player_id,
        name: player.name,
        level: player.level,
        xp_total: player.xp_total,
        xp_to_next_level: xp_to_next_level(player.xp_total),
        token_balance,
        quests_completed: u64::try_from(completed.len()).unwrap_or(u64::MAX),
        attributes: player.attributes,
        alignment: player.alignment,
        created_at: player.created_at,
    })
}

/// Impact entries from the last `history_days` days, newest first.
///
/// Quest entries carry the quest's title and category.
///
/// # Errors
///
/// Returns [`ServiceError::NotFound`] for an unknown player.
pub async fn player_history(
    store: &LedgerStore,
    player_id: PlayerId,
    history_days: u32,
) -> Result<PlayerHistory, ServiceError> {
    load_player(store, player_id).await?;
    let now = Utc::now();
    let since = now
        .checked_sub_signed(TimeDelta::days(i64::from(history_days)))
        .unwrap_or(now);
    let logs = store.impact_logs(player_id, Some(since)).await?;

    let quest_ids: Vec<QuestId> = logs
        .iter()
        .filter_map(|log| match log.reference {
            ImpactReference::Quest(id) => Some(id),
            ImpactReference::GlobalMission(_) | ImpactReference::Expedition(_) => None,
        })
        .collect();
    let quests = store.get_quests(&quest_ids).await?;

    let history: Vec<HistoryEntry> = logs
        .into_iter()
        .map(|log| {
            let quest = match log.reference {
                ImpactReference::Quest(id) => quests.iter().find(|q| q.id == id),
                ImpactReference::GlobalMission(_) | ImpactReference::Expedition(_) => None,
            };
            HistoryEntry {
                impact_id: log.id,
                reference: log.reference,
                quest_title: quest.map(|q| q.title.clone()),
                quest_category: quest.map(|q| q.category),
                xp_awarded: log.xp_awarded,
                tokens_awarded: log.tokens_awarded,
                impact_value: log.impact_value,
                fund_allocation: log.breakdown,
                created_at: log.created_at,
            }
        })
        .collect();

    Ok(PlayerHistory {
        player_id,
        history_count: u64::try_from(history.len()).unwrap_or(u64::MAX),
        history,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    async fn setup(store: &LedgerStore) -> Player {
        create_player(
            store,
            NewPlayer {
                name: "Alice".to_owned(),
                ..NewPlayer::default()
            },
        )
        .await
        .unwrap()
    }

    async fn quest(store: &LedgerStore, category: QuestCategory, difficulty: u32, min_level: Option<u32>) -> Quest {
        create_quest(
            store,
            NewQuest {
                title: format!("{category:?} {difficulty}"),
                description: String::new(),
                category,
                difficulty,
                base_xp: 0,
                base_tokens: 0,
                region_id: "region_bangkok".to_owned(),
                min_level,
            },
        )
        .await
        .unwrap()
    }

    fn submission(player: &Player, quest: &Quest, minutes: u32) -> QuestSubmission {
        QuestSubmission {
            player_id: player.id,
            quest_id: quest.id,
            proof_url: "https://proof.example/1".to_owned(),
            activity: Activity::new(minutes),
        }
    }

    #[tokio::test]
    async fn completion_credits_everything() {
        let store = LedgerStore::memory();
        let alice = setup(&store).await;
        let training = quest(&store, QuestCategory::Training, 1, None).await;
        assert!(assign_quest(&store, alice.id, training.id).await.is_ok());

        let outcome = complete_quest(&store, submission(&alice, &training, 45))
            .await
            .unwrap();
        assert_eq!(outcome.xp_awarded, 124);
        assert_eq!(outcome.tokens_awarded, 13);
        assert_eq!(outcome.new_level, 2);
        assert!(outcome.leveled_up);
        assert!(outcome.badges_earned.is_empty());

        let stats = player_stats(&store, alice.id).await;
        assert!(matches!(
            stats,
            Ok(PlayerStats {
                xp_total: 124,
                xp_to_next_level: Some(176),
                token_balance: 13,
                quests_completed: 1,
                level: 2,
                ..
            })
        ));

        let history = player_history(&store, alice.id, 30).await.unwrap();
        assert_eq!(history.history_count, 1);
        let entry = history.history.first();
        assert_eq!(entry.and_then(|e| e.quest_title.clone()), Some(training.title.clone()));
        assert_eq!(entry.map(|e| e.impact_value), Some(Decimal::new(2976, 2)));
    }

    #[tokio::test]
    async fn zero_token_completion_skips_mint() {
        let store = LedgerStore::memory();
        let alice = setup(&store).await;
        let cleanup = quest(&store, QuestCategory::Cleanup, 1, None).await;
        let mut zero = submission(&alice, &cleanup, 10);
        zero.activity.authenticity_score = 0;

        let outcome = complete_quest(&store, zero).await;
        assert!(matches!(outcome, Ok(QuestCompletion { tokens_awarded: 0, xp_awarded: 0, .. })));
        let entries = store.token_entries(alice.id).await;
        assert!(matches!(entries, Ok(e) if e.is_empty()));
    }

    #[tokio::test]
    async fn duplicate_assignments_are_all_completed() {
        let store = LedgerStore::memory();
        let alice = setup(&store).await;
        let sports = quest(&store, QuestCategory::Sports, 1, None).await;
        assert!(assign_quest(&store, alice.id, sports.id).await.is_ok());
        assert!(assign_quest(&store, alice.id, sports.id).await.is_ok());

        assert!(complete_quest(&store, submission(&alice, &sports, 30)).await.is_ok());
        let stats = player_stats(&store, alice.id).await;
        assert!(matches!(stats, Ok(PlayerStats { quests_completed: 2, .. })));
    }

    #[tokio::test]
    async fn assignment_checks_level() {
        let store = LedgerStore::memory();
        let alice = setup(&store).await;
        let advanced = quest(&store, QuestCategory::Training, 3, Some(3)).await;
        let result = assign_quest(&store, alice.id, advanced.id).await;
        assert!(matches!(result, Err(ServiceError::Requirement(msg)) if msg == "Minimum level 3 required"));

        let missing = assign_quest(&store, PlayerId::new(), advanced.id).await;
        assert!(matches!(missing, Err(ServiceError::NotFound { entity: "player", .. })));
        let missing = assign_quest(&store, alice.id, QuestId::new()).await;
        assert!(matches!(missing, Err(ServiceError::NotFound { entity: "quest", .. })));
    }

    #[tokio::test]
    async fn completion_validates_input() {
        let store = LedgerStore::memory();
        let alice = setup(&store).await;
        let research = quest(&store, QuestCategory::Research, 2, None).await;

        let mut blank = submission(&alice, &research, 30);
        blank.proof_url = "  ".to_owned();
        assert!(matches!(complete_quest(&store, blank).await, Err(ServiceError::Validation(_))));

        let mut nobody = submission(&alice, &research, 30);
        nobody.activity.beneficiaries = 0;
        assert!(matches!(complete_quest(&store, nobody).await, Err(ServiceError::Validation(_))));

        let mut stranger = submission(&alice, &research, 30);
        stranger.player_id = PlayerId::new();
        assert!(matches!(
            complete_quest(&store, stranger).await,
            Err(ServiceError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn available_quests_follow_level() {
        let store = LedgerStore::memory();
        let alice = setup(&store).await;
        for difficulty in 1..=5 {
            quest(&store, QuestCategory::Cultural, difficulty, None).await;
        }
        // Level 1 recommends difficulty 1, window 1..=2.
        let listed = list_quests_for_player(&store, alice.id).await.unwrap();
        let difficulties: Vec<u32> = listed.iter().map(|q| q.difficulty).collect();
        assert_eq!(difficulties, vec![1, 2]);
    }

    #[test]
    fn recommended_difficulty_is_clamped() {
        assert_eq!(recommended_difficulty(1), 1);
        assert_eq!(recommended_difficulty(4), 2);
        assert_eq!(recommended_difficulty(10), 5);
    }

    #[tokio::test]
    async fn blank_names_are_rejected() {
        let store = LedgerStore::memory();
        let result = create_player(&store, NewPlayer::default()).await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));
        let bad = create_quest(
            &store,
            NewQuest {
                title: "Too hard".to_owned(),
                description: String::new(),
                category: QuestCategory::Research,
                difficulty: 6,
                base_xp: 0,
                base_tokens: 0,
                region_id: "region_x".to_owned(),
                min_level: None,
            },
        )
        .await;
        assert!(matches!(bad, Err(ServiceError::Validation(_))));
    }
}
