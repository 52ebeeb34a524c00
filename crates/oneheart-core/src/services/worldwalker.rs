//! Worldwalker journey: readiness, skills, phases, expeditions, and global
//! missions.

use std::collections::BTreeSet;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::info;

use oneheart_db::{LedgerStore, RewardApplied, RewardOutcome, RewardWrite};
use oneheart_ledger::{TokenTransactionBuilder, sources};
use oneheart_types::{
    ExpeditionCompletion, ExpeditionId, ExpeditionPlan, GlobalMission, ImpactLog, ImpactLogId,
    ImpactReference, MissionCompletion, MissionId, MissionImpact, PhaseAdvancement, PhaseInfo,
    PlayerId, QuestCategory, ReadinessScore, SkillProfile, TokenLedgerEntry, TokenTxType,
    WorldwalkerStatus,
};

use super::{ServiceError, load_player, to_amount};
use crate::expedition::{self, Candidate};
use crate::level::level_for;
use crate::mission::{self, mission_fund_split, mission_reward};
use crate::phase::{advancement_bonus, advancement_message, catalog};
use crate::readiness::assess_readiness;
use crate::reward::quest_fund_allocation;
use crate::skills::{evaluate_skills, strongest_dimensions};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn mint(player_id: PlayerId, tokens: u64, source: String) -> Result<Option<TokenLedgerEntry>, ServiceError> {
    if tokens == 0 {
        return Ok(None);
    }
    Ok(Some(
        TokenTransactionBuilder::new(player_id, TokenTxType::Mint)
            .amount(to_amount(tokens)?)
            .source(source)
            .build()?,
    ))
}

async fn apply(store: &LedgerStore, write: &RewardWrite) -> Result<RewardApplied, ServiceError> {
    match store.apply_reward(write, level_for).await? {
        RewardOutcome::Applied(applied) => Ok(applied),
        RewardOutcome::PlayerMissing => Err(ServiceError::not_found("player", write.player_id)),
        RewardOutcome::Duplicate => Err(ServiceError::Validation(
            "reward already recorded for this player".to_owned(),
        )),
    }
}

async fn completed_categories(
    store: &LedgerStore,
    player_id: PlayerId,
) -> Result<Vec<QuestCategory>, ServiceError> {
    Ok(store
        .completed_assignments(player_id)
        .await?
        .into_iter()
        .map(|c| c.quest.category)
        .collect())
}

// ---------------------------------------------------------------------------
// Assessment
// ---------------------------------------------------------------------------

/// Assess a player's readiness.
///
/// # Errors
///
/// Returns [`ServiceError::NotFound`] for an unknown player.
pub async fn readiness(store: &LedgerStore, player_id: PlayerId) -> Result<ReadinessScore, ServiceError> {
    let player = load_player(store, player_id).await?;
    let completed = store.completed_assignments(player_id).await?;
    Ok(assess_readiness(&player, &completed))
}

/// Profile a player's skills.
///
/// # Errors
///
/// Returns [`ServiceError::NotFound`] for an unknown player.
pub async fn skills(store: &LedgerStore, player_id: PlayerId) -> Result<SkillProfile, ServiceError> {
    load_player(store, player_id).await?;
    let categories = completed_categories(store, player_id).await?;
    Ok(evaluate_skills(&categories))
}

/// Where a player stands on the journey.
///
/// # Errors
///
/// Returns [`ServiceError::NotFound`] for an unknown player.
pub async fn status(store: &LedgerStore, player_id: PlayerId) -> Result<WorldwalkerStatus, ServiceError> {
    let player = load_player(store, player_id).await?;
    let completed = store.completed_assignments(player_id).await?;
    let score = assess_readiness(&player, &completed);
    let categories: Vec<QuestCategory> = completed.iter().map(|c| c.quest.category).collect();
    let logs = store.impact_logs(player_id, None).await?;

    let expeditions_completed = logs
        .iter()
        .filter(|log| matches!(log.reference, ImpactReference::Expedition(_)))
        .count();
    let global_impact_total = logs
        .iter()
        .map(|log| log.impact_value)
        .fold(Decimal::ZERO, Decimal::saturating_add);

    let skills_profile = evaluate_skills(&categories);
    let strongest_skills = strongest_dimensions(&skills_profile.skills)
        .into_iter()
        .map(|(dimension, _)| dimension.name().to_owned())
        .collect();

    Ok(WorldwalkerStatus {
        player_id,
        current_phase: score.ready_for_phase,
        readiness_score: score.overall,
        skills_profile,
        strongest_skills,
        expeditions_completed: u64::try_from(expeditions_completed).unwrap_or(u64::MAX),
        global_impact_total,
        next_milestone: format!("Phase {} Global Mission", score.ready_for_phase.number()),
    })
}

/// The phase catalog.
pub fn phases() -> Vec<PhaseInfo> {
    catalog()
}

// ---------------------------------------------------------------------------
// Phase advancement
// ---------------------------------------------------------------------------

/// Advance past the player's readiness phase and award the bonus.
///
/// The phase itself is derived from readiness, so it is not stored.
///
/// # Errors
///
/// Returns [`ServiceError::NotFound`] for an unknown player and
/// [`ServiceError::MaxPhase`] when readiness already allows the final phase.
pub async fn advance(store: &LedgerStore, player_id: PlayerId) -> Result<PhaseAdvancement, ServiceError> {
    let current = readiness(store, player_id).await?.ready_for_phase;
    let next = current.next().ok_or(ServiceError::MaxPhase {
        phase: current.number(),
    })?;
    let bonus = advancement_bonus(next);

    let write = RewardWrite {
        player_id,
        xp_delta: bonus.xp,
        impact: None,
        mint: mint(player_id, bonus.tokens, sources::phase_advancement(next.number()))?,
        completion: None,
        once_per_reference: false,
    };
    let applied = apply(store, &write).await?;
    let new_level = applied.player.level;
    info!(%player_id, phase = next.number(), xp = bonus.xp, tokens = bonus.tokens, level = new_level, "phase advanced");

    Ok(PhaseAdvancement {
        player_id,
        new_phase: next,
        xp_awarded: bonus.xp,
        tokens_awarded: bonus.tokens,
        new_level,
        leveled_up: new_level > applied.previous_level,
        message: advancement_message(next),
    })
}

// ---------------------------------------------------------------------------
// Expeditions
// ---------------------------------------------------------------------------

/// Input for [`plan_expedition`].
#[derive(Debug, Clone)]
pub struct ExpeditionRequest {
    /// Phase number; unknown numbers plan with phase 1 parameters.
    pub phase: u32,
    /// Target region.
    pub region: String,
    /// Difficulty used to filter candidates.
    pub difficulty: u32,
    /// Roles to match against candidates' recommended roles.
    pub required_skills: Vec<String>,
}

/// Plan an expedition from the current roster and persist it.
///
/// # Errors
///
/// Returns [`ServiceError::Validation`] for a blank region.
pub async fn plan_expedition(
    store: &LedgerStore,
    request: ExpeditionRequest,
) -> Result<ExpeditionPlan, ServiceError> {
    if request.region.trim().is_empty() {
        return Err(ServiceError::Validation("region must not be empty".to_owned()));
    }

    let min_level = expedition::min_level_for(request.difficulty);
    let mut candidates = Vec::new();
    for player in store.list_players().await? {
        if player.level < min_level {
            continue;
        }
        let profile = evaluate_skills(&completed_categories(store, player.id).await?);
        candidates.push(Candidate { player, profile });
    }

    let plan = expedition::plan_expedition(
        request.phase,
        &request.region,
        request.difficulty,
        request.required_skills,
        &candidates,
        Utc::now(),
    );
    store.insert_expedition(&plan).await?;
    info!(
        expedition_id = %plan.id,
        phase = plan.phase,
        region = %plan.region,
        team = plan.team.len(),
        candidates = candidates.len(),
        "expedition planned"
    );
    Ok(plan)
}

/// Record a team member's completion of an expedition.
///
/// # Errors
///
/// Returns [`ServiceError::NotFound`] for an unknown expedition or player,
/// and [`ServiceError::Validation`] when the player is not on the team or
/// has already recorded this expedition.
pub async fn complete_expedition(
    store: &LedgerStore,
    expedition_id: ExpeditionId,
    player_id: PlayerId,
) -> Result<ExpeditionCompletion, ServiceError> {
    let plan = store
        .get_expedition(expedition_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("expedition", expedition_id))?;
    load_player(store, player_id).await?;
    if !plan.team.contains(&player_id) {
        return Err(ServiceError::Validation(format!(
            "player {player_id} is not on expedition {expedition_id}"
        )));
    }

    let rewards = plan.rewards;
    let impact_value = Decimal::from(rewards.impact_credits);
    let write = RewardWrite {
        player_id,
        xp_delta: rewards.xp,
        impact: Some(ImpactLog {
            id: ImpactLogId::new(),
            player_id,
            reference: ImpactReference::Expedition(expedition_id),
            xp_awarded: rewards.xp,
            tokens_awarded: rewards.tokens,
            impact_value,
            breakdown: quest_fund_allocation().to_breakdown(),
            created_at: Utc::now(),
        }),
        mint: mint(player_id, rewards.tokens, sources::expedition(expedition_id))?,
        completion: None,
        once_per_reference: true,
    };
    let applied = apply(store, &write).await?;
    let new_level = applied.player.level;
    info!(%player_id, %expedition_id, xp = rewards.xp, tokens = rewards.tokens, level = new_level, "expedition completed");

    Ok(ExpeditionCompletion {
        expedition_id,
        player_id,
        xp_awarded: rewards.xp,
        tokens_awarded: rewards.tokens,
        impact_value,
        new_level,
        leveled_up: new_level > applied.previous_level,
    })
}

// ---------------------------------------------------------------------------
// Global missions
// ---------------------------------------------------------------------------

/// Create and persist a synchronized global mission.
///
/// # Errors
///
/// Returns [`ServiceError::Validation`] for a blank theme, no regions, a
/// blank or repeated region, or a zero duration.
pub async fn synchronize_global_mission(
    store: &LedgerStore,
    theme: &str,
    regions: Vec<String>,
    duration_days: u32,
) -> Result<GlobalMission, ServiceError> {
    if theme.trim().is_empty() {
        return Err(ServiceError::Validation("theme must not be empty".to_owned()));
    }
    if regions.is_empty() {
        return Err(ServiceError::Validation("at least one region is required".to_owned()));
    }
    if regions.iter().any(|r| r.trim().is_empty()) {
        return Err(ServiceError::Validation("regions must not be blank".to_owned()));
    }
    let unique: BTreeSet<&str> = regions.iter().map(String::as_str).collect();
    if unique.len() != regions.len() {
        return Err(ServiceError::Validation("regions must be distinct".to_owned()));
    }
    if duration_days == 0 {
        return Err(ServiceError::Validation("duration must be at least one day".to_owned()));
    }

    let mission = mission::synchronize_global_mission(theme, regions, duration_days, Utc::now());
    store.insert_mission(&mission).await?;
    info!(
        mission_id = %mission.id,
        theme = %mission.theme,
        regions = mission.regions.len(),
        target = mission.global_impact_target,
        "global mission synchronized"
    );
    Ok(mission)
}

/// Record one region's share of a global mission for a player.
///
/// Writes the impact log and the mint together. The XP figure is recorded
/// on the log but not credited to the player.
///
/// # Errors
///
/// Returns [`ServiceError::NotFound`] for an unknown mission or player, and
/// [`ServiceError::Validation`] for a region outside the mission or a
/// negative local impact.
pub async fn record_global_mission_completion(
    store: &LedgerStore,
    mission_id: MissionId,
    player_id: PlayerId,
    region: &str,
    impact: &MissionImpact,
) -> Result<MissionCompletion, ServiceError> {
    let mission = store
        .get_mission(mission_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("mission", mission_id))?;
    load_player(store, player_id).await?;
    if !mission.includes_region(region) {
        return Err(ServiceError::Validation(format!(
            "region {region} is not part of mission {mission_id}"
        )));
    }
    if impact.local_impact < Decimal::ZERO {
        return Err(ServiceError::Validation(
            "local_impact must not be negative".to_owned(),
        ));
    }

    let reward = mission_reward(impact.local_impact);
    let mut breakdown = mission_fund_split();
    breakdown.documents = Some(impact.documents_created);
    breakdown.partnerships = Some(impact.partnerships_formed);
    breakdown.skills_shared = Some(impact.skills_shared);

    let write = RewardWrite {
        player_id,
        xp_delta: 0,
        impact: Some(ImpactLog {
            id: ImpactLogId::new(),
            player_id,
            reference: ImpactReference::GlobalMission(mission_id),
            xp_awarded: reward.xp,
            tokens_awarded: reward.tokens,
            impact_value: reward.total_impact,
            breakdown,
            created_at: Utc::now(),
        }),
        mint: mint(player_id, reward.tokens, sources::global_mission(mission_id))?,
        completion: None,
        once_per_reference: false,
    };
    apply(store, &write).await?;
    info!(%player_id, %mission_id, region, total_impact = %reward.total_impact, tokens = reward.tokens, "global mission completion recorded");

    Ok(MissionCompletion {
        mission_id,
        player_id,
        region: region.to_owned(),
        total_impact: reward.total_impact,
        xp_awarded: reward.xp,
        tokens_awarded: reward.tokens,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use oneheart_types::{Alignment, Phase, Player};

    use super::*;
    use crate::services::impact::{NewPlayer, create_player};

    async fn player(store: &LedgerStore, name: &str, alignment: Alignment) -> Player {
        create_player(
            store,
            NewPlayer {
                name: name.to_owned(),
                alignment,
                ..NewPlayer::default()
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn fresh_player_status() {
        let store = LedgerStore::memory();
        let alice = player(&store, "Alice", Alignment::Balanced).await;

        let status = status(&store, alice.id).await.unwrap();
        assert_eq!(status.current_phase, Phase::Preparation);
        assert_eq!(status.readiness_score, 14);
        assert_eq!(status.expeditions_completed, 0);
        assert_eq!(status.global_impact_total, Decimal::ZERO);
        assert_eq!(status.next_milestone, "Phase 1 Global Mission");
        assert_eq!(status.skills_profile.recommended_roles, vec!["Apprentice".to_owned()]);
        assert!(status.strongest_skills.is_empty());
    }

    #[tokio::test]
    async fn status_ranks_strongest_skills() {
        use crate::reward::Activity;
        use crate::services::impact::{
            NewQuest, QuestSubmission, assign_quest, complete_quest, create_quest,
        };

        let store = LedgerStore::memory();
        let alice = player(&store, "Alice", Alignment::Balanced).await;
        let research = create_quest(
            &store,
            NewQuest {
                title: "Water survey".to_owned(),
                description: String::new(),
                category: QuestCategory::Research,
                difficulty: 1,
                base_xp: 0,
                base_tokens: 0,
                region_id: "region_bangkok".to_owned(),
                min_level: None,
            },
        )
        .await
        .unwrap();
        for _ in 0..2 {
            assign_quest(&store, alice.id, research.id).await.unwrap();
            complete_quest(
                &store,
                QuestSubmission {
                    player_id: alice.id,
                    quest_id: research.id,
                    proof_url: "https://proof.example/survey".to_owned(),
                    activity: Activity::new(0),
                },
            )
            .await
            .unwrap();
        }

        // technical 40, communication 30, documentation 24, adaptability 20
        let status = status(&store, alice.id).await.unwrap();
        assert_eq!(
            status.strongest_skills,
            vec!["technical", "communication", "documentation", "adaptability"]
        );
    }

    #[tokio::test]
    async fn advancing_awards_bonus() {
        let store = LedgerStore::memory();
        let alice = player(&store, "Alice", Alignment::Balanced).await;

        let advanced = advance(&store, alice.id).await.unwrap();
        assert_eq!(advanced.new_phase, Phase::DomesticTrial);
        assert_eq!(advanced.xp_awarded, 1_000);
        assert_eq!(advanced.tokens_awarded, 100);
        assert_eq!(advanced.new_level, 5);
        assert!(advanced.leveled_up);
        assert_eq!(
            advanced.message,
            "Advanced to Phase 2! You're now ready for global expeditions."
        );
        assert_eq!(store.balance_of(alice.id).await.unwrap(), 100);
        let entries = store.token_entries(alice.id).await.unwrap();
        assert_eq!(
            entries.first().map(|e| e.source.as_str()),
            Some("phase_2_advancement")
        );
    }

    #[tokio::test]
    async fn unknown_player_is_not_found() {
        let store = LedgerStore::memory();
        let ghost = PlayerId::new();
        assert!(matches!(readiness(&store, ghost).await, Err(ServiceError::NotFound { .. })));
        assert!(matches!(skills(&store, ghost).await, Err(ServiceError::NotFound { .. })));
        assert!(matches!(advance(&store, ghost).await, Err(ServiceError::NotFound { .. })));
    }

    #[tokio::test]
    async fn expedition_round_trip() {
        let store = LedgerStore::memory();
        let alice = player(&store, "Alice", Alignment::Balanced).await;
        let bob = player(&store, "Bob", Alignment::Generous).await;

        let plan = plan_expedition(
            &store,
            ExpeditionRequest {
                phase: 1,
                region: "chiang_mai".to_owned(),
                difficulty: 1,
                required_skills: vec!["Scout".to_owned()],
            },
        )
        .await
        .unwrap();
        assert_eq!(plan.team.len(), 2);
        assert!(store.get_expedition(plan.id).await.unwrap().is_some());

        let done = complete_expedition(&store, plan.id, alice.id).await.unwrap();
        assert_eq!(done.xp_awarded, 200);
        assert_eq!(done.tokens_awarded, 20);
        assert_eq!(done.impact_value, Decimal::from(100));
        assert_eq!(done.new_level, 2);

        let again = complete_expedition(&store, plan.id, alice.id).await;
        assert!(matches!(again, Err(ServiceError::Validation(_))));
        assert_eq!(store.balance_of(alice.id).await.unwrap(), 20);

        let status = status(&store, alice.id).await.unwrap();
        assert_eq!(status.expeditions_completed, 1);
        assert_eq!(status.global_impact_total, Decimal::from(100));

        let outsider = player(&store, "Carol", Alignment::Service).await;
        let rejected = complete_expedition(&store, plan.id, outsider.id).await;
        assert!(matches!(rejected, Err(ServiceError::Validation(_))));
        let missing = complete_expedition(&store, ExpeditionId::new(), bob.id).await;
        assert!(matches!(missing, Err(ServiceError::NotFound { entity: "expedition", .. })));
    }

    #[tokio::test]
    async fn mission_completion_logs_and_mints() {
        let store = LedgerStore::memory();
        let alice = player(&store, "Alice", Alignment::Balanced).await;
        let mission = synchronize_global_mission(
            &store,
            "Clean Water",
            vec!["bangkok".to_owned(), "hanoi".to_owned()],
            28,
        )
        .await
        .unwrap();
        assert_eq!(mission.global_impact_target, 1_000);

        let impact = MissionImpact {
            local_impact: Decimal::from(100),
            documents_created: 2,
            partnerships_formed: 1,
            skills_shared: 3,
        };
        let done = record_global_mission_completion(&store, mission.id, alice.id, "hanoi", &impact)
            .await
            .unwrap();
        assert_eq!(done.total_impact, Decimal::from(150));
        assert_eq!(done.xp_awarded, 15);
        assert_eq!(done.tokens_awarded, 30);

        // XP is logged, not credited.
        let reloaded = store.get_player(alice.id).await.unwrap().unwrap();
        assert_eq!(reloaded.xp_total, 0);
        assert_eq!(store.balance_of(alice.id).await.unwrap(), 30);

        let logs = store.impact_logs(alice.id, None).await.unwrap();
        let breakdown = &logs.first().unwrap().breakdown;
        assert_eq!(breakdown.fraction_total(), Decimal::ONE);
        assert_eq!(breakdown.documents, Some(2));

        let elsewhere =
            record_global_mission_completion(&store, mission.id, alice.id, "tokyo", &impact).await;
        assert!(matches!(elsewhere, Err(ServiceError::Validation(_))));

        let negative = MissionImpact {
            local_impact: Decimal::from(-1),
            ..impact
        };
        let rejected =
            record_global_mission_completion(&store, mission.id, alice.id, "hanoi", &negative).await;
        assert!(matches!(rejected, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn mission_input_is_validated() {
        let store = LedgerStore::memory();
        let empty = synchronize_global_mission(&store, "Trees", Vec::new(), 10).await;
        assert!(matches!(empty, Err(ServiceError::Validation(_))));
        let zero = synchronize_global_mission(&store, "Trees", vec!["a".to_owned()], 0).await;
        assert!(matches!(zero, Err(ServiceError::Validation(_))));
        let twice =
            synchronize_global_mission(&store, "Trees", vec!["a".to_owned(), "a".to_owned()], 5).await;
        assert!(matches!(twice, Err(ServiceError::Validation(_))));
    }

    #[test]
    fn catalog_has_four_phases() {
        assert_eq!(phases().len(), 4);
    }
}
