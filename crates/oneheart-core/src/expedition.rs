//! Expedition planning and team selection.
//!
//! Every phase has a fixed team size, duration, and reward row. Candidates
//! are scored `level * 10 + 20 * matched roles` and the best `team_size`
//! are selected. Ties go to the smaller player id so the same roster always
//! produces the same team.

use std::cmp::Reverse;

use chrono::{DateTime, Utc};

use oneheart_types::{ExpeditionId, ExpeditionPlan, ExpeditionRewards, Player, PlayerId, SkillProfile};

const LEVEL_WEIGHT: u64 = 10;
const ROLE_MATCH_WEIGHT: u64 = 20;

/// Size, length, and rewards for an expedition of one phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseParameters {
    /// Maximum members.
    pub team_size: u32,
    /// Planned length in days.
    pub duration_days: u32,
    /// Rewards per member.
    pub rewards: ExpeditionRewards,
}

const fn params(team_size: u32, duration_days: u32, xp: u64, tokens: u64, credits: u64) -> PhaseParameters {
    PhaseParameters {
        team_size,
        duration_days,
        rewards: ExpeditionRewards {
            xp,
            tokens,
            impact_credits: credits,
        },
    }
}

/// Parameters for a phase number. Unknown numbers use phase 1's row.
pub const fn phase_parameters(phase: u32) -> PhaseParameters {
    match phase {
        2 => params(5, 14, 500, 50, 250),
        3 => params(10, 30, 1_000, 100, 500),
        4 => params(20, 60, 2_000, 200, 1_000),
        _ => params(3, 7, 200, 20, 100),
    }
}

/// Lowest level accepted for a difficulty.
pub const fn min_level_for(difficulty: u32) -> u32 {
    let floor = difficulty.saturating_sub(1);
    if floor < 1 { 1 } else { floor }
}

/// A player considered for a team, with their current skill profile.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// The player.
    pub player: Player,
    /// Their skill profile.
    pub profile: SkillProfile,
}

/// Fit score of a candidate for the requested roles.
pub fn candidate_score(candidate: &Candidate, required_skills: &[String]) -> u64 {
    let matched = required_skills
        .iter()
        .filter(|skill| candidate.profile.recommended_roles.contains(skill))
        .count();
    u64::from(candidate.player.level)
        .saturating_mul(LEVEL_WEIGHT)
        .saturating_add(u64::try_from(matched).unwrap_or(u64::MAX).saturating_mul(ROLE_MATCH_WEIGHT))
}

/// Pick up to `team_size` members, best score first.
///
/// Candidates below the difficulty's minimum level are ignored.
pub fn select_team(
    candidates: &[Candidate],
    difficulty: u32,
    required_skills: &[String],
    team_size: u32,
) -> Vec<PlayerId> {
    let min_level = min_level_for(difficulty);
    let mut scored: Vec<(u64, PlayerId)> = candidates
        .iter()
        .filter(|c| c.player.level >= min_level)
        .map(|c| (candidate_score(c, required_skills), c.player.id))
        .collect();
    scored.sort_by_key(|&(score, id)| (Reverse(score), id));
    scored
        .into_iter()
        .take(usize::try_from(team_size).unwrap_or(usize::MAX))
        .map(|(_, id)| id)
        .collect()
}

/// Objectives for an expedition.
pub fn objectives(phase: u32, region: &str) -> Vec<String> {
    vec![
        format!("Complete Phase {phase} missions in {region}"),
        "Document cultural practices".to_owned(),
        "Build local partnerships".to_owned(),
        "Share knowledge globally".to_owned(),
    ]
}

/// Build an expedition plan from a candidate pool.
pub fn plan_expedition(
    phase: u32,
    region: &str,
    difficulty: u32,
    required_skills: Vec<String>,
    candidates: &[Candidate],
    now: DateTime<Utc>,
) -> ExpeditionPlan {
    let parameters = phase_parameters(phase);
    let team = select_team(candidates, difficulty, &required_skills, parameters.team_size);
    ExpeditionPlan {
        id: ExpeditionId::new(),
        phase,
        region: region.to_owned(),
        difficulty,
        required_skills,
        team,
        team_size: parameters.team_size,
        duration_days: parameters.duration_days,
        objectives: objectives(phase, region),
        rewards: parameters.rewards,
        created_at: now,
    }
}
