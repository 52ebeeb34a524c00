//! In-memory Ledger Store backend.
//!
//! All state sits behind one [`tokio::sync::Mutex`], so every operation is
//! atomic with respect to every other. Used for tests, demos, and
//! single-process deployments without a database.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use oneheart_ledger::TokenLedger;
use oneheart_types::{
    AssignmentStatus, ExpeditionId, ExpeditionPlan, GlobalMission, ImpactLog, MissionId, Player,
    PlayerId, PlayerQuest, Quest, QuestId, TokenLedgerEntry,
};

use crate::quest_store::CompletedAssignment;
use crate::store::{AppendOutcome, BalanceGuard, RewardApplied, RewardOutcome, RewardWrite};

/// Everything the memory backend holds.
#[derive(Debug, Default)]
struct MemoryState {
    players: BTreeMap<PlayerId, Player>,
    quests: BTreeMap<QuestId, Quest>,
    assignments: Vec<PlayerQuest>,
    impacts: Vec<ImpactLog>,
    tokens: TokenLedger,
    expeditions: BTreeMap<ExpeditionId, ExpeditionPlan>,
    missions: BTreeMap<MissionId, GlobalMission>,
}

/// Cloneable handle to shared in-memory state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn insert_player(&self, player: &Player) {
        self.state
            .lock()
            .await
            .players
            .insert(player.id, player.clone());
    }

    pub(crate) async fn get_player(&self, player_id: PlayerId) -> Option<Player> {
        self.state.lock().await.players.get(&player_id).cloned()
    }

    pub(crate) async fn list_players(&self) -> Vec<Player> {
        let state = self.state.lock().await;
        let mut players: Vec<Player> = state.players.values().cloned().collect();
        players.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        players
    }

    pub(crate) async fn insert_quest(&self, quest: &Quest) {
        self.state
            .lock()
            .await
            .quests
            .insert(quest.id, quest.clone());
    }

    pub(crate) async fn get_quest(&self, quest_id: QuestId) -> Option<Quest> {
        self.state.lock().await.quests.get(&quest_id).cloned()
    }

    pub(crate) async fn get_quests(&self, quest_ids: &[QuestId]) -> Vec<Quest> {
        let state = self.state.lock().await;
        quest_ids
            .iter()
            .filter_map(|id| state.quests.get(id).cloned())
            .collect()
    }

    pub(crate) async fn quests_in_difficulty_range(
        &self,
        min: u32,
        max: u32,
        limit: u32,
    ) -> Vec<Quest> {
        let state = self.state.lock().await;
        let mut quests: Vec<Quest> = state
            .quests
            .values()
            .filter(|q| (min..=max).contains(&q.difficulty))
            .cloned()
            .collect();
        quests.sort_by(|a, b| {
            a.difficulty
                .cmp(&b.difficulty)
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id))
        });
        quests.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        quests
    }

    pub(crate) async fn insert_assignment(&self, assignment: &PlayerQuest) {
        self.state.lock().await.assignments.push(assignment.clone());
    }

    pub(crate) async fn completed_assignments(&self, player_id: PlayerId) -> Vec<CompletedAssignment> {
        let state = self.state.lock().await;
        let mut completed: Vec<CompletedAssignment> = state
            .assignments
            .iter()
            .filter(|a| a.player_id == player_id && a.status == AssignmentStatus::Completed)
            .filter_map(|a| {
                state.quests.get(&a.quest_id).map(|q| CompletedAssignment {
                    assignment: a.clone(),
                    quest: q.clone(),
                })
            })
            .collect();
        completed.sort_by(|a, b| a.assignment.completed_at.cmp(&b.assignment.completed_at));
        completed
    }

    pub(crate) async fn impact_logs(
        &self,
        player_id: PlayerId,
        since: Option<DateTime<Utc>>,
    ) -> Vec<ImpactLog> {
        let state = self.state.lock().await;
        let mut logs: Vec<ImpactLog> = state
            .impacts
            .iter()
            .filter(|l| l.player_id == player_id)
            .filter(|l| since.is_none_or(|s| l.created_at >= s))
            .cloned()
            .collect();
        logs.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        logs
    }

    pub(crate) async fn append_token_entries(
        &self,
        entries: &[TokenLedgerEntry],
        guard: Option<BalanceGuard>,
    ) -> AppendOutcome {
        let mut state = self.state.lock().await;
        let guard = guard.map(|g| (g.player_id, g.required));
        match state.tokens.append_guarded(entries, guard) {
            Ok(()) => AppendOutcome::Appended,
            Err(_) => AppendOutcome::Insufficient {
                balance: guard.map_or(0, |(player_id, _)| state.tokens.balance_of(player_id)),
            },
        }
    }

    pub(crate) async fn balance_of(&self, player_id: PlayerId) -> i64 {
        self.state.lock().await.tokens.balance_of(player_id)
    }

    pub(crate) async fn token_entries(&self, player_id: PlayerId) -> Vec<TokenLedgerEntry> {
        self.state
            .lock()
            .await
            .tokens
            .entries_for(player_id)
            .cloned()
            .collect()
    }

    pub(crate) async fn apply_reward(
        &self,
        write: &RewardWrite,
        resolve_level: fn(u64) -> u32,
    ) -> RewardOutcome {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        let Some(player) = state.players.get_mut(&write.player_id) else {
            return RewardOutcome::PlayerMissing;
        };

        if write.once_per_reference {
            if let Some(log) = &write.impact {
                let seen = state
                    .impacts
                    .iter()
                    .any(|l| l.player_id == write.player_id && l.reference == log.reference);
                if seen {
                    return RewardOutcome::Duplicate;
                }
            }
        }

        let previous_level = player.level;
        player.xp_total = player.xp_total.saturating_add(write.xp_delta);
        player.level = previous_level.max(resolve_level(player.xp_total));
        let player = player.clone();

        if let Some(log) = &write.impact {
            state.impacts.push(log.clone());
        }
        if let Some(mint) = &write.mint {
            state.tokens.append(mint.clone());
        }
        if let Some(done) = &write.completion {
            for assignment in state.assignments.iter_mut().filter(|a| {
                a.player_id == write.player_id
                    && a.quest_id == done.quest_id
                    && a.status == AssignmentStatus::Available
            }) {
                assignment.status = AssignmentStatus::Completed;
                assignment.score = Some(done.score);
                assignment.proof_url = Some(done.proof_url.clone());
                assignment.completed_at = Some(done.completed_at);
            }
        }

        RewardOutcome::Applied(RewardApplied {
            previous_level,
            player,
        })
    }

    pub(crate) async fn insert_expedition(&self, plan: &ExpeditionPlan) {
        self.state
            .lock()
            .await
            .expeditions
            .insert(plan.id, plan.clone());
    }

    pub(crate) async fn get_expedition(&self, expedition_id: ExpeditionId) -> Option<ExpeditionPlan> {
        self.state.lock().await.expeditions.get(&expedition_id).cloned()
    }

    pub(crate) async fn insert_mission(&self, mission: &GlobalMission) {
        self.state
            .lock()
            .await
            .missions
            .insert(mission.id, mission.clone());
    }

    pub(crate) async fn get_mission(&self, mission_id: MissionId) -> Option<GlobalMission> {
        self.state.lock().await.missions.get(&mission_id).cloned()
    }
}
