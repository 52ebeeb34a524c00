//! Demo roster for local development.
//!
//! Three players across the early levels, ten quests covering every
//! category, and a handful of open assignments. Seeding only runs against
//! a store with no players.

use chrono::Utc;
use tracing::info;

use oneheart_db::LedgerStore;
use oneheart_types::{Alignment, Player, PlayerAttributes, PlayerId, QuestCategory};

use crate::level::level_for;
use crate::services::ServiceError;
use crate::services::impact::{NewQuest, assign_quest, create_quest};

/// What a seeding run inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    /// Players inserted.
    pub players: usize,
    /// Quests inserted.
    pub quests: usize,
    /// Assignments inserted.
    pub assignments: usize,
}

const fn attributes(strength: u32, wisdom: u32, charisma: u32, constitution: u32) -> PlayerAttributes {
    PlayerAttributes {
        strength,
        wisdom,
        charisma,
        constitution,
    }
}

fn player(name: &str, xp_total: u64, alignment: Alignment, attributes: PlayerAttributes) -> Player {
    Player {
        id: PlayerId::new(),
        name: name.to_owned(),
        level: level_for(xp_total),
        xp_total,
        alignment,
        attributes,
        created_at: Utc::now(),
    }
}

#[allow(clippy::too_many_arguments)]
fn quest(
    title: &str,
    description: &str,
    category: QuestCategory,
    difficulty: u32,
    base_xp: u32,
    base_tokens: u32,
    region: &str,
    min_level: Option<u32>,
) -> NewQuest {
    NewQuest {
        title: title.to_owned(),
        description: description.to_owned(),
        category,
        difficulty,
        base_xp,
        base_tokens,
        region_id: region.to_owned(),
        min_level,
    }
}

fn demo_quests() -> Vec<NewQuest> {
    use QuestCategory::{Cleanup, Cultural, Research, Sports, Training};
    vec![
        quest("Park Cleanup", "Help clean up the local park", Cleanup, 1, 50, 5, "region_bangkok", None),
        quest("Beach Cleanup", "Remove trash from the beach", Cleanup, 2, 75, 8, "region_phuket", Some(2)),
        quest("Basic Coding Workshop", "Learn programming fundamentals", Training, 2, 100, 10, "region_bangkok", None),
        quest("Advanced SQL Training", "Master database design", Training, 3, 150, 15, "region_bangkok", Some(3)),
        quest("Temple Documentation", "Document local temple history", Cultural, 2, 75, 7, "region_chiang_mai", Some(1)),
        quest("Craft Workshop Teaching", "Teach traditional crafts", Cultural, 3, 125, 12, "region_chiang_mai", Some(2)),
        quest("Water Quality Survey", "Test water quality in local streams", Research, 2, 100, 10, "region_ubon", Some(1)),
        quest("Community Health Study", "Conduct health assessment survey", Research, 3, 150, 15, "region_isaan", Some(2)),
        quest("Youth Soccer Training", "Coach local youth soccer team", Sports, 2, 80, 8, "region_bangkok", None),
        quest("Senior Fitness Program", "Lead fitness class for seniors", Sports, 2, 85, 8, "region_bangkok", Some(1)),
    ]
}

/// Insert the demo roster if the store has no players yet.
///
/// Returns `None` when the store was already populated.
///
/// # Errors
///
/// Returns [`ServiceError`] if any insert fails.
pub async fn seed_demo_data(store: &LedgerStore) -> Result<Option<SeedSummary>, ServiceError> {
    if !store.list_players().await?.is_empty() {
        info!("store already has players, skipping demo seed");
        return Ok(None);
    }

    let alice = player("Alice", 0, Alignment::Balanced, attributes(10, 12, 11, 10));
    let bob = player("Bob", 500, Alignment::Generous, attributes(12, 10, 13, 11));
    let carol = player("Carol", 1_200, Alignment::Balanced, attributes(11, 14, 10, 12));
    let players = [alice, bob, carol];
    for p in &players {
        store.insert_player(p).await?;
    }

    let mut quests = Vec::new();
    for input in demo_quests() {
        quests.push(create_quest(store, input).await?);
    }

    // (player index, quest index) pairs of open assignments.
    let plan: [(usize, usize); 6] = [(0, 0), (0, 8), (1, 2), (1, 4), (2, 6), (2, 3)];
    let mut assignments = 0_usize;
    for (p, q) in plan {
        let (Some(player), Some(quest)) = (players.get(p), quests.get(q)) else {
            continue;
        };
        assign_quest(store, player.id, quest.id).await?;
        assignments = assignments.saturating_add(1);
    }

    let summary = SeedSummary {
        players: players.len(),
        quests: quests.len(),
        assignments,
    };
    info!(
        players = summary.players,
        quests = summary.quests,
        assignments = summary.assignments,
        "demo data seeded"
    );
    Ok(Some(summary))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seeds_once() {
        let store = LedgerStore::memory();
        let first = seed_demo_data(&store).await.unwrap().unwrap();
        assert_eq!(first.players, 3);
        assert_eq!(first.quests, 10);
        assert_eq!(first.assignments, 6);

        assert!(seed_demo_data(&store).await.unwrap().is_none());
        assert_eq!(store.list_players().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn seeded_levels_follow_xp() {
        let store = LedgerStore::memory();
        seed_demo_data(&store).await.unwrap();
        for p in store.list_players().await.unwrap() {
            assert_eq!(p.level, level_for(p.xp_total));
        }
    }
}
