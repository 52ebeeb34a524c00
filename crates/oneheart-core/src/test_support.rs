//! Fixtures shared by the unit tests.

use chrono::Utc;
use oneheart_db::CompletedAssignment;
use oneheart_types::{
    Alignment, AssignmentId, AssignmentStatus, Player, PlayerAttributes, PlayerId, PlayerQuest,
    Quest, QuestCategory, QuestId, QuestRequirements,
};

pub fn player(level: u32, xp_total: u64, alignment: Alignment) -> Player {
    Player {
        id: PlayerId::new(),
        name: "Tester".to_owned(),
        level,
        xp_total,
        alignment,
        attributes: PlayerAttributes::default(),
        created_at: Utc::now(),
    }
}

pub fn quest(category: QuestCategory, difficulty: u32, min_level: Option<u32>) -> Quest {
    Quest {
        id: QuestId::new(),
        title: format!("{category:?} quest"),
        description: String::new(),
        category,
        difficulty,
        base_xp: 0,
        base_tokens: 0,
        region_id: "region_test".to_owned(),
        requirements: QuestRequirements { min_level },
        created_at: Utc::now(),
    }
}

pub fn completed(
    player_id: PlayerId,
    category: QuestCategory,
    score: Option<u32>,
) -> CompletedAssignment {
    let quest = quest(category, 1, None);
    CompletedAssignment {
        assignment: PlayerQuest {
            id: AssignmentId::new(),
            player_id,
            quest_id: quest.id,
            status: AssignmentStatus::Completed,
            score,
            completed_at: Some(Utc::now()),
            proof_url: None,
            assigned_at: Utc::now(),
        },
        quest,
    }
}
