//! Shared type definitions for the OneHeart impact backend.
//!
//! This crate is the single source of truth for the records the backend
//! stores and the reports it computes. Types flow downstream to
//! `TypeScript` via `ts-rs` for the player dashboard.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for all entity identifiers
//! - [`enums`] -- Closed enumerations (alignment, category, status, phase)
//! - [`structs`] -- Stored entities (players, quests, logs, ledger entries)
//! - [`reports`] -- Rule outputs and Worldwalker plans
//! - [`outcomes`] -- Service-level results

pub mod enums;
pub mod ids;
pub mod outcomes;
pub mod reports;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{
    Alignment, AssignmentStatus, InvalidPhase, Phase, QuestCategory, ReadinessTier, TokenTxType,
};
pub use ids::{
    AssignmentId, ExpeditionId, ImpactLogId, MissionId, PlayerId, QuestId, TransactionId,
};
pub use outcomes::{
    ExpeditionCompletion, HistoryEntry, MissionCompletion, PhaseAdvancement, PlayerHistory,
    PlayerStats, QuestCompletion, RedemptionReceipt, TokenBalance, TransferReceipt,
    WorldwalkerStatus,
};
pub use reports::{
    Checkpoint, ExpeditionPlan, ExpeditionRewards, FundAllocation, GlobalMission, ImpactResult,
    MissionImpact, PhaseInfo, PhaseRewards, ReadinessCategories, ReadinessScore,
    RegionalVariation, RewardMultipliers, SkillProfile, SkillVector,
};
pub use structs::{
    ImpactBreakdown, ImpactLog, ImpactReference, Player, PlayerAttributes, PlayerQuest, Quest,
    QuestRequirements, TokenLedgerEntry,
};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // Files are written to `bindings/` relative to the crate root.
        use ts_rs::TS;

        // IDs
        let _ = crate::ids::PlayerId::export_all();
        let _ = crate::ids::QuestId::export_all();
        let _ = crate::ids::AssignmentId::export_all();
        let _ = crate::ids::ImpactLogId::export_all();
        let _ = crate::ids::TransactionId::export_all();
        let _ = crate::ids::ExpeditionId::export_all();
        let _ = crate::ids::MissionId::export_all();

        // Enums
        let _ = crate::enums::Alignment::export_all();
        let _ = crate::enums::QuestCategory::export_all();
        let _ = crate::enums::AssignmentStatus::export_all();
        let _ = crate::enums::TokenTxType::export_all();
        let _ = crate::enums::ReadinessTier::export_all();

        // Entities
        let _ = crate::structs::Player::export_all();
        let _ = crate::structs::Quest::export_all();
        let _ = crate::structs::PlayerQuest::export_all();
        let _ = crate::structs::ImpactLog::export_all();
        let _ = crate::structs::TokenLedgerEntry::export_all();

        // Reports
        let _ = crate::reports::ImpactResult::export_all();
        let _ = crate::reports::ReadinessScore::export_all();
        let _ = crate::reports::SkillProfile::export_all();
        let _ = crate::reports::ExpeditionPlan::export_all();
        let _ = crate::reports::GlobalMission::export_all();
        let _ = crate::reports::PhaseInfo::export_all();

        // Outcomes
        let _ = crate::outcomes::QuestCompletion::export_all();
        let _ = crate::outcomes::PlayerStats::export_all();
        let _ = crate::outcomes::PlayerHistory::export_all();
        let _ = crate::outcomes::WorldwalkerStatus::export_all();
        let _ = crate::outcomes::PhaseAdvancement::export_all();
        let _ = crate::outcomes::ExpeditionCompletion::export_all();
        let _ = crate::outcomes::MissionCompletion::export_all();
        let _ = crate::outcomes::TokenBalance::export_all();
        let _ = crate::outcomes::TransferReceipt::export_all();
        let _ = crate::outcomes::RedemptionReceipt::export_all();
    }
}
