//! Canonical source tags written on ledger entries.
//!
//! Source tags are free-form strings in storage; these helpers keep the
//! ones the backend writes consistent so histories can be grouped by origin.

use core::fmt::Display;

/// Prefix of the sender's leg of a transfer.
pub const TRANSFER_TO_PREFIX: &str = "transfer_to_";

/// Prefix of the recipient's leg of a transfer.
pub const TRANSFER_FROM_PREFIX: &str = "transfer_from_";

/// Mint for a completed quest.
pub fn quest(quest_id: impl Display) -> String {
    format!("quest_{quest_id}")
}

/// Sender side of a transfer.
pub fn transfer_to(recipient: impl Display) -> String {
    format!("{TRANSFER_TO_PREFIX}{recipient}")
}

/// Recipient side of a transfer.
pub fn transfer_from(sender: impl Display) -> String {
    format!("{TRANSFER_FROM_PREFIX}{sender}")
}

/// Tokens spent on a reward.
pub fn redeem(reward: &str) -> String {
    format!("reward_{reward}")
}

/// Mint for a completed expedition.
pub fn expedition(expedition_id: impl Display) -> String {
    format!("expedition_{expedition_id}")
}

/// Mint for a region's share of a global mission.
pub fn global_mission(mission_id: impl Display) -> String {
    format!("global_mission_{mission_id}")
}

/// Mint for entering a new Worldwalker phase.
pub fn phase_advancement(phase: u32) -> String {
    format!("phase_{phase}_advancement")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_prefixed() {
        assert_eq!(phase_advancement(2), "phase_2_advancement");
        assert_eq!(redeem("coffee"), "reward_coffee");
        assert!(quest("abc").starts_with("quest_"));
    }
}
