//! The Worldwalker phase catalog and readiness gates.

use oneheart_types::{Phase, PhaseInfo, PhaseRewards, ReadinessTier};

/// XP bonus per phase number when a player advances.
pub const ADVANCE_XP_PER_PHASE: u64 = 500;

/// Token bonus per phase number when a player advances.
pub const ADVANCE_TOKENS_PER_PHASE: u64 = 50;

/// Readiness needed to enter `phase`.
pub const fn min_readiness(phase: Phase) -> u32 {
    match phase {
        Phase::Preparation => 30,
        Phase::DomesticTrial => 50,
        Phase::GlobalOperation => 70,
        Phase::ReturnAndShare => 85,
    }
}

/// Highest phase an overall readiness score allows.
///
/// Scores below the Preparation gate still resolve to Preparation.
pub fn phase_for_readiness(overall: u32) -> Phase {
    Phase::ALL
        .into_iter()
        .rev()
        .find(|&phase| overall >= min_readiness(phase))
        .unwrap_or(Phase::Preparation)
}

/// Tier label for an overall readiness score.
pub const fn tier_for_readiness(overall: u32) -> ReadinessTier {
    match overall {
        85.. => ReadinessTier::Master,
        70..=84 => ReadinessTier::Advanced,
        50..=69 => ReadinessTier::Ready,
        30..=49 => ReadinessTier::Beginner,
        _ => ReadinessTier::NotReady,
    }
}

/// Bonus for entering `phase`: 500 XP and 50 tokens per phase number.
pub fn advancement_bonus(phase: Phase) -> PhaseRewards {
    let number = u64::from(phase.number());
    PhaseRewards {
        xp: number.saturating_mul(ADVANCE_XP_PER_PHASE),
        tokens: number.saturating_mul(ADVANCE_TOKENS_PER_PHASE),
    }
}

/// Congratulation text shown on advancement.
pub fn advancement_message(phase: Phase) -> String {
    format!(
        "Advanced to Phase {}! You're now ready for global expeditions.",
        phase.number()
    )
}

/// Descriptive entry for one phase.
pub fn phase_info(phase: Phase) -> PhaseInfo {
    let (name, description, duration, focus, rewards, example) = match phase {
        Phase::Preparation => (
            "Preparation",
            "Build skills and reputation locally",
            "1-2 weeks",
            "Self-development",
            PhaseRewards { xp: 200, tokens: 20 },
            "Complete 5 diverse quests to prove adaptability",
        ),
        Phase::DomesticTrial => (
            "Domestic Trial",
            "Lead regional expeditions within your country",
            "2-4 weeks",
            "Team leadership",
            PhaseRewards { xp: 500, tokens: 50 },
            "Lead 3-person team on week-long regional mission",
        ),
        Phase::GlobalOperation => (
            "Global Operation",
            "Coordinate multi-country expeditions",
            "1 month",
            "Cross-cultural collaboration",
            PhaseRewards {
                xp: 1_000,
                tokens: 100,
            },
            "Coordinate missions across 3 SE Asian countries",
        ),
        Phase::ReturnAndShare => (
            "Return & Share",
            "Document and share knowledge globally",
            "2+ months",
            "Knowledge dissemination",
            PhaseRewards {
                xp: 2_000,
                tokens: 200,
            },
            "Create curriculum from global expeditions",
        ),
    };
    PhaseInfo {
        phase,
        name: name.to_owned(),
        description: description.to_owned(),
        min_readiness: min_readiness(phase),
        duration: duration.to_owned(),
        focus: focus.to_owned(),
        rewards,
        example: example.to_owned(),
    }
}

/// The full catalog in journey order.
pub fn catalog() -> Vec<PhaseInfo> {
    Phase::ALL.into_iter().map(phase_info).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readiness_gates() {
        assert_eq!(phase_for_readiness(0), Phase::Preparation);
        assert_eq!(phase_for_readiness(29), Phase::Preparation);
        assert_eq!(phase_for_readiness(30), Phase::Preparation);
        assert_eq!(phase_for_readiness(49), Phase::Preparation);
        assert_eq!(phase_for_readiness(50), Phase::DomesticTrial);
        assert_eq!(phase_for_readiness(70), Phase::GlobalOperation);
        assert_eq!(phase_for_readiness(84), Phase::GlobalOperation);
        assert_eq!(phase_for_readiness(85), Phase::ReturnAndShare);
        assert_eq!(phase_for_readiness(100), Phase::ReturnAndShare);
    }

    #[test]
    fn tiers() {
        assert_eq!(tier_for_readiness(29), ReadinessTier::NotReady);
        assert_eq!(tier_for_readiness(30), ReadinessTier::Beginner);
        assert_eq!(tier_for_readiness(50), ReadinessTier::Ready);
        assert_eq!(tier_for_readiness(70), ReadinessTier::Advanced);
        assert_eq!(tier_for_readiness(85), ReadinessTier::Master);
    }

    #[test]
    fn bonus_scales_with_phase() {
        assert_eq!(
            advancement_bonus(Phase::DomesticTrial),
            PhaseRewards { xp: 1_000, tokens: 100 }
        );
        assert_eq!(
            advancement_bonus(Phase::ReturnAndShare),
            PhaseRewards { xp: 2_000, tokens: 200 }
        );
    }

    #[test]
    fn catalog_is_ordered() {
        let phases = catalog();
        assert_eq!(phases.len(), 4);
        assert_eq!(phases.first().map(|p| p.min_readiness), Some(30));
        assert_eq!(phases.last().map(|p| p.name.as_str()), Some("Return & Share"));
        assert!(phases.windows(2).all(|w| match w {
            [a, b] => a.min_readiness < b.min_readiness,
            _ => false,
        }));
    }
}
