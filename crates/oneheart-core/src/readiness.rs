//! Readiness scoring for the Worldwalker journey.
//!
//! Five category scores, each in 0 to 100, are averaged into an overall
//! score that gates the phases.
//!
//! | Category | Score |
//! |----------|-------|
//! | reputation | `min(100, completed * 5)` |
//! | skills | `min(100, level * 10 + xp / 100)` |
//! | experience | `min(100, distinct categories * 20)` |
//! | trust | mean completion score, missing scores count as 0 |
//! | alignment | service 100, community 90, growth 80, otherwise 60 |
//!
//! `overall` is the mean rounded half up.

use std::collections::BTreeSet;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use oneheart_db::CompletedAssignment;
use oneheart_types::{Alignment, Player, ReadinessCategories, ReadinessScore};

use crate::phase::{phase_for_readiness, tier_for_readiness};

const REPUTATION_PER_QUEST: u64 = 5;
const SKILLS_PER_LEVEL: u32 = 10;
const EXPERIENCE_PER_CATEGORY: u64 = 20;

// Recommendation thresholds.
const REPUTATION_FLOOR: u32 = 50;
const SKILLS_FLOOR: u32 = 50;
const EXPERIENCE_FLOOR: u32 = 50;
const TRUST_FLOOR: u32 = 70;
const ALIGNMENT_FLOOR: u32 = 80;

/// Alignment category score.
pub const fn alignment_score(alignment: Alignment) -> u32 {
    match alignment {
        Alignment::Service => 100,
        Alignment::Community => 90,
        Alignment::Growth => 80,
        Alignment::Balanced | Alignment::Generous | Alignment::Other => 60,
    }
}

fn capped(value: Decimal) -> Decimal {
    value.min(Decimal::ONE_HUNDRED)
}

fn count(n: usize) -> u64 {
    u64::try_from(n).unwrap_or(u64::MAX)
}

/// Score the five readiness categories.
pub fn categories(player: &Player, completed: &[CompletedAssignment]) -> ReadinessCategories {
    let reputation = capped(Decimal::from(
        count(completed.len()).saturating_mul(REPUTATION_PER_QUEST),
    ));

    let xp_part = Decimal::from(player.xp_total)
        .checked_div(Decimal::ONE_HUNDRED)
        .unwrap_or(Decimal::ZERO);
    let skills = capped(
        Decimal::from(player.level.saturating_mul(SKILLS_PER_LEVEL)).saturating_add(xp_part),
    );

    let distinct: BTreeSet<_> = completed.iter().map(|c| c.quest.category).collect();
    let experience = capped(Decimal::from(
        count(distinct.len()).saturating_mul(EXPERIENCE_PER_CATEGORY),
    ));

    let score_sum = completed
        .iter()
        .map(|c| Decimal::from(c.assignment.score.unwrap_or(0)))
        .fold(Decimal::ZERO, Decimal::saturating_add);
    let trust_score = score_sum
        .checked_div(Decimal::from(count(completed.len())))
        .unwrap_or(Decimal::ZERO);

    ReadinessCategories {
        reputation,
        skills,
        experience,
        trust_score,
        alignment: Decimal::from(alignment_score(player.alignment)),
    }
}

/// Round the mean of the five categories half up.
pub fn overall_score(categories: &ReadinessCategories) -> u32 {
    let sum = [
        categories.reputation,
        categories.skills,
        categories.experience,
        categories.trust_score,
        categories.alignment,
    ]
    .into_iter()
    .fold(Decimal::ZERO, Decimal::saturating_add);
    sum.checked_div(Decimal::from(5))
        .unwrap_or(Decimal::ZERO)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .unwrap_or(0)
}

/// Improvement hints for weak categories, in fixed order.
pub fn recommendations(categories: &ReadinessCategories) -> Vec<String> {
    let checks = [
        (
            categories.reputation,
            REPUTATION_FLOOR,
            "Complete more community quests to build reputation",
        ),
        (
            categories.skills,
            SKILLS_FLOOR,
            "Increase your level through training missions",
        ),
        (
            categories.experience,
            EXPERIENCE_FLOOR,
            "Try diverse quest categories",
        ),
        (
            categories.trust_score,
            TRUST_FLOOR,
            "Improve proof authenticity scores",
        ),
        (
            categories.alignment,
            ALIGNMENT_FLOOR,
            "Align actions with service and compassion",
        ),
    ];
    checks
        .into_iter()
        .filter(|(score, floor, _)| *score < Decimal::from(*floor))
        .map(|(_, _, hint)| hint.to_owned())
        .collect()
}

/// Assess a player from their completed assignments.
pub fn assess_readiness(player: &Player, completed: &[CompletedAssignment]) -> ReadinessScore {
    let categories = categories(player, completed);
    let overall = overall_score(&categories);
    ReadinessScore {
        overall,
        ready_for_phase: phase_for_readiness(overall),
        tier: tier_for_readiness(overall),
        recommendations: recommendations(&categories),
        categories,
    }
}

#[cfg(test)]
mod tests {
    use oneheart_types::{Phase, QuestCategory, ReadinessTier};

    use super::*;
    use crate::test_support::{completed, player};

    #[test]
    fn fresh_player() {
        let p = player(1, 0, Alignment::Balanced);
        let score = assess_readiness(&p, &[]);
        // (0 + 10 + 0 + 0 + 60) / 5 = 14
        assert_eq!(score.overall, 14);
        assert_eq!(score.ready_for_phase, Phase::Preparation);
        assert_eq!(score.tier, ReadinessTier::NotReady);
        assert_eq!(score.recommendations.len(), 5);
        assert_eq!(
            score.recommendations.first().map(String::as_str),
            Some("Complete more community quests to build reputation")
        );
    }

    #[test]
    fn skills_use_fractional_xp() {
        let p = player(3, 1_250, Alignment::Service);
        let cats = categories(&p, &[]);
        assert_eq!(cats.skills, Decimal::new(425, 1));
        assert_eq!(cats.alignment, Decimal::ONE_HUNDRED);
    }

    #[test]
    fn categories_saturate() {
        let p = player(10, 7_000, Alignment::Community);
        let history: Vec<_> = (0..30)
            .map(|i| {
                let category = QuestCategory::ALL
                    .get(i % QuestCategory::ALL.len())
                    .copied()
                    .unwrap_or(QuestCategory::Cleanup);
                completed(p.id, category, Some(100))
            })
            .collect();
        let score = assess_readiness(&p, &history);
        assert_eq!(score.categories.reputation, Decimal::ONE_HUNDRED);
        assert_eq!(score.categories.skills, Decimal::ONE_HUNDRED);
        assert_eq!(score.categories.experience, Decimal::ONE_HUNDRED);
        assert_eq!(score.categories.trust_score, Decimal::ONE_HUNDRED);
        // (100 * 4 + 90) / 5 = 98
        assert_eq!(score.overall, 98);
        assert_eq!(score.ready_for_phase, Phase::ReturnAndShare);
        assert!(score.recommendations.is_empty());
    }

    #[test]
    fn missing_scores_count_as_zero() {
        let p = player(1, 0, Alignment::Balanced);
        let history = [
            completed(p.id, QuestCategory::Cleanup, Some(90)),
            completed(p.id, QuestCategory::Cleanup, None),
        ];
        let cats = categories(&p, &history);
        assert_eq!(cats.trust_score, Decimal::from(45));
        assert_eq!(cats.experience, Decimal::from(20));
    }

    #[test]
    fn overall_rounds_half_up() {
        let cats = ReadinessCategories {
            reputation: Decimal::from(10),
            skills: Decimal::new(125, 1),
            experience: Decimal::ZERO,
            trust_score: Decimal::ZERO,
            alignment: Decimal::from(60),
        };
        // 82.5 / 5 = 16.5
        assert_eq!(overall_score(&cats), 17);
    }
}
