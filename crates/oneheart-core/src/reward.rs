//! Reward calculation for quest completions.
//!
//! Computes the XP, tokens, and impact credits a completion earns, and how
//! the resulting impact splits across the three funds.
//!
//! The XP chain is evaluated in `f64`, left to right, then floored, so
//! `75 * 1.2 * 0.7` yields 62. Credits and fund shares are exact decimals.
//!
//! # Formula
//!
//! ```text
//! base_xp        = category_base_xp + floor(duration_minutes / 10)
//! final_xp       = floor(base_xp * zone * community * level * authenticity * time)
//! tokens         = floor(final_xp / 10) + (1 if authenticity >= 95)
//! impact_credits = final_xp * (beneficiaries / 5) * outcome_quality
//! ```

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};

use oneheart_types::{FundAllocation, ImpactResult, Player, Quest, QuestCategory, RewardMultipliers};

use crate::services::ServiceError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Level at which the diminishing-returns multiplier applies.
pub const HIGH_LEVEL: u32 = 9;

/// Authenticity score that earns the bonus token.
pub const AUTHENTICITY_BONUS_THRESHOLD: u32 = 95;

/// Minutes of activity per bonus XP point.
const MINUTES_PER_XP: u32 = 10;

/// XP per minted token.
const XP_PER_TOKEN: u64 = 10;

/// Beneficiaries per unit of impact.
const BENEFICIARIES_PER_UNIT: i64 = 5;

/// Base XP for a quest category.
pub const fn category_base_xp(category: QuestCategory) -> u64 {
    match category {
        QuestCategory::Cleanup => 50,
        QuestCategory::Training => 100,
        QuestCategory::Cultural => 75,
        QuestCategory::Research => 150,
        QuestCategory::Sports => 80,
    }
}

/// Outcome quality factor for a category.
pub const fn outcome_quality(category: QuestCategory) -> Decimal {
    match category {
        QuestCategory::Training => Decimal::from_parts(12, 0, 0, false, 1),
        QuestCategory::Cleanup
        | QuestCategory::Cultural
        | QuestCategory::Research
        | QuestCategory::Sports => Decimal::ONE,
    }
}

/// The fixed fund split for quest impact: 50% local, 30% national, 20%
/// global.
pub const fn quest_fund_allocation() -> FundAllocation {
    FundAllocation {
        local: Decimal::from_parts(5, 0, 0, false, 1),
        national: Decimal::from_parts(3, 0, 0, false, 1),
        global: Decimal::from_parts(2, 0, 0, false, 1),
    }
}

// ---------------------------------------------------------------------------
// Activity input
// ---------------------------------------------------------------------------

/// What a player reports alongside a quest completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activity {
    /// Minutes spent.
    pub duration_minutes: u32,
    /// Proof authenticity, 0 to 100.
    pub authenticity_score: u32,
    /// People who benefited, at least one.
    pub beneficiaries: u32,
}

impl Activity {
    /// An activity with full authenticity and a single beneficiary.
    pub const fn new(duration_minutes: u32) -> Self {
        Self {
            duration_minutes,
            authenticity_score: 100,
            beneficiaries: 1,
        }
    }

    /// Check the input ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] when the authenticity score
    /// exceeds 100 or there are no beneficiaries.
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.authenticity_score > 100 {
            return Err(ServiceError::Validation(format!(
                "authenticity_score must be in 0..=100, got {}",
                self.authenticity_score
            )));
        }
        if self.beneficiaries == 0 {
            return Err(ServiceError::Validation(
                "beneficiaries_count must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

/// The multiplier chain for a player and activity.
pub fn multipliers_for(player: &Player, activity: &Activity) -> RewardMultipliers {
    let player_level = if player.level >= HIGH_LEVEL {
        Decimal::new(8, 1)
    } else {
        Decimal::ONE
    };
    RewardMultipliers {
        zone_difficulty: Decimal::ONE,
        community_health: Decimal::new(12, 1),
        player_level,
        authenticity: Decimal::new(i64::from(activity.authenticity_score), 2),
        time_sensitivity: Decimal::ONE,
    }
}

/// `floor(base_xp * zone * community * level * authenticity * time)` in
/// binary floating point, multiplied left to right.
fn scaled_xp(base_xp: u64, player: &Player, activity: &Activity) -> u64 {
    let player_level = if player.level >= HIGH_LEVEL { 0.8 } else { 1.0 };
    let chain = [
        1.0,
        1.2,
        player_level,
        f64::from(activity.authenticity_score) / 100.0,
        1.0,
    ];
    let base = u32::try_from(base_xp).map_or(f64::from(u32::MAX), f64::from);
    let scaled = chain.iter().fold(base, |acc, m| acc * m);
    Decimal::from_f64(scaled.floor())
        .and_then(|xp| xp.to_u64())
        .unwrap_or(0)
}

/// Evaluate a quest completion. Pure and deterministic.
pub fn compute_impact(player: &Player, quest: &Quest, activity: &Activity) -> ImpactResult {
    let base_xp = category_base_xp(quest.category)
        .saturating_add(u64::from(
            activity
                .duration_minutes
                .checked_div(MINUTES_PER_XP)
                .unwrap_or(0),
        ));

    let multipliers = multipliers_for(player, activity);
    let final_xp = scaled_xp(base_xp, player, activity);

    let bonus = u64::from(activity.authenticity_score >= AUTHENTICITY_BONUS_THRESHOLD);
    let tokens = final_xp
        .checked_div(XP_PER_TOKEN)
        .unwrap_or(0)
        .saturating_add(bonus);

    let reach = Decimal::from(activity.beneficiaries)
        .checked_div(Decimal::from(BENEFICIARIES_PER_UNIT))
        .unwrap_or(Decimal::ZERO);
    let impact_credits = Decimal::from(final_xp)
        .saturating_mul(reach)
        .saturating_mul(outcome_quality(quest.category));

    ImpactResult {
        base_xp,
        final_xp,
        tokens,
        impact_credits,
        multipliers,
        fund_allocation: quest_fund_allocation(),
    }
}

#[cfg(test)]
mod tests {
    use oneheart_types::Alignment;

    use super::*;
    use crate::test_support;

    fn player(level: u32) -> Player {
        test_support::player(level, 0, Alignment::Balanced)
    }

    fn quest(category: QuestCategory) -> Quest {
        test_support::quest(category, 1, None)
    }

    #[test]
    fn training_worked_example() {
        let result = compute_impact(&player(1), &quest(QuestCategory::Training), &Activity::new(45));
        assert_eq!(result.base_xp, 104);
        assert_eq!(result.final_xp, 124);
        assert_eq!(result.tokens, 13);
        assert_eq!(result.impact_credits, Decimal::new(2976, 2));
    }

    #[test]
    fn high_level_diminishing_returns() {
        let quest = quest(QuestCategory::Cleanup);
        let low = compute_impact(&player(8), &quest, &Activity::new(0));
        let high = compute_impact(&player(9), &quest, &Activity::new(0));
        // 50 * 1.2 = 60, 50 * 1.2 * 0.8 = 48
        assert_eq!(low.final_xp, 60);
        assert_eq!(high.final_xp, 48);
    }

    #[test]
    fn authenticity_scales_and_gates_bonus() {
        let quest = quest(QuestCategory::Research);
        let activity = Activity {
            duration_minutes: 0,
            authenticity_score: 94,
            beneficiaries: 1,
        };
        let result = compute_impact(&player(1), &quest, &activity);
        // 150 * 1.2 * 0.94 = 169.2
        assert_eq!(result.final_xp, 169);
        assert_eq!(result.tokens, 16);

        let bonus = Activity {
            authenticity_score: 95,
            ..activity
        };
        let result = compute_impact(&player(1), &quest, &bonus);
        // 150 * 1.2 * 0.95 = 171
        assert_eq!(result.tokens, 18);
    }

    #[test]
    fn xp_chain_uses_binary_floating_point() {
        let partial = |authenticity_score| Activity {
            duration_minutes: 0,
            authenticity_score,
            beneficiaries: 1,
        };

        // 75 * 1.2 * 0.7 is 62.999... in f64
        let cultural = compute_impact(&player(1), &quest(QuestCategory::Cultural), &partial(70));
        assert_eq!(cultural.final_xp, 62);
        assert_eq!(cultural.tokens, 6);

        // 150 * 1.2 * 0.35 is 62.999... in f64
        let research = compute_impact(&player(1), &quest(QuestCategory::Research), &partial(35));
        assert_eq!(research.final_xp, 62);

        // 150 * 1.2 * 0.7 is 125.999... in f64
        let research = compute_impact(&player(1), &quest(QuestCategory::Research), &partial(70));
        assert_eq!(research.final_xp, 125);
        assert_eq!(research.tokens, 12);
    }

    #[test]
    fn zero_authenticity_earns_nothing() {
        let activity = Activity {
            duration_minutes: 120,
            authenticity_score: 0,
            beneficiaries: 3,
        };
        let result = compute_impact(&player(1), &quest(QuestCategory::Sports), &activity);
        assert_eq!(result.final_xp, 0);
        assert_eq!(result.tokens, 0);
        assert_eq!(result.impact_credits, Decimal::ZERO);
    }

    #[test]
    fn fund_allocation_sums_to_one() {
        for category in QuestCategory::ALL {
            let result = compute_impact(&player(3), &quest(category), &Activity::new(30));
            assert_eq!(result.fund_allocation.to_breakdown().fraction_total(), Decimal::ONE);
        }
    }

    #[test]
    fn deterministic() {
        let player = player(4);
        let quest = quest(QuestCategory::Cultural);
        let activity = Activity::new(75);
        assert_eq!(
            compute_impact(&player, &quest, &activity),
            compute_impact(&player, &quest, &activity)
        );
    }

    #[test]
    fn validation_rejects_out_of_range() {
        assert!(Activity::new(10).validate().is_ok());
        let bad_score = Activity {
            authenticity_score: 101,
            ..Activity::new(10)
        };
        assert!(matches!(bad_score.validate(), Err(ServiceError::Validation(_))));
        let nobody = Activity {
            beneficiaries: 0,
            ..Activity::new(10)
        };
        assert!(matches!(nobody.validate(), Err(ServiceError::Validation(_))));
    }
}
