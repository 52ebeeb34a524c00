//! Global mission synchronization and completion math.

use chrono::{DateTime, TimeDelta, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use oneheart_types::{Checkpoint, GlobalMission, ImpactBreakdown, MissionId, Phase, RegionalVariation};

/// Reward pool attached to every regional variation.
pub const LOCAL_REWARDS: u64 = 250;

/// Impact target contributed by each region.
pub const IMPACT_TARGET_PER_REGION: u64 = 500;

/// Number of checkpoints on every mission timeline.
pub const CHECKPOINTS: u32 = 4;

/// Global missions run in the Global Operation phase.
pub const MISSION_PHASE: Phase = Phase::GlobalOperation;

/// `start` plus `days`, saturating at `start` if the result is out of range.
fn days_after(start: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    start
        .checked_add_signed(TimeDelta::days(i64::from(days)))
        .unwrap_or(start)
}

/// Days between checkpoints: `ceil(duration / 4)`.
pub const fn checkpoint_spacing(duration_days: u32) -> u32 {
    duration_days.div_ceil(CHECKPOINTS)
}

/// Four checkpoints at `i * ceil(duration / 4)` days after `start`.
pub fn checkpoints(start: DateTime<Utc>, duration_days: u32) -> Vec<Checkpoint> {
    let spacing = checkpoint_spacing(duration_days);
    (1..=CHECKPOINTS)
        .map(|sequence| {
            let day = sequence.saturating_mul(spacing);
            Checkpoint {
                sequence,
                day,
                at: days_after(start, day),
            }
        })
        .collect()
}

/// Build a mission across `regions` starting at `now`.
pub fn synchronize_global_mission(
    theme: &str,
    regions: Vec<String>,
    duration_days: u32,
    now: DateTime<Utc>,
) -> GlobalMission {
    let regional_variations = regions
        .iter()
        .map(|region| RegionalVariation {
            region: region.clone(),
            local_objective: format!("{theme} initiative in {region}"),
            local_rewards: LOCAL_REWARDS,
        })
        .collect();
    let region_count = u64::try_from(regions.len()).unwrap_or(u64::MAX);

    GlobalMission {
        id: MissionId::new(),
        theme: theme.to_owned(),
        phase: MISSION_PHASE,
        start_date: now,
        end_date: days_after(now, duration_days),
        global_objective: format!(
            "Connect {} regions through \"{theme}\" initiative",
            regions.len()
        ),
        global_impact_target: region_count.saturating_mul(IMPACT_TARGET_PER_REGION),
        checkpoints: checkpoints(now, duration_days),
        regional_variations,
        regions,
    }
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

/// Rewards computed for one region's mission report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissionReward {
    /// Local impact times the global multiplier.
    pub total_impact: Decimal,
    /// `round(total * 0.1)`.
    pub xp: u64,
    /// `round(total / 5)`.
    pub tokens: u64,
}

/// Global missions are worth half again their local impact.
pub const fn global_multiplier() -> Decimal {
    Decimal::from_parts(15, 0, 0, false, 1)
}

/// Fund split for mission impact: 40% local, 30% national, 30% global.
pub const fn mission_fund_split() -> ImpactBreakdown {
    ImpactBreakdown::split(
        Decimal::from_parts(4, 0, 0, false, 1),
        Decimal::from_parts(3, 0, 0, false, 1),
        Decimal::from_parts(3, 0, 0, false, 1),
    )
}

fn round_half_up(value: Decimal) -> u64 {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .unwrap_or(0)
}

/// Rewards for a non-negative local impact.
pub fn mission_reward(local_impact: Decimal) -> MissionReward {
    let total_impact = local_impact.saturating_mul(global_multiplier());
    let xp = round_half_up(total_impact.saturating_mul(Decimal::new(1, 1)));
    let tokens = round_half_up(
        total_impact
            .checked_div(Decimal::from(5))
            .unwrap_or(Decimal::ZERO),
    );
    MissionReward {
        total_impact,
        xp,
        tokens,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spacing_rounds_up() {
        assert_eq!(checkpoint_spacing(30), 8);
        assert_eq!(checkpoint_spacing(28), 7);
        assert_eq!(checkpoint_spacing(1), 1);
        assert_eq!(checkpoint_spacing(0), 0);
    }

    #[test]
    fn synchronized_mission_shape() {
        let now = Utc::now();
        let regions = vec!["bangkok".to_owned(), "hanoi".to_owned(), "manila".to_owned()];
        let mission = synchronize_global_mission("Clean Water", regions, 30, now);

        assert_eq!(mission.phase, Phase::GlobalOperation);
        assert_eq!(mission.end_date, days_after(now, 30));
        assert_eq!(mission.end_date - mission.start_date, TimeDelta::days(30));
        assert_eq!(mission.global_impact_target, 1_500);
        assert_eq!(
            mission.global_objective,
            "Connect 3 regions through \"Clean Water\" initiative"
        );
        assert_eq!(mission.regional_variations.len(), 3);
        assert_eq!(
            mission.regional_variations.first().map(|v| v.local_objective.as_str()),
            Some("Clean Water initiative in bangkok")
        );
        let days: Vec<u32> = mission.checkpoints.iter().map(|c| c.day).collect();
        assert_eq!(days, vec![8, 16, 24, 32]);
        assert!(mission.includes_region("hanoi"));
        assert!(!mission.includes_region("tokyo"));
    }

    #[test]
    fn completion_math() {
        let reward = mission_reward(Decimal::from(100));
        assert_eq!(reward.total_impact, Decimal::from(150));
        assert_eq!(reward.xp, 15);
        assert_eq!(reward.tokens, 30);
    }

    #[test]
    fn completion_rounds_half_up() {
        // 33 * 1.5 = 49.5, xp 4.95 -> 5, tokens 9.9 -> 10
        let reward = mission_reward(Decimal::from(33));
        assert_eq!(reward.xp, 5);
        assert_eq!(reward.tokens, 10);
        // 5 * 1.5 = 7.5, tokens 1.5 -> 2
        assert_eq!(mission_reward(Decimal::from(5)).tokens, 2);
    }

    #[test]
    fn mission_split_sums_to_one() {
        assert_eq!(mission_fund_split().fraction_total(), Decimal::ONE);
    }
}
