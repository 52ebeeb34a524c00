//! Level resolution from cumulative XP.
//!
//! A level is the number of thresholds at or below a player's total XP,
//! capped at [`MAX_LEVEL`]. Because XP only grows, so does the level.
//!
//! | Level | Total XP |
//! |-------|----------|
//! | 1 | 0 |
//! | 2 | 100 |
//! | 3 | 300 |
//! | 4 | 600 |
//! | 5 | 1,000 |
//! | 6 | 1,500 |
//! | 7 | 2,100 |
//! | 8 | 2,800 |
//! | 9 | 3,600 |
//! | 10 | 7,000 |

/// Highest reachable level.
pub const MAX_LEVEL: u32 = 10;

/// Minimum total XP for each level, indexed by `level - 1`.
pub const LEVEL_THRESHOLDS: [u64; 10] = [0, 100, 300, 600, 1_000, 1_500, 2_100, 2_800, 3_600, 7_000];

/// Resolve the level for a cumulative XP total.
///
/// Always in `1..=10`.
pub fn level_for(total_xp: u64) -> u32 {
    let reached = LEVEL_THRESHOLDS
        .iter()
        .take_while(|&&threshold| total_xp >= threshold)
        .count();
    u32::try_from(reached).unwrap_or(MAX_LEVEL).clamp(1, MAX_LEVEL)
}

/// XP still needed to reach the next level, or `None` at the cap.
pub fn xp_to_next_level(total_xp: u64) -> Option<u64> {
    LEVEL_THRESHOLDS
        .iter()
        .find(|&&threshold| threshold > total_xp)
        .map(|&threshold| threshold.saturating_sub(total_xp))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_boundaries() {
        assert_eq!(level_for(0), 1);
        assert_eq!(level_for(99), 1);
        assert_eq!(level_for(100), 2);
        assert_eq!(level_for(3_599), 8);
        assert_eq!(level_for(3_600), 9);
        assert_eq!(level_for(5_000), 9);
        assert_eq!(level_for(6_999), 9);
        assert_eq!(level_for(7_000), 10);
    }

    #[test]
    fn capped_at_ten() {
        assert_eq!(level_for(7_001), MAX_LEVEL);
        assert_eq!(level_for(u64::MAX), MAX_LEVEL);
    }

    #[test]
    fn monotonic_over_range() {
        let mut previous = level_for(0);
        for xp in (0..10_000_u64).step_by(7) {
            let level = level_for(xp);
            assert!(level >= previous, "level dropped at {xp}");
            previous = level;
        }
    }

    #[test]
    fn remaining_xp() {
        assert_eq!(xp_to_next_level(0), Some(100));
        assert_eq!(xp_to_next_level(250), Some(50));
        assert_eq!(xp_to_next_level(6_999), Some(1));
        assert_eq!(xp_to_next_level(7_000), None);
    }
}
