//! Skill profiling from completed quest categories.
//!
//! Each dimension counts the completed quests that signal it and scales the
//! count by a weight, saturating at 100. Dimensions above 60 suggest a
//! team role; dimensions below 40 are reported as gaps.

use std::collections::BTreeSet;

use oneheart_types::{QuestCategory, SkillProfile, SkillVector};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Ceiling for every dimension.
pub const MAX_SKILL: u32 = 100;

/// A dimension strictly above this suggests a role.
pub const ROLE_THRESHOLD: u32 = 60;

/// A dimension strictly below this is a gap.
pub const GAP_THRESHOLD: u32 = 40;

/// Role suggested when no dimension clears [`ROLE_THRESHOLD`].
pub const FALLBACK_ROLE: &str = "Apprentice";

// ---------------------------------------------------------------------------
// Dimensions
// ---------------------------------------------------------------------------

/// One axis of the skill vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SkillDimension {
    /// Guiding others.
    Leadership,
    /// Teaching.
    Communication,
    /// Handling unfamiliar work.
    Adaptability,
    /// Tools and technology.
    Technical,
    /// Supporting others.
    Compassion,
    /// Recording knowledge.
    Documentation,
}

impl SkillDimension {
    /// All dimensions in report order.
    pub const ALL: [Self; 6] = [
        Self::Leadership,
        Self::Communication,
        Self::Adaptability,
        Self::Technical,
        Self::Compassion,
        Self::Documentation,
    ];

    /// Points per signalling quest.
    pub const fn weight(self) -> u32 {
        match self {
            Self::Leadership | Self::Communication | Self::Compassion => 15,
            Self::Adaptability | Self::Technical => 20,
            Self::Documentation => 12,
        }
    }

    /// Whether a completed quest of `category` signals this dimension.
    ///
    /// Adaptability counts distinct categories instead and never matches.
    pub const fn signalled_by(self, category: QuestCategory) -> bool {
        match self {
            Self::Leadership => matches!(category, QuestCategory::Training),
            Self::Communication | Self::Documentation => {
                matches!(category, QuestCategory::Cultural | QuestCategory::Research)
            }
            Self::Technical => matches!(category, QuestCategory::Research),
            Self::Compassion => matches!(category, QuestCategory::Cleanup | QuestCategory::Sports),
            Self::Adaptability => false,
        }
    }

    /// Field name in [`SkillVector`].
    pub const fn name(self) -> &'static str {
        match self {
            Self::Leadership => "leadership",
            Self::Communication => "communication",
            Self::Adaptability => "adaptability",
            Self::Technical => "technical",
            Self::Compassion => "compassion",
            Self::Documentation => "documentation",
        }
    }

    /// Team role suggested by a strong score.
    pub const fn role(self) -> &'static str {
        match self {
            Self::Leadership => "Team Lead",
            Self::Communication => "Educator",
            Self::Adaptability => "Scout",
            Self::Technical => "Tech Support",
            Self::Compassion => "Care Coordinator",
            Self::Documentation => "Chronicler",
        }
    }

    /// Hint reported for a weak score.
    pub const fn gap_hint(self) -> &'static str {
        match self {
            Self::Leadership => "Leadership - take mentoring roles",
            Self::Communication => "Communication - teach others",
            Self::Adaptability => "Adaptability - try new quest types",
            Self::Technical => "Technical - participate in research",
            Self::Compassion => "Compassion - help vulnerable",
            Self::Documentation => "Documentation - record experiences",
        }
    }

    /// Read this dimension from a vector.
    pub const fn score(self, skills: &SkillVector) -> u32 {
        match self {
            Self::Leadership => skills.leadership,
            Self::Communication => skills.communication,
            Self::Adaptability => skills.adaptability,
            Self::Technical => skills.technical,
            Self::Compassion => skills.compassion,
            Self::Documentation => skills.documentation,
        }
    }
}

fn scaled(count: usize, weight: u32) -> u32 {
    u32::try_from(count)
        .unwrap_or(u32::MAX)
        .saturating_mul(weight)
        .min(MAX_SKILL)
}

/// Compute the skill vector for a list of completed quest categories.
pub fn skill_vector(categories: &[QuestCategory]) -> SkillVector {
    let dimension = |d: SkillDimension| {
        let count = if d == SkillDimension::Adaptability {
            categories.iter().collect::<BTreeSet<_>>().len()
        } else {
            categories.iter().filter(|&&c| d.signalled_by(c)).count()
        };
        scaled(count, d.weight())
    };

    SkillVector {
        leadership: dimension(SkillDimension::Leadership),
        communication: dimension(SkillDimension::Communication),
        adaptability: dimension(SkillDimension::Adaptability),
        technical: dimension(SkillDimension::Technical),
        compassion: dimension(SkillDimension::Compassion),
        documentation: dimension(SkillDimension::Documentation),
    }
}

/// Profile a player from the categories of their completed quests.
pub fn evaluate_skills(categories: &[QuestCategory]) -> SkillProfile {
    let skills = skill_vector(categories);

    let gaps = SkillDimension::ALL
        .into_iter()
        .filter(|d| d.score(&skills) < GAP_THRESHOLD)
        .map(|d| d.gap_hint().to_owned())
        .collect();

    let mut recommended_roles: Vec<String> = SkillDimension::ALL
        .into_iter()
        .filter(|d| d.score(&skills) > ROLE_THRESHOLD)
        .map(|d| d.role().to_owned())
        .collect();
    if recommended_roles.is_empty() {
        recommended_roles.push(FALLBACK_ROLE.to_owned());
    }

    SkillProfile {
        skills,
        gaps,
        recommended_roles,
    }
}

/// Non-zero dimensions, strongest first. Ties keep report order.
pub fn strongest_dimensions(skills: &SkillVector) -> Vec<(SkillDimension, u32)> {
    let mut ranked: Vec<_> = SkillDimension::ALL
        .into_iter()
        .map(|d| (d, d.score(skills)))
        .filter(|&(_, score)| score > 0)
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_history_is_all_gaps() {
        let profile = evaluate_skills(&[]);
        assert_eq!(profile.skills, SkillVector::default());
        assert_eq!(profile.gaps.len(), 6);
        assert_eq!(profile.recommended_roles, vec![FALLBACK_ROLE.to_owned()]);
    }

    #[test]
    fn research_feeds_three_dimensions() {
        let history = [QuestCategory::Research; 4];
        let skills = skill_vector(&history);
        assert_eq!(skills.technical, 80);
        assert_eq!(skills.communication, 60);
        assert_eq!(skills.documentation, 48);
        assert_eq!(skills.adaptability, 20);
        assert_eq!(skills.leadership, 0);

        let profile = evaluate_skills(&history);
        // 60 is not above the role threshold
        assert_eq!(profile.recommended_roles, vec!["Tech Support".to_owned()]);
    }

    #[test]
    fn dimensions_saturate_at_exactly_100() {
        let history = [QuestCategory::Training; 7];
        assert_eq!(skill_vector(&history).leadership, 100);
        let history = [QuestCategory::Training; 200];
        assert_eq!(skill_vector(&history).leadership, 100);
        assert_eq!(skill_vector(&QuestCategory::ALL).adaptability, 100);
    }

    #[test]
    fn roles_follow_report_order() {
        let mut history = vec![QuestCategory::Training; 5];
        history.extend([QuestCategory::Cleanup; 5]);
        let profile = evaluate_skills(&history);
        assert_eq!(
            profile.recommended_roles,
            vec!["Team Lead".to_owned(), "Care Coordinator".to_owned()]
        );
        assert!(!profile.gaps.iter().any(|g| g.starts_with("Leadership")));
        assert!(profile.gaps.iter().any(|g| g.starts_with("Technical")));
    }

    #[test]
    fn strongest_first() {
        let skills = SkillVector {
            technical: 80,
            compassion: 95,
            leadership: 80,
            ..SkillVector::default()
        };
        let ranked = strongest_dimensions(&skills);
        assert_eq!(
            ranked,
            vec![
                (SkillDimension::Compassion, 95),
                (SkillDimension::Leadership, 80),
                (SkillDimension::Technical, 80),
            ]
        );
    }
}
