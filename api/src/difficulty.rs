//! Grant difficulty rating.
//!
//! Scores an opportunity from 1.0 to 10.0 by looking for known
//! requirement keywords in its title and description, then applying
//! agency- and award-size modifiers. The score is informational; nothing
//! gates on it.

struct Factor {
    name: &'static str,
    patterns: &'static [&'static str],
    impact: f64,
    description: &'static str,
}

// Patterns are matched as substrings of the lowercased title+description;
// each factor counts at most once.
const FACTORS: &[Factor] = &[
    // Partnership requirements
    Factor {
        name: "university_required",
        patterns: &[
            "university partnership",
            "academic institution",
            "higher education",
            "research university",
        ],
        impact: 3.0,
        description: "Requires university partnership",
    },
    Factor {
        name: "government_endorsement",
        patterns: &["governor", "state endorsement", "mayor", "legislative support"],
        impact: 2.5,
        description: "Requires government official endorsement",
    },
    Factor {
        name: "multi_organization",
        patterns: &["consortium", "coalition", "multiple organizations", "partnership of"],
        impact: 2.0,
        description: "Requires multiple organizational partnerships",
    },
    // Experience and track record
    Factor {
        name: "prior_federal_experience",
        patterns: &[
            "prior federal",
            "previous awards",
            "demonstrated experience",
            "track record",
        ],
        impact: 2.5,
        description: "Requires prior federal grant experience",
    },
    Factor {
        name: "specialized_expertise",
        patterns: &["specialized", "expert", "advanced degree", "certification required"],
        impact: 2.0,
        description: "Requires specialized expertise or credentials",
    },
    // Financial requirements
    Factor {
        name: "matching_funds",
        patterns: &["matching funds", "cost share", "match required", "% match"],
        impact: 1.5,
        description: "Requires matching funds or cost-sharing",
    },
    Factor {
        name: "large_budget",
        patterns: &["$10,000,000", "$5,000,000", "multi-million"],
        impact: 1.0,
        description: "Large budget requires extensive planning",
    },
    // Technical complexity
    Factor {
        name: "research_component",
        patterns: &["research", "evaluation", "data collection", "study design"],
        impact: 1.5,
        description: "Includes research or evaluation components",
    },
    Factor {
        name: "regulatory_compliance",
        patterns: &["hipaa", "ferpa", "irb", "compliance", "regulatory"],
        impact: 1.5,
        description: "Complex regulatory compliance requirements",
    },
    // Documentation burden
    Factor {
        name: "extensive_documentation",
        patterns: &["detailed budget", "work plan", "timeline", "deliverables"],
        impact: 1.0,
        description: "Extensive documentation requirements",
    },
    Factor {
        name: "letters_of_support",
        patterns: &["letters of support", "endorsement letters", "commitment letters"],
        impact: 0.8,
        description: "Multiple letters of support required",
    },
    // Application process
    Factor {
        name: "multi_stage",
        patterns: &["two-stage", "preliminary", "concept paper", "pre-application"],
        impact: 0.5,
        description: "Multi-stage application process",
    },
    Factor {
        name: "competitive_priority",
        patterns: &["competitive priority", "absolute priority", "invitational priority"],
        impact: 1.0,
        description: "Complex priority point system",
    },
];

const AGENCY_MODIFIERS: &[(&str, f64)] = &[
    ("National Science Foundation", 1.5),
    ("National Institutes of Health", 1.4),
    ("Department of Defense", 1.3),
    ("Department of Energy", 1.2),
    ("Department of Education", 1.0),
    ("Department of Health and Human Services", 1.1),
    ("Environmental Protection Agency", 1.2),
    ("Department of Housing and Urban Development", 0.9),
    ("Department of Agriculture", 0.8),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompetitionLevel {
    VeryHigh,
    High,
    Medium,
    Low,
}

impl CompetitionLevel {
    pub fn from_amount(amount_max: i64) -> Self {
        if amount_max >= 5_000_000 {
            Self::VeryHigh
        } else if amount_max >= 1_000_000 {
            Self::High
        } else if amount_max >= 100_000 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn modifier(self) -> f64 {
        match self {
            Self::VeryHigh => 1.5,
            Self::High => 1.2,
            Self::Medium => 1.0,
            Self::Low => 0.8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Category {
    #[serde(rename = "Expert Level")]
    Expert,
    #[serde(rename = "Advanced")]
    Advanced,
    #[serde(rename = "Intermediate")]
    Intermediate,
    #[serde(rename = "Beginner-Friendly")]
    BeginnerFriendly,
    #[serde(rename = "Entry Level")]
    EntryLevel,
}

impl Category {
    pub fn from_score(score: f64) -> Self {
        if score >= 8.0 {
            Self::Expert
        } else if score >= 6.0 {
            Self::Advanced
        } else if score >= 4.0 {
            Self::Intermediate
        } else if score >= 2.0 {
            Self::BeginnerFriendly
        } else {
            Self::EntryLevel
        }
    }

    /// CSS class used by the frontend badge.
    pub fn badge_color(self) -> &'static str {
        match self {
            Self::Expert => "bg-red-500",
            Self::Advanced => "bg-orange-500",
            Self::Intermediate => "bg-yellow-500",
            Self::BeginnerFriendly => "bg-green-500",
            Self::EntryLevel => "bg-blue-500",
        }
    }
}

/// Estimated application development time for a given score.
pub fn estimated_time(score: f64) -> &'static str {
    if score >= 8.0 {
        "6-12 months"
    } else if score >= 6.0 {
        "3-6 months"
    } else if score >= 4.0 {
        "1-3 months"
    } else {
        "2-4 weeks"
    }
}

/// Fixed preparation advice per difficulty tier.
pub fn recommendations(score: f64) -> &'static [&'static str] {
    if score >= 8.0 {
        &[
            "Consider partnering with a university research institution",
            "Ensure you have prior federal grant experience",
            "Prepare for extensive regulatory compliance requirements",
            "Plan for 6-12 months application development time",
        ]
    } else if score >= 6.0 {
        &[
            "Gather letters of support early in the process",
            "Prepare detailed budget justification",
            "Consider hiring grant writing consultant",
            "Plan for 3-6 months application development time",
        ]
    } else if score >= 4.0 {
        &[
            "Focus on clear project goals and outcomes",
            "Prepare basic budget and timeline",
            "Gather organizational capacity documentation",
            "Plan for 1-3 months application development time",
        ]
    } else {
        &[
            "This is a beginner-friendly opportunity",
            "Focus on clear problem statement and solution",
            "Basic organizational information required",
            "Can typically be completed in 2-4 weeks",
        ]
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct DetectedFactor {
    pub factor: &'static str,
    pub description: &'static str,
    pub impact: f64,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct Breakdown {
    pub final_score: f64,
    pub detected_factors: Vec<DetectedFactor>,
    pub agency_modifier: f64,
    pub competition_level: CompetitionLevel,
    pub competition_modifier: f64,
    pub difficulty_category: Category,
}

/// Scores an opportunity. Deterministic for a given input.
pub fn score(title: &str, description: &str, agency: &str, amount_max: i64) -> Breakdown {
    let full_text = format!("{} {}", title.to_lowercase(), description.to_lowercase());

    let mut base_score = 1.0;
    let mut detected_factors = Vec::new();

    for factor in FACTORS {
        if factor.patterns.iter().any(|p| full_text.contains(p)) {
            base_score += factor.impact;
            detected_factors.push(DetectedFactor {
                factor: factor.name,
                description: factor.description,
                impact: factor.impact,
            });
        }
    }

    let agency_modifier = AGENCY_MODIFIERS
        .iter()
        .find(|(name, _)| *name == agency)
        .map(|(_, modifier)| *modifier)
        .unwrap_or(1.0);

    let competition_level = CompetitionLevel::from_amount(amount_max);
    let competition_modifier = competition_level.modifier();

    let final_score = (base_score * agency_modifier * competition_modifier).clamp(1.0, 10.0);
    // One decimal, matching what the badges display.
    let final_score = (final_score * 10.0).round() / 10.0;

    Breakdown {
        final_score,
        detected_factors,
        agency_modifier,
        competition_level,
        competition_modifier,
        difficulty_category: Category::from_score(final_score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_scores_the_floor() {
        let breakdown = score("Small Grant", "Nothing remarkable here.", "Unknown Agency", 10_000);

        assert_eq!(breakdown.final_score, 1.0);
        assert!(breakdown.detected_factors.is_empty());
        assert_eq!(breakdown.agency_modifier, 1.0);
        assert_eq!(breakdown.competition_level, CompetitionLevel::Low);
        assert_eq!(breakdown.difficulty_category, Category::EntryLevel);
    }

    #[test]
    fn heavy_requirements_clamp_at_ten() {
        let breakdown = score(
            "DOD Cybersecurity Research Consortium",
            "Multi-organization consortium for cybersecurity research requiring security \
             clearance, specialized expertise, and demonstrated track record.",
            "Department of Defense",
            15_000_000,
        );

        assert_eq!(breakdown.final_score, 10.0);
        assert_eq!(breakdown.competition_level, CompetitionLevel::VeryHigh);
        assert_eq!(breakdown.difficulty_category, Category::Expert);
    }

    #[test]
    fn community_grant_scores_entry_level() {
        let breakdown = score(
            "EPA Environmental Justice Community Grants",
            "Small grants for community-based environmental justice initiatives requiring \
             letters of support from community leaders.",
            "Environmental Protection Agency",
            50_000,
        );

        // 1.0 + 0.8 letters of support, * 1.2 EPA, * 0.8 low competition
        assert_eq!(breakdown.final_score, 1.7);
        assert_eq!(breakdown.detected_factors.len(), 1);
        assert_eq!(breakdown.detected_factors[0].factor, "letters_of_support");
        assert_eq!(breakdown.difficulty_category, Category::EntryLevel);
    }

    #[test]
    fn factors_count_once() {
        // "detailed budget" and "work plan" are both extensive_documentation.
        let breakdown = score(
            "Grant",
            "Needs a detailed budget and a work plan.",
            "Unknown Agency",
            150_000,
        );

        assert_eq!(breakdown.detected_factors.len(), 1);
        assert_eq!(breakdown.final_score, 2.0);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let with_upper = score("Grant", "IRB approval required.", "Unknown Agency", 150_000);
        let with_lower = score("Grant", "irb approval required.", "Unknown Agency", 150_000);

        assert_eq!(with_upper.final_score, with_lower.final_score);
        assert_eq!(with_upper.detected_factors.len(), 1);
        assert_eq!(with_upper.detected_factors[0].factor, "regulatory_compliance");
    }

    #[test]
    fn competition_levels_by_amount() {
        assert_eq!(CompetitionLevel::from_amount(5_000_000), CompetitionLevel::VeryHigh);
        assert_eq!(CompetitionLevel::from_amount(4_999_999), CompetitionLevel::High);
        assert_eq!(CompetitionLevel::from_amount(1_000_000), CompetitionLevel::High);
        assert_eq!(CompetitionLevel::from_amount(999_999), CompetitionLevel::Medium);
        assert_eq!(CompetitionLevel::from_amount(100_000), CompetitionLevel::Medium);
        assert_eq!(CompetitionLevel::from_amount(99_999), CompetitionLevel::Low);
        assert_eq!(CompetitionLevel::from_amount(0), CompetitionLevel::Low);
    }

    #[test]
    fn categories_by_score() {
        assert_eq!(Category::from_score(10.0), Category::Expert);
        assert_eq!(Category::from_score(8.0), Category::Expert);
        assert_eq!(Category::from_score(7.9), Category::Advanced);
        assert_eq!(Category::from_score(6.0), Category::Advanced);
        assert_eq!(Category::from_score(4.0), Category::Intermediate);
        assert_eq!(Category::from_score(2.0), Category::BeginnerFriendly);
        assert_eq!(Category::from_score(1.0), Category::EntryLevel);
    }

    #[test]
    fn times_and_recommendations_follow_tiers() {
        assert_eq!(estimated_time(9.0), "6-12 months");
        assert_eq!(estimated_time(6.5), "3-6 months");
        assert_eq!(estimated_time(4.2), "1-3 months");
        assert_eq!(estimated_time(1.5), "2-4 weeks");

        assert_eq!(recommendations(9.0).len(), 4);
        assert_eq!(
            recommendations(1.5)[0],
            "This is a beginner-friendly opportunity"
        );
    }

    #[test]
    fn scoring_is_deterministic() {
        let first = score("Grant", "research consortium", "Department of Energy", 2_000_000);
        let second = score("Grant", "research consortium", "Department of Energy", 2_000_000);

        assert_eq!(first.final_score, second.final_score);
        assert_eq!(first.detected_factors.len(), second.detected_factors.len());
    }
}
