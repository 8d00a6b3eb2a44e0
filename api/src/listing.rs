use std::sync::Arc;

use crate::config::OpportunitySource;
use crate::database::Opportunity;
use crate::difficulty::{self, Category, CompetitionLevel, DetectedFactor};
use crate::global::Global;

/// An opportunity decorated with its difficulty rating, as served to
/// clients.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RatedOpportunity {
    pub id: String,
    pub title: String,
    pub agency: String,
    pub description: String,
    pub amount_max: i64,
    pub deadline: String,
    pub url: String,
    pub difficulty_score: f64,
    pub difficulty_category: Category,
    pub badge_color: &'static str,
    pub competition_level: CompetitionLevel,
    pub difficulty_factors: Vec<DetectedFactor>,
    pub estimated_time: &'static str,
    pub recommendations: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyFilter {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl DifficultyFilter {
    fn matches(self, score: f64) -> bool {
        match self {
            Self::Beginner => score <= 3.0,
            Self::Intermediate => score > 3.0 && score <= 6.0,
            Self::Advanced => score > 6.0 && score <= 8.0,
            Self::Expert => score > 8.0,
        }
    }
}

fn decorate(opportunity: Opportunity) -> RatedOpportunity {
    let breakdown = difficulty::score(
        &opportunity.title,
        &opportunity.description,
        &opportunity.agency,
        opportunity.amount_max,
    );

    RatedOpportunity {
        id: opportunity.opportunity_id,
        title: opportunity.title,
        agency: opportunity.agency,
        description: opportunity.description,
        amount_max: opportunity.amount_max,
        deadline: opportunity.deadline,
        url: opportunity.url,
        difficulty_score: breakdown.final_score,
        difficulty_category: breakdown.difficulty_category,
        badge_color: breakdown.difficulty_category.badge_color(),
        competition_level: breakdown.competition_level,
        difficulty_factors: breakdown.detected_factors,
        estimated_time: difficulty::estimated_time(breakdown.final_score),
        recommendations: difficulty::recommendations(breakdown.final_score),
    }
}

/// Returns the decorated listing from the configured source, optionally
/// narrowed to a difficulty band.
pub async fn list(
    global: &Arc<Global>,
    filter: Option<DifficultyFilter>,
) -> Result<Vec<RatedOpportunity>, mongodb::error::Error> {
    let opportunities = match global.config().opportunities.source {
        OpportunitySource::Sample => Opportunity::samples(),
        OpportunitySource::Database => Opportunity::find_all(global.database()).await?,
    };

    let mut rated: Vec<_> = opportunities.into_iter().map(decorate).collect();

    if let Some(filter) = filter {
        rated.retain(|opportunity| filter.matches(opportunity.difficulty_score));
    }

    Ok(rated)
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DifficultyDistribution {
    pub entry_level: usize,
    pub beginner_friendly: usize,
    pub intermediate: usize,
    pub advanced: usize,
    pub expert_level: usize,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DifficultyStats {
    pub total_opportunities: usize,
    pub difficulty_distribution: DifficultyDistribution,
    pub average_difficulty: f64,
}

/// Summarizes a decorated listing into the difficulty distribution.
pub fn stats(rated: &[RatedOpportunity]) -> DifficultyStats {
    let scores = || rated.iter().map(|opportunity| opportunity.difficulty_score);

    let average = if rated.is_empty() {
        0.0
    } else {
        scores().sum::<f64>() / rated.len() as f64
    };

    DifficultyStats {
        total_opportunities: rated.len(),
        difficulty_distribution: DifficultyDistribution {
            entry_level: scores().filter(|s| *s <= 2.0).count(),
            beginner_friendly: scores().filter(|s| *s > 2.0 && *s <= 4.0).count(),
            intermediate: scores().filter(|s| *s > 4.0 && *s <= 6.0).count(),
            advanced: scores().filter(|s| *s > 6.0 && *s <= 8.0).count(),
            expert_level: scores().filter(|s| *s > 8.0).count(),
        },
        average_difficulty: average,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rated_samples() -> Vec<RatedOpportunity> {
        Opportunity::samples().into_iter().map(decorate).collect()
    }

    #[test]
    fn samples_are_decorated() {
        let rated = rated_samples();

        assert_eq!(rated.len(), 5);
        for opportunity in &rated {
            assert!(opportunity.difficulty_score >= 1.0);
            assert!(opportunity.difficulty_score <= 10.0);
            assert!(!opportunity.badge_color.is_empty());
        }

        // The NSF flagship sample hits the ceiling.
        let nsf = rated.iter().find(|o| o.id == "1").unwrap();
        assert_eq!(nsf.difficulty_score, 10.0);
        assert_eq!(nsf.difficulty_category, Category::Expert);
        assert_eq!(nsf.competition_level, CompetitionLevel::VeryHigh);
    }

    #[test]
    fn filter_partitions_the_samples() {
        let rated = rated_samples();

        let count = |filter: DifficultyFilter| {
            rated
                .iter()
                .filter(|o| filter.matches(o.difficulty_score))
                .count()
        };

        let total = count(DifficultyFilter::Beginner)
            + count(DifficultyFilter::Intermediate)
            + count(DifficultyFilter::Advanced)
            + count(DifficultyFilter::Expert);

        assert_eq!(total, rated.len());
        assert_eq!(count(DifficultyFilter::Beginner), 2);
        assert_eq!(count(DifficultyFilter::Expert), 3);
    }

    #[test]
    fn stats_cover_the_whole_listing() {
        let rated = rated_samples();
        let stats = stats(&rated);

        assert_eq!(stats.total_opportunities, 5);

        let distribution = &stats.difficulty_distribution;
        assert_eq!(
            distribution.entry_level
                + distribution.beginner_friendly
                + distribution.intermediate
                + distribution.advanced
                + distribution.expert_level,
            5
        );
        assert_eq!(distribution.entry_level, 2);
        assert_eq!(distribution.expert_level, 3);

        assert!(stats.average_difficulty > 1.0);
        assert!(stats.average_difficulty < 10.0);
    }

    #[test]
    fn empty_listing_has_zero_average() {
        let stats = stats(&[]);

        assert_eq!(stats.total_opportunities, 0);
        assert_eq!(stats.average_difficulty, 0.0);
    }
}
