use opportunity_core::stats::relative_gap;
use opportunity_core::Opportunity;
use serde::{Deserialize, Serialize};

const SIMILARITY_THRESHOLD: f64 = 0.3;
const MAX_COMPARABLES: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparableOpportunity {
    pub opportunity_id: String,
    pub similarity_score: f64,
    pub comparison_points: Vec<String>,
}

/// Finds the closest peers of an opportunity within a pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimilarityMatcher;

impl SimilarityMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Up to three peers with similarity above 0.3, most similar first.
    pub fn find_comparables(&self, subject: &Opportunity, pool: &[Opportunity]) -> Vec<ComparableOpportunity> {
        let mut comparables: Vec<ComparableOpportunity> = pool
            .iter()
            .filter(|other| other.id != subject.id)
            .map(|other| ComparableOpportunity {
                opportunity_id: other.id.clone(),
                similarity_score: self.similarity(subject, other),
                comparison_points: self.comparison_points(subject, other),
            })
            .filter(|c| c.similarity_score > SIMILARITY_THRESHOLD)
            .collect();

        comparables.sort_by(|a, b| b.similarity_score.total_cmp(&a.similarity_score));
        comparables.truncate(MAX_COMPARABLES);
        comparables
    }

    /// Weighted agreement on type, size, investment, competition and timing (0-1).
    pub fn similarity(&self, a: &Opportunity, b: &Opportunity) -> f64 {
        let mut similarity = 0.0;

        if a.opportunity_type == b.opportunity_type {
            similarity += 0.3;
        }
        similarity += (1.0 - relative_gap(a.market_size, b.market_size)) * 0.2;
        similarity += (1.0
            - relative_gap(a.investment_required.max(), b.investment_required.max()))
            * 0.2;
        if a.competition_level == b.competition_level {
            similarity += 0.15;
        }
        similarity += (1.0 - relative_gap(a.time_to_capture, b.time_to_capture)) * 0.15;

        similarity
    }

    pub fn comparison_points(&self, subject: &Opportunity, other: &Opportunity) -> Vec<String> {
        let mut points = Vec::new();

        if subject.opportunity_type == other.opportunity_type {
            points.push(format!("Both are {} opportunities", subject.opportunity_type));
        }

        if subject.market_size > 0.0
            && (subject.market_size - other.market_size).abs() / subject.market_size < 0.3
        {
            points.push("Similar market size and potential".to_string());
        }

        if subject.competition_level == other.competition_level {
            points.push(format!("Comparable competition level ({})", subject.competition_level));
        }

        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{opportunity_with, reference_opportunity};
    use approx::assert_relative_eq;
    use opportunity_core::{CompetitionLevel, OpportunityType};

    #[test]
    fn test_size_term_for_close_markets() {
        let matcher = SimilarityMatcher::new();
        let a = opportunity_with("a", 100.0, 1_000.0, 6.0);
        let mut b = opportunity_with("b", 105.0, 1_000.0, 6.0);
        b.opportunity_type = OpportunityType::Acquisition;
        b.competition_level = CompetitionLevel::High;

        // only size, investment and time terms remain
        let similarity = matcher.similarity(&a, &b);
        let size_term = similarity - 0.2 - 0.15;
        // gap is measured against the larger market: 5 / 105
        assert_relative_eq!(size_term, (1.0 - 5.0 / 105.0) * 0.2, epsilon = 1e-9);
        assert!(size_term > 0.19);
    }

    #[test]
    fn test_identical_records_score_one() {
        let a = reference_opportunity();
        let mut b = reference_opportunity();
        b.id = "other".to_string();
        assert_relative_eq!(SimilarityMatcher::new().similarity(&a, &b), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_denominators_are_neutral() {
        let a = opportunity_with("a", 0.0, 0.0, 0.0);
        let b = opportunity_with("b", 0.0, 0.0, 0.0);
        let similarity = SimilarityMatcher::new().similarity(&a, &b);
        assert!(similarity.is_finite());
        assert_relative_eq!(similarity, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_find_comparables_skips_self_and_sorts() {
        let subject = reference_opportunity();
        let mut close = reference_opportunity();
        close.id = "close".to_string();
        let mut far = opportunity_with("far", 900_000_000.0, 90_000_000.0, 60.0);
        far.opportunity_type = OpportunityType::Partnership;
        far.competition_level = CompetitionLevel::High;
        let mut mid = reference_opportunity();
        mid.id = "mid".to_string();
        mid.opportunity_type = OpportunityType::Expansion;

        let pool = vec![subject.clone(), far, mid, close];
        let comparables = SimilarityMatcher::new().find_comparables(&subject, &pool);

        let ids: Vec<&str> = comparables.iter().map(|c| c.opportunity_id.as_str()).collect();
        assert_eq!(ids, vec!["close", "mid"]);
        assert_eq!(
            comparables[0].comparison_points,
            vec![
                "Both are new_market opportunities".to_string(),
                "Similar market size and potential".to_string(),
                "Comparable competition level (low)".to_string(),
            ]
        );
    }

    #[test]
    fn test_empty_pool() {
        assert!(SimilarityMatcher::new()
            .find_comparables(&reference_opportunity(), &[])
            .is_empty());
    }
}
