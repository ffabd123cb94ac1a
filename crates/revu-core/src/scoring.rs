//! Aggregate score computation.
//!
//! The weighting of individual reviews is a business rule, so it sits behind
//! the [`ScoreAggregator`] trait. The service layer only guarantees the
//! surrounding contract: the aggregator sees kept reviews of kept offerings,
//! and a company with no kept vendor reviews scores exactly 0.0 without the
//! aggregator being consulted.

use crate::entities::Review;

/// Folds a set of vendor reviews into one score.
pub trait ScoreAggregator: Send + Sync {
    fn aggregate(&self, reviews: &[Review]) -> f64;
}

/// Arithmetic mean of score values (POSITIVE = 1, NEUTRAL = 0, NEGATIVE = -1).
///
/// The result lies in `[-1.0, 1.0]`; an empty set yields 0.0.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanScore;

impl ScoreAggregator for MeanScore {
    #[allow(clippy::cast_precision_loss)]
    fn aggregate(&self, reviews: &[Review]) -> f64 {
        if reviews.is_empty() {
            return 0.0;
        }
        let total: i64 = reviews.iter().map(|review| review.score.value()).sum();
        total as f64 / reviews.len() as f64
    }
}

impl<F> ScoreAggregator for F
where
    F: Fn(&[Review]) -> f64 + Send + Sync,
{
    fn aggregate(&self, reviews: &[Review]) -> f64 {
        self(reviews)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{OfferingKind, ReviewerKind, Score};
    use chrono::Utc;

    fn review(score: Score) -> Review {
        let now = Utc::now();
        Review {
            id: 1,
            score,
            content: None,
            vendor_id: 1,
            reviewer_type: ReviewerKind::Company,
            reviewer_id: 2,
            reviewable_type: OfferingKind::Service,
            reviewable_id: 3,
            grant_id: None,
            created_at: now,
            updated_at: now,
            discarded_at: None,
        }
    }

    #[test]
    fn mean_of_empty_is_zero() {
        assert!(MeanScore.aggregate(&[]).abs() < f64::EPSILON);
    }

    #[test]
    fn mean_weights_scores() {
        let reviews = [
            review(Score::Positive),
            review(Score::Positive),
            review(Score::Neutral),
            review(Score::Negative),
        ];
        assert!((MeanScore.aggregate(&reviews) - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn closures_are_aggregators() {
        let count_positive = |reviews: &[Review]| {
            reviews.iter().filter(|r| r.score == Score::Positive).count() as f64
        };
        let reviews = [review(Score::Positive), review(Score::Negative)];
        assert!((count_positive.aggregate(&reviews) - 1.0).abs() < f64::EPSILON);
    }
}
