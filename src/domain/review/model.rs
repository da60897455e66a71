//! Review domain entity

use chrono::{DateTime, Utc};

/// Owner's reply to a review
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerResponse {
    pub text: String,
    pub responded_at: DateTime<Utc>,
}

/// A review of a completed booking. One review per booking; the parking
/// space reference is denormalized for aggregation.
#[derive(Debug, Clone)]
pub struct Review {
    pub id: String,
    pub parking_space_id: String,
    pub booking_id: String,
    pub user_id: String,
    /// Integer stars, 1..=5
    pub rating: i32,
    pub comment: String,
    pub images: Vec<String>,
    /// Derived count of helpful votes; source of truth is the vote set
    pub helpful: i32,
    pub response: Option<OwnerResponse>,
    /// Hidden reviews do not count toward the space's rating aggregate
    pub is_visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Review {
    pub fn new(
        parking_space_id: impl Into<String>,
        booking_id: impl Into<String>,
        user_id: impl Into<String>,
        rating: i32,
        comment: impl Into<String>,
        images: Vec<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            parking_space_id: parking_space_id.into(),
            booking_id: booking_id.into(),
            user_id: user_id.into(),
            rating,
            comment: comment.into(),
            images,
            helpful: 0,
            response: None,
            is_visible: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Mean of visible ratings rounded to one decimal place. An empty set
/// resets the aggregate to zero so it always matches the visible reviews.
pub fn aggregate_rating(ratings: &[i32]) -> (f64, u32) {
    if ratings.is_empty() {
        return (0.0, 0);
    }
    let sum: i64 = ratings.iter().map(|r| *r as i64).sum();
    let mean = sum as f64 / ratings.len() as f64;
    ((mean * 10.0).round() / 10.0, ratings.len() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_review_is_visible_with_zero_helpful() {
        let r = Review::new("sp1", "bk1", "u1", 5, "Great spot", vec![]);
        assert!(r.is_visible);
        assert_eq!(r.helpful, 0);
        assert!(r.response.is_none());
    }

    #[test]
    fn aggregate_of_4_5_3_is_4_0() {
        let (avg, count) = aggregate_rating(&[4, 5, 3]);
        assert_eq!(avg, 4.0);
        assert_eq!(count, 3);
    }

    #[test]
    fn aggregate_after_hiding_the_3_is_4_5() {
        let (avg, count) = aggregate_rating(&[4, 5]);
        assert_eq!(avg, 4.5);
        assert_eq!(count, 2);
    }

    #[test]
    fn aggregate_rounds_to_one_decimal() {
        // 4 + 4 + 5 = 13 / 3 = 4.333... -> 4.3
        let (avg, _) = aggregate_rating(&[4, 4, 5]);
        assert_eq!(avg, 4.3);
        // 5 + 4 = 9 / 2 = 4.5 stays exact
        let (avg, _) = aggregate_rating(&[5, 4]);
        assert_eq!(avg, 4.5);
    }

    #[test]
    fn empty_set_resets_aggregate() {
        assert_eq!(aggregate_rating(&[]), (0.0, 0));
    }
}
