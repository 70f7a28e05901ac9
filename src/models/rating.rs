use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use super::{ReportReason, ReportStatus, ReviewSortKey, ValidationError, VoteKind};

/// The entity a rating or wishlist entry points at. Exactly one of the two,
/// enforced by construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RatingTarget {
    FoodItem { food_item_id: String },
    Restaurant { restaurant_id: String },
}

impl RatingTarget {
    /// Build a target from the optional pair used on the wire
    pub fn from_ids(
        food_item_id: Option<String>,
        restaurant_id: Option<String>,
    ) -> Result<Self, ValidationError> {
        match (food_item_id, restaurant_id) {
            (Some(id), None) => Ok(RatingTarget::FoodItem { food_item_id: id }),
            (None, Some(id)) => Ok(RatingTarget::Restaurant { restaurant_id: id }),
            _ => Err(ValidationError::AmbiguousTarget),
        }
    }

    pub fn food_item_id(&self) -> Option<&str> {
        match self {
            RatingTarget::FoodItem { food_item_id } => Some(food_item_id),
            RatingTarget::Restaurant { .. } => None,
        }
    }

    pub fn restaurant_id(&self) -> Option<&str> {
        match self {
            RatingTarget::FoodItem { .. } => None,
            RatingTarget::Restaurant { restaurant_id } => Some(restaurant_id),
        }
    }

    /// The referenced id, whichever side it lives on
    pub fn id(&self) -> &str {
        match self {
            RatingTarget::FoodItem { food_item_id } => food_item_id,
            RatingTarget::Restaurant { restaurant_id } => restaurant_id,
        }
    }
}

/// A user's rating of a food item or restaurant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub id: String,
    pub user_id: String,
    #[serde(flatten)]
    pub target: RatingTarget,
    #[serde(rename = "rating")]
    pub value: f64,
    pub review: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Rating {
    pub fn new(user_id: String, target: RatingTarget, value: f64, review: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            target,
            value,
            review,
            created_at: Utc::now(),
            updated_at: None,
        }
    }
}

/// Request body for creating a rating; carries the one-of pair verbatim
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRatingRequest {
    pub food_item_id: Option<String>,
    pub restaurant_id: Option<String>,
    pub rating: f64,
    pub review: Option<String>,
}

impl CreateRatingRequest {
    pub fn target(&self) -> Result<RatingTarget, ValidationError> {
        RatingTarget::from_ids(self.food_item_id.clone(), self.restaurant_id.clone())
    }
}

/// Request body for updating a rating
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRatingRequest {
    pub rating: Option<f64>,
    pub review: Option<String>,
}

/// Filters for the advanced rating listing
#[derive(Debug, Clone, Default)]
pub struct RatingFilters {
    pub food_item_id: Option<String>,
    pub restaurant_id: Option<String>,
    pub min_rating: Option<f64>,
    pub max_rating: Option<f64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub has_response: Option<bool>,
    pub keywords: Vec<String>,
    pub sort_by: ReviewSortKey,
    pub skip: usize,
    pub limit: usize,
}

/// Helpful / unhelpful vote on a rating, one per user per rating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewVote {
    pub id: String,
    pub user_id: String,
    pub rating_id: String,
    pub vote_type: VoteKind,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateVoteRequest {
    pub vote_type: VoteKind,
}

/// Aggregated votes for a rating, with the caller's own vote if any
#[derive(Debug, Clone, Serialize)]
pub struct VoteSummary {
    pub helpful: usize,
    pub unhelpful: usize,
    pub user_vote: Option<VoteKind>,
}

/// A user's report against a rating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewReport {
    pub id: String,
    pub user_id: String,
    pub rating_id: String,
    pub reason: ReportReason,
    pub description: Option<String>,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateReportRequest {
    pub reason: ReportReason,
    pub description: Option<String>,
}

/// Moderation update for a report
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateReportRequest {
    pub status: ReportStatus,
}

/// A single owner/admin response attached to a rating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub id: String,
    pub rating_id: String,
    pub user_id: String,
    pub response_text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateResponseRequest {
    pub response_text: String,
}

/// Word + occurrence count from the review keyword histogram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub word: String,
    pub count: usize,
}

/// Aggregate review analytics for one target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewAnalytics {
    pub total_reviews: usize,
    pub average_rating: f64,
    pub rating_distribution: HashMap<String, usize>,
    pub recent_trend: f64,
    pub most_mentioned_keywords: Vec<KeywordCount>,
}

const STOP_WORDS: [&str; 9] = [
    "the", "and", "was", "for", "this", "that", "with", "very", "just",
];

impl ReviewAnalytics {
    /// Derive analytics from the full rating set of a single target.
    /// `now` is injected so the 30-day trend window is testable.
    pub fn from_ratings(ratings: &[Rating], now: DateTime<Utc>) -> Self {
        let total_reviews = ratings.len();
        if total_reviews == 0 {
            return Self {
                total_reviews: 0,
                average_rating: 0.0,
                rating_distribution: HashMap::new(),
                recent_trend: 0.0,
                most_mentioned_keywords: Vec::new(),
            };
        }

        let average_rating =
            ratings.iter().map(|r| r.value).sum::<f64>() / total_reviews as f64;

        // Whole-star buckets; half-star values count toward totals only
        let mut rating_distribution = HashMap::new();
        for star in 1..=5u32 {
            let count = ratings
                .iter()
                .filter(|r| r.value == f64::from(star))
                .count();
            rating_distribution.insert(star.to_string(), count);
        }

        let cutoff = now - Duration::days(30);
        let recent: Vec<&Rating> = ratings.iter().filter(|r| r.created_at >= cutoff).collect();
        let older: Vec<&Rating> = ratings.iter().filter(|r| r.created_at < cutoff).collect();

        let recent_avg = if recent.is_empty() {
            0.0
        } else {
            recent.iter().map(|r| r.value).sum::<f64>() / recent.len() as f64
        };
        let older_avg = if older.is_empty() {
            0.0
        } else {
            older.iter().map(|r| r.value).sum::<f64>() / older.len() as f64
        };
        let recent_trend = if older.is_empty() {
            0.0
        } else {
            recent_avg - older_avg
        };

        let most_mentioned_keywords = keyword_histogram(
            ratings.iter().filter_map(|r| r.review.as_deref()),
            10,
        );

        Self {
            total_reviews,
            average_rating,
            rating_distribution,
            recent_trend,
            most_mentioned_keywords,
        }
    }
}

/// Count words of three or more letters across review texts, drop stop
/// words, and return the `top` most frequent.
fn keyword_histogram<'a>(texts: impl Iterator<Item = &'a str>, top: usize) -> Vec<KeywordCount> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for text in texts {
        for word in text
            .split(|c: char| !c.is_ascii_alphabetic())
            .filter(|w| w.len() >= 3)
        {
            let word = word.to_lowercase();
            if STOP_WORDS.contains(&word.as_str()) {
                continue;
            }
            *counts.entry(word).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<KeywordCount> = counts
        .into_iter()
        .map(|(word, count)| KeywordCount { word, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
    ranked.truncate(top);
    ranked
}
