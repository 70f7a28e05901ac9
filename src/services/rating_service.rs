use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::models::{
    AuthUser, CreateRatingRequest, CreateReportRequest, CreateResponseRequest, CreateVoteRequest,
    Rating, RatingFilters, RatingTarget, ReportStatus, ReviewAnalytics, ReviewReport,
    ReviewResponse, ReviewSortKey, ReviewVote, ServiceError, ServiceResult, UpdateRatingRequest,
    UpdateReportRequest, Validate, VoteKind,
};
use crate::repositories::{
    FoodItemRepository, RatingRepository, RestaurantRepository, ReviewRepository,
};

/// Service for ratings and the review engagement hanging off them.
/// Every rating write synchronously recomputes the target's derived
/// average_rating and rating_count by rescanning its ratings.
pub struct RatingService {
    ratings: Arc<dyn RatingRepository>,
    reviews: Arc<dyn ReviewRepository>,
    food_items: Arc<dyn FoodItemRepository>,
    restaurants: Arc<dyn RestaurantRepository>,
}

impl RatingService {
    pub fn new(
        ratings: Arc<dyn RatingRepository>,
        reviews: Arc<dyn ReviewRepository>,
        food_items: Arc<dyn FoodItemRepository>,
        restaurants: Arc<dyn RestaurantRepository>,
    ) -> Self {
        Self {
            ratings,
            reviews,
            food_items,
            restaurants,
        }
    }

    /// Create a rating for a food item or restaurant. One per (user, target).
    #[instrument(skip(self, request), fields(caller = %caller.username))]
    pub async fn create_rating(
        &self,
        request: CreateRatingRequest,
        caller: &AuthUser,
    ) -> ServiceResult<Rating> {
        request.validate()?;
        let target = request.target()?;

        self.ensure_target_exists(&target).await?;

        if self
            .ratings
            .find_by_user_and_target(&caller.id, &target)
            .await?
            .is_some()
        {
            warn!("Duplicate rating rejected");
            return Err(ServiceError::DuplicateRating {
                user_id: caller.id.clone(),
                target_id: target.id().to_string(),
            });
        }

        let rating = Rating::new(caller.id.clone(), target.clone(), request.rating, request.review);
        let created = self.ratings.create(rating).await?;

        self.recompute_target_stats(&target).await?;

        info!("Rating created with ID: {}", created.id);
        Ok(created)
    }

    /// Get a specific rating by ID
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get_rating(&self, id: &str) -> ServiceResult<Rating> {
        match self.ratings.find_by_id(id).await? {
            Some(rating) => Ok(rating),
            None => Err(ServiceError::RatingNotFound { id: id.to_string() }),
        }
    }

    /// All ratings for one target, insertion order
    #[instrument(skip(self))]
    pub async fn ratings_for_target(&self, target: &RatingTarget) -> ServiceResult<Vec<Rating>> {
        self.ensure_target_exists(target).await?;
        Ok(self.ratings.find_by_target(target).await?)
    }

    /// The caller's own ratings
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn ratings_for_user(&self, user_id: &str) -> ServiceResult<Vec<Rating>> {
        Ok(self.ratings.find_by_user(user_id).await?)
    }

    /// Advanced listing: target/value/date/response/keyword filters, four
    /// sort orders, then skip/limit slicing.
    #[instrument(skip(self, filters))]
    pub async fn list_ratings(&self, filters: RatingFilters) -> ServiceResult<Vec<Rating>> {
        let mut matched = Vec::new();
        for rating in self.ratings.find_all().await? {
            if let Some(food_item_id) = &filters.food_item_id {
                if rating.target.food_item_id() != Some(food_item_id.as_str()) {
                    continue;
                }
            }
            if let Some(restaurant_id) = &filters.restaurant_id {
                if rating.target.restaurant_id() != Some(restaurant_id.as_str()) {
                    continue;
                }
            }
            if let Some(min) = filters.min_rating {
                if rating.value < min {
                    continue;
                }
            }
            if let Some(max) = filters.max_rating {
                if rating.value > max {
                    continue;
                }
            }
            if let Some(start) = filters.start_date {
                if rating.created_at < start {
                    continue;
                }
            }
            if let Some(end) = filters.end_date {
                if rating.created_at > end {
                    continue;
                }
            }
            if let Some(wants_response) = filters.has_response {
                let has_response = self
                    .reviews
                    .find_response_for_rating(&rating.id)
                    .await?
                    .is_some();
                if has_response != wants_response {
                    continue;
                }
            }
            if !filters.keywords.is_empty() {
                let review = rating.review.as_deref().unwrap_or("").to_lowercase();
                if !filters
                    .keywords
                    .iter()
                    .any(|keyword| review.contains(&keyword.to_lowercase()))
                {
                    continue;
                }
            }
            matched.push(rating);
        }

        match filters.sort_by {
            ReviewSortKey::Recent => {
                matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            }
            ReviewSortKey::Highest => {
                matched.sort_by(|a, b| {
                    b.value.partial_cmp(&a.value).unwrap_or(std::cmp::Ordering::Equal)
                });
            }
            ReviewSortKey::Lowest => {
                matched.sort_by(|a, b| {
                    a.value.partial_cmp(&b.value).unwrap_or(std::cmp::Ordering::Equal)
                });
            }
            ReviewSortKey::MostHelpful => {
                let mut keyed = Vec::with_capacity(matched.len());
                for rating in matched {
                    let helpful = self
                        .reviews
                        .find_votes_for_rating(&rating.id)
                        .await?
                        .iter()
                        .filter(|vote| vote.vote_type == VoteKind::Helpful)
                        .count();
                    keyed.push((helpful, rating));
                }
                keyed.sort_by(|a, b| b.0.cmp(&a.0));
                matched = keyed.into_iter().map(|(_, rating)| rating).collect();
            }
        }

        Ok(matched
            .into_iter()
            .skip(filters.skip)
            .take(filters.limit)
            .collect())
    }

    /// Update a rating. Owner only.
    #[instrument(skip(self, request), fields(id = %id, caller = %caller.username))]
    pub async fn update_rating(
        &self,
        id: &str,
        request: UpdateRatingRequest,
        caller: &AuthUser,
    ) -> ServiceResult<Rating> {
        request.validate()?;

        let mut rating = self.get_rating(id).await?;
        if rating.user_id != caller.id {
            warn!("Caller does not own this rating");
            return Err(ServiceError::Forbidden);
        }

        if let Some(value) = request.rating {
            rating.value = value;
        }
        if let Some(review) = request.review {
            rating.review = Some(review);
        }
        rating.updated_at = Some(Utc::now());

        let target = rating.target.clone();
        let updated = self.ratings.update(rating).await?;
        self.recompute_target_stats(&target).await?;

        info!("Rating updated");
        Ok(updated)
    }

    /// Delete a rating and its engagement records. Owner or admin.
    #[instrument(skip(self), fields(id = %id, caller = %caller.username))]
    pub async fn delete_rating(&self, id: &str, caller: &AuthUser) -> ServiceResult<()> {
        let rating = self.get_rating(id).await?;
        if rating.user_id != caller.id && !caller.is_admin() {
            return Err(ServiceError::Forbidden);
        }

        let target = rating.target.clone();
        self.ratings.delete(id).await?;
        self.reviews.delete_for_rating(id).await?;
        self.recompute_target_stats(&target).await?;

        info!("Rating deleted");
        Ok(())
    }

    /// Vote a review helpful or unhelpful. One vote per user per rating.
    #[instrument(skip(self, request), fields(rating_id = %rating_id, caller = %caller.username))]
    pub async fn vote_on_rating(
        &self,
        rating_id: &str,
        request: CreateVoteRequest,
        caller: &AuthUser,
    ) -> ServiceResult<ReviewVote> {
        self.get_rating(rating_id).await?;

        if self
            .reviews
            .find_vote_by_user(&caller.id, rating_id)
            .await?
            .is_some()
        {
            return Err(ServiceError::DuplicateVote {
                user_id: caller.id.clone(),
                rating_id: rating_id.to_string(),
            });
        }

        let vote = ReviewVote {
            id: Uuid::new_v4().to_string(),
            user_id: caller.id.clone(),
            rating_id: rating_id.to_string(),
            vote_type: request.vote_type,
            created_at: Utc::now(),
        };
        Ok(self.reviews.create_vote(vote).await?)
    }

    /// Withdraw the caller's vote on a rating
    #[instrument(skip(self), fields(rating_id = %rating_id, caller = %caller.username))]
    pub async fn remove_vote(&self, rating_id: &str, caller: &AuthUser) -> ServiceResult<()> {
        self.get_rating(rating_id).await?;

        match self.reviews.find_vote_by_user(&caller.id, rating_id).await? {
            Some(vote) => {
                self.reviews.delete_vote(&vote.id).await?;
                Ok(())
            }
            None => Err(ServiceError::VoteNotFound {
                rating_id: rating_id.to_string(),
            }),
        }
    }

    /// Vote counts for a rating, with the caller's own vote if any
    #[instrument(skip(self), fields(rating_id = %rating_id))]
    pub async fn vote_summary(
        &self,
        rating_id: &str,
        caller: &AuthUser,
    ) -> ServiceResult<crate::models::VoteSummary> {
        self.get_rating(rating_id).await?;

        let votes = self.reviews.find_votes_for_rating(rating_id).await?;
        let helpful = votes
            .iter()
            .filter(|vote| vote.vote_type == VoteKind::Helpful)
            .count();
        let unhelpful = votes.len() - helpful;
        let user_vote = votes
            .iter()
            .find(|vote| vote.user_id == caller.id)
            .map(|vote| vote.vote_type);

        Ok(crate::models::VoteSummary {
            helpful,
            unhelpful,
            user_vote,
        })
    }

    /// Report a review for moderation. One report per user per rating.
    #[instrument(skip(self, request), fields(rating_id = %rating_id, caller = %caller.username))]
    pub async fn report_rating(
        &self,
        rating_id: &str,
        request: CreateReportRequest,
        caller: &AuthUser,
    ) -> ServiceResult<ReviewReport> {
        self.get_rating(rating_id).await?;

        if self
            .reviews
            .find_report_by_user(&caller.id, rating_id)
            .await?
            .is_some()
        {
            return Err(ServiceError::DuplicateReport {
                user_id: caller.id.clone(),
                rating_id: rating_id.to_string(),
            });
        }

        let report = ReviewReport {
            id: Uuid::new_v4().to_string(),
            user_id: caller.id.clone(),
            rating_id: rating_id.to_string(),
            reason: request.reason,
            description: request.description,
            status: ReportStatus::Pending,
            created_at: Utc::now(),
            updated_at: None,
        };
        Ok(self.reviews.create_report(report).await?)
    }

    /// List reports, optionally by status. Admin only.
    #[instrument(skip(self), fields(caller = %caller.username))]
    pub async fn list_reports(
        &self,
        status: Option<ReportStatus>,
        caller: &AuthUser,
    ) -> ServiceResult<Vec<ReviewReport>> {
        if !caller.is_admin() {
            return Err(ServiceError::Forbidden);
        }
        Ok(self.reviews.find_reports(status).await?)
    }

    /// Move a report through moderation. Admin only.
    #[instrument(skip(self, request), fields(report_id = %report_id, caller = %caller.username))]
    pub async fn update_report(
        &self,
        report_id: &str,
        request: UpdateReportRequest,
        caller: &AuthUser,
    ) -> ServiceResult<ReviewReport> {
        if !caller.is_admin() {
            return Err(ServiceError::Forbidden);
        }

        let mut report = match self.reviews.find_report_by_id(report_id).await? {
            Some(report) => report,
            None => {
                return Err(ServiceError::ReportNotFound {
                    id: report_id.to_string(),
                })
            }
        };

        report.status = request.status;
        report.updated_at = Some(Utc::now());
        Ok(self.reviews.update_report(report).await?)
    }

    /// Attach the single owner/admin response to a rating. Allowed for an
    /// admin or the creator of the rated entity.
    #[instrument(skip(self, request), fields(rating_id = %rating_id, caller = %caller.username))]
    pub async fn create_response(
        &self,
        rating_id: &str,
        request: CreateResponseRequest,
        caller: &AuthUser,
    ) -> ServiceResult<ReviewResponse> {
        let rating = self.get_rating(rating_id).await?;
        self.ensure_can_respond(&rating.target, caller).await?;

        if self
            .reviews
            .find_response_for_rating(rating_id)
            .await?
            .is_some()
        {
            return Err(ServiceError::DuplicateResponse {
                rating_id: rating_id.to_string(),
            });
        }

        let response = ReviewResponse {
            id: Uuid::new_v4().to_string(),
            rating_id: rating_id.to_string(),
            user_id: caller.id.clone(),
            response_text: request.response_text,
            created_at: Utc::now(),
            updated_at: None,
        };
        Ok(self.reviews.create_response(response).await?)
    }

    /// Rewrite an existing response. Author or admin.
    #[instrument(skip(self, request), fields(rating_id = %rating_id, caller = %caller.username))]
    pub async fn update_response(
        &self,
        rating_id: &str,
        request: CreateResponseRequest,
        caller: &AuthUser,
    ) -> ServiceResult<ReviewResponse> {
        let mut response = self.get_response(rating_id).await?;
        if response.user_id != caller.id && !caller.is_admin() {
            return Err(ServiceError::Forbidden);
        }

        response.response_text = request.response_text;
        response.updated_at = Some(Utc::now());
        Ok(self.reviews.update_response(response).await?)
    }

    /// The response attached to a rating, if any
    #[instrument(skip(self), fields(rating_id = %rating_id))]
    pub async fn get_response(&self, rating_id: &str) -> ServiceResult<ReviewResponse> {
        match self.reviews.find_response_for_rating(rating_id).await? {
            Some(response) => Ok(response),
            None => Err(ServiceError::ResponseNotFound {
                rating_id: rating_id.to_string(),
            }),
        }
    }

    /// Remove a response. Author or admin.
    #[instrument(skip(self), fields(rating_id = %rating_id, caller = %caller.username))]
    pub async fn delete_response(&self, rating_id: &str, caller: &AuthUser) -> ServiceResult<()> {
        let response = self.get_response(rating_id).await?;
        if response.user_id != caller.id && !caller.is_admin() {
            return Err(ServiceError::Forbidden);
        }
        self.reviews.delete_response(&response.id).await?;
        Ok(())
    }

    /// Aggregate review analytics for one target. Not-found when the target
    /// has no reviews.
    #[instrument(skip(self))]
    pub async fn review_analytics(&self, target: &RatingTarget) -> ServiceResult<ReviewAnalytics> {
        self.ensure_target_exists(target).await?;

        let ratings = self.ratings.find_by_target(target).await?;
        if ratings.is_empty() {
            return Err(ServiceError::NoReviews {
                target_id: target.id().to_string(),
            });
        }

        Ok(ReviewAnalytics::from_ratings(&ratings, Utc::now()))
    }

    async fn ensure_target_exists(&self, target: &RatingTarget) -> ServiceResult<()> {
        match target {
            RatingTarget::FoodItem { food_item_id } => {
                if !self.food_items.exists(food_item_id).await? {
                    return Err(ServiceError::FoodItemNotFound {
                        id: food_item_id.clone(),
                    });
                }
            }
            RatingTarget::Restaurant { restaurant_id } => {
                if self.restaurants.find_by_id(restaurant_id).await?.is_none() {
                    return Err(ServiceError::RestaurantNotFound {
                        id: restaurant_id.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Responding is reserved for admins and the creator of the rated entity
    async fn ensure_can_respond(
        &self,
        target: &RatingTarget,
        caller: &AuthUser,
    ) -> ServiceResult<()> {
        if caller.is_admin() {
            return Ok(());
        }

        let owner = match target {
            RatingTarget::FoodItem { food_item_id } => self
                .food_items
                .find_by_id(food_item_id)
                .await?
                .map(|item| item.created_by),
            RatingTarget::Restaurant { restaurant_id } => self
                .restaurants
                .find_by_id(restaurant_id)
                .await?
                .map(|restaurant| restaurant.created_by),
        };

        match owner {
            Some(owner_id) if owner_id == caller.id => Ok(()),
            _ => Err(ServiceError::Forbidden),
        }
    }

    /// Rescan the target's ratings and overwrite its derived fields. The
    /// mean is recomputed from scratch on every write.
    async fn recompute_target_stats(&self, target: &RatingTarget) -> ServiceResult<()> {
        let ratings = self.ratings.find_by_target(target).await?;
        let rating_count = ratings.len();
        let average_rating = if rating_count == 0 {
            None
        } else {
            Some(ratings.iter().map(|r| r.value).sum::<f64>() / rating_count as f64)
        };

        match target {
            RatingTarget::FoodItem { food_item_id } => {
                if let Some(mut item) = self.food_items.find_by_id(food_item_id).await? {
                    item.apply_rating_stats(average_rating, rating_count);
                    self.food_items.update(item).await?;
                }
            }
            RatingTarget::Restaurant { restaurant_id } => {
                if let Some(mut restaurant) = self.restaurants.find_by_id(restaurant_id).await? {
                    restaurant.apply_rating_stats(average_rating, rating_count);
                    self.restaurants.update(restaurant).await?;
                }
            }
        }
        Ok(())
    }
}
