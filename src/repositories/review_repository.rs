use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::{
    ReportStatus, RepositoryError, RepositoryResult, ReviewReport, ReviewResponse, ReviewVote,
};

/// Review engagement records hanging off ratings: votes, reports and
/// owner responses.
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn find_votes_for_rating(&self, rating_id: &str) -> RepositoryResult<Vec<ReviewVote>>;

    async fn find_vote_by_user(
        &self,
        user_id: &str,
        rating_id: &str,
    ) -> RepositoryResult<Option<ReviewVote>>;

    async fn create_vote(&self, vote: ReviewVote) -> RepositoryResult<ReviewVote>;

    async fn delete_vote(&self, id: &str) -> RepositoryResult<()>;

    /// Drop votes, reports and the response attached to a rating
    async fn delete_for_rating(&self, rating_id: &str) -> RepositoryResult<()>;

    async fn find_reports(&self, status: Option<ReportStatus>)
        -> RepositoryResult<Vec<ReviewReport>>;

    async fn find_report_by_id(&self, id: &str) -> RepositoryResult<Option<ReviewReport>>;

    async fn find_report_by_user(
        &self,
        user_id: &str,
        rating_id: &str,
    ) -> RepositoryResult<Option<ReviewReport>>;

    async fn create_report(&self, report: ReviewReport) -> RepositoryResult<ReviewReport>;

    async fn update_report(&self, report: ReviewReport) -> RepositoryResult<ReviewReport>;

    async fn find_response_for_rating(
        &self,
        rating_id: &str,
    ) -> RepositoryResult<Option<ReviewResponse>>;

    async fn create_response(&self, response: ReviewResponse) -> RepositoryResult<ReviewResponse>;

    async fn update_response(&self, response: ReviewResponse) -> RepositoryResult<ReviewResponse>;

    async fn delete_response(&self, id: &str) -> RepositoryResult<()>;
}

/// In-memory implementation holding the three engagement collections
#[derive(Default)]
pub struct InMemoryReviewRepository {
    votes: RwLock<Vec<ReviewVote>>,
    reports: RwLock<Vec<ReviewReport>>,
    responses: RwLock<Vec<ReviewResponse>>,
}

impl InMemoryReviewRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReviewRepository for InMemoryReviewRepository {
    async fn find_votes_for_rating(&self, rating_id: &str) -> RepositoryResult<Vec<ReviewVote>> {
        Ok(self
            .votes
            .read()
            .await
            .iter()
            .filter(|vote| vote.rating_id == rating_id)
            .cloned()
            .collect())
    }

    async fn find_vote_by_user(
        &self,
        user_id: &str,
        rating_id: &str,
    ) -> RepositoryResult<Option<ReviewVote>> {
        Ok(self
            .votes
            .read()
            .await
            .iter()
            .find(|vote| vote.user_id == user_id && vote.rating_id == rating_id)
            .cloned())
    }

    async fn create_vote(&self, vote: ReviewVote) -> RepositoryResult<ReviewVote> {
        self.votes.write().await.push(vote.clone());
        Ok(vote)
    }

    async fn delete_vote(&self, id: &str) -> RepositoryResult<()> {
        let mut votes = self.votes.write().await;
        let before = votes.len();
        votes.retain(|vote| vote.id != id);
        if votes.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn delete_for_rating(&self, rating_id: &str) -> RepositoryResult<()> {
        self.votes
            .write()
            .await
            .retain(|vote| vote.rating_id != rating_id);
        self.reports
            .write()
            .await
            .retain(|report| report.rating_id != rating_id);
        self.responses
            .write()
            .await
            .retain(|response| response.rating_id != rating_id);
        Ok(())
    }

    async fn find_reports(
        &self,
        status: Option<ReportStatus>,
    ) -> RepositoryResult<Vec<ReviewReport>> {
        Ok(self
            .reports
            .read()
            .await
            .iter()
            .filter(|report| status.map_or(true, |wanted| report.status == wanted))
            .cloned()
            .collect())
    }

    async fn find_report_by_id(&self, id: &str) -> RepositoryResult<Option<ReviewReport>> {
        Ok(self
            .reports
            .read()
            .await
            .iter()
            .find(|report| report.id == id)
            .cloned())
    }

    async fn find_report_by_user(
        &self,
        user_id: &str,
        rating_id: &str,
    ) -> RepositoryResult<Option<ReviewReport>> {
        Ok(self
            .reports
            .read()
            .await
            .iter()
            .find(|report| report.user_id == user_id && report.rating_id == rating_id)
            .cloned())
    }

    async fn create_report(&self, report: ReviewReport) -> RepositoryResult<ReviewReport> {
        self.reports.write().await.push(report.clone());
        Ok(report)
    }

    async fn update_report(&self, report: ReviewReport) -> RepositoryResult<ReviewReport> {
        let mut reports = self.reports.write().await;
        match reports.iter_mut().find(|existing| existing.id == report.id) {
            Some(existing) => {
                *existing = report.clone();
                Ok(report)
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    async fn find_response_for_rating(
        &self,
        rating_id: &str,
    ) -> RepositoryResult<Option<ReviewResponse>> {
        Ok(self
            .responses
            .read()
            .await
            .iter()
            .find(|response| response.rating_id == rating_id)
            .cloned())
    }

    async fn create_response(&self, response: ReviewResponse) -> RepositoryResult<ReviewResponse> {
        self.responses.write().await.push(response.clone());
        Ok(response)
    }

    async fn update_response(&self, response: ReviewResponse) -> RepositoryResult<ReviewResponse> {
        let mut responses = self.responses.write().await;
        match responses
            .iter_mut()
            .find(|existing| existing.id == response.id)
        {
            Some(existing) => {
                *existing = response.clone();
                Ok(response)
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    async fn delete_response(&self, id: &str) -> RepositoryResult<()> {
        let mut responses = self.responses.write().await;
        let before = responses.len();
        responses.retain(|response| response.id != id);
        if responses.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
