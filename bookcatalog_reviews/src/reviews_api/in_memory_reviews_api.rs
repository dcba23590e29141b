use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::UNIX_EPOCH;

use bookcatalog_books::api::BookId;
use bookcatalog_session::session_store::SessionProvider;

use crate::api::{Review, ReviewAuthor, ReviewDraft, ReviewEdit, ReviewId};
use crate::reviews_api::{validate_review_content, ReviewsApi, ReviewsApiError};

/// Whether a second review by the same author for the same book is rejected.
/// The hosted backends were inconsistent about this, so the policy is
/// injected rather than hard-coded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// One review per (author, book), the way most deployments behaved.
    Reject,
    /// No enforcement at all, the way some deployments behaved.
    Allow,
}

/// Trait implementation over process memory. Mirrors the collaborator's
/// observable behavior, including authorization on delete, so widget logic
/// can be exercised without a backend.
pub struct InMemoryReviewsApi {
    sessions: Arc<dyn SessionProvider>,
    duplicate_policy: DuplicatePolicy,
    reviews: parking_lot::RwLock<Vec<Review>>,
    review_sequence_generator: AtomicU64,
}

impl InMemoryReviewsApi {
    pub fn new(sessions: Arc<dyn SessionProvider>, duplicate_policy: DuplicatePolicy) -> Self {
        Self {
            sessions,
            duplicate_policy,
            reviews: Default::default(),
            review_sequence_generator: Default::default(),
        }
    }

    fn timestamp() -> String {
        std::time::SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
            .to_string()
    }
}

#[async_trait::async_trait]
impl ReviewsApi for InMemoryReviewsApi {
    async fn reviews_for_book(&self, book_id: &BookId) -> Result<Vec<Review>, ReviewsApiError> {
        // Insertion order stands in for server order
        Ok(self
            .reviews
            .read()
            .iter()
            .filter(|review| &review.book_id == book_id)
            .cloned()
            .collect())
    }

    async fn create_review(&self, draft: ReviewDraft) -> Result<Review, ReviewsApiError> {
        validate_review_content(draft.rating, &draft.comment)?;
        let user = self
            .sessions
            .current_user()
            .ok_or(ReviewsApiError::Unauthenticated)?;

        let mut reviews = self.reviews.write();
        if self.duplicate_policy == DuplicatePolicy::Reject
            && reviews
                .iter()
                .any(|review| review.book_id == draft.book_id && review.author.id() == user.id)
        {
            return Err(ReviewsApiError::RemoteRejected {
                status: 400,
                message: "you have already reviewed this book".to_string(),
            });
        }

        let id = self.review_sequence_generator.fetch_add(1, Ordering::Relaxed);
        let review = Review {
            id: format!("review-{id}"),
            book_id: draft.book_id,
            author: ReviewAuthor::Profile {
                id: user.id,
                name: Some(user.name),
            },
            rating: draft.rating,
            comment: draft.comment,
            created_at: Some(Self::timestamp()),
        };
        reviews.push(review.clone());
        Ok(review)
    }

    async fn update_review(
        &self,
        review_id: &ReviewId,
        edit: ReviewEdit,
    ) -> Result<Review, ReviewsApiError> {
        validate_review_content(edit.rating, &edit.comment)?;
        let user = self
            .sessions
            .current_user()
            .ok_or(ReviewsApiError::Unauthenticated)?;

        let mut reviews = self.reviews.write();
        let review = reviews
            .iter_mut()
            .find(|review| &review.id == review_id)
            .ok_or(ReviewsApiError::RemoteRejected {
                status: 404,
                message: "review not found".to_string(),
            })?;
        if review.author.id() != user.id && !user.is_admin() {
            return Err(ReviewsApiError::RemoteRejected {
                status: 403,
                message: "you cannot edit this review".to_string(),
            });
        }
        review.rating = edit.rating;
        review.comment = edit.comment;
        Ok(review.clone())
    }

    async fn delete_review(&self, review_id: &ReviewId) -> Result<(), ReviewsApiError> {
        let user = self
            .sessions
            .current_user()
            .ok_or(ReviewsApiError::Unauthenticated)?;

        let mut reviews = self.reviews.write();
        let position = reviews
            .iter()
            .position(|review| &review.id == review_id)
            .ok_or(ReviewsApiError::RemoteRejected {
                status: 404,
                message: "review not found".to_string(),
            })?;
        if reviews[position].author.id() != user.id && !user.is_admin() {
            return Err(ReviewsApiError::RemoteRejected {
                status: 403,
                message: "you cannot delete this review".to_string(),
            });
        }
        reviews.remove(position);
        Ok(())
    }
}
