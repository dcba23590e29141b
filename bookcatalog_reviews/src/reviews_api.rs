pub use in_memory_reviews_api::{DuplicatePolicy, InMemoryReviewsApi};

use bookcatalog_books::api::BookId;
use bookcatalog_session::api::SessionUser;

use crate::api::{Review, ReviewDraft, ReviewEdit, ReviewId};

mod in_memory_reviews_api;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ReviewsApiError {
    /// The action needs a session that is absent. Callers prompt a login
    /// instead of calling the network.
    #[error("sign in to continue")]
    Unauthenticated,

    /// A local precondition failed; the request never reached the network.
    #[error("{0}")]
    Validation(String),

    /// The collaborator answered with a non-2xx status. The message is the
    /// server's own when it sent one and is shown to the user verbatim.
    #[error("{message}")]
    RemoteRejected { status: u16, message: String },

    /// Network, timeout or parse failure. Shown as a generic "try again
    /// later", distinct from a rejection.
    #[error("transport failure: {0}")]
    Transport(String),
}

#[async_trait::async_trait]
pub trait ReviewsApi: Send + Sync {
    /// Reviews for a book in server order. A book with no reviews yet is an
    /// empty list, not an error.
    async fn reviews_for_book(&self, book_id: &BookId) -> Result<Vec<Review>, ReviewsApiError>;

    /// Creates a review. The server stays the authority on duplicates, so a
    /// caller must refetch rather than trust the returned record alone.
    async fn create_review(&self, draft: ReviewDraft) -> Result<Review, ReviewsApiError>;

    /// Replaces rating and comment of an existing review.
    async fn update_review(
        &self,
        review_id: &ReviewId,
        edit: ReviewEdit,
    ) -> Result<Review, ReviewsApiError>;

    /// Deletes a review. Authorization is enforced server-side; a rejection
    /// surfaces as [`ReviewsApiError::RemoteRejected`].
    async fn delete_review(&self, review_id: &ReviewId) -> Result<(), ReviewsApiError>;
}

/// UI gating only: whether the delete control should show for this user.
/// The server makes the final call.
pub fn can_delete(review: &Review, user: &SessionUser) -> bool {
    user.is_admin() || review.author.id() == user.id
}

pub(crate) fn validate_review_content(rating: u8, comment: &str) -> Result<(), ReviewsApiError> {
    if !(1..=5).contains(&rating) {
        return Err(ReviewsApiError::Validation(
            "rating must be between 1 and 5".to_string(),
        ));
    }
    if comment.trim().is_empty() {
        return Err(ReviewsApiError::Validation(
            "comment must not be empty".to_string(),
        ));
    }
    Ok(())
}
