use std::sync::Arc;

use anyhow::Context;
use reqwest::StatusCode;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;
use serde::Deserialize;

use bookcatalog_books::api::BookId;
use bookcatalog_books::client_config::ApiConfig;
use bookcatalog_session::session_store::SessionProvider;

use crate::api::{Review, ReviewDraft, ReviewEdit, ReviewEnvelope, ReviewId, ReviewListEnvelope};
use crate::reviews_api::{validate_review_content, ReviewsApi, ReviewsApiError};

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl From<reqwest_middleware::Error> for ReviewsApiError {
    fn from(error: reqwest_middleware::Error) -> Self {
        ReviewsApiError::Transport(error.to_string())
    }
}

impl From<reqwest::Error> for ReviewsApiError {
    fn from(error: reqwest::Error) -> Self {
        ReviewsApiError::Transport(error.to_string())
    }
}

async fn rejection(response: reqwest::Response) -> ReviewsApiError {
    let status = response.status().as_u16();
    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message)
        .unwrap_or_else(|| format!("reviews request failed with status {status}"));
    ReviewsApiError::RemoteRejected { status, message }
}

pub struct HttpReviewsApi {
    url: String,
    client: ClientWithMiddleware,
    sessions: Arc<dyn SessionProvider>,
}

impl HttpReviewsApi {
    /// Unlike the books client this one carries no retry middleware: a
    /// replayed POST could create a duplicate review.
    pub fn new(url: &str, sessions: Arc<dyn SessionProvider>) -> anyhow::Result<Self> {
        let reqwest_client = reqwest::Client::builder()
            .build()
            .context("Failed to build reqwest client")?;
        let client = ClientBuilder::new(reqwest_client)
            // Insert the tracing middleware
            .with(TracingMiddleware::default())
            .build();

        Ok(Self {
            url: url.to_string(),
            client,
            sessions,
        })
    }

    pub fn from_config(config: &ApiConfig, sessions: Arc<dyn SessionProvider>) -> anyhow::Result<Self> {
        Self::new(&config.base_url, sessions)
    }

    fn require_token(&self) -> Result<String, ReviewsApiError> {
        self.sessions.token().ok_or(ReviewsApiError::Unauthenticated)
    }
}

#[async_trait::async_trait]
impl ReviewsApi for HttpReviewsApi {
    /// Calls GET /reviews/book/{book_id} endpoint
    /// A 404 means the book has no reviews yet and is not an error
    async fn reviews_for_book(&self, book_id: &BookId) -> Result<Vec<Review>, ReviewsApiError> {
        let mut request = self
            .client
            .get(format!("{}/reviews/book/{}", self.url, book_id));
        // Reads work without a session; the token only adds ownership context
        if let Some(token) = self.sessions.token() {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(vec![]);
        }
        if !response.status().is_success() {
            return Err(rejection(response).await);
        }
        let envelope: ReviewListEnvelope = response.json().await?;
        Ok(envelope.into_reviews())
    }

    /// Calls POST /reviews endpoint
    /// Validates locally first; invalid drafts never reach the network
    async fn create_review(&self, draft: ReviewDraft) -> Result<Review, ReviewsApiError> {
        validate_review_content(draft.rating, &draft.comment)?;
        let token = self.require_token()?;

        let response = self
            .client
            .post(format!("{}/reviews", self.url))
            .bearer_auth(token)
            .json(&draft)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(rejection(response).await);
        }
        let envelope: ReviewEnvelope = response.json().await?;
        Ok(envelope.into_review())
    }

    /// Calls PUT /reviews/{review_id} endpoint
    async fn update_review(
        &self,
        review_id: &ReviewId,
        edit: ReviewEdit,
    ) -> Result<Review, ReviewsApiError> {
        validate_review_content(edit.rating, &edit.comment)?;
        let token = self.require_token()?;

        let response = self
            .client
            .put(format!("{}/reviews/{}", self.url, review_id))
            .bearer_auth(token)
            .json(&edit)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(rejection(response).await);
        }
        let envelope: ReviewEnvelope = response.json().await?;
        Ok(envelope.into_review())
    }

    /// Calls DELETE /reviews/{review_id} endpoint
    /// A 403 from the server surfaces with its own message
    async fn delete_review(&self, review_id: &ReviewId) -> Result<(), ReviewsApiError> {
        let token = self.require_token()?;

        let response = self
            .client
            .delete(format!("{}/reviews/{}", self.url, review_id))
            .bearer_auth(token)
            .send()
            .await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(rejection(response).await)
        }
    }
}

#[cfg(test)]
mod client_tests {
    use super::*;
    use bookcatalog_session::api::{Session, SessionUser, UserRole};
    use bookcatalog_session::session_store::InMemorySessionStore;

    fn sessions_with_user() -> Arc<InMemorySessionStore> {
        let sessions = Arc::new(InMemorySessionStore::default());
        sessions.login(Session {
            token: "token-1".to_string(),
            user: SessionUser {
                id: "u1".to_string(),
                name: "Reader".to_string(),
                email: "reader@example.com".to_string(),
                role: UserRole::User,
            },
        });
        sessions
    }

    // Nothing listens on this address; reaching the network would surface as
    // Transport, so these tests prove the local checks fire first.
    const DEAD_URL: &str = "http://127.0.0.1:9/api";

    #[tokio::test]
    async fn invalid_drafts_fail_before_any_network_call() {
        let api = HttpReviewsApi::new(DEAD_URL, sessions_with_user()).unwrap();
        for (rating, comment) in [(0, "text"), (6, "text"), (3, "   ")] {
            let result = api
                .create_review(ReviewDraft {
                    book_id: "42".to_string(),
                    rating,
                    comment: comment.to_string(),
                })
                .await;
            assert!(matches!(result, Err(ReviewsApiError::Validation(_))));
        }
    }

    #[tokio::test]
    async fn mutations_without_a_session_fail_before_any_network_call() {
        let sessions = Arc::new(InMemorySessionStore::default());
        let api = HttpReviewsApi::new(DEAD_URL, sessions).unwrap();

        let create = api
            .create_review(ReviewDraft {
                book_id: "42".to_string(),
                rating: 4,
                comment: "fine".to_string(),
            })
            .await;
        assert_eq!(create, Err(ReviewsApiError::Unauthenticated));

        let delete = api.delete_review(&"r1".to_string()).await;
        assert_eq!(delete, Err(ReviewsApiError::Unauthenticated));
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_failure() {
        let api = HttpReviewsApi::new(DEAD_URL, sessions_with_user()).unwrap();
        let result = api.reviews_for_book(&"42".to_string()).await;
        assert!(matches!(result, Err(ReviewsApiError::Transport(_))));
    }
}
