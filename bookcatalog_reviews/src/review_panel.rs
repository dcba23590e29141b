use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bookcatalog_books::api::{BookId, BookRecord};
use bookcatalog_books::identity::{canonical_book_id, IdentityError};

use crate::api::{Review, ReviewDraft, ReviewId};
use crate::reviews_api::{ReviewsApi, ReviewsApiError};

/// Lifecycle of one book-review widget:
/// Idle -> Loading -> Loaded | Failed,
/// Loaded -> Submitting -> Loaded (refetched) | Loaded with error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelPhase {
    Idle,
    Loading,
    Loaded,
    Failed,
    Submitting,
}

/// What a view renders. The error is already one of the user-facing kinds;
/// raw transport errors never reach here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelSnapshot {
    pub phase: PanelPhase,
    pub reviews: Vec<Review>,
    pub error: Option<String>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PanelError {
    /// The submit control is disabled while a mutation is in flight; a
    /// second submission is rejected without reaching the API.
    #[error("a submission is already in flight")]
    MutationInFlight,

    #[error(transparent)]
    Api(#[from] ReviewsApiError),
}

struct PanelInner {
    phase: PanelPhase,
    reviews: Vec<Review>,
    error: Option<String>,
}

/// One widget instance owning its own fetched list. Widgets on the same page
/// are independent; a mutation in one is visible in another only after that
/// other refetches.
pub struct ReviewPanel {
    book_id: BookId,
    api: Arc<dyn ReviewsApi>,
    inner: parking_lot::Mutex<PanelInner>,
    detached: AtomicBool,
}

impl ReviewPanel {
    pub fn new(book_id: BookId, api: Arc<dyn ReviewsApi>) -> Self {
        Self {
            book_id,
            api,
            inner: parking_lot::Mutex::new(PanelInner {
                phase: PanelPhase::Idle,
                reviews: vec![],
                error: None,
            }),
            detached: AtomicBool::new(false),
        }
    }

    /// Builds the panel for a raw book record. Resolution happens here so no
    /// panel can exist, and therefore no request can be issued, without a
    /// canonical id.
    pub fn for_book(book: &BookRecord, api: Arc<dyn ReviewsApi>) -> Result<Self, IdentityError> {
        Ok(Self::new(canonical_book_id(book)?, api))
    }

    pub fn book_id(&self) -> &BookId {
        &self.book_id
    }

    pub fn snapshot(&self) -> PanelSnapshot {
        let inner = self.inner.lock();
        PanelSnapshot {
            phase: inner.phase,
            reviews: inner.reviews.clone(),
            error: inner.error.clone(),
        }
    }

    /// Marks the widget as torn down. Results of operations still in flight
    /// are discarded instead of mutating released state.
    pub fn detach(&self) {
        self.detached.store(true, Ordering::Release);
    }

    fn attached(&self) -> bool {
        !self.detached.load(Ordering::Acquire)
    }

    pub async fn load(&self) {
        if !self.attached() {
            return;
        }
        {
            let mut inner = self.inner.lock();
            inner.phase = PanelPhase::Loading;
            inner.error = None;
        }

        let result = self.api.reviews_for_book(&self.book_id).await;
        if !self.attached() {
            return;
        }
        let mut inner = self.inner.lock();
        match result {
            Ok(reviews) => {
                inner.phase = PanelPhase::Loaded;
                inner.reviews = reviews;
                inner.error = None;
            }
            Err(error) => {
                // Empty list plus an explicit error, never a silent wrong state
                inner.phase = PanelPhase::Failed;
                inner.reviews.clear();
                inner.error = Some(error.to_string());
            }
        }
    }

    /// Submits a review and refetches before the panel is Loaded again, so
    /// the visible list is always server-confirmed. Never retried
    /// automatically; on failure the previous list and the form survive.
    pub async fn submit(&self, rating: u8, comment: &str) -> Result<(), PanelError> {
        let draft = ReviewDraft {
            book_id: self.book_id.clone(),
            rating,
            comment: comment.to_string(),
        };
        self.mutate(|api| async move { api.create_review(draft).await.map(|_| ()) })
            .await
    }

    /// Deletes a review and refetches. A server-side rejection (403 for a
    /// non-author) surfaces with the server's message and the list is left
    /// as the server still reports it.
    pub async fn delete(&self, review_id: &ReviewId) -> Result<(), PanelError> {
        let review_id = review_id.clone();
        self.mutate(|api| async move { api.delete_review(&review_id).await })
            .await
    }

    async fn mutate<F, Fut>(&self, operation: F) -> Result<(), PanelError>
    where
        F: FnOnce(Arc<dyn ReviewsApi>) -> Fut,
        Fut: std::future::Future<Output = Result<(), ReviewsApiError>>,
    {
        if !self.attached() {
            return Ok(());
        }
        {
            let mut inner = self.inner.lock();
            if inner.phase == PanelPhase::Submitting {
                return Err(PanelError::MutationInFlight);
            }
            inner.phase = PanelPhase::Submitting;
            inner.error = None;
        }

        match operation(self.api.clone()).await {
            Ok(()) => {
                let refreshed = self.api.reviews_for_book(&self.book_id).await;
                if !self.attached() {
                    return Ok(());
                }
                let mut inner = self.inner.lock();
                match refreshed {
                    Ok(reviews) => {
                        inner.phase = PanelPhase::Loaded;
                        inner.reviews = reviews;
                        inner.error = None;
                        Ok(())
                    }
                    Err(error) => {
                        inner.phase = PanelPhase::Failed;
                        inner.reviews.clear();
                        inner.error = Some(error.to_string());
                        Err(error.into())
                    }
                }
            }
            Err(error) => {
                if !self.attached() {
                    return Ok(());
                }
                let mut inner = self.inner.lock();
                inner.phase = PanelPhase::Loaded;
                inner.error = Some(error.to_string());
                Err(error.into())
            }
        }
    }
}
