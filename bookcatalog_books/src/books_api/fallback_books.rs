use std::sync::Arc;

use crate::api::{BookId, BookRecord};
use crate::books_api::{BooksApi, BooksApiError};

/// Catalog that reads from the remote backend and falls back to a local
/// source when the backend is unreachable. Remote rejections are NOT masked,
/// only transport failures trigger the fallback.
pub struct FallbackBooks {
    remote: Arc<dyn BooksApi>,
    fallback: Arc<dyn BooksApi>,
}

impl FallbackBooks {
    pub fn new(remote: Arc<dyn BooksApi>, fallback: Arc<dyn BooksApi>) -> Self {
        Self { remote, fallback }
    }
}

#[async_trait::async_trait]
impl BooksApi for FallbackBooks {
    async fn list_books(&self) -> Result<Vec<BookRecord>, BooksApiError> {
        match self.remote.list_books().await {
            Err(BooksApiError::Transport(reason)) => {
                tracing::warn!("books backend unreachable, serving local catalog: {}", reason);
                self.fallback.list_books().await
            }
            other => other,
        }
    }

    async fn get_book(&self, book_id: &BookId) -> Result<Option<BookRecord>, BooksApiError> {
        match self.remote.get_book(book_id).await {
            Err(BooksApiError::Transport(reason)) => {
                tracing::warn!("books backend unreachable, serving local catalog: {}", reason);
                self.fallback.get_book(book_id).await
            }
            other => other,
        }
    }

    async fn search_books(&self, query: &str) -> Result<Vec<BookRecord>, BooksApiError> {
        match self.remote.search_books(query).await {
            Err(BooksApiError::Transport(reason)) => {
                tracing::warn!("books backend unreachable, searching local catalog: {}", reason);
                self.fallback.search_books(query).await
            }
            other => other,
        }
    }
}
