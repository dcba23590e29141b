pub use fallback_books::FallbackBooks;
pub use fixture_catalog::FixtureCatalog;

use crate::api::{BookId, BookRecord};

mod fallback_books;
mod fixture_catalog;

#[derive(Debug, thiserror::Error)]
pub enum BooksApiError {
    /// The catalog answered with a non-2xx status; the message is the server's
    /// own when it sent one.
    #[error("{message}")]
    RemoteRejected { status: u16, message: String },

    #[error("transport failure: {0}")]
    Transport(String),
}

#[async_trait::async_trait]
pub trait BooksApi: Send + Sync {
    /// Lists every book in the catalog.
    async fn list_books(&self) -> Result<Vec<BookRecord>, BooksApiError>;

    /// Fetches a single book, `None` if the catalog does not know the id.
    async fn get_book(&self, book_id: &BookId) -> Result<Option<BookRecord>, BooksApiError>;

    /// Text search over title, author and category.
    async fn search_books(&self, query: &str) -> Result<Vec<BookRecord>, BooksApiError>;
}
