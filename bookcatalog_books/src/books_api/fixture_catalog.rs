use anyhow::Context;

use crate::api::{BookId, BookRecord};
use crate::books_api::{BooksApi, BooksApiError};
use crate::identity::canonical_book_id;

const BUNDLED_CATALOG: &str = include_str!("../../fixtures/books.json");

/// Static catalog shipped with the crate. Serves as the offline source when
/// the backend is unreachable and as a deterministic catalog in tests.
pub struct FixtureCatalog {
    books: Vec<BookRecord>,
}

impl FixtureCatalog {
    pub fn new(books: Vec<BookRecord>) -> Self {
        Self { books }
    }

    pub fn bundled() -> anyhow::Result<Self> {
        let books =
            serde_json::from_str(BUNDLED_CATALOG).context("Failed to parse bundled catalog")?;
        Ok(Self { books })
    }
}

fn matches(book: &BookRecord, needle: &str) -> bool {
    book.title.to_lowercase().contains(needle)
        || book.author.to_lowercase().contains(needle)
        || book.category.to_lowercase().contains(needle)
}

#[async_trait::async_trait]
impl BooksApi for FixtureCatalog {
    async fn list_books(&self) -> Result<Vec<BookRecord>, BooksApiError> {
        Ok(self.books.clone())
    }

    async fn get_book(&self, book_id: &BookId) -> Result<Option<BookRecord>, BooksApiError> {
        Ok(self
            .books
            .iter()
            .find(|book| canonical_book_id(book).ok().as_deref() == Some(book_id.as_str()))
            .cloned())
    }

    async fn search_books(&self, query: &str) -> Result<Vec<BookRecord>, BooksApiError> {
        let needle = query.trim().to_lowercase();
        // Queries shorter than two characters never match, same as the backend
        if needle.chars().count() < 2 {
            return Ok(vec![]);
        }
        Ok(self
            .books
            .iter()
            .filter(|book| matches(book, &needle))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod fixture_catalog_tests {
    use super::*;

    #[tokio::test]
    async fn bundled_catalog_loads_and_every_book_resolves() {
        let catalog = FixtureCatalog::bundled().expect("Failed to load bundled catalog");
        let books = catalog.list_books().await.unwrap();
        assert!(!books.is_empty());
        for book in &books {
            canonical_book_id(book).expect("bundled book must resolve");
        }
    }

    #[tokio::test]
    async fn get_book_uses_the_canonical_id() {
        let catalog = FixtureCatalog::bundled().unwrap();
        let books = catalog.list_books().await.unwrap();
        let wanted = canonical_book_id(&books[0]).unwrap();

        let found = catalog.get_book(&wanted).await.unwrap();
        assert_eq!(found.as_ref().map(|book| &book.title), Some(&books[0].title));

        let missing = catalog.get_book(&"no-such-book".to_string()).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn search_matches_title_author_and_category() {
        let catalog = FixtureCatalog::bundled().unwrap();

        let by_author = catalog.search_books("garcía márquez").await.unwrap();
        assert!(!by_author.is_empty());

        let by_category = catalog.search_books("novela").await.unwrap();
        assert!(by_category.len() >= 2);

        // too short to search
        let too_short = catalog.search_books("a").await.unwrap();
        assert!(too_short.is_empty());

        let nothing = catalog.search_books("zzzzzz").await.unwrap();
        assert!(nothing.is_empty());
    }
}
