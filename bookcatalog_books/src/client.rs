use anyhow::Context;
use reqwest::StatusCode;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::policies::ExponentialBackoff;
use reqwest_retry::RetryTransientMiddleware;
use reqwest_tracing::TracingMiddleware;
use serde::Deserialize;

use crate::api::{BookId, BookRecord};
use crate::books_api::{BooksApi, BooksApiError};
use crate::client_config::ApiConfig;

/// Older deployments of the search endpoint return the bare list, newer ones
/// wrap it in a results object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SearchEnvelope {
    Bare(Vec<BookRecord>),
    Wrapped { results: Vec<BookRecord> },
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl From<reqwest_middleware::Error> for BooksApiError {
    fn from(error: reqwest_middleware::Error) -> Self {
        BooksApiError::Transport(error.to_string())
    }
}

impl From<reqwest::Error> for BooksApiError {
    fn from(error: reqwest::Error) -> Self {
        BooksApiError::Transport(error.to_string())
    }
}

async fn rejection(response: reqwest::Response) -> BooksApiError {
    let status = response.status().as_u16();
    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message)
        .unwrap_or_else(|| format!("books request failed with status {status}"));
    BooksApiError::RemoteRejected { status, message }
}

pub struct HttpBooksClient {
    url: String,
    client: ClientWithMiddleware,
}

impl HttpBooksClient {
    /// Catalog reads are idempotent, so transient failures are retried with
    /// exponential backoff.
    pub fn new(url: &str) -> anyhow::Result<Self> {
        let reqwest_client = reqwest::Client::builder()
            .build()
            .context("Failed to build reqwest client")?;
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(3);
        let client = ClientBuilder::new(reqwest_client)
            // Insert the tracing middleware
            .with(TracingMiddleware::default())
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            url: url.to_string(),
            client,
        })
    }

    pub fn from_config(config: &ApiConfig) -> anyhow::Result<Self> {
        Self::new(&config.base_url)
    }
}

#[async_trait::async_trait]
impl BooksApi for HttpBooksClient {
    /// Calls GET /books endpoint
    async fn list_books(&self) -> Result<Vec<BookRecord>, BooksApiError> {
        let response = self
            .client
            .get(format!("{}/books", self.url))
            .send()
            .await?;
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(rejection(response).await)
        }
    }

    /// Calls GET /books/{book_id} endpoint
    /// Returns the record if the book was present, None if it was not
    async fn get_book(&self, book_id: &BookId) -> Result<Option<BookRecord>, BooksApiError> {
        let response = self
            .client
            .get(format!("{}/books/{}", self.url, book_id))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            Ok(None)
        } else if response.status().is_success() {
            Ok(Some(response.json().await?))
        } else {
            Err(rejection(response).await)
        }
    }

    /// Calls GET /books/search?q= endpoint
    async fn search_books(&self, query: &str) -> Result<Vec<BookRecord>, BooksApiError> {
        let response = self
            .client
            .get(format!("{}/books/search", self.url))
            .query(&[("q", query)])
            .send()
            .await?;
        if response.status().is_success() {
            let envelope: SearchEnvelope = response.json().await?;
            Ok(match envelope {
                SearchEnvelope::Bare(books) => books,
                SearchEnvelope::Wrapped { results } => results,
            })
        } else {
            Err(rejection(response).await)
        }
    }
}
