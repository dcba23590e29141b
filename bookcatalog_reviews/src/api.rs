use serde::{Deserialize, Serialize};

use bookcatalog_books::api::BookId;
use bookcatalog_session::api::UserId;

pub type ReviewId = String;

/// Review author as sent by the backend: either a bare user id or an
/// embedded profile, depending on whether the endpoint populates the field.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(untagged)]
pub enum ReviewAuthor {
    Profile {
        #[serde(alias = "_id")]
        id: UserId,
        #[serde(default)]
        name: Option<String>,
    },
    Id(UserId),
}

impl ReviewAuthor {
    pub fn id(&self) -> &str {
        match self {
            ReviewAuthor::Profile { id, .. } => id,
            ReviewAuthor::Id(id) => id,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            ReviewAuthor::Profile {
                name: Some(name), ..
            } if !name.trim().is_empty() => name,
            _ => "anónimo",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: ReviewId,
    #[serde(rename = "bookId")]
    pub book_id: BookId,
    #[serde(rename = "user", alias = "author")]
    pub author: ReviewAuthor,
    pub rating: u8,
    pub comment: String,
    #[serde(default, rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Body of POST /reviews. Always carries the canonical book id.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct ReviewDraft {
    #[serde(rename = "bookId")]
    pub book_id: BookId,
    pub rating: u8,
    pub comment: String,
}

/// Body of PUT /reviews/{id}: a full rating/comment replacement.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct ReviewEdit {
    pub rating: u8,
    pub comment: String,
}

/// The reviews endpoint shipped three envelope generations; all of them
/// normalize to the same list, server order preserved.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ReviewListEnvelope {
    Bare(Vec<Review>),
    Data { data: Vec<Review> },
    Named { reviews: Vec<Review> },
}

impl ReviewListEnvelope {
    pub(crate) fn into_reviews(self) -> Vec<Review> {
        match self {
            ReviewListEnvelope::Bare(reviews) => reviews,
            ReviewListEnvelope::Data { data } => data,
            ReviewListEnvelope::Named { reviews } => reviews,
        }
    }
}

/// Single-review responses come bare or wrapped in a data object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ReviewEnvelope {
    Bare(Review),
    Wrapped { data: Review },
}

impl ReviewEnvelope {
    pub(crate) fn into_review(self) -> Review {
        match self {
            ReviewEnvelope::Bare(review) => review,
            ReviewEnvelope::Wrapped { data } => data,
        }
    }
}
