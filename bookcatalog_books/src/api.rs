use serde::{Deserialize, Serialize};

/// Canonical book identifier. Produced by [`crate::identity::canonical_book_id`]
/// and used to key every review and favorite operation.
pub type BookId = String;

/// Generic catalog id. The bundled fixture uses small integers, the backend
/// returns strings for the same field.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(untagged)]
pub enum CatalogId {
    Numeric(i64),
    Text(String),
}

impl CatalogId {
    pub fn as_canonical(&self) -> Option<BookId> {
        match self {
            CatalogId::Numeric(value) => Some(value.to_string()),
            CatalogId::Text(value) => {
                let trimmed = value.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
        }
    }
}

/// A book as returned by any source. The backend schema changed identifier
/// fields over time, so all three may or may not be present; only the
/// resolved canonical id is ever used downstream. Records are never mutated
/// by the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookRecord {
    #[serde(default, rename = "numericId", skip_serializing_if = "Option::is_none")]
    pub numeric_id: Option<i64>,
    #[serde(default, rename = "_id", skip_serializing_if = "Option::is_none")]
    pub database_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CatalogId>,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "coverImage", skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default, rename = "driveLink", skip_serializing_if = "Option::is_none")]
    pub drive_link: Option<String>,
    /// Average rating, 0 when the book has no reviews.
    #[serde(default)]
    pub rating: f32,
}

#[cfg(test)]
mod api_tests {
    use super::*;

    #[test]
    fn fixture_shape_deserializes() {
        let book: BookRecord = serde_json::from_str(
            r#"{
                "id": 3,
                "title": "Rayuela",
                "author": "Julio Cortázar",
                "category": "Novela",
                "description": "Una novela que puede leerse de muchas maneras.",
                "coverImage": "/covers/rayuela.jpg",
                "rating": 4
            }"#,
        )
        .unwrap();
        assert_eq!(book.id, Some(CatalogId::Numeric(3)));
        assert!(book.database_id.is_none());
        assert!(book.drive_link.is_none());
        assert_eq!(book.rating, 4.0);
    }

    #[test]
    fn backend_shape_deserializes() {
        let book: BookRecord = serde_json::from_str(
            r#"{
                "_id": "66a1f0b2c9d4e8",
                "numericId": 17,
                "title": "El Aleph",
                "author": "Jorge Luis Borges",
                "driveLink": "https://drive.example.com/el-aleph"
            }"#,
        )
        .unwrap();
        assert_eq!(book.numeric_id, Some(17));
        assert_eq!(book.database_id.as_deref(), Some("66a1f0b2c9d4e8"));
        assert_eq!(book.category, "");
        assert_eq!(book.rating, 0.0);
    }

    #[test]
    fn catalog_id_accepts_both_wire_forms() {
        let numeric: CatalogId = serde_json::from_str("7").unwrap();
        assert_eq!(numeric.as_canonical().as_deref(), Some("7"));

        let text: CatalogId = serde_json::from_str(r#""66a1f0""#).unwrap();
        assert_eq!(text.as_canonical().as_deref(), Some("66a1f0"));

        let blank: CatalogId = serde_json::from_str(r#""  ""#).unwrap();
        assert_eq!(blank.as_canonical(), None);
    }
}
