use crate::api::{BookId, BookRecord, CatalogId};

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("book record carries no usable identifier")]
    Unresolved,
}

/// Maps whatever identifier fields a book record carries to the one canonical
/// id used for review and favorite lookups.
///
/// Priority: the legacy numeric catalog id, then the database-assigned id,
/// then the generic id field. Blank strings count as absent. Pure function,
/// same record always resolves to the same id.
///
/// Callers must not issue network calls for a book that fails to resolve.
pub fn canonical_book_id(book: &BookRecord) -> Result<BookId, IdentityError> {
    if let Some(numeric_id) = book.numeric_id {
        return Ok(numeric_id.to_string());
    }
    if let Some(database_id) = non_blank(book.database_id.as_deref()) {
        return Ok(database_id);
    }
    book.id
        .as_ref()
        .and_then(CatalogId::as_canonical)
        .ok_or(IdentityError::Unresolved)
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
