//! Contains the data structures that map to the `homework` table.

use super::StoreError;
use chrono::{DateTime, Utc};

/// One stored homework assignment. `ref_number` is unique and never reassigned.
#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq)]
pub struct HomeworkRecord {
    pub ref_number: i64,
    pub subject: String,
    pub details: String,
    pub due_date: String,
    /// Free-form assignment format ("worksheet", "essay", ...).
    #[sqlx(rename = "type")]
    pub kind: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Longest subject accepted; subjects double as embed field names.
pub const MAX_SUBJECT_CHARS: usize = 256;
/// Longest value accepted for every other field; each is shown as an embed field value.
pub const MAX_FIELD_CHARS: usize = 1024;

/// The caller-supplied fields of a homework record before a reference number is assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHomework {
    pub subject: String,
    pub details: String,
    /// Expected as `yyyy-mm-dd`; stored verbatim.
    pub due_date: String,
    pub kind: String,
    pub image_url: Option<String>,
}

impl NewHomework {
    /// Trims every field; a blank `image_url` becomes `None`.
    pub fn new(
        subject: impl Into<String>,
        details: impl Into<String>,
        due_date: impl Into<String>,
        kind: impl Into<String>,
        image_url: Option<String>,
    ) -> Self {
        Self {
            subject: subject.into().trim().to_string(),
            details: details.into().trim().to_string(),
            due_date: due_date.into().trim().to_string(),
            kind: kind.into().trim().to_string(),
            image_url: image_url
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty()),
        }
    }

    /// Rejects blank required fields and anything too long to be displayed later.
    pub fn validate(&self) -> Result<(), StoreError> {
        let required = [
            ("subject", &self.subject, MAX_SUBJECT_CHARS),
            ("details", &self.details, MAX_FIELD_CHARS),
            ("due_date", &self.due_date, MAX_FIELD_CHARS),
            ("type", &self.kind, MAX_FIELD_CHARS),
        ];
        for (field, value, max) in required {
            if value.trim().is_empty() {
                return Err(StoreError::Validation(field));
            }
            if value.chars().count() > max {
                return Err(StoreError::TooLong { field, max });
            }
        }
        if self
            .image_url
            .as_ref()
            .is_some_and(|url| url.chars().count() > MAX_FIELD_CHARS)
        {
            return Err(StoreError::TooLong {
                field: "image_url",
                max: MAX_FIELD_CHARS,
            });
        }
        Ok(())
    }
}
