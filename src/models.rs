use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::error::AppError;

/// One shelf entry. Owned by exactly one user; `(uid, name)` is unique.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Book {
    pub id: i64,
    pub name: String,
    pub author: String,
    pub review: Option<String>,
    pub rating: Option<i64>,
    pub cover: Option<String>,
    pub category: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: Status,
    pub uid: String,
}

/// Reading status. A closed set: anything else is rejected at the write
/// boundary. Transitions are not constrained, the frontend moves books
/// between shelves freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Reading,
    Completed,
    Upcoming,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Reading => "Reading",
            Status::Completed => "Completed",
            Status::Upcoming => "Upcoming",
        }
    }
}

impl FromStr for Status {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Reading" => Ok(Status::Reading),
            "Completed" => Ok(Status::Completed),
            "Upcoming" => Ok(Status::Upcoming),
            other => Err(AppError::Validation(format!("Unknown status: {other}"))),
        }
    }
}

impl TryFrom<String> for Status {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Write body for both add and update. The cover identifiers only matter
/// on add; update never rewrites the stored cover.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    pub name: String,
    pub author: String,
    #[serde(default)]
    pub review: Option<String>,
    #[serde(default)]
    pub rating: Option<i64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub key_type: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
}

impl BookPayload {
    /// Field constraints for the write path. Resolves the status string,
    /// defaulting to [`Status::Reading`] when omitted.
    pub fn validate(&self) -> Result<Status, AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("Book name is required".into()));
        }
        if self.author.trim().is_empty() {
            return Err(AppError::Validation("Author is required".into()));
        }
        if let Some(rating) = self.rating {
            if !(0..=5).contains(&rating) {
                return Err(AppError::Validation(
                    "Rating must be between 0 and 5".into(),
                ));
            }
        }

        match &self.status {
            Some(status) => status.parse(),
            None => Ok(Status::Reading),
        }
    }

    /// Derived cover address, when both Open Library identifiers came with
    /// the payload.
    pub fn cover(&self) -> Option<String> {
        match (self.key_type.as_deref(), self.key.as_deref()) {
            (Some(key_type), Some(key)) if !key_type.is_empty() && !key.is_empty() => {
                Some(cover_url(key_type, key))
            }
            _ => None,
        }
    }
}

pub fn cover_url(key_type: &str, key: &str) -> String {
    format!("https://covers.openlibrary.org/b/{key_type}/{key}-M.jpg")
}
