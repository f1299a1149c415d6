//! Fact domain model.
//!
//! # Responsibility
//! - Define the canonical record stored by every backend.
//! - Define the caller-supplied draft used by create/update paths.
//!
//! # Invariants
//! - `id` is assigned by the backend on create and never changes afterwards.
//! - `created_at` is set once on create (UTC) and preserved by updates.
//! - Drafts never carry `id` or `created_at`; callers cannot supply them.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Backend-assigned fact identifier.
pub type FactId = i64;

/// Canonical stored fact.
///
/// Serialized with camelCase wire names (`createdAt`, `isVerified`), which is
/// the shape used both by the JSON file backend and by HTTP responses.
///
/// Deserialization is lenient so hand-edited files still load: a missing
/// `isVerified` reads as `false` and an offset-less `createdAt` reads as UTC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fact {
    pub id: FactId,
    pub text: String,
    pub category: String,
    /// Creation instant, ISO-8601 on the wire.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_verified: bool,
}

impl Fact {
    /// Builds a stored fact from a draft plus backend-assigned identity.
    pub fn from_draft(id: FactId, draft: &FactDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            text: draft.text.clone(),
            category: draft.category.clone(),
            created_at,
            is_verified: draft.is_verified,
        }
    }

    /// Overwrites the mutable fields from a draft.
    ///
    /// `id` and `created_at` are left untouched.
    pub fn apply(&mut self, draft: &FactDraft) {
        self.text.clone_from(&draft.text);
        self.category.clone_from(&draft.category);
        self.is_verified = draft.is_verified;
    }
}

/// Mutable fact fields supplied by callers of create/update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactDraft {
    pub text: String,
    pub category: String,
    #[serde(default)]
    pub is_verified: bool,
}

impl FactDraft {
    pub fn new(text: impl Into<String>, category: impl Into<String>, is_verified: bool) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
            is_verified,
        }
    }

    /// Checks required fields.
    ///
    /// Storage backends do not call this; boundary layers reject invalid
    /// drafts before they reach the core.
    ///
    /// # Errors
    /// - `EmptyText` when `text` is empty or whitespace only.
    /// - `EmptyCategory` when `category` is empty or whitespace only.
    pub fn validate(&self) -> Result<(), FactValidationError> {
        if self.text.trim().is_empty() {
            return Err(FactValidationError::EmptyText);
        }
        if self.category.trim().is_empty() {
            return Err(FactValidationError::EmptyCategory);
        }
        Ok(())
    }
}

/// Required-field violations on a [`FactDraft`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactValidationError {
    EmptyText,
    EmptyCategory,
}

impl Display for FactValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "text is required"),
            Self::EmptyCategory => write!(f, "category is required"),
        }
    }
}

impl Error for FactValidationError {}

/// Formats a timestamp the way every backend persists it.
///
/// Sub-second precision is kept so a reload compares equal to the value
/// returned by create.
pub fn timestamp_to_storage(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parses a persisted RFC 3339 timestamp into UTC.
pub fn parse_storage_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

/// Parses an ISO-8601 timestamp, reading values without an offset as UTC.
pub fn parse_lenient_timestamp(value: &str) -> Option<DateTime<Utc>> {
    parse_storage_timestamp(value).or_else(|| {
        NaiveDateTime::parse_from_str(value.trim(), "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    })
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_lenient_timestamp(&raw)
        .ok_or_else(|| de::Error::custom(format!("invalid timestamp `{raw}`")))
}
