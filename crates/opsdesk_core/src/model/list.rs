//! Custom list domain model.
//!
//! # Responsibility
//! - Define the user-curated contact grouping record.
//!
//! # Invariants
//! - `contact_ids` is order-irrelevant and may contain duplicates or stale
//!   ids; aggregation tolerates both instead of failing.
//! - `tags` are free-form list labels, a separate notion from contact tags
//!   and never unified with them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::contact::ContactId;

/// Stable identifier for a custom list.
pub type ListId = Uuid;

/// Validation failure for custom list records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListValidationError {
    /// List id is the nil uuid.
    NilId,
    /// List name is empty or whitespace-only.
    BlankName,
}

impl std::fmt::Display for ListValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "list id must not be the nil uuid"),
            Self::BlankName => write!(f, "list name must not be blank"),
        }
    }
}

impl std::error::Error for ListValidationError {}

/// User-defined named grouping of contacts, independent of company or tag
/// structures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomList {
    /// Stable global ID.
    pub id: ListId,
    /// Display name shown in list views.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Stored membership by contact id. May reference contacts that no
    /// longer exist; the rollup drops those silently.
    pub contact_ids: Vec<ContactId>,
    /// Free-form labels attached to the list itself.
    pub tags: Vec<String>,
}

impl CustomList {
    /// Creates an empty list with a generated stable ID.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name, description)
    }

    /// Creates an empty list with a caller-provided stable ID.
    pub fn with_id(
        id: ListId,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            contact_ids: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// Checks record-level invariants.
    ///
    /// `contact_ids` is deliberately not validated against any contact set
    /// here; membership resolution happens at aggregation time.
    pub fn validate(&self) -> Result<(), ListValidationError> {
        if self.id.is_nil() {
            return Err(ListValidationError::NilId);
        }
        if self.name.trim().is_empty() {
            return Err(ListValidationError::BlankName);
        }
        Ok(())
    }
}
