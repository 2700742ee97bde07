//! Contact domain model.
//!
//! # Responsibility
//! - Define the canonical contact record consumed by list aggregation.
//! - Enforce record-level invariants (id, name, email shape).
//!
//! # Invariants
//! - `id` is stable and never reused for another contact.
//! - `company_id`/`company_name` are set together or not at all; the rollup
//!   only reads `company_name`.
//! - `tags` are normalized lowercase and deduplicated before persistence.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a contact record.
pub type ContactId = Uuid;

// Permissive local@domain.tld shape; full RFC validation belongs to the
// upstream form layer.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Validation failure for contact records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactValidationError {
    /// Contact id is the nil uuid.
    NilId,
    /// Contact name is empty or whitespace-only.
    BlankName,
    /// Email does not match the expected `local@domain.tld` shape.
    InvalidEmail(String),
}

impl std::fmt::Display for ContactValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "contact id must not be the nil uuid"),
            Self::BlankName => write!(f, "contact name must not be blank"),
            Self::InvalidEmail(value) => write!(f, "invalid contact email: `{value}`"),
        }
    }
}

impl std::error::Error for ContactValidationError {}

/// Canonical contact record.
///
/// Contacts are read-only input to list aggregation: the rollup never mutates
/// them, and deleting a contact deliberately leaves any stored list
/// memberships behind as stale references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Stable global ID used for list membership and auditing.
    pub id: ContactId,
    /// Display name.
    pub name: String,
    /// Primary email address.
    pub email: String,
    /// Optional phone number, free-form.
    pub phone: Option<String>,
    /// Owning company reference, if any.
    pub company_id: Option<Uuid>,
    /// Denormalized company display name used by the company rollup.
    pub company_name: Option<String>,
    /// Normalized lowercase labels attached to this contact.
    pub tags: Vec<String>,
}

impl Contact {
    /// Creates a contact with a generated stable ID.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name, email)
    }

    /// Creates a contact with a caller-provided stable ID.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(id: ContactId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            phone: None,
            company_id: None,
            company_name: None,
            tags: Vec::new(),
        }
    }

    /// Assigns the owning company reference.
    pub fn with_company(mut self, company_id: Uuid, company_name: impl Into<String>) -> Self {
        self.company_id = Some(company_id);
        self.company_name = Some(company_name.into());
        self
    }

    /// Checks record-level invariants.
    ///
    /// # Errors
    /// - `NilId` when `id` is the nil uuid.
    /// - `BlankName` when `name` trims to empty.
    /// - `InvalidEmail` when `email` does not look like `local@domain.tld`.
    pub fn validate(&self) -> Result<(), ContactValidationError> {
        if self.id.is_nil() {
            return Err(ContactValidationError::NilId);
        }
        if self.name.trim().is_empty() {
            return Err(ContactValidationError::BlankName);
        }
        if !EMAIL_RE.is_match(self.email.trim()) {
            return Err(ContactValidationError::InvalidEmail(self.email.clone()));
        }
        Ok(())
    }
}
