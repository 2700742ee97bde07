//! Company domain model and lifecycle status.
//!
//! # Responsibility
//! - Define the canonical company record referenced by contacts and rollups.
//! - Define the closed `CompanyStatus` enumeration and its wire encoding.
//!
//! # Invariants
//! - `id` is stable and never reused for another company.
//! - `status` changes only through lifecycle-guard validated transitions.
//! - Wire ordinals map 1:1 onto the four known statuses; unknown ordinals are
//!   rejected, never coerced to a default.

use crate::lifecycle::LifecycleError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a company record.
pub type CompanyId = Uuid;

/// Lifecycle status of a company account.
///
/// The remote API encodes this as a bare ordinal (`Pending=0`, `Active=1`,
/// `Inactive=2`, `Archived=3`); that encoding is confined to
/// [`CompanyStatus::from_wire`] and [`CompanyStatus::wire_code`] so the rest
/// of the core only ever sees the closed enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanyStatus {
    /// Created but not yet activated.
    Pending,
    /// In regular use.
    Active,
    /// Suspended from regular use.
    Inactive,
    /// Removed from circulation; can only re-enter via `Pending`.
    Archived,
}

impl CompanyStatus {
    /// Decodes the remote API's ordinal encoding.
    ///
    /// # Errors
    /// - `LifecycleError::InvalidStatus` for any value outside `0..=3`.
    pub fn from_wire(code: i64) -> Result<Self, LifecycleError> {
        match code {
            0 => Ok(Self::Pending),
            1 => Ok(Self::Active),
            2 => Ok(Self::Inactive),
            3 => Ok(Self::Archived),
            other => Err(LifecycleError::InvalidStatus(other)),
        }
    }

    /// Encodes this status as the remote API's ordinal.
    pub fn wire_code(self) -> i64 {
        match self {
            Self::Pending => 0,
            Self::Active => 1,
            Self::Inactive => 2,
            Self::Archived => 3,
        }
    }
}

/// Validation failure for company records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompanyValidationError {
    /// Company id is the nil uuid.
    NilId,
    /// Company name is empty or whitespace-only.
    BlankName,
}

impl std::fmt::Display for CompanyValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "company id must not be the nil uuid"),
            Self::BlankName => write!(f, "company name must not be blank"),
        }
    }
}

impl std::error::Error for CompanyValidationError {}

/// Canonical company record.
///
/// All fields besides `status` are opaque to the core; only `status` carries
/// behavior (the lifecycle guard).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// Stable global ID used for contact linkage and auditing.
    pub id: CompanyId,
    /// Display name, also used by the list company rollup.
    pub name: String,
    /// Current lifecycle status.
    pub status: CompanyStatus,
}

impl Company {
    /// Creates a company with a generated stable ID and `Pending` status.
    ///
    /// `Pending` is the conventional entry state assigned by the external API
    /// on creation; the guard itself enforces no initial state.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name)
    }

    /// Creates a company with a caller-provided stable ID.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(id: CompanyId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            status: CompanyStatus::Pending,
        }
    }

    /// Checks record-level invariants.
    ///
    /// # Errors
    /// - `NilId` when `id` is the nil uuid.
    /// - `BlankName` when `name` trims to empty.
    pub fn validate(&self) -> Result<(), CompanyValidationError> {
        if self.id.is_nil() {
            return Err(CompanyValidationError::NilId);
        }
        if self.name.trim().is_empty() {
            return Err(CompanyValidationError::BlankName);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Company, CompanyStatus, CompanyValidationError};
    use crate::lifecycle::LifecycleError;
    use uuid::Uuid;

    #[test]
    fn wire_codes_round_trip_for_all_known_statuses() {
        for status in [
            CompanyStatus::Pending,
            CompanyStatus::Active,
            CompanyStatus::Inactive,
            CompanyStatus::Archived,
        ] {
            let decoded = CompanyStatus::from_wire(status.wire_code()).unwrap();
            assert_eq!(decoded, status);
        }
    }

    #[test]
    fn from_wire_rejects_unknown_ordinals() {
        for code in [-1_i64, 4, 99] {
            let err = CompanyStatus::from_wire(code).unwrap_err();
            assert_eq!(err, LifecycleError::InvalidStatus(code));
        }
    }

    #[test]
    fn new_company_starts_pending() {
        let company = Company::new("Acme");
        assert!(!company.id.is_nil());
        assert_eq!(company.status, CompanyStatus::Pending);
        company.validate().unwrap();
    }

    #[test]
    fn validate_rejects_nil_id_and_blank_name() {
        let nil = Company::with_id(Uuid::nil(), "Acme");
        assert_eq!(nil.validate().unwrap_err(), CompanyValidationError::NilId);

        let blank = Company::new("   ");
        assert_eq!(
            blank.validate().unwrap_err(),
            CompanyValidationError::BlankName
        );
    }
}
