//! Contact use-case service.
//!
//! # Responsibility
//! - Provide contact create/update/get/list/delete APIs.
//! - Normalize and atomically replace contact tags.
//!
//! # Invariants
//! - Updates use full-record replacement semantics.
//! - Contact lists are always sorted by `updated_at DESC, id ASC`.
//! - Tag names are normalized to lowercase and deduplicated.
//! - Deleting a contact does not reconcile custom list membership.

use crate::model::contact::{Contact, ContactId};
use crate::repo::contact_repo::{
    normalize_list_limit, normalize_tag, normalize_tags, ContactListQuery, ContactRepository,
};
use crate::repo::{RepoError, RepoResult};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Service error for contact use-cases.
#[derive(Debug)]
pub enum ContactServiceError {
    /// Tag input contains empty values.
    InvalidTag(String),
    /// Target contact does not exist.
    ContactNotFound(ContactId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for ContactServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTag(value) => write!(f, "invalid tag: `{value}`"),
            Self::ContactNotFound(id) => write!(f, "contact not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent contact state: {details}"),
        }
    }
}

impl Error for ContactServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ContactServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::ContactNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Mutable contact fields for create/update requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDraft {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company_id: Option<Uuid>,
}

/// List result envelope used by service callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactListResult {
    /// List items sorted by `updated_at DESC, id ASC`.
    pub items: Vec<Contact>,
    /// Effective normalized limit used by the query.
    pub applied_limit: u32,
}

/// Contact service facade over repository implementations.
pub struct ContactService<R: ContactRepository> {
    repo: R,
}

impl<R: ContactRepository> ContactService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one contact from draft fields.
    ///
    /// Returns the persisted record read back from storage, with the
    /// denormalized company name resolved.
    pub fn create_contact(&self, draft: ContactDraft) -> Result<Contact, ContactServiceError> {
        let mut contact = Contact::new(draft.name, draft.email);
        contact.phone = draft.phone;
        contact.company_id = draft.company_id;

        let id = self.repo.create_contact(&contact)?;
        self.repo
            .get_contact(id)?
            .ok_or(ContactServiceError::InconsistentState(
                "created contact not found in read-back",
            ))
    }

    /// Replaces all draft fields of one contact.
    pub fn update_contact(
        &self,
        id: ContactId,
        draft: ContactDraft,
    ) -> Result<Contact, ContactServiceError> {
        let mut contact = Contact::with_id(id, draft.name, draft.email);
        contact.phone = draft.phone;
        contact.company_id = draft.company_id;

        self.repo.update_contact(&contact)?;
        self.repo
            .get_contact(id)?
            .ok_or(ContactServiceError::InconsistentState(
                "updated contact not found in read-back",
            ))
    }

    /// Gets one contact by stable ID.
    pub fn get_contact(&self, id: ContactId) -> RepoResult<Option<Contact>> {
        self.repo.get_contact(id)
    }

    /// Lists contacts using optional tag/company filters and pagination.
    pub fn list_contacts(
        &self,
        tag: Option<String>,
        company_id: Option<Uuid>,
        limit: Option<u32>,
        offset: u32,
    ) -> Result<ContactListResult, ContactServiceError> {
        let normalized_tag = tag.and_then(|value| normalize_tag(value.as_str()));
        let applied_limit = normalize_list_limit(limit);
        let query = ContactListQuery {
            tag: normalized_tag,
            company_id,
            limit: Some(applied_limit),
            offset,
        };
        let items = self.repo.list_contacts(&query)?;
        Ok(ContactListResult {
            items,
            applied_limit,
        })
    }

    /// Atomically replaces the full tag set for one contact.
    pub fn set_contact_tags(
        &mut self,
        id: ContactId,
        tags: Vec<String>,
    ) -> Result<Contact, ContactServiceError> {
        for tag in &tags {
            if tag.trim().is_empty() {
                return Err(ContactServiceError::InvalidTag(tag.clone()));
            }
        }

        let normalized = normalize_tags(&tags);
        self.repo.set_contact_tags(id, &normalized)?;
        self.repo
            .get_contact(id)?
            .ok_or(ContactServiceError::InconsistentState(
                "contact missing after tag replacement",
            ))
    }

    /// Hard-deletes one contact.
    ///
    /// Custom lists referencing this contact keep their stored membership;
    /// the rollup drops the now-stale id at aggregation time.
    pub fn delete_contact(&mut self, id: ContactId) -> Result<(), ContactServiceError> {
        self.repo.delete_contact(id)?;
        Ok(())
    }

    /// Lists normalized tags known by storage.
    pub fn list_tags(&self) -> RepoResult<Vec<String>> {
        self.repo.list_tags()
    }
}
