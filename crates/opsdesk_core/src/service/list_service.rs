//! Custom list use-case service.
//!
//! # Responsibility
//! - Provide custom list create/update/get/list/delete APIs.
//! - Replace stored membership and free-form labels atomically.
//! - Resolve the derived membership rollup for one list.
//!
//! # Invariants
//! - Stored membership is replaced wholesale, never patched.
//! - `rollup` resolves against the contact snapshot taken at call time;
//!   callers re-run it when underlying data changes.
//! - Stale member ids are tolerated everywhere and dropped at rollup time.

use crate::model::contact::ContactId;
use crate::model::list::{CustomList, ListId};
use crate::repo::list_repo::ListRepository;
use crate::repo::{RepoError, RepoResult};
use crate::rollup::{aggregate_list, ListRollup};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for custom list use-cases.
#[derive(Debug)]
pub enum ListServiceError {
    /// Label input contains empty values.
    InvalidLabel(String),
    /// Target list does not exist.
    ListNotFound(ListId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for ListServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLabel(value) => write!(f, "invalid list label: `{value}`"),
            Self::ListNotFound(id) => write!(f, "list not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent list state: {details}"),
        }
    }
}

impl Error for ListServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ListServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::ListNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Custom list service facade over repository implementations.
pub struct ListService<R: ListRepository> {
    repo: R,
}

impl<R: ListRepository> ListService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one list with the given name and description.
    pub fn create_list(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<CustomList, ListServiceError> {
        let list = CustomList::new(name, description);
        let id = self.repo.create_list(&list)?;
        self.read_back(id, "created list not found in read-back")
    }

    /// Replaces name and description of one list.
    pub fn update_list_info(
        &mut self,
        id: ListId,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<CustomList, ListServiceError> {
        self.repo
            .update_list_info(id, &name.into(), &description.into())?;
        self.read_back(id, "updated list not found in read-back")
    }

    /// Gets one list by stable ID.
    pub fn get_list(&self, id: ListId) -> RepoResult<Option<CustomList>> {
        self.repo.get_list(id)
    }

    /// Lists all custom lists, most recently updated first.
    pub fn list_lists(&self) -> RepoResult<Vec<CustomList>> {
        self.repo.list_lists()
    }

    /// Hard-deletes one list with its stored membership and labels.
    pub fn delete_list(&mut self, id: ListId) -> Result<(), ListServiceError> {
        self.repo.delete_list(id)?;
        Ok(())
    }

    /// Replaces the stored membership of one list.
    ///
    /// Ids are accepted as-is: duplicates collapse in storage, and ids that
    /// do not resolve to a live contact are stored anyway (they surface as
    /// stale references that the rollup drops).
    pub fn set_list_members(
        &mut self,
        id: ListId,
        contact_ids: Vec<ContactId>,
    ) -> Result<CustomList, ListServiceError> {
        self.repo.set_list_members(id, &contact_ids)?;
        self.read_back(id, "list missing after member replacement")
    }

    /// Replaces the free-form labels of one list.
    pub fn set_list_tags(
        &mut self,
        id: ListId,
        tags: Vec<String>,
    ) -> Result<CustomList, ListServiceError> {
        for tag in &tags {
            if tag.trim().is_empty() {
                return Err(ListServiceError::InvalidLabel(tag.clone()));
            }
        }

        self.repo.set_list_tags(id, &tags)?;
        self.read_back(id, "list missing after label replacement")
    }

    /// Computes the derived membership view for one list.
    ///
    /// Loads the list and the full contact snapshot, then runs the pure
    /// aggregation: resolved members, member count, distinct company rollup.
    pub fn rollup(&self, id: ListId) -> Result<ListRollup, ListServiceError> {
        let list = self
            .repo
            .get_list(id)?
            .ok_or(ListServiceError::ListNotFound(id))?;
        let snapshot = self.repo.contact_snapshot()?;
        Ok(aggregate_list(&list, &snapshot))
    }

    fn read_back(
        &self,
        id: ListId,
        details: &'static str,
    ) -> Result<CustomList, ListServiceError> {
        self.repo
            .get_list(id)?
            .ok_or(ListServiceError::InconsistentState(details))
    }
}
