//! Company use-case service.
//!
//! # Responsibility
//! - Provide company create/get/list APIs.
//! - Run every status change through the lifecycle transition guard before
//!   persisting.
//!
//! # Invariants
//! - A rejected transition performs no writes; callers observe the
//!   unchanged stored status.
//! - The wire-ordinal entry point rejects unknown status codes instead of
//!   coercing them.

use crate::lifecycle::{apply_transition, available_transitions, LifecycleError};
use crate::model::company::{Company, CompanyId, CompanyStatus};
use crate::repo::company_repo::CompanyRepository;
use crate::repo::{RepoError, RepoResult};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for company use-cases.
#[derive(Debug)]
pub enum CompanyServiceError {
    /// Target company does not exist.
    CompanyNotFound(CompanyId),
    /// Guard rejection: unknown status code or illegal transition.
    Lifecycle(LifecycleError),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for CompanyServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CompanyNotFound(id) => write!(f, "company not found: {id}"),
            Self::Lifecycle(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent company state: {details}"),
        }
    }
}

impl Error for CompanyServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Lifecycle(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for CompanyServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::CompanyNotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<LifecycleError> for CompanyServiceError {
    fn from(value: LifecycleError) -> Self {
        Self::Lifecycle(value)
    }
}

/// Company service facade over repository implementations.
pub struct CompanyService<R: CompanyRepository> {
    repo: R,
}

impl<R: CompanyRepository> CompanyService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one company in the conventional `Pending` entry state.
    pub fn create_company(
        &self,
        name: impl Into<String>,
    ) -> Result<Company, CompanyServiceError> {
        let company = Company::new(name);
        let id = self.repo.create_company(&company)?;
        self.repo
            .get_company(id)?
            .ok_or(CompanyServiceError::InconsistentState(
                "created company not found in read-back",
            ))
    }

    /// Gets one company by stable ID.
    pub fn get_company(&self, id: CompanyId) -> RepoResult<Option<Company>> {
        self.repo.get_company(id)
    }

    /// Lists all companies ordered by name.
    pub fn list_companies(&self) -> RepoResult<Vec<Company>> {
        self.repo.list_companies()
    }

    /// Returns the legal next statuses for one company's current status.
    ///
    /// The first entry is the default choice for UIs offering a preselected
    /// option.
    pub fn available_transitions(
        &self,
        id: CompanyId,
    ) -> Result<&'static [CompanyStatus], CompanyServiceError> {
        let company = self
            .repo
            .get_company(id)?
            .ok_or(CompanyServiceError::CompanyNotFound(id))?;
        Ok(available_transitions(company.status))
    }

    /// Applies a guard-validated status change and persists the result.
    ///
    /// # Errors
    /// - `Lifecycle(IllegalTransition)` when `proposed` is not reachable;
    ///   nothing is written in that case.
    pub fn change_status(
        &self,
        id: CompanyId,
        proposed: CompanyStatus,
    ) -> Result<Company, CompanyServiceError> {
        let company = self
            .repo
            .get_company(id)?
            .ok_or(CompanyServiceError::CompanyNotFound(id))?;

        let next = apply_transition(company.status, proposed)?;
        self.repo.update_status(id, next)?;
        info!(
            "event=company_status_change module=company status=ok id={} from={:?} to={:?}",
            id, company.status, next
        );

        self.repo
            .get_company(id)?
            .ok_or(CompanyServiceError::InconsistentState(
                "company missing after status change",
            ))
    }

    /// Applies a status change proposed in the remote API's ordinal encoding.
    ///
    /// # Errors
    /// - `Lifecycle(InvalidStatus)` for codes outside the known four.
    /// - `Lifecycle(IllegalTransition)` for unreachable statuses.
    pub fn change_status_wire(
        &self,
        id: CompanyId,
        proposed_code: i64,
    ) -> Result<Company, CompanyServiceError> {
        let proposed = CompanyStatus::from_wire(proposed_code)?;
        self.change_status(id, proposed)
    }
}
