//! Core domain logic for opsdesk.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod lifecycle;
pub mod logging;
pub mod model;
pub mod repo;
pub mod rollup;
pub mod service;

pub use lifecycle::{
    apply_transition, available_transitions, validate_transition, LifecycleError,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::company::{Company, CompanyId, CompanyStatus, CompanyValidationError};
pub use model::contact::{Contact, ContactId, ContactValidationError};
pub use model::list::{CustomList, ListId, ListValidationError};
pub use repo::company_repo::{CompanyRepository, SqliteCompanyRepository};
pub use repo::contact_repo::{ContactListQuery, ContactRepository, SqliteContactRepository};
pub use repo::list_repo::{ListRepository, SqliteListRepository};
pub use repo::{RepoError, RepoResult};
pub use rollup::{aggregate_list, ListRollup};
pub use service::company_service::{CompanyService, CompanyServiceError};
pub use service::contact_service::{
    ContactDraft, ContactListResult, ContactService, ContactServiceError,
};
pub use service::list_service::{ListService, ListServiceError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
