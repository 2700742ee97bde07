//! Use-case services orchestrating repositories and core rules.
//!
//! # Responsibility
//! - Provide stable CRUD entry points for core callers.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.

pub mod company_service;
pub mod contact_service;
pub mod list_service;
