//! Domain model for contacts, companies and custom lists.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep validation rules next to the records they protect.
//!
//! # Invariants
//! - Every domain object is identified by a stable uuid.
//! - `CompanyStatus` is a closed enumeration; unknown wire values are
//!   rejected at the boundary, never defaulted.

pub mod company;
pub mod contact;
pub mod list;
