//! Company lifecycle transition guard.
//!
//! # Responsibility
//! - Encode the finite state machine governing `CompanyStatus`.
//! - Validate and apply proposed status transitions for callers that own
//!   persistence.
//!
//! # Invariants
//! - No status transitions to itself and no status is terminal.
//! - `available_transitions` rows keep a fixed order; the first entry is the
//!   default choice for UIs offering a preselected option.
//! - The guard never mutates anything; callers write the returned status
//!   back through their own store.

use crate::model::company::CompanyStatus;

/// Guard failure for company lifecycle operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    /// A wire or persisted status ordinal outside the known four.
    InvalidStatus(i64),
    /// The proposed status is not reachable from the current one.
    IllegalTransition {
        from: CompanyStatus,
        to: CompanyStatus,
    },
}

impl std::fmt::Display for LifecycleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidStatus(code) => {
                write!(f, "unknown company status code `{code}`; expected 0..=3")
            }
            Self::IllegalTransition { from, to } => {
                write!(f, "illegal company status transition {from:?} -> {to:?}")
            }
        }
    }
}

impl std::error::Error for LifecycleError {}

/// Returns the legal next statuses for `current`, in fixed table order.
///
/// The match is exhaustive over the closed enum, so adding a fifth status is
/// a compile-time-visible change here.
pub fn available_transitions(current: CompanyStatus) -> &'static [CompanyStatus] {
    match current {
        CompanyStatus::Pending => &[CompanyStatus::Active, CompanyStatus::Inactive],
        CompanyStatus::Active => &[CompanyStatus::Inactive],
        CompanyStatus::Inactive => &[CompanyStatus::Active, CompanyStatus::Archived],
        CompanyStatus::Archived => &[CompanyStatus::Pending],
    }
}

/// Checks whether `proposed` is reachable from `current`.
///
/// Pure check; mutates nothing.
///
/// # Errors
/// - `IllegalTransition` when `proposed` is not in the row for `current`.
pub fn validate_transition(
    current: CompanyStatus,
    proposed: CompanyStatus,
) -> Result<(), LifecycleError> {
    if available_transitions(current).contains(&proposed) {
        Ok(())
    } else {
        Err(LifecycleError::IllegalTransition {
            from: current,
            to: proposed,
        })
    }
}

/// Returns `proposed` when the transition is legal.
///
/// Performs no effect on failure; the caller owns persistence of the
/// returned status.
///
/// # Errors
/// - `IllegalTransition` when `proposed` is not reachable from `current`.
pub fn apply_transition(
    current: CompanyStatus,
    proposed: CompanyStatus,
) -> Result<CompanyStatus, LifecycleError> {
    validate_transition(current, proposed)?;
    Ok(proposed)
}

#[cfg(test)]
mod tests {
    use super::{apply_transition, available_transitions, validate_transition, LifecycleError};
    use crate::model::company::CompanyStatus;

    const ALL: [CompanyStatus; 4] = [
        CompanyStatus::Pending,
        CompanyStatus::Active,
        CompanyStatus::Inactive,
        CompanyStatus::Archived,
    ];

    #[test]
    fn table_matches_the_lifecycle_contract() {
        assert_eq!(
            available_transitions(CompanyStatus::Pending),
            &[CompanyStatus::Active, CompanyStatus::Inactive]
        );
        assert_eq!(
            available_transitions(CompanyStatus::Active),
            &[CompanyStatus::Inactive]
        );
        assert_eq!(
            available_transitions(CompanyStatus::Inactive),
            &[CompanyStatus::Active, CompanyStatus::Archived]
        );
        assert_eq!(
            available_transitions(CompanyStatus::Archived),
            &[CompanyStatus::Pending]
        );
    }

    #[test]
    fn no_row_is_empty_contains_self_or_duplicates() {
        for status in ALL {
            let row = available_transitions(status);
            assert!(!row.is_empty(), "{status:?} must not be terminal");
            assert!(!row.contains(&status), "{status:?} must not self-loop");
            for (index, entry) in row.iter().enumerate() {
                assert!(
                    !row[index + 1..].contains(entry),
                    "{status:?} row contains duplicate {entry:?}"
                );
            }
        }
    }

    #[test]
    fn validate_accepts_table_edges_and_rejects_the_rest() {
        validate_transition(CompanyStatus::Active, CompanyStatus::Inactive).unwrap();

        let err =
            validate_transition(CompanyStatus::Active, CompanyStatus::Pending).unwrap_err();
        assert_eq!(
            err,
            LifecycleError::IllegalTransition {
                from: CompanyStatus::Active,
                to: CompanyStatus::Pending,
            }
        );
    }

    #[test]
    fn apply_returns_proposed_unchanged_on_success() {
        let next = apply_transition(CompanyStatus::Archived, CompanyStatus::Pending).unwrap();
        assert_eq!(next, CompanyStatus::Pending);

        let err =
            apply_transition(CompanyStatus::Archived, CompanyStatus::Active).unwrap_err();
        assert!(matches!(err, LifecycleError::IllegalTransition { .. }));
    }

    #[test]
    fn every_status_is_reachable_from_every_other_within_two_hops() {
        for from in ALL {
            for to in ALL {
                if from == to {
                    continue;
                }
                let direct = available_transitions(from).contains(&to);
                let two_hop = available_transitions(from)
                    .iter()
                    .any(|mid| available_transitions(*mid).contains(&to));
                assert!(direct || two_hop, "{from:?} cannot reach {to:?} in 2 hops");
            }
        }
    }
}
