//! Custom list membership aggregation.
//!
//! # Responsibility
//! - Compute the derived membership view for one custom list over a contact
//!   snapshot: resolved members, member count and distinct company rollup.
//!
//! # Invariants
//! - Pure computation over caller-supplied snapshots; no I/O, no mutation.
//! - Stale contact ids are dropped silently, never surfaced as errors; list
//!   views must degrade instead of failing when referenced contacts vanish.
//! - Each contact contributes at most once even when its id is duplicated in
//!   the stored membership.

use std::collections::{BTreeSet, HashSet};

use crate::model::contact::{Contact, ContactId};
use crate::model::list::CustomList;

/// Derived read-only view of one custom list's resolved membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRollup {
    /// Contacts whose id appears in the list, in snapshot order.
    pub members: Vec<Contact>,
    /// Count of resolved members; equals `members.len()`, not the stored
    /// membership length.
    pub member_count: usize,
    /// Distinct non-empty company names referenced by members, sorted
    /// ascending.
    pub companies: Vec<String>,
}

impl ListRollup {
    /// The rollup of a list with no resolvable members.
    pub fn empty() -> Self {
        Self {
            members: Vec::new(),
            member_count: 0,
            companies: Vec::new(),
        }
    }
}

/// Computes the derived membership view for `list` over `contacts`.
///
/// This function never fails: ids with no matching contact are ignored,
/// duplicate ids collapse to one member, and an empty membership or snapshot
/// yields [`ListRollup::empty`]. Callers re-run it against a fresher snapshot
/// when the underlying data changes; no caching happens here.
pub fn aggregate_list(list: &CustomList, contacts: &[Contact]) -> ListRollup {
    if list.contact_ids.is_empty() || contacts.is_empty() {
        return ListRollup::empty();
    }

    let wanted: HashSet<ContactId> = list.contact_ids.iter().copied().collect();

    let members: Vec<Contact> = contacts
        .iter()
        .filter(|contact| wanted.contains(&contact.id))
        .cloned()
        .collect();

    let companies: BTreeSet<String> = members
        .iter()
        .filter_map(|member| member.company_name.as_deref())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();

    ListRollup {
        member_count: members.len(),
        companies: companies.into_iter().collect(),
        members,
    }
}

#[cfg(test)]
mod tests {
    use super::{aggregate_list, ListRollup};
    use crate::model::contact::Contact;
    use crate::model::list::CustomList;
    use uuid::Uuid;

    fn contact_at(name: &str, company: Option<&str>) -> Contact {
        let mut contact = Contact::new(name, format!("{name}@example.com"));
        if let Some(company_name) = company {
            contact = contact.with_company(Uuid::new_v4(), company_name);
        }
        contact
    }

    #[test]
    fn empty_membership_yields_empty_rollup() {
        let list = CustomList::new("Empty", "");
        let snapshot = vec![contact_at("a", Some("Acme"))];
        assert_eq!(aggregate_list(&list, &snapshot), ListRollup::empty());
    }

    #[test]
    fn all_stale_ids_yield_empty_rollup() {
        let mut list = CustomList::new("Stale", "");
        list.contact_ids = vec![Uuid::new_v4(), Uuid::new_v4()];
        let snapshot = vec![contact_at("a", Some("Acme"))];
        assert_eq!(aggregate_list(&list, &snapshot), ListRollup::empty());
        assert_eq!(aggregate_list(&list, &[]), ListRollup::empty());
    }

    #[test]
    fn duplicate_and_stale_ids_collapse_and_drop() {
        let first = contact_at("a", Some("Acme"));
        let second = contact_at("b", Some("Acme"));
        let mut list = CustomList::new("Pipeline", "");
        list.contact_ids = vec![first.id, second.id, second.id, Uuid::new_v4()];

        let rollup = aggregate_list(&list, &[first.clone(), second.clone()]);
        assert_eq!(rollup.members, vec![first, second]);
        assert_eq!(rollup.member_count, 2);
        assert_eq!(rollup.companies, vec!["Acme".to_string()]);
    }

    #[test]
    fn companies_are_deduplicated_sorted_and_skip_missing() {
        let zeta = contact_at("a", Some("Zeta"));
        let acme = contact_at("b", Some("Acme"));
        let lone = contact_at("c", None);
        let blank = contact_at("d", Some("   "));
        let mut list = CustomList::new("Mixed", "");
        list.contact_ids = vec![zeta.id, acme.id, lone.id, blank.id];

        let rollup = aggregate_list(&list, &[zeta, acme, lone, blank]);
        assert_eq!(rollup.member_count, 4);
        assert_eq!(
            rollup.companies,
            vec!["Acme".to_string(), "Zeta".to_string()]
        );
    }

    #[test]
    fn aggregation_does_not_mutate_inputs() {
        let member = contact_at("a", Some("Acme"));
        let mut list = CustomList::new("Stable", "");
        list.contact_ids = vec![member.id, member.id];
        let snapshot = vec![member];

        let first = aggregate_list(&list, &snapshot);
        let second = aggregate_list(&list, &snapshot);
        assert_eq!(first, second);
        assert_eq!(list.contact_ids.len(), 2);
        assert_eq!(snapshot.len(), 1);
    }
}
