use crate::model::{Checkout, Owner};

/// Case-insensitive substring search over a checkout list.
///
/// An empty query returns the input unchanged. Otherwise a checkout is kept
/// when the folded query occurs in its client code, either date, Jira issue,
/// HD event, or any owner's first name, last name, department or email.
/// Input order is preserved.
pub fn filter(checkouts: &[Checkout], query: &str) -> Vec<Checkout> {
    if query.is_empty() {
        return checkouts.to_vec();
    }
    let needle = fold(query);
    checkouts
        .iter()
        .filter(|c| matches_folded(c, &needle))
        .cloned()
        .collect()
}

/// Single-checkout form of [`filter`]; `query` is folded here.
pub fn matches_query(checkout: &Checkout, query: &str) -> bool {
    query.is_empty() || matches_folded(checkout, &fold(query))
}

fn fold(text: &str) -> String {
    text.to_lowercase()
}

fn contains(field: &str, needle: &str) -> bool {
    fold(field).contains(needle)
}

fn matches_folded(checkout: &Checkout, needle: &str) -> bool {
    contains(&checkout.client_code, needle)
        || checkout
            .start_date
            .as_deref()
            .is_some_and(|d| contains(d, needle))
        || checkout
            .end_date
            .as_deref()
            .is_some_and(|d| contains(d, needle))
        || contains(&checkout.jira, needle)
        || contains(&checkout.hd_event, needle)
        || checkout.owners.iter().any(|o| owner_matches(o, needle))
}

fn owner_matches(owner: &Owner, needle: &str) -> bool {
    contains(&owner.first_name, needle)
        || contains(&owner.last_name, needle)
        || contains(&owner.department, needle)
        || contains(&owner.email, needle)
}
