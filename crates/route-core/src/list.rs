//! Pure list updates shared by every feature.
//!
//! Each function takes the current list by reference and returns a new one;
//! the input is never modified. Persisting the result is the caller's job.

use crate::entity::Entity;
use crate::error::{Result, RouteError};
use std::collections::HashSet;

/// Fresh record id: epoch millis plus a random suffix. Never empty; no
/// collision check is made.
pub fn generate_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{millis}-{}", &suffix[..8])
}

pub fn add<E: Entity>(items: &[E], entity: E) -> Vec<E> {
    let mut next = items.to_vec();
    next.push(entity);
    next
}

/// Apply `f` to the record with `id`. An absent id leaves the list unchanged.
pub fn update<E, F>(items: &[E], id: &str, f: F) -> Vec<E>
where
    E: Entity,
    F: FnOnce(&mut E),
{
    let mut next = items.to_vec();
    if let Some(item) = next.iter_mut().find(|e| e.id() == id) {
        f(item);
    }
    next
}

/// Like [`update`], but an absent id is an error.
pub fn try_update<E, F>(items: &[E], id: &str, f: F) -> Result<Vec<E>>
where
    E: Entity,
    F: FnOnce(&mut E) -> Result<()>,
{
    let mut next = items.to_vec();
    let item = next
        .iter_mut()
        .find(|e| e.id() == id)
        .ok_or_else(|| RouteError::not_found(E::KIND, id))?;
    f(item)?;
    Ok(next)
}

pub fn remove<E: Entity>(items: &[E], id: &str) -> Vec<E> {
    items.iter().filter(|e| e.id() != id).cloned().collect()
}

pub fn find<'a, E: Entity>(items: &'a [E], id: &str) -> Option<&'a E> {
    items.iter().find(|e| e.id() == id)
}

/// Move the record with `id` to `to_index` (0-based, clamped).
pub fn move_item<E: Entity>(items: &[E], id: &str, to_index: usize) -> Result<Vec<E>> {
    let from = items
        .iter()
        .position(|e| e.id() == id)
        .ok_or_else(|| RouteError::not_found(E::KIND, id))?;
    let mut next = items.to_vec();
    let item = next.remove(from);
    let to = to_index.min(next.len());
    next.insert(to, item);
    Ok(next)
}

/// Rearrange to match `ordered`. Every current id must appear exactly once.
/// Records sharing an id move together, keeping their relative order.
pub fn reorder<E: Entity>(items: &[E], ordered: &[&str]) -> Result<Vec<E>> {
    let mut seen = HashSet::new();
    for &id in ordered {
        if !seen.insert(id) {
            return Err(RouteError::InvalidOrder(format!(
                "duplicate id in order list: '{id}'"
            )));
        }
    }

    let existing: HashSet<&str> = items.iter().map(|e| e.id()).collect();
    for &id in ordered {
        if !existing.contains(id) {
            return Err(RouteError::InvalidOrder(format!(
                "'{id}' is not in this list"
            )));
        }
    }
    for item in items {
        if !seen.contains(item.id()) {
            return Err(RouteError::InvalidOrder(format!(
                "missing id in order list: '{}'",
                item.id()
            )));
        }
    }

    Ok(ordered
        .iter()
        .flat_map(|&id| items.iter().filter(move |e| e.id() == id).cloned())
        .collect())
}

/// Lenient numeric form field: trims, drops a trailing `%` and thousands
/// separators, and yields `0.0` for anything unparseable or non-finite.
pub fn parse_number_or_zero(text: &str) -> f64 {
    let cleaned: String = text
        .trim()
        .trim_end_matches('%')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    match cleaned.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::client::{Client, ClientStatus};

    fn clients() -> Vec<Client> {
        ["a", "b", "c"]
            .iter()
            .map(|id| Client::new(*id, format!("Client {id}"), "Co", "x@y.z", ClientStatus::Lead))
            .collect()
    }

    fn ids(list: &[Client]) -> Vec<&str> {
        list.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn generated_ids_are_non_empty_and_distinct() {
        let a = generate_id();
        let b = generate_id();
        assert!(!a.is_empty());
        assert_ne!(a, b);
    }

    #[test]
    fn add_leaves_input_untouched() {
        let before = clients();
        let after = add(&before, Client::new("d", "D", "", "d@d.d", ClientStatus::Active));
        assert_eq!(before.len(), 3);
        assert_eq!(ids(&after), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn remove_drops_exactly_one() {
        let before = clients();
        let after = remove(&before, "b");
        assert_eq!(after.len(), before.len() - 1);
        assert!(after.iter().all(|c| c.id != "b"));
    }

    #[test]
    fn remove_absent_id_keeps_length() {
        let before = clients();
        let after = remove(&before, "zzz");
        assert_eq!(after, before);
    }

    #[test]
    fn update_absent_id_is_noop() {
        let before = clients();
        let after = update(&before, "missing", |c| c.name = "changed".into());
        assert_eq!(after, before);
        let after = update(&before, "a", |c| c.name = "changed".into());
        assert_eq!(after[0].name, "changed");
        assert_eq!(before[0].name, "Client a");
    }

    #[test]
    fn try_update_reports_missing() {
        let err = try_update(&clients(), "nope", |_| Ok(())).unwrap_err();
        assert!(matches!(err, RouteError::EntityNotFound { kind: "client", .. }));
    }

    #[test]
    fn move_item_clamps() {
        let list = clients();
        assert_eq!(ids(&move_item(&list, "a", 99).unwrap()), vec!["b", "c", "a"]);
        assert_eq!(ids(&move_item(&list, "c", 0).unwrap()), vec!["c", "a", "b"]);
        assert!(move_item(&list, "x", 0).is_err());
    }

    #[test]
    fn reorder_validates_membership() {
        let list = clients();
        assert_eq!(ids(&reorder(&list, &["c", "a", "b"]).unwrap()), vec!["c", "a", "b"]);
        assert!(reorder(&list, &["a", "a", "b"]).is_err());
        assert!(reorder(&list, &["a", "b"]).is_err());
        assert!(reorder(&list, &["a", "b", "c", "d"]).is_err());
    }

    #[test]
    fn reorder_keeps_records_with_repeated_ids() {
        let mut list = clients();
        let mut twin = list[0].clone();
        twin.name = "Twin".into();
        list.insert(1, twin);

        let next = reorder(&list, &["b", "c", "a"]).unwrap();
        assert_eq!(next.len(), list.len());
        assert_eq!(ids(&next), vec!["b", "c", "a", "a"]);
        assert_eq!(next[3].name, "Twin");
    }

    #[test]
    fn lenient_numbers() {
        assert_eq!(parse_number_or_zero("12.5"), 12.5);
        assert_eq!(parse_number_or_zero(" -3% "), -3.0);
        assert_eq!(parse_number_or_zero("1,200"), 1200.0);
        assert_eq!(parse_number_or_zero("abc"), 0.0);
        assert_eq!(parse_number_or_zero(""), 0.0);
        assert_eq!(parse_number_or_zero("NaN"), 0.0);
        assert_eq!(parse_number_or_zero("inf"), 0.0);
    }
}
