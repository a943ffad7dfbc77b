//! Derived views: search, facet filter and sort over an in-memory list.
//!
//! Views are recomputed from the full list each time; the source slice is
//! only borrowed.

use crate::error::{Result, RouteError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// What a derived view needs to know about a record.
pub trait Listing {
    /// Facet type matched by [`Filter::Only`]. Use `()` when there is none.
    type Facet: PartialEq + Copy;

    /// Fields searched by the substring predicate.
    fn search_fields(&self) -> Vec<&str>;

    /// Label used by the alphabetical sorts.
    fn sort_label(&self) -> &str;

    /// Epoch millis of the last touch, for [`SortOrder::Recent`].
    fn touched_at(&self) -> i64 {
        0
    }

    fn facet(&self) -> Self::Facet;
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter<F> {
    All,
    Only(F),
}

impl<F> Default for Filter<F> {
    fn default() -> Self {
        Filter::All
    }
}

impl<F: PartialEq> Filter<F> {
    pub fn matches(&self, facet: &F) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(wanted) => wanted == facet,
        }
    }
}

impl<F: FromStr<Err = RouteError>> FromStr for Filter<F> {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(Filter::All);
        }
        s.parse().map(Filter::Only)
    }
}

/// Parse an optional query-string filter; missing means [`Filter::All`].
pub fn parse_filter<F: FromStr<Err = RouteError>>(value: Option<&str>) -> Result<Filter<F>> {
    value.map(str::parse).transpose().map(Option::unwrap_or_default)
}

// ---------------------------------------------------------------------------
// SortOrder
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    NameAsc,
    NameDesc,
    Recent,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::NameAsc => "name-asc",
            SortOrder::NameDesc => "name-desc",
            SortOrder::Recent => "recent",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name-asc" | "name" | "az" | "a-z" => Ok(SortOrder::NameAsc),
            "name-desc" | "za" | "z-a" => Ok(SortOrder::NameDesc),
            "recent" | "recently-touched" | "latest" => Ok(SortOrder::Recent),
            _ => Err(RouteError::UnknownVariant {
                kind: "sort order",
                value: s.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// ViewQuery / derive
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ViewQuery<F> {
    pub search: String,
    pub filter: Filter<F>,
    pub sort: Option<SortOrder>,
}

impl<F> Default for ViewQuery<F> {
    fn default() -> Self {
        Self {
            search: String::new(),
            filter: Filter::All,
            sort: None,
        }
    }
}

impl<F> ViewQuery<F> {
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = text.into();
        self
    }

    pub fn filter(mut self, filter: Filter<F>) -> Self {
        self.filter = filter;
        self
    }

    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = Some(sort);
        self
    }
}

/// Case-insensitive substring match of `needle` in any of `fields`.
/// A blank needle matches everything.
pub fn matches_search<'a>(fields: impl IntoIterator<Item = &'a str>, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    fields
        .into_iter()
        .any(|f| f.to_lowercase().contains(&needle))
}

fn compare<T: Listing>(sort: SortOrder, a: &T, b: &T) -> Ordering {
    match sort {
        SortOrder::NameAsc => a
            .sort_label()
            .to_lowercase()
            .cmp(&b.sort_label().to_lowercase()),
        SortOrder::NameDesc => b
            .sort_label()
            .to_lowercase()
            .cmp(&a.sort_label().to_lowercase()),
        SortOrder::Recent => b.touched_at().cmp(&a.touched_at()),
    }
}

/// Apply search, filter and sort to `items`, returning a new list.
pub fn derive<T>(items: &[T], query: &ViewQuery<T::Facet>) -> Vec<T>
where
    T: Listing + Clone,
{
    let mut view: Vec<T> = items
        .iter()
        .filter(|item| query.filter.matches(&item.facet()))
        .filter(|item| matches_search(item.search_fields(), &query.search))
        .cloned()
        .collect();
    if let Some(sort) = query.sort {
        // stable: ties keep source order
        view.sort_by(|a, b| compare(sort, a, b));
    }
    view
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::client::{Client, ClientStatus};
    use chrono::{TimeZone, Utc};

    fn book() -> Vec<Client> {
        let mut a = Client::new("1", "beatrice", "Umbrella", "bea@umbrella.co", ClientStatus::Active);
        a.last_contact = Some(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap());
        let mut b = Client::new("2", "Adam", "Acme", "adam@acme.com", ClientStatus::Lead);
        b.last_contact = Some(Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap());
        let c = Client::new("3", "Carla", "Acme", "carla@acme.com", ClientStatus::Active);
        vec![a, b, c]
    }

    fn ids(list: &[Client]) -> Vec<&str> {
        list.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn empty_query_keeps_everything_in_order() {
        let list = book();
        assert_eq!(ids(&derive(&list, &ViewQuery::default())), vec!["1", "2", "3"]);
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let list = book();
        let q = ViewQuery::default().search("ACME");
        assert_eq!(ids(&derive(&list, &q)), vec!["2", "3"]);
        let q = ViewQuery::default().search("  bea@ ");
        assert_eq!(ids(&derive(&list, &q)), vec!["1"]);
    }

    #[test]
    fn filter_by_status() {
        let list = book();
        let q = ViewQuery::default().filter(Filter::Only(ClientStatus::Active));
        assert_eq!(ids(&derive(&list, &q)), vec!["1", "3"]);
    }

    #[test]
    fn sorts() {
        let list = book();
        let asc = ViewQuery::default().sort(SortOrder::NameAsc);
        assert_eq!(ids(&derive(&list, &asc)), vec!["2", "1", "3"]);
        let desc = ViewQuery::default().sort(SortOrder::NameDesc);
        assert_eq!(ids(&derive(&list, &desc)), vec!["3", "1", "2"]);
        let recent = ViewQuery::default().sort(SortOrder::Recent);
        assert_eq!(ids(&derive(&list, &recent)), vec!["2", "1", "3"]);
    }

    #[test]
    fn derive_is_pure() {
        let list = book();
        let snapshot = list.clone();
        let q = ViewQuery::default()
            .search("a")
            .filter(Filter::Only(ClientStatus::Active))
            .sort(SortOrder::NameDesc);
        let first = derive(&list, &q);
        let second = derive(&list, &q);
        assert_eq!(first, second);
        assert_eq!(list, snapshot);
    }

    #[test]
    fn parse_filter_and_sort() {
        let f: Filter<ClientStatus> = "All".parse().unwrap();
        assert_eq!(f, Filter::All);
        let f: Filter<ClientStatus> = "churned".parse().unwrap();
        assert_eq!(f, Filter::Only(ClientStatus::Churned));
        assert!("nonsense".parse::<Filter<ClientStatus>>().is_err());
        assert_eq!(parse_filter::<ClientStatus>(None).unwrap(), Filter::All);
        assert_eq!("Z-A".parse::<SortOrder>().unwrap(), SortOrder::NameDesc);
        assert!("sideways".parse::<SortOrder>().is_err());
    }
}
