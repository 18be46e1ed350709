//! Search and column sorting over a store snapshot.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

pub trait Searchable {
    /// Text fields a search term is matched against.
    fn search_fields(&self) -> Vec<&str>;
}

pub trait Sortable {
    type Column: Copy + Eq;

    fn compare_by(&self, other: &Self, column: Self::Column) -> Ordering;
}

/// Case-insensitive substring match; a blank term keeps every record.
pub fn search<'a, T: Searchable>(items: &'a [T], term: &str) -> Vec<&'a T> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return items.iter().collect();
    }

    items
        .iter()
        .filter(|item| {
            item.search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&term))
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    #[serde(alias = "asc")]
    Ascending,
    #[serde(alias = "desc")]
    Descending,
}

/// Column sort state of a list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortState<C> {
    Unsorted,
    Sorted(C, SortDirection),
}

impl<C: Copy + Eq> SortState<C> {
    /// Re-selecting the active column cycles ascending, descending, unsorted.
    /// Selecting another column starts over at ascending.
    pub fn toggle(self, column: C) -> Self {
        match self {
            SortState::Sorted(current, SortDirection::Ascending) if current == column => {
                SortState::Sorted(column, SortDirection::Descending)
            }
            SortState::Sorted(current, SortDirection::Descending) if current == column => SortState::Unsorted,
            _ => SortState::Sorted(column, SortDirection::Ascending),
        }
    }

    pub fn from_params(column: Option<C>, direction: Option<SortDirection>) -> Self {
        match column {
            Some(column) => SortState::Sorted(column, direction.unwrap_or_default()),
            None => SortState::Unsorted,
        }
    }
}

/// Sorts in place; ties and the unsorted state keep store insertion order.
pub fn sort<T: Sortable>(items: &mut [&T], state: SortState<T::Column>) {
    let SortState::Sorted(column, direction) = state else {
        return;
    };
    items.sort_by(|a, b| {
        let ordering = a.compare_by(b, column);
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

/// List view query string: `?search=..&sort=<column>&direction=asc|desc`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListQuery<C> {
    pub search: Option<String>,
    pub sort: Option<C>,
    pub direction: Option<SortDirection>,
}

impl<C> Default for ListQuery<C> {
    fn default() -> Self {
        Self {
            search: None,
            sort: None,
            direction: None,
        }
    }
}

impl<C: Copy + Eq> ListQuery<C> {
    pub fn sort_state(&self) -> SortState<C> {
        SortState::from_params(self.sort, self.direction)
    }
}

/// Filters then sorts `items` according to `query`.
pub fn apply<'a, T>(items: &'a [T], query: &ListQuery<T::Column>) -> Vec<&'a T>
where
    T: Searchable + Sortable,
{
    let mut matched = search(items, query.search.as_deref().unwrap_or_default());
    sort(&mut matched, query.sort_state());
    matched
}
