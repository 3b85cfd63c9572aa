//! Search and filter matching over a row set.
//!
//! Search is a case-insensitive substring test over the searchable fields;
//! filters are case-insensitive exact matches. Both run on the rows' shadow
//! values, never on rendered cells.

use crate::filter::{ActiveFilters, Filter};
use crate::row::Row;

/// Everything the row filter depends on.
#[derive(Debug, Clone, Copy)]
pub struct Query<'a> {
    pub search: &'a str,
    pub searchable: bool,
    pub searchable_fields: &'a [String],
    pub filters: &'a [Filter],
    pub active: &'a ActiveFilters,
}

/// True when at least one of `fields` contains `needle_lower`.
/// `needle_lower` must already be lowercase.
pub fn matches_search(row: &Row, needle_lower: &str, fields: &[String]) -> bool {
    fields
        .iter()
        .any(|field| row.raw(field).to_lowercase().contains(needle_lower))
}

/// True when the row satisfies every active selection.
pub fn matches_filters(row: &Row, filters: &[Filter], active: &ActiveFilters) -> bool {
    active.iter().all(|(name, selection)| {
        let key = filters
            .iter()
            .find(|f| f.name == name)
            .map_or(name, Filter::key);
        row.raw(key).to_lowercase() == selection.to_lowercase()
    })
}

/// Indices of the rows that pass search and filters, in original order.
pub fn filter_rows(rows: &[Row], query: &Query<'_>) -> Vec<usize> {
    let needle = if query.searchable && !query.search.is_empty() {
        Some(query.search.to_lowercase())
    } else {
        None
    };

    rows.iter()
        .enumerate()
        .filter(|(_, row)| {
            needle
                .as_deref()
                .map_or(true, |n| matches_search(row, n, query.searchable_fields))
        })
        .filter(|(_, row)| matches_filters(row, query.filters, query.active))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sights() -> Vec<Row> {
        vec![
            Row::new()
                .field("name", "Kontiki Park")
                .field("city", "Pokhara")
                .field("kind", "Park"),
            Row::new()
                .field("name", "Oxbow Lake")
                .field("city", "Chitwan")
                .field("kind", "Lake"),
            Row::new()
                .field("name", "Phewa Lake")
                .field("city", "Pokhara")
                .field("kind", "Lake"),
        ]
    }

    fn fields(keys: &[&str]) -> Vec<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_empty_query_keeps_all() {
        let rows = sights();
        let active = ActiveFilters::new();
        let f = fields(&["name"]);
        let q = Query {
            search: "",
            searchable: true,
            searchable_fields: &f,
            filters: &[],
            active: &active,
        };
        assert_eq!(filter_rows(&rows, &q), vec![0, 1, 2]);
    }

    #[test]
    fn test_search_only_checks_listed_fields() {
        let rows = sights();
        let active = ActiveFilters::new();
        let f = fields(&["name"]);
        let q = Query {
            search: "pokhara",
            searchable: true,
            searchable_fields: &f,
            filters: &[],
            active: &active,
        };
        assert!(filter_rows(&rows, &q).is_empty());
    }

    #[test]
    fn test_search_disabled_ignores_query() {
        let rows = sights();
        let active = ActiveFilters::new();
        let f = fields(&["name"]);
        let q = Query {
            search: "zzz",
            searchable: false,
            searchable_fields: &f,
            filters: &[],
            active: &active,
        };
        assert_eq!(filter_rows(&rows, &q).len(), 3);
    }

    #[test]
    fn test_filter_is_exact_and_case_insensitive() {
        let rows = sights();
        let filters = vec![Filter::new("Kind", ["Lake", "Park"]).with_key("kind")];
        let active: ActiveFilters = [("Kind", "lake")].into_iter().collect();
        let q = Query {
            search: "",
            searchable: true,
            searchable_fields: &[],
            filters: &filters,
            active: &active,
        };
        assert_eq!(filter_rows(&rows, &q), vec![1, 2]);

        // A substring of the value does not match a filter
        let partial: ActiveFilters = [("Kind", "La")].into_iter().collect();
        let q = Query {
            active: &partial,
            ..q
        };
        assert!(filter_rows(&rows, &q).is_empty());
    }

    #[test]
    fn test_search_and_filter_combine() {
        let rows = sights();
        let filters = vec![Filter::new("city", ["Pokhara", "Chitwan"])];
        let active: ActiveFilters = [("city", "Pokhara")].into_iter().collect();
        let f = fields(&["name"]);
        let q = Query {
            search: "LAKE",
            searchable: true,
            searchable_fields: &f,
            filters: &filters,
            active: &active,
        };
        assert_eq!(filter_rows(&rows, &q), vec![2]);
    }

    #[test]
    fn test_unknown_filter_name_uses_name_as_key() {
        let rows = sights();
        let active: ActiveFilters = [("city", "chitwan")].into_iter().collect();
        assert!(!matches_filters(&rows[0], &[], &active));
        assert!(matches_filters(&rows[1], &[], &active));
    }

    #[test]
    fn test_missing_field_never_matches() {
        let row = Row::new().field("name", "Oxbow Lake");
        assert!(!matches_search(&row, "x", &fields(&["missing"])));
    }
}
