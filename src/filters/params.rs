//! Search-Param Reader and Query State
//!
//! Everything here is derived from a `Location`; nothing is stored on the side.

use std::collections::BTreeMap;

use url::form_urlencoded;

use super::catalog::FilterField;
use crate::nav::Location;

/// Value of `key` in the location's query string, or `""` when absent.
///
/// A repeated key yields its first value.
pub fn read(location: &Location, key: &str) -> String {
    form_urlencoded::parse(location.query().as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
        .unwrap_or_default()
}

/// Location with `key` set to `value`, or removed when `value` is empty.
///
/// Other parameters keep their order; an existing key is updated in place.
pub fn with_param(location: &Location, key: &str, value: &str) -> Location {
    let mut pairs: Vec<(String, String)> = form_urlencoded::parse(location.query().as_bytes())
        .into_owned()
        .collect();

    if value.is_empty() {
        pairs.retain(|(k, _)| k != key);
    } else if let Some(index) = pairs.iter().position(|(k, _)| k == key) {
        pairs[index].1 = value.to_string();
        // Drop any duplicates behind the first occurrence
        let mut seen = false;
        pairs.retain(|(k, _)| {
            if k != key {
                return true;
            }
            let keep = !seen;
            seen = true;
            keep
        });
    } else {
        pairs.push((key.to_string(), value.to_string()));
    }

    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();

    location.with_query(query)
}

/// The review filters currently expressed by the query string.
///
/// Only recognised keys are kept. A key that is present with an empty value
/// is kept as `""`, which every field accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct QueryState {
    values: BTreeMap<FilterField, String>,
}

impl QueryState {
    pub fn from_location(location: &Location) -> Self {
        let values = form_urlencoded::parse(location.query().as_bytes())
            .filter_map(|(key, _)| FilterField::from_key(&key))
            .map(|field| (field, read(location, field.key())))
            .collect();

        Self { values }
    }

    /// Selected value for `field`, `""` when not present
    #[cfg(test)]
    pub fn get(&self, field: FilterField) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    #[cfg(test)]
    pub fn is_present(&self, field: FilterField) -> bool {
        self.values.contains_key(&field)
    }

    /// Present fields with their values
    pub fn iter(&self) -> impl Iterator<Item = (FilterField, &str)> {
        self.values.iter().map(|(field, value)| (*field, value.as_str()))
    }

    /// Query parameters for the list request; empty values are left out
    pub fn request_pairs(&self) -> Vec<(&'static str, String)> {
        self.iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(field, value)| (field.key(), value.to_string()))
            .collect()
    }

    #[cfg(test)]
    pub fn with(mut self, field: FilterField, value: &str) -> Self {
        self.values.insert(field, value.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(s: &str) -> Location {
        Location::parse(s)
    }

    #[test]
    fn test_read_present_and_absent_keys() {
        let location = loc("/reviews?category=strategy");
        assert_eq!(read(&location, "category"), "strategy");
        assert_eq!(read(&location, "sort_by"), "");
        assert_eq!(read(&location, "order"), "");
    }

    #[test]
    fn test_read_decodes_values() {
        let location = loc("/reviews?category=social+deduction&sort_by=created%5Fat");
        assert_eq!(read(&location, "category"), "social deduction");
        assert_eq!(read(&location, "sort_by"), "created_at");
    }

    #[test]
    fn test_read_empty_value() {
        assert_eq!(read(&loc("/reviews?category="), "category"), "");
    }

    #[test]
    fn test_with_param_adds_updates_and_removes() {
        let location = loc("/reviews?sort_by=votes");

        let added = with_param(&location, "category", "dexterity");
        assert_eq!(added.to_string(), "/reviews?sort_by=votes&category=dexterity");

        let updated = with_param(&added, "sort_by", "title");
        assert_eq!(updated.to_string(), "/reviews?sort_by=title&category=dexterity");

        let removed = with_param(&updated, "sort_by", "");
        assert_eq!(removed.to_string(), "/reviews?category=dexterity");

        let cleared = with_param(&removed, "category", "");
        assert_eq!(cleared.to_string(), "/reviews");
    }

    #[test]
    fn test_query_state_ignores_unknown_keys() {
        let state = QueryState::from_location(&loc("/reviews?page=2&order=desc&category="));

        assert_eq!(state.get(FilterField::Order), "desc");
        assert!(state.is_present(FilterField::Category));
        assert!(!state.is_present(FilterField::SortBy));
        assert_eq!(state.iter().count(), 2);
    }

    #[test]
    fn test_request_pairs_skip_empty_values() {
        let state = QueryState::from_location(&loc("/reviews?category=&sort_by=votes"));
        assert_eq!(state.request_pairs(), vec![("sort_by", "votes".to_string())]);

        assert!(QueryState::default().request_pairs().is_empty());
    }
}
