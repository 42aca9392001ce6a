//! Filter Validator
//!
//! Checked before the list request is issued: a value the server would reject
//! never leaves the client, and the failure names the offending fields.

use std::fmt;

use super::catalog::{Catalog, FilterField};
use super::params::QueryState;

/// One "invalid" flag per filter field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub category: bool,
    pub sort_by: bool,
    pub order: bool,
}

impl ValidationResult {
    pub fn is_invalid(&self, field: FilterField) -> bool {
        match field {
            FilterField::Category => self.category,
            FilterField::SortBy => self.sort_by,
            FilterField::Order => self.order,
        }
    }

    fn mark(&mut self, field: FilterField) {
        match field {
            FilterField::Category => self.category = true,
            FilterField::SortBy => self.sort_by = true,
            FilterField::Order => self.order = true,
        }
    }

    pub fn any(&self) -> bool {
        FilterField::ALL.into_iter().any(|field| self.is_invalid(field))
    }

    pub fn invalid_fields(&self) -> impl Iterator<Item = FilterField> + '_ {
        FilterField::ALL.into_iter().filter(|field| self.is_invalid(*field))
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.invalid_fields().map(FilterField::key).collect();
        write!(f, "invalid value for {}", fields.join(", "))
    }
}

/// Check every present field of `query` against `catalog`.
pub fn validate(query: &QueryState, catalog: &Catalog) -> Result<(), ValidationResult> {
    let mut result = ValidationResult::default();

    for (field, value) in query.iter() {
        if !catalog.allows(field, value) {
            result.mark(field);
        }
    }

    if result.any() {
        Err(result)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_catalog_value_is_valid() {
        let catalog = Catalog::standard();

        for field in FilterField::ALL {
            assert!(validate(&QueryState::default().with(field, ""), &catalog).is_ok());

            for value in catalog.values(field) {
                let query = QueryState::default().with(field, value);
                assert!(validate(&query, &catalog).is_ok(), "{field}={value} should be valid");
            }
        }
    }

    #[test]
    fn test_unknown_value_marks_only_its_field() {
        let catalog = Catalog::standard();

        for field in FilterField::ALL {
            let query = QueryState::default().with(field, "chess");
            let result = validate(&query, &catalog).unwrap_err();

            for other in FilterField::ALL {
                assert_eq!(result.is_invalid(other), other == field);
            }
        }
    }

    #[test]
    fn test_mixed_query() {
        let query = QueryState::default()
            .with(FilterField::Category, "strategy")
            .with(FilterField::SortBy, "price")
            .with(FilterField::Order, "sideways");

        let result = validate(&query, &Catalog::standard()).unwrap_err();

        assert!(!result.category);
        assert!(result.sort_by);
        assert!(result.order);
        assert_eq!(result.to_string(), "invalid value for sort_by, order");
    }

    #[test]
    fn test_empty_query_is_valid() {
        assert!(validate(&QueryState::default(), &Catalog::standard()).is_ok());
    }

    #[test]
    fn test_values_are_case_sensitive() {
        let query = QueryState::default().with(FilterField::Order, "DESC");
        assert!(validate(&query, &Catalog::standard()).is_err());
    }
}
