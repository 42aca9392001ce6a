//! Filter Option Catalog
//!
//! The closed set of values each review filter accepts. Every catalog is
//! implicitly prefixed with the empty string, which means "no filter, use the
//! server default".

use std::fmt;

use crate::format::option_label;
use crate::state::data::Category;

/// Categories known before the server has been asked
const CATEGORIES: [&str; 7] = [
    "strategy",
    "hidden-roles",
    "dexterity",
    "push-your-luck",
    "roll-and-write",
    "deck-building",
    "engine-building",
];

const SORT_COLUMNS: [&str; 6] = [
    "title",
    "category",
    "votes",
    "designer", // game designer
    "owner",    // author of review
    "created_at",
];

const ORDERS: [&str; 2] = ["asc", "desc"];

/// One of the query-string controlled review list filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterField {
    Category,
    SortBy,
    Order,
}

impl FilterField {
    pub const ALL: [FilterField; 3] = [FilterField::Category, FilterField::SortBy, FilterField::Order];

    /// Query string key
    pub fn key(self) -> &'static str {
        match self {
            FilterField::Category => "category",
            FilterField::SortBy => "sort_by",
            FilterField::Order => "order",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }

    /// Label shown above the selection control
    pub fn label(self) -> &'static str {
        match self {
            FilterField::Category => "Category",
            FilterField::SortBy => "Sort by",
            FilterField::Order => "Order",
        }
    }

    /// Text of the "unset" entry in the control
    pub fn unset_text(self) -> &'static str {
        match self {
            FilterField::Category => "Clear filter",
            FilterField::SortBy | FilterField::Order => "Default",
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A selectable value with an optional human-readable label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    pub value: String,
    pub label: Option<String>,
}

impl FilterOption {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let label = option_label(&value);
        Self { value, label }
    }

    /// The "unset" sentinel entry
    pub fn unset(field: FilterField) -> Self {
        Self {
            value: String::new(),
            label: Some(field.unset_text().to_string()),
        }
    }

    #[cfg(test)]
    pub fn is_unset(&self) -> bool {
        self.value.is_empty()
    }
}

impl fmt::Display for FilterOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label.as_deref().unwrap_or(&self.value))
    }
}

/// Allowed values for every filter field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    categories: Vec<String>,
    sort_columns: Vec<String>,
    orders: Vec<String>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl Catalog {
    /// The static catalog
    pub fn standard() -> Self {
        Self {
            categories: CATEGORIES.iter().map(|s| s.to_string()).collect(),
            sort_columns: SORT_COLUMNS.iter().map(|s| s.to_string()).collect(),
            orders: ORDERS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Catalog whose categories come from the server.
    ///
    /// An empty list keeps the static categories.
    pub fn with_categories(categories: &[Category]) -> Self {
        let mut catalog = Self::standard();
        if !categories.is_empty() {
            catalog.categories = categories.iter().map(|c| c.slug.clone()).collect();
        }
        catalog
    }

    /// Allowed values for `field`, without the empty sentinel
    pub fn values(&self, field: FilterField) -> &[String] {
        match field {
            FilterField::Category => &self.categories,
            FilterField::SortBy => &self.sort_columns,
            FilterField::Order => &self.orders,
        }
    }

    /// Whether `value` is acceptable for `field`. The empty string always is.
    pub fn allows(&self, field: FilterField, value: &str) -> bool {
        value.is_empty() || self.values(field).iter().any(|v| v == value)
    }

    /// Options for a selection control, sentinel first
    pub fn options(&self, field: FilterField) -> Vec<FilterOption> {
        std::iter::once(FilterOption::unset(field))
            .chain(self.values(field).iter().map(FilterOption::new))
            .collect()
    }
}
