//! Selection Control
//!
//! A dropdown bound to one filter field. Its displayed value is always
//! derived from the current location: it is seeded on creation and re-derived
//! on every location change, whatever caused the change.

use iced::widget::{column, pick_list, text};
use iced::{Element, Length, Theme};

use crate::filters::{params, FilterField, FilterOption};
use crate::nav::Location;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionControl {
    field: FilterField,
    value: String,
}

impl SelectionControl {
    /// Seed the control from the location it is mounted at
    pub fn new(field: FilterField, location: &Location) -> Self {
        Self {
            field,
            value: derive_value(field, location),
        }
    }

    pub fn field(&self) -> FilterField {
        self.field
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Location changed: unconditionally re-derive the displayed value
    pub fn on_location_changed(&mut self, location: &Location) {
        self.value = derive_value(self.field, location);
    }

    /// User picked `value`: show it and return the location to navigate to.
    ///
    /// The field is added to the query string when `value` is non-empty and
    /// removed when it is empty.
    pub fn select(&mut self, location: &Location, value: &str) -> Location {
        self.value = value.to_string();
        params::with_param(location, self.field.key(), value)
    }

    pub fn view<'a, Message: Clone + 'a>(
        &'a self,
        options: Vec<FilterOption>,
        invalid: bool,
        on_select: impl Fn(FilterField, String) -> Message + 'a,
    ) -> Element<'a, Message> {
        let selected = options
            .iter()
            .find(|option| option.value == self.value)
            .cloned()
            .unwrap_or_else(|| FilterOption::new(self.value.clone()));

        let field = self.field;
        let dropdown = pick_list(options, Some(selected), move |option: FilterOption| {
            on_select(field, option.value)
        })
        .width(Length::Fixed(190.0))
        .style(move |theme: &Theme, status| {
            let mut style = pick_list::default(theme, status);
            if invalid {
                style.border.color = theme.palette().danger;
                style.border.width = 2.0;
            }
            style
        });

        let label = if invalid {
            text(format!("{} (invalid)", field.label())).style(text::danger)
        } else {
            text(field.label())
        };

        column![label.size(14), dropdown].spacing(4).into()
    }
}

/// The value a control for `field` shows at `location`
pub fn derive_value(field: FilterField, location: &Location) -> String {
    params::read(location, field.key())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_from_location() {
        let location = Location::parse("/reviews?category=strategy&order=desc");

        assert_eq!(SelectionControl::new(FilterField::Category, &location).value(), "strategy");
        assert_eq!(SelectionControl::new(FilterField::Order, &location).value(), "desc");
        assert_eq!(SelectionControl::new(FilterField::SortBy, &location).value(), "");
    }

    #[test]
    fn test_navigation_resets_value() {
        let mut control =
            SelectionControl::new(FilterField::Category, &Location::parse("/reviews?category=strategy"));
        assert_eq!(control.value(), "strategy");

        control.on_location_changed(&Location::parse("/reviews?category="));
        assert_eq!(control.value(), "");
    }

    #[test]
    fn test_navigation_overrides_local_pick() {
        let start = Location::parse("/reviews");
        let mut control = SelectionControl::new(FilterField::SortBy, &start);

        control.select(&start, "votes");
        assert_eq!(control.value(), "votes");

        // e.g. browser back before the pick was applied
        control.on_location_changed(&start);
        assert_eq!(control.value(), "");
    }

    #[test]
    fn test_select_edits_query_string() {
        let start = Location::parse("/reviews?order=asc");
        let mut control = SelectionControl::new(FilterField::Category, &start);

        let next = control.select(&start, "dexterity");
        assert_eq!(next.to_string(), "/reviews?order=asc&category=dexterity");

        let cleared = control.select(&next, "");
        assert_eq!(cleared.to_string(), "/reviews?order=asc");
    }
}
