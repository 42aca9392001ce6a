//! Review List Page
//!
//! Reads the filters from the location, validates them, requests the matching
//! reviews and the category list, and renders one of three states: loading,
//! error, or the filter controls with the results.

use std::collections::HashMap;

use iced::widget::{column, row, scrollable};
use iced::{Element, Length};
use iced_aw::Wrap;
use thiserror::Error;
use tracing::{debug, info};

use super::images::Images;
use super::select::SelectionControl;
use super::widgets;
use crate::api::ApiError;
use crate::filters::{validate, Catalog, FilterField, QueryState, ValidationResult};
use crate::nav::{Location, Route};
use crate::state::data::{Category, Review};
use crate::state::fetch::Fetch;

/// Why the review list could not be shown
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ListError {
    /// Rejected locally; no request was sent
    #[error("Invalid review filters: {0}")]
    InvalidFilters(ValidationResult),

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Clone)]
pub enum Message {
    Selected(FilterField, String),
    ReviewsLoaded(QueryState, Result<Vec<Review>, ApiError>),
    CategoriesLoaded(Result<Vec<Category>, ApiError>),
    Open(i64),
    Retry,
}

/// Side effects requested by the page
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    FetchReviews(QueryState),
    FetchCategories,
    Navigate(Location),
    LoadImages(Vec<String>),
}

/// What the page renders, checked in this order
#[derive(Debug, Clone, PartialEq)]
pub enum Status<'a> {
    Loading,
    Error(ListError),
    Ready(&'a [Review]),
}

#[derive(Debug)]
pub struct HomePage {
    location: Location,
    query: QueryState,
    controls: Vec<SelectionControl>,
    categories: Fetch<Vec<Category>>,
    /// Responses keyed by the query they answer; the latest response wins.
    /// One entry per distinct query visited, cleared only by `invalidate`.
    lists: HashMap<QueryState, Fetch<Vec<Review>>>,
    validation: Result<(), ValidationResult>,
}

impl HomePage {
    pub fn new(location: &Location) -> (Self, Vec<Action>) {
        let mut page = Self {
            location: location.clone(),
            query: QueryState::from_location(location),
            controls: FilterField::ALL
                .into_iter()
                .map(|field| SelectionControl::new(field, location))
                .collect(),
            categories: Fetch::Loading,
            lists: HashMap::new(),
            validation: Ok(()),
        };

        let mut actions = vec![Action::FetchCategories];
        actions.extend(page.request_reviews());

        (page, actions)
    }

    /// Location-change event; every control re-derives its value.
    pub fn on_location_changed(&mut self, location: &Location) -> Vec<Action> {
        self.location = location.clone();
        for control in &mut self.controls {
            control.on_location_changed(location);
        }
        self.query = QueryState::from_location(location);
        self.request_reviews()
    }

    pub fn update(&mut self, message: Message) -> Vec<Action> {
        match message {
            Message::Selected(field, value) => {
                let Some(control) = self.controls.iter_mut().find(|c| c.field() == field) else {
                    return Vec::new();
                };
                info!("Filter {field} set to {value:?}");
                vec![Action::Navigate(control.select(&self.location, &value))]
            }
            Message::ReviewsLoaded(query, result) => {
                let mut actions = Vec::new();
                if let Ok(reviews) = &result {
                    debug!("Loaded {} reviews", reviews.len());
                    let urls: Vec<String> = reviews.iter().map(|r| r.review_img_url.clone()).collect();
                    actions.push(Action::LoadImages(urls));
                }
                self.lists.insert(query, Fetch::from_result(result));
                actions
            }
            Message::CategoriesLoaded(result) => {
                self.categories = Fetch::from_result(result);

                // The category catalog may have changed under the current query
                let was_rejected = self.validation.is_err();
                self.validation = validate(&self.query, &self.catalog());
                let unrequested = was_rejected || !self.lists.contains_key(&self.query);
                if self.validation.is_ok() && unrequested {
                    self.request_reviews()
                } else {
                    Vec::new()
                }
            }
            Message::Open(review_id) => vec![Action::Navigate(Route::Review(review_id).location())],
            Message::Retry => {
                self.lists.remove(&self.query);
                let mut actions = Vec::new();
                if self.categories.error().is_some() {
                    self.categories = Fetch::Loading;
                    actions.push(Action::FetchCategories);
                }
                actions.extend(self.request_reviews());
                actions
            }
        }
    }

    /// Forget cached lists, e.g. after a vote changed a total
    pub fn invalidate(&mut self) {
        self.lists.clear();
    }

    /// Validate the current query and, if it passes, ask for its reviews
    fn request_reviews(&mut self) -> Vec<Action> {
        self.validation = validate(&self.query, &self.catalog());

        if let Err(result) = &self.validation {
            info!("Not fetching reviews: {result}");
            return Vec::new();
        }

        // Keep showing a previous response for this query while refreshing
        let entry = self.lists.entry(self.query.clone()).or_insert(Fetch::Loading);
        if entry.error().is_some() {
            *entry = Fetch::Loading;
        }

        vec![Action::FetchReviews(self.query.clone())]
    }

    /// Server categories when available, the static catalog otherwise
    pub fn catalog(&self) -> Catalog {
        match self.categories.loaded() {
            Some(categories) => Catalog::with_categories(categories),
            None => Catalog::standard(),
        }
    }

    #[cfg(test)]
    pub fn query(&self) -> &QueryState {
        &self.query
    }

    #[cfg(test)]
    pub fn control(&self, field: FilterField) -> Option<&SelectionControl> {
        self.controls.iter().find(|c| c.field() == field)
    }

    /// Whether the control for `field` should render in its error state
    pub fn field_error(&self, field: FilterField) -> bool {
        matches!(&self.validation, Err(result) if result.is_invalid(field))
    }

    pub fn status(&self) -> Status<'_> {
        let list = self.lists.get(&self.query);

        if self.categories.is_loading() || list.map_or(false, Fetch::is_loading) {
            return Status::Loading;
        }

        if let Err(result) = &self.validation {
            return Status::Error(ListError::InvalidFilters(*result));
        }

        match list {
            Some(Fetch::Failed(err)) => Status::Error(ListError::Api(err.clone())),
            Some(Fetch::Loaded(reviews)) => Status::Ready(reviews),
            _ => Status::Loading,
        }
    }

    pub fn view<'a>(&'a self, images: &Images) -> Element<'a, Message> {
        let body: Element<'a, Message> = match self.status() {
            Status::Loading => widgets::spinner(),
            Status::Error(ListError::InvalidFilters(result)) => column![
                self.filters(),
                widgets::display_message(
                    Some(result.to_string()),
                    "Please pick a valid option for the highlighted filters.",
                ),
            ]
            .spacing(16)
            .into(),
            Status::Error(ListError::Api(err)) => column![
                widgets::display_message(
                    Some(err.user_message()),
                    "Something went wrong whilst fetching the reviews. Please try again later.",
                ),
                iced::widget::button("Try again").on_press(Message::Retry),
            ]
            .spacing(12)
            .into(),
            Status::Ready(reviews) => {
                let results: Element<'a, Message> = if reviews.is_empty() {
                    widgets::display_message(None, "No reviews found")
                } else {
                    let cards = reviews
                        .iter()
                        .map(|review| {
                            widgets::preview_card(
                                review,
                                images.get(&review.review_img_url),
                                Message::Open(review.review_id),
                            )
                        })
                        .collect();

                    Wrap::with_elements(cards).spacing(16.0).line_spacing(16.0).into()
                };

                column![self.filters(), scrollable(results).height(Length::Fill)]
                    .spacing(16)
                    .into()
            }
        };

        column![widgets::heading("Reviews"), body].spacing(20).into()
    }

    /// One selection control per filter field
    fn filters(&self) -> Element<'_, Message> {
        let catalog = self.catalog();
        let controls = self.controls.iter().map(|control| {
            let field = control.field();
            control.view(catalog.options(field), self.field_error(field), Message::Selected)
        });

        row(controls).spacing(16).into()
    }

    #[cfg(test)]
    pub fn count(&self) -> usize {
        self.lists.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn loc(s: &str) -> Location {
        Location::parse(s)
    }

    fn review(id: i64) -> Review {
        Review {
            review_id: id,
            title: format!("Review {id}"),
            category: "strategy".to_string(),
            designer: "Uwe Rosenberg".to_string(),
            owner: "tickle122".to_string(),
            review_img_url: format!("https://images.example.com/{id}.png"),
            review_body: None,
            votes: id,
            created_at: Utc::now(),
            comment_count: 0,
        }
    }

    fn fetches_reviews(actions: &[Action]) -> bool {
        actions.iter().any(|a| matches!(a, Action::FetchReviews(_)))
    }

    #[test]
    fn test_empty_query_fetches_unfiltered_list() {
        let (mut page, actions) = HomePage::new(&loc("/reviews"));

        assert!(actions.contains(&Action::FetchCategories));
        assert!(actions.contains(&Action::FetchReviews(QueryState::default())));
        assert_eq!(page.status(), Status::Loading);

        page.update(Message::CategoriesLoaded(Ok(Vec::new())));
        // Still waiting for the list
        assert_eq!(page.status(), Status::Loading);

        page.update(Message::ReviewsLoaded(
            QueryState::default(),
            Ok(vec![review(1), review(2), review(3)]),
        ));
        match page.status() {
            Status::Ready(reviews) => assert_eq!(reviews.len(), 3),
            other => panic!("expected reviews, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_reviews_is_not_an_error() {
        let (mut page, _) = HomePage::new(&loc("/reviews"));
        page.update(Message::CategoriesLoaded(Ok(Vec::new())));
        page.update(Message::ReviewsLoaded(QueryState::default(), Ok(Vec::new())));

        assert_eq!(page.status(), Status::Ready(&[]));
    }

    #[test]
    fn test_invalid_category_never_requests_list() {
        let (mut page, actions) = HomePage::new(&loc("/reviews?category=chess"));

        assert!(!fetches_reviews(&actions));
        assert_eq!(actions, vec![Action::FetchCategories]);

        let actions = page.update(Message::CategoriesLoaded(Err(ApiError::Transport(
            "offline".to_string(),
        ))));
        assert!(!fetches_reviews(&actions));

        assert!(page.field_error(FilterField::Category));
        assert!(!page.field_error(FilterField::SortBy));
        assert!(!page.field_error(FilterField::Order));
        assert!(matches!(
            page.status(),
            Status::Error(ListError::InvalidFilters(result)) if result.category && !result.order
        ));
        assert_eq!(page.count(), 0);
    }

    #[test]
    fn test_transport_error_is_generic() {
        let (mut page, _) = HomePage::new(&loc("/reviews?order=desc"));
        page.update(Message::CategoriesLoaded(Ok(Vec::new())));

        let query = page.query().clone();
        page.update(Message::ReviewsLoaded(
            query,
            Err(ApiError::from_status(500, r#"{"msg":"Internal Server Error"}"#)),
        ));

        assert!(matches!(page.status(), Status::Error(ListError::Api(_))));
        for field in FilterField::ALL {
            assert!(!page.field_error(field));
        }
    }

    #[test]
    fn test_selecting_navigates_and_navigation_refetches() {
        let (mut page, _) = HomePage::new(&loc("/reviews"));

        let actions = page.update(Message::Selected(FilterField::Category, "dexterity".to_string()));
        let target = loc("/reviews?category=dexterity");
        assert_eq!(actions, vec![Action::Navigate(target.clone())]);

        let actions = page.on_location_changed(&target);
        let expected = QueryState::from_location(&target);
        assert_eq!(actions, vec![Action::FetchReviews(expected)]);
        assert_eq!(page.control(FilterField::Category).unwrap().value(), "dexterity");
    }

    #[test]
    fn test_back_navigation_resets_controls() {
        let (mut page, _) = HomePage::new(&loc("/reviews?category=strategy"));
        assert_eq!(page.control(FilterField::Category).unwrap().value(), "strategy");

        page.on_location_changed(&loc("/reviews?category="));
        assert_eq!(page.control(FilterField::Category).unwrap().value(), "");
    }

    #[test]
    fn test_dynamic_categories_can_validate_a_query() {
        let (mut page, actions) = HomePage::new(&loc("/reviews?category=social+deduction"));
        assert!(!fetches_reviews(&actions));

        let actions = page.update(Message::CategoriesLoaded(Ok(vec![Category {
            slug: "social deduction".to_string(),
            description: String::new(),
        }])));

        assert!(fetches_reviews(&actions));
        assert!(!page.field_error(FilterField::Category));
        assert_eq!(page.status(), Status::Loading);
    }

    #[test]
    fn test_stale_response_does_not_replace_current_list() {
        let (mut page, _) = HomePage::new(&loc("/reviews"));
        page.update(Message::CategoriesLoaded(Ok(Vec::new())));

        let newer = loc("/reviews?sort_by=votes");
        page.on_location_changed(&newer);

        // The response for the superseded query lands late
        page.update(Message::ReviewsLoaded(QueryState::default(), Ok(vec![review(1)])));
        assert_eq!(page.status(), Status::Loading);

        page.update(Message::ReviewsLoaded(
            QueryState::from_location(&newer),
            Ok(vec![review(2), review(3)]),
        ));
        assert!(matches!(page.status(), Status::Ready(reviews) if reviews.len() == 2));
    }

    #[test]
    fn test_loaded_reviews_request_cover_images() {
        let (mut page, _) = HomePage::new(&loc("/reviews"));
        let actions = page.update(Message::ReviewsLoaded(QueryState::default(), Ok(vec![review(7)])));

        assert_eq!(
            actions,
            vec![Action::LoadImages(vec!["https://images.example.com/7.png".to_string()])]
        );
    }
}
