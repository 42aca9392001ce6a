use std::collections::HashSet;
use std::time::{Duration, Instant};

use iced::widget::{button, column, container, horizontal_space, row, stack, text, text_input};
use iced::{Alignment, Element, Length, Subscription, Task, Theme};
use thiserror::Error;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod filters;
mod format;
mod nav;
mod state;
mod ui;

use api::{ApiClient, ApiError};
use config::{Config, ConfigError};
use nav::{History, Location, Route};
use state::session::Session;
use state::data::Review;
use state::votes::{VotePlan, VoteState, VoteStore};
use ui::accounts::{self, AccountsPage};
use ui::home::{self, HomePage};
use ui::images::Images;
use ui::notifications::{Notice, Notifications};
use ui::review::{self, ReviewPage};
use ui::widgets;

/// Anything that stops the app from starting
#[derive(Error, Debug)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to open the vote store: {0}")]
    Store(#[from] rusqlite::Error),

    #[error(transparent)]
    Ui(#[from] iced::Error),
}

/// The page currently on screen
enum Page {
    Reviews,
    Review(ReviewPage),
    Accounts(AccountsPage),
    NotFound,
}

/// Main application state
struct ReviewBoard {
    api: ApiClient,
    history: History,
    /// Contents of the address bar, which may differ from the location while typing
    address: String,
    session: Session,
    votes: VoteStore,
    /// Reviews with a vote request in flight
    voting: HashSet<i64>,
    /// Created on the first visit to the list and kept so its cache survives navigation
    home: Option<HomePage>,
    page: Page,
    images: Images,
    notifications: Notifications,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    Home(home::Message),
    /// Tagged with the review it belongs to so late responses are dropped
    Review(i64, review::Message),
    Accounts(accounts::Message),
    /// A vote request resolved; handled even if its review is no longer shown
    VoteFinished {
        username: String,
        review_id: i64,
        plan: VotePlan,
        result: Result<Review, ApiError>,
    },
    Navigate(Location),
    Back,
    Forward,
    AddressChanged(String),
    AddressSubmitted,
    Logout,
    ImageLoaded(String, Result<Vec<u8>, ApiError>),
    DismissNotice(u64),
    Tick(Instant),
}

impl ReviewBoard {
    fn new(config: Config, votes: VoteStore) -> (Self, Task<Message>) {
        let mut app = Self {
            api: ApiClient::new(&config.api_url),
            history: History::new(config.start.clone()),
            address: config.start.to_string(),
            session: Session::default(),
            votes,
            voting: HashSet::new(),
            home: None,
            page: Page::NotFound,
            images: Images::default(),
            notifications: Notifications::new(config.toast_lifetime),
        };

        info!("Using API at {}", app.api.base_url());
        let task = app.location_changed();
        (app, task)
    }

    fn title(&self) -> String {
        let page = match &self.page {
            Page::Reviews => "Reviews",
            Page::Review(_) => "Review",
            Page::Accounts(_) => "Switch Account",
            Page::NotFound => "Page not found",
        };
        format!("Socialite - {page}")
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Home(message) => match self.home.as_mut() {
                Some(page) => {
                    let actions = page.update(message);
                    self.run_home(actions)
                }
                None => Task::none(),
            },
            Message::Review(review_id, message) => match &mut self.page {
                Page::Review(page) if page.review_id() == review_id => {
                    let actions = page.update(message, &self.session);
                    self.run_review(actions)
                }
                _ => Task::none(),
            },
            Message::Accounts(message) => match &mut self.page {
                Page::Accounts(page) => {
                    let actions = page.update(message);
                    self.run_accounts(actions)
                }
                _ => Task::none(),
            },
            Message::VoteFinished {
                username,
                review_id,
                plan,
                result,
            } => {
                self.settle_vote(&username, review_id, plan, &result);

                match &mut self.page {
                    Page::Review(page) if page.review_id() == review_id => {
                        // A page reopened mid-vote shows stored flags, now updated
                        let reopened = !page.owns_vote();
                        let actions = page.update(review::Message::VoteFinished(result), &self.session);
                        if reopened {
                            self.refresh_votes();
                        }
                        self.run_review(actions)
                    }
                    _ => Task::none(),
                }
            }
            Message::Navigate(location) => self.navigate(location),
            Message::Back => match self.history.back() {
                Some(_) => self.location_changed(),
                None => Task::none(),
            },
            Message::Forward => match self.history.forward() {
                Some(_) => self.location_changed(),
                None => Task::none(),
            },
            Message::AddressChanged(address) => {
                self.address = address;
                Task::none()
            }
            Message::AddressSubmitted => {
                let location = Location::parse(self.address.trim());
                self.navigate(location)
            }
            Message::Logout => {
                self.session.logout();
                self.refresh_votes();
                self.notify(Notice::success("Logged out"));
                Task::none()
            }
            Message::ImageLoaded(url, result) => {
                self.images.insert(url, result);
                Task::none()
            }
            Message::DismissNotice(id) => {
                self.notifications.dismiss(id);
                Task::none()
            }
            Message::Tick(now) => {
                self.notifications.expire(now);
                Task::none()
            }
        }
    }

    fn navigate(&mut self, location: Location) -> Task<Message> {
        self.history.push(location);
        self.location_changed()
    }

    /// Show the page for the current location
    fn location_changed(&mut self) -> Task<Message> {
        let location = self.history.current().clone();
        self.address = location.to_string();

        match location.route() {
            Route::Root => {
                let target = Route::Reviews.location().with_query(location.query().to_string());
                self.history.replace(target);
                self.location_changed()
            }
            Route::Reviews => {
                let actions = match self.home.as_mut() {
                    Some(page) => page.on_location_changed(&location),
                    None => {
                        let (page, actions) = HomePage::new(&location);
                        self.home = Some(page);
                        actions
                    }
                };
                self.page = Page::Reviews;
                self.run_home(actions)
            }
            Route::Review(review_id) => {
                let (mut page, actions) = ReviewPage::new(review_id, self.stored_votes(review_id));
                if self.voting.contains(&review_id) {
                    page.await_vote();
                }
                self.page = Page::Review(page);
                self.run_review(actions)
            }
            Route::SwitchAccount => {
                let (page, actions) = AccountsPage::new();
                self.page = Page::Accounts(page);
                self.run_accounts(actions)
            }
            Route::NotFound => {
                warn!("No page at {location}");
                self.page = Page::NotFound;
                Task::none()
            }
        }
    }

    fn run_home(&mut self, actions: Vec<home::Action>) -> Task<Message> {
        let mut tasks = Vec::new();

        for action in actions {
            let task = match action {
                home::Action::FetchReviews(query) => {
                    let api = self.api.clone();
                    Task::perform(
                        async move {
                            let result = api.fetch_reviews(&query).await;
                            (query, result)
                        },
                        |(query, result)| Message::Home(home::Message::ReviewsLoaded(query, result)),
                    )
                }
                home::Action::FetchCategories => {
                    let api = self.api.clone();
                    Task::perform(async move { api.fetch_categories().await }, |result| {
                        Message::Home(home::Message::CategoriesLoaded(result))
                    })
                }
                home::Action::Navigate(location) => self.navigate(location),
                home::Action::LoadImages(urls) => self.load_images(urls),
            };
            tasks.push(task);
        }

        Task::batch(tasks)
    }

    fn run_review(&mut self, actions: Vec<review::Action>) -> Task<Message> {
        let mut tasks = Vec::new();

        for action in actions {
            let task = match action {
                review::Action::FetchReview(review_id) => {
                    let api = self.api.clone();
                    Task::perform(async move { api.fetch_review(review_id).await }, move |result| {
                        Message::Review(review_id, review::Message::ReviewLoaded(result))
                    })
                }
                review::Action::FetchComments(review_id) => {
                    let api = self.api.clone();
                    Task::perform(async move { api.fetch_comments(review_id).await }, move |result| {
                        Message::Review(review_id, review::Message::CommentsLoaded(result))
                    })
                }
                review::Action::PatchVotes {
                    username,
                    review_id,
                    plan,
                } => {
                    self.voting.insert(review_id);
                    let api = self.api.clone();
                    Task::perform(
                        async move { api.patch_votes(review_id, plan.inc_votes).await },
                        move |result| Message::VoteFinished {
                            username: username.clone(),
                            review_id,
                            plan,
                            result,
                        },
                    )
                }
                review::Action::PostComment { review_id, comment } => {
                    let api = self.api.clone();
                    Task::perform(
                        async move { api.post_comment(review_id, &comment).await },
                        move |result| Message::Review(review_id, review::Message::CommentPosted(result)),
                    )
                }
                review::Action::DeleteComment(comment_id) => {
                    let api = self.api.clone();
                    let review_id = match &self.page {
                        Page::Review(page) => page.review_id(),
                        _ => continue,
                    };
                    Task::perform(async move { api.delete_comment(comment_id).await }, move |result| {
                        Message::Review(review_id, review::Message::CommentDeleted(result))
                    })
                }
                review::Action::LoadImages(urls) => self.load_images(urls),
                review::Action::Notify(notice) => {
                    self.notify(notice);
                    Task::none()
                }
            };
            tasks.push(task);
        }

        Task::batch(tasks)
    }

    fn run_accounts(&mut self, actions: Vec<accounts::Action>) -> Task<Message> {
        let mut tasks = Vec::new();

        for action in actions {
            let task = match action {
                accounts::Action::FetchUsers => {
                    let api = self.api.clone();
                    Task::perform(async move { api.fetch_users().await }, |result| {
                        Message::Accounts(accounts::Message::UsersLoaded(result))
                    })
                }
                accounts::Action::LoadImages(urls) => self.load_images(urls),
                accounts::Action::Login(user) => {
                    self.session.login(user);
                    self.refresh_votes();
                    Task::none()
                }
                accounts::Action::Notify(notice) => {
                    self.notify(notice);
                    Task::none()
                }
            };
            tasks.push(task);
        }

        Task::batch(tasks)
    }

    /// Fetch images not yet requested
    fn load_images(&mut self, urls: Vec<String>) -> Task<Message> {
        let missing = self.images.request(urls.iter().map(String::as_str));

        Task::batch(missing.into_iter().map(|url| {
            let api = self.api.clone();
            Task::perform(
                async move {
                    let result = api.fetch_image(&url).await;
                    (url, result)
                },
                |(url, result)| Message::ImageLoaded(url, result),
            )
        }))
    }

    /// Persist the flags the server accepted and drop every cached list
    fn settle_vote(
        &mut self,
        username: &str,
        review_id: i64,
        plan: VotePlan,
        result: &Result<Review, ApiError>,
    ) {
        self.voting.remove(&review_id);
        match result {
            Ok(_) => {
                info!("Vote {:+} on review {review_id} counted", plan.inc_votes);
                if let Err(err) = self.votes.set(username, review_id, plan.on_success) {
                    warn!("Failed to save votes for review {review_id}: {err}");
                }
            }
            Err(err) => {
                warn!("Vote on review {review_id} failed: {err}");
                self.notify(Notice::error(
                    "Something went wrong, your vote was not counted. Please try again later",
                ));
            }
        }

        if let Some(page) = self.home.as_mut() {
            page.invalidate();
        }
    }

    fn notify(&mut self, notice: Notice) {
        self.notifications.push(notice, Instant::now());
    }

    /// Vote flags for the session user, or none when logged out
    fn stored_votes(&self, review_id: i64) -> VoteState {
        let Some(username) = self.session.username() else {
            return VoteState::default();
        };

        self.votes.get(username, review_id).unwrap_or_else(|err| {
            warn!("Failed to read votes for review {review_id}: {err}");
            VoteState::default()
        })
    }

    /// The session user changed; reload the open review's flags
    fn refresh_votes(&mut self) {
        let review_id = match &self.page {
            Page::Review(page) => page.review_id(),
            _ => return,
        };
        let votes = self.stored_votes(review_id);
        if let Page::Review(page) = &mut self.page {
            page.set_votes(votes);
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        let content: Element<'_, Message> = match &self.page {
            Page::Reviews => match &self.home {
                Some(page) => page.view(&self.images).map(Message::Home),
                None => widgets::spinner(),
            },
            Page::Review(page) => {
                let review_id = page.review_id();
                page.view(&self.session, &self.images)
                    .map(move |message| Message::Review(review_id, message))
            }
            Page::Accounts(page) => page.view(&self.session, &self.images).map(Message::Accounts),
            Page::NotFound => column![
                widgets::heading("Page not found"),
                widgets::display_message(
                    None,
                    format!("There is nothing at {}", self.history.current()),
                ),
            ]
            .spacing(20)
            .into(),
        };

        let body = column![
            self.navbar(),
            self.address_bar(),
            container(content).padding([0, 20]).height(Length::Fill),
        ]
        .spacing(12);

        stack![body, self.notifications.view(Message::DismissNotice)].into()
    }

    fn navbar(&self) -> Element<'_, Message> {
        let link = |label: &'static str, route: Route| {
            button(text(label))
                .style(button::text)
                .on_press(Message::Navigate(route.location()))
        };

        let account: Element<'_, Message> = match self.session.user() {
            Some(user) => row![
                text(user.name.as_str()),
                button("Log out").style(button::secondary).on_press(Message::Logout),
            ]
            .spacing(10)
            .align_y(Alignment::Center)
            .into(),
            None => link("Log in", Route::SwitchAccount).into(),
        };

        container(
            row![
                text("Socialite").size(24),
                horizontal_space(),
                link("Reviews", Route::Reviews),
                link("Switch Account", Route::SwitchAccount),
                account,
            ]
            .spacing(16)
            .align_y(Alignment::Center),
        )
        .padding([10, 20])
        .width(Length::Fill)
        .style(container::rounded_box)
        .into()
    }

    fn address_bar(&self) -> Element<'_, Message> {
        row![
            button("Back").on_press_maybe(self.history.can_go_back().then_some(Message::Back)),
            button("Forward")
                .on_press_maybe(self.history.can_go_forward().then_some(Message::Forward)),
            text_input("/reviews", &self.address)
                .on_input(Message::AddressChanged)
                .on_submit(Message::AddressSubmitted)
                .padding(6),
        ]
        .spacing(8)
        .padding([0, 20])
        .align_y(Alignment::Center)
        .into()
    }

    fn subscription(&self) -> Subscription<Message> {
        if self.notifications.is_empty() {
            Subscription::none()
        } else {
            iced::time::every(Duration::from_millis(250)).map(Message::Tick)
        }
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> Result<(), StartupError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("review_board=info")),
        )
        .init();

    let config = Config::load().inspect_err(|err| error!("Invalid configuration: {err}"))?;

    let votes = match VoteStore::open(&config.data_dir) {
        Ok(store) => store,
        Err(err) => {
            warn!("Votes will not be kept between runs: {err}");
            VoteStore::in_memory()?
        }
    };

    iced::application(ReviewBoard::title, ReviewBoard::update, ReviewBoard::view)
        .subscription(ReviewBoard::subscription)
        .theme(ReviewBoard::theme)
        .centered()
        .run_with(move || ReviewBoard::new(config, votes))?;

    Ok(())
}
