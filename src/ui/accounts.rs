use iced::widget::{button, column, container, image, row, scrollable, text};
use iced::{Alignment, Element, Length};
use iced_aw::Wrap;

use super::images::Images;
use super::notifications::Notice;
use super::widgets;
use crate::api::ApiError;
use crate::state::data::User;
use crate::state::fetch::Fetch;
use crate::state::session::Session;

#[derive(Debug, Clone)]
pub enum Message {
    UsersLoaded(Result<Vec<User>, ApiError>),
    Pick(User),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    FetchUsers,
    LoadImages(Vec<String>),
    Login(User),
    Notify(Notice),
}

/// Lists the known users; picking one logs in as them
#[derive(Debug)]
pub struct AccountsPage {
    users: Fetch<Vec<User>>,
}

impl AccountsPage {
    pub fn new() -> (Self, Vec<Action>) {
        (
            Self {
                users: Fetch::Loading,
            },
            vec![Action::FetchUsers],
        )
    }

    pub fn update(&mut self, message: Message) -> Vec<Action> {
        match message {
            Message::UsersLoaded(result) => {
                let actions = match &result {
                    Ok(users) => vec![Action::LoadImages(
                        users.iter().map(|user| user.avatar_url.clone()).collect(),
                    )],
                    Err(_) => Vec::new(),
                };
                self.users = Fetch::from_result(result);
                actions
            }
            Message::Pick(user) => {
                let notice = Notice::success(format!("Logged in as {}", user.username));
                vec![Action::Login(user), Action::Notify(notice)]
            }
        }
    }

    pub fn view<'a>(&'a self, session: &Session, images: &Images) -> Element<'a, Message> {
        let heading = widgets::heading("Switch Account");

        let users = match &self.users {
            Fetch::Idle | Fetch::Loading => {
                return column![heading, widgets::spinner()].spacing(20).into();
            }
            Fetch::Failed(err) => {
                return column![
                    heading,
                    widgets::display_message(
                        Some(err.user_message()),
                        "Something went wrong whilst fetching the users. Please try again later.",
                    )
                ]
                .spacing(20)
                .into();
            }
            Fetch::Loaded(users) => users,
        };

        let info = container(text(
            "By switching accounts you can test user interactions (such as commenting or \
             voting on reviews) from the perspective of different users.",
        ))
        .padding(16)
        .width(Length::Fill)
        .style(container::rounded_box);

        let current = session.username();
        let cards: Vec<Element<'a, Message>> = users
            .iter()
            .map(|user| user_card(user, images, current == Some(user.username.as_str())))
            .collect();

        column![
            heading,
            info,
            scrollable(Wrap::with_elements(cards).spacing(16.0).line_spacing(16.0))
                .height(Length::Fill),
        ]
        .spacing(20)
        .into()
    }
}

fn user_card<'a>(user: &'a User, images: &Images, active: bool) -> Element<'a, Message> {
    let avatar: Element<'a, Message> = match images.get(&user.avatar_url) {
        Some(handle) => image(handle.clone())
            .width(Length::Fixed(64.0))
            .height(Length::Fixed(64.0))
            .into(),
        None => container(text("?").size(28))
            .width(Length::Fixed(64.0))
            .height(Length::Fixed(64.0))
            .center_x(Length::Fixed(64.0))
            .center_y(Length::Fixed(64.0))
            .into(),
    };

    let details = column![
        text(user.name.as_str()).size(20).style(text::primary),
        text("Display name:").size(13),
        text(user.username.as_str()).style(text::secondary),
    ]
    .spacing(4);

    let card = container(row![avatar, details].spacing(20).align_y(Alignment::Center))
        .padding(16)
        .width(Length::Fixed(340.0))
        .style(container::bordered_box);

    button(card)
        .padding(0)
        .style(if active { button::secondary } else { button::text })
        .on_press(Message::Pick(user.clone()))
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(username: &str) -> User {
        User {
            username: username.to_string(),
            name: "Jess Jelly".to_string(),
            avatar_url: format!("https://avatars.example.com/{username}.png"),
        }
    }

    #[test]
    fn test_users_load_avatars() {
        let (mut page, actions) = AccountsPage::new();
        assert_eq!(actions, vec![Action::FetchUsers]);

        let actions = page.update(Message::UsersLoaded(Ok(vec![user("jessjelly"), user("grumpy19")])));
        assert_eq!(
            actions,
            vec![Action::LoadImages(vec![
                "https://avatars.example.com/jessjelly.png".to_string(),
                "https://avatars.example.com/grumpy19.png".to_string(),
            ])]
        );
        assert!(page.users.loaded().is_some_and(|users| users.len() == 2));
    }

    #[test]
    fn test_failed_users_request() {
        let (mut page, _) = AccountsPage::new();
        let actions = page.update(Message::UsersLoaded(Err(ApiError::Transport("offline".to_string()))));

        assert!(actions.is_empty());
        assert!(page.users.error().is_some());
    }

    #[test]
    fn test_pick_logs_in() {
        let (mut page, _) = AccountsPage::new();
        let actions = page.update(Message::Pick(user("jessjelly")));

        assert_eq!(
            actions,
            vec![
                Action::Login(user("jessjelly")),
                Action::Notify(Notice::success("Logged in as jessjelly")),
            ]
        );
    }
}
