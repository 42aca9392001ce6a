/// Small reusable view pieces shared by the pages
use iced::widget::image::Handle;
use iced::widget::{
    button, center, column, container, image, mouse_area, opaque, row, stack, text,
    vertical_space,
};
use iced::{Color, ContentFit, Element, Length};

use crate::format::date_string;
use crate::state::data::Review;

/// Page title above the content
pub fn heading<'a, Message: 'a>(title: &'a str) -> Element<'a, Message> {
    text(title).size(32).style(text::primary).into()
}

pub fn spinner<'a, Message: 'a>() -> Element<'a, Message> {
    center(text("Loading...").size(20)).height(Length::Fixed(300.0)).into()
}

/// A centred message, with the underlying error above it when there is one
pub fn display_message<'a, Message: 'a>(
    error: Option<String>,
    message: impl Into<String>,
) -> Element<'a, Message> {
    let banner = container(text(message.into()).size(20))
        .padding(20)
        .width(Length::Fill)
        .height(Length::Fixed(240.0))
        .center_x(Length::Fill)
        .center_y(Length::Fixed(240.0))
        .style(container::rounded_box);

    match error {
        Some(error) => column![
            container(text(error).style(text::danger)).padding(10).style(container::bordered_box),
            banner
        ]
        .spacing(12)
        .into(),
        None => banner.into(),
    }
}

/// Category label
pub fn chip<'a, Message: 'a>(label: &'a str) -> Element<'a, Message> {
    container(text(label).size(12))
        .padding([2, 10])
        .style(container::rounded_box)
        .into()
}

/// Card for one review in the list; clicking opens the review
pub fn preview_card<'a, Message: Clone + 'a>(
    review: &'a Review,
    cover: Option<&Handle>,
    on_open: Message,
) -> Element<'a, Message> {
    let cover: Element<'a, Message> = match cover {
        Some(handle) => image(handle.clone())
            .width(Length::Fill)
            .height(Length::Fixed(140.0))
            .content_fit(ContentFit::Cover)
            .into(),
        None => center(text("No image").size(12).style(text::secondary))
            .height(Length::Fixed(140.0))
            .into(),
    };

    let body = column![
        chip(&review.category),
        text(review.title.as_str()).size(16).style(text::primary),
        text(format!("Designer: {}", review.designer)).size(13),
        text(format!("Review by: {}", review.owner)).size(13),
        vertical_space(),
        text(format!("{} Votes", review.votes)).size(13),
        text(date_string(&review.created_at)).size(12).style(text::secondary),
    ]
    .spacing(6)
    .padding(12)
    .height(Length::Fill);

    let card = container(column![cover, body])
        .width(Length::Fixed(260.0))
        .height(Length::Fixed(400.0))
        .style(container::bordered_box);

    button(card)
        .padding(0)
        .style(button::text)
        .on_press(on_open)
        .into()
}

/// Modal asking the user to confirm an action
pub fn confirmation_dialog<'a, Message: Clone + 'a>(
    base: Element<'a, Message>,
    title: &'a str,
    content: &'a str,
    on_confirm: Message,
    on_cancel: Message,
) -> Element<'a, Message> {
    let dialog = container(
        column![
            text(title).size(20),
            text(content),
            row![
                button("Cancel").style(button::secondary).on_press(on_cancel.clone()),
                button("Confirm").style(button::primary).on_press(on_confirm),
            ]
            .spacing(10),
        ]
        .spacing(16),
    )
    .width(Length::Fixed(360.0))
    .padding(20)
    .style(container::rounded_box);

    stack![
        base,
        opaque(
            mouse_area(center(opaque(dialog)).style(|_theme| container::Style {
                background: Some(
                    Color {
                        a: 0.7,
                        ..Color::BLACK
                    }
                    .into(),
                ),
                ..container::Style::default()
            }))
            .on_press(on_cancel)
        )
    ]
    .into()
}
