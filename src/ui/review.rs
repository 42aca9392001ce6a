//! Single review page: details, votes and comments.

use iced::widget::{button, column, container, image, row, scrollable, text, text_input};
use iced::{Alignment, Element, Length};
use tracing::{info, warn};

use super::images::Images;
use super::notifications::Notice;
use super::widgets;
use crate::api::{ApiError, NewComment};
use crate::format::date_string;
use crate::state::data::{Comment, Review};
use crate::state::fetch::Fetch;
use crate::state::session::Session;
use crate::state::votes::{self, VoteDirection, VotePlan, VoteState};

#[derive(Debug, Clone)]
pub enum Message {
    ReviewLoaded(Result<Review, ApiError>),
    CommentsLoaded(Result<Vec<Comment>, ApiError>),
    Vote(VoteDirection),
    VoteFinished(Result<Review, ApiError>),
    DraftChanged(String),
    CancelDraft,
    SubmitComment,
    CommentPosted(Result<Comment, ApiError>),
    RequestDelete(i64),
    CancelDelete,
    ConfirmDelete,
    CommentDeleted(Result<(), ApiError>),
}

/// Side effects requested by the page
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    FetchReview(i64),
    FetchComments(i64),
    /// Settled by the application, which persists the flags for `username`
    PatchVotes { username: String, review_id: i64, plan: VotePlan },
    PostComment { review_id: i64, comment: NewComment },
    DeleteComment(i64),
    LoadImages(Vec<String>),
    Notify(Notice),
}

/// A vote waiting for the server, remembered with the user who cast it
#[derive(Debug, Clone)]
struct PendingVote {
    username: String,
    plan: VotePlan,
}

#[derive(Debug)]
pub struct ReviewPage {
    review_id: i64,
    review: Fetch<Review>,
    comments: Fetch<Vec<Comment>>,
    votes: VoteState,
    pending_vote: Option<PendingVote>,
    /// A vote cast from an earlier visit to this review is still in flight
    awaiting_vote: bool,
    draft: String,
    posting: bool,
    confirm_delete: Option<i64>,
    deleting: Option<i64>,
}

impl ReviewPage {
    /// Open a review with the current user's stored vote flags
    pub fn new(review_id: i64, votes: VoteState) -> (Self, Vec<Action>) {
        let page = Self {
            review_id,
            review: Fetch::Loading,
            comments: Fetch::Idle,
            votes,
            pending_vote: None,
            awaiting_vote: false,
            draft: String::new(),
            posting: false,
            confirm_delete: None,
            deleting: None,
        };

        (page, vec![Action::FetchReview(review_id)])
    }

    pub fn review_id(&self) -> i64 {
        self.review_id
    }

    #[cfg(test)]
    pub fn votes(&self) -> VoteState {
        self.votes
    }

    /// Lock voting until a vote sent from an earlier visit resolves
    pub fn await_vote(&mut self) {
        self.awaiting_vote = true;
    }

    /// Whether this page cast the vote that is in flight
    pub fn owns_vote(&self) -> bool {
        self.pending_vote.is_some()
    }

    fn is_voting(&self) -> bool {
        self.pending_vote.is_some() || self.awaiting_vote
    }

    /// The session user changed; show their flags instead
    pub fn set_votes(&mut self, votes: VoteState) {
        self.votes = votes;
    }

    pub fn update(&mut self, message: Message, session: &Session) -> Vec<Action> {
        match message {
            Message::ReviewLoaded(Err(err)) if self.review.loaded().is_some() => {
                // A failed re-read keeps the review already on screen
                warn!("Failed to refresh review {}: {err}", self.review_id);
                vec![Action::Notify(Notice::error(
                    "Something went wrong whilst refreshing the review. Please try again later",
                ))]
            }
            Message::ReviewLoaded(result) => {
                let mut actions = Vec::new();
                if let Ok(review) = &result {
                    actions.push(Action::LoadImages(vec![review.review_img_url.clone()]));
                    // Comments are only requested once the review exists
                    if matches!(self.comments, Fetch::Idle) {
                        self.comments = Fetch::Loading;
                        actions.push(Action::FetchComments(self.review_id));
                    }
                }
                self.review = Fetch::from_result(result);
                actions
            }
            Message::CommentsLoaded(result) => {
                self.comments = Fetch::from_result(result);
                Vec::new()
            }
            Message::Vote(direction) => self.vote(direction, session),
            Message::VoteFinished(result) => self.vote_finished(result, session),
            Message::DraftChanged(draft) => {
                self.draft = draft;
                Vec::new()
            }
            Message::CancelDraft => {
                self.draft.clear();
                Vec::new()
            }
            Message::SubmitComment => self.submit_comment(session),
            Message::CommentPosted(result) => {
                self.posting = false;
                match result {
                    Ok(comment) => {
                        info!("Posted comment {}", comment.comment_id);
                        self.draft.clear();
                        vec![
                            Action::Notify(Notice::success("Comment added")),
                            Action::FetchComments(self.review_id),
                        ]
                    }
                    Err(err) => {
                        warn!("Failed to post comment: {err}");
                        vec![Action::Notify(Notice::error(
                            "Something went wrong, failed to add comment. Please try again later",
                        ))]
                    }
                }
            }
            Message::RequestDelete(comment_id) => {
                self.confirm_delete = Some(comment_id);
                Vec::new()
            }
            Message::CancelDelete => {
                self.confirm_delete = None;
                Vec::new()
            }
            Message::ConfirmDelete => match self.confirm_delete.take() {
                Some(comment_id) => {
                    self.deleting = Some(comment_id);
                    vec![Action::DeleteComment(comment_id)]
                }
                None => Vec::new(),
            },
            Message::CommentDeleted(result) => {
                self.deleting = None;
                match result {
                    Ok(()) => vec![
                        Action::Notify(Notice::success("Comment deleted")),
                        Action::FetchComments(self.review_id),
                    ],
                    Err(err) => {
                        warn!("Failed to delete comment: {err}");
                        vec![Action::Notify(Notice::error(
                            "Something went wrong, failed to delete comment. Please try again later",
                        ))]
                    }
                }
            }
        }
    }

    fn vote(&mut self, direction: VoteDirection, session: &Session) -> Vec<Action> {
        if self.is_voting() {
            return Vec::new();
        }

        let Some(username) = session.username() else {
            return vec![Action::Notify(Notice::error("Log in to vote on reviews"))];
        };

        let plan = votes::plan(self.votes, direction);
        info!("Voting {:+} on review {}", plan.inc_votes, self.review_id);

        // Show the outcome straight away; rolled back if the request fails
        self.votes = plan.on_success;
        self.pending_vote = Some(PendingVote {
            username: username.to_string(),
            plan,
        });

        vec![Action::PatchVotes {
            username: username.to_string(),
            review_id: self.review_id,
            plan,
        }]
    }

    /// Show the outcome of the pending vote. Persisting it and the failure
    /// notice are the application's job, since the page may be gone by then.
    fn vote_finished(&mut self, result: Result<Review, ApiError>, session: &Session) -> Vec<Action> {
        self.awaiting_vote = false;
        if let Some(pending) = self.pending_vote.take() {
            // Another user's outcome is never shown to the current session
            if session.username() == Some(pending.username.as_str()) {
                self.votes = match result {
                    Ok(_) => pending.plan.on_success,
                    Err(_) => pending.plan.on_failure,
                };
            }
        }

        // The new total is never computed locally: re-read the review either way
        vec![Action::FetchReview(self.review_id)]
    }

    fn submit_comment(&mut self, session: &Session) -> Vec<Action> {
        if self.posting {
            return Vec::new();
        }

        let Some(username) = session.username() else {
            return vec![Action::Notify(Notice::error("Log in to comment on reviews"))];
        };

        if self.draft.trim().is_empty() {
            return vec![Action::Notify(Notice::error("Invalid comment, try again."))];
        }

        self.posting = true;
        vec![Action::PostComment {
            review_id: self.review_id,
            comment: NewComment {
                username: username.to_string(),
                body: self.draft.clone(),
            },
        }]
    }

    pub fn is_loading(&self) -> bool {
        self.review.is_loading() || self.comments.is_loading()
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.review.error().or_else(|| self.comments.error())
    }

    pub fn view<'a>(&'a self, session: &'a Session, images: &Images) -> Element<'a, Message> {
        let heading = widgets::heading("Review");

        if self.is_loading() {
            return column![heading, widgets::spinner()].spacing(20).into();
        }

        if let Some(err) = self.error() {
            return column![
                heading,
                widgets::display_message(
                    Some(err.user_message()),
                    format!(
                        "Something went wrong whilst fetching data for review with ID: {}. Please try again later.",
                        self.review_id
                    ),
                )
            ]
            .spacing(20)
            .into();
        }

        let (Some(review), Some(comments)) = (self.review.loaded(), self.comments.loaded()) else {
            return column![heading, widgets::spinner()].spacing(20).into();
        };

        let content = column![
            self.details(review, images),
            self.interactions(review, session),
            self.comment_section(comments, session),
        ]
        .spacing(20);

        let page: Element<'a, Message> = column![heading, scrollable(content).height(Length::Fill)]
            .spacing(20)
            .into();

        if self.confirm_delete.is_some() {
            widgets::confirmation_dialog(
                page,
                "Delete comment?",
                "This comment will be permanently removed.",
                Message::ConfirmDelete,
                Message::CancelDelete,
            )
        } else {
            page
        }
    }

    fn details<'a>(&'a self, review: &'a Review, images: &Images) -> Element<'a, Message> {
        let cover: Element<'a, Message> = match images.get(&review.review_img_url) {
            Some(handle) => image(handle.clone()).width(Length::FillPortion(2)).into(),
            None => container(text("Loading image...").style(text::secondary))
                .width(Length::FillPortion(2))
                .into(),
        };

        let metadata = column![
            text(format!("Designer: {}", review.designer)),
            text(format!("Review by: {}", review.owner)),
            text(date_string(&review.created_at)).style(text::secondary),
        ]
        .spacing(8)
        .width(Length::FillPortion(1));

        container(
            column![
                text(review.title.as_str()).size(28).style(text::primary),
                widgets::chip(&review.category),
                row![cover, metadata].spacing(24).align_y(Alignment::Center),
                text(review.review_body.as_deref().unwrap_or_default()),
            ]
            .spacing(14),
        )
        .padding(16)
        .width(Length::Fill)
        .style(container::bordered_box)
        .into()
    }

    /// Like/dislike bar with the server's vote total
    fn interactions<'a>(&'a self, review: &'a Review, session: &Session) -> Element<'a, Message> {
        let enabled = !self.is_voting() && session.user().is_some();

        let like = button(text(if self.votes.is_liked { "Liked" } else { "Like" }))
            .style(if self.votes.is_liked { button::primary } else { button::secondary })
            .on_press_maybe(enabled.then_some(Message::Vote(VoteDirection::Up)));

        let dislike = button(text(if self.votes.is_disliked { "Disliked" } else { "Dislike" }))
            .style(if self.votes.is_disliked { button::primary } else { button::secondary })
            .on_press_maybe(enabled.then_some(Message::Vote(VoteDirection::Down)));

        container(
            row![like, text(format!("{} votes", review.votes)).size(18), dislike]
                .spacing(16)
                .align_y(Alignment::Center),
        )
        .center_x(Length::Fill)
        .padding(8)
        .into()
    }

    fn comment_section<'a>(&'a self, comments: &'a [Comment], session: &'a Session) -> Element<'a, Message> {
        let username = session.username();

        let form: Element<'a, Message> = if username.is_some() {
            let mut input = text_input("Add a comment...", &self.draft).padding(10);
            if !self.posting {
                input = input
                    .on_input(Message::DraftChanged)
                    .on_submit(Message::SubmitComment);
            }

            let mut form = column![input].spacing(8);
            if !self.draft.is_empty() {
                form = form.push(
                    row![
                        button("Cancel").style(button::danger).on_press(Message::CancelDraft),
                        button("Comment")
                            .on_press_maybe((!self.posting).then_some(Message::SubmitComment)),
                    ]
                    .spacing(8),
                );
            }
            form.into()
        } else {
            text("Log in to join the discussion").style(text::secondary).into()
        };

        let list: Element<'a, Message> = if comments.is_empty() {
            widgets::display_message(None, "No comments")
        } else {
            column(comments.iter().map(|comment| self.comment(comment, username)))
                .spacing(16)
                .into()
        };

        container(column![text("Comments").size(22).style(text::primary), form, list].spacing(14))
            .padding(16)
            .width(Length::Fill)
            .style(container::bordered_box)
            .into()
    }

    fn comment<'a>(&'a self, comment: &'a Comment, username: Option<&str>) -> Element<'a, Message> {
        let mut header = row![text(comment.author.as_str()).size(16).style(text::primary)]
            .spacing(12)
            .align_y(Alignment::Center);

        if username == Some(comment.author.as_str()) {
            let deleting = self.deleting == Some(comment.comment_id);
            header = header.push(
                button(text(if deleting { "Deleting..." } else { "Delete" }).size(13))
                    .style(button::text)
                    .on_press_maybe((!deleting).then_some(Message::RequestDelete(comment.comment_id))),
            );
        }

        column![header, text(comment.body.as_str())].spacing(4).into()
    }
}
