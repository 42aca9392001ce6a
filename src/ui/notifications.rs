//! Transient notifications (toasts)

use std::time::{Duration, Instant};

use iced::widget::{button, column, container, text};
use iced::{Alignment, Element, Length};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Success,
    Error,
}

/// A notification waiting to be shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: Kind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: Kind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: Kind::Error,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone)]
struct Toast {
    id: u64,
    notice: Notice,
    shown_at: Instant,
}

/// Toasts currently on screen, oldest first
#[derive(Debug)]
pub struct Notifications {
    toasts: Vec<Toast>,
    next_id: u64,
    lifetime: Duration,
}

impl Notifications {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            toasts: Vec::new(),
            next_id: 0,
            lifetime,
        }
    }

    pub fn push(&mut self, notice: Notice, now: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.toasts.push(Toast {
            id,
            notice,
            shown_at: now,
        });
        id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.toasts.retain(|toast| toast.id != id);
    }

    /// Drop toasts older than the configured lifetime
    pub fn expire(&mut self, now: Instant) {
        let lifetime = self.lifetime;
        self.toasts
            .retain(|toast| now.saturating_duration_since(toast.shown_at) < lifetime);
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    #[cfg(test)]
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.toasts.iter().map(|toast| toast.notice.text.as_str())
    }

    /// Stack of toasts; clicking one dismisses it
    pub fn view<'a, Message: Clone + 'a>(
        &'a self,
        on_dismiss: impl Fn(u64) -> Message + 'a,
    ) -> Element<'a, Message> {
        let toasts = self.toasts.iter().map(|toast| {
            let label = text(toast.notice.text.as_str()).size(15);
            let style = match toast.notice.kind {
                Kind::Success => button::success,
                Kind::Error => button::danger,
            };

            button(label)
                .padding([10, 16])
                .width(Length::Fixed(320.0))
                .style(style)
                .on_press(on_dismiss(toast.id))
                .into()
        });

        container(column(toasts).spacing(8).align_x(Alignment::End))
            .width(Length::Fill)
            .height(Length::Fill)
            .align_right(Length::Fill)
            .align_bottom(Length::Fill)
            .padding(20)
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toasts_expire() {
        let start = Instant::now();
        let mut notifications = Notifications::new(Duration::from_secs(4));

        notifications.push(Notice::success("Comment added"), start);
        notifications.push(Notice::error("Vote failed"), start + Duration::from_secs(3));

        notifications.expire(start + Duration::from_secs(5));
        assert_eq!(notifications.texts().collect::<Vec<_>>(), vec!["Vote failed"]);

        notifications.expire(start + Duration::from_secs(8));
        assert!(notifications.is_empty());
    }

    #[test]
    fn test_dismiss_by_id() {
        let now = Instant::now();
        let mut notifications = Notifications::new(Duration::from_secs(4));

        let first = notifications.push(Notice::success("one"), now);
        notifications.push(Notice::success("two"), now);
        notifications.dismiss(first);

        assert_eq!(notifications.texts().collect::<Vec<_>>(), vec!["two"]);
    }
}
