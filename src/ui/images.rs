use std::collections::HashMap;

use iced::widget::image::Handle;
use tracing::debug;

use crate::api::ApiError;

#[derive(Debug, Clone)]
enum Slot {
    Loading,
    Ready(Handle),
    Failed,
}

/// Downloaded review covers and avatars, fetched once per URL
#[derive(Debug, Default)]
pub struct Images {
    slots: HashMap<String, Slot>,
}

impl Images {
    /// Mark `urls` as requested and return the ones not seen before
    pub fn request<'a>(&mut self, urls: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        let mut missing = Vec::new();

        for url in urls {
            if url.is_empty() || self.slots.contains_key(url) || missing.iter().any(|m| m == url) {
                continue;
            }
            missing.push(url.to_string());
        }

        for url in &missing {
            self.slots.insert(url.clone(), Slot::Loading);
        }

        missing
    }

    pub fn insert(&mut self, url: String, result: Result<Vec<u8>, ApiError>) {
        let slot = match result {
            Ok(bytes) => Slot::Ready(Handle::from_bytes(bytes)),
            Err(err) => {
                debug!("Image {url} unavailable: {err}");
                Slot::Failed
            }
        };
        self.slots.insert(url, slot);
    }

    pub fn get(&self, url: &str) -> Option<&Handle> {
        match self.slots.get(url) {
            Some(Slot::Ready(handle)) => Some(handle),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn is_loading(&self, url: &str) -> bool {
        matches!(self.slots.get(url), Some(Slot::Loading))
    }
}
