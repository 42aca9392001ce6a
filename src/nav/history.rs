use tracing::debug;

use super::location::Location;

/// Browsing history with back/forward, like a browser tab.
///
/// Every method that moves the cursor returns the new current location so the
/// caller can broadcast a location-change event.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Location>,
    cursor: usize,
}

impl History {
    pub fn new(start: Location) -> Self {
        Self {
            entries: vec![start],
            cursor: 0,
        }
    }

    pub fn current(&self) -> &Location {
        &self.entries[self.cursor]
    }

    /// Visit a new location, discarding any forward entries
    pub fn push(&mut self, location: Location) -> &Location {
        debug!("Navigate to {location}");
        self.entries.truncate(self.cursor + 1);
        self.entries.push(location);
        self.cursor = self.entries.len() - 1;
        self.current()
    }

    /// Swap the current entry without adding history (redirects)
    pub fn replace(&mut self, location: Location) -> &Location {
        debug!("Replace location with {location}");
        self.entries[self.cursor] = location;
        self.current()
    }

    pub fn can_go_back(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn back(&mut self) -> Option<&Location> {
        if !self.can_go_back() {
            return None;
        }
        self.cursor -= 1;
        Some(self.current())
    }

    pub fn forward(&mut self) -> Option<&Location> {
        if !self.can_go_forward() {
            return None;
        }
        self.cursor += 1;
        Some(self.current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(s: &str) -> Location {
        Location::parse(s)
    }

    #[test]
    fn test_back_and_forward() {
        let mut history = History::new(loc("/reviews"));
        history.push(loc("/reviews?category=strategy"));
        history.push(loc("/reviews?category="));

        assert_eq!(history.back().map(|l| l.to_string()), Some("/reviews?category=strategy".to_string()));
        assert_eq!(history.back().map(|l| l.to_string()), Some("/reviews".to_string()));
        assert!(history.back().is_none());

        assert_eq!(history.forward().map(|l| l.to_string()), Some("/reviews?category=strategy".to_string()));
    }

    #[test]
    fn test_push_truncates_forward_entries() {
        let mut history = History::new(loc("/reviews"));
        history.push(loc("/reviews/1"));
        history.back();
        history.push(loc("/switch-account"));

        assert!(!history.can_go_forward());
        assert_eq!(history.current(), &loc("/switch-account"));
        assert_eq!(history.back(), Some(&loc("/reviews")));
    }

    #[test]
    fn test_replace_keeps_length() {
        let mut history = History::new(loc("/"));
        history.replace(loc("/reviews"));

        assert!(!history.can_go_back());
        assert_eq!(history.current(), &loc("/reviews"));
    }
}
