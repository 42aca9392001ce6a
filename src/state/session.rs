use tracing::info;

use super::data::User;

/// The simulated "logged-in" identity.
///
/// There is no backing server session: the user attributes new comments
/// and namespaces the local vote store, and can be swapped at any time.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    user: Option<User>,
}

impl Default for Session {
    /// Start logged in as the default user
    fn default() -> Self {
        Self {
            user: Some(default_user()),
        }
    }
}

impl Session {
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.username.as_str())
    }

    /// Replace the current user
    pub fn login(&mut self, user: User) {
        info!("Logged in as {}", user.username);
        self.user = Some(user);
    }

    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            info!("Logged out {}", user.username);
        }
    }
}

fn default_user() -> User {
    User {
        username: "tickle122".to_string(),
        name: "Tom Tickle".to_string(),
        avatar_url: "https://vignette.wikia.nocookie.net/mrmen/images/d/d6/Mr-Tickle-9a.png/revision/latest?cb=20180127221953".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(username: &str) -> User {
        User {
            username: username.to_string(),
            name: username.to_uppercase(),
            avatar_url: String::new(),
        }
    }

    #[test]
    fn test_default_session_has_user() {
        let session = Session::default();
        assert_eq!(session.username(), Some("tickle122"));
    }

    #[test]
    fn test_login_replaces_user() {
        let mut session = Session::default();
        session.login(user("jessjelly"));
        assert_eq!(session.username(), Some("jessjelly"));
    }

    #[test]
    fn test_logout_clears_user() {
        let mut session = Session::default();
        session.logout();
        assert!(session.user().is_none());

        // Logging out twice is harmless
        session.logout();
        assert!(session.user().is_none());
    }
}
