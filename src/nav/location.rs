use std::fmt;

/// A path plus query string, e.g. `/reviews?category=strategy`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    path: String,
    query: String,
}

impl Location {
    /// Parse a location typed by the user or built by the app.
    ///
    /// A missing leading slash is added and any `#fragment` is dropped.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        let input = input.split('#').next().unwrap_or_default();
        let (path, query) = input.split_once('?').unwrap_or((input, ""));

        let path = path.trim_end_matches('/');
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };

        Self {
            path,
            query: query.to_string(),
        }
    }

    #[cfg(test)]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw query string without the leading `?`
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn with_query(&self, query: String) -> Self {
        Self {
            path: self.path.clone(),
            query,
        }
    }

    pub fn route(&self) -> Route {
        Route::from_path(&self.path)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.query.is_empty() {
            f.write_str(&self.path)
        } else {
            write!(f, "{}?{}", self.path, self.query)
        }
    }
}

/// The page a location points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `/`, redirected to the review list
    Root,
    Reviews,
    Review(i64),
    SwitchAccount,
    NotFound,
}

impl Route {
    pub fn from_path(path: &str) -> Self {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Root,
            ["reviews"] => Route::Reviews,
            ["reviews", id] => id.parse().map(Route::Review).unwrap_or(Route::NotFound),
            ["switch-account"] => Route::SwitchAccount,
            _ => Route::NotFound,
        }
    }

    /// Location of this route's page, without a query string
    pub fn location(self) -> Location {
        let path = match self {
            Route::Root => "/".to_string(),
            Route::Reviews => "/reviews".to_string(),
            Route::Review(id) => format!("/reviews/{id}"),
            Route::SwitchAccount => "/switch-account".to_string(),
            Route::NotFound => "/not-found".to_string(),
        };
        Location::parse(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let location = Location::parse("reviews/?category=strategy#top");
        assert_eq!(location.path(), "/reviews");
        assert_eq!(location.query(), "category=strategy");
        assert_eq!(location.to_string(), "/reviews?category=strategy");
    }

    #[test]
    fn test_root_path() {
        let location = Location::parse("/");
        assert_eq!(location.path(), "/");
        assert_eq!(location.route(), Route::Root);
        assert_eq!(Location::parse("").route(), Route::Root);
    }

    #[test]
    fn test_routes() {
        assert_eq!(Route::from_path("/reviews"), Route::Reviews);
        assert_eq!(Route::from_path("/reviews/12"), Route::Review(12));
        assert_eq!(Route::from_path("/reviews/abc"), Route::NotFound);
        assert_eq!(Route::from_path("/switch-account"), Route::SwitchAccount);
        assert_eq!(Route::from_path("/users/1/extra"), Route::NotFound);
    }

    #[test]
    fn test_route_locations_parse_back() {
        for route in [Route::Reviews, Route::Review(4), Route::SwitchAccount] {
            assert_eq!(route.location().route(), route);
        }
    }
}
