use crate::api::ApiError;

/// Lifecycle of one server read
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Fetch<T> {
    /// Not requested yet
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Failed(ApiError),
}

impl<T> Fetch<T> {
    pub fn from_result(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(value) => Fetch::Loaded(value),
            Err(err) => Fetch::Failed(err),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Fetch::Loading)
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            Fetch::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            Fetch::Failed(err) => Some(err),
            _ => None,
        }
    }
}
