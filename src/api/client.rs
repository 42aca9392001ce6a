//! Reviews API client
//!
//! Thin async wrapper over the REST API. Every method maps to exactly one
//! request; responses are unwrapped from their envelope object.

use reqwest::{Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::ApiError;
use crate::filters::params::QueryState;
use crate::state::data::{Category, Comment, Review, User};

#[derive(Deserialize)]
struct ReviewsEnvelope {
    reviews: Vec<Review>,
}

#[derive(Deserialize)]
struct ReviewEnvelope {
    review: Review,
}

#[derive(Deserialize)]
struct UpdatedReviewEnvelope {
    #[serde(rename = "updatedReview")]
    updated_review: Review,
}

#[derive(Deserialize)]
struct CategoriesEnvelope {
    categories: Vec<Category>,
}

#[derive(Deserialize)]
struct CommentsEnvelope {
    comments: Vec<Comment>,
}

#[derive(Deserialize)]
struct CreatedCommentEnvelope {
    #[serde(rename = "createdComment")]
    created_comment: Comment,
}

#[derive(Deserialize)]
struct UsersEnvelope {
    users: Vec<User>,
}

/// Body of a new comment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewComment {
    pub username: String,
    pub body: String,
}

#[derive(Serialize)]
struct VoteIncrement {
    inc_votes: i64,
}

/// Client for the reviews REST API.
///
/// Cheap to clone: the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path such as `/reviews/3`
    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!("{method} {path}");
        self.http.request(method, self.endpoint(path))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await.map_err(|e| {
            warn!("Request failed: {e}");
            ApiError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = ApiError::from_status(status.as_u16(), &body);
            warn!("API error: {err}");
            return Err(err);
        }

        response.json().await.map_err(|e| {
            warn!("Failed to parse response: {e}");
            ApiError::Decode(e.to_string())
        })
    }

    /// GET /reviews, scoped by the non-empty filters of `query`
    pub async fn fetch_reviews(&self, query: &QueryState) -> Result<Vec<Review>, ApiError> {
        let request = self
            .request(Method::GET, "/reviews")
            .query(&query.request_pairs());
        let envelope: ReviewsEnvelope = self.send(request).await?;
        Ok(envelope.reviews)
    }

    pub async fn fetch_categories(&self) -> Result<Vec<Category>, ApiError> {
        let envelope: CategoriesEnvelope = self.send(self.request(Method::GET, "/categories")).await?;
        Ok(envelope.categories)
    }

    pub async fn fetch_review(&self, review_id: i64) -> Result<Review, ApiError> {
        let path = format!("/reviews/{review_id}");
        let envelope: ReviewEnvelope = self.send(self.request(Method::GET, &path)).await?;
        Ok(envelope.review)
    }

    pub async fn fetch_comments(&self, review_id: i64) -> Result<Vec<Comment>, ApiError> {
        let path = format!("/reviews/{review_id}/comments");
        let envelope: CommentsEnvelope = self.send(self.request(Method::GET, &path)).await?;
        Ok(envelope.comments)
    }

    pub async fn post_comment(
        &self,
        review_id: i64,
        comment: &NewComment,
    ) -> Result<Comment, ApiError> {
        let path = format!("/reviews/{review_id}/comments");
        let request = self.request(Method::POST, &path).json(comment);
        let envelope: CreatedCommentEnvelope = self.send(request).await?;
        Ok(envelope.created_comment)
    }

    /// DELETE /comments/{id}; the server answers 204 with no body
    pub async fn delete_comment(&self, comment_id: i64) -> Result<(), ApiError> {
        let path = format!("/comments/{comment_id}");
        let response = self.request(Method::DELETE, &path).send().await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status.as_u16(), &body))
        }
    }

    /// PATCH /reviews/{id} with `{ inc_votes }`
    pub async fn patch_votes(&self, review_id: i64, inc_votes: i64) -> Result<Review, ApiError> {
        let path = format!("/reviews/{review_id}");
        let request = self
            .request(Method::PATCH, &path)
            .json(&VoteIncrement { inc_votes });
        let envelope: UpdatedReviewEnvelope = self.send(request).await?;
        Ok(envelope.updated_review)
    }

    pub async fn fetch_users(&self) -> Result<Vec<User>, ApiError> {
        let envelope: UsersEnvelope = self.send(self.request(Method::GET, "/users")).await?;
        Ok(envelope.users)
    }

    /// Download an image (review cover or avatar) from an absolute URL
    pub async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: format!("Failed to load image {url}"),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_paths() {
        let api = ApiClient::new("https://example.com/api/");
        assert_eq!(api.base_url(), "https://example.com/api");
        assert_eq!(api.endpoint("/reviews/3"), "https://example.com/api/reviews/3");
        assert_eq!(api.endpoint("users"), "https://example.com/api/users");
    }

    #[test]
    fn test_envelopes_unwrap_renamed_fields() {
        let json = r#"{"createdComment":{"comment_id":7,"review_id":2,"author":"tickle122","body":"Nice","votes":0,"created_at":"2022-03-01T12:00:00.000Z"}}"#;
        let envelope: CreatedCommentEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.created_comment.comment_id, 7);

        let json = r#"{"categories":[{"slug":"strategy","description":"Plan ahead"}]}"#;
        let envelope: CategoriesEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.categories[0].slug, "strategy");
    }

    #[test]
    fn test_vote_body_shape() {
        let body = serde_json::to_string(&VoteIncrement { inc_votes: -2 }).unwrap();
        assert_eq!(body, r#"{"inc_votes":-2}"#);
    }
}
