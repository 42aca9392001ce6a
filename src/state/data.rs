/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the API layer and the UI layer. They are owned by the server:
/// the client only reads them and never patches them locally.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A single game review
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Review {
    /// Unique review ID
    pub review_id: i64,
    pub title: String,
    /// Category slug (e.g., "strategy")
    pub category: String,
    /// Game designer
    pub designer: String,
    /// Username of the review's author
    pub owner: String,
    /// Cover image for the reviewed game
    pub review_img_url: String,
    /// Full review text (absent from list responses)
    #[serde(default)]
    pub review_body: Option<String>,
    /// Running vote total as stored by the server
    pub votes: i64,
    pub created_at: DateTime<Utc>,
    /// Some API versions send this as a string, others as a number
    #[serde(default, deserialize_with = "count_from_any")]
    pub comment_count: i64,
}

/// A comment belonging to exactly one review
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Comment {
    pub comment_id: i64,
    pub review_id: i64,
    /// Username of the commenter
    pub author: String,
    pub body: String,
    #[serde(default)]
    pub votes: i64,
    pub created_at: DateTime<Utc>,
}

/// A user that can be "logged in" as
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub username: String,
    pub name: String,
    pub avatar_url: String,
}

/// A review category
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Category {
    pub slug: String,
    #[serde(default)]
    pub description: String,
}

fn count_from_any<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Number(i64),
        Text(String),
    }

    match Count::deserialize(deserializer)? {
        Count::Number(n) => Ok(n),
        Count::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_from_list_response() {
        let json = r#"{
            "review_id": 3,
            "title": "Ultimate Werewolf",
            "category": "social-deduction",
            "designer": "Akihisa Okui",
            "owner": "bainesface",
            "review_img_url": "https://images.example.com/werewolf.png",
            "votes": 5,
            "created_at": "2021-01-18T10:01:41.251Z",
            "comment_count": "3"
        }"#;

        let review: Review = serde_json::from_str(json).unwrap();

        assert_eq!(review.review_id, 3);
        assert_eq!(review.comment_count, 3);
        assert!(review.review_body.is_none());
    }

    #[test]
    fn test_numeric_comment_count() {
        let json = r#"{
            "review_id": 1,
            "title": "Agricola",
            "category": "euro game",
            "designer": "Uwe Rosenberg",
            "owner": "mallionaire",
            "review_img_url": "https://images.example.com/agricola.png",
            "review_body": "Farmyard fun!",
            "votes": 1,
            "created_at": "2021-01-18T10:00:20.514Z",
            "comment_count": 0
        }"#;

        let review: Review = serde_json::from_str(json).unwrap();

        assert_eq!(review.comment_count, 0);
        assert_eq!(review.review_body.as_deref(), Some("Farmyard fun!"));
    }
}
