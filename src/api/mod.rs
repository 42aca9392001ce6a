/// Reviews REST API
///
/// - HTTP client and response envelopes (client.rs)
/// - Error type shared with the UI layer (error.rs)
pub mod client;
pub mod error;

pub use client::{ApiClient, NewComment};
pub use error::ApiError;
