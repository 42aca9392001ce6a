/// State management module
///
/// This module handles all client-side state, including:
/// - Data returned by the API (data.rs)
/// - The lifecycle of a server read (fetch.rs)
/// - The simulated logged-in user (session.rs)
/// - Per-user like/dislike flags and their local store (votes.rs)
pub mod data;
pub mod fetch;
pub mod session;
pub mod votes;
