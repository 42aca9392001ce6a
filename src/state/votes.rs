//! Per-user like/dislike flags
//!
//! The server only keeps a running vote total, so whether *this* user liked or
//! disliked a review is remembered locally, keyed by `(username, review_id)`.

use rusqlite::{params, Connection, OptionalExtension, Result as SqlResult};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to create data directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("Vote store error: {0}")]
    Sql(#[from] rusqlite::Error),
}

/// Local like/dislike flags for one review
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoteState {
    pub is_liked: bool,
    pub is_disliked: bool,
}

/// Which button was clicked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteDirection {
    Up,
    Down,
}

/// What a click sends to the server and which flags to keep afterwards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VotePlan {
    pub inc_votes: i64,
    /// Flags once the server accepted the increment
    pub on_success: VoteState,
    /// Flags to roll back to if the request failed
    pub on_failure: VoteState,
}

/// Work out the vote increment for a click.
///
/// Switching from dislike to like (or back) moves the total by two, since the
/// server has no record of the earlier vote to undo.
pub fn plan(current: VoteState, direction: VoteDirection) -> VotePlan {
    let (inc_votes, on_success) = match direction {
        VoteDirection::Up if current.is_liked => (-1, VoteState { is_liked: false, ..current }),
        VoteDirection::Up if current.is_disliked => (2, VoteState { is_liked: true, is_disliked: false }),
        VoteDirection::Up => (1, VoteState { is_liked: true, ..current }),
        VoteDirection::Down if current.is_disliked => (1, VoteState { is_disliked: false, ..current }),
        VoteDirection::Down if current.is_liked => (-2, VoteState { is_liked: false, is_disliked: true }),
        VoteDirection::Down => (-1, VoteState { is_disliked: true, ..current }),
    };

    VotePlan {
        inc_votes,
        on_success,
        on_failure: current,
    }
}

/// SQLite-backed store for vote flags.
///
/// The database file lives in the configured data directory:
/// - Linux: ~/.local/share/review-board/review_board.db
/// - macOS: ~/Library/Application Support/review-board/review_board.db
/// - Windows: %APPDATA%\review-board\review_board.db
pub struct VoteStore {
    conn: Connection,
    db_path: Option<PathBuf>,
}

impl VoteStore {
    /// Open (or create) the store inside `data_dir`
    pub fn open(data_dir: &Path) -> Result<Self, StoreError> {
        std::fs::create_dir_all(data_dir)?;

        let db_path = data_dir.join("review_board.db");
        let conn = Connection::open(&db_path)?;

        info!("Vote store opened at {}", db_path.display());

        let store = VoteStore {
            conn,
            db_path: Some(db_path),
        };
        store.init_schema()?;

        Ok(store)
    }

    /// A store that forgets everything on exit
    pub fn in_memory() -> SqlResult<Self> {
        let store = VoteStore {
            conn: Connection::open_in_memory()?,
            db_path: None,
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> SqlResult<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS votes (
                username        TEXT NOT NULL,
                review_id       INTEGER NOT NULL,
                is_liked        INTEGER NOT NULL DEFAULT 0,
                is_disliked     INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (username, review_id)
            )",
            [],
        )?;
        Ok(())
    }

    #[cfg(test)]
    pub fn path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Flags for a user's review, defaulting to neither liked nor disliked
    pub fn get(&self, username: &str, review_id: i64) -> SqlResult<VoteState> {
        let state = self
            .conn
            .query_row(
                "SELECT is_liked, is_disliked FROM votes WHERE username = ?1 AND review_id = ?2",
                params![username, review_id],
                |row| {
                    Ok(VoteState {
                        is_liked: row.get(0)?,
                        is_disliked: row.get(1)?,
                    })
                },
            )
            .optional()?;

        Ok(state.unwrap_or_default())
    }

    pub fn set(&self, username: &str, review_id: i64, state: VoteState) -> SqlResult<()> {
        self.conn.execute(
            "INSERT INTO votes (username, review_id, is_liked, is_disliked)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(username, review_id)
             DO UPDATE SET is_liked = excluded.is_liked, is_disliked = excluded.is_disliked",
            params![username, review_id, state.is_liked, state.is_disliked],
        )?;
        Ok(())
    }
}

impl std::fmt::Debug for VoteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoteStore")
            .field("db_path", &self.db_path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NEUTRAL: VoteState = VoteState { is_liked: false, is_disliked: false };
    const LIKED: VoteState = VoteState { is_liked: true, is_disliked: false };
    const DISLIKED: VoteState = VoteState { is_liked: false, is_disliked: true };

    #[test]
    fn test_upvote_from_neutral() {
        let plan = plan(NEUTRAL, VoteDirection::Up);
        assert_eq!(plan.inc_votes, 1);
        assert_eq!(plan.on_success, LIKED);
        assert_eq!(plan.on_failure, NEUTRAL);
    }

    #[test]
    fn test_upvote_while_disliked() {
        let plan = plan(DISLIKED, VoteDirection::Up);
        assert_eq!(plan.inc_votes, 2);
        assert_eq!(plan.on_success, LIKED);
        assert_eq!(plan.on_failure, DISLIKED);
    }

    #[test]
    fn test_upvote_again_removes_like() {
        let plan = plan(LIKED, VoteDirection::Up);
        assert_eq!(plan.inc_votes, -1);
        assert_eq!(plan.on_success, NEUTRAL);
    }

    #[test]
    fn test_downvotes() {
        assert_eq!(plan(NEUTRAL, VoteDirection::Down).inc_votes, -1);
        assert_eq!(plan(NEUTRAL, VoteDirection::Down).on_success, DISLIKED);

        assert_eq!(plan(LIKED, VoteDirection::Down).inc_votes, -2);
        assert_eq!(plan(LIKED, VoteDirection::Down).on_success, DISLIKED);

        assert_eq!(plan(DISLIKED, VoteDirection::Down).inc_votes, 1);
        assert_eq!(plan(DISLIKED, VoteDirection::Down).on_success, NEUTRAL);
    }

    #[test]
    fn test_store_defaults_and_updates() {
        let store = VoteStore::in_memory().unwrap();
        assert_eq!(store.get("tickle122", 1).unwrap(), NEUTRAL);

        store.set("tickle122", 1, LIKED).unwrap();
        store.set("tickle122", 1, DISLIKED).unwrap();

        assert_eq!(store.get("tickle122", 1).unwrap(), DISLIKED);
    }

    #[test]
    fn test_store_is_keyed_by_user() {
        let store = VoteStore::in_memory().unwrap();
        store.set("tickle122", 2, LIKED).unwrap();

        assert_eq!(store.get("jessjelly", 2).unwrap(), NEUTRAL);
        assert_eq!(store.get("tickle122", 3).unwrap(), NEUTRAL);
    }

    #[test]
    fn test_store_persists_on_disk() {
        let dir = tempfile::tempdir().unwrap();

        {
            let store = VoteStore::open(dir.path()).unwrap();
            store.set("grumpy19", 5, LIKED).unwrap();
        }

        let store = VoteStore::open(dir.path()).unwrap();
        assert_eq!(store.get("grumpy19", 5).unwrap(), LIKED);
        assert!(store.path().unwrap().ends_with("review_board.db"));
    }
}
