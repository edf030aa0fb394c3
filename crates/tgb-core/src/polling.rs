//! Offset-based update polling cursor.
//!
//! The service keeps a queue of unconsumed updates keyed by `update_id`.
//! Requesting with `offset = highest_seen + 1` confirms everything below it.
//! The client holds no polling state; callers own the [`UpdateCursor`] and must
//! persist it (see [`OffsetStore`]) to avoid redelivery after a restart.
//! Without a persisted offset, delivery is at-least-once.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::{errors::Error, params::GetUpdatesParams, types::Update, Result};

/// Service-side cap on updates per `getUpdates` call.
pub const MAX_POLL_LIMIT: u8 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollOptions {
    limit: u8,
    timeout: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            limit: MAX_POLL_LIMIT,
            timeout: Duration::ZERO,
        }
    }
}

impl PollOptions {
    /// `limit` is clamped to `1..=100`. A non-zero `timeout` enables long polling.
    pub fn new(limit: u8, timeout: Duration) -> Self {
        Self {
            limit: limit.clamp(1, MAX_POLL_LIMIT),
            timeout,
        }
    }

    pub fn limit(&self) -> u8 {
        self.limit
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Lowest update id not yet consumed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UpdateCursor {
    offset: i64,
}

impl UpdateCursor {
    pub fn new(offset: i64) -> Self {
        Self { offset }
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Move past every update in `batch`. Never moves backwards.
    pub fn advance(&mut self, batch: &[Update]) {
        let Some(max) = batch.iter().map(|u| u.update_id.0).max() else {
            return;
        };
        let next = max.saturating_add(1);
        if next > self.offset {
            self.offset = next;
        }
    }

    /// Cursor that would follow `batch`, leaving `self` untouched.
    pub fn after(mut self, batch: &[Update]) -> Self {
        self.advance(batch);
        self
    }

    pub fn params(&self, opts: &PollOptions) -> GetUpdatesParams {
        GetUpdatesParams {
            offset: self.offset,
            limit: opts.limit,
            timeout: opts.timeout.as_secs(),
        }
    }
}

/// One `getUpdates` round: the updates plus the cursor to send next.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PollBatch {
    pub updates: Vec<Update>,
    pub next: UpdateCursor,
}

impl PollBatch {
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }
}

/// Persistence for the polling cursor, owned by the caller.
pub trait OffsetStore {
    fn load(&self) -> Result<Option<UpdateCursor>>;
    fn save(&self, cursor: UpdateCursor) -> Result<()>;
}

/// Stores the cursor as a small JSON file.
#[derive(Clone, Debug)]
pub struct FileOffsetStore {
    path: PathBuf,
}

impl FileOffsetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OffsetStore for FileOffsetStore {
    fn load(&self) -> Result<Option<UpdateCursor>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let txt = fs::read_to_string(&self.path)?;
        if txt.trim().is_empty() {
            return Ok(None);
        }
        let cursor: UpdateCursor = serde_json::from_str(&txt).map_err(|e| {
            Error::Config(format!("invalid offset file {}: {e}", self.path.display()))
        })?;
        Ok(Some(cursor))
    }

    fn save(&self, cursor: UpdateCursor) -> Result<()> {
        let txt = serde_json::to_string(&cursor).map_err(Error::Encode)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, txt)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
