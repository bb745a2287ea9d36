//! Load sessions and asset identity.
//!
//! A [`LoadSession`] represents exactly one load attempt of one asset, from
//! initiation to resolution, failure or cancellation. There is no global
//! loading manager: everything that wants to observe or cancel a load holds a
//! clone of the session, which shares the same id and flags. A failed or
//! cancelled session is never reused; retrying means creating a new session.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use thiserror::Error;

/// Identifies one loadable resource by path (native) or URL (web).
///
/// Immutable once created and cheap to clone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetHandle {
    path: Arc<str>,
}

impl AssetHandle {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into().into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for AssetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// Network, I/O or decode failure while loading one asset.
///
/// Terminal for the session it occurred in. The owner decides whether to
/// start a fresh session or show an error state.
#[derive(Debug, Error)]
#[error("failed to load asset {handle}: {cause}")]
pub struct AssetLoadError {
    pub handle: AssetHandle,
    #[source]
    pub cause: Box<dyn std::error::Error + Send + Sync>,
}

impl AssetLoadError {
    pub fn new(
        handle: AssetHandle,
        cause: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            handle,
            cause: cause.into(),
        }
    }
}

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// One asset-load attempt.
///
/// Cloning shares the session rather than forking it: the loader task holds
/// one clone while the event loop holds another, and both see the same
/// cancellation flag. The adopted flag is the one-way guard that keeps the
/// post-load scene mutation to a single effective pass.
#[derive(Debug)]
pub struct LoadSession {
    id: u64,
    cancelled: Arc<AtomicBool>,
    adopted: Arc<AtomicBool>,
}

impl LoadSession {
    pub fn new() -> Self {
        Self {
            id: NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed),
            cancelled: Arc::new(AtomicBool::new(false)),
            adopted: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Request cancellation. Pending progress and resolution callbacks for
    /// this session will not be delivered once this returns.
    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::AcqRel) {
            log::info!("load session {} cancelled", self.id);
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Flip the adopted flag, returning whether this call was the first one.
    pub fn mark_adopted(&self) -> bool {
        !self.adopted.swap(true, Ordering::AcqRel)
    }

    pub fn is_adopted(&self) -> bool {
        self.adopted.load(Ordering::Acquire)
    }
}

impl Clone for LoadSession {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            cancelled: Arc::clone(&self.cancelled),
            adopted: Arc::clone(&self.adopted),
        }
    }
}

impl Default for LoadSession {
    fn default() -> Self {
        Self::new()
    }
}
