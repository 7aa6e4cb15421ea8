//! crates/learnwell_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific implementations like the profile file or a model API.

use crate::domain::{names_match, Profile};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for storage port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Profile Store Port
//=========================================================================================

/// Durable keyed collection of learner profiles.
///
/// Implementations persist the whole collection on every save. Concurrent writers
/// to the same id are last-writer-wins.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Loads every stored profile. Never fails: a missing or unreadable backing
    /// resource yields an empty map.
    async fn load(&self) -> HashMap<String, Profile>;

    /// Inserts or replaces the profile under its id and persists the collection.
    async fn save(&self, profile: &Profile) -> PortResult<()>;

    /// Two-factor lookup: the id must exist and the stored name must match after
    /// trimming and case folding. Any mismatch is reported as `None`.
    async fn find(&self, id: &str, name: &str) -> Option<Profile> {
        let mut profiles = self.load().await;
        match profiles.remove(id.trim()) {
            Some(profile) if names_match(&profile.name, name) => Some(profile),
            Some(_) => {
                debug!(student_id = id, "Lookup rejected: name does not match");
                None
            }
            None => {
                debug!(student_id = id, "Lookup rejected: unknown id");
                None
            }
        }
    }

    /// Assigns the next free `STU{year}{n:04}` id to `draft` and stores it.
    ///
    /// Id assignment and insertion happen as one step, so concurrent creates
    /// never share an id or replace each other.
    async fn create(&self, draft: Profile, now: DateTime<Utc>) -> PortResult<Profile>;
}

//=========================================================================================
// Generation Backend Port
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Document,
}

/// A binary input sent alongside the instructions.
#[derive(Debug, Clone, Copy)]
pub struct Attachment<'a> {
    pub kind: AttachmentKind,
    pub media_type: &'a str,
    pub bytes: &'a [u8],
}

impl<'a> Attachment<'a> {
    pub fn document(media_type: &'a str, bytes: &'a [u8]) -> Self {
        Self {
            kind: AttachmentKind::Document,
            media_type,
            bytes,
        }
    }
}

/// Everything that can go wrong while talking to a live model.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Transport failure: {0}")]
    Transport(String),
    #[error("Authentication rejected: {0}")]
    Auth(String),
    #[error("Rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    #[error("Unsupported attachment type: {0}")]
    UnsupportedAttachment(String),
}

/// A live text generation model.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Short provider name used in logs.
    fn name(&self) -> &str;

    /// Runs a single generation request.
    async fn generate(
        &self,
        instructions: &str,
        attachments: &[Attachment<'_>],
        max_output_tokens: u32,
    ) -> Result<String, BackendError>;
}

/// The generation backend chosen once at startup.
#[derive(Clone)]
pub enum Backend {
    /// No usable credential: every flow uses its template generator.
    Disabled,
    Live(Arc<dyn GenerationService>),
}

impl Backend {
    pub fn live(service: impl GenerationService + 'static) -> Self {
        Backend::Live(Arc::new(service))
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Backend::Live(_))
    }
}

impl fmt::Debug for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Disabled => f.write_str("Backend::Disabled"),
            Backend::Live(service) => write!(f, "Backend::Live({})", service.name()),
        }
    }
}
