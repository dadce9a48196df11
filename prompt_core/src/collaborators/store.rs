//! Session history - the persistence collaborator.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use tracing::info;
use uuid::Uuid;

use crate::documents::ProductionPlan;
use crate::rhetoric::RenderedPrompt;
use crate::PipelineError;

/// Unique identifier for stored sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything a caller hands to the store for one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSession {
    pub brief: String,
    pub plan: ProductionPlan,
    pub prompts: Vec<RenderedPrompt>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl NewSession {
    pub fn new(brief: impl Into<String>, plan: ProductionPlan, prompts: Vec<RenderedPrompt>) -> Self {
        Self {
            brief: brief.into(),
            plan,
            prompts,
            metadata: Map::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: SessionId,
    pub created_at: DateTime<Utc>,
    pub liked: bool,
    #[serde(flatten)]
    pub session: NewSession,
}

/// Stores finished runs. The pipeline only ever writes to it.
pub trait SessionStore {
    fn save(&self, session: NewSession) -> Result<SessionId, PipelineError>;

    /// All sessions, newest first.
    fn history(&self) -> Result<Vec<SessionRecord>, PipelineError>;

    fn set_liked(&self, id: SessionId, liked: bool) -> Result<SessionRecord, PipelineError>;

    /// Liked sessions, newest first.
    fn references(&self) -> Result<Vec<SessionRecord>, PipelineError> {
        Ok(self
            .history()?
            .into_iter()
            .filter(|record| record.liked)
            .collect())
    }
}

/// Process-local [`SessionStore`].
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    records: RwLock<Vec<SessionRecord>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl SessionStore for InMemorySessionStore {
    fn save(&self, session: NewSession) -> Result<SessionId, PipelineError> {
        let record = SessionRecord {
            id: SessionId::new(),
            created_at: Utc::now(),
            liked: false,
            session,
        };
        let id = record.id;
        self.records.write().push(record);
        info!(session = %id, "session stored");
        Ok(id)
    }

    fn history(&self) -> Result<Vec<SessionRecord>, PipelineError> {
        let mut records: Vec<SessionRecord> = self.records.read().iter().rev().cloned().collect();
        // Stable sort: sessions saved within the same instant stay newest first.
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    fn set_liked(&self, id: SessionId, liked: bool) -> Result<SessionRecord, PipelineError> {
        let mut records = self.records.write();
        let record = records
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or(PipelineError::SessionNotFound(id))?;
        record.liked = liked;
        Ok(record.clone())
    }
}
