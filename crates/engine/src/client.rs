// Remote task-store client seam.
//
// The engine only ever talks to the store through this trait, which keeps
// the wire format out of the core and makes the engine testable against a
// scripted mock. The production implementation lives in `http.rs`.
//
// Wire types are store-shaped: raw `u64` ids and store-vocabulary statuses.
// Translation to and from the domain shape happens here, at the boundary.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use taskdeck_common::id::TaskId;
use taskdeck_common::status;
use taskdeck_common::types::{Priority, SyncState, Task, TaskPatch};

#[derive(Debug, Error)]
pub enum StoreClientError {
    /// The network failed before the store answered.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The store answered and said no.
    #[error("store rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("invalid store url: {0}")]
    InvalidUrl(String),
}

// ── Wire types ──────────────────────────────────────────────────────

/// A task as the store shapes it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreTask {
    pub id: u64,
    pub project_id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Store vocabulary, possibly a legacy synonym.
    pub status: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Payload for a create request. Carries no id — the store assigns one —
/// but does carry a client-minted idempotency key so a retried create
/// cannot double-insert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewStoreTask {
    pub client_request_id: Uuid,
    pub project_id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: String,
    pub priority: Priority,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

/// A store-shaped partial update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreTaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

// ── Conversions ─────────────────────────────────────────────────────

impl StoreTask {
    /// Ingest a store task into the domain shape. Status is normalized to
    /// the UI vocabulary; ids arriving from the store are confirmed by
    /// definition.
    pub fn into_task(self) -> Task {
        Task {
            id: TaskId::Confirmed(self.id),
            project_id: self.project_id,
            title: self.title,
            description: self.description,
            status: status::to_ui(&self.status),
            priority: self.priority,
            tags: self.tags,
            due_date: self.due_date,
            created_at: self.created_at,
            sync_state: SyncState::Confirmed,
        }
    }
}

impl NewStoreTask {
    /// Shape an optimistic local task for the create request.
    pub fn from_task(task: &Task) -> Self {
        Self {
            client_request_id: Uuid::new_v4(),
            project_id: task.project_id,
            title: task.title.clone(),
            description: task.description.clone(),
            status: status::to_store(&task.status),
            priority: task.priority,
            tags: task.tags.clone(),
            due_date: task.due_date,
        }
    }
}

impl StoreTaskPatch {
    /// Shape a domain patch for the wire. The patch's status is expected in
    /// UI vocabulary (the engine normalizes before this point) and is
    /// translated to the store vocabulary here.
    pub fn from_patch(patch: &TaskPatch) -> Self {
        Self {
            title: patch.title.clone(),
            description: patch.description.clone(),
            status: patch.status.as_deref().map(status::to_store),
            priority: patch.priority,
            tags: patch.tags.clone(),
            due_date: patch.due_date,
        }
    }
}

// ── Client trait ────────────────────────────────────────────────────

/// The remote store, as the engine sees it.
///
/// Abstracted for testability: production uses `HttpStoreClient`, tests use
/// a scripted mock that records calls and fails on demand.
#[async_trait]
pub trait StoreClient: Send + Sync {
    /// Persist a new task. The store assigns and returns the confirmed id.
    async fn create_task(&self, task: NewStoreTask) -> Result<StoreTask, StoreClientError>;

    async fn update_task(&self, id: u64, patch: StoreTaskPatch) -> Result<(), StoreClientError>;

    async fn delete_task(&self, id: u64) -> Result<(), StoreClientError>;

    async fn bulk_update_tasks(
        &self,
        ids: &[u64],
        patch: StoreTaskPatch,
    ) -> Result<(), StoreClientError>;

    async fn bulk_delete_tasks(&self, ids: &[u64]) -> Result<(), StoreClientError>;

    /// Full task listing, used once at session start to hydrate the local
    /// store.
    async fn list_tasks(&self) -> Result<Vec<StoreTask>, StoreClientError>;
}
