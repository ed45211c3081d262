// The optimistic synchronization engine.
//
// Every operation follows the same sequence:
//   validate → mutate local → resolve identity → issue remote call →
//   reconcile-or-fail
//
// The local mutation always lands before the first await, so readers see the
// optimistic state the moment an operation reaches its suspension point —
// reads never block on network I/O. The engine state lives behind a mutex
// that is never held across an await, so unrelated operations are never
// blocked by one in-flight call.
//
// Failure asymmetry, deliberate and load-bearing:
//   - a failed create degrades its task to `SyncState::Failed` but keeps it
//     (data loss is worse than a stale row);
//   - failed updates/deletes are logged and never rolled back — local state
//     is the user's intent and stays authoritative.

use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use taskdeck_common::id::TaskId;
use taskdeck_common::status;
use taskdeck_common::types::{default_status, Project, SyncState, Task, TaskDraft, TaskPatch};

use crate::client::{NewStoreTask, StoreClient, StoreClientError, StoreTask, StoreTaskPatch};
use crate::ledger::IdentityLedger;
use crate::project::ProjectIndex;
use crate::store::{StoreError, TaskStore};

#[derive(Debug, Error)]
pub enum SyncError {
    /// Bad input, rejected before any mutation.
    #[error("validation failed: {0}")]
    Validation(String),

    /// NotFound / DuplicateId from the local store.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Network or store-side rejection. Only hydration surfaces this as an
    /// error; mutating operations degrade or log instead (see module docs).
    #[error("remote store failure: {0}")]
    Remote(#[from] StoreClientError),
}

struct EngineState {
    store: TaskStore,
    ledger: IdentityLedger,
    projects: ProjectIndex,
}

/// Orchestrates optimistic create/update/delete/bulk operations against an
/// in-memory task store, reconciling provisional identities once the remote
/// store confirms.
pub struct SyncEngine<C> {
    client: C,
    state: Mutex<EngineState>,
    revision: watch::Sender<u64>,
}

impl<C: StoreClient> SyncEngine<C> {
    pub fn new(client: C) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            client,
            state: Mutex::new(EngineState {
                store: TaskStore::new(),
                ledger: IdentityLedger::new(),
                projects: ProjectIndex::new(),
            }),
            revision,
        }
    }

    // ── Session start ───────────────────────────────────────────────

    /// Load the full task listing from the store. All arriving ids are
    /// confirmed; statuses are normalized to the UI vocabulary on ingest.
    /// Returns the number of tasks taken in.
    pub async fn hydrate(&self) -> Result<usize, SyncError> {
        let listing = self.client.list_tasks().await?;

        let mut count = 0;
        {
            let mut state = self.lock_state();
            for wire in listing {
                let task = wire.into_task();
                match state.store.insert(task) {
                    Ok(()) => count += 1,
                    Err(error) => warn!(%error, "skipping task during hydration"),
                }
            }
        }
        self.bump();
        info!(count, "hydrated task store");
        Ok(count)
    }

    // ── Create ──────────────────────────────────────────────────────

    /// Create a task: validate, mint a provisional id, insert locally, then
    /// issue the remote create and reconcile.
    ///
    /// The optimistic task is observable through `tasks()`/`get_task()` as
    /// soon as this future has been polled to its suspension point. The
    /// resolved value is the task as known after reconciliation: confirmed
    /// on success, degraded to `SyncState::Failed` (but kept) on remote
    /// failure.
    pub async fn create_task(&self, draft: TaskDraft) -> Result<Task, SyncError> {
        let title = draft.title.trim().to_string();
        if title.is_empty() {
            return Err(SyncError::Validation("task title must not be empty".into()));
        }

        let optimistic = {
            let mut state = self.lock_state();
            let project_id = match draft.project_id.or_else(|| state.projects.active_id()) {
                Some(id) => id,
                None => {
                    return Err(SyncError::Validation(
                        "no project given and no project active".into(),
                    ))
                }
            };
            let task = Task {
                id: state.ledger.mint(),
                project_id,
                title,
                description: draft.description,
                status: draft.status.as_deref().map(status::to_ui).unwrap_or_else(default_status),
                priority: draft.priority.unwrap_or_default(),
                tags: draft.tags,
                due_date: draft.due_date,
                created_at: Utc::now(),
                sync_state: SyncState::Pending,
            };
            state.store.insert(task.clone())?;
            task
        };
        self.bump();

        let provisional = optimistic.id;
        let wire = NewStoreTask::from_task(&optimistic);
        match self.client.create_task(wire).await {
            Ok(confirmed) => Ok(self.reconcile_create(provisional, confirmed, optimistic)),
            Err(error) => {
                warn!(%provisional, %error, "create failed; keeping task locally");
                let task = {
                    let mut state = self.lock_state();
                    match state.store.find_mut(provisional) {
                        Some(task) => {
                            task.sync_state = SyncState::Failed;
                            task.clone()
                        }
                        // Deleted locally while the create was in flight.
                        None => optimistic,
                    }
                };
                self.bump();
                Ok(task)
            }
        }
    }

    /// Swap the provisional id for the store-assigned one. Only identity,
    /// sync state, and server-computed fields are touched — fields patched
    /// optimistically while the create was in flight survive.
    fn reconcile_create(&self, provisional: TaskId, confirmed: StoreTask, optimistic: Task) -> Task {
        let confirmed_id = TaskId::Confirmed(confirmed.id);
        let task = {
            let mut state = self.lock_state();
            state.ledger.record(provisional.as_u64(), confirmed.id);
            match state.store.replace_id(provisional, confirmed_id) {
                Ok(()) => {
                    // replace_id succeeded, so the task is present.
                    match state.store.find_mut(confirmed_id) {
                        Some(task) => {
                            task.sync_state = SyncState::Confirmed;
                            task.created_at = confirmed.created_at;
                            task.clone()
                        }
                        None => optimistic,
                    }
                }
                Err(error) => {
                    // The user deleted the task before the create landed.
                    // Accepted leak: the store now holds a task the client
                    // no longer shows; we do not resurrect it locally.
                    warn!(%provisional, %confirmed_id, %error, "task gone before create confirmed");
                    confirmed.into_task()
                }
            }
        };
        self.bump();
        task
    }

    // ── Update ──────────────────────────────────────────────────────

    /// Apply a partial update locally, then push it to the store if the id
    /// resolves to a confirmed one. Updates against a still-pending create
    /// stay local; confirmation will not overwrite them.
    pub async fn update_task(&self, id: TaskId, patch: TaskPatch) -> Result<(), SyncError> {
        let normalized = normalize_patch(patch);

        let resolved = {
            let mut state = self.lock_state();
            let resolved = state.ledger.resolve(id);
            state.store.patch(resolved, &normalized)?;
            resolved
        };
        self.bump();

        let confirmed_id = match resolved {
            TaskId::Provisional(_) => {
                debug!(%id, "create unconfirmed; keeping update local");
                return Ok(());
            }
            TaskId::Confirmed(c) => c,
        };

        if let Err(error) = self.client.update_task(confirmed_id, StoreTaskPatch::from_patch(&normalized)).await
        {
            // Local state stays as applied: rolling back could erase other
            // meanwhile-applied local edits.
            warn!(id = confirmed_id, %error, "remote update failed; local state kept");
        }
        Ok(())
    }

    // ── Delete ──────────────────────────────────────────────────────

    /// Remove a task locally, then delete it remotely if its id resolves to
    /// a confirmed one. Deleting an absent or still-provisional task is a
    /// local-only no-op.
    pub async fn delete_task(&self, id: TaskId) -> Result<(), SyncError> {
        let resolved = {
            let mut state = self.lock_state();
            let resolved = state.ledger.resolve(id);
            if !state.store.remove(resolved) {
                debug!(%id, "delete of absent task treated as satisfied");
            }
            resolved
        };
        self.bump();

        let confirmed_id = match resolved {
            TaskId::Provisional(_) => {
                // Nothing exists server-side yet. If the in-flight create
                // later confirms, the server keeps a task the user dropped
                // (accepted leak, see DESIGN.md).
                debug!(%id, "create unconfirmed; skipping remote delete");
                return Ok(());
            }
            TaskId::Confirmed(c) => c,
        };

        if let Err(error) = self.client.delete_task(confirmed_id).await {
            warn!(id = confirmed_id, %error, "remote delete failed; treated as satisfied");
        }
        Ok(())
    }

    // ── Bulk operations ─────────────────────────────────────────────

    /// Apply a partial update to every listed task locally, then push one
    /// batch update carrying only the confirmed-resolvable ids.
    pub async fn bulk_update_tasks(&self, ids: &[TaskId], patch: TaskPatch) -> Result<(), SyncError> {
        let normalized = normalize_patch(patch);

        let confirmed: Vec<u64> = {
            let mut state = self.lock_state();
            let mut confirmed = Vec::new();
            for &id in ids {
                let resolved = state.ledger.resolve(id);
                if let Err(error) = state.store.patch(resolved, &normalized) {
                    warn!(%id, %error, "skipping absent task in bulk update");
                }
                if let TaskId::Confirmed(c) = resolved {
                    confirmed.push(c);
                }
            }
            confirmed
        };
        self.bump();

        if confirmed.is_empty() {
            return Ok(());
        }
        if let Err(error) =
            self.client.bulk_update_tasks(&confirmed, StoreTaskPatch::from_patch(&normalized)).await
        {
            warn!(ids = confirmed.len(), %error, "remote bulk update failed; local state kept");
        }
        Ok(())
    }

    /// Remove every listed task locally, then issue one remote bulk delete
    /// carrying only the confirmed-resolvable ids. Still-provisional ids are
    /// dropped locally without a remote call.
    pub async fn bulk_delete_tasks(&self, ids: &[TaskId]) -> Result<(), SyncError> {
        let confirmed: Vec<u64> = {
            let mut state = self.lock_state();
            let resolved: Vec<TaskId> = ids.iter().map(|&id| state.ledger.resolve(id)).collect();
            state.store.remove_many(&resolved);
            resolved
                .into_iter()
                .filter_map(|id| match id {
                    TaskId::Confirmed(c) => Some(c),
                    TaskId::Provisional(_) => None,
                })
                .collect()
        };
        self.bump();

        if confirmed.is_empty() {
            return Ok(());
        }
        if let Err(error) = self.client.bulk_delete_tasks(&confirmed).await {
            warn!(ids = confirmed.len(), %error, "remote bulk delete failed; treated as satisfied");
        }
        Ok(())
    }

    // ── Reads ───────────────────────────────────────────────────────

    /// Look a task up by an id of ambiguous provenance. Resolves through
    /// the ledger first, then falls back to the originally requested id
    /// (defensive; unreachable if invariants hold).
    pub fn get_task(&self, id: TaskId) -> Option<Task> {
        let state = self.lock_state();
        let resolved = state.ledger.resolve(id);
        state
            .store
            .find(resolved)
            .or_else(|| state.store.all().iter().find(|t| t.id == id))
            .cloned()
    }

    /// Snapshot of all tasks in insertion order.
    pub fn tasks(&self) -> Vec<Task> {
        self.lock_state().store.all().to_vec()
    }

    pub fn tasks_for_project(&self, project_id: u64) -> Vec<Task> {
        self.lock_state().store.filter(|t| t.project_id == project_id).into_iter().cloned().collect()
    }

    /// Revision signal for the rendering layer: bumped after every local
    /// mutation. Receivers re-read via `tasks()`.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    // ── Projects ────────────────────────────────────────────────────

    pub fn load_projects(&self, projects: Vec<Project>) {
        self.lock_state().projects.load(projects);
        self.bump();
    }

    pub fn set_active_project(&self, project_id: u64) -> bool {
        let ok = self.lock_state().projects.set_active(project_id);
        if ok {
            self.bump();
        }
        ok
    }

    pub fn active_project_id(&self) -> Option<u64> {
        self.lock_state().projects.active_id()
    }

    // ── Internals ───────────────────────────────────────────────────

    fn lock_state(&self) -> MutexGuard<'_, EngineState> {
        // Nothing panics while holding the lock, so poisoning is unreachable.
        self.state.lock().expect("engine state lock poisoned")
    }

    fn bump(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }
}

/// Normalize a caller-supplied patch at the engine boundary: the local copy
/// stores the UI status form; the wire copy is derived from it later.
fn normalize_patch(mut patch: TaskPatch) -> TaskPatch {
    patch.status = patch.status.take().map(|s| status::to_ui(&s));
    patch
}
