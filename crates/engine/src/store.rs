// In-memory task collection: the single mutable source of truth for the UI.
//
// Insertion-ordered and keyed by each task's current id. Status values are
// always UI vocabulary in here; normalization happens at the sync boundary
// before anything reaches `patch`.

use thiserror::Error;

use taskdeck_common::id::TaskId;
use taskdeck_common::types::{Task, TaskPatch};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Two live tasks may never share an id. Given the provisional-id
    /// ceiling this indicates a programmer error, not a data race.
    #[error("task id {0} already present")]
    DuplicateId(TaskId),

    #[error("task {0} not found")]
    NotFound(TaskId),
}

/// Insertion-ordered collection of tasks keyed by current id.
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a task. Fails if its id is already present, leaving the prior
    /// entry untouched.
    pub fn insert(&mut self, task: Task) -> Result<(), StoreError> {
        if self.position(task.id).is_some() {
            return Err(StoreError::DuplicateId(task.id));
        }
        self.tasks.push(task);
        Ok(())
    }

    /// Re-key a task during reconciliation. No-op when `old == new`; fails
    /// if `old` is absent or `new` already belongs to another task.
    pub fn replace_id(&mut self, old: TaskId, new: TaskId) -> Result<(), StoreError> {
        if old == new {
            return Ok(());
        }
        if self.position(new).is_some() {
            return Err(StoreError::DuplicateId(new));
        }
        let idx = self.position(old).ok_or(StoreError::NotFound(old))?;
        self.tasks[idx].id = new;
        Ok(())
    }

    /// Merge a partial update into a task. The patch's status, if present,
    /// must already be UI vocabulary.
    pub fn patch(&mut self, id: TaskId, patch: &TaskPatch) -> Result<(), StoreError> {
        let idx = self.position(id).ok_or(StoreError::NotFound(id))?;
        let task = &mut self.tasks[idx];
        if let Some(title) = &patch.title {
            task.title = title.clone();
        }
        if let Some(description) = &patch.description {
            task.description = description.clone();
        }
        if let Some(status) = &patch.status {
            task.status = status.clone();
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(tags) = &patch.tags {
            task.tags = tags.clone();
        }
        if let Some(due) = patch.due_date {
            task.due_date = Some(due);
        }
        Ok(())
    }

    /// Remove a task if present. Removing an absent id is a no-op; network
    /// retries and stale UI events make double-deletes routine.
    pub fn remove(&mut self, id: TaskId) -> bool {
        match self.position(id) {
            Some(idx) => {
                self.tasks.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Remove every listed id that is present. Returns how many were removed.
    pub fn remove_many(&mut self, ids: &[TaskId]) -> usize {
        ids.iter().filter(|&&id| self.remove(id)).count()
    }

    pub fn find(&self, id: TaskId) -> Option<&Task> {
        self.position(id).map(|idx| &self.tasks[idx])
    }

    pub fn find_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.position(id).map(|idx| &mut self.tasks[idx])
    }

    /// All tasks in insertion order.
    pub fn all(&self) -> &[Task] {
        &self.tasks
    }

    pub fn filter(&self, predicate: impl Fn(&Task) -> bool) -> Vec<&Task> {
        self.tasks.iter().filter(|t| predicate(t)).collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }
}
