// Core domain types shared across the TaskDeck workspace.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::id::TaskId;
use crate::status::UI_TODO;

/// A project groups related tasks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    pub id: u64,
    pub name: String,
}

/// Task priority, shared verbatim between UI and store.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

/// Where a task sits in the create-reconciliation lifecycle.
///
/// Transient client-side state; the store never sees it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    /// Created locally; the remote create is still in flight.
    Pending,
    /// The store has acknowledged the task.
    Confirmed,
    /// The remote create was rejected or the network failed. The task stays
    /// visible and editable locally.
    Failed,
}

impl SyncState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// One unit of work, as observed by the UI.
///
/// `status` is always in the UI vocabulary while the task is resident in the
/// local store; translation to the store vocabulary happens at the sync
/// boundary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub project_id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub tags: Vec<String>,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub sync_state: SyncState,
}

/// Input for creating a task. Omitted fields take defaults; an omitted
/// `project_id` falls back to the active project.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskDraft {
    pub project_id: Option<u64>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Any spelling the codec understands; normalized on ingest.
    pub status: Option<String>,
    pub priority: Option<Priority>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub due_date: Option<NaiveDate>,
}

impl TaskDraft {
    pub fn titled(title: impl Into<String>) -> Self {
        Self { title: title.into(), ..Self::default() }
    }
}

/// A partial update. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Any spelling the codec understands; normalized at the sync boundary.
    pub status: Option<String>,
    pub priority: Option<Priority>,
    pub tags: Option<Vec<String>>,
    pub due_date: Option<NaiveDate>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.tags.is_none()
            && self.due_date.is_none()
    }
}

/// Default status for a freshly created task.
pub fn default_status() -> String {
    UI_TODO.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_state_round_trips() {
        for state in [SyncState::Pending, SyncState::Confirmed, SyncState::Failed] {
            assert_eq!(SyncState::parse(state.as_str()), Some(state));
        }
    }

    #[test]
    fn sync_state_parse_returns_none_for_unknown() {
        assert_eq!(SyncState::parse("acked"), None);
        assert_eq!(SyncState::parse(""), None);
    }

    #[test]
    fn priority_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Priority::Urgent).unwrap(), "\"urgent\"");
        assert_eq!(serde_json::from_str::<Priority>("\"low\"").unwrap(), Priority::Low);
    }

    #[test]
    fn priority_orders_low_to_urgent() {
        assert!(Priority::Low < Priority::Medium);
        assert!(Priority::Medium < Priority::High);
        assert!(Priority::High < Priority::Urgent);
    }

    #[test]
    fn task_serde_round_trip() {
        let task = Task {
            id: TaskId::Confirmed(5),
            project_id: 1,
            title: "Write release notes".into(),
            description: String::new(),
            status: default_status(),
            priority: Priority::High,
            tags: vec!["docs".into()],
            due_date: None,
            created_at: Utc::now(),
            sync_state: SyncState::Confirmed,
        };
        let json = serde_json::to_string(&task).unwrap();
        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(back, task);
    }

    #[test]
    fn empty_patch_reports_empty() {
        assert!(TaskPatch::default().is_empty());
        let patch = TaskPatch { title: Some("x".into()), ..Default::default() };
        assert!(!patch.is_empty());
    }

    #[test]
    fn draft_titled_sets_only_the_title() {
        let draft = TaskDraft::titled("Ship it");
        assert_eq!(draft.title, "Ship it");
        assert!(draft.project_id.is_none());
        assert!(draft.status.is_none());
    }
}
