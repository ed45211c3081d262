// Project index: which projects are loaded and which one is active.
//
// Consulted by the sync engine when a create draft omits its project.

use taskdeck_common::types::Project;

#[derive(Debug, Default)]
pub struct ProjectIndex {
    projects: Vec<Project>,
    active: Option<u64>,
}

impl ProjectIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the loaded project set. Clears the active project if it is
    /// no longer present.
    pub fn load(&mut self, projects: Vec<Project>) {
        self.projects = projects;
        if let Some(active) = self.active {
            if !self.contains(active) {
                self.active = None;
            }
        }
    }

    /// Mark a loaded project as active. Returns false (and changes nothing)
    /// for an unknown project id.
    pub fn set_active(&mut self, project_id: u64) -> bool {
        if self.contains(project_id) {
            self.active = Some(project_id);
            true
        } else {
            false
        }
    }

    pub fn active_id(&self) -> Option<u64> {
        self.active
    }

    pub fn contains(&self, project_id: u64) -> bool {
        self.projects.iter().any(|p| p.id == project_id)
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }
}
