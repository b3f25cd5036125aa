//! In-memory project repository with a number-uniqueness index.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::project::{
    domain::{Project, ProjectId},
    ports::{ProjectFilter, ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult},
};

/// Thread-safe in-memory project repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProjectStore {
    state: Arc<RwLock<ProjectState>>,
}

#[derive(Debug, Default)]
struct ProjectState {
    projects: HashMap<ProjectId, Project>,
    number_index: HashMap<String, ProjectId>,
}

impl InMemoryProjectStore {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Rejects a write that would claim a number another project holds.
fn check_number_unique(
    state: &ProjectState,
    project: &Project,
) -> ProjectRepositoryResult<()> {
    if let Some(number) = project.project_number() {
        if let Some(holder) = state.number_index.get(number.as_str()) {
            if *holder != project.id() {
                return Err(ProjectRepositoryError::DuplicateProjectNumber(
                    number.clone(),
                ));
            }
        }
    }
    Ok(())
}

fn index_number(state: &mut ProjectState, project: &Project) {
    if let Some(number) = project.project_number() {
        state
            .number_index
            .insert(number.as_str().to_owned(), project.id());
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectStore {
    async fn store(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            ProjectRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.projects.contains_key(&project.id()) {
            return Err(ProjectRepositoryError::DuplicateProject(project.id()));
        }
        check_number_unique(&state, project)?;
        index_number(&mut state, project);
        state.projects.insert(project.id(), project.clone());
        Ok(())
    }

    async fn update_versioned(
        &self,
        project: &Project,
        expected_version: u64,
    ) -> ProjectRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            ProjectRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;

        let stored = state
            .projects
            .get(&project.id())
            .ok_or(ProjectRepositoryError::NotFound(project.id()))?;
        if stored.version() != expected_version {
            return Err(ProjectRepositoryError::VersionMismatch {
                project_id: project.id(),
                expected: expected_version,
                actual: stored.version(),
            });
        }
        check_number_unique(&state, project)?;
        index_number(&mut state, project);
        state.projects.insert(project.id(), project.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>> {
        let state = self.state.read().map_err(|err| {
            ProjectRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.projects.get(&id).cloned())
    }

    async fn find(&self, filter: &ProjectFilter) -> ProjectRepositoryResult<Vec<Project>> {
        let state = self.state.read().map_err(|err| {
            ProjectRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state
            .projects
            .values()
            .filter(|project| filter.matches(project))
            .cloned()
            .collect())
    }

    async fn count_numbers_on(&self, day: NaiveDate) -> ProjectRepositoryResult<u64> {
        let state = self.state.read().map_err(|err| {
            ProjectRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let count = state
            .projects
            .values()
            .filter(|project| {
                project.project_number().is_some()
                    && project.created_at().date_naive() == day
            })
            .count();
        Ok(count as u64)
    }
}
