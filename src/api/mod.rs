//! # Service API
//!
//! The [`Api`] trait is the narrow surface the rest of the crate uses to
//! talk to the task service. Every list endpoint is cursor-paginated and
//! returns a [`Page`]; callers drive it through [`crate::domain::paginate`].
//!
//! ## Implementations
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`HttpClient`] | Blocking HTTP client for the REST API |
//! | [`SpinnerApi`] | Decorator showing a progress spinner around each call |
//!
//! Errors from the service are reported as [`ApiError`] and are never
//! retried.

mod http;
mod spinner;

#[cfg(test)]
pub(crate) mod mock;

use serde::Serialize;
use thiserror::Error;

use crate::domain::{Comment, Label, Page, Project, Section, Task, User};

pub use http::{HttpClient, DEFAULT_BASE_URL};
pub use spinner::{SpinnerApi, SpinnerPolicy};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("API request failed ({status}): {message}")]
    Http { status: u16, message: String },

    #[error("Could not reach the API: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response from the API: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn not_found(what: impl Into<String>) -> Self {
        ApiError::Http {
            status: 404,
            message: what.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Http { status: 404, .. })
    }
}

/// Filters for listing active tasks. At most one scope is normally set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl TaskFilter {
    pub fn project(project_id: impl Into<String>) -> Self {
        Self {
            project_id: Some(project_id.into()),
            ..Self::default()
        }
    }

    pub fn section(section_id: impl Into<String>) -> Self {
        Self {
            section_id: Some(section_id.into()),
            ..Self::default()
        }
    }
}

/// Body of a create-task request
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewTask {
    pub content: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_string: Option<String>,
}

/// Body of an update-task request. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Replaces the task's labels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_string: Option<String>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Body of a create-label request
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewLabel {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_favorite: bool,
}

/// Operations offered by the task service
///
/// List methods take the cursor returned by the previous page (or `None`
/// for the first page) and the maximum number of items wanted.
pub trait Api {
    fn get_user(&self) -> Result<User, ApiError>;

    fn get_task(&self, id: &str) -> Result<Task, ApiError>;
    fn get_tasks(
        &self,
        filter: &TaskFilter,
        cursor: Option<&str>,
        limit: usize,
    ) -> Result<Page<Task>, ApiError>;
    fn add_task(&self, task: &NewTask) -> Result<Task, ApiError>;
    fn update_task(&self, id: &str, update: &TaskUpdate) -> Result<Task, ApiError>;
    fn close_task(&self, id: &str) -> Result<(), ApiError>;
    fn reopen_task(&self, id: &str) -> Result<(), ApiError>;
    fn delete_task(&self, id: &str) -> Result<(), ApiError>;

    fn get_project(&self, id: &str) -> Result<Project, ApiError>;
    fn get_projects(&self, cursor: Option<&str>, limit: usize) -> Result<Page<Project>, ApiError>;

    fn get_section(&self, id: &str) -> Result<Section, ApiError>;
    fn get_sections(
        &self,
        project_id: &str,
        cursor: Option<&str>,
        limit: usize,
    ) -> Result<Page<Section>, ApiError>;
    fn add_section(&self, name: &str, project_id: &str) -> Result<Section, ApiError>;
    fn update_section(&self, id: &str, name: &str) -> Result<Section, ApiError>;
    fn delete_section(&self, id: &str) -> Result<(), ApiError>;

    fn get_labels(&self, cursor: Option<&str>, limit: usize) -> Result<Page<Label>, ApiError>;
    fn add_label(&self, label: &NewLabel) -> Result<Label, ApiError>;
    fn delete_label(&self, id: &str) -> Result<(), ApiError>;

    fn get_comments(
        &self,
        task_id: &str,
        cursor: Option<&str>,
        limit: usize,
    ) -> Result<Page<Comment>, ApiError>;
    fn add_comment(&self, task_id: &str, content: &str) -> Result<Comment, ApiError>;
    fn delete_comment(&self, id: &str) -> Result<(), ApiError>;
}
