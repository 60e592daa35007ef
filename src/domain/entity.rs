//! Projects, sections, labels, comments and users

use serde::{Deserialize, Serialize};

use super::candidate::Candidate;

/// A personal or workspace project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub color: String,

    #[serde(default)]
    pub is_favorite: bool,

    #[serde(default)]
    pub parent_id: Option<String>,

    /// Present only for projects shared through a workspace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Project {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: String::new(),
            is_favorite: false,
            parent_id: None,
            workspace_id: None,
            url: None,
        }
    }

    pub fn is_workspace(&self) -> bool {
        self.workspace_id.is_some()
    }
}

/// A section inside a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub project_id: String,

    #[serde(default)]
    pub section_order: Option<i64>,
}

impl Section {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        project_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            project_id: project_id.into(),
            section_order: None,
        }
    }
}

/// A personal label. Tasks reference labels by name, not id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub color: String,

    #[serde(default)]
    pub is_favorite: bool,
}

impl Label {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: String::new(),
            is_favorite: false,
        }
    }
}

/// A comment on a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,

    pub content: String,

    #[serde(default, alias = "item_id")]
    pub task_id: Option<String>,

    #[serde(default)]
    pub project_id: Option<String>,

    #[serde(default)]
    pub posted_at: String,
}

/// The authenticated user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,

    #[serde(default)]
    pub full_name: String,

    #[serde(default)]
    pub email: String,
}

impl Candidate for Project {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

impl Candidate for Section {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

impl Candidate for Label {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

impl Candidate for Comment {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.content
    }
}
