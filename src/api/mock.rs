//! In-memory [`Api`] for tests
//!
//! Holds fixed entity lists, serves them through offset cursors and records
//! every call as a short string (`"get_tasks section:sec-1"`).

use std::cell::RefCell;

use super::{Api, ApiError, NewLabel, NewTask, TaskFilter, TaskUpdate};
use crate::domain::{Comment, Label, Page, Project, Section, Task, User};

#[derive(Default)]
pub struct MockApi {
    pub tasks: Vec<Task>,
    pub projects: Vec<Project>,
    pub sections: Vec<Section>,
    pub labels: Vec<Label>,
    pub comments: Vec<Comment>,
    /// Caps every page, regardless of the requested limit
    pub max_page: Option<usize>,
    calls: RefCell<Vec<String>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(mut self, tasks: Vec<Task>) -> Self {
        self.tasks = tasks;
        self
    }

    pub fn with_projects(mut self, projects: Vec<Project>) -> Self {
        self.projects = projects;
        self
    }

    pub fn with_sections(mut self, sections: Vec<Section>) -> Self {
        self.sections = sections;
        self
    }

    pub fn with_labels(mut self, labels: Vec<Label>) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_comments(mut self, comments: Vec<Comment>) -> Self {
        self.comments = comments;
        self
    }

    pub fn with_max_page(mut self, max_page: usize) -> Self {
        self.max_page = Some(max_page);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Number of recorded calls starting with `prefix`
    pub fn count(&self, prefix: &str) -> usize {
        self.calls.borrow().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.borrow_mut().push(call.into());
    }

    fn page<T: Clone>(&self, items: Vec<T>, cursor: Option<&str>, limit: usize) -> Page<T> {
        let start: usize = cursor.and_then(|c| c.parse().ok()).unwrap_or(0);
        let size = self.max_page.map_or(limit, |max| max.min(limit));
        let end = start.saturating_add(size).min(items.len());
        let next = (end < items.len()).then(|| end.to_string());

        Page::new(items.get(start..end).unwrap_or_default().to_vec(), next)
    }

    fn find<T: Clone>(
        items: &[T],
        id: &str,
        key: impl Fn(&T) -> &str,
        what: &str,
    ) -> Result<T, ApiError> {
        items
            .iter()
            .find(|item| key(item) == id)
            .cloned()
            .ok_or_else(|| ApiError::not_found(format!("{} not found", what)))
    }
}

fn scope(filter: &TaskFilter) -> String {
    if let Some(id) = &filter.section_id {
        format!("section:{}", id)
    } else if let Some(id) = &filter.project_id {
        format!("project:{}", id)
    } else if let Some(id) = &filter.parent_id {
        format!("parent:{}", id)
    } else if let Some(label) = &filter.label {
        format!("label:{}", label)
    } else {
        "all".to_string()
    }
}

impl Api for MockApi {
    fn get_user(&self) -> Result<User, ApiError> {
        self.record("get_user");
        Ok(User {
            id: "user-1".to_string(),
            full_name: "Test User".to_string(),
            email: "test@example.com".to_string(),
        })
    }

    fn get_task(&self, id: &str) -> Result<Task, ApiError> {
        self.record(format!("get_task {}", id));
        Self::find(&self.tasks, id, |t| t.id.as_str(), "Task")
    }

    fn get_tasks(
        &self,
        filter: &TaskFilter,
        cursor: Option<&str>,
        limit: usize,
    ) -> Result<Page<Task>, ApiError> {
        self.record(format!("get_tasks {}", scope(filter)));
        let matching: Vec<Task> = self
            .tasks
            .iter()
            .filter(|t| filter.project_id.as_ref().map_or(true, |p| *p == t.project_id))
            .filter(|t| filter.section_id.is_none() || filter.section_id == t.section_id)
            .filter(|t| filter.parent_id.is_none() || filter.parent_id == t.parent_id)
            .filter(|t| filter.label.as_ref().map_or(true, |l| t.labels.contains(l)))
            .cloned()
            .collect();
        Ok(self.page(matching, cursor, limit))
    }

    fn add_task(&self, task: &NewTask) -> Result<Task, ApiError> {
        self.record(format!("add_task {}", task.content));
        let mut created = Task::new(
            "new-task",
            task.content.clone(),
            task.project_id.clone().unwrap_or_default(),
        );
        created.section_id = task.section_id.clone();
        created.parent_id = task.parent_id.clone();
        created.labels = task.labels.clone();
        Ok(created)
    }

    fn update_task(&self, id: &str, update: &TaskUpdate) -> Result<Task, ApiError> {
        self.record(format!("update_task {}", id));
        let mut task = Self::find(&self.tasks, id, |t| t.id.as_str(), "Task")?;
        if let Some(content) = &update.content {
            task.content = content.clone();
        }
        Ok(task)
    }

    fn close_task(&self, id: &str) -> Result<(), ApiError> {
        self.record(format!("close_task {}", id));
        Ok(())
    }

    fn reopen_task(&self, id: &str) -> Result<(), ApiError> {
        self.record(format!("reopen_task {}", id));
        Ok(())
    }

    fn delete_task(&self, id: &str) -> Result<(), ApiError> {
        self.record(format!("delete_task {}", id));
        Ok(())
    }

    fn get_project(&self, id: &str) -> Result<Project, ApiError> {
        self.record(format!("get_project {}", id));
        Self::find(&self.projects, id, |p| p.id.as_str(), "Project")
    }

    fn get_projects(&self, cursor: Option<&str>, limit: usize) -> Result<Page<Project>, ApiError> {
        self.record("get_projects");
        Ok(self.page(self.projects.clone(), cursor, limit))
    }

    fn get_section(&self, id: &str) -> Result<Section, ApiError> {
        self.record(format!("get_section {}", id));
        Self::find(&self.sections, id, |s| s.id.as_str(), "Section")
    }

    fn get_sections(
        &self,
        project_id: &str,
        cursor: Option<&str>,
        limit: usize,
    ) -> Result<Page<Section>, ApiError> {
        self.record(format!("get_sections {}", project_id));
        let matching: Vec<Section> = self
            .sections
            .iter()
            .filter(|s| s.project_id == project_id)
            .cloned()
            .collect();
        Ok(self.page(matching, cursor, limit))
    }

    fn add_section(&self, name: &str, project_id: &str) -> Result<Section, ApiError> {
        self.record(format!("add_section {}", name));
        Ok(Section::new("new-section", name, project_id))
    }

    fn update_section(&self, id: &str, name: &str) -> Result<Section, ApiError> {
        self.record(format!("update_section {}", id));
        let mut section = Self::find(&self.sections, id, |s| s.id.as_str(), "Section")?;
        section.name = name.to_string();
        Ok(section)
    }

    fn delete_section(&self, id: &str) -> Result<(), ApiError> {
        self.record(format!("delete_section {}", id));
        Ok(())
    }

    fn get_labels(&self, cursor: Option<&str>, limit: usize) -> Result<Page<Label>, ApiError> {
        self.record("get_labels");
        Ok(self.page(self.labels.clone(), cursor, limit))
    }

    fn add_label(&self, label: &NewLabel) -> Result<Label, ApiError> {
        self.record(format!("add_label {}", label.name));
        let mut created = Label::new("new-label", label.name.clone());
        created.is_favorite = label.is_favorite;
        Ok(created)
    }

    fn delete_label(&self, id: &str) -> Result<(), ApiError> {
        self.record(format!("delete_label {}", id));
        Ok(())
    }

    fn get_comments(
        &self,
        task_id: &str,
        cursor: Option<&str>,
        limit: usize,
    ) -> Result<Page<Comment>, ApiError> {
        self.record(format!("get_comments {}", task_id));
        let matching: Vec<Comment> = self
            .comments
            .iter()
            .filter(|c| c.task_id.as_deref() == Some(task_id))
            .cloned()
            .collect();
        Ok(self.page(matching, cursor, limit))
    }

    fn add_comment(&self, task_id: &str, content: &str) -> Result<Comment, ApiError> {
        self.record(format!("add_comment {}", task_id));
        Ok(Comment {
            id: "new-comment".to_string(),
            content: content.to_string(),
            task_id: Some(task_id.to_string()),
            project_id: None,
            posted_at: String::new(),
        })
    }

    fn delete_comment(&self, id: &str) -> Result<(), ApiError> {
        self.record(format!("delete_comment {}", id));
        Ok(())
    }
}
