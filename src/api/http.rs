//! Blocking HTTP client for the REST API

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{Api, ApiError, NewLabel, NewTask, TaskFilter, TaskUpdate};
use crate::domain::{Comment, Label, Page, Project, Section, Task, User};

pub const DEFAULT_BASE_URL: &str = "https://api.todoist.com/api/v1";

pub struct HttpClient {
    base_url: String,
    token: String,
    client: Client,
}

#[derive(Serialize)]
struct SectionBody<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    project_id: Option<&'a str>,
}

#[derive(Serialize)]
struct CommentBody<'a> {
    task_id: &'a str,
    content: &'a str,
}

type Query = Vec<(&'static str, String)>;

fn page_query(cursor: Option<&str>, limit: usize) -> Query {
    let mut query = vec![("limit", limit.to_string())];
    if let Some(cursor) = cursor {
        query.push(("cursor", cursor.to_string()));
    }
    query
}

/// Maps a failed response to an error. The body is the message unless it
/// is blank, in which case the status reason is used.
fn status_error(status: StatusCode, body: Option<String>) -> ApiError {
    let message = body
        .filter(|body| !body.trim().is_empty())
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());

    ApiError::Http {
        status: status.as_u16(),
        message,
    }
}

impl HttpClient {
    pub fn new(base_url: &str, token: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            client: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.bearer_auth(&self.token).send()?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        Err(status_error(status, response.text().ok()))
    }

    fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        response.json().map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn get<T: DeserializeOwned>(&self, path: &str, query: &Query) -> Result<T, ApiError> {
        tracing::debug!(path, ?query, "GET");
        let response = self.send(self.client.get(self.url(path)).query(query))?;
        Self::decode(response)
    }

    fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        tracing::debug!(path, "POST");
        let response = self.send(self.client.post(self.url(path)).json(body))?;
        Self::decode(response)
    }

    /// POST without a body, for endpoints answering `204 No Content`
    fn post_empty(&self, path: &str) -> Result<(), ApiError> {
        tracing::debug!(path, "POST");
        self.send(self.client.post(self.url(path)))?;
        Ok(())
    }

    fn delete(&self, path: &str) -> Result<(), ApiError> {
        tracing::debug!(path, "DELETE");
        self.send(self.client.delete(self.url(path)))?;
        Ok(())
    }
}

impl Api for HttpClient {
    fn get_user(&self) -> Result<User, ApiError> {
        self.get("user", &Vec::new())
    }

    fn get_task(&self, id: &str) -> Result<Task, ApiError> {
        self.get(&format!("tasks/{}", id), &Vec::new())
    }

    fn get_tasks(
        &self,
        filter: &TaskFilter,
        cursor: Option<&str>,
        limit: usize,
    ) -> Result<Page<Task>, ApiError> {
        let mut query = page_query(cursor, limit);
        let scopes = [
            ("project_id", &filter.project_id),
            ("section_id", &filter.section_id),
            ("parent_id", &filter.parent_id),
            ("label", &filter.label),
        ];
        for (key, value) in scopes {
            if let Some(value) = value {
                query.push((key, value.clone()));
            }
        }
        self.get("tasks", &query)
    }

    fn add_task(&self, task: &NewTask) -> Result<Task, ApiError> {
        self.post("tasks", task)
    }

    fn update_task(&self, id: &str, update: &TaskUpdate) -> Result<Task, ApiError> {
        self.post(&format!("tasks/{}", id), update)
    }

    fn close_task(&self, id: &str) -> Result<(), ApiError> {
        self.post_empty(&format!("tasks/{}/close", id))
    }

    fn reopen_task(&self, id: &str) -> Result<(), ApiError> {
        self.post_empty(&format!("tasks/{}/reopen", id))
    }

    fn delete_task(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("tasks/{}", id))
    }

    fn get_project(&self, id: &str) -> Result<Project, ApiError> {
        self.get(&format!("projects/{}", id), &Vec::new())
    }

    fn get_projects(&self, cursor: Option<&str>, limit: usize) -> Result<Page<Project>, ApiError> {
        self.get("projects", &page_query(cursor, limit))
    }

    fn get_section(&self, id: &str) -> Result<Section, ApiError> {
        self.get(&format!("sections/{}", id), &Vec::new())
    }

    fn get_sections(
        &self,
        project_id: &str,
        cursor: Option<&str>,
        limit: usize,
    ) -> Result<Page<Section>, ApiError> {
        let mut query = page_query(cursor, limit);
        query.push(("project_id", project_id.to_string()));
        self.get("sections", &query)
    }

    fn add_section(&self, name: &str, project_id: &str) -> Result<Section, ApiError> {
        let body = SectionBody {
            name,
            project_id: Some(project_id),
        };
        self.post("sections", &body)
    }

    fn update_section(&self, id: &str, name: &str) -> Result<Section, ApiError> {
        let body = SectionBody { name, project_id: None };
        self.post(&format!("sections/{}", id), &body)
    }

    fn delete_section(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("sections/{}", id))
    }

    fn get_labels(&self, cursor: Option<&str>, limit: usize) -> Result<Page<Label>, ApiError> {
        self.get("labels", &page_query(cursor, limit))
    }

    fn add_label(&self, label: &NewLabel) -> Result<Label, ApiError> {
        self.post("labels", label)
    }

    fn delete_label(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("labels/{}", id))
    }

    fn get_comments(
        &self,
        task_id: &str,
        cursor: Option<&str>,
        limit: usize,
    ) -> Result<Page<Comment>, ApiError> {
        let mut query = page_query(cursor, limit);
        query.push(("task_id", task_id.to_string()));
        self.get("comments", &query)
    }

    fn add_comment(&self, task_id: &str, content: &str) -> Result<Comment, ApiError> {
        self.post("comments", &CommentBody { task_id, content })
    }

    fn delete_comment(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("comments/{}", id))
    }
}
