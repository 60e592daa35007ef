//! # Reference Resolution
//!
//! Turns a user-supplied reference into a concrete entity or identifier.
//!
//! | Reference | Behaviour |
//! |-----------|-----------|
//! | `id:<id>` | Fetched directly by id (sections are also checked against the project) |
//! | free text | Candidate list fetched, then matched by name |
//!
//! Name matching is case-insensitive: an exact match wins, otherwise a
//! single substring match is accepted and several are reported as
//! ambiguous. See [`crate::domain::fuzzy_match`].

use thiserror::Error;

use crate::api::{Api, ApiError, TaskFilter};
use crate::domain::{
    fuzzy_match, paginate, Candidate, EntityKind, Label, Page, PaginateOptions, Project, RefError,
    Reference, Section, Task,
};

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Ref(#[from] RefError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Fetches every page of a list endpoint
fn fetch_all<T, F>(fetch_page: F) -> Result<Vec<T>, ApiError>
where
    F: FnMut(Option<&str>, usize) -> Result<Page<T>, ApiError>,
{
    Ok(paginate(fetch_page, &PaginateOptions::all())?.results)
}

/// Matches `query` within `candidates` and returns an owned copy
fn pick<T: Candidate + Clone>(
    query: &str,
    candidates: &[T],
    entity: EntityKind,
    scope: Option<EntityKind>,
) -> Result<T, ResolveError> {
    let found = fuzzy_match(query, candidates).into_result(entity, query, scope)?;
    tracing::debug!(entity = %entity, query, id = found.id(), "resolved by name");
    Ok(found.clone())
}

pub fn list_tasks<A: Api + ?Sized>(api: &A, filter: &TaskFilter) -> Result<Vec<Task>, ApiError> {
    fetch_all(|cursor, limit| api.get_tasks(filter, cursor, limit))
}

pub fn list_projects<A: Api + ?Sized>(api: &A) -> Result<Vec<Project>, ApiError> {
    fetch_all(|cursor, limit| api.get_projects(cursor, limit))
}

pub fn list_sections<A: Api + ?Sized>(api: &A, project_id: &str) -> Result<Vec<Section>, ApiError> {
    fetch_all(|cursor, limit| api.get_sections(project_id, cursor, limit))
}

pub fn list_labels<A: Api + ?Sized>(api: &A) -> Result<Vec<Label>, ApiError> {
    fetch_all(|cursor, limit| api.get_labels(cursor, limit))
}

/// Resolves a task among all active tasks
pub fn resolve_task<A: Api + ?Sized>(api: &A, reference: &str) -> Result<Task, ResolveError> {
    match Reference::parse(reference) {
        Reference::Id(id) => Ok(api.get_task(id)?),
        Reference::Name(name) => {
            let tasks = list_tasks(api, &TaskFilter::default())?;
            pick(name, &tasks, EntityKind::Task, None)
        }
    }
}

pub fn resolve_project<A: Api + ?Sized>(api: &A, reference: &str) -> Result<Project, ResolveError> {
    match Reference::parse(reference) {
        Reference::Id(id) => Ok(api.get_project(id)?),
        Reference::Name(name) => {
            let projects = list_projects(api)?;
            pick(name, &projects, EntityKind::Project, None)
        }
    }
}

pub fn resolve_project_id<A: Api + ?Sized>(
    api: &A,
    reference: &str,
) -> Result<String, ResolveError> {
    resolve_project(api, reference).map(|project| project.id)
}

/// Resolves a section that must belong to `project_id`.
///
/// The project's sections are always listed: an explicit id that is not
/// among them is rejected as out of scope instead of being trusted.
pub fn resolve_section_id<A: Api + ?Sized>(
    api: &A,
    reference: &str,
    project_id: &str,
) -> Result<String, ResolveError> {
    let sections = list_sections(api, project_id)?;

    match Reference::parse(reference) {
        Reference::Id(id) => {
            if sections.iter().any(|s| s.id == id) {
                Ok(id.to_string())
            } else {
                Err(RefError::NotInScope {
                    entity: EntityKind::Section,
                    id: id.to_string(),
                    scope: EntityKind::Project,
                }
                .into())
            }
        }
        Reference::Name(name) => {
            pick(name, &sections, EntityKind::Section, Some(EntityKind::Project)).map(|s| s.id)
        }
    }
}

/// Resolves the parent for a new subtask.
///
/// An explicit id is returned without a lookup. A name is searched in
/// `section_id` first when given; only a miss there (not an ambiguity)
/// falls back to the whole project.
pub fn resolve_parent_task_id<A: Api + ?Sized>(
    api: &A,
    reference: &str,
    project_id: &str,
    section_id: Option<&str>,
) -> Result<String, ResolveError> {
    let name = match Reference::parse(reference) {
        Reference::Id(id) => return Ok(id.to_string()),
        Reference::Name(name) => name,
    };

    if let Some(section_id) = section_id {
        let tasks = list_tasks(api, &TaskFilter::section(section_id))?;
        let found = fuzzy_match(name, &tasks);

        if !found.is_not_found() {
            let task = found.into_result(EntityKind::Task, name, Some(EntityKind::Project))?;
            return Ok(task.id.clone());
        }
        tracing::debug!(section_id, query = name, "no match in section, searching project");
    }

    let tasks = list_tasks(api, &TaskFilter::project(project_id))?;
    pick(name, &tasks, EntityKind::Task, Some(EntityKind::Project)).map(|t| t.id)
}

/// Resolves a label. Names may carry the `@` sigil used in task content.
///
/// An explicit id is not validated: if it is missing from the label list the
/// returned label carries the id as its name, and the service decides.
pub fn resolve_label<A: Api + ?Sized>(api: &A, reference: &str) -> Result<Label, ResolveError> {
    let labels = list_labels(api)?;

    match Reference::parse(reference) {
        Reference::Id(id) => Ok(labels
            .into_iter()
            .find(|l| l.id == id)
            .unwrap_or_else(|| Label::new(id, id))),
        Reference::Name(name) => {
            let name = name.strip_prefix('@').unwrap_or(name);
            pick(name, &labels, EntityKind::Label, None)
        }
    }
}
