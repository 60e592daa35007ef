//! Task CLI commands

use std::collections::HashMap;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Args, Subcommand};

use super::context::Context;
use super::error::CommandError;
use super::output::Output;
use super::ListArgs;
use crate::api::{Api, NewTask, TaskFilter, TaskUpdate};
use crate::domain::{require_id_ref, EntityKind, Limits, Page, Priority, Task};
use crate::resolve::{
    list_projects, resolve_label, resolve_parent_task_id, resolve_project_id, resolve_section_id,
    resolve_task,
};

#[derive(Subcommand)]
pub enum TaskCommands {
    /// List active tasks
    ///
    /// Examples:
    ///   td task list --project Work --priority p1
    ///   td task list --project Work --section Planning
    ///   td task list --due overdue --all
    List {
        #[command(flatten)]
        filters: TaskFilters,

        #[command(flatten)]
        list: ListArgs,
    },

    /// Show task details
    View {
        /// Task name or id:xxx
        reference: String,
    },

    /// Mark a task as done
    Complete {
        /// Task name or id:xxx
        reference: String,
    },

    /// Reopen a completed task
    Reopen {
        /// Task id:xxx (completed tasks cannot be found by name)
        reference: String,
    },

    /// Delete a task
    Delete {
        /// Task name or id:xxx
        reference: String,

        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },

    /// Add a task
    ///
    /// Examples:
    ///   td task add --content "Buy milk" --due tomorrow
    ///   td task add --content "Write tests" --project Work --section "In Progress"
    ///   td task add --content "Schema" --project Work --parent "Setup database"
    Add(AddArgs),

    /// Update a task's fields
    Update(UpdateArgs),
}

#[derive(Args, Debug, Default)]
pub struct TaskFilters {
    /// Project name or id:xxx
    #[arg(long)]
    pub project: Option<String>,

    /// Section name (needs --project) or id:xxx
    #[arg(long)]
    pub section: Option<String>,

    /// Parent task name or id:xxx
    #[arg(long)]
    pub parent: Option<String>,

    /// Label name or id:xxx
    #[arg(long)]
    pub label: Option<String>,

    /// Only tasks with this priority (p1-p4)
    #[arg(long)]
    pub priority: Option<String>,

    /// today, overdue, or YYYY-MM-DD
    #[arg(long)]
    pub due: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct AddArgs {
    /// Task content
    #[arg(long)]
    pub content: String,

    /// Due date (natural language or YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,

    /// Priority level (p1-p4)
    #[arg(long)]
    pub priority: Option<String>,

    /// Project name or id:xxx
    #[arg(long)]
    pub project: Option<String>,

    /// Section name (needs --project) or id:xxx
    #[arg(long)]
    pub section: Option<String>,

    /// Comma-separated label names
    #[arg(long, value_delimiter = ',')]
    pub labels: Vec<String>,

    /// Parent task name or id:xxx
    #[arg(long)]
    pub parent: Option<String>,

    /// Task description
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct UpdateArgs {
    /// Task name or id:xxx
    pub reference: String,

    /// New content
    #[arg(long)]
    pub content: Option<String>,

    /// New due date
    #[arg(long)]
    pub due: Option<String>,

    /// New priority (p1-p4)
    #[arg(long)]
    pub priority: Option<String>,

    /// New labels, replacing the existing ones
    #[arg(long, value_delimiter = ',')]
    pub labels: Option<Vec<String>>,

    /// New description
    #[arg(long)]
    pub description: Option<String>,
}

/// Due-date filter for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueFilter {
    Today,
    Overdue,
    On(NaiveDate),
}

impl DueFilter {
    pub fn parse(value: &str) -> Result<Self, CommandError> {
        match value.trim().to_lowercase().as_str() {
            "today" => Ok(DueFilter::Today),
            "overdue" => Ok(DueFilter::Overdue),
            other => NaiveDate::parse_from_str(other, "%Y-%m-%d")
                .map(DueFilter::On)
                .map_err(|_| {
                    CommandError::new(
                        "INVALID_DATE",
                        format!(
                            "Invalid due filter \"{}\". Use today, overdue, or YYYY-MM-DD.",
                            value
                        ),
                    )
                }),
        }
    }

    pub fn matches(&self, task: &Task, today: NaiveDate) -> bool {
        match self {
            DueFilter::Today => task.is_due_on(today),
            DueFilter::Overdue => task.is_overdue(today),
            DueFilter::On(day) => task.is_due_on(*day),
        }
    }
}

/// Listing filters after offline validation
#[derive(Debug, Default)]
struct TaskQuery<'a> {
    project: Option<&'a str>,
    section: Option<&'a str>,
    parent: Option<&'a str>,
    label: Option<&'a str>,
    priority: Option<Priority>,
    due: Option<DueFilter>,
}

impl TaskFilters {
    fn validate(&self) -> Result<TaskQuery<'_>> {
        check_section_scope(self.section.as_deref(), self.project.as_deref())?;

        Ok(TaskQuery {
            project: self.project.as_deref(),
            section: self.section.as_deref(),
            parent: self.parent.as_deref(),
            label: self.label.as_deref(),
            priority: parse_priority(self.priority.as_deref())?,
            due: self.due.as_deref().map(DueFilter::parse).transpose()?,
        })
    }
}

fn parse_priority(value: Option<&str>) -> Result<Option<Priority>, CommandError> {
    value
        .map(|p| p.parse::<Priority>().map_err(CommandError::from))
        .transpose()
}

/// A section can only be found by name inside a known project
fn check_section_scope(section: Option<&str>, project: Option<&str>) -> Result<()> {
    if let (Some(section), None) = (section, project) {
        require_id_ref(section, EntityKind::Section)?;
    }
    Ok(())
}

pub fn run(cmd: TaskCommands, ctx: &Context) -> Result<()> {
    let output = &ctx.output;

    match cmd {
        TaskCommands::List { filters, list } => {
            let query = filters.validate()?;
            list_tasks(ctx.api()?, output, &query, &list, Local::now().date_naive())
        }
        TaskCommands::View { reference } => view_task(ctx.api()?, output, &reference),
        TaskCommands::Complete { reference } => complete_task(ctx.api()?, output, &reference),
        TaskCommands::Reopen { reference } => {
            let id = require_id_ref(&reference, EntityKind::Task)?;
            reopen_task(ctx.api()?, output, id)
        }
        TaskCommands::Delete { reference, yes } => {
            if !yes {
                return Err(CommandError::confirmation_required("deletion").into());
            }
            delete_task(ctx.api()?, output, &reference)
        }
        TaskCommands::Add(args) => {
            let priority = parse_priority(args.priority.as_deref())?;
            check_section_scope(args.section.as_deref(), args.project.as_deref())?;
            add_task(ctx.api()?, output, &args, priority)
        }
        TaskCommands::Update(args) => {
            let update = build_update(&args)?;
            update_task(ctx.api()?, output, &args.reference, &update)
        }
    }
}

/// Resolves the scope references of a listing into a service filter
fn build_filter(api: &impl Api, query: &TaskQuery<'_>, output: &Output) -> Result<TaskFilter> {
    let mut filter = TaskFilter::default();

    if let Some(project) = query.project {
        filter.project_id = Some(resolve_project_id(api, project)?);
    }

    filter.section_id = match (query.section, filter.project_id.as_deref()) {
        (Some(section), Some(project_id)) => Some(resolve_section_id(api, section, project_id)?),
        (Some(section), None) => Some(require_id_ref(section, EntityKind::Section)?.to_string()),
        (None, _) => None,
    };

    if let Some(parent) = query.parent {
        let parent_id = match filter.project_id.as_deref() {
            Some(project_id) => {
                resolve_parent_task_id(api, parent, project_id, filter.section_id.as_deref())?
            }
            None => resolve_task(api, parent)?.id,
        };
        filter.parent_id = Some(parent_id);
    }

    if let Some(label) = query.label {
        filter.label = Some(resolve_label(api, label)?.name);
    }

    output.verbose_ctx("task", &format!("Filter: {:?}", filter));
    Ok(filter)
}

fn list_tasks(
    api: &impl Api,
    output: &Output,
    query: &TaskQuery<'_>,
    list: &ListArgs,
    today: NaiveDate,
) -> Result<()> {
    let filter = build_filter(api, query, output)?;
    let page = list.fetch(Limits::TASKS, |cursor, limit| api.get_tasks(&filter, cursor, limit))?;

    let results: Vec<Task> = page
        .results
        .into_iter()
        .filter(|t| query.priority.map_or(true, |p| t.priority == p))
        .filter(|t| query.due.map_or(true, |due| due.matches(t, today)))
        .collect();
    let page = Page::new(results, page.next_cursor);

    if output.is_json() {
        output.page(EntityKind::Task, &page);
        return Ok(());
    }

    if page.results.is_empty() {
        println!("No tasks found.");
    } else {
        let projects = project_names(api)?;
        for task in &page.results {
            let project = projects.get(&task.project_id).map(String::as_str);
            println!("{}", task_row(output, task, project));
        }
    }
    output.cursor_footer(page.next_cursor.as_deref());

    Ok(())
}

/// Project id to name, for task rows
pub(super) fn project_names(api: &impl Api) -> Result<HashMap<String, String>> {
    Ok(list_projects(api)?
        .into_iter()
        .map(|p| (p.id, p.name))
        .collect())
}

/// One line of a task listing
pub(super) fn task_row(output: &Output, task: &Task, project: Option<&str>) -> String {
    let mut row = format!(
        "{}  {}  {}",
        output.dim(&task.id),
        output.dim(&task.priority.label()),
        task.content
    );
    if let Some(due) = &task.due {
        row.push_str("  ");
        row.push_str(&output.yellow(due.display()));
    }
    if let Some(project) = project {
        row.push_str("  ");
        row.push_str(&output.dim(&format!("#{}", project)));
    }
    row
}

fn view_task(api: &impl Api, output: &Output, reference: &str) -> Result<()> {
    let task = resolve_task(api, reference)?;

    if output.is_json() {
        output.entity(EntityKind::Task, &task);
        return Ok(());
    }

    let project = api.get_project(&task.project_id).ok();

    println!("{}", output.bold(&task.content));
    println!();
    println!("ID:       {}", task.id);
    println!(
        "Project:  {}",
        project.as_ref().map_or(task.project_id.as_str(), |p| p.name.as_str())
    );
    println!("Priority: {}", task.priority);
    if let Some(due) = &task.due {
        let recurring = if due.is_recurring { " (recurring)" } else { "" };
        println!("Due:      {}{}", due.display(), recurring);
    }
    if !task.labels.is_empty() {
        let labels: Vec<String> = task.labels.iter().map(|l| format!("@{}", l)).collect();
        println!("Labels:   {}", labels.join(" "));
    }
    if let Some(parent) = &task.parent_id {
        println!("Parent:   id:{}", parent);
    }
    if let Some(url) = &task.url {
        println!("URL:      {}", url);
    }
    if !task.description.is_empty() {
        println!();
        println!("{}", task.description);
    }

    Ok(())
}

fn complete_task(api: &impl Api, output: &Output, reference: &str) -> Result<()> {
    let task = resolve_task(api, reference)?;

    if task.checked {
        output.success("Task already completed.");
        return Ok(());
    }

    api.close_task(&task.id)?;
    output.success(&format!("Completed: {}", task.content));
    Ok(())
}

fn reopen_task(api: &impl Api, output: &Output, id: &str) -> Result<()> {
    api.reopen_task(id)?;
    output.success(&format!("Reopened: id:{}", id));
    Ok(())
}

fn delete_task(api: &impl Api, output: &Output, reference: &str) -> Result<()> {
    let task = resolve_task(api, reference)?;
    api.delete_task(&task.id)?;
    output.success(&format!("Deleted: {}", task.content));
    Ok(())
}

fn add_task(
    api: &impl Api,
    output: &Output,
    args: &AddArgs,
    priority: Option<Priority>,
) -> Result<()> {
    let project_id = args
        .project
        .as_deref()
        .map(|p| resolve_project_id(api, p))
        .transpose()?;

    let section_id = match (args.section.as_deref(), project_id.as_deref()) {
        (Some(section), Some(project_id)) => Some(resolve_section_id(api, section, project_id)?),
        (Some(section), None) => Some(require_id_ref(section, EntityKind::Section)?.to_string()),
        (None, _) => None,
    };

    let parent_id = match (args.parent.as_deref(), project_id.as_deref()) {
        (Some(parent), Some(project_id)) => {
            Some(resolve_parent_task_id(api, parent, project_id, section_id.as_deref())?)
        }
        (Some(parent), None) => Some(resolve_task(api, parent)?.id),
        (None, _) => None,
    };

    let new_task = NewTask {
        content: args.content.clone(),
        description: args.description.clone(),
        project_id,
        section_id,
        parent_id,
        labels: clean_labels(&args.labels),
        priority: priority.map(|p| p.value()),
        due_string: args.due.clone(),
    };

    let task = api.add_task(&new_task)?;

    if output.is_json() {
        output.entity(EntityKind::Task, &task);
        return Ok(());
    }

    println!("Created: {}", task.content);
    if let Some(due) = &task.due {
        println!("Due: {}", due.display());
    }
    println!("{}", output.dim(&format!("ID: {}", task.id)));
    Ok(())
}

/// Trims label names and drops the `@` sigil
fn clean_labels(labels: &[String]) -> Vec<String> {
    labels
        .iter()
        .map(|l| l.trim())
        .map(|l| l.strip_prefix('@').unwrap_or(l))
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

fn build_update(args: &UpdateArgs) -> Result<TaskUpdate> {
    let update = TaskUpdate {
        content: args.content.clone(),
        description: args.description.clone(),
        labels: args.labels.as_deref().map(clean_labels),
        priority: parse_priority(args.priority.as_deref())?.map(|p| p.value()),
        due_string: args.due.clone(),
    };

    if update.is_empty() {
        return Err(CommandError::new("NO_CHANGES", "Nothing to update.")
            .with_hint("Pass --content, --due, --priority, --labels or --description")
            .into());
    }
    Ok(update)
}

fn update_task(
    api: &impl Api,
    output: &Output,
    reference: &str,
    update: &TaskUpdate,
) -> Result<()> {
    let task = resolve_task(api, reference)?;
    let updated = api.update_task(&task.id, update)?;

    if output.is_json() {
        output.entity(EntityKind::Task, &updated);
    } else {
        output.success(&format!("Updated: {}", updated.content));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockApi;
    use crate::cli::error::format_error;
    use crate::cli::OutputFormat;
    use crate::domain::{Due, Label, Project, Section};

    fn text() -> Output {
        Output::new(OutputFormat::Text, false).with_color(false)
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn due_on(mut task: Task, date: &str) -> Task {
        task.due = Some(Due {
            date: date.to_string(),
            string: None,
            is_recurring: false,
        });
        task
    }

    fn work_api() -> MockApi {
        let mut setup = Task::new("task-1", "Setup database", "proj-1");
        setup.section_id = Some("sec-1".to_string());
        let mut urgent = Task::new("task-2", "Fix login", "proj-1");
        urgent.priority = "p1".parse().unwrap();
        urgent.labels = vec!["urgent".to_string()];

        MockApi::new()
            .with_projects(vec![Project::new("proj-1", "Work"), Project::new("proj-2", "Home")])
            .with_sections(vec![Section::new("sec-1", "Planning", "proj-1")])
            .with_labels(vec![Label::new("label-1", "urgent")])
            .with_tasks(vec![
                setup,
                urgent,
                due_on(Task::new("task-3", "Pay rent", "proj-2"), "2026-01-01"),
            ])
    }

    #[test]
    fn due_filter_parsing() {
        assert_eq!(DueFilter::parse("today").unwrap(), DueFilter::Today);
        assert_eq!(DueFilter::parse("Overdue").unwrap(), DueFilter::Overdue);
        assert_eq!(DueFilter::parse("2026-03-01").unwrap(), DueFilter::On(day("2026-03-01")));
        assert_eq!(DueFilter::parse("someday").unwrap_err().code, "INVALID_DATE");
    }

    #[test]
    fn due_filter_matches() {
        let task = due_on(Task::new("t", "x", "p"), "2026-01-01T09:00:00");
        assert!(DueFilter::Overdue.matches(&task, day("2026-01-02")));
        assert!(DueFilter::Today.matches(&task, day("2026-01-01")));
        assert!(!DueFilter::Today.matches(&Task::new("t", "x", "p"), day("2026-01-01")));
    }

    #[test]
    fn invalid_priority_rejected_before_any_call() {
        let filters = TaskFilters {
            priority: Some("p7".to_string()),
            ..TaskFilters::default()
        };
        let err = filters.validate().unwrap_err();
        assert!(format_error(&err).starts_with("Error: INVALID_PRIORITY"));
    }

    #[test]
    fn section_name_without_project_is_invalid() {
        let filters = TaskFilters {
            section: Some("Planning".to_string()),
            ..TaskFilters::default()
        };
        let err = filters.validate().unwrap_err();
        assert!(format_error(&err).starts_with("Error: INVALID_REF"));
    }

    #[test]
    fn filter_resolves_project_and_section() {
        let api = work_api();
        let query = TaskQuery {
            project: Some("work"),
            section: Some("plan"),
            ..TaskQuery::default()
        };

        let filter = build_filter(&api, &query, &text()).unwrap();
        assert_eq!(filter.project_id.as_deref(), Some("proj-1"));
        assert_eq!(filter.section_id.as_deref(), Some("sec-1"));
        assert_eq!(api.calls(), vec!["get_projects", "get_sections proj-1"]);
    }

    #[test]
    fn filter_resolves_label_to_name() {
        let api = work_api();
        let query = TaskQuery {
            label: Some("@urg"),
            ..TaskQuery::default()
        };
        let filter = build_filter(&api, &query, &text()).unwrap();
        assert_eq!(filter.label.as_deref(), Some("urgent"));
    }

    #[test]
    fn list_requests_label_scope() {
        let api = work_api();
        let query = TaskQuery {
            label: Some("urgent"),
            ..TaskQuery::default()
        };

        list_tasks(&api, &text(), &query, &ListArgs::default(), day("2026-01-05")).unwrap();
        assert_eq!(api.count("get_tasks label:urgent"), 1);
    }

    #[test]
    fn list_honours_limit_across_pages() {
        let api = work_api().with_max_page(1);
        let list = ListArgs {
            limit: Some(2),
            ..ListArgs::default()
        };

        let json = Output::new(OutputFormat::Json, false);
        list_tasks(&api, &json, &TaskQuery::default(), &list, day("2026-01-05")).unwrap();
        assert_eq!(api.count("get_tasks"), 2);
    }

    #[test]
    fn complete_by_name() {
        let api = work_api();
        complete_task(&api, &text(), "login").unwrap();
        assert!(api.calls().contains(&"close_task task-2".to_string()));
    }

    #[test]
    fn complete_skips_checked_task() {
        let mut done = Task::new("task-9", "Done already", "proj-1");
        done.checked = true;
        let api = MockApi::new().with_tasks(vec![done]);

        complete_task(&api, &text(), "id:task-9").unwrap();
        assert_eq!(api.count("close_task"), 0);
    }

    #[test]
    fn delete_ambiguous_name_deletes_nothing() {
        let api = MockApi::new().with_tasks(vec![
            Task::new("task-1", "Buy milk", "proj-1"),
            Task::new("task-2", "Buy eggs", "proj-1"),
        ]);

        let err = delete_task(&api, &text(), "Buy").unwrap_err();
        assert!(format_error(&err).starts_with("Error: AMBIGUOUS_TASK"));
        assert_eq!(api.count("delete_task"), 0);
    }

    #[test]
    fn add_resolves_section_and_parent_in_project() {
        let api = work_api();
        let args = AddArgs {
            content: "Create schema".to_string(),
            project: Some("Work".to_string()),
            section: Some("Planning".to_string()),
            parent: Some("database".to_string()),
            labels: vec![" @urgent".to_string(), "".to_string()],
            ..AddArgs::default()
        };

        add_task(&api, &text(), &args, None).unwrap();
        assert_eq!(
            api.calls(),
            vec![
                "get_projects",
                "get_sections proj-1",
                "get_tasks section:sec-1",
                "add_task Create schema",
            ]
        );
    }

    #[test]
    fn add_with_explicit_ids_skips_lookups() {
        let api = work_api();
        let args = AddArgs {
            content: "Quick".to_string(),
            project: Some("id:proj-1".to_string()),
            parent: Some("id:task-1".to_string()),
            ..AddArgs::default()
        };

        add_task(&api, &text(), &args, Some(Priority::LOWEST)).unwrap();
        assert_eq!(api.calls(), vec!["get_project proj-1", "add_task Quick"]);
    }

    #[test]
    fn labels_are_cleaned() {
        let labels = vec!["@home ".to_string(), "".to_string(), "work".to_string()];
        assert_eq!(clean_labels(&labels), vec!["home", "work"]);
    }

    #[test]
    fn empty_update_is_rejected() {
        let args = UpdateArgs {
            reference: "id:task-1".to_string(),
            ..UpdateArgs::default()
        };
        let err = build_update(&args).unwrap_err();
        assert!(format_error(&err).starts_with("Error: NO_CHANGES"));
    }

    #[test]
    fn update_sends_priority_value() {
        let args = UpdateArgs {
            reference: "id:task-1".to_string(),
            priority: Some("p2".to_string()),
            ..UpdateArgs::default()
        };
        assert_eq!(build_update(&args).unwrap().priority, Some(3));
    }

    #[test]
    fn task_row_plain_text() {
        let task = due_on(Task::new("task-1", "Pay rent", "proj-1"), "2026-01-01");
        assert_eq!(
            task_row(&text(), &task, Some("Home")),
            "task-1  p4  Pay rent  2026-01-01  #Home"
        );
    }
}
