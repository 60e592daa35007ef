//! Section CLI commands
//!
//! Sections are addressed by `id:` for destructive operations; only
//! `section list` and `section create` resolve project names.

use anyhow::Result;
use clap::Subcommand;

use super::context::Context;
use super::error::CommandError;
use super::output::Output;
use super::ListArgs;
use crate::api::{Api, TaskFilter};
use crate::domain::{require_id_ref, EntityKind, Limits};
use crate::resolve::{list_tasks, resolve_project_id};

#[derive(Subcommand)]
pub enum SectionCommands {
    /// List sections in a project
    List {
        /// Project name or id:xxx
        project: String,

        #[command(flatten)]
        list: ListArgs,
    },

    /// Create a section
    Create {
        /// Section name
        #[arg(long)]
        name: String,

        /// Project name or id:xxx
        #[arg(long)]
        project: String,
    },

    /// Delete an empty section
    Delete {
        /// Section id:xxx
        id: String,

        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },

    /// Rename a section
    Update {
        /// Section id:xxx
        id: String,

        /// New section name
        #[arg(long)]
        name: String,
    },
}

pub fn run(cmd: SectionCommands, ctx: &Context) -> Result<()> {
    let output = &ctx.output;

    match cmd {
        SectionCommands::List { project, list } => {
            list_sections(ctx.api()?, output, &project, &list)
        }
        SectionCommands::Create { name, project } => {
            create_section(ctx.api()?, output, &name, &project)
        }
        SectionCommands::Delete { id, yes } => {
            let id = require_id_ref(&id, EntityKind::Section)?;
            delete_section(ctx.api()?, output, id, yes)
        }
        SectionCommands::Update { id, name } => {
            let id = require_id_ref(&id, EntityKind::Section)?;
            update_section(ctx.api()?, output, id, &name)
        }
    }
}

fn list_sections(api: &impl Api, output: &Output, project: &str, list: &ListArgs) -> Result<()> {
    let project_id = resolve_project_id(api, project)?;
    let page = list.fetch(Limits::SECTIONS, |cursor, limit| {
        api.get_sections(&project_id, cursor, limit)
    })?;

    if output.is_json() {
        output.page(EntityKind::Section, &page);
        return Ok(());
    }

    if page.results.is_empty() {
        println!("No sections.");
        return Ok(());
    }

    for section in &page.results {
        println!("{}  {}", output.dim(&section.id), section.name);
    }
    output.cursor_footer(page.next_cursor.as_deref());

    Ok(())
}

fn create_section(api: &impl Api, output: &Output, name: &str, project: &str) -> Result<()> {
    let project_id = resolve_project_id(api, project)?;
    let section = api.add_section(name, &project_id)?;

    if output.is_json() {
        output.entity(EntityKind::Section, &section);
        return Ok(());
    }

    println!("Created: {}", section.name);
    println!("{}", output.dim(&format!("ID: {}", section.id)));
    Ok(())
}

/// Deletes a section once it holds no active tasks. Without `yes` the
/// section is only described.
fn delete_section(api: &impl Api, output: &Output, id: &str, yes: bool) -> Result<()> {
    let section = api.get_section(id)?;

    let remaining = list_tasks(api, &TaskFilter::section(id))?.len();
    if remaining > 0 {
        let plural = if remaining == 1 { "" } else { "s" };
        return Err(CommandError::new(
            "HAS_TASKS",
            format!("Cannot delete section: {} uncompleted task{} remain.", remaining, plural),
        )
        .into());
    }

    if !yes {
        println!("Would delete section: {}", section.name);
        println!("Use --yes to confirm.");
        return Ok(());
    }

    api.delete_section(id)?;
    output.success(&format!("Deleted section: {}", section.name));
    Ok(())
}

fn update_section(api: &impl Api, output: &Output, id: &str, name: &str) -> Result<()> {
    let section = api.get_section(id)?;
    let updated = api.update_section(id, name)?;

    if output.is_json() {
        output.entity(EntityKind::Section, &updated);
    } else {
        output.success(&format!("Updated: {} → {}", section.name, updated.name));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockApi;
    use crate::cli::error::format_error;
    use crate::cli::OutputFormat;
    use crate::domain::{Project, Section, Task};

    fn text() -> Output {
        Output::new(OutputFormat::Text, false)
    }

    fn api() -> MockApi {
        let mut task = Task::new("task-1", "Draft", "proj-1");
        task.section_id = Some("sec-2".to_string());

        MockApi::new()
            .with_projects(vec![Project::new("proj-1", "Work")])
            .with_sections(vec![
                Section::new("sec-1", "Backlog", "proj-1"),
                Section::new("sec-2", "Doing", "proj-1"),
            ])
            .with_tasks(vec![task])
    }

    #[test]
    fn list_resolves_project_name() {
        let api = api();
        list_sections(&api, &text(), "Work", &ListArgs::default()).unwrap();
        assert_eq!(api.calls(), vec!["get_projects", "get_sections proj-1"]);
    }

    #[test]
    fn create_in_project() {
        let api = api();
        create_section(&api, &text(), "Review", "id:proj-1").unwrap();
        assert_eq!(api.calls(), vec!["get_project proj-1", "add_section Review"]);
    }

    #[test]
    fn delete_refuses_non_empty_section() {
        let api = api();
        let err = delete_section(&api, &text(), "sec-2", true).unwrap_err();

        assert_eq!(
            format_error(&err),
            "Error: HAS_TASKS: Cannot delete section: 1 uncompleted task remain."
        );
        assert_eq!(api.count("delete_section"), 0);
    }

    #[test]
    fn delete_without_yes_only_previews() {
        let api = api();
        delete_section(&api, &text(), "sec-1", false).unwrap();
        assert_eq!(api.count("delete_section"), 0);
    }

    #[test]
    fn delete_empty_section() {
        let api = api();
        delete_section(&api, &text(), "sec-1", true).unwrap();
        assert_eq!(api.count("delete_section sec-1"), 1);
    }

    #[test]
    fn delete_unknown_section_is_api_error() {
        let api = api();
        let err = delete_section(&api, &text(), "sec-404", true).unwrap_err();
        assert!(err.downcast_ref::<crate::api::ApiError>().is_some_and(|e| e.is_not_found()));
    }

    #[test]
    fn update_renames() {
        let api = api();
        update_section(&api, &text(), "sec-1", "Icebox").unwrap();
        assert_eq!(api.calls(), vec!["get_section sec-1", "update_section sec-1"]);
    }
}
