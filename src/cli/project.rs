//! Project CLI commands

use anyhow::Result;
use clap::Subcommand;

use super::context::Context;
use super::output::Output;
use super::ListArgs;
use crate::api::{Api, TaskFilter};
use crate::domain::{EntityKind, Limits};
use crate::resolve::{list_tasks, resolve_project};

#[derive(Subcommand)]
pub enum ProjectCommands {
    /// List projects
    List {
        #[command(flatten)]
        list: ListArgs,
    },

    /// Show project details and its active tasks
    View {
        /// Project name or id:xxx
        reference: String,
    },
}

pub fn run(cmd: ProjectCommands, ctx: &Context) -> Result<()> {
    match cmd {
        ProjectCommands::List { list } => list_projects(ctx.api()?, &ctx.output, &list),
        ProjectCommands::View { reference } => view_project(ctx.api()?, &ctx.output, &reference),
    }
}

fn list_projects(api: &impl Api, output: &Output, list: &ListArgs) -> Result<()> {
    let page = list.fetch(Limits::PROJECTS, |cursor, limit| api.get_projects(cursor, limit))?;

    if output.is_json() {
        output.page(EntityKind::Project, &page);
        return Ok(());
    }

    for project in &page.results {
        let name = if project.is_favorite {
            output.yellow(&project.name)
        } else {
            project.name.clone()
        };
        let shared = if project.is_workspace() {
            output.dim("  (workspace)")
        } else {
            String::new()
        };
        println!("{}  {}{}", output.dim(&project.id), name, shared);
    }
    output.cursor_footer(page.next_cursor.as_deref());

    Ok(())
}

fn view_project(api: &impl Api, output: &Output, reference: &str) -> Result<()> {
    let project = resolve_project(api, reference)?;

    if output.is_json() {
        output.entity(EntityKind::Project, &project);
        return Ok(());
    }

    println!("{}", output.bold(&project.name));
    println!();
    println!("ID:       {}", project.id);
    println!("Color:    {}", project.color);
    println!("Favorite: {}", if project.is_favorite { "Yes" } else { "No" });
    if let Some(url) = &project.url {
        println!("URL:      {}", url);
    }

    let tasks = list_tasks(api, &TaskFilter::project(project.id.as_str()))?;
    if !tasks.is_empty() {
        println!();
        println!("{}", output.dim(&format!("--- Tasks ({}) ---", tasks.len())));
        for task in &tasks {
            println!("  {}  {}", output.dim(&task.priority.label()), task.content);
        }
    }

    Ok(())
}
