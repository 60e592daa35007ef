//! Comment CLI commands

use anyhow::Result;
use clap::Subcommand;

use super::context::Context;
use super::error::CommandError;
use super::output::Output;
use super::ListArgs;
use crate::api::Api;
use crate::domain::{require_id_ref, EntityKind, Limits};
use crate::resolve::resolve_task;

#[derive(Subcommand)]
pub enum CommentCommands {
    /// List comments on a task
    List {
        /// Task name or id:xxx
        task: String,

        #[command(flatten)]
        list: ListArgs,
    },

    /// Add a comment to a task
    Add {
        /// Task name or id:xxx
        task: String,

        /// Comment text
        #[arg(long)]
        content: String,
    },

    /// Delete a comment
    Delete {
        /// Comment id:xxx
        id: String,

        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(cmd: CommentCommands, ctx: &Context) -> Result<()> {
    let output = &ctx.output;

    match cmd {
        CommentCommands::List { task, list } => list_comments(ctx.api()?, output, &task, &list),
        CommentCommands::Add { task, content } => add_comment(ctx.api()?, output, &task, &content),
        CommentCommands::Delete { id, yes } => {
            let id = require_id_ref(&id, EntityKind::Comment)?;
            if !yes {
                return Err(CommandError::confirmation_required("deletion").into());
            }
            delete_comment(ctx.api()?, output, id)
        }
    }
}

fn list_comments(api: &impl Api, output: &Output, task: &str, list: &ListArgs) -> Result<()> {
    let task = resolve_task(api, task)?;
    let page = list.fetch(Limits::COMMENTS, |cursor, limit| {
        api.get_comments(&task.id, cursor, limit)
    })?;

    if output.is_json() {
        output.page(EntityKind::Comment, &page);
        return Ok(());
    }

    if page.results.is_empty() {
        println!("No comments.");
        return Ok(());
    }

    for comment in &page.results {
        let posted = comment.posted_at.get(..10).unwrap_or(&comment.posted_at);
        println!("{}  {}", output.dim(&format!("{}  {}", comment.id, posted)), comment.content);
    }
    output.cursor_footer(page.next_cursor.as_deref());

    Ok(())
}

fn add_comment(api: &impl Api, output: &Output, task: &str, content: &str) -> Result<()> {
    let task = resolve_task(api, task)?;
    let comment = api.add_comment(&task.id, content)?;

    if output.is_json() {
        output.entity(EntityKind::Comment, &comment);
        return Ok(());
    }

    println!("Added comment to \"{}\"", task.content);
    println!("{}", output.dim(&format!("ID: {}", comment.id)));
    Ok(())
}

fn delete_comment(api: &impl Api, output: &Output, id: &str) -> Result<()> {
    api.delete_comment(id)?;
    output.success(&format!("Deleted comment {}", id));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockApi;
    use crate::cli::OutputFormat;
    use crate::domain::{Comment, Task};

    fn text() -> Output {
        Output::new(OutputFormat::Text, false)
    }

    fn comment(id: &str, content: &str) -> Comment {
        Comment {
            id: id.to_string(),
            content: content.to_string(),
            task_id: Some("task-1".to_string()),
            project_id: None,
            posted_at: "2026-01-08T10:00:00Z".to_string(),
        }
    }

    fn api() -> MockApi {
        MockApi::new()
            .with_tasks(vec![Task::new("task-1", "Buy milk", "proj-1")])
            .with_comments(vec![
                comment("comment-1", "Remember organic"),
                comment("comment-2", "Got it"),
            ])
    }

    #[test]
    fn list_by_task_name() {
        let api = api();
        list_comments(&api, &text(), "milk", &ListArgs::default()).unwrap();
        assert_eq!(api.calls(), vec!["get_tasks all", "get_comments task-1"]);
    }

    #[test]
    fn list_default_limit_is_small() {
        let api = MockApi::new()
            .with_tasks(vec![Task::new("task-1", "Buy milk", "proj-1")])
            .with_comments((0..25).map(|i| comment(&format!("c-{}", i), "note")).collect())
            .with_max_page(5);

        let json = Output::new(OutputFormat::Json, false);
        list_comments(&api, &json, "id:task-1", &ListArgs::default()).unwrap();
        assert_eq!(api.count("get_comments"), 2);
    }

    #[test]
    fn add_to_task_by_id() {
        let api = api();
        add_comment(&api, &text(), "id:task-1", "Note").unwrap();
        assert_eq!(api.calls(), vec!["get_task task-1", "add_comment task-1"]);
    }

    #[test]
    fn delete_by_id() {
        let api = api();
        delete_comment(&api, &text(), "comment-1").unwrap();
        assert_eq!(api.calls(), vec!["delete_comment comment-1"]);
    }
}
