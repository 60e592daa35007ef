//! Label CLI commands

use anyhow::Result;
use clap::Subcommand;

use super::context::Context;
use super::error::CommandError;
use super::output::Output;
use super::ListArgs;
use crate::api::{Api, NewLabel};
use crate::domain::{EntityKind, Limits};
use crate::resolve::resolve_label;

#[derive(Subcommand)]
pub enum LabelCommands {
    /// List labels
    List {
        #[command(flatten)]
        list: ListArgs,
    },

    /// Create a label
    Create {
        /// Label name (without @)
        #[arg(long)]
        name: String,

        /// Label color
        #[arg(long)]
        color: Option<String>,

        /// Mark as favorite
        #[arg(long)]
        favorite: bool,
    },

    /// Delete a label
    Delete {
        /// Label name, @name or id:xxx
        reference: String,

        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(cmd: LabelCommands, ctx: &Context) -> Result<()> {
    let output = &ctx.output;

    match cmd {
        LabelCommands::List { list } => list_labels(ctx.api()?, output, &list),
        LabelCommands::Create { name, color, favorite } => {
            let label = NewLabel {
                name: name.trim_start_matches('@').to_string(),
                color,
                is_favorite: favorite,
            };
            create_label(ctx.api()?, output, &label)
        }
        LabelCommands::Delete { reference, yes } => {
            if !yes {
                return Err(CommandError::confirmation_required("deletion").into());
            }
            delete_label(ctx.api()?, output, &reference)
        }
    }
}

fn list_labels(api: &impl Api, output: &Output, list: &ListArgs) -> Result<()> {
    let page = list.fetch(Limits::LABELS, |cursor, limit| api.get_labels(cursor, limit))?;

    if output.is_json() {
        output.page(EntityKind::Label, &page);
        return Ok(());
    }

    if page.results.is_empty() {
        println!("No labels found.");
        return Ok(());
    }

    for label in &page.results {
        let name = format!("@{}", label.name);
        let name = if label.is_favorite { output.yellow(&name) } else { name };
        println!("{}  {}", output.dim(&label.id), name);
    }
    output.cursor_footer(page.next_cursor.as_deref());

    Ok(())
}

fn create_label(api: &impl Api, output: &Output, label: &NewLabel) -> Result<()> {
    let created = api.add_label(label)?;

    if output.is_json() {
        output.entity(EntityKind::Label, &created);
        return Ok(());
    }

    println!("Created: @{}", created.name);
    println!("{}", output.dim(&format!("ID: {}", created.id)));
    Ok(())
}

fn delete_label(api: &impl Api, output: &Output, reference: &str) -> Result<()> {
    let label = resolve_label(api, reference)?;
    api.delete_label(&label.id)?;
    output.success(&format!("Deleted: @{}", label.name));
    Ok(())
}
