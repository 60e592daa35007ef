//! Main CLI application structure

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use super::context::Context;
use super::output::{Output, OutputFormat};
use super::{comment, label, project, section, task, today};
use crate::api::Api;
use crate::config::Config;

#[derive(Parser)]
#[command(name = "td")]
#[command(author, version, about = "Todoist from the command line")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the configured format)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Shorthand for --format json
    #[arg(long, global = true, conflicts_with_all = ["format", "ndjson"])]
    pub json: bool,

    /// Shorthand for --format ndjson
    #[arg(long, global = true, conflicts_with = "format")]
    pub ndjson: bool,

    /// Include every field in JSON output
    #[arg(long, global = true)]
    pub full: bool,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Never show progress spinners
    #[arg(long, global = true)]
    pub no_spinner: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Effective output format: explicit flags win over the config default
    pub fn output_format(&self, configured: OutputFormat) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else if self.ndjson {
            OutputFormat::Ndjson
        } else {
            self.format.unwrap_or(configured)
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage tasks
    #[command(subcommand)]
    Task(task::TaskCommands),

    /// Manage projects
    #[command(subcommand)]
    Project(project::ProjectCommands),

    /// Manage project sections
    #[command(subcommand)]
    Section(section::SectionCommands),

    /// Manage labels
    #[command(subcommand)]
    Label(label::LabelCommands),

    /// Manage task comments
    #[command(subcommand)]
    Comment(comment::CommentCommands),

    /// Show tasks due today and overdue
    Today,

    /// Show the authenticated user
    Whoami,
}

/// Installs the tracing subscriber. `TD_LOG` takes an `EnvFilter`
/// directive; otherwise `--verbose` enables debug events for this crate.
fn init_logging(verbose: bool) {
    let default = if verbose { "td_cli=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("TD_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load()?;
    let format = cli.output_format(config.default_format);
    let output = Output::new(format, cli.verbose).with_full(cli.full);

    output.verbose("td starting");
    let ctx = Context::new(config, output, cli.no_spinner);

    match cli.command {
        Commands::Task(cmd) => task::run(cmd, &ctx)?,
        Commands::Project(cmd) => project::run(cmd, &ctx)?,
        Commands::Section(cmd) => section::run(cmd, &ctx)?,
        Commands::Label(cmd) => label::run(cmd, &ctx)?,
        Commands::Comment(cmd) => comment::run(cmd, &ctx)?,
        Commands::Today => today::run(ctx.api()?, &ctx.output)?,
        Commands::Whoami => whoami(ctx.api()?, &ctx.output)?,
    }

    ctx.output.verbose("Command completed successfully");
    Ok(())
}

fn whoami(api: &impl Api, output: &Output) -> Result<()> {
    let user = api.get_user()?;

    if output.is_json() {
        output.data(&user);
    } else {
        println!("{}", output.bold(&user.full_name));
        println!("Email: {}", user.email);
        println!("ID:    {}", user.id);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn json_flag_overrides_config() {
        let cli = Cli::try_parse_from(["td", "--json", "today"]).unwrap();
        assert_eq!(cli.output_format(OutputFormat::Ndjson), OutputFormat::Json);
    }

    #[test]
    fn config_format_used_without_flags() {
        let cli = Cli::try_parse_from(["td", "today"]).unwrap();
        assert_eq!(cli.output_format(OutputFormat::Ndjson), OutputFormat::Ndjson);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["td", "project", "list", "--ndjson", "-v"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.output_format(OutputFormat::Text), OutputFormat::Ndjson);
    }
}
