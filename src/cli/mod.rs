//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Task | Work item management | `task list`, `task add`, `task complete` |
//! | Project | Browse projects | `project list`, `project view` |
//! | Section | Organise a project | `section list`, `section create` |
//! | Label | Manage labels | `label list`, `label delete` |
//! | Comment | Task discussion | `comment list`, `comment add` |
//! | Shortcuts | Daily use | `today`, `whoami` |
//!
//! ## References
//!
//! Commands accept entities either as `id:<id>` or by name. Destructive
//! commands on sections and comments require the `id:` form.
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - `{"results": [...], "nextCursor": ...}` for lists
//! - `ndjson` - One object per line, then a `_meta` line if more exist
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output:
//! ```bash
//! td --verbose task list --project Work
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod error;
mod context;
mod task;
mod project;
mod section;
mod label;
mod comment;
mod today;

pub use app::{Cli, Commands, run};
pub use error::{format_error, CommandError};
pub use output::{Output, OutputFormat};

use crate::domain::{paginate, Page, PaginateOptions};
use crate::api::ApiError;

/// Paging flags shared by list commands
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Maximum number of items to show
    #[arg(long)]
    pub limit: Option<usize>,

    /// Fetch every item, ignoring --limit
    #[arg(long, conflicts_with = "limit")]
    pub all: bool,

    /// Continue from a cursor printed by an earlier listing
    #[arg(long)]
    pub cursor: Option<String>,
}

impl ListArgs {
    /// Builds pagination options around a command's default limit
    pub fn options(&self, default_limit: usize) -> PaginateOptions {
        let limit = if self.all {
            crate::domain::Limits::ALL
        } else {
            self.limit.unwrap_or(default_limit)
        };
        PaginateOptions::new(limit).start_cursor(self.cursor.clone())
    }

    /// Runs a list endpoint through the paginator
    pub fn fetch<T, F>(&self, default_limit: usize, fetch_page: F) -> Result<Page<T>, ApiError>
    where
        F: FnMut(Option<&str>, usize) -> Result<Page<T>, ApiError>,
    {
        paginate(fetch_page, &self.options(default_limit))
    }
}
