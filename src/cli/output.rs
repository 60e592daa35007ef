//! Output formatting for CLI commands

use std::io::IsTerminal;

use crossterm::style::Stylize;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::domain::{EntityKind, Page};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    /// One JSON object per line
    Ndjson,
}

/// Fields kept in JSON output unless `--full` is given
fn essential_fields(kind: EntityKind) -> &'static [&'static str] {
    match kind {
        EntityKind::Task | EntityKind::ParentTask => &[
            "id",
            "content",
            "description",
            "project_id",
            "section_id",
            "parent_id",
            "labels",
            "priority",
            "due",
            "checked",
        ],
        EntityKind::Project => &["id", "name", "color", "is_favorite", "parent_id"],
        EntityKind::Section => &["id", "name", "project_id"],
        EntityKind::Label => &["id", "name", "color", "is_favorite"],
        EntityKind::Comment => &["id", "content", "posted_at"],
    }
}

/// Output helper for consistent formatting
pub struct Output {
    format: OutputFormat,
    verbose: bool,
    full: bool,
    color: bool,
}

impl Output {
    pub fn new(format: OutputFormat, verbose: bool) -> Self {
        let color = std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();
        Self {
            format,
            verbose,
            full: false,
            color,
        }
    }

    /// Keep every field in JSON output
    pub fn with_full(mut self, full: bool) -> Self {
        self.full = full;
        self
    }

    /// Forces colored text on or off
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Prints a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Text => println!("{}", message),
            OutputFormat::Json | OutputFormat::Ndjson => {
                println!("{}", json!({ "success": true, "message": message }));
            }
        }
    }

    /// Prints structured data
    pub fn data<T: Serialize>(&self, data: &T) {
        let value = match serde_json::to_value(data) {
            Ok(value) => value,
            Err(_) => return,
        };

        match (self.format, value) {
            (OutputFormat::Ndjson, Value::Array(items)) => {
                for item in items {
                    println!("{}", item);
                }
            }
            (OutputFormat::Ndjson, value) => println!("{}", value),
            (_, value) => {
                if let Ok(json) = serde_json::to_string_pretty(&value) {
                    println!("{}", json);
                }
            }
        }
    }

    /// Prints a single entity, trimmed to its essential fields
    pub fn entity<T: Serialize>(&self, kind: EntityKind, item: &T) {
        if let Ok(value) = serde_json::to_value(item) {
            self.data(&self.trim(kind, value));
        }
    }

    /// Prints a page of entities in JSON or NDJSON form.
    ///
    /// JSON wraps results as `{"results": [...], "nextCursor": ...}`. NDJSON
    /// prints one entity per line followed by a `_meta` line when more items
    /// exist.
    pub fn page<T: Serialize>(&self, kind: EntityKind, page: &Page<T>) {
        let results: Vec<Value> = page
            .results
            .iter()
            .filter_map(|item| serde_json::to_value(item).ok())
            .map(|value| self.trim(kind, value))
            .collect();

        match self.format {
            OutputFormat::Ndjson => {
                for item in &results {
                    println!("{}", item);
                }
                if let Some(cursor) = &page.next_cursor {
                    println!("{}", json!({ "_meta": true, "nextCursor": cursor }));
                }
            }
            _ => {
                let body = json!({ "results": results, "nextCursor": page.next_cursor });
                if let Ok(json) = serde_json::to_string_pretty(&body) {
                    println!("{}", json);
                }
            }
        }
    }

    /// Prints the "more items" footer after a text listing
    pub fn cursor_footer(&self, next_cursor: Option<&str>) {
        if let (OutputFormat::Text, Some(cursor)) = (self.format, next_cursor) {
            println!();
            println!(
                "{}",
                self.dim(&format!("... more items exist. Use --cursor {} to continue.", cursor))
            );
        }
    }

    fn trim(&self, kind: EntityKind, value: Value) -> Value {
        if self.full {
            return value;
        }
        match value {
            Value::Object(map) => {
                let keep = essential_fields(kind);
                let trimmed: Map<String, Value> =
                    map.into_iter().filter(|(key, _)| keep.contains(&key.as_str())).collect();
                Value::Object(trimmed)
            }
            other => other,
        }
    }

    /// Returns true if using JSON or NDJSON format
    pub fn is_json(&self) -> bool {
        self.format != OutputFormat::Text
    }

    /// Prints a verbose debug message (only when --verbose is set)
    pub fn verbose(&self, message: &str) {
        if self.verbose {
            eprintln!("[verbose] {}", message);
        }
    }

    /// Prints a verbose debug message with context (only when --verbose is set)
    pub fn verbose_ctx(&self, context: &str, message: &str) {
        if self.verbose {
            eprintln!("[verbose:{}] {}", context, message);
        }
    }

    pub fn dim(&self, text: &str) -> String {
        if self.color {
            text.dim().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn bold(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn red(&self, text: &str) -> String {
        if self.color {
            text.red().bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn yellow(&self, text: &str) -> String {
        if self.color {
            text.yellow().to_string()
        } else {
            text.to_string()
        }
    }
}
