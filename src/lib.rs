//! td - Todoist from the command line
//!
//! Entities are addressed either by explicit `id:<id>` references or by
//! name, resolved with case-insensitive fuzzy matching inside the right
//! scope (a section within its project, a parent task within its section
//! or project). List endpoints are read through a cursor paginator that
//! respects a result limit.

pub mod domain;
pub mod api;
pub mod resolve;
pub mod config;
pub mod cli;

pub use domain::{EntityKind, Page, PaginateOptions, RefError, Task};
pub use resolve::ResolveError;
