//! Domain models for td
//!
//! Contains the entity snapshots returned by the service and the pure
//! reference-resolution and pagination logic. Nothing in here performs I/O.

mod candidate;
mod task;
mod entity;
mod refs;
mod matcher;
mod pagination;

pub use candidate::{Candidate, EntityKind};
pub use task::{Due, Priority, PriorityError, Task};
pub use entity::{Comment, Label, Project, Section, User};
pub use refs::{extract_id, is_id_ref, require_id_ref, RefError, Reference, ID_PREFIX};
pub use matcher::{fuzzy_match, Match, MAX_HINTS};
pub use pagination::{paginate, Limits, Page, PaginateOptions, DEFAULT_PER_PAGE};
