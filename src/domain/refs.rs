//! Entity references
//!
//! A reference is either explicit (`id:<identifier>`) or free text that is
//! looked up by name. Classification is a plain prefix check; it never
//! consults the service.

use thiserror::Error;

use super::candidate::EntityKind;

/// Prefix marking an explicit reference. Case-sensitive.
pub const ID_PREFIX: &str = "id:";

/// Failures while turning a reference into a single entity
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RefError {
    #[error("Invalid {} reference \"{}\".", .entity, .reference)]
    InvalidReference { entity: EntityKind, reference: String },

    #[error("{} \"{}\" not found{}.", .entity.title(), .query, scope_suffix(.scope))]
    NotFound {
        entity: EntityKind,
        query: String,
        scope: Option<EntityKind>,
    },

    #[error("Multiple {} match \"{}\":", .entity.plural(), .query)]
    Ambiguous {
        entity: EntityKind,
        query: String,
        candidates: Vec<String>,
    },

    #[error("{} id:{} does not belong to this {}.", .entity.title(), .id, .scope)]
    NotInScope {
        entity: EntityKind,
        id: String,
        scope: EntityKind,
    },
}

fn scope_suffix(scope: &Option<EntityKind>) -> String {
    (*scope).map(|s| format!(" in {}", s)).unwrap_or_default()
}

impl RefError {
    /// Machine-readable error code (`TASK_NOT_FOUND`, `AMBIGUOUS_PROJECT`, ...)
    pub fn code(&self) -> String {
        match self {
            RefError::InvalidReference { .. } => "INVALID_REF".to_string(),
            RefError::NotFound { entity, .. } => format!("{}_NOT_FOUND", entity.code()),
            RefError::Ambiguous { entity, .. } => format!("AMBIGUOUS_{}", entity.code()),
            RefError::NotInScope { entity, .. } => format!("{}_NOT_IN_SCOPE", entity.code()),
        }
    }

    /// Follow-up lines shown under the message
    pub fn hints(&self) -> Vec<String> {
        match self {
            RefError::InvalidReference { reference, .. } => {
                vec![format!("Use id:xxx format (e.g., id:{})", reference)]
            }
            RefError::Ambiguous { candidates, .. } => candidates.clone(),
            RefError::NotFound { .. } | RefError::NotInScope { .. } => Vec::new(),
        }
    }
}

/// A classified reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference<'a> {
    /// `id:<identifier>`, holding the identifier (possibly empty)
    Id(&'a str),
    /// Free text to match against display names
    Name(&'a str),
}

impl<'a> Reference<'a> {
    pub fn parse(reference: &'a str) -> Self {
        match reference.strip_prefix(ID_PREFIX) {
            Some(id) => Reference::Id(id),
            None => Reference::Name(reference),
        }
    }
}

/// Returns true if `reference` uses the explicit `id:` form
pub fn is_id_ref(reference: &str) -> bool {
    reference.starts_with(ID_PREFIX)
}

/// Strips the `id:` prefix. An empty identifier is returned as-is; the
/// lookup that follows reports it as missing.
pub fn extract_id(reference: &str) -> &str {
    reference.strip_prefix(ID_PREFIX).unwrap_or(reference)
}

/// Accepts only explicit references. Used by destructive commands that
/// must never act on a name match.
pub fn require_id_ref(reference: &str, entity: EntityKind) -> Result<&str, RefError> {
    match Reference::parse(reference) {
        Reference::Id(id) => Ok(id),
        Reference::Name(_) => Err(RefError::InvalidReference {
            entity,
            reference: reference.to_string(),
        }),
    }
}
