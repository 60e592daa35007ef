//! Case-insensitive name matching against a candidate list
//!
//! Rules, first decision wins:
//! 1. exact (case-insensitive) name match, first in list order
//! 2. a single partial (substring) match
//! 3. no partial match: not found
//! 4. several partial matches: ambiguous

use super::candidate::{Candidate, EntityKind};
use super::refs::RefError;

/// Maximum number of candidates listed in an ambiguity error
pub const MAX_HINTS: usize = 5;

/// Outcome of matching a query against candidates
#[derive(Debug, PartialEq)]
pub enum Match<'a, T> {
    Found(&'a T),
    /// Every partial match, in the order supplied
    Ambiguous(Vec<&'a T>),
    NotFound,
}

/// Matches `query` against the display names of `candidates`.
pub fn fuzzy_match<'a, T: Candidate>(query: &str, candidates: &'a [T]) -> Match<'a, T> {
    let needle = query.to_lowercase();

    // Lower-case each name once; both passes reuse it.
    let lowered: Vec<(String, &'a T)> = candidates
        .iter()
        .map(|c| (c.display_name().to_lowercase(), c))
        .collect();

    if let Some((_, exact)) = lowered.iter().find(|(name, _)| *name == needle) {
        return Match::Found(*exact);
    }

    let mut partial: Vec<&'a T> = lowered
        .iter()
        .filter(|(name, _)| name.contains(&needle))
        .map(|(_, c)| *c)
        .collect();

    match partial.len() {
        0 => Match::NotFound,
        1 => Match::Found(partial.remove(0)),
        _ => Match::Ambiguous(partial),
    }
}

impl<'a, T: Candidate> Match<'a, T> {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Match::NotFound)
    }

    /// Converts the outcome into the matched candidate or a reference error.
    ///
    /// `scope` names the container that was searched, for the not-found
    /// message ("not found in project").
    pub fn into_result(
        self,
        entity: EntityKind,
        query: &str,
        scope: Option<EntityKind>,
    ) -> Result<&'a T, RefError> {
        match self {
            Match::Found(candidate) => Ok(candidate),
            Match::Ambiguous(all) => Err(RefError::Ambiguous {
                entity,
                query: query.to_string(),
                candidates: all.iter().take(MAX_HINTS).map(|c| c.hint()).collect(),
            }),
            Match::NotFound => Err(RefError::NotFound {
                entity,
                query: query.to_string(),
                scope,
            }),
        }
    }
}
