//! Permission scope parsing and matching.

use std::collections::HashSet;

/// The set of permission scopes carried by a token
///
/// Scopes are strings of the form `action:service:resource` and travel on
/// the wire as a single space-delimited claim. Authorization uses
/// ANY-match semantics: a caller supplies the minimum set of scopes
/// sufficient for the requested operation, and a single overlap with the
/// token's grant set authorizes the call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScopeSet(HashSet<String>);

impl ScopeSet {
    /// Parses a space-delimited scope string
    ///
    /// Empty or whitespace-only input yields an empty set, which never
    /// authorizes anything.
    pub fn parse(raw: &str) -> Self {
        Self(raw.split_whitespace().map(str::to_string).collect())
    }

    /// Checks whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Checks whether a single scope is present
    pub fn contains(&self, scope: &str) -> bool {
        self.0.contains(scope)
    }

    /// ANY-match intersection with a caller-supplied allow-list
    ///
    /// Returns `true` iff at least one allowed scope appears in this set.
    /// An empty set on either side never matches.
    pub fn intersects<S: AsRef<str>>(&self, allowed: &[S]) -> bool {
        allowed.iter().any(|s| self.0.contains(s.as_ref()))
    }
}
