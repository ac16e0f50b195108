//! The caller-held set of open directories, round-tripped as `|`-delimited
//! text.

use crate::confine;
use crate::error::Result;
use std::collections::HashSet;

/// Delimiter between root-relative paths in the expansion text.
pub const DELIMITER: char = '|';

/// Root-relative directory paths that are open for one render.
///
/// Tokens are kept in the order they were parsed, duplicates and empty
/// tokens included, so serialization reproduces what the caller sent minus
/// the empty segments. Membership goes through a hash set of normalized
/// paths, so `reports/2024/` opens `reports/2024`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    tokens: Vec<String>,
    members: HashSet<String>,
}

impl ExpansionState {
    /// Parse expansion text. Empty text behaves as if it were `default_path`,
    /// so the render root is always present.
    pub fn parse(text: &str, default_path: &str) -> Self {
        let text = if text.is_empty() { default_path } else { text };
        text.split(DELIMITER).map(str::to_string).collect()
    }

    pub fn contains(&self, relative_path: &str) -> bool {
        self.members.contains(relative_path)
    }

    /// Add a token. Tokens that fail normalization are kept verbatim as
    /// members; they can never match a walked path and `validate` reports
    /// them.
    pub fn insert(&mut self, relative_path: impl Into<String>) {
        let path = relative_path.into();
        let member = confine::normalize_relative(&path).unwrap_or_else(|_| path.clone());
        self.members.insert(member);
        self.tokens.push(path);
    }

    /// Number of distinct non-empty members, which bounds how many
    /// directories a build can descend into.
    pub fn len(&self) -> usize {
        self.members.iter().filter(|m| !m.is_empty()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Non-empty tokens in parse order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens
            .iter()
            .map(String::as_str)
            .filter(|t| !t.is_empty())
    }

    /// Join all non-empty tokens with `|`.
    pub fn serialize(&self) -> String {
        self.iter().collect::<Vec<_>>().join("|")
    }

    /// Reject any token that is absolute or climbs with `..`.
    ///
    /// Tokens are only ever compared against paths produced by the walk, but
    /// absolute paths are refused at the boundary all the same.
    pub fn validate(&self) -> Result<()> {
        for token in self.iter() {
            confine::normalize_relative(token)?;
        }
        Ok(())
    }
}

impl FromIterator<String> for ExpansionState {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut state = ExpansionState::default();
        for token in iter {
            state.insert(token);
        }
        state
    }
}
