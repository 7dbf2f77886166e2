//! Behavioral options consulted by the XML loader and the name resolver.

use serde::{Deserialize, Serialize};

/// How user-supplied name patterns are matched against vertex names.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum MatchMode {
    /// The pattern must equal the canonical vertex name exactly.
    Exact,
    /// The pattern is a regular expression, searched anywhere in the name.
    Regex,
    /// `?` matches any single character and `*` any run of characters;
    /// everything else is literal. Searched anywhere in the name.
    Wildcard,
}

/// Behavioral switches for a netlist instance.
///
/// An `Options` value is supplied at construction and owned by the netlist
/// for its lifetime. It may be replaced between queries, but never while a
/// query is running.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Options {
    /// Emit verbose narration of loader and query steps via `log`.
    pub debug_mode: bool,
    /// The name matcher used when resolving patterns.
    pub match_mode: MatchMode,
    /// Treat `/`, `.` and `_` in patterns as single-character wildcards, so
    /// slash-separated, dot-separated and underscore-flattened spellings of
    /// a hierarchical name all resolve to the same vertex. Only effective
    /// in the non-exact match modes.
    pub ignore_hierarchy_markers: bool,
    /// When resolving a waypoint and several vertices match, silently take
    /// the first instead of failing with an ambiguity error.
    pub match_any_vertex: bool,
}

impl Options {
    /// Creates the default option set.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            debug_mode: false,
            match_mode: MatchMode::Wildcard,
            ignore_hierarchy_markers: true,
            match_any_vertex: true,
        }
    }
}
