//! Error types for name resolution and path queries.

use netpath_netlist::NetlistError;

/// Errors reported by the query surface.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// The netlist could not be loaded.
    #[error(transparent)]
    Load(#[from] NetlistError),

    /// A required name (start, end, through, avoid, or lookup) matched no
    /// vertex.
    #[error("unknown name: {0}")]
    UnknownName(String),

    /// A name expected to resolve to one vertex matched several; the
    /// message enumerates every candidate with its kind.
    #[error("ambiguous name: {0}")]
    AmbiguousName(String),

    /// The user-supplied regex or wildcard pattern failed to compile.
    #[error("malformed pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// A path query was issued without both a start and an end point.
    #[error("a path query requires a start and an end point")]
    EmptyWaypoints,

    /// A report target could not be written.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
