//! Line/column ranges within source files.

use crate::file_id::FileId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A line/column range within a source file.
///
/// The elaborator reports locations as one-based line and column
/// coordinates; both ends are inclusive.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Location {
    /// The source file this location belongs to.
    pub file: FileId,
    /// Line of the start of the range.
    pub start_line: u32,
    /// Column of the start of the range.
    pub start_col: u32,
    /// Line of the end of the range.
    pub end_line: u32,
    /// Column of the end of the range.
    pub end_col: u32,
}

impl Location {
    /// A dummy location used when no source position is available.
    pub const DUMMY: Location = Location {
        file: FileId::DUMMY,
        start_line: 0,
        start_col: 0,
        end_line: 0,
        end_col: 0,
    };

    /// Creates a new location in the given file with the given range.
    pub fn new(file: FileId, start_line: u32, start_col: u32, end_line: u32, end_col: u32) -> Self {
        Self {
            file,
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// Returns `true` if this is the dummy location.
    pub fn is_dummy(&self) -> bool {
        self.file == FileId::DUMMY
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_col)
    }
}
