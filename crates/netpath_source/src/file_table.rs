//! Table of the source files named by an elaborated netlist.

use crate::file_id::FileId;
use serde::{Deserialize, Serialize};

/// A source file referenced by the netlist, as recorded in the XML `files`
/// section.
///
/// netpath never re-reads these files; the record exists so that locations
/// can be reported against the original description.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct SourceFile {
    /// Path of the file as reported by the elaborator.
    pub filename: String,
    /// The language tag of the file (e.g., `1800-2017`).
    pub language: String,
}

/// Table of source files, indexed by [`FileId`].
///
/// Files are appended in the order the elaborator lists them and never
/// removed, so IDs are stable for the lifetime of the table.
#[derive(Clone, Default, Debug, Serialize, Deserialize)]
pub struct FileTable {
    files: Vec<SourceFile>,
}

impl FileTable {
    /// Creates an empty file table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file to the table and returns its ID.
    pub fn add(&mut self, filename: impl Into<String>, language: impl Into<String>) -> FileId {
        let id = FileId::from_raw(self.files.len() as u32);
        self.files.push(SourceFile {
            filename: filename.into(),
            language: language.into(),
        });
        id
    }

    /// Returns the file with the given ID, or `None` for the dummy ID or an
    /// out-of-range ID.
    pub fn get(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.as_raw() as usize)
    }

    /// Returns the filename for a location's file, or `"<unknown>"` when the
    /// file is not recorded.
    pub fn filename(&self, id: FileId) -> &str {
        self.get(id).map_or("<unknown>", |f| f.filename.as_str())
    }

    /// Returns the number of files in the table.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if the table contains no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterates over `(FileId, &SourceFile)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (FileId, &SourceFile)> {
        self.files
            .iter()
            .enumerate()
            .map(|(i, f)| (FileId::from_raw(i as u32), f))
    }
}
