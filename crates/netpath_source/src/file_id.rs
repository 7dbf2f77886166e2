//! Identifier for entries in the file table.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one source file recorded in the
/// [`FileTable`](crate::FileTable).
///
/// The elaborator keys its `loc` attributes with short string ids; the
/// loader maps those onto `FileId` values as the `files` section is read.
/// A location whose file key never appeared in that section carries
/// [`FileId::DUMMY`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct FileId(u32);

impl FileId {
    /// The id carried by locations with no recorded source file.
    pub const DUMMY: FileId = FileId(u32::MAX);

    /// Creates a `FileId` from a raw `u32` value.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw `u32` value of this `FileId`.
    pub fn as_raw(self) -> u32 {
        self.0
    }

    /// Returns `true` for [`FileId::DUMMY`].
    pub fn is_dummy(self) -> bool {
        self == Self::DUMMY
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dummy() {
            write!(f, "file#?")
        } else {
            write!(f, "file#{}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_roundtrip() {
        assert_eq!(FileId::from_raw(42).as_raw(), 42);
    }

    #[test]
    fn dummy_is_distinct() {
        assert!(FileId::DUMMY.is_dummy());
        assert!(!FileId::from_raw(0).is_dummy());
        assert_ne!(FileId::DUMMY, FileId::from_raw(0));
    }

    #[test]
    fn display_forms() {
        assert_eq!(format!("{}", FileId::from_raw(3)), "file#3");
        assert_eq!(format!("{}", FileId::DUMMY), "file#?");
    }

    #[test]
    fn serde_roundtrip() {
        let id = FileId::from_raw(7);
        let json = serde_json::to_string(&id).unwrap();
        let back: FileId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
