//! Source file management and location tracking.
//!
//! This crate provides the [`FileTable`] for recording the source files
//! named by the elaborator's XML dump, and the [`FileId`] and [`Location`]
//! types used to associate vertices, types and diagnostics with their
//! origin in the hardware description.

#![warn(missing_docs)]

pub mod file_id;
pub mod file_table;
pub mod location;

pub use file_id::FileId;
pub use file_table::{FileTable, SourceFile};
pub use location::Location;
