//! Shared plumbing for the netpath workspace: the behavioral options value
//! consulted by the XML loader and the name resolver.

#![warn(missing_docs)]

pub mod options;

pub use options::{MatchMode, Options};
