//! Timing-path queries over an elaborated netlist.
//!
//! This crate is the user-facing surface of netpath. A [`Netlist`] is
//! constructed from a Verilator XML dump, canonicalized once, and then
//! queried read-only:
//!
//! ```ignore
//! use netpath_common::Options;
//! use netpath_paths::{Netlist, Waypoints};
//!
//! let netlist = Netlist::from_xml_file("design.xml", Options::default())?;
//! let waypoints = Waypoints::between("i_data", "data_q");
//! if netlist.path_exists(&waypoints)? {
//!     for id in netlist.any_path(&waypoints)? {
//!         println!("{}", netlist.vertex(id).name().unwrap_or("(logic)"));
//!     }
//! }
//! ```
//!
//! Names are resolved with the matcher selected by [`Options`]: exact,
//! regex, or wildcard, optionally treating the hierarchy markers `/`, `.`
//! and `_` as equivalent so pasted names in any spelling resolve alike.
//!
//! Enumerating all paths is exponential in the worst case and infeasible on
//! large designs; bound the search with through-points.
//!
//! [`Options`]: netpath_common::Options

#![warn(missing_docs)]

pub mod error;
pub mod matcher;
pub mod netlist;
pub mod waypoints;

pub use error::QueryError;
pub use matcher::NameMatcher;
pub use netlist::Netlist;
pub use waypoints::Waypoints;
