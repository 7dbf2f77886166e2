//! Compilation of user-supplied name patterns.
//!
//! A pattern is matched against canonical vertex names according to the
//! match mode in [`Options`]: exact string equality, a regular expression,
//! or a wildcard pattern where `?` matches one character and `*` any run.
//! In the two non-exact modes, the hierarchy markers `/`, `.` and `_` can
//! be treated as single-character wildcards, so a designer may paste a
//! slash-separated, dot-separated or underscore-flattened spelling of the
//! same hierarchical name and resolve the same vertex. Non-exact matching
//! searches anywhere in the name.

use netpath_common::{MatchMode, Options};
use regex::Regex;

/// A compiled name matcher.
#[derive(Clone, Debug)]
pub enum NameMatcher {
    /// The pattern must equal the name exactly.
    Exact(String),
    /// The pattern is searched anywhere in the name.
    Search(Regex),
}

impl NameMatcher {
    /// Compiles a pattern under the given options.
    pub fn compile(pattern: &str, options: &Options) -> Result<Self, regex::Error> {
        match options.match_mode {
            MatchMode::Exact => Ok(NameMatcher::Exact(pattern.to_string())),
            MatchMode::Regex => {
                let mut source = pattern.to_string();
                if options.ignore_hierarchy_markers {
                    // '.' is already the single-character wildcard here.
                    source = source.replace(['/', '_'], ".");
                }
                Ok(NameMatcher::Search(Regex::new(&source)?))
            }
            MatchMode::Wildcard => {
                let mut source = String::with_capacity(pattern.len() * 2);
                for c in pattern.chars() {
                    match c {
                        '?' => source.push('.'),
                        '*' => source.push_str(".*"),
                        '/' | '.' | '_' if options.ignore_hierarchy_markers => source.push('.'),
                        other => source.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
                    }
                }
                Ok(NameMatcher::Search(Regex::new(&source)?))
            }
        }
    }

    /// Returns `true` if the name matches the pattern.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            NameMatcher::Exact(pattern) => pattern == name,
            NameMatcher::Search(regex) => regex.is_match(name),
        }
    }
}
