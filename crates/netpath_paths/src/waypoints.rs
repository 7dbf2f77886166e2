//! Waypoint aggregates for path queries.

use crate::error::QueryError;

/// The named points a path query must visit and avoid.
///
/// The first point is resolved as a start point, the last as an end point,
/// and every point in between as a through point. The avoid set names
/// vertices the path must not traverse.
#[derive(Clone, Debug, Default)]
pub struct Waypoints {
    start: Option<String>,
    finish: Option<String>,
    through: Vec<String>,
    avoid: Vec<String>,
}

impl Waypoints {
    /// Creates an empty waypoint set. A query over it fails until both a
    /// start and an end point are supplied.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a waypoint set from a start and an end point.
    pub fn between(start: impl Into<String>, finish: impl Into<String>) -> Self {
        Self {
            start: Some(start.into()),
            finish: Some(finish.into()),
            through: Vec::new(),
            avoid: Vec::new(),
        }
    }

    /// Sets the start point.
    pub fn starting_at(mut self, name: impl Into<String>) -> Self {
        self.start = Some(name.into());
        self
    }

    /// Sets the end point.
    pub fn ending_at(mut self, name: impl Into<String>) -> Self {
        self.finish = Some(name.into());
        self
    }

    /// Appends a through point the path must pass, in order.
    pub fn through(mut self, name: impl Into<String>) -> Self {
        self.through.push(name.into());
        self
    }

    /// Appends a point the path must not traverse.
    pub fn avoiding(mut self, name: impl Into<String>) -> Self {
        self.avoid.push(name.into());
        self
    }

    /// Returns the point names in query order: start, through points, end.
    ///
    /// Fails with [`QueryError::EmptyWaypoints`] unless both a start and an
    /// end point are present.
    pub fn point_names(&self) -> Result<Vec<&str>, QueryError> {
        let (Some(start), Some(finish)) = (self.start.as_deref(), self.finish.as_deref()) else {
            return Err(QueryError::EmptyWaypoints);
        };
        let mut names = Vec::with_capacity(self.through.len() + 2);
        names.push(start);
        names.extend(self.through.iter().map(String::as_str));
        names.push(finish);
        Ok(names)
    }

    /// Returns the names of the avoid points.
    pub fn avoid_names(&self) -> &[String] {
        &self.avoid
    }
}
