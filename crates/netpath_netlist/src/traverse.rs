//! Depth-first traversals, path recovery and path enumeration.
//!
//! Every query is built on two DFS modes over the graph (or its reverse):
//!
//! - *tree mode* records only tree edges, so each discovered vertex has at
//!   most one parent; a single path is recovered in linear time by climbing
//!   the parent map.
//! - *all-edges mode* records every examined edge, so vertices may have
//!   several parents; every simple path is then enumerated by depth-first
//!   reconstruction with on-path cycle protection. The number of simple
//!   paths grows exponentially in the worst case, which makes enumeration
//!   infeasible on large designs — callers bound the search with
//!   through-points.
//!
//! A traversal may be restricted to a filtered view of the graph that omits
//! a sorted set of avoid-point vertices; membership is decided by binary
//! search on each visit.

use crate::graph::Graph;
use crate::ids::VertexId;

/// A sorted set of vertices excluded from a traversal.
///
/// An avoided vertex is never visited and contributes no edges in either
/// direction.
#[derive(Clone, Default, Debug)]
pub struct AvoidSet {
    ids: Vec<VertexId>,
}

impl AvoidSet {
    /// Builds an avoid set from the given IDs. Sorted once here so that
    /// each traversal step costs a binary search, not a scan.
    pub fn new(mut ids: Vec<VertexId>) -> Self {
        ids.sort_unstable();
        ids.dedup();
        Self { ids }
    }

    /// Returns `true` if the vertex is excluded.
    pub fn contains(&self, v: VertexId) -> bool {
        self.ids.binary_search(&v).is_ok()
    }

    /// Returns `true` if nothing is excluded.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Runs a tree-mode DFS from `start`, honoring `avoid`, over the forward or
/// reverse adjacency. Returns the single-parent map: `parent[v]` is the
/// vertex through which `v` was first discovered.
fn dfs_tree_parents(
    graph: &Graph,
    start: VertexId,
    avoid: &AvoidSet,
    reverse: bool,
) -> Vec<Option<VertexId>> {
    let n = graph.num_vertices();
    let mut parent: Vec<Option<VertexId>> = vec![None; n];
    let mut discovered = vec![false; n];
    if avoid.contains(start) {
        return parent;
    }
    discovered[start.index()] = true;
    let mut stack: Vec<(VertexId, usize)> = vec![(start, 0)];
    while let Some(frame) = stack.last_mut() {
        let (u, next) = *frame;
        let neighbors = if reverse {
            graph.in_neighbors(u)
        } else {
            graph.neighbors(u)
        };
        if next >= neighbors.len() {
            stack.pop();
            continue;
        }
        frame.1 += 1;
        let v = neighbors[next];
        if avoid.contains(v) || discovered[v.index()] {
            continue;
        }
        discovered[v.index()] = true;
        parent[v.index()] = Some(u);
        stack.push((v, 0));
    }
    parent
}

/// Runs an all-edges DFS from `start`, honoring `avoid`. Returns the
/// multi-parent map: `parents[v]` holds one entry per edge into `v` that
/// the traversal examined, in examination order. Parallel edges produce
/// repeated entries.
fn dfs_all_parents(graph: &Graph, start: VertexId, avoid: &AvoidSet) -> Vec<Vec<VertexId>> {
    let n = graph.num_vertices();
    let mut parents: Vec<Vec<VertexId>> = vec![Vec::new(); n];
    let mut discovered = vec![false; n];
    if avoid.contains(start) {
        return parents;
    }
    discovered[start.index()] = true;
    let mut stack: Vec<(VertexId, usize)> = vec![(start, 0)];
    while let Some(frame) = stack.last_mut() {
        let (u, next) = *frame;
        let neighbors = graph.neighbors(u);
        if next >= neighbors.len() {
            stack.pop();
            continue;
        }
        frame.1 += 1;
        let v = neighbors[next];
        if avoid.contains(v) {
            continue;
        }
        parents[v.index()].push(u);
        if !discovered[v.index()] {
            discovered[v.index()] = true;
            stack.push((v, 0));
        }
    }
    parents
}

/// Recovers the path from `start` to `finish` by climbing a tree-mode
/// parent map. The returned sequence runs `finish` back to `start`; it is
/// empty when `finish` was not reached.
fn climb_parents(parent: &[Option<VertexId>], start: VertexId, finish: VertexId) -> Vec<VertexId> {
    let mut path = vec![finish];
    let mut cur = finish;
    while cur != start {
        match parent[cur.index()] {
            Some(p) => {
                path.push(p);
                cur = p;
            }
            None => return Vec::new(),
        }
    }
    path
}

/// Enumerates every simple path from `start` to `finish` over an all-edges
/// parent map. Paths are returned in start-to-finish order, in the order
/// the reconstruction discovers them.
fn enumerate_paths(
    parents: &[Vec<VertexId>],
    start: VertexId,
    finish: VertexId,
) -> Vec<Vec<VertexId>> {
    let mut result = Vec::new();
    let mut path = Vec::new();
    reconstruct(parents, start, finish, &mut path, &mut result);
    for p in &mut result {
        p.reverse();
    }
    result
}

fn reconstruct(
    parents: &[Vec<VertexId>],
    start: VertexId,
    cur: VertexId,
    path: &mut Vec<VertexId>,
    result: &mut Vec<Vec<VertexId>>,
) {
    path.push(cur);
    if cur == start {
        result.push(path.clone());
        path.pop();
        return;
    }
    for &p in &parents[cur.index()] {
        if !path.contains(&p) {
            reconstruct(parents, start, p, path, result);
        } else {
            log::trace!("cycle detected during path reconstruction");
        }
    }
    path.pop();
}

/// Finds a single path through the waypoint sequence, avoiding the given
/// vertices. Returns the concatenated path, or an empty sequence when any
/// adjacent waypoint pair is unconnected.
pub fn any_point_to_point(
    graph: &Graph,
    waypoints: &[VertexId],
    avoid: &AvoidSet,
) -> Vec<VertexId> {
    let mut path = Vec::new();
    for pair in waypoints.windows(2) {
        let (start, finish) = (pair[0], pair[1]);
        log::debug!(
            "performing DFS from vertex {} to {}",
            start.as_raw(),
            finish.as_raw()
        );
        let parent = dfs_tree_parents(graph, start, avoid, false);
        let mut sub = climb_parents(&parent, start, finish);
        if sub.is_empty() {
            return Vec::new();
        }
        sub.reverse();
        sub.pop();
        path.extend(sub);
    }
    match waypoints.last() {
        Some(&last) => path.push(last),
        None => return Vec::new(),
    }
    path
}

/// Enumerates all simple paths through the waypoint sequence, avoiding the
/// given vertices. With more than two waypoints the per-stage path lists
/// are joined as a cartesian product; any unconnected stage empties the
/// whole result.
pub fn all_point_to_point(
    graph: &Graph,
    waypoints: &[VertexId],
    avoid: &AvoidSet,
) -> Vec<Vec<VertexId>> {
    let Some(&last) = waypoints.last() else {
        return Vec::new();
    };
    let mut stages: Vec<Vec<Vec<VertexId>>> = Vec::new();
    for pair in waypoints.windows(2) {
        let (start, finish) = (pair[0], pair[1]);
        let parents = dfs_all_parents(graph, start, avoid);
        let paths = enumerate_paths(&parents, start, finish);
        if paths.is_empty() {
            log::debug!(
                "no paths between vertices {} and {}",
                start.as_raw(),
                finish.as_raw()
            );
            return Vec::new();
        }
        stages.push(paths);
    }
    let mut combined: Vec<Vec<VertexId>> = vec![Vec::new()];
    for stage in &stages {
        let mut joined = Vec::with_capacity(combined.len() * stage.len());
        for prefix in &combined {
            for path in stage {
                let mut entry = prefix.clone();
                entry.extend_from_slice(&path[..path.len() - 1]);
                joined.push(entry);
            }
        }
        combined = joined;
    }
    for path in &mut combined {
        path.push(last);
    }
    combined
}

/// Collects a path from `start` to every end-point vertex reachable from
/// it, in vertex-ID order of the endpoints.
pub fn all_fan_out(graph: &Graph, start: VertexId) -> Vec<Vec<VertexId>> {
    log::debug!("performing fan-out DFS from vertex {}", start.as_raw());
    let parent = dfs_tree_parents(graph, start, &AvoidSet::default(), false);
    let mut paths = Vec::new();
    for (v, vertex) in graph.iter_vertices() {
        if vertex.is_end_point() {
            let mut path = climb_parents(&parent, start, v);
            if !path.is_empty() {
                path.reverse();
                paths.push(path);
            }
        }
    }
    paths
}

/// Collects a path from every start-point vertex that reaches `finish`, in
/// vertex-ID order of the start points. Runs on the reverse graph; climbing
/// the reverse parent map already yields start-to-finish order.
pub fn all_fan_in(graph: &Graph, finish: VertexId) -> Vec<Vec<VertexId>> {
    log::debug!(
        "performing fan-in DFS on the reverse graph from vertex {}",
        finish.as_raw()
    );
    let parent = dfs_tree_parents(graph, finish, &AvoidSet::default(), true);
    let mut paths = Vec::new();
    for (v, vertex) in graph.iter_vertices() {
        if vertex.is_start_point() {
            let path = climb_parents(&parent, finish, v);
            if !path.is_empty() {
                paths.push(path);
            }
        }
    }
    paths
}
