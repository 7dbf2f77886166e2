//! Path-engine tests over elaborated netlist dumps of small designs.

use netpath_common::Options;
use netpath_netlist::VertexId;
use netpath_paths::{Netlist, QueryError, Waypoints};
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn compile(name: &str) -> Netlist {
    Netlist::from_xml_file(fixture(name), Options::default()).expect("fixture should load")
}

fn check_var(netlist: &Netlist, id: VertexId, ast_type: &str, dtype: &str, name: &str) {
    let vertex = netlist.vertex(id);
    assert_eq!(vertex.ast_type_str(), ast_type);
    assert_eq!(vertex.name(), Some(name));
    let var = vertex.as_var().expect("expected a variable vertex");
    assert_eq!(netlist.dtypes().dtype_str(var.dtype), dtype);
}

fn check_logic(netlist: &Netlist, id: VertexId, ast_type: &str) {
    let vertex = netlist.vertex(id);
    assert!(vertex.is_logic());
    assert_eq!(vertex.ast_type_str(), ast_type);
}

#[test]
fn path_exists_adder() {
    let netlist = compile("adder.xml");
    // Paths between all start and end points are reported; the reverse
    // directions fail because outputs are not start points.
    for start in ["i_a", "i_b"] {
        for finish in ["o_sum", "o_co"] {
            assert!(
                netlist
                    .path_exists(&Waypoints::between(start, finish))
                    .unwrap(),
                "{start} -> {finish}"
            );
            let err = netlist
                .path_exists(&Waypoints::between(finish, start))
                .unwrap_err();
            match err {
                QueryError::UnknownName(message) => {
                    assert!(message.contains("could not find start point"));
                }
                other => panic!("expected unknown start point, found {other:?}"),
            }
        }
    }
}

#[test]
fn path_query_basic_assign_chain() {
    let netlist = compile("basic_assign_chain.xml");
    let vertices = netlist
        .any_path(&Waypoints::between("in", "out"))
        .unwrap();
    assert_eq!(vertices.len(), 7);
    check_var(&netlist, vertices[0], "VAR", "logic", "in");
    check_logic(&netlist, vertices[1], "ASSIGN");
    check_var(&netlist, vertices[2], "VAR", "logic", "basic_assign_chain.a");
    check_logic(&netlist, vertices[3], "ASSIGN");
    check_var(&netlist, vertices[4], "VAR", "logic", "basic_assign_chain.b");
    check_logic(&netlist, vertices[5], "ASSIGN");
    check_var(&netlist, vertices[6], "VAR", "logic", "out");
}

#[test]
fn path_query_basic_ff_chain() {
    let netlist = compile("basic_ff_chain.xml");

    // in -> a
    let vertices = netlist
        .any_path(&Waypoints::between("in", "basic_ff_chain.a"))
        .unwrap();
    assert_eq!(vertices.len(), 3);
    check_var(&netlist, vertices[0], "VAR", "logic", "in");
    check_logic(&netlist, vertices[1], "ASSIGN_DLY");
    check_var(&netlist, vertices[2], "DST_REG", "logic", "basic_ff_chain.a");

    // a -> b crosses from the source twin to the destination half.
    let vertices = netlist
        .any_path(&Waypoints::between("basic_ff_chain.a", "basic_ff_chain.b"))
        .unwrap();
    assert_eq!(vertices.len(), 3);
    check_var(&netlist, vertices[0], "SRC_REG", "logic", "basic_ff_chain.a");
    check_logic(&netlist, vertices[1], "ASSIGN_DLY");
    check_var(&netlist, vertices[2], "DST_REG", "logic", "basic_ff_chain.b");

    // b -> out
    let vertices = netlist
        .any_path(&Waypoints::between("basic_ff_chain.b", "out"))
        .unwrap();
    assert_eq!(vertices.len(), 3);
    check_var(&netlist, vertices[0], "SRC_REG", "logic", "basic_ff_chain.b");
    check_logic(&netlist, vertices[1], "ASSIGN");
    check_var(&netlist, vertices[2], "VAR", "logic", "out");
}

#[test]
fn register_boundary_blocks_combinational_path() {
    let netlist = compile("basic_ff_chain.xml");
    assert!(!netlist
        .path_exists(&Waypoints::between("in", "basic_ff_chain.b"))
        .unwrap());
    assert!(!netlist.path_exists(&Waypoints::between("in", "out")).unwrap());
}

#[test]
fn split_register_invariants() {
    let netlist = compile("basic_ff_chain.xml");
    let graph = netlist.graph();
    for (id, vertex) in graph.iter_vertices() {
        if vertex.is_src_reg() {
            assert_eq!(graph.in_degree(id), 0, "src reg {:?}", vertex.name());
        }
        if vertex.is_dst_reg() {
            assert_eq!(graph.out_degree(id), 0, "dst reg {:?}", vertex.name());
        }
    }
    assert!(netlist.warnings().is_empty());
}

#[test]
fn path_all_paths() {
    let netlist = compile("multiple_paths.xml");
    let paths = netlist.all_paths(&Waypoints::between("in", "out")).unwrap();
    assert_eq!(paths.len(), 3);
    for path in &paths {
        assert_eq!(path.len(), 5);
        assert_eq!(netlist.vertex(path[0]).name(), Some("in"));
        assert_eq!(netlist.vertex(path[4]).name(), Some("out"));
    }
    // The three paths route through the three distinct intermediate nets.
    let mut mids: Vec<&str> = paths
        .iter()
        .filter_map(|p| netlist.vertex(p[2]).name())
        .collect();
    mids.sort_unstable();
    assert_eq!(
        mids,
        vec!["multiple_paths.a", "multiple_paths.b", "multiple_paths.c"]
    );
}

#[test]
fn all_paths_honors_through_point() {
    let netlist = compile("multiple_paths.xml");
    let waypoints = Waypoints::between("in", "out").through("multiple_paths.b");
    let paths = netlist.all_paths(&waypoints).unwrap();
    assert_eq!(paths.len(), 1);
    assert_eq!(netlist.vertex(paths[0][2]).name(), Some("multiple_paths.b"));
    // Start and end appear exactly once despite the stage join.
    assert_eq!(paths[0].len(), 5);
}

#[test]
fn any_path_honors_avoid_points() {
    let netlist = compile("multiple_paths.xml");
    let waypoints = Waypoints::between("in", "out").avoiding("multiple_paths.a");
    let path = netlist.any_path(&waypoints).unwrap();
    assert_eq!(path.len(), 5);
    assert_eq!(netlist.vertex(path[2]).name(), Some("multiple_paths.b"));

    let all_blocked = Waypoints::between("in", "out")
        .avoiding("multiple_paths.a")
        .avoiding("multiple_paths.b")
        .avoiding("multiple_paths.c");
    assert!(!netlist.path_exists(&all_blocked).unwrap());
    assert!(netlist.any_path(&all_blocked).unwrap().is_empty());
    assert!(netlist.all_paths(&all_blocked).unwrap().is_empty());
}

#[test]
fn path_fan_out() {
    let netlist = compile("fan_out_in.xml");
    let paths = netlist.all_fan_out("in").unwrap();
    assert_eq!(paths.len(), 3);
    let mut ends: Vec<&str> = paths
        .iter()
        .filter_map(|p| netlist.vertex(*p.last().unwrap()).name())
        .collect();
    ends.sort_unstable();
    assert_eq!(ends, vec!["fan_out_in.a", "fan_out_in.b", "fan_out_in.c"]);
    for path in &paths {
        assert_eq!(netlist.vertex(path[0]).name(), Some("in"));
        assert!(netlist.vertex(*path.last().unwrap()).is_dst_reg());
    }
}

#[test]
fn path_fan_in() {
    let netlist = compile("fan_out_in.xml");
    let paths = netlist.all_fan_in("out").unwrap();
    assert_eq!(paths.len(), 3);
    for path in &paths {
        // Fan-in paths run start-to-finish without reversal.
        assert!(netlist.vertex(path[0]).is_src_reg());
        assert_eq!(netlist.vertex(*path.last().unwrap()).name(), Some("out"));
    }
}

#[test]
fn path_query_pipeline_module() {
    let netlist = compile("pipeline_module.xml");
    // The generate instances of the pipeline are distinguished by their
    // canonicalized names; waypoint resolution takes the first match.
    let vertices = netlist
        .any_path(&Waypoints::between("i_data", "data_q"))
        .unwrap();
    assert_eq!(vertices.len(), 7);
    check_var(&netlist, vertices[0], "VAR", "[31:0] logic", "i_data");
    check_logic(&netlist, vertices[1], "ASSIGN");
    check_var(
        &netlist,
        vertices[2],
        "VAR",
        "[31:0] logic [8:0]",
        "pipeline_module.routing",
    );
    check_logic(&netlist, vertices[3], "ASSIGN");
    check_var(
        &netlist,
        vertices[4],
        "VAR",
        "[31:0] logic",
        "pipeline_module.__Vcellinp__g_pipestage[0].u_pipestage__i_data",
    );
    check_logic(&netlist, vertices[5], "ASSIGN_DLY");
    check_var(
        &netlist,
        vertices[6],
        "DST_REG",
        "[31:0] logic",
        "pipeline_module.g_pipestage[0].u_pipestage.data_q",
    );
}

#[test]
fn pipeline_register_lookups() {
    let netlist = compile("pipeline_module.xml");
    // Two pipeline stages match; strict resolution is ambiguous, the
    // tolerant form is not.
    match netlist.endpoint_exists("data_q").unwrap_err() {
        QueryError::AmbiguousName(message) => {
            assert!(message.contains("g_pipestage[0]"));
            assert!(message.contains("g_pipestage[1]"));
        }
        other => panic!("expected ambiguity, found {other:?}"),
    }
    assert!(netlist.any_endpoint_exists("data_q").unwrap());
    assert!(netlist.any_reg_exists("data_q").unwrap());
    assert!(netlist
        .reg_exists("g_pipestage[1].u_pipestage.data_q")
        .unwrap());
}

#[test]
fn queries_are_deterministic() {
    let netlist = compile("multiple_paths.xml");
    let waypoints = Waypoints::between("in", "out");
    let first_any = netlist.any_path(&waypoints).unwrap();
    let first_all = netlist.all_paths(&waypoints).unwrap();
    let first_fan = netlist.all_fan_out("in").unwrap();
    for _ in 0..3 {
        assert_eq!(netlist.any_path(&waypoints).unwrap(), first_any);
        assert_eq!(netlist.all_paths(&waypoints).unwrap(), first_all);
        assert_eq!(netlist.all_fan_out("in").unwrap(), first_fan);
    }
}

#[test]
fn fan_in_matches_fan_out_through_the_fork() {
    let netlist = compile("fan_out_in.xml");
    // Every register the input fans out to is a source the output fans in
    // from: the same three registers bound the combinational stages.
    let fan_out_regs: Vec<String> = netlist
        .all_fan_out("in")
        .unwrap()
        .iter()
        .filter_map(|p| netlist.vertex(*p.last().unwrap()).name().map(str::to_string))
        .collect();
    let fan_in_regs: Vec<String> = netlist
        .all_fan_in("out")
        .unwrap()
        .iter()
        .filter_map(|p| netlist.vertex(p[0]).name().map(str::to_string))
        .collect();
    assert_eq!(fan_out_regs, fan_in_regs);
}
