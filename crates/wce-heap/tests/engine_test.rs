use wce_heap::graph::{Edge, EdgeWeight, SparseGraph, StaticSparseGraph};
use wce_heap::{Cost, Diagnostic, Dimension, EdgeHeap, EngineOptions, Error, MergeSide};

fn e(u: usize, v: usize) -> Edge {
    Edge::new(u, v)
}

/// `(0,1)=+3, (1,2)=+2, (0,2)=-1, (2,3)=+1`, every other pair zero.
fn four_node_graph() -> StaticSparseGraph {
    StaticSparseGraph::from_weighted_edges(
        4,
        [(0, 1, 3.0), (1, 2, 2.0), (0, 2, -1.0), (2, 3, 1.0)],
    )
    .unwrap()
}

fn init(g: &StaticSparseGraph) -> EdgeHeap<'_, StaticSparseGraph> {
    let mut heap = EdgeHeap::new(g, EngineOptions::default());
    heap.init_induced_costs().unwrap();
    heap
}

#[test]
fn initialization_adds_direct_and_triangle_costs() {
    let g = four_node_graph();
    let heap = init(&g);

    // (0,1): delete cost 3, triangle via 2 has one present and one absent side.
    assert_eq!(heap.forbid_cost(e(0, 1)), Cost::Live(3.0));
    assert_eq!(heap.perm_cost(e(0, 1)), Cost::Live(1.0));
    // (0,2): insert cost 1, triangle via 1 has both sides present.
    assert_eq!(heap.forbid_cost(e(0, 2)), Cost::Live(2.0));
    assert_eq!(heap.perm_cost(e(0, 2)), Cost::Live(1.0));
    // (1,2): delete cost 2, triangle via 0 has one present and one absent side.
    assert_eq!(heap.forbid_cost(e(1, 2)), Cost::Live(2.0));
    assert_eq!(heap.perm_cost(e(1, 2)), Cost::Live(1.0));
    // (2,3): no triangle.
    assert_eq!(heap.forbid_cost(e(2, 3)), Cost::Live(1.0));
    assert_eq!(heap.perm_cost(e(2, 3)), Cost::Live(0.0));

    assert_eq!(heap.unprocessed_count(), 4);
    assert_eq!(heap.max_forbid_edge(), Some(e(0, 1)));
    assert_eq!(heap.max_perm_edge(), Some(e(0, 1)));
    assert!(heap.validate_heaps().is_ok());
    assert!(heap.diagnostics().is_empty());
}

#[test]
fn costs_are_looked_up_in_either_argument_order() {
    let g = four_node_graph();
    let heap = init(&g);
    assert_eq!(heap.forbid_cost(e(1, 0)), heap.forbid_cost(e(0, 1)));
    assert_eq!(heap.perm_cost(e(3, 2)), Cost::Live(0.0));
}

#[test]
fn second_initialization_is_rejected() {
    let g = four_node_graph();
    let mut heap = init(&g);
    assert_eq!(heap.init_induced_costs(), Err(Error::AlreadyInitialized));
    assert_eq!(heap.unprocessed_count(), 4);
}

#[test]
fn queries_before_initialization_find_nothing() {
    let g = four_node_graph();
    let mut heap = EdgeHeap::new(&g, EngineOptions::default());
    assert!(!heap.is_initialized());
    assert_eq!(heap.max_forbid_edge(), None);
    assert_eq!(heap.max_perm_edge(), None);

    heap.increase_forbid_cost(e(0, 1), 5.0);
    heap.remove_edge(e(0, 1));
    heap.merge_edges(e(0, 1), e(0, 2));
    assert_eq!(heap.unprocessed_count(), 0);
    assert!(heap.validate_heaps().is_ok());
}

#[test]
fn removing_the_top_edge_exposes_the_runner_up() {
    let g = four_node_graph();
    let mut heap = init(&g);

    let top = heap.max_forbid_edge().unwrap();
    assert_eq!(top, e(0, 1));
    heap.remove_edge(top);

    assert_eq!(heap.unprocessed_count(), 3);
    let next = heap.max_forbid_edge().unwrap();
    assert_eq!(next, e(0, 2));
    assert_eq!(heap.forbid_cost(next), Cost::Live(2.0));
    assert_eq!(heap.forbid_cost(top), Cost::Removed);
    assert_eq!(heap.perm_cost(top), Cost::Removed);
    assert!(heap.validate_heaps().is_ok());
}

#[test]
fn removal_is_idempotent() {
    let g = four_node_graph();
    let mut once = init(&g);
    once.remove_edge(e(1, 2));
    let mut twice = once.clone();
    twice.remove_edge(e(1, 2));
    twice.remove_rank(g.find_index(e(1, 2)));

    assert_eq!(once.snapshot(), twice.snapshot());
    assert_eq!(twice.unprocessed_count(), 3);
    assert_eq!(
        once.heap(Dimension::Forbid).iter().collect::<Vec<_>>(),
        twice.heap(Dimension::Forbid).iter().collect::<Vec<_>>()
    );
}

#[test]
fn rank_zero_is_ignored_by_mutations() {
    let g = four_node_graph();
    let mut heap = init(&g);
    let before = heap.snapshot();

    heap.remove_rank(0);
    heap.remove_edge(e(0, 3));
    heap.increase_forbid_cost(e(1, 3), 10.0);
    heap.merge_edges(e(0, 3), e(0, 1));

    assert_eq!(heap.snapshot(), before);
}

#[test]
fn rank_zero_lookups_report_and_fall_back() {
    let g = four_node_graph();
    let heap = init(&g);
    assert_eq!(heap.forbid_cost(e(0, 3)), Cost::Removed);
    assert_eq!(heap.perm_cost(e(1, 3)), Cost::Removed);
    assert_eq!(
        heap.diagnostics(),
        vec![
            Diagnostic::RankZeroAccess {
                operation: "forbid_cost"
            },
            Diagnostic::RankZeroAccess {
                operation: "perm_cost"
            },
        ]
    );
}

#[test]
fn diagnostics_can_be_drained_or_disabled() {
    let g = four_node_graph();
    let mut heap = init(&g);
    heap.forbid_cost(e(0, 3));
    assert_eq!(heap.take_diagnostics().len(), 1);
    assert!(heap.diagnostics().is_empty());

    let mut quiet = EdgeHeap::new(
        &g,
        EngineOptions {
            record_diagnostics: false,
            ..Default::default()
        },
    );
    quiet.init_induced_costs().unwrap();
    assert_eq!(quiet.forbid_cost(e(0, 3)), Cost::Removed);
    assert!(quiet.diagnostics().is_empty());
}

#[test]
fn increases_resift_and_clamp_at_zero() {
    let g = four_node_graph();
    let mut heap = init(&g);

    heap.increase_forbid_cost(e(2, 3), 10.0);
    assert_eq!(heap.max_forbid_edge(), Some(e(2, 3)));
    assert_eq!(heap.forbid_cost(e(2, 3)), Cost::Live(11.0));
    assert!(heap.validate_heaps().is_ok());

    heap.increase_forbid_cost(e(2, 3), -100.0);
    assert_eq!(heap.forbid_cost(e(2, 3)), Cost::Live(0.0));
    assert_eq!(heap.max_forbid_edge(), Some(e(0, 1)));
    assert!(heap.validate_heaps().is_ok());

    heap.increase_perm_cost(e(1, 2), 0.5);
    assert_eq!(heap.perm_cost(e(1, 2)), Cost::Live(1.5));
    assert_eq!(heap.max_perm_edge(), Some(e(1, 2)));

    heap.increase_perm_cost(e(1, 2), 0.0);
    assert_eq!(heap.perm_cost(e(1, 2)), Cost::Live(1.5));
    assert!(heap.validate_heaps().is_ok());
}

#[test]
fn increases_do_not_revive_removed_entries() {
    let g = four_node_graph();
    let mut heap = init(&g);
    heap.remove_edge(e(0, 1));
    heap.increase_forbid_cost(e(0, 1), 50.0);
    heap.increase_perm_cost(e(0, 1), 50.0);
    assert_eq!(heap.forbid_cost(e(0, 1)), Cost::Removed);
    assert_ne!(heap.max_forbid_edge(), Some(e(0, 1)));
    assert_eq!(heap.unprocessed_count(), 3);
}

#[test]
fn merge_sums_costs_into_the_surviving_bundle() {
    let g = four_node_graph();
    let mut heap = init(&g);

    heap.merge_edges(e(0, 1), e(0, 2));

    let survivor = g.find_index(e(0, 2));
    assert_eq!(heap.bundle_of(e(0, 1)), Some(survivor));
    assert_eq!(heap.bundle_of(e(0, 2)), Some(survivor));
    assert_eq!(heap.bundle_members(e(0, 1)), &[2, 1]);

    assert_eq!(heap.forbid_cost(e(0, 1)), Cost::Live(5.0));
    assert_eq!(heap.forbid_cost(e(0, 2)), Cost::Live(5.0));
    assert_eq!(heap.perm_cost(e(0, 1)), Cost::Live(2.0));

    assert_eq!(heap.max_forbid_edge(), Some(e(0, 2)));
    assert_eq!(heap.max_perm_edge(), Some(e(0, 2)));
    assert_eq!(heap.heap(Dimension::Forbid).position(survivor), Some(0));
    assert_eq!(heap.heap(Dimension::Permanent).position(survivor), Some(0));

    // The absorbed entry left both heaps' contention.
    let absorbed = g.find_index(e(0, 1));
    assert_eq!(
        heap.cost_of_rank(Dimension::Forbid, absorbed),
        Cost::Removed
    );
    assert_eq!(heap.unprocessed_count(), 3);
    assert!(heap.validate_heaps().is_ok());
    assert!(heap.diagnostics().is_empty());
}

#[test]
fn merge_is_idempotent_within_a_bundle() {
    let g = four_node_graph();
    let mut heap = init(&g);
    heap.merge_edges(e(0, 1), e(0, 2));
    let before = heap.snapshot();

    heap.merge_edges(e(0, 1), e(0, 2));
    heap.merge_edges(e(2, 0), e(1, 0));
    heap.merge_edges(e(0, 1), e(0, 1));

    assert_eq!(heap.snapshot(), before);
}

#[test]
fn merging_with_a_removed_entry_is_reported_not_summed() {
    let g = four_node_graph();
    let mut heap = init(&g);
    heap.remove_edge(e(0, 1));

    heap.merge_edges(e(0, 1), e(0, 2));

    assert_eq!(heap.forbid_cost(e(0, 2)), Cost::Live(2.0));
    assert_eq!(heap.perm_cost(e(0, 2)), Cost::Live(1.0));
    assert_eq!(heap.unprocessed_count(), 3);
    assert_eq!(
        heap.diagnostics(),
        vec![
            Diagnostic::MergeWithRemoved {
                dimension: Dimension::Forbid,
                survivor: 2,
                absorbed: 1,
                removed_side: MergeSide::Absorbed,
            },
            Diagnostic::MergeWithRemoved {
                dimension: Dimension::Permanent,
                survivor: 2,
                absorbed: 1,
                removed_side: MergeSide::Absorbed,
            },
        ]
    );
    assert!(heap.validate_heaps().is_ok());
}

#[test]
fn merging_into_a_removed_survivor_keeps_it_removed() {
    let g = four_node_graph();
    let mut heap = init(&g);
    heap.remove_edge(e(2, 3));

    // Equal sizes: the bundle of the second edge survives.
    heap.merge_edges(e(0, 1), e(2, 3));

    assert_eq!(heap.forbid_cost(e(0, 1)), Cost::Removed);
    assert_eq!(heap.unprocessed_count(), 2);
    assert!(heap.diagnostics().iter().all(|d| matches!(
        d,
        Diagnostic::MergeWithRemoved {
            removed_side: MergeSide::Survivor,
            ..
        }
    )));
    assert_eq!(heap.max_forbid_edge(), Some(e(0, 2)));
    assert!(heap.validate_heaps().is_ok());
}

#[test]
fn removing_any_member_removes_the_whole_bundle() {
    let g = four_node_graph();
    let mut heap = init(&g);
    heap.merge_edges(e(0, 1), e(0, 2));
    heap.remove_edge(e(0, 1));

    assert_eq!(heap.forbid_cost(e(0, 2)), Cost::Removed);
    assert_eq!(heap.unprocessed_count(), 2);
    assert_eq!(heap.max_forbid_edge(), Some(e(1, 2)));
    assert!(heap.validate_heaps().is_ok());
}

#[test]
fn exhausted_heaps_report_no_edge() {
    let g = StaticSparseGraph::from_weighted_edges(2, [(0, 1, -2.0)]).unwrap();
    let mut heap = init(&g);

    // icf is zero: nothing worth forbidding.
    assert_eq!(heap.max_forbid_edge(), None);
    assert_eq!(heap.max_perm_edge(), Some(e(0, 1)));

    heap.remove_edge(e(0, 1));
    assert_eq!(heap.max_forbid_edge(), None);
    assert_eq!(heap.max_perm_edge(), None);
    assert_eq!(heap.unprocessed_count(), 0);

    let empty = StaticSparseGraph::from_weighted_edges(3, Vec::<(usize, usize, f64)>::new())
        .unwrap();
    let heap = init(&empty);
    assert!(heap.heap(Dimension::Forbid).is_empty());
    assert_eq!(heap.max_forbid_edge(), None);
    assert_eq!(heap.max_perm_edge(), None);
}

#[test]
fn fixed_edges_are_not_tracked() {
    let g = StaticSparseGraph::from_weighted_edges(
        3,
        [
            (0, 1, EdgeWeight::Permanent),
            (0, 2, EdgeWeight::Finite(3.0)),
            (1, 2, EdgeWeight::Finite(-2.0)),
        ],
    )
    .unwrap();
    let heap = init(&g);

    assert_eq!(heap.unprocessed_count(), 2);
    assert_eq!(heap.forbid_cost(e(0, 1)), Cost::Removed);
    // (0,2): delete cost 3, plus the permanent (0,1) against the absent (1,2).
    assert_eq!(heap.forbid_cost(e(0, 2)), Cost::Live(3.0));
    assert_eq!(heap.perm_cost(e(0, 2)), Cost::Live(2.0));
    // (1,2): insert cost 2, plus the permanent (0,1) next to the present (0,2).
    assert_eq!(heap.forbid_cost(e(1, 2)), Cost::Live(3.0));
    assert_eq!(heap.perm_cost(e(1, 2)), Cost::Live(2.0));
    assert!(heap.validate_heaps().is_ok());
}

#[test]
fn nan_costs_are_reported_once_per_column() {
    let g = StaticSparseGraph::from_weighted_edges(
        3,
        [(0, 1, f64::NAN), (0, 2, 1.0), (1, 2, 1.0)],
    )
    .unwrap();
    let heap = init(&g);
    assert_eq!(
        heap.diagnostics(),
        vec![Diagnostic::NanCost {
            dimension: Dimension::Permanent,
            rank: 1
        }]
    );
    assert_eq!(heap.unprocessed_count(), 3);
}

#[test]
fn clones_are_independent_snapshots() {
    let g = four_node_graph();
    let heap = init(&g);
    let mut branch = heap.clone();

    branch.remove_edge(e(0, 1));
    branch.merge_edges(e(1, 2), e(0, 2));

    assert_eq!(heap.unprocessed_count(), 4);
    assert_eq!(heap.max_forbid_edge(), Some(e(0, 1)));
    assert_eq!(heap.forbid_cost(e(1, 2)), Cost::Live(2.0));
    assert_eq!(branch.unprocessed_count(), 2);
}

#[test]
fn verbosity_does_not_change_results() {
    let g = four_node_graph();
    let run = |verbosity: u8| {
        let mut heap = EdgeHeap::new(
            &g,
            EngineOptions {
                verbosity,
                ..Default::default()
            },
        );
        heap.init_induced_costs().unwrap();
        heap.merge_edges(e(0, 1), e(1, 2));
        heap.increase_perm_cost(e(2, 3), 4.0);
        let top = heap.max_forbid_edge();
        heap.remove_edge(e(2, 3));
        (top, heap.max_perm_edge(), heap.snapshot())
    };
    assert_eq!(run(0), run(6));
    assert_eq!(run(4), run(6));
}

#[test]
fn snapshot_serializes_tagged_costs() {
    let g = four_node_graph();
    let mut heap = init(&g);
    heap.remove_edge(e(2, 3));

    let json = serde_json::to_value(heap.snapshot()).unwrap();
    assert_eq!(json["unprocessed"], 3);
    assert_eq!(json["entries"][0]["edge"], serde_json::json!({ "u": 0, "v": 1 }));
    assert_eq!(json["entries"][0]["icf"], serde_json::json!({ "Live": 3.0 }));
    assert_eq!(json["entries"][3]["icp"], serde_json::json!("Removed"));

    let diag = serde_json::to_value(Diagnostic::RankZeroAccess {
        operation: "perm_cost",
    })
    .unwrap();
    assert_eq!(
        diag,
        serde_json::json!({ "kind": "rank_zero_access", "operation": "perm_cost" })
    );
}
