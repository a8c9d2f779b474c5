//! Integration tests for the end-to-end scenarios in the specification's
//! "testable properties" section: interval merging, unit-checked
//! arithmetic, commensurability guards, pretty-printing, set uncertainty,
//! and BFS split/join.

use pretty_assertions::assert_eq;

use paramgraph::expr;
use paramgraph::graph::{Edge, EdgeKind, GraphView, Node, NodeBody};
use paramgraph::literal::LeafValue;
use paramgraph::literal_graph;
use paramgraph::numbers::Numbers;
use paramgraph::numeric_set::NumericSet;
use paramgraph::pathfinder::PathFinder;
use paramgraph::sets::BooleanSet;
use paramgraph::units::known::{AMPERE, OHM, SECOND, VOLT};
use paramgraph::{GraphError, GraphResult};

#[test]
fn scenario_1_interval_merge() {
    let s = NumericSet::setup_from_values([(0.0, 1.0), (0.5, 3.0)]).unwrap();
    assert_eq!(s.intervals().len(), 1);
    assert_eq!(s.intervals()[0].min, 0.0);
    assert_eq!(s.intervals()[0].max, 3.0);
}

#[test]
fn scenario_2_multiply_with_units() {
    let v = Numbers::singleton(2.0, Some(VOLT));
    let a = Numbers::singleton(3.0, Some(AMPERE));
    let w = v.mul(&a);
    assert_eq!(w.get_single().unwrap(), 6.0);
    // basis (1,2,-3,0,0,0,0) is Watt.
    assert_eq!(w.unit.unwrap().basis, [1, 2, -3, 0, 0, 0, 0]);
}

#[test]
fn scenario_3_commensurability_guard() {
    let v = Numbers::singleton(1.0, Some(VOLT));
    let s = Numbers::singleton(1.0, Some(SECOND));
    let result: GraphResult<Numbers> = v.intersect(&s);
    assert_eq!(result, Err(GraphError::UnitsNotCommensurable));
}

#[test]
fn scenario_4_unit_conversion_preserved() {
    use paramgraph::units::known::MILLIVOLT;
    let v = Numbers::singleton(1.0, Some(VOLT));
    let mv = Numbers::singleton(500.0, Some(MILLIVOLT));
    let sum = v.add(&mv).unwrap();
    assert!((sum.get_single().unwrap() - 1.5).abs() < 1e-9);
}

#[test]
fn scenario_5_division_crossing_zero() {
    let a = Numbers::new(NumericSet::setup_from_values([(1.0, 2.0)]).unwrap(), None);
    let b = Numbers::new(NumericSet::setup_from_values([(-1.0, 1.0)]).unwrap(), None);
    let r = a.div(&b);
    assert!(r.set.is_unbounded());
}

#[test]
fn scenario_6_pretty_print_uses_range_not_brackets() {
    let v = Numbers::new(NumericSet::setup_from_values([(0.9, 1.1)]).unwrap(), Some(VOLT));
    let a = Numbers::new(NumericSet::setup_from_values([(1.8, 2.2)]).unwrap(), Some(AMPERE));
    let text = v.mul(&a).pretty_str();
    assert!(text.contains('W'));
    assert!(!text.contains('['));
}

#[test]
fn scenario_7_set_uncertainty_overlap_but_not_matching() {
    let t = BooleanSet::new([true]);
    let both = BooleanSet::new([false, true]);
    assert_eq!(t.uncertainty_equals(&both), BooleanSet::new([false, true]));
}

#[test]
fn scenario_8_bfs_split_join_with_conditional_link() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let mut g = GraphView::new();
    let s = g.insert_node(Node::new(NodeBody::Leaf(LeafValue::Count(0)))).unwrap();
    let m = g.insert_node(Node::new(NodeBody::Leaf(LeafValue::Count(1)))).unwrap();
    let c1 = g.insert_node(Node::new(NodeBody::Leaf(LeafValue::Count(2)))).unwrap();
    let c2 = g.insert_node(Node::new(NodeBody::Leaf(LeafValue::Count(3)))).unwrap();
    let d = g.insert_node(Node::new(NodeBody::Leaf(LeafValue::Count(4)))).unwrap();

    g.insert_edge(Edge::new(s.id, m.id, EdgeKind::Pointer)).unwrap();
    g.insert_edge(Edge::new(m.id, c1.id, EdgeKind::Composition)).unwrap();
    g.insert_edge(Edge::new(m.id, c2.id, EdgeKind::Composition)).unwrap();
    g.insert_edge(Edge::new(c1.id, d.id, EdgeKind::Pointer)).unwrap();
    let mut conditional = Edge::new(c2.id, d.id, EdgeKind::Pointer);
    conditional.attrs.put("conditional", true);
    g.insert_edge(conditional).unwrap();

    let finder = PathFinder::new(&g);
    let (paths, counters) = finder.find_paths(s.id, &[d.id], EdgeKind::Pointer, |edge| {
        !matches!(edge.attrs.get("conditional"), Some(paramgraph::attributes::AttrValue::Bool(true)))
    });

    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].nodes, vec![s.id, m.id, c1.id, d.id]);
    assert!(paths[0].is_strong());
    assert_eq!(counters.out_stronger, 1);
}

#[test]
fn expression_dag_wires_through_to_evaluable_operands() {
    let mut g = GraphView::new();
    let a = literal_graph::insert_numbers(&mut g, &Numbers::singleton(10.0, Some(OHM))).unwrap();
    let b = literal_graph::insert_numbers(&mut g, &Numbers::singleton(4.0, Some(OHM))).unwrap();
    let sub = expr::setup_subtract(&mut g, a.id, b.id).unwrap();

    let minuend_id = g.named_pointer(sub.id, "minuend").unwrap();
    let subtrahend_id = g.named_pointer(sub.id, "subtrahend").unwrap();
    let minuend = literal_graph::read_numbers(&g, minuend_id).unwrap();
    let subtrahend = literal_graph::read_numbers(&g, subtrahend_id).unwrap();
    let result = minuend.sub(&subtrahend).unwrap();
    assert_eq!(result.get_single().unwrap(), 6.0);
}
