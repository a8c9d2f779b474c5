//! Materializes the pure value types in [`crate::sets`], [`crate::numeric_set`]
//! and [`crate::numbers`] as actual graph structure: leaf nodes, set
//! containers whose children are those leaves, and `Numbers` composites
//! with a `NumericSet` pointer and an optional `unit` pointer, exactly as
//! §3's data model describes. The value types themselves stay pure (no
//! `GraphView` dependency) so the algebra in `numeric_set`/`numbers`/`sets`
//! can be unit-tested without a graph; this module is the bridge callers
//! use once they want that algebra to live in a [`GraphView`], e.g. as the
//! operand of an [`crate::expr`] node.

use crate::error::{GraphError, GraphResult};
use crate::graph::{BoundNodeRef, Edge, EdgeKind, GraphView, Node, NodeBody, SetContainerKind, VisitControl};
use crate::ids::NodeId;
use crate::literal::LeafValue;
use crate::numbers::Numbers;
use crate::numeric_set::{Interval, NumericSet};
use crate::sets::{BooleanSet, CountSet, EnumMember, EnumSet, StringSet};
use crate::traits::{self, TraitKind};
use crate::units::Unit;

const SLOT_NUMERIC_SET: &str = "numeric_set";
const SLOT_UNIT: &str = "unit";

/// Inserts `set` as a `NumericSet` container node with one `NumericInterval`
/// composition child per interval.
pub fn insert_numeric_set(graph: &mut GraphView, set: &NumericSet) -> GraphResult<BoundNodeRef> {
    let container = graph.insert_node(Node::new(NodeBody::SetContainer(SetContainerKind::NumericSet)))?;
    for iv in set.intervals() {
        let leaf = graph.insert_node(Node::new(NodeBody::Leaf(LeafValue::NumericInterval { min: iv.min, max: iv.max })))?;
        graph.insert_edge(Edge::new(container.id, leaf.id, EdgeKind::Composition))?;
    }
    Ok(container)
}

/// Reconstructs a [`NumericSet`] from a container node's composition
/// children. Children are read and re-normalized, matching the
/// specification's "reads always return the normalized form".
pub fn read_numeric_set(graph: &GraphView, container: NodeId) -> GraphResult<NumericSet> {
    let mut intervals: Vec<Interval> = Vec::new();
    let mut err = None;
    graph.visit_children_edges(container, |_, child| {
        if let Some(node) = graph.get_node(child) {
            if let NodeBody::Leaf(LeafValue::NumericInterval { min, max }) = &node.body {
                match Interval::new(*min, *max) {
                    Ok(iv) => intervals.push(iv),
                    Err(e) => {
                        err = Some(e);
                        return VisitControl::Stop;
                    }
                }
            }
        }
        VisitControl::Continue
    })?;
    if let Some(e) = err {
        return Err(e);
    }
    Ok(NumericSet::setup_from_intervals(intervals))
}

/// Inserts `unit` as an `is_unit` trait holder.
pub fn insert_unit(graph: &mut GraphView, unit: Unit) -> GraphResult<BoundNodeRef> {
    let node = graph.insert_node(Node::new(NodeBody::Unit(unit)))?;
    traits::attach_trait(graph, node.id, TraitKind::IsUnit)?;
    Ok(node)
}

pub fn read_unit(graph: &GraphView, node: NodeId) -> Option<Unit> {
    match graph.get_node(node).map(|n| &n.body) {
        Some(NodeBody::Unit(u)) => Some(*u),
        _ => None,
    }
}

/// Inserts a full `Numbers` composite: the `Numbers` node itself, its
/// `numeric_set` pointer child, and (if present) its `unit` pointer child.
/// The node is stamped `is_literal` and `can_be_operand` so it can be used
/// directly as an expression operand.
pub fn insert_numbers(graph: &mut GraphView, numbers: &Numbers) -> GraphResult<BoundNodeRef> {
    let node = graph.insert_node(Node::new(NodeBody::Numbers))?;
    let set_node = insert_numeric_set(graph, &numbers.set)?;
    graph.insert_edge(Edge::new(node.id, set_node.id, EdgeKind::Pointer).named(SLOT_NUMERIC_SET))?;
    if let Some(unit) = numbers.unit {
        let unit_node = insert_unit(graph, unit)?;
        graph.insert_edge(Edge::new(node.id, unit_node.id, EdgeKind::Pointer).named(SLOT_UNIT))?;
    }
    traits::attach_trait(graph, node.id, TraitKind::IsLiteral)?;
    traits::attach_trait(graph, node.id, TraitKind::CanBeOperand)?;
    Ok(node)
}

/// Reconstructs a [`Numbers`] value by reading a `Numbers` node's
/// `numeric_set` and optional `unit` pointer children.
///
/// Invariant 4: a `Numbers` object's `NumericSet` pointer is always bound.
pub fn read_numbers(graph: &GraphView, node: NodeId) -> GraphResult<Numbers> {
    let set_id = graph
        .named_pointer(node, SLOT_NUMERIC_SET)
        .ok_or_else(|| GraphError::InvalidArgument("Numbers node missing its numeric_set pointer".to_string()))?;
    let set = read_numeric_set(graph, set_id)?;
    let unit = graph.named_pointer(node, SLOT_UNIT).and_then(|id| read_unit(graph, id));
    Ok(Numbers::new(set, unit))
}

macro_rules! insert_discrete_set {
    ($fn_name:ident, $read_name:ident, $container_kind:expr, $set_ty:ty, $leaf_ctor:expr, $leaf_match:pat => $leaf_extract:expr) => {
        pub fn $fn_name(graph: &mut GraphView, set: &$set_ty) -> GraphResult<BoundNodeRef> {
            let container = graph.insert_node(Node::new(NodeBody::SetContainer($container_kind)))?;
            for v in set.values() {
                let leaf = graph.insert_node(Node::new($leaf_ctor(v.clone())))?;
                graph.insert_edge(Edge::new(container.id, leaf.id, EdgeKind::Composition))?;
            }
            Ok(container)
        }

        pub fn $read_name(graph: &GraphView, container: NodeId) -> GraphResult<$set_ty> {
            let mut values = Vec::new();
            graph.visit_children_edges(container, |_, child| {
                if let Some(node) = graph.get_node(child) {
                    if let $leaf_match = &node.body {
                        values.push($leaf_extract);
                    }
                }
                VisitControl::Continue
            })?;
            Ok(<$set_ty>::new(values))
        }
    };
}

insert_discrete_set!(
    insert_strings, read_strings, SetContainerKind::Strings, StringSet,
    |v: String| NodeBody::Leaf(LeafValue::String(v)),
    NodeBody::Leaf(LeafValue::String(s)) => s.clone()
);

insert_discrete_set!(
    insert_counts, read_counts, SetContainerKind::Counts, CountSet,
    |v: i64| NodeBody::Leaf(LeafValue::Count(v)),
    NodeBody::Leaf(LeafValue::Count(c)) => *c
);

insert_discrete_set!(
    insert_booleans, read_booleans, SetContainerKind::Booleans, BooleanSet,
    |v: bool| NodeBody::Leaf(LeafValue::Boolean(v)),
    NodeBody::Leaf(LeafValue::Boolean(b)) => *b
);

insert_discrete_set!(
    insert_abstract_enums, read_abstract_enums, SetContainerKind::AbstractEnums, EnumSet,
    |v: EnumMember| NodeBody::Leaf(LeafValue::EnumValue { name: v.name, value: v.value }),
    NodeBody::Leaf(LeafValue::EnumValue { name, value }) => EnumMember { name: name.clone(), value: value.clone() }
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::known::VOLT;

    #[test]
    fn numbers_round_trips_through_the_graph() {
        let mut g = GraphView::new();
        let numbers = Numbers::singleton(5.0, Some(VOLT));
        let node = insert_numbers(&mut g, &numbers).unwrap();
        let back = read_numbers(&g, node.id).unwrap();
        assert_eq!(back.get_single().unwrap(), 5.0);
        assert_eq!(back.unit.unwrap().basis, VOLT.basis);
    }

    #[test]
    fn numeric_set_with_multiple_intervals_round_trips() {
        let mut g = GraphView::new();
        let set = NumericSet::setup_from_values([(0.0, 1.0), (5.0, 6.0)]).unwrap();
        let node = insert_numeric_set(&mut g, &set).unwrap();
        let back = read_numeric_set(&g, node.id).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn strings_round_trip_deduplicated_and_sorted() {
        let mut g = GraphView::new();
        let set = StringSet::new(["b".to_string(), "a".to_string(), "a".to_string()]);
        let node = insert_strings(&mut g, &set).unwrap();
        let back = read_strings(&g, node.id).unwrap();
        assert_eq!(back, set);
    }
}
