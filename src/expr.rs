//! Expression DAG: operator nodes that reference operand pointers instead
//! of evaluating eagerly (§4.8). Each `setup_*` wires the operand
//! pointer(s) for one operator and returns the new node's bound reference;
//! evaluation is the caller's job, walking the pointers back out with
//! [`GraphView::visit_operand_edges`] or [`GraphView::named_pointer`].

use crate::error::{GraphError, GraphResult};
use crate::graph::{BoundNodeRef, Edge, EdgeKind, GraphView, Node, NodeBody, VisitControl};
use crate::ids::NodeId;
use crate::numbers::Numbers;
use crate::traits::{self, TraitKind};

/// The operators named in §2/§3. `IsSubset` is a predicate rather than a
/// value-producing operator; it is still `can_be_operand` so predicates can
/// themselves be combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprKind {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Sqrt,
    Log,
    Sin,
    Cos,
    Negate,
    Round,
    Abs,
    Floor,
    Ceil,
    IsSubset,
}

const SLOT_OPERAND: &str = "operand";
const SLOT_MINUEND: &str = "minuend";
const SLOT_SUBTRAHEND: &str = "subtrahend";
const SLOT_NUMERATOR: &str = "numerator";
const SLOT_DENOMINATOR: &str = "denominator";
const SLOT_BASE: &str = "base_ptr";
const SLOT_EXPONENT: &str = "exponent_ptr";
const SLOT_ZBASE: &str = "zbase";
const SLOT_SUBSET: &str = "subset_ref";
const SLOT_SUPERSET: &str = "superset_ref";

fn new_expr_node(graph: &mut GraphView, kind: ExprKind) -> GraphResult<BoundNodeRef> {
    let node = graph.insert_node(Node::new(NodeBody::Expr(kind)))?;
    traits::attach_trait(graph, node.id, TraitKind::IsExpression)?;
    traits::attach_trait(graph, node.id, TraitKind::CanBeOperand)?;
    Ok(node)
}

fn wire_operand(graph: &mut GraphView, expr: NodeId, slot: &str, operand: NodeId) -> GraphResult<()> {
    if !traits::has_trait(graph, operand, TraitKind::CanBeOperand)? {
        return Err(GraphError::IncompatibleTypes);
    }
    graph.insert_edge(Edge::new(expr, operand, EdgeKind::Pointer).named(slot))?;
    Ok(())
}

/// A unary operator (`Sqrt`, `Abs`, `Negate`, `Floor`, `Ceil`, `Sin`, `Cos`)
/// wired to a single `operand` pointer.
pub fn setup_unary(graph: &mut GraphView, kind: ExprKind, operand: NodeId) -> GraphResult<BoundNodeRef> {
    let node = new_expr_node(graph, kind)?;
    wire_operand(graph, node.id, SLOT_OPERAND, operand)?;
    Ok(node)
}

/// `Round(operand, n)`: unary plus a typed digit count stamped as a dynamic
/// attribute (rounding precision is not itself an operand).
pub fn setup_round(graph: &mut GraphView, operand: NodeId, digits: i64) -> GraphResult<BoundNodeRef> {
    let node = new_expr_node(graph, ExprKind::Round)?;
    wire_operand(graph, node.id, SLOT_OPERAND, operand)?;
    graph.get_node_mut(node.id).unwrap().attrs.put("digits", digits);
    Ok(node)
}

/// `Subtract(minuend, subtrahend)`.
pub fn setup_subtract(graph: &mut GraphView, minuend: NodeId, subtrahend: NodeId) -> GraphResult<BoundNodeRef> {
    let node = new_expr_node(graph, ExprKind::Subtract)?;
    wire_operand(graph, node.id, SLOT_MINUEND, minuend)?;
    wire_operand(graph, node.id, SLOT_SUBTRAHEND, subtrahend)?;
    Ok(node)
}

/// `Divide(numerator, denominator)`.
pub fn setup_divide(graph: &mut GraphView, numerator: NodeId, denominator: NodeId) -> GraphResult<BoundNodeRef> {
    let node = new_expr_node(graph, ExprKind::Divide)?;
    wire_operand(graph, node.id, SLOT_NUMERATOR, numerator)?;
    wire_operand(graph, node.id, SLOT_DENOMINATOR, denominator)?;
    Ok(node)
}

/// `Power(base, exponent)`.
pub fn setup_power(graph: &mut GraphView, base: NodeId, exponent: NodeId) -> GraphResult<BoundNodeRef> {
    let node = new_expr_node(graph, ExprKind::Power)?;
    wire_operand(graph, node.id, SLOT_BASE, base)?;
    wire_operand(graph, node.id, SLOT_EXPONENT, exponent)?;
    Ok(node)
}

/// `Log(operand, base?)`. When `base` is absent, a fresh `Numbers` singleton
/// of *e* is inserted into the same view and pointed to by `zbase` — per
/// §4.8/§9(3), an implementation may instead stash the base as a typed
/// attribute, but must behave identically to this allocating form.
pub fn setup_log(graph: &mut GraphView, operand: NodeId, base: Option<NodeId>) -> GraphResult<BoundNodeRef> {
    let node = new_expr_node(graph, ExprKind::Log)?;
    wire_operand(graph, node.id, SLOT_OPERAND, operand)?;
    let base_id = match base {
        Some(id) => id,
        None => {
            let e_node = insert_numbers_literal(graph, Numbers::singleton(std::f64::consts::E, None))?;
            e_node.id
        }
    };
    wire_operand(graph, node.id, SLOT_ZBASE, base_id)?;
    Ok(node)
}

/// Variadic operators (`Add`, `Multiply`): a `PointerSequenceOf(can_be_operand)`
/// modelled as one `operand` pointer edge per term, each stamped with its
/// position so traversal order matches construction order regardless of
/// the underlying edge insertion order.
pub fn setup_variadic(graph: &mut GraphView, kind: ExprKind, operands: &[NodeId]) -> GraphResult<BoundNodeRef> {
    if operands.is_empty() {
        return Err(GraphError::InvalidArgument("variadic expression needs at least one operand".to_string()));
    }
    let node = new_expr_node(graph, kind)?;
    for (i, operand) in operands.iter().enumerate() {
        if !traits::has_trait(graph, *operand, TraitKind::CanBeOperand)? {
            return Err(GraphError::IncompatibleTypes);
        }
        let mut edge = Edge::new(node.id, *operand, EdgeKind::Pointer).named(SLOT_OPERAND);
        edge.attrs.put("index", i as i64);
        graph.insert_edge(edge)?;
    }
    Ok(node)
}

pub fn setup_add(graph: &mut GraphView, operands: &[NodeId]) -> GraphResult<BoundNodeRef> {
    setup_variadic(graph, ExprKind::Add, operands)
}

pub fn setup_multiply(graph: &mut GraphView, operands: &[NodeId]) -> GraphResult<BoundNodeRef> {
    setup_variadic(graph, ExprKind::Multiply, operands)
}

/// `IsSubset(subset, superset, assert)`. When `assert` is true the instance
/// additionally carries an `is_predicate` trait.
pub fn setup_is_subset(graph: &mut GraphView, subset: NodeId, superset: NodeId, assert: bool) -> GraphResult<BoundNodeRef> {
    let node = new_expr_node(graph, ExprKind::IsSubset)?;
    wire_operand(graph, node.id, SLOT_SUBSET, subset)?;
    wire_operand(graph, node.id, SLOT_SUPERSET, superset)?;
    if assert {
        traits::attach_trait(graph, node.id, TraitKind::IsPredicate)?;
    }
    Ok(node)
}

/// The operand(s) of a variadic node, in construction order (sorted by the
/// `index` attribute each [`setup_variadic`] edge carries).
pub fn variadic_operands(graph: &GraphView, node: NodeId) -> GraphResult<Vec<NodeId>> {
    let mut pairs: Vec<(i64, NodeId)> = Vec::new();
    graph.visit_operand_edges(node, |edge, target| {
        let idx = match edge.attrs.get("index") {
            Some(crate::attributes::AttrValue::Int(i)) => *i,
            _ => 0,
        };
        pairs.push((idx, target));
        VisitControl::Continue
    })?;
    pairs.sort_by_key(|(i, _)| *i);
    Ok(pairs.into_iter().map(|(_, id)| id).collect())
}

/// Inserts a `Numbers` literal (a `NumericSet` child plus an optional unit
/// pointer) as a `can_be_operand`, `is_literal` node and returns it. Thin
/// re-export of [`crate::literal_graph::insert_numbers`] so callers wiring
/// up expressions don't need a second `use`.
pub fn insert_numbers_literal(graph: &mut GraphView, numbers: Numbers) -> GraphResult<BoundNodeRef> {
    crate::literal_graph::insert_numbers(graph, &numbers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(graph: &mut GraphView, v: f64) -> NodeId {
        insert_numbers_literal(graph, Numbers::singleton(v, None)).unwrap().id
    }

    #[test]
    fn log_without_base_allocates_e_literal() {
        let mut g = GraphView::new();
        let operand = literal(&mut g, 10.0);
        let before = g.node_count();
        let log_node = setup_log(&mut g, operand, None).unwrap();
        // two new nodes: the Log node itself and the allocated e literal
        assert_eq!(g.node_count(), before + 2);
        let zbase = g.named_pointer(log_node.id, SLOT_ZBASE).unwrap();
        assert!(traits::has_trait(&g, zbase, TraitKind::CanBeOperand).unwrap());
    }

    #[test]
    fn variadic_add_preserves_construction_order() {
        let mut g = GraphView::new();
        let a = literal(&mut g, 1.0);
        let b = literal(&mut g, 2.0);
        let c = literal(&mut g, 3.0);
        let add = setup_add(&mut g, &[a, b, c]).unwrap();
        assert_eq!(variadic_operands(&g, add.id).unwrap(), vec![a, b, c]);
    }

    #[test]
    fn is_subset_carries_predicate_trait_only_when_asserted() {
        let mut g = GraphView::new();
        let a = literal(&mut g, 1.0);
        let b = literal(&mut g, 2.0);
        let asserted = setup_is_subset(&mut g, a, b, true).unwrap();
        let unasserted = setup_is_subset(&mut g, a, b, false).unwrap();
        assert!(traits::has_trait(&g, asserted.id, TraitKind::IsPredicate).unwrap());
        assert!(!traits::has_trait(&g, unasserted.id, TraitKind::IsPredicate).unwrap());
    }

    #[test]
    fn wiring_non_operand_node_fails() {
        let mut g = GraphView::new();
        let plain = g
            .insert_node(Node::new(NodeBody::Leaf(crate::literal::LeafValue::Count(1))))
            .unwrap();
        assert_eq!(setup_unary(&mut g, ExprKind::Sqrt, plain.id), Err(GraphError::IncompatibleTypes));
    }
}
