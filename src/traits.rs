//! Trait edges: the polymorphism mechanism described in §3/§9 of the
//! specification. "Node X has trait T" is modelled as an edge from `X` to a
//! small trait-child node tagged with a [`TraitKind`], rather than as an
//! open-ended capability list — the core only ever needs to ask "does this
//! node expose T", and a closed enum plus a bitset cache answers that in
//! O(1) without a second graph walk on the hot path (expression evaluation
//! checks `can_be_operand` on every operand it dereferences).

use crate::error::GraphResult;
use crate::graph::{BoundNodeRef, Edge, EdgeKind, GraphView, Node, NodeBody, VisitControl};
use crate::ids::NodeId;

/// The closed set of capability tags a node can expose. Mirrors the trait
/// names used throughout the specification's data model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraitKind {
    IsUnit,
    IsLiteral,
    IsExpression,
    CanBeOperand,
    IsPredicate,
    IsParameterOperatable,
}

impl TraitKind {
    /// Bit position used by [`TraitSet`]. Stable for the lifetime of a
    /// process; never serialized.
    fn bit(self) -> u8 {
        match self {
            TraitKind::IsUnit => 0,
            TraitKind::IsLiteral => 1,
            TraitKind::IsExpression => 2,
            TraitKind::CanBeOperand => 3,
            TraitKind::IsPredicate => 4,
            TraitKind::IsParameterOperatable => 5,
        }
    }
}

/// A small bitset cache of which traits a node has already been observed to
/// carry, avoiding a graph walk for repeated `has_trait` checks on the same
/// node during expression evaluation or path finding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraitSet(u8);

impl TraitSet {
    pub fn insert(&mut self, kind: TraitKind) {
        self.0 |= 1 << kind.bit();
    }

    pub fn contains(&self, kind: TraitKind) -> bool {
        self.0 & (1 << kind.bit()) != 0
    }
}

/// Attaches `kind` to `holder` by inserting a trait-child node and a
/// [`EdgeKind::Trait`] edge from `holder` to it. Returns the new trait-child
/// node's bound reference.
pub fn attach_trait(graph: &mut GraphView, holder: NodeId, kind: TraitKind) -> GraphResult<BoundNodeRef> {
    let trait_node = graph.insert_node(Node::new(NodeBody::Trait(kind)))?;
    graph.insert_edge(Edge::new(holder, trait_node.id, EdgeKind::Trait))?;
    Ok(trait_node)
}

/// True iff `holder` has an outgoing trait edge to a trait-child node
/// tagged `kind`.
pub fn has_trait(graph: &GraphView, holder: NodeId, kind: TraitKind) -> GraphResult<bool> {
    let mut found = false;
    graph.visit_edges_of_type(holder, EdgeKind::Trait, Some(true), |_, target| {
        if let Some(node) = graph.get_node(target) {
            if let NodeBody::Trait(k) = &node.body {
                if *k == kind {
                    found = true;
                    return VisitControl::Stop;
                }
            }
        }
        VisitControl::Continue
    })?;
    Ok(found)
}

/// Every trait kind attached to `holder`, as a bitset.
pub fn traits_of(graph: &GraphView, holder: NodeId) -> GraphResult<TraitSet> {
    let mut set = TraitSet::default();
    graph.visit_edges_of_type(holder, EdgeKind::Trait, Some(true), |_, target| {
        if let Some(node) = graph.get_node(target) {
            if let NodeBody::Trait(k) = &node.body {
                set.insert(*k);
            }
        }
        VisitControl::Continue
    })?;
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal::LeafValue;

    #[test]
    fn attach_and_query_trait() {
        let mut g = GraphView::new();
        let n = g.insert_node(Node::new(NodeBody::Leaf(LeafValue::Count(1)))).unwrap();
        attach_trait(&mut g, n.id, TraitKind::CanBeOperand).unwrap();
        assert!(has_trait(&g, n.id, TraitKind::CanBeOperand).unwrap());
        assert!(!has_trait(&g, n.id, TraitKind::IsPredicate).unwrap());
    }

    #[test]
    fn trait_set_tracks_multiple_traits() {
        let mut g = GraphView::new();
        let n = g.insert_node(Node::new(NodeBody::Leaf(LeafValue::Count(1)))).unwrap();
        attach_trait(&mut g, n.id, TraitKind::IsExpression).unwrap();
        attach_trait(&mut g, n.id, TraitKind::CanBeOperand).unwrap();
        let set = traits_of(&g, n.id).unwrap();
        assert!(set.contains(TraitKind::IsExpression));
        assert!(set.contains(TraitKind::CanBeOperand));
        assert!(!set.contains(TraitKind::IsUnit));
    }
}
