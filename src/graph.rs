//! The graph engine: `GraphView`, its nodes and edges, and typed traversal.
//!
//! Modeled after the teacher crate's petgraph-backed `ContextGraph` (the
//! `context_graph_v2` design): a [`petgraph::stable_graph::StableDiGraph`]
//! does the heavy lifting (storage, algorithms), while an id<->index map on
//! either side gives callers the stable, monotonic [`NodeId`]/[`EdgeId`]
//! identity the specification calls for instead of petgraph's own reusable
//! indices.

use std::collections::HashSet;

use indexmap::IndexMap;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::Direction;

use crate::attributes::DynamicAttributes;
use crate::error::{GraphError, GraphResult};
use crate::ids::{EdgeId, GraphId, NodeId};
use crate::literal::LeafValue;
use crate::traits::TraitKind;
use crate::units::Unit;

/// The concrete payload every node in a [`GraphView`] carries. This is the
/// closed set the core understands; it deliberately covers exactly the
/// node kinds named in the specification's data model (§3) rather than
/// being open to arbitrary caller types, since the viewer/CLI/KiCad glue
/// that would need that openness is out of scope for this core.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeBody {
    /// The `GraphView`'s own self node, letting graph metadata be
    /// expressed in graph form.
    SelfNode,
    /// A leaf literal (`String`, `Numeric`, `NumericInterval`, `Count`,
    /// `Boolean`, `EnumValue`).
    Leaf(LeafValue),
    /// A set-container marker node (`Strings`, `Counts`, `Booleans`,
    /// `AbstractEnums`, `NumericSet`). Its elements are composition
    /// children.
    SetContainer(SetContainerKind),
    /// A `Numbers` node: pointer children carry its `NumericSet` and
    /// optional unit.
    Numbers,
    /// An `is_unit` trait holder's payload.
    Unit(Unit),
    /// A trait-child node, tagging its holder with a capability.
    Trait(TraitKind),
    /// An expression operator node (see [`crate::expr::ExprKind`]).
    Expr(crate::expr::ExprKind),
    /// The root of a subtree instantiated from a [`crate::typegraph::TypeGraph`]
    /// schema, tagged with the type identifier it was instantiated from.
    TypeInstance(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetContainerKind {
    Strings,
    Counts,
    Booleans,
    AbstractEnums,
    NumericSet,
}

/// The small closed set of edge kinds the core understands. `Custom`
/// reserves a namespace for caller-defined edge types without requiring
/// the core to know what they mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    Composition,
    Pointer,
    Trait,
    Custom(u32),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub body: NodeBody,
    pub attrs: DynamicAttributes,
}

impl Node {
    pub fn new(body: NodeBody) -> Self {
        Self {
            id: NodeId::new(),
            body,
            attrs: DynamicAttributes::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub kind: EdgeKind,
    pub directional: Option<bool>,
    pub name: Option<String>,
    pub attrs: DynamicAttributes,
}

impl Edge {
    pub fn new(source: NodeId, target: NodeId, kind: EdgeKind) -> Self {
        Self {
            id: EdgeId::new(),
            source,
            target,
            kind,
            directional: None,
            name: None,
            attrs: DynamicAttributes::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A `(node, owning view)` pair: the only shape through which traversal
/// APIs are invoked. Unlike a borrow, this is a cheap `Copy` handle — the
/// view is looked up by id on every call, so a stale reference from a
/// destroyed view simply fails lookups rather than dangling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundNodeRef {
    pub id: NodeId,
    pub graph_id: GraphId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundEdgeRef {
    pub id: EdgeId,
    pub graph_id: GraphId,
}

/// What a visitor callback returns, per the specification's callback
/// contract.
pub enum VisitControl {
    Continue,
    Stop,
    Error(GraphError),
}

/// The owning container: nodes, edges, and a self node.
pub struct GraphView {
    pub id: GraphId,
    graph: StableDiGraph<Node, Edge>,
    node_index: IndexMap<NodeId, NodeIndex>,
    edge_index: IndexMap<EdgeId, EdgeIndex>,
    self_node: NodeId,
}

impl GraphView {
    pub fn new() -> Self {
        let mut graph = StableDiGraph::new();
        let mut node_index = IndexMap::new();
        let self_entry = Node::new(NodeBody::SelfNode);
        let self_node = self_entry.id;
        let idx = graph.add_node(self_entry);
        node_index.insert(self_node, idx);
        Self {
            id: GraphId::new(),
            graph,
            node_index,
            edge_index: IndexMap::new(),
            self_node,
        }
    }

    pub fn self_node(&self) -> BoundNodeRef {
        BoundNodeRef { id: self.self_node, graph_id: self.id }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Adds `node` to this view. Fails if a node with the same id is
    /// already present (re-inserting the same `Node` value twice).
    pub fn insert_node(&mut self, node: Node) -> GraphResult<BoundNodeRef> {
        if self.node_index.contains_key(&node.id) {
            return Err(GraphError::NodeAlreadyBound(node.id));
        }
        let id = node.id;
        let idx = self.graph.add_node(node);
        self.node_index.insert(id, idx);
        tracing::trace!(graph = %self.id, node = %id, "inserted node");
        Ok(BoundNodeRef { id, graph_id: self.id })
    }

    /// Returns a bound reference to `id` without re-inserting, asserting
    /// that `id` is already a member of this view (used internally for the
    /// self node; exposed for callers stitching together handles they
    /// already know are bound).
    pub fn bind(&self, id: NodeId) -> GraphResult<BoundNodeRef> {
        if self.node_index.contains_key(&id) {
            Ok(BoundNodeRef { id, graph_id: self.id })
        } else {
            Err(GraphError::NodeNotFound(id))
        }
    }

    pub fn insert_edge(&mut self, edge: Edge) -> GraphResult<BoundEdgeRef> {
        let source_idx = *self
            .node_index
            .get(&edge.source)
            .ok_or(GraphError::SourceNodeNotInGraph(edge.source))?;
        let target_idx = *self
            .node_index
            .get(&edge.target)
            .ok_or(GraphError::TargetNodeNotInGraph(edge.target))?;

        if edge.kind == EdgeKind::Composition {
            self.check_composition_forest(edge.target)?;
        }

        let id = edge.id;
        let idx = self.graph.add_edge(source_idx, target_idx, edge);
        self.edge_index.insert(id, idx);
        tracing::trace!(graph = %self.id, edge = %id, "inserted edge");
        Ok(BoundEdgeRef { id, graph_id: self.id })
    }

    /// Invariant 2: composition edges form a forest, so a node may have at
    /// most one composition parent.
    fn check_composition_forest(&self, child: NodeId) -> GraphResult<()> {
        let child_idx = self.node_index[&child];
        let existing_parent = self
            .graph
            .edges_directed(child_idx, Direction::Incoming)
            .any(|e| e.weight().kind == EdgeKind::Composition);
        if existing_parent {
            return Err(GraphError::CompositionCycle);
        }
        Ok(())
    }

    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.node_index.get(&id).and_then(|idx| self.graph.node_weight(*idx))
    }

    pub fn get_node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let idx = *self.node_index.get(&id)?;
        self.graph.node_weight_mut(idx)
    }

    pub fn get_edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edge_index.get(&id).and_then(|idx| self.graph.edge_weight(*idx))
    }

    /// All nodes currently in the view, in insertion order.
    pub fn get_nodes(&self) -> impl Iterator<Item = &Node> {
        self.node_index.values().filter_map(move |idx| self.graph.node_weight(*idx))
    }

    pub fn get_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edge_index.values().filter_map(move |idx| self.graph.edge_weight(*idx))
    }

    /// Enumerates bound edges incident to `start` with `edge_type == kind`,
    /// in insertion order. `directed = Some(true)` follows only out-edges,
    /// `Some(false)` only in-edges, `None` both.
    pub fn visit_edges_of_type(
        &self,
        start: NodeId,
        kind: EdgeKind,
        directed: Option<bool>,
        mut cb: impl FnMut(&Edge, NodeId) -> VisitControl,
    ) -> GraphResult<()> {
        let Some(&idx) = self.node_index.get(&start) else {
            return Err(GraphError::NodeNotFound(start));
        };

        let mut candidates: Vec<&Edge> = Vec::new();
        if directed != Some(false) {
            for e in self.graph.edges_directed(idx, Direction::Outgoing) {
                candidates.push(e.weight());
            }
        }
        if directed != Some(true) {
            for e in self.graph.edges_directed(idx, Direction::Incoming) {
                candidates.push(e.weight());
            }
        }
        // Preserve global insertion order for tie-break stability.
        candidates.sort_by_key(|e| e.id);

        for edge in candidates {
            if edge.kind != kind {
                continue;
            }
            let other = if edge.source == start { edge.target } else { edge.source };
            match cb(edge, other) {
                VisitControl::Continue => {}
                VisitControl::Stop => return Ok(()),
                VisitControl::Error(e) => return Err(GraphError::CallbackError(Box::new(e))),
            }
        }
        Ok(())
    }

    pub fn visit_children_edges(&self, parent: NodeId, cb: impl FnMut(&Edge, NodeId) -> VisitControl) -> GraphResult<()> {
        self.visit_edges_of_type(parent, EdgeKind::Composition, Some(true), cb)
    }

    pub fn visit_operand_edges(&self, node: NodeId, cb: impl FnMut(&Edge, NodeId) -> VisitControl) -> GraphResult<()> {
        self.visit_edges_of_type(node, EdgeKind::Pointer, Some(true), cb)
    }

    /// The single composition child reached via an out-edge named `name`
    /// (used for expression operand slots like `operand`, `base_ptr`, …).
    pub fn named_pointer(&self, node: NodeId, name: &str) -> Option<NodeId> {
        let mut found = None;
        let _ = self.visit_edges_of_type(node, EdgeKind::Pointer, Some(true), |edge, target| {
            if edge.name.as_deref() == Some(name) {
                found = Some(target);
                VisitControl::Stop
            } else {
                VisitControl::Continue
            }
        });
        found
    }

    pub fn children(&self, parent: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let _ = self.visit_children_edges(parent, |_, target| {
            out.push(target);
            VisitControl::Continue
        });
        out
    }

    /// Returns a new view containing clones of the listed nodes and every
    /// edge whose endpoints are both in the list.
    pub fn get_subgraph_from_nodes(&self, nodes: &[NodeId]) -> GraphView {
        let wanted: HashSet<NodeId> = nodes.iter().copied().collect();
        let mut out = GraphView::new();
        for id in nodes {
            if let Some(n) = self.get_node(*id) {
                let mut clone = n.clone();
                clone.id = n.id;
                let _ = out.graph.add_node(clone);
            }
        }
        // Rebuild the index map after manual inserts (bypassing insert_node
        // so we keep the original ids rather than minting fresh ones).
        out.node_index.clear();
        for idx in out.graph.node_indices() {
            let id = out.graph[idx].id;
            out.node_index.insert(id, idx);
        }
        for e in self.get_edges() {
            if wanted.contains(&e.source) && wanted.contains(&e.target) {
                let _ = out.insert_edge(e.clone());
            }
        }
        out
    }

    /// Splices `other`'s nodes and edges into `self`, draining `other`.
    pub fn insert_subgraph(&mut self, other: GraphView) -> GraphResult<()> {
        // Edge weights already carry their own source/target `NodeId`s
        // (independent of petgraph's indices), so re-inserting them into
        // `self` doesn't need `other`'s index space at all.
        let edges: Vec<Edge> = other.graph.edge_weights().cloned().collect();
        let nodes: Vec<Node> = other.graph.node_weights().cloned().collect();

        for n in nodes {
            if n.body == NodeBody::SelfNode {
                continue;
            }
            self.insert_node(n)?;
        }
        for e in edges {
            self.insert_edge(e)?;
        }
        Ok(())
    }
}

impl Default for GraphView {
    fn default() -> Self {
        Self::new()
    }
}
