//! The type graph: a registry of node "types" keyed by a type-identifier
//! string, each recording a schema of composition children, operand
//! pointers, trait declarations, and typed attributes to stamp at
//! construction (§4.3, §9's "typed attribute schemas via compile-time
//! descriptors" note — here realised as a value-level [`TypeSchema`] table
//! rather than a generic `NodeKind` trait, since every concrete node kind
//! this core understands is already an enumerated [`crate::graph::NodeBody`]
//! variant).

use indexmap::IndexMap;

use crate::attributes::AttrValue;
use crate::error::{GraphError, GraphResult};
use crate::graph::{BoundNodeRef, Edge, EdgeKind, GraphView, Node, NodeBody};
use crate::ids::NodeId;
use crate::traits::{self, TraitKind};

/// One child field in a type's schema: a named composition or pointer edge
/// to a node instantiated from another registered type.
#[derive(Debug, Clone)]
pub struct ChildField {
    pub name: String,
    pub type_identifier: String,
}

impl ChildField {
    pub fn new(name: impl Into<String>, type_identifier: impl Into<String>) -> Self {
        Self { name: name.into(), type_identifier: type_identifier.into() }
    }
}

/// Everything needed to materialize one instance of a registered type: the
/// attributes stamped on the root, its composition children, its operand
/// pointers, and the traits it carries.
#[derive(Debug, Clone, Default)]
pub struct TypeSchema {
    pub class: String,
    pub attrs: Vec<(String, AttrValue)>,
    pub children: Vec<ChildField>,
    pub pointers: Vec<ChildField>,
    pub traits: Vec<TraitKind>,
}

impl TypeSchema {
    pub fn new(class: impl Into<String>) -> Self {
        Self { class: class.into(), ..Default::default() }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attrs.push((key.into(), value.into()));
        self
    }

    pub fn with_child(mut self, field: ChildField) -> Self {
        self.children.push(field);
        self
    }

    pub fn with_pointer(mut self, field: ChildField) -> Self {
        self.pointers.push(field);
        self
    }

    pub fn with_trait(mut self, kind: TraitKind) -> Self {
        self.traits.push(kind);
        self
    }
}

/// A registry of type identifiers to their instantiation schema.
/// Identifier collisions are allowed — the latest registration wins, per
/// §4.3 — though registering the same identifier twice is a caller error
/// in practice and not recommended.
#[derive(Debug, Default)]
pub struct TypeGraph {
    registry: IndexMap<String, TypeSchema>,
}

impl TypeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_type(&mut self, identifier: impl Into<String>, schema: TypeSchema) {
        self.registry.insert(identifier.into(), schema);
    }

    pub fn is_registered(&self, identifier: &str) -> bool {
        self.registry.contains_key(identifier)
    }

    /// Materializes the subgraph for `identifier` atomically into `target`:
    /// the whole tree is built in a scratch view first, and only spliced
    /// into `target` once every node in it exists, so a failure partway
    /// through (an unknown nested type identifier, say) leaves `target`
    /// untouched.
    pub fn instantiate_node(&self, identifier: &str, target: &mut GraphView) -> GraphResult<BoundNodeRef> {
        let mut scratch = GraphView::new();
        let root_id = self.instantiate_into(identifier, &mut scratch)?;
        target.insert_subgraph(scratch)?;
        target.bind(root_id)
    }

    /// Recursive worker: instantiates `identifier` and its whole schema
    /// tree inside `scratch`, returning the root's id.
    fn instantiate_into(&self, identifier: &str, scratch: &mut GraphView) -> GraphResult<NodeId> {
        let schema = self
            .registry
            .get(identifier)
            .ok_or_else(|| GraphError::UnknownType(identifier.to_string()))?;

        let root = scratch.insert_node(Node::new(NodeBody::TypeInstance(identifier.to_string())))?;
        let root_id = root.id;

        for (key, value) in &schema.attrs {
            scratch.get_node_mut(root_id).unwrap().attrs.put(key.clone(), value.clone());
        }

        for trait_kind in &schema.traits {
            traits::attach_trait(scratch, root_id, *trait_kind)?;
        }

        for field in &schema.children {
            let child_id = self.instantiate_into(&field.type_identifier, scratch)?;
            scratch.insert_edge(Edge::new(root_id, child_id, EdgeKind::Composition).named(field.name.clone()))?;
        }

        for field in &schema.pointers {
            let child_id = self.instantiate_into(&field.type_identifier, scratch)?;
            scratch.insert_edge(Edge::new(root_id, child_id, EdgeKind::Pointer).named(field.name.clone()))?;
        }

        Ok(root_id)
    }
}
