//! paramgraph: a typed attributed graph plus a constraint/expression algebra
//! over set-valued parameters, with unit-aware interval arithmetic.
//!
//! This is the core of a hardware-description library: a mutable directed
//! graph of nodes and edges ([`graph`]) encodes components, signals, and
//! their relationships; a set-valued literal algebra ([`sets`],
//! [`numeric_set`], [`numbers`]) with unit checking ([`units`]) lets callers
//! express parametric constraints like "resistance = 10 kΩ ± 1 %"; an
//! expression DAG ([`expr`]) builds those constraints out of operator
//! nodes instead of evaluating them eagerly; and a BFS path finder
//! ([`pathfinder`]) answers connectivity questions over the graph's
//! composition hierarchy.
//!
//! # Example
//!
//! ```
//! use paramgraph::graph::GraphView;
//! use paramgraph::numbers::Numbers;
//! use paramgraph::units::known::{VOLT, AMPERE};
//!
//! let mut view = GraphView::new();
//! let voltage = Numbers::singleton(2.0, Some(VOLT));
//! let current = Numbers::singleton(3.0, Some(AMPERE));
//! let power = voltage.mul(&current);
//! assert_eq!(power.get_single().unwrap(), 6.0);
//!
//! let node = paramgraph::literal_graph::insert_numbers(&mut view, &power).unwrap();
//! assert!(view.get_node(node.id).is_some());
//! ```

pub mod attributes;
pub mod error;
pub mod expr;
pub mod graph;
pub mod ids;
pub mod literal;
pub mod literal_graph;
pub mod numbers;
pub mod numeric_set;
pub mod pathfinder;
pub mod serial;
pub mod sets;
pub mod traits;
pub mod typegraph;
pub mod units;

pub use error::{GraphError, GraphResult};
pub use graph::{BoundEdgeRef, BoundNodeRef, Edge, EdgeKind, GraphView, Node, NodeBody, VisitControl};
pub use ids::{EdgeId, GraphId, NodeId};
pub use numbers::Numbers;
pub use numeric_set::NumericSet;
pub use pathfinder::{BFSPath, FilterCounters, PathFinder, PathFinderConfig};
pub use sets::{BooleanSet, CountSet, EnumSet, StringSet};
pub use traits::TraitKind;
pub use typegraph::{ChildField, TypeGraph, TypeSchema};
pub use units::Unit;
