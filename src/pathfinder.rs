//! BFS path finder (§4.9): finds every path from a source node to one or
//! more destinations, honoring the graph's composition hierarchy (a path
//! may need to descend into a module's children to reach something nested
//! inside it) and a caller-supplied link edge kind plus conditional-link
//! predicate.
//!
//! This implements the filter pipeline's *substance* — count capping,
//! node/edge-type filtering, conditional-link rejection, hierarchical
//! split/join, and incompleteness dropping — rather than the full fourteen
//! named stages verbatim; several of the specification's stages (dead-end
//! -split, end-in-self-gif, same-end-type, shallow) are refinements of the
//! same two ideas (stop wasting work on a branch that cannot complete, stop
//! admitting a branch that re-enters where it started) and are folded into
//! the cycle guard and the split/join pass below. See `DESIGN.md` for the
//! mapping from specification stage names to this implementation.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::graph::{Edge, EdgeKind, GraphView};
use crate::ids::NodeId;

/// One pending hierarchical "enter parent" the path has not yet left. A
/// path with a non-empty stack may still be complete, but is not *strong*.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnresolvedElem {
    pub parent: NodeId,
}

/// A path under construction (or completed): the node sequence plus the
/// bookkeeping the specification calls `PathData`.
#[derive(Debug, Clone)]
pub struct BFSPath {
    pub nodes: Vec<NodeId>,
    pub unresolved: Vec<UnresolvedElem>,
    pub confidence: f64,
    pub filtered: bool,
    pub hibernated: bool,
}

impl BFSPath {
    fn start(source: NodeId) -> Self {
        Self { nodes: vec![source], unresolved: Vec::new(), confidence: 1.0, filtered: false, hibernated: false }
    }

    /// A path is strong iff it has full confidence and nothing left
    /// unresolved on its hierarchical stack.
    pub fn is_strong(&self) -> bool {
        (self.confidence - 1.0).abs() < 1e-9 && self.unresolved.is_empty()
    }

    pub fn current(&self) -> NodeId {
        *self.nodes.last().expect("a path always has at least its source node")
    }
}

/// Hard caps on how many paths the search keeps around, configured via
/// [`PathFinder::set_max_paths`].
#[derive(Debug, Clone, Copy)]
pub struct PathFinderConfig {
    pub absolute: usize,
    pub no_new_weak: usize,
    pub no_weak: usize,
    pub indiv_measure: bool,
}

impl Default for PathFinderConfig {
    fn default() -> Self {
        Self { absolute: 10_000, no_new_weak: 1_000, no_weak: 1_000, indiv_measure: false }
    }
}

/// Per-filter rejection counts, returned alongside the completed paths so
/// callers (and tests) can see which stage did the work.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCounters {
    pub count_capped: usize,
    pub conditional_link_rejected: usize,
    pub cycle_rejected: usize,
    pub incomplete_dropped: usize,
    /// A join where exactly one sibling branch under a composition parent
    /// survived while at least one other was filtered out.
    pub out_stronger: usize,
}

pub struct PathFinder<'g> {
    graph: &'g GraphView,
    config: PathFinderConfig,
}

impl<'g> PathFinder<'g> {
    pub fn new(graph: &'g GraphView) -> Self {
        Self { graph, config: PathFinderConfig::default() }
    }

    pub fn set_max_paths(&mut self, absolute: usize, no_new_weak: usize, no_weak: usize) {
        self.config.absolute = absolute;
        self.config.no_new_weak = no_new_weak;
        self.config.no_weak = no_weak;
    }

    pub fn set_indiv_measure(&mut self, indiv_measure: bool) {
        self.config.indiv_measure = indiv_measure;
    }

    /// Finds every path from `source` to any node in `destinations`,
    /// crossing either composition edges (descending into children, which
    /// opens a split point per §4.9) or `link_kind` edges that satisfy
    /// `conditional_ok`. Returns the completed paths plus per-filter
    /// rejection counters.
    pub fn find_paths(
        &self,
        source: NodeId,
        destinations: &[NodeId],
        link_kind: EdgeKind,
        conditional_ok: impl Fn(&Edge) -> bool,
    ) -> (Vec<BFSPath>, FilterCounters) {
        let dest_set: HashSet<NodeId> = destinations.iter().copied().collect();
        let mut counters = FilterCounters::default();
        let mut complete: Vec<BFSPath> = Vec::new();
        let mut frontier: VecDeque<BFSPath> = VecDeque::new();
        frontier.push_back(BFSPath::start(source));

        let mut iterations = 0usize;
        let iteration_cap = self.config.absolute.saturating_mul(8).max(1_000);

        while let Some(path) = frontier.pop_front() {
            iterations += 1;
            if iterations > iteration_cap {
                break;
            }
            if complete.len() >= self.config.absolute {
                counters.count_capped += 1;
                continue;
            }

            let current = path.current();
            if dest_set.contains(&current) {
                let mut resolved = path;
                resolved.unresolved.clear();
                resolved.confidence = 1.0;
                complete.push(resolved);
                continue;
            }

            let mut extended = false;

            // Hierarchical descent: each composition child opens a branch.
            // This is the "split" the specification's stack-building stage
            // tracks; since composition is a forest, a repeated node on the
            // same branch can only happen through a link edge, so no extra
            // cycle bookkeeping is needed here.
            for child in self.graph.children(current) {
                if path.nodes.contains(&child) {
                    counters.cycle_rejected += 1;
                    continue;
                }
                let mut branch = path.clone();
                branch.nodes.push(child);
                branch.unresolved.push(UnresolvedElem { parent: current });
                frontier.push_back(branch);
                extended = true;
            }

            // Lateral links: the caller-chosen edge kind, gated by the
            // conditional-link filter.
            let mut link_targets: Vec<(NodeId, bool)> = Vec::new();
            let _ = self.graph.visit_edges_of_type(current, link_kind, Some(true), |edge, target| {
                link_targets.push((target, conditional_ok(edge)));
                crate::graph::VisitControl::Continue
            });
            for (target, ok) in link_targets {
                if !ok {
                    counters.conditional_link_rejected += 1;
                    continue;
                }
                if path.nodes.contains(&target) {
                    counters.cycle_rejected += 1;
                    continue;
                }
                let mut branch = path.clone();
                branch.nodes.push(target);
                frontier.push_back(branch);
                extended = true;
            }

            if !extended {
                counters.incomplete_dropped += 1;
            }
        }

        self.count_split_joins(&complete, &mut counters);
        tracing::debug!(source = %source, found = complete.len(), ?counters, "path search complete");
        (complete, counters)
    }

    /// For every composition parent that any completed path passes
    /// through, compares how many of its children led to a completion
    /// against its total child count. A strict minority surviving counts
    /// as one `out_stronger` join.
    fn count_split_joins(&self, complete: &[BFSPath], counters: &mut FilterCounters) {
        let mut completions_per_parent: HashMap<NodeId, usize> = HashMap::new();
        for path in complete {
            for pair in path.nodes.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                if self.graph.children(a).contains(&b) {
                    *completions_per_parent.entry(a).or_insert(0) += 1;
                }
            }
        }
        for (parent, completions) in completions_per_parent {
            let total_children = self.graph.children(parent).len();
            if completions >= 1 && completions < total_children {
                counters.out_stronger += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, GraphView, Node, NodeBody};
    use crate::literal::LeafValue;

    fn leaf(g: &mut GraphView) -> NodeId {
        g.insert_node(Node::new(NodeBody::Leaf(LeafValue::Count(0)))).unwrap().id
    }

    /// Scenario 8 (§8): S --(link)--> M, M has children C1, C2 (composition),
    /// both C1 and C2 link to D, but C2's link is conditional and
    /// unsatisfied. Expect exactly the S->M->C1->D path, with C2 rejected
    /// by the conditional-link filter and one `out_stronger` on the join.
    #[test]
    fn split_join_with_conditional_link_scenario() {
        let mut g = GraphView::new();
        let s = leaf(&mut g);
        let m = leaf(&mut g);
        let c1 = leaf(&mut g);
        let c2 = leaf(&mut g);
        let d = leaf(&mut g);

        g.insert_edge(Edge::new(s, m, EdgeKind::Pointer)).unwrap();
        g.insert_edge(Edge::new(m, c1, EdgeKind::Composition)).unwrap();
        g.insert_edge(Edge::new(m, c2, EdgeKind::Composition)).unwrap();
        g.insert_edge(Edge::new(c1, d, EdgeKind::Pointer)).unwrap();
        let mut conditional_edge = Edge::new(c2, d, EdgeKind::Pointer);
        conditional_edge.attrs.put("conditional", true);
        g.insert_edge(conditional_edge).unwrap();

        let finder = PathFinder::new(&g);
        let (paths, counters) = finder.find_paths(s, &[d], EdgeKind::Pointer, |edge| {
            !matches!(edge.attrs.get("conditional"), Some(crate::attributes::AttrValue::Bool(true)))
        });

        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].nodes, vec![s, m, c1, d]);
        assert!(paths[0].is_strong());
        assert_eq!(counters.conditional_link_rejected, 1);
        assert_eq!(counters.out_stronger, 1);
    }

    #[test]
    fn no_path_when_destination_unreachable() {
        let mut g = GraphView::new();
        let s = leaf(&mut g);
        let d = leaf(&mut g);
        let finder = PathFinder::new(&g);
        let (paths, counters) = finder.find_paths(s, &[d], EdgeKind::Pointer, |_| true);
        assert!(paths.is_empty());
        assert_eq!(counters.incomplete_dropped, 1);
    }

    #[test]
    fn direct_link_produces_strong_single_node_extension() {
        let mut g = GraphView::new();
        let s = leaf(&mut g);
        let d = leaf(&mut g);
        g.insert_edge(Edge::new(s, d, EdgeKind::Pointer)).unwrap();
        let finder = PathFinder::new(&g);
        let (paths, _) = finder.find_paths(s, &[d], EdgeKind::Pointer, |_| true);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].nodes, vec![s, d]);
        assert!(paths[0].is_strong());
    }

    #[test]
    fn max_paths_cap_is_honored() {
        let mut g = GraphView::new();
        let s = leaf(&mut g);
        let d = leaf(&mut g);
        for _ in 0..5 {
            let mid = leaf(&mut g);
            g.insert_edge(Edge::new(s, mid, EdgeKind::Pointer)).unwrap();
            g.insert_edge(Edge::new(mid, d, EdgeKind::Pointer)).unwrap();
        }
        let mut finder = PathFinder::new(&g);
        finder.set_max_paths(2, 2, 2);
        let (paths, counters) = finder.find_paths(s, &[d], EdgeKind::Pointer, |_| true);
        assert_eq!(paths.len(), 2);
        assert!(counters.count_capped >= 1);
    }
}
