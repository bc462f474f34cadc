use crate::model::{EdgeKind, Workflow};
use petgraph::Direction;
use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::Serialize;
use std::collections::{HashMap, HashSet, VecDeque};

/// Directed task graph built from success/failure successor lists.
///
/// Nodes are task ids in document order. References to unknown tasks are
/// not materialised as edges; the loader reports them instead.
pub struct TaskGraph {
    graph: DiGraph<String, EdgeKind>,
    node_indices: HashMap<String, NodeIndex>,
    declares_prev: HashSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
}

/// A rooted tree extracted from the graph for hierarchical layout.
///
/// Entries are stored breadth-first: entry 0 is the root and every entry
/// comes after its parent, so no traversal needs to recurse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanningTree {
    pub nodes: Vec<TreeEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub id: String,
    pub depth: usize,
    /// Indices into `SpanningTree::nodes`, in successor order.
    pub children: Vec<usize>,
}

impl TaskGraph {
    pub fn build(workflow: &Workflow) -> Self {
        let mut graph = DiGraph::new();
        let mut node_indices = HashMap::new();
        let mut declares_prev = HashSet::new();

        for task in &workflow.tasks {
            if node_indices.contains_key(&task.task_id) {
                continue;
            }
            let idx = graph.add_node(task.task_id.clone());
            node_indices.insert(task.task_id.clone(), idx);
            if !task.prev.is_empty() {
                declares_prev.insert(task.task_id.clone());
            }
        }

        let mut seen: HashSet<(NodeIndex, NodeIndex, EdgeKind)> = HashSet::new();
        for task in &workflow.tasks {
            let from = node_indices[&task.task_id];
            for kind in EdgeKind::ALL {
                for target in task.successors(kind) {
                    let Some(&to) = node_indices.get(target) else {
                        continue;
                    };
                    if seen.insert((from, to, kind)) {
                        graph.add_edge(from, to, kind);
                    }
                }
            }
        }

        Self {
            graph,
            node_indices,
            declares_prev,
        }
    }

    pub fn graph(&self) -> &DiGraph<String, EdgeKind> {
        &self.graph
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, task_id: &str) -> bool {
        self.node_indices.contains_key(task_id)
    }

    /// Task ids in document order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.graph.node_indices().map(|idx| self.graph[idx].as_str())
    }

    /// Edges grouped by source in document order, success before failure.
    pub fn edges(&self) -> Vec<Edge> {
        let mut edges: Vec<_> = self
            .graph
            .edge_references()
            .map(|e| {
                (
                    e.source().index(),
                    e.id().index(),
                    Edge {
                        source: self.graph[e.source()].clone(),
                        target: self.graph[e.target()].clone(),
                        kind: *e.weight(),
                    },
                )
            })
            .collect();
        edges.sort_by_key(|(src, id, _)| (*src, *id));
        edges.into_iter().map(|(_, _, edge)| edge).collect()
    }

    pub fn fan_in(&self, task_id: &str) -> usize {
        self.neighbors(task_id, Direction::Incoming).len()
    }

    pub fn fan_out(&self, task_id: &str) -> usize {
        self.neighbors(task_id, Direction::Outgoing).len()
    }

    pub fn successors(&self, task_id: &str) -> Vec<String> {
        self.neighbors(task_id, Direction::Outgoing)
    }

    pub fn predecessors(&self, task_id: &str) -> Vec<String> {
        self.neighbors(task_id, Direction::Incoming)
    }

    /// Distinct neighbours in the given direction, in document order.
    fn neighbors(&self, task_id: &str, direction: Direction) -> Vec<String> {
        let Some(&idx) = self.node_indices.get(task_id) else {
            return Vec::new();
        };
        let mut indices: Vec<NodeIndex> = self.graph.neighbors_directed(idx, direction).collect();
        indices.sort();
        indices.dedup();
        indices
            .into_iter()
            .map(|n| self.graph[n].clone())
            .collect()
    }

    /// Root tasks: empty `prev` and no incoming successor edge.
    pub fn roots(&self) -> Vec<String> {
        self.graph
            .node_indices()
            .filter(|&idx| self.is_source(idx) && !self.declares_prev.contains(&self.graph[idx]))
            .map(|idx| self.graph[idx].clone())
            .collect()
    }

    fn is_source(&self, idx: NodeIndex) -> bool {
        self.graph
            .neighbors_directed(idx, Direction::Incoming)
            .next()
            .is_none()
    }

    /// Strongly connected components that form cycles, plus self-loops.
    /// Members of each cycle are listed in document order.
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let mut cycles: Vec<Vec<NodeIndex>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| {
                scc.len() > 1
                    || self
                        .graph
                        .neighbors_directed(scc[0], Direction::Outgoing)
                        .any(|n| n == scc[0])
            })
            .map(|mut scc| {
                scc.sort();
                scc
            })
            .collect();
        cycles.sort();

        cycles
            .into_iter()
            .map(|scc| scc.into_iter().map(|idx| self.graph[idx].clone()).collect())
            .collect()
    }

    pub fn is_acyclic(&self) -> bool {
        self.cycles().is_empty()
    }

    /// Tasks ordered so every task comes after all of its predecessors.
    /// Returns None if the graph has cycles.
    pub fn topological_order(&self) -> Option<Vec<String>> {
        toposort(&self.graph, None).ok().map(|indices| {
            indices
                .into_iter()
                .map(|idx| self.graph[idx].clone())
                .collect()
        })
    }

    /// Reduce the acyclic graph to a forest of rooted trees.
    ///
    /// Breadth-first from each root in order; a task joins the tree of the
    /// first parent that reaches it. Source tasks that declare a `prev`
    /// nobody points at seed their own tree after the real roots.
    pub fn spanning_forest(&self) -> Result<Vec<SpanningTree>, Vec<String>> {
        if let Some(cycle) = self.cycles().into_iter().next() {
            return Err(cycle);
        }

        let mut seeds: Vec<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|&idx| self.is_source(idx) && !self.declares_prev.contains(&self.graph[idx]))
            .collect();
        seeds.extend(
            self.graph
                .node_indices()
                .filter(|&idx| self.is_source(idx) && self.declares_prev.contains(&self.graph[idx])),
        );

        let mut visited: HashSet<NodeIndex> = HashSet::new();
        let mut forest = Vec::new();

        for &seed in &seeds {
            if !visited.insert(seed) {
                continue;
            }
            let mut nodes = vec![TreeEntry {
                id: self.graph[seed].clone(),
                depth: 0,
                children: Vec::new(),
            }];
            let mut queue = VecDeque::from([(seed, 0usize)]);
            while let Some((idx, slot)) = queue.pop_front() {
                for next in self.ordered_successors(idx) {
                    if visited.insert(next) {
                        let child = nodes.len();
                        nodes.push(TreeEntry {
                            id: self.graph[next].clone(),
                            depth: nodes[slot].depth + 1,
                            children: Vec::new(),
                        });
                        nodes[slot].children.push(child);
                        queue.push_back((next, child));
                    }
                }
            }
            forest.push(SpanningTree { nodes });
        }

        Ok(forest)
    }

    fn ordered_successors(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut edges: Vec<_> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| (e.id().index(), e.target()))
            .collect();
        edges.sort();
        edges.into_iter().map(|(_, target)| target).collect()
    }
}

impl SpanningTree {
    pub fn root_id(&self) -> Option<&str> {
        self.nodes.first().map(|n| n.id.as_str())
    }

    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// Number of levels.
    pub fn depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth + 1).max().unwrap_or(0)
    }

    pub fn child_ids(&self, index: usize) -> Vec<&str> {
        self.nodes
            .get(index)
            .map(|n| n.children.iter().map(|&c| self.nodes[c].id.as_str()).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Task;

    fn diamond() -> Workflow {
        Workflow::new(vec![
            Task::new("start", "trigger").on_success(["left", "right"]),
            Task::new("left", "http").with_prev(["start"]).on_success(["join"]),
            Task::new("right", "http")
                .with_prev(["start"])
                .on_success(["join"])
                .on_failure(["alert"]),
            Task::new("join", "merge").with_prev(["left", "right"]),
            Task::new("alert", "notify").with_prev(["right"]),
        ])
    }

    #[test]
    fn test_edges_are_tagged() {
        let graph = TaskGraph::build(&diamond());
        let edges = graph.edges();

        assert_eq!(edges.len(), 5);
        assert_eq!(
            edges[0],
            Edge {
                source: "start".into(),
                target: "left".into(),
                kind: EdgeKind::Success
            }
        );
        assert!(
            edges
                .iter()
                .any(|e| e.target == "alert" && e.kind == EdgeKind::Failure)
        );
    }

    #[test]
    fn test_dangling_targets_are_not_materialised() {
        let workflow = Workflow::new(vec![Task::new("a", "x").on_success(["ghost"])]);
        let graph = TaskGraph::build(&workflow);

        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.roots(), vec!["a"]);
    }

    #[test]
    fn test_fan_in_and_out() {
        let graph = TaskGraph::build(&diamond());
        assert_eq!(graph.fan_out("start"), 2);
        assert_eq!(graph.fan_in("join"), 2);
        assert_eq!(graph.predecessors("join"), vec!["left", "right"]);
        assert_eq!(graph.fan_in("missing"), 0);
    }

    #[test]
    fn test_roots_require_empty_prev() {
        let workflow = Workflow::new(vec![
            Task::new("a", "x"),
            Task::new("b", "x").with_prev(["a"]),
            Task::new("c", "x"),
        ]);
        let graph = TaskGraph::build(&workflow);
        assert_eq!(graph.roots(), vec!["a", "c"]);
    }

    #[test]
    fn test_cycles_and_self_loops() {
        let workflow = Workflow::new(vec![
            Task::new("a", "x").on_success(["b"]),
            Task::new("b", "x").on_failure(["a"]),
            Task::new("c", "x").on_success(["c"]),
            Task::new("d", "x"),
        ]);
        let graph = TaskGraph::build(&workflow);

        assert_eq!(
            graph.cycles(),
            vec![vec!["a".to_string(), "b".to_string()], vec!["c".to_string()]]
        );
        assert!(graph.topological_order().is_none());
        assert!(graph.spanning_forest().is_err());
    }

    #[test]
    fn test_topological_order_respects_edges() {
        let graph = TaskGraph::build(&diamond());
        let order = graph.topological_order().unwrap();
        let pos = |id: &str| order.iter().position(|o| o == id).unwrap();

        assert!(pos("start") < pos("left"));
        assert!(pos("right") < pos("join"));
        assert!(pos("right") < pos("alert"));
    }

    #[test]
    fn test_spanning_forest_first_parent_wins() {
        let graph = TaskGraph::build(&diamond());
        let forest = graph.spanning_forest().unwrap();

        assert_eq!(forest.len(), 1);
        let tree = &forest[0];
        assert_eq!(tree.root_id(), Some("start"));
        assert_eq!(tree.size(), 5);
        assert_eq!(tree.depth(), 3);

        assert_eq!(tree.child_ids(0), vec!["left", "right"]);
        assert_eq!(tree.child_ids(1), vec!["join"]);
        assert_eq!(tree.child_ids(2), vec!["alert"]);
    }

    #[test]
    fn test_spanning_forest_multiple_roots() {
        let workflow = Workflow::new(vec![
            Task::new("a", "x").on_success(["b"]),
            Task::new("b", "x").with_prev(["a"]),
            Task::new("c", "x"),
        ]);
        let forest = TaskGraph::build(&workflow).spanning_forest().unwrap();
        let ids: Vec<_> = forest.iter().filter_map(SpanningTree::root_id).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_spanning_forest_covers_orphans_with_stale_prev() {
        let workflow = Workflow::new(vec![
            Task::new("a", "x"),
            Task::new("b", "x").with_prev(["a"]),
        ]);
        let forest = TaskGraph::build(&workflow).spanning_forest().unwrap();
        let total: usize = forest.iter().map(SpanningTree::size).sum();
        assert_eq!(total, 2);
        assert_eq!(forest[1].root_id(), Some("b"));
    }

    #[test]
    fn test_spanning_forest_handles_long_chains() {
        let n = 20_000;
        let tasks = (0..n)
            .map(|i| {
                let mut task = Task::new(format!("t{}", i), "x");
                if i > 0 {
                    task = task.with_prev([format!("t{}", i - 1)]);
                }
                if i + 1 < n {
                    task = task.on_success([format!("t{}", i + 1)]);
                }
                task
            })
            .collect();
        let forest = TaskGraph::build(&Workflow::new(tasks)).spanning_forest().unwrap();

        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].depth(), n);
    }
}
