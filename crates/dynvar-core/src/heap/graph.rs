//! Graph container: nodes `0..node_count()` with weighted adjacency lists and
//! optional per-node metadata.
//!
//! Traversal algorithms live outside this crate; the container only stores
//! structure and guards it like every other heap variant.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use crate::error::{Result, VarError};
use crate::guard::{Guarded, Version};
use crate::value::Value;

/// An outgoing edge. Undirected edges are stored once in each direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub to: usize,
    pub weight: f64,
    pub directed: bool,
}

/// A node as seen by a traversal step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node<'a> {
    pub id: usize,
    pub edges: &'a [Edge],
    pub data: Option<&'a Value>,
}

#[derive(Debug, Clone, Default)]
pub struct Graph {
    adjacency: Vec<Vec<Edge>>,
    node_data: HashMap<usize, Value>,
    version: Version,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// A graph with `nodes` isolated nodes.
    pub fn with_nodes(nodes: usize) -> Self {
        Graph {
            adjacency: vec![Vec::new(); nodes],
            ..Self::default()
        }
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of edges. An undirected edge is stored on both endpoints but
    /// counts once; an undirected self-loop is stored once.
    pub fn edge_count(&self) -> usize {
        let (mut single, mut mirrored) = (0usize, 0usize);
        for (from, edge) in self.edges() {
            if edge.directed || edge.to == from {
                single += 1;
            } else {
                mirrored += 1;
            }
        }
        single + mirrored / 2
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.version.get()
    }

    pub fn add_node(&mut self, data: Option<Value>) -> usize {
        let id = self.adjacency.len();
        self.adjacency.push(Vec::new());
        if let Some(data) = data {
            self.node_data.insert(id, data);
        }
        self.version.bump();
        id
    }

    /// Append `count` isolated nodes; returns the id of the first.
    pub fn add_nodes(&mut self, count: usize) -> usize {
        let first = self.adjacency.len();
        self.adjacency.resize_with(first + count, Vec::new);
        self.version.bump();
        first
    }

    pub fn add_edge(&mut self, from: usize, to: usize, weight: f64, directed: bool) -> Result<()> {
        self.check_node(from)?;
        self.check_node(to)?;
        self.adjacency[from].push(Edge {
            to,
            weight,
            directed,
        });
        if !directed && from != to {
            self.adjacency[to].push(Edge {
                to: from,
                weight,
                directed,
            });
        }
        self.version.bump();
        Ok(())
    }

    /// Remove every edge `from -> to` (and the mirrored entry of undirected
    /// edges). Returns whether anything was removed.
    pub fn remove_edge(&mut self, from: usize, to: usize) -> Result<bool> {
        self.check_node(from)?;
        self.check_node(to)?;
        let before = self.adjacency[from].len();
        let mut mirrored = 0usize;
        self.adjacency[from].retain(|e| {
            if e.to == to {
                if !e.directed {
                    mirrored += 1;
                }
                false
            } else {
                true
            }
        });
        let removed = before != self.adjacency[from].len();
        if mirrored > 0 && from != to {
            self.adjacency[to].retain(|e| !(e.to == from && !e.directed));
        }
        if removed {
            self.version.bump();
        }
        Ok(removed)
    }

    pub fn has_edge(&self, from: usize, to: usize) -> bool {
        self.adjacency
            .get(from)
            .is_some_and(|edges| edges.iter().any(|e| e.to == to))
    }

    pub fn neighbors(&self, node: usize) -> Result<&[Edge]> {
        self.check_node(node)?;
        Ok(&self.adjacency[node])
    }

    pub fn node_data(&self, node: usize) -> Option<&Value> {
        self.node_data.get(&node)
    }

    /// Attach metadata to an existing node. Not a structural change.
    pub fn set_node_data(&mut self, node: usize, data: Value) -> Result<()> {
        self.check_node(node)?;
        self.node_data.insert(node, data);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.adjacency.clear();
        self.node_data.clear();
        self.version.bump();
    }

    pub fn node(&self, id: usize) -> Option<Node<'_>> {
        self.adjacency.get(id).map(|edges| Node {
            id,
            edges,
            data: self.node_data.get(&id),
        })
    }

    pub fn nodes(&self) -> impl Iterator<Item = Node<'_>> {
        (0..self.adjacency.len()).filter_map(|id| self.node(id))
    }

    /// Every stored edge as `(from, edge)`, undirected edges in both
    /// directions.
    pub fn edges(&self) -> impl Iterator<Item = (usize, &Edge)> {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(from, edges)| edges.iter().map(move |e| (from, e)))
    }

    fn check_node(&self, node: usize) -> Result<()> {
        if node >= self.adjacency.len() {
            return Err(VarError::IndexOutOfRange {
                index: node as i64,
                len: self.adjacency.len(),
            });
        }
        Ok(())
    }

    fn sorted_edges(edges: &[Edge]) -> Vec<(usize, u64, bool)> {
        let mut keyed: Vec<_> = edges
            .iter()
            .map(|e| (e.to, e.weight.to_bits(), e.directed))
            .collect();
        keyed.sort_unstable();
        keyed
    }
}

impl Guarded for Graph {
    type Item<'a> = Node<'a>;

    fn version(&self) -> u64 {
        self.version.get()
    }

    fn identity(&self) -> u64 {
        self.version.identity()
    }

    fn item_at(&self, position: usize) -> Option<(Node<'_>, usize)> {
        self.node(position).map(|node| (node, position + 1))
    }
}

/// Structural equality: same node count, the same edge multiset per node and
/// the same metadata.
impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        self.node_count() == other.node_count()
            && self.node_data == other.node_data
            && self
                .adjacency
                .iter()
                .zip(&other.adjacency)
                .all(|(a, b)| a.len() == b.len() && Self::sorted_edges(a) == Self::sorted_edges(b))
    }
}

impl Eq for Graph {}

impl Hash for Graph {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.node_count().hash(state);
        for edges in &self.adjacency {
            Self::sorted_edges(edges).hash(state);
        }
    }
}
