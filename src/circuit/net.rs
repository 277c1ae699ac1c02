//! Undirected net topology.
//!
//! A [`Net`] is a connected graph of nodes, each anchoring either a
//! component terminal or a free routing waypoint. Edges are stored as
//! symmetric adjacency lists of node indices. The net caches an aggregate
//! output signal for observation; signal propagation itself happens at the
//! schematic level, which owns the terminals.

use crate::circuit::{NetId, Point, Signal, TerminalId};
use crate::error::{LogicError, Result};

/// What a net node is anchored to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeAnchor {
    /// A component terminal; carries the net's signal to its owner.
    Terminal(TerminalId),
    /// A routing point with a position and no signal.
    Waypoint(Point),
}

/// One node of a net graph.
#[derive(Debug, Clone)]
pub struct NetNode {
    pub anchor: NodeAnchor,
    /// Indices of adjacent nodes within the same net. Symmetric.
    pub neighbors: Vec<usize>,
}

impl NetNode {
    fn new(anchor: NodeAnchor) -> Self {
        Self {
            anchor,
            neighbors: Vec::new(),
        }
    }

    /// The anchored terminal, if this is a terminal node.
    pub fn terminal(&self) -> Option<TerminalId> {
        match self.anchor {
            NodeAnchor::Terminal(id) => Some(id),
            NodeAnchor::Waypoint(_) => None,
        }
    }
}

/// An undirected, connected graph of terminals and waypoints sharing one
/// electrical signal.
#[derive(Debug, Clone, Default)]
pub struct Net {
    nodes: Vec<NetNode>,
    output: Signal,
}

impl Net {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[NetNode] {
        &self.nodes
    }

    /// The cached aggregate signal: combine of every terminal's output.
    /// Valid after the owning schematic has settled; for observation only.
    pub fn output(&self) -> Signal {
        self.output
    }

    pub(crate) fn set_output(&mut self, output: Signal) {
        self.output = output;
    }

    pub(crate) fn reset(&mut self) {
        self.output = Signal::Float;
    }

    /// All terminals anchored on this net, in node order.
    pub fn terminals(&self) -> impl Iterator<Item = TerminalId> + '_ {
        self.nodes.iter().filter_map(NetNode::terminal)
    }

    pub fn terminal_count(&self) -> usize {
        self.terminals().count()
    }

    pub fn node_of_terminal(&self, id: TerminalId) -> Option<usize> {
        self.nodes.iter().position(|n| n.terminal() == Some(id))
    }

    pub fn node_of_waypoint(&self, point: Point) -> Option<usize> {
        self.nodes
            .iter()
            .position(|n| matches!(n.anchor, NodeAnchor::Waypoint(p) if p == point))
    }

    pub(crate) fn add_node(&mut self, anchor: NodeAnchor) -> usize {
        self.nodes.push(NetNode::new(anchor));
        self.nodes.len() - 1
    }

    /// Add a symmetric edge. Self-loops and duplicate edges are ignored.
    pub(crate) fn add_edge(&mut self, a: usize, b: usize) {
        if a == b || self.nodes[a].neighbors.contains(&b) {
            return;
        }
        self.nodes[a].neighbors.push(b);
        self.nodes[b].neighbors.push(a);
    }

    /// Remove a node, dropping its edges and rewriting every neighbor index
    /// above it down by one.
    pub(crate) fn remove_node(&mut self, idx: usize) -> NetNode {
        let removed = self.nodes.remove(idx);
        for node in &mut self.nodes {
            node.neighbors.retain(|&n| n != idx);
            for n in &mut node.neighbors {
                if *n > idx {
                    *n -= 1;
                }
            }
        }
        removed
    }

    /// Append every node of `other`, offsetting its adjacency, and return
    /// the offset. No bridging edge is added; the caller connects the two
    /// halves afterwards.
    pub(crate) fn absorb(&mut self, other: Net) -> usize {
        let offset = self.nodes.len();
        for mut node in other.nodes {
            for n in &mut node.neighbors {
                *n += offset;
            }
            self.nodes.push(node);
        }
        offset
    }

    /// Group node indices by graph reachability.
    pub(crate) fn connected_components(&self) -> Vec<Vec<usize>> {
        let mut seen = vec![false; self.nodes.len()];
        let mut groups = Vec::new();
        for start in 0..self.nodes.len() {
            if seen[start] {
                continue;
            }
            let mut group = Vec::new();
            let mut stack = vec![start];
            seen[start] = true;
            while let Some(i) = stack.pop() {
                group.push(i);
                for &n in &self.nodes[i].neighbors {
                    if !seen[n] {
                        seen[n] = true;
                        stack.push(n);
                    }
                }
            }
            group.sort_unstable();
            groups.push(group);
        }
        groups
    }

    /// Build a new net from a subset of this net's nodes, remapping
    /// adjacency to the subset's indices. Edges leaving the subset are
    /// dropped. `group` must be sorted.
    pub(crate) fn extract(&self, group: &[usize]) -> Net {
        let mut net = Net::new();
        for &old in group {
            let node = &self.nodes[old];
            let neighbors = node
                .neighbors
                .iter()
                .filter_map(|n| group.binary_search(n).ok())
                .collect();
            net.nodes.push(NetNode {
                anchor: node.anchor,
                neighbors,
            });
        }
        net
    }

    /// Check the graph-shape invariants: symmetric edges, no self-loops,
    /// every node reachable from node 0.
    pub fn validate(&self, id: NetId) -> Result<()> {
        for (i, node) in self.nodes.iter().enumerate() {
            for &n in &node.neighbors {
                if n == i {
                    return Err(LogicError::SelfLoop { net: id, node: i });
                }
                if !self.nodes[n].neighbors.contains(&i) {
                    return Err(LogicError::AsymmetricEdge {
                        net: id,
                        from: i,
                        to: n,
                    });
                }
            }
        }

        let groups = self.connected_components();
        if groups.len() > 1 {
            let reached = groups[0].len();
            return Err(LogicError::DisconnectedNet {
                net: id,
                unreached: self.nodes.len() - reached,
                nodes: self.nodes.len(),
            });
        }

        Ok(())
    }
}
