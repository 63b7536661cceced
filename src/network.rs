/*
 * Copyright (c) 2025 Frank Fischer <frank-fischer@shadow-soft.de>
 *
 * This program is free software: you can redistribute it and/or
 * modify it under the terms of the GNU General Public License as
 * published by the Free Software Foundation, either version 3 of the
 * License, or (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful, but
 * WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU
 * General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see  <http://www.gnu.org/licenses/>
 */

//! Labelled flow networks.
//!
//! A [`Network`] is a static directed graph whose nodes carry a [`Label`]
//! and whose arcs carry a cost. Arcs are numbered in order of creation,
//! the arc number is the *arc id* used by solvers to index flow values.
//!
//! Networks are constructed with a [`NetworkBuilder`]. Once complete the
//! builder is turned into the network, which stores the outgoing arcs of
//! each node in successive positions of a single adjacency vector.

use crate::label::Label;

use std::collections::HashMap;
use std::fmt;

#[cfg(feature = "serialize")]
use serde_derive::{Deserialize, Serialize};

/// Node of a network.
///
/// This is basically a newtype of the node index.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Node(u32);

impl Node {
    /// Return the index of this node.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Arc of a network.
///
/// This is basically a newtype of the arc id.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Arc(u32);

impl Arc {
    /// Return the id of this arc.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Arc {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Data for an arc.
#[derive(Clone, Debug)]
struct ArcData {
    tail: Node,
    head: Node,
    cost: f64,
}

/// A labelled network.
#[derive(Clone, Debug)]
pub struct Network {
    labels: Vec<Label>,
    ids: HashMap<Label, Node>,
    arcs: Vec<ArcData>,
    // The outgoing arcs of node `u` are `adj[firstout[u]..firstout[u+1]]`,
    // sorted by arc id.
    firstout: Vec<u32>,
    adj: Vec<Arc>,
}

/// A builder for a [`Network`].
///
/// Nodes are identified by their labels: adding a label twice returns the
/// same node, and arcs may be added between labels directly.
#[derive(Default)]
pub struct NetworkBuilder {
    labels: Vec<Label>,
    ids: HashMap<Label, Node>,
    arcs: Vec<ArcData>,
}

impl NetworkBuilder {
    /// Create a new, empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new, empty builder.
    ///
    /// The builder reserves memory for the given number of nodes and
    /// arcs. This is no strict requirement on the final network size.
    pub fn with_capacities(nnodes: usize, narcs: usize) -> Self {
        NetworkBuilder {
            labels: Vec::with_capacity(nnodes),
            ids: HashMap::with_capacity(nnodes),
            arcs: Vec::with_capacity(narcs),
        }
    }

    /// Return the current number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.labels.len()
    }

    /// Return the current number of arcs.
    pub fn num_arcs(&self) -> usize {
        self.arcs.len()
    }

    /// Return the node with the given label, if it has been added.
    pub fn node<L: AsRef<str>>(&self, label: L) -> Option<Node> {
        self.ids.get(label.as_ref()).copied()
    }

    /// Add a node with the given label.
    ///
    /// If a node with this label exists already, it is returned instead.
    pub fn add_node<L: Into<Label>>(&mut self, label: L) -> Node {
        let label = label.into();
        if let Some(&u) = self.ids.get(&label) {
            return u;
        }
        let u = Node(self.labels.len() as u32);
        self.ids.insert(label.clone(), u);
        self.labels.push(label);
        u
    }

    /// Add an arc between two existing nodes.
    pub fn add_arc(&mut self, tail: Node, head: Node, cost: f64) -> Arc {
        assert!(tail.index() < self.labels.len(), "Invalid tail node");
        assert!(head.index() < self.labels.len(), "Invalid head node");
        let a = Arc(self.arcs.len() as u32);
        self.arcs.push(ArcData { tail, head, cost });
        a
    }

    /// Add an arc between two labels, creating the nodes if necessary.
    pub fn add_labelled_arc<L, M>(&mut self, tail: L, head: M, cost: f64) -> Arc
    where
        L: Into<Label>,
        M: Into<Label>,
    {
        let u = self.add_node(tail);
        let v = self.add_node(head);
        self.add_arc(u, v, cost)
    }

    /// Turn the builder into a network.
    pub fn into_network(self) -> Network {
        let n = self.labels.len();
        let mut firstout = vec![0u32; n + 1];
        for a in &self.arcs {
            firstout[a.tail.index() + 1] += 1;
        }
        for i in 0..n {
            firstout[i + 1] += firstout[i];
        }

        let mut next = firstout.clone();
        let mut adj = vec![Arc(0); self.arcs.len()];
        for (i, a) in self.arcs.iter().enumerate() {
            let pos = &mut next[a.tail.index()];
            adj[*pos as usize] = Arc(i as u32);
            *pos += 1;
        }

        Network {
            labels: self.labels,
            ids: self.ids,
            arcs: self.arcs,
            firstout,
            adj,
        }
    }
}

impl Network {
    /// Create a new network by passing a builder to the callback `f`.
    ///
    /// # Example
    ///
    /// ```
    /// use rs_netpaths::Network;
    ///
    /// let g = Network::new_with(|b| {
    ///     b.add_labelled_arc("A", "B", 1.0);
    ///     b.add_labelled_arc("B", "C", 2.0);
    /// });
    ///
    /// assert_eq!(g.num_nodes(), 3);
    /// assert_eq!(g.num_arcs(), 2);
    /// ```
    pub fn new_with<F>(f: F) -> Self
    where
        F: FnOnce(&mut NetworkBuilder),
    {
        let mut b = NetworkBuilder::new();
        f(&mut b);
        b.into_network()
    }

    /// Return the number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.labels.len()
    }

    /// Return the number of arcs.
    pub fn num_arcs(&self) -> usize {
        self.arcs.len()
    }

    /// Return an iterator over all nodes.
    pub fn nodes(&self) -> impl Iterator<Item = Node> + '_ {
        (0..self.labels.len() as u32).map(Node)
    }

    /// Return an iterator over all arcs in order of their ids.
    pub fn arcs(&self) -> impl Iterator<Item = Arc> + '_ {
        (0..self.arcs.len() as u32).map(Arc)
    }

    /// Return the node with the given id.
    pub fn id2node(&self, id: usize) -> Node {
        assert!(id < self.labels.len(), "Invalid node id");
        Node(id as u32)
    }

    /// Return the arc with the given id.
    pub fn id2arc(&self, id: usize) -> Arc {
        assert!(id < self.arcs.len(), "Invalid arc id");
        Arc(id as u32)
    }

    /// Return the node with the given label.
    pub fn node<L: AsRef<str>>(&self, label: L) -> Option<Node> {
        self.ids.get(label.as_ref()).copied()
    }

    /// Return the label of a node.
    pub fn label(&self, u: Node) -> &Label {
        &self.labels[u.index()]
    }

    /// Return the tail node of an arc.
    pub fn tail(&self, a: Arc) -> Node {
        self.arcs[a.index()].tail
    }

    /// Return the head node of an arc.
    pub fn head(&self, a: Arc) -> Node {
        self.arcs[a.index()].head
    }

    /// Return the cost of an arc.
    pub fn cost(&self, a: Arc) -> f64 {
        self.arcs[a.index()].cost
    }

    /// Return the outgoing arcs of a node, sorted by arc id.
    pub fn outarcs(&self, u: Node) -> &[Arc] {
        let beg = self.firstout[u.index()] as usize;
        let end = self.firstout[u.index() + 1] as usize;
        &self.adj[beg..end]
    }
}

#[cfg(test)]
mod tests {
    use super::NetworkBuilder;

    #[test]
    fn test_builder() {
        let mut b = NetworkBuilder::with_capacities(3, 3);
        let a = b.add_node("A");
        let c = b.add_node(3.0);
        assert_eq!(b.add_node("A"), a);
        assert_eq!(b.node("3"), Some(c));
        b.add_arc(c, a, 4.0);
        b.add_labelled_arc("A", "B", 1.0);
        b.add_labelled_arc("A", 3.0, 2.0);
        assert_eq!(b.num_nodes(), 3);
        assert_eq!(b.num_arcs(), 3);

        let g = b.into_network();
        let a = g.node("A").unwrap();
        assert_eq!(g.outarcs(a).iter().map(|e| e.index()).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(g.label(g.head(g.id2arc(2))).as_str(), "3");
        assert_eq!(g.cost(g.id2arc(0)), 4.0);
        assert!(g.outarcs(g.node("B").unwrap()).is_empty());
    }
}
