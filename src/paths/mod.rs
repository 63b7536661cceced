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

//! # Recovering paths from flows.
//!
//! A solver reports a network flow as one value per arc. This module turns
//! such values back into paths:
//!
//! - [`trace`] follows the arcs carrying flow from a source until a sink is
//!   reached. This recovers the route of a single unit shortest path (or
//!   min-cost-flow) solution.
//! - [`decompose`] peels integral units of flow off a (multi source) flow,
//!   one path per unit of supply, until one of a set of sinks is reached.
//!
//! Both procedures never loop forever: a walk is bounded by the number of
//! arcs plus a small constant. A walk that cannot be continued is not an
//! error, it produces a [`Path`] whose [`PathEnd`] tells why it stopped.

pub mod decompose;
pub mod trace;

pub use self::decompose::{decompose, decompose_with, ArcOrder, DecomposeOptions, Decomposition};
pub use self::trace::{trace, trace_with, TraceOptions};

use crate::network::{Arc, Network, Node};

use std::fmt;
use std::marker::PhantomData;

#[cfg(feature = "serialize")]
use serde_derive::{Deserialize, Serialize};

/// The reason a path walk stopped.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum PathEnd {
    /// The sink has been reached.
    Reached,
    /// A traced route has no active arc leaving its last node.
    Broken,
    /// A unit path reached a node without outgoing flow.
    Stuck,
    /// The last node had outgoing flow, but it has been used up by
    /// previously extracted paths.
    DeadEnd,
    /// The walk has been cut after the maximal number of steps. No marker
    /// is shown, the route just ends at the last node.
    StepLimit,
}

impl PathEnd {
    /// Return the marker appended to the textual form of a broken path.
    pub fn marker(self) -> Option<&'static str> {
        match self {
            PathEnd::Reached | PathEnd::StepLimit => None,
            PathEnd::Broken => Some("(end?)"),
            PathEnd::Stuck => Some("(stuck)"),
            PathEnd::DeadEnd => Some("(dead end)"),
        }
    }
}

/// A path recovered from a flow.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Path {
    /// The nodes of the path, starting with the source.
    pub nodes: Vec<Node>,
    /// The arcs of the path, `arcs[i]` connects `nodes[i]` and `nodes[i+1]`.
    pub arcs: Vec<Arc>,
    /// The total cost of the arcs.
    pub cost: f64,
    /// Why the walk stopped.
    pub end: PathEnd,
}

impl Path {
    fn start(src: Node) -> Path {
        Path {
            nodes: vec![src],
            arcs: vec![],
            cost: 0.0,
            end: PathEnd::Reached,
        }
    }

    fn push(&mut self, g: &Network, a: Arc) {
        self.arcs.push(a);
        self.nodes.push(g.head(a));
        self.cost += g.cost(a);
    }

    /// Return the first node.
    pub fn source(&self) -> Node {
        self.nodes[0]
    }

    /// Return the last node.
    pub fn last(&self) -> Node {
        self.nodes[self.nodes.len() - 1]
    }

    /// Return `true` if the walk reached its sink.
    pub fn is_complete(&self) -> bool {
        self.end == PathEnd::Reached
    }

    /// Return a displayable form `A->B->C` of the path.
    ///
    /// # Example
    ///
    /// ```
    /// use rs_netpaths::{paths, Flow, Network};
    ///
    /// let g = Network::new_with(|b| {
    ///     b.add_labelled_arc("A", "B", 1.0);
    ///     b.add_labelled_arc("B", "C", 1.0);
    /// });
    /// let x = Flow::from_vec(vec![1.0, 1.0]);
    /// let p = paths::trace(&g, &x, g.node("A").unwrap(), g.node("C").unwrap());
    /// assert_eq!(p.display(&g).to_string(), "A->B->C");
    /// ```
    pub fn display<'a>(&'a self, g: &'a Network) -> PathDisplay<'a> {
        PathDisplay { path: self, graph: g }
    }
}

/// Textual form of a [`Path`], see [`Path::display`].
pub struct PathDisplay<'a> {
    path: &'a Path,
    graph: &'a Network,
}

impl<'a> fmt::Display for PathDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, &u) in self.path.nodes.iter().enumerate() {
            if i > 0 {
                write!(f, "->")?;
            }
            write!(f, "{}", self.graph.label(u))?;
        }
        if let Some(marker) = self.path.end.marker() {
            write!(f, "->{}", marker)?;
        }
        Ok(())
    }
}

/// Walk along successors starting at some node.
///
/// # Parameters
/// - `src`: the start node
/// - `successor(u)`: return the outgoing edge and following node for node
///   `u` (or `None` if it does not exist)
///
/// # Return
/// An iterator over the edges and reached nodes starting from `src`. The
/// iterator is infinite if the successors form a cycle, callers must bound
/// it.
///
/// # Example
///
/// ```
/// use rs_netpaths::paths::walk;
///
/// let next = [Some(2), None, Some(1)];
/// let visited = walk(0usize, |u| next[u].map(|v| ((u, v), v))).map(|(_, v)| v).collect::<Vec<_>>();
/// assert_eq!(visited, vec![2, 1]);
/// ```
pub fn walk<N, E, S>(src: N, successor: S) -> Walk<N, E, S>
where
    N: Copy,
    S: FnMut(N) -> Option<(E, N)>,
{
    Walk {
        successor,
        u: Some(src),
        phantom: PhantomData,
    }
}

/// Iterator returned by [`walk`].
pub struct Walk<N, E, S>
where
    S: FnMut(N) -> Option<(E, N)>,
{
    successor: S,
    u: Option<N>,
    phantom: PhantomData<E>,
}

impl<N, E, S> Iterator for Walk<N, E, S>
where
    N: Copy,
    S: FnMut(N) -> Option<(E, N)>,
{
    type Item = (E, N);

    fn next(&mut self) -> Option<(E, N)> {
        let u = self.u?;
        if let Some((e, v)) = (self.successor)(u) {
            self.u = Some(v);
            Some((e, v))
        } else {
            self.u = None;
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{walk, Path, PathEnd};
    use crate::Network;

    #[test]
    fn test_display_markers() {
        let g = Network::new_with(|b| {
            b.add_labelled_arc("1", "2", 3.5);
        });
        let mut p = Path::start(g.id2node(0));
        p.push(&g, g.id2arc(0));
        assert_eq!(p.cost, 3.5);
        assert_eq!(p.display(&g).to_string(), "1->2");
        p.end = PathEnd::Stuck;
        assert_eq!(p.display(&g).to_string(), "1->2->(stuck)");
        p.end = PathEnd::DeadEnd;
        assert_eq!(p.display(&g).to_string(), "1->2->(dead end)");
        p.end = PathEnd::Broken;
        assert_eq!(p.display(&g).to_string(), "1->2->(end?)");
        p.end = PathEnd::StepLimit;
        assert!(!p.is_complete());
        assert_eq!(p.display(&g).to_string(), "1->2");
    }

    #[test]
    fn test_walk_stops() {
        let mut calls = 0;
        let mut w = walk(0usize, |u| {
            calls += 1;
            if u < 2 {
                Some(((), u + 1))
            } else {
                None
            }
        });
        assert_eq!(w.next().map(|(_, v)| v), Some(1));
        assert_eq!(w.next().map(|(_, v)| v), Some(2));
        assert_eq!(w.next().map(|(_, v)| v), None);
        assert_eq!(w.next().map(|(_, v)| v), None);
        drop(w);
        assert_eq!(calls, 3);
    }
}
