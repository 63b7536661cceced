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

//! Greedy decomposition of a flow into unit paths.
//!
//! Each source sends a number of integral units of flow to a set of sinks.
//! The decomposition extracts one path per unit: starting at the source it
//! repeatedly picks an outgoing arc with remaining units, consumes one unit
//! and continues until a sink is reached.
//!
//! This is a greedy peeling of the residual flow, not an augmenting path
//! algorithm. The extracted paths depend on the order in which arcs are
//! tried, which is fixed by [`ArcOrder`].
//!
//! Every step consumes one unit of some arc, so a unit path ends after at
//! most as many steps as there are units in the flow. In particular a path
//! may run around a cycle carrying flow before it leaves towards a sink.
//!
//! # Example
//!
//! ```
//! use rs_netpaths::{paths, Flow, Network};
//!
//! let g = Network::new_with(|b| {
//!     b.add_labelled_arc("A", "B", 1.0);
//!     b.add_labelled_arc("B", "C", 1.0);
//!     b.add_labelled_arc("B", "D", 2.0);
//! });
//! let x = Flow::from_vec(vec![2.0, 1.0, 1.0]);
//! let a = g.node("A").unwrap();
//! let sinks = [g.node("C").unwrap(), g.node("D").unwrap()];
//!
//! let d = paths::decompose(&g, &x, &[(a, 2.0)], &sinks);
//! let routes = d.paths.iter().map(|p| p.display(&g).to_string()).collect::<Vec<_>>();
//! assert_eq!(routes, vec!["A->B->C", "A->B->D"]);
//! ```

use super::{Path, PathEnd};
use crate::flow::Flow;
use crate::network::{Arc, Network, Node};

use tracing::{debug, info, warn};

/// The order in which outgoing arcs are tried.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ArcOrder {
    /// The arc with the smallest id.
    Index,
    /// The arc with the smallest cost, ties are broken by smallest id.
    Cost,
}

impl Default for ArcOrder {
    fn default() -> Self {
        ArcOrder::Index
    }
}

/// Parameters of [`decompose_with`].
#[derive(Clone, Debug)]
pub struct DecomposeOptions {
    /// Flow or supply values not exceeding this value are zero.
    pub tolerance: f64,
    /// The arc selection rule.
    pub order: ArcOrder,
}

impl Default for DecomposeOptions {
    fn default() -> Self {
        DecomposeOptions {
            tolerance: 1e-5,
            order: ArcOrder::Index,
        }
    }
}

/// The result of a decomposition.
#[derive(Clone, Debug)]
pub struct Decomposition {
    /// The unit paths in order of extraction.
    ///
    /// The paths of each source are consecutive, sources appear in the
    /// order they were passed.
    pub paths: Vec<Path>,
    initial: Vec<u64>,
    residual: Vec<u64>,
}

impl Decomposition {
    /// Return the number of units initially carried by `a`.
    pub fn units(&self, a: Arc) -> u64 {
        self.initial[a.index()]
    }

    /// Return the number of units left on `a` after all paths were extracted.
    pub fn residual(&self, a: Arc) -> u64 {
        self.residual[a.index()]
    }

    /// Return the number of units of `a` used by the extracted paths.
    pub fn consumed(&self, a: Arc) -> u64 {
        self.initial[a.index()] - self.residual[a.index()]
    }

    /// Return the number of paths that reached a sink.
    pub fn num_complete(&self) -> usize {
        self.paths.iter().filter(|p| p.is_complete()).count()
    }
}

/// Decompose `flow` into unit paths with default options.
///
/// See [`decompose_with`].
pub fn decompose(g: &Network, flow: &Flow, sources: &[(Node, f64)], sinks: &[Node]) -> Decomposition {
    decompose_with(g, flow, sources, sinks, &DecomposeOptions::default())
}

/// Decompose `flow` into unit paths.
///
/// # Parameters
/// - `g`: the network
/// - `flow`: the flow, arc values are rounded to integral units
/// - `sources`: the source nodes together with their supply, each source
///   contributes `round(supply)` paths (if its supply exceeds the tolerance)
/// - `sinks`: a unit path ends as soon as it reaches one of these nodes
/// - `opts`: tolerance and arc order
///
/// A source never contributes more paths than the units leaving it plus
/// one. Further units would all end at the source in the same way, they
/// are skipped with a warning. This also bounds infinite supplies.
///
/// # Return
/// The extracted paths and the remaining units on each arc. A path that
/// cannot be continued ends with [`PathEnd::Stuck`] if its last node never
/// carried outgoing flow and with [`PathEnd::DeadEnd`] if the flow has been
/// consumed by earlier paths. In any case the number of units taken from an
/// arc never exceeds the units it carried.
pub fn decompose_with(
    g: &Network,
    flow: &Flow,
    sources: &[(Node, f64)],
    sinks: &[Node],
    opts: &DecomposeOptions,
) -> Decomposition {
    let initial: Vec<u64> = g.arcs().map(|a| flow.units(a, opts.tolerance)).collect();
    let mut residual = initial.clone();

    let mut is_sink = vec![false; g.num_nodes()];
    for &t in sinks {
        is_sink[t.index()] = true;
    }

    // Nodes with at least one outgoing arc carrying flow.
    let mut carries = vec![false; g.num_nodes()];
    for a in g.arcs() {
        if initial[a.index()] > 0 {
            carries[g.tail(a).index()] = true;
        }
    }

    let mut paths = vec![];
    for &(s, supply) in sources {
        if supply <= opts.tolerance {
            continue;
        }
        let max_units = g
            .outarcs(s)
            .iter()
            .fold(1u64, |n, a| n.saturating_add(initial[a.index()]));
        let nunits = if supply.round() > max_units as f64 {
            warn!(
                source = %g.label(s),
                supply,
                units = max_units,
                "supply exceeds the flow leaving the source, extra units skipped"
            );
            max_units
        } else {
            supply.round() as u64
        };
        debug!(source = %g.label(s), units = nunits, "decomposing supply");

        for _ in 0..nunits {
            let mut path = Path::start(s);
            path.end = loop {
                let u = path.last();
                if is_sink[u.index()] {
                    break PathEnd::Reached;
                }
                if !carries[u.index()] {
                    break PathEnd::Stuck;
                }
                match select(g, &residual, u, opts.order) {
                    Some(a) => {
                        residual[a.index()] -= 1;
                        path.push(g, a);
                    }
                    None => break PathEnd::DeadEnd,
                }
            };

            if !path.is_complete() {
                warn!(
                    source = %g.label(s),
                    last = %g.label(path.last()),
                    end = ?path.end,
                    "unit path does not reach a sink"
                );
            }
            paths.push(path);
        }
    }

    let d = Decomposition {
        paths,
        initial,
        residual,
    };
    info!(
        paths = d.paths.len(),
        complete = d.num_complete(),
        "flow decomposed into unit paths"
    );
    d
}

/// Select the next outgoing arc of `u` with remaining units.
fn select(g: &Network, residual: &[u64], u: Node, order: ArcOrder) -> Option<Arc> {
    let mut candidates = g.outarcs(u).iter().copied().filter(|a| residual[a.index()] > 0);
    match order {
        ArcOrder::Index => candidates.next(),
        ArcOrder::Cost => candidates.min_by(|&a, &b| g.cost(a).total_cmp(&g.cost(b))),
    }
}

#[cfg(test)]
mod tests {
    use super::{decompose, decompose_with, ArcOrder, DecomposeOptions};
    use crate::paths::PathEnd;
    use crate::{Flow, Network};

    use tracing_test::traced_test;

    fn fork() -> Network {
        Network::new_with(|b| {
            b.add_labelled_arc("A", "B", 1.0);
            b.add_labelled_arc("B", "C", 5.0);
            b.add_labelled_arc("B", "D", 2.0);
        })
    }

    #[test]
    fn test_fork() {
        let g = fork();
        let x = Flow::from_vec(vec![2.0, 1.0, 1.0]);
        let sinks = [g.node("C").unwrap(), g.node("D").unwrap()];
        let d = decompose(&g, &x, &[(g.node("A").unwrap(), 2.0)], &sinks);

        assert_eq!(d.paths.len(), 2);
        assert_eq!(d.num_complete(), 2);
        let ends = d.paths.iter().map(|p| g.label(p.last()).as_str()).collect::<Vec<_>>();
        assert_eq!(ends, vec!["C", "D"]);
        assert_eq!(d.paths[0].cost, 6.0);
        assert_eq!(d.paths[1].cost, 3.0);
        for a in g.arcs() {
            assert_eq!(d.residual(a), 0);
        }
    }

    #[test]
    fn test_cost_order() {
        let g = fork();
        let x = Flow::from_vec(vec![2.0, 1.0, 1.0]);
        let sinks = [g.node("C").unwrap(), g.node("D").unwrap()];
        let opts = DecomposeOptions {
            order: ArcOrder::Cost,
            ..DecomposeOptions::default()
        };
        let d = decompose_with(&g, &x, &[(g.node("A").unwrap(), 2.0)], &sinks, &opts);
        let routes = d.paths.iter().map(|p| p.display(&g).to_string()).collect::<Vec<_>>();
        assert_eq!(routes, vec!["A->B->D", "A->B->C"]);
    }

    #[test]
    fn test_consumption_bounded() {
        // Two sources sharing the arc 3->4, one unit too many at source 2.
        let g = Network::new_with(|b| {
            b.add_labelled_arc("1", "3", 1.0);
            b.add_labelled_arc("2", "3", 1.0);
            b.add_labelled_arc("3", "4", 1.0);
            b.add_labelled_arc("3", "5", 1.0);
        });
        let x = Flow::from_vec(vec![1.0, 1.9999, 2.0, 1.0000001]);
        let sources = [(g.node("1").unwrap(), 1.0), (g.node("2").unwrap(), 3.0)];
        let sinks = [g.node("4").unwrap(), g.node("5").unwrap()];
        let d = decompose(&g, &x, &sources, &sinks);

        assert_eq!(d.paths.len(), 4);
        assert_eq!(d.num_complete(), 3);
        assert_eq!(d.paths[3].end, PathEnd::DeadEnd);
        assert_eq!(d.paths[3].display(&g).to_string(), "2->(dead end)");
        for a in g.arcs() {
            assert!(d.consumed(a) <= x.get(a).round() as u64);
        }
        assert_eq!(d.consumed(g.id2arc(2)), 2);
        assert_eq!(d.consumed(g.id2arc(3)), 1);
    }

    #[test]
    fn test_stuck_and_ignored_sources() {
        let g = fork();
        let x = Flow::from_vec(vec![1.0, 0.0, 0.0]);
        let sources = [(g.node("A").unwrap(), 1.0), (g.node("C").unwrap(), 0.000001)];
        let d = decompose(&g, &x, &sources, &[g.node("D").unwrap()]);
        assert_eq!(d.paths.len(), 1);
        assert_eq!(d.paths[0].end, PathEnd::Stuck);
        assert_eq!(d.paths[0].display(&g).to_string(), "A->B->(stuck)");
    }

    #[test]
    fn test_source_in_sinks() {
        let g = fork();
        let x = Flow::from_vec(vec![1.0, 1.0, 0.0]);
        let a = g.node("A").unwrap();
        let d = decompose(&g, &x, &[(a, 1.0)], &[a]);
        assert_eq!(d.paths.len(), 1);
        assert!(d.paths[0].is_complete());
        assert_eq!(d.paths[0].nodes, vec![a]);
        assert_eq!(d.residual(g.id2arc(0)), 1);
    }

    #[test]
    fn test_cycle_consumes_flow() {
        // A cycle B -> E -> B carries flow, the path runs around it once.
        let g = Network::new_with(|b| {
            b.add_labelled_arc("A", "B", 1.0);
            b.add_labelled_arc("B", "E", 1.0);
            b.add_labelled_arc("E", "B", 1.0);
            b.add_labelled_arc("B", "C", 1.0);
        });
        let x = Flow::from_vec(vec![1.0, 1.0, 1.0, 1.0]);
        let d = decompose(&g, &x, &[(g.node("A").unwrap(), 1.0)], &[g.node("C").unwrap()]);
        assert_eq!(d.paths[0].display(&g).to_string(), "A->B->E->B->C");
    }

    #[test]
    fn test_long_cycle_reaches_sink() {
        // The cycle B -> E -> B is longer than the number of arcs allows
        // for a bounded walk, the unit still ends at the sink.
        let g = Network::new_with(|b| {
            b.add_labelled_arc("A", "B", 1.0);
            b.add_labelled_arc("B", "E", 1.0);
            b.add_labelled_arc("E", "B", 1.0);
            b.add_labelled_arc("B", "C", 1.0);
        });
        let x = Flow::from_vec(vec![1.0, 5.0, 5.0, 1.0]);
        let c = g.node("C").unwrap();
        let d = decompose(&g, &x, &[(g.node("A").unwrap(), 1.0)], &[c]);
        assert_eq!(d.paths.len(), 1);
        assert_eq!(d.paths[0].end, PathEnd::Reached);
        assert_eq!(d.paths[0].last(), c);
        assert_eq!(d.paths[0].arcs.len(), 12);
        for a in g.arcs() {
            assert_eq!(d.residual(a), 0);
        }
    }

    #[test]
    #[traced_test]
    fn test_unbounded_supply() {
        let g = fork();
        let x = Flow::from_vec(vec![2.0, 1.0, 1.0]);
        let sinks = [g.node("C").unwrap(), g.node("D").unwrap()];
        let a = g.node("A").unwrap();
        for &supply in &[f64::INFINITY, 1e12] {
            let d = decompose(&g, &x, &[(a, supply)], &sinks);
            assert_eq!(d.paths.len(), 3);
            assert_eq!(d.num_complete(), 2);
            assert_eq!(d.paths[2].display(&g).to_string(), "A->(dead end)");
        }
        assert!(logs_contain("supply exceeds the flow leaving the source"));

        let d = decompose(&g, &x, &[(a, f64::NAN)], &sinks);
        assert!(d.paths.is_empty());
    }
}
