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

//! Tracing a single route through a flow.
//!
//! # Example
//!
//! ```
//! use rs_netpaths::{paths, Flow, Network};
//!
//! let g = Network::new_with(|b| {
//!     b.add_labelled_arc("1", "2", 4.0);
//!     b.add_labelled_arc("2", "3p", 1.5);
//!     b.add_labelled_arc("1", "3p", 9.0);
//! });
//! let x = Flow::from_vec(vec![1.0, 1.0, 0.0]);
//!
//! let p = paths::trace(&g, &x, g.node("1").unwrap(), g.node("3p").unwrap());
//! assert!(p.is_complete());
//! assert_eq!(p.cost, 5.5);
//! assert_eq!(p.display(&g).to_string(), "1->2->3p");
//! ```

use super::{walk, Path, PathEnd};
use crate::flow::Flow;
use crate::network::{Arc, Network, Node};

use tracing::{debug, warn};

/// Parameters of [`trace_with`].
#[derive(Clone, Debug)]
pub struct TraceOptions {
    /// Arcs with absolute flow above this value are followed.
    pub tolerance: f64,
    /// The walk is cut after `num_arcs + extra_steps` steps.
    pub extra_steps: usize,
}

impl Default for TraceOptions {
    fn default() -> Self {
        TraceOptions {
            tolerance: 0.5,
            extra_steps: 5,
        }
    }
}

/// Trace the route from `src` to `dst` along arcs carrying flow.
///
/// This is [`trace_with`] with default options.
pub fn trace(g: &Network, flow: &Flow, src: Node, dst: Node) -> Path {
    trace_with(g, flow, src, dst, &TraceOptions::default())
}

/// Trace the route from `src` to `dst` along arcs carrying flow.
///
/// Starting at `src` the walk repeatedly follows the outgoing arc whose
/// absolute flow exceeds `opts.tolerance`. If a node has several such arcs,
/// the one with the smallest arc id is chosen.
///
/// The walk stops if
/// - `dst` is reached ([`PathEnd::Reached`]),
/// - the current node has no arc carrying flow ([`PathEnd::Broken`],
///   displayed with the marker `(end?)`),
/// - `g.num_arcs() + opts.extra_steps` arcs have been followed
///   ([`PathEnd::StepLimit`], displayed without a marker).
pub fn trace_with(g: &Network, flow: &Flow, src: Node, dst: Node, opts: &TraceOptions) -> Path {
    let max_steps = g.num_arcs() + opts.extra_steps;
    let mut path = Path::start(src);
    let mut arcs = walk(src, |u| active_arc(g, flow, u, opts.tolerance).map(|a| (a, g.head(a))));

    path.end = loop {
        if path.last() == dst {
            break PathEnd::Reached;
        }
        if path.arcs.len() >= max_steps {
            break PathEnd::StepLimit;
        }
        match arcs.next() {
            Some((a, _)) => path.push(g, a),
            None => break PathEnd::Broken,
        }
    };

    if path.is_complete() {
        debug!(
            src = %g.label(src),
            dst = %g.label(dst),
            len = path.arcs.len(),
            cost = path.cost,
            "traced route"
        );
    } else {
        warn!(
            src = %g.label(src),
            dst = %g.label(dst),
            last = %g.label(path.last()),
            end = ?path.end,
            "route is broken"
        );
    }

    path
}

/// Return the first active outgoing arc of `u`.
fn active_arc(g: &Network, flow: &Flow, u: Node, tolerance: f64) -> Option<Arc> {
    let mut active = g.outarcs(u).iter().copied().filter(|&a| flow.is_active(a, tolerance));
    let a = active.next()?;
    if let Some(b) = active.next() {
        warn!(
            node = %g.label(u),
            chosen = %g.label(g.head(a)),
            other = %g.label(g.head(b)),
            "several outgoing arcs carry flow, following the first one"
        );
    }
    Some(a)
}
