/*
 * Copyright (c) 2021-2025 Frank Fischer <frank-fischer@shadow-soft.de>
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

//! This module implements read and write functions for the DIMACS min
//! cost flow format and its solution format. A DIMACS file must look as
//! follows.
//!
//! 1. empty lines are allowed and ignored
//! 2. a line starting with `c` is a comment line and is ignored
//! 3. the first non-comment line must have the form `p min <n> <m>`,
//!    where `<n>` is an integer > 0 denoting the number of nodes and
//!    `<m>` an integer > 0 denoting the number of arcs.
//! 4. after the problem line there follow node lines of the form
//!    `n <node> <balance>` where `<node>` is a node label and
//!    `<balance>` is node's supply (if positive) or demand (if
//!    negative). Nodes that have balance 0 do not need to be specified.
//! 5. after the node lines there must be exactly `m` arc lines `a <u>
//!    <v> <lb> <ub> <c>` denoting the tail and head nodes of an arc
//!    as well as the arcs lower bound `<lb>`, upper bound `<ub>` and
//!    cost `<c>`.
//!
//! Node labels are usually the numbers `1..n`, but any token without
//! whitespace is accepted. At most `n` different labels may be used.
//! Nodes are numbered in order of their first appearance.
//!
//! Loops are not allowed. Parallel arcs are accepted, although they are
//! forbidden in the "official" format.
//!
//! A solution file contains exactly one line `s <value>` (or `s
//! infeasible`, `s unbounded`), flow lines `f <u> <v> <flow>` and
//! optional lines `n <node> <supply>` reporting the supply a node sends
//! in the solution.

use super::{DimacsReader, Error, Result};
use crate::flow::Flow;
use crate::label::Label;
use crate::network::{Network, NetworkBuilder};

use std::io::{Read, Write};
use std::path::Path;

use tracing::debug;

/// A min-cost-flow instance.
pub struct Instance {
    /// The network, including the arc costs.
    pub network: Network,
    /// The node balances.
    pub balances: Vec<f64>,
    /// The lower bounds.
    pub lower: Vec<f64>,
    /// The upper bounds.
    pub upper: Vec<f64>,
}

pub fn read<R: Read>(r: R) -> Result<Instance> {
    let mut reader = DimacsReader::new(r);

    // Read the problem line.
    let mut pline = reader.expect_line('p')?;
    pline.expect("min")?;
    let nnodes: usize = pline.number()?;
    let narcs: usize = pline.number()?;
    pline.end()?;

    let mut b = NetworkBuilder::with_capacities(nnodes, narcs);
    let mut balances = vec![0.0; nnodes];
    let mut lower = Vec::with_capacity(narcs);
    let mut upper = Vec::with_capacity(narcs);

    let mut last_line = 0;
    while let Some((d, mut toks)) = reader.read_one_line_of(&["n", "a"])? {
        last_line = toks.line;
        if d == "n" {
            let label = toks.str()?;
            let balance = toks.number()?;
            let u = add_node(&mut b, label, nnodes, toks.line)?;
            balances[u.index()] = balance;
        } else {
            let tail = toks.str()?;
            let head = toks.str()?;
            let lb = toks.number()?;
            let ub = toks.number()?;
            let c = toks.number()?;

            if tail == head {
                return Err(Error::Data {
                    line: toks.line,
                    msg: format!("invalid loop ({},{}) in arc", tail, head),
                });
            }

            if upper.len() == narcs {
                return Err(Error::Data {
                    line: toks.line,
                    msg: format!("unexpected 'a' line (expected exactly {} arcs)", narcs),
                });
            }

            let u = add_node(&mut b, tail, nnodes, toks.line)?;
            let v = add_node(&mut b, head, nnodes, toks.line)?;
            b.add_arc(u, v, c);
            lower.push(lb);
            upper.push(ub);
        }

        toks.end()?;
    }

    if upper.len() != narcs {
        return Err(Error::Data {
            line: last_line,
            msg: format!("expected exactly {} arcs, got {}", narcs, upper.len()),
        });
    }

    let network = b.into_network();
    balances.truncate(network.num_nodes());
    debug!(nodes = network.num_nodes(), arcs = network.num_arcs(), "read min-cost-flow instance");

    Ok(Instance {
        network,
        balances,
        lower,
        upper,
    })
}

fn add_node(b: &mut NetworkBuilder, label: &str, nnodes: usize, line: usize) -> Result<crate::network::Node> {
    if b.node(label).is_none() && b.num_nodes() == nnodes {
        return Err(Error::Data {
            line,
            msg: format!("too many nodes, '{}' exceeds the declared {} nodes", label, nnodes),
        });
    }
    Ok(b.add_node(label))
}

pub fn read_from_file<P: AsRef<Path>>(filename: P) -> Result<Instance> {
    read(std::fs::File::open(filename)?)
}

/// Write a min-cost-flow instance.
pub fn write<W: Write>(mut w: W, instance: &Instance) -> std::io::Result<()> {
    let g = &instance.network;
    writeln!(w, "p min {} {}", g.num_nodes(), g.num_arcs())?;
    for u in g.nodes() {
        let b = instance.balances[u.index()];
        if b != 0.0 {
            writeln!(w, "n {} {}", g.label(u), b)?;
        }
    }
    for a in g.arcs() {
        writeln!(
            w,
            "a {} {} {} {} {}",
            g.label(g.tail(a)),
            g.label(g.head(a)),
            instance.lower[a.index()],
            instance.upper[a.index()],
            g.cost(a)
        )?;
    }

    Ok(())
}

/// The value line of a solution.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum SolutionValue {
    /// An optimal solution with the given objective value.
    Optimal(f64),
    /// The instance has no feasible solution.
    Infeasible,
    /// The instance is unbounded.
    Unbounded,
}

/// A solution of a min-cost-flow problem.
#[derive(Clone, Debug)]
pub struct Solution {
    pub value: SolutionValue,
    /// The flow lines `(tail, head, flow)`.
    pub flows: Vec<(Label, Label, f64)>,
    /// The supply lines `(node, supply)`.
    pub supplies: Vec<(Label, f64)>,
}

impl Solution {
    /// Assign the flow lines to the arcs of `g`.
    ///
    /// Each line is assigned to the first arc from tail to head that has
    /// not been assigned yet, so parallel arcs receive their flows in
    /// order.
    pub fn flow(&self, g: &Network) -> Result<Flow> {
        let mut flow = Flow::new(g);
        let mut assigned = vec![false; g.num_arcs()];
        for (tail, head, value) in &self.flows {
            let a = match (g.node(tail), g.node(head)) {
                (Some(u), Some(v)) => g
                    .outarcs(u)
                    .iter()
                    .copied()
                    .find(|&a| g.head(a) == v && !assigned[a.index()]),
                _ => None,
            };
            let a = a.ok_or_else(|| Error::Data {
                line: 0,
                msg: format!("flow on unknown arc ({},{})", tail, head),
            })?;
            assigned[a.index()] = true;
            flow.set(a, *value);
        }
        Ok(flow)
    }
}

/// Write a solution of a min-cost-flow problem.
///
/// Only arcs with non-zero flow are written.
pub fn write_solution<W, Fs>(mut w: W, g: &Network, flow: Fs, value: f64) -> std::io::Result<()>
where
    W: Write,
    Fs: Fn(crate::network::Arc) -> f64,
{
    writeln!(w, "s {}", value)?;
    for a in g.arcs() {
        let fl = (flow)(a);
        if fl != 0.0 {
            writeln!(w, "f {} {} {}", g.label(g.tail(a)), g.label(g.head(a)), fl)?;
        }
    }

    Ok(())
}

/// Read a solution of a min-cost-flow problem.
pub fn read_solution<R: Read>(r: R) -> Result<Solution> {
    let mut reader = DimacsReader::new(r);
    let mut flows = vec![];
    let mut supplies = vec![];
    let mut value = None;

    while let Some((d, mut toks)) = reader.read_one_line_of(&["f", "s", "n"])? {
        match d {
            "f" => {
                let tail = Label::from(toks.str()?);
                let head = Label::from(toks.str()?);
                flows.push((tail, head, toks.number()?));
            }
            "n" => {
                let u = Label::from(toks.str()?);
                supplies.push((u, toks.number()?));
            }
            _ => {
                if value.is_some() {
                    return Err(Error::Format {
                        line: toks.line,
                        msg: "The solution value must be specified exactly once".to_string(),
                    });
                }
                value = Some(match toks.str()? {
                    "infeasible" => SolutionValue::Infeasible,
                    "unbounded" => SolutionValue::Unbounded,
                    v => SolutionValue::Optimal(v.parse().map_err(|e| Error::Format {
                        line: toks.line,
                        msg: format!("{}", e),
                    })?),
                });
            }
        }
        toks.end()?;
    }

    Ok(Solution {
        value: value.ok_or_else(|| Error::Format {
            line: 0,
            msg: "Missing solution value".to_string(),
        })?,
        flows,
        supplies,
    })
}

/// Read a solution of a min-cost-flow problem from a named file.
pub fn read_solution_from_file<P: AsRef<Path>>(filename: P) -> Result<Solution> {
    read_solution(std::fs::File::open(filename)?)
}
