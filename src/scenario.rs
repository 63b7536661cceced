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

//! Routing scenarios on top of a [`Session`].
//!
//! The model behind a session is a flow model over an arc set: parameters
//! `i` and `j` give the tail and head of each arc, `c` its cost, and the
//! variable `x` the flow. Two scenarios are supported:
//!
//! - [`route`]: send one unit from a start to an end node (by overriding
//!   the balance parameter), solve, and trace the route.
//! - [`dispatch`]: solve a multi source model whose supplies are variables
//!   and decompose the flow into one route per unit of supply.

use crate::flow::Flow;
use crate::label::Label;
use crate::network::{Arc, Network, NetworkBuilder};
use crate::paths::{self, DecomposeOptions, TraceOptions};
use crate::session::{self, Index, Session, SolveStatus, Value};

use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, warn};

/// Error of a scenario.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Session(#[from] session::Error),
    #[error("node '{0}' does not exist")]
    UnknownNode(Label),
    #[error("'{name}' has no entry for arc {index}")]
    MissingEntry { name: String, index: Index },
    #[error("'{name}[{index}]' is not a number: {value}")]
    NotANumber { name: String, index: Index, value: Value },
}

pub type Result<T> = std::result::Result<T, Error>;

/// The names of the model entities used by the scenarios.
#[derive(Clone, Debug)]
pub struct Names {
    /// The flow variable.
    pub flow: String,
    /// The tail parameter.
    pub tail: String,
    /// The head parameter.
    pub head: String,
    /// The cost parameter.
    pub cost: String,
    /// The balance parameter.
    pub balance: String,
    /// The supply variable.
    pub supply: String,
    /// The set of sinks.
    pub sinks: String,
    /// The objective of [`route`].
    pub route_objective: String,
    /// The objective of [`dispatch`].
    pub dispatch_objective: String,
}

impl Default for Names {
    fn default() -> Self {
        Names {
            flow: "x".to_string(),
            tail: "i".to_string(),
            head: "j".to_string(),
            cost: "c".to_string(),
            balance: "b".to_string(),
            supply: "supply".to_string(),
            sinks: "POWERSTATIONS".to_string(),
            route_objective: "Cost".to_string(),
            dispatch_objective: "TotalCost".to_string(),
        }
    }
}

/// The text shown instead of a route if the solve failed.
pub const FAILED_ROUTE: &str = "Infeasible/Error";

/// A route as shown in reports.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    pub start: Label,
    pub end: Label,
    /// The cost, `+inf` if the model could not be solved.
    pub cost: f64,
    /// The node sequence `A->B->C`.
    pub sequence: String,
    /// `true` if the route reaches its end.
    pub complete: bool,
}

impl Route {
    fn failed(start: Label, end: Label) -> Route {
        Route {
            start,
            end,
            cost: f64::INFINITY,
            sequence: FAILED_ROUTE.to_string(),
            complete: false,
        }
    }
}

/// Build the network of the arcs of a session.
///
/// Returns the network and the map from arc index to arc. The arcs are
/// created in the order of the tail parameter. A missing cost parameter
/// means zero costs.
pub fn network<S: Session + ?Sized>(session: &S, names: &Names) -> Result<(Network, HashMap<Index, Arc>)> {
    let tails = session.parameter(&names.tail)?;
    let heads = session.parameter(&names.head)?;
    let costs = match session.parameter(&names.cost) {
        Ok(costs) => Some(costs),
        Err(e) => {
            debug!(error = %e, "no arc costs, assuming zero");
            None
        }
    };

    let mut b = NetworkBuilder::with_capacities(0, tails.len());
    let mut arcs = HashMap::with_capacity(tails.len());
    for (index, tail) in tails.iter() {
        let head = heads.get(index).ok_or_else(|| Error::MissingEntry {
            name: names.head.clone(),
            index: index.clone(),
        })?;
        let cost = match costs.as_ref().and_then(|c| c.get(index)) {
            Some(c) => number(&names.cost, index, c)?,
            None => 0.0,
        };
        let a = b.add_labelled_arc(tail.to_label(), head.to_label(), cost);
        arcs.insert(index.clone(), a);
    }

    Ok((b.into_network(), arcs))
}

/// Read the flow variable of a session.
pub fn flow<S: Session + ?Sized>(session: &S, names: &Names, g: &Network, arcs: &HashMap<Index, Arc>) -> Result<Flow> {
    let mut flow = Flow::new(g);
    for (index, value) in session.variable(&names.flow)?.iter() {
        let a = arcs.get(index).ok_or_else(|| Error::MissingEntry {
            name: names.tail.clone(),
            index: index.clone(),
        })?;
        flow.set(*a, number(&names.flow, index, value)?);
    }
    Ok(flow)
}

fn number(name: &str, index: &Index, value: &Value) -> Result<f64> {
    value.as_f64().ok_or_else(|| Error::NotANumber {
        name: name.to_string(),
        index: index.clone(),
        value: value.clone(),
    })
}

/// Solve a single route from `start` to `end`.
///
/// The balance of `start` is set to 1 and that of `end` to -1. If the
/// solve does not succeed (or fails altogether), the returned route has
/// infinite cost and the sequence [`FAILED_ROUTE`]. The cost of a solved
/// route is the objective value.
pub fn route<S: Session + ?Sized>(
    session: &mut S,
    names: &Names,
    start: Label,
    end: Label,
    opts: &TraceOptions,
) -> Result<Route> {
    session.set_param(&names.balance, Index::from(&start), Value::Num(1.0))?;
    session.set_param(&names.balance, Index::from(&end), Value::Num(-1.0))?;

    match session.solve() {
        Ok(SolveStatus::Solved) => {}
        Ok(status) => {
            warn!(%start, %end, %status, "route not solved");
            return Ok(Route::failed(start, end));
        }
        Err(e) => {
            warn!(%start, %end, error = %e, "solve failed");
            return Ok(Route::failed(start, end));
        }
    }

    let cost = session.objective(&names.route_objective)?;
    let (g, arcs) = network(&*session, names)?;
    let x = flow(&*session, names, &g, &arcs)?;

    let src = g.node(&start).ok_or_else(|| Error::UnknownNode(start.clone()))?;
    let dst = g.node(&end).ok_or_else(|| Error::UnknownNode(end.clone()))?;
    let path = paths::trace_with(&g, &x, src, dst, opts);

    Ok(Route {
        sequence: path.display(&g).to_string(),
        complete: path.is_complete(),
        start,
        end,
        cost,
    })
}

/// The result of [`dispatch`].
#[derive(Clone, Debug)]
pub struct Dispatch {
    pub status: SolveStatus,
    /// The objective value (`+inf` if not solved).
    pub objective: f64,
    /// The sources and their supply in the order of the supply variable.
    pub sources: Vec<(Label, f64)>,
    /// One route per unit of supply.
    pub routes: Vec<Route>,
}

/// Solve a multi source model and decompose its flow into unit routes.
///
/// Sources are the entries of the supply variable above the tolerance,
/// sinks the members of the sink set. Sinks that are no arc endpoints
/// are ignored.
pub fn dispatch<S: Session + ?Sized>(session: &mut S, names: &Names, opts: &DecomposeOptions) -> Result<Dispatch> {
    let status = match session.solve() {
        Ok(status) => status,
        Err(e) => SolveStatus::Failed(e.to_string()),
    };
    if !status.is_solved() {
        warn!(%status, "dispatch not solved");
        return Ok(Dispatch {
            status,
            objective: f64::INFINITY,
            sources: vec![],
            routes: vec![],
        });
    }

    let objective = session.objective(&names.dispatch_objective)?;
    let (g, arcs) = network(&*session, names)?;
    let x = flow(&*session, names, &g, &arcs)?;

    let mut sources = vec![];
    for (index, value) in session.variable(&names.supply)?.iter() {
        let supply = number(&names.supply, index, value)?;
        if supply <= opts.tolerance {
            continue;
        }
        let label = match index.0.as_slice() {
            [l] => l.clone(),
            _ => {
                return Err(Error::MissingEntry {
                    name: names.supply.clone(),
                    index: index.clone(),
                })
            }
        };
        let u = g.node(&label).ok_or(Error::UnknownNode(label))?;
        debug!(source = %g.label(u), supply, "source");
        sources.push((u, supply));
    }

    let mut sinks = vec![];
    for t in session.set(&names.sinks)? {
        match g.node(&t) {
            Some(v) => sinks.push(v),
            None => warn!(sink = %t, "sink is not in the network"),
        }
    }

    let d = paths::decompose_with(&g, &x, &sources, &sinks, opts);
    let routes = d
        .paths
        .iter()
        .map(|p| Route {
            start: g.label(p.source()).clone(),
            end: g.label(p.last()).clone(),
            cost: p.cost,
            sequence: p.display(&g).to_string(),
            complete: p.is_complete(),
        })
        .collect();

    Ok(Dispatch {
        status,
        objective,
        sources: sources.iter().map(|&(u, supply)| (g.label(u).clone(), supply)).collect(),
        routes,
    })
}
