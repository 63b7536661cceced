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

//! Replaying solver output.
//!
//! A [`ReplaySession`] does not solve anything. Its model is a DIMACS
//! min-cost-flow instance, its data a DIMACS solution written by some
//! solver. The session exposes them under the following names:
//!
//! | kind      | name            | index      | value                        |
//! |-----------|-----------------|------------|------------------------------|
//! | set       | `NODES`         |            | node labels                  |
//! | set       | `ARCS`          |            | arc numbers `1..m`           |
//! | set       | `POWERSTATIONS` |            | nodes with negative balance  |
//! | parameter | `i`, `j`        | arc number | tail and head label          |
//! | parameter | `c`, `l`, `u`   | arc number | cost, lower and upper bound  |
//! | parameter | `b`             | node       | balance                      |
//! | variable  | `x`             | arc number | flow                         |
//! | variable  | `supply`        | node       | supply sent by the node      |
//! | objective | any name        |            | solution value               |
//!
//! The supply of a node is taken from the `n` lines of the solution; if
//! there are none, the positive balances are used.
//!
//! [`solve`](Session::solve) checks that the replayed flow satisfies the
//! node balances (unless the solution reports supplies), so replaying a
//! solution against changed balances reports a failure.

use super::{Error, Index, Result, Session, SolveStatus, Value, Values};
use crate::dimacs::min::{self, Instance, Solution, SolutionValue};
use crate::flow::Flow;
use crate::label::Label;
use crate::network::Node;

use std::path::Path;

use tracing::{debug, info};

/// Balances must be met up to this value.
const BALANCE_TOLERANCE: f64 = 1e-6;

/// An offline session replaying DIMACS files.
#[derive(Default)]
pub struct ReplaySession {
    instance: Option<Instance>,
    solution: Option<(Solution, Flow)>,
    balances: Vec<f64>,
    status: Option<SolveStatus>,
}

impl ReplaySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an already parsed instance as model.
    pub fn with_instance(instance: Instance) -> Self {
        let mut session = ReplaySession::new();
        session.load_instance(instance);
        session
    }

    /// Use an already parsed solution as data.
    pub fn load_solution(&mut self, solution: Solution) -> Result<()> {
        let instance = self.instance.as_ref().ok_or(Error::NoModel)?;
        let flow = solution.flow(&instance.network)?;
        self.solution = Some((solution, flow));
        self.status = None;
        Ok(())
    }

    fn load_instance(&mut self, instance: Instance) {
        self.balances = instance.balances.clone();
        self.instance = Some(instance);
        self.solution = None;
        self.status = None;
    }

    fn instance(&self) -> Result<&Instance> {
        self.instance.as_ref().ok_or(Error::NoModel)
    }

    fn solved(&self) -> Result<&(Solution, Flow)> {
        match (&self.status, &self.solution) {
            (Some(SolveStatus::Solved), Some(sol)) => Ok(sol),
            _ => Err(Error::NoSolution),
        }
    }

    fn node(&self, name: &str, index: &Index) -> Result<Node> {
        let instance = self.instance()?;
        let u = match index.0.as_slice() {
            [l] => instance.network.node(l),
            _ => None,
        };
        u.ok_or_else(|| Error::UnknownIndex {
            name: name.to_string(),
            index: index.clone(),
        })
    }

    /// Check that the flow satisfies the current balances.
    fn check_balances(&self, flow: &Flow) -> Option<Node> {
        let g = &self.instance.as_ref()?.network;
        let mut excess = vec![0.0; g.num_nodes()];
        for a in g.arcs() {
            excess[g.tail(a).index()] += flow.get(a);
            excess[g.head(a).index()] -= flow.get(a);
        }
        g.nodes()
            .find(|u| (excess[u.index()] - self.balances[u.index()]).abs() > BALANCE_TOLERANCE)
    }
}

impl Session for ReplaySession {
    fn read_model(&mut self, path: &Path) -> Result<()> {
        let instance = min::read_from_file(path)?;
        info!(path = %path.display(), "model loaded");
        self.load_instance(instance);
        Ok(())
    }

    fn read_data(&mut self, path: &Path) -> Result<()> {
        self.instance()?;
        let solution = min::read_solution_from_file(path)?;
        info!(path = %path.display(), "data loaded");
        self.load_solution(solution)
    }

    fn set_param(&mut self, name: &str, index: Index, value: Value) -> Result<()> {
        if name != "b" {
            return Err(Error::Unknown {
                kind: "settable parameter",
                name: name.to_string(),
            });
        }
        let u = self.node(name, &index)?;
        let value = value.as_f64().ok_or_else(|| Error::UnknownIndex {
            name: name.to_string(),
            index: index.clone(),
        })?;
        debug!(node = %index, value, "balance overridden");
        self.balances[u.index()] = value;
        self.status = None;
        Ok(())
    }

    fn solve(&mut self) -> Result<SolveStatus> {
        self.instance()?;
        let status = match &self.solution {
            None => SolveStatus::Failed("no solution data".to_string()),
            Some((sol, flow)) => match sol.value {
                SolutionValue::Infeasible => SolveStatus::Infeasible,
                SolutionValue::Unbounded => SolveStatus::Unbounded,
                SolutionValue::Optimal(_) if !sol.supplies.is_empty() => SolveStatus::Solved,
                SolutionValue::Optimal(_) => match self.check_balances(flow) {
                    None => SolveStatus::Solved,
                    Some(u) => SolveStatus::Failed(format!(
                        "flow violates the balance of node {}",
                        self.instance()?.network.label(u)
                    )),
                },
            },
        };
        debug!(%status, "replayed solve");
        self.status = Some(status.clone());
        Ok(status)
    }

    fn objective(&self, name: &str) -> Result<f64> {
        let (sol, _) = self.solved()?;
        match sol.value {
            SolutionValue::Optimal(value) => Ok(value),
            _ => Err(Error::Unknown {
                kind: "objective",
                name: name.to_string(),
            }),
        }
    }

    fn variable(&self, name: &str) -> Result<Values> {
        let (sol, flow) = self.solved()?;
        let g = &self.instance()?.network;
        match name {
            "x" => Ok(g.arcs().map(|a| (a.index() + 1, flow.get(a))).collect()),
            "supply" if !sol.supplies.is_empty() => Ok(sol.supplies.iter().map(|(u, s)| (u, *s)).collect()),
            "supply" => Ok(g
                .nodes()
                .filter(|u| self.balances[u.index()] > 0.0)
                .map(|u| (g.label(u), self.balances[u.index()]))
                .collect()),
            _ => Err(Error::Unknown {
                kind: "variable",
                name: name.to_string(),
            }),
        }
    }

    fn parameter(&self, name: &str) -> Result<Values> {
        let instance = self.instance()?;
        let g = &instance.network;
        let label_value = |u: Node| Value::parse(g.label(u).as_str());
        let values = match name {
            "i" => g.arcs().map(|a| (a.index() + 1, label_value(g.tail(a)))).collect(),
            "j" => g.arcs().map(|a| (a.index() + 1, label_value(g.head(a)))).collect(),
            "c" => g.arcs().map(|a| (a.index() + 1, g.cost(a))).collect(),
            "l" => g.arcs().map(|a| (a.index() + 1, instance.lower[a.index()])).collect(),
            "u" => g.arcs().map(|a| (a.index() + 1, instance.upper[a.index()])).collect(),
            "b" => g.nodes().map(|u| (g.label(u), self.balances[u.index()])).collect(),
            _ => {
                return Err(Error::Unknown {
                    kind: "parameter",
                    name: name.to_string(),
                })
            }
        };
        Ok(values)
    }

    fn set(&self, name: &str) -> Result<Vec<Label>> {
        let g = &self.instance()?.network;
        match name {
            "NODES" => Ok(g.nodes().map(|u| g.label(u).clone()).collect()),
            "ARCS" => Ok(g.arcs().map(|a| Label::from(a.index() + 1)).collect()),
            "POWERSTATIONS" => Ok(g
                .nodes()
                .filter(|u| self.balances[u.index()] < 0.0)
                .map(|u| g.label(u).clone())
                .collect()),
            _ => Err(Error::Unknown {
                kind: "set",
                name: name.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ReplaySession;
    use crate::dimacs::min;
    use crate::session::{Error, Index, Session, SolveStatus, Value};
    use crate::Label;
    use std::io::Cursor;

    const MODEL: &str = "p min 4 4\na 1 2 0 1 2\na 2 3p 0 1 3\na 1 3p 0 1 9\na 3p 4 0 1 1\n";

    fn session() -> ReplaySession {
        ReplaySession::with_instance(min::read(Cursor::new(MODEL)).unwrap())
    }

    #[test]
    fn test_replay_route() {
        let mut s = session();
        s.load_solution(min::read_solution(Cursor::new("s 5\nf 1 2 1\nf 2 3p 1\n")).unwrap())
            .unwrap();

        // Balances are all zero, the flow does not match.
        assert!(matches!(s.solve().unwrap(), SolveStatus::Failed(_)));
        assert!(matches!(s.objective("Cost"), Err(Error::NoSolution)));

        s.set_param("b", Index::from("1"), Value::Num(1.0)).unwrap();
        s.set_param("b", Index::from("3p"), Value::Num(-1.0)).unwrap();
        assert_eq!(s.solve().unwrap(), SolveStatus::Solved);
        assert_eq!(s.objective("Cost").unwrap(), 5.0);

        let x = s.variable("x").unwrap();
        assert_eq!(x.get(&Index::from(1usize)), Some(&Value::Num(1.0)));
        assert_eq!(x.get(&Index::from(3usize)), Some(&Value::Num(0.0)));

        let i = s.parameter("i").unwrap();
        assert_eq!(i.get(&Index::from(2usize)), Some(&Value::Num(2.0)));
        let j = s.parameter("j").unwrap();
        assert_eq!(j.get(&Index::from(2usize)), Some(&Value::Sym("3p".to_string())));

        assert_eq!(s.set("POWERSTATIONS").unwrap(), vec![Label::from("3p")]);
        assert_eq!(s.set("ARCS").unwrap().len(), 4);
    }

    #[test]
    fn test_replay_errors() {
        let mut s = ReplaySession::new();
        assert!(matches!(s.solve(), Err(Error::NoModel)));
        assert!(matches!(s.parameter("i"), Err(Error::NoModel)));

        let mut s = session();
        assert!(matches!(s.solve().unwrap(), SolveStatus::Failed(_)));
        assert!(matches!(
            s.set_param("b", Index::from("7"), Value::Num(1.0)),
            Err(Error::UnknownIndex { .. })
        ));
        assert!(matches!(
            s.set_param("c", Index::from("1"), Value::Num(1.0)),
            Err(Error::Unknown { .. })
        ));
        assert!(matches!(s.set("FOO"), Err(Error::Unknown { .. })));

        s.load_solution(min::read_solution(Cursor::new("s infeasible\n")).unwrap())
            .unwrap();
        assert_eq!(s.solve().unwrap(), SolveStatus::Infeasible);
        assert!(s.variable("x").is_err());
    }

    #[test]
    fn test_replay_supplies() {
        let mut s = session();
        s.load_solution(min::read_solution(Cursor::new("s 3\nn 1 1\nf 1 3p 1\n")).unwrap())
            .unwrap();
        assert_eq!(s.solve().unwrap(), SolveStatus::Solved);
        let supply = s.variable("supply").unwrap();
        assert_eq!(supply.len(), 1);
        assert_eq!(supply.get(&Index::from("1")), Some(&Value::Num(1.0)));
        assert!(matches!(s.variable("y"), Err(Error::Unknown { .. })));
    }
}
