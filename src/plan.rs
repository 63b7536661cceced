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

//! Plan reports on top of a [`Session`].
//!
//! Each report solves the model of a session and lists the relevant part
//! of the solution:
//!
//! - [`product_mix`]: objective `Profit`, the products of set `P` with
//!   their production `x[p]`,
//! - [`purchase_plan`]: objective `Cost`, the units `x[s,t]` bought from
//!   supplier `s` in price tier `t` at `Tier_Costs[s,t]`,
//! - [`test_plan`]: objective `Time`, the switches `x[i,j] = 1` between
//!   engines with switchover times `s[i,j]` and processing times `p[j]`.
//!
//! A sweep over the models of a branch-and-bound run reports the product
//! mix of each model in the order given by [`sweep_order`].

use crate::report::{group_thousands, listing, objective_line};
use crate::session::{self, Index, Session, SolveStatus, Value, Values};

use std::path::PathBuf;

use tracing::{info, warn};

/// Entries not exceeding this value are not listed.
const THRESHOLD: f64 = 0.001;

/// The text of the status line of a model that could not be solved.
pub const FAILED_STATUS: &str = "Infeasible/Error";

/// The lines of a report.
#[derive(Clone, Debug, PartialEq)]
pub struct Plan {
    pub status: SolveStatus,
    pub lines: Vec<String>,
}

impl Plan {
    fn failed(status: SolveStatus) -> Plan {
        let msg = match &status {
            SolveStatus::Failed(msg) => msg.clone(),
            status => status.to_string(),
        };
        warn!(%status, "model not solved");
        Plan {
            lines: vec![format!("Status: {} - {}", FAILED_STATUS, msg)],
            status,
        }
    }
}

fn separator() -> String {
    "-".repeat(30)
}

/// Solve and return the status, failures of the session become a status.
fn solve<S: Session + ?Sized>(session: &mut S) -> SolveStatus {
    match session.solve() {
        Ok(status) => status,
        Err(e) => SolveStatus::Failed(e.to_string()),
    }
}

fn number(name: &str, index: &Index, value: &Value) -> session::Result<f64> {
    value.as_f64().ok_or_else(|| session::Error::UnknownIndex {
        name: name.to_string(),
        index: index.clone(),
    })
}

/// Split a two dimensional index.
fn pair(name: &str, index: &Index) -> session::Result<(Index, Index)> {
    match index.0.as_slice() {
        [a, b] => Ok((Index::from(a), Index::from(b))),
        _ => Err(session::Error::UnknownIndex {
            name: name.to_string(),
            index: index.clone(),
        }),
    }
}

/// Report the production plan of a product mix model.
///
/// Failing to read the solution does not abort the report, the error is
/// shown as its last line instead.
pub fn product_mix<S: Session + ?Sized>(session: &mut S) -> Plan {
    let status = solve(session);
    if !status.is_solved() {
        return Plan::failed(status);
    }

    let mut lines = vec![];
    if let Err(e) = product_mix_lines(&*session, &mut lines) {
        warn!(error = %e, "incomplete product mix");
        lines.push(format!("Error extracting results: {}", e));
    }
    info!(lines = lines.len(), "product mix reported");
    Plan { status, lines }
}

fn product_mix_lines<S: Session + ?Sized>(session: &S, lines: &mut Vec<String>) -> session::Result<()> {
    let profit = session.objective("Profit")?;
    lines.push(format!("Objective value (Total Profit): ${}", group_thousands(profit, 2)));
    lines.push(separator());
    lines.push("Production Plan:".to_string());

    let x = session.variable("x")?;
    let production = session
        .set("P")?
        .into_iter()
        .filter_map(|p| {
            let index = Index::from(p);
            x.get(&index).cloned().map(|value| (index, value))
        })
        .collect::<Values>();
    lines.extend(listing(&production, THRESHOLD, "Product", "units"));
    Ok(())
}

/// Order the models of a sweep.
///
/// The `integer` model comes first, then the `relaxation`, then all
/// `node*` models in lexicographic order. Other files are dropped.
pub fn sweep_order<I: IntoIterator<Item = PathBuf>>(files: I) -> Vec<PathBuf> {
    let mut models = files
        .into_iter()
        .filter_map(|path| {
            let stem = path.file_stem()?.to_str()?.to_string();
            let rank = match stem.as_str() {
                "integer" => 0,
                "relaxation" => 1,
                s if s.starts_with("node") => 2,
                _ => return None,
            };
            Some((rank, stem, path))
        })
        .collect::<Vec<_>>();
    models.sort();
    models.into_iter().map(|(_, _, path)| path).collect()
}

/// Report the purchase plan of a supplier selection model.
///
/// Suppliers are listed in order of their first entry in `x`. A supplier
/// with a single tier is shown with its fixed rate, otherwise every active
/// tier is listed.
pub fn purchase_plan<S: Session + ?Sized>(session: &mut S) -> session::Result<Plan> {
    let status = solve(session);
    if !status.is_solved() {
        return Ok(Plan::failed(status));
    }

    let cost = session.objective("Cost")?;
    let x = session.variable("x")?;
    let tier_costs = session.parameter("Tier_Costs")?;

    // (supplier, [(tier, units, cost per unit)])
    let mut suppliers: Vec<(Index, Vec<(Index, f64, f64)>)> = vec![];
    for (index, value) in x.iter() {
        let (supplier, tier) = pair("x", index)?;
        let units = number("x", index, value)?;
        let price = match tier_costs.get(index) {
            Some(c) => number("Tier_Costs", index, c)?,
            None => 0.0,
        };
        match suppliers.iter_mut().find(|(s, _)| *s == supplier) {
            Some((_, tiers)) => tiers.push((tier, units, price)),
            None => suppliers.push((supplier, vec![(tier, units, price)])),
        }
    }

    let mut lines = vec![
        format!("Objective value (Total Cost): ${}", group_thousands(cost, 2)),
        separator(),
        "Purchase Plan:".to_string(),
    ];
    for (supplier, tiers) in &suppliers {
        let total = tiers.iter().map(|&(_, units, _)| units).sum::<f64>();
        if total <= THRESHOLD {
            continue;
        }
        lines.push(format!("  - Supplier {}: {} units", supplier, total.round()));
        if let [(_, _, price)] = tiers.as_slice() {
            lines.push(format!("      - Fixed Rate: ${:.2}/unit", price));
            continue;
        }
        for (tier, units, price) in tiers.iter().filter(|&&(_, units, _)| units > THRESHOLD) {
            lines.push(format!(
                "      - Tier {} Active: {} units @ ${:.2}/unit",
                tier,
                units.round(),
                price
            ));
        }
    }

    info!(suppliers = suppliers.len(), "purchase plan reported");
    Ok(Plan { status, lines })
}

/// Report the test sequence of an engine test model.
///
/// Every switch `x[i,j] = 1` is listed with its switchover time and the
/// processing time of engine `j`.
pub fn test_plan<S: Session + ?Sized>(session: &mut S) -> session::Result<Plan> {
    let status = solve(session);
    if !status.is_solved() {
        return Ok(Plan::failed(status));
    }

    let time = session.objective("Time")?;
    let x = session.variable("x")?;
    let switchover = session.parameter("s")?;
    let processing = session.parameter("p")?;

    let mut lines = vec![
        objective_line("Objective value (Total Time)", time),
        separator(),
        "Test Plan:".to_string(),
    ];
    for (index, value) in x.iter() {
        if (number("x", index, value)? - 1.0).abs() > 1e-6 {
            continue;
        }
        let (from, to) = pair("x", index)?;
        let s = switchover.get(index).ok_or_else(|| session::Error::UnknownIndex {
            name: "s".to_string(),
            index: index.clone(),
        })?;
        let p = processing.get(&to).ok_or_else(|| session::Error::UnknownIndex {
            name: "p".to_string(),
            index: to.clone(),
        })?;
        lines.push(format!("  - Switch from Engine {} to Engine {}", from, to));
        lines.push(format!("      - Switchover Time: {}", s));
        lines.push(format!("      - Processing Time: {}", p));
    }

    info!(lines = lines.len(), "test plan reported");
    Ok(Plan { status, lines })
}

#[cfg(test)]
mod tests {
    use super::{product_mix, purchase_plan, sweep_order, test_plan};
    use crate::dimacs::table;
    use crate::session::{SolveStatus, TableSession};
    use std::io::Cursor;
    use std::path::PathBuf;

    fn session(text: &str) -> TableSession {
        TableSession::with_table(table::read(Cursor::new(text)).unwrap())
    }

    #[test]
    fn test_product_mix() {
        let mut s = session(
            "s solved
o Profit 6510631.58
e P WingSpar WingRib FuselagePanel
v x WingSpar 167
v x WingRib 101.666667
v x FuselagePanel 0
",
        );
        let plan = product_mix(&mut s);
        assert_eq!(plan.status, SolveStatus::Solved);
        assert_eq!(
            plan.lines,
            vec![
                "Objective value (Total Profit): $6,510,631.58",
                "------------------------------",
                "Production Plan:",
                "  - Product WingSpar: 167.00 units",
                "  - Product WingRib: 101.67 units",
            ]
        );
    }

    #[test]
    fn test_product_mix_failures() {
        let mut s = session("s failed Gurobi license expired\n");
        let plan = product_mix(&mut s);
        assert!(!plan.status.is_solved());
        assert_eq!(plan.lines, vec!["Status: Infeasible/Error - Gurobi license expired"]);

        let mut s = session("s infeasible\n");
        assert_eq!(product_mix(&mut s).lines, vec!["Status: Infeasible/Error - infeasible"]);

        // The objective is there, the production is not.
        let mut s = session("s solved\no Profit 10\n");
        let plan = product_mix(&mut s);
        assert_eq!(plan.lines.len(), 4);
        assert_eq!(plan.lines[0], "Objective value (Total Profit): $10.00");
        assert_eq!(plan.lines[3], "Error extracting results: unknown variable 'x'");
    }

    #[test]
    fn test_sweep_order() {
        let files = vec!["node10.tab", "relaxation.tab", "problem4.tab", "node02.tab", "integer.tab"]
            .into_iter()
            .map(PathBuf::from);
        assert_eq!(
            sweep_order(files),
            vec![
                PathBuf::from("integer.tab"),
                PathBuf::from("relaxation.tab"),
                PathBuf::from("node02.tab"),
                PathBuf::from("node10.tab"),
            ]
        );
    }

    #[test]
    fn test_purchase_plan() {
        let mut s = session(
            "s solved
o Cost 6448827
v x A 1 1000
v x A 2 500
v x B 1 250.0000001
v x C 1 0
v x C 2 0
d Tier_Costs A 1 12.5
d Tier_Costs A 2 11
d Tier_Costs B 1 13.25
",
        );
        let plan = purchase_plan(&mut s).unwrap();
        assert_eq!(
            plan.lines,
            vec![
                "Objective value (Total Cost): $6,448,827.00",
                "------------------------------",
                "Purchase Plan:",
                "  - Supplier A: 1500 units",
                "      - Tier 1 Active: 1000 units @ $12.50/unit",
                "      - Tier 2 Active: 500 units @ $11.00/unit",
                "  - Supplier B: 250 units",
                "      - Fixed Rate: $13.25/unit",
            ]
        );

        let mut s = session("s solved\no Cost 1\nv x A 1\nd Tier_Costs A 1 1\n");
        assert!(purchase_plan(&mut s).is_err());
    }

    #[test]
    fn test_test_plan() {
        let mut s = session(
            "s solved
o Time 1234.5
v x 1 2 1
v x 2 1 0
v x 2 3 1
d s 1 2 4
d s 2 1 5
d s 2 3 2.5
d p 1 10
d p 2 20
d p 3 30
",
        );
        let plan = test_plan(&mut s).unwrap();
        assert_eq!(
            plan.lines,
            vec![
                "Objective value (Total Time): 1,234.50",
                "------------------------------",
                "Test Plan:",
                "  - Switch from Engine 1 to Engine 2",
                "      - Switchover Time: 4",
                "      - Processing Time: 20",
                "  - Switch from Engine 2 to Engine 3",
                "      - Switchover Time: 2.5",
                "      - Processing Time: 30",
            ]
        );

        let mut s = session("s unbounded\n");
        let plan = test_plan(&mut s).unwrap();
        assert_eq!(plan.status, SolveStatus::Unbounded);
        assert_eq!(plan.lines, vec!["Status: Infeasible/Error - unbounded"]);
    }
}
