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

use std::error::Error;
use std::fs;
use std::path::Path;

use rs_netpaths::plan;
use rs_netpaths::{Session, TableSession};

const DIR: &str = "demos/data/plans";

#[test]
fn test_sweep() -> Result<(), Box<dyn Error>> {
    let mut files = vec![];
    for entry in fs::read_dir(DIR)? {
        files.push(entry?.path());
    }
    let models = plan::sweep_order(files);
    let names = models
        .iter()
        .filter_map(|p| p.file_stem().and_then(|s| s.to_str()))
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["integer", "relaxation", "node01", "node02", "node03"]);

    let mut reports = vec![];
    for model in &models {
        let mut s = TableSession::new();
        s.read_model(model)?;
        s.read_data(&Path::new(DIR).join("problem4.tab"))?;
        reports.push(plan::product_mix(&mut s));
    }

    assert_eq!(
        reports[0].lines,
        vec![
            "Objective value (Total Profit): $6,507,021.00",
            "------------------------------",
            "Production Plan:",
            "  - Product WingSpar: 167.00 units",
            "  - Product WingRib: 104.00 units",
            "  - Product FuselagePanel: 2.00 units",
        ]
    );
    assert_eq!(reports[1].lines.len(), 5);
    assert!(!reports[3].status.is_solved());
    assert_eq!(
        reports[3].lines,
        vec!["Status: Infeasible/Error - presolve: problem is infeasible"]
    );
    assert_eq!(reports[4].lines[5], "  - Product FuselagePanel: 0.20 units");
    Ok(())
}

#[test]
fn test_purchase_and_test_plans() -> Result<(), Box<dyn Error>> {
    let mut s = TableSession::new();
    s.read_model(&Path::new(DIR).join("problem1.tab"))?;
    let p = plan::purchase_plan(&mut s)?;
    assert_eq!(p.lines[0], "Objective value (Total Cost): $1,072,500.00");
    assert_eq!(p.lines[3], "  - Supplier A: 30000 units");
    assert_eq!(p.lines[4], "      - Tier 1 Active: 20000 units @ $25.00/unit");
    assert_eq!(p.lines[7], "      - Fixed Rate: $23.50/unit");
    assert_eq!(p.lines.len(), 8);

    let mut s = TableSession::new();
    s.read_model(&Path::new(DIR).join("problem2.tab"))?;
    let p = plan::test_plan(&mut s)?;
    assert_eq!(p.lines[0], "Objective value (Total Time): 72.00");
    assert_eq!(p.lines[3], "  - Switch from Engine 1 to Engine 3");
    assert_eq!(p.lines.len(), 3 + 3 * 3);
    Ok(())
}
