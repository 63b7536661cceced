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

use rs_netpaths::plan::{self, Plan};
use rs_netpaths::report::Output;
use rs_netpaths::session::{self, TableSession};
use rs_netpaths::{Session, SolveStatus};

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use rustop::opts;
use tracing_subscriber::EnvFilter;

/// Solve a single table model and print the report lines.
fn single<F>(dir: &Path, name: &str, report: F) -> Result<(), Box<dyn Error>>
where
    F: FnOnce(&mut TableSession) -> session::Result<Plan>,
{
    let mut session = TableSession::new();
    session.read_model(&dir.join(format!("{}.tab", name)))?;

    println!("Solving model...");
    let plan = report(&mut session)?;
    println!("Solve complete.\n");

    println!("--- Results ---");
    let mut out = Output::new(name);
    out.extend(plan.lines);
    if let Some(path) = out.finish()? {
        println!("\nOutput also written to {}", path.display());
    }
    Ok(())
}

/// Report the product mix of every model of a branch-and-bound run.
fn sweep(dir: &Path) -> Result<(), Box<dyn Error>> {
    let data = dir.join("problem4.tab");
    let mut files = vec![];
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().map_or(false, |ext| ext == "tab") {
            files.push(path);
        }
    }

    for model in plan::sweep_order(files) {
        let name = model.file_stem().and_then(|s| s.to_str()).unwrap_or("model").to_string();
        println!("Running model: {}...", model.display());
        let mut session = TableSession::new();
        session.read_model(&model)?;
        if data.exists() {
            session.read_data(&data)?;
        }

        println!("Solving model...");
        let plan = plan::product_mix(&mut session);
        match &plan.status {
            SolveStatus::Solved => println!("Solve complete.\n"),
            status => println!("Solve failed: {}\n", status),
        }

        println!("--- Results for {} ---", model.display());
        let mut out = Output::new(&name);
        out.extend(plan.lines);
        println!("\n");
        if let Some(path) = out.finish()? {
            println!("Output also written to {}", path.display());
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let (args, _) = opts! {
        synopsis "Report the plans of recorded model results.";
        param report:String, desc:"The report: mix, purchase or test";
        opt dir:Option<String>, desc:"Directory of the result tables (default: demos/data/plans)";
    }
    .parse_or_exit();

    let dir = args.dir.map(PathBuf::from).unwrap_or_else(|| PathBuf::from("demos/data/plans"));
    match args.report.as_str() {
        "mix" => sweep(&dir),
        "purchase" => single(&dir, "problem1", |s| plan::purchase_plan(s)),
        "test" => single(&dir, "problem2", |s| plan::test_plan(s)),
        r => Err(format!("unknown report '{}', expected mix, purchase or test", r).into()),
    }
}
