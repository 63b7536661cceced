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

use rs_netpaths::paths::TraceOptions;
use rs_netpaths::report::{self, Output, RouteTable};
use rs_netpaths::scenario::{self, Names};
use rs_netpaths::{Label, ReplaySession, Session};

use std::error::Error;
use std::path::{Path, PathBuf};

use rustop::opts;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Crew/power station pairs.
const SCENARIOS: &str = "1:3p,18:3p,1:5,18:5,1:6p,18:6p,1:13,18:13,1:23p,18:23p,1:24,18:24";

fn parse_scenarios(s: &str) -> Result<Vec<(Label, Label)>, Box<dyn Error>> {
    s.split(',')
        .map(|pair| match pair.trim().split_once(':') {
            Some((start, end)) => Ok((Label::from(start), Label::from(end))),
            None => Err(format!("invalid scenario '{}', expected <start>:<end>", pair).into()),
        })
        .collect()
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let (args, _) = opts! {
        synopsis "Trace the route of single unit min-cost-flow solutions.";
        param model:String, desc:"Model file (DIMACS min-cost-flow instance)";
        opt data:Option<String>, desc:"Directory of the solution files <start>-<end>.sol (default: model directory)";
        opt scenarios:Option<String>, desc:"Comma separated list of <start>:<end> pairs";
        opt tolerance:Option<f64>, desc:"Minimal flow of an active arc";
    }
    .parse_or_exit();

    let model = PathBuf::from(&args.model);
    let data = match args.data {
        Some(dir) => PathBuf::from(dir),
        None => model.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    let scenarios = parse_scenarios(args.scenarios.as_deref().unwrap_or(SCENARIOS))?;

    let mut opts = TraceOptions::default();
    if let Some(tol) = args.tolerance {
        opts.tolerance = tol;
    }
    let names = Names::default();

    if !report::writes_files() {
        println!("Calculating optimal paths...");
    }

    let mut table = RouteTable::new();
    for (start, end) in scenarios {
        let mut session = ReplaySession::new();
        session.read_model(&model)?;
        let solfile = data.join(format!("{}-{}.sol", start, end));
        if let Err(e) = session.read_data(&solfile) {
            warn!(file = %solfile.display(), error = %e, "no solution data");
        }
        table.push(scenario::route(&mut session, &names, start, end, &opts)?);
    }

    let mut out = Output::new("problem3_1");
    out.extend(table.lines());
    if let Some(path) = out.finish()? {
        println!("\nOutput also written to {}", path.display());
    }

    Ok(())
}
