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

use rs_netpaths::paths::{ArcOrder, DecomposeOptions};
use rs_netpaths::report::{self, Output, RouteTable};
use rs_netpaths::scenario::{self, Names};
use rs_netpaths::{ReplaySession, Session};

use std::error::Error;
use std::path::Path;

use rustop::opts;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let (args, _) = opts! {
        synopsis "Decompose a multi source min-cost-flow solution into unit routes.";
        param model:String, desc:"Model file (DIMACS min-cost-flow instance)";
        param data:String, desc:"Solution file (DIMACS min-cost-flow solution)";
        opt cheapest:bool, desc:"Continue along the cheapest arc instead of the first one";
    }
    .parse_or_exit();

    let mut session = ReplaySession::new();
    session.read_model(Path::new(&args.model))?;
    session.read_data(Path::new(&args.data))?;

    let opts = DecomposeOptions {
        order: if args.cheapest { ArcOrder::Cost } else { ArcOrder::Index },
        ..DecomposeOptions::default()
    };
    if !report::writes_files() {
        println!("Calculating optimal paths...");
    }

    let d = scenario::dispatch(&mut session, &Names::default(), &opts)?;
    if !d.status.is_solved() {
        println!("Solve result: {}", d.status);
    } else {
        println!("Objective Value: {}", d.objective);
        for (node, supply) in &d.sources {
            println!("Crew at {} with supply {}", node, supply);
        }
    }

    let mut table = RouteTable::new();
    for r in d.routes {
        table.push(r);
    }

    let mut out = Output::new("problem3_2");
    out.extend(table.lines());
    if let Some(path) = out.finish()? {
        println!("\nOutput also written to {}", path.display());
    }

    Ok(())
}
