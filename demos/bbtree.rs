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

use rs_netpaths::bnb::{Abbreviations, BranchNode, Tree};
use rs_netpaths::draw;
use rs_netpaths::report::{objective_line, Output};

use std::error::Error;

use rustop::opts;
use tracing_subscriber::EnvFilter;

const WS: &str = "WingSpar";
const WR: &str = "WingRib";
const FP: &str = "FuselagePanel";

/// The search tree of the aircraft parts production problem.
fn records() -> Vec<BranchNode> {
    let c = BranchNode::child;
    vec![
        BranchNode::root("relaxation", "Relaxation")
            .with_objective(6510631.58)
            .with_values(&[(WS, 168.42), (WR, 105.26)]),
        c("node01", "relaxation", "x['WingSpar'] >= 169")
            .with_objective(6473861.67)
            .with_values(&[(WS, 169.0), (WR, 103.33)]),
        c("node02", "node01", "x['WingRib'] >= 104").pruned("Infeasible"),
        c("node03", "node01", "x['WingRib'] <= 103")
            .with_objective(6471358.2)
            .with_values(&[(FP, 0.2), (WS, 169.0), (WR, 103.0)]),
        c("node09", "relaxation", "x['WingSpar'] <= 168")
            .with_objective(6509841.6)
            .with_values(&[(WS, 168.0), (WR, 105.6)]),
        c("node10", "node09", "x['WingRib'] >= 106")
            .with_objective(6508903.5)
            .with_values(&[(WS, 167.5), (WR, 106.0)]),
        c("node11", "node10", "x['WingSpar'] >= 168").pruned("Infeasible"),
        c("node12", "node10", "x['WingSpar'] <= 167")
            .with_objective(6507965.4)
            .with_values(&[(WS, 167.0), (WR, 106.4)]),
        c("node13", "node12", "x['WingRib'] >= 107")
            .with_objective(6506558.25)
            .with_values(&[(WS, 166.25), (WR, 107.0)]),
        c("node14", "node13", "x['WingSpar'] >= 167").pruned("Infeasible"),
        c("node15", "node13", "x['WingSpar'] <= 166")
            .with_objective(6506089.2)
            .with_values(&[(WS, 166.0), (WR, 107.2)]),
        c("node16", "node15", "x['WingRib'] >= 108")
            .with_objective(6504213.0)
            .with_values(&[(WS, 165.0), (WR, 108.0)])
            .integer(),
        c("node17", "node15", "x['WingRib'] <= 107")
            .with_objective(6506010.5)
            .with_values(&[(FP, 0.17), (WS, 166.0), (WR, 107.0)]),
        c("node18", "node17", "x['FuselagePanel'] >= 1")
            .with_objective(6503271.75)
            .with_values(&[(FP, 1.0), (WS, 164.75), (WR, 107.0)])
            .dominated()
            .pruned("Node 16"),
        c("node19", "node17", "x['FuselagePanel']<=0")
            .with_objective(6500927.0)
            .with_values(&[(WS, 166.0), (WR, 107.0)])
            .dominated()
            .pruned("Node 16"),
        c("node20", "node12", "x['WingRib'] <= 106")
            .with_objective(6507808.0)
            .with_values(&[(FP, 0.33), (WS, 167.0), (WR, 106.0)]),
        c("node21", "node20", "x['FuselagePanel'] >= 1")
            .with_objective(6505617.0)
            .with_values(&[(FP, 1.0), (WS, 166.0), (WR, 106.0)])
            .integer(),
        c("node22", "node20", "x['FuselagePanel'] <= 0")
            .with_objective(6497641.0)
            .with_values(&[(WS, 167.0), (WR, 106.0)])
            .dominated()
            .pruned("Node 21"),
        c("node23", "node09", "x['WingRib'] <= 105")
            .with_objective(6509841.6)
            .with_values(&[(FP, 0.5), (WS, 168.0), (WR, 105.6)]),
        c("node24", "node23", "x['FuselagePanel'] >= 1")
            .with_objective(6509369.4)
            .with_values(&[(FP, 1.0), (WS, 168.0), (WR, 104.4)]),
        c("node25", "node24", "x['WingRib'] >= 105")
            .with_objective(6507962.25)
            .with_values(&[(FP, 1.0), (WS, 167.25), (WR, 105.0)]),
        c("node26", "node25", "x['WingSpar'] >= 168").pruned("Infeasible"),
        c("node27", "node25", "x['WingSpar'] <= 167")
            .with_objective(6507414.5)
            .with_values(&[(FP, 1.17), (WS, 167.0), (WR, 105.0)]),
        c("node28", "node27", "x['FuselagePanel'] >= 2")
            .with_objective(6504675.75)
            .with_values(&[(FP, 2.0), (WS, 165.75), (WR, 105.0)])
            .dominated()
            .pruned("Node 21"),
        c("node29", "node27", "x['FuselagePanel'] <= 1")
            .with_objective(6502331.0)
            .with_values(&[(FP, 1.0), (WS, 167.0), (WR, 105.0)])
            .dominated()
            .pruned("Node 21"),
        c("node30", "node24", "x['WingRib'] <= 104")
            .with_objective(6509212.0)
            .with_values(&[(FP, 1.33), (WS, 168.0), (WR, 104.0)]),
        c("node31", "node30", "x['FuselagePanel'] >= 2")
            .with_objective(6508897.2)
            .with_values(&[(FP, 2.0), (WS, 168.0), (WR, 103.2)]),
        c("node32", "node31", "x['WingRib'] >= 104")
            .with_objective(6507021.0)
            .with_values(&[(FP, 2.0), (WS, 167.0), (WR, 104.0)])
            .integer()
            .pruned("Optimal Solution"),
        c("node33", "node31", "x['WingRib'] <= 103")
            .with_objective(6508818.5)
            .with_values(&[(FP, 2.17), (WS, 168.0), (WR, 103.0)]),
        c("node34", "node33", "x['FuselagePanel'] >= 3")
            .with_objective(6508178.13)
            .with_values(&[(FP, 3.0), (WS, 167.87), (WR, 102.11)]),
        c("node35", "node34", "x['WingSpar'] >= 168")
            .with_objective(6499821.33)
            .with_values(&[(FP, 3.0), (WS, 168.0), (WR, 101.67)])
            .dominated()
            .pruned("Node 32"),
        c("node36", "node34", "x['WingSpar'] <= 167")
            .with_objective(6506548.8)
            .with_values(&[(FP, 3.0), (WS, 167.0), (WR, 102.8)])
            .dominated()
            .pruned("Node 32"),
        c("node37", "node33", "x['FuselagePanel'] <= 2")
            .with_objective(6503735.0)
            .with_values(&[(FP, 2.0), (WS, 168.0), (WR, 103.0)])
            .dominated()
            .pruned("Node32"),
        c("node38", "node30", "x['FuselagePanel'] <= 1")
            .with_objective(6499045.0)
            .with_values(&[(FP, 1.0), (WS, 168.0), (WR, 104.0)])
            .integer()
            .dominated()
            .pruned("Node 32"),
        c("node39", "node23", "x['FuselagePanel'] <= 0")
            .with_objective(6494355.0)
            .with_values(&[(FP, 0.0), (WS, 168.0), (WR, 105.0)])
            .integer()
            .dominated()
            .pruned("Node32"),
        c("node04", "node03", "x['FuselagePanels'] >= 1")
            .with_objective(6461344.33)
            .with_values(&[(FP, 1.0), (WS, 169.0), (WR, 101.67)]),
        c("node05", "node04", "x['WingRib'] >= 102").pruned("Infeasible"),
        c("node06", "node04", "x['WingRib'] <= 101")
            .with_objective(6456337.4)
            .with_values(&[(FP, 1.4), (WS, 169.0), (WR, 101.0)]),
        c("node07", "node06", "x['FuselagePanel'] >= 2")
            .with_objective(6448827.0)
            .with_values(&[(FP, 2.0), (WS, 169.0), (WR, 100.0)])
            .integer(),
        c("node08", "node06", "x['FuselagePanel'] <= 1")
            .with_objective(6448642.0)
            .with_values(&[(FP, 1.0), (WS, 169.2), (WR, 101.0)])
            .dominated()
            .pruned("Node 07"),
    ]
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let (args, _) = opts! {
        synopsis "Draw the branch-and-bound search tree of the aircraft parts problem.";
        opt output:Option<String>, desc:"DOT output file (default: binary_search_tree.dot)";
        opt vertical:bool, desc:"Top-down instead of left-to-right layout";
    }
    .parse_or_exit();

    let tree = Tree::new(records())?;
    let abbrev = Abbreviations::new(&[(WS, "WS"), (WR, "WR"), (FP, "FP")]);

    let mut out = Output::new("problem4");
    out.extend(tree.outline(&abbrev).lines().map(str::to_string));
    if let Some(best) = tree.best_integer() {
        out.line("");
        out.line(format!("Best integer solution: {}", best.id));
        out.line(objective_line("Profit", best.objective.unwrap_or(f64::NAN)));
        for (name, value) in &best.values {
            out.line(format!("  - {}: {} units", name, value));
        }
    }

    let layout = tree.layout(25.0, 0.2);
    let layout = if args.vertical { layout } else { layout.horizontal(20.0) };
    let mut dot = draw::draw_tree(&tree, &abbrev, Some(&layout));
    if args.vertical {
        dot.set_rankdir("TB");
    }

    let filename = args.output.unwrap_or_else(|| "binary_search_tree.dot".to_string());
    dot.write_to_file(&filename)?;
    out.line(format!("Tree visualization saved to {}", filename));

    if let Some(path) = out.finish()? {
        println!("\nOutput also written to {}", path.display());
    }

    Ok(())
}
