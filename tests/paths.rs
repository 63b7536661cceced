/*
 * Copyright (c) 2021, 2022, 2025 Frank Fischer <frank-fischer@shadow-soft.de>
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
use std::fs::read_dir;
use std::path::Path;

use rs_netpaths::dimacs::min;
use rs_netpaths::paths::{self, ArcOrder, DecomposeOptions};
use rs_netpaths::{Flow, Network, Node, PathEnd};

fn load(name: &str, sol: &str) -> Result<(Network, Vec<f64>, Flow), Box<dyn Error>> {
    let instance = min::read_from_file(Path::new("tests/flow").join(format!("{}.min", name)))?;
    let solution = min::read_solution_from_file(Path::new("tests/flow").join(format!("{}.sol", sol)))?;
    let flow = solution.flow(&instance.network)?;
    Ok((instance.network, instance.balances, flow))
}

fn sources_and_sinks(g: &Network, balances: &[f64]) -> (Vec<(Node, f64)>, Vec<Node>) {
    let sources = g
        .nodes()
        .filter(|u| balances[u.index()] > 0.0)
        .map(|u| (u, balances[u.index()]))
        .collect();
    let sinks = g.nodes().filter(|u| balances[u.index()] < 0.0).collect();
    (sources, sinks)
}

#[test]
fn test_trace_chain() -> Result<(), Box<dyn Error>> {
    let (g, _, flow) = load("chain", "chain")?;
    let a = g.node("A").unwrap();
    let c = g.node("C").unwrap();
    let path = paths::trace(&g, &flow, a, c);
    assert_eq!(path.end, PathEnd::Reached);
    assert_eq!(path.display(&g).to_string(), "A->B->C");
    assert_eq!(path.cost, 2.0);
    Ok(())
}

#[test]
fn test_trace_broken() -> Result<(), Box<dyn Error>> {
    let (g, _, flow) = load("chain", "broken")?;
    let a = g.node("A").unwrap();
    let c = g.node("C").unwrap();
    let path = paths::trace(&g, &flow, a, c);
    assert_eq!(path.end, PathEnd::Broken);
    assert!(!path.is_complete());
    assert_eq!(path.display(&g).to_string(), "A->B->(end?)");
    Ok(())
}

#[test]
fn test_decompose_fork() -> Result<(), Box<dyn Error>> {
    let (g, balances, flow) = load("fork", "fork")?;
    let (sources, sinks) = sources_and_sinks(&g, &balances);
    let d = paths::decompose(&g, &flow, &sources, &sinks);

    let routes = d.paths.iter().map(|p| p.display(&g).to_string()).collect::<Vec<_>>();
    assert_eq!(routes, vec!["A->B->C", "A->B->D"]);
    assert_eq!(d.paths.iter().map(|p| p.cost).collect::<Vec<_>>(), vec![2.0, 3.0]);
    assert_eq!(d.num_complete(), 2);

    // The cheapest continuation first gives the same routes here.
    let opts = DecomposeOptions {
        order: ArcOrder::Cost,
        ..DecomposeOptions::default()
    };
    let d = paths::decompose_with(&g, &flow, &sources, &sinks, &opts);
    assert_eq!(d.paths[0].display(&g).to_string(), "A->B->C");
    Ok(())
}

/// Every instance in `tests/flow` with a solution of the same name is
/// decomposed into exactly one complete path per unit of supply.
#[test]
fn test_decompose_all() -> Result<(), Box<dyn Error>> {
    let mut count = 0;
    for entry in read_dir(Path::new("tests/flow"))? {
        let entry = entry?;
        if entry.path().extension().map(|ext| ext == "min").unwrap_or(false) {
            let name = match entry.path().file_stem() {
                Some(s) => s.to_string_lossy().to_string(),
                None => continue,
            };
            let (g, balances, flow) = load(&name, &name)?;
            let (sources, sinks) = sources_and_sinks(&g, &balances);
            let d = paths::decompose(&g, &flow, &sources, &sinks);

            let supply: f64 = sources.iter().map(|&(_, s)| s).sum();
            assert_eq!(d.paths.len(), supply.round() as usize, "instance {}", name);
            assert_eq!(d.num_complete(), d.paths.len(), "instance {}", name);
            for a in g.arcs() {
                assert!(d.consumed(a) <= d.units(a), "instance {}", name);
            }
            for p in &d.paths {
                let mut seen = p.nodes.clone();
                seen.sort();
                seen.dedup();
                assert_eq!(seen.len(), p.nodes.len(), "instance {} has a cycle", name);
            }
            count += 1;
        }
    }
    assert!(count >= 2);
    Ok(())
}
