// Copyright (c) 2016, 2017, 2018, 2025 Frank Fischer <frank-fischer@shadow-soft.de>
//
// This program is free software: you can redistribute it and/or
// modify it under the terms of the GNU General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU
// General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see  <http://www.gnu.org/licenses/>

//! Visualizing search trees as Graphviz DOT.

use crate::bnb::{Abbreviations, Layout, NodeClass, Tree};

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// The default title of a search tree drawing.
pub const TREE_TITLE: &str = "Branch and Bound Search Tree";

/// Trait for node attributes.
pub trait NodeAttr {
    fn set_label(&mut self, label: Option<&str>);

    fn set_fill(&mut self, color: Option<&str>);

    fn set_pos(&mut self, pos: Option<(f64, f64)>);
}

/// Trait for edge attributes.
pub trait EdgeAttr {
    fn set_label(&mut self, label: Option<&str>);

    fn set_color(&mut self, color: Option<&str>);
}

/// Attributes of a DOT node or edge.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DotAttr {
    label: Option<String>,
    fill: Option<String>,
    color: Option<String>,
    pos: Option<(f64, f64)>,
}

impl NodeAttr for DotAttr {
    fn set_label(&mut self, label: Option<&str>) {
        self.label = label.map(str::to_string);
    }

    fn set_fill(&mut self, color: Option<&str>) {
        self.fill = color.map(str::to_string);
    }

    fn set_pos(&mut self, pos: Option<(f64, f64)>) {
        self.pos = pos;
    }
}

impl EdgeAttr for DotAttr {
    fn set_label(&mut self, label: Option<&str>) {
        self.label = label.map(str::to_string);
    }

    fn set_color(&mut self, color: Option<&str>) {
        self.color = color.map(str::to_string);
    }
}

impl fmt::Display for DotAttr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut attrs = vec![];
        if let Some(ref label) = self.label {
            attrs.push(format!("label={}", quote(label)));
        }
        if let Some(ref fill) = self.fill {
            attrs.push(format!("fillcolor={}", quote(fill)));
        }
        if let Some(ref color) = self.color {
            attrs.push(format!("color={}", quote(color)));
        }
        if let Some((x, y)) = self.pos {
            attrs.push(format!("pos=\"{:.3},{:.3}!\"", x, y));
        }
        if !attrs.is_empty() {
            write!(f, " [{}]", attrs.join(", "))?;
        }
        Ok(())
    }
}

/// Quote a DOT identifier.
fn quote(s: &str) -> String {
    let mut q = String::with_capacity(s.len() + 2);
    q.push('"');
    for c in s.chars() {
        match c {
            '"' => q.push_str("\\\""),
            '\\' => q.push_str("\\\\"),
            '\n' => q.push_str("\\n"),
            c => q.push(c),
        }
    }
    q.push('"');
    q
}

/// A directed graph drawing in DOT format.
#[derive(Clone, Debug)]
pub struct DotWriter {
    title: String,
    rankdir: Option<String>,
    node_default: DotAttr,
    edge_default: DotAttr,
    nodes: Vec<(String, DotAttr)>,
    edges: Vec<(String, String, DotAttr)>,
    legend: Vec<(String, String)>,
}

impl DotWriter {
    pub fn new(title: &str) -> Self {
        DotWriter {
            title: title.to_string(),
            rankdir: None,
            node_default: DotAttr::default(),
            edge_default: DotAttr::default(),
            nodes: vec![],
            edges: vec![],
            legend: vec![],
        }
    }

    /// Set the rank direction, e.g. `LR`.
    pub fn set_rankdir(&mut self, rankdir: &str) {
        self.rankdir = Some(rankdir.to_string());
    }

    /// Return the default node attribute.
    pub fn node_default_mut(&mut self) -> &mut DotAttr {
        &mut self.node_default
    }

    /// Return the default edge attribute.
    pub fn edge_default_mut(&mut self) -> &mut DotAttr {
        &mut self.edge_default
    }

    /// Add a node and return its attributes.
    pub fn add_node(&mut self, id: &str) -> &mut DotAttr {
        self.nodes.push((id.to_string(), DotAttr::default()));
        let n = self.nodes.len() - 1;
        &mut self.nodes[n].1
    }

    /// Add an edge and return its attributes.
    pub fn add_edge(&mut self, u: &str, v: &str) -> &mut DotAttr {
        self.edges.push((u.to_string(), v.to_string(), DotAttr::default()));
        let n = self.edges.len() - 1;
        &mut self.edges[n].2
    }

    /// Add a legend entry with a fill color.
    pub fn add_legend(&mut self, text: &str, color: &str) {
        self.legend.push((text.to_string(), color.to_string()));
    }

    /// Write the drawing.
    pub fn write<W: Write>(&self, mut w: W) -> io::Result<()> {
        write!(w, "{}", self)
    }

    /// Write the drawing to a file.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        self.write(io::BufWriter::new(fs::File::create(path)?))
    }
}

impl fmt::Display for DotWriter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "digraph {} {{", quote(&self.title))?;
        write!(f, "  graph [label={}, labelloc=\"t\", fontsize=\"18\"", quote(&self.title))?;
        if let Some(ref rankdir) = self.rankdir {
            write!(f, ", rankdir={}", quote(rankdir))?;
        }
        writeln!(f, "];")?;
        writeln!(f, "  node [shape=\"box\", style=\"rounded,filled\"];")?;
        if self.node_default != DotAttr::default() {
            writeln!(f, "  node{};", self.node_default)?;
        }
        if self.edge_default != DotAttr::default() {
            writeln!(f, "  edge{};", self.edge_default)?;
        }
        for (id, attr) in &self.nodes {
            writeln!(f, "  {}{};", quote(id), attr)?;
        }
        for (u, v, attr) in &self.edges {
            writeln!(f, "  {} -> {}{};", quote(u), quote(v), attr)?;
        }
        if !self.legend.is_empty() {
            writeln!(f, "  subgraph \"cluster_legend\" {{")?;
            writeln!(f, "    label=\"Legend\";")?;
            for (i, (text, color)) in self.legend.iter().enumerate() {
                writeln!(
                    f,
                    "    \"legend{}\" [label={}, fillcolor={}];",
                    i,
                    quote(text),
                    quote(color)
                )?;
            }
            writeln!(f, "  }}")?;
        }
        writeln!(f, "}}")
    }
}

/// Draw a search tree.
///
/// Nodes are filled according to their [`NodeClass`] and labelled with
/// [`BranchNode::label`](crate::bnb::BranchNode::label). If a layout is
/// given, the node positions are fixed to it.
pub fn draw_tree(tree: &Tree, abbrev: &Abbreviations, layout: Option<&Layout>) -> DotWriter {
    let mut dot = DotWriter::new(TREE_TITLE);
    dot.set_rankdir("LR");
    EdgeAttr::set_color(dot.edge_default_mut(), Some("#808080"));

    let positions: HashMap<&str, (f64, f64)> = layout.map(|l| l.iter().collect()).unwrap_or_default();
    for n in tree.nodes() {
        let label = n.label(abbrev);
        let attr = dot.add_node(&n.id);
        NodeAttr::set_label(attr, Some(&label));
        attr.set_fill(Some(n.class().color()));
        attr.set_pos(positions.get(n.id.as_str()).copied());
    }
    for n in tree.nodes() {
        if let Some(ref p) = n.parent {
            dot.add_edge(p, &n.id);
        }
    }
    for class in NodeClass::ALL.iter() {
        dot.add_legend(class.description(), class.color());
    }

    dot
}
