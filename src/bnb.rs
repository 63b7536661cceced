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

//! Records of a branch-and-bound search tree.
//!
//! The tree is not computed here. Each node is a record of a subproblem
//! that has been solved separately: the branching constraint that created
//! it, the objective value and variable values of its relaxation and the
//! reason it has been pruned. This module checks that the records form a
//! tree, classifies the nodes and computes a layout for drawing.
//!
//! # Example
//!
//! ```
//! use rs_netpaths::bnb::{BranchNode, NodeClass, Tree};
//!
//! let tree = Tree::new(vec![
//!     BranchNode::root("relaxation", "Relaxation")
//!         .with_objective(10.5)
//!         .with_values(&[("x", 2.5)]),
//!     BranchNode::child("node01", "relaxation", "x >= 3").pruned("Infeasible"),
//!     BranchNode::child("node02", "relaxation", "x <= 2")
//!         .with_objective(9.0)
//!         .with_values(&[("x", 2.0)])
//!         .integer()
//!         .pruned("Optimal Solution"),
//! ])
//! .unwrap();
//!
//! assert_eq!(tree.node("node01").unwrap().class(), NodeClass::Infeasible);
//! assert_eq!(tree.node("node02").unwrap().class(), NodeClass::Integer);
//! assert_eq!(tree.best_integer().unwrap().id, "node02");
//! ```

use crate::report::group_thousands;

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

#[cfg(feature = "serialize")]
use serde_derive::{Deserialize, Serialize};

/// Constraints longer than this are abbreviated in labels.
const MAX_CONSTRAINT_LEN: usize = 20;

/// Error when building a tree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("duplicate node id '{0}'")]
    Duplicate(String),
    #[error("node '{id}' has unknown parent '{parent}'")]
    UnknownParent { id: String, parent: String },
    #[error("the tree has no root")]
    NoRoot,
    #[error("the tree has several roots: {0:?}")]
    SeveralRoots(Vec<String>),
    #[error("node '{0}' is not reachable from the root")]
    Unreachable(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// The reason a node has been pruned.
///
/// The reason is kept as written, so it is shown unchanged in labels.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum Pruning {
    /// The subproblem is infeasible.
    Infeasible,
    /// The node holds the optimal solution.
    Optimal(String),
    /// The bound is dominated by the integer solution of `node`.
    Dominated { node: String, text: String },
    /// Any other reason.
    Other(String),
}

impl Pruning {
    /// Parse a reason such as `Infeasible`, `Optimal Solution`, `Node 21`
    /// or `Node32`.
    pub fn parse(reason: &str) -> Pruning {
        let reason = reason.trim();
        match reason {
            "Infeasible" => return Pruning::Infeasible,
            "Optimal" | "Optimal Solution" => return Pruning::Optimal(reason.to_string()),
            _ => {}
        }
        if let Some(rest) = reason.strip_prefix("Node") {
            let rest = rest.trim();
            if !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()) {
                return Pruning::Dominated {
                    node: rest.to_string(),
                    text: reason.to_string(),
                };
            }
        }
        Pruning::Other(reason.to_string())
    }
}

impl fmt::Display for Pruning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Pruning::Infeasible => write!(f, "Infeasible"),
            Pruning::Optimal(text) | Pruning::Dominated { text, .. } | Pruning::Other(text) => write!(f, "{}", text),
        }
    }
}

/// Classification of a node for drawing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeClass {
    Infeasible,
    /// An integer solution that is not dominated.
    Integer,
    /// A node whose bound is below the best integer solution.
    Suboptimal,
    /// A continuous solution whose bound is not dominated.
    Candidate,
}

impl NodeClass {
    /// All classes in legend order.
    pub const ALL: [NodeClass; 4] = [
        NodeClass::Integer,
        NodeClass::Candidate,
        NodeClass::Suboptimal,
        NodeClass::Infeasible,
    ];

    /// The fill color.
    pub fn color(self) -> &'static str {
        match self {
            NodeClass::Infeasible => "#E0E0E0",
            NodeClass::Integer => "#90EE90",
            NodeClass::Suboptimal => "#FFB347",
            NodeClass::Candidate => "#ADD8E6",
        }
    }

    /// The legend text.
    pub fn description(self) -> &'static str {
        match self {
            NodeClass::Infeasible => "Infeasible",
            NodeClass::Integer => "Integer Solution",
            NodeClass::Suboptimal => "Suboptimal (Bound < Best)",
            NodeClass::Candidate => "Candidate (Bound >= Best)",
        }
    }
}

/// Short names used in node labels.
#[derive(Clone, Debug, Default)]
pub struct Abbreviations {
    pairs: Vec<(String, String)>,
}

impl Abbreviations {
    pub fn new(pairs: &[(&str, &str)]) -> Self {
        Abbreviations {
            pairs: pairs.iter().map(|&(l, s)| (l.to_string(), s.to_string())).collect(),
        }
    }

    /// Return the short name of a variable.
    pub fn name<'a>(&'a self, name: &'a str) -> &'a str {
        self.pairs
            .iter()
            .find(|(l, _)| l == name)
            .map(|(_, s)| s.as_str())
            .unwrap_or(name)
    }

    /// Replace all long names in `text`.
    pub fn apply(&self, text: &str) -> String {
        self.pairs.iter().fold(text.to_string(), |t, (l, s)| t.replace(l.as_str(), s))
    }
}

/// A node of the search tree.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct BranchNode {
    pub id: String,
    /// The parent node, `None` for the root.
    pub parent: Option<String>,
    /// The branching constraint, e.g. `x['WingRib'] <= 103`.
    pub constraint: String,
    /// The objective value of the relaxation.
    pub objective: Option<f64>,
    /// The variable values of the relaxation.
    pub values: Vec<(String, f64)>,
    pub pruned: Option<Pruning>,
    /// The relaxation's solution is integral.
    pub integer: bool,
    /// The bound is dominated by an integer solution.
    pub dominated: bool,
}

impl BranchNode {
    fn new(id: &str, parent: Option<&str>, constraint: &str) -> Self {
        BranchNode {
            id: id.to_string(),
            parent: parent.map(str::to_string),
            constraint: constraint.to_string(),
            objective: None,
            values: vec![],
            pruned: None,
            integer: false,
            dominated: false,
        }
    }

    /// Create the root node.
    pub fn root(id: &str, constraint: &str) -> Self {
        BranchNode::new(id, None, constraint)
    }

    /// Create a node below `parent`.
    pub fn child(id: &str, parent: &str, constraint: &str) -> Self {
        BranchNode::new(id, Some(parent), constraint)
    }

    pub fn with_objective(mut self, z: f64) -> Self {
        self.objective = Some(z);
        self
    }

    pub fn with_values(mut self, values: &[(&str, f64)]) -> Self {
        self.values = values.iter().map(|&(n, v)| (n.to_string(), v)).collect();
        self
    }

    /// Mark the node as pruned, see [`Pruning::parse`].
    pub fn pruned(mut self, reason: &str) -> Self {
        self.pruned = Some(Pruning::parse(reason));
        self
    }

    pub fn integer(mut self) -> Self {
        self.integer = true;
        self
    }

    pub fn dominated(mut self) -> Self {
        self.dominated = true;
        self
    }

    pub fn is_infeasible(&self) -> bool {
        self.pruned == Some(Pruning::Infeasible)
    }

    /// Return the class of this node.
    pub fn class(&self) -> NodeClass {
        if self.is_infeasible() {
            NodeClass::Infeasible
        } else if self.integer && !self.dominated {
            NodeClass::Integer
        } else if self.dominated {
            NodeClass::Suboptimal
        } else {
            NodeClass::Candidate
        }
    }

    /// Return the multi line label of this node.
    ///
    /// # Example
    ///
    /// ```
    /// use rs_netpaths::bnb::{Abbreviations, BranchNode};
    ///
    /// let abbrev = Abbreviations::new(&[("WingSpar", "WS"), ("WingRib", "WR")]);
    /// let node = BranchNode::child("node08", "node06", "x['WingSpar'] <= 168")
    ///     .with_objective(6448642.0)
    ///     .with_values(&[("WingSpar", 168.0), ("WingRib", 101.0)])
    ///     .dominated()
    ///     .pruned("Node 07");
    ///
    /// assert_eq!(
    ///     node.label(&abbrev),
    ///     "node08\nx['WingSpar'] <= 168\nZ = 6,448,642.00\nWS=168.00, WR=101.00\n[Node 07]"
    /// );
    /// ```
    pub fn label(&self, abbrev: &Abbreviations) -> String {
        let mut lines = vec![self.id.clone()];
        if !self.constraint.is_empty() {
            if self.constraint.len() > MAX_CONSTRAINT_LEN {
                lines.push(abbrev.apply(&self.constraint));
            } else {
                lines.push(self.constraint.clone());
            }
        }

        if self.is_infeasible() {
            lines.push("Infeasible".to_string());
        } else {
            if let Some(z) = self.objective {
                lines.push(format!("Z = {}", group_thousands(z, 2)));
            }
            let values = self
                .values
                .iter()
                .map(|(n, v)| format!("{}={:.2}", abbrev.name(n), v))
                .collect::<Vec<_>>();
            for pair in values.chunks(2) {
                lines.push(pair.join(", "));
            }
        }

        match &self.pruned {
            Some(Pruning::Infeasible) | None => {}
            Some(reason) => lines.push(format!("[{}]", reason)),
        }

        lines.join("\n")
    }
}

/// A validated search tree.
#[derive(Clone, Debug)]
pub struct Tree {
    nodes: Vec<BranchNode>,
    ids: HashMap<String, usize>,
    children: Vec<Vec<usize>>,
    root: usize,
}

impl Tree {
    /// Build a tree from its node records.
    ///
    /// The records must have unique ids, exactly one of them must be the
    /// root and every other node must be reachable from the root through
    /// the parent links. Children keep the order of the records.
    pub fn new(nodes: Vec<BranchNode>) -> Result<Tree> {
        let mut ids = HashMap::with_capacity(nodes.len());
        for (i, n) in nodes.iter().enumerate() {
            if ids.insert(n.id.clone(), i).is_some() {
                return Err(Error::Duplicate(n.id.clone()));
            }
        }

        let mut children = vec![vec![]; nodes.len()];
        let mut roots = vec![];
        for (i, n) in nodes.iter().enumerate() {
            match &n.parent {
                None => roots.push(i),
                Some(p) => match ids.get(p) {
                    Some(&pi) => children[pi].push(i),
                    None => {
                        return Err(Error::UnknownParent {
                            id: n.id.clone(),
                            parent: p.clone(),
                        })
                    }
                },
            }
        }

        let root = match roots.as_slice() {
            [] => return Err(Error::NoRoot),
            [r] => *r,
            _ => return Err(Error::SeveralRoots(roots.iter().map(|&r| nodes[r].id.clone()).collect())),
        };

        // Every node has one parent, so nodes on a parent cycle are exactly
        // those not reachable from the root.
        let mut seen = vec![false; nodes.len()];
        let mut stack = vec![root];
        while let Some(i) = stack.pop() {
            seen[i] = true;
            stack.extend(children[i].iter().copied());
        }
        if let Some(i) = seen.iter().position(|&s| !s) {
            return Err(Error::Unreachable(nodes[i].id.clone()));
        }

        Ok(Tree {
            nodes,
            ids,
            children,
            root,
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Return the root node.
    pub fn root(&self) -> &BranchNode {
        &self.nodes[self.root]
    }

    /// Return the node with the given id.
    pub fn node(&self, id: &str) -> Option<&BranchNode> {
        self.ids.get(id).map(|&i| &self.nodes[i])
    }

    /// Return all nodes in record order.
    pub fn nodes(&self) -> &[BranchNode] {
        &self.nodes
    }

    /// Return the best integer solution that is not dominated.
    pub fn best_integer(&self) -> Option<&BranchNode> {
        self.nodes
            .iter()
            .filter(|n| n.class() == NodeClass::Integer && n.objective.is_some())
            .max_by(|a, b| a.objective.unwrap_or(f64::MIN).total_cmp(&b.objective.unwrap_or(f64::MIN)))
    }

    /// Return the nodes in depth-first preorder together with their depth.
    pub fn preorder(&self) -> Vec<(usize, &BranchNode)> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![(self.root, 0)];
        while let Some((i, depth)) = stack.pop() {
            order.push((depth, &self.nodes[i]));
            stack.extend(self.children[i].iter().rev().map(|&c| (c, depth + 1)));
        }
        order
    }

    fn leaves(&self) -> Vec<usize> {
        let mut leaves = vec![0; self.nodes.len()];
        for (_, n) in self.preorder().into_iter().rev() {
            let i = self.ids[&n.id];
            leaves[i] = if self.children[i].is_empty() {
                1
            } else {
                self.children[i].iter().map(|&c| leaves[c]).sum()
            };
        }
        leaves
    }

    /// Compute a hierarchical layout.
    ///
    /// The root is placed at `(0.5, 0)`, each level is `vert_gap` below its
    /// parent. The horizontal span `width` is divided among the children of
    /// a node in proportion to the number of leaves in their subtrees.
    pub fn layout(&self, width: f64, vert_gap: f64) -> Layout {
        let leaves = self.leaves();
        let mut positions = vec![(0.0, 0.0); self.nodes.len()];
        let mut stack = vec![(self.root, 0.5 - width / 2.0, 0.5 + width / 2.0, 0.0)];
        while let Some((i, left, right, y)) = stack.pop() {
            positions[i] = ((left + right) / 2.0, y);
            let total = leaves[i] as f64;
            let mut cur = left;
            for &c in &self.children[i] {
                let w = (right - left) * leaves[c] as f64 / total;
                stack.push((c, cur, cur + w, y - vert_gap));
                cur += w;
            }
        }
        Layout {
            ids: self.nodes.iter().map(|n| n.id.clone()).collect(),
            positions,
        }
    }

    /// Return an indented text rendering of the tree.
    pub fn outline(&self, abbrev: &Abbreviations) -> String {
        let mut out = String::new();
        for (depth, n) in self.preorder() {
            out.push_str(&"  ".repeat(depth));
            out.push_str(&n.id);
            if !n.constraint.is_empty() {
                out.push_str(&format!(" [{}]", abbrev.apply(&n.constraint)));
            }
            if n.is_infeasible() {
                out.push_str(" Infeasible");
            } else if let Some(z) = n.objective {
                out.push_str(&format!(" Z = {}", group_thousands(z, 2)));
            }
            match &n.pruned {
                Some(Pruning::Infeasible) | None => {}
                Some(reason) => out.push_str(&format!(" ({})", reason)),
            }
            out.push('\n');
        }
        out
    }
}

/// Node positions of a tree.
#[derive(Clone, Debug)]
pub struct Layout {
    ids: Vec<String>,
    positions: Vec<(f64, f64)>,
}

impl Layout {
    /// Return the position of a node.
    pub fn position(&self, id: &str) -> Option<(f64, f64)> {
        self.ids.iter().position(|i| i == id).map(|i| self.positions[i])
    }

    /// Return all node ids and positions in record order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, (f64, f64))> {
        self.ids.iter().map(String::as_str).zip(self.positions.iter().copied())
    }

    /// Turn a top-down layout into a left-to-right one.
    ///
    /// A point `(x, y)` moves to `(-y * depth_scale, x)`.
    pub fn horizontal(mut self, depth_scale: f64) -> Layout {
        for p in &mut self.positions {
            *p = (-p.1 * depth_scale, p.0);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{Abbreviations, BranchNode, Error, NodeClass, Pruning, Tree};

    fn sample() -> Vec<BranchNode> {
        vec![
            BranchNode::root("r", "Relaxation").with_objective(100.0),
            BranchNode::child("a", "r", "x <= 1").with_objective(90.0),
            BranchNode::child("b", "r", "x >= 2").pruned("Infeasible"),
            BranchNode::child("c", "a", "y <= 0").with_objective(80.0).integer(),
            BranchNode::child("d", "a", "y >= 1")
                .with_objective(70.0)
                .integer()
                .dominated()
                .pruned("Node c"),
            BranchNode::child("e", "a", "y >= 2")
                .with_objective(60.0)
                .dominated()
                .pruned("Node32"),
        ]
    }

    #[test]
    fn test_pruning_parse() {
        assert_eq!(Pruning::parse("Infeasible"), Pruning::Infeasible);
        assert_eq!(
            Pruning::parse("Optimal Solution"),
            Pruning::Optimal("Optimal Solution".to_string())
        );
        assert_eq!(
            Pruning::parse("Node 21"),
            Pruning::Dominated {
                node: "21".to_string(),
                text: "Node 21".to_string()
            }
        );
        assert!(matches!(Pruning::parse("Node32"), Pruning::Dominated { ref node, .. } if node == "32"));
        assert_eq!(Pruning::parse("Bound"), Pruning::Other("Bound".to_string()));

        // Reasons are shown as written.
        assert_eq!(Pruning::parse("Node32").to_string(), "Node32");
        assert_eq!(Pruning::parse("Node 21").to_string(), "Node 21");
        assert_eq!(Pruning::parse("Optimal").to_string(), "Optimal");
        assert_eq!(Pruning::parse(" Optimal Solution ").to_string(), "Optimal Solution");
    }

    #[test]
    fn test_classes() {
        let tree = Tree::new(sample()).unwrap();
        let classes = tree.nodes().iter().map(|n| n.class()).collect::<Vec<_>>();
        assert_eq!(
            classes,
            vec![
                NodeClass::Candidate,
                NodeClass::Candidate,
                NodeClass::Infeasible,
                NodeClass::Integer,
                NodeClass::Suboptimal,
                NodeClass::Suboptimal,
            ]
        );
        assert_eq!(tree.best_integer().map(|n| n.id.as_str()), Some("c"));
        assert_eq!(NodeClass::Integer.color(), "#90EE90");
    }

    #[test]
    fn test_invalid_trees() {
        let mut nodes = sample();
        nodes.push(BranchNode::child("a", "r", ""));
        assert_eq!(Tree::new(nodes).unwrap_err(), Error::Duplicate("a".to_string()));

        let mut nodes = sample();
        nodes.push(BranchNode::child("z", "q", ""));
        assert!(matches!(Tree::new(nodes), Err(Error::UnknownParent { .. })));

        let mut nodes = sample();
        nodes.push(BranchNode::root("r2", ""));
        assert!(matches!(Tree::new(nodes), Err(Error::SeveralRoots(_))));

        let nodes = vec![BranchNode::child("a", "b", ""), BranchNode::child("b", "a", "")];
        assert_eq!(Tree::new(nodes).unwrap_err(), Error::NoRoot);

        let mut nodes = sample();
        nodes.push(BranchNode::child("p", "q", ""));
        nodes.push(BranchNode::child("q", "p", ""));
        assert_eq!(Tree::new(nodes).unwrap_err(), Error::Unreachable("p".to_string()));
    }

    #[test]
    fn test_layout() {
        let tree = Tree::new(sample()).unwrap();
        let layout = tree.layout(1.0, 0.2);
        // Leaves: b, c, d, e. The root spans [0, 1], `a` has 3 leaves.
        assert_eq!(layout.position("r"), Some((0.5, 0.0)));
        let (xa, ya) = layout.position("a").unwrap();
        assert!((xa - 0.375).abs() < 1e-12);
        assert!((ya + 0.2).abs() < 1e-12);
        let (xb, _) = layout.position("b").unwrap();
        assert!((xb - 0.875).abs() < 1e-12);
        let (xc, yc) = layout.position("c").unwrap();
        assert!((xc - 0.125).abs() < 1e-12);
        assert!((yc + 0.4).abs() < 1e-12);

        let h = layout.horizontal(20.0);
        let (x, y) = h.position("c").unwrap();
        assert!((x - 8.0).abs() < 1e-12);
        assert!((y - 0.125).abs() < 1e-12);
    }

    #[test]
    fn test_labels() {
        let abbrev = Abbreviations::new(&[("FuselagePanel", "FP")]);
        let infeasible = BranchNode::child("node02", "node01", "x['WingRib'] >= 104").pruned("Infeasible");
        assert_eq!(infeasible.label(&abbrev), "node02\nx['WingRib'] >= 104\nInfeasible");

        let node = BranchNode::child("node04", "node03", "x['FuselagePanel'] >= 1")
            .with_objective(6461344.33)
            .with_values(&[("FuselagePanel", 1.0), ("WingSpar", 169.0), ("WingRib", 101.67)]);
        assert_eq!(
            node.label(&abbrev),
            "node04\nx['FP'] >= 1\nZ = 6,461,344.33\nFP=1.00, WingSpar=169.00\nWingRib=101.67"
        );
    }

    #[test]
    fn test_outline() {
        let tree = Tree::new(sample()).unwrap();
        assert_eq!(
            tree.outline(&Abbreviations::default()),
            "r [Relaxation] Z = 100.00
  a [x <= 1] Z = 90.00
    c [y <= 0] Z = 80.00
    d [y >= 1] Z = 70.00 (Node c)
    e [y >= 2] Z = 60.00 (Node32)
  b [x >= 2] Infeasible
"
        );
    }

    #[cfg(feature = "serialize")]
    #[test]
    fn test_json_roundtrip() {
        let nodes = sample();
        let json = serde_json::to_string(&nodes).unwrap();
        let back: Vec<BranchNode> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, nodes);
        assert!(Tree::new(back).is_ok());
    }
}
