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

//! Modeling sessions.
//!
//! A [`Session`] is the interface to an external modeling layer: a model
//! and a data file are read, parameters may be overridden, the model is
//! solved and finally objective values, variable values, parameter values
//! and set members are read back. All values are returned as flat lists
//! from index tuples to values.
//!
//! The [`ReplaySession`] implements the interface offline by reading a
//! DIMACS min-cost-flow instance as model and a DIMACS solution as data.
//! The [`TableSession`] replays arbitrary models from tables of recorded
//! results.

pub mod replay;
pub use self::replay::ReplaySession;

pub mod table;
pub use self::table::TableSession;

use crate::dimacs;
use crate::label::Label;

use std::fmt;
use std::path::Path;

use thiserror::Error;

#[cfg(feature = "serialize")]
use serde_derive::{Deserialize, Serialize};

/// Error of a session.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown {kind} '{name}'")]
    Unknown { kind: &'static str, name: String },
    #[error("unknown index {index} of '{name}'")]
    UnknownIndex { name: String, index: Index },
    #[error("a model must be read first")]
    NoModel,
    #[error("no solution available")]
    NoSolution,
    #[error(transparent)]
    Dimacs(#[from] dimacs::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// The result of a solve.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum SolveStatus {
    /// The problem has been solved to optimality.
    Solved,
    /// The problem is infeasible.
    Infeasible,
    /// The problem is unbounded.
    Unbounded,
    /// The solver failed for some other reason.
    Failed(String),
}

impl SolveStatus {
    pub fn is_solved(&self) -> bool {
        *self == SolveStatus::Solved
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SolveStatus::Solved => write!(f, "solved"),
            SolveStatus::Infeasible => write!(f, "infeasible"),
            SolveStatus::Unbounded => write!(f, "unbounded"),
            SolveStatus::Failed(msg) => write!(f, "failure: {}", msg),
        }
    }
}

/// A value returned by a session.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum Value {
    Num(f64),
    Sym(String),
}

impl Value {
    /// Return the numeric value, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Num(x) => Some(*x),
            Value::Sym(_) => None,
        }
    }

    /// Return the value as a label (e.g. when it denotes a set member).
    pub fn to_label(&self) -> Label {
        match self {
            Value::Num(x) => Label::from(*x),
            Value::Sym(s) => Label::from(s.as_str()),
        }
    }

    /// Parse a token: numbers become `Num`, everything else `Sym`.
    pub fn parse(token: &str) -> Value {
        token
            .parse::<f64>()
            .map(Value::Num)
            .unwrap_or_else(|_| Value::Sym(token.to_string()))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Num(x)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Num(x) => write!(f, "{}", x),
            Value::Sym(s) => write!(f, "{}", s),
        }
    }
}

/// An index tuple.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Index(pub Vec<Label>);

impl Index {
    /// The index of a scalar entity.
    pub fn scalar() -> Index {
        Index(vec![])
    }
}

impl From<&str> for Index {
    fn from(l: &str) -> Self {
        Index(vec![Label::from(l)])
    }
}

impl From<String> for Index {
    fn from(l: String) -> Self {
        Index(vec![Label::from(l)])
    }
}

impl From<Label> for Index {
    fn from(l: Label) -> Self {
        Index(vec![Label::from(l)])
    }
}

impl From<&Label> for Index {
    fn from(l: &Label) -> Self {
        Index(vec![Label::from(l)])
    }
}

impl From<f64> for Index {
    fn from(l: f64) -> Self {
        Index(vec![Label::from(l)])
    }
}

impl From<usize> for Index {
    fn from(l: usize) -> Self {
        Index(vec![Label::from(l)])
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0.len() {
            1 => write!(f, "{}", self.0[0]),
            _ => {
                write!(f, "(")?;
                for (i, l) in self.0.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", l)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// The values of an indexed entity in the order reported by the session.
#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Values {
    entries: Vec<(Index, Value)>,
}

impl Values {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<I: Into<Index>, V: Into<Value>>(&mut self, index: I, value: V) {
        self.entries.push((index.into(), value.into()));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return the value at `index`.
    pub fn get(&self, index: &Index) -> Option<&Value> {
        self.entries.iter().find(|(i, _)| i == index).map(|(_, v)| v)
    }

    /// Set the value at `index`, a new entry is appended if there is none.
    pub fn set(&mut self, index: Index, value: Value) {
        match self.entries.iter_mut().find(|(i, _)| *i == index) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((index, value)),
        }
    }

    /// Return an iterator over all entries.
    pub fn iter(&self) -> impl Iterator<Item = (&Index, &Value)> {
        self.entries.iter().map(|(i, v)| (i, v))
    }
}

impl<I: Into<Index>, V: Into<Value>> std::iter::FromIterator<(I, V)> for Values {
    fn from_iter<T: IntoIterator<Item = (I, V)>>(iter: T) -> Self {
        Values {
            entries: iter.into_iter().map(|(i, v)| (i.into(), v.into())).collect(),
        }
    }
}

/// A session with a modeling layer.
pub trait Session {
    /// Read a model file.
    fn read_model(&mut self, path: &Path) -> Result<()>;

    /// Read a data file.
    fn read_data(&mut self, path: &Path) -> Result<()>;

    /// Override a single entry of a parameter.
    fn set_param(&mut self, name: &str, index: Index, value: Value) -> Result<()>;

    /// Solve the current model.
    ///
    /// A solver that finishes without a solution returns `Ok` with the
    /// corresponding status. `Err` is reserved for failures of the session
    /// itself.
    fn solve(&mut self) -> Result<SolveStatus>;

    /// Return the value of an objective.
    fn objective(&self, name: &str) -> Result<f64>;

    /// Return the values of a variable.
    fn variable(&self, name: &str) -> Result<Values>;

    /// Return the values of a parameter.
    fn parameter(&self, name: &str) -> Result<Values>;

    /// Return the members of a set.
    fn set(&self, name: &str) -> Result<Vec<Label>>;
}
