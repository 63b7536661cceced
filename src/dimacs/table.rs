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

//! Recorded model results in a DIMACS like line format.
//!
//! A result table stores what a modeling layer reported for one model:
//! its solve status, objective values, variable and parameter entries and
//! set members. The file is read line by line:
//!
//! 1. empty lines and lines starting with `c` are ignored
//! 2. `s <status>` gives the solve status, one of `solved`,
//!    `infeasible`, `unbounded` or `failed <message>`; at most one such
//!    line is allowed
//! 3. `o <name> <value>` gives the value of an objective
//! 4. `e <set> <member>...` adds members to a set
//! 5. `v <name> <index>... <value>` gives a variable entry; scalar
//!    variables have no index tokens
//! 6. `d <name> <index>... <value>` gives a parameter entry
//!
//! Values that are no numbers are kept as symbols.

use super::{DimacsReader, Error, Result};
use crate::label::Label;
use crate::session::{Index, SolveStatus, Value, Values};

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use tracing::debug;

/// A table of recorded results.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    /// The recorded solve status.
    pub status: Option<SolveStatus>,
    pub objectives: BTreeMap<String, f64>,
    pub variables: BTreeMap<String, Values>,
    pub parameters: BTreeMap<String, Values>,
    pub sets: BTreeMap<String, Vec<Label>>,
}

impl Table {
    /// Add all entries of `other`.
    ///
    /// Entries of `other` replace entries with the same name and index.
    pub fn merge(&mut self, other: Table) {
        if other.status.is_some() {
            self.status = other.status;
        }
        self.objectives.extend(other.objectives);
        for (name, values) in other.variables {
            let entry = self.variables.entry(name).or_default();
            for (index, value) in values.iter() {
                entry.set(index.clone(), value.clone());
            }
        }
        for (name, values) in other.parameters {
            let entry = self.parameters.entry(name).or_default();
            for (index, value) in values.iter() {
                entry.set(index.clone(), value.clone());
            }
        }
        for (name, members) in other.sets {
            self.sets.entry(name).or_default().extend(members);
        }
    }
}

pub fn read<R: Read>(r: R) -> Result<Table> {
    let mut reader = DimacsReader::new(r);
    let mut table = Table::default();

    while let Some((d, mut toks)) = reader.read_one_line_of(&["s", "o", "e", "v", "d"])? {
        match d {
            "s" => {
                if table.status.is_some() {
                    return Err(Error::Data {
                        line: toks.line,
                        msg: "duplicate status line".to_string(),
                    });
                }
                let status = match toks.str()? {
                    "solved" => SolveStatus::Solved,
                    "infeasible" => SolveStatus::Infeasible,
                    "unbounded" => SolveStatus::Unbounded,
                    "failed" => SolveStatus::Failed(toks.by_ref().collect::<Vec<_>>().join(" ")),
                    s => {
                        return Err(Error::Format {
                            line: toks.line,
                            msg: format!("unknown status '{}'", s),
                        })
                    }
                };
                table.status = Some(status);
            }
            "o" => {
                let name = toks.str()?.to_string();
                let value = toks.number()?;
                table.objectives.insert(name, value);
            }
            "e" => {
                let name = toks.str()?.to_string();
                let members = table.sets.entry(name).or_default();
                members.extend(toks.by_ref().map(Label::from));
            }
            _ => {
                let line = toks.line;
                let name = toks.str()?.to_string();
                let mut rest = toks.by_ref().collect::<Vec<_>>();
                let value = rest.pop().ok_or_else(|| Error::Format {
                    line,
                    msg: format!("missing value of '{}'", name),
                })?;
                let index = Index(rest.into_iter().map(Label::from).collect());
                let entities = if d == "v" {
                    &mut table.variables
                } else {
                    &mut table.parameters
                };
                entities.entry(name).or_default().set(index, Value::parse(value));
            }
        }

        toks.end()?;
    }

    debug!(
        variables = table.variables.len(),
        parameters = table.parameters.len(),
        sets = table.sets.len(),
        "read result table"
    );

    Ok(table)
}

pub fn read_from_file<P: AsRef<Path>>(filename: P) -> Result<Table> {
    read(std::fs::File::open(filename)?)
}
