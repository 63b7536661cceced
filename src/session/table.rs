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

//! Replaying recorded results of arbitrary models.
//!
//! The model and the data of a [`TableSession`] are both [result
//! tables](crate::dimacs::table). The data table is merged into the model
//! table, so shared sets and parameters can live in a separate file.
//! Solving returns the recorded status, afterwards the recorded objective
//! and variable values are available.

use super::{Error, Index, Result, Session, SolveStatus, Value, Values};
use crate::dimacs::table::{self, Table};
use crate::label::Label;

use std::path::Path;

use tracing::{debug, info};

/// An offline session replaying recorded results.
#[derive(Default)]
pub struct TableSession {
    table: Option<Table>,
    status: Option<SolveStatus>,
}

impl TableSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an already parsed table as model.
    pub fn with_table(table: Table) -> Self {
        TableSession {
            table: Some(table),
            status: None,
        }
    }

    fn table(&self) -> Result<&Table> {
        self.table.as_ref().ok_or(Error::NoModel)
    }

    fn solved(&self) -> Result<&Table> {
        match self.status {
            Some(SolveStatus::Solved) => self.table(),
            _ => Err(Error::NoSolution),
        }
    }
}

fn unknown(kind: &'static str, name: &str) -> Error {
    Error::Unknown {
        kind,
        name: name.to_string(),
    }
}

impl Session for TableSession {
    fn read_model(&mut self, path: &Path) -> Result<()> {
        let table = table::read_from_file(path)?;
        info!(path = %path.display(), "model loaded");
        self.table = Some(table);
        self.status = None;
        Ok(())
    }

    fn read_data(&mut self, path: &Path) -> Result<()> {
        let data = table::read_from_file(path)?;
        let table = self.table.as_mut().ok_or(Error::NoModel)?;
        table.merge(data);
        info!(path = %path.display(), "data loaded");
        self.status = None;
        Ok(())
    }

    fn set_param(&mut self, name: &str, index: Index, value: Value) -> Result<()> {
        let table = self.table.as_mut().ok_or(Error::NoModel)?;
        let values = table.parameters.get_mut(name).ok_or_else(|| unknown("parameter", name))?;
        debug!(param = name, %index, %value, "parameter overridden");
        values.set(index, value);
        self.status = None;
        Ok(())
    }

    fn solve(&mut self) -> Result<SolveStatus> {
        let status = self
            .table()?
            .status
            .clone()
            .unwrap_or_else(|| SolveStatus::Failed("no recorded result".to_string()));
        debug!(%status, "replayed solve");
        self.status = Some(status.clone());
        Ok(status)
    }

    fn objective(&self, name: &str) -> Result<f64> {
        self.solved()?
            .objectives
            .get(name)
            .copied()
            .ok_or_else(|| unknown("objective", name))
    }

    fn variable(&self, name: &str) -> Result<Values> {
        self.solved()?
            .variables
            .get(name)
            .cloned()
            .ok_or_else(|| unknown("variable", name))
    }

    fn parameter(&self, name: &str) -> Result<Values> {
        self.table()?
            .parameters
            .get(name)
            .cloned()
            .ok_or_else(|| unknown("parameter", name))
    }

    fn set(&self, name: &str) -> Result<Vec<Label>> {
        self.table()?.sets.get(name).cloned().ok_or_else(|| unknown("set", name))
    }
}

#[cfg(test)]
mod tests {
    use super::TableSession;
    use crate::dimacs::table;
    use crate::session::{Error, Index, Session, SolveStatus, Value};
    use crate::Label;
    use std::io::Cursor;

    fn session(text: &str) -> TableSession {
        TableSession::with_table(table::read(Cursor::new(text)).unwrap())
    }

    #[test]
    fn test_table_session() {
        let mut s = session("s solved\no Time 42\nv x 1 2 1\nd p 2 7\ne ENGINES 1 2\n");
        assert!(matches!(s.objective("Time"), Err(Error::NoSolution)));
        assert_eq!(s.parameter("p").unwrap().get(&Index::from("2")), Some(&Value::Num(7.0)));

        assert_eq!(s.solve().unwrap(), SolveStatus::Solved);
        assert_eq!(s.objective("Time").unwrap(), 42.0);
        let x = s.variable("x").unwrap();
        assert_eq!(
            x.get(&Index(vec![Label::from("1"), Label::from("2")])),
            Some(&Value::Num(1.0))
        );
        assert_eq!(s.set("ENGINES").unwrap().len(), 2);
        assert!(matches!(s.objective("Cost"), Err(Error::Unknown { .. })));
        assert!(matches!(s.variable("y"), Err(Error::Unknown { .. })));

        s.set_param("p", Index::from("2"), Value::Num(8.0)).unwrap();
        assert_eq!(s.parameter("p").unwrap().get(&Index::from("2")), Some(&Value::Num(8.0)));
        assert!(s.set_param("q", Index::from("2"), Value::Num(8.0)).is_err());
        // Overriding a parameter requires a new solve.
        assert!(matches!(s.variable("x"), Err(Error::NoSolution)));
    }

    #[test]
    fn test_table_session_failures() {
        let mut s = TableSession::new();
        assert!(matches!(s.solve(), Err(Error::NoModel)));
        assert!(matches!(s.set("P"), Err(Error::NoModel)));

        let mut s = session("d p 1 1\n");
        assert!(matches!(s.solve().unwrap(), SolveStatus::Failed(_)));

        let mut s = session("s infeasible\n");
        assert_eq!(s.solve().unwrap(), SolveStatus::Infeasible);
        assert!(matches!(s.objective("Profit"), Err(Error::NoSolution)));
    }
}
