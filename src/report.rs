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

//! Text reports.

use crate::scenario::Route;
use crate::session::Values;

use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;

use num_traits::ToPrimitive;
use tracing::info;

/// Environment variable that enables writing reports to files.
pub const OUTPUT_ENV: &str = "AMPLHW_OUTPUT";

/// Return `true` if reports are also written to files.
pub fn writes_files() -> bool {
    env::var_os(OUTPUT_ENV).is_some()
}

/// Format a number with `decimals` digits and thousands separators.
///
/// # Example
///
/// ```
/// use rs_netpaths::report::group_thousands;
///
/// assert_eq!(group_thousands(1234567.891, 2), "1,234,567.89");
/// assert_eq!(group_thousands(42u32, 0), "42");
/// ```
pub fn group_thousands<T: ToPrimitive>(value: T, decimals: usize) -> String {
    let x = value.to_f64().unwrap_or(f64::NAN);
    if !x.is_finite() {
        return x.to_string();
    }

    let s = format!("{:.*}", decimals, x.abs());
    let (int, frac) = match s.find('.') {
        Some(p) => s.split_at(p),
        None => (s.as_str(), ""),
    };

    let mut out = String::with_capacity(s.len() + int.len() / 3 + 1);
    if x < 0.0 && s.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    for (i, c) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out.push_str(frac);
    out
}

/// Return the line `<name>: <value>` for an objective value.
pub fn objective_line(name: &str, value: f64) -> String {
    format!("{}: {}", name, group_thousands(value, 2))
}

/// Return one line `  - <item> <index>: <value> <unit>` per entry above
/// `threshold`.
///
/// Values are shown with two decimals and thousands separators, non-numeric
/// entries are skipped.
pub fn listing(values: &Values, threshold: f64, item: &str, unit: &str) -> Vec<String> {
    values
        .iter()
        .filter_map(|(index, value)| value.as_f64().map(|x| (index, x)))
        .filter(|&(_, x)| x > threshold)
        .map(|(index, x)| format!("  - {} {}: {} {}", item, index, group_thousands(x, 2), unit))
        .collect()
}

/// A table of routes.
#[derive(Clone, Debug, Default)]
pub struct RouteTable {
    rows: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, route: Route) {
        self.rows.push(route);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Return the lines of the table including the header.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(format!("{:<6} | {:<6} | {:<6} | Travel Sequence", "Start", "End", "Time"));
        lines.push("-".repeat(60));
        for r in &self.rows {
            let cost = if r.cost.is_finite() {
                format!("{:.1}", r.cost)
            } else {
                "inf".to_string()
            };
            lines.push(format!("{:<6} | {:<6} | {:<6} | {}", r.start, r.end, cost, r.sequence));
        }
        lines
    }
}

impl fmt::Display for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Collects the lines of a report.
///
/// Every line is printed immediately. If writing to a file is enabled,
/// [`Output::finish`] writes all lines to `<name>.amplout`.
#[derive(Debug)]
pub struct Output {
    name: String,
    dir: PathBuf,
    to_file: bool,
    echo: bool,
    lines: Vec<String>,
}

impl Output {
    /// Create an output that writes a file iff `AMPLHW_OUTPUT` is set.
    pub fn new(name: &str) -> Self {
        Output::with_file(name, writes_files())
    }

    /// Create an output that writes a file iff `to_file` is true.
    pub fn with_file(name: &str, to_file: bool) -> Self {
        Output {
            name: name.to_string(),
            dir: PathBuf::from("."),
            to_file,
            echo: true,
            lines: vec![],
        }
    }

    /// Set the directory of the output file.
    pub fn dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.dir = dir.into();
        self
    }

    /// Enable or disable printing to stdout.
    pub fn echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Add a line.
    pub fn line<S: Into<String>>(&mut self, line: S) {
        let line = line.into();
        if self.echo {
            println!("{}", line);
        }
        self.lines.push(line);
    }

    /// Add several lines.
    pub fn extend<I>(&mut self, lines: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        for line in lines {
            self.line(line);
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Return the path of the output file.
    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.amplout", self.name))
    }

    /// Write the output file if enabled and return its path.
    pub fn finish(&self) -> io::Result<Option<PathBuf>> {
        if !self.to_file {
            return Ok(None);
        }
        let path = self.path();
        fs::write(&path, self.lines.join("\n"))?;
        info!(path = %path.display(), lines = self.lines.len(), "output written");
        Ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::{group_thousands, listing, objective_line, writes_files, Output, RouteTable, OUTPUT_ENV};
    use crate::scenario::{Route, FAILED_ROUTE};
    use crate::session::{Value, Values};
    use crate::Label;
    use std::fs;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(6510631.58, 2), "6,510,631.58");
        assert_eq!(group_thousands(999.0, 0), "999");
        assert_eq!(group_thousands(1000u32, 0), "1,000");
        assert_eq!(group_thousands(-1234.5, 1), "-1,234.5");
        assert_eq!(group_thousands(-0.001, 2), "0.00");
        assert_eq!(group_thousands(123456, 0), "123,456");
        assert_eq!(group_thousands(f64::INFINITY, 2), "inf");
        assert_eq!(objective_line("Total Cost", 6448827.0), "Total Cost: 6,448,827.00");
    }

    #[test]
    fn test_listing() {
        let mut values = vec![("WingSpar", 1167.0), ("WingRib", 0.0005), ("FuselagePanel", 2.5)]
            .into_iter()
            .collect::<Values>();
        values.push("Note", Value::Sym("n/a".to_string()));
        assert_eq!(
            listing(&values, 0.001, "Product", "units"),
            vec!["  - Product WingSpar: 1,167.00 units", "  - Product FuselagePanel: 2.50 units"]
        );
    }

    #[test]
    fn test_route_table() {
        let mut t = RouteTable::new();
        t.push(Route {
            start: Label::from("1"),
            end: Label::from("3p"),
            cost: 12.0,
            sequence: "1->2->3p".to_string(),
            complete: true,
        });
        t.push(Route {
            start: Label::from("18"),
            end: Label::from("24"),
            cost: f64::INFINITY,
            sequence: FAILED_ROUTE.to_string(),
            complete: false,
        });
        let lines = t.lines();
        assert_eq!(lines[0], "Start  | End    | Time   | Travel Sequence");
        assert_eq!(lines[1].len(), 60);
        assert_eq!(lines[2], "1      | 3p     | 12.0   | 1->2->3p");
        assert_eq!(lines[3], "18     | 24     | inf    | Infeasible/Error");
    }

    #[test]
    fn test_output_file() {
        let dir = std::env::temp_dir();
        let mut out = Output::with_file("rs_netpaths_report_test", true)
            .dir(&dir)
            .echo(false);
        out.extend(vec!["a", "b"]);
        let path = out.finish().unwrap().unwrap();
        assert_eq!(path, dir.join("rs_netpaths_report_test.amplout"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\nb");
        fs::remove_file(path).unwrap();

        let out = Output::with_file("unused", false).echo(false);
        assert_eq!(out.finish().unwrap(), None);
    }

    #[test]
    fn test_writes_files() {
        std::env::remove_var(OUTPUT_ENV);
        assert!(!writes_files());
        assert_eq!(Output::new("unused").echo(false).finish().unwrap(), None);
        std::env::set_var(OUTPUT_ENV, "1");
        assert!(writes_files());
        std::env::remove_var(OUTPUT_ENV);
    }
}
