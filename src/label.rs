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

//! Normalized labels of nodes and index entries.
//!
//! Solvers report set members either as symbols (`"3p"`) or as numbers,
//! and numbers frequently come back as floating point values (`3.0`). A
//! [`Label`] is the canonical textual form of such a value, so that the
//! member `3` of a node set and the parameter value `3.0` of an arc tail
//! compare equal.

use std::borrow::Borrow;
use std::fmt;

#[cfg(feature = "serialize")]
use serde_derive::{Deserialize, Serialize};

/// A normalized label.
///
/// Integral floating point values are printed without fractional part,
/// everything else is kept as is.
///
/// # Example
///
/// ```
/// use rs_netpaths::Label;
///
/// assert_eq!(Label::from(3.0), Label::from("3"));
/// assert_eq!(Label::from(2.5).as_str(), "2.5");
/// assert_eq!(Label::from("23p").to_string(), "23p");
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Label(String);

impl Label {
    /// Return the label text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Label(s.to_string())
    }
}

impl From<String> for Label {
    fn from(s: String) -> Self {
        Label(s)
    }
}

impl From<&String> for Label {
    fn from(s: &String) -> Self {
        Label(s.clone())
    }
}

impl From<&Label> for Label {
    fn from(l: &Label) -> Self {
        l.clone()
    }
}

impl From<f64> for Label {
    fn from(x: f64) -> Self {
        if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e15 {
            Label(format!("{}", x as i64))
        } else {
            Label(format!("{}", x))
        }
    }
}

impl From<i64> for Label {
    fn from(x: i64) -> Self {
        Label(x.to_string())
    }
}

impl From<i32> for Label {
    fn from(x: i32) -> Self {
        Label(x.to_string())
    }
}

impl From<usize> for Label {
    fn from(x: usize) -> Self {
        Label(x.to_string())
    }
}

impl Borrow<str> for Label {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Label {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // Forward to `str` so that width and alignment flags apply.
        fmt::Display::fmt(self.0.as_str(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::Label;
    use std::collections::HashMap;

    #[test]
    fn test_numbers() {
        assert_eq!(Label::from(18.0).as_str(), "18");
        assert_eq!(Label::from(-4.0).as_str(), "-4");
        assert_eq!(Label::from(0.25).as_str(), "0.25");
        assert_eq!(Label::from(18i64), Label::from("18"));
        assert_eq!(Label::from(7usize), Label::from(7.0));
    }

    #[test]
    fn test_lookup_by_str() {
        let mut m = HashMap::new();
        m.insert(Label::from(5.0), 1);
        assert_eq!(m.get("5"), Some(&1));
    }

    #[test]
    fn test_padding() {
        assert_eq!(format!("{:<6}|", Label::from("3p")), "3p    |");
    }
}
