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

//! Flow values on the arcs of a network.

use crate::network::{Arc, Network};

use std::ops::Index;

/// A flow, i.e. one value per arc indexed by arc id.
#[derive(Clone, Debug, PartialEq)]
pub struct Flow {
    values: Vec<f64>,
}

impl Flow {
    /// Return the zero flow on `g`.
    pub fn new(g: &Network) -> Self {
        Flow {
            values: vec![0.0; g.num_arcs()],
        }
    }

    /// Create a flow from a vector of values indexed by arc id.
    pub fn from_vec(values: Vec<f64>) -> Self {
        Flow { values }
    }

    /// Return the number of arcs this flow is defined on.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Return the flow value on an arc.
    ///
    /// Arcs beyond the end of the value vector carry no flow.
    pub fn get(&self, a: Arc) -> f64 {
        self.values.get(a.index()).copied().unwrap_or(0.0)
    }

    /// Set the flow value on an arc.
    pub fn set(&mut self, a: Arc, value: f64) {
        if a.index() >= self.values.len() {
            self.values.resize(a.index() + 1, 0.0);
        }
        self.values[a.index()] = value;
    }

    /// Return `true` if the absolute flow on `a` exceeds `tolerance`.
    pub fn is_active(&self, a: Arc, tolerance: f64) -> bool {
        self.get(a).abs() > tolerance
    }

    /// Return the number of integral units carried by `a`.
    ///
    /// Values not exceeding `tolerance` carry no unit, all others are
    /// rounded to the nearest integer.
    pub fn units(&self, a: Arc, tolerance: f64) -> u64 {
        let x = self.get(a);
        if x > tolerance {
            x.round() as u64
        } else {
            0
        }
    }

    /// Return the cost `sum c(a) x(a)` of this flow.
    pub fn cost(&self, g: &Network) -> f64 {
        g.arcs().map(|a| g.cost(a) * self.get(a)).sum()
    }

    /// Return the values as a slice indexed by arc id.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

impl Index<Arc> for Flow {
    type Output = f64;

    fn index(&self, a: Arc) -> &f64 {
        &self.values[a.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::Flow;
    use crate::Network;

    #[test]
    fn test_units() {
        let g = Network::new_with(|b| {
            b.add_labelled_arc("A", "B", 2.0);
            b.add_labelled_arc("B", "C", 3.0);
            b.add_labelled_arc("A", "C", 7.0);
        });
        let mut x = Flow::new(&g);
        x.set(g.id2arc(0), 1.9999);
        x.set(g.id2arc(1), 0.000001);
        assert_eq!(x.units(g.id2arc(0), 1e-5), 2);
        assert_eq!(x.units(g.id2arc(1), 1e-5), 0);
        assert_eq!(x.units(g.id2arc(2), 1e-5), 0);
        assert!(x.is_active(g.id2arc(0), 0.5));
        assert!(!x.is_active(g.id2arc(1), 0.5));
        assert!((x.cost(&g) - 3.999803).abs() < 1e-9);
    }

    #[test]
    fn test_short_vector() {
        let g = Network::new_with(|b| {
            b.add_labelled_arc("A", "B", 1.0);
            b.add_labelled_arc("B", "C", 1.0);
        });
        let x = Flow::from_vec(vec![1.0]);
        assert_eq!(x.get(g.id2arc(1)), 0.0);
        assert_eq!(x[g.id2arc(0)], 1.0);
    }
}
