// Copyright (c) 2015-2022, 2025 Frank Fischer <frank-fischer@shadow-soft.de>
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
//

#![forbid(unsafe_code)]

//! A library for reading back the solutions of network flow models.
//!
//! A modeling layer (see [`session`]) solves a flow model and reports one
//! flow value per arc. This crate reconstructs the routes behind such a
//! solution: a single route for a unit shortest path ([`paths::trace`]) or
//! one route per unit of supply for a multi source flow
//! ([`paths::decompose`]). The [`scenario`] module runs both on top of a
//! session, [`report`] formats the results. Reports of models without a
//! network are in [`plan`].
//!
//! The [`bnb`] module holds records of a branch-and-bound search tree that
//! can be classified, laid out and drawn with [`draw`].

// # Data structures

pub mod label;
pub use self::label::Label;

pub mod network;
pub use self::network::{Arc, Network, NetworkBuilder, Node};

pub mod flow;
pub use self::flow::Flow;

// # Algorithms

pub mod paths;
pub use self::paths::{Path, PathEnd};

// # Modeling layer

pub mod dimacs;
pub mod plan;
pub mod scenario;
pub mod session;
pub use self::session::{ReplaySession, Session, SolveStatus, TableSession};

// # Reports and drawing

pub mod bnb;
pub mod draw;
pub mod report;
