// Copyright (c) 2015-2022 Frank Fischer <frank-fischer@shadow-soft.de>
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

//! Maximum flow (minimum cut) computations on directed capacitated graphs.
//!
//! The graph is handed over as a capacity matrix, either dense (row-major
//! `n × n` buffer) or sparse (coordinate triplets). The internal index and
//! capacity width is chosen from the number of vertices and the element type
//! of the matrix (see [`CapacityMode`]).
//!
//! Eight algorithms are available, see [`Algorithm`]. The three parallel
//! ones take a thread count.
//!
//! # Example
//!
//! ```
//! use rs_maxflow::{MatrixView, Solver};
//!
//! let capacities: Vec<u32> = vec![
//!     0, 10, 10, 0,
//!     0, 0, 0, 10,
//!     0, 0, 0, 10,
//!     0, 0, 0, 0,
//! ];
//! let matrix = MatrixView::dense(&capacities[..], 4, 4);
//!
//! let mut solver = Solver::new();
//! solver.load(&matrix, "dinic").unwrap();
//! assert_eq!(solver.solve("dinic", 0, 3, 1).unwrap(), 20);
//!
//! // a solve consumes the loaded graph
//! assert!(!solver.is_loaded());
//!
//! assert_eq!(rs_maxflow::parallel_push_relabel(&matrix, 0, 3, 2).unwrap(), 20);
//! ```

mod num {
    pub use num_integer as integer;
    pub use num_traits as traits;
}

// # Data structures

pub mod error;
pub use self::error::{Error, ErrorKind, Result};

pub mod traits;
pub use self::traits::{Capacity, Index, Network};

pub mod buffer;
pub use self::buffer::{Buffer, ElementType, Indices, MatrixView};

pub mod mode;
pub use self::mode::CapacityMode;

pub mod dense;
pub use self::dense::DenseMatrix;

pub mod sparse;
pub use self::sparse::SparseMatrix;

pub mod graph;
pub use self::graph::{Graph, LoadedGraph, TypedGraph};

pub mod residual;
pub use self::residual::ResidualGraph;

// # Algorithms

pub mod maxflow;
pub use self::maxflow::Algorithm;

// # Solving

pub mod options;
pub use self::options::Options;

pub mod registry;
pub use self::registry::{GraphHandle, GraphRegistry};

pub mod solver;
pub use self::solver::{
    ahuja_orlin, dinic, edmonds_karp, max_flow, parallel_ahuja_orlin_segment, parallel_push_relabel,
    parallel_push_relabel_segment, push_relabel_fifo, push_relabel_highest, Solver,
};

#[cfg(feature = "dimacs")]
pub mod dimacs;
