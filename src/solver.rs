/*
 * Copyright (c) 2022 Frank Fischer <frank-fischer@shadow-soft.de>
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

//! The stateful solver and the one-call functions.
//!
//! A [`Solver`] holds at most one loaded graph together with the
//! algorithm it was loaded for. Solving consumes the graph:
//!
//! ```
//! use rs_maxflow::{Error, GraphRegistry, MatrixView, Solver};
//!
//! let caps: Vec<i64> = vec![
//!     0, 10, 10, 0,
//!     0, 0, 0, 10,
//!     0, 0, 0, 10,
//!     0, 0, 0, 0,
//! ];
//! let m = MatrixView::dense(&caps, 4, 4);
//! let registry = GraphRegistry::new();
//! let mut solver = Solver::with_registry(&registry);
//!
//! solver.load(&m, "push_relabel_highest").unwrap();
//! assert_eq!(registry.len(), 1);
//! assert!(matches!(solver.solve("dinic", 0, 3, 1), Err(Error::AlgorithmMismatch { .. })));
//! assert_eq!(solver.solve("push_relabel_highest", 0, 3, 1), Ok(20));
//! assert_eq!(solver.solve("push_relabel_highest", 0, 3, 1), Err(Error::NotLoaded));
//! assert!(registry.is_empty());
//! ```

use crate::buffer::MatrixView;
use crate::error::{Error, Result};
use crate::graph::LoadedGraph;
use crate::maxflow::Algorithm;
use crate::options::Options;
use crate::registry::{GraphHandle, GraphRegistry};

use tracing::debug;

/// A loaded graph waiting to be solved.
#[derive(Clone, Copy, Debug)]
struct Loaded {
    handle: GraphHandle,
    algorithm: Algorithm,
    n: usize,
}

/// Stateful load/solve/destroy interface.
///
/// Dropping the solver releases a graph that is still loaded.
pub struct Solver<'r> {
    registry: &'r GraphRegistry,
    loaded: Option<Loaded>,
}

impl Solver<'static> {
    /// Create a solver storing its graphs in the process-wide registry.
    pub fn new() -> Self {
        Solver::with_registry(GraphRegistry::global())
    }
}

impl Default for Solver<'static> {
    fn default() -> Self {
        Solver::new()
    }
}

impl<'r> Solver<'r> {
    /// Create a solver storing its graphs in `registry`.
    pub fn with_registry(registry: &'r GraphRegistry) -> Self {
        Solver { registry, loaded: None }
    }

    /// Load a graph to be solved by the algorithm called `name`.
    ///
    /// A previously loaded graph is released. If the call fails, the solver
    /// is left unchanged.
    pub fn load(&mut self, matrix: &MatrixView, name: &str) -> Result<()> {
        self.load_algorithm(matrix, Algorithm::parse(name)?)
    }

    /// Load a graph to be solved by `algorithm`.
    pub fn load_algorithm(&mut self, matrix: &MatrixView, algorithm: Algorithm) -> Result<()> {
        let graph = LoadedGraph::from_view(matrix)?;
        let n = graph.num_vertices();
        self.destroy();
        let handle = self.registry.insert(graph);
        debug!(%handle, %algorithm, n, "loaded");
        self.loaded = Some(Loaded { handle, algorithm, n });
        Ok(())
    }

    /// Solve the loaded graph with `threads` threads.
    ///
    /// `name` must be the algorithm name used for loading. The thread
    /// count is ignored by the sequential algorithms.
    pub fn solve(&mut self, name: &str, src: usize, snk: usize, threads: usize) -> Result<u64> {
        let loaded = self.loaded.ok_or(Error::NotLoaded)?;
        if name != loaded.algorithm.name() {
            return Err(Error::AlgorithmMismatch {
                loaded: loaded.algorithm.to_string(),
                requested: name.to_string(),
            });
        }
        self.solve_with(loaded.algorithm, src, snk, &Options::default().with_threads(threads))
    }

    /// Solve the loaded graph with `algorithm` and the given options.
    ///
    /// On success the graph is released. If the arguments are invalid, the
    /// graph stays loaded.
    pub fn solve_with(&mut self, algorithm: Algorithm, src: usize, snk: usize, opts: &Options) -> Result<u64> {
        let loaded = self.loaded.ok_or(Error::NotLoaded)?;
        if algorithm != loaded.algorithm {
            return Err(Error::AlgorithmMismatch {
                loaded: loaded.algorithm.to_string(),
                requested: algorithm.to_string(),
            });
        }
        let graph = self.registry.get(loaded.handle)?;
        let value = graph.max_flow(algorithm, src, snk, opts)?;
        self.destroy();
        Ok(value)
    }

    /// Release the loaded graph, if any.
    ///
    /// # Panics
    ///
    /// Panics if the registry does not contain the loaded graph anymore.
    pub fn destroy(&mut self) {
        if let Some(loaded) = self.loaded.take() {
            let removed = self.registry.remove(loaded.handle);
            assert_eq!(removed, 1, "graph {} vanished from the registry", loaded.handle);
        }
    }

    /// Return `true` if a graph is loaded.
    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    /// Return the algorithm the current graph has been loaded for.
    pub fn algorithm(&self) -> Option<Algorithm> {
        self.loaded.map(|l| l.algorithm)
    }

    /// Return the registry handle of the loaded graph.
    pub fn handle(&self) -> Option<GraphHandle> {
        self.loaded.map(|l| l.handle)
    }

    /// Return the number of vertices of the loaded graph.
    pub fn num_vertices(&self) -> Option<usize> {
        self.loaded.map(|l| l.n)
    }
}

impl<'r> Drop for Solver<'r> {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Compute a maximum flow value by loading, solving and releasing a graph.
pub fn max_flow(matrix: &MatrixView, algorithm: Algorithm, src: usize, snk: usize, opts: &Options) -> Result<u64> {
    let mut solver = Solver::new();
    solver.load_algorithm(matrix, algorithm)?;
    solver.solve_with(algorithm, src, snk, opts)
}

macro_rules! sequential {
    ($(#[$attr:meta])* $name:ident => $alg:ident) => {
        $(#[$attr])*
        pub fn $name(matrix: &MatrixView, src: usize, snk: usize) -> Result<u64> {
            max_flow(matrix, Algorithm::$alg, src, snk, &Options::default())
        }
    };
}

macro_rules! parallel {
    ($(#[$attr:meta])* $name:ident => $alg:ident) => {
        $(#[$attr])*
        pub fn $name(matrix: &MatrixView, src: usize, snk: usize, threads: usize) -> Result<u64> {
            max_flow(matrix, Algorithm::$alg, src, snk, &Options::default().with_threads(threads))
        }
    };
}

sequential!(
    /// Compute a maximum flow value with the Edmonds-Karp algorithm.
    edmonds_karp => EdmondsKarp
);
sequential!(
    /// Compute a maximum flow value with the excess scaling algorithm.
    ahuja_orlin => AhujaOrlin
);
sequential!(
    /// Compute a maximum flow value with Dinic's algorithm.
    dinic => Dinic
);
sequential!(
    /// Compute a maximum flow value with FIFO push-relabel.
    push_relabel_fifo => PushRelabelFifo
);
sequential!(
    /// Compute a maximum flow value with highest-label push-relabel.
    push_relabel_highest => PushRelabelHighest
);
parallel!(
    /// Compute a maximum flow value with parallel push-relabel.
    parallel_push_relabel => ParallelPushRelabel
);
parallel!(
    /// Compute a maximum flow value with segmented parallel push-relabel.
    parallel_push_relabel_segment => ParallelPushRelabelSegment
);
parallel!(
    /// Compute a maximum flow value with segmented parallel excess scaling.
    parallel_ahuja_orlin_segment => ParallelAhujaOrlinSegment
);

#[cfg(test)]
mod tests {
    use super::Solver;
    use crate::{Error, GraphRegistry, MatrixView};

    #[test]
    fn test_failed_validation_keeps_graph() {
        let caps: Vec<u32> = vec![0, 3, 0, 0, 0, 4, 0, 0, 0];
        let m = MatrixView::dense(&caps, 3, 3);
        let r = GraphRegistry::new();
        let mut s = Solver::with_registry(&r);
        s.load(&m, "ahuja_orlin").unwrap();
        assert_eq!(s.num_vertices(), Some(3));

        assert_eq!(s.solve("ahuja_orlin", 0, 3, 1), Err(Error::InvalidVertex { vertex: 3, n: 3 }));
        assert_eq!(s.solve("ahuja_orlin", 2, 2, 1), Err(Error::SourceEqualsSink(2)));
        assert_eq!(s.solve("ahuja_orlin", 0, 2, 0), Err(Error::InvalidThreadCount));
        assert!(s.is_loaded());
        assert_eq!(r.len(), 1);

        assert_eq!(s.solve("ahuja_orlin", 0, 2, 1), Ok(3));
        assert!(!s.is_loaded());
        assert!(r.is_empty());
    }

    #[test]
    fn test_failed_load_keeps_graph() {
        let caps: Vec<u32> = vec![0, 3, 0, 0];
        let bad: Vec<f32> = vec![0.0, 3.0, 0.0, 0.0];
        let r = GraphRegistry::new();
        let mut s = Solver::with_registry(&r);
        s.load(&MatrixView::dense(&caps, 2, 2), "dinic").unwrap();
        let h = s.handle();

        assert!(matches!(s.load(&MatrixView::dense(&caps, 2, 2), "simplex"), Err(Error::UnknownAlgorithm(_))));
        assert!(matches!(s.load(&MatrixView::dense(&bad, 2, 2), "dinic"), Err(Error::UnsupportedType(_))));
        assert_eq!(s.handle(), h);
        assert_eq!(r.len(), 1);

        drop(s);
        assert!(r.is_empty());
    }
}
