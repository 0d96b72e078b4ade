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

//! Loaded graphs.
//!
//! A [`LoadedGraph`] is the engine-owned copy of a capacity matrix. It is
//! stored in one of the two representations with the index and capacity
//! width of its [`CapacityMode`].

use crate::buffer::MatrixView;
use crate::dense::{self, DenseMatrix};
use crate::error::{Error, Result};
use crate::maxflow::Algorithm;
use crate::mode::CapacityMode;
use crate::options::Options;
use crate::residual::ResidualGraph;
use crate::sparse::{self, SparseMatrix};
use crate::traits::{Capacity, Index, Network};

use either::Either;
use tracing::debug;

/// A graph in dense or sparse representation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Graph<I, C> {
    Dense(DenseMatrix<C>),
    Sparse(SparseMatrix<I, C>),
}

impl<I, C> Graph<I, C>
where
    I: Index,
    C: Capacity,
{
    /// Copy a validated view, keeping its storage form.
    fn from_view(view: &MatrixView, n: usize) -> Result<Self> {
        Ok(if view.is_sparse() {
            Graph::Sparse(SparseMatrix::from_view(view, n)?)
        } else {
            Graph::Dense(DenseMatrix::from_view(view, n)?)
        })
    }

    /// Return `true` if the graph uses the sparse representation.
    pub fn is_sparse(&self) -> bool {
        matches!(self, Graph::Sparse(_))
    }

    /// Compute the maximum flow value from `src` to `snk`.
    ///
    /// The vertices and options must be valid.
    fn max_flow(&self, alg: Algorithm, src: usize, snk: usize, opts: &Options) -> Result<(C, ResidualGraph<I, C>)> {
        let mut res = ResidualGraph::new(self);
        let value = alg.run(&mut res, src, snk, opts)?;
        Ok((value, res))
    }
}

impl<I, C> Network<C> for Graph<I, C>
where
    I: Index,
    C: Capacity,
{
    type OutArcs<'a> = Either<dense::OutArcs<'a, C>, sparse::OutArcs<'a, I, C>>
    where
        Self: 'a;

    fn num_vertices(&self) -> usize {
        match self {
            Graph::Dense(g) => g.num_vertices(),
            Graph::Sparse(g) => g.num_vertices(),
        }
    }

    fn num_arcs(&self) -> usize {
        match self {
            Graph::Dense(g) => g.num_arcs(),
            Graph::Sparse(g) => g.num_arcs(),
        }
    }

    fn out_arcs(&self, u: usize) -> Self::OutArcs<'_> {
        match self {
            Graph::Dense(g) => Either::Left(g.out_arcs(u)),
            Graph::Sparse(g) => Either::Right(g.out_arcs(u)),
        }
    }

    fn capacity(&self, u: usize, v: usize) -> C {
        match self {
            Graph::Dense(g) => g.capacity(u, v),
            Graph::Sparse(g) => g.capacity(u, v),
        }
    }
}

/// A graph with the index and capacity width of its mode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypedGraph {
    NarrowIndexNarrowCapacity(Graph<u32, u32>),
    NarrowIndexWideCapacity(Graph<u32, u64>),
    WideIndexNarrowCapacity(Graph<u64, u32>),
    WideIndexWideCapacity(Graph<u64, u64>),
}

/// Dispatch `$body` on the concrete graph type of a [`TypedGraph`].
macro_rules! with_graph {
    ($typed:expr, $g:ident => $body:expr) => {
        match $typed {
            TypedGraph::NarrowIndexNarrowCapacity($g) => $body,
            TypedGraph::NarrowIndexWideCapacity($g) => $body,
            TypedGraph::WideIndexNarrowCapacity($g) => $body,
            TypedGraph::WideIndexWideCapacity($g) => $body,
        }
    };
}

impl TypedGraph {
    fn from_view(view: &MatrixView, n: usize, mode: CapacityMode) -> Result<Self> {
        Ok(match mode {
            CapacityMode::NarrowIndexNarrowCapacity => TypedGraph::NarrowIndexNarrowCapacity(Graph::from_view(view, n)?),
            CapacityMode::NarrowIndexWideCapacity => TypedGraph::NarrowIndexWideCapacity(Graph::from_view(view, n)?),
            CapacityMode::WideIndexNarrowCapacity => TypedGraph::WideIndexNarrowCapacity(Graph::from_view(view, n)?),
            CapacityMode::WideIndexWideCapacity => TypedGraph::WideIndexWideCapacity(Graph::from_view(view, n)?),
        })
    }

    /// Return the mode matching the widths of the graph.
    pub fn mode(&self) -> CapacityMode {
        match self {
            TypedGraph::NarrowIndexNarrowCapacity(_) => CapacityMode::NarrowIndexNarrowCapacity,
            TypedGraph::NarrowIndexWideCapacity(_) => CapacityMode::NarrowIndexWideCapacity,
            TypedGraph::WideIndexNarrowCapacity(_) => CapacityMode::WideIndexNarrowCapacity,
            TypedGraph::WideIndexWideCapacity(_) => CapacityMode::WideIndexWideCapacity,
        }
    }
}

/// A validated graph owned by the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadedGraph {
    n: usize,
    num_arcs: usize,
    graph: TypedGraph,
}

impl LoadedGraph {
    /// Validate a matrix view and copy it into engine-owned storage.
    ///
    /// The view is not referenced after this function returns.
    ///
    /// # Example
    ///
    /// ```
    /// use rs_maxflow::{CapacityMode, LoadedGraph, MatrixView};
    ///
    /// let values: Vec<u64> = vec![3, 5];
    /// let rows: Vec<u32> = vec![0, 1];
    /// let cols: Vec<u32> = vec![1, 2];
    /// let g = LoadedGraph::from_view(&MatrixView::sparse(&values, &rows, &cols, (3, 3))).unwrap();
    /// assert_eq!(g.num_vertices(), 3);
    /// assert_eq!(g.mode(), CapacityMode::NarrowIndexWideCapacity);
    /// assert!(g.is_sparse());
    /// ```
    pub fn from_view(view: &MatrixView) -> Result<LoadedGraph> {
        let n = view.check_shape()?;
        let summary = view.summarize()?;
        let mode = CapacityMode::select(n, view.element_type())?.fit(summary.total, summary.nonzeros)?;
        let graph = TypedGraph::from_view(view, n, mode)?;
        debug!(
            n,
            arcs = summary.nonzeros,
            mode = mode.code(),
            sparse = view.is_sparse(),
            "graph loaded"
        );
        Ok(LoadedGraph {
            n,
            num_arcs: summary.nonzeros,
            graph,
        })
    }

    /// Return the number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.n
    }

    /// Return the number of arcs (non-zero off-diagonal entries).
    ///
    /// Duplicate sparse entries are counted separately.
    pub fn num_arcs(&self) -> usize {
        self.num_arcs
    }

    /// Return the capacity mode the graph is stored with.
    pub fn mode(&self) -> CapacityMode {
        self.graph.mode()
    }

    /// Return `true` if the graph uses the sparse representation.
    pub fn is_sparse(&self) -> bool {
        with_graph!(&self.graph, g => g.is_sparse())
    }

    /// Return the graph with its concrete widths.
    pub fn typed(&self) -> &TypedGraph {
        &self.graph
    }

    /// Check that `u` is a vertex.
    pub fn check_vertex(&self, u: usize) -> Result<()> {
        if u < self.n {
            Ok(())
        } else {
            Err(Error::InvalidVertex { vertex: u, n: self.n })
        }
    }

    /// Check the arguments of a solve.
    ///
    /// Errors are reported in the order thread count, source, sink,
    /// source equals sink.
    pub fn check_terminals(&self, src: usize, snk: usize, opts: &Options) -> Result<()> {
        opts.validate()?;
        self.check_vertex(src)?;
        self.check_vertex(snk)?;
        if src == snk {
            return Err(Error::SourceEqualsSink(src));
        }
        Ok(())
    }

    /// Compute the maximum flow value from `src` to `snk`.
    ///
    /// Each call works on a fresh residual graph, the loaded graph is not
    /// modified.
    pub fn max_flow(&self, alg: Algorithm, src: usize, snk: usize, opts: &Options) -> Result<u64> {
        self.max_flow_min_cut(alg, src, snk, opts).map(|(value, _)| value)
    }

    /// Compute the maximum flow value and the source side of a minimum cut.
    pub fn max_flow_min_cut(
        &self,
        alg: Algorithm,
        src: usize,
        snk: usize,
        opts: &Options,
    ) -> Result<(u64, Vec<usize>)> {
        self.check_terminals(src, snk, opts)?;
        debug!(algorithm = %alg, src, snk, threads = opts.threads, "solve");
        let (value, cut) = with_graph!(&self.graph, g => {
            let (value, res) = g.max_flow(alg, src, snk, opts)?;
            (value.to_flow(), res.min_cut(snk))
        });
        debug!(algorithm = %alg, value, "solved");
        Ok((value, cut))
    }
}

#[cfg(test)]
mod tests {
    use super::LoadedGraph;
    use crate::{Algorithm, CapacityMode, Error, MatrixView, Options};

    #[test]
    fn test_load_dense() {
        let data: Vec<i32> = vec![0, 10, 10, 0, 0, 0, 0, 10, 0, 0, 0, 10, 0, 0, 0, 0];
        let g = LoadedGraph::from_view(&MatrixView::dense(&data, 4, 4)).unwrap();
        assert_eq!(g.num_vertices(), 4);
        assert_eq!(g.num_arcs(), 4);
        assert_eq!(g.mode(), CapacityMode::NarrowIndexNarrowCapacity);
        assert!(!g.is_sparse());
        assert_eq!(g.max_flow(Algorithm::Dinic, 0, 3, &Options::default()), Ok(20));
        // the graph is not consumed
        assert_eq!(g.max_flow(Algorithm::EdmondsKarp, 0, 3, &Options::default()), Ok(20));
    }

    #[test]
    fn test_widened_capacity() {
        let big = u32::max_value();
        let data: Vec<u32> = vec![0, big, big, 0, 0, big, 0, 0, 0];
        let g = LoadedGraph::from_view(&MatrixView::dense(&data, 3, 3)).unwrap();
        assert_eq!(g.mode(), CapacityMode::NarrowIndexWideCapacity);
        assert_eq!(
            g.max_flow(Algorithm::PushRelabelHighest, 0, 2, &Options::default()),
            Ok(2 * u64::from(big))
        );
    }

    #[test]
    fn test_capacity_overflow() {
        let big = u64::max_value();
        let data: Vec<u64> = vec![0, big, 0, 0, 0, big, 0, 0, 0];
        assert_eq!(
            LoadedGraph::from_view(&MatrixView::dense(&data, 3, 3)).err(),
            Some(Error::CapacityOverflow)
        );
        // a huge diagonal entry is ignored
        let data: Vec<u64> = vec![big, big, 0, 0];
        assert!(LoadedGraph::from_view(&MatrixView::dense(&data, 2, 2)).is_ok());
    }

    #[test]
    fn test_check_terminals() {
        let data: Vec<u8> = vec![0, 1, 0, 0];
        let g = LoadedGraph::from_view(&MatrixView::dense(&data, 2, 2)).unwrap();
        let opts = Options::default();
        assert_eq!(
            g.max_flow(Algorithm::Dinic, 2, 1, &opts),
            Err(Error::InvalidVertex { vertex: 2, n: 2 })
        );
        assert_eq!(
            g.max_flow(Algorithm::Dinic, 0, 5, &opts),
            Err(Error::InvalidVertex { vertex: 5, n: 2 })
        );
        assert_eq!(g.max_flow(Algorithm::Dinic, 1, 1, &opts), Err(Error::SourceEqualsSink(1)));
        assert_eq!(
            g.max_flow(Algorithm::Dinic, 0, 1, &opts.with_threads(0)),
            Err(Error::InvalidThreadCount)
        );
    }

    #[test]
    fn test_min_cut() {
        let data: Vec<u16> = vec![0, 5, 0, 0, 0, 1, 0, 0, 0];
        let g = LoadedGraph::from_view(&MatrixView::dense(&data, 3, 3)).unwrap();
        for alg in Algorithm::all() {
            let (value, cut) = g.max_flow_min_cut(alg, 0, 2, &Options::default()).unwrap();
            assert_eq!(value, 1, "{}", alg);
            assert_eq!(cut, vec![0, 1], "{}", alg);
        }
    }

    #[test]
    fn test_rejects() {
        let data: Vec<f64> = vec![0.0, 1.0, 0.0, 0.0];
        assert!(matches!(
            LoadedGraph::from_view(&MatrixView::dense(&data, 2, 2)),
            Err(Error::UnsupportedType(_))
        ));
        let data: Vec<i64> = vec![0, -1, 0, 0];
        assert_eq!(
            LoadedGraph::from_view(&MatrixView::dense(&data, 2, 2)),
            Err(Error::NegativeCapacity { row: 0, col: 1 })
        );
        let data: Vec<u32> = vec![0; 6];
        assert_eq!(
            LoadedGraph::from_view(&MatrixView::dense(&data, 2, 3)),
            Err(Error::InvalidShape { rows: 2, cols: 3 })
        );
    }
}
