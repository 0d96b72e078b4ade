/*
 * Copyright (c) 2017-2022 Frank Fischer <frank-fischer@shadow-soft.de>
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

//! Maximum flow algorithms.
//!
//! All algorithms work on a [`ResidualGraph`] with zero initial flow and
//! return the value of a maximum flow. When they are done, the source side
//! of a minimum cut can be obtained by [`ResidualGraph::min_cut`].
//!
//! | Algorithm              | Module          | Selection rule                               |
//! |------------------------|-----------------|----------------------------------------------|
//! | Edmonds-Karp           | `edmondskarp`   | shortest augmenting paths                    |
//! | Dinic                  | `dinic`         | blocking flows in level graphs               |
//! | Ahuja-Orlin            | `ahujaorlin`    | excess scaling                               |
//! | FIFO push-relabel      | `fifo`          | active vertices in a queue                   |
//! | highest-label          | `pushrelabel`   | active vertex of largest height              |
//! | parallel push-relabel  | `parallel`      | synchronous rounds over all active vertices  |
//! | segmented push-relabel | `parallel`      | one contiguous vertex segment per thread     |
//! | segmented Ahuja-Orlin  | `parallel`      | excess scaling per segment                   |
//!
//! # Example
//!
//! ```
//! use rs_maxflow::{Algorithm, DenseMatrix, Options, ResidualGraph};
//!
//! let m = DenseMatrix::<u32>::new(4, vec![
//!     0, 3, 2, 0,
//!     0, 0, 1, 2,
//!     0, 0, 0, 3,
//!     0, 0, 0, 0,
//! ]);
//! for alg in Algorithm::all() {
//!     let mut g = ResidualGraph::<u32, u32>::new(&m);
//!     assert_eq!(alg.run(&mut g, 0, 3, &Options::default().with_threads(2)).unwrap(), 5);
//!     assert_eq!(g.min_cut(3), vec![0, 1, 2]);
//! }
//! ```

use crate::error::{Error, Result};
use crate::options::Options;
use crate::residual::ResidualGraph;
use crate::traits::{Capacity, Index};

use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

#[cfg(feature = "serialize")]
use serde_derive::{Deserialize, Serialize};

mod preflow;

pub mod ahujaorlin;
pub use self::ahujaorlin::{ahujaorlin, AhujaOrlin};

pub mod dinic;
pub use self::dinic::{dinic, Dinic};

pub mod edmondskarp;
pub use self::edmondskarp::{edmondskarp, EdmondsKarp};

pub mod fifo;
pub use self::fifo::{fifo, Fifo};

pub mod pushrelabel;
pub use self::pushrelabel::{pushrelabel, PushRelabel};

pub mod parallel;

/// The available maximum flow algorithms.
///
/// The string form of each algorithm is its public name.
///
/// ```
/// use rs_maxflow::Algorithm;
///
/// let alg: Algorithm = "parallel_AhujaOrlin_segment".parse().unwrap();
/// assert_eq!(alg, Algorithm::ParallelAhujaOrlinSegment);
/// assert_eq!(Algorithm::PushRelabelFifo.to_string(), "push_relabel_fifo");
/// assert!(Algorithm::parse("simplex").is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum Algorithm {
    #[strum(serialize = "edmonds_karp")]
    #[cfg_attr(feature = "serialize", serde(rename = "edmonds_karp"))]
    EdmondsKarp,
    #[strum(serialize = "ahuja_orlin")]
    #[cfg_attr(feature = "serialize", serde(rename = "ahuja_orlin"))]
    AhujaOrlin,
    #[strum(serialize = "dinic")]
    #[cfg_attr(feature = "serialize", serde(rename = "dinic"))]
    Dinic,
    #[strum(serialize = "push_relabel_fifo")]
    #[cfg_attr(feature = "serialize", serde(rename = "push_relabel_fifo"))]
    PushRelabelFifo,
    #[strum(serialize = "push_relabel_highest")]
    #[cfg_attr(feature = "serialize", serde(rename = "push_relabel_highest"))]
    PushRelabelHighest,
    #[strum(serialize = "parallel_push_relabel")]
    #[cfg_attr(feature = "serialize", serde(rename = "parallel_push_relabel"))]
    ParallelPushRelabel,
    #[strum(serialize = "parallel_push_relabel_segment")]
    #[cfg_attr(feature = "serialize", serde(rename = "parallel_push_relabel_segment"))]
    ParallelPushRelabelSegment,
    #[strum(serialize = "parallel_AhujaOrlin_segment")]
    #[cfg_attr(feature = "serialize", serde(rename = "parallel_AhujaOrlin_segment"))]
    ParallelAhujaOrlinSegment,
}

impl Algorithm {
    /// Return all algorithms.
    pub fn all() -> impl Iterator<Item = Algorithm> {
        Algorithm::iter()
    }

    /// Return the public names of all algorithms.
    pub fn names() -> Vec<&'static str> {
        Algorithm::iter().map(|alg| alg.name()).collect()
    }

    /// Return the public name of the algorithm.
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Parse a public algorithm name.
    pub fn parse(name: &str) -> Result<Algorithm> {
        name.parse().map_err(|_| Error::UnknownAlgorithm(name.to_string()))
    }

    /// Return `true` if the algorithm uses [`Options::threads`].
    pub fn is_parallel(self) -> bool {
        matches!(
            self,
            Algorithm::ParallelPushRelabel | Algorithm::ParallelPushRelabelSegment | Algorithm::ParallelAhujaOrlinSegment
        )
    }

    /// Compute a maximum flow from `src` to `snk` on the residual graph `g`.
    ///
    /// The graph must carry zero flow. On return it carries a maximum flow
    /// (or a maximum preflow, see [`ResidualGraph::min_cut`]).
    ///
    /// Only the parallel algorithms may fail, if their worker threads cannot
    /// be created.
    ///
    /// # Panics
    ///
    /// Panics if `src == snk` or one of them is not a vertex of `g`.
    pub fn run<I, C>(self, g: &mut ResidualGraph<I, C>, src: usize, snk: usize, opts: &Options) -> Result<C>
    where
        I: Index,
        C: Capacity,
    {
        assert!(src < g.num_vertices() && snk < g.num_vertices(), "invalid terminal");
        assert_ne!(src, snk, "Source and sink node must not be equal");

        Ok(match self {
            Algorithm::EdmondsKarp => edmondskarp(g, src, snk),
            Algorithm::Dinic => dinic(g, src, snk),
            Algorithm::AhujaOrlin => {
                let mut alg = AhujaOrlin::new(g);
                alg.use_global_relabelling = opts.global_relabelling;
                alg.solve(src, snk);
                alg.value()
            }
            Algorithm::PushRelabelFifo => {
                let mut alg = Fifo::new(g);
                alg.use_global_relabelling = opts.global_relabelling;
                alg.solve(src, snk);
                alg.value()
            }
            Algorithm::PushRelabelHighest => {
                let mut alg = PushRelabel::new(g);
                alg.use_global_relabelling = opts.global_relabelling;
                alg.solve(src, snk);
                alg.value()
            }
            Algorithm::ParallelPushRelabel => parallel::pushrelabel(g, src, snk, opts)?,
            Algorithm::ParallelPushRelabelSegment => parallel::segment(g, src, snk, opts)?,
            Algorithm::ParallelAhujaOrlinSegment => parallel::ahujaorlin(g, src, snk, opts)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Algorithm;
    use crate::{Error, Options, ResidualGraph, SparseMatrix};

    const ARCS: [(usize, usize, u64); 18] = [
        (0, 2, 18),
        (0, 5, 27),
        (2, 1, 8),
        (2, 3, 9),
        (2, 6, 6),
        (1, 3, 1),
        (1, 4, 10),
        (4, 3, 3),
        (3, 4, 8),
        (5, 3, 5),
        (5, 6, 9),
        (5, 8, 5),
        (5, 4, 2),
        (6, 7, 6),
        (8, 7, 4),
        (8, 4, 8),
        (4, 9, 33),
        (7, 9, 6),
    ];

    #[test]
    fn test_names() {
        assert_eq!(
            Algorithm::names(),
            vec![
                "edmonds_karp",
                "ahuja_orlin",
                "dinic",
                "push_relabel_fifo",
                "push_relabel_highest",
                "parallel_push_relabel",
                "parallel_push_relabel_segment",
                "parallel_AhujaOrlin_segment",
            ]
        );
        for alg in Algorithm::all() {
            assert_eq!(Algorithm::parse(alg.name()), Ok(alg));
            assert_eq!(alg.to_string(), alg.name());
        }
        assert_eq!(
            Algorithm::parse("Dinic"),
            Err(Error::UnknownAlgorithm("Dinic".to_string()))
        );
    }

    #[test]
    fn test_is_parallel() {
        assert_eq!(Algorithm::all().filter(|alg| alg.is_parallel()).count(), 3);
        assert!(!Algorithm::PushRelabelHighest.is_parallel());
        assert!(Algorithm::ParallelAhujaOrlinSegment.is_parallel());
    }

    #[test]
    fn test_every_algorithm() {
        let m = SparseMatrix::<u32, u64>::from_triplets(10, ARCS.to_vec());
        for alg in Algorithm::all() {
            for threads in 1..=3 {
                let mut g = ResidualGraph::<u32, u64>::new(&m);
                let value = alg.run(&mut g, 0, 9, &Options::default().with_threads(threads)).unwrap();
                assert_eq!(value, 29, "{}", alg);

                let cut = g.min_cut(9);
                assert!(cut.contains(&0) && !cut.contains(&9), "{}", alg);
                let cap: u64 = ARCS
                    .iter()
                    .filter(|&&(u, v, _)| cut.contains(&u) && !cut.contains(&v))
                    .map(|&(_, _, c)| c)
                    .sum();
                assert_eq!(cap, 29, "{}", alg);
            }
        }
    }

    #[cfg(feature = "serialize")]
    #[test]
    fn test_serde() {
        let alg: Algorithm = serde_json::from_str("\"parallel_AhujaOrlin_segment\"").unwrap();
        assert_eq!(alg, Algorithm::ParallelAhujaOrlinSegment);
        assert_eq!(serde_json::to_string(&Algorithm::Dinic).unwrap(), "\"dinic\"");
    }
}
