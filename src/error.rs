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

//! Errors reported by loading and solving.
//!
//! All errors are detected before an algorithm starts. There is no
//! transient error class: the engine does no I/O, so retrying the same call
//! gives the same result. Broken internal invariants are not errors, they
//! panic.

use crate::buffer::ElementType;
use crate::registry::GraphHandle;

use thiserror::Error;

/// Coarse classification of an [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The input violates the contract (shape, type, vertex, algorithm name).
    Validation,
    /// The call does not fit the current state of a [`Solver`](crate::Solver).
    ///
    /// The caller may recover by loading a graph again.
    Lifecycle,
    /// A system resource (the worker threads) could not be acquired.
    Resource,
}

/// The error type of this crate.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The algorithm name is not one of [`Algorithm::names`](crate::Algorithm::names).
    #[error("unknown algorithm '{0}'")]
    UnknownAlgorithm(String),

    /// The matrix is not square or has less than two vertices.
    #[error("invalid matrix shape {rows}x{cols}: must be square with at least 2 vertices")]
    InvalidShape { rows: usize, cols: usize },

    /// A buffer is shorter (or, for coordinate buffers, of different length) than required.
    #[error("invalid buffer length {actual}, expected {expected}")]
    BufferLength { expected: usize, actual: usize },

    /// The element type cannot be used for capacities.
    #[error("unsupported element type {0}: capacities must be integers")]
    UnsupportedType(ElementType),

    /// A matrix entry is negative.
    #[error("negative capacity at ({row}, {col})")]
    NegativeCapacity { row: usize, col: usize },

    /// A coordinate of a sparse entry is outside of `[0, n)`.
    #[error("index of sparse entry {position} is out of range (n = {n})")]
    IndexOutOfRange { position: usize, n: usize },

    /// The sum of all capacities does not fit into 64 bits.
    #[error("sum of capacities exceeds the widest capacity mode")]
    CapacityOverflow,

    /// The source or sink is not a vertex of the graph.
    #[error("invalid vertex {vertex} (must be in 0..{n})")]
    InvalidVertex { vertex: usize, n: usize },

    /// Source and sink are the same vertex.
    #[error("source and sink must be different vertices (both are {0})")]
    SourceEqualsSink(usize),

    /// The number of threads is zero.
    #[error("the number of threads must be at least 1")]
    InvalidThreadCount,

    /// `solve` was called without a loaded graph.
    #[error("no graph loaded, call `load` first")]
    NotLoaded,

    /// `solve` was called with another algorithm than `load`.
    #[error("graph was loaded for algorithm '{loaded}' but '{requested}' was requested")]
    AlgorithmMismatch { loaded: String, requested: String },

    /// The handle does not (or no longer) refer to a graph.
    #[error("stale graph handle {0}")]
    StaleHandle(GraphHandle),

    /// The worker pool of a parallel algorithm could not be built.
    #[error("cannot create worker threads: {0}")]
    ThreadPool(String),
}

impl Error {
    /// Return the class of this error.
    pub fn kind(&self) -> ErrorKind {
        use self::Error::*;
        match self {
            UnknownAlgorithm(_)
            | InvalidShape { .. }
            | BufferLength { .. }
            | UnsupportedType(_)
            | NegativeCapacity { .. }
            | IndexOutOfRange { .. }
            | CapacityOverflow
            | InvalidVertex { .. }
            | SourceEqualsSink(_)
            | InvalidThreadCount => ErrorKind::Validation,
            NotLoaded | AlgorithmMismatch { .. } | StaleHandle(_) => ErrorKind::Lifecycle,
            ThreadPool(_) => ErrorKind::Resource,
        }
    }
}

impl From<rayon::ThreadPoolBuildError> for Error {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        Error::ThreadPool(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::{Error, ErrorKind};

    #[test]
    fn test_kinds() {
        assert_eq!(Error::SourceEqualsSink(3).kind(), ErrorKind::Validation);
        assert_eq!(Error::InvalidShape { rows: 2, cols: 3 }.kind(), ErrorKind::Validation);
        assert_eq!(Error::NotLoaded.kind(), ErrorKind::Lifecycle);
        assert_eq!(
            Error::AlgorithmMismatch {
                loaded: "dinic".into(),
                requested: "edmonds_karp".into()
            }
            .kind(),
            ErrorKind::Lifecycle
        );
        assert_eq!(Error::ThreadPool("boom".into()).kind(), ErrorKind::Resource);
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            Error::InvalidVertex { vertex: 7, n: 5 }.to_string(),
            "invalid vertex 7 (must be in 0..5)"
        );
        assert_eq!(Error::UnknownAlgorithm("foo".into()).to_string(), "unknown algorithm 'foo'");
    }
}
