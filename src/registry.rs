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

//! Storage of loaded graphs behind generation-checked handles.
//!
//! A [`GraphRegistry`] owns the loaded graphs. Callers refer to them by a
//! [`GraphHandle`], a pair of slot number and generation. Slots are
//! reused after a graph has been removed, but with a new generation, so an
//! old handle never refers to a newer graph.
//!
//! # Example
//!
//! ```
//! use rs_maxflow::{Algorithm, Error, GraphRegistry, MatrixView, Options};
//!
//! let caps: Vec<u32> = vec![0, 7, 0, 0];
//! let registry = GraphRegistry::new();
//! let h = registry.load(&MatrixView::dense(&caps, 2, 2)).unwrap();
//!
//! // the graph can be solved repeatedly
//! for _ in 0..2 {
//!     assert_eq!(registry.max_flow(h, Algorithm::Dinic, 0, 1, &Options::default()), Ok(7));
//! }
//!
//! assert_eq!(registry.remove(h), 1);
//! assert_eq!(registry.remove(h), 0);
//! assert_eq!(registry.get(h).unwrap_err(), Error::StaleHandle(h));
//! ```

use crate::buffer::MatrixView;
use crate::error::{Error, Result};
use crate::graph::LoadedGraph;
use crate::maxflow::Algorithm;
use crate::options::Options;

use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use tracing::trace;

/// A reference to a graph stored in a [`GraphRegistry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GraphHandle {
    slot: usize,
    generation: u64,
}

impl GraphHandle {
    /// Return the slot number.
    pub fn slot(self) -> usize {
        self.slot
    }

    /// Return the generation of the slot this handle was created for.
    pub fn generation(self) -> u64 {
        self.generation
    }
}

impl fmt::Display for GraphHandle {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "#{}.{}", self.slot, self.generation)
    }
}

struct Slot {
    generation: u64,
    graph: Option<Arc<LoadedGraph>>,
}

#[derive(Default)]
struct Slots {
    slots: Vec<Slot>,
    /// Unoccupied slots.
    free: Vec<usize>,
    /// Number of occupied slots.
    len: usize,
}

impl Slots {
    fn remove(&mut self, h: GraphHandle) -> Option<Arc<LoadedGraph>> {
        let slot = self.slots.get_mut(h.slot).filter(|s| s.generation == h.generation)?;
        let graph = slot.graph.take()?;
        slot.generation += 1;
        self.free.push(h.slot);
        self.len -= 1;
        Some(graph)
    }
}

/// Owner of all loaded graphs.
///
/// All operations may be called concurrently from different threads. The
/// lock is not held while an algorithm runs.
#[derive(Default)]
pub struct GraphRegistry {
    inner: Mutex<Slots>,
}

impl GraphRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        GraphRegistry::default()
    }

    /// Return the process-wide registry.
    pub fn global() -> &'static GraphRegistry {
        static GLOBAL: OnceLock<GraphRegistry> = OnceLock::new();
        GLOBAL.get_or_init(GraphRegistry::new)
    }

    /// Validate and copy a matrix and store it.
    pub fn load(&self, view: &MatrixView) -> Result<GraphHandle> {
        Ok(self.insert(LoadedGraph::from_view(view)?))
    }

    /// Store a loaded graph and return a fresh handle for it.
    pub fn insert(&self, graph: LoadedGraph) -> GraphHandle {
        let graph = Some(Arc::new(graph));
        let mut inner = self.inner.lock();
        inner.len += 1;
        let slot = match inner.free.pop() {
            Some(slot) => {
                inner.slots[slot].graph = graph;
                slot
            }
            None => {
                inner.slots.push(Slot { generation: 0, graph });
                inner.slots.len() - 1
            }
        };
        let h = GraphHandle {
            slot,
            generation: inner.slots[slot].generation,
        };
        trace!(handle = %h, "graph registered");
        h
    }

    /// Return the graph referred to by `h`.
    pub fn get(&self, h: GraphHandle) -> Result<Arc<LoadedGraph>> {
        self.inner
            .lock()
            .slots
            .get(h.slot)
            .filter(|s| s.generation == h.generation)
            .and_then(|s| s.graph.clone())
            .ok_or(Error::StaleHandle(h))
    }

    /// Remove the graph referred to by `h` and return it.
    ///
    /// The handle becomes stale but the graph stays usable through the
    /// returned reference.
    pub fn take(&self, h: GraphHandle) -> Result<Arc<LoadedGraph>> {
        self.inner.lock().remove(h).ok_or(Error::StaleHandle(h))
    }

    /// Remove the graph referred to by `h`.
    ///
    /// Returns the number of removed graphs, i.e. 0 if `h` is stale.
    pub fn remove(&self, h: GraphHandle) -> usize {
        let removed = self.inner.lock().remove(h).is_some() as usize;
        trace!(handle = %h, removed, "graph released");
        removed
    }

    /// Return the number of stored graphs.
    pub fn len(&self) -> usize {
        self.inner.lock().len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Compute the maximum flow value on a stored graph.
    ///
    /// The graph stays in the registry.
    pub fn max_flow(&self, h: GraphHandle, alg: Algorithm, src: usize, snk: usize, opts: &Options) -> Result<u64> {
        self.get(h)?.max_flow(alg, src, snk, opts)
    }
}

#[cfg(test)]
mod tests {
    use super::GraphRegistry;
    use crate::{Algorithm, Error, MatrixView, Options};

    fn caps() -> Vec<u8> {
        vec![0, 1, 0, 0]
    }

    #[test]
    fn test_generations() {
        let caps = caps();
        let r = GraphRegistry::new();
        assert!(r.is_empty());

        let a = r.load(&MatrixView::dense(&caps, 2, 2)).unwrap();
        let b = r.load(&MatrixView::dense(&caps, 2, 2)).unwrap();
        assert_ne!(a, b);
        assert_eq!(r.len(), 2);

        assert_eq!(r.remove(a), 1);
        let c = r.load(&MatrixView::dense(&caps, 2, 2)).unwrap();
        // the slot is reused with a new generation
        assert_eq!(c.slot(), a.slot());
        assert_ne!(c.generation(), a.generation());
        assert_eq!(r.get(a).unwrap_err(), Error::StaleHandle(a));
        assert_eq!(r.remove(a), 0);
        assert_eq!(r.len(), 2);

        let g = r.take(b).unwrap();
        assert!(r.take(b).is_err());
        assert_eq!(r.len(), 1);
        // the taken graph outlives its handle
        assert_eq!(g.num_vertices(), 2);
        assert_eq!(g.max_flow(Algorithm::Dinic, 0, 1, &Options::default()), Ok(1));
    }

    #[test]
    fn test_concurrent() {
        let caps = caps();
        let r = GraphRegistry::new();
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..50 {
                        let h = r.load(&MatrixView::dense(&caps, 2, 2)).unwrap();
                        assert!(r.get(h).is_ok());
                        assert_eq!(r.remove(h), 1);
                    }
                });
            }
        });
        assert!(r.is_empty());
    }

    #[test]
    fn test_display() {
        let caps = caps();
        let r = GraphRegistry::new();
        let h = r.load(&MatrixView::dense(&caps, 2, 2)).unwrap();
        assert_eq!(h.to_string(), "#0.0");
    }
}
