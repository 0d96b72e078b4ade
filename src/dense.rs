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

//! A dense capacity matrix.

use crate::buffer::MatrixView;
use crate::error::Result;
use crate::traits::{Capacity, Network};

use std::iter::Enumerate;
use std::slice::Iter as SliceIter;

/// A full `n × n` capacity matrix.
///
/// The arc `(u, v)` exists iff the entry `(u, v)` is non-zero. Diagonal
/// entries are always zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DenseMatrix<C> {
    n: usize,
    num_arcs: usize,
    data: Vec<C>,
}

/// Iterator over the arcs leaving a vertex of a dense matrix.
pub struct OutArcs<'a, C> {
    it: Enumerate<SliceIter<'a, C>>,
}

impl<'a, C> Iterator for OutArcs<'a, C>
where
    C: Capacity,
{
    type Item = (usize, C);

    fn next(&mut self) -> Option<(usize, C)> {
        self.it.find(|(_, c)| !c.is_zero()).map(|(v, &c)| (v, c))
    }
}

impl<C> DenseMatrix<C>
where
    C: Capacity,
{
    /// Create a matrix with `n` vertices from a row-major vector of `n * n` entries.
    ///
    /// # Panics
    ///
    /// Panics if the length of `data` is not `n * n`.
    pub fn new(n: usize, mut data: Vec<C>) -> Self {
        assert_eq!(data.len(), n * n, "dense matrix must have n*n entries");
        for u in 0..n {
            data[u * n + u] = C::zero();
        }
        let num_arcs = data.iter().filter(|c| !c.is_zero()).count();
        DenseMatrix { n, num_arcs, data }
    }

    /// Copy the entries of a dense or sparse view.
    ///
    /// The view must have been validated and all capacities must fit into `C`.
    pub(crate) fn from_view(view: &MatrixView, n: usize) -> Result<Self> {
        let mut data = vec![C::zero(); n * n];
        view.for_each_entry(|i, j, c| {
            if i != j {
                data[i * n + j] += C::from_flow(c);
            }
        })?;
        Ok(DenseMatrix::new(n, data))
    }

    /// Return the row of vertex `u`.
    pub fn row(&self, u: usize) -> &[C] {
        &self.data[u * self.n..(u + 1) * self.n]
    }
}

impl<C> Network<C> for DenseMatrix<C>
where
    C: Capacity,
{
    type OutArcs<'a> = OutArcs<'a, C>
    where
        Self: 'a;

    fn num_vertices(&self) -> usize {
        self.n
    }

    fn num_arcs(&self) -> usize {
        self.num_arcs
    }

    fn out_arcs(&self, u: usize) -> OutArcs<'_, C> {
        OutArcs {
            it: self.row(u).iter().enumerate(),
        }
    }

    fn capacity(&self, u: usize, v: usize) -> C {
        self.data[u * self.n + v]
    }
}
