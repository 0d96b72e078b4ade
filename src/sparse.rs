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

//! A sparse capacity matrix in compressed row format.

use crate::buffer::MatrixView;
use crate::error::Result;
use crate::traits::{Capacity, Index, Network};

use std::iter::Zip;
use std::slice::Iter as SliceIter;

/// A sparse capacity matrix.
///
/// The entries of row `u` are stored at positions `offsets[u]..offsets[u+1]`
/// of `cols` and `values`, sorted by column. There are no zero entries, no
/// diagonal entries and no duplicate columns within a row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SparseMatrix<I, C> {
    offsets: Vec<usize>,
    cols: Vec<I>,
    values: Vec<C>,
}

/// Iterator over the arcs leaving a vertex of a sparse matrix.
pub struct OutArcs<'a, I, C> {
    it: Zip<SliceIter<'a, I>, SliceIter<'a, C>>,
}

impl<'a, I, C> Iterator for OutArcs<'a, I, C>
where
    I: Index,
    C: Capacity,
{
    type Item = (usize, C);

    fn next(&mut self) -> Option<(usize, C)> {
        self.it.next().map(|(&v, &c)| (v.index(), c))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<I, C> SparseMatrix<I, C>
where
    I: Index,
    C: Capacity,
{
    /// Create a sparse matrix with `n` vertices from coordinate triplets `(row, col, capacity)`.
    ///
    /// The triplets may come in any order. Duplicate coordinates are summed
    /// up, zero entries and diagonal entries are dropped.
    ///
    /// # Panics
    ///
    /// Panics if a row or column is not in `0..n`.
    pub fn from_triplets<T>(n: usize, triplets: T) -> Self
    where
        T: IntoIterator<Item = (usize, usize, C)>,
    {
        let mut entries: Vec<(usize, usize, C)> = triplets
            .into_iter()
            .filter(|&(u, v, c)| {
                assert!(u < n && v < n, "entry ({}, {}) out of range (n = {})", u, v, n);
                u != v && !c.is_zero()
            })
            .collect();
        entries.sort_unstable_by_key(|&(u, v, _)| (u, v));

        let mut offsets = vec![0; n + 1];
        let mut cols = Vec::with_capacity(entries.len());
        let mut values: Vec<C> = Vec::with_capacity(entries.len());
        let mut last = None;
        for (u, v, c) in entries {
            if last == Some((u, v)) {
                if let Some(x) = values.last_mut() {
                    *x += c;
                }
                continue;
            }
            last = Some((u, v));
            offsets[u + 1] += 1;
            cols.push(I::from_index(v));
            values.push(c);
        }
        for u in 0..n {
            offsets[u + 1] += offsets[u];
        }

        SparseMatrix { offsets, cols, values }
    }

    /// Copy the entries of a dense or sparse view.
    ///
    /// The view must have been validated and all capacities must fit into `C`.
    pub(crate) fn from_view(view: &MatrixView, n: usize) -> Result<Self> {
        let mut triplets = Vec::with_capacity(view.num_entries().min(n.saturating_mul(n)));
        view.for_each_entry(|i, j, c| {
            if c != 0 {
                triplets.push((i, j, C::from_flow(c)))
            }
        })?;
        Ok(SparseMatrix::from_triplets(n, triplets))
    }

    /// Return the row offsets (`n + 1` elements).
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Return the column of each entry.
    pub fn cols(&self) -> &[I] {
        &self.cols
    }

    /// Return the value of each entry.
    pub fn values(&self) -> &[C] {
        &self.values
    }
}

impl<I, C> Network<C> for SparseMatrix<I, C>
where
    I: Index,
    C: Capacity,
{
    type OutArcs<'a> = OutArcs<'a, I, C>
    where
        Self: 'a;

    fn num_vertices(&self) -> usize {
        self.offsets.len() - 1
    }

    fn num_arcs(&self) -> usize {
        self.values.len()
    }

    fn out_arcs(&self, u: usize) -> OutArcs<'_, I, C> {
        let range = self.offsets[u]..self.offsets[u + 1];
        OutArcs {
            it: self.cols[range.clone()].iter().zip(self.values[range].iter()),
        }
    }

    fn capacity(&self, u: usize, v: usize) -> C {
        let range = self.offsets[u]..self.offsets[u + 1];
        match self.cols[range.clone()].binary_search(&I::from_index(v)) {
            Ok(k) => self.values[range.start + k],
            Err(_) => C::zero(),
        }
    }
}
