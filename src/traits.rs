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

//! Traits for the numeric widths and the graph representations.
//!
//! There are two numeric parameters to all data structures:
//!
//! 1. `I: Index`: the type used to store vertex numbers and arc positions.
//! 2. `C: Capacity`: the type used to store capacities, residual capacities
//!    and excesses.
//!
//! Both are implemented for `u32` (narrow) and `u64` (wide), one
//! combination per [`CapacityMode`](crate::CapacityMode).

use crate::num::traits::{NumAssign, PrimInt, Unsigned};

use std::fmt::{Debug, Display};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

/// An unsigned integer type used to store vertex and arc indices.
pub trait Index: PrimInt + Unsigned + Debug + Display + Send + Sync + 'static {
    /// Convert a `usize` index.
    ///
    /// The caller guarantees that the value fits (this is ensured by the
    /// capacity mode the graph was loaded with).
    fn from_index(i: usize) -> Self;

    /// Return the index as `usize`.
    fn index(self) -> usize;
}

/// An unsigned integer type used to store capacities.
///
/// Besides the plain arithmetic the type knows its atomic counterpart, which
/// is used by the parallel algorithms.
pub trait Capacity: PrimInt + Unsigned + NumAssign + Debug + Display + Send + Sync + 'static {
    /// The atomic version of this type.
    type Atomic: Send + Sync;

    /// Convert a flow value known to fit.
    fn from_flow(v: u64) -> Self;

    /// Return the value as flow value.
    fn to_flow(self) -> u64;

    /// Return the value widened to `u128`.
    fn widen(self) -> u128;

    /// Convert a `u128`, saturating at `Self::max_value()`.
    fn narrow_saturating(v: u128) -> Self;

    fn new_atomic(v: Self) -> Self::Atomic;

    fn load(a: &Self::Atomic, order: Ordering) -> Self;

    fn store(a: &Self::Atomic, v: Self, order: Ordering);

    fn fetch_add(a: &Self::Atomic, v: Self, order: Ordering) -> Self;

    fn fetch_sub(a: &Self::Atomic, v: Self, order: Ordering) -> Self;

    /// Atomically replace the value by `f(value)` if `f` returns `Some`.
    ///
    /// Returns the previous value, `Err` if `f` returned `None`.
    fn fetch_update<F>(a: &Self::Atomic, f: F) -> Result<Self, Self>
    where
        F: FnMut(Self) -> Option<Self>;

    fn into_inner(a: Self::Atomic) -> Self;
}

macro_rules! impl_index {
    ($t:ty) => {
        impl Index for $t {
            #[inline(always)]
            fn from_index(i: usize) -> Self {
                debug_assert!(i <= <$t>::max_value() as usize);
                i as $t
            }

            #[inline(always)]
            fn index(self) -> usize {
                self as usize
            }
        }
    };
}

impl_index!(u32);
impl_index!(u64);

macro_rules! impl_capacity {
    ($t:ty, $atomic:ty) => {
        impl Capacity for $t {
            type Atomic = $atomic;

            #[inline(always)]
            fn from_flow(v: u64) -> Self {
                debug_assert!(v <= <$t>::max_value() as u64);
                v as $t
            }

            #[inline(always)]
            fn to_flow(self) -> u64 {
                self as u64
            }

            #[inline(always)]
            fn widen(self) -> u128 {
                self as u128
            }

            #[inline(always)]
            fn narrow_saturating(v: u128) -> Self {
                if v > <$t>::max_value() as u128 {
                    <$t>::max_value()
                } else {
                    v as $t
                }
            }

            #[inline(always)]
            fn new_atomic(v: Self) -> Self::Atomic {
                <$atomic>::new(v)
            }

            #[inline(always)]
            fn load(a: &Self::Atomic, order: Ordering) -> Self {
                a.load(order)
            }

            #[inline(always)]
            fn store(a: &Self::Atomic, v: Self, order: Ordering) {
                a.store(v, order)
            }

            #[inline(always)]
            fn fetch_add(a: &Self::Atomic, v: Self, order: Ordering) -> Self {
                a.fetch_add(v, order)
            }

            #[inline(always)]
            fn fetch_sub(a: &Self::Atomic, v: Self, order: Ordering) -> Self {
                a.fetch_sub(v, order)
            }

            #[inline(always)]
            fn fetch_update<F>(a: &Self::Atomic, f: F) -> Result<Self, Self>
            where
                F: FnMut(Self) -> Option<Self>,
            {
                a.fetch_update(Ordering::AcqRel, Ordering::Acquire, f)
            }

            #[inline(always)]
            fn into_inner(a: Self::Atomic) -> Self {
                a.into_inner()
            }
        }
    };
}

impl_capacity!(u32, AtomicU32);
impl_capacity!(u64, AtomicU64);

/// Read access to a capacitated digraph.
///
/// This is the common interface of the dense and the sparse representation.
/// Vertices are the numbers `0..num_vertices()`. An arc exists iff its
/// capacity is non-zero.
pub trait Network<C> {
    /// Type of an iterator over the arcs leaving a vertex.
    type OutArcs<'a>: Iterator<Item = (usize, C)>
    where
        Self: 'a;

    /// Return the number of vertices.
    fn num_vertices(&self) -> usize;

    /// Return the number of arcs (i.e. non-zero entries).
    fn num_arcs(&self) -> usize;

    /// Return an iterator over the arcs leaving `u`.
    ///
    /// The iterator returns pairs `(v, c)` of the head and the (non-zero)
    /// capacity of the arc, the heads in increasing order.
    fn out_arcs(&self, u: usize) -> Self::OutArcs<'_>;

    /// Return the capacity of the arc `(u, v)`, zero if there is no such arc.
    fn capacity(&self, u: usize, v: usize) -> C;
}

#[cfg(test)]
mod tests {
    use super::Capacity;
    use std::sync::atomic::Ordering;

    #[test]
    fn test_narrow_saturating() {
        assert_eq!(<u32 as Capacity>::narrow_saturating(5), 5);
        assert_eq!(<u32 as Capacity>::narrow_saturating(1 << 40), u32::max_value());
        assert_eq!(<u64 as Capacity>::narrow_saturating(1 << 40), 1 << 40);
        assert_eq!(<u64 as Capacity>::narrow_saturating(u128::max_value()), u64::max_value());
    }

    #[test]
    fn test_atomic_update() {
        let a = <u32 as Capacity>::new_atomic(7);
        assert_eq!(<u32 as Capacity>::fetch_add(&a, 3, Ordering::Relaxed), 7);
        assert_eq!(<u32 as Capacity>::fetch_update(&a, |x| if x < 10 { Some(x + 1) } else { None }), Err(10));
        assert_eq!(<u32 as Capacity>::fetch_update(&a, |x| Some(x - 4)), Ok(10));
        assert_eq!(<u32 as Capacity>::into_inner(a), 6);
    }
}
