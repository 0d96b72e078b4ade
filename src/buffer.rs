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

//! Read-only views of caller owned capacity matrices.
//!
//! A [`MatrixView`] borrows the caller's buffers. It is only needed while a
//! graph is loaded: loading copies everything into engine owned storage, so
//! the buffers may be dropped or modified afterwards.
//!
//! # Example
//!
//! ```
//! use rs_maxflow::{MatrixView, ElementType};
//!
//! let values: Vec<i64> = vec![5, 7, 3];
//! let rows: Vec<i32> = vec![0, 0, 1];
//! let cols: Vec<i32> = vec![1, 2, 2];
//! let m = MatrixView::sparse(&values[..], &rows[..], &cols[..], (3, 3));
//!
//! assert_eq!(m.shape(), (3, 3));
//! assert_eq!(m.element_type(), ElementType::I64);
//! assert_eq!(m.num_entries(), 3);
//! ```

use crate::error::{Error, Result};

use std::fmt;

/// The element type of a buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementType {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl ElementType {
    /// Return the width of the type in bits.
    pub fn bits(self) -> u32 {
        use self::ElementType::*;
        match self {
            I8 | U8 => 8,
            I16 | U16 => 16,
            I32 | U32 | F32 => 32,
            I64 | U64 | F64 => 64,
        }
    }

    /// Return `true` if this is an integer type.
    pub fn is_integer(self) -> bool {
        !matches!(self, ElementType::F32 | ElementType::F64)
    }

    /// Return `true` if this is a signed integer type.
    pub fn is_signed(self) -> bool {
        use self::ElementType::*;
        matches!(self, I8 | I16 | I32 | I64)
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::ElementType::*;
        let name = match self {
            I8 => "int8",
            I16 => "int16",
            I32 => "int32",
            I64 => "int64",
            U8 => "uint8",
            U16 => "uint16",
            U32 => "uint32",
            U64 => "uint64",
            F32 => "float32",
            F64 => "float64",
        };
        f.write_str(name)
    }
}

/// A typed read-only slice of matrix values.
#[derive(Clone, Copy, Debug)]
pub enum Buffer<'a> {
    I8(&'a [i8]),
    I16(&'a [i16]),
    I32(&'a [i32]),
    I64(&'a [i64]),
    U8(&'a [u8]),
    U16(&'a [u16]),
    U32(&'a [u32]),
    U64(&'a [u64]),
    F32(&'a [f32]),
    F64(&'a [f64]),
}

/// Value of an integer buffer entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Value {
    /// A non-negative entry.
    Capacity(u64),
    /// A negative entry.
    Negative,
    /// The buffer does not contain integers.
    NotInteger,
}

macro_rules! signed_value {
    ($x:expr) => {{
        let x = $x;
        if x < 0 {
            Value::Negative
        } else {
            Value::Capacity(x as u64)
        }
    }};
}

impl<'a> Buffer<'a> {
    /// Return the element type of the buffer.
    pub fn element_type(&self) -> ElementType {
        match self {
            Buffer::I8(_) => ElementType::I8,
            Buffer::I16(_) => ElementType::I16,
            Buffer::I32(_) => ElementType::I32,
            Buffer::I64(_) => ElementType::I64,
            Buffer::U8(_) => ElementType::U8,
            Buffer::U16(_) => ElementType::U16,
            Buffer::U32(_) => ElementType::U32,
            Buffer::U64(_) => ElementType::U64,
            Buffer::F32(_) => ElementType::F32,
            Buffer::F64(_) => ElementType::F64,
        }
    }

    /// Return the number of elements.
    pub fn len(&self) -> usize {
        match self {
            Buffer::I8(s) => s.len(),
            Buffer::I16(s) => s.len(),
            Buffer::I32(s) => s.len(),
            Buffer::I64(s) => s.len(),
            Buffer::U8(s) => s.len(),
            Buffer::U16(s) => s.len(),
            Buffer::U32(s) => s.len(),
            Buffer::U64(s) => s.len(),
            Buffer::F32(s) => s.len(),
            Buffer::F64(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the value at position `i`.
    pub(crate) fn value(&self, i: usize) -> Value {
        match self {
            Buffer::I8(s) => signed_value!(s[i]),
            Buffer::I16(s) => signed_value!(s[i]),
            Buffer::I32(s) => signed_value!(s[i]),
            Buffer::I64(s) => signed_value!(s[i]),
            Buffer::U8(s) => Value::Capacity(u64::from(s[i])),
            Buffer::U16(s) => Value::Capacity(u64::from(s[i])),
            Buffer::U32(s) => Value::Capacity(u64::from(s[i])),
            Buffer::U64(s) => Value::Capacity(s[i]),
            Buffer::F32(_) | Buffer::F64(_) => Value::NotInteger,
        }
    }
}

macro_rules! buffer_from {
    ($t:ty, $variant:ident) => {
        impl<'a> From<&'a [$t]> for Buffer<'a> {
            fn from(s: &'a [$t]) -> Self {
                Buffer::$variant(s)
            }
        }

        impl<'a> From<&'a Vec<$t>> for Buffer<'a> {
            fn from(s: &'a Vec<$t>) -> Self {
                Buffer::$variant(&s[..])
            }
        }
    };
}

buffer_from!(i8, I8);
buffer_from!(i16, I16);
buffer_from!(i32, I32);
buffer_from!(i64, I64);
buffer_from!(u8, U8);
buffer_from!(u16, U16);
buffer_from!(u32, U32);
buffer_from!(u64, U64);
buffer_from!(f32, F32);
buffer_from!(f64, F64);

/// A typed read-only slice of row or column indices of a sparse matrix.
#[derive(Clone, Copy, Debug)]
pub enum Indices<'a> {
    I32(&'a [i32]),
    I64(&'a [i64]),
    U32(&'a [u32]),
    U64(&'a [u64]),
    Usize(&'a [usize]),
}

impl<'a> Indices<'a> {
    pub fn len(&self) -> usize {
        match self {
            Indices::I32(s) => s.len(),
            Indices::I64(s) => s.len(),
            Indices::U32(s) => s.len(),
            Indices::U64(s) => s.len(),
            Indices::Usize(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the index at position `i` if it is in `0..n`.
    pub(crate) fn get(&self, i: usize, n: usize) -> Option<usize> {
        let idx = match self {
            Indices::I32(s) => usize::try_from(s[i]).ok(),
            Indices::I64(s) => usize::try_from(s[i]).ok(),
            Indices::U32(s) => usize::try_from(s[i]).ok(),
            Indices::U64(s) => usize::try_from(s[i]).ok(),
            Indices::Usize(s) => Some(s[i]),
        };
        idx.filter(|&j| j < n)
    }
}

macro_rules! indices_from {
    ($t:ty, $variant:ident) => {
        impl<'a> From<&'a [$t]> for Indices<'a> {
            fn from(s: &'a [$t]) -> Self {
                Indices::$variant(s)
            }
        }

        impl<'a> From<&'a Vec<$t>> for Indices<'a> {
            fn from(s: &'a Vec<$t>) -> Self {
                Indices::$variant(&s[..])
            }
        }
    };
}

indices_from!(i32, I32);
indices_from!(i64, I64);
indices_from!(u32, U32);
indices_from!(u64, U64);
indices_from!(usize, Usize);

/// A read-only view of a capacity matrix.
#[derive(Clone, Copy, Debug)]
pub enum MatrixView<'a> {
    /// A row-major dense matrix.
    ///
    /// Entry `(i, j)` is stored at position `i * row_stride + j`.
    Dense {
        values: Buffer<'a>,
        rows: usize,
        cols: usize,
        row_stride: usize,
    },
    /// A sparse matrix in coordinate form.
    ///
    /// Entry `k` is the value `values[k]` at `(rows[k], cols[k])`.
    Sparse {
        values: Buffer<'a>,
        rows: Indices<'a>,
        cols: Indices<'a>,
        shape: (usize, usize),
    },
}

/// Statistics gathered in a validation pass over a matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Summary {
    /// The sum of all entries.
    pub total: u128,
    /// The number of non-zero entries.
    pub nonzeros: usize,
}

impl<'a> MatrixView<'a> {
    /// Create a view of a contiguous row-major dense matrix.
    pub fn dense<B: Into<Buffer<'a>>>(values: B, rows: usize, cols: usize) -> Self {
        MatrixView::Dense {
            values: values.into(),
            rows,
            cols,
            row_stride: cols,
        }
    }

    /// Create a view of a sparse matrix in coordinate form.
    pub fn sparse<B, R, C>(values: B, rows: R, cols: C, shape: (usize, usize)) -> Self
    where
        B: Into<Buffer<'a>>,
        R: Into<Indices<'a>>,
        C: Into<Indices<'a>>,
    {
        MatrixView::Sparse {
            values: values.into(),
            rows: rows.into(),
            cols: cols.into(),
            shape,
        }
    }

    /// Set the distance between two consecutive rows of a dense matrix.
    ///
    /// This has no effect on sparse matrices.
    pub fn with_row_stride(self, stride: usize) -> Self {
        match self {
            MatrixView::Dense { values, rows, cols, .. } => MatrixView::Dense {
                values,
                rows,
                cols,
                row_stride: stride,
            },
            m => m,
        }
    }

    /// Return the shape `(rows, cols)` of the matrix.
    pub fn shape(&self) -> (usize, usize) {
        match self {
            MatrixView::Dense { rows, cols, .. } => (*rows, *cols),
            MatrixView::Sparse { shape, .. } => *shape,
        }
    }

    /// Return the element type of the values.
    pub fn element_type(&self) -> ElementType {
        self.values().element_type()
    }

    /// Return `true` if this is a sparse matrix.
    pub fn is_sparse(&self) -> bool {
        matches!(self, MatrixView::Sparse { .. })
    }

    /// Return the number of stored entries.
    ///
    /// For dense matrices this is `rows * cols`.
    pub fn num_entries(&self) -> usize {
        match self {
            MatrixView::Dense { rows, cols, .. } => rows * cols,
            MatrixView::Sparse { values, .. } => values.len(),
        }
    }

    fn values(&self) -> &Buffer<'a> {
        match self {
            MatrixView::Dense { values, .. } | MatrixView::Sparse { values, .. } => values,
        }
    }

    /// Check that the matrix is square with at least two vertices and
    /// return the number of vertices.
    pub(crate) fn check_shape(&self) -> Result<usize> {
        let (rows, cols) = self.shape();
        if rows != cols || rows < 2 {
            return Err(Error::InvalidShape { rows, cols });
        }
        if !self.element_type().is_integer() {
            return Err(Error::UnsupportedType(self.element_type()));
        }
        match self {
            MatrixView::Dense {
                values, row_stride, ..
            } => {
                if *row_stride < cols {
                    return Err(Error::BufferLength {
                        expected: cols,
                        actual: *row_stride,
                    });
                }
                let expected = (rows - 1)
                    .checked_mul(*row_stride)
                    .and_then(|len| len.checked_add(cols))
                    .ok_or(Error::InvalidShape { rows, cols })?;
                if values.len() < expected {
                    return Err(Error::BufferLength {
                        expected,
                        actual: values.len(),
                    });
                }
            }
            MatrixView::Sparse {
                values,
                rows: row_idx,
                cols: col_idx,
                ..
            } => {
                for len in [row_idx.len(), col_idx.len()] {
                    if len != values.len() {
                        return Err(Error::BufferLength {
                            expected: values.len(),
                            actual: len,
                        });
                    }
                }
            }
        }
        Ok(rows)
    }

    /// Call `f(row, col, capacity)` for each stored entry.
    ///
    /// Fails on the first invalid entry. Zero entries are passed, too (the
    /// caller decides what to do with them). The shape must have been
    /// checked before.
    pub(crate) fn for_each_entry<F>(&self, mut f: F) -> Result<()>
    where
        F: FnMut(usize, usize, u64),
    {
        match self {
            MatrixView::Dense {
                values,
                rows,
                cols,
                row_stride,
            } => {
                for i in 0..*rows {
                    let offset = i * row_stride;
                    for j in 0..*cols {
                        match values.value(offset + j) {
                            Value::Capacity(c) => f(i, j, c),
                            Value::Negative => return Err(Error::NegativeCapacity { row: i, col: j }),
                            Value::NotInteger => return Err(Error::UnsupportedType(values.element_type())),
                        }
                    }
                }
            }
            MatrixView::Sparse {
                values,
                rows,
                cols,
                shape,
            } => {
                let n = shape.0;
                for k in 0..values.len() {
                    let (i, j) = match (rows.get(k, n), cols.get(k, n)) {
                        (Some(i), Some(j)) => (i, j),
                        _ => return Err(Error::IndexOutOfRange { position: k, n }),
                    };
                    match values.value(k) {
                        Value::Capacity(c) => f(i, j, c),
                        Value::Negative => return Err(Error::NegativeCapacity { row: i, col: j }),
                        Value::NotInteger => return Err(Error::UnsupportedType(values.element_type())),
                    }
                }
            }
        }
        Ok(())
    }

    /// Validate all entries and compute the sum of all off-diagonal capacities.
    pub(crate) fn summarize(&self) -> Result<Summary> {
        let mut summary = Summary {
            total: 0,
            nonzeros: 0,
        };
        self.for_each_entry(|i, j, c| {
            if c != 0 && i != j {
                summary.total += u128::from(c);
                summary.nonzeros += 1;
            }
        })?;
        Ok(summary)
    }
}
