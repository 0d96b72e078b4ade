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

//! Selection of the internal index and capacity width.
//!
//! The mode is selected from the number of vertices `n` and the element type
//! of the matrix:
//!
//! | `n`             | element type       | mode                          | index | capacity |
//! |-----------------|--------------------|-------------------------------|-------|----------|
//! | `<= u32::MAX`   | `< 64` bits        | `NarrowIndexNarrowCapacity`   | `u32` | `u32`    |
//! | `<= u32::MAX`   | `64` bits          | `NarrowIndexWideCapacity`     | `u32` | `u64`    |
//! | `>  u32::MAX`   | `< 64` bits        | `WideIndexNarrowCapacity`     | `u64` | `u32`    |
//! | `>  u32::MAX`   | `64` bits          | `WideIndexWideCapacity`       | `u64` | `u64`    |
//!
//! Each residual capacity, excess and flow value is bounded by the sum `T`
//! of all capacities. When a graph is loaded, [`CapacityMode::fit`] widens
//! the capacity to `u64` if `T > u32::MAX`, and the index to `u64` if the
//! residual arc arena (two arcs per matrix entry) has more than `u32::MAX`
//! elements. A graph with `T > u64::MAX` is rejected.

use crate::buffer::ElementType;
use crate::error::{Error, Result};

#[cfg(feature = "serialize")]
use serde_derive::{Deserialize, Serialize};

/// The four combinations of index and capacity width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum CapacityMode {
    NarrowIndexNarrowCapacity = 1,
    NarrowIndexWideCapacity = 2,
    WideIndexNarrowCapacity = 3,
    WideIndexWideCapacity = 4,
}

impl CapacityMode {
    /// Select the mode for a graph with `n` vertices and capacities of type `ty`.
    ///
    /// # Example
    ///
    /// ```
    /// use rs_maxflow::{CapacityMode, ElementType};
    ///
    /// assert_eq!(CapacityMode::select(5, ElementType::U32).unwrap(), CapacityMode::NarrowIndexNarrowCapacity);
    /// assert_eq!(CapacityMode::select(5, ElementType::U64).unwrap(), CapacityMode::NarrowIndexWideCapacity);
    /// assert!(CapacityMode::select(1, ElementType::U32).is_err());
    /// assert!(CapacityMode::select(5, ElementType::F32).is_err());
    /// ```
    pub fn select(n: usize, ty: ElementType) -> Result<CapacityMode> {
        if n < 2 {
            return Err(Error::InvalidShape { rows: n, cols: n });
        }
        if !ty.is_integer() {
            return Err(Error::UnsupportedType(ty));
        }
        Ok(CapacityMode::from_widths(
            n as u128 > u128::from(u32::max_value()),
            ty.bits() >= 64,
        ))
    }

    fn from_widths(wide_index: bool, wide_capacity: bool) -> CapacityMode {
        match (wide_index, wide_capacity) {
            (false, false) => CapacityMode::NarrowIndexNarrowCapacity,
            (false, true) => CapacityMode::NarrowIndexWideCapacity,
            (true, false) => CapacityMode::WideIndexNarrowCapacity,
            (true, true) => CapacityMode::WideIndexWideCapacity,
        }
    }

    /// Widen the mode so that a graph with total capacity `total` and `entries`
    /// non-zero matrix entries can be stored without overflow.
    ///
    /// # Example
    ///
    /// ```
    /// use rs_maxflow::{CapacityMode, Error};
    ///
    /// let mode = CapacityMode::NarrowIndexNarrowCapacity;
    /// assert_eq!(mode.fit(1000, 10), Ok(mode));
    /// assert_eq!(mode.fit(1 << 33, 10), Ok(CapacityMode::NarrowIndexWideCapacity));
    /// assert_eq!(mode.fit(1 << 65, 10), Err(Error::CapacityOverflow));
    /// ```
    pub fn fit(self, total: u128, entries: usize) -> Result<CapacityMode> {
        if total > u128::from(u64::max_value()) {
            return Err(Error::CapacityOverflow);
        }
        let wide_capacity = self.has_wide_capacity() || total > u128::from(u32::max_value());
        let wide_index = self.has_wide_index() || 2 * entries as u128 > u128::from(u32::max_value());
        Ok(CapacityMode::from_widths(wide_index, wide_capacity))
    }

    /// Return `true` if vertex and arc indices are stored in 64 bits.
    pub fn has_wide_index(self) -> bool {
        matches!(
            self,
            CapacityMode::WideIndexNarrowCapacity | CapacityMode::WideIndexWideCapacity
        )
    }

    /// Return `true` if capacities are stored in 64 bits.
    pub fn has_wide_capacity(self) -> bool {
        matches!(
            self,
            CapacityMode::NarrowIndexWideCapacity | CapacityMode::WideIndexWideCapacity
        )
    }

    /// Return the numeric tag of the mode (`1..=4`).
    pub fn code(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::CapacityMode::*;
    use super::*;

    #[test]
    fn test_table() {
        for ty in [ElementType::I8, ElementType::U16, ElementType::I32, ElementType::U32] {
            assert_eq!(CapacityMode::select(5, ty), Ok(NarrowIndexNarrowCapacity), "{}", ty);
        }
        for ty in [ElementType::I64, ElementType::U64] {
            assert_eq!(CapacityMode::select(5, ty), Ok(NarrowIndexWideCapacity), "{}", ty);
        }
        if usize::max_value() as u128 > u128::from(u32::max_value()) {
            let n = u32::max_value() as usize + 1;
            assert_eq!(CapacityMode::select(n, ElementType::U8), Ok(WideIndexNarrowCapacity));
            assert_eq!(CapacityMode::select(n, ElementType::I64), Ok(WideIndexWideCapacity));
        }
        assert_eq!(CapacityMode::select(u32::max_value() as usize, ElementType::U32), Ok(NarrowIndexNarrowCapacity));
    }

    #[test]
    fn test_rejects() {
        assert_eq!(
            CapacityMode::select(1, ElementType::U32),
            Err(Error::InvalidShape { rows: 1, cols: 1 })
        );
        assert_eq!(
            CapacityMode::select(3, ElementType::F64),
            Err(Error::UnsupportedType(ElementType::F64))
        );
    }

    #[test]
    fn test_fit() {
        let max32 = u128::from(u32::max_value());
        assert_eq!(NarrowIndexNarrowCapacity.fit(max32, 4), Ok(NarrowIndexNarrowCapacity));
        assert_eq!(NarrowIndexNarrowCapacity.fit(max32 + 1, 4), Ok(NarrowIndexWideCapacity));
        assert_eq!(NarrowIndexWideCapacity.fit(0, 4), Ok(NarrowIndexWideCapacity));
        assert_eq!(
            NarrowIndexNarrowCapacity.fit(10, (1 << 31) + 1),
            Ok(WideIndexNarrowCapacity)
        );
        assert_eq!(
            WideIndexWideCapacity.fit(u128::from(u64::max_value()), 4),
            Ok(WideIndexWideCapacity)
        );
        assert_eq!(
            WideIndexWideCapacity.fit(u128::from(u64::max_value()) + 1, 4),
            Err(Error::CapacityOverflow)
        );
    }

    #[test]
    fn test_codes() {
        assert_eq!(NarrowIndexNarrowCapacity.code(), 1);
        assert_eq!(NarrowIndexWideCapacity.code(), 2);
        assert_eq!(WideIndexNarrowCapacity.code(), 3);
        assert_eq!(WideIndexWideCapacity.code(), 4);
    }
}
