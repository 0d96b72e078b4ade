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

//! Per-solve configuration.

use crate::error::{Error, Result};

#[cfg(feature = "serialize")]
use serde_derive::{Deserialize, Serialize};

/// Options of a single solve.
///
/// # Example
///
/// ```
/// use rs_maxflow::Options;
///
/// let opts = Options::default().with_threads(4).with_global_relabelling(false);
/// assert_eq!(opts.threads, 4);
/// assert!(!opts.global_relabelling);
/// assert!(opts.validate().is_ok());
/// assert!(Options::default().with_threads(0).validate().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialize", serde(default))]
pub struct Options {
    /// Number of worker threads of the parallel algorithms.
    ///
    /// Sequential algorithms ignore this value.
    pub threads: usize,
    /// Whether push-relabel algorithms periodically recompute exact heights.
    pub global_relabelling: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            threads: 1,
            global_relabelling: true,
        }
    }
}

impl Options {
    /// Set the number of worker threads.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Enable or disable the global relabelling heuristic.
    pub fn with_global_relabelling(mut self, enabled: bool) -> Self {
        self.global_relabelling = enabled;
        self
    }

    /// Check that the options are usable.
    pub fn validate(&self) -> Result<()> {
        if self.threads == 0 {
            return Err(Error::InvalidThreadCount);
        }
        Ok(())
    }
}

#[cfg(all(test, feature = "serialize"))]
mod tests {
    use super::Options;

    #[test]
    fn test_serde() {
        let opts: Options = serde_json::from_str(r#"{"threads": 3}"#).unwrap();
        assert_eq!(opts, Options::default().with_threads(3));
        let s = serde_json::to_string(&opts.with_global_relabelling(false)).unwrap();
        assert_eq!(s, r#"{"threads":3,"global_relabelling":false}"#);
    }
}
