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

//! Synchronous rounds over all active vertices.
//!
//! Each round takes a snapshot of the active vertices, splits it into one
//! shard per thread and discharges the shards in parallel. Between rounds
//! the calling thread may relabel globally.

use super::SharedPreflow;
use crate::error::Result;
use crate::num::integer::Integer;
use crate::options::Options;
use crate::traits::{Capacity, Index};

use rayon::prelude::*;
use rayon::ThreadPool;
use tracing::trace;

pub(super) fn solve<I, C>(shared: &SharedPreflow<I, C>, pool: &ThreadPool, opts: &Options) -> Result<()>
where
    I: Index,
    C: Capacity,
{
    let n = shared.num_vertices();
    let threads = pool.current_num_threads();
    let mut lvl_relabel = if opts.global_relabelling {
        n
    } else {
        usize::max_value()
    };
    let mut cnt_relabel = 0;
    let mut cnt_rounds = 0;

    pool.install(|| loop {
        let active: Vec<usize> = (0..n).into_par_iter().filter(|&u| shared.is_active(u)).collect();
        if active.is_empty() {
            break;
        }
        cnt_rounds += 1;

        let shard = Integer::div_ceil(&active.len(), &threads);
        cnt_relabel += active
            .par_chunks(shard)
            .map(|vertices| vertices.iter().map(|&u| shared.discharge(u, |_| ())).sum::<usize>())
            .sum::<usize>();

        if cnt_relabel >= lvl_relabel {
            shared.global_relabel();
            lvl_relabel = cnt_relabel + n;
        }
    });

    trace!(rounds = cnt_rounds, relabels = cnt_relabel, threads, "parallel push-relabel");
    Ok(())
}
