/*
 * Copyright (c) 2020, 2021, 2022 Frank Fischer <frank-fischer@shadow-soft.de>
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

use rs_maxflow::{Algorithm, CapacityMode, LoadedGraph, MatrixView, Options};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use std::collections::VecDeque;
use std::error::Error;

/// Shortest augmenting paths on a dense matrix of residual capacities.
fn reference(n: usize, caps: &[u64], src: usize, snk: usize) -> u64 {
    let mut res: Vec<u128> = caps.iter().map(|&c| u128::from(c)).collect();
    for u in 0..n {
        res[u * n + u] = 0;
    }
    let mut value = 0;
    loop {
        let mut pred = vec![usize::max_value(); n];
        pred[src] = src;
        let mut queue = VecDeque::new();
        queue.push_back(src);
        while let Some(u) = queue.pop_front() {
            for v in 0..n {
                if pred[v] == usize::max_value() && res[u * n + v] > 0 {
                    pred[v] = u;
                    queue.push_back(v);
                }
            }
        }
        if pred[snk] == usize::max_value() {
            return value as u64;
        }
        let mut df = u128::max_value();
        let mut v = snk;
        while v != src {
            df = df.min(res[pred[v] * n + v]);
            v = pred[v];
        }
        let mut v = snk;
        while v != src {
            res[pred[v] * n + v] -= df;
            res[v * n + pred[v]] += df;
            v = pred[v];
        }
        value += df;
    }
}

/// Return the capacity of the cut leaving `side`.
fn cut_capacity(n: usize, caps: &[u64], side: &[usize]) -> u64 {
    let mut inside = vec![false; n];
    for &u in side {
        inside[u] = true;
    }
    (0..n)
        .filter(|&u| inside[u])
        .flat_map(|u| (0..n).filter(|&v| !inside[v]).map(move |v| (u, v)))
        .map(|(u, v)| caps[u * n + v])
        .sum()
}

fn random_matrix(rng: &mut StdRng, n: usize, density: f64, max: u64) -> Vec<u64> {
    (0..n * n)
        .map(|i| {
            if i / n != i % n && rng.gen_bool(density) {
                rng.gen_range(1..=max)
            } else {
                0
            }
        })
        .collect()
}

/// Solve with all algorithms and compare with the reference value.
fn check(g: &LoadedGraph, caps: &[u64], threads: usize) -> Result<(), Box<dyn Error>> {
    let n = g.num_vertices();
    let expected = reference(n, caps, 0, n - 1);
    let opts = Options::default().with_threads(threads);
    for alg in Algorithm::all() {
        let (value, cut) = g.max_flow_min_cut(alg, 0, n - 1, &opts)?;
        assert_eq!(value, expected, "{} (n = {}, threads = {})", alg, n, threads);
        assert!(cut.contains(&0) && !cut.contains(&(n - 1)), "{}", alg);
        assert_eq!(cut_capacity(n, caps, &cut), value, "{}", alg);
    }
    Ok(())
}

#[test]
fn test_dense_u32() -> Result<(), Box<dyn Error>> {
    let mut rng = StdRng::seed_from_u64(42);
    for &n in &[2, 3, 7, 20, 41] {
        for &density in &[0.1, 0.5, 1.0] {
            let caps = random_matrix(&mut rng, n, density, 200);
            let values: Vec<u32> = caps.iter().map(|&c| c as u32).collect();
            let g = LoadedGraph::from_view(&MatrixView::dense(&values, n, n))?;
            assert_eq!(g.mode(), CapacityMode::NarrowIndexNarrowCapacity);
            check(&g, &caps, 3)?;
        }
    }
    Ok(())
}

#[test]
fn test_dense_u64() -> Result<(), Box<dyn Error>> {
    let mut rng = StdRng::seed_from_u64(4711);
    for &n in &[5, 16, 33] {
        let caps = random_matrix(&mut rng, n, 0.5, 1 << 30);
        let g = LoadedGraph::from_view(&MatrixView::dense(&caps, n, n))?;
        assert_eq!(g.mode(), CapacityMode::NarrowIndexWideCapacity);
        check(&g, &caps, 2)?;
    }
    Ok(())
}

#[test]
fn test_sparse() -> Result<(), Box<dyn Error>> {
    let mut rng = StdRng::seed_from_u64(7);
    for &n in &[4, 25, 60] {
        let nnz = 3 * n;
        let mut rows = Vec::with_capacity(nnz);
        let mut cols = Vec::with_capacity(nnz);
        let mut values = Vec::with_capacity(nnz);
        let mut caps = vec![0; n * n];
        for _ in 0..nnz {
            let (u, v) = (rng.gen_range(0..n), rng.gen_range(0..n));
            let c: u32 = rng.gen_range(0..100);
            rows.push(u as u32);
            cols.push(v as u32);
            values.push(c);
            // duplicate entries add up, the diagonal is ignored
            if u != v {
                caps[u * n + v] += u64::from(c);
            }
        }
        let g = LoadedGraph::from_view(&MatrixView::sparse(&values, &rows, &cols, (n, n)))?;
        assert!(g.is_sparse());
        check(&g, &caps, 4)?;
    }
    Ok(())
}

#[test]
fn test_thread_counts() -> Result<(), Box<dyn Error>> {
    let mut rng = StdRng::seed_from_u64(1);
    let n = 30;
    let caps = random_matrix(&mut rng, n, 0.3, 50);
    let g = LoadedGraph::from_view(&MatrixView::dense(&caps, n, n))?;
    let expected = g.max_flow(Algorithm::EdmondsKarp, 0, n - 1, &Options::default())?;
    for alg in Algorithm::all().filter(|alg| alg.is_parallel()) {
        for threads in 1..=4 {
            let opts = Options::default().with_threads(threads);
            assert_eq!(g.max_flow(alg, 0, n - 1, &opts)?, expected, "{} with {} threads", alg, threads);
        }
        // more threads than vertices
        let opts = Options::default().with_threads(n + 5);
        assert_eq!(g.max_flow(alg, 0, n - 1, &opts)?, expected, "{}", alg);
    }
    Ok(())
}

#[test]
fn test_without_global_relabelling() -> Result<(), Box<dyn Error>> {
    let mut rng = StdRng::seed_from_u64(99);
    let n = 25;
    let caps = random_matrix(&mut rng, n, 0.4, 1000);
    let g = LoadedGraph::from_view(&MatrixView::dense(&caps, n, n))?;
    let expected = reference(n, &caps, 0, n - 1);
    let opts = Options::default().with_threads(2).with_global_relabelling(false);
    for alg in Algorithm::all() {
        assert_eq!(g.max_flow(alg, 0, n - 1, &opts)?, expected, "{}", alg);
    }
    Ok(())
}

#[test]
fn test_other_terminals() -> Result<(), Box<dyn Error>> {
    let mut rng = StdRng::seed_from_u64(3);
    let n = 12;
    let caps = random_matrix(&mut rng, n, 0.4, 20);
    let g = LoadedGraph::from_view(&MatrixView::dense(&caps, n, n))?;
    for &(src, snk) in &[(5, 2), (11, 0), (3, 4)] {
        let expected = reference(n, &caps, src, snk);
        for alg in Algorithm::all() {
            let opts = Options::default().with_threads(2);
            assert_eq!(g.max_flow(alg, src, snk, &opts)?, expected, "{} from {} to {}", alg, src, snk);
        }
    }
    Ok(())
}
