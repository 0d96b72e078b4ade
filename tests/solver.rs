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

use rs_maxflow::{Algorithm, CapacityMode, Error, ErrorKind, GraphRegistry, LoadedGraph, MatrixView, Options, Solver};

fn diamond() -> Vec<u32> {
    let mut caps = vec![0u32; 16];
    for &(u, v) in &[(0, 1), (0, 2), (1, 3), (2, 3)] {
        caps[u * 4 + v] = 10;
    }
    caps
}

#[test]
fn test_every_algorithm() {
    let caps = diamond();
    let m = MatrixView::dense(&caps, 4, 4);
    let registry = GraphRegistry::new();
    for name in Algorithm::names() {
        let mut solver = Solver::with_registry(&registry);
        solver.load(&m, name).unwrap();
        assert_eq!(solver.algorithm().map(|alg| alg.name()), Some(name));
        assert_eq!(solver.solve(name, 0, 3, 2), Ok(20), "{}", name);
    }
    assert!(registry.is_empty());
}

#[test]
fn test_stateless() {
    let caps = diamond();
    let m = MatrixView::dense(&caps, 4, 4);
    assert_eq!(rs_maxflow::edmonds_karp(&m, 0, 3), Ok(20));
    assert_eq!(rs_maxflow::ahuja_orlin(&m, 0, 3), Ok(20));
    assert_eq!(rs_maxflow::dinic(&m, 0, 3), Ok(20));
    assert_eq!(rs_maxflow::push_relabel_fifo(&m, 0, 3), Ok(20));
    assert_eq!(rs_maxflow::push_relabel_highest(&m, 0, 3), Ok(20));
    assert_eq!(rs_maxflow::parallel_push_relabel(&m, 0, 3, 3), Ok(20));
    assert_eq!(rs_maxflow::parallel_push_relabel_segment(&m, 0, 3, 3), Ok(20));
    assert_eq!(rs_maxflow::parallel_ahuja_orlin_segment(&m, 0, 3, 3), Ok(20));
    assert_eq!(
        rs_maxflow::max_flow(&m, Algorithm::Dinic, 1, 3, &Options::default()),
        Ok(10)
    );
    assert_eq!(rs_maxflow::parallel_push_relabel(&m, 0, 3, 0), Err(Error::InvalidThreadCount));
}

#[test]
fn test_single_arcs() {
    // arcs (0,1), (0,2), (1,3), (2,3) of capacity 10
    let values: Vec<u32> = vec![10; 4];
    let rows: Vec<u32> = vec![0, 0, 1, 2];
    let cols: Vec<u32> = vec![1, 2, 3, 3];
    let m = MatrixView::sparse(&values, &rows, &cols, (4, 4));
    for alg in Algorithm::all() {
        assert_eq!(rs_maxflow::max_flow(&m, alg, 0, 3, &Options::default().with_threads(2)), Ok(20));
    }
}

#[test]
fn test_disconnected() {
    let mut caps = vec![0u64; 25];
    caps[1] = 5; // 0 -> 1
    caps[3 * 5 + 4] = 5; // 3 -> 4
    caps[4 * 5 + 2] = 7; // 4 -> 2
    let m = MatrixView::dense(&caps, 5, 5);
    for alg in Algorithm::all() {
        assert_eq!(
            rs_maxflow::max_flow(&m, alg, 0, 4, &Options::default().with_threads(3)),
            Ok(0),
            "{}",
            alg
        );
    }
}

#[test]
fn test_source_equals_sink() {
    let caps = diamond();
    let m = MatrixView::dense(&caps, 4, 4);
    for alg in Algorithm::all() {
        let err = rs_maxflow::max_flow(&m, alg, 2, 2, &Options::default()).unwrap_err();
        assert_eq!(err, Error::SourceEqualsSink(2));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}

#[test]
fn test_solve_consumes() {
    let caps = diamond();
    let m = MatrixView::dense(&caps, 4, 4);
    let registry = GraphRegistry::new();
    let mut solver = Solver::with_registry(&registry);

    assert_eq!(solver.solve("dinic", 0, 3, 1), Err(Error::NotLoaded));
    solver.load(&m, "dinic").unwrap();
    assert_eq!(solver.solve("dinic", 0, 3, 1), Ok(20));
    let err = solver.solve("dinic", 0, 3, 1).unwrap_err();
    assert_eq!(err, Error::NotLoaded);
    assert_eq!(err.kind(), ErrorKind::Lifecycle);

    // recover by loading again
    solver.load(&m, "dinic").unwrap();
    assert_eq!(solver.solve("dinic", 0, 3, 1), Ok(20));
}

#[test]
fn test_algorithm_mismatch() {
    let caps = diamond();
    let m = MatrixView::dense(&caps, 4, 4);
    let registry = GraphRegistry::new();
    let mut solver = Solver::with_registry(&registry);
    solver.load(&m, "edmonds_karp").unwrap();
    assert_eq!(
        solver.solve("parallel_push_relabel", 0, 3, 2),
        Err(Error::AlgorithmMismatch {
            loaded: "edmonds_karp".to_string(),
            requested: "parallel_push_relabel".to_string(),
        })
    );
    // the mismatch is reported before the vertices are checked
    assert!(matches!(solver.solve("dinic", 9, 9, 0), Err(Error::AlgorithmMismatch { .. })));
    assert!(solver.is_loaded());
    assert_eq!(solver.solve("edmonds_karp", 0, 3, 1), Ok(20));
}

#[test]
fn test_reload_replaces() {
    let caps = diamond();
    let m = MatrixView::dense(&caps, 4, 4);
    let registry = GraphRegistry::new();
    let mut solver = Solver::with_registry(&registry);

    solver.load(&m, "dinic").unwrap();
    let first = solver.handle().unwrap();
    solver.load(&m, "push_relabel_fifo").unwrap();
    let second = solver.handle().unwrap();

    assert_ne!(first, second);
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get(first).unwrap_err(), Error::StaleHandle(first));
    assert!(registry.get(second).is_ok());
    assert_eq!(solver.algorithm(), Some(Algorithm::PushRelabelFifo));
}

#[test]
fn test_destroy_twice() {
    let caps = diamond();
    let m = MatrixView::dense(&caps, 4, 4);
    let registry = GraphRegistry::new();
    let mut solver = Solver::with_registry(&registry);

    solver.destroy();
    solver.load(&m, "dinic").unwrap();
    solver.destroy();
    solver.destroy();
    assert!(!solver.is_loaded());
    assert!(registry.is_empty());
    assert_eq!(solver.solve("dinic", 0, 3, 1), Err(Error::NotLoaded));
}

#[test]
fn test_invalid_vertices() {
    let caps = diamond();
    let m = MatrixView::dense(&caps, 4, 4);
    let registry = GraphRegistry::new();
    let mut solver = Solver::with_registry(&registry);
    solver.load(&m, "dinic").unwrap();
    assert_eq!(solver.solve("dinic", 4, 3, 1), Err(Error::InvalidVertex { vertex: 4, n: 4 }));
    assert_eq!(solver.solve("dinic", 0, 7, 1), Err(Error::InvalidVertex { vertex: 7, n: 4 }));
    assert_eq!(solver.solve("dinic", 3, 3, 1), Err(Error::SourceEqualsSink(3)));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_load_errors() {
    let mut solver = Solver::new();
    let caps = diamond();
    assert_eq!(
        solver.load(&MatrixView::dense(&caps, 4, 4), "simplex"),
        Err(Error::UnknownAlgorithm("simplex".to_string()))
    );
    assert_eq!(
        solver.load(&MatrixView::dense(&caps, 2, 8), "dinic"),
        Err(Error::InvalidShape { rows: 2, cols: 8 })
    );
    let one = [0u32];
    assert_eq!(
        solver.load(&MatrixView::dense(&one[..], 1, 1), "dinic"),
        Err(Error::InvalidShape { rows: 1, cols: 1 })
    );
    let floats = vec![0.5f64; 16];
    assert!(matches!(
        solver.load(&MatrixView::dense(&floats, 4, 4), "dinic"),
        Err(Error::UnsupportedType(_))
    ));
    assert!(!solver.is_loaded());
}

#[test]
fn test_mode_selection() {
    let small: Vec<u32> = vec![1; 25];
    let g = LoadedGraph::from_view(&MatrixView::dense(&small, 5, 5)).unwrap();
    assert_eq!(g.mode(), CapacityMode::NarrowIndexNarrowCapacity);

    let wide: Vec<u64> = vec![1; 25];
    let g = LoadedGraph::from_view(&MatrixView::dense(&wide, 5, 5)).unwrap();
    assert_eq!(g.mode(), CapacityMode::NarrowIndexWideCapacity);
}
