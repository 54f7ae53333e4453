//! Grid Value Function Properties
//!
//! Pins down the interpolation semantics end to end, from JSON ingestion
//! to value/gradient queries:
//! - exactness on grid-aligned states
//! - continuity inside a cell
//! - periodic wraparound
//! - the documented 3x3 bilinear scenario
//! - gradient strategies against known fields
//!
//! Run with: `cargo test --test grid_interpolation`

use approx::assert_relative_eq;
use raksha::{GradientMethod, GridData, GridLibrary, GridValueFunction, RakshaError};

/// The 3x3 scenario grid: gmin=[-1,-1], gdx=[1,1], center datum 0,
/// everything else 1.
fn bowl() -> GridValueFunction {
    let mut data = vec![1.0; 9];
    data[4] = 0.0;
    GridValueFunction::new(
        GridData::new(
            vec![-1.0, -1.0],
            vec![1.0, 1.0],
            vec![3, 3],
            vec![false, false],
            data,
        )
        .unwrap(),
    )
    .unwrap()
}

/// A 2-D field linear in both axes, periodic in the second.
fn tilted_cylinder() -> GridValueFunction {
    // value(x, y) = x over x in {0,1,2}, any y; y axis periodic with 4
    // points.
    let mut data = Vec::new();
    for x in 0..3 {
        for _y in 0..4 {
            data.push(x as f64);
        }
    }
    GridValueFunction::new(
        GridData::new(
            vec![0.0, 0.0],
            vec![1.0, 0.5],
            vec![3, 4],
            vec![false, true],
            data,
        )
        .unwrap(),
    )
    .unwrap()
}

#[test]
fn bowl_scenario_values() {
    let grid = bowl();
    assert_relative_eq!(grid.value(&[0.0, 0.0]).unwrap(), 0.0);
    assert_relative_eq!(grid.value(&[-1.0, -1.0]).unwrap(), 1.0);
    assert_relative_eq!(grid.value(&[-0.5, -0.5]).unwrap(), 0.75);
}

#[test]
fn exact_on_every_grid_point() {
    let grid = bowl();
    for ix in 0..3 {
        for iy in 0..3 {
            let state = [-1.0 + ix as f64, -1.0 + iy as f64];
            let expected = grid.value_at_index(&[ix, iy]).unwrap();
            assert_relative_eq!(grid.value(&state).unwrap(), expected);
        }
    }
}

#[test]
fn continuous_across_small_steps() {
    let grid = bowl();
    let mut prev = grid.value(&[-1.0, 0.3]).unwrap();
    let mut x = -1.0;
    while x < 1.0 {
        x += 0.01;
        let v = grid.value(&[x, 0.3]).unwrap();
        assert!(
            (v - prev).abs() < 0.05,
            "jump of {} near x={}",
            (v - prev).abs(),
            x
        );
        prev = v;
    }
}

#[test]
fn periodic_axis_wraps_by_whole_periods() {
    // A heading-like axis: 4 points over one turn, values sampled from a
    // sine profile so the wrap is actually exercised.
    let grid = GridValueFunction::new(
        GridData::new(
            vec![0.0],
            vec![0.5],
            vec![4],
            vec![true],
            vec![0.0, 1.0, 0.0, -1.0],
        )
        .unwrap(),
    )
    .unwrap();
    let period = 4.0 * 0.5;
    for y in [0.1, 0.9, 1.3, 1.8] {
        let base = grid.value(&[y]).unwrap();
        assert_relative_eq!(grid.value(&[y + period]).unwrap(), base, epsilon = 1e-12);
        assert_relative_eq!(grid.value(&[y - period]).unwrap(), base, epsilon = 1e-12);
    }
    // The seam blends the last point into the wrapped first point.
    assert_relative_eq!(grid.value(&[1.75]).unwrap(), -0.5, epsilon = 1e-12);
}

#[test]
fn centered_gradient_recovers_linear_slope() {
    let grid = tilted_cylinder();
    let g = grid.gradient(&[1.0, 0.7]).unwrap();
    assert_relative_eq!(g[0], 1.0, epsilon = 1e-9);
    assert_relative_eq!(g[1], 0.0, epsilon = 1e-9);
}

#[test]
fn cell_edge_gradient_constant_within_cell() {
    let grid = tilted_cylinder().with_gradient_method(GradientMethod::CellEdge);
    let a = grid.gradient(&[0.2, 0.7]).unwrap();
    let b = grid.gradient(&[0.8, 0.7]).unwrap();
    assert_relative_eq!(a[0], b[0], epsilon = 1e-12);
}

#[test]
fn json_roundtrip_matches_in_memory_grid() {
    let text = r#"{
        "gmin": [-1.0, -1.0],
        "gdx": [1.0, 1.0],
        "gnum": [3, 3],
        "periodic": [false, false],
        "data": [[1.0, 1.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0]]
    }"#;
    let parsed = GridValueFunction::new(GridData::from_json(text).unwrap()).unwrap();
    let built = bowl();
    for state in [[-0.5, -0.5], [0.25, -0.75], [0.0, 0.0]] {
        assert_relative_eq!(
            parsed.value(&state).unwrap(),
            built.value(&state).unwrap(),
            epsilon = 1e-12
        );
    }
}

#[test]
fn library_guards_unloaded_grids() {
    let mut library = GridLibrary::new();
    assert!(matches!(
        library.get("warehouse").unwrap_err(),
        RakshaError::GridNotLoaded(_)
    ));
    library.insert("warehouse", bowl());
    assert_eq!(library.get("warehouse").unwrap().dim(), 2);
}

#[test]
fn queries_reject_wrong_dimension() {
    let grid = bowl();
    assert!(matches!(
        grid.value(&[0.0, 0.0, 0.0]).unwrap_err(),
        RakshaError::DimensionMismatch {
            expected: 2,
            actual: 3
        }
    ));
    assert!(grid.gradient(&[0.0]).is_err());
}
