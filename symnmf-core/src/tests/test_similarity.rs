// symnmf-core/src/tests/test_similarity.rs

use crate::similarity::*;

/// Deterministic 2-D spiral, no two points equal.
fn spiral(n: usize) -> Vec<Vec<f64>> {
    (0..n)
        .map(|i| {
            let t = i as f64 * 0.7;
            vec![t.cos() * (1.0 + 0.3 * t), t.sin() * (1.0 + 0.3 * t)]
        })
        .collect()
}

#[test]
fn test_similarity_symmetric_zero_diagonal() {
    crate::init();
    let points = PointSet::new(spiral(12)).unwrap();
    let a = compute_similarity(&points).unwrap();

    assert_eq!(a.shape(), (12, 12));
    for i in 0..12 {
        assert_eq!(a.get(i, i), 0.0, "diagonal at {} should be 0", i);
        for j in 0..12 {
            assert_eq!(a.get(i, j), a.get(j, i), "A[{}][{}] != A[{}][{}]", i, j, j, i);
        }
    }
}

#[test]
fn test_similarity_off_diagonal_range() {
    crate::init();
    let points = PointSet::new(spiral(8)).unwrap();
    let a = compute_similarity(&points).unwrap();

    for i in 0..8 {
        for j in 0..8 {
            if i != j {
                let v = a.get(i, j);
                assert!(v > 0.0 && v <= 1.0, "A[{}][{}] = {} outside (0, 1]", i, j, v);
            }
        }
    }
}

#[test]
fn test_similarity_three_point_scenario() {
    crate::init();
    let points = PointSet::new(vec![vec![0.0, 0.0], vec![0.0, 0.0], vec![10.0, 10.0]]).unwrap();
    let a = compute_similarity(&points).unwrap();

    assert_eq!(a.get(0, 1), 1.0, "identical points have similarity 1");
    assert_eq!(a.get(0, 2), (-100.0f64).exp());
    assert_eq!(a.get(1, 2), (-100.0f64).exp());
    assert!((a.get(0, 2) - 3.720075976020836e-44).abs() < 1e-56);
}

#[test]
fn test_similarity_matches_kernel() {
    crate::init();
    let points = PointSet::new(vec![vec![1.0, 2.0, 3.0], vec![2.0, 2.0, 1.0]]).unwrap();
    let a = compute_similarity(&points).unwrap();

    // ‖Δ‖² = 1 + 0 + 4
    let expected = (-5.0f64 / 2.0).exp();
    assert!((a.get(0, 1) - expected).abs() < 1e-15);
}

#[test]
fn test_similarity_decays_with_distance() {
    crate::init();
    let points = PointSet::new(vec![vec![0.0], vec![0.5], vec![3.0]]).unwrap();
    let a = compute_similarity(&points).unwrap();
    assert!(a.get(0, 1) > a.get(0, 2));
}
