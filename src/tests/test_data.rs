//! Deterministic synthetic point sets for the test suites.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// `per_blob` points jittered uniformly by `spread` around each center.
/// Returns the points and the index of the center each one came from.
pub fn make_blobs(
    centers: &[Vec<f64>],
    per_blob: usize,
    spread: f64,
    seed: u64,
) -> (Vec<Vec<f64>>, Vec<usize>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut points = Vec::with_capacity(centers.len() * per_blob);
    let mut truth = Vec::with_capacity(centers.len() * per_blob);

    for (c, center) in centers.iter().enumerate() {
        for _ in 0..per_blob {
            points.push(
                center
                    .iter()
                    .map(|&x| x + rng.random_range(-spread..spread))
                    .collect(),
            );
            truth.push(c);
        }
    }
    (points, truth)
}

/// Three well separated 2-D groups.
pub fn three_blobs(per_blob: usize) -> (Vec<Vec<f64>>, Vec<usize>) {
    make_blobs(
        &[vec![0.0, 0.0], vec![8.0, 0.0], vec![4.0, 8.0]],
        per_blob,
        0.6,
        128,
    )
}

/// True when `labels` induce the same partition as `truth`.
pub fn same_partition(labels: &[usize], truth: &[usize]) -> bool {
    labels.len() == truth.len()
        && (0..labels.len()).all(|i| {
            (0..labels.len()).all(|j| (labels[i] == labels[j]) == (truth[i] == truth[j]))
        })
}
