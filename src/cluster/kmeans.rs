use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ---------------------------------------------------------------------------
// Seeded k-means (Lloyd's algorithm, k-means++ initialisation)
// ---------------------------------------------------------------------------

const MAX_ITERATIONS: usize = 100;

/// Partition `points` into `k` groups minimising within-group sum of squared
/// distances to each group's centroid. Labels are arbitrary identifiers in
/// `[0, k)`: a permutation of them is an equally valid result, and repeated
/// runs are only guaranteed identical for identical input and seed.
pub fn cluster(points: &[Vec<f64>], k: usize, seed: u64) -> Vec<u32> {
    let n = points.len();
    if n == 0 || k == 0 {
        return Vec::new();
    }
    if k == 1 {
        return vec![0; n];
    }
    if k >= n {
        return (0..n as u32).collect();
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let centroids = init_centroids(points, k, &mut rng);
    lloyd_iterate(points, centroids)
}

/// k-means++ style seeding: first centroid uniform, the rest weighted by
/// squared distance to the nearest centroid chosen so far.
fn init_centroids(points: &[Vec<f64>], k: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
    let n = points.len();
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.gen_range(0..n)].clone());

    for _ in 1..k {
        let dists: Vec<f64> = points
            .iter()
            .map(|p| {
                centroids
                    .iter()
                    .map(|c| squared_dist(p, c))
                    .fold(f64::INFINITY, f64::min)
            })
            .collect();

        let total: f64 = dists.iter().sum();
        if total < 1e-15 {
            // All points coincide with existing centroids.
            centroids.push(points[rng.gen_range(0..n)].clone());
            continue;
        }

        let threshold = rng.gen_range(0.0..total);
        let mut cumulative = 0.0;
        let mut chosen = 0;
        for (i, d) in dists.iter().enumerate() {
            cumulative += d;
            if cumulative >= threshold {
                chosen = i;
                break;
            }
        }
        centroids.push(points[chosen].clone());
    }

    centroids
}

fn lloyd_iterate(points: &[Vec<f64>], mut centroids: Vec<Vec<f64>>) -> Vec<u32> {
    let n = points.len();
    let k = centroids.len();
    let dims = points[0].len();
    let mut assignments = vec![0u32; n];

    for _ in 0..MAX_ITERATIONS {
        // Assign each point to its nearest centroid.
        let mut changed = false;
        for (i, point) in points.iter().enumerate() {
            let nearest = centroids
                .iter()
                .enumerate()
                .min_by(|(_, a), (_, b)| {
                    squared_dist(point, a).total_cmp(&squared_dist(point, b))
                })
                .map(|(idx, _)| idx as u32)
                .unwrap_or(0);

            if assignments[i] != nearest {
                assignments[i] = nearest;
                changed = true;
            }
        }

        if !changed {
            break;
        }

        // Recompute centroids; empty groups keep their previous position.
        let mut sums = vec![vec![0.0f64; dims]; k];
        let mut counts = vec![0usize; k];
        for (i, point) in points.iter().enumerate() {
            let c = assignments[i] as usize;
            counts[c] += 1;
            for (j, &v) in point.iter().enumerate() {
                sums[c][j] += v;
            }
        }
        for c in 0..k {
            if counts[c] > 0 {
                for j in 0..dims {
                    centroids[c][j] = sums[c][j] / counts[c] as f64;
                }
            }
        }
    }

    assignments
}

fn squared_dist(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
}
