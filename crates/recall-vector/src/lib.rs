//! Vector/distance primitives (spec §4.1). Grounded in the teacher's
//! brute-force cosine scan (`cortex-storage/src/queries/vector_search.rs`)
//! and its use inside the consolidation pipeline's silhouette check.

/// Cosine similarity of two equal-length vectors. Zero norm on either side
/// yields similarity 0 (and thus distance 1, spec §4.1).
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| (*x as f64) * (*y as f64)).sum();
    let norm_a = norm(a);
    let norm_b = norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// Cosine distance `1 - similarity`. When either vector has zero norm the
/// distance is the worst case, 1 (spec §4.1).
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f64 {
    if norm(a) == 0.0 || norm(b) == 0.0 {
        return 1.0;
    }
    1.0 - cosine_similarity(a, b)
}

fn norm(v: &[f32]) -> f64 {
    v.iter().map(|x| (*x as f64) * (*x as f64)).sum::<f64>().sqrt()
}

/// Arithmetic-mean centroid of a set of equal-dimension vectors.
pub fn centroid(vectors: &[Vec<f32>]) -> Vec<f32> {
    if vectors.is_empty() {
        return Vec::new();
    }
    let dim = vectors[0].len();
    let mut sums = vec![0f64; dim];
    for v in vectors {
        for (i, x) in v.iter().enumerate() {
            sums[i] += *x as f64;
        }
    }
    let n = vectors.len() as f64;
    sums.into_iter().map(|s| (s / n) as f32).collect()
}

/// Mean pairwise cosine similarity of a set (spec §4.1). For fewer than
/// two members, coherence is defined as 1 (a singleton is perfectly
/// coherent with itself).
pub fn coherence(vectors: &[Vec<f32>]) -> f64 {
    if vectors.len() < 2 {
        return 1.0;
    }
    let mut sum = 0.0;
    let mut count = 0usize;
    for i in 0..vectors.len() {
        for j in (i + 1)..vectors.len() {
            sum += cosine_similarity(&vectors[i], &vectors[j]);
            count += 1;
        }
    }
    if count == 0 {
        1.0
    } else {
        sum / count as f64
    }
}

/// Per-point silhouette score: `(b - a) / max(a, b)` where `a` is the mean
/// intra-cluster distance and `b` is the mean distance to the nearest
/// other cluster (spec §4.1). Points in clusters with fewer than two
/// members are skipped by the caller, per spec.
pub fn silhouette(
    point: &[f32],
    own_cluster: &[Vec<f32>],
    other_clusters: &[Vec<Vec<f32>>],
) -> f64 {
    let a = mean_distance(point, own_cluster);
    let b = other_clusters
        .iter()
        .filter(|c| !c.is_empty())
        .map(|c| mean_distance(point, c))
        .fold(f64::INFINITY, f64::min);
    if !b.is_finite() {
        return 0.0;
    }
    let denom = a.max(b);
    if denom == 0.0 {
        0.0
    } else {
        (b - a) / denom
    }
}

/// Average silhouette score across every point in every cluster with at
/// least two members (spec §4.1, used by consolidation quality metrics).
pub fn average_silhouette(clusters: &[Vec<Vec<f32>>]) -> f64 {
    let mut total = 0.0;
    let mut count = 0usize;
    for (idx, cluster) in clusters.iter().enumerate() {
        if cluster.len() < 2 {
            continue;
        }
        let others: Vec<Vec<Vec<f32>>> = clusters
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != idx)
            .map(|(_, c)| c.clone())
            .collect();
        for point in cluster {
            total += silhouette(point, cluster, &others);
            count += 1;
        }
    }
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

fn mean_distance(point: &[f32], others: &[Vec<f32>]) -> f64 {
    let relevant: Vec<&Vec<f32>> = others.iter().filter(|o| o.as_slice() != point).collect();
    if relevant.is_empty() {
        return 0.0;
    }
    let sum: f64 = relevant.iter().map(|o| cosine_distance(point, o)).sum();
    sum / relevant.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_vectors_have_zero_distance() {
        let v = vec![1.0, 2.0, 3.0];
        assert!((cosine_distance(&v, &v)).abs() < 1e-9);
    }

    #[test]
    fn zero_vector_has_worst_case_distance() {
        let a = vec![0.0, 0.0];
        let b = vec![1.0, 1.0];
        assert_eq!(cosine_distance(&a, &b), 1.0);
    }

    #[test]
    fn orthogonal_vectors_have_distance_one() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!((cosine_distance(&a, &b) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn singleton_coherence_is_one() {
        assert_eq!(coherence(&[vec![1.0, 0.0]]), 1.0);
    }

    #[test]
    fn centroid_of_single_vector_is_itself() {
        let v = vec![1.0, 2.0, 3.0];
        assert_eq!(centroid(&[v.clone()]), v);
    }

    proptest::proptest! {
        #[test]
        fn cosine_distance_is_bounded(
            a in proptest::collection::vec(-10.0f32..10.0, 4),
            b in proptest::collection::vec(-10.0f32..10.0, 4),
        ) {
            let d = cosine_distance(&a, &b);
            proptest::prop_assert!((0.0..=2.0).contains(&d));
        }
    }
}
