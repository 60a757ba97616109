//! Exact DBSCAN over cosine distance (spec §4.7). The teacher's
//! `cortex-consolidation::pipeline::phase2_clustering` reaches for the
//! `hdbscan` crate because it wants a density hierarchy; the spec asks for
//! DBSCAN with caller-controlled `epsilon`/`minPoints`, which HDBSCAN does
//! not expose directly, so this is a hand-rolled classic DBSCAN using the
//! same cosine-distance primitive the teacher's brute-force vector scan
//! uses (`recall_vector::cosine_distance`).

use recall_vector::cosine_distance;

/// Per-point assignment: `Some(cluster_index)` or `None` for noise.
pub type Assignment = Vec<Option<usize>>;

fn region_query(points: &[Vec<f32>], idx: usize, epsilon: f64) -> Vec<usize> {
    points
        .iter()
        .enumerate()
        .filter(|(j, p)| *j != idx && cosine_distance(&points[idx], p) <= epsilon)
        .map(|(j, _)| j)
        .collect()
}

/// Classic DBSCAN: returns a cluster index per input point, or `None` for
/// noise (spec §4.7: "Unassigned points are noise").
pub fn dbscan(points: &[Vec<f32>], epsilon: f64, min_points: usize) -> Assignment {
    let n = points.len();
    let mut labels: Assignment = vec![None; n];
    let mut visited = vec![false; n];
    let mut next_cluster = 0usize;

    for i in 0..n {
        if visited[i] {
            continue;
        }
        visited[i] = true;
        let neighbors = region_query(points, i, epsilon);
        if neighbors.len() + 1 < min_points {
            continue;
        }

        let cluster_id = next_cluster;
        next_cluster += 1;
        labels[i] = Some(cluster_id);

        let mut queue = neighbors;
        let mut pos = 0;
        while pos < queue.len() {
            let j = queue[pos];
            pos += 1;
            if !visited[j] {
                visited[j] = true;
                let j_neighbors = region_query(points, j, epsilon);
                if j_neighbors.len() + 1 >= min_points {
                    for &k in &j_neighbors {
                        if !queue.contains(&k) {
                            queue.push(k);
                        }
                    }
                }
            }
            if labels[j].is_none() {
                labels[j] = Some(cluster_id);
            }
        }
    }

    labels
}

/// Group an [`Assignment`] into member-index lists, dropping clusters
/// smaller than `min_cluster_size` back to noise (spec §4.7:
/// "Small clusters below minClusterSize... are discarded").
pub fn group_clusters(assignment: &Assignment, min_cluster_size: usize) -> Vec<Vec<usize>> {
    let max_id = assignment.iter().flatten().max().copied();
    let Some(max_id) = max_id else {
        return Vec::new();
    };
    let mut groups: Vec<Vec<usize>> = vec![Vec::new(); max_id + 1];
    for (idx, label) in assignment.iter().enumerate() {
        if let Some(c) = label {
            groups[*c].push(idx);
        }
    }
    groups.into_iter().filter(|g| g.len() >= min_cluster_size).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tight_group_forms_one_cluster_and_outlier_is_noise() {
        let points = vec![
            vec![1.0, 0.0, 0.0],
            vec![0.99, 0.01, 0.0],
            vec![0.98, 0.02, 0.0],
            vec![0.0, 1.0, 0.0],
        ];
        let labels = dbscan(&points, 0.05, 2);
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[1], labels[2]);
        assert!(labels[0].is_some());
        assert_eq!(labels[3], None);
    }

    #[test]
    fn all_noise_when_below_min_points() {
        let points = vec![vec![1.0, 0.0], vec![0.99, 0.0]];
        let labels = dbscan(&points, 0.01, 5);
        assert!(labels.iter().all(Option::is_none));
    }

    #[test]
    fn group_clusters_discards_undersized_groups() {
        let assignment = vec![Some(0), Some(0), Some(1)];
        let groups = group_clusters(&assignment, 2);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0], vec![0, 1]);
    }
}
