//! Cluster maintenance (spec §4.7): `mergeSimilarClusters` and
//! `splitLargeClusters`.

use recall_vector::{centroid, coherence, cosine_similarity};

use crate::dbscan::{dbscan, group_clusters};

pub struct Cluster {
    pub id: String,
    pub members: Vec<(String, Vec<f32>)>,
}

/// A merge instruction: members of `from` should be reassigned to `into`.
pub struct Merge {
    pub into: String,
    pub from: String,
}

/// Pairwise-compare cluster centroids; any pair with cosine similarity
/// `>= tau` merges the second into the first (spec §4.7, default tau=0.8).
pub fn merge_similar_clusters(clusters: &[Cluster], tau: f64) -> Vec<Merge> {
    let centroids: Vec<Vec<f32>> = clusters
        .iter()
        .map(|c| centroid(&c.members.iter().map(|(_, e)| e.clone()).collect::<Vec<_>>()))
        .collect();

    let mut merged_away = vec![false; clusters.len()];
    let mut merges = Vec::new();

    for i in 0..clusters.len() {
        if merged_away[i] {
            continue;
        }
        for j in (i + 1)..clusters.len() {
            if merged_away[j] {
                continue;
            }
            if cosine_similarity(&centroids[i], &centroids[j]) >= tau {
                merges.push(Merge { into: clusters[i].id.clone(), from: clusters[j].id.clone() });
                merged_away[j] = true;
            }
        }
    }

    merges
}

/// A sub-cluster produced by splitting an over-large, low-coherence
/// cluster; `sub_id` follows the spec's `parent*1000 + k` derivation.
pub struct Split {
    pub sub_id: String,
    pub member_ids: Vec<String>,
}

/// For a cluster exceeding `max_size` members with coherence below
/// `min_coherence`, re-run DBSCAN on its members with a tighter
/// `epsilon=0.2, minPoints=3` and derive sub-cluster ids from the parent
/// (spec §4.7). Returns `None` if the cluster doesn't qualify for
/// splitting.
pub fn split_large_cluster(parent_id_numeric: u64, cluster: &Cluster, max_size: usize, min_coherence: f64) -> Option<Vec<Split>> {
    if cluster.members.len() <= max_size {
        return None;
    }
    let embeddings: Vec<Vec<f32>> = cluster.members.iter().map(|(_, e)| e.clone()).collect();
    if coherence(&embeddings) >= min_coherence {
        return None;
    }

    let assignment = dbscan(&embeddings, 0.2, 3);
    let groups = group_clusters(&assignment, 2);

    Some(
        groups
            .into_iter()
            .enumerate()
            .map(|(k, indices)| Split {
                sub_id: format!("{}", parent_id_numeric * 1000 + k as u64),
                member_ids: indices.into_iter().map(|i| cluster.members[i].0.clone()).collect(),
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn near_identical_centroids_merge() {
        let clusters = vec![
            Cluster { id: "a".into(), members: vec![("m1".into(), vec![1.0, 0.0]), ("m2".into(), vec![0.9, 0.1])] },
            Cluster { id: "b".into(), members: vec![("m3".into(), vec![0.95, 0.05]), ("m4".into(), vec![0.92, 0.08])] },
        ];
        let merges = merge_similar_clusters(&clusters, 0.8);
        assert_eq!(merges.len(), 1);
        assert_eq!(merges[0].into, "a");
        assert_eq!(merges[0].from, "b");
    }

    #[test]
    fn dissimilar_clusters_do_not_merge() {
        let clusters = vec![
            Cluster { id: "a".into(), members: vec![("m1".into(), vec![1.0, 0.0])] },
            Cluster { id: "b".into(), members: vec![("m2".into(), vec![0.0, 1.0])] },
        ];
        assert!(merge_similar_clusters(&clusters, 0.8).is_empty());
    }

    #[test]
    fn small_cluster_is_not_split() {
        let cluster = Cluster { id: "a".into(), members: vec![("m1".into(), vec![1.0, 0.0])] };
        assert!(split_large_cluster(1, &cluster, 100, 0.5).is_none());
    }
}
