//! Incremental DBSCAN (spec §4.7): re-run DBSCAN on `existing ∪ new`,
//! reconstruct the previous `clusterId` assignments where a resulting
//! cluster still overlaps one, and only emit the assignments for the
//! `new` points — existing points keep whatever id they already had on
//! disk unless their cluster was dissolved.

use std::collections::HashMap;

use crate::dbscan::dbscan;

pub struct ExistingPoint {
    pub id: String,
    pub cluster_id: Option<String>,
    pub embedding: Vec<f32>,
}

pub struct NewPoint {
    pub id: String,
    pub embedding: Vec<f32>,
}

/// Cluster id assigned to a new point, or `None` if it landed in noise.
pub struct NewAssignment {
    pub id: String,
    pub cluster_id: Option<String>,
}

/// Runs DBSCAN over `existing` plus `new`, and returns only the new
/// points' resulting assignments. A DBSCAN-produced group reuses the most
/// common pre-existing `cluster_id` among its existing members (ties break
/// on first-seen); a group with no existing members, or whose existing
/// members had no prior id, gets a fresh id from `next_id`.
pub fn incremental_dbscan(
    existing: &[ExistingPoint],
    new: &[NewPoint],
    epsilon: f64,
    min_points: usize,
    min_cluster_size: usize,
    mut next_id: impl FnMut() -> String,
) -> Vec<NewAssignment> {
    let total = existing.len() + new.len();
    let mut points = Vec::with_capacity(total);
    for p in existing {
        points.push(p.embedding.clone());
    }
    for p in new {
        points.push(p.embedding.clone());
    }

    let labels = dbscan(&points, epsilon, min_points);

    let mut groups: HashMap<usize, Vec<usize>> = HashMap::new();
    for (idx, label) in labels.iter().enumerate() {
        if let Some(c) = label {
            groups.entry(*c).or_default().push(idx);
        }
    }

    let mut group_ids: HashMap<usize, Option<String>> = HashMap::new();
    for (group_idx, members) in &groups {
        if members.len() < min_cluster_size {
            group_ids.insert(*group_idx, None);
            continue;
        }
        let mut counts: HashMap<String, usize> = HashMap::new();
        for &m in members {
            if m < existing.len() {
                if let Some(cid) = &existing[m].cluster_id {
                    *counts.entry(cid.clone()).or_insert(0) += 1;
                }
            }
        }
        let reused = counts.into_iter().max_by_key(|(_, n)| *n).map(|(id, _)| id);
        let assigned = reused.unwrap_or_else(&mut next_id);
        group_ids.insert(*group_idx, Some(assigned));
    }

    new.iter()
        .enumerate()
        .map(|(i, p)| {
            let global_idx = existing.len() + i;
            let cluster_id = labels[global_idx].and_then(|g| group_ids.get(&g).cloned().flatten());
            NewAssignment { id: p.id.clone(), cluster_id }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_point_joins_existing_cluster_id() {
        let existing = vec![
            ExistingPoint { id: "a".into(), cluster_id: Some("clu-1".into()), embedding: vec![1.0, 0.0] },
            ExistingPoint { id: "b".into(), cluster_id: Some("clu-1".into()), embedding: vec![0.99, 0.01] },
        ];
        let new = vec![NewPoint { id: "c".into(), embedding: vec![0.98, 0.02] }];
        let mut counter = 0;
        let out = incremental_dbscan(&existing, &new, 0.05, 2, 2, || {
            counter += 1;
            format!("clu-new-{counter}")
        });
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].cluster_id.as_deref(), Some("clu-1"));
    }

    #[test]
    fn isolated_new_point_is_noise() {
        let existing = vec![
            ExistingPoint { id: "a".into(), cluster_id: Some("clu-1".into()), embedding: vec![1.0, 0.0] },
            ExistingPoint { id: "b".into(), cluster_id: Some("clu-1".into()), embedding: vec![0.99, 0.01] },
        ];
        let new = vec![NewPoint { id: "c".into(), embedding: vec![-1.0, -1.0] }];
        let out = incremental_dbscan(&existing, &new, 0.05, 2, 2, || "unused".to_string());
        assert_eq!(out[0].cluster_id, None);
    }
}
