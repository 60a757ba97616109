//! Bounded BFS/DFS traversal over `memory_relations` and optional
//! parent/child links (spec §4.9). Grounded in the teacher's
//! `cortex-causal::traversal` module family — `neighbors`/`bidirectional`
//! gather outgoing-then-incoming-then-parent-link neighbors the same way,
//! generalized here to arbitrary depth with a work deque instead of a
//! single-hop scan.

use std::collections::{HashSet, VecDeque};
use std::time::{Duration, Instant};

use recall_core::errors::RecallResult;
use recall_core::memory::{Memory, MemoryType, RelationType};
use recall_core::traits::MemoryStore;
use uuid::Uuid;

use recall_core::constants::{DEFAULT_TRAVERSAL_TIMEOUT_MS, MAX_TRAVERSAL_DEPTH, MAX_TRAVERSAL_NODES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Bfs,
    Dfs,
}

#[derive(Debug, Clone)]
pub struct TraverseOptions {
    pub start_id: Uuid,
    pub user_context: String,
    pub algorithm: Algorithm,
    pub max_depth: u32,
    pub max_nodes: u32,
    pub relation_types: Option<Vec<RelationType>>,
    pub memory_types: Option<Vec<MemoryType>>,
    pub tags: Vec<String>,
    pub include_parent_links: bool,
    pub timeout_ms: u64,
}

impl Default for TraverseOptions {
    fn default() -> Self {
        Self {
            start_id: Uuid::nil(),
            user_context: String::new(),
            algorithm: Algorithm::Bfs,
            max_depth: 3,
            max_nodes: 100,
            relation_types: None,
            memory_types: None,
            tags: Vec::new(),
            include_parent_links: false,
            timeout_ms: DEFAULT_TRAVERSAL_TIMEOUT_MS,
        }
    }
}

impl TraverseOptions {
    pub fn clamp(mut self) -> Self {
        self.max_depth = self.max_depth.min(MAX_TRAVERSAL_DEPTH);
        self.max_nodes = self.max_nodes.min(MAX_TRAVERSAL_NODES);
        self
    }
}

#[derive(Debug, Clone)]
pub struct TraversedNode {
    pub memory: Memory,
    pub depth: u32,
    pub path: Vec<Uuid>,
    pub relation_from_parent: Option<String>,
}

#[derive(Debug, Default)]
pub struct TraverseResult {
    pub nodes: Vec<TraversedNode>,
    pub truncated_by_timeout: bool,
}

struct WorkItem {
    id: Uuid,
    depth: u32,
    path: Vec<Uuid>,
    relation: Option<String>,
}

fn matches_filters(memory: &Memory, opts: &TraverseOptions) -> bool {
    if let Some(types) = &opts.memory_types {
        if !types.contains(&memory.memory_type) {
            return false;
        }
    }
    if !opts.tags.is_empty() && !memory.tags.iter().any(|t| opts.tags.contains(t)) {
        return false;
    }
    true
}

/// Bounded traversal per spec §4.9: a BFS/DFS work deque over
/// `memory_relations` (both directions) plus optional parent/child links,
/// stopping at `max_depth`/`max_nodes`/`timeout_ms`. Missing start or a
/// start outside `user_context` yields an empty result, never an error.
pub fn traverse(store: &dyn MemoryStore, opts: &TraverseOptions) -> RecallResult<TraverseResult> {
    let opts = opts.clone().clamp();
    let deadline = Instant::now() + Duration::from_millis(opts.timeout_ms);

    let mut result = TraverseResult::default();
    let mut visited: HashSet<Uuid> = HashSet::new();
    let mut deque: VecDeque<WorkItem> = VecDeque::new();
    deque.push_back(WorkItem { id: opts.start_id, depth: 0, path: Vec::new(), relation: None });

    while let Some(item) = pop(&mut deque, opts.algorithm) {
        if result.nodes.len() as u32 >= opts.max_nodes {
            break;
        }
        if Instant::now() >= deadline {
            result.truncated_by_timeout = true;
            break;
        }
        if item.depth > opts.max_depth || visited.contains(&item.id) {
            continue;
        }
        visited.insert(item.id);

        let Some(memory) = store.get(&opts.user_context, item.id)? else {
            continue;
        };
        if !matches_filters(&memory, &opts) {
            continue;
        }

        let mut path = item.path.clone();
        path.push(item.id);
        result.nodes.push(TraversedNode {
            memory: memory.clone(),
            depth: item.depth,
            path,
            relation_from_parent: item.relation.clone(),
        });

        if item.depth < opts.max_depth {
            enqueue_neighbors(store, &opts, &item, &visited, &mut deque)?;
        }
    }

    Ok(result)
}

fn pop(deque: &mut VecDeque<WorkItem>, algorithm: Algorithm) -> Option<WorkItem> {
    match algorithm {
        Algorithm::Bfs => deque.pop_front(),
        Algorithm::Dfs => deque.pop_back(),
    }
}

fn enqueue_neighbors(
    store: &dyn MemoryStore,
    opts: &TraverseOptions,
    item: &WorkItem,
    visited: &HashSet<Uuid>,
    deque: &mut VecDeque<WorkItem>,
) -> RecallResult<()> {
    let mut path = item.path.clone();
    path.push(item.id);

    let outgoing = store.outgoing_relations(item.id)?;
    for rel in outgoing {
        if relation_allowed(&opts.relation_types, rel.relation_type) && !visited.contains(&rel.to_memory_id) {
            deque.push_back(WorkItem {
                id: rel.to_memory_id,
                depth: item.depth + 1,
                path: path.clone(),
                relation: Some(relation_label(rel.relation_type)),
            });
        }
    }

    let incoming = store.incoming_relations(item.id)?;
    for rel in incoming {
        if relation_allowed(&opts.relation_types, rel.relation_type) && !visited.contains(&rel.from_memory_id) {
            deque.push_back(WorkItem {
                id: rel.from_memory_id,
                depth: item.depth + 1,
                path: path.clone(),
                relation: Some(relation_label(rel.relation_type)),
            });
        }
    }

    if opts.include_parent_links {
        for child in store.children_of(&opts.user_context, item.id)? {
            if !visited.contains(&child.id) {
                deque.push_back(WorkItem {
                    id: child.id,
                    depth: item.depth + 1,
                    path: path.clone(),
                    relation: Some("parent_of".to_string()),
                });
            }
        }
        if let Some(parent) = store.parent_of(&opts.user_context, item.id)? {
            if !visited.contains(&parent.id) {
                deque.push_back(WorkItem {
                    id: parent.id,
                    depth: item.depth + 1,
                    path: path.clone(),
                    relation: Some("child_of".to_string()),
                });
            }
        }
    }

    Ok(())
}

fn relation_allowed(filter: &Option<Vec<RelationType>>, t: RelationType) -> bool {
    filter.as_ref().map(|types| types.contains(&t)).unwrap_or(true)
}

fn relation_label(t: RelationType) -> String {
    format!("{t:?}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use recall_store::SqliteStore;
    use serde_json::json;

    fn insert_memory(store: &SqliteStore, ctx: &str, tags: Vec<String>) -> Memory {
        let now = chrono::Utc::now();
        let content = json!({"text": format!("m-{}", Uuid::new_v4())});
        let m = Memory {
            id: Uuid::new_v4(),
            user_context: ctx.to_string(),
            content_hash: Memory::compute_content_hash(&content),
            content,
            embedding: None,
            embedding_dimension: None,
            tags,
            memory_type: MemoryType::Fact,
            source: "test".into(),
            confidence: 0.5,
            importance_score: 0.5,
            similarity_threshold: 0.7,
            decay_rate: 0.01,
            access_count: 0,
            parent_id: None,
            relation_type: None,
            cluster_id: None,
            created_at: now,
            updated_at: now,
            accessed_at: now,
            deleted_at: None,
            last_decay_update: now,
            state: recall_core::memory::MemoryState::Active,
            decay_score: 1.0,
            is_compressed: false,
            metadata: json!({}),
        };
        store.insert(&m).unwrap();
        m
    }

    #[test]
    fn bfs_visits_in_non_decreasing_depth_order() {
        let store = SqliteStore::open_in_memory().unwrap();
        let a = insert_memory(&store, "ctx", vec![]);
        let b = insert_memory(&store, "ctx", vec![]);
        let c = insert_memory(&store, "ctx", vec![]);
        store.upsert_relation(a.id, b.id, RelationType::References, 0.5).unwrap();
        store.upsert_relation(b.id, c.id, RelationType::References, 0.5).unwrap();

        let opts = TraverseOptions { start_id: a.id, user_context: "ctx".into(), max_depth: 5, ..Default::default() };
        let result = traverse(&store, &opts).unwrap();
        let depths: Vec<u32> = result.nodes.iter().map(|n| n.depth).collect();
        assert_eq!(depths, vec![0, 1, 2]);
    }

    #[test]
    fn missing_start_yields_empty_result_not_error() {
        let store = SqliteStore::open_in_memory().unwrap();
        let opts = TraverseOptions { start_id: Uuid::new_v4(), user_context: "ctx".into(), ..Default::default() };
        let result = traverse(&store, &opts).unwrap();
        assert!(result.nodes.is_empty());
    }

    #[test]
    fn cross_context_start_yields_empty_result() {
        let store = SqliteStore::open_in_memory().unwrap();
        let a = insert_memory(&store, "ctx-a", vec![]);
        let opts = TraverseOptions { start_id: a.id, user_context: "ctx-b".into(), ..Default::default() };
        let result = traverse(&store, &opts).unwrap();
        assert!(result.nodes.is_empty());
    }
}
