//! `graphSearch` (spec §4.8): seed with `search`, then breadth-expand over
//! relations and parent links, attaching `relationships` metadata to each
//! node. Distinct from C9's generic bounded traversal — this one always
//! starts from a semantic search and expands in both directions over both
//! edge kinds without a type/tag filter.

use std::collections::{HashSet, VecDeque};

use recall_core::errors::RecallResult;
use recall_core::memory::RelationType;
use uuid::Uuid;

use crate::dto::{GraphSearchInput, GraphSearchNode, RelationshipRef, SearchInput};
use crate::engine::MemoryEngine;

impl MemoryEngine {
    pub fn graph_search(&self, input: GraphSearchInput) -> RecallResult<Vec<GraphSearchNode>> {
        let depth = input.depth.clamp(1, 3);
        let seed = self.search(SearchInput {
            user_context: input.user_context.clone(),
            query: input.query,
            memory_type: input.memory_type,
            tags: input.tags,
            threshold: input.threshold,
            limit: input.limit,
        })?;

        let mut visited: HashSet<Uuid> = HashSet::new();
        let mut queue: VecDeque<(Uuid, u32)> = VecDeque::new();
        let mut out = Vec::new();

        for hit in &seed {
            if visited.insert(hit.memory.id) {
                queue.push_back((hit.memory.id, 0));
            }
        }

        while let Some((id, node_depth)) = queue.pop_front() {
            let Some(memory) = self.store.get(&input.user_context, id)? else { continue };

            let outgoing = self.store.outgoing_relations(id)?;
            let incoming = self.store.incoming_relations(id)?;
            let children = self.store.children_of(&input.user_context, id)?;
            let parent = self.store.parent_of(&input.user_context, id)?;

            let mut relationships = Vec::new();
            for rel in &outgoing {
                relationships.push(RelationshipRef { related_id: rel.to_memory_id, relation_type: rel.relation_type, strength: rel.strength });
            }
            for rel in &incoming {
                relationships.push(RelationshipRef { related_id: rel.from_memory_id, relation_type: rel.relation_type, strength: rel.strength });
            }
            for child in &children {
                relationships.push(RelationshipRef { related_id: child.id, relation_type: RelationType::PartOf, strength: 1.0 });
            }
            if let Some(parent) = &parent {
                relationships.push(RelationshipRef { related_id: parent.id, relation_type: RelationType::Contains, strength: 1.0 });
            }

            if node_depth < depth {
                for rel in outgoing.iter().map(|r| r.to_memory_id).chain(incoming.iter().map(|r| r.from_memory_id)) {
                    if visited.insert(rel) {
                        queue.push_back((rel, node_depth + 1));
                    }
                }
                for child in &children {
                    if visited.insert(child.id) {
                        queue.push_back((child.id, node_depth + 1));
                    }
                }
                if let Some(parent) = &parent {
                    if visited.insert(parent.id) {
                        queue.push_back((parent.id, node_depth + 1));
                    }
                }
            }

            out.push(GraphSearchNode { memory, depth: node_depth, relationships });
        }

        Ok(out)
    }
}
