use std::cmp::Ordering;
use std::collections::HashMap;

use crate::error::HierarchyError;
use crate::ir::{Hierarchy, Node, NodeIndex, Record};
use tracing::debug;

pub const DEFAULT_SEPARATOR: char = '.';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HierarchyConfig {
    /// Splits an id into its parent path and last segment.
    pub separator: char,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
        }
    }
}

/// Builds a tree from records whose parent is the id prefix before the last
/// `.`; see [`build_with`].
pub fn build(records: &[Record]) -> Result<Hierarchy, HierarchyError> {
    build_with(records, &HierarchyConfig::default())
}

/// Stratifies `records` by id prefix, sums values bottom-up and sorts each
/// sibling list by descending aggregate (stable on ties).
pub fn build_with(
    records: &[Record],
    config: &HierarchyConfig,
) -> Result<Hierarchy, HierarchyError> {
    let separator = config.separator;
    let mut by_id: HashMap<String, NodeIndex> = HashMap::with_capacity(records.len());
    for (idx, record) in records.iter().enumerate() {
        if by_id.insert(record.id.clone(), NodeIndex(idx)).is_some() {
            return Err(HierarchyError::DuplicateId {
                id: record.id.clone(),
            });
        }
    }

    let parent_ids: Vec<Option<&str>> = records
        .iter()
        .map(|record| parent_id(&record.id, separator))
        .collect();
    let root = select_root(records, &parent_ids, &by_id)?;

    let mut nodes: Vec<Node> = records
        .iter()
        .map(|record| Node::new(record.id.clone(), record.value))
        .collect();
    for (idx, parent) in parent_ids.iter().enumerate() {
        if idx == root.0 {
            continue;
        }
        // select_root already rejected every unresolved parent except the root's.
        let Some(parent) = parent.and_then(|id| by_id.get(id)).copied() else {
            continue;
        };
        nodes[idx].parent = Some(parent);
        nodes[parent.0].children.push(NodeIndex(idx));
    }

    let mut tree = Hierarchy {
        nodes,
        root,
        by_id,
        packed: false,
    };
    sum_aggregates(&mut tree);
    sort_children(&mut tree);
    assign_depths(&mut tree);

    debug!(
        nodes = tree.len(),
        height = tree.height(),
        root = %tree.root_node().id,
        total = tree.root_node().aggregate,
        "built hierarchy"
    );
    Ok(tree)
}

/// The id up to (not including) the last separator, or `None` when the id
/// has no separator.
pub fn parent_id(id: &str, separator: char) -> Option<&str> {
    id.rfind(separator).map(|pos| &id[..pos])
}

fn select_root(
    records: &[Record],
    parent_ids: &[Option<&str>],
    by_id: &HashMap<String, NodeIndex>,
) -> Result<NodeIndex, HierarchyError> {
    let top_level: Vec<usize> = (0..records.len())
        .filter(|&idx| parent_ids[idx].is_none())
        .collect();
    let unresolved: Vec<usize> = (0..records.len())
        .filter(|&idx| {
            parent_ids[idx]
                .map(|parent| !by_id.contains_key(parent))
                .unwrap_or(false)
        })
        .collect();

    match top_level.as_slice() {
        [root] => {
            if let Some(&orphan) = unresolved.first() {
                return Err(HierarchyError::OrphanNode {
                    id: records[orphan].id.clone(),
                    parent_id: parent_ids[orphan].unwrap_or_default().to_string(),
                });
            }
            Ok(NodeIndex(*root))
        }
        [] => match unresolved.as_slice() {
            [root] => Ok(NodeIndex(*root)),
            [] => Err(HierarchyError::NoRoot),
            many => Err(HierarchyError::MultipleRoots {
                ids: many.iter().map(|&idx| records[idx].id.clone()).collect(),
            }),
        },
        many => Err(HierarchyError::MultipleRoots {
            ids: many.iter().map(|&idx| records[idx].id.clone()).collect(),
        }),
    }
}

fn sum_aggregates(tree: &mut Hierarchy) {
    for index in tree.post_order() {
        let children_total: f64 = tree.nodes[index.0]
            .children
            .iter()
            .map(|child| tree.nodes[child.0].aggregate)
            .sum();
        let node = &mut tree.nodes[index.0];
        node.aggregate = node.value.unwrap_or(0.0) + children_total;
    }
}

fn sort_children(tree: &mut Hierarchy) {
    let aggregates: Vec<f64> = tree.nodes.iter().map(|node| node.aggregate).collect();
    for node in &mut tree.nodes {
        // Children were pushed in input order, so a stable sort keeps ties in
        // input order.
        node.children.sort_by(|a, b| {
            aggregates[b.0]
                .partial_cmp(&aggregates[a.0])
                .unwrap_or(Ordering::Equal)
        });
    }
}

fn assign_depths(tree: &mut Hierarchy) {
    for index in tree.descendants() {
        let depth = tree.nodes[index.0]
            .parent
            .map(|parent| tree.nodes[parent.0].depth + 1)
            .unwrap_or(0);
        tree.nodes[index.0].depth = depth;
    }
}
