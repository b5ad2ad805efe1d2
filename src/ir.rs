use std::collections::{HashMap, VecDeque};

/// One parsed CSV row.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: String,
    pub value: Option<f64>,
}

impl Record {
    pub fn new(id: impl Into<String>, value: Option<f64>) -> Self {
        Self {
            id: id.into(),
            value,
        }
    }
}

/// Index of a node inside its [`Hierarchy`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub(crate) usize);

impl NodeIndex {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub id: String,
    /// Own value from the input row; `None` for placeholder rows.
    pub value: Option<f64>,
    /// Own value plus the aggregate of every child.
    pub aggregate: f64,
    pub depth: usize,
    pub parent: Option<NodeIndex>,
    pub children: Vec<NodeIndex>,
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

impl Node {
    pub(crate) fn new(id: String, value: Option<f64>) -> Self {
        Self {
            id,
            value,
            aggregate: 0.0,
            depth: 0,
            parent: None,
            children: Vec::new(),
            x: 0.0,
            y: 0.0,
            r: 0.0,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// A rooted tree stored as an arena. Parents are back-references by index;
/// the arena owns every node.
#[derive(Debug, Clone)]
pub struct Hierarchy {
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: NodeIndex,
    pub(crate) by_id: HashMap<String, NodeIndex>,
    pub(crate) packed: bool,
}

impl Hierarchy {
    pub fn root(&self) -> NodeIndex {
        self.root
    }

    pub fn root_node(&self) -> &Node {
        &self.nodes[self.root.0]
    }

    pub fn node(&self, index: NodeIndex) -> &Node {
        &self.nodes[index.0]
    }

    pub fn find(&self, id: &str) -> Option<NodeIndex> {
        self.by_id.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false` for a tree returned by [`crate::hierarchy::build`]: a
    /// successful build has at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn is_packed(&self) -> bool {
        self.packed
    }

    pub fn height(&self) -> usize {
        self.nodes.iter().map(|node| node.depth).max().unwrap_or(0)
    }

    /// Breadth-first from the root; parents always precede their children.
    pub fn descendants(&self) -> Vec<NodeIndex> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut queue = VecDeque::from([self.root]);
        while let Some(index) = queue.pop_front() {
            order.push(index);
            queue.extend(self.nodes[index.0].children.iter().copied());
        }
        order
    }

    /// Post-order: children before their parent.
    pub(crate) fn post_order(&self) -> Vec<NodeIndex> {
        let mut order = self.descendants();
        order.reverse();
        order
    }

    pub fn leaves(&self) -> Vec<NodeIndex> {
        self.descendants()
            .into_iter()
            .filter(|index| self.nodes[index.0].is_leaf())
            .collect()
    }

    /// The node itself followed by each parent up to and including the root.
    pub fn ancestors(&self, index: NodeIndex) -> Vec<NodeIndex> {
        let mut chain = vec![index];
        let mut current = self.nodes[index.0].parent;
        while let Some(parent) = current {
            chain.push(parent);
            current = self.nodes[parent.0].parent;
        }
        chain
    }

    pub fn ancestor_ids(&self, id: &str) -> Option<Vec<&str>> {
        let index = self.find(id)?;
        Some(
            self.ancestors(index)
                .into_iter()
                .map(|ancestor| self.nodes[ancestor.0].id.as_str())
                .collect(),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (NodeIndex(idx), node))
    }
}

impl std::ops::Index<NodeIndex> for Hierarchy {
    type Output = Node;

    fn index(&self, index: NodeIndex) -> &Node {
        &self.nodes[index.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::build;

    fn sample() -> Hierarchy {
        let records = vec![
            Record::new("a", None),
            Record::new("a.b", Some(3.0)),
            Record::new("a.c", None),
            Record::new("a.c.d", Some(5.0)),
        ];
        build(&records).unwrap()
    }

    #[test]
    fn ancestors_walk_to_root_inclusive() {
        let tree = sample();
        let ids = tree.ancestor_ids("a.c.d").unwrap();
        assert_eq!(ids, vec!["a.c.d", "a.c", "a"]);
        assert_eq!(tree.ancestor_ids("a").unwrap(), vec!["a"]);
        assert!(tree.ancestor_ids("missing").is_none());
    }

    #[test]
    fn descendants_are_breadth_first() {
        let tree = sample();
        let ids: Vec<&str> = tree
            .descendants()
            .into_iter()
            .map(|idx| tree[idx].id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "a.c", "a.b", "a.c.d"]);
        assert_eq!(tree.height(), 2);
    }

    #[test]
    fn leaves_are_nodes_without_children() {
        let tree = sample();
        let ids: Vec<&str> = tree
            .leaves()
            .into_iter()
            .map(|idx| tree[idx].id.as_str())
            .collect();
        assert_eq!(ids, vec!["a.b", "a.c.d"]);
    }
}
