use crate::ir::Hierarchy;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub width: f64,
    pub height: f64,
    pub nodes: Vec<NodeDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub parent: Option<String>,
    pub depth: usize,
    pub value: Option<f64>,
    pub aggregate: f64,
    pub x: f64,
    pub y: f64,
    pub r: f64,
    pub leaf: bool,
}

impl LayoutDump {
    /// Nodes are listed breadth-first from the root.
    pub fn from_hierarchy(tree: &Hierarchy, width: f64, height: f64) -> Self {
        let nodes = tree
            .descendants()
            .into_iter()
            .map(|index| {
                let node = &tree[index];
                NodeDump {
                    id: node.id.clone(),
                    parent: node.parent.map(|parent| tree[parent].id.clone()),
                    depth: node.depth,
                    value: node.value,
                    aggregate: node.aggregate,
                    x: node.x,
                    y: node.y,
                    r: node.r,
                    leaf: node.is_leaf(),
                }
            })
            .collect();

        LayoutDump {
            width,
            height,
            nodes,
        }
    }
}

pub fn write_layout_dump(
    path: &Path,
    tree: &Hierarchy,
    width: f64,
    height: f64,
) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_hierarchy(tree, width, height);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::build;
    use crate::ir::Record;
    use crate::layout::{PackOptions, pack};

    #[test]
    fn dump_lists_every_node_with_parent_links() {
        let records = vec![
            Record::new("root", None),
            Record::new("root.a", Some(4.0)),
            Record::new("root.b", Some(1.0)),
        ];
        let mut tree = build(&records).unwrap();
        pack(&mut tree, &PackOptions::new(200.0, 200.0, 0.0)).unwrap();

        let dump = LayoutDump::from_hierarchy(&tree, 200.0, 200.0);
        assert_eq!(dump.nodes.len(), 3);
        assert_eq!(dump.nodes[0].id, "root");
        assert!(dump.nodes[0].parent.is_none());
        assert!(!dump.nodes[0].leaf);
        assert_eq!(dump.nodes[1].id, "root.a");
        assert_eq!(dump.nodes[1].parent.as_deref(), Some("root"));
        assert_eq!(dump.nodes[1].aggregate, 4.0);

        let json = serde_json::to_value(&dump).unwrap();
        assert_eq!(json["width"], 200.0);
        assert_eq!(json["nodes"][2]["leaf"], true);
        assert!(json["nodes"][0]["value"].is_null());
    }
}
