mod enclose;
mod siblings;
pub(crate) mod text;
pub(crate) mod types;
pub use types::*;

use crate::error::LayoutError;
use crate::ir::Hierarchy;
use siblings::pack_enclose;
use tracing::debug;

/// Upper bound on refinement passes; each pass repacks the whole tree. A
/// padding that fits converges geometrically, one that does not grows
/// without bound.
const MAX_PASSES: usize = 128;
const CONVERGENCE_EPSILON: f64 = 1e-9;

/// Lays `tree` out as nested circles inside `options.width` × `options.height`.
///
/// Leaves are sized by `sqrt(aggregate)`, siblings are packed around each
/// other and every parent is the smallest circle holding its children plus
/// `padding`. The root is centred in the box with radius
/// `min(width, height) / 2 - inset`. Geometry is written into the nodes only
/// once the whole layout succeeded; a padding too large for the box and tree
/// depth is reported as [`LayoutError::PaddingDoesNotFit`].
pub fn pack(tree: &mut Hierarchy, options: &PackOptions) -> Result<(), LayoutError> {
    validate(options)?;
    let inner_w = options.width - 2.0 * options.inset;
    let inner_h = options.height - 2.0 * options.inset;
    let extent = inner_w.min(inner_h);

    let mut frame = LocalFrame::new(tree.len());
    let mut allowance = 0.0;
    let (mut floor, base_floor) = leaf_floors(tree);
    let mut passes = 0;
    let mut root_r;
    loop {
        passes += 1;
        root_r = frame.pack_pass(tree, allowance, floor);
        // scale from local units to output units
        let scale = extent / (2.0 * root_r);
        let next_allowance = options.padding / (2.0 * scale);
        let next_floor = (options.min_radius / scale).max(base_floor);
        let settled = close(next_allowance, allowance) && close(next_floor, floor);
        if settled {
            break;
        }
        if passes >= MAX_PASSES || !next_allowance.is_finite() {
            return Err(LayoutError::PaddingDoesNotFit {
                padding: options.padding,
                passes,
            });
        }
        allowance = next_allowance;
        floor = next_floor;
    }

    let scale = extent / (2.0 * root_r);
    frame.apply(tree, options.width / 2.0, options.height / 2.0, scale);
    tree.packed = true;
    debug!(
        nodes = tree.len(),
        passes,
        root_radius = tree.root_node().r,
        "packed hierarchy"
    );
    Ok(())
}

fn validate(options: &PackOptions) -> Result<(), LayoutError> {
    let dims_ok = |v: f64| v.is_finite() && v > 0.0;
    if !dims_ok(options.width) || !dims_ok(options.height) {
        return Err(LayoutError::InvalidDimensions {
            width: options.width,
            height: options.height,
        });
    }
    if !options.inset.is_finite() || options.inset < 0.0 {
        return Err(LayoutError::InvalidOption {
            name: "inset",
            value: options.inset,
        });
    }
    if options.width - 2.0 * options.inset <= 0.0 || options.height - 2.0 * options.inset <= 0.0 {
        return Err(LayoutError::InvalidDimensions {
            width: options.width,
            height: options.height,
        });
    }
    if !options.padding.is_finite() || options.padding < 0.0 {
        return Err(LayoutError::InvalidOption {
            name: "padding",
            value: options.padding,
        });
    }
    if !dims_ok(options.min_radius) {
        return Err(LayoutError::InvalidOption {
            name: "min_radius",
            value: options.min_radius,
        });
    }
    Ok(())
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= CONVERGENCE_EPSILON * a.abs().max(b.abs()).max(1.0)
}

/// Returns the first-pass leaf floor and the lower bound the floor may never
/// drop under. With at least one non-empty leaf the first pass borrows the
/// smallest non-zero leaf radius and the bound is 0. When every leaf is empty
/// the tree has no intrinsic scale, so all leaves stay at a unit radius.
fn leaf_floors(tree: &Hierarchy) -> (f64, f64) {
    let smallest = tree
        .nodes
        .iter()
        .filter(|node| node.is_leaf())
        .map(|node| node.aggregate.sqrt())
        .filter(|r| *r > 0.0)
        .fold(None, |min: Option<f64>, r| Some(min.map_or(r, |m: f64| m.min(r))));
    match smallest {
        Some(r) => (r, 0.0),
        None => (1.0, 1.0),
    }
}

/// Radii and centre offsets relative to the parent centre, in local units.
struct LocalFrame {
    radius: Vec<f64>,
    offset: Vec<(f64, f64)>,
}

impl LocalFrame {
    fn new(len: usize) -> Self {
        Self {
            radius: vec![0.0; len],
            offset: vec![(0.0, 0.0); len],
        }
    }

    /// Packs every sibling group bottom-up with children inflated by
    /// `allowance`; returns the root radius.
    fn pack_pass(&mut self, tree: &Hierarchy, allowance: f64, floor: f64) -> f64 {
        let mut circles = Vec::new();
        for index in tree.post_order() {
            let node = &tree.nodes[index.0];
            if node.is_leaf() {
                self.radius[index.0] = node.aggregate.sqrt().max(floor);
                continue;
            }
            circles.clear();
            circles.extend(
                node.children
                    .iter()
                    .map(|child| Circle::new(0.0, 0.0, self.radius[child.0] + allowance)),
            );
            let enclosing = pack_enclose(&mut circles);
            for (child, circle) in node.children.iter().zip(&circles) {
                self.offset[child.0] = (circle.x, circle.y);
            }
            self.radius[index.0] = enclosing + allowance;
        }
        self.radius[tree.root.0]
    }

    /// Writes absolute geometry, top-down from the root centre.
    fn apply(&self, tree: &mut Hierarchy, cx: f64, cy: f64, scale: f64) {
        for index in tree.descendants() {
            let (x, y) = match tree.nodes[index.0].parent {
                Some(parent) => {
                    let parent = &tree.nodes[parent.0];
                    let (dx, dy) = self.offset[index.0];
                    (parent.x + dx * scale, parent.y + dy * scale)
                }
                None => (cx, cy),
            };
            let node = &mut tree.nodes[index.0];
            node.x = x;
            node.y = y;
            node.r = self.radius[index.0] * scale;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::build;
    use crate::ir::{NodeIndex, Record};

    fn tree_from(rows: &[(&str, Option<f64>)]) -> Hierarchy {
        let records: Vec<Record> = rows.iter().map(|(id, v)| Record::new(*id, *v)).collect();
        build(&records).unwrap()
    }

    fn nested_tree() -> Hierarchy {
        tree_from(&[
            ("flare", None),
            ("flare.analytics", None),
            ("flare.analytics.cluster", None),
            ("flare.analytics.cluster.Agglomerative", Some(3938.0)),
            ("flare.analytics.cluster.Community", Some(3812.0)),
            ("flare.analytics.cluster.Hierarchical", Some(6714.0)),
            ("flare.analytics.cluster.MergeEdge", Some(743.0)),
            ("flare.analytics.graph", None),
            ("flare.analytics.graph.Betweenness", Some(3534.0)),
            ("flare.analytics.graph.LinkDistance", Some(5731.0)),
            ("flare.analytics.graph.MaxFlow", Some(7840.0)),
            ("flare.animate", None),
            ("flare.animate.Easing", Some(17010.0)),
            ("flare.animate.Pause", Some(449.0)),
            ("flare.animate.Tween", Some(6006.0)),
            ("flare.animate.Empty", Some(0.0)),
            ("flare.Solo", Some(2000.0)),
        ])
    }

    fn check_geometry(tree: &Hierarchy, padding: f64) {
        let tol = 1e-3;
        for index in tree.descendants() {
            let node = &tree[index];
            assert!(node.r.is_finite() && node.r > 0.0, "{} radius {}", node.id, node.r);
            for (i, a) in node.children.iter().enumerate() {
                let ca = &tree[*a];
                let da = (ca.x - node.x).hypot(ca.y - node.y);
                assert!(
                    da + ca.r <= node.r - padding + tol,
                    "{} escapes {} ({} + {} > {} - {padding})",
                    ca.id,
                    node.id,
                    da,
                    ca.r,
                    node.r
                );
                for b in &node.children[i + 1..] {
                    let cb = &tree[*b];
                    let d = (ca.x - cb.x).hypot(ca.y - cb.y);
                    assert!(
                        d >= ca.r + cb.r + padding - tol,
                        "{} overlaps {}",
                        ca.id,
                        cb.id
                    );
                }
            }
        }
    }

    #[test]
    fn single_leaf_fills_the_box() {
        let mut tree = tree_from(&[("root", Some(10.0))]);
        pack(&mut tree, &PackOptions::new(200.0, 200.0, 3.0)).unwrap();
        let root = tree.root_node();
        assert!((root.x - 100.0).abs() < 1e-9);
        assert!((root.y - 100.0).abs() < 1e-9);
        assert!((root.r - 99.0).abs() < 1e-9);
        assert!(tree.is_packed());
    }

    #[test]
    fn root_is_centred_in_non_square_box() {
        let mut tree = nested_tree();
        pack(&mut tree, &PackOptions::new(600.0, 400.0, 3.0)).unwrap();
        let root = tree.root_node();
        assert!((root.x - 300.0).abs() < 1e-9);
        assert!((root.y - 200.0).abs() < 1e-9);
        assert!((root.r - 199.0).abs() < 1e-6);
    }

    #[test]
    fn siblings_are_separated_and_contained() {
        let mut tree = nested_tree();
        pack(&mut tree, &PackOptions::new(800.0, 800.0, 3.0)).unwrap();
        check_geometry(&tree, 3.0);
    }

    #[test]
    fn zero_padding_packs_tangent_circles() {
        let mut tree = nested_tree();
        pack(&mut tree, &PackOptions::new(500.0, 500.0, 0.0)).unwrap();
        check_geometry(&tree, 0.0);
    }

    #[test]
    fn leaf_radius_grows_with_value() {
        let mut tree = nested_tree();
        pack(&mut tree, &PackOptions::new(800.0, 800.0, 3.0)).unwrap();
        let easing = &tree[tree.find("flare.animate.Easing").unwrap()];
        let pause = &tree[tree.find("flare.animate.Pause").unwrap()];
        let ratio = easing.r / pause.r;
        assert!((ratio - (17010.0f64 / 449.0).sqrt()).abs() < 1e-6, "{ratio}");
    }

    #[test]
    fn zero_valued_leaf_gets_minimum_radius() {
        let mut tree = nested_tree();
        let mut options = PackOptions::new(800.0, 800.0, 3.0);
        options.min_radius = 4.0;
        pack(&mut tree, &options).unwrap();
        let empty = &tree[tree.find("flare.animate.Empty").unwrap()];
        assert!(empty.r >= 4.0 - 1e-6, "radius {}", empty.r);
        check_geometry(&tree, 3.0);
    }

    #[test]
    fn all_zero_tree_still_has_visible_leaves() {
        let mut tree = tree_from(&[("r", None), ("r.a", None), ("r.b", Some(0.0)), ("r.c", None)]);
        pack(&mut tree, &PackOptions::new(300.0, 300.0, 2.0)).unwrap();
        let radii: Vec<f64> = tree.leaves().into_iter().map(|i| tree[i].r).collect();
        assert_eq!(radii.len(), 3);
        for r in &radii {
            assert!(*r > 0.0);
            assert!((r - radii[0]).abs() < 1e-9);
        }
        check_geometry(&tree, 2.0);
    }

    #[test]
    fn packing_twice_is_identical() {
        let mut first = nested_tree();
        let options = PackOptions::new(640.0, 480.0, 3.0);
        pack(&mut first, &options).unwrap();
        let snapshot: Vec<(f64, f64, f64)> = first.iter().map(|(_, n)| (n.x, n.y, n.r)).collect();

        pack(&mut first, &options).unwrap();
        let again: Vec<(f64, f64, f64)> = first.iter().map(|(_, n)| (n.x, n.y, n.r)).collect();
        assert_eq!(snapshot, again);

        let mut second = nested_tree();
        pack(&mut second, &options).unwrap();
        let other: Vec<(f64, f64, f64)> = second.iter().map(|(_, n)| (n.x, n.y, n.r)).collect();
        assert_eq!(snapshot, other);
    }

    #[test]
    fn rejects_invalid_dimensions_without_mutating() {
        let mut tree = nested_tree();
        let err = pack(&mut tree, &PackOptions::new(0.0, 100.0, 3.0)).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidDimensions { .. }));
        assert!(!tree.is_packed());
        assert!(tree.iter().all(|(_, n)| n.r == 0.0));

        assert!(matches!(
            pack(&mut tree, &PackOptions::new(100.0, -5.0, 3.0)).unwrap_err(),
            LayoutError::InvalidDimensions { .. }
        ));
        assert!(matches!(
            pack(&mut tree, &PackOptions::new(2.0, 100.0, 3.0)).unwrap_err(),
            LayoutError::InvalidDimensions { .. }
        ));
        assert!(matches!(
            pack(&mut tree, &PackOptions::new(f64::NAN, 100.0, 3.0)).unwrap_err(),
            LayoutError::InvalidDimensions { .. }
        ));
    }

    #[test]
    fn rejects_invalid_options() {
        let mut tree = nested_tree();
        let err = pack(&mut tree, &PackOptions::new(100.0, 100.0, -1.0)).unwrap_err();
        assert_eq!(
            err,
            LayoutError::InvalidOption {
                name: "padding",
                value: -1.0
            }
        );
        let mut options = PackOptions::new(100.0, 100.0, 1.0);
        options.min_radius = 0.0;
        assert!(matches!(
            pack(&mut tree, &options).unwrap_err(),
            LayoutError::InvalidOption { name: "min_radius", .. }
        ));
    }

    #[test]
    fn padding_deeper_than_the_box_is_rejected() {
        let ids: Vec<String> = (1..=20)
            .map(|depth| {
                (0..depth)
                    .map(|level| format!("n{level}"))
                    .collect::<Vec<_>>()
                    .join(".")
            })
            .collect();
        let rows: Vec<(&str, Option<f64>)> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), (i == ids.len() - 1).then_some(1.0)))
            .collect();
        let mut tree = tree_from(&rows);

        // 20 nested rings of 5px cannot fit inside a radius of 49
        let err = pack(&mut tree, &PackOptions::new(100.0, 100.0, 5.0)).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::PaddingDoesNotFit { padding, .. } if padding == 5.0
        ));
        assert!(!tree.is_packed());
        assert!(tree.iter().all(|(_, n)| n.r == 0.0));

        // the same chain fits with room to spare in a larger box
        pack(&mut tree, &PackOptions::new(400.0, 400.0, 3.0)).unwrap();
        check_geometry(&tree, 3.0);
    }

    #[test]
    fn single_child_is_concentric() {
        let mut tree = tree_from(&[("a", None), ("a.b", Some(9.0))]);
        pack(&mut tree, &PackOptions::new(100.0, 100.0, 4.0)).unwrap();
        let root = tree.root_node().clone();
        let child = &tree[NodeIndex(1)];
        assert!((child.x - root.x).abs() < 1e-9);
        assert!((child.y - root.y).abs() < 1e-9);
        assert!((root.r - child.r - 4.0).abs() < 1e-6);
    }
}
