use crate::config::{LayoutConfig, RenderConfig};
use crate::ir::{Hierarchy, NodeIndex};
use crate::layout::text::{leaf_name, line_offset, split_words};
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

/// Draws a packed hierarchy.
///
/// Each node is a `<g>` nested inside its parent's group and translated
/// relative to it, so hovering any circle also matches every ancestor group;
/// the embedded stylesheet outlines the whole chain.
pub fn render_svg(
    tree: &Hierarchy,
    theme: &Theme,
    config: &LayoutConfig,
    render: &RenderConfig,
) -> String {
    let width = render.width;
    let height = render.height;
    let mut svg = String::new();

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.push_str(&format!(
        "<style>.node:hover>circle{{stroke:{};stroke-width:{}px}}.node--leaf text{{font:{}px {};fill:{};text-anchor:middle;pointer-events:none}}</style>",
        theme.hover_stroke,
        theme.hover_stroke_width,
        theme.font_size,
        theme.font_family,
        theme.text_color
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        render.background
    ));

    write_node(&mut svg, tree, tree.root(), (0.0, 0.0), theme, config);

    svg.push_str("</svg>");
    svg
}

fn write_node(
    svg: &mut String,
    tree: &Hierarchy,
    index: NodeIndex,
    origin: (f64, f64),
    theme: &Theme,
    config: &LayoutConfig,
) {
    let node = &tree[index];
    let class = if node.is_leaf() {
        "node node--leaf"
    } else if node.depth == 0 {
        "node node--root"
    } else {
        "node"
    };
    let xml_id = xml_id(&node.id);

    svg.push_str(&format!(
        "<g class=\"{class}\" transform=\"translate({:.3},{:.3})\">",
        node.x - origin.0,
        node.y - origin.1
    ));
    svg.push_str(&format!(
        "<title>{}\n{}</title>",
        escape_xml(&node.id),
        format_count(node.aggregate)
    ));
    svg.push_str(&format!(
        "<circle id=\"node-{xml_id}\" r=\"{:.3}\" fill=\"{}\"/>",
        node.r,
        theme.depth_color(node.depth)
    ));

    if node.is_leaf() {
        svg.push_str(&format!(
            "<clipPath id=\"clip-{xml_id}\"><use xlink:href=\"#node-{xml_id}\"/></clipPath>"
        ));
        let words = split_words(leaf_name(&node.id, config.separator));
        svg.push_str(&format!("<text clip-path=\"url(#clip-{xml_id})\">"));
        for (idx, word) in words.iter().enumerate() {
            svg.push_str(&format!(
                "<tspan x=\"0\" y=\"{:.1}\">{}</tspan>",
                line_offset(idx, words.len(), theme.font_size),
                escape_xml(word)
            ));
        }
        svg.push_str("</text>");
    }

    for child in &node.children {
        write_node(svg, tree, *child, (node.x, node.y), theme, config);
    }
    svg.push_str("</g>");
}

/// Rounds to an integer and groups thousands with commas.
pub fn format_count(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Encodes an id for use inside an XML id attribute. ASCII letters, digits,
/// `.` and `-` pass through; every other character, `_` included, becomes
/// `_x{hex}_`, so distinct ids never share an encoding.
fn xml_id(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    for ch in id.chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-') {
            out.push(ch);
        } else {
            out.push_str(&format!("_x{:X}_", ch as u32));
        }
    }
    out
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = "sans-serif".to_string();
    let size = usvg::Size::from_wh(render_cfg.width as f32, render_cfg.height as f32)
        .ok_or_else(|| anyhow::anyhow!("invalid output size"))?;
    opt.default_size = size;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}
