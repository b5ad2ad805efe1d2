use circle_pack_renderer::layout_dump::LayoutDump;
use circle_pack_renderer::{RenderOptions, compute_layout, render_with_options};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CirclePackOptions {
    theme: Option<String>,
    width: Option<f64>,
    height: Option<f64>,
    padding: Option<f64>,
    min_radius: Option<f64>,
    separator: Option<char>,
    font_family: Option<String>,
    font_size: Option<f64>,
}

fn build_render_options(options: CirclePackOptions) -> RenderOptions {
    let mut render_options = if options.theme.as_deref() == Some("modern") {
        RenderOptions::modern()
    } else {
        RenderOptions::magma()
    };

    if let Some(width) = options.width {
        render_options.render.width = width;
    }
    if let Some(height) = options.height {
        render_options.render.height = height;
    }
    if let Some(padding) = options.padding {
        render_options.layout.padding = padding;
    }
    if let Some(min_radius) = options.min_radius {
        render_options.layout.min_radius = min_radius;
    }
    if let Some(separator) = options.separator {
        render_options.layout.separator = separator;
    }
    if let Some(font_family) = options.font_family {
        render_options.theme.font_family = font_family;
    }
    if let Some(font_size) = options.font_size {
        render_options.theme.font_size = font_size;
    }

    render_options
}

fn parse_options(options_json: Option<String>) -> Result<RenderOptions, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<CirclePackOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        CirclePackOptions::default()
    };
    Ok(build_render_options(options))
}

fn to_js(error: anyhow::Error) -> JsValue {
    JsValue::from_str(&error.to_string())
}

#[wasm_bindgen]
pub fn render_circle_pack_svg(csv: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let render_options = parse_options(options_json)?;
    render_with_options(csv, render_options).map_err(to_js)
}

/// Packed geometry as the JSON layout dump.
#[wasm_bindgen]
pub fn circle_pack_layout_json(csv: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let render_options = parse_options(options_json)?;
    let tree = compute_layout(csv, &render_options).map_err(to_js)?;
    let dump = LayoutDump::from_hierarchy(
        &tree,
        render_options.render.width,
        render_options.render.height,
    );
    serde_json::to_string(&dump).map_err(|error| JsValue::from_str(&error.to_string()))
}

/// Ids from `id` up to the root, for hosts that highlight the hovered chain
/// themselves.
#[wasm_bindgen]
pub fn ancestor_ids(csv: &str, options_json: Option<String>, id: &str) -> Result<String, JsValue> {
    let render_options = parse_options(options_json)?;
    let tree = compute_layout(csv, &render_options).map_err(to_js)?;
    let ids = tree
        .ancestor_ids(id)
        .ok_or_else(|| JsValue::from_str(&format!("unknown id `{id}`")))?;
    serde_json::to_string(&ids).map_err(|error| JsValue::from_str(&error.to_string()))
}
