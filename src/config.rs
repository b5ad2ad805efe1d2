use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Gap between sibling circles and between a child and its parent.
    pub padding: f64,
    /// Smallest radius a leaf is drawn with.
    pub min_radius: f64,
    /// Margin between the root circle and the edge of the drawing.
    pub inset: f64,
    /// Path separator inside ids.
    pub separator: char,
    /// Column delimiter of the input table.
    pub delimiter: char,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            padding: 3.0,
            min_radius: 1.0,
            inset: 1.0,
            separator: '.',
            delimiter: ',',
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f64,
    pub height: f64,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 960.0,
            background: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::magma();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            layout: LayoutConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<NumberOrString>,
    text_color: Option<String>,
    background: Option<String>,
    hover_stroke: Option<String>,
    hover_stroke_width: Option<NumberOrString>,
    color_stops: Option<Vec<String>>,
    color_domain: Option<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    String(String),
}

impl NumberOrString {
    fn as_f64(&self) -> Option<f64> {
        match self {
            NumberOrString::Number(val) => Some(*val),
            NumberOrString::String(val) => val.trim().trim_end_matches("px").parse::<f64>().ok(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackConfigFile {
    padding: Option<f64>,
    min_radius: Option<f64>,
    inset: Option<f64>,
    separator: Option<char>,
    delimiter: Option<char>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f64>,
    height: Option<f64>,
    background: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    pack: Option<PackConfigFile>,
    render: Option<RenderConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Overlays a camelCase JSON (or JSON5) config document on the defaults.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = match serde_json::from_str(contents) {
        Ok(parsed) => parsed,
        Err(json_err) => json5::from_str(contents)
            .map_err(|_| anyhow::anyhow!("invalid config: {json_err}"))?,
    };

    let mut config = Config::default();
    if let Some(theme_name) = parsed.theme.as_deref() {
        config.theme = Theme::by_name(theme_name)
            .ok_or_else(|| anyhow::anyhow!("unknown theme `{theme_name}`"))?;
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size.and_then(|v| v.as_f64()) {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(v) = vars.hover_stroke {
            config.theme.hover_stroke = v;
        }
        if let Some(v) = vars.hover_stroke_width.and_then(|v| v.as_f64()) {
            config.theme.hover_stroke_width = v;
        }
        if let Some(v) = vars.color_stops {
            config.theme.color_stops = v;
        }
        if let Some(v) = vars.color_domain {
            config.theme.color_domain = v;
        }
    }

    if let Some(pack) = parsed.pack {
        if let Some(v) = pack.padding {
            config.layout.padding = v;
        }
        if let Some(v) = pack.min_radius {
            config.layout.min_radius = v;
        }
        if let Some(v) = pack.inset {
            config.layout.inset = v;
        }
        if let Some(v) = pack.separator {
            config.layout.separator = v;
        }
        if let Some(v) = pack.delimiter {
            config.layout.delimiter = v;
        }
    }

    config.render.background = config.theme.background.clone();
    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
        if let Some(v) = render.background {
            config.render.background = v;
        }
    }

    Ok(config)
}
