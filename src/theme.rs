use serde::{Deserialize, Serialize};

/// Sampled stops of the magma colour map, dark to light.
const MAGMA_STOPS: [&str; 11] = [
    "#000004", "#140e36", "#3b0f70", "#641a80", "#8c2981", "#b73779", "#de4968", "#f7705c",
    "#fe9f6d", "#fecf92", "#fcfdbf",
];

const BLUES_STOPS: [&str; 9] = [
    "#08306b", "#08519c", "#2171b5", "#4292c6", "#6baed6", "#9ecae1", "#c6dbef", "#deebf7",
    "#f7fbff",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f64,
    pub text_color: String,
    pub background: String,
    pub hover_stroke: String,
    pub hover_stroke_width: f64,
    /// Sequential ramp sampled by node depth.
    pub color_stops: Vec<String>,
    /// Depths mapped to the first and last stop.
    pub color_domain: [f64; 2],
}

impl Theme {
    pub fn magma() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            font_size: 10.0,
            text_color: "#000000".to_string(),
            background: "#FFFFFF".to_string(),
            hover_stroke: "#000000".to_string(),
            hover_stroke_width: 1.2,
            color_stops: MAGMA_STOPS.iter().map(|c| c.to_string()).collect(),
            color_domain: [-4.0, 4.0],
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 11.0,
            text_color: "#1C2430".to_string(),
            background: "#FFFFFF".to_string(),
            hover_stroke: "#1C2430".to_string(),
            hover_stroke_width: 1.5,
            color_stops: BLUES_STOPS.iter().map(|c| c.to_string()).collect(),
            color_domain: [-1.0, 7.0],
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "magma" | "default" => Some(Self::magma()),
            "modern" | "blues" => Some(Self::modern()),
            _ => None,
        }
    }

    /// Fill colour for a node at `depth`.
    pub fn depth_color(&self, depth: usize) -> String {
        let [lo, hi] = self.color_domain;
        let t = if hi == lo {
            0.5
        } else {
            ((depth as f64 - lo) / (hi - lo)).clamp(0.0, 1.0)
        };
        sample_ramp(&self.color_stops, t).unwrap_or_else(|| self.background.clone())
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::magma()
    }
}

/// Linear RGB interpolation between evenly spaced stops; `None` if a stop
/// is not a `#rrggbb` colour or there are no stops.
fn sample_ramp(stops: &[String], t: f64) -> Option<String> {
    match stops {
        [] => None,
        [only] => parse_hex_color(only).map(format_hex),
        _ => {
            let scaled = t * (stops.len() - 1) as f64;
            let idx = (scaled.floor() as usize).min(stops.len() - 2);
            let frac = scaled - idx as f64;
            let a = parse_hex_color(&stops[idx])?;
            let b = parse_hex_color(&stops[idx + 1])?;
            let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * frac).round() as u8;
            Some(format_hex((mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))))
        }
    }
}

pub fn parse_hex_color(input: &str) -> Option<(u8, u8, u8)> {
    let hex = input.trim().strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => return None,
    };
    let r = u8::from_str_radix(&expanded[0..2], 16).ok()?;
    let g = u8::from_str_radix(&expanded[2..4], 16).ok()?;
    let b = u8::from_str_radix(&expanded[4..6], 16).ok()?;
    Some((r, g, b))
}

fn format_hex((r, g, b): (u8, u8, u8)) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}
