#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod hierarchy;
pub mod ir;
pub mod layout;
pub mod layout_dump;
#[cfg(feature = "cli")]
pub mod logging;
pub mod parser;
pub mod render;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig, load_config};
pub use error::{Error, HierarchyError, LayoutError, ParseError};
pub use hierarchy::{HierarchyConfig, build};
pub use ir::{Hierarchy, Node, NodeIndex, Record};
pub use layout::{Circle, PackOptions, pack};
pub use parser::{ParserConfig, parse_records};
pub use render::render_svg;
pub use theme::Theme;

/// Everything the pipeline needs besides the input table.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::magma()
    }
}

impl RenderOptions {
    pub fn magma() -> Self {
        Self::with_theme(Theme::magma())
    }

    pub fn modern() -> Self {
        Self::with_theme(Theme::modern())
    }

    fn with_theme(theme: Theme) -> Self {
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

    pub fn pack_options(&self) -> PackOptions {
        PackOptions {
            width: self.render.width,
            height: self.render.height,
            padding: self.layout.padding,
            min_radius: self.layout.min_radius,
            inset: self.layout.inset,
        }
    }
}

impl From<Config> for RenderOptions {
    fn from(config: Config) -> Self {
        Self {
            theme: config.theme,
            layout: config.layout,
            render: config.render,
        }
    }
}

/// Parses `input`, builds the hierarchy and packs it into the configured box.
pub fn compute_layout(input: &str, options: &RenderOptions) -> anyhow::Result<Hierarchy> {
    let parser_config = ParserConfig::with_delimiter(options.layout.delimiter)?;
    let records = parser::parse_records_with(input, &parser_config)?;
    let hierarchy_config = HierarchyConfig {
        separator: options.layout.separator,
    };
    let mut tree = hierarchy::build_with(&records, &hierarchy_config)?;
    layout::pack(&mut tree, &options.pack_options())?;
    Ok(tree)
}

pub fn render_with_options(input: &str, options: RenderOptions) -> anyhow::Result<String> {
    let tree = compute_layout(input, &options)?;
    Ok(render_svg(
        &tree,
        &options.theme,
        &options.layout,
        &options.render,
    ))
}
