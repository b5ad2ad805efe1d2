use crate::config::load_config;
use crate::layout_dump::write_layout_dump;
use crate::logging::init_logging;
use crate::render::{render_svg, write_output_svg};
use crate::{RenderOptions, compute_layout};
use anyhow::Result;
use clap::{ArgAction, Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "cpack",
    version,
    about = "Circle-packing diagrams from CSV hierarchies"
)]
pub struct Args {
    /// Input CSV file with `id` and `value` columns, or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON or JSON5 file (theme, themeVariables, pack, render)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Width (default 960, or the config file's `render.width`)
    #[arg(short = 'w', long = "width")]
    pub width: Option<f64>,

    /// Height (default 960, or the config file's `render.height`)
    #[arg(short = 'H', long = "height")]
    pub height: Option<f64>,

    /// Gap between sibling circles and around children
    #[arg(short = 'p', long = "padding")]
    pub padding: Option<f64>,

    /// Path separator inside ids
    #[arg(long = "separator")]
    pub separator: Option<char>,

    /// Write the computed geometry as JSON
    #[arg(long = "dumpLayout")]
    pub dump_layout: Option<PathBuf>,

    /// Raise the log level (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let options = resolve_options(&args)?;
    let input = read_input(args.input.as_deref())?;
    let tree = compute_layout(&input, &options)?;

    if let Some(path) = args.dump_layout.as_deref() {
        write_layout_dump(path, &tree, options.render.width, options.render.height)?;
        info!(path = %path.display(), "wrote layout dump");
    }

    let svg = render_svg(&tree, &options.theme, &options.layout, &options.render);
    match args.output_format {
        OutputFormat::Svg => {
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            write_png(&svg, &output, &options)?;
        }
    }
    if let Some(path) = args.output.as_deref() {
        info!(path = %path.display(), nodes = tree.len(), "wrote diagram");
    }
    Ok(())
}

/// Config file values first, then command-line overrides.
fn resolve_options(args: &Args) -> Result<RenderOptions> {
    let mut options = RenderOptions::from(load_config(args.config.as_deref())?);
    if let Some(width) = args.width {
        options.render.width = width;
    }
    if let Some(height) = args.height {
        options.render.height = height;
    }
    if let Some(padding) = args.padding {
        options.layout.padding = padding;
    }
    if let Some(separator) = args.separator {
        options.layout.separator = separator;
    }
    Ok(options)
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, options: &RenderOptions) -> Result<()> {
    crate::render::write_output_png(svg, output, &options.render)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _options: &RenderOptions) -> Result<()> {
    Err(anyhow::anyhow!(
        "PNG output requires the `png` feature"
    ))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return Ok(std::fs::read_to_string(path)?);
        }
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!(
        "Output path required for {} output",
        ext
    ))
}
