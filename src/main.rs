use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

use signwiz::collaborators::SigningConsumer;
use signwiz::config::Config;
use signwiz::geometry::{CropBox, PreviewLayout, PreviewTransform, ViewPoint};
use signwiz::logging;
use signwiz::pages::{self, ExportLayout, PageSelectionMode, PageSelector};
use signwiz::script::{run_script, Script};
use signwiz::SignatureConfiguration;

#[derive(Parser)]
#[command(name = "signwiz")]
#[command(about = "Signing wizard navigation core and page-range tools")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a page-range expression such as "1,3,5-9"
    Pages {
        expression: String,

        /// Number of pages in the document
        #[arg(short = 'n', long)]
        count: u32,
    },

    /// Resolve export pages the way the export dialog does
    Export {
        /// Number of pages in the document
        #[arg(short = 'n', long)]
        count: u32,

        /// Page currently shown in the viewer
        #[arg(long, default_value_t = 1)]
        current: u32,

        /// Export every page
        #[arg(long, conflicts_with = "range")]
        all: bool,

        /// Export an explicit range expression
        #[arg(long)]
        range: Option<String>,

        /// Write all pages into one file
        #[arg(long)]
        single_file: bool,
    },

    /// Convert a dragged preview rectangle to document coordinates
    Rect {
        /// Preview origin "x,y"
        #[arg(value_parser = parse_point)]
        origin: ViewPoint,

        /// Preview end "x,y"
        #[arg(value_parser = parse_point)]
        end: ViewPoint,

        #[arg(long, default_value_t = 1.0)]
        scale: f64,

        #[arg(long, default_value_t = 0.0)]
        offset_x: f64,

        #[arg(long, default_value_t = 0.0)]
        offset_y: f64,

        /// Crop box "x,y,width,height"
        #[arg(long, value_parser = parse_crop_box, default_value = "0,0,612,792")]
        crop: CropBox,
    },

    /// Drive a scripted wizard session and print the final configuration
    Run {
        script: PathBuf,

        /// Include passphrases in the printed configuration
        #[arg(long)]
        show_secrets: bool,
    },
}

fn parse_numbers(value: &str, expected: usize) -> Result<Vec<f64>, String> {
    let numbers = value
        .split(',')
        .map(|part| part.trim().parse::<f64>().map_err(|e| format!("{}: {}", part, e)))
        .collect::<Result<Vec<_>, _>>()?;
    if numbers.len() != expected {
        return Err(format!("expected {} comma-separated numbers", expected));
    }
    Ok(numbers)
}

fn parse_point(value: &str) -> Result<ViewPoint, String> {
    let n = parse_numbers(value, 2)?;
    Ok(ViewPoint::new(n[0], n[1]))
}

fn parse_crop_box(value: &str) -> Result<CropBox, String> {
    let n = parse_numbers(value, 4)?;
    Ok(CropBox::new(n[0], n[1], n[2], n[3]))
}

/// Hands the finished configuration to stdout as JSON
struct JsonPrinter {
    show_secrets: bool,
}

impl SigningConsumer for JsonPrinter {
    fn consume(&mut self, configuration: &SignatureConfiguration) -> Result<()> {
        let printable = if self.show_secrets {
            configuration.clone()
        } else {
            configuration.redacted()
        };
        let json = serde_json::to_string_pretty(&printable)
            .context("Failed to serialize signature configuration")?;
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", json)?;
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (needed for logging setup)
    let config = Config::load(cli.config.as_deref())?;

    let _logging_handle = logging::init_logging(&config, cli.debug)?;

    match cli.command {
        Commands::Pages { expression, count } => cmd_pages(&expression, count)?,
        Commands::Export {
            count,
            current,
            all,
            range,
            single_file,
        } => cmd_export(count, current, all, range, single_file)?,
        Commands::Rect {
            origin,
            end,
            scale,
            offset_x,
            offset_y,
            crop,
        } => cmd_rect(origin, end, PreviewLayout::new(scale, offset_x, offset_y), crop)?,
        Commands::Run {
            script,
            show_secrets,
        } => cmd_run(&config, &script, show_secrets).await?,
    }

    Ok(())
}

fn cmd_pages(expression: &str, count: u32) -> Result<()> {
    let selection = pages::resolve(expression, count)
        .with_context(|| format!("Cannot resolve '{}' against {} pages", expression, count))?;
    let listed: Vec<String> = selection.iter().map(ToString::to_string).collect();
    println!("{}", listed.join(","));
    Ok(())
}

fn cmd_export(
    count: u32,
    current: u32,
    all: bool,
    range: Option<String>,
    single_file: bool,
) -> Result<()> {
    let mut selector = PageSelector::new(count, current);
    if all {
        selector.select(PageSelectionMode::All);
    } else if let Some(expression) = range {
        selector.edit_range_text(&expression);
    }
    if single_file {
        selector.set_layout(ExportLayout::SingleFile);
    }

    let export = selector.export_pages().context("Invalid export pages")?;
    println!(
        "{}",
        serde_json::to_string(&export).context("Failed to serialize export pages")?
    );
    Ok(())
}

fn cmd_rect(origin: ViewPoint, end: ViewPoint, layout: PreviewLayout, crop: CropBox) -> Result<()> {
    if layout.scale <= 0.0 {
        anyhow::bail!("Scale must be positive, got {}", layout.scale);
    }
    let rect = PreviewTransform::new(layout, crop).rect_to_document(origin, end);
    println!(
        "{}",
        serde_json::to_string(&rect).context("Failed to serialize rectangle")?
    );
    Ok(())
}

async fn cmd_run(config: &Config, path: &std::path::Path, show_secrets: bool) -> Result<()> {
    let script = Script::load(path)?;
    let mut printer = JsonPrinter { show_secrets };
    run_script(&script, config, &mut printer).await?;
    Ok(())
}
