//! Kinship command line.
//!
//! Renders the related-content widget for an item of a site fixture.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use kinship_kernel::gather::ContentQueryBuilder;
use kinship_kernel::host::SiteIndex;
use kinship_kernel::params::RawAttributes;
use kinship_kernel::theme::RelatedRenderer;
use kinship_kernel::{Collaborators, Config, CurrentItem, RelatedContent};

/// The main CLI structure parsing command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "kinship")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Render related content from a site fixture")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render related content for an item
    Render(RenderArgs),
    /// List the items of a site fixture
    Items {
        /// Site fixture (YAML or JSON)
        #[arg(short, long)]
        site: PathBuf,
    },
}

#[derive(Debug, Args)]
struct RenderArgs {
    /// Site fixture (YAML or JSON)
    #[arg(short, long)]
    site: PathBuf,

    /// Current item, by UUID or slug
    #[arg(short, long)]
    item: Option<String>,

    /// Display attribute as key=value (repeatable)
    #[arg(short, long = "attr", value_parser = parse_attr)]
    attrs: Vec<(String, String)>,

    /// Shortcode attribute text, e.g. 'type="page" display=grid'
    #[arg(long)]
    shortcode: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Html)]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Rendered markup
    Html,
    /// Resolved display configuration and store query
    Json,
    /// PostgreSQL for the store query
    Sql,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    match Cli::parse().command {
        Command::Render(args) => render(args),
        Command::Items { site } => list_items(&site),
    }
}

fn render(args: RenderArgs) -> Result<()> {
    let config = Config::from_env().context("failed to load configuration")?;
    let site = Arc::new(load_site(&args.site)?);

    let current = match args.item.as_deref() {
        Some(key) => {
            let item = site
                .find_item(key)
                .with_context(|| format!("item not found: {key}"))?;
            info!(item = %item.id, title = %item.title, "current item");
            Some(CurrentItem(item.id))
        }
        None => None,
    };

    // Explicit --attr values override shortcode attributes.
    let mut raw = args
        .shortcode
        .as_deref()
        .map(RawAttributes::parse_shortcode)
        .unwrap_or_default();
    for (key, value) in args.attrs {
        raw.insert(key, value);
    }

    let renderer = RelatedRenderer::new(config).context("failed to load templates")?;
    let widget = RelatedContent::new(Collaborators::uniform(site), renderer);

    match args.format {
        OutputFormat::Html => {
            let html = widget
                .render(current, &raw)
                .context("failed to render related content")?;
            println!("{html}");
        }
        OutputFormat::Json => {
            let plan = widget.plan(current, &raw);
            let output = serde_json::json!({
                "display": plan.params.config,
                "location_taxonomy": plan.location_taxonomy,
                "query": plan.query,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Sql => {
            let plan = widget.plan(current, &raw);
            println!("{}", ContentQueryBuilder::new(&plan.query).build());
        }
    }
    Ok(())
}

fn list_items(path: &std::path::Path) -> Result<()> {
    let site = load_site(path)?;
    for item in site.items() {
        println!(
            "{}\t{}\t{}\t{}",
            item.id,
            item.item_type,
            item.name(),
            item.title
        );
    }
    Ok(())
}

fn load_site(path: &std::path::Path) -> Result<SiteIndex> {
    SiteIndex::load(path).with_context(|| format!("failed to load site {}", path.display()))
}

/// Parse a `key=value` attribute.
fn parse_attr(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))
}

/// Logs go to stderr so stdout carries only command output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
