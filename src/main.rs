use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use cardgrid::rendering::{grid, page};
use cardgrid::{DataRecord, GridConfig, StyleDescriptor, DEFAULT_CONTAINER};

#[derive(Parser)]
#[command(name = "cardgrid", version, about = "Responsive card-grid rendering")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Export a standalone HTML page from a style set and a records file
    Export {
        /// Style-set document (single object or a collection array)
        #[arg(long)]
        style: PathBuf,
        /// Records file: a JSON array of row objects
        #[arg(long)]
        data: Option<PathBuf>,
        /// Style id to pick from a collection (defaults to the first entry)
        #[arg(long)]
        id: Option<String>,
        /// Output file; stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long, default_value = "Card Grid Export")]
        title: String,
    },
    /// Print the layout stylesheet for a grid configuration
    Layout {
        #[arg(long, default_value_t = 3)]
        columns: u32,
        #[arg(long, default_value_t = 24.0)]
        gap: f64,
        #[arg(long, default_value_t = 300.0)]
        min_width: f64,
        #[arg(long, default_value_t = 1200.0)]
        max_width: f64,
    },
    /// Fetch sheet records and print them as JSON
    #[cfg(feature = "sheets")]
    Fetch {
        /// Sheet URL (the document id is extracted from it)
        #[arg(long)]
        url: String,
        #[arg(long, default_value = "Sheet1")]
        tab: String,
    },
}

fn load_style(path: &PathBuf, id: Option<&str>) -> Result<StyleDescriptor> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read style file {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;

    if value.is_array() {
        let sets = StyleDescriptor::load_collection(&text)?;
        return match id {
            Some(id) => sets
                .into_iter()
                .find(|s| s.id() == id)
                .with_context(|| format!("no style set with id '{}'", id)),
            None => sets.into_iter().next().context("style collection is empty"),
        };
    }

    Ok(StyleDescriptor::from_value(&value)?)
}

fn load_records(path: Option<&PathBuf>) -> Result<Vec<DataRecord>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read records file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("{} is not a JSON array of row objects", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Export { style, data, id, out, title } => {
            let descriptor = load_style(&style, id.as_deref())?;
            let records = load_records(data.as_ref())?;
            let config = descriptor.grid().copied().unwrap_or_default();
            let html = page::export_standalone_html(&descriptor, &records, &config, &title)?;
            match out {
                Some(path) => fs::write(&path, html)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => println!("{}", html),
            }
        }
        Command::Layout { columns, gap, min_width, max_width } => {
            let config = GridConfig { columns, gap, min_width, max_width };
            let stylesheet = grid::generate_full_layout(&config, DEFAULT_CONTAINER)?;
            println!("{}", stylesheet.to_css());
        }
        #[cfg(feature = "sheets")]
        Command::Fetch { url, tab } => {
            let connector = cardgrid::sheets::SheetConnector::new()?;
            let records = connector.load(&url, &tab)?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
    }

    Ok(())
}
