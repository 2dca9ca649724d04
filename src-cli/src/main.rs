//! lyricbook - lyrics and poems collection with inline annotations
//!
//! This is the main entry point for the command-line application.

mod commands;
mod output;
mod state;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use library::{ItemKind, SortBy};
use state::AppState;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "lyricbook", version, about = "Keep song lyrics and poems, and annotate them")]
pub struct Cli {
    /// Directory holding collection.json and settings.json
    /// [default: $LYRICBOOK_DATA_DIR or the platform data directory]
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List items, optionally filtered
    List(ListArgs),
    /// Show an item with its annotations
    Show {
        /// Item ID or unambiguous ID prefix
        id: String,
        /// Print the display segments and their indices
        #[arg(long)]
        segments: bool,
        /// Print the rendering as JSON
        #[arg(long, conflicts_with = "segments")]
        json: bool,
    },
    /// Add a new item
    Add(ItemArgs),
    /// Edit an item's fields; omitted fields are kept
    Edit {
        id: String,
        #[command(flatten)]
        fields: ItemArgs,
    },
    /// Delete an item and its annotations
    Delete { id: String },
    /// List every tag in use
    Tags,
    /// Show collection statistics
    Stats,
    /// Annotate a passage of an item
    Annotate(AnnotateArgs),
    /// Change the note of an annotation
    Note {
        /// Item ID or prefix
        id: String,
        /// Annotation ID or prefix
        annotation: String,
        note: String,
    },
    /// List the annotations of an item with their full IDs, oldest first
    Notes {
        /// Item ID or prefix
        id: String,
    },
    /// Remove an annotation
    Unannotate {
        /// Item ID or prefix
        id: String,
        /// Annotation ID or prefix
        annotation: String,
    },
}

#[derive(Debug, Default, Args)]
pub struct ListArgs {
    /// Text searched in title, content, artist, album, collection and tags
    #[arg(short, long)]
    pub query: Option<String>,
    /// Only lyrics or only poems
    #[arg(long = "type")]
    pub kind: Option<ItemKind>,
    /// Items carrying any of these tags (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,
    #[arg(long)]
    pub artist: Option<String>,
    #[arg(long)]
    pub year: Option<u16>,
    /// title, date or artist [default: from settings]
    #[arg(long)]
    pub sort: Option<SortBy>,
    /// Show the start of each item's content under its line
    #[arg(short, long)]
    pub long: bool,
}

#[derive(Debug, Default, Args)]
pub struct ItemArgs {
    #[arg(long)]
    pub title: Option<String>,
    /// lyrics or poem
    #[arg(long = "type")]
    pub kind: Option<ItemKind>,
    /// Content text; use --file to read it from a file
    #[arg(long, conflicts_with = "file")]
    pub content: Option<String>,
    /// Read the content from a file ("-" for stdin)
    #[arg(long)]
    pub file: Option<PathBuf>,
    #[arg(long)]
    pub artist: Option<String>,
    #[arg(long)]
    pub album: Option<String>,
    #[arg(long)]
    pub collection: Option<String>,
    /// Year between 1000 and 2100; empty to clear
    #[arg(long)]
    pub year: Option<String>,
    /// Comma-separated tags
    #[arg(long)]
    pub tags: Option<String>,
}

#[derive(Debug, Args)]
pub struct AnnotateArgs {
    /// Item ID or prefix
    pub id: String,
    /// Annotate the first occurrence of this text
    #[arg(long, conflicts_with_all = ["at", "text"], required_unless_present = "at")]
    pub phrase: Option<String>,
    /// Selection start as SEGMENT:OFFSET (see `show --segments`)
    #[arg(long, requires = "text")]
    pub at: Option<String>,
    /// Selected text starting at --at
    #[arg(long)]
    pub text: Option<String>,
    #[arg(short, long)]
    pub note: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let data_dir = state::resolve_data_dir(cli.data_dir)?;
    let settings = AppState::read_settings(&data_dir)?;

    // Initialize logging; RUST_LOG wins over the settings file
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.general.log_level));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    tracing::debug!("Data directory: {}", data_dir.display());

    let mut state = AppState::load(data_dir, settings).await?;
    let outcome = commands::run(cli.command, &mut state)?;

    if outcome.changed {
        state.save().await?;
    }
    print!("{}", outcome.output);
    Ok(())
}
