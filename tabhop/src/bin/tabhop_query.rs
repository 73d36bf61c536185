use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use tabhop::database::Database;
use tabhop::highlight::apply_marker;
use tabhop::{AudioIndicator, HighlightMarker, RenderModel, TabHopError, TabHost, TabInfo, TabSession};

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "tabhop-query", about = "Rank a tab list the way the switcher does")]
struct Args {
    /// JSON file with an array of tabs ({id, title, url, active, pinned, audible, muted})
    #[arg(long)]
    tabs: PathBuf,

    /// Search text, may include @audio, @pinned, @url. Defaults to the saved query.
    #[arg(long)]
    query: Option<String>,

    /// SQLite file holding the last query between runs
    #[arg(long)]
    db: Option<PathBuf>,

    /// Activate the top result (prints the tab id)
    #[arg(long)]
    activate: bool,

    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Text inserted before each highlighted range
    #[arg(long, default_value = "[")]
    marker_open: String,

    /// Text inserted after each highlighted range
    #[arg(long, default_value = "]")]
    marker_close: String,
}

/// Host that reports activation on stdout
struct StdoutHost;

impl TabHost for StdoutHost {
    fn activate_tab(&self, tab_id: i64) -> Result<(), TabHopError> {
        println!("activate {tab_id}");
        Ok(())
    }

    fn close_switcher(&self) {}
}

fn print_text(model: &RenderModel, marker: &HighlightMarker) {
    if model.no_results {
        eprintln!("No results :(");
        return;
    }
    for row in &model.rows {
        let cursor = if row.selected { ">" } else { " " };
        let audio = match row.audio {
            AudioIndicator::None => "",
            AudioIndicator::Playing => " [audio]",
            AudioIndicator::Muted => " [muted]",
        };
        let text = apply_marker(&row.display_text, &row.highlights, marker);
        println!("{cursor} {:>4} {:>8.2}  {text}{audio}", row.tab_id, row.score);
    }
    eprintln!("({} tabs shown)", model.rows.len());
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let raw = std::fs::read_to_string(&args.tabs)
        .with_context(|| format!("reading tabs {}", args.tabs.display()))?;
    let tabs: Vec<TabInfo> = serde_json::from_str(&raw).context("parsing tab list")?;

    let db = args
        .db
        .as_ref()
        .map(|path| {
            Database::open(path).with_context(|| format!("opening store {}", path.display()))
        })
        .transpose()?;

    let session = TabSession::with_store(tabs, Arc::new(StdoutHost), db);
    let mut model = match args.query {
        Some(query) => session.on_query_changed(query),
        None => session.render_model(),
    };
    if args.activate {
        model = session.activate_selected();
    }

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&model).context("encoding model")?);
        }
        OutputFormat::Text => {
            let marker = HighlightMarker {
                open: args.marker_open,
                close: args.marker_close,
            };
            print_text(&model, &marker);
        }
    }

    if let Some(notice) = &model.notice {
        eprintln!("{notice}");
    }
    Ok(())
}
