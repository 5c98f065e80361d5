//! panehub - headless driver for the multi-panel file browser core.
//!
//! Usage:
//!   panehub grid [PATHS...]      Partition panels into lines
//!   panehub layout FILE          Inspect a layout file
//!   panehub favorites            List favorite layouts and path favorites
//!   panehub session              Show the saved default session
//!   panehub run FILE             Execute a file of JSON-lines requests
//!   panehub --help               Show help

use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result};
use itertools::Itertools;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use panehub_core::{HubConfig, PanelId, Viewport};
use panehub_layout::{
    build_grid, Arrangement, LayoutMode, LayoutSnapshot, LayoutStore, LineCapacities, SplitChild,
    SplitNode,
};
use panehub_ops::{FileOperationRecord, OperationError, Session, TransferIntent, TransferResult};

#[derive(Parser)]
#[command(
    name = "panehub",
    version,
    about = "Multi-panel file browser core",
    long_about = "panehub arranges file browser panels in rows or columns and performs \
                  undoable file operations between them.\n\n\
                  Use `panehub run FILE` to replay a list of requests, or the other \
                  subcommands to inspect saved layouts."
)]
struct Cli {
    /// Directory holding settings, the default session and favorites
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Log debug output to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Partition panels into lines
    Grid {
        /// Panel directories, in order
        paths: Vec<PathBuf>,

        /// Number of anonymous panels (used when no paths are given)
        #[arg(short = 'n', long, default_value = "0")]
        count: usize,

        /// Panels per line, comma separated (e.g., "3,2")
        #[arg(short, long, default_value = "3")]
        capacities: String,

        /// Arrange lines as rows or columns
        #[arg(short, long, default_value = "rows")]
        mode: ModeArg,
    },

    /// Inspect a layout file
    Layout {
        /// Layout file to read
        file: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// List favorite layouts and path favorites
    Favorites {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Show the saved default session
    Session {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Execute a file of JSON-lines requests ("-" reads stdin)
    Run {
        /// Request file
        file: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Rows,
    Columns,
}

impl From<ModeArg> for LayoutMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Rows => LayoutMode::Rows,
            ModeArg::Columns => LayoutMode::Columns,
        }
    }
}

/// One request of a `run` file.
#[derive(Debug, Deserialize)]
#[serde(tag = "request", rename_all = "snake_case")]
enum Request {
    Transfer {
        sources: Vec<PathBuf>,
        dest: PathBuf,
        intent: TransferIntent,
    },
    Delete {
        paths: Vec<PathBuf>,
    },
    Rename {
        path: PathBuf,
        new_name: String,
    },
    MakeDirectory {
        parent: PathBuf,
        #[serde(default)]
        name: Option<String>,
    },
    Undo,
    Copy {
        paths: Vec<PathBuf>,
    },
    Cut {
        paths: Vec<PathBuf>,
    },
    Paste {
        dest: PathBuf,
    },
    AddPanel {
        path: PathBuf,
    },
    RemovePanel {
        id: u64,
    },
    SetCapacities {
        values: String,
    },
    ToggleMode,
    Resize {
        width: u32,
        height: u32,
    },
    SetSizes {
        #[serde(default)]
        path: Vec<usize>,
        sizes: Vec<u32>,
    },
    Grid,
    SaveSession,
    LoadSession,
    SaveFavorite {
        name: String,
    },
    LoadFavorite {
        name: String,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config_dir)?;

    match cli.command {
        Command::Grid {
            paths,
            count,
            capacities,
            mode,
        } => {
            run_grid(&config, paths, count, &capacities, mode.into());
        }
        Command::Layout { file, format } => {
            let snapshot = LayoutSnapshot::read(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            print_snapshot(&snapshot, format)?;
        }
        Command::Favorites { format } => {
            run_favorites(&config, format)?;
        }
        Command::Session { format } => {
            let store = LayoutStore::open(&config);
            match store.load_session().context("Failed to read default session")? {
                Some(snapshot) => print_snapshot(&snapshot, format)?,
                None => eprintln!("No default session saved in {}", store.dir().display()),
            }
        }
        Command::Run { file } => {
            run_requests(&config, &file)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(config_dir: Option<PathBuf>) -> Result<HubConfig> {
    match config_dir {
        Some(dir) => Ok(HubConfig::builder()
            .config_dir(Some(dir))
            .build()
            .context("Invalid configuration")?
            .reload()),
        None => Ok(HubConfig::load()),
    }
}

/// Print how panels would be partitioned.
fn run_grid(
    config: &HubConfig,
    paths: Vec<PathBuf>,
    count: usize,
    capacities: &str,
    mode: LayoutMode,
) {
    let capacities = LineCapacities::parse(capacities);
    let mut arrangement = Arrangement::new(config);

    let paths = if paths.is_empty() {
        (1..=count).map(|i| PathBuf::from(format!("P{i}"))).collect()
    } else {
        paths
    };

    arrangement.load_snapshot(LayoutSnapshot {
        layout_mode: mode,
        line_capacities: capacities,
        panel_paths: paths,
        splitter_states: None,
    });

    print_arrangement(&arrangement);
}

fn run_favorites(config: &HubConfig, format: OutputFormat) -> Result<()> {
    let store = LayoutStore::open(config);

    match format {
        OutputFormat::Text => {
            println!();
            println!("{}", "─".repeat(60));
            println!(" Favorite layouts ({})", store.dir().display());
            println!("{}", "─".repeat(60));
            for (name, entry) in store.favorites() {
                let missing = if entry.path.exists() { "" } else { "  (missing)" };
                println!(
                    "   {:<20} {:<9} {}{}",
                    name,
                    entry.color,
                    entry.path.display(),
                    missing
                );
            }
            println!();
            println!(" Path favorites");
            println!("{}", "─".repeat(60));
            for (name, entry) in store.path_favorites() {
                println!("   {:<20} {:<9} {}", name, entry.color, entry.path.display());
            }
            println!();
        }
        OutputFormat::Json => {
            let mut favorites = serde_json::Map::new();
            for (name, entry) in store.favorites() {
                favorites.insert(name.to_string(), serde_json::to_value(entry)?);
            }
            let mut path_favorites = serde_json::Map::new();
            for (name, entry) in store.path_favorites() {
                path_favorites.insert(name.to_string(), serde_json::to_value(entry)?);
            }
            let out = serde_json::json!({
                "favorites": favorites,
                "path_favorites": path_favorites,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }

    Ok(())
}

/// Execute every request in `file` against one session and arrangement.
fn run_requests(config: &HubConfig, file: &Path) -> Result<()> {
    let reader: Box<dyn BufRead> = if file == Path::new("-") {
        Box::new(BufReader::new(std::io::stdin()))
    } else {
        let handle = std::fs::File::open(file)
            .with_context(|| format!("Failed to open {}", file.display()))?;
        Box::new(BufReader::new(handle))
    };

    let mut session = Session::new(config).context("Failed to create backup area")?;
    let mut arrangement = Arrangement::new(config);
    let mut store = LayoutStore::open(config);

    for (number, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read requests")?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let request: Request = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                eprintln!("line {}: invalid request: {}", number + 1, e);
                continue;
            }
        };
        tracing::debug!(line = number + 1, ?request, "Executing request");

        handle_request(request, &mut session, &mut arrangement, &mut store);
    }

    Ok(())
}

fn handle_request(
    request: Request,
    session: &mut Session,
    arrangement: &mut Arrangement,
    store: &mut LayoutStore,
) {
    match request {
        Request::Transfer {
            sources,
            dest,
            intent,
        } => print_result(&session.request_transfer(&sources, &dest, intent)),
        Request::Delete { paths } => print_result(&session.request_delete(&paths)),
        Request::Rename { path, new_name } => {
            print_record(session.request_rename(&path, &new_name));
        }
        Request::MakeDirectory { parent, name } => {
            print_record(session.request_make_directory(&parent, name.as_deref()));
        }
        Request::Undo => match session.request_undo() {
            Ok(record) => println!("undo: {}", record.undo_description()),
            Err(e) => println!("undo failed: {e}"),
        },
        Request::Copy { paths } => {
            session.copy_selection(&paths);
            println!("copied {} item(s) to clipboard", paths.len());
        }
        Request::Cut { paths } => {
            session.cut_selection(&paths);
            println!("cut {} item(s) to clipboard", paths.len());
        }
        Request::Paste { dest } => match session.paste_into(&dest) {
            Some(result) => print_result(&result),
            None => println!("paste: clipboard is empty"),
        },
        Request::AddPanel { path } => {
            let id = arrangement.add_panel(&path);
            println!("panel {id} opened at {}", path.display());
        }
        Request::RemovePanel { id } => match arrangement.remove_panel(PanelId::new(id)) {
            Some(panel) => println!("panel {} closed", panel.id),
            None => println!("no panel {}", PanelId::new(id)),
        },
        Request::SetCapacities { values } => {
            arrangement.set_capacities(LineCapacities::parse(&values));
            println!("capacities: {}", arrangement.capacities());
        }
        Request::ToggleMode => {
            println!("mode: {}", arrangement.toggle_mode());
        }
        Request::Resize { width, height } => {
            arrangement.set_viewport(Viewport::new(width, height));
            println!("viewport: {width}x{height}");
        }
        Request::SetSizes { path, sizes } => {
            if arrangement.set_sizes(&path, sizes) {
                println!("sizes updated");
            } else {
                println!("no splitter at {path:?} with that many children");
            }
        }
        Request::Grid => print_arrangement(arrangement),
        Request::SaveSession => match store.save_session(&arrangement.snapshot()) {
            Ok(path) => println!("session saved to {}", path.display()),
            Err(e) => println!("save session failed: {e}"),
        },
        Request::LoadSession => match store.load_session() {
            Ok(Some(snapshot)) => {
                arrangement.load_snapshot(snapshot);
                print_arrangement(arrangement);
            }
            Ok(None) => println!("no default session saved"),
            Err(e) => println!("load session failed: {e}"),
        },
        Request::SaveFavorite { name } => {
            let snapshot = arrangement.snapshot();
            let saved = if store.favorite(&name).is_some() {
                store.overwrite_favorite(&name, &snapshot)
            } else {
                store.add_favorite(&name, &snapshot).map(|_| ())
            };
            match saved {
                Ok(()) => println!("favorite '{name}' saved"),
                Err(e) => println!("save favorite failed: {e}"),
            }
        }
        Request::LoadFavorite { name } => match store.load_favorite(&name) {
            Ok(snapshot) => {
                arrangement.load_snapshot(snapshot);
                print_arrangement(arrangement);
            }
            Err(e) => println!("load favorite failed: {e}"),
        },
    }
}

fn print_result(result: &TransferResult) {
    println!(
        "{} ({})",
        result.summary(),
        humansize::format_size(result.bytes_processed, humansize::BINARY)
    );
    for failure in &result.failures {
        println!("  {} [{}]", failure, failure.kind());
    }
}

fn print_record(outcome: Result<FileOperationRecord, OperationError>) {
    match outcome {
        Ok(record) => println!("{}", record.description()),
        Err(e) => println!("failed [{}]: {e}", e.kind()),
    }
}

fn print_arrangement(arrangement: &Arrangement) {
    println!(
        "{} panel(s), {} mode, capacities {}",
        arrangement.order().len(),
        arrangement.mode(),
        arrangement.capacities()
    );

    let grid = arrangement.grid();
    let sizes: Vec<Vec<u32>> = arrangement
        .root()
        .map(line_sizes)
        .unwrap_or_default();

    for (i, line) in grid.iter().enumerate() {
        let panels = line
            .iter()
            .map(|panel| format!("{} {}", panel.id, panel.path.display()))
            .join(" | ");
        match sizes.get(i) {
            Some(sizes) => println!("  line {}: {}  [{}]", i + 1, panels, sizes.iter().join(",")),
            None => println!("  line {}: {}", i + 1, panels),
        }
    }
}

fn line_sizes(root: &SplitNode) -> Vec<Vec<u32>> {
    root.children
        .iter()
        .map(|child| match child {
            SplitChild::Split(node) => node.sizes.clone(),
            SplitChild::Panel(_) => Vec::new(),
        })
        .collect()
}

fn print_snapshot(snapshot: &LayoutSnapshot, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            println!();
            println!("{}", "─".repeat(60));
            println!(
                " {} mode, capacities {}, {} panel(s)",
                snapshot.layout_mode,
                snapshot.line_capacities,
                snapshot.panel_paths.len()
            );
            println!("{}", "─".repeat(60));

            let grid = build_grid(&snapshot.panel_paths, &snapshot.line_capacities);
            for (i, line) in grid.iter().enumerate() {
                println!(
                    "  line {}: {}",
                    i + 1,
                    line.iter().map(|p| p.display()).join(" | ")
                );
            }
            match &snapshot.splitter_states {
                Some(tree) => println!(" splitter sizes: {}", serde_json::to_string(tree)?),
                None => println!(" no splitter sizes saved"),
            }
            println!();
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(snapshot)?);
        }
    }

    Ok(())
}
