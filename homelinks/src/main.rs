use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgGroup, Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use homelinks::builder::{AddLinks, LinkBuilder};
use homelinks::config::Config;
use homelinks::document::{BookmarkDraft, BookmarkPatch, MoveTarget};
use homelinks::editor::{LinkEditor, SAMPLE_YAML};
use homelinks::enrich::{Enricher, HttpEnricher, OfflineEnricher, PageInfo};
use homelinks::reports::{batch_summary, dedup_summary, render_document};
use homelinks::storage::SqliteStore;

#[derive(Parser)]
#[command(name = "homelinks")]
#[command(about = "Build and edit bookmark lists for homepage dashboards", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to $HOMELINKS_CONFIG, then the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Edit this YAML file instead of the stored working copy
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// Do not look up titles or icons over the network
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add links to the working copy, looking up their titles and icons
    Add {
        /// URLs to add; several URLs are added one after another
        #[arg(required = true)]
        urls: Vec<String>,

        /// Category name (defaults to the configured default category)
        #[arg(short, long, default_value = "")]
        category: String,

        /// Title used instead of the fetched one
        #[arg(short, long)]
        title: Option<String>,
    },
    /// Add a bookmark to the edited file
    Insert {
        /// Category name; created when missing
        #[arg(short, long)]
        category: String,

        #[command(flatten)]
        fields: BookmarkFields,
    },
    /// Show all bookmarks with their indices
    List,
    /// Change fields of a bookmark; an empty value re-derives or clears it
    Edit {
        category: usize,
        index: usize,

        #[command(flatten)]
        fields: BookmarkFields,
    },
    /// Delete a bookmark
    Delete { category: usize, index: usize },
    /// Move a bookmark within or across categories
    #[command(group(ArgGroup::new("position").required(true).args(["onto", "before", "end"])))]
    Move {
        category: usize,
        index: usize,

        /// Target category (defaults to the source category)
        #[arg(long)]
        to: Option<usize>,

        /// Take the position of the bookmark at this index
        #[arg(long)]
        onto: Option<usize>,

        /// Insert before the bookmark at this index
        #[arg(long)]
        before: Option<usize>,

        /// Append at the end of the target category
        #[arg(long)]
        end: bool,
    },
    /// List bookmarks sharing a URL within a category and optionally remove them
    Dedupe {
        /// Remove the duplicates instead of only listing them
        #[arg(long)]
        yes: bool,
    },
    /// Look up the icon of a bookmark again
    RefreshIcon { category: usize, index: usize },
    /// Remove the icon of a bookmark
    RemoveIcon { category: usize, index: usize },
    /// Print the YAML configuration or write it to a file
    Export {
        /// Output file or directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replace the working copy with a YAML configuration
    Import { path: PathBuf },
    /// Remove every bookmark from the working copy
    Clear {
        #[arg(long)]
        yes: bool,
    },
    /// Print an example configuration
    Sample,
}

#[derive(Args, Default)]
struct BookmarkFields {
    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    url: Option<String>,

    #[arg(long)]
    abbr: Option<String>,

    #[arg(long)]
    description: Option<String>,

    #[arg(long)]
    icon: Option<String>,
}

impl BookmarkFields {
    fn into_patch(self) -> BookmarkPatch {
        BookmarkPatch {
            name: self.name,
            abbr: self.abbr,
            url: self.url,
            description: self.description,
            icon: self.icon,
        }
    }

    fn into_draft(self) -> BookmarkDraft {
        BookmarkDraft {
            name: self.name.unwrap_or_default(),
            abbr: self.abbr.unwrap_or_default(),
            url: self.url.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            icon: self.icon.unwrap_or_default(),
        }
    }
}

/// Network or offline enrichment chosen at startup
enum CliEnricher {
    Http(HttpEnricher),
    Offline(OfflineEnricher),
}

impl Enricher for CliEnricher {
    async fn page_info(&self, url: &Url) -> PageInfo {
        match self {
            Self::Http(enricher) => enricher.page_info(url).await,
            Self::Offline(enricher) => enricher.page_info(url).await,
        }
    }

    async fn find_icon(&self, url: &Url) -> String {
        match self {
            Self::Http(enricher) => enricher.find_icon(url).await,
            Self::Offline(enricher) => enricher.find_icon(url).await,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Commands::Sample = cli.command {
        print!("{SAMPLE_YAML}");
        return ExitCode::SUCCESS;
    }

    let config = Config::load(cli.config.as_deref());
    let result = match &cli.file {
        Some(path) => run_file(path, cli.command, &config).await,
        None => run_store(cli.command, &config, cli.offline).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run_store(command: Commands, config: &Config, offline: bool) -> anyhow::Result<()> {
    let store = match &config.storage.path {
        Some(path) => SqliteStore::open(path)?,
        None => SqliteStore::open_default()?,
    };
    let enricher = if offline || !config.enrichment.enabled {
        CliEnricher::Offline(OfflineEnricher::new(config.enrichment.icon_sources.clone()))
    } else {
        CliEnricher::Http(HttpEnricher::new(&config.enrichment)?)
    };
    let mut builder = LinkBuilder::open(store, enricher, config);

    match command {
        Commands::Add {
            urls,
            category,
            title,
        } => {
            let request = AddLinks {
                text: urls.join("\n"),
                category,
                custom_title: title,
                batch: urls.len() > 1,
            };
            let report = builder.add_links(request).await?;
            println!("{}", batch_summary(&report));
        }
        Commands::List => println!("{}", render_document(builder.document())),
        Commands::Edit {
            category,
            index,
            fields,
        } => {
            let patch = fields.into_patch();
            if patch.is_empty() {
                anyhow::bail!("nothing to change; pass at least one field");
            }
            builder.edit_bookmark(category, index, &patch)?;
            println!("Updated bookmark {category}.{index}");
        }
        Commands::Delete { category, index } => {
            let removed = builder.delete_bookmark(category, index)?;
            println!("Deleted {} ({})", removed.name, removed.url);
        }
        Commands::Move {
            category,
            index,
            to,
            onto,
            before,
            end: _,
        } => {
            let target = move_target(onto, before);
            let (ci, bi) =
                builder.move_bookmark(category, index, to.unwrap_or(category), target)?;
            println!("Moved bookmark to {ci}.{bi}");
        }
        Commands::Dedupe { yes } => {
            let report = if yes {
                builder.deduplicate()
            } else {
                builder.find_duplicates()
            };
            print_dedup(&report, yes);
        }
        Commands::RefreshIcon { category, index } => {
            if builder.refresh_icon(category, index).await? {
                println!("Icon updated");
            } else {
                println!("Icon unchanged");
            }
        }
        Commands::RemoveIcon { category, index } => {
            if builder.remove_icon(category, index)? {
                println!("Icon removed");
            } else {
                println!("Bookmark has no icon");
            }
        }
        Commands::Export { output } => {
            write_export(&builder.export_yaml(), output, &config.export.file_name).await?;
        }
        Commands::Import { path } => {
            let text = tokio::fs::read_to_string(&path).await?;
            builder.import_yaml(&text)?;
            println!(
                "Imported {} bookmarks from {}",
                builder.document().total_bookmarks(),
                path.display()
            );
        }
        Commands::Clear { yes } => {
            let total = builder.document().total_bookmarks();
            if yes {
                builder.clear();
                println!("Removed {total} bookmarks");
            } else {
                println!("This removes all {total} bookmarks. Run again with --yes to confirm.");
            }
        }
        Commands::Insert { .. } => {
            anyhow::bail!("`insert` edits a YAML file; pass --file or use `add`")
        }
        Commands::Sample => print!("{SAMPLE_YAML}"),
    }

    Ok(())
}

async fn run_file(path: &Path, command: Commands, config: &Config) -> anyhow::Result<()> {
    let text = tokio::fs::read_to_string(path).await?;
    let mut editor = LinkEditor::load(&text)?;

    match command {
        Commands::Insert { category, fields } => {
            let ci = editor.add_category(&category);
            let bi = editor.add_bookmark(ci, fields.into_draft())?;
            println!("Added bookmark {ci}.{bi}");
        }
        Commands::List => println!("{}", render_document(editor.document())),
        Commands::Edit {
            category,
            index,
            fields,
        } => {
            let patch = fields.into_patch();
            if patch.is_empty() {
                anyhow::bail!("nothing to change; pass at least one field");
            }
            editor.edit_bookmark(category, index, &patch)?;
            println!("Updated bookmark {category}.{index}");
        }
        Commands::Delete { category, index } => {
            let removed = editor.delete_bookmark(category, index)?;
            println!("Deleted {} ({})", removed.name, removed.url);
        }
        Commands::Move {
            category,
            index,
            to,
            onto,
            before,
            end: _,
        } => {
            let target = move_target(onto, before);
            let (ci, bi) = editor.move_bookmark(category, index, to.unwrap_or(category), target)?;
            println!("Moved bookmark to {ci}.{bi}");
        }
        Commands::Dedupe { yes } => {
            let report = if yes {
                editor.deduplicate()
            } else {
                editor.find_duplicates()
            };
            print_dedup(&report, yes);
        }
        Commands::Export { output } => {
            write_export(&editor.export_yaml(), output, &config.export.file_name).await?;
        }
        Commands::RemoveIcon { category, index } => {
            let patch = BookmarkPatch {
                icon: Some(String::new()),
                ..Default::default()
            };
            editor.edit_bookmark(category, index, &patch)?;
            println!("Icon removed");
        }
        Commands::Sample => print!("{SAMPLE_YAML}"),
        Commands::Add { .. }
        | Commands::RefreshIcon { .. }
        | Commands::Import { .. }
        | Commands::Clear { .. } => {
            anyhow::bail!("this command works on the stored working copy; drop --file")
        }
    }

    if editor.has_changes() {
        tokio::fs::write(path, editor.export_yaml()).await?;
        tracing::info!("Saved changes to {}", path.display());
    }
    Ok(())
}

/// clap guarantees exactly one of `--onto`, `--before` and `--end`
fn move_target(onto: Option<usize>, before: Option<usize>) -> MoveTarget {
    match (onto, before) {
        (Some(index), _) => MoveTarget::Onto(index),
        (None, Some(index)) => MoveTarget::Before(index),
        (None, None) => MoveTarget::End,
    }
}

fn print_dedup(report: &homelinks::document::DedupReport, removed: bool) {
    println!("{}", dedup_summary(report));
    if report.is_empty() {
        return;
    }
    if removed {
        println!("Removed {} duplicates", report.len());
    } else {
        println!("Run again with --yes to remove them.");
    }
}

async fn write_export(yaml: &str, output: Option<PathBuf>, file_name: &str) -> anyhow::Result<()> {
    let Some(output) = output else {
        print!("{yaml}");
        return Ok(());
    };

    let target = if tokio::fs::metadata(&output)
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false)
    {
        output.join(file_name)
    } else {
        output
    };
    tokio::fs::write(&target, yaml).await?;
    eprintln!("Exported to {}", target.display());
    Ok(())
}
