use std::path::PathBuf;

use anyhow::{Context, bail};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use nfo_core::media::parse_probe_output;
use nfo_core::{ContainerKind, ItemKind, MetadataRecord, NfoOptions};
use nfo_metadata::{LocalMetadataSource, NfoProvider, NfoSaver};
use nfo_scanner::{ItemLocation, LocalFs};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nfo")]
#[command(about = "Read and write XML sidecar metadata next to media files", long_about = None)]
struct Cli {
    /// JSON options file (camelCase keys)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log as JSON lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print sidecar candidates in lookup order
    Resolve {
        #[command(flatten)]
        item: ItemArgs,
    },
    /// Print the item's sidecar as a JSON record
    Read {
        #[command(flatten)]
        item: ItemArgs,
    },
    /// Save a JSON record to the item's sidecar
    Write {
        #[command(flatten)]
        item: ItemArgs,
        /// Record to save, as produced by `read`
        #[arg(long)]
        record: PathBuf,
        /// ffprobe `-show_format -show_streams` JSON for stream details
        #[arg(long)]
        probe: Option<PathBuf>,
    },
    /// Report whether the sidecar changed after a point in time
    Changed {
        #[command(flatten)]
        item: ItemArgs,
        /// RFC 3339 timestamp
        #[arg(long)]
        since: DateTime<Utc>,
    },
}

#[derive(Args)]
struct ItemArgs {
    /// Item kind (movie, episode, series, season, music_album, game, ...)
    kind: ItemKind,
    /// Media file, or the folder for folder items and disc rips
    path: String,
    #[arg(long, default_value = "file")]
    container: ContainerKind,
    /// The item shares its folder with other items
    #[arg(long)]
    mixed: bool,
    /// Try movie.nfo before {basename}.nfo
    #[arg(long)]
    prefer_movie_nfo: bool,
    /// Folder that overrides the one derived from the path
    #[arg(long)]
    folder: Option<String>,
    /// Metadata folder for collections and people
    #[arg(long)]
    internal_path: Option<String>,
}

impl ItemArgs {
    fn location(&self) -> ItemLocation {
        let mut location = ItemLocation::new(self.kind, self.path.clone())
            .with_container(self.container)
            .mixed_folder(self.mixed);
        location.containing_folder = self.folder.clone();
        if let Some(path) = &self.internal_path {
            location = location.with_internal_metadata_path(path.clone());
        }
        location
    }
}

fn load_options(cli: &Cli) -> anyhow::Result<NfoOptions> {
    let options = match &cli.config {
        Some(path) => NfoOptions::from_json_file(path)
            .with_context(|| format!("failed to load options from {}", path.display()))?,
        None => NfoOptions::default(),
    };
    options
        .with_env_overrides()
        .context("invalid NFO_* environment override")
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json);
    let mut options = load_options(&cli)?;

    let token = CancellationToken::new();
    {
        let token = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupted, cancelling");
                token.cancel();
            }
        });
    }

    match &cli.command {
        Command::Resolve { item } => {
            let prefer = item.prefer_movie_nfo || options.prefer_alternate_movie_name;
            for candidate in item.location().candidates(prefer) {
                println!("{}", candidate.path());
            }
        }
        Command::Read { item } => {
            options.prefer_alternate_movie_name |= item.prefer_movie_nfo;
            let provider = NfoProvider::new(LocalFs, options);
            let location = item.location();
            match provider
                .fetch(&location, &token)
                .await
                .with_context(|| format!("failed to read sidecar for {}", location.path))?
            {
                Some(found) => {
                    info!(path = %found.path.display(), "sidecar found");
                    println!("{}", serde_json::to_string_pretty(&found.record)?);
                }
                None => bail!("no sidecar found for {}", location.path),
            }
        }
        Command::Write {
            item,
            record,
            probe,
        } => {
            options.prefer_alternate_movie_name |= item.prefer_movie_nfo;
            let raw = std::fs::read_to_string(record)
                .with_context(|| format!("failed to read {}", record.display()))?;
            let mut record: MetadataRecord =
                serde_json::from_str(&raw).context("record is not valid JSON")?;
            if record.kind != item.kind {
                bail!("record is a {} but the item is a {}", record.kind, item.kind);
            }
            if let Some(probe) = probe {
                let raw = std::fs::read_to_string(probe)
                    .with_context(|| format!("failed to read {}", probe.display()))?;
                let value: serde_json::Value =
                    serde_json::from_str(&raw).context("probe output is not valid JSON")?;
                let summary = parse_probe_output(&value);
                if record.runtime_minutes.is_none() {
                    record.runtime_minutes = summary.runtime_minutes();
                }
                record.media_streams = summary.streams;
            }

            let saver = NfoSaver::new(LocalFs, options);
            let path = saver
                .save(&record, &item.location(), &token)
                .await
                .context("failed to save sidecar")?;
            println!("{}", path.display());
        }
        Command::Changed { item, since } => {
            options.prefer_alternate_movie_name |= item.prefer_movie_nfo;
            let provider = NfoProvider::new(LocalFs, options);
            let changed = provider
                .has_changed(&item.location(), *since)
                .await
                .context("failed to check sidecar")?;
            println!("{changed}");
        }
    }
    Ok(())
}
