// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! # Music catalog CLI.
//!
//! A command line front end for the track catalog.
//!
//! Each command performs a single catalog operation and prints the result
//! as JSON on stdout. Diagnostics go to
//! stderr through `env_logger`; set `LOG_LEVEL` to change their verbosity.

use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::LevelFilter;
use serde::Serialize;

use musify::{
    Catalog, PageRequest, TrackMetadata,
    blob::KeyedUrlSigner,
    config::{self, AppConfig},
    db::SqliteTrackStore,
    util::{format, probe},
};

const LOG_LEVEL_ENV: &str = "LOG_LEVEL";
const LOG_LEVEL_FILTER_DEFAULT: LevelFilter = LevelFilter::Info;

type CliCatalog = Catalog<SqliteTrackStore, Option<KeyedUrlSigner>>;

#[derive(Parser)]
#[command(name = "musify")]
#[command(about = "Music track catalog", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file, instead of the per-user default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Catalog database file, overrides the configured path
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List tracks, one page at a time
    List {
        /// Maximum number of tracks examined for the page
        #[arg(long, allow_negative_numbers = true)]
        limit: Option<i64>,
        /// Continuation token printed with the previous page
        #[arg(long)]
        cursor: Option<String>,
        /// Case-insensitive text to look for in artist and song names
        #[arg(long)]
        search: Option<String>,
        /// Keep following the cursor until the end of the catalog
        #[arg(long)]
        all: bool,
        /// Print one line per track instead of JSON
        #[arg(long)]
        plain: bool,
    },
    /// Show a single track
    Get { artist: String, song: String },
    /// Request a signed upload URL for a new track
    UploadUrl { artist: String, song: String },
    /// Record the metadata of an uploaded track
    Submit(MetadataArgs),
    /// Overwrite the metadata of an existing track
    Update(MetadataArgs),
    /// Remove a track from the catalog
    Delete { artist: String, song: String },
    /// Request a signed download URL for a track
    StreamUrl { artist: String, song: String },
    /// Print the effective configuration, with sanitised page limits
    Config,
}

#[derive(Args)]
struct MetadataArgs {
    /// Artist name, read from the file's tags when omitted
    #[arg(long)]
    artist: Option<String>,
    /// Song name, read from the file's tags when omitted
    #[arg(long)]
    song: Option<String>,
    /// Blob key returned by `upload-url`
    #[arg(long)]
    blob_key: String,
    /// Duration in seconds, read from the file when omitted
    #[arg(long)]
    duration: Option<u32>,
    /// Local copy of the uploaded audio file
    #[arg(long)]
    file: Option<PathBuf>,
}

impl MetadataArgs {
    fn into_metadata(self) -> Result<TrackMetadata> {
        let probed = self
            .file
            .as_deref()
            .map(probe::probe_audio_file)
            .transpose()?
            .unwrap_or_default();

        let artist = self
            .artist
            .or(probed.artist)
            .context("No artist given and none tagged in the file")?;
        let song = self
            .song
            .or(probed.title)
            .context("No song given and none tagged in the file")?;
        let duration_seconds = self
            .duration
            .or_else(|| self.file.is_some().then_some(probed.duration_seconds));

        Ok(TrackMetadata {
            artist,
            song,
            blob_key: self.blob_key,
            duration_seconds,
        })
    }
}

/// The entry point of the application.
///
/// Initialises logging, loads the configuration and runs the requested
/// command, returning an error if any part of the execution fails.
fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => config::load_config_from(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => config::load_config(),
    };

    let database = cli
        .database
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.database_path));

    run(&config, &database, cli.command).context("Application error occurred")
}

/// Initialises `env_logger` with the level named by `LOG_LEVEL`.
///
/// Unknown or missing levels fall back to `info`.
fn init_logging() {
    let level = env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|level| level.trim().parse::<LevelFilter>().ok())
        .unwrap_or(LOG_LEVEL_FILTER_DEFAULT);

    env_logger::Builder::from_default_env()
        .filter(None, level)
        .init();
}

/// Opens the catalog database and prepares the URL signer.
///
/// A missing or broken signing configuration is not fatal here. Commands
/// that need a signed URL report it when they run.
fn open_catalog(config: &AppConfig, database: &Path) -> Result<CliCatalog> {
    let store = SqliteTrackStore::open(database)
        .with_context(|| format!("Failed to open catalog database {}", database.display()))?;
    log::debug!(
        "Opened catalog {} with {} tracks",
        database.display(),
        store.count()?
    );

    let signer = KeyedUrlSigner::new(&config.blob)
        .inspect_err(|e| log::warn!("Blob URL signing unavailable: {e}"))
        .ok();

    Ok(Catalog::with_limits(store, signer, config.page_limits()))
}

/// Runs a single command. The catalog is only opened by commands that use it.
fn run(config: &AppConfig, database: &Path, command: Command) -> Result<()> {
    let open = || open_catalog(config, database);

    match command {
        Command::List {
            limit,
            cursor,
            search,
            all,
            plain,
        } => {
            let catalog = open()?;
            let mut request = PageRequest {
                limit,
                cursor,
                search,
            };
            loop {
                let page = catalog.list_tracks(&request)?;
                log::info!(
                    "Returned {} songs, next cursor present: {}",
                    page.items.len(),
                    !page.is_last()
                );

                if plain {
                    for track in &page.items {
                        println!("{}", format::format_track_line(track));
                    }
                } else {
                    print_json(&page)?;
                }

                match request.next(&page) {
                    Some(next) if all => request = next,
                    _ => break,
                }
            }
        }
        Command::Get { artist, song } => print_json(&open()?.get_track(&artist, &song)?)?,
        Command::UploadUrl { artist, song } => {
            let ticket = open()?.request_upload(&artist, &song)?;
            log::info!("Generated upload URL for key: {}", ticket.blob_key);
            print_json(&ticket)?;
        }
        Command::Submit(args) => {
            let metadata = args.into_metadata()?;
            let track = open()?.submit_metadata(metadata)?;
            log::info!("Metadata saved for {}", track.key());
            print_json(&track)?;
        }
        Command::Update(args) => {
            let metadata = args.into_metadata()?;
            print_json(&open()?.update_track(metadata)?)?;
        }
        Command::Delete { artist, song } => {
            open()?.delete_track(&artist, &song)?;
            log::info!("Song deleted successfully");
        }
        Command::StreamUrl { artist, song } => print_json(&open()?.stream_url(&artist, &song)?)?,
        Command::Config => print_json(&effective(config.clone()))?,
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// The configuration as the catalog applies it: page limits sanitised and
/// the signing secret redacted.
fn effective(mut config: AppConfig) -> AppConfig {
    let limits = config.page_limits();
    config.default_page_limit = limits.default_limit().get();
    config.max_page_limit = limits.max_limit().get();

    if !config.blob.signing_secret.is_empty() {
        config.blob.signing_secret = "<redacted>".to_string();
    }
    config
}
