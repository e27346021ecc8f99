// SPDX-License-Identifier: GPL-3.0-only

use capture_bridge::Config;
use capture_bridge::backends::discovery::{DiscoveryBackendType, MediaKind};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "capture-bridge")]
#[command(about = "Discover cameras and microphones and stream device events")]
#[command(version = capture_bridge::constants::app_version())]
#[command(subcommand_required = false)]
struct Cli {
    /// Discovery backend (pipewire, v4l2); overrides the config file
    #[arg(short, long, global = true)]
    backend: Option<DiscoveryBackendType>,

    /// Serve devices from a JSON snapshot instead of the host
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    /// Config file (default: ~/.config/capture-bridge/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available capture devices
    List {
        /// Only list devices of this kind (video, audio)
        #[arg(short, long)]
        media: Option<MediaKind>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show the first device of a kind (the system default when known)
    First {
        /// Media kind to look up (video, audio)
        #[arg(short, long)]
        media: MediaKind,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Watch for device changes and print channel events as JSON lines
    Watch {
        /// Only watch devices of this kind (video, audio)
        #[arg(short, long)]
        media: Option<MediaKind>,

        /// Re-query interval in milliseconds
        #[arg(short, long)]
        interval_ms: Option<u64>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match cli.config.as_deref() {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }

    // Set RUST_LOG to override the configured filter
    // Examples: RUST_LOG=debug, RUST_LOG=capture_bridge=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_filter)),
        )
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let enumerator = cli::build_enumerator(&config, cli.snapshot.as_deref())?;

    match cli.command {
        Some(Commands::List { media, json }) => cli::list_devices(&enumerator, media, json)?,
        None => cli::list_devices(&enumerator, None, false)?,
        Some(Commands::First { media, json }) => cli::first_device(&enumerator, media, json)?,
        Some(Commands::Watch { media, interval_ms }) => {
            if let Some(ms) = interval_ms {
                config.watch_interval_ms = ms;
            }
            cli::watch_devices(enumerator, media, &config)?
        }
    }

    Ok(())
}
