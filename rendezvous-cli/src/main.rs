//! Rendezvous CLI (`rendezvous`)
//!
//! Inspects the session records a node has stored.

use anyhow::Context;
use clap::{Parser, Subcommand};
use rendezvous_model::{PubKey, RecordStore, RendezvousSettings, SessionRecord, StorageConfig};
use rendezvous_storage::{DataDir, RendezvousDb};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rendezvous", version, about = "Inspect rendezvous session records")]
struct Args {
    /// Verbose logging (-v for debug, -vv for trace)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Node state directory
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,

    /// Database location (overrides settings and data dir; `:memory:` allowed)
    #[arg(long)]
    db: Option<String>,

    /// JSON settings file
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every session recorded for a peer (hex public key)
    Get { public_key: String },
    /// Show one random record
    Random,
    /// Count stored records
    Count,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let settings = load_settings(args.config.as_deref())?;
    if !settings.enabled {
        tracing::warn!("Rendezvous accounting is disabled in settings");
    }

    let data_dir = DataDir::new(&args.data_dir);
    let storage = match &args.db {
        Some(location) => StorageConfig::parse(location),
        None => settings.storage(data_dir.rendezvous_db()),
    };
    tracing::debug!(?storage, "Opening rendezvous store");

    let db = RendezvousDb::open(&storage).context("failed to open rendezvous database")?;

    match args.command {
        Command::Get { public_key } => {
            let key = PubKey::from_hex(&public_key).map_err(|e| anyhow::anyhow!(e))?;
            let records = db.get(&key)?;
            if records.is_empty() {
                println!("No sessions recorded for {}", key);
            }
            for record in &records {
                println!("{}", format_record(record));
            }
        }
        Command::Random => match db.random()? {
            Some(record) => println!("{}", format_record(&record)),
            None => println!("Store is empty"),
        },
        Command::Count => println!("{}", db.len()?),
    }

    db.close()?;
    Ok(())
}

fn load_settings(path: Option<&std::path::Path>) -> anyhow::Result<RendezvousSettings> {
    let Some(path) = path else {
        return Ok(RendezvousSettings::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read settings {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid settings {}", path.display()))
}

fn format_record(record: &SessionRecord) -> String {
    let address = record
        .address()
        .map(|a| a.to_string())
        .unwrap_or_else(|| "?".to_string());
    format!(
        "{} {} start={:.3} stop={:.3} duration={:.3}s ping={:.3}",
        &record.public_key().to_string()[..16],
        address,
        record.start(),
        record.stop(),
        record.duration(),
        record.ping(),
    )
}

fn init_tracing(verbosity: u8) {
    let mut filter = EnvFilter::from_default_env();

    // Only apply defaults if RUST_LOG is not set
    if std::env::var("RUST_LOG").is_err() {
        let level = match verbosity {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };
        if let Ok(directive) = level.parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
