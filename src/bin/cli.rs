use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;

use facematch::{bootstrap, enroll, load_config, FaceIndex, FileStore};

#[derive(Parser)]
#[command(name = "facematch")]
struct Cli {
    /// Engine config (TOML); defaults apply when the file is absent.
    #[arg(long, default_value = "facematch.toml")]
    config: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Persist an embedding under an identity and make it searchable.
    Enroll {
        store: PathBuf,
        label: String,
        /// Comma-separated embedding components.
        vector: String,
        /// Source tag, e.g. the originating filename.
        #[arg(long, default_value = "")]
        provenance: String,
    },
    /// Match an embedding against the enrolled faces, printing a JSON verdict.
    Identify {
        store: PathBuf,
        vector: String,
        /// Overrides the configured threshold.
        #[arg(long)]
        threshold: Option<f32>,
    },
    /// Report what a bootstrap of the store loads.
    Stats { store: PathBuf },
}

fn parse_vector(s: &str) -> Result<Vec<f32>> {
    s.split(',')
        .map(|x| {
            x.trim()
                .parse::<f32>()
                .with_context(|| format!("bad vector component {x:?}"))
        })
        .collect()
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let cfg = load_config(&cli.config)?;

    match cli.command {
        Commands::Enroll {
            store,
            label,
            vector,
            provenance,
        } => {
            let store = FileStore::open_or_create(&store)?;
            let index = FaceIndex::new(cfg.dimension, cfg.metric);
            let raw = parse_vector(&vector)?;
            enroll(&store, &index, &label, &provenance, &raw)?;
            println!("enrolled {label}");
        }
        Commands::Identify {
            store,
            vector,
            threshold,
        } => {
            let store = FileStore::open(&store)?;
            let index = FaceIndex::new(cfg.dimension, cfg.metric);
            bootstrap(&store, &index)?;
            let raw = parse_vector(&vector)?;
            let verdict = index.decide(&raw, threshold.unwrap_or(cfg.threshold))?;
            // NaN (empty index) serializes as null
            let response = json!({
                "matched": verdict.matched,
                "label": verdict.label(),
                "provenance": verdict.provenance(),
                "score": verdict.score,
            });
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Stats { store } => {
            let store = FileStore::open(&store)?;
            let index = FaceIndex::new(cfg.dimension, cfg.metric);
            let report = bootstrap(&store, &index)?;
            println!(
                "{} face(s) enrolled under metric {}, {} skipped",
                report.inserted,
                cfg.metric,
                report.skipped
            );
        }
    }
    Ok(())
}
