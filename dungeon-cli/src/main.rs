mod report;

use dungeon_core::{
    ConnectivityMode, ContentFile, DEFAULT_DUNGEON_ID, DungeonBuilderConfig, RngSource,
    create_dungeon_with,
};

use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::{ArgAction, Parser, ValueEnum};
use tracing::{Level, event};

const DEFAULT_CONTENT: &str = include_str!("../content/default.json");

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(version, long_about = None)]
struct Args {
    /// Content document with dungeon configs and room templates
    #[arg(long)]
    content: Option<PathBuf>,

    /// Id of the dungeon config to generate
    #[arg(short, long, default_value = DEFAULT_DUNGEON_ID)]
    dungeon: String,

    /// Seed for a reproducible run, drawn at random when missing
    #[arg(short, long)]
    seed: Option<u64>,

    #[clap(short, long, default_value_t, value_enum)]
    connectivity: ConnectivityMode,

    #[clap(short, long, default_value_t, value_enum)]
    format: OutputFormat,

    /// Generate this many dungeons from consecutive seeds and print statistics
    #[arg(short = 'n', long)]
    samples: Option<u32>,

    /// Once for debug logs, twice for trace logs
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let content = load_content(args.content.as_deref())?;
    let config = content
        .get_config(&args.dungeon)
        .with_context(|| format!("No dungeon config to generate '{}'", args.dungeon))?;

    let builder_config = DungeonBuilderConfig::with_connectivity(args.connectivity);
    let seed = args.seed.unwrap_or_else(rand::random);

    if let Some(samples) = args.samples {
        let stats = report::sample(&content, config, &builder_config, seed, samples);
        report::print_stats(&stats);

        return Ok(());
    }

    event!(Level::INFO, "Generating {} with seed {}", config.id, seed);

    let graph = create_dungeon_with(config, &content, &mut RngSource::seeded(seed), &builder_config)
        .with_context(|| format!("Failed to generate '{}' with seed {}", config.id, seed))?;

    match args.format {
        OutputFormat::Text => report::print_dungeon(&graph, seed),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&graph)?),
    }

    Ok(())
}

fn load_content(path: Option<&Path>) -> anyhow::Result<ContentFile> {
    let Some(path) = path else {
        return ContentFile::from_json(DEFAULT_CONTENT).context("Built-in content is malformed");
    };

    let json = read_to_string(path)
        .with_context(|| format!("Failed to read content file {}", path.display()))?;

    ContentFile::from_json(&json)
        .with_context(|| format!("Failed to parse content file {}", path.display()))
}
