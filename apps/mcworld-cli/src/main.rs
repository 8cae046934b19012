use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use mcworld_common::{Block, Location, Material, SEGMENT_SIZE};
use mcworld_kernel::{Chunk, chunk_loading_status};
use mcworld_registry::{DimensionRegistry, RegistryConfig, Tag};
use mcworld_stream::{FeedConfig, WorldFeed};
use mcworld_tools::WorldInspector;
use tracing_subscriber::EnvFilter;

const STONE: Material = Material(1);
const ORE: Material = Material(16);

#[derive(Parser)]
#[command(name = "mcworld-cli", about = "CLI tool for mcworld operations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Parse a registry payload and print its dimension types as JSON
    Dimensions {
        /// JSON registry payload; the built-in defaults when omitted
        #[arg(short, long)]
        registry: Option<PathBuf>,
        /// Namespace for bare names
        #[arg(short, long, default_value = "minecraft")]
        namespace: String,
    },
    /// Stream synthetic columns into a world and query it
    Demo {
        /// Dimension to join
        #[arg(short, long, default_value = "overworld")]
        dimension: String,
        /// Search radius for the ore scan
        #[arg(short, long, default_value = "8")]
        radius: f64,
        /// Columns per side of the streamed square
        #[arg(short, long, default_value = "4")]
        columns: i32,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("mcworld-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", mcworld_common::crate_info());
            println!("registry: {}", mcworld_registry::crate_info());
            println!("kernel: {}", mcworld_kernel::crate_info());
            println!("stream: {}", mcworld_stream::crate_info());
            println!("tools: {}", mcworld_tools::crate_info());
        }
        Commands::Dimensions {
            registry,
            namespace,
        } => {
            let dims = DimensionRegistry::with_config(RegistryConfig {
                default_namespace: namespace,
            });
            let count = match registry {
                Some(path) => {
                    let text = std::fs::read_to_string(&path)
                        .with_context(|| format!("reading {}", path.display()))?;
                    let payload = Tag::from_json_str(&text)
                        .with_context(|| format!("parsing {}", path.display()))?;
                    dims.store_dimension_list(&payload)?
                }
                None => dims.load_default_dimensions()?,
            };
            tracing::info!(count, "dimension types registered");

            let all: Vec<_> = dims.names().iter().filter_map(|n| dims.get(n)).collect();
            println!("{}", serde_json::to_string_pretty(&all)?);
        }
        Commands::Demo {
            dimension,
            radius,
            columns,
        } => {
            let mut feed = WorldFeed::new(Arc::new(DimensionRegistry::new()), FeedConfig::default());
            let dim = feed.login(None, &dimension)?;
            println!(
                "Joined {}: min_y={}, height={}, segments={}",
                dim.name,
                dim.min_y,
                dim.height,
                dim.column_size()
            );

            let half = columns / 2;
            for cx in -half..columns - half {
                for cz in -half..columns - half {
                    let mut segments = vec![Some(Chunk::filled(Block::new(STONE)))];
                    segments.resize(dim.column_size().max(1), None);
                    feed.receive_column(cx, cz, segments);
                }
            }
            println!("{}", chunk_loading_status(feed.world()));

            // Scatter a few ore blocks in the bottom segment.
            let world = Arc::clone(feed.world());
            let span = (columns * SEGMENT_SIZE as i32).max(1);
            for i in 0..5 {
                let x = -half * SEGMENT_SIZE as i32 + (i * 7) % span;
                let z = -half * SEGMENT_SIZE as i32 + (i * 11) % span;
                feed.block_change(&Location::block(x, dim.min_y + 4, z), Block::new(ORE));
            }

            let origin = Location::block(0, dim.min_y + 4, 0);
            let found = world.find_block(&origin, ORE, radius);
            println!("Found {} ore block(s) within {radius} of {origin}:", found.len());
            for loc in &found {
                println!("  {loc}");
            }

            println!("{}", WorldInspector::summary(&world));
            println!("Feed: {:?}", feed.stats());
        }
    }

    Ok(())
}
