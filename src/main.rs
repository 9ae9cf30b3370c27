use anyhow::Result;
use clap::{Parser, Subcommand};
use synapse::{cli, config};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "synapse", version, about = "Associative memory graph engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show whole-network statistics
    Stats,
    /// Enumerate paths between two experiences
    Paths {
        from: i64,
        to: i64,
        #[arg(long, default_value_t = 4)]
        max_depth: usize,
        #[arg(long, default_value_t = 1)]
        min_strength: i64,
    },
    /// Find clusters of highly connected experiences
    Clusters {
        #[arg(long, default_value_t = 3)]
        min_connections: usize,
    },
    /// Show centrality metrics for one experience
    Centrality { experience_id: i64 },
    /// Reinforce temporal links between co-occurring experiences in a context
    Reinforce {
        context_id: i64,
        #[arg(long)]
        window_seconds: Option<i64>,
        #[arg(long)]
        min_increase: Option<i64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config (for log level)
    let config = config::SynapseConfig::load()?;

    // Initialize tracing with the configured log level, on stderr so stdout
    // stays clean for report output.
    let filter = EnvFilter::try_new(&config.logging.level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Stats => cli::stats::stats(&config),
        Command::Paths {
            from,
            to,
            max_depth,
            min_strength,
        } => cli::paths::paths(&config, from, to, max_depth, min_strength),
        Command::Clusters { min_connections } => {
            cli::clusters::clusters(&config, min_connections)
        }
        Command::Centrality { experience_id } => {
            cli::centrality::centrality(&config, experience_id)
        }
        Command::Reinforce {
            context_id,
            window_seconds,
            min_increase,
        } => cli::reinforce::reinforce(&config, context_id, window_seconds, min_increase),
    }
}
