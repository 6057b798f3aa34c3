//! Lineupcast CLI - Command-line interface for lineup-based match predictions

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use lineupcast::config::EngineConfig;
use lineupcast::core::LineupAggregator;
use lineupcast::data::load_catalog;
use lineupcast::predictor::FallbackPredictor;

/// Default catalog directory (relative to project root)
const DEFAULT_DATA_DIR: &str = "data";

#[derive(Parser)]
#[command(name = "lineupcast")]
#[command(author, version, about = "Lineup-based match prediction CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the catalog data directory
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Path to an engine configuration JSON file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog players
    Players {
        /// Filter by position code (GK, DF, MF, FW)
        #[arg(long)]
        position: Option<String>,
    },

    /// Predict a match between two lineups
    Predict {
        /// Comma-separated starter names for team A, in slot order
        /// (GK, RB, RCB, LCB, LB, RCM, CDM, LCM, RW, ST, LW)
        #[arg(long)]
        team_a: String,

        /// Comma-separated starter names for team B, in slot order
        #[arg(long)]
        team_b: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("failed to load config from {:?}", path))?,
        None => EngineConfig::default(),
    };

    let catalog = load_catalog(&cli.data_dir)
        .with_context(|| format!("failed to load catalog from {:?}", cli.data_dir))?;

    match cli.command {
        Commands::Players { position } => {
            let filter = position.map(|p| p.to_uppercase());
            let mut players: Vec<_> = catalog.players().collect();
            players.sort_by(|a, b| a.name.cmp(&b.name));

            for player in players {
                if let Some(ref code) = filter {
                    if player.position().code() != code.as_str() {
                        continue;
                    }
                }
                println!(
                    "{:<24} {:<18} {:>3}  {}",
                    player.name,
                    player.team,
                    player.age,
                    player.position().code().cyan()
                );
            }
        }

        Commands::Predict { team_a, team_b } => {
            let split = |raw: &str| -> Vec<String> {
                raw.split(',').map(|name| name.trim().to_string()).collect()
            };

            let aggregator = LineupAggregator::new(config);
            let features = aggregator.aggregate(&catalog, &split(&team_a), &split(&team_b))?;
            let prediction = FallbackPredictor::new().predict(&features);

            println!("{}", "Match prediction".bold());
            println!(
                "  strength:       {:.3} vs {:.3}",
                features.team_a.strength, features.team_b.strength
            );
            println!(
                "  chemistry:      {:.3} vs {:.3}",
                features.team_a.chemistry.overall, features.team_b.chemistry.overall
            );
            println!(
                "  expected goals: {:.2} - {:.2}",
                prediction.team_a_expected_goals, prediction.team_b_expected_goals
            );
            println!(
                "  win/draw/loss:  {} / {} / {}",
                format!("{:.1}%", prediction.win_probability * 100.0).green(),
                format!("{:.1}%", prediction.draw_probability * 100.0).yellow(),
                format!("{:.1}%", prediction.loss_probability * 100.0).red()
            );
        }
    }

    Ok(())
}
