//! # Command Line Interface
//!
//! `pick` chooses a lineup for a fixed squad; `build` assembles a squad from a
//! player pool under the budget and then picks its lineup.

use crate::config::CliConfig;
use crate::report::ReportEnvelope;
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use lineup_engine::config::parse_formation_list;
use lineup_engine::{
    format_lineup_table, Candidate, LineupEngine, LineupReport, Roster, SelectionConfig,
    SquadOutcome, SquadReport,
};
use player_pool::PlayerPool;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Fantasy squad builder and lineup picker
#[derive(Parser, Debug)]
#[command(name = "lineup")]
#[command(about = "Build fantasy football squads and pick lineups from predicted points")]
#[command(version)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Pick starting XI, captaincy and bench order for a 15-player squad
    Pick {
        /// Squad file (JSON); rows flagged `in_squad` are used when present
        #[arg(long)]
        squad: PathBuf,

        /// Gameweek to use (default: latest in the file)
        #[arg(long)]
        gw: Option<u32>,

        /// Weight predicted points by start probability
        #[arg(long)]
        weight_by_reliability: bool,

        /// Comma-separated formations to try, e.g. "3-4-3,4-4-2"
        #[arg(long)]
        formations: Option<String>,

        /// Discount applied to doubtful substitutes (0-1)
        #[arg(long)]
        doubtful_penalty: Option<f64>,

        /// Write a JSON report here
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Build a 15-player squad within budget, then pick its lineup
    Build {
        /// Player pool file (JSON)
        #[arg(long)]
        pool: PathBuf,

        /// Gameweek to use (default: latest in the file)
        #[arg(long)]
        gw: Option<u32>,

        /// Budget cap in millions
        #[arg(long)]
        budget: Option<f64>,

        /// Maximum players from one club
        #[arg(long)]
        max_per_club: Option<u32>,

        /// Drop players below this start probability before building
        #[arg(long)]
        min_start_probability: Option<f64>,

        /// Weight predicted points by start probability
        #[arg(long)]
        weight_by_reliability: bool,

        /// Write a JSON report here
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Commands {
    /// Fold command-line flags into the selection policy; flags win over
    /// file and environment values.
    pub fn apply_overrides(&self, selection: &mut SelectionConfig) -> Result<()> {
        match self {
            Commands::Pick { weight_by_reliability, formations, doubtful_penalty, .. } => {
                if *weight_by_reliability {
                    selection.scoring.weight_by_reliability = true;
                }
                if let Some(list) = formations {
                    selection.formations = parse_formation_list(list)?;
                }
                if let Some(penalty) = doubtful_penalty {
                    selection.bench.doubtful_penalty = *penalty;
                }
            }
            Commands::Build {
                budget,
                max_per_club,
                min_start_probability,
                weight_by_reliability,
                ..
            } => {
                if *weight_by_reliability {
                    selection.scoring.weight_by_reliability = true;
                }
                if let Some(budget) = budget {
                    selection.squad.budget_cap = *budget;
                }
                if let Some(cap) = max_per_club {
                    selection.squad.max_per_club = *cap;
                }
                if min_start_probability.is_some() {
                    selection.squad.min_start_probability = *min_start_probability;
                }
            }
        }
        Ok(())
    }
}

/// Loaded candidates plus the metadata that goes into reports
struct LoadedPool {
    candidates: Vec<Candidate>,
    season: Option<String>,
    gameweek: Option<u32>,
}

/// CLI handler
pub struct CliHandler {
    engine: LineupEngine,
}

impl CliHandler {
    /// Create a handler; fails when the selection policy is invalid
    pub fn new(config: &CliConfig) -> Result<Self> {
        let engine = LineupEngine::new(config.selection.clone())?;
        Ok(Self { engine })
    }

    /// Handle CLI commands
    pub async fn handle_command(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Pick { squad, gw, output, .. } => {
                self.pick(&squad, gw, output.as_deref()).await?;
            }
            Commands::Build { pool, gw, output, .. } => {
                self.build(&pool, gw, output.as_deref()).await?;
            }
        }
        Ok(())
    }

    async fn load(&self, path: &Path, gw: Option<u32>, squad_only: bool) -> Result<LoadedPool> {
        let mut pool = PlayerPool::load_from_file(path)
            .await
            .with_context(|| format!("Failed to load players from {:?}", path))?
            .filter_gameweek(gw)?;
        if squad_only {
            pool = pool.squad_only()?;
        }

        let season = pool.season().map(str::to_string);
        let gameweek = pool.latest_gameweek();
        Ok(LoadedPool { candidates: pool.into_candidates(), season, gameweek })
    }

    /// Pick a lineup for a fixed squad
    async fn pick(&self, path: &Path, gw: Option<u32>, output: Option<&Path>) -> Result<()> {
        let loaded = self.load(path, gw, true).await?;
        let roster = Roster::new(loaded.candidates).context("Squad file is not a legal squad")?;
        let lineup = self.engine.pick_for_roster(&roster)?;

        println!("{}", format_lineup_table(&lineup, &roster));

        if let Some(path) = output {
            let report = LineupReport::new(&lineup, &roster)?;
            ReportEnvelope::new(report, loaded.season, loaded.gameweek).write_to(path).await?;
        }
        Ok(())
    }

    /// Build a squad under budget and pick its lineup
    async fn build(&self, path: &Path, gw: Option<u32>, output: Option<&Path>) -> Result<()> {
        let loaded = self.load(path, gw, false).await?;
        info!("Building squad from {} candidates", loaded.candidates.len());

        let outcome = self.engine.plan_squad(&loaded.candidates)?;
        match &outcome {
            SquadOutcome::Planned(plan) => {
                println!("{}", format_lineup_table(&plan.lineup, &plan.roster));
            }
            SquadOutcome::Shortfall(partial) => {
                println!("{}", "PARTIAL SQUAD".bold());
                for pick in &partial.build.picks {
                    println!("  {:<3} | {:<20} | {:>5.1}", pick.position.as_str(), pick.name, pick.price);
                }
            }
        }
        self.print_budget_summary(&outcome);

        if let Some(path) = output {
            let report = SquadReport::new(&outcome, self.engine.config().squad.budget_cap)?;
            ReportEnvelope::new(report, loaded.season, loaded.gameweek).write_to(path).await?;
        }

        if let Some(shortfall) = outcome.shortfall() {
            bail!("No formation yields a complete squad: {}", shortfall);
        }
        Ok(())
    }

    fn print_budget_summary(&self, outcome: &SquadOutcome) {
        let budget_cap = self.engine.config().squad.budget_cap;
        let spend = outcome.build().total_spend;
        println!(
            "💰 {} {:.1} / {:.1} (left {:.1})",
            "Spend:".bold(),
            spend,
            budget_cap,
            budget_cap - spend
        );
        println!("🏟️  {} {}", "Built for:".bold(), outcome.build_formation());

        if outcome.relaxed_cutoff() {
            warn!("Start-probability cutoff was relaxed to complete the squad");
            println!("{}", "⚠️  Start-probability cutoff relaxed".yellow());
        }
        if let Some(shortfall) = outcome.shortfall() {
            println!("{} {}", "⚠️  Shortfall:".yellow().bold(), shortfall);
        }
    }
}
