use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "circuit", author, version, about = "Tennis circuit simulator")]
pub struct Cli {
    /// Circuit configuration (YAML, or JSON by extension)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Random seed for the whole run
    #[arg(long, global = true, default_value_t = 42)]
    pub seed: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[command(rename_all = "lower_case")]
pub enum Command {
    /// Play whole seasons week by week
    Simulate {
        /// Number of seasons to play
        #[arg(short, long, default_value_t = 1)]
        seasons: u32,

        /// Continue from a saved circuit instead of the default dataset
        #[arg(long)]
        load: Option<PathBuf>,

        /// Write the final state here (.json for JSON, anything else binary)
        #[arg(long)]
        save: Option<PathBuf>,

        /// Ranking rows printed after each season
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
    /// Print the current ranking of a saved circuit
    Rankings {
        /// Saved circuit
        #[arg(long)]
        load: PathBuf,

        #[arg(short, long, default_value_t = 20)]
        top: usize,

        /// Print rows as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Play forward to one tournament and print every match of it
    Tournament {
        /// Tournament id in the calendar
        id: u32,

        /// Saved circuit to start from
        #[arg(long)]
        load: Option<PathBuf>,

        /// Also print the per-game log of each match
        #[arg(short, long, default_value_t = false)]
        verbose: bool,
    },
}
