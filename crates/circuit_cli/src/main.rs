//! circuit: runs seasons of circuit_core from the command line

mod cli;

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;

use circuit_core::save::{load_from_path, save_to_path, DEFAULT_START_YEAR};
use circuit_core::{Circuit, CircuitConfig, RankingRow, TournamentId, TournamentState};

use cli::{Cli, Command};

fn main() {
    sensible_env_logger::init!();
    run(Cli::parse()).unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => read_config(path)?,
        None => CircuitConfig::default(),
    };
    match cli.command {
        Command::Simulate { seasons, load, save, top } => {
            let mut circuit = open_circuit(load.as_deref(), config, cli.seed)?;
            for _ in 0..seasons {
                let year = circuit.year();
                let champions = circuit.simulate_season()?;
                println!("== Season {} ({} tournaments) ==", year, champions.len());
                for summary in champions.iter().filter(|s| s.category.is_top_tier()) {
                    println!(
                        "  week {:>2}  {:<28} {}",
                        summary.week,
                        summary.name,
                        summary.winner_name.as_deref().unwrap_or("-")
                    );
                }
                print_rankings(&circuit.rankings(top));
            }
            if let Some(path) = save {
                save_to_path(&path, &circuit.to_save())
                    .with_context(|| format!("saving to {}", path.display()))?;
                println!("Saved to {}", path.display());
            }
            Ok(())
        }
        Command::Rankings { load, top, json } => {
            let circuit = open_circuit(Some(&load), config, cli.seed)?;
            let rows = circuit.rankings(top);
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                println!("{} week {}", circuit.year(), circuit.week());
                print_rankings(&rows);
            }
            Ok(())
        }
        Command::Tournament { id, load, verbose } => {
            let mut circuit = open_circuit(load.as_deref(), config, cli.seed)?;
            play_tournament(&mut circuit, id, verbose)
        }
    }
}

fn read_config(path: &Path) -> Result<CircuitConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let parsed = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => CircuitConfig::from_json_str(&text),
        _ => CircuitConfig::from_yaml_str(&text),
    };
    parsed.with_context(|| format!("parsing config {}", path.display()))
}

/// A saved circuit keeps its own configuration; `config` only seeds new ones.
fn open_circuit(load: Option<&Path>, config: CircuitConfig, seed: u64) -> Result<Circuit> {
    match load {
        Some(path) => {
            let save = load_from_path(path).with_context(|| format!("loading {}", path.display()))?;
            log::info!("{}", save.summary());
            Ok(Circuit::from_save(save, seed)?)
        }
        None => Ok(Circuit::with_default_dataset(config, DEFAULT_START_YEAR, seed)?),
    }
}

fn play_tournament(circuit: &mut Circuit, id: TournamentId, verbose: bool) -> Result<()> {
    let week = circuit.tournament(id)?.week;
    if circuit.tournament(id)?.completed || week < circuit.week() {
        bail!("tournament {} already played this season", id);
    }
    while circuit.week() < week {
        circuit.play_week()?;
        circuit.advance_week();
    }

    circuit.assign_participants()?;
    circuit.generate_bracket(id)?;
    let tournament = circuit.tournament(id)?;
    println!(
        "{} {} ({}, {:?}, {} entrants)",
        tournament.name,
        tournament.year,
        tournament.category.label(),
        tournament.surface,
        tournament.participants.len()
    );

    loop {
        let tournament = circuit.tournament(id)?;
        let round = tournament.current_round;
        let matches = tournament.active_matches.len();
        println!("-- Round {} --", round + 1);
        for index in 0..matches {
            let report = circuit.simulate_match(id, index)?;
            let (Some(winner), Some(loser)) = (report.winner, report.loser) else {
                if let Some(winner) = report.winner {
                    println!("  {} (bye)", circuit.player(winner)?.name);
                }
                continue;
            };
            println!(
                "  {} def. {} {}",
                circuit.player(winner)?.name,
                circuit.player(loser)?.name,
                report.score.as_deref().unwrap_or("")
            );
            if verbose {
                for line in &report.log {
                    println!("      {}", line);
                }
            }
        }
        if circuit.advance_round(id)? == TournamentState::Complete {
            break;
        }
    }

    match circuit.tournament(id)?.winner_id {
        Some(winner) => println!("Champion: {}", circuit.player(winner)?.name),
        None => println!("No champion"),
    }
    Ok(())
}

fn print_rankings(rows: &[RankingRow]) {
    println!("{:>4}  {:<20} {:>4} {:>7} {:>6} {:>8}", "rank", "name", "age", "elo", "pts", "combined");
    for row in rows {
        println!(
            "{:>4}  {:<20} {:>4} {:>7.1} {:>6} {:>8.1}",
            row.rank, row.name, row.age, row.elo_rating, row.championship_points, row.combined
        );
    }
}
