use clap::Parser;
use serde::Serialize;
use std::io::Read;
use std::path::PathBuf;
use std::process;

use tallyboard::scoring::{score_tournament, PlayerScore, ScoreEvent};

const EXIT_IO: i32 = 1;
const EXIT_PARSE: i32 = 2;

#[derive(Parser, Debug)]
#[command(name = "standings")]
#[command(about = "Compute standings from a JSON score event export", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a JSON file containing an array of score events; "-" reads stdin
    events_file: PathBuf,

    /// Restrict the table to these players (repeatable); defaults to
    /// everyone appearing in the file
    #[arg(short, long = "player")]
    players: Vec<String>,

    /// Emit JSON instead of a text table
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct StandingsRow {
    player_id: String,
    #[serde(flatten)]
    score: PlayerScore,
}

/// Every player in the file, in order of first appearance
fn players_in_events(events: &[ScoreEvent]) -> Vec<String> {
    let mut players = Vec::new();
    for event in events {
        if !players.contains(&event.player_id) {
            players.push(event.player_id.clone());
        }
    }
    players
}

fn build_rows(events: &[ScoreEvent], roster: &[String]) -> Vec<StandingsRow> {
    let scores = score_tournament(events, roster, None);

    let mut rows: Vec<StandingsRow> = roster
        .iter()
        .map(|player_id| StandingsRow {
            player_id: player_id.clone(),
            score: scores.get(player_id).copied().unwrap_or_default(),
        })
        .collect();

    rows.sort_by(|a, b| {
        b.score
            .net_score
            .cmp(&a.score.net_score)
            .then(b.score.plus_clusters.cmp(&a.score.plus_clusters))
            .then(a.score.minus_clusters.cmp(&b.score.minus_clusters))
            .then(a.player_id.cmp(&b.player_id))
    });

    rows
}

fn print_table(rows: &[StandingsRow]) {
    println!(
        "{:<4} {:<24} {:>4} {:>7} {:>7} {:>7} {:>7}",
        "Rank", "Player", "Net", "Plus", "Minus", "Carry+", "Carry-"
    );
    for (index, row) in rows.iter().enumerate() {
        println!(
            "{:<4} {:<24} {:>4} {:>7} {:>7} {:>7} {:>7}",
            index + 1,
            row.player_id,
            row.score.net_score,
            row.score.plus_clusters,
            row.score.minus_clusters,
            row.score.plus_remainder,
            row.score.minus_remainder,
        );
    }
}

fn main() {
    let cli = Cli::parse();

    let raw = if cli.events_file.as_os_str() == "-" {
        let mut raw = String::new();
        if let Err(e) = std::io::stdin().read_to_string(&mut raw) {
            eprintln!("Cannot read stdin: {}", e);
            process::exit(EXIT_IO);
        }
        raw
    } else {
        match std::fs::read_to_string(&cli.events_file) {
            Ok(raw) => raw,
            Err(e) => {
                eprintln!("Cannot read {}: {}", cli.events_file.display(), e);
                process::exit(EXIT_IO);
            }
        }
    };

    let events: Vec<ScoreEvent> = match serde_json::from_str(&raw) {
        Ok(events) => events,
        Err(e) => {
            eprintln!("Cannot parse {}: {}", cli.events_file.display(), e);
            process::exit(EXIT_PARSE);
        }
    };

    let roster = if cli.players.is_empty() {
        players_in_events(&events)
    } else {
        cli.players.clone()
    };

    let rows = build_rows(&events, &roster);

    if cli.json {
        // Serialization of the row list cannot fail
        println!("{}", serde_json::to_string_pretty(&rows).unwrap());
    } else {
        print_table(&rows);
    }
}
