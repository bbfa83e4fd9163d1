use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use log::info;
use serde::Serialize;
use uuid::Uuid;

use talentlab::Store;
use talentlab::config::AppConfig;
use talentlab::logs;

const USAGE: &str = "usage: talentlab [--db <path>] <command>

commands:
  players                         list players, newest first
  player <id>                     show one player
  score <player-id> [--event <id>]
                                  talent score, optionally for one event
  tournaments                     list tournaments with teams, games and venue
  tournament <id>                 show one tournament
  venues                          list venues with pitches
  delete-player <id>              delete a player and everything referencing it
  delete-tournament <id>          delete a tournament with teams, rosters and games
  dedupe-players                  remove players registered twice under one name";

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let mut cfg = AppConfig::from_env();
    let mut args = std::env::args().skip(1).collect::<Vec<_>>();
    if let Some(path) = take_db_path_arg(&mut args)? {
        cfg.db_path = path;
    }
    logs::init_logger(&cfg.log)?;

    let Some(command) = args.first().cloned() else {
        println!("{USAGE}");
        return Ok(());
    };
    let rest = &args[1..];

    let mut store = Store::open(&cfg.db_path)
        .with_context(|| format!("open store {}", cfg.db_path.display()))?;
    if let Some(path) = store.path() {
        info!("using store {}", path.display());
    }

    match command.as_str() {
        "players" => print_json(&store.list_players()?),
        "player" => {
            let id = parse_id(rest.first(), "player id")?;
            print_json(&store.get_player(id)?)
        }
        "score" => {
            let id = parse_id(rest.first(), "player id")?;
            let event_id = parse_event_arg(&rest[1..])?;
            let report = store
                .player_score(id, event_id)
                .with_context(|| format!("score player {id}"))?;
            print_json(&report)
        }
        "tournaments" => print_json(&store.list_tournaments()?),
        "tournament" => {
            let id = parse_id(rest.first(), "tournament id")?;
            print_json(&store.get_tournament(id)?)
        }
        "venues" => print_json(&store.list_venues()?),
        "delete-player" => {
            let id = parse_id(rest.first(), "player id")?;
            print_json(&store.delete_player(id)?)
        }
        "delete-tournament" => {
            let id = parse_id(rest.first(), "tournament id")?;
            print_json(&store.delete_tournament(id)?)
        }
        "dedupe-players" => print_json(&store.dedupe_players()?),
        "help" | "--help" | "-h" => {
            println!("{USAGE}");
            Ok(())
        }
        other => Err(anyhow!("unknown command: {other}\n\n{USAGE}")),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{json}");
    Ok(())
}

fn parse_id(raw: Option<&String>, what: &str) -> Result<Uuid> {
    let Some(raw) = raw else {
        bail!("missing {what}\n\n{USAGE}");
    };
    Uuid::parse_str(raw.trim()).with_context(|| format!("invalid {what}: {raw}"))
}

fn parse_event_arg(args: &[String]) -> Result<Option<Uuid>> {
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix("--event=") {
            return parse_id(Some(&raw.to_string()), "event id").map(Some);
        }
        if arg == "--event" {
            return parse_id(args.get(idx + 1), "event id").map(Some);
        }
    }
    Ok(None)
}

fn take_db_path_arg(args: &mut Vec<String>) -> Result<Option<PathBuf>> {
    let Some(idx) = args
        .iter()
        .position(|arg| arg == "--db" || arg.starts_with("--db="))
    else {
        return Ok(None);
    };
    let arg = args.remove(idx);
    let raw = match arg.strip_prefix("--db=") {
        Some(path) => path.to_string(),
        None => {
            if idx >= args.len() {
                bail!("--db expects a path");
            }
            args.remove(idx)
        }
    };
    if raw.trim().is_empty() {
        bail!("--db expects a path");
    }
    Ok(Some(PathBuf::from(raw.trim())))
}
