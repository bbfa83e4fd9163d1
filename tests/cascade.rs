use chrono::NaiveDate;
use rusqlite::params;
use uuid::Uuid;

use talentlab::Store;
use talentlab::model::{
    GameInput, LineupEntry, NewActionStat, NewEvaluation, NewPlayer, NewTeam, NewTournament,
    NewVenue, PitchInput, RosterSlot, VideoInput, VideoStatus,
};

fn new_player(first: &str, last: &str) -> NewPlayer {
    NewPlayer {
        first_name: first.to_string(),
        last_name: last.to_string(),
        birthdate: NaiveDate::from_ymd_opt(2006, 4, 12).unwrap(),
        nation: "Deutschland".to_string(),
        ..Default::default()
    }
}

fn count(store: &Store, table: &str, column: &str, id: Uuid) -> i64 {
    let sql = format!("SELECT COUNT(*) FROM {table} WHERE {column} = ?1");
    store
        .connection()
        .query_row(&sql, params![id], |row| row.get(0))
        .unwrap()
}

fn total(store: &Store, table: &str) -> i64 {
    let sql = format!("SELECT COUNT(*) FROM {table}");
    store
        .connection()
        .query_row(&sql, [], |row| row.get(0))
        .unwrap()
}

struct Fixture {
    store: Store,
    tournament_id: Uuid,
    team_a: Uuid,
    team_b: Uuid,
    game_id: Uuid,
    target: Uuid,
    bystander: Uuid,
}

/// One tournament, two teams, one game. `target` and `bystander` are both
/// rostered, participating, evaluated, tracked and lined up.
fn populated() -> Fixture {
    let mut store = Store::open_in_memory().unwrap();
    let target = store.create_player(new_player("Noah", "Kwan")).unwrap().id;
    let bystander = store.create_player(new_player("Liam", "Faber")).unwrap().id;

    let view = store
        .create_tournament(NewTournament {
            name: "Scouting Day".to_string(),
            participants: Some(vec![target, bystander]),
            ..Default::default()
        })
        .unwrap();
    let tournament_id = view.id;

    store
        .add_team(
            tournament_id,
            NewTeam {
                name: "Team Rot".to_string(),
                kit_color: Some("#e10600".to_string()),
                roster: vec![RosterSlot {
                    player_id: target,
                    number: "9".to_string(),
                }],
            },
        )
        .unwrap();
    let view = store
        .add_team(
            tournament_id,
            NewTeam {
                name: "Team Schwarz".to_string(),
                kit_color: None,
                roster: vec![RosterSlot {
                    player_id: bystander,
                    number: "10".to_string(),
                }],
            },
        )
        .unwrap();
    let team_a = view.teams[0].id;
    let team_b = view.teams[1].id;

    let view = store
        .create_game(tournament_id, GameInput::between(team_a, team_b))
        .unwrap();
    let game_id = view.games[0].game.id;
    store
        .replace_lineup(
            tournament_id,
            game_id,
            vec![
                LineupEntry {
                    player_id: target,
                    team_id: team_a,
                    number: "9".to_string(),
                    kit: None,
                    position: Some("ST".to_string()),
                },
                LineupEntry {
                    player_id: bystander,
                    team_id: team_b,
                    number: "10".to_string(),
                    kit: None,
                    position: Some("OM".to_string()),
                },
            ],
        )
        .unwrap();
    store
        .add_video(
            tournament_id,
            game_id,
            VideoInput {
                name: "full-match.mp4".to_string(),
                status: VideoStatus::Processing,
            },
        )
        .unwrap();

    for player_id in [target, bystander] {
        store
            .create_evaluation(NewEvaluation::new(tournament_id, player_id).with_ratings([4, 4, 3, 5, 4]))
            .unwrap();
        store
            .create_action_stat(NewActionStat {
                event_id: tournament_id,
                player_id,
                minutes: 90,
                goals: 1,
                passes: 25,
                ..Default::default()
            })
            .unwrap();
    }

    Fixture {
        store,
        tournament_id,
        team_a,
        team_b,
        game_id,
        target,
        bystander,
    }
}

#[test]
fn deleting_a_player_leaves_no_orphans() {
    let mut fx = populated();

    let summary = fx.store.delete_player(fx.target).unwrap();
    assert_eq!(summary.roster_entries, 1);
    assert_eq!(summary.participants, 1);
    assert_eq!(summary.evaluations, 1);
    assert_eq!(summary.action_stats, 1);
    assert_eq!(summary.lineups, 1);

    for table in [
        "roster_entry",
        "tournament_participant",
        "evaluation",
        "action_stat",
        "game_lineup",
    ] {
        assert_eq!(count(&fx.store, table, "player_id", fx.target), 0, "{table}");
        assert_eq!(count(&fx.store, table, "player_id", fx.bystander), 1, "{table}");
    }
    assert!(fx.store.find_player(fx.target).unwrap().is_none());
    assert!(fx.store.find_player(fx.bystander).unwrap().is_some());

    // Teams and games stay; only the player's own rows went away.
    let view = fx.store.get_tournament(fx.tournament_id).unwrap();
    assert_eq!(view.teams.len(), 2);
    assert!(view.team(fx.team_a).unwrap().roster.is_empty());
    assert_eq!(view.participants, vec![fx.bystander]);
    assert_eq!(view.games[0].lineup.len(), 1);
}

#[test]
fn deleting_a_missing_player_is_not_found() {
    let mut fx = populated();
    let err = fx.store.delete_player(Uuid::new_v4()).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(total(&fx.store, "player"), 2);
}

#[test]
fn deleting_a_tournament_cascades_to_teams_games_and_media() {
    let mut fx = populated();

    let summary = fx.store.delete_tournament(fx.tournament_id).unwrap();
    assert_eq!(summary.teams, 2);
    assert_eq!(summary.roster_entries, 2);
    assert_eq!(summary.games, 1);
    assert_eq!(summary.lineups, 2);
    assert_eq!(summary.videos, 1);
    assert_eq!(summary.participants, 2);

    for table in [
        "tournament",
        "team",
        "roster_entry",
        "game",
        "game_lineup",
        "game_video",
        "tournament_participant",
    ] {
        assert_eq!(total(&fx.store, table), 0, "{table}");
    }

    // Scouting history and players survive.
    assert_eq!(total(&fx.store, "player"), 2);
    assert_eq!(total(&fx.store, "evaluation"), 2);
    assert_eq!(total(&fx.store, "action_stat"), 2);
    assert!(fx.store.get_tournament(fx.tournament_id).unwrap_err().is_not_found());
}

#[test]
fn deleting_a_team_removes_its_roster_and_games() {
    let mut fx = populated();

    let view = fx.store.delete_team(fx.tournament_id, fx.team_b).unwrap();
    assert_eq!(view.teams.len(), 1);
    assert_eq!(view.teams[0].id, fx.team_a);
    assert!(view.games.is_empty());
    assert_eq!(count(&fx.store, "roster_entry", "team_id", fx.team_b), 0);
    assert_eq!(count(&fx.store, "game_lineup", "game_id", fx.game_id), 0);
    assert_eq!(count(&fx.store, "game_video", "game_id", fx.game_id), 0);
    assert_eq!(count(&fx.store, "roster_entry", "team_id", fx.team_a), 1);
}

#[test]
fn team_from_another_tournament_is_not_found() {
    let mut fx = populated();
    let other = fx
        .store
        .create_tournament(NewTournament {
            name: "Other".to_string(),
            ..Default::default()
        })
        .unwrap();
    let err = fx.store.delete_team(other.id, fx.team_a).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(total(&fx.store, "team"), 2);
}

#[test]
fn deleting_a_game_removes_lineups_and_videos() {
    let mut fx = populated();
    fx.store.delete_game(fx.tournament_id, fx.game_id).unwrap();
    assert_eq!(total(&fx.store, "game"), 0);
    assert_eq!(total(&fx.store, "game_lineup"), 0);
    assert_eq!(total(&fx.store, "game_video"), 0);
    assert_eq!(total(&fx.store, "team"), 2);
}

#[test]
fn failed_roster_replace_keeps_previous_roster() {
    let mut fx = populated();
    let err = fx
        .store
        .replace_roster(
            fx.tournament_id,
            fx.team_a,
            vec![
                RosterSlot {
                    player_id: fx.bystander,
                    number: "4".to_string(),
                },
                RosterSlot {
                    player_id: Uuid::new_v4(),
                    number: "5".to_string(),
                },
            ],
        )
        .unwrap_err();
    assert!(matches!(
        err,
        talentlab::StoreError::InvalidReference { entity: "player", .. }
    ));

    let view = fx.store.get_tournament(fx.tournament_id).unwrap();
    let roster = &view.team(fx.team_a).unwrap().roster;
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].player_id, fx.target);
    assert_eq!(roster[0].number, "9");
}

#[test]
fn deleting_a_venue_unlinks_tournaments() {
    let mut store = Store::open_in_memory().unwrap();
    let venue = store
        .create_venue(NewVenue {
            name: "Sportpark Nord".to_string(),
            pitches: vec![
                PitchInput {
                    label: "A".to_string(),
                    surface: Some("Rasen".to_string()),
                    lights: Some(true),
                },
                PitchInput {
                    label: "B".to_string(),
                    surface: Some("Kunstrasen".to_string()),
                    lights: None,
                },
            ],
            ..Default::default()
        })
        .unwrap();
    let tournament = store
        .create_tournament(NewTournament {
            name: "Hallencup".to_string(),
            venue_id: Some(venue.venue.id),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(tournament.venue.as_ref().map(|v| v.pitches.len()), Some(2));

    store.delete_venue(venue.venue.id).unwrap();
    assert_eq!(total(&store, "venue_pitch"), 0);
    let tournament = store.get_tournament(tournament.id).unwrap();
    assert!(tournament.venue.is_none());
    let raw = store.find_tournament(tournament.id).unwrap().unwrap();
    assert_eq!(raw.venue_id, None);
}

fn venue_with_game(store: &mut Store) -> (Uuid, Uuid, Uuid) {
    let venue = store
        .create_venue(NewVenue {
            name: "Waldstadion".to_string(),
            pitches: vec![PitchInput {
                label: "Hauptplatz".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        })
        .unwrap();
    let tournament_id = store
        .create_tournament(NewTournament {
            name: "Sommercup".to_string(),
            venue_id: Some(venue.venue.id),
            ..Default::default()
        })
        .unwrap()
        .id;
    let view = store
        .add_team(
            tournament_id,
            NewTeam {
                name: "Team Grün".to_string(),
                ..Default::default()
            },
        )
        .unwrap();
    let team_id = view.teams[0].id;
    let mut input = GameInput::between(team_id, team_id);
    input.pitch_id = Some(venue.pitches[0].id);
    let view = store.create_game(tournament_id, input).unwrap();
    assert_eq!(view.games[0].game.pitch_id, Some(venue.pitches[0].id));
    (venue.venue.id, tournament_id, view.games[0].game.id)
}

#[test]
fn deleting_a_venue_clears_game_pitches() {
    let mut store = Store::open_in_memory().unwrap();
    let (venue_id, tournament_id, game_id) = venue_with_game(&mut store);

    store.delete_venue(venue_id).unwrap();
    let game = store.get_game(tournament_id, game_id).unwrap();
    assert_eq!(game.game.pitch_id, None);
    assert_eq!(total(&store, "game"), 1);
}

#[test]
fn replacing_pitches_clears_game_pitches() {
    let mut store = Store::open_in_memory().unwrap();
    let (venue_id, tournament_id, game_id) = venue_with_game(&mut store);

    let view = store
        .update_venue(
            venue_id,
            talentlab::model::VenueUpdate {
                pitches: Some(vec![PitchInput {
                    label: "Nebenplatz".to_string(),
                    ..Default::default()
                }]),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(view.pitches.len(), 1);
    let game = store.get_game(tournament_id, game_id).unwrap();
    assert_eq!(game.game.pitch_id, None);

    // Leaving the pitch list alone keeps existing links.
    let game = store.get_game(tournament_id, game_id).unwrap().game;
    let mut input = GameInput::between(game.team_a_id, game.team_a_id);
    input.pitch_id = Some(view.pitches[0].id);
    store.update_game(tournament_id, game_id, input).unwrap();
    store
        .update_venue(
            venue_id,
            talentlab::model::VenueUpdate {
                note: Some("Kunstrasen".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
    let game = store.get_game(tournament_id, game_id).unwrap();
    assert_eq!(game.game.pitch_id, Some(view.pitches[0].id));
}
