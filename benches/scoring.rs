use chrono::{NaiveDate, Utc};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use uuid::Uuid;

use talentlab::Store;
use talentlab::model::{ActionStat, Evaluation, NewActionStat, NewEvaluation, NewPlayer, NewTournament};
use talentlab::scoring::compute_score;

fn sample_evaluations(n: usize) -> Vec<Evaluation> {
    (0..n)
        .map(|i| {
            let r = (i % 5) as i32 + 1;
            Evaluation {
                id: Uuid::new_v4(),
                event_id: Uuid::nil(),
                player_id: Uuid::nil(),
                scout_name: format!("Scout {}", i % 7),
                rating_technique: r,
                rating_physical: 6 - r,
                rating_intelligence: r,
                rating_mentality: 3,
                rating_impact: (r + 1).min(5),
                strengths: None,
                weaknesses: None,
                remarks: None,
                created_at: Utc::now(),
            }
        })
        .collect()
}

fn sample_stats(n: usize) -> Vec<ActionStat> {
    (0..n)
        .map(|i| ActionStat {
            id: Uuid::new_v4(),
            event_id: Uuid::nil(),
            player_id: Uuid::nil(),
            minutes: 20 + (i % 71) as i32,
            shots: (i % 4) as i32,
            passes: 10 + (i % 30) as i32,
            duels: (i % 12) as i32,
            goals: (i % 9 == 0) as i32,
            assists: (i % 11 == 0) as i32,
        })
        .collect()
}

fn bench_compute_score(c: &mut Criterion) {
    let evaluations = sample_evaluations(5_000);
    let stats = sample_stats(5_000);
    c.bench_function("compute_score_5k", |b| {
        b.iter(|| {
            let report = compute_score(black_box(&evaluations), black_box(&stats));
            black_box(report.score);
        })
    });
}

fn bench_player_score_from_store(c: &mut Criterion) {
    let mut store = Store::open_in_memory().unwrap();
    let player = store
        .create_player(NewPlayer {
            first_name: "Bench".to_string(),
            last_name: "Player".to_string(),
            birthdate: NaiveDate::from_ymd_opt(2007, 1, 1).unwrap(),
            nation: "Deutschland".to_string(),
            ..Default::default()
        })
        .unwrap()
        .id;
    let event = store
        .create_tournament(NewTournament {
            name: "Bench Cup".to_string(),
            ..Default::default()
        })
        .unwrap()
        .id;
    for i in 0..200 {
        let r = (i % 5) + 1;
        store
            .create_evaluation(NewEvaluation::new(event, player).with_ratings([r, r, 3, 4, r]))
            .unwrap();
        store
            .create_action_stat(NewActionStat {
                event_id: event,
                player_id: player,
                minutes: 60 + i % 31,
                goals: i % 2,
                passes: 20 + i % 15,
                duels: i % 9,
                ..Default::default()
            })
            .unwrap();
    }

    c.bench_function("player_score_store_200", |b| {
        b.iter(|| {
            let report = store.player_score(black_box(player), Some(event)).unwrap();
            black_box(report.score);
        })
    });
}

criterion_group!(score, bench_compute_score, bench_player_score_from_store);
criterion_main!(score);
