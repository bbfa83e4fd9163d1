use chrono::Utc;
use uuid::Uuid;

use talentlab::model::{ActionStat, Evaluation};
use talentlab::scoring::{DEFAULT_NEUTRAL_RATING, compute_score};

fn evaluation(ratings: [i32; 5]) -> Evaluation {
    let [technique, physical, intelligence, mentality, impact] = ratings;
    Evaluation {
        id: Uuid::new_v4(),
        event_id: Uuid::nil(),
        player_id: Uuid::nil(),
        scout_name: "Scout".to_string(),
        rating_technique: technique,
        rating_physical: physical,
        rating_intelligence: intelligence,
        rating_mentality: mentality,
        rating_impact: impact,
        strengths: None,
        weaknesses: None,
        remarks: None,
        created_at: Utc::now(),
    }
}

fn stat(minutes: i32, goals: i32, assists: i32, shots: i32, passes: i32, duels: i32) -> ActionStat {
    ActionStat {
        id: Uuid::new_v4(),
        event_id: Uuid::nil(),
        player_id: Uuid::nil(),
        minutes,
        shots,
        passes,
        duels,
        goals,
        assists,
    }
}

#[test]
fn empty_inputs_give_neutral_score() {
    let report = compute_score(&[], &[]);
    assert_eq!(report.score, 46.0);
    assert_eq!(
        report.sub_indicators.as_array(),
        [36.0, 36.0, 68.0, 68.0, 30.0]
    );
    assert_eq!(report.explain.ratings.technique, DEFAULT_NEUTRAL_RATING);
    assert_eq!(report.explain.per90.minutes, 0);
    assert_eq!(report.explain.per90.goals, 0.0);
}

#[test]
fn full_marks_with_one_full_game() {
    let report = compute_score(&[evaluation([5, 5, 5, 5, 5])], &[stat(90, 2, 1, 5, 30, 10)]);

    let per90 = report.explain.per90;
    assert_eq!(per90.goals, 2.0);
    assert_eq!(per90.assists, 1.0);
    assert_eq!(per90.shots, 5.0);
    assert_eq!(per90.passes, 30.0);
    assert_eq!(per90.duels, 10.0);
    assert_eq!(per90.minutes, 90);

    assert_eq!(
        report.sub_indicators.as_array(),
        [100.0, 100.0, 100.0, 100.0, 80.0]
    );
    assert_eq!(report.score, 96.0);
}

#[test]
fn zero_minutes_means_zero_rates() {
    let report = compute_score(&[], &[stat(0, 3, 2, 7, 40, 12), stat(0, 1, 0, 0, 0, 0)]);
    let per90 = report.explain.per90;
    assert_eq!(
        [per90.goals, per90.assists, per90.shots, per90.passes, per90.duels],
        [0.0; 5]
    );
    assert_eq!(report.score, 46.0);
}

#[test]
fn ratings_are_averaged_across_scouts() {
    let report = compute_score(
        &[evaluation([4, 2, 3, 5, 1]), evaluation([2, 4, 3, 3, 5])],
        &[],
    );
    let ratings = report.explain.ratings;
    assert_eq!(ratings.technique, 3.0);
    assert_eq!(ratings.physical, 3.0);
    assert_eq!(ratings.mentality, 4.0);
    assert_eq!(ratings.impact, 3.0);
    assert_eq!(report.sub_indicators.mentality, 84.0);
}

#[test]
fn stats_are_pooled_before_per90() {
    // 2 goals over 180 minutes is 1 per 90.
    let report = compute_score(&[], &[stat(45, 2, 0, 0, 0, 0), stat(135, 0, 0, 0, 0, 0)]);
    assert_eq!(report.explain.per90.goals, 1.0);
    assert_eq!(report.explain.per90.minutes, 180);
    assert_eq!(report.sub_indicators.impact, 40.0);
}

#[test]
fn per90_explanation_is_rounded_to_two_decimals() {
    let report = compute_score(&[], &[stat(70, 1, 0, 0, 0, 0)]);
    assert_eq!(report.explain.per90.goals, 1.29);
}

#[test]
fn exact_ties_round_to_even_digit() {
    // Impact ratings sum to 25 over 8 scouts: average 3.125, impact 31.25.
    let mut evals = vec![evaluation([3, 3, 3, 3, 4])];
    evals.extend((0..7).map(|_| evaluation([3; 5])));
    let report = compute_score(&evals, &[]);
    assert_eq!(report.explain.ratings.impact, 3.125);
    assert_eq!(report.sub_indicators.impact, 31.2);
    assert_eq!(report.score, 46.25);

    // Average 3.375, impact 33.75 rounds up to the even digit.
    let mut evals = vec![evaluation([3, 3, 3, 3, 6])];
    evals.extend((0..7).map(|_| evaluation([3; 5])));
    let report = compute_score(&evals, &[]);
    assert_eq!(report.sub_indicators.impact, 33.8);
}

#[test]
fn scores_stay_within_bounds() {
    let minutes_options = [0, 1, 10, 90, 900];
    let count_options = [0, 1, 5, 50, 500];
    for rating in 0..=6 {
        for minutes in minutes_options {
            for count in count_options {
                let report = compute_score(
                    &[evaluation([rating; 5])],
                    &[stat(minutes, count, count, count, count, count)],
                );
                for value in report.sub_indicators.as_array() {
                    assert!((0.0..=100.0).contains(&value), "sub-indicator {value}");
                }
                assert!((0.0..=100.0).contains(&report.score), "score {}", report.score);
            }
        }
    }
}

#[test]
fn same_input_same_output() {
    let evals = [evaluation([4, 3, 5, 2, 4]), evaluation([3, 3, 4, 4, 2])];
    let stats = [stat(64, 1, 0, 3, 22, 9), stat(90, 0, 2, 1, 41, 6)];
    assert_eq!(compute_score(&evals, &stats), compute_score(&evals, &stats));
}

#[test]
fn raising_a_rating_never_lowers_its_indicator() {
    let stats = [stat(90, 1, 1, 2, 8, 4)];
    let mut previous = [f64::MIN; 5];
    for rating in 1..=5 {
        for dim in 0..5 {
            let mut ratings = [3; 5];
            ratings[dim] = rating;
            let report = compute_score(&[evaluation(ratings)], &stats);
            let value = report.sub_indicators.as_array()[dim];
            assert!(value >= previous[dim], "dimension {dim} dropped at rating {rating}");
            previous[dim] = value;
        }
    }
}

#[test]
fn report_serializes_with_client_field_names() {
    let report = compute_score(&[], &[]);
    let json = serde_json::to_value(&report).expect("report should serialize");
    assert_eq!(json["score"], 46.0);
    assert_eq!(json["subIndicators"]["impact"], 30.0);
    assert_eq!(json["explain"]["per90"]["minutes"], 0);
    assert_eq!(
        json["explain"]["weights"]["overall"],
        "25% technique, 20% physical, 20% intelligence, 15% mentality, 20% impact"
    );
    assert_eq!(
        json["explain"]["weights"]["impact"],
        "50% scout impact + goals/90 (10 each, cap 30) + assists/90 (10 each, cap 20)"
    );
}
