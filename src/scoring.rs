use serde::{Deserialize, Serialize};

use crate::model::{ActionStat, Evaluation};

/// Rating used for every dimension when a player has no evaluations yet
/// (midpoint of the 1-5 scouting scale).
pub const DEFAULT_NEUTRAL_RATING: f64 = 3.0;

pub const RATING_SCALE_MAX: f64 = 5.0;

// Overall weights; must sum to 1.0.
pub const WEIGHT_TECHNIQUE: f64 = 0.25;
pub const WEIGHT_PHYSICAL: f64 = 0.20;
pub const WEIGHT_INTELLIGENCE: f64 = 0.20;
pub const WEIGHT_MENTALITY: f64 = 0.15;
pub const WEIGHT_IMPACT: f64 = 0.20;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubIndicators {
    pub technique: f64,
    pub physical: f64,
    pub intelligence: f64,
    pub mentality: f64,
    pub impact: f64,
}

impl SubIndicators {
    pub fn as_array(&self) -> [f64; 5] {
        [
            self.technique,
            self.physical,
            self.intelligence,
            self.mentality,
            self.impact,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingAverages {
    pub technique: f64,
    pub physical: f64,
    pub intelligence: f64,
    pub mentality: f64,
    pub impact: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Per90Rates {
    pub goals: f64,
    pub assists: f64,
    pub shots: f64,
    pub passes: f64,
    pub duels: f64,
    pub minutes: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightNotes {
    pub technique: String,
    pub physical: String,
    pub intelligence: String,
    pub mentality: String,
    pub impact: String,
    pub overall: String,
}

impl Default for WeightNotes {
    fn default() -> Self {
        Self {
            technique: "60% scout technique + passes/90 capped 40".to_string(),
            physical: "60% scout physical + duels/90 capped 40".to_string(),
            intelligence: "80% scout intelligence, base 20".to_string(),
            mentality: "80% scout mentality, base 20".to_string(),
            impact: "50% scout impact + goals/90 (10 each, cap 30) + assists/90 (10 each, cap 20)"
                .to_string(),
            overall: "25% technique, 20% physical, 20% intelligence, 15% mentality, 20% impact"
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreExplanation {
    pub ratings: RatingAverages,
    pub per90: Per90Rates,
    pub weights: WeightNotes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreReport {
    pub score: f64,
    pub sub_indicators: SubIndicators,
    pub explain: ScoreExplanation,
}

pub fn compute_score(evaluations: &[Evaluation], stats: &[ActionStat]) -> ScoreReport {
    let ratings = average_ratings(evaluations);

    let mut totals = StatTotals::default();
    for s in stats {
        totals.minutes += i64::from(s.minutes);
        totals.goals += i64::from(s.goals);
        totals.assists += i64::from(s.assists);
        totals.shots += i64::from(s.shots);
        totals.passes += i64::from(s.passes);
        totals.duels += i64::from(s.duels);
    }

    let goals_p90 = per90(totals.goals, totals.minutes);
    let assists_p90 = per90(totals.assists, totals.minutes);
    let shots_p90 = per90(totals.shots, totals.minutes);
    let passes_p90 = per90(totals.passes, totals.minutes);
    let duels_p90 = per90(totals.duels, totals.minutes);

    let technique = cap(scaled(ratings.technique, 60.0) + (passes_p90 * 4.0).min(40.0));
    let physical = cap(scaled(ratings.physical, 60.0) + (duels_p90 * 4.0).min(40.0));
    let intelligence = cap(scaled(ratings.intelligence, 80.0) + 20.0);
    let mentality = cap(scaled(ratings.mentality, 80.0) + 20.0);
    let impact = cap(
        scaled(ratings.impact, 50.0)
            + (goals_p90 * 10.0).min(30.0)
            + (assists_p90 * 10.0).min(20.0),
    );

    let overall = WEIGHT_TECHNIQUE * technique
        + WEIGHT_PHYSICAL * physical
        + WEIGHT_INTELLIGENCE * intelligence
        + WEIGHT_MENTALITY * mentality
        + WEIGHT_IMPACT * impact;

    ScoreReport {
        score: round_to(overall, 2),
        sub_indicators: SubIndicators {
            technique: round_to(technique, 1),
            physical: round_to(physical, 1),
            intelligence: round_to(intelligence, 1),
            mentality: round_to(mentality, 1),
            impact: round_to(impact, 1),
        },
        explain: ScoreExplanation {
            ratings,
            per90: Per90Rates {
                goals: round_to(goals_p90, 2),
                assists: round_to(assists_p90, 2),
                shots: round_to(shots_p90, 2),
                passes: round_to(passes_p90, 2),
                duels: round_to(duels_p90, 2),
                minutes: totals.minutes,
            },
            weights: WeightNotes::default(),
        },
    }
}

pub fn per90(value: i64, minutes: i64) -> f64 {
    if minutes <= 0 {
        return 0.0;
    }
    (value as f64 / minutes as f64) * 90.0
}

pub fn average_ratings(evaluations: &[Evaluation]) -> RatingAverages {
    if evaluations.is_empty() {
        return RatingAverages {
            technique: DEFAULT_NEUTRAL_RATING,
            physical: DEFAULT_NEUTRAL_RATING,
            intelligence: DEFAULT_NEUTRAL_RATING,
            mentality: DEFAULT_NEUTRAL_RATING,
            impact: DEFAULT_NEUTRAL_RATING,
        };
    }
    let n = evaluations.len() as f64;
    let avg = |f: fn(&Evaluation) -> i32| {
        evaluations.iter().map(|e| f64::from(f(e))).sum::<f64>() / n
    };
    RatingAverages {
        technique: avg(|e| e.rating_technique),
        physical: avg(|e| e.rating_physical),
        intelligence: avg(|e| e.rating_intelligence),
        mentality: avg(|e| e.rating_mentality),
        impact: avg(|e| e.rating_impact),
    }
}

#[derive(Debug, Default)]
struct StatTotals {
    minutes: i64,
    goals: i64,
    assists: i64,
    shots: i64,
    passes: i64,
    duels: i64,
}

fn scaled(rating: f64, share: f64) -> f64 {
    (rating / RATING_SCALE_MAX) * share
}

fn cap(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

// Ties on the exact binary value go to the even digit.
fn round_to(value: f64, decimals: usize) -> f64 {
    format!("{value:.decimals$}").parse().unwrap_or(value)
}
