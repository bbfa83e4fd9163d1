use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_SCOUT_NAME: &str = "Scout";
pub const DEFAULT_RATING: i32 = 3;

pub fn new_unique_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: Uuid,
    pub unique_id: String,
    pub first_name: String,
    pub last_name: String,
    pub birthdate: NaiveDate,
    pub nation: String,
    pub plays_in: Option<String>,
    pub position: Option<String>,
    pub club: Option<String>,
    pub level: Option<String>,
    pub height: Option<String>,
    pub foot: Option<String>,
    pub note: Option<String>,
    pub photo_data: Option<String>,
    pub shortlisted: bool,
    pub created_at: DateTime<Utc>,
}

impl Player {
    pub fn name_key(&self) -> String {
        format!(
            "{}::{}",
            self.first_name.trim().to_lowercase(),
            self.last_name.trim().to_lowercase()
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlayer {
    pub first_name: String,
    pub last_name: String,
    pub birthdate: NaiveDate,
    pub nation: String,
    #[serde(default)]
    pub plays_in: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub club: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub height: Option<String>,
    #[serde(default)]
    pub foot: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub photo_data: Option<String>,
    #[serde(default)]
    pub shortlisted: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub nation: Option<String>,
    pub plays_in: Option<String>,
    pub position: Option<String>,
    pub club: Option<String>,
    pub level: Option<String>,
    pub height: Option<String>,
    pub foot: Option<String>,
    pub note: Option<String>,
    pub photo_data: Option<String>,
    pub shortlisted: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub id: Uuid,
    pub unique_id: String,
    pub name: String,
    pub country: String,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub note: Option<String>,
    pub venue_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Tournament {
    /// True when `kickoff` falls inside the tournament dates. Tournaments
    /// without both dates accept any kickoff.
    pub fn accepts_kickoff(&self, kickoff: NaiveDateTime) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => (start..=end).contains(&kickoff.date()),
            _ => true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewTournament {
    pub name: String,
    pub country: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub note: Option<String>,
    pub venue_id: Option<Uuid>,
    pub participants: Option<Vec<Uuid>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TournamentUpdate {
    pub name: Option<String>,
    pub country: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub note: Option<String>,
    pub venue_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentParticipant {
    pub id: Uuid,
    pub tournament_id: Uuid,
    pub player_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: Uuid,
    pub unique_id: String,
    pub tournament_id: Uuid,
    pub name: String,
    pub kit_color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTeam {
    pub name: String,
    #[serde(default)]
    pub kit_color: Option<String>,
    #[serde(default)]
    pub roster: Vec<RosterSlot>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamUpdate {
    pub name: Option<String>,
    pub kit_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub id: Uuid,
    pub team_id: Uuid,
    pub player_id: Uuid,
    pub number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterSlot {
    pub player_id: Uuid,
    pub number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: Uuid,
    pub tournament_id: Uuid,
    pub team_a_id: Uuid,
    pub team_b_id: Option<Uuid>,
    pub kickoff: Option<NaiveDateTime>,
    pub kit_a: Option<String>,
    pub kit_b: Option<String>,
    pub note: Option<String>,
    pub pitch_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameInput {
    pub team_a_id: Uuid,
    #[serde(default)]
    pub team_b_id: Option<Uuid>,
    #[serde(default)]
    pub kickoff: Option<NaiveDateTime>,
    #[serde(default)]
    pub kit_a: Option<String>,
    #[serde(default)]
    pub kit_b: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub pitch_id: Option<Uuid>,
}

impl GameInput {
    pub fn between(team_a_id: Uuid, team_b_id: Uuid) -> Self {
        Self {
            team_a_id,
            team_b_id: Some(team_b_id),
            kickoff: None,
            kit_a: None,
            kit_b: None,
            note: None,
            pitch_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameLineup {
    pub id: Uuid,
    pub game_id: Uuid,
    pub player_id: Uuid,
    pub team_id: Uuid,
    pub number: String,
    pub kit: Option<String>,
    pub position: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineupEntry {
    pub player_id: Uuid,
    pub team_id: Uuid,
    pub number: String,
    #[serde(default)]
    pub kit: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoStatus {
    None,
    #[default]
    Uploaded,
    Processing,
    Done,
    Failed,
}

impl VideoStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            VideoStatus::None => "none",
            VideoStatus::Uploaded => "uploaded",
            VideoStatus::Processing => "processing",
            VideoStatus::Done => "done",
            VideoStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for VideoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VideoStatus {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(VideoStatus::None),
            "uploaded" => Ok(VideoStatus::Uploaded),
            "processing" => Ok(VideoStatus::Processing),
            "done" => Ok(VideoStatus::Done),
            "failed" => Ok(VideoStatus::Failed),
            other => Err(format!("unknown video status: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameVideo {
    pub id: Uuid,
    pub game_id: Uuid,
    pub name: String,
    pub status: VideoStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoInput {
    pub name: String,
    #[serde(default)]
    pub status: VideoStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Venue {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub home_club: Option<String>,
    pub contact: Option<String>,
    pub price: Option<String>,
    pub note: Option<String>,
    pub photo_data: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenuePitch {
    pub id: Uuid,
    pub venue_id: Uuid,
    pub label: String,
    pub surface: Option<String>,
    pub lights: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PitchInput {
    pub label: String,
    #[serde(default)]
    pub surface: Option<String>,
    #[serde(default)]
    pub lights: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewVenue {
    pub name: String,
    pub address: Option<String>,
    pub home_club: Option<String>,
    pub contact: Option<String>,
    pub price: Option<String>,
    pub note: Option<String>,
    pub photo_data: Option<String>,
    pub pitches: Vec<PitchInput>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VenueUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
    pub home_club: Option<String>,
    pub contact: Option<String>,
    pub price: Option<String>,
    pub note: Option<String>,
    pub photo_data: Option<String>,
    pub pitches: Option<Vec<PitchInput>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub id: Uuid,
    pub event_id: Uuid,
    pub player_id: Uuid,
    pub scout_name: String,
    pub rating_technique: i32,
    pub rating_physical: i32,
    pub rating_intelligence: i32,
    pub rating_mentality: i32,
    pub rating_impact: i32,
    pub strengths: Option<String>,
    pub weaknesses: Option<String>,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvaluation {
    pub event_id: Uuid,
    pub player_id: Uuid,
    #[serde(default = "default_scout_name")]
    pub scout_name: String,
    #[serde(default = "default_rating")]
    pub rating_technique: i32,
    #[serde(default = "default_rating")]
    pub rating_physical: i32,
    #[serde(default = "default_rating")]
    pub rating_intelligence: i32,
    #[serde(default = "default_rating")]
    pub rating_mentality: i32,
    #[serde(default = "default_rating")]
    pub rating_impact: i32,
    #[serde(default)]
    pub strengths: Option<String>,
    #[serde(default)]
    pub weaknesses: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
}

impl NewEvaluation {
    pub fn new(event_id: Uuid, player_id: Uuid) -> Self {
        Self {
            event_id,
            player_id,
            scout_name: default_scout_name(),
            rating_technique: DEFAULT_RATING,
            rating_physical: DEFAULT_RATING,
            rating_intelligence: DEFAULT_RATING,
            rating_mentality: DEFAULT_RATING,
            rating_impact: DEFAULT_RATING,
            strengths: None,
            weaknesses: None,
            remarks: None,
        }
    }

    pub fn with_ratings(mut self, ratings: [i32; 5]) -> Self {
        let [technique, physical, intelligence, mentality, impact] = ratings;
        self.rating_technique = technique;
        self.rating_physical = physical;
        self.rating_intelligence = intelligence;
        self.rating_mentality = mentality;
        self.rating_impact = impact;
        self
    }
}

fn default_scout_name() -> String {
    DEFAULT_SCOUT_NAME.to_string()
}

fn default_rating() -> i32 {
    DEFAULT_RATING
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionStat {
    pub id: Uuid,
    pub event_id: Uuid,
    pub player_id: Uuid,
    pub minutes: i32,
    pub shots: i32,
    pub passes: i32,
    pub duels: i32,
    pub goals: i32,
    pub assists: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewActionStat {
    pub event_id: Uuid,
    pub player_id: Uuid,
    #[serde(default)]
    pub minutes: i32,
    #[serde(default)]
    pub shots: i32,
    #[serde(default)]
    pub passes: i32,
    #[serde(default)]
    pub duels: i32,
    #[serde(default)]
    pub goals: i32,
    #[serde(default)]
    pub assists: i32,
}
