use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("invalid reference to {entity} {id}")]
    InvalidReference { entity: &'static str, id: Uuid },

    #[error("kickoff {kickoff} outside tournament range {start}..={end}")]
    KickoffOutOfRange {
        kickoff: NaiveDateTime,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("pitch {pitch_id} not valid for this tournament")]
    InvalidPitch { pitch_id: Uuid },

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        StoreError::NotFound { entity, id }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
