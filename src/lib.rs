pub mod config;
pub mod error;
pub mod logs;
pub mod model;
pub mod read_model;
pub mod scoring;
pub mod store;
pub mod store_games;
pub mod store_players;
pub mod store_scouting;
pub mod store_tournaments;
pub mod store_venues;

pub use error::{StoreError, StoreResult};
pub use scoring::{ScoreReport, compute_score};
pub use store::Store;
