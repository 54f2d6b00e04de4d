// Season event-file ingestion and the SQLite feature sink.

pub mod db;
pub mod season;

pub use db::{FeatureStore, StoredGame};
pub use season::{parse_year, SeasonError, SeasonGame, SeasonReader, SUPPORTED_YEARS};
