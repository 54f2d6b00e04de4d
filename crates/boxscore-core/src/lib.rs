// Library root: play decoding, per-player statistics, lineup tracking and the
// chronological career feature pipeline.

pub mod career;
pub mod game;
pub mod game_id;
pub mod lineup;
pub mod play;
pub mod record;
pub mod scaler;
pub mod stats;

pub use career::{CareerAggregator, CareerError, FeatureRow};
pub use game::{GameError, GameResult, GameTransformer, Winner};
pub use game_id::{GameId, GameIdError};
pub use lineup::{Lineup, LineupConfig, LineupError, LineupTracker};
pub use play::{decode, Advance, Base, FieldPosition, PlayEvent};
pub use record::{Defense, PlayRecord, PlayerId, Side};
pub use scaler::{OnlineScaler, ScalerError, ScalerStats};
pub use stats::PlayerStats;
