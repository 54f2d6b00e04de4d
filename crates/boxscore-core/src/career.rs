// Career aggregation: turns a chronological stream of game results into
// fixed-width feature rows built only from what happened before each game.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::game::{GameResult, Winner};
use crate::game_id::GameId;
use crate::record::PlayerId;
use crate::scaler::{OnlineScaler, ScalerError, ScalerStats};
use crate::stats::PlayerStats;

#[derive(Debug, Error)]
pub enum CareerError {
    #[error("game {game_id} at {timestamp} is older than the last folded game at {last}")]
    OutOfOrder {
        game_id: String,
        timestamp: NaiveDateTime,
        last: NaiveDateTime,
    },

    #[error("player {player} in game {game_id} has slot {slot}, layout has {slots}")]
    SlotOutOfRange {
        game_id: String,
        player: String,
        slot: usize,
        slots: usize,
    },

    #[error(transparent)]
    Scaler(#[from] ScalerError),
}

/// One output row: the game's outcome plus every slotted player's career
/// snapshot going into it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRow {
    pub game_id: GameId,
    pub timestamp: NaiveDateTime,
    pub visitor_score: u32,
    pub home_score: u32,
    pub winner: Winner,
    pub features: Vec<f64>,
}

pub struct CareerAggregator {
    slots: usize,
    careers: HashMap<PlayerId, PlayerStats>,
    scaler: OnlineScaler,
    last_timestamp: Option<NaiveDateTime>,
}

impl CareerAggregator {
    /// `slots` is the full roster layout size (both teams).
    pub fn new(slots: usize) -> Self {
        CareerAggregator {
            slots,
            careers: HashMap::new(),
            scaler: OnlineScaler::new(slots * PlayerStats::FEATURE_WIDTH),
            last_timestamp: None,
        }
    }

    pub fn width(&self) -> usize {
        self.slots * PlayerStats::FEATURE_WIDTH
    }

    pub fn career(&self, player: &PlayerId) -> Option<&PlayerStats> {
        self.careers.get(player)
    }

    pub fn players(&self) -> usize {
        self.careers.len()
    }

    /// Fold one game. The row carries career totals from before this game;
    /// the game's own deltas are merged in afterwards. Games must arrive in
    /// non-decreasing timestamp order.
    pub fn fold(&mut self, game: &GameResult) -> Result<FeatureRow, CareerError> {
        if let Some(last) = self.last_timestamp {
            if game.timestamp < last {
                return Err(CareerError::OutOfOrder {
                    game_id: game.game_id.to_string(),
                    timestamp: game.timestamp,
                    last,
                });
            }
        }

        let width = PlayerStats::FEATURE_WIDTH;
        let mut features = vec![0.0; self.width()];
        for (player, &slot) in &game.lineup {
            if slot >= self.slots {
                return Err(CareerError::SlotOutOfRange {
                    game_id: game.game_id.to_string(),
                    player: player.to_string(),
                    slot,
                    slots: self.slots,
                });
            }
            if let Some(career) = self.careers.get(player) {
                career.write_features(&mut features[slot * width..(slot + 1) * width]);
            }
        }

        self.scaler.update(&features)?;

        for (player, delta) in &game.players {
            self.careers.entry(player.clone()).or_default().merge(delta);
        }
        self.last_timestamp = Some(game.timestamp);

        debug!(
            game_id = %game.game_id,
            slotted = game.lineup.len(),
            careers = self.careers.len(),
            "folded game"
        );

        Ok(FeatureRow {
            game_id: game.game_id.clone(),
            timestamp: game.timestamp,
            visitor_score: game.visitor_score,
            home_score: game.home_score,
            winner: game.winner,
            features,
        })
    }

    pub fn scaler(&self) -> &OnlineScaler {
        &self.scaler
    }

    pub fn scaler_stats(&self) -> ScalerStats {
        self.scaler.stats()
    }
}
