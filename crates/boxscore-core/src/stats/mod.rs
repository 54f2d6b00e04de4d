// Per-player statistic accumulators and the combined per-player feature block.

mod base_running;
mod batting;
mod fielding;
mod pitching;

pub use base_running::BaseRunningStats;
pub use batting::BattingStats;
pub use fielding::FieldingStats;
pub use pitching::PitchingStats;

use serde::Serialize;

/// `numerator / denominator`, or 0 when nothing has been recorded yet.
pub(crate) fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Everything one player accumulated, either over a single game (a game
/// delta) or over a career so far. A player can touch more than one
/// category in a game, e.g. a pitcher who bats.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlayerStats {
    pub batting: BattingStats,
    pub pitching: PitchingStats,
    pub fielding: FieldingStats,
    pub base_running: BaseRunningStats,
}

impl PlayerStats {
    /// Number of columns in one player's feature block.
    pub const FEATURE_WIDTH: usize = BattingStats::FEATURE_NAMES.len()
        + PitchingStats::FEATURE_NAMES.len()
        + FieldingStats::FEATURE_NAMES.len()
        + BaseRunningStats::FEATURE_NAMES.len();

    /// Column names of the feature block, prefixed by category.
    pub fn feature_names() -> Vec<String> {
        let sections: [(&str, &[&str]); 4] = [
            ("batting", &BattingStats::FEATURE_NAMES),
            ("pitching", &PitchingStats::FEATURE_NAMES),
            ("fielding", &FieldingStats::FEATURE_NAMES),
            ("base_running", &BaseRunningStats::FEATURE_NAMES),
        ];
        sections
            .iter()
            .flat_map(|(section, names)| names.iter().map(move |name| format!("{section}.{name}")))
            .collect()
    }

    /// Add another stat line's counts to this one. Rates are derived from
    /// the summed counts, so merging game deltas yields career rates.
    pub fn merge(&mut self, other: &PlayerStats) {
        self.batting.merge(&other.batting);
        self.pitching.merge(&other.pitching);
        self.fielding.merge(&other.fielding);
        self.base_running.merge(&other.base_running);
    }

    /// Write this player's feature block into `block`, which must be exactly
    /// [`FEATURE_WIDTH`](Self::FEATURE_WIDTH) long.
    pub fn write_features(&self, block: &mut [f64]) {
        debug_assert_eq!(block.len(), Self::FEATURE_WIDTH);
        let (batting, rest) = block.split_at_mut(BattingStats::FEATURE_NAMES.len());
        let (pitching, rest) = rest.split_at_mut(PitchingStats::FEATURE_NAMES.len());
        let (fielding, base_running) = rest.split_at_mut(FieldingStats::FEATURE_NAMES.len());
        batting.copy_from_slice(&self.batting.features());
        pitching.copy_from_slice(&self.pitching.features());
        fielding.copy_from_slice(&self.fielding.features());
        base_running.copy_from_slice(&self.base_running.features());
    }

    pub fn features(&self) -> Vec<f64> {
        let mut block = vec![0.0; Self::FEATURE_WIDTH];
        self.write_features(&mut block);
        block
    }
}
