// Pipeline driver: extract seasons, transform games, fold careers, load rows
// into the feature store and publish scaler statistics.

use std::ops::RangeInclusive;

use anyhow::{Context, Result};
use boxscore_core::{
    CareerAggregator, FeatureRow, GameTransformer, LineupConfig, PlayerStats,
};
use boxscore_store::{FeatureStore, SeasonError, SeasonGame, SeasonReader};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Config;

/// State keys written on publish.
pub const STATE_ROSTER_WIDTH: &str = "layout/roster_width";
pub const STATE_FEATURE_NAMES: &str = "layout/feature_names";
pub const STATE_GAMES: &str = "games";

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

/// Outcome of one season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeasonSummary {
    pub year: i32,
    pub games: usize,
    pub skipped: usize,
    pub rows: usize,
}

/// Outcome of a full run over a year range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub seasons: Vec<SeasonSummary>,
    pub failed_seasons: Vec<i32>,
}

impl RunSummary {
    pub fn rows(&self) -> usize {
        self.seasons.iter().map(|s| s.rows).sum()
    }

    pub fn skipped(&self) -> usize {
        self.seasons.iter().map(|s| s.skipped).sum()
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// One run's worth of pipeline state. Career and scaler state live in the
/// aggregator, so a fresh `Pipeline` always rebuilds from the first season.
pub struct Pipeline {
    reader: SeasonReader,
    store: FeatureStore,
    transformer: GameTransformer,
    aggregator: CareerAggregator,
    lineup: LineupConfig,
}

impl Pipeline {
    pub fn new(reader: SeasonReader, store: FeatureStore, lineup: LineupConfig) -> Self {
        Pipeline {
            reader,
            store,
            transformer: GameTransformer::new(lineup),
            aggregator: CareerAggregator::new(lineup.roster_width()),
            lineup,
        }
    }

    /// Open the store and season reader named by `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = FeatureStore::open(&config.paths.db_path)
            .with_context(|| format!("failed to open feature store {}", config.paths.db_path))?;
        let reader = SeasonReader::new(&config.paths.data_dir);
        Ok(Pipeline::new(reader, store, config.lineup_config()))
    }

    pub fn store(&self) -> &FeatureStore {
        &self.store
    }

    pub fn aggregator(&self) -> &CareerAggregator {
        &self.aggregator
    }

    pub fn extract(&self, year: i32) -> Result<Vec<SeasonGame>, SeasonError> {
        self.reader.extract(year)
    }

    /// Transform and fold games in order. Returns the feature rows and the
    /// number of games skipped.
    pub fn transform(&mut self, games: &[SeasonGame]) -> (Vec<FeatureRow>, usize) {
        let mut rows = Vec::with_capacity(games.len());
        let mut skipped = 0;
        for game in games {
            let result = match self.transformer.transform(&game.game_id, &game.records) {
                Ok(result) => result,
                Err(e) => {
                    warn!("skipping game {}: {}", game.game_id, e);
                    skipped += 1;
                    continue;
                }
            };
            match self.aggregator.fold(&result) {
                Ok(row) => {
                    debug!(
                        "game {}: {}-{} ({} players)",
                        game.game_id,
                        row.visitor_score,
                        row.home_score,
                        result.players.len()
                    );
                    rows.push(row);
                }
                Err(e) => {
                    warn!("skipping game {}: {}", game.game_id, e);
                    skipped += 1;
                }
            }
        }
        (rows, skipped)
    }

    pub fn load(&self, rows: &[FeatureRow]) -> Result<usize> {
        self.store.insert_games(rows).context("failed to load feature rows")
    }

    /// Write the scaler statistics and layout metadata.
    pub fn publish(&self) -> Result<()> {
        self.store
            .save_scaler(&self.aggregator.scaler_stats())
            .context("failed to save scaler")?;
        self.store.save_state(
            STATE_ROSTER_WIDTH,
            &serde_json::json!(self.lineup.roster_width()),
        )?;
        self.store.save_state(
            STATE_FEATURE_NAMES,
            &serde_json::json!(PlayerStats::feature_names()),
        )?;
        self.store
            .save_state(STATE_GAMES, &serde_json::json!(self.store.game_count()?))?;
        info!(
            "published scaler over {} games ({} columns)",
            self.aggregator.scaler().count(),
            self.aggregator.width()
        );
        Ok(())
    }

    /// Extract, transform and load one season.
    pub fn process(&mut self, year: i32) -> Result<SeasonSummary> {
        let games = self
            .extract(year)
            .with_context(|| format!("failed to extract season {year}"))?;
        let (rows, skipped) = self.transform(&games);
        let loaded = self.load(&rows)?;
        info!(
            "season {}: {} games, {} rows, {} skipped",
            year,
            games.len(),
            loaded,
            skipped
        );
        Ok(SeasonSummary {
            year,
            games: games.len(),
            skipped,
            rows: loaded,
        })
    }

    /// Rebuild the store over `years`. A season that fails to extract or load
    /// is logged and skipped; the remaining seasons still run.
    pub fn run(&mut self, years: RangeInclusive<i32>) -> Result<RunSummary> {
        self.store.clear().context("failed to clear feature store")?;
        let mut summary = RunSummary::default();
        for year in years {
            match self.process(year) {
                Ok(season) => summary.seasons.push(season),
                Err(e) => {
                    warn!("season {} failed: {:#}", year, e);
                    summary.failed_seasons.push(year);
                }
            }
        }
        self.publish()?;
        Ok(summary)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
