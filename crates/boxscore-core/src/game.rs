// Per-game transform: runs one game's play records through the decoder, the
// stat accumulators and the lineup tracker.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::game_id::GameId;
use crate::lineup::{LineupConfig, LineupError, LineupTracker};
use crate::play::{decode, PlayEvent};
use crate::record::{PlayRecord, PlayerId, Side};
use crate::stats::PlayerStats;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("record for game {found} found while transforming {expected}")]
    ForeignRecord { expected: String, found: String },

    #[error(transparent)]
    Lineup(#[from] LineupError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    Visitor,
    Home,
}

impl Winner {
    /// Higher score wins; a tie (or a game with no runs) goes to the home
    /// team.
    pub fn from_score(visitor: u32, home: u32) -> Winner {
        if visitor > home {
            Winner::Visitor
        } else {
            Winner::Home
        }
    }

    pub fn is_home(&self) -> bool {
        matches!(self, Winner::Home)
    }
}

/// Everything one game produced: final score, each participant's stat
/// delta, and the roster slot of every starter and bullpen arm.
#[derive(Debug, Clone)]
pub struct GameResult {
    pub game_id: GameId,
    pub timestamp: NaiveDateTime,
    pub visitor_score: u32,
    pub home_score: u32,
    pub winner: Winner,
    pub players: HashMap<PlayerId, PlayerStats>,
    pub lineup: HashMap<PlayerId, usize>,
}

pub struct GameTransformer {
    lineup: LineupTracker,
}

impl GameTransformer {
    pub fn new(config: LineupConfig) -> Self {
        GameTransformer {
            lineup: LineupTracker::new(config),
        }
    }

    pub fn lineup_config(&self) -> LineupConfig {
        self.lineup.config()
    }

    /// Transform one game's records, which must be in play order. Bullpen
    /// state carries over to the next call, so games should be fed in
    /// chronological order. A rejected game leaves no lineup state behind.
    pub fn transform(
        &mut self,
        game_id: &GameId,
        records: &[PlayRecord],
    ) -> Result<GameResult, GameError> {
        if let Some(stray) = records.iter().find(|r| r.game_id != game_id.as_str()) {
            return Err(GameError::ForeignRecord {
                expected: game_id.to_string(),
                found: stray.game_id.clone(),
            });
        }

        let mut players: HashMap<PlayerId, PlayerStats> = HashMap::new();
        let mut visitor_score = 0u32;
        let mut home_score = 0u32;
        let mut unknown = 0usize;

        for record in records {
            self.lineup.observe(record);

            if !record.play_code.trim().is_empty() {
                let event = decode(&record.play_code, &record.advance_code);
                if event.unknown {
                    unknown += 1;
                }
                credit_play(&mut players, record, &event);
                match record.batting_side {
                    Side::Visitor => visitor_score += event.num_run,
                    Side::Home => home_score += event.num_run,
                }
            }

            // the log carries the score after the play
            if let (Some(visitor), Some(home)) = (record.visitor_score, record.home_score) {
                if (visitor, home) != (visitor_score, home_score) {
                    debug!(
                        game_id = %game_id,
                        event = record.event_in_game,
                        counted = ?(visitor_score, home_score),
                        logged = ?(visitor, home),
                        "score disagrees with the log, using the log"
                    );
                    visitor_score = visitor;
                    home_score = home;
                }
            }
        }

        let lineup = self.lineup.fetch()?.assignments();
        let winner = Winner::from_score(visitor_score, home_score);

        debug!(
            game_id = %game_id,
            plays = records.len(),
            players = players.len(),
            unknown,
            visitor_score,
            home_score,
            "transformed game"
        );

        Ok(GameResult {
            game_id: game_id.clone(),
            timestamp: game_id.timestamp(),
            visitor_score,
            home_score,
            winner,
            players,
            lineup,
        })
    }
}

/// Credit one decoded play to the batter, the runners on base, every fielder
/// and the pitcher.
fn credit_play(players: &mut HashMap<PlayerId, PlayerStats>, record: &PlayRecord, event: &PlayEvent) {
    players
        .entry(record.batter.clone())
        .or_default()
        .batting
        .apply(event);

    for (base, runner) in record.runners_on_base() {
        players
            .entry(runner.clone())
            .or_default()
            .base_running
            .apply(event, base);
    }

    for (position, fielder) in record.defense.iter() {
        players
            .entry(fielder.clone())
            .or_default()
            .fielding
            .apply(event, position);
    }

    players
        .entry(record.pitcher().clone())
        .or_default()
        .pitching
        .apply(event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Defense;

    fn defense(prefix: &str) -> Defense {
        Defense::new(std::array::from_fn(|i| PlayerId::new(format!("{prefix}{}", i + 1))))
    }

    fn record(side: Side, batter: &str, play: &str, advance: &str) -> PlayRecord {
        let fielders = match side {
            Side::Visitor => defense("h"),
            Side::Home => defense("v"),
        };
        PlayRecord {
            game_id: "ANA202204070".into(),
            event_in_game: 0,
            visiting_team: "HOU".into(),
            home_team: "ANA".into(),
            batting_side: side,
            batter: batter.into(),
            defense: fielders,
            runners: [None, None, None],
            visitor_score: None,
            home_score: None,
            play_code: play.into(),
            advance_code: advance.into(),
        }
    }

    fn transformer() -> GameTransformer {
        GameTransformer::new(LineupConfig { use_dh: false, bullpen_size: None })
    }

    fn game_id() -> GameId {
        "ANA202204070".parse().unwrap()
    }

    #[test]
    fn winner_from_score() {
        assert_eq!(Winner::from_score(3, 1), Winner::Visitor);
        assert_eq!(Winner::from_score(1, 3), Winner::Home);
        assert_eq!(Winner::from_score(2, 2), Winner::Home);
        assert_eq!(Winner::from_score(0, 0), Winner::Home);
    }

    #[test]
    fn credits_every_role_on_a_play() {
        let mut runner_on_first = record(Side::Visitor, "v2", "S8", "1-3");
        runner_on_first.runners[0] = Some("v1".into());
        let records = vec![
            record(Side::Visitor, "v1", "S7", ""),
            runner_on_first,
            record(Side::Visitor, "v3", "HR/F78", "3-H;1-H"),
        ];
        let result = transformer().transform(&game_id(), &records).unwrap();

        assert_eq!(result.players[&PlayerId::from("v1")].batting.single, 1);
        assert_eq!(result.players[&PlayerId::from("v1")].base_running.advance13, 1);
        assert_eq!(result.players[&PlayerId::from("v3")].batting.home_run, 1);
        assert_eq!(result.players[&PlayerId::from("h1")].pitching.hit(), 3);
        assert_eq!(result.players[&PlayerId::from("h8")].fielding.putout, 0);
        // HR plus the two runners named in the advance code
        assert_eq!(result.visitor_score, 3);
        assert_eq!(result.winner, Winner::Visitor);
        assert_eq!(result.timestamp, game_id().timestamp());
    }

    #[test]
    fn logged_score_is_the_score_after_the_play() {
        let mut scoring = record(Side::Home, "h1", "S8", "3-H");
        scoring.visitor_score = Some(0);
        scoring.home_score = Some(1);
        let records = vec![record(Side::Home, "h2", "63", ""), scoring];
        let result = transformer().transform(&game_id(), &records).unwrap();
        assert_eq!(result.home_score, 1);
        assert_eq!(result.visitor_score, 0);
    }

    #[test]
    fn logged_score_overrides_the_running_count() {
        let mut late = record(Side::Home, "h1", "S8", "3-H");
        late.visitor_score = Some(0);
        late.home_score = Some(4);
        let records = vec![record(Side::Home, "h2", "63", ""), late];
        let result = transformer().transform(&game_id(), &records).unwrap();
        assert_eq!(result.home_score, 4);
        assert_eq!(result.visitor_score, 0);
        assert!(result.winner.is_home());
    }

    #[test]
    fn empty_play_code_still_reaches_the_lineup() {
        let records = vec![record(Side::Visitor, "v1", "", "")];
        let result = transformer().transform(&game_id(), &records).unwrap();
        assert!(result.players.is_empty());
        assert_eq!(result.lineup[&PlayerId::from("h1")], 9);
    }

    #[test]
    fn rejects_records_from_another_game() {
        let mut stray = record(Side::Visitor, "v1", "K", "");
        stray.game_id = "BOS202204070".into();
        let err = transformer().transform(&game_id(), &[stray]).unwrap_err();
        assert!(matches!(err, GameError::ForeignRecord { .. }));
    }

    #[test]
    fn rejected_game_does_not_leak_into_the_next() {
        let mut transformer = transformer();

        let mut stale = record(Side::Visitor, "v1", "K", "");
        stale.defense = Defense::new(std::array::from_fn(|i| PlayerId::new(format!("stale{}", i + 1))));
        let mut stray = record(Side::Visitor, "v2", "K", "");
        stray.game_id = "BOS202204070".into();
        assert!(transformer.transform(&game_id(), &[stale, stray]).is_err());

        let next: GameId = "ANA202204080".parse().unwrap();
        let mut good = record(Side::Visitor, "v1", "K", "");
        good.game_id = next.to_string();
        let result = transformer.transform(&next, &[good]).unwrap();
        assert_eq!(result.lineup.get(&PlayerId::from("h1")), Some(&9));
        assert!(!result.lineup.contains_key(&PlayerId::from("stale1")));
        assert!(!result.players.contains_key(&PlayerId::from("stale1")));
    }

    #[test]
    fn empty_game_is_a_home_win() {
        let result = transformer().transform(&game_id(), &[]).unwrap();
        assert_eq!(result.visitor_score, 0);
        assert_eq!(result.winner, Winner::Home);
        assert!(result.lineup.is_empty());
    }
}
