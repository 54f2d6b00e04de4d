// Season event files: one CSV per regular season (`<year>rs.csv`), one row per
// play, grouped here into chronologically ordered games.

use std::collections::HashMap;
use std::io::Read;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use boxscore_core::{Defense, GameId, PlayRecord, PlayerId, Side};
use serde::Deserialize;
use tracing::{info, warn};

/// Seasons the event files cover.
pub const SUPPORTED_YEARS: RangeInclusive<i32> = 1914..=2022;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SeasonError {
    #[error("year {0:?} is not an integer")]
    InvalidYear(String),

    #[error("year {0} is outside the supported range 1914-2022")]
    YearOutOfRange(i32),

    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

/// Parse a year given as text and check it against [`SUPPORTED_YEARS`].
pub fn parse_year(text: &str) -> Result<i32, SeasonError> {
    let year: i32 = text
        .trim()
        .parse()
        .map_err(|_| SeasonError::InvalidYear(text.to_string()))?;
    check_year(year)
}

pub fn check_year(year: i32) -> Result<i32, SeasonError> {
    if SUPPORTED_YEARS.contains(&year) {
        Ok(year)
    } else {
        Err(SeasonError::YearOutOfRange(year))
    }
}

// ---------------------------------------------------------------------------
// Raw CSV row
// ---------------------------------------------------------------------------

/// One event row as exported by the play-by-play tooling. Extra columns are
/// ignored.
#[derive(Debug, Deserialize)]
#[allow(dead_code, non_snake_case)]
struct RawEvent {
    gameID: String,
    event_in_game: u32,
    visteam: String,
    hometeam: String,
    visitor_or_home: u8,
    batterID: String,
    pitcherID: String,
    field_C_playerID: String,
    field_1B_playerID: String,
    field_2B_playerID: String,
    field_3B_playerID: String,
    field_SS_playerID: String,
    field_LF_playerID: String,
    field_CF_playerID: String,
    field_RF_playerID: String,
    #[serde(default)]
    runner_1b: String,
    #[serde(default)]
    runner_2b: String,
    #[serde(default)]
    runner_3b: String,
    #[serde(default)]
    vis_score: Option<u32>,
    #[serde(default)]
    home_score: Option<u32>,
    #[serde(default)]
    theplay: String,
    #[serde(default)]
    baserunning: String,
}

fn runner(id: &str) -> Option<PlayerId> {
    let id = id.trim();
    (!id.is_empty()).then(|| PlayerId::from(id))
}

impl RawEvent {
    fn into_record(self) -> Result<PlayRecord, String> {
        let batting_side = match self.visitor_or_home {
            0 => Side::Visitor,
            1 => Side::Home,
            other => return Err(format!("visitor_or_home must be 0 or 1, got {other}")),
        };

        let fielders = [
            &self.pitcherID,
            &self.field_C_playerID,
            &self.field_1B_playerID,
            &self.field_2B_playerID,
            &self.field_3B_playerID,
            &self.field_SS_playerID,
            &self.field_LF_playerID,
            &self.field_CF_playerID,
            &self.field_RF_playerID,
        ];
        if let Some(missing) = fielders.iter().position(|id| id.trim().is_empty()) {
            return Err(format!("no fielder at position {}", missing + 1));
        }
        if self.batterID.trim().is_empty() {
            return Err("no batter".to_string());
        }

        Ok(PlayRecord {
            game_id: self.gameID.trim().to_string(),
            event_in_game: self.event_in_game,
            visiting_team: self.visteam.trim().to_string(),
            home_team: self.hometeam.trim().to_string(),
            batting_side,
            batter: PlayerId::from(self.batterID.trim()),
            defense: Defense::new(fielders.map(|id| PlayerId::from(id.trim()))),
            runners: [
                runner(&self.runner_1b),
                runner(&self.runner_2b),
                runner(&self.runner_3b),
            ],
            visitor_score: self.vis_score,
            home_score: self.home_score,
            play_code: self.theplay.trim().to_string(),
            advance_code: self.baserunning.trim().to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Reader-based loader
// ---------------------------------------------------------------------------

/// Read every well-formed event row. Malformed rows are logged and skipped.
pub fn load_events_from_reader<R: Read>(rdr: R) -> Result<Vec<PlayRecord>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    // Surface a missing or unreadable header as an error instead of a warning
    // per row.
    reader.headers()?;

    let mut records = Vec::new();
    for (line, result) in reader.deserialize::<RawEvent>().enumerate() {
        match result {
            Ok(raw) => {
                let game_id = raw.gameID.clone();
                match raw.into_record() {
                    Ok(record) => records.push(record),
                    Err(reason) => warn!("skipping event row {} of {}: {}", line + 2, game_id, reason),
                }
            }
            Err(e) => {
                warn!("skipping malformed event row: {}", e);
            }
        }
    }
    Ok(records)
}

/// One game's records, in play order.
#[derive(Debug, Clone)]
pub struct SeasonGame {
    pub game_id: GameId,
    pub records: Vec<PlayRecord>,
}

/// Group records by game id and order the games chronologically. Records
/// whose game id does not parse are dropped with a warning.
pub fn group_by_game(records: Vec<PlayRecord>) -> Vec<SeasonGame> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut games: Vec<SeasonGame> = Vec::new();
    let mut rejected: HashMap<String, usize> = HashMap::new();

    for record in records {
        if let Some(&slot) = index.get(&record.game_id) {
            games[slot].records.push(record);
            continue;
        }
        match GameId::parse(&record.game_id) {
            Ok(game_id) => {
                index.insert(record.game_id.clone(), games.len());
                games.push(SeasonGame {
                    game_id,
                    records: vec![record],
                });
            }
            Err(e) => {
                let count = rejected.entry(record.game_id.clone()).or_insert(0);
                if *count == 0 {
                    warn!("skipping game: {}", e);
                }
                *count += 1;
            }
        }
    }

    for game in &mut games {
        game.records.sort_by_key(|r| r.event_in_game);
    }
    games.sort_by(|a, b| a.game_id.cmp(&b.game_id));
    games
}

// ---------------------------------------------------------------------------
// Season reader
// ---------------------------------------------------------------------------

/// Locates and reads per-season event files under a data directory.
#[derive(Debug, Clone)]
pub struct SeasonReader {
    data_dir: PathBuf,
}

impl SeasonReader {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        SeasonReader {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn season_path(&self, year: i32) -> PathBuf {
        self.data_dir.join(format!("{year}rs.csv"))
    }

    /// Read one season, grouped into games in chronological order.
    pub fn extract(&self, year: i32) -> Result<Vec<SeasonGame>, SeasonError> {
        let year = check_year(year)?;
        let path = self.season_path(year);
        info!("extracting {}", path.display());

        let file = std::fs::File::open(&path).map_err(|e| SeasonError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let records = load_events_from_reader(file).map_err(|e| SeasonError::Csv {
            path: path.display().to_string(),
            source: e,
        })?;

        let games = group_by_game(records);
        info!("season {}: {} games", year, games.len());
        Ok(games)
    }

    /// Like [`extract`](Self::extract) for a year given as text.
    pub fn extract_str(&self, year: &str) -> Result<Vec<SeasonGame>, SeasonError> {
        self.extract(parse_year(year)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "gameID,event_in_game,visteam,hometeam,visitor_or_home,batterID,pitcherID,field_C_playerID,field_1B_playerID,field_2B_playerID,field_3B_playerID,field_SS_playerID,field_LF_playerID,field_CF_playerID,field_RF_playerID,runner_1b,runner_2b,runner_3b,vis_score,home_score,theplay,baserunning,inning";

    fn row(game: &str, event: u32, side: u8, batter: &str, runner_1b: &str, play: &str, advance: &str) -> String {
        let fielders = if side == 0 {
            "hp,hc,h1b,h2b,h3b,hss,hlf,hcf,hrf"
        } else {
            "vp,vc,v1b,v2b,v3b,vss,vlf,vcf,vrf"
        };
        format!("{game},{event},HOU,ANA,{side},{batter},{fielders},{runner_1b},,,0,0,{play},{advance},1")
    }

    fn csv(rows: &[String]) -> String {
        let mut text = String::from(HEADER);
        for r in rows {
            text.push('\n');
            text.push_str(r);
        }
        text.push('\n');
        text
    }

    #[test]
    fn parse_year_validates_text_and_range() {
        assert_eq!(parse_year("2022").unwrap(), 2022);
        assert_eq!(parse_year(" 1914 ").unwrap(), 1914);
        assert!(matches!(parse_year("foo"), Err(SeasonError::InvalidYear(_))));
        assert!(matches!(parse_year("1900"), Err(SeasonError::YearOutOfRange(1900))));
        assert!(matches!(parse_year("2050"), Err(SeasonError::YearOutOfRange(2050))));
    }

    #[test]
    fn rows_become_play_records() {
        let text = csv(&[
            row("ANA202204070", 1, 0, "altuj001", "", "S8/G6", ""),
            row("ANA202204070", 2, 0, "brega001", "altuj001", "D7/L7", "1-3"),
        ]);
        let records = load_events_from_reader(text.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);

        let second = &records[1];
        assert_eq!(second.batting_side, Side::Visitor);
        assert_eq!(second.batter.as_str(), "brega001");
        assert_eq!(second.pitcher().as_str(), "hp");
        assert_eq!(second.runners[0], Some(PlayerId::from("altuj001")));
        assert_eq!(second.runners[1], None);
        assert_eq!(second.visitor_score, Some(0));
        assert_eq!(second.play_code, "D7/L7");
        assert_eq!(second.advance_code, "1-3");
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let mut bad_side = row("ANA202204070", 2, 0, "b", "", "K", "");
        bad_side = bad_side.replacen(",0,b,", ",7,b,", 1);
        let text = csv(&[
            row("ANA202204070", 1, 0, "a", "", "K", ""),
            bad_side,
            "ANA202204070,not-a-number".to_string(),
            row("ANA202204070", 4, 1, "c", "", "63", ""),
        ]);
        let records = load_events_from_reader(text.as_bytes()).unwrap();
        let batters: Vec<&str> = records.iter().map(|r| r.batter.as_str()).collect();
        assert_eq!(batters, vec!["a", "c"]);
    }

    #[test]
    fn games_are_grouped_and_ordered_by_date() {
        let text = csv(&[
            row("NYA202204082", 1, 0, "late", "", "K", ""),
            row("ANA202204070", 2, 0, "second", "", "K", ""),
            row("ANA202204070", 1, 0, "first", "", "K", ""),
            row("BOS202204081", 1, 0, "early", "", "K", ""),
            row("BADID", 1, 0, "nobody", "", "K", ""),
        ]);
        let games = group_by_game(load_events_from_reader(text.as_bytes()).unwrap());
        let ids: Vec<&str> = games.iter().map(|g| g.game_id.as_str()).collect();
        assert_eq!(ids, vec!["ANA202204070", "BOS202204081", "NYA202204082"]);
        let batters: Vec<&str> = games[0].records.iter().map(|r| r.batter.as_str()).collect();
        assert_eq!(batters, vec!["first", "second"]);
    }

    #[test]
    fn missing_season_file_is_an_io_error() {
        let reader = SeasonReader::new(std::env::temp_dir().join("boxscore_no_such_dir"));
        assert_eq!(
            reader.season_path(2022).file_name().unwrap().to_str().unwrap(),
            "2022rs.csv"
        );
        assert!(matches!(reader.extract(2022), Err(SeasonError::Io { .. })));
        assert!(matches!(reader.extract(1800), Err(SeasonError::YearOutOfRange(1800))));
        assert!(matches!(reader.extract_str("abc"), Err(SeasonError::InvalidYear(_))));
    }
}
