// Game identifiers: `PPPYYYYMMDDG`, a three-letter park code followed by the
// date and a game-of-day digit (0 for a single game, 1/2 for doubleheaders).

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameIdError {
    #[error("game id {id:?} must be 12 ASCII characters")]
    Length { id: String },

    #[error("game id {id:?} has a non-numeric {field}")]
    NotNumeric { id: String, field: &'static str },

    #[error("game id {id:?} has no such date")]
    InvalidDate { id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameId {
    raw: String,
    date: NaiveDate,
    game_number: u32,
}

impl GameId {
    pub fn parse(id: &str) -> Result<Self, GameIdError> {
        if id.len() != 12 || !id.is_ascii() {
            return Err(GameIdError::Length { id: id.to_string() });
        }
        let field = |range: std::ops::Range<usize>, name: &'static str| {
            let text = &id[range];
            if !text.bytes().all(|b| b.is_ascii_digit()) {
                return Err(GameIdError::NotNumeric {
                    id: id.to_string(),
                    field: name,
                });
            }
            text.parse::<u32>().map_err(|_| GameIdError::NotNumeric {
                id: id.to_string(),
                field: name,
            })
        };

        let year = field(3..7, "year")?;
        let month = field(7..9, "month")?;
        let day = field(9..11, "day")?;
        let game_number = field(11..12, "game number")?;

        let date = NaiveDate::from_ymd_opt(year as i32, month, day)
            .ok_or_else(|| GameIdError::InvalidDate { id: id.to_string() })?;

        Ok(GameId {
            raw: id.to_string(),
            date,
            game_number,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn park(&self) -> &str {
        &self.raw[..3]
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn game_number(&self) -> u32 {
        self.game_number
    }

    /// Game date with the game-of-day digit as the hour, so both halves of a
    /// doubleheader sort in order.
    pub fn timestamp(&self) -> NaiveDateTime {
        let time = NaiveTime::from_hms_opt(self.game_number, 0, 0).unwrap_or(NaiveTime::MIN);
        self.date.and_time(time)
    }
}

impl FromStr for GameId {
    type Err = GameIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameId::parse(s)
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Ord for GameId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.timestamp()
            .cmp(&other.timestamp())
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

impl PartialOrd for GameId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_park_date_and_game_number() {
        let id = GameId::parse("ANA202204072").unwrap();
        assert_eq!(id.park(), "ANA");
        assert_eq!(id.date(), NaiveDate::from_ymd_opt(2022, 4, 7).unwrap());
        assert_eq!(id.game_number(), 2);
        assert_eq!(id.timestamp().to_string(), "2022-04-07 02:00:00");
        assert_eq!(id.to_string(), "ANA202204072");
    }

    #[test]
    fn rejects_malformed_ids() {
        assert!(matches!(GameId::parse("ANA20220407"), Err(GameIdError::Length { .. })));
        assert!(matches!(
            GameId::parse("ANA2022O4070"),
            Err(GameIdError::NotNumeric { field: "month", .. })
        ));
        assert!(matches!(
            GameId::parse("ANA202202300"),
            Err(GameIdError::InvalidDate { .. })
        ));
    }

    #[test]
    fn orders_by_date_then_game_of_day() {
        let mut ids: Vec<GameId> = ["NYA202204082", "BOS202204081", "ANA202204070"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        ids.sort();
        let order: Vec<&str> = ids.iter().map(GameId::as_str).collect();
        assert_eq!(order, vec!["ANA202204070", "BOS202204081", "NYA202204082"]);
    }

    #[test]
    fn same_day_different_parks_tie_break_on_text() {
        let a: GameId = "BOS202204070".parse().unwrap();
        let b: GameId = "ANA202204070".parse().unwrap();
        assert_eq!(a.timestamp(), b.timestamp());
        assert!(b < a);
    }
}
