//! Calendar-day keys: puzzle addressing and save-slot naming.

use serde::{Deserialize, Serialize};
use time::macros::{date, format_description};
use time::{Date, Month, OffsetDateTime};

/// Day the first numbered puzzle was published
const FIRST_PUZZLE_DAY: Date = date!(2024 - 07 - 18);
/// Number given to the first puzzle
const FIRST_PUZZLE_NUMBER: i64 = 100;

/// A local calendar day, formatted `YYYY-MM-DD`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DayKey(Date);

impl DayKey {
    pub fn new(year: i32, month: u8, day: u8) -> Option<Self> {
        let month = Month::try_from(month).ok()?;
        Date::from_calendar_date(year, month, day).ok().map(Self)
    }

    pub fn from_date(date: Date) -> Self {
        Self(date)
    }

    /// Today in local time, falling back to UTC when the offset is unknown
    pub fn today() -> Self {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        Self(now.date())
    }

    pub fn date(&self) -> Date {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u8 {
        self.0.month() as u8
    }

    pub fn day(&self) -> u8 {
        self.0.day()
    }

    /// Relative path of the day's puzzle document: `puzzles/DD-MM-YY.json`
    pub fn puzzle_file_name(&self) -> String {
        format!(
            "puzzles/{:02}-{:02}-{:02}.json",
            self.day(),
            self.month(),
            self.year().rem_euclid(100)
        )
    }

    /// Sequential puzzle number shown to players
    pub fn puzzle_number(&self) -> i64 {
        FIRST_PUZZLE_NUMBER + (self.0 - FIRST_PUZZLE_DAY).whole_days().abs()
    }
}

impl std::fmt::Display for DayKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year(), self.month(), self.day())
    }
}

impl std::str::FromStr for DayKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Date::parse(s.trim(), format_description!("[year]-[month]-[day]"))
            .map(Self)
            .map_err(|e| format!("invalid date '{}': {}", s, e))
    }
}

impl TryFrom<String> for DayKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DayKey> for String {
    fn from(day: DayKey) -> Self {
        day.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_parse() {
        let day = DayKey::new(2024, 8, 5).unwrap();
        assert_eq!(day.to_string(), "2024-08-05");
        assert_eq!("2024-08-05".parse::<DayKey>(), Ok(day));
        assert!("2024-13-01".parse::<DayKey>().is_err());
    }

    #[test]
    fn test_puzzle_file_name() {
        let day = DayKey::new(2024, 8, 5).unwrap();
        assert_eq!(day.puzzle_file_name(), "puzzles/05-08-24.json");
    }

    #[test]
    fn test_puzzle_number() {
        assert_eq!(DayKey::new(2024, 7, 18).unwrap().puzzle_number(), 100);
        assert_eq!(DayKey::new(2024, 7, 28).unwrap().puzzle_number(), 110);
    }

    #[test]
    fn test_serde_as_string() {
        let day = DayKey::new(2025, 1, 2).unwrap();
        let json = serde_json::to_string(&day).unwrap();
        assert_eq!(json, "\"2025-01-02\"");
        let back: DayKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, day);
    }
}
