//! Season event schedule

use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// One race weekend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub round: u32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

/// Season schedule, ordered by round
#[derive(Debug, Clone)]
pub struct Schedule {
    season: i32,
    events: Vec<Event>,
}

impl Schedule {
    /// Load a schedule CSV (`RoundNumber, EventName[, Country, EventDate]`).
    ///
    /// Round 0 is pre-season testing and is skipped.
    pub fn load<P: AsRef<Path>>(csv_path: P, season: i32) -> Result<Self, PolarsError> {
        let df = LazyCsvReader::new(csv_path.as_ref())
            .with_has_header(true)
            .finish()?
            .filter(col("RoundNumber").gt(lit(0)))
            .sort(["RoundNumber"], SortMultipleOptions::default())
            .collect()?;

        let round = df.column("RoundNumber")?.cast(&DataType::Int64)?;
        let round_col = round.i64()?;
        let name_col = df.column("EventName")?.str()?;
        let country_col = df.column("Country").ok().and_then(|c| c.str().ok());
        let date = df
            .column("EventDate")
            .ok()
            .and_then(|c| c.cast(&DataType::String).ok());
        let date_col = date.as_ref().and_then(|c| c.str().ok());

        let mut events = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            let (Some(round), Some(name)) = (round_col.get(i), name_col.get(i)) else {
                continue;
            };

            events.push(Event {
                round: round as u32,
                name: name.to_string(),
                country: country_col.and_then(|c| c.get(i)).map(str::to_string),
                date: date_col
                    .and_then(|c| c.get(i))
                    .and_then(|s| NaiveDate::parse_from_str(s.get(..10).unwrap_or(s), "%Y-%m-%d").ok()),
            });
        }

        info!(
            "Loaded {} events for season {} from {:?}",
            events.len(),
            season,
            csv_path.as_ref()
        );
        Ok(Self { season, events })
    }

    pub fn from_events(season: i32, mut events: Vec<Event>) -> Self {
        events.retain(|e| e.round > 0);
        events.sort_by_key(|e| e.round);
        Self { season, events }
    }

    pub fn season(&self) -> i32 {
        self.season
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Find an event by exact name, falling back to a case-insensitive match
    pub fn by_name(&self, name: &str) -> Option<&Event> {
        let name = name.trim();
        self.events
            .iter()
            .find(|e| e.name == name)
            .or_else(|| self.events.iter().find(|e| e.name.eq_ignore_ascii_case(name)))
    }

    pub fn by_round(&self, round: u32) -> Option<&Event> {
        self.events.iter().find(|e| e.round == round)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(round: u32, name: &str) -> Event {
        Event {
            round,
            name: name.to_string(),
            country: None,
            date: None,
        }
    }

    fn sample_schedule() -> Schedule {
        Schedule::from_events(
            2024,
            vec![
                event(2, "Saudi Arabian Grand Prix"),
                event(0, "Pre-Season Testing"),
                event(1, "Bahrain Grand Prix"),
                event(5, "Chinese Grand Prix"),
            ],
        )
    }

    #[test]
    fn test_drops_testing_and_sorts() {
        let schedule = sample_schedule();
        let rounds: Vec<u32> = schedule.events().iter().map(|e| e.round).collect();
        assert_eq!(rounds, vec![1, 2, 5]);
    }

    #[test]
    fn test_lookup() {
        let schedule = sample_schedule();
        assert_eq!(schedule.by_name("Chinese Grand Prix").unwrap().round, 5);
        assert_eq!(schedule.by_name("chinese grand prix").unwrap().round, 5);
        assert_eq!(schedule.by_round(1).unwrap().name, "Bahrain Grand Prix");
        assert!(schedule.by_name("Pre-Season Testing").is_none());
        assert!(schedule.by_round(0).is_none());
    }

    #[test]
    fn test_load_csv() {
        let path = std::env::temp_dir().join(format!(
            "f1predict_schedule_{}.csv",
            std::process::id()
        ));
        std::fs::write(
            &path,
            "RoundNumber,Country,EventName,EventDate\n\
             0,Bahrain,Pre-Season Testing,2024-02-23\n\
             2,Saudi Arabia,Saudi Arabian Grand Prix,2024-03-09\n\
             1,Bahrain,Bahrain Grand Prix,2024-03-02\n",
        )
        .unwrap();

        let schedule = Schedule::load(&path, 2024).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(schedule.len(), 2);
        let first = &schedule.events()[0];
        assert_eq!(first.round, 1);
        assert_eq!(first.name, "Bahrain Grand Prix");
        assert_eq!(first.country.as_deref(), Some("Bahrain"));
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 3, 2));
    }
}
