// src/entity/show.rs
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::required;
use crate::error::{Result, ShowquizError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Show {
    pub id: i64,
    pub artist_id: i64,
    pub venue_id: Option<i64>,
    pub start_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShow {
    pub artist_id: i64,
    pub venue_id: Option<i64>,
    pub start_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShowForm {
    pub artist_id: Option<String>,
    pub venue_id: Option<String>,
    pub start_time: Option<String>,
}

impl ShowForm {
    pub fn validate(self) -> Result<NewShow> {
        let artist_id = parse_id("Artist ID", &required("Artist ID", self.artist_id)?)?;
        let venue_id = match self.venue_id.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_id("Venue ID", raw)?),
        };
        let raw_time = required("Start time", self.start_time)?;
        let start_time = parse_start_time(&raw_time).ok_or_else(|| {
            ShowquizError::validation(format!("Invalid start time: {}", raw_time))
        })?;

        Ok(NewShow {
            artist_id,
            venue_id,
            start_time,
        })
    }
}

fn parse_id(field: &str, raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ShowquizError::validation(format!("{} must be a positive number.", field)))
}

/// Parse a show start time. Naive datetimes are taken as UTC.
///
/// Accepts RFC 3339 as well as `YYYY-MM-DD HH:MM[:SS]` and the
/// `YYYY-MM-DDTHH:MM` shape produced by datetime-local inputs.
pub fn parse_start_time(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
    ];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// A show joined with the names needed to display it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowListing {
    pub show_id: i64,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub venue_id: Option<i64>,
    pub venue_name: Option<String>,
    pub venue_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

impl ShowListing {
    /// Strictly after `now`. A show starting at `now` has begun.
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.start_time > now
    }
}

/// Shows partitioned into upcoming and past relative to a reference time.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ShowSchedule {
    pub upcoming: Vec<ShowListing>,
    pub past: Vec<ShowListing>,
}

impl ShowSchedule {
    pub fn split(listings: Vec<ShowListing>, now: DateTime<Utc>) -> Self {
        let (upcoming, past) = listings.into_iter().partition(|l| l.is_upcoming(now));
        Self { upcoming, past }
    }
}
