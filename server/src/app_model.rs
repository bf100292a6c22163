use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// How far back the front end looks by default.
pub const DEFAULT_RANGE_DAYS: i64 = 28;

/// The initial state handed to the front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppModel {
    pub google_maps_api_key: String,
    pub start_date: String,
    pub end_date: String,
    pub today_date: String,
}

impl AppModel {
    /// The range ends on the day of the latest track, or today without tracks. An end before today
    /// is moved forward a day so the whole latest day is included.
    pub fn new(google_maps_api_key: String, latest_track: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let mut end_date = latest_track.map(|timestamp| timestamp.date_naive()).unwrap_or(today);

        if end_date < today {
            end_date += TimeDelta::days(1);
        }

        let start_date = end_date - TimeDelta::days(DEFAULT_RANGE_DAYS);

        Self {
            google_maps_api_key,
            start_date: format_date(start_date),
            end_date: format_date(end_date),
            today_date: format_date(today),
        }
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
