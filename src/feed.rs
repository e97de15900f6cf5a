// Copyright  (C) 2020, Kisio Digital and/or its affiliates. All rights reserved.
//
// This file is part of Navitia,
// the software to build cool stuff with public transport.
//
// Hope you'll enjoy and contribute to this project,
// powered by Kisio Digital (www.kisio.com).
// Help us simplify mobility and open public transport:
// a non ending quest to the responsive locomotion way of traveling!
//
// This contribution is a part of the research and development work of the
// IVA Project which aims to enhance traveler information and is carried out
// under the leadership of the Technological Research Institute SystemX,
// with the partnership and support of the transport organization authority
// Ile-De-France Mobilités (IDFM), SNCF, and public funds
// under the scope of the French Program "Investissements d’Avenir".
//
// LICENCE: This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.
//
// Stay tuned using
// twitter @navitia
// channel `#navitia` on riot https://riot.im/app/#/room/#navitia:matrix.org
// https://groups.google.com/d/forum/navitia
// www.navitia.io

//! In-memory representation of a parsed GTFS-like feed.
//!
//! Parsing feed files is the job of an external collaborator; this module
//! only defines the tables that [`crate::FeedBuilder`] consumes. Field
//! semantics follow GTFS wherever the name matches.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// A parsed feed: one `Vec` per GTFS table the router cares about.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Feed {
    pub agencies: Vec<AgencyRecord>,
    pub stops: Vec<StopRecord>,
    pub routes: Vec<RouteRecord>,
    pub trips: Vec<TripRecord>,
    pub stop_times: Vec<StopTimeRecord>,
    pub calendar: Vec<CalendarRecord>,
    pub calendar_dates: Vec<CalendarDateRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgencyRecord {
    pub agency_id: String,
    pub agency_name: String,
    pub agency_url: String,
    /// IANA zone identifier, e.g. `Europe/Stockholm`.
    pub agency_timezone: String,
}

/// What a record of the stops table describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LocationType {
    /// A boardable platform.
    #[default]
    Platform,
    /// A grouping of platforms, not itself boardable.
    Station,
    /// A station entrance or exit.
    EntranceExit,
    /// A sub-point of a platform.
    BoardingArea,
    /// A pathway node, irrelevant for routing.
    Node,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopRecord {
    pub stop_id: String,
    pub stop_name: String,
    pub stop_lat: f64,
    pub stop_lon: f64,
    #[serde(default)]
    pub location_type: LocationType,
    #[serde(default)]
    pub parent_station: Option<String>,
    #[serde(default)]
    pub platform_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRecord {
    pub route_id: String,
    #[serde(default)]
    pub agency_id: Option<String>,
    pub route_short_name: String,
    pub route_long_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRecord {
    pub trip_id: String,
    pub route_id: String,
    pub service_id: String,
    #[serde(default)]
    pub shape_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopTimeRecord {
    pub trip_id: String,
    pub stop_sequence: u32,
    pub stop_id: String,
    pub arrival_time: Time,
    pub departure_time: Time,
}

/// Weekday availability flags plus a date range, as in `calendar.txt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarRecord {
    pub service_id: String,
    pub monday: bool,
    pub tuesday: bool,
    pub wednesday: bool,
    pub thursday: bool,
    pub friday: bool,
    pub saturday: bool,
    pub sunday: bool,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExceptionType {
    Added,
    Removed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarDateRecord {
    pub service_id: String,
    pub date: NaiveDate,
    pub exception_type: ExceptionType,
}

/// A feed time: seconds since midnight of the service day.
/// May exceed 24h for trips running past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Time {
    total_seconds: u32,
}

impl Time {
    pub const fn from_hms(hours: u32, minutes: u32, seconds: u32) -> Self {
        Self {
            total_seconds: seconds + 60 * minutes + 60 * 60 * hours,
        }
    }

    pub fn total_seconds(&self) -> u32 {
        self.total_seconds
    }
}

impl Display for Time {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.total_seconds / 60 / 60,
            self.total_seconds / 60 % 60,
            self.total_seconds % 60
        )
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("`{0}` is not a valid HH:MM:SS time")]
pub struct TimeParseError(String);

impl FromStr for Time {
    type Err = TimeParseError;

    /// Parses `HH:MM:SS`, where `HH` may exceed 24.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut fields = text.split(':');
        let mut next_number = |max: u32| {
            fields
                .next()
                .and_then(|field| field.parse::<u32>().ok())
                .filter(|number| *number <= max)
        };
        let hours = next_number(u32::MAX);
        let minutes = next_number(59);
        let seconds = next_number(59);
        match (hours, minutes, seconds, fields.next()) {
            (Some(hours), Some(minutes), Some(seconds), None) => {
                Ok(Self::from_hms(hours, minutes, seconds))
            }
            _ => Err(TimeParseError(text.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_time() {
        assert_eq!("09:05:30".parse(), Ok(Time::from_hms(9, 5, 30)));
        assert_eq!("25:10:00".parse(), Ok(Time::from_hms(25, 10, 0)));
        assert!("9h05".parse::<Time>().is_err());
        assert!("09:65:00".parse::<Time>().is_err());
        assert!("09:05:00:00".parse::<Time>().is_err());
    }

    #[test]
    fn display_time_past_midnight() {
        assert_eq!(format!("{}", Time::from_hms(25, 10, 0)), "25:10:00");
    }
}
