// Copyright (C) 2017 Kisio Digital and/or its affiliates.
//
// This program is free software: you can redistribute it and/or modify it
// under the terms of the GNU Affero General Public License as published by the
// Free Software Foundation, version 3.

// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more
// details.

// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>

//! Provides an easy way to create a feed and the structures built from it.
//!
//! ```
//! let network = FeedFixture::new()
//!     .stop("A", 0.0, 0.0)
//!     .stop("B", 0.0, 0.05)
//!     .trip("T1", "R", |t| {
//!         t.st("A", "09:00:00").st("B", "09:10:00");
//!     })
//!     .network()?;
//! ```

#![allow(dead_code)]

use anyhow::Error;
use sleipnir::chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use sleipnir::chrono_tz::Tz;
use sleipnir::feed::{
    AgencyRecord, CalendarRecord, Feed, LocationType, RouteRecord, StopRecord, StopTimeRecord,
    TripRecord,
};
use sleipnir::{
    FeedBuilder, InvalidFeed, LinearWalkModel, Router, SpatialIndex, StopIdx, Timetable,
    TransferGraph, TransferGraphConfig, WalkTimeConfig,
};

pub const DEFAULT_AGENCY: &str = "ag";
pub const DEFAULT_SERVICE: &str = "daily";
/// A Monday.
pub const DEFAULT_DAY: &str = "2024-06-03";

pub fn init_logger() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Chained builder for a [`Feed`], with a default agency and a default
/// single-day service so that simple fixtures stay terse.
pub struct FeedFixture {
    feed: Feed,
}

impl FeedFixture {
    pub fn new() -> Self {
        let mut feed = Feed::default();
        feed.agencies.push(AgencyRecord {
            agency_id: DEFAULT_AGENCY.to_string(),
            agency_name: "Test operator".to_string(),
            agency_url: "https://example.com".to_string(),
            agency_timezone: "UTC".to_string(),
        });
        feed.calendar.push(single_day(DEFAULT_SERVICE, DEFAULT_DAY));
        Self { feed }
    }

    /// Changes the default agency's timezone.
    pub fn timezone(mut self, timezone: &str) -> Self {
        self.feed.agencies[0].agency_timezone = timezone.to_string();
        self
    }

    pub fn stop(mut self, id: &str, lat: f64, lon: f64) -> Self {
        self.feed.stops.push(StopRecord {
            stop_id: id.to_string(),
            stop_name: id.to_string(),
            stop_lat: lat,
            stop_lon: lon,
            location_type: LocationType::Platform,
            parent_station: None,
            platform_code: None,
        });
        self
    }

    pub fn station(mut self, id: &str, lat: f64, lon: f64) -> Self {
        self.feed.stops.push(StopRecord {
            stop_id: id.to_string(),
            stop_name: id.to_string(),
            stop_lat: lat,
            stop_lon: lon,
            location_type: LocationType::Station,
            parent_station: None,
            platform_code: None,
        });
        self
    }

    pub fn stop_in_station(mut self, id: &str, lat: f64, lon: f64, station: &str) -> Self {
        self.feed.stops.push(StopRecord {
            stop_id: id.to_string(),
            stop_name: id.to_string(),
            stop_lat: lat,
            stop_lon: lon,
            location_type: LocationType::Platform,
            parent_station: Some(station.to_string()),
            platform_code: None,
        });
        self
    }

    /// Adds a single-day service.
    pub fn calendar_on(mut self, service_id: &str, day: &str) -> Self {
        self.feed.calendar.push(single_day(service_id, day));
        self
    }

    /// Adds a trip on the default service, creating the route record on
    /// first use.
    pub fn trip<F>(self, trip_id: &str, route_id: &str, with_stops: F) -> Self
    where
        F: FnOnce(&mut TripFixture),
    {
        self.trip_on_service(trip_id, route_id, DEFAULT_SERVICE, with_stops)
    }

    pub fn trip_on_service<F>(
        mut self,
        trip_id: &str,
        route_id: &str,
        service_id: &str,
        with_stops: F,
    ) -> Self
    where
        F: FnOnce(&mut TripFixture),
    {
        if !self
            .feed
            .routes
            .iter()
            .any(|route| route.route_id == route_id)
        {
            self.feed.routes.push(RouteRecord {
                route_id: route_id.to_string(),
                agency_id: Some(DEFAULT_AGENCY.to_string()),
                route_short_name: route_id.to_string(),
                route_long_name: format!("line {route_id}"),
            });
        }
        self.feed.trips.push(TripRecord {
            trip_id: trip_id.to_string(),
            route_id: route_id.to_string(),
            service_id: service_id.to_string(),
            shape_id: None,
        });
        let mut trip_fixture = TripFixture {
            trip_id: trip_id.to_string(),
            stop_times: Vec::new(),
        };
        with_stops(&mut trip_fixture);
        self.feed.stop_times.extend(trip_fixture.into_records());
        self
    }

    pub fn feed(self) -> Feed {
        self.feed
    }

    pub fn timetable(self) -> Result<Timetable, InvalidFeed> {
        FeedBuilder::new(&self.feed).build()
    }

    /// Builds the timetable and its transfer graph with default walking and
    /// transfer configurations.
    pub fn network(self) -> Result<TestNetwork, Error> {
        self.network_with(
            &WalkTimeConfig {
                speed_kmh: 5.0,
                scale: 1.0,
            },
            &TransferGraphConfig::default(),
        )
    }

    pub fn network_with(
        self,
        walk_config: &WalkTimeConfig,
        transfer_config: &TransferGraphConfig,
    ) -> Result<TestNetwork, Error> {
        let timetable = FeedBuilder::new(&self.feed).build()?;
        let spatial = SpatialIndex::new(&timetable);
        let walk = LinearWalkModel::new(walk_config)?;
        let transfers = TransferGraph::build(&timetable, &spatial, &walk, transfer_config);
        Ok(TestNetwork {
            timetable,
            transfers,
        })
    }
}

pub struct TripFixture {
    trip_id: String,
    stop_times: Vec<(String, String, String)>,
}

impl TripFixture {
    /// Adds a stop time with identical arrival and departure.
    pub fn st(&mut self, stop_id: &str, time: &str) -> &mut Self {
        self.st_arrival_departure(stop_id, time, time)
    }

    pub fn st_arrival_departure(
        &mut self,
        stop_id: &str,
        arrival: &str,
        departure: &str,
    ) -> &mut Self {
        self.stop_times
            .push((stop_id.to_string(), arrival.to_string(), departure.to_string()));
        self
    }

    fn into_records(self) -> Vec<StopTimeRecord> {
        let trip_id = self.trip_id;
        self.stop_times
            .into_iter()
            .enumerate()
            .map(|(sequence, (stop_id, arrival, departure))| StopTimeRecord {
                trip_id: trip_id.clone(),
                stop_sequence: sequence as u32,
                stop_id,
                arrival_time: arrival.parse().unwrap(),
                departure_time: departure.parse().unwrap(),
            })
            .collect()
    }
}

/// A built timetable with its transfer graph, ready to route on.
pub struct TestNetwork {
    pub timetable: Timetable,
    pub transfers: TransferGraph,
}

impl TestNetwork {
    pub fn router(&self) -> Router<'_> {
        Router::new(&self.timetable, &self.transfers)
    }

    pub fn stop(&self, id: &str) -> StopIdx {
        self.timetable
            .stop_idx(id)
            .unwrap_or_else(|| panic!("stop `{id}` is not in the timetable"))
    }
}

fn single_day(service_id: &str, day: &str) -> CalendarRecord {
    let date = day.parse().unwrap();
    CalendarRecord {
        service_id: service_id.to_string(),
        monday: true,
        tuesday: true,
        wednesday: true,
        thursday: true,
        friday: true,
        saturday: true,
        sunday: true,
        start_date: date,
        end_date: date,
    }
}

/// Resolves `YYYY-mm-dd HH:MM:SS` in the given timezone to a UTC datetime.
pub fn local_datetime(timezone: &Tz, text: &str) -> DateTime<Utc> {
    let naive = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S").unwrap();
    timezone
        .from_local_datetime(&naive)
        .single()
        .unwrap_or_else(|| panic!("`{text}` is ambiguous or invalid in {timezone}"))
        .with_timezone(&Utc)
}

pub fn utc_datetime(text: &str) -> DateTime<Utc> {
    local_datetime(&sleipnir::chrono_tz::UTC, text)
}
