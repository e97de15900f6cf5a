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

use super::{
    Agency, AgencyIdx, BoardingArea, Coord, Entrance, Route, RouteIdx, Station, StationIdx, Stop,
    StopIdx, StopTime, Timetable, Trip,
};
use crate::error::InvalidFeed;
use crate::feed::{
    CalendarRecord, ExceptionType, Feed, LocationType, RouteRecord, StopTimeRecord,
};
use crate::time::SecondsSinceEpoch;
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use chrono_tz::Tz;
use std::collections::{BTreeMap, HashMap};
use tracing::info;

/// Deterministic construction of a [`Timetable`] from a parsed feed.
///
/// The builder consumes the feed tables in one pass each: stops and stations
/// are assembled first, services are expanded to concrete dates, then one
/// trip is materialised per (feed trip, active date) pair and grouped into
/// routes by stop sequence.
pub struct FeedBuilder<'feed> {
    feed: &'feed Feed,
    from_date: Option<NaiveDate>,
    to_date: Option<NaiveDate>,
}

impl<'feed> FeedBuilder<'feed> {
    pub fn new(feed: &'feed Feed) -> Self {
        Self {
            feed,
            from_date: None,
            to_date: None,
        }
    }

    /// Restricts service expansion to dates within `[from_date, to_date]`
    /// (both inclusive).
    pub fn between(mut self, from_date: NaiveDate, to_date: NaiveDate) -> Self {
        self.from_date = Some(from_date);
        self.to_date = Some(to_date);
        self
    }

    pub fn build(self) -> Result<Timetable, InvalidFeed> {
        let agencies = self.build_agencies()?;
        let agency_idx_by_id: HashMap<&str, AgencyIdx> = agencies
            .iter()
            .enumerate()
            .map(|(idx, agency)| (agency.id(), AgencyIdx { idx }))
            .collect();

        let (stops, stations, stop_id_to_idx) = self.build_stops_and_stations()?;

        let services = self.expand_services()?;

        let mut stop_times_by_trip: HashMap<&str, Vec<&StopTimeRecord>> = HashMap::new();
        for record in &self.feed.stop_times {
            stop_times_by_trip
                .entry(record.trip_id.as_str())
                .or_default()
                .push(record);
        }
        for records in stop_times_by_trip.values_mut() {
            records.sort_by_key(|record| record.stop_sequence);
        }

        let route_records: HashMap<&str, &RouteRecord> = self
            .feed
            .routes
            .iter()
            .map(|record| (record.route_id.as_str(), record))
            .collect();

        // Group trips by (feed route id, stop sequence); a BTreeMap keeps
        // route numbering independent of hash iteration order.
        let mut groups: BTreeMap<(String, Vec<StopIdx>), Vec<Trip>> = BTreeMap::new();
        let mut nb_of_trips = 0usize;

        for trip_record in &self.feed.trips {
            let records = stop_times_by_trip
                .get(trip_record.trip_id.as_str())
                .filter(|records| !records.is_empty())
                .ok_or_else(|| InvalidFeed::EmptyTrip(trip_record.trip_id.clone()))?;
            let active_days = services.get(&trip_record.service_id).ok_or_else(|| {
                InvalidFeed::UnknownServiceRef(trip_record.service_id.clone())
            })?;
            let route_record = route_records
                .get(trip_record.route_id.as_str())
                .ok_or_else(|| InvalidFeed::UnknownRouteRef {
                    trip_id: trip_record.trip_id.clone(),
                    route_id: trip_record.route_id.clone(),
                })?;
            let agency = route_record
                .agency_id
                .as_deref()
                .and_then(|agency_id| agency_idx_by_id.get(agency_id))
                .copied()
                .unwrap_or(AgencyIdx { idx: 0 });
            let timezone = *agencies[agency.idx].timezone();

            let stop_sequence = records
                .iter()
                .map(|record| {
                    stop_id_to_idx
                        .get(record.stop_id.as_str())
                        .copied()
                        .ok_or_else(|| InvalidFeed::UnknownStopRef(record.stop_id.clone()))
                })
                .collect::<Result<Vec<StopIdx>, InvalidFeed>>()?;

            for date in active_days {
                let stop_times = records
                    .iter()
                    .zip(&stop_sequence)
                    .map(|(record, stop)| StopTime {
                        arrival: instant(&timezone, *date, record.arrival_time.total_seconds()),
                        departure: instant(
                            &timezone,
                            *date,
                            record.departure_time.total_seconds(),
                        ),
                        stop: *stop,
                    })
                    .collect();
                let trip = Trip::new(
                    stop_times,
                    trip_record.trip_id.clone(),
                    trip_record.shape_id.clone(),
                    *date,
                );
                groups
                    .entry((trip_record.route_id.clone(), stop_sequence.clone()))
                    .or_default()
                    .push(trip);
                nb_of_trips += 1;
            }
        }

        let mut routes: Vec<Route> = Vec::new();
        let mut route_id_to_idx: HashMap<String, Vec<RouteIdx>> = HashMap::new();

        for ((route_id, stop_sequence), mut trips) in groups {
            trips.sort_by(|a, b| {
                a.first_departure()
                    .cmp(&b.first_departure())
                    .then_with(|| a.id().cmp(b.id()))
            });
            // Presence in `route_records` was checked for every trip above.
            let record = route_records[route_id.as_str()];
            let agency = record
                .agency_id
                .as_deref()
                .and_then(|agency_id| agency_idx_by_id.get(agency_id))
                .copied()
                .unwrap_or(AgencyIdx { idx: 0 });

            for trips in split_overtaking(trips) {
                let idx = RouteIdx { idx: routes.len() };
                routes.push(Route::new(
                    route_id.clone(),
                    record.route_short_name.clone(),
                    record.route_long_name.clone(),
                    agency,
                    stop_sequence.clone(),
                    trips,
                ));
                route_id_to_idx
                    .entry(route_id.clone())
                    .or_default()
                    .push(idx);
            }
        }

        let mut routes_serving_stop = vec![Vec::new(); stops.len()];
        for (idx, route) in routes.iter().enumerate() {
            for (position, stop) in route.stop_sequence().iter().enumerate() {
                routes_serving_stop[stop.idx].push((RouteIdx { idx }, position));
            }
        }

        info!(
            nb_of_stops = stops.len(),
            nb_of_stations = stations.len(),
            nb_of_routes = routes.len(),
            nb_of_trips,
            "timetable built"
        );

        Ok(Timetable {
            agencies,
            stops,
            stations,
            routes,
            stop_id_to_idx,
            route_id_to_idx,
            routes_serving_stop,
        })
    }

    fn build_agencies(&self) -> Result<Vec<Agency>, InvalidFeed> {
        if self.feed.agencies.is_empty() {
            return Err(InvalidFeed::MissingAgency);
        }
        self.feed
            .agencies
            .iter()
            .map(|record| {
                let timezone: Tz = record.agency_timezone.parse().map_err(|_| {
                    InvalidFeed::UnknownTimezone {
                        agency_id: record.agency_id.clone(),
                        timezone: record.agency_timezone.clone(),
                    }
                })?;
                Ok(Agency::new(
                    record.agency_id.clone(),
                    record.agency_name.clone(),
                    record.agency_url.clone(),
                    timezone,
                ))
            })
            .collect()
    }

    /// Partitions the stop records by location type. Platforms become stops,
    /// stations become stations, entrances and boarding areas attach to
    /// their parents, nodes are ignored.
    #[allow(clippy::type_complexity)]
    fn build_stops_and_stations(
        &self,
    ) -> Result<(Vec<Stop>, Vec<Station>, HashMap<String, StopIdx>), InvalidFeed> {
        let mut stations: Vec<Station> = Vec::new();
        let mut station_idx_by_id: HashMap<&str, StationIdx> = HashMap::new();
        for record in &self.feed.stops {
            if record.location_type == LocationType::Station {
                let idx = StationIdx {
                    idx: stations.len(),
                };
                stations.push(Station {
                    id: record.stop_id.clone(),
                    name: record.stop_name.clone(),
                    stops: Vec::new(),
                    entrances: Vec::new(),
                });
                station_idx_by_id.insert(record.stop_id.as_str(), idx);
            }
        }

        let mut stops: Vec<Stop> = Vec::new();
        let mut stop_id_to_idx: HashMap<String, StopIdx> = HashMap::new();
        for record in &self.feed.stops {
            if record.location_type != LocationType::Platform {
                continue;
            }
            let parent_station = match parent_id(record.parent_station.as_deref()) {
                Some(parent) => Some(
                    station_idx_by_id
                        .get(parent)
                        .copied()
                        .ok_or_else(|| InvalidFeed::UnknownStopRef(parent.to_string()))?,
                ),
                None => None,
            };
            let idx = StopIdx { idx: stops.len() };
            stops.push(Stop {
                id: record.stop_id.clone(),
                name: record.stop_name.clone(),
                platform_code: record.platform_code.clone(),
                coord: Coord {
                    lat: record.stop_lat,
                    lon: record.stop_lon,
                },
                parent_station,
                boarding_areas: Vec::new(),
            });
            if let Some(parent) = parent_station {
                stations[parent.idx].stops.push(idx);
            }
            stop_id_to_idx.insert(record.stop_id.clone(), idx);
        }

        for record in &self.feed.stops {
            let Some(parent) = parent_id(record.parent_station.as_deref()) else {
                continue;
            };
            match record.location_type {
                LocationType::EntranceExit => {
                    let station = station_idx_by_id
                        .get(parent)
                        .copied()
                        .ok_or_else(|| InvalidFeed::UnknownStopRef(parent.to_string()))?;
                    stations[station.idx].entrances.push(Entrance {
                        id: record.stop_id.clone(),
                        coord: Coord {
                            lat: record.stop_lat,
                            lon: record.stop_lon,
                        },
                    });
                }
                LocationType::BoardingArea => {
                    let stop = stop_id_to_idx
                        .get(parent)
                        .copied()
                        .ok_or_else(|| InvalidFeed::UnknownStopRef(parent.to_string()))?;
                    stops[stop.idx].boarding_areas.push(BoardingArea {
                        id: record.stop_id.clone(),
                        coord: Coord {
                            lat: record.stop_lat,
                            lon: record.stop_lon,
                        },
                    });
                }
                _ => {}
            }
        }

        Ok((stops, stations, stop_id_to_idx))
    }

    /// Expands every calendar record to its concrete active dates and
    /// applies the `calendar_dates` exceptions.
    fn expand_services(&self) -> Result<HashMap<String, Vec<NaiveDate>>, InvalidFeed> {
        let mut services: HashMap<String, Vec<NaiveDate>> = HashMap::new();
        for calendar in &self.feed.calendar {
            if services.contains_key(&calendar.service_id) {
                return Err(InvalidFeed::DuplicateService(calendar.service_id.clone()));
            }
            let start = match self.from_date {
                Some(from) => from.max(calendar.start_date),
                None => calendar.start_date,
            };
            let end = match self.to_date {
                Some(to) => to.min(calendar.end_date),
                None => calendar.end_date,
            };
            let mut dates = Vec::new();
            let mut date = start;
            while date <= end {
                if runs_on(calendar, date.weekday()) {
                    dates.push(date);
                }
                match date.succ_opt() {
                    Some(next) => date = next,
                    None => break,
                }
            }
            services.insert(calendar.service_id.clone(), dates);
        }

        for exception in &self.feed.calendar_dates {
            let dates = services.get_mut(&exception.service_id).ok_or_else(|| {
                InvalidFeed::UnknownServiceRef(exception.service_id.clone())
            })?;
            match exception.exception_type {
                ExceptionType::Added => {
                    if self.in_window(exception.date) {
                        dates.push(exception.date);
                    }
                }
                ExceptionType::Removed => {
                    match dates.iter().position(|date| *date == exception.date) {
                        Some(position) => {
                            dates.remove(position);
                        }
                        None => {
                            return Err(InvalidFeed::RemovedAbsentDate {
                                service_id: exception.service_id.clone(),
                                date: exception.date,
                            })
                        }
                    }
                }
            }
        }

        for dates in services.values_mut() {
            dates.sort_unstable();
            dates.dedup();
        }
        Ok(services)
    }

    fn in_window(&self, date: NaiveDate) -> bool {
        self.from_date.map_or(true, |from| date >= from)
            && self.to_date.map_or(true, |to| date <= to)
    }
}

fn parent_id(parent_station: Option<&str>) -> Option<&str> {
    parent_station.filter(|id| !id.is_empty())
}

fn runs_on(calendar: &CalendarRecord, weekday: Weekday) -> bool {
    match weekday {
        Weekday::Mon => calendar.monday,
        Weekday::Tue => calendar.tuesday,
        Weekday::Wed => calendar.wednesday,
        Weekday::Thu => calendar.thursday,
        Weekday::Fri => calendar.friday,
        Weekday::Sat => calendar.saturday,
        Weekday::Sun => calendar.sunday,
    }
}

/// Resolves a feed time on a service day to an absolute instant: the feed
/// seconds are added to the local midnight of the service day in the agency
/// timezone, then disambiguated with the "earliest" policy. Feed times past
/// 24h spill into the following day.
fn instant(timezone: &Tz, service_day: NaiveDate, feed_seconds: u32) -> SecondsSinceEpoch {
    let local = NaiveDateTime::new(service_day, NaiveTime::MIN)
        + chrono::Duration::seconds(i64::from(feed_seconds));
    SecondsSinceEpoch::from_local_datetime(timezone, local)
}

/// Splits a first-departure-sorted trip list into sibling routes such that
/// within each sibling no trip overtakes its predecessor: at every position,
/// arrivals and departures are non-decreasing across consecutive trips.
/// This keeps trip lookup by binary search valid at every position.
fn split_overtaking(trips: Vec<Trip>) -> Vec<Vec<Trip>> {
    let mut siblings: Vec<Vec<Trip>> = Vec::new();
    for trip in trips {
        let fitting = siblings.iter().position(|sibling| {
            sibling
                .last()
                .is_some_and(|last| follows(last, &trip))
        });
        match fitting {
            Some(position) => siblings[position].push(trip),
            None => siblings.push(vec![trip]),
        }
    }
    siblings
}

fn follows(previous: &Trip, next: &Trip) -> bool {
    previous
        .stop_times()
        .iter()
        .zip(next.stop_times())
        .all(|(earlier, later)| {
            earlier.arrival <= later.arrival && earlier.departure <= later.departure
        })
}
