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

//! The immutable schedule.
//!
//! All entities live in arenas owned by the [`Timetable`] and reference each
//! other through small index newtypes, never through borrowed pointers. This
//! makes the whole structure trivially shareable across threads once built.

mod build;

pub use build::FeedBuilder;

use crate::time::SecondsSinceEpoch;
use chrono::NaiveDate;
use chrono_tz::Tz;
use std::collections::HashMap;

/// Index of a [`Stop`] in the timetable's stop arena.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct StopIdx {
    pub(crate) idx: usize,
}

/// Index of a [`Station`] in the timetable's station arena.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct StationIdx {
    pub(crate) idx: usize,
}

/// Index of a [`Route`] in the timetable's route arena.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct RouteIdx {
    pub(crate) idx: usize,
}

/// Index of an [`Agency`] in the timetable's agency arena.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct AgencyIdx {
    pub(crate) idx: usize,
}

/// Index of a [`Trip`] within its owning route.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct TripIdx {
    pub(crate) idx: usize,
}

/// A geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

/// A sub-point of a platform, opaque to routing.
#[derive(Debug, Clone)]
pub struct BoardingArea {
    pub id: String,
    pub coord: Coord,
}

/// An entrance or exit of a station, opaque to routing.
#[derive(Debug, Clone)]
pub struct Entrance {
    pub id: String,
    pub coord: Coord,
}

/// A boardable platform.
#[derive(Debug, Clone)]
pub struct Stop {
    id: String,
    name: String,
    platform_code: Option<String>,
    coord: Coord,
    parent_station: Option<StationIdx>,
    boarding_areas: Vec<BoardingArea>,
}

impl Stop {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn platform_code(&self) -> Option<&str> {
        self.platform_code.as_deref()
    }

    pub fn coord(&self) -> &Coord {
        &self.coord
    }

    pub fn parent_station(&self) -> Option<StationIdx> {
        self.parent_station
    }

    pub fn boarding_areas(&self) -> &[BoardingArea] {
        &self.boarding_areas
    }
}

/// A named grouping of stops and entrances, used for transfers.
/// Stations are not themselves boardable.
#[derive(Debug, Clone)]
pub struct Station {
    id: String,
    name: String,
    stops: Vec<StopIdx>,
    entrances: Vec<Entrance>,
}

impl Station {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The stops whose parent station is this station.
    pub fn stops(&self) -> &[StopIdx] {
        &self.stops
    }

    pub fn entrances(&self) -> &[Entrance] {
        &self.entrances
    }
}

/// Arrival and departure of one vehicle run at one stop.
/// Invariant: `arrival <= departure`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopTime {
    pub arrival: SecondsSinceEpoch,
    pub departure: SecondsSinceEpoch,
    pub stop: StopIdx,
}

/// A concrete vehicle run on one service date.
#[derive(Debug, Clone)]
pub struct Trip {
    stop_times: Vec<StopTime>,
    id: String,
    shape_id: Option<String>,
    service_date: NaiveDate,
}

impl Trip {
    pub(crate) fn new(
        stop_times: Vec<StopTime>,
        id: String,
        shape_id: Option<String>,
        service_date: NaiveDate,
    ) -> Self {
        debug_assert!(!stop_times.is_empty());
        debug_assert!(stop_times
            .windows(2)
            .all(|pair| pair[0].departure <= pair[1].departure));
        Self {
            stop_times,
            id,
            shape_id,
            service_date,
        }
    }

    /// The feed trip id this run was instantiated from.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn shape_id(&self) -> Option<&str> {
        self.shape_id.as_deref()
    }

    /// The service date this run was instantiated for.
    pub fn service_date(&self) -> NaiveDate {
        self.service_date
    }

    pub fn stop_times(&self) -> &[StopTime] {
        &self.stop_times
    }

    /// Panics if `position` is out of range.
    pub fn stop_time(&self, position: usize) -> &StopTime {
        &self.stop_times[position]
    }

    pub fn first_departure(&self) -> SecondsSinceEpoch {
        self.stop_times[0].departure
    }

    pub fn nb_of_stops(&self) -> usize {
        self.stop_times.len()
    }
}

impl PartialEq for Trip {
    /// Two trips are equal iff their feed trip id and full stop time
    /// sequence match.
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.stop_times == other.stop_times
    }
}

impl Eq for Trip {}

/// A maximal set of trips sharing the same feed route id and the same
/// ordered stop sequence.
///
/// Trips are ordered by first-stop departure, and no trip overtakes the one
/// before it: at every position both arrivals and departures form a
/// non-decreasing sequence across trips. Trips of the same feed route that
/// would break this ordering are placed in a sibling route by the builder.
#[derive(Debug, Clone)]
pub struct Route {
    id: String,
    short_name: String,
    long_name: String,
    agency: AgencyIdx,
    stops: Vec<StopIdx>,
    trips: Vec<Trip>,
}

impl Route {
    pub(crate) fn new(
        id: String,
        short_name: String,
        long_name: String,
        agency: AgencyIdx,
        stops: Vec<StopIdx>,
        trips: Vec<Trip>,
    ) -> Self {
        debug_assert!(!trips.is_empty());
        debug_assert!(trips.iter().all(|trip| trip.nb_of_stops() == stops.len()));
        Self {
            id,
            short_name,
            long_name,
            agency,
            stops,
            trips,
        }
    }

    /// The feed route id this route was derived from.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    pub fn long_name(&self) -> &str {
        &self.long_name
    }

    pub fn agency(&self) -> AgencyIdx {
        self.agency
    }

    /// The stop sequence shared by every trip of this route.
    pub fn stop_sequence(&self) -> &[StopIdx] {
        &self.stops
    }

    /// Panics if `position` is out of range.
    pub fn stop_at(&self, position: usize) -> StopIdx {
        self.stops[position]
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    /// Panics if `trip` is out of range.
    pub fn trip(&self, trip: TripIdx) -> &Trip {
        &self.trips[trip.idx]
    }

    pub fn nb_of_trips(&self) -> usize {
        self.trips.len()
    }

    /// The earliest trip among `trips[..limit]` whose departure at
    /// `position` is at or after `bound`.
    ///
    /// Binary search; valid because departures at every fixed position are
    /// non-decreasing across the trips of a route.
    pub fn earliest_trip_to_board(
        &self,
        position: usize,
        bound: &SecondsSinceEpoch,
        limit: usize,
    ) -> Option<TripIdx> {
        let candidates = &self.trips[..limit];
        let idx =
            candidates.partition_point(|trip| trip.stop_time(position).departure < *bound);
        if idx < limit {
            Some(TripIdx { idx })
        } else {
            None
        }
    }
}

/// An operator of routes; its timezone anchors the feed's service days.
#[derive(Debug, Clone)]
pub struct Agency {
    id: String,
    name: String,
    url: String,
    timezone: Tz,
}

impl Agency {
    pub(crate) fn new(id: String, name: String, url: String, timezone: Tz) -> Self {
        Self {
            id,
            name,
            url,
            timezone,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn timezone(&self) -> &Tz {
        &self.timezone
    }
}

/// The immutable schedule, with every lookup index precomputed.
///
/// Built once by [`FeedBuilder`], then shared read-only across any number of
/// concurrent queries.
pub struct Timetable {
    pub(crate) agencies: Vec<Agency>,
    pub(crate) stops: Vec<Stop>,
    pub(crate) stations: Vec<Station>,
    pub(crate) routes: Vec<Route>,

    pub(crate) stop_id_to_idx: HashMap<String, StopIdx>,
    /// A feed route id maps to every route derived from it: one per distinct
    /// stop sequence, plus overtaking splits.
    pub(crate) route_id_to_idx: HashMap<String, Vec<RouteIdx>>,
    /// `routes_serving_stop[stop]` lists each (route, position in the
    /// route's stop sequence) that visits the stop.
    pub(crate) routes_serving_stop: Vec<Vec<(RouteIdx, usize)>>,
}

impl Timetable {
    /// Panics if `stop` is out of range.
    pub fn stop(&self, stop: StopIdx) -> &Stop {
        &self.stops[stop.idx]
    }

    /// Panics if `station` is out of range.
    pub fn station(&self, station: StationIdx) -> &Station {
        &self.stations[station.idx]
    }

    /// Panics if `route` is out of range.
    pub fn route(&self, route: RouteIdx) -> &Route {
        &self.routes[route.idx]
    }

    /// Panics if `agency` is out of range.
    pub fn agency(&self, agency: AgencyIdx) -> &Agency {
        &self.agencies[agency.idx]
    }

    pub fn nb_of_stops(&self) -> usize {
        self.stops.len()
    }

    pub fn nb_of_stations(&self) -> usize {
        self.stations.len()
    }

    pub fn nb_of_routes(&self) -> usize {
        self.routes.len()
    }

    pub fn contains_stop(&self, stop: StopIdx) -> bool {
        stop.idx < self.stops.len()
    }

    pub fn stops(&self) -> impl Iterator<Item = (StopIdx, &Stop)> {
        self.stops
            .iter()
            .enumerate()
            .map(|(idx, stop)| (StopIdx { idx }, stop))
    }

    pub fn stations(&self) -> impl Iterator<Item = (StationIdx, &Station)> {
        self.stations
            .iter()
            .enumerate()
            .map(|(idx, station)| (StationIdx { idx }, station))
    }

    pub fn routes(&self) -> impl Iterator<Item = (RouteIdx, &Route)> {
        self.routes
            .iter()
            .enumerate()
            .map(|(idx, route)| (RouteIdx { idx }, route))
    }

    pub fn stop_idx(&self, stop_id: &str) -> Option<StopIdx> {
        self.stop_id_to_idx.get(stop_id).copied()
    }

    /// Every route derived from the given feed route id.
    pub fn routes_of(&self, route_id: &str) -> &[RouteIdx] {
        self.route_id_to_idx
            .get(route_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Panics if `stop` is out of range.
    pub fn routes_serving_stop(&self, stop: StopIdx) -> &[(RouteIdx, usize)] {
        &self.routes_serving_stop[stop.idx]
    }
}
