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

use super::journey::{reconstruct, Journey};
use super::state::RoundState;
use crate::error::QueryError;
use crate::time::SecondsSinceEpoch;
use crate::timetable::{RouteIdx, StopIdx, Timetable};
use crate::transfers::TransferGraph;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// The round-based earliest-arrival search.
///
/// Round `k` admits journeys using at most `k` vehicle boardings. Each round
/// scans the routes serving the stops improved in the previous round, then
/// relaxes one hop of on-foot transfers from the stops improved by the scan.
/// On-foot transfers are also relaxed once before the first round, so a
/// journey whose best first move is a walk away from the origin is found.
///
/// The router borrows the timetable and transfer graph read-only; one router
/// (or several) can serve any number of concurrent queries, each with its
/// own per-query state.
pub struct Router<'a> {
    timetable: &'a Timetable,
    transfers: &'a TransferGraph,
}

impl<'a> Router<'a> {
    pub fn new(timetable: &'a Timetable, transfers: &'a TransferGraph) -> Self {
        Self {
            timetable,
            transfers,
        }
    }

    /// Computes a journey from `origin` to `destination` leaving at
    /// `departure` or later, minimising arrival time and, between journeys
    /// of equal arrival, the number of boardings.
    ///
    /// An unreachable destination yields an empty journey, not an error.
    pub fn route(
        &self,
        origin: StopIdx,
        destination: StopIdx,
        departure: DateTime<Utc>,
    ) -> Result<Journey, QueryError> {
        if !self.timetable.contains_stop(origin) || !self.timetable.contains_stop(destination) {
            return Err(QueryError::UnknownStop);
        }

        let mut state = RoundState::new(
            origin,
            destination,
            SecondsSinceEpoch::from_utc(&departure),
        );
        self.relax_transfers(&mut state);

        while state.has_marked() {
            state.begin_round();
            let marked = state.take_marked();
            let routes_to_scan = self.collect_routes(&marked);
            debug!(
                round = state.round(),
                nb_of_marked = marked.len(),
                nb_of_routes = routes_to_scan.len(),
                "scanning round"
            );
            for (route, hop_on_position) in routes_to_scan {
                self.scan_route(route, hop_on_position, &mut state);
            }
            self.relax_transfers(&mut state);
        }

        Ok(reconstruct(self.timetable, destination, &state))
    }

    /// Collects the routes serving any marked stop, keeping for each route
    /// the earliest position at which it can be boarded.
    fn collect_routes(&self, marked: &BTreeSet<StopIdx>) -> BTreeMap<RouteIdx, usize> {
        let mut routes: BTreeMap<RouteIdx, usize> = BTreeMap::new();
        for stop in marked {
            for (route, position) in self.timetable.routes_serving_stop(*stop) {
                routes
                    .entry(*route)
                    .and_modify(|earliest| *earliest = (*earliest).min(*position))
                    .or_insert(*position);
            }
        }
        routes
    }

    /// Rides the earliest catchable trip of one route from the hop-on
    /// position, improving arrivals downstream.
    ///
    /// When an arrival fails to improve a stop that the previous round
    /// already reached in time for the current departure, an earlier trip of
    /// the route may be catchable there: re-search among the earlier trips
    /// and continue the scan on the one found.
    fn scan_route(&self, route_idx: RouteIdx, hop_on_position: usize, state: &mut RoundState) {
        let route = self.timetable.route(route_idx);
        let mut hop_on_stop = route.stop_at(hop_on_position);
        let Some(hop_on_arrival) = state.previous_arrival(hop_on_stop) else {
            return;
        };
        let Some(mut trip_idx) =
            route.earliest_trip_to_board(hop_on_position, &hop_on_arrival, route.nb_of_trips())
        else {
            return;
        };

        for position in hop_on_position + 1..route.stop_sequence().len() {
            let stop_time = *route.trip(trip_idx).stop_time(position);
            let current_stop = route.stop_at(position);
            let improved = state.try_improve(
                current_stop,
                stop_time.arrival,
                Some(hop_on_stop),
                Some((route_idx, trip_idx)),
            );
            if !improved && state.might_catch_earlier_trip(current_stop, &stop_time.departure) {
                let previous_arrival = state
                    .previous_arrival(current_stop)
                    .expect("might_catch_earlier_trip implies a previous-round label");
                if let Some(earlier) =
                    route.earliest_trip_to_board(position, &previous_arrival, trip_idx.idx)
                {
                    trip_idx = earlier;
                    hop_on_stop = current_stop;
                }
            }
        }
    }

    /// Relaxes one hop of on-foot transfers from every stop improved so far
    /// in the ongoing round. Stops improved by this relaxation stay marked
    /// for the next round but are not relaxed again within this one; the
    /// arrivals are snapshotted first so a transfer never chains onto
    /// another transfer of the same round.
    fn relax_transfers(&self, state: &mut RoundState) {
        let marked: Vec<(StopIdx, SecondsSinceEpoch)> = state
            .marked_stops()
            .filter_map(|stop| state.current_arrival(stop).map(|arrival| (stop, arrival)))
            .collect();
        for (from, arrival) in marked {
            for (to, duration) in self.transfers.transfers_from(from) {
                state.try_improve(*to, arrival + *duration, Some(from), None);
            }
        }
    }
}
