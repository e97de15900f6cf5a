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

use super::state::RoundState;
use crate::time::{PositiveDuration, SecondsSinceEpoch};
use crate::timetable::{RouteIdx, StopIdx, StopTime, Timetable, TripIdx};

/// A ride on one trip, between two positions of its route's stop sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PTLeg {
    pub route: RouteIdx,
    pub trip: TripIdx,
    /// Position of the boarding stop in the route's stop sequence.
    pub from_position: usize,
    /// Position of the alighting stop in the route's stop sequence.
    pub to_position: usize,
}

impl PTLeg {
    pub fn from_stop(&self, timetable: &Timetable) -> StopIdx {
        timetable.route(self.route).stop_at(self.from_position)
    }

    pub fn to_stop(&self, timetable: &Timetable) -> StopIdx {
        timetable.route(self.route).stop_at(self.to_position)
    }

    /// The stop times covered by this ride, boarding and alighting stops
    /// included.
    pub fn stop_times<'timetable>(&self, timetable: &'timetable Timetable) -> &'timetable [StopTime] {
        let trip = timetable.route(self.route).trip(self.trip);
        &trip.stop_times()[self.from_position..=self.to_position]
    }

    pub fn departure(&self, timetable: &Timetable) -> SecondsSinceEpoch {
        timetable
            .route(self.route)
            .trip(self.trip)
            .stop_time(self.from_position)
            .departure
    }

    pub fn arrival(&self, timetable: &Timetable) -> SecondsSinceEpoch {
        timetable
            .route(self.route)
            .trip(self.trip)
            .stop_time(self.to_position)
            .arrival
    }
}

/// An on-foot movement between two stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkLeg {
    pub from_stop: StopIdx,
    pub to_stop: StopIdx,
    pub duration: PositiveDuration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Leg {
    PublicTransit(PTLeg),
    Walk(WalkLeg),
}

/// An ordered sequence of legs from origin to destination.
///
/// An empty journey with no arrival means the destination is unreachable; a
/// journey with zero legs but an arrival means origin and destination
/// coincide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Journey {
    legs: Vec<Leg>,
    arrival: Option<SecondsSinceEpoch>,
}

impl Journey {
    pub(crate) fn unreachable() -> Self {
        Self {
            legs: Vec::new(),
            arrival: None,
        }
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    /// The arrival instant at the destination; `None` when unreachable.
    pub fn arrival(&self) -> Option<SecondsSinceEpoch> {
        self.arrival
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    pub fn nb_of_legs(&self) -> usize {
        self.legs.len()
    }

    /// The number of vehicle boardings; on-foot legs do not count.
    pub fn nb_of_boardings(&self) -> usize {
        self.legs
            .iter()
            .filter(|leg| matches!(leg, Leg::PublicTransit(_)))
            .count()
    }
}

/// Backtracks the final labels from the destination to the origin and
/// reverses the collected legs into chronological order.
///
/// A label holding a (route, trip) pair yields a public transit leg; a label
/// without one yields a walking leg whose duration is the gap between the
/// arrivals at its two endpoints. The origin is recognised by its label
/// having no boarding stop.
pub(crate) fn reconstruct(
    timetable: &Timetable,
    destination: StopIdx,
    state: &RoundState,
) -> Journey {
    if state.current_label(destination).is_none() {
        return Journey::unreachable();
    }

    let mut legs = Vec::new();
    let mut cursor = destination;
    loop {
        let label = state
            .current_label(cursor)
            .expect("every backtracked stop has a label");
        let Some(boarding_stop) = label.boarding_stop else {
            break;
        };
        match label.ride {
            Some((route_idx, trip_idx)) => {
                let route = timetable.route(route_idx);
                let stops = route.stop_sequence();
                let from_position = stops
                    .iter()
                    .position(|stop| *stop == boarding_stop)
                    .expect("the boarding stop belongs to the route it was boarded on");
                let to_position = from_position
                    + 1
                    + stops[from_position + 1..]
                        .iter()
                        .position(|stop| *stop == cursor)
                        .expect("the alighting stop follows the boarding stop on the route");
                legs.push(Leg::PublicTransit(PTLeg {
                    route: route_idx,
                    trip: trip_idx,
                    from_position,
                    to_position,
                }));
            }
            None => {
                let start = state
                    .current_label(boarding_stop)
                    .expect("the start of a walking leg has a label");
                let duration = label
                    .arrival
                    .duration_since(&start.arrival)
                    .expect("arrivals never decrease along a backtracked journey");
                legs.push(Leg::Walk(WalkLeg {
                    from_stop: boarding_stop,
                    to_stop: cursor,
                    duration,
                }));
            }
        }
        cursor = boarding_stop;
    }

    legs.reverse();
    Journey {
        arrival: state.current_arrival(destination),
        legs,
    }
}
