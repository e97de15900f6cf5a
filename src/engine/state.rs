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

use crate::time::SecondsSinceEpoch;
use crate::timetable::{RouteIdx, StopIdx, TripIdx};
use std::collections::{BTreeSet, HashMap};

/// How a stop was reached in a given round.
///
/// `ride` is absent for on-foot movements; `boarding_stop` is absent only
/// for the query origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label {
    pub arrival: SecondsSinceEpoch,
    pub boarding_stop: Option<StopIdx>,
    pub ride: Option<(RouteIdx, TripIdx)>,
}

/// The mutable working memory of one query.
///
/// Keeps the labels of the current and previous rounds, the best arrival
/// seen per stop across all rounds, and the set of stops improved during the
/// ongoing round. Label maps are keyed by stop, so memory stays proportional
/// to the stops actually reached rather than to the timetable size.
pub struct RoundState {
    current_labels: HashMap<StopIdx, Label>,
    previous_labels: HashMap<StopIdx, Label>,
    best_arrival: HashMap<StopIdx, SecondsSinceEpoch>,
    marked: BTreeSet<StopIdx>,
    destination: StopIdx,
    round: u32,
}

impl RoundState {
    /// Labels the origin with the departure instant, marks it, and stays at
    /// round 0.
    pub fn new(origin: StopIdx, destination: StopIdx, departure: SecondsSinceEpoch) -> Self {
        let mut current_labels = HashMap::new();
        current_labels.insert(
            origin,
            Label {
                arrival: departure,
                boarding_stop: None,
                ride: None,
            },
        );
        let mut best_arrival = HashMap::new();
        best_arrival.insert(origin, departure);
        let mut marked = BTreeSet::new();
        marked.insert(origin);
        Self {
            current_labels,
            previous_labels: HashMap::new(),
            best_arrival,
            marked,
            destination,
            round: 0,
        }
    }

    /// Snapshots the current labels as the previous round and increments
    /// the round counter. The marked set is left untouched; it is drained
    /// separately by [`RoundState::take_marked`].
    pub fn begin_round(&mut self) {
        self.previous_labels = self.current_labels.clone();
        self.round += 1;
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    /// Returns the marked stops and clears the set.
    pub fn take_marked(&mut self) -> BTreeSet<StopIdx> {
        std::mem::take(&mut self.marked)
    }

    /// The stops improved so far during the ongoing round, in ascending
    /// index order.
    pub fn marked_stops(&self) -> impl Iterator<Item = StopIdx> + '_ {
        self.marked.iter().copied()
    }

    pub fn has_marked(&self) -> bool {
        !self.marked.is_empty()
    }

    /// Records `arrival` at `stop` if it strictly improves the best arrival
    /// seen there, unless it cannot beat the best arrival at the
    /// destination (target pruning). On improvement the stop is marked and
    /// its current-round label replaced.
    pub fn try_improve(
        &mut self,
        stop: StopIdx,
        arrival: SecondsSinceEpoch,
        boarding_stop: Option<StopIdx>,
        ride: Option<(RouteIdx, TripIdx)>,
    ) -> bool {
        let improves_stop = match self.best_arrival.get(&stop) {
            Some(best) => arrival < *best,
            None => true,
        };
        let beats_destination = match self.best_arrival.get(&self.destination) {
            Some(best) => arrival < *best,
            None => true,
        };
        if !improves_stop || !beats_destination {
            return false;
        }
        self.current_labels.insert(
            stop,
            Label {
                arrival,
                boarding_stop,
                ride,
            },
        );
        self.best_arrival.insert(stop, arrival);
        self.marked.insert(stop);
        true
    }

    /// True iff the previous round reached `stop` early enough to board a
    /// vehicle departing at `candidate_departure`. An arrival exactly
    /// matching the departure is catchable.
    pub fn might_catch_earlier_trip(
        &self,
        stop: StopIdx,
        candidate_departure: &SecondsSinceEpoch,
    ) -> bool {
        match self.previous_labels.get(&stop) {
            Some(label) => label.arrival <= *candidate_departure,
            None => false,
        }
    }

    pub fn current_label(&self, stop: StopIdx) -> Option<&Label> {
        self.current_labels.get(&stop)
    }

    pub fn current_arrival(&self, stop: StopIdx) -> Option<SecondsSinceEpoch> {
        self.current_labels.get(&stop).map(|label| label.arrival)
    }

    pub fn previous_arrival(&self, stop: StopIdx) -> Option<SecondsSinceEpoch> {
        self.previous_labels.get(&stop).map(|label| label.arrival)
    }
}
