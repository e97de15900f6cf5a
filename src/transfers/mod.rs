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

//! On-foot connections between stops.
//!
//! Two kinds of edges are built, in this order of precedence: fixed-duration
//! transfers between stops sharing a station, then walking transfers to
//! spatial neighbours. An on-foot edge never overrides a same-station edge.

mod spatial;
mod walk;

pub use spatial::SpatialIndex;
pub use walk::{haversine_km, LinearWalkModel, WalkTimeConfig, WalkTimeModel};

use crate::time::PositiveDuration;
use crate::timetable::{StopIdx, Timetable};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TransferGraphConfig {
    /// Maximum search radius for on-foot transfers, in kilometres.
    pub max_radius_km: f64,
    /// Added once to each walking transfer, accounting for leaving one
    /// station and entering another.
    pub exit_station_duration: PositiveDuration,
    /// Fixed duration of a transfer between stops sharing a station.
    pub in_station_transfer_duration: PositiveDuration,
}

impl Default for TransferGraphConfig {
    fn default() -> Self {
        Self {
            max_radius_km: 1.0,
            exit_station_duration: PositiveDuration::from_seconds(120),
            in_station_transfer_duration: PositiveDuration::from_seconds(60),
        }
    }
}

/// The per-stop lists of outgoing on-foot transfers.
///
/// Built once next to the [`Timetable`] and shared read-only across queries.
/// The default construction produces symmetric edges, but nothing in the
/// read interface relies on symmetry.
pub struct TransferGraph {
    outgoing: Vec<Vec<(StopIdx, PositiveDuration)>>,
}

impl TransferGraph {
    pub fn build(
        timetable: &Timetable,
        spatial: &SpatialIndex,
        walk: &dyn WalkTimeModel,
        config: &TransferGraphConfig,
    ) -> Self {
        let mut outgoing: Vec<Vec<(StopIdx, PositiveDuration)>> =
            vec![Vec::new(); timetable.nb_of_stops()];

        // Same-station transfers take precedence over anything the spatial
        // search finds for the same pair.
        for (_, station) in timetable.stations() {
            for from in station.stops() {
                for to in station.stops() {
                    if from != to {
                        outgoing[from.idx].push((*to, config.in_station_transfer_duration));
                    }
                }
            }
        }

        if config.max_radius_km > 0.0 {
            for (from, _) in timetable.stops() {
                for (to, distance_km) in
                    spatial.within_stop(timetable, from, config.max_radius_km)
                {
                    let already_connected =
                        outgoing[from.idx].iter().any(|(stop, _)| *stop == to);
                    if already_connected {
                        continue;
                    }
                    let duration =
                        walk.walk_distance(distance_km) + config.exit_station_duration;
                    outgoing[from.idx].push((to, duration));
                }
            }
        }

        let nb_of_transfers: usize = outgoing.iter().map(Vec::len).sum();
        debug!(nb_of_transfers, "transfer graph built");
        Self { outgoing }
    }

    /// The outgoing transfers of `stop`. A stop with no transfers yields an
    /// empty slice. Panics if `stop` is out of range.
    pub fn transfers_from(&self, stop: StopIdx) -> &[(StopIdx, PositiveDuration)] {
        &self.outgoing[stop.idx]
    }

    pub fn nb_of_transfers(&self) -> usize {
        self.outgoing.iter().map(Vec::len).sum()
    }
}
