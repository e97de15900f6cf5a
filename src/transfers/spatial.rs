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

use crate::timetable::{Coord, StopIdx, Timetable};
use kdtree::distance::squared_euclidean;
use kdtree::KdTree;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Nearest-neighbour index over the timetable's stops.
///
/// Geographic coordinates are projected onto 3-D Cartesian space on a sphere
/// of radius 6371 km, so that the Euclidean chord distance approximates the
/// great-circle distance. For the radii used when building transfers (a few
/// kilometres at most) the approximation under-estimates by a negligible
/// amount.
pub struct SpatialIndex {
    tree: KdTree<f64, StopIdx, [f64; 3]>,
}

impl SpatialIndex {
    pub fn new(timetable: &Timetable) -> Self {
        let mut tree = KdTree::with_capacity(3, timetable.nb_of_stops().max(1));
        for (idx, stop) in timetable.stops() {
            tree.add(to_cartesian(stop.coord()), idx)
                .expect("stop coordinates are finite and 3-dimensional");
        }
        Self { tree }
    }

    /// All stops within `radius_km` (chord distance) of the given
    /// coordinate, closest first, ties broken by ascending stop index.
    /// A stop located exactly at `coord` is included with distance 0.
    pub fn within(&self, coord: &Coord, radius_km: f64) -> Vec<(StopIdx, f64)> {
        let point = to_cartesian(coord);
        let mut matches: Vec<(StopIdx, f64)> = self
            .tree
            .within(&point, radius_km * radius_km, &squared_euclidean)
            .expect("query point is finite and 3-dimensional")
            .into_iter()
            .map(|(squared_distance, stop)| (*stop, squared_distance.sqrt()))
            .collect();
        matches.sort_by(|(stop_a, dist_a), (stop_b, dist_b)| {
            dist_a
                .partial_cmp(dist_b)
                .expect("distances are finite")
                .then(stop_a.cmp(stop_b))
        });
        matches
    }

    /// As [`SpatialIndex::within`], from the coordinate of `stop` and
    /// excluding `stop` itself.
    pub fn within_stop(
        &self,
        timetable: &Timetable,
        stop: StopIdx,
        radius_km: f64,
    ) -> Vec<(StopIdx, f64)> {
        let mut matches = self.within(timetable.stop(stop).coord(), radius_km);
        matches.retain(|(neighbour, _)| *neighbour != stop);
        matches
    }
}

fn to_cartesian(coord: &Coord) -> [f64; 3] {
    let latitude = coord.lat.to_radians();
    let longitude = coord.lon.to_radians();
    [
        EARTH_RADIUS_KM * latitude.cos() * longitude.cos(),
        EARTH_RADIUS_KM * latitude.cos() * longitude.sin(),
        EARTH_RADIUS_KM * latitude.sin(),
    ]
}
