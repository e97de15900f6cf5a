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

use crate::error::InvalidConfig;
use crate::time::PositiveDuration;
use crate::timetable::Coord;
use serde::{Deserialize, Serialize};

const N_DEG_TO_RAD: f64 = std::f64::consts::PI / 180.0;
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometres between two coordinates, by the
/// haversine formula on a sphere of radius 6371 km.
pub fn haversine_km(from: &Coord, to: &Coord) -> f64 {
    let latitude_arc = (to.lat - from.lat) * N_DEG_TO_RAD;
    let longitude_arc = (to.lon - from.lon) * N_DEG_TO_RAD;
    let latitude_h = (latitude_arc * 0.5).sin();
    let latitude_h = latitude_h * latitude_h;
    let longitude_h = (longitude_arc * 0.5).sin();
    let longitude_h = longitude_h * longitude_h;
    let tmp = (from.lat * N_DEG_TO_RAD).cos() * (to.lat * N_DEG_TO_RAD).cos();
    EARTH_RADIUS_KM * 2.0 * (latitude_h + tmp * longitude_h).sqrt().asin()
}

/// Converts distances to walking durations.
pub trait WalkTimeModel {
    /// Walking time between two coordinates.
    fn walk_between(&self, from: &Coord, to: &Coord) -> PositiveDuration;

    /// Walking time for a known distance in kilometres.
    fn walk_distance(&self, distance_km: f64) -> PositiveDuration;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WalkTimeConfig {
    pub speed_kmh: f64,
    /// Pessimism factor applied on top of the raw walking time; street
    /// networks are longer than great circles.
    pub scale: f64,
}

impl Default for WalkTimeConfig {
    fn default() -> Self {
        Self {
            speed_kmh: 5.0,
            scale: 2.0,
        }
    }
}

/// The default [`WalkTimeModel`]: great-circle distance walked at a constant
/// speed, scaled, rounded up to whole seconds.
#[derive(Debug, Clone)]
pub struct LinearWalkModel {
    speed_kmh: f64,
    scale: f64,
}

impl LinearWalkModel {
    pub fn new(config: &WalkTimeConfig) -> Result<Self, InvalidConfig> {
        if config.speed_kmh <= 0.0 || config.speed_kmh.is_nan() {
            return Err(InvalidConfig::NonPositive {
                name: "speed_kmh",
                value: config.speed_kmh,
            });
        }
        if config.scale <= 0.0 || config.scale.is_nan() {
            return Err(InvalidConfig::NonPositive {
                name: "scale",
                value: config.scale,
            });
        }
        Ok(Self {
            speed_kmh: config.speed_kmh,
            scale: config.scale,
        })
    }
}

impl WalkTimeModel for LinearWalkModel {
    fn walk_between(&self, from: &Coord, to: &Coord) -> PositiveDuration {
        self.walk_distance(haversine_km(from, to))
    }

    fn walk_distance(&self, distance_km: f64) -> PositiveDuration {
        let raw_seconds = (3600.0 * distance_km / self.speed_kmh).ceil();
        let scaled_seconds = (raw_seconds * self.scale).ceil();
        PositiveDuration::from_seconds(scaled_seconds as u32)
    }
}
