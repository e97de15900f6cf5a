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

//! Earliest-arrival journey planning over public transit timetables.
//!
//! The crate is organised around three immutable structures built once per
//! dataset and shared read-only across queries:
//!
//! - a [`Timetable`], assembled from a parsed GTFS-like [`feed::Feed`] by
//!   the [`FeedBuilder`]: stops grouped into stations, vehicle runs
//!   instantiated per service date and grouped into routes by stop
//!   sequence, with lookup indices precomputed;
//! - a [`SpatialIndex`] over the stops, for nearest-neighbour searches;
//! - a [`TransferGraph`] of on-foot connections, derived from station
//!   groupings and the spatial index through a [`WalkTimeModel`].
//!
//! Queries run through the [`Router`], a round-based search where round `k`
//! admits journeys with at most `k` vehicle boardings. Each query owns a
//! [`RoundState`] and produces a [`Journey`] of public transit and walking
//! legs.
//!
//! ```no_run
//! use sleipnir::{
//!     FeedBuilder, LinearWalkModel, Router, SpatialIndex, TransferGraph,
//!     TransferGraphConfig, WalkTimeConfig,
//! };
//!
//! # fn run(feed: sleipnir::feed::Feed, departure: sleipnir::chrono::DateTime<sleipnir::chrono::Utc>) -> Result<(), Box<dyn std::error::Error>> {
//! let timetable = FeedBuilder::new(&feed).build()?;
//! let spatial = SpatialIndex::new(&timetable);
//! let walk = LinearWalkModel::new(&WalkTimeConfig::default())?;
//! let transfers =
//!     TransferGraph::build(&timetable, &spatial, &walk, &TransferGraphConfig::default());
//!
//! let router = Router::new(&timetable, &transfers);
//! let origin = timetable.stop_idx("A").unwrap();
//! let destination = timetable.stop_idx("B").unwrap();
//! let _journey = router.route(origin, destination, departure)?;
//! # Ok(())
//! # }
//! ```

pub use chrono;
pub use chrono_tz;

mod engine;
mod error;
pub mod feed;
mod time;
mod timetable;
mod transfers;

pub use engine::{Journey, Label, Leg, PTLeg, RoundState, Router, WalkLeg};
pub use error::{InvalidConfig, InvalidFeed, QueryError};
pub use time::{PositiveDuration, SecondsSinceEpoch};
pub use timetable::{
    Agency, AgencyIdx, BoardingArea, Coord, Entrance, FeedBuilder, Route, RouteIdx, Station,
    StationIdx, Stop, StopIdx, StopTime, Timetable, Trip, TripIdx,
};
pub use transfers::{
    haversine_km, LinearWalkModel, SpatialIndex, TransferGraph, TransferGraphConfig,
    WalkTimeConfig, WalkTimeModel,
};
