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

use chrono::NaiveDate;
use thiserror::Error;

/// Reasons for which a parsed feed is rejected at timetable construction.
/// None of these is recovered internally; they all surface to the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidFeed {
    #[error("reference to unknown stop id `{0}`")]
    UnknownStopRef(String),
    #[error("calendar_dates references unknown service id `{0}`")]
    UnknownServiceRef(String),
    #[error("trip `{trip_id}` references unknown route id `{route_id}`")]
    UnknownRouteRef { trip_id: String, route_id: String },
    #[error("service id `{0}` appears twice in calendar")]
    DuplicateService(String),
    #[error("calendar_dates removes {date} from service `{service_id}` but that date is not active")]
    RemovedAbsentDate {
        service_id: String,
        date: NaiveDate,
    },
    #[error("trip `{0}` has no stop times")]
    EmptyTrip(String),
    #[error("feed contains no agency")]
    MissingAgency,
    #[error("agency `{agency_id}` has unknown timezone `{timezone}`")]
    UnknownTimezone { agency_id: String, timezone: String },
}

/// Rejected configuration values, raised when a component is constructed.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InvalidConfig {
    #[error("`{name}` must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },
}

/// Failures of a single routing query. An unreachable destination is not an
/// error; it is reported as an empty journey.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("query references a stop that is not in the timetable")]
    UnknownStop,
}
