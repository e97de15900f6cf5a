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

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A non-negative length of time, in whole seconds.
/// Used for transfer durations and walking times.
#[derive(Debug, Eq, PartialEq, Clone, Copy, Ord, PartialOrd, Serialize, Deserialize)]
pub struct PositiveDuration {
    seconds: u32,
}

impl PositiveDuration {
    pub fn zero() -> Self {
        Self { seconds: 0 }
    }

    pub const fn from_seconds(seconds: u32) -> Self {
        Self { seconds }
    }

    pub const fn from_hms(hours: u32, minutes: u32, seconds: u32) -> Self {
        Self {
            seconds: seconds + 60 * minutes + 60 * 60 * hours,
        }
    }

    pub fn total_seconds(&self) -> u64 {
        u64::from(self.seconds)
    }
}

impl Display for PositiveDuration {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let hours = self.seconds / (60 * 60);
        let minutes_in_secs = self.seconds % (60 * 60);
        let minutes = minutes_in_secs / 60;
        let seconds = minutes_in_secs % 60;
        if hours != 0 {
            write!(f, "{}h{:02}m{:02}s", hours, minutes, seconds)
        } else if minutes != 0 {
            write!(f, "{}m{:02}s", minutes, seconds)
        } else {
            write!(f, "{}s", seconds)
        }
    }
}

impl std::ops::Add for PositiveDuration {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            seconds: self.seconds + rhs.seconds,
        }
    }
}

/// A timezone-aware absolute instant, stored as whole seconds since the
/// Unix epoch (UTC).
///
/// All comparisons in the routing loop happen on this integer form; chrono
/// types appear only when an instant is created from, or rendered back to,
/// a calendar datetime.
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct SecondsSinceEpoch {
    seconds: i64,
}

impl SecondsSinceEpoch {
    pub fn from_utc(datetime: &DateTime<Utc>) -> Self {
        Self {
            seconds: datetime.timestamp(),
        }
    }

    /// Interprets `local` as a wall-clock datetime in `timezone` and resolves
    /// it to an absolute instant with the "earliest" disambiguation policy:
    /// an ambiguous time (clocks moved backward) maps to its first
    /// occurrence, and a skipped time (clocks moved forward) is interpreted
    /// with the offset in force just before the jump.
    pub fn from_local_datetime(timezone: &Tz, local: NaiveDateTime) -> Self {
        match timezone.from_local_datetime(&local) {
            LocalResult::Single(datetime) => Self {
                seconds: datetime.timestamp(),
            },
            LocalResult::Ambiguous(earliest, _) => Self {
                seconds: earliest.timestamp(),
            },
            LocalResult::None => {
                // Forward transitions are at most a few hours wide, so a
                // wall-clock time shortly before `local` is representable.
                let mut backshift_hours = 1;
                loop {
                    let shifted = local - chrono::Duration::hours(backshift_hours);
                    if let Some(datetime) = timezone.from_local_datetime(&shifted).earliest() {
                        break Self {
                            seconds: datetime.timestamp() + backshift_hours * 60 * 60,
                        };
                    }
                    backshift_hours += 1;
                    assert!(
                        backshift_hours <= 24,
                        "no valid wall-clock time within 24h before {local} in {timezone}"
                    );
                }
            }
        }
    }

    pub fn to_datetime(&self, timezone: &Tz) -> Option<DateTime<Tz>> {
        DateTime::<Utc>::from_timestamp(self.seconds, 0)
            .map(|datetime| datetime.with_timezone(timezone))
    }

    pub fn duration_since(&self, earlier: &SecondsSinceEpoch) -> Option<PositiveDuration> {
        let diff = self.seconds.checked_sub(earlier.seconds)?;
        u32::try_from(diff).ok().map(PositiveDuration::from_seconds)
    }
}

impl From<DateTime<Utc>> for SecondsSinceEpoch {
    fn from(datetime: DateTime<Utc>) -> Self {
        Self::from_utc(&datetime)
    }
}

impl std::ops::Add<PositiveDuration> for SecondsSinceEpoch {
    type Output = Self;

    fn add(self, rhs: PositiveDuration) -> Self::Output {
        Self {
            seconds: self.seconds + i64::from(rhs.seconds),
        }
    }
}

impl Display for SecondsSinceEpoch {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match DateTime::<Utc>::from_timestamp(self.seconds, 0) {
            Some(datetime) => write!(f, "{}", datetime.format("%Y%m%dT%H%M%SZ")),
            None => write!(f, "{}s", self.seconds),
        }
    }
}
