// Copyright (C) 2017 Kisio Digital and/or its affiliates.
//
// This program is free software: you can redistribute it and/or modify it
// under the terms of the GNU Affero General Public License as published by the
// Free Software Foundation, version 3.

// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more
// details.

// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>

mod utils;

use anyhow::Error;
use sleipnir::{
    haversine_km, LinearWalkModel, PositiveDuration, TransferGraphConfig, WalkTimeConfig,
    WalkTimeModel,
};
use utils::{init_logger, FeedFixture};

fn walk_5kmh() -> WalkTimeConfig {
    WalkTimeConfig {
        speed_kmh: 5.0,
        scale: 1.0,
    }
}

#[test]
fn stops_sharing_a_station_get_the_fixed_duration() -> Result<(), Error> {
    init_logger();

    let network = FeedFixture::new()
        .station("St1", 0.0, 0.0)
        .stop_in_station("s1", 0.0, 0.0, "St1")
        .stop_in_station("s2", 0.0, 0.0, "St1")
        .network_with(&walk_5kmh(), &TransferGraphConfig::default())?;

    // The exit-station duration is not added to an in-station transfer.
    assert_eq!(
        network.transfers.transfers_from(network.stop("s1")),
        &[(network.stop("s2"), PositiveDuration::from_seconds(60))]
    );
    assert_eq!(
        network.transfers.transfers_from(network.stop("s2")),
        &[(network.stop("s1"), PositiveDuration::from_seconds(60))]
    );
    Ok(())
}

#[test]
fn walking_transfers_pay_the_exit_station_duration_once() -> Result<(), Error> {
    init_logger();

    // Just under 80 s of walking at 5 km/h.
    let network = FeedFixture::new()
        .stop("a", 0.0, 0.0)
        .stop("b", 0.0, 0.000999)
        .network_with(&walk_5kmh(), &TransferGraphConfig::default())?;

    assert_eq!(
        network.transfers.transfers_from(network.stop("a")),
        &[(network.stop("b"), PositiveDuration::from_seconds(80 + 120))]
    );
    Ok(())
}

#[test]
fn the_search_radius_gates_walking_transfers() -> Result<(), Error> {
    init_logger();

    // a and b are roughly 1.11 km apart.
    let fixture = || {
        FeedFixture::new()
            .stop("a", 0.0, 0.0)
            .stop("b", 0.0, 0.01)
    };

    let narrow = fixture().network_with(
        &walk_5kmh(),
        &TransferGraphConfig {
            max_radius_km: 0.2,
            ..TransferGraphConfig::default()
        },
    )?;
    assert!(narrow
        .transfers
        .transfers_from(narrow.stop("a"))
        .is_empty());

    let wide = fixture().network_with(
        &walk_5kmh(),
        &TransferGraphConfig {
            max_radius_km: 2.0,
            ..TransferGraphConfig::default()
        },
    )?;
    let targets: Vec<_> = wide
        .transfers
        .transfers_from(wide.stop("a"))
        .iter()
        .map(|(stop, _)| *stop)
        .collect();
    assert_eq!(targets, vec![wide.stop("b")]);
    Ok(())
}

#[test]
fn a_zero_radius_leaves_only_same_station_transfers() -> Result<(), Error> {
    init_logger();

    // a and b share coordinates but not a station.
    let network = FeedFixture::new()
        .stop("a", 0.0, 0.0)
        .stop("b", 0.0, 0.0)
        .station("St1", 0.0, 0.001)
        .stop_in_station("s1", 0.0, 0.001, "St1")
        .stop_in_station("s2", 0.0, 0.001, "St1")
        .network_with(
            &walk_5kmh(),
            &TransferGraphConfig {
                max_radius_km: 0.0,
                ..TransferGraphConfig::default()
            },
        )?;

    assert!(network
        .transfers
        .transfers_from(network.stop("a"))
        .is_empty());
    assert!(network
        .transfers
        .transfers_from(network.stop("b"))
        .is_empty());
    assert_eq!(
        network.transfers.transfers_from(network.stop("s1")),
        &[(network.stop("s2"), PositiveDuration::from_seconds(60))]
    );
    Ok(())
}

#[test]
fn nearby_siblings_keep_the_in_station_duration() -> Result<(), Error> {
    init_logger();

    // The siblings are ~50 m apart, well inside walking range; the
    // coordinate-based edge must not replace the in-station one.
    let network = FeedFixture::new()
        .station("St1", 0.0, 0.0)
        .stop_in_station("s1", 0.0, 0.0, "St1")
        .stop_in_station("s2", 0.0, 0.00045, "St1")
        .network_with(&walk_5kmh(), &TransferGraphConfig::default())?;

    let transfers = network.transfers.transfers_from(network.stop("s1"));
    let to_sibling: Vec<_> = transfers
        .iter()
        .filter(|(stop, _)| *stop == network.stop("s2"))
        .collect();
    assert_eq!(to_sibling.len(), 1);
    assert_eq!(to_sibling[0].1, PositiveDuration::from_seconds(60));
    Ok(())
}

#[test]
fn walking_edges_cost_at_least_the_great_circle_walk() -> Result<(), Error> {
    init_logger();

    let network = FeedFixture::new()
        .stop("a", 0.0, 0.0)
        .stop("b", 0.0, 0.003)
        .stop("c", 0.001, 0.002)
        .station("St1", 0.002, 0.0)
        .stop_in_station("s1", 0.002, 0.0, "St1")
        .stop_in_station("s2", 0.002, 0.0004, "St1")
        .network_with(&walk_5kmh(), &TransferGraphConfig::default())?;

    let walk = LinearWalkModel::new(&walk_5kmh())?;
    let timetable = &network.timetable;
    for (from, from_stop) in timetable.stops() {
        for (to, duration) in network.transfers.transfers_from(from) {
            let to_stop = timetable.stop(*to);
            let same_station = from_stop.parent_station().is_some()
                && from_stop.parent_station() == to_stop.parent_station();
            if same_station {
                assert_eq!(*duration, PositiveDuration::from_seconds(60));
            } else {
                let floor = walk.walk_distance(haversine_km(from_stop.coord(), to_stop.coord()));
                assert!(*duration >= floor);
            }
        }
    }
    Ok(())
}

#[test]
fn an_isolated_stop_has_no_transfers() -> Result<(), Error> {
    init_logger();

    let network = FeedFixture::new()
        .stop("a", 0.0, 0.0)
        .stop("far", 45.0, 90.0)
        .network_with(&walk_5kmh(), &TransferGraphConfig::default())?;

    assert!(network
        .transfers
        .transfers_from(network.stop("far"))
        .is_empty());
    Ok(())
}
