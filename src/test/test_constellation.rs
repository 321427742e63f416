// LeoSim: LEO Satellite Network Routing Simulator written in Rust
// Copyright (C) 2022-2023 Tibor Schneider <sctibor@ethz.ch>
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! Test the constellation builder.

use approx::assert_relative_eq;
use pretty_assertions::assert_eq;

use crate::constellation::{ConstellationSpec, LeoNetworkBuilder, GROUND_STATION_SITES};
use crate::geometry::SPEED_OF_LIGHT_KM_PER_MS;
use crate::types::{ConfigError, NodeId};

#[test]
fn globalstar_smoke() {
    let builder = LeoNetworkBuilder::new(ConstellationSpec::globalstar(), 10).unwrap();
    let topology = builder.build_at(0.0).unwrap();
    let stats = topology.statistics();
    assert_eq!(stats.satellites, 48);
    assert_eq!(stats.ground_stations, 10);
    assert_eq!(stats.total_nodes, 58);
    assert!(stats.total_links > 0);
    assert!(stats.is_connected);
}

#[test]
fn all_delays_are_physical() {
    let builder = LeoNetworkBuilder::new(ConstellationSpec::globalstar(), 10).unwrap();
    let topology = builder.build_at(0.0).unwrap();
    for link in topology.links() {
        let a = topology.node(link.end1()).unwrap().position();
        let b = topology.node(link.end2()).unwrap().position();
        let expected = a.distance_to(b) / SPEED_OF_LIGHT_KM_PER_MS;
        assert_relative_eq!(link.delay_ms(), expected, epsilon = 1e-6);
        assert!(link.delay_ms() > 0.0);
    }
}

#[test]
fn iridium_smoke() {
    let builder = LeoNetworkBuilder::new(ConstellationSpec::iridium(), 5).unwrap();
    let topology = builder.build_at(0.0).unwrap();
    let stats = topology.statistics();
    assert_eq!(stats.satellites, 66);
    assert_eq!(stats.ground_stations, 5);
    assert!(stats.total_links > 0);
}

#[test]
fn isl_neighbors_of_a_satellite() {
    // without ground stations, S_0_0 has exactly its two ring neighbors and the same-slot
    // satellites of the two adjacent planes
    let builder = LeoNetworkBuilder::new(ConstellationSpec::globalstar(), 0).unwrap();
    let topology = builder.build_at(0.0).unwrap();
    let s00 = NodeId::from("S_0_0");
    let mut neighbors: Vec<String> = topology.neighbors(&s00).map(|n| n.to_string()).collect();
    neighbors.sort();
    assert_eq!(neighbors, vec!["S_0_1", "S_0_5", "S_1_0", "S_7_0"]);
}

#[test]
fn uplinks_per_ground_station() {
    let builder = LeoNetworkBuilder::new(ConstellationSpec::globalstar(), 10).unwrap();
    let topology = builder.build_at(0.0).unwrap();
    for gs in 0..10 {
        let id = NodeId::from(format!("GS_{}", gs));
        let uplinks = topology.neighbors(&id).count();
        assert!(uplinks <= 2, "GS_{} has {} uplinks", gs, uplinks);
        assert!(uplinks > 0, "GS_{} has no uplink", gs);
    }
}

#[test]
fn orbital_period_is_plausible() {
    // a LEO orbit takes roughly two hours
    let spec = ConstellationSpec::globalstar();
    let period = spec.orbital_period_s();
    assert!((6000.0..8000.0).contains(&period), "period = {}", period);
}

#[test]
fn satellites_move_and_return() {
    let spec = ConstellationSpec::globalstar();
    let at_start = spec.satellite_position(2, 3, 0.0);
    let later = spec.satellite_position(2, 3, spec.orbital_period_s() / 2.0);
    assert!(at_start.distance_to(&later) > 1000.0);

    let after_full_orbit = spec.satellite_position(2, 3, spec.orbital_period_s());
    assert_relative_eq!(at_start.distance_to(&after_full_orbit), 0.0, epsilon = 1e-6);
}

#[test]
fn satellites_stay_on_the_orbit_sphere() {
    let spec = ConstellationSpec::iridium();
    for t in [0.0, 100.0, 1000.0] {
        let p = spec.satellite_position(1, 4, t);
        assert_relative_eq!(p.norm(), spec.orbital_radius_km(), epsilon = 1e-6);
    }
}

#[test]
fn unknown_constellation_name() {
    assert_eq!(
        ConstellationSpec::from_name("starlink").unwrap_err(),
        ConfigError::UnknownConstellation("starlink".to_string())
    );
    assert!(ConstellationSpec::from_name("GlobalStar").is_ok());
}

#[test]
fn invalid_plane_grid() {
    let mut spec = ConstellationSpec::globalstar();
    spec.num_planes = 7;
    assert!(matches!(
        LeoNetworkBuilder::new(spec, 5).unwrap_err(),
        ConfigError::PlaneGridMismatch { .. }
    ));
}

#[test]
fn too_many_ground_stations() {
    let err = LeoNetworkBuilder::new(ConstellationSpec::globalstar(), 16).unwrap_err();
    assert_eq!(
        err,
        ConfigError::TooManyGroundStations {
            requested: 16,
            available: GROUND_STATION_SITES.len(),
        }
    );
}

#[test]
fn timeline_covers_the_duration() {
    let builder = LeoNetworkBuilder::new(ConstellationSpec::globalstar(), 3).unwrap();
    let timeline = builder.build_timeline(300.0, 60.0).unwrap();
    assert_eq!(timeline.len(), 5);
    assert_relative_eq!(timeline.total_duration_s(), 300.0);
    // the topology actually changes between snapshots
    let first = timeline.snapshot_at(0.0).unwrap();
    let last = timeline.snapshot_at(299.0).unwrap();
    let p0 = first.topology().node(&NodeId::from("S_0_0")).unwrap();
    let p4 = last.topology().node(&NodeId::from("S_0_0")).unwrap();
    assert!(p0.position().distance_to(p4.position()) > 1.0);
}
