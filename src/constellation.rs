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

//! Construction of LEO satellite network topologies: Walker-style constellations on circular
//! orbits, inter-satellite links, and ground stations with uplinks to visible satellites.

use std::f64::consts::TAU;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::geometry::{
    elevation_angle, propagation_delay_ms, Position, EARTH_RADIUS_KM, GRAVITATIONAL_PARAMETER,
};
use crate::timeline::Timeline;
use crate::topology::{Link, Node, NodeInfo, NodeKind, Topology};
use crate::types::{ConfigError, NetworkError, NodeId};

/// Maximum length of an inter-satellite link, in km.
pub const ISL_MAX_RANGE_KM: f64 = 8_000.0;

/// Maximum length of a ground-to-satellite uplink, in km.
pub const UPLINK_MAX_RANGE_KM: f64 = 5_000.0;

/// Minimum elevation (radians) under which a satellite counts as visible from a ground station.
pub const MIN_ELEVATION_RAD: f64 = 0.0;

/// Number of uplinks each ground station establishes (to its nearest visible satellites).
pub const UPLINKS_PER_GROUND_STATION: usize = 2;

/// Default capacity of an inter-satellite link, in Gbps.
pub const DEFAULT_ISL_BANDWIDTH_GBPS: f64 = 10.0;

/// Default capacity of a ground-to-satellite uplink, in Gbps.
pub const DEFAULT_UPLINK_BANDWIDTH_GBPS: f64 = 5.0;

/// Parameters of a Walker-style constellation: satellites evenly spread over `num_planes`
/// circular orbital planes with `sats_per_plane` satellites each.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct ConstellationSpec {
    /// Human-readable name of the constellation.
    pub name: String,
    /// Total number of satellites (`num_planes * sats_per_plane`).
    pub num_satellites: usize,
    /// Orbital altitude above the Earth surface, in km.
    pub altitude_km: f64,
    /// Orbital inclination in degrees.
    pub inclination_deg: f64,
    /// Number of orbital planes.
    pub num_planes: usize,
    /// Number of satellites per plane.
    pub sats_per_plane: usize,
    /// Whether to create links between ring neighbors within a plane.
    pub intra_plane_links: bool,
    /// Whether to create links between same-slot satellites of adjacent planes.
    pub inter_plane_links: bool,
}

impl ConstellationSpec {
    /// The GlobalStar constellation: 48 satellites at 1400 km altitude and 55° inclination,
    /// spread over 8 planes of 6 satellites.
    pub fn globalstar() -> Self {
        Self {
            name: "GlobalStar".to_string(),
            num_satellites: 48,
            altitude_km: 1400.0,
            inclination_deg: 55.0,
            num_planes: 8,
            sats_per_plane: 6,
            intra_plane_links: true,
            inter_plane_links: true,
        }
    }

    /// The Iridium constellation: 66 satellites at 780 km altitude on polar orbits, spread over
    /// 6 planes of 11 satellites.
    pub fn iridium() -> Self {
        Self {
            name: "Iridium".to_string(),
            num_satellites: 66,
            altitude_km: 780.0,
            inclination_deg: 90.0,
            num_planes: 6,
            sats_per_plane: 11,
            intra_plane_links: true,
            inter_plane_links: true,
        }
    }

    /// Look up a preset by name (case-insensitive).
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        match name.to_ascii_lowercase().as_str() {
            "globalstar" => Ok(Self::globalstar()),
            "iridium" => Ok(Self::iridium()),
            _ => Err(ConfigError::UnknownConstellation(name.to_string())),
        }
    }

    /// Check that the plane grid is consistent with the declared satellite count.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_planes * self.sats_per_plane != self.num_satellites {
            return Err(ConfigError::PlaneGridMismatch {
                name: self.name.clone(),
                num_planes: self.num_planes,
                sats_per_plane: self.sats_per_plane,
                num_satellites: self.num_satellites,
            });
        }
        Ok(())
    }

    /// Radius of the (circular) orbit, in km.
    pub fn orbital_radius_km(&self) -> f64 {
        EARTH_RADIUS_KM + self.altitude_km
    }

    /// Orbital period in seconds, from Kepler's third law.
    pub fn orbital_period_s(&self) -> f64 {
        let r = self.orbital_radius_km();
        TAU * (r * r * r / GRAVITATIONAL_PARAMETER).sqrt()
    }

    /// Position of the satellite in plane `plane`, slot `slot`, at simulation time `t_s`.
    ///
    /// Each plane's ascending node is rotated by `2π·plane/num_planes`, and the satellite's
    /// anomaly advances by `2π·t/T` from its initial phase of `2π·slot/sats_per_plane`.
    pub fn satellite_position(&self, plane: usize, slot: usize, t_s: f64) -> Position {
        let r = self.orbital_radius_km();
        let raan = TAU * plane as f64 / self.num_planes as f64;
        let theta =
            TAU * slot as f64 / self.sats_per_plane as f64 + TAU * t_s / self.orbital_period_s();
        let inc = self.inclination_deg.to_radians();
        Position {
            x: r * (theta.cos() * raan.cos() - theta.sin() * raan.sin() * inc.cos()),
            y: r * (theta.cos() * raan.sin() + theta.sin() * raan.cos() * inc.cos()),
            z: r * theta.sin() * inc.sin(),
        }
    }
}

/// A candidate site for a ground station.
#[derive(Clone, Copy, PartialEq, Debug, Serialize)]
pub struct GroundStationSite {
    /// City name of the site.
    pub name: &'static str,
    /// Geodetic latitude in degrees.
    pub latitude: f64,
    /// Geodetic longitude in degrees.
    pub longitude: f64,
}

lazy_static! {
    /// The table of candidate ground-station sites (major cities). Builders select the first `N`
    /// entries.
    pub static ref GROUND_STATION_SITES: Vec<GroundStationSite> = vec![
        GroundStationSite { name: "Beijing", latitude: 39.9042, longitude: 116.4074 },
        GroundStationSite { name: "New_York", latitude: 40.7128, longitude: -74.0060 },
        GroundStationSite { name: "London", latitude: 51.5074, longitude: -0.1278 },
        GroundStationSite { name: "Tokyo", latitude: 35.6762, longitude: 139.6503 },
        GroundStationSite { name: "Sydney", latitude: -33.8688, longitude: 151.2093 },
        GroundStationSite { name: "Moscow", latitude: 55.7558, longitude: 37.6173 },
        GroundStationSite { name: "Cairo", latitude: 30.0444, longitude: 31.2357 },
        GroundStationSite { name: "Sao_Paulo", latitude: -23.5505, longitude: -46.6333 },
        GroundStationSite { name: "Mumbai", latitude: 19.0760, longitude: 72.8777 },
        GroundStationSite { name: "Lagos", latitude: 6.5244, longitude: 3.3792 },
        GroundStationSite { name: "Berlin", latitude: 52.5200, longitude: 13.4050 },
        GroundStationSite { name: "Toronto", latitude: 43.6532, longitude: -79.3832 },
        GroundStationSite { name: "Dubai", latitude: 25.2048, longitude: 55.2708 },
        GroundStationSite { name: "Singapore", latitude: 1.3521, longitude: 103.8198 },
        GroundStationSite { name: "Mexico_City", latitude: 19.4326, longitude: -99.1332 },
    ];
}

/// Builder assembling a complete LEO network topology (satellites, inter-satellite links, ground
/// stations and uplinks) at a given simulation time.
///
/// ```
/// use leosim::constellation::{ConstellationSpec, LeoNetworkBuilder};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let builder = LeoNetworkBuilder::new(ConstellationSpec::globalstar(), 10)?;
/// let topology = builder.build_at(0.0)?;
/// assert_eq!(topology.statistics().satellites, 48);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct LeoNetworkBuilder {
    spec: ConstellationSpec,
    num_ground_stations: usize,
    isl_bandwidth_gbps: f64,
    uplink_bandwidth_gbps: f64,
}

impl LeoNetworkBuilder {
    /// Create a builder for the given constellation with `num_ground_stations` ground stations
    /// (selected from the start of [`struct@GROUND_STATION_SITES`]).
    pub fn new(spec: ConstellationSpec, num_ground_stations: usize) -> Result<Self, ConfigError> {
        spec.validate()?;
        if num_ground_stations > GROUND_STATION_SITES.len() {
            return Err(ConfigError::TooManyGroundStations {
                requested: num_ground_stations,
                available: GROUND_STATION_SITES.len(),
            });
        }
        Ok(Self {
            spec,
            num_ground_stations,
            isl_bandwidth_gbps: DEFAULT_ISL_BANDWIDTH_GBPS,
            uplink_bandwidth_gbps: DEFAULT_UPLINK_BANDWIDTH_GBPS,
        })
    }

    /// Create a builder from a constellation preset name.
    pub fn from_name(name: &str, num_ground_stations: usize) -> Result<Self, ConfigError> {
        Self::new(ConstellationSpec::from_name(name)?, num_ground_stations)
    }

    /// The constellation spec this builder uses.
    pub fn spec(&self) -> &ConstellationSpec {
        &self.spec
    }

    /// Set the capacity of inter-satellite links, in Gbps.
    pub fn isl_bandwidth(mut self, bandwidth_gbps: f64) -> Self {
        self.isl_bandwidth_gbps = bandwidth_gbps;
        self
    }

    /// Set the capacity of ground-to-satellite uplinks, in Gbps.
    pub fn uplink_bandwidth(mut self, bandwidth_gbps: f64) -> Self {
        self.uplink_bandwidth_gbps = bandwidth_gbps;
        self
    }

    /// Build the topology at simulation time `t_s`: all satellites at their orbital positions,
    /// inter-satellite links according to the [`ConstellationSpec`], and every ground station
    /// linked to its
    /// nearest visible satellites. All link delays are the physical propagation delays.
    pub fn build_at(&self, t_s: f64) -> Result<Topology, NetworkError> {
        let mut topology = Topology::new();

        let satellites = self.satellite_nodes(t_s);
        for sat in &satellites {
            topology.add_node(sat.clone());
        }
        self.add_inter_satellite_links(&mut topology, &satellites)?;

        for (index, site) in GROUND_STATION_SITES[..self.num_ground_stations]
            .iter()
            .enumerate()
        {
            let position = Position::from_lat_lon(site.latitude, site.longitude, 0.0);
            topology.add_node(Node::ground_station(
                index,
                site.name,
                site.latitude,
                site.longitude,
                position,
            ));
        }
        self.add_uplinks(&mut topology, &satellites)?;

        log::debug!(
            "Built {} topology at t={}s: {}",
            self.spec.name,
            t_s,
            topology
        );
        Ok(topology)
    }

    /// Build a time series of topologies covering `[0, duration_s)` in steps of `step_s`
    /// seconds. Every snapshot owns an independent topology.
    pub fn build_timeline(&self, duration_s: f64, step_s: f64) -> Result<Timeline, NetworkError> {
        let mut timeline = Timeline::new(step_s);
        let mut t = 0.0;
        while t < duration_s {
            timeline.push_at(self.build_at(t)?, t);
            t += step_s;
        }
        Ok(timeline)
    }

    fn satellite_nodes(&self, t_s: f64) -> Vec<Node> {
        let mut satellites = Vec::with_capacity(self.spec.num_satellites);
        for plane in 0..self.spec.num_planes {
            for slot in 0..self.spec.sats_per_plane {
                let position = self.spec.satellite_position(plane, slot, t_s);
                satellites.push(Node::satellite(plane, slot, position));
            }
        }
        satellites
    }

    /// Whether two satellites should be connected: within ISL range, and either ring neighbors
    /// in the same plane, or same-slot satellites in adjacent planes.
    fn should_create_isl(&self, a: &Node, b: &Node, distance_km: f64) -> bool {
        if distance_km > ISL_MAX_RANGE_KM {
            return false;
        }
        let ((pa, sa), (pb, sb)) = match (satellite_indices(a), satellite_indices(b)) {
            (Some(x), Some(y)) => (x, y),
            _ => return false,
        };
        if pa == pb {
            let gap = sa.abs_diff(sb);
            (gap == 1 || gap == self.spec.sats_per_plane - 1) && self.spec.intra_plane_links
        } else {
            let plane_gap = pa.abs_diff(pb);
            (plane_gap == 1 || plane_gap == self.spec.num_planes - 1)
                && sa == sb
                && self.spec.inter_plane_links
        }
    }

    fn add_inter_satellite_links(
        &self,
        topology: &mut Topology,
        satellites: &[Node],
    ) -> Result<(), NetworkError> {
        for (i, a) in satellites.iter().enumerate() {
            for b in &satellites[i + 1..] {
                let distance = a.position().distance_to(b.position());
                if self.should_create_isl(a, b, distance) {
                    topology.add_link(Link::new(
                        a.id().clone(),
                        b.id().clone(),
                        self.isl_bandwidth_gbps,
                        propagation_delay_ms(distance),
                    ))?;
                }
            }
        }
        Ok(())
    }

    fn add_uplinks(&self, topology: &mut Topology, satellites: &[Node]) -> Result<(), NetworkError> {
        let stations: Vec<Node> = topology
            .nodes()
            .filter(|n| n.kind() == NodeKind::GroundStation)
            .cloned()
            .collect();
        for gs in stations {
            let mut visible = self.visible_satellites(&gs, satellites);
            visible.truncate(UPLINKS_PER_GROUND_STATION);
            for (sat_id, distance) in visible {
                topology.add_link(Link::new(
                    gs.id().clone(),
                    sat_id,
                    self.uplink_bandwidth_gbps,
                    propagation_delay_ms(distance),
                ))?;
            }
        }
        Ok(())
    }

    /// All satellites visible from `gs` (within uplink range and above the minimum elevation),
    /// sorted by distance. Ties are broken by satellite id to keep the order deterministic.
    fn visible_satellites(&self, gs: &Node, satellites: &[Node]) -> Vec<(NodeId, f64)> {
        let mut visible: Vec<(NodeId, f64)> = satellites
            .iter()
            .filter_map(|sat| {
                let distance = gs.position().distance_to(sat.position());
                let elevation = elevation_angle(gs.position(), sat.position());
                (distance <= UPLINK_MAX_RANGE_KM && elevation >= MIN_ELEVATION_RAD)
                    .then(|| (sat.id().clone(), distance))
            })
            .collect();
        visible.sort_by(|(ida, da), (idb, db)| {
            da.partial_cmp(db)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| ida.cmp(idb))
        });
        visible
    }
}

/// Plane and slot index of a satellite node, or `None` for ground stations.
fn satellite_indices(node: &Node) -> Option<(usize, usize)> {
    match node.info() {
        NodeInfo::Satellite { plane, slot } => Some((*plane, *slot)),
        NodeInfo::GroundStation { .. } => None,
    }
}
