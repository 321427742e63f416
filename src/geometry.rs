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

//! Basic 3-D geometry in an Earth-centered inertial frame. All distances are in kilometers, all
//! propagation delays in milliseconds.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in km.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Standard gravitational parameter of the Earth, in km³/s².
pub const GRAVITATIONAL_PARAMETER: f64 = 398_600.4418;

/// Speed of light in km/ms.
pub const SPEED_OF_LIGHT_KM_PER_MS: f64 = 299_792.458;

/// A position in a Cartesian, Earth-centered inertial frame (km).
#[derive(Clone, Copy, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct Position {
    /// x coordinate in km.
    pub x: f64,
    /// y coordinate in km.
    pub y: f64,
    /// z coordinate in km (towards the north pole).
    pub z: f64,
}

impl Position {
    /// Create a new position from its coordinates.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Convert geodetic coordinates (degrees) into the Cartesian frame, using a spherical Earth
    /// of radius [`EARTH_RADIUS_KM`].
    pub fn from_lat_lon(lat_deg: f64, lon_deg: f64, altitude_km: f64) -> Self {
        let r = EARTH_RADIUS_KM + altitude_km;
        let lat = lat_deg.to_radians();
        let lon = lon_deg.to_radians();
        Self {
            x: r * lat.cos() * lon.cos(),
            y: r * lat.cos() * lon.sin(),
            z: r * lat.sin(),
        }
    }

    /// Euclidean distance to another position, in km.
    pub fn distance_to(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Euclidean norm of the position vector (distance from the Earth center), in km.
    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// Propagation delay over a free-space distance, in milliseconds.
pub fn propagation_delay_ms(distance_km: f64) -> f64 {
    distance_km / SPEED_OF_LIGHT_KM_PER_MS
}

/// Elevation angle (radians) of a satellite as seen from a ground station. This is `π/2` minus
/// the angle between the local zenith direction at the ground station and the line of sight to
/// the satellite. A satellite below the horizon yields a negative elevation.
pub fn elevation_angle(ground: &Position, satellite: &Position) -> f64 {
    let to_sat = (
        satellite.x - ground.x,
        satellite.y - ground.y,
        satellite.z - ground.z,
    );
    let up = (ground.x, ground.y, ground.z);
    let dot = to_sat.0 * up.0 + to_sat.1 * up.1 + to_sat.2 * up.2;
    let norms = (to_sat.0 * to_sat.0 + to_sat.1 * to_sat.1 + to_sat.2 * to_sat.2).sqrt()
        * (up.0 * up.0 + up.1 * up.1 + up.2 * up.2).sqrt();
    if norms == 0.0 {
        return 0.0;
    }
    let cos_angle = (dot / norms).clamp(-1.0, 1.0);
    std::f64::consts::FRAC_PI_2 - cos_angle.acos()
}
