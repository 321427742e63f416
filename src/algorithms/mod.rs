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

//! The routing algorithms: LDMR (the usage-driven link-disjoint multipath algorithm) and the
//! SPF / ECMP baselines it is compared against. All algorithms consume the topology read-only
//! (mutations happen on clones) and report per-demand failures as data, never as errors.

pub mod ecmp;
pub mod ldmr;
pub mod spf;

pub use ecmp::{Ecmp, EcmpConfig};
pub use ldmr::{Ldmr, LdmrConfig, LdmrStats};
pub use spf::{Spf, SpfConfig};

use crate::topology::Topology;
use crate::types::{MultiPathResult, TrafficDemand};

/// Common interface of all routing algorithms, so that the reporting layer can treat them
/// uniformly. An implementation computes one [`MultiPathResult`] per demand; a demand that
/// cannot be routed yields a result with `success = false` rather than an error.
pub trait RoutingAlgorithm {
    /// The name of the algorithm, used to key the report bundle.
    fn name(&self) -> &'static str;

    /// Route all demands over the given topology and return one result per demand.
    fn route(&mut self, topology: &Topology, demands: &[TrafficDemand]) -> Vec<MultiPathResult>;
}
