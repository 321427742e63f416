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

//! The ECMP baseline: all paths whose cost is within a tolerance of the optimum.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::RoutingAlgorithm;
use crate::pathfinding::{k_shortest_paths, path_cost};
use crate::topology::Topology;
use crate::types::{ConfigError, MultiPathResult, TrafficDemand, WeightKind};

/// Configuration of the ECMP baseline.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct EcmpConfig {
    /// The edge cost to minimize (delay by default).
    pub weight_kind: WeightKind,
    /// Number of candidate paths to enumerate per demand.
    pub max_paths: usize,
    /// Relative cost tolerance: a candidate is accepted iff its cost is at most
    /// `min_cost * (1 + tolerance)`.
    pub tolerance: f64,
}

impl Default for EcmpConfig {
    fn default() -> Self {
        Self {
            weight_kind: WeightKind::default(),
            max_paths: 4,
            tolerance: 0.1,
        }
    }
}

impl EcmpConfig {
    /// Check the parameter constraints (`max_paths ≥ 1`, `tolerance ≥ 0`).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_paths < 1 {
            return Err(ConfigError::InvalidPathCount(self.max_paths));
        }
        if !(self.tolerance >= 0.0) {
            return Err(ConfigError::InvalidTolerance(self.tolerance));
        }
        Ok(())
    }
}

/// Equal-Cost Multipath: enumerates up to `max_paths` shortest paths per demand and keeps those
/// within the cost tolerance of the cheapest one. Balances load better than SPF, but the
/// accepted paths may share links.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Ecmp {
    config: EcmpConfig,
}

impl Ecmp {
    /// Create a new ECMP instance with a validated configuration.
    pub fn new(config: EcmpConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration of this instance.
    pub fn config(&self) -> &EcmpConfig {
        &self.config
    }
}

impl RoutingAlgorithm for Ecmp {
    fn name(&self) -> &'static str {
        "ECMP"
    }

    fn route(&mut self, topology: &Topology, demands: &[TrafficDemand]) -> Vec<MultiPathResult> {
        log::debug!("Running ECMP on {} demands", demands.len());
        demands
            .iter()
            .map(|demand| {
                let start = Instant::now();
                let candidates = k_shortest_paths(
                    topology,
                    &demand.source,
                    &demand.destination,
                    self.config.max_paths,
                    self.config.weight_kind,
                );
                if candidates.is_empty() {
                    return MultiPathResult::failure(demand, start.elapsed());
                }
                let costs: Vec<f64> = candidates
                    .iter()
                    .map(|p| path_cost(topology, p, self.config.weight_kind))
                    .collect();
                let min_cost = costs.iter().copied().fold(f64::INFINITY, f64::min);
                let threshold = min_cost * (1.0 + self.config.tolerance);
                let paths: Vec<_> = candidates
                    .into_iter()
                    .zip(costs)
                    .filter(|(_, cost)| *cost <= threshold)
                    .map(|(path, _)| path)
                    .collect();
                MultiPathResult {
                    source: demand.source.clone(),
                    destination: demand.destination.clone(),
                    paths,
                    demand: demand.clone(),
                    success: true,
                    computation_time: start.elapsed(),
                }
            })
            .collect()
    }
}
