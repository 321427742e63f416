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

//! The SPF baseline: a single shortest path per demand.

use std::collections::HashSet;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::RoutingAlgorithm;
use crate::pathfinding::shortest_path;
use crate::topology::Topology;
use crate::types::{MultiPathResult, TrafficDemand, WeightKind};

/// Configuration of the SPF baseline.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct SpfConfig {
    /// The edge cost to minimize (delay by default).
    pub weight_kind: WeightKind,
}

/// Shortest Path First: routes every demand over the single cheapest path under the configured
/// weight kind. Fast, but concentrates load on the low-delay links.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Spf {
    config: SpfConfig,
}

impl Spf {
    /// Create a new SPF instance.
    pub fn new(config: SpfConfig) -> Self {
        Self { config }
    }

    /// The configuration of this instance.
    pub fn config(&self) -> &SpfConfig {
        &self.config
    }
}

impl RoutingAlgorithm for Spf {
    fn name(&self) -> &'static str {
        "SPF"
    }

    fn route(&mut self, topology: &Topology, demands: &[TrafficDemand]) -> Vec<MultiPathResult> {
        log::debug!("Running SPF on {} demands", demands.len());
        demands
            .iter()
            .map(|demand| {
                let start = Instant::now();
                match shortest_path(
                    topology,
                    &demand.source,
                    &demand.destination,
                    self.config.weight_kind,
                    &HashSet::new(),
                ) {
                    Some(path) => MultiPathResult {
                        source: demand.source.clone(),
                        destination: demand.destination.clone(),
                        paths: vec![path],
                        demand: demand.clone(),
                        success: true,
                        computation_time: start.elapsed(),
                    },
                    None => MultiPathResult::failure(demand, start.elapsed()),
                }
            })
            .collect()
    }
}
