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

//! LDMR: Link-Disjoint Multipath Routing.
//!
//! For every demand, LDMR computes up to K pairwise link-disjoint paths. The first path is the
//! delay-optimal one; each further path is found by removing all previously used links on a
//! clone of the topology and re-drawing every remaining link's weight at random, where links
//! that already carry many paths draw from a higher range. This spreads the aggregate load over
//! the mesh instead of piling every backup path onto the same few low-delay links.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::RoutingAlgorithm;
use crate::pathfinding::shortest_path;
use crate::topology::Topology;
use crate::types::{
    ConfigError, LinkKey, LinkWeight, MultiPathResult, NodeId, Path, TrafficDemand, WeightKind,
};

/// Configuration of the LDMR algorithm.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct LdmrConfig {
    /// Target number of link-disjoint paths per demand.
    pub k: usize,
    /// Lower bound of the randomized weight range for rarely used links.
    pub r1: u32,
    /// Upper bound for rarely used links, and lower bound for heavily used ones.
    pub r2: u32,
    /// Upper bound of the randomized weight range for heavily used links.
    pub r3: u32,
    /// Usage count at which a link switches from the `[r1, r2]` range to the `[r2, r3]` range.
    pub ne_th: u32,
    /// Upper bound on the number of backup-path searches per demand.
    pub max_iterations: usize,
    /// Whether to track the execution statistics in [`LdmrStats`].
    pub enable_statistics: bool,
    /// Seed for the weight randomization. Runs with the same seed and the same inputs produce
    /// identical results; without a seed the algorithm is correct but not reproducible.
    pub seed: Option<u64>,
}

impl Default for LdmrConfig {
    fn default() -> Self {
        Self {
            k: 2,
            r1: 1,
            r2: 10,
            r3: 50,
            ne_th: 2,
            max_iterations: 10,
            enable_statistics: true,
            seed: None,
        }
    }
}

impl LdmrConfig {
    /// Check the parameter constraints (`K ≥ 1`, `0 < r1 < r2 < r3`, `max_iterations ≥ 1`).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.k < 1 {
            return Err(ConfigError::InvalidPathCount(self.k));
        }
        if self.r1 == 0 || self.r1 >= self.r2 || self.r2 >= self.r3 {
            return Err(ConfigError::InvalidWeightBounds {
                r1: self.r1,
                r2: self.r2,
                r3: self.r3,
            });
        }
        if self.max_iterations < 1 {
            return Err(ConfigError::InvalidIterationBound);
        }
        Ok(())
    }

    /// Preset with small weight ranges and a low usage threshold, for quick tests.
    pub fn testing() -> Self {
        Self {
            r2: 5,
            r3: 20,
            ne_th: 1,
            ..Self::default()
        }
    }

    /// Preset for lightly loaded networks.
    pub fn light_load() -> Self {
        Self {
            r3: 30,
            ..Self::default()
        }
    }

    /// Preset for heavily loaded networks: larger penalty range and a higher usage threshold.
    pub fn heavy_load() -> Self {
        Self {
            ne_th: 3,
            ..Self::default()
        }
    }

    /// Preset trading computation time for a third disjoint path per demand.
    pub fn high_reliability() -> Self {
        Self {
            k: 3,
            r2: 15,
            r3: 60,
            ..Self::default()
        }
    }

    /// Set the randomization seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Execution statistics of a single LDMR run.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct LdmrStats {
    /// Wall-clock duration of the whole run.
    pub total_time: Duration,
    /// Number of shortest-path computations.
    pub path_calculations: usize,
    /// Number of individual link-weight draws.
    pub weight_updates: usize,
    /// Number of link removals performed on scratch topologies.
    pub link_removals: usize,
}

/// The LDMR algorithm instance. Owns the per-run usage counters and the execution statistics;
/// both are reset at the beginning of every [`Ldmr::run`].
#[derive(Clone, Debug)]
pub struct Ldmr {
    config: LdmrConfig,
    usage: HashMap<LinkKey, u32>,
    stats: LdmrStats,
}

impl Ldmr {
    /// Create a new instance with a validated configuration.
    pub fn new(config: LdmrConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            usage: HashMap::new(),
            stats: LdmrStats::default(),
        })
    }

    /// The configuration of this instance.
    pub fn config(&self) -> &LdmrConfig {
        &self.config
    }

    /// How often the link between `a` and `b` was incorporated into an accepted path during the
    /// last run.
    pub fn usage_count(&self, a: impl Into<NodeId>, b: impl Into<NodeId>) -> u32 {
        self.usage
            .get(&LinkKey::new(a, b))
            .copied()
            .unwrap_or_default()
    }

    /// The full usage-counter map of the last run.
    pub fn usage_counts(&self) -> &HashMap<LinkKey, u32> {
        &self.usage
    }

    /// The execution statistics of the last run.
    pub fn stats(&self) -> &LdmrStats {
        &self.stats
    }

    /// Run the algorithm: seed every distinct node pair with its delay-optimal path, then
    /// process the demands in order of descending bandwidth (elephants first), computing up to
    /// K−1 additional link-disjoint paths per demand. Returns one result per demand, in
    /// processing order.
    pub fn run(&mut self, topology: &Topology, demands: &[TrafficDemand]) -> Vec<MultiPathResult> {
        let run_start = Instant::now();
        self.usage.clear();
        self.stats = LdmrStats::default();
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        log::debug!(
            "Running LDMR (K={}, Ne_th={}, r=[{}, {}, {}]) on {} demands",
            self.config.k,
            self.config.ne_th,
            self.config.r1,
            self.config.r2,
            self.config.r3,
            demands.len()
        );

        // the run operates on its own copy, with every weight reset to the link delay
        let mut base = topology.clone();
        base.reset_weights_to_delay();

        let seeds = self.seed_paths(&base, demands);
        log::debug!("Phase 1 done: {} seed paths", seeds.len());

        let mut order: Vec<&TrafficDemand> = demands.iter().collect();
        order.sort_by(|a, b| {
            b.bandwidth_mbps
                .partial_cmp(&a.bandwidth_mbps)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut results = Vec::with_capacity(order.len());
        for demand in order {
            let result = self.multipath_for_demand(&base, demand, &seeds, &mut rng);
            log::trace!("{}", result);
            results.push(result);
        }

        if self.config.enable_statistics {
            self.stats.total_time = run_start.elapsed();
        }
        log::debug!(
            "LDMR done: {}/{} demands routed",
            results.iter().filter(|r| r.success).count(),
            results.len()
        );
        results
    }

    /// Phase 1: compute the delay-optimal path for every distinct (source, destination) pair
    /// appearing in the demands, counting link usage once per seed path. Pairs are visited in
    /// the order of their first appearance.
    fn seed_paths(
        &mut self,
        topology: &Topology,
        demands: &[TrafficDemand],
    ) -> HashMap<(NodeId, NodeId), Path> {
        let mut seeds: HashMap<(NodeId, NodeId), Path> = HashMap::new();
        let mut seen: HashSet<(NodeId, NodeId)> = HashSet::new();
        for demand in demands {
            let pair = (demand.source.clone(), demand.destination.clone());
            if !seen.insert(pair.clone()) {
                continue;
            }
            self.count_path_calculation();
            if let Some(path) = shortest_path(
                topology,
                &demand.source,
                &demand.destination,
                WeightKind::Delay,
                &HashSet::new(),
            ) {
                self.record_usage(&path);
                seeds.insert(pair, path);
            }
        }
        seeds
    }

    /// Phase 2, single demand: adopt the seed path, then search backup paths on clones with all
    /// previously used links removed and the remaining weights re-drawn.
    fn multipath_for_demand(
        &mut self,
        base: &Topology,
        demand: &TrafficDemand,
        seeds: &HashMap<(NodeId, NodeId), Path>,
        rng: &mut StdRng,
    ) -> MultiPathResult {
        let start = Instant::now();
        let (source, destination) = (&demand.source, &demand.destination);

        if !base.contains_node(source) || !base.contains_node(destination) {
            return MultiPathResult::failure(demand, start.elapsed());
        }

        let pair = (source.clone(), destination.clone());
        let mut paths = match seeds.get(&pair) {
            Some(seed) => vec![seed.clone()],
            None => {
                // no pre-computed seed for this pair means Phase 1 failed to find one
                self.count_path_calculation();
                match shortest_path(base, source, destination, WeightKind::Delay, &HashSet::new())
                {
                    Some(path) => {
                        self.record_usage(&path);
                        vec![path]
                    }
                    None => return MultiPathResult::failure(demand, start.elapsed()),
                }
            }
        };

        let backups = (self.config.k - 1).min(self.config.max_iterations);
        for _ in 0..backups {
            let excluded: HashSet<LinkKey> = paths
                .iter()
                .flat_map(|p| p.links.iter().cloned())
                .collect();
            match self.backup_path(base, source, destination, &excluded, rng) {
                Some(path) => {
                    self.record_usage(&path);
                    paths.push(path);
                }
                None => break,
            }
        }

        MultiPathResult {
            source: source.clone(),
            destination: destination.clone(),
            paths,
            demand: demand.clone(),
            success: true,
            computation_time: start.elapsed(),
        }
    }

    /// Search one backup path: remove all excluded links on a scratch clone, re-draw every
    /// remaining weight, and run a weight-based shortest path.
    fn backup_path(
        &mut self,
        base: &Topology,
        source: &NodeId,
        destination: &NodeId,
        excluded: &HashSet<LinkKey>,
        rng: &mut StdRng,
    ) -> Option<Path> {
        let mut scratch = base.clone();
        for key in excluded {
            scratch.remove_link(key.end1().clone(), key.end2().clone());
            if self.config.enable_statistics {
                self.stats.link_removals += 1;
            }
        }
        self.randomize_weights(&mut scratch, rng);
        self.count_path_calculation();
        shortest_path(
            &scratch,
            source,
            destination,
            WeightKind::Weight,
            &HashSet::new(),
        )
    }

    /// Draw a fresh integer weight for every link of `topology`: uniformly from `[r1, r2]` while
    /// the link's usage count is below `Ne_th`, from `[r2, r3]` once it reached it. Iteration
    /// over the links is in canonical key order, so a fixed seed yields identical draws.
    fn randomize_weights(&mut self, topology: &mut Topology, rng: &mut StdRng) {
        let mut updates: HashMap<LinkKey, LinkWeight> = HashMap::new();
        for link in topology.links() {
            let usage = self.usage.get(link.key()).copied().unwrap_or_default();
            let weight = if usage < self.config.ne_th {
                rng.gen_range(self.config.r1..=self.config.r2)
            } else {
                rng.gen_range(self.config.r2..=self.config.r3)
            };
            updates.insert(link.key().clone(), weight as LinkWeight);
        }
        if self.config.enable_statistics {
            self.stats.weight_updates += updates.len();
        }
        topology.update_link_weights(&updates);
    }

    /// Count every link of an adopted path.
    fn record_usage(&mut self, path: &Path) {
        for key in &path.links {
            *self.usage.entry(key.clone()).or_insert(0) += 1;
        }
    }

    fn count_path_calculation(&mut self) {
        if self.config.enable_statistics {
            self.stats.path_calculations += 1;
        }
    }
}

impl RoutingAlgorithm for Ldmr {
    fn name(&self) -> &'static str {
        "LDMR"
    }

    fn route(&mut self, topology: &Topology, demands: &[TrafficDemand]) -> Vec<MultiPathResult> {
        self.run(topology, demands)
    }
}
