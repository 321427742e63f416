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

#![deny(missing_docs, missing_debug_implementations)]

//! # LeoSim
//!
//! This is a library for computing link-disjoint multipath routes over time-varying LEO
//! satellite networks.
//!
//! ## Main Concepts
//!
//! The [`topology::Topology`] is the main datastructure to operate on. It holds satellite and
//! ground-station nodes (see [`topology::Node`]) connected by undirected links with physical
//! propagation delays. Adjacency is mirrored on a
//! [Petgraph](https://docs.rs/petgraph/latest/petgraph/index.html) graph for connectivity
//! analysis. Topologies are generated by the [`constellation::LeoNetworkBuilder`] from a
//! [`constellation::ConstellationSpec`] (GlobalStar or Iridium presets) at a given simulation
//! time; the [`timeline::Timeline`] freezes the network at fixed time steps.
//!
//! Routing happens per [`types::TrafficDemand`] and always produces one
//! [`types::MultiPathResult`] per demand. The central algorithm is [`algorithms::Ldmr`], which
//! returns up to K pairwise link-disjoint paths per demand and spreads load via usage-driven
//! weight randomization. [`algorithms::Spf`] and [`algorithms::Ecmp`] are the single-path and
//! equal-cost baselines. All of them run on the same shortest-path kernel in [`pathfinding`].
//! The [`report`] module aggregates results into per-algorithm metric bundles.
//!
//! ## Example usage
//!
//! The following example builds a GlobalStar topology with 10 ground stations, routes two
//! demands with LDMR, and audits the result:
//!
//! ```
//! use leosim::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let builder = LeoNetworkBuilder::new(ConstellationSpec::globalstar(), 10)?;
//!     let topology = builder.build_at(0.0)?;
//!     assert!(topology.statistics().is_connected);
//!
//!     let demands = vec![
//!         TrafficDemand::new("GS_0", "GS_1", 100.0),
//!         TrafficDemand::new("GS_2", "GS_3", 20.0),
//!     ];
//!
//!     let mut ldmr = Ldmr::new(LdmrConfig::default().with_seed(42))?;
//!     let results = ldmr.run(&topology, &demands);
//!     assert!(results.iter().all(|r| r.success));
//!
//!     let report = summarize_with_usage("LDMR", &results, ldmr.usage_counts());
//!     assert_eq!(report.disjointness.violations, 0);
//!     Ok(())
//! }
//! ```

pub mod algorithms;
pub mod constellation;
pub mod geometry;
pub mod pathfinding;
pub mod prelude;
pub mod report;
pub mod timeline;
pub mod topology;
pub mod types;

#[cfg(test)]
mod test;
