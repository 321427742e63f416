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

//! Module containing all type definitions shared across the crate.

use std::time::Duration;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Routing weight of a link.
pub type LinkWeight = f64;

/// Bandwidth above which a demand is treated as an elephant flow (in Mbps).
pub const ELEPHANT_THRESHOLD_MBPS: f64 = 50.0;

/// Identifier of a node in the topology. Satellites are named `S_<plane>_<slot>`, and ground
/// stations are named `GS_<index>`. The identifier is the identity of the node: two nodes with the
/// same id are the same node, and links order their endpoints lexicographically by id.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(String);

impl NodeId {
    /// Create a new node id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Debug for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(x: &str) -> Self {
        Self(x.to_string())
    }
}

impl From<String> for NodeId {
    fn from(x: String) -> Self {
        Self(x)
    }
}

impl From<&NodeId> for NodeId {
    fn from(x: &NodeId) -> Self {
        x.clone()
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Canonical key of an undirected link. The two endpoints are stored in lexicographic order, such
/// that the key for `(a, b)` and `(b, a)` compare (and hash) equal. This is the only place where
/// canonicalization happens; every map keyed by links uses this type.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LinkKey {
    a: NodeId,
    b: NodeId,
}

impl LinkKey {
    /// Create the canonical key for the link between `x` and `y`, independent of argument order.
    pub fn new(x: impl Into<NodeId>, y: impl Into<NodeId>) -> Self {
        let (x, y) = (x.into(), y.into());
        if x <= y {
            Self { a: x, b: y }
        } else {
            Self { a: y, b: x }
        }
    }

    /// The lexicographically smaller endpoint.
    pub fn end1(&self) -> &NodeId {
        &self.a
    }

    /// The lexicographically larger endpoint.
    pub fn end2(&self) -> &NodeId {
        &self.b
    }

    /// Whether `node` is one of the two endpoints.
    pub fn incident_to(&self, node: &NodeId) -> bool {
        &self.a == node || &self.b == node
    }

    /// The endpoint opposite to `node`, or `None` if `node` is not an endpoint.
    pub fn other(&self, node: &NodeId) -> Option<&NodeId> {
        if &self.a == node {
            Some(&self.b)
        } else if &self.b == node {
            Some(&self.a)
        } else {
            None
        }
    }
}

impl std::fmt::Display for LinkKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -- {}", self.a, self.b)
    }
}

impl std::fmt::Debug for LinkKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -- {}", self.a, self.b)
    }
}

/// The edge cost used by the shortest-path kernel.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum WeightKind {
    /// Use the propagation delay of the link (in milliseconds).
    #[default]
    Delay,
    /// Use the current routing weight of the link.
    Weight,
    /// Every link costs 1 (minimum hop count).
    Hops,
}

/// Priority class of a traffic demand. Informational only; the routing algorithms order demands
/// by bandwidth, not by priority.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize)]
pub enum Priority {
    /// Highest priority (level 1).
    High,
    /// Regular priority (level 2).
    #[default]
    Normal,
    /// Lowest priority (level 3).
    Low,
}

impl Priority {
    /// The numeric level of the priority (1 = highest, 3 = lowest).
    pub fn level(&self) -> u8 {
        match self {
            Self::High => 1,
            Self::Normal => 2,
            Self::Low => 3,
        }
    }

    /// Build a priority from its numeric level (1 = highest, 3 = lowest).
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::High),
            2 => Some(Self::Normal),
            3 => Some(Self::Low),
            _ => None,
        }
    }
}

/// A single traffic demand between two nodes. Demands are consumed read-only by the routing
/// algorithms; generating them is the job of an external traffic model.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct TrafficDemand {
    /// Source node id.
    pub source: NodeId,
    /// Destination node id.
    pub destination: NodeId,
    /// Requested bandwidth in Mbps.
    pub bandwidth_mbps: f64,
    /// Time at which the flow starts (simulation seconds).
    pub start_time_s: f64,
    /// Duration of the flow in seconds.
    pub duration_s: f64,
    /// Priority class of the flow.
    pub priority: Priority,
}

impl TrafficDemand {
    /// Create a demand with default priority, starting at `t = 0` and lasting 60 seconds.
    pub fn new(
        source: impl Into<NodeId>,
        destination: impl Into<NodeId>,
        bandwidth_mbps: f64,
    ) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            bandwidth_mbps,
            start_time_s: 0.0,
            duration_s: 60.0,
            priority: Priority::default(),
        }
    }

    /// Time at which the flow ends.
    pub fn end_time_s(&self) -> f64 {
        self.start_time_s + self.duration_s
    }

    /// Whether the flow is active at time `t` (simulation seconds).
    pub fn is_active_at(&self, t: f64) -> bool {
        self.start_time_s <= t && t <= self.end_time_s()
    }

    /// Whether this demand is an elephant flow (bandwidth of at least
    /// [`ELEPHANT_THRESHOLD_MBPS`]).
    pub fn is_elephant(&self) -> bool {
        self.bandwidth_mbps >= ELEPHANT_THRESHOLD_MBPS
    }
}

impl std::fmt::Display for TrafficDemand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Flow({} -> {}, {:.1}Mbps, {:.1}s)",
            self.source, self.destination, self.bandwidth_mbps, self.duration_s
        )
    }
}

/// A computed route between two nodes. The node sequence has length `links.len() + 1`, except for
/// the trivial path from a node to itself, which has a single node and no links.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Path {
    /// Ordered sequence of traversed nodes, from source to destination.
    pub nodes: Vec<NodeId>,
    /// Ordered sequence of traversed links (canonical keys).
    pub links: Vec<LinkKey>,
    /// Sum of the propagation delays along the path, in milliseconds.
    pub total_delay_ms: f64,
    /// Minimum available bandwidth along the path in Gbps (infinite for the trivial path).
    pub bottleneck_bandwidth: f64,
}

impl Path {
    /// The trivial path from a node to itself.
    pub fn trivial(node: impl Into<NodeId>) -> Self {
        Self {
            nodes: vec![node.into()],
            links: Vec::new(),
            total_delay_ms: 0.0,
            bottleneck_bandwidth: f64::INFINITY,
        }
    }

    /// Number of hops (traversed links).
    pub fn hops(&self) -> usize {
        self.links.len()
    }

    /// The first node of the path.
    pub fn source(&self) -> &NodeId {
        &self.nodes[0]
    }

    /// The last node of the path.
    pub fn destination(&self) -> &NodeId {
        &self.nodes[self.nodes.len() - 1]
    }

    /// Whether this path shares no link with `other`.
    pub fn is_link_disjoint(&self, other: &Path) -> bool {
        self.links.iter().all(|l| !other.links.contains(l))
    }
}

impl std::fmt::Display for Path {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Path({}, delay={:.2}ms, hops={})",
            self.nodes.iter().join(" -> "),
            self.total_delay_ms,
            self.hops()
        )
    }
}

/// The outcome of routing a single demand: up to K paths, together with the demand itself and the
/// time it took to compute them. `success` is `false` iff no path was found (including the case
/// where the demand references unknown endpoints).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MultiPathResult {
    /// Source node id of the demand.
    pub source: NodeId,
    /// Destination node id of the demand.
    pub destination: NodeId,
    /// The computed paths. For LDMR, `paths[0]` is the delay-optimal path and all paths are
    /// pairwise link-disjoint.
    pub paths: Vec<Path>,
    /// The demand this result belongs to.
    pub demand: TrafficDemand,
    /// Whether at least one path was found.
    pub success: bool,
    /// Wall-clock time spent computing this result.
    pub computation_time: Duration,
}

impl MultiPathResult {
    /// Create a failed result carrying no paths.
    pub fn failure(demand: &TrafficDemand, computation_time: Duration) -> Self {
        Self {
            source: demand.source.clone(),
            destination: demand.destination.clone(),
            paths: Vec::new(),
            demand: demand.clone(),
            success: false,
            computation_time,
        }
    }

    /// Sum of the delays of all paths, in milliseconds.
    pub fn total_delay_ms(&self) -> f64 {
        self.paths.iter().map(|p| p.total_delay_ms).sum()
    }

    /// Delay of the fastest path, in milliseconds (infinite if there is no path).
    pub fn min_delay_ms(&self) -> f64 {
        self.paths
            .iter()
            .map(|p| p.total_delay_ms)
            .fold(f64::INFINITY, f64::min)
    }

    /// Total number of hops over all paths.
    pub fn total_hops(&self) -> usize {
        self.paths.iter().map(|p| p.hops()).sum()
    }
}

impl std::fmt::Display for MultiPathResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MultiPath({} -> {}, {} paths, success={})",
            self.source,
            self.destination,
            self.paths.len(),
            self.success
        )
    }
}

/// Configuration Error. All parameter validation happens when an algorithm or builder is
/// constructed; none of these conditions can surface during a routing run.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConfigError {
    /// The requested constellation preset does not exist.
    #[error("Unknown constellation: {0}")]
    UnknownConstellation(String),
    /// The number of satellites does not match the plane grid.
    #[error("Constellation {name}: {num_planes} planes x {sats_per_plane} sats != {num_satellites} satellites")]
    PlaneGridMismatch {
        /// Name of the offending constellation spec.
        name: String,
        /// Number of orbital planes.
        num_planes: usize,
        /// Number of satellites per plane.
        sats_per_plane: usize,
        /// Declared total number of satellites.
        num_satellites: usize,
    },
    /// More ground stations were requested than the city table provides.
    #[error("Requested {requested} ground stations, but only {available} sites are available")]
    TooManyGroundStations {
        /// Number of requested ground stations.
        requested: usize,
        /// Number of sites in the city table.
        available: usize,
    },
    /// The number of paths must be at least 1.
    #[error("The number of paths must be at least 1, but got {0}")]
    InvalidPathCount(usize),
    /// The weight randomization bounds must satisfy `0 < r1 < r2 < r3`.
    #[error("Weight bounds must satisfy 0 < r1 < r2 < r3, but got r1={r1}, r2={r2}, r3={r3}")]
    InvalidWeightBounds {
        /// Lower bound of the low range.
        r1: u32,
        /// Upper bound of the low range and lower bound of the high range.
        r2: u32,
        /// Upper bound of the high range.
        r3: u32,
    },
    /// The iteration bound must be at least 1.
    #[error("max_iterations must be at least 1")]
    InvalidIterationBound,
    /// The ECMP cost tolerance must be non-negative.
    #[error("The ECMP tolerance must be non-negative, but got {0}")]
    InvalidTolerance(f64),
}

/// Error when operating on a [`crate::topology::Topology`] in a structurally invalid way.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NetworkError {
    /// The referenced node is not part of the topology.
    #[error("Node was not found in topology: {0}")]
    NodeNotFound(NodeId),
    /// A link references an endpoint that is not part of the topology.
    #[error("Cannot add link {0}: endpoint {1} does not exist")]
    MissingEndpoint(LinkKey, NodeId),
    /// The referenced link is not part of the topology.
    #[error("Link does not exist: {0}")]
    LinkNotFound(LinkKey),
}
