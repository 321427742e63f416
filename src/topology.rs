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

//! The network topology: nodes, undirected links, adjacency, and the cached matrix views. The
//! topology is kept in sync with a [Petgraph](https://docs.rs/petgraph) graph which is used for
//! connectivity analysis.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use itertools::Itertools;
use petgraph::algo::connected_components;
use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};

use crate::geometry::Position;
use crate::types::{LinkKey, LinkWeight, NetworkError, NodeId, Path};

/// The kind of a node.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum NodeKind {
    /// An orbiting satellite.
    Satellite,
    /// A fixed terrestrial ground station.
    GroundStation,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Satellite => f.write_str("satellite"),
            Self::GroundStation => f.write_str("ground station"),
        }
    }
}

/// Kind-specific node attributes. Informational only; the routing algorithms never look at them,
/// but the constellation builder uses the satellite indices to decide which links to create.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum NodeInfo {
    /// Attributes of a satellite.
    Satellite {
        /// Index of the orbital plane.
        plane: usize,
        /// Index of the satellite within its plane.
        slot: usize,
    },
    /// Attributes of a ground station.
    GroundStation {
        /// Name of the city the station is located at.
        city: String,
        /// Geodetic latitude in degrees.
        latitude: f64,
        /// Geodetic longitude in degrees.
        longitude: f64,
    },
}

impl NodeInfo {
    /// The kind of node these attributes belong to.
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Satellite { .. } => NodeKind::Satellite,
            Self::GroundStation { .. } => NodeKind::GroundStation,
        }
    }
}

/// A node of the topology. The identity (id, kind, position, attributes) is immutable once the
/// node is created.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Node {
    id: NodeId,
    position: Position,
    info: NodeInfo,
}

impl Node {
    /// Create a satellite node. The id is derived from the plane and slot index
    /// (`S_<plane>_<slot>`).
    pub fn satellite(plane: usize, slot: usize, position: Position) -> Self {
        Self {
            id: NodeId::new(format!("S_{}_{}", plane, slot)),
            position,
            info: NodeInfo::Satellite { plane, slot },
        }
    }

    /// Create a ground-station node. The id is derived from the station index (`GS_<index>`).
    pub fn ground_station(
        index: usize,
        city: impl Into<String>,
        latitude: f64,
        longitude: f64,
        position: Position,
    ) -> Self {
        Self {
            id: NodeId::new(format!("GS_{}", index)),
            position,
            info: NodeInfo::GroundStation {
                city: city.into(),
                latitude,
                longitude,
            },
        }
    }

    /// Create a node with an arbitrary id. Mainly useful for hand-built test topologies.
    pub fn new(id: impl Into<NodeId>, info: NodeInfo, position: Position) -> Self {
        Self {
            id: id.into(),
            position,
            info,
        }
    }

    /// The id of the node.
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    /// The kind of the node.
    pub fn kind(&self) -> NodeKind {
        self.info.kind()
    }

    /// The position of the node.
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// The kind-specific attributes of the node.
    pub fn info(&self) -> &NodeInfo {
        &self.info
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Node({}, {})", self.id, self.kind())
    }
}

/// An undirected link between two nodes. The endpoints are stored canonically (see
/// [`LinkKey`]); propagation delay and capacity are fixed at creation, while the routing weight,
/// the utilization and the active flag are mutable through the owning [`Topology`].
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Link {
    key: LinkKey,
    bandwidth_gbps: f64,
    delay_ms: f64,
    pub(crate) weight: LinkWeight,
    pub(crate) utilization: f64,
    pub(crate) active: bool,
}

impl Link {
    /// Create a new active link. The initial routing weight equals the propagation delay.
    pub fn new(x: impl Into<NodeId>, y: impl Into<NodeId>, bandwidth_gbps: f64, delay_ms: f64) -> Self {
        Self {
            key: LinkKey::new(x, y),
            bandwidth_gbps,
            delay_ms,
            weight: delay_ms,
            utilization: 0.0,
            active: true,
        }
    }

    /// The canonical key of the link.
    pub fn key(&self) -> &LinkKey {
        &self.key
    }

    /// The lexicographically smaller endpoint.
    pub fn end1(&self) -> &NodeId {
        self.key.end1()
    }

    /// The lexicographically larger endpoint.
    pub fn end2(&self) -> &NodeId {
        self.key.end2()
    }

    /// Capacity of the link in Gbps.
    pub fn bandwidth_gbps(&self) -> f64 {
        self.bandwidth_gbps
    }

    /// Propagation delay of the link in milliseconds.
    pub fn delay_ms(&self) -> f64 {
        self.delay_ms
    }

    /// Current routing weight of the link.
    pub fn weight(&self) -> LinkWeight {
        self.weight
    }

    /// Fraction of the capacity currently in use, in `[0, 1]`.
    pub fn utilization(&self) -> f64 {
        self.utilization
    }

    /// Capacity not yet claimed by routed demands, in Gbps.
    pub fn available_bandwidth_gbps(&self) -> f64 {
        self.bandwidth_gbps * (1.0 - self.utilization)
    }

    /// Whether the link is active. Inactive links are invisible to routing.
    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl std::fmt::Display for Link {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Link({}, delay={:.2}ms, bw={}Gbps)",
            self.key, self.delay_ms, self.bandwidth_gbps
        )
    }
}

/// Aggregate statistics of a topology.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct TopologyStatistics {
    /// Total number of nodes.
    pub total_nodes: usize,
    /// Number of satellite nodes.
    pub satellites: usize,
    /// Number of ground-station nodes.
    pub ground_stations: usize,
    /// Total number of links.
    pub total_links: usize,
    /// Mean node degree.
    pub average_degree: f64,
    /// Whether the topology forms a single connected component.
    pub is_connected: bool,
}

/// Dense adjacency view of the topology. Row and column `i` both correspond to `order()[i]`.
#[derive(Clone, PartialEq, Debug)]
pub struct AdjacencyMatrix {
    order: Vec<NodeId>,
    data: Vec<bool>,
}

impl AdjacencyMatrix {
    /// The node ids indexing the rows and columns.
    pub fn order(&self) -> &[NodeId] {
        &self.order
    }

    /// The dimension of the (square) matrix.
    pub fn dim(&self) -> usize {
        self.order.len()
    }

    /// Whether the nodes at index `i` and `j` are adjacent.
    pub fn get(&self, i: usize, j: usize) -> bool {
        self.data[i * self.order.len() + j]
    }
}

/// Dense weight view of the topology. Entries without an active link are infinite, and the
/// diagonal is zero. Row and column `i` both correspond to `order()[i]`.
#[derive(Clone, PartialEq, Debug)]
pub struct WeightMatrix {
    order: Vec<NodeId>,
    data: Vec<LinkWeight>,
}

impl WeightMatrix {
    /// The node ids indexing the rows and columns.
    pub fn order(&self) -> &[NodeId] {
        &self.order
    }

    /// The dimension of the (square) matrix.
    pub fn dim(&self) -> usize {
        self.order.len()
    }

    /// The weight of the link between the nodes at index `i` and `j`, infinity if there is no
    /// active link, or zero on the diagonal.
    pub fn get(&self, i: usize, j: usize) -> LinkWeight {
        self.data[i * self.order.len() + j]
    }
}

#[derive(Debug, Default)]
struct MatrixCache {
    adjacency: Option<AdjacencyMatrix>,
    weight: Option<WeightMatrix>,
}

/// The network topology. Nodes and links are stored in ordered maps (so that all iteration is
/// deterministic), the adjacency sets are maintained incrementally, and a parallel Petgraph graph
/// is kept in sync for connectivity analysis. The matrix views are computed lazily and
/// invalidated on every mutation.
#[derive(Debug)]
pub struct Topology {
    nodes: BTreeMap<NodeId, Node>,
    links: BTreeMap<LinkKey, Link>,
    neighbors: BTreeMap<NodeId, BTreeSet<NodeId>>,
    graph: UnGraph<(), LinkWeight>,
    indices: HashMap<NodeId, NodeIndex>,
    cache: RefCell<MatrixCache>,
}

impl Clone for Topology {
    /// Deep copy: the clone shares no mutable state with the original.
    fn clone(&self) -> Self {
        log::trace!("Cloning the topology");
        Self {
            nodes: self.nodes.clone(),
            links: self.links.clone(),
            neighbors: self.neighbors.clone(),
            graph: self.graph.clone(),
            indices: self.indices.clone(),
            cache: RefCell::new(MatrixCache::default()),
        }
    }
}

impl Default for Topology {
    fn default() -> Self {
        Self::new()
    }
}

impl Topology {
    /// Create an empty topology.
    pub fn new() -> Self {
        Self {
            nodes: BTreeMap::new(),
            links: BTreeMap::new(),
            neighbors: BTreeMap::new(),
            graph: UnGraph::default(),
            indices: HashMap::new(),
            cache: RefCell::new(MatrixCache::default()),
        }
    }

    /// Add a node. Re-adding a node with an existing id replaces the stored node but keeps its
    /// links.
    pub fn add_node(&mut self, node: Node) {
        let id = node.id().clone();
        if !self.indices.contains_key(&id) {
            let idx = self.graph.add_node(());
            self.indices.insert(id.clone(), idx);
            self.neighbors.insert(id.clone(), BTreeSet::new());
        }
        self.nodes.insert(id, node);
        self.invalidate_matrices();
    }

    /// Add a link. Both endpoints must already be present in the topology. Re-adding an existing
    /// link replaces it.
    pub fn add_link(&mut self, link: Link) -> Result<(), NetworkError> {
        let key = link.key().clone();
        for end in [key.end1(), key.end2()] {
            if !self.nodes.contains_key(end) {
                return Err(NetworkError::MissingEndpoint(key.clone(), end.clone()));
            }
        }
        let (ia, ib) = (self.indices[key.end1()], self.indices[key.end2()]);
        match self.graph.find_edge(ia, ib) {
            Some(e) => self.graph[e] = link.weight,
            None => {
                self.graph.add_edge(ia, ib, link.weight);
            }
        }
        if let Some(n) = self.neighbors.get_mut(key.end1()) {
            n.insert(key.end2().clone());
        }
        if let Some(n) = self.neighbors.get_mut(key.end2()) {
            n.insert(key.end1().clone());
        }
        self.links.insert(key, link);
        self.invalidate_matrices();
        Ok(())
    }

    /// Remove the link between `a` and `b` (in either argument order). Does nothing if the link
    /// does not exist. The adjacency sets of both endpoints and the cached matrices are updated
    /// atomically.
    pub fn remove_link(&mut self, a: impl Into<NodeId>, b: impl Into<NodeId>) {
        let key = LinkKey::new(a, b);
        if self.links.remove(&key).is_none() {
            return;
        }
        if let Some(n) = self.neighbors.get_mut(key.end1()) {
            n.remove(key.end2());
        }
        if let Some(n) = self.neighbors.get_mut(key.end2()) {
            n.remove(key.end1());
        }
        if let (Some(&ia), Some(&ib)) = (self.indices.get(key.end1()), self.indices.get(key.end2()))
        {
            if let Some(e) = self.graph.find_edge(ia, ib) {
                self.graph.remove_edge(e);
            }
        }
        self.invalidate_matrices();
    }

    /// Get the link between `a` and `b`, independent of argument order.
    pub fn get_link(&self, a: impl Into<NodeId>, b: impl Into<NodeId>) -> Option<&Link> {
        self.links.get(&LinkKey::new(a, b))
    }

    /// Whether a link between `a` and `b` exists.
    pub fn has_link(&self, a: impl Into<NodeId>, b: impl Into<NodeId>) -> bool {
        self.links.contains_key(&LinkKey::new(a, b))
    }

    /// Get a node by id.
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Whether a node with the given id exists.
    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Iterate over all nodes, ordered by id.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Iterate over all links, ordered by canonical key.
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.links.values()
    }

    /// Number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of links.
    pub fn num_links(&self) -> usize {
        self.links.len()
    }

    /// Iterate over the neighbors of `id` that are reachable over an active link, in id order.
    /// The iterator is empty if the node does not exist.
    pub fn neighbors<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a NodeId> + 'a {
        self.neighbors
            .get(id)
            .into_iter()
            .flatten()
            .filter(move |n| {
                self.links
                    .get(&LinkKey::new(id, *n))
                    .map(|l| l.active)
                    .unwrap_or(false)
            })
    }

    /// Batch-update routing weights. Keys that do not reference an existing link are ignored.
    /// The cached weight matrix is invalidated.
    pub fn update_link_weights(&mut self, updates: &HashMap<LinkKey, LinkWeight>) {
        for (key, weight) in updates {
            if let Some(link) = self.links.get_mut(key) {
                link.weight = *weight;
                let (ia, ib) = (self.indices[key.end1()], self.indices[key.end2()]);
                if let Some(e) = self.graph.find_edge(ia, ib) {
                    self.graph[e] = *weight;
                }
            }
        }
        self.invalidate_matrices();
    }

    /// Reset the routing weight of every link back to its propagation delay.
    pub fn reset_weights_to_delay(&mut self) {
        let updates: HashMap<LinkKey, LinkWeight> = self
            .links
            .iter()
            .map(|(key, link)| (key.clone(), link.delay_ms))
            .collect();
        self.update_link_weights(&updates);
    }

    /// Activate or deactivate a link. Returns `Err` if the link does not exist. Deactivated
    /// links remain in the topology but are invisible to routing.
    pub fn set_link_active(
        &mut self,
        a: impl Into<NodeId>,
        b: impl Into<NodeId>,
        active: bool,
    ) -> Result<(), NetworkError> {
        let key = LinkKey::new(a, b);
        let link = self
            .links
            .get_mut(&key)
            .ok_or(NetworkError::LinkNotFound(key))?;
        link.active = active;
        self.invalidate_matrices();
        Ok(())
    }

    /// Claim `bandwidth_mbps` of capacity on every link of `path`, raising the utilization of
    /// each link accordingly (clamped at 1).
    pub fn apply_path_load(&mut self, path: &Path, bandwidth_mbps: f64) {
        let bandwidth_gbps = bandwidth_mbps / 1000.0;
        for key in &path.links {
            if let Some(link) = self.links.get_mut(key) {
                if link.bandwidth_gbps > 0.0 {
                    link.utilization =
                        (link.utilization + bandwidth_gbps / link.bandwidth_gbps).min(1.0);
                }
            }
        }
    }

    /// Walk the given node sequence and assemble a [`Path`], recomputing delay and bottleneck
    /// bandwidth from the link objects. Returns `None` if any consecutive pair of nodes is not
    /// connected by a link.
    pub fn trace_path(&self, nodes: &[NodeId]) -> Option<Path> {
        if nodes.is_empty() {
            return None;
        }
        if nodes.len() == 1 {
            return Some(Path::trivial(nodes[0].clone()));
        }
        let mut links = Vec::with_capacity(nodes.len() - 1);
        let mut total_delay_ms = 0.0;
        let mut bottleneck = f64::INFINITY;
        for (a, b) in nodes.iter().tuple_windows() {
            let link = self.get_link(a, b)?;
            total_delay_ms += link.delay_ms;
            bottleneck = bottleneck.min(link.available_bandwidth_gbps());
            links.push(link.key().clone());
        }
        Some(Path {
            nodes: nodes.to_vec(),
            links,
            total_delay_ms,
            bottleneck_bandwidth: bottleneck,
        })
    }

    /// Compute the aggregate statistics of the topology.
    pub fn statistics(&self) -> TopologyStatistics {
        let satellites = self
            .nodes
            .values()
            .filter(|n| n.kind() == NodeKind::Satellite)
            .count();
        let total_nodes = self.nodes.len();
        let total_links = self.links.len();
        TopologyStatistics {
            total_nodes,
            satellites,
            ground_stations: total_nodes - satellites,
            total_links,
            average_degree: if total_nodes == 0 {
                0.0
            } else {
                2.0 * total_links as f64 / total_nodes as f64
            },
            is_connected: total_nodes > 0 && connected_components(&self.graph) == 1,
        }
    }

    /// The cached adjacency matrix, recomputed if a mutation invalidated it.
    pub fn adjacency_matrix(&self) -> AdjacencyMatrix {
        let mut cache = self.cache.borrow_mut();
        cache
            .adjacency
            .get_or_insert_with(|| {
                let order: Vec<NodeId> = self.nodes.keys().cloned().collect();
                let n = order.len();
                let mut data = vec![false; n * n];
                for (i, a) in order.iter().enumerate() {
                    for (j, b) in order.iter().enumerate() {
                        if i != j && self.links.contains_key(&LinkKey::new(a, b)) {
                            data[i * n + j] = true;
                        }
                    }
                }
                AdjacencyMatrix { order, data }
            })
            .clone()
    }

    /// The cached weight matrix, recomputed if a mutation invalidated it. Only active links
    /// contribute; all other off-diagonal entries are infinite.
    pub fn weight_matrix(&self) -> WeightMatrix {
        let mut cache = self.cache.borrow_mut();
        cache
            .weight
            .get_or_insert_with(|| {
                let order: Vec<NodeId> = self.nodes.keys().cloned().collect();
                let n = order.len();
                let mut data = vec![LinkWeight::INFINITY; n * n];
                for i in 0..n {
                    data[i * n + i] = 0.0;
                }
                for (i, a) in order.iter().enumerate() {
                    for (j, b) in order.iter().enumerate() {
                        if i == j {
                            continue;
                        }
                        if let Some(link) = self.links.get(&LinkKey::new(a, b)) {
                            if link.active {
                                data[i * n + j] = link.weight;
                            }
                        }
                    }
                }
                WeightMatrix { order, data }
            })
            .clone()
    }

    fn invalidate_matrices(&self) {
        let mut cache = self.cache.borrow_mut();
        cache.adjacency = None;
        cache.weight = None;
    }
}

impl std::fmt::Display for Topology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Topology(nodes={}, links={})",
            self.nodes.len(),
            self.links.len()
        )
    }
}
