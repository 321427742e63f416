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

//! Test fixtures shared by all test modules.

use crate::geometry::Position;
use crate::topology::{Link, Node, NodeInfo, Topology};
use crate::types::TrafficDemand;

mod test_constellation;
mod test_pathfinding;
mod test_topology;

/// A satellite node at the origin; position and indices are irrelevant for hand-built graphs.
fn node(id: &str) -> Node {
    Node::new(
        id,
        NodeInfo::Satellite { plane: 0, slot: 0 },
        Position::default(),
    )
}

/// Build a topology from node names and `(end1, end2, delay_ms)` triples. All links get a
/// bandwidth of 10 Gbps.
fn topo(nodes: &[&str], links: &[(&str, &str, f64)]) -> Topology {
    let mut t = Topology::new();
    for n in nodes {
        t.add_node(node(n));
    }
    for (a, b, delay) in links {
        t.add_link(Link::new(*a, *b, 10.0, *delay)).unwrap();
    }
    t
}

/// The diamond: the delay-shortest A -> D route is A-B-D (20 ms), and the only route avoiding
/// its links is A-C-D (35 ms).
fn diamond() -> Topology {
    topo(
        &["A", "B", "C", "D"],
        &[
            ("A", "B", 10.0),
            ("A", "C", 20.0),
            ("B", "D", 10.0),
            ("C", "D", 15.0),
            ("B", "C", 5.0),
        ],
    )
}

/// Two disconnected components: A-B and C-D.
fn split() -> Topology {
    topo(&["A", "B", "C", "D"], &[("A", "B", 10.0), ("C", "D", 10.0)])
}

/// A linear chain A-B-C-D-E, all links 10 ms.
fn chain() -> Topology {
    topo(
        &["A", "B", "C", "D", "E"],
        &[
            ("A", "B", 10.0),
            ("B", "C", 10.0),
            ("C", "D", 10.0),
            ("D", "E", 10.0),
        ],
    )
}

/// A 4x4 grid with equal delays. Node `(i, j)` is named `N_<i>_<j>`; the corners are `N_0_0`
/// and `N_3_3`.
fn grid4() -> Topology {
    let mut t = Topology::new();
    let name = |i: usize, j: usize| format!("N_{}_{}", i, j);
    for i in 0..4 {
        for j in 0..4 {
            t.add_node(node(&name(i, j)));
        }
    }
    for i in 0..4 {
        for j in 0..4 {
            if j + 1 < 4 {
                t.add_link(Link::new(name(i, j), name(i, j + 1), 10.0, 10.0))
                    .unwrap();
            }
            if i + 1 < 4 {
                t.add_link(Link::new(name(i, j), name(i + 1, j), 10.0, 10.0))
                    .unwrap();
            }
        }
    }
    t
}

/// Three parallel 3-hop routes between A and B with total delays 30, 31 and 40 ms.
fn parallel_three() -> Topology {
    topo(
        &["A", "B", "X1", "X2", "Y1", "Y2", "Z1", "Z2"],
        &[
            ("A", "X1", 10.0),
            ("X1", "X2", 10.0),
            ("X2", "B", 10.0),
            ("A", "Y1", 10.0),
            ("Y1", "Y2", 10.0),
            ("Y2", "B", 11.0),
            ("A", "Z1", 13.0),
            ("Z1", "Z2", 13.0),
            ("Z2", "B", 14.0),
        ],
    )
}

/// A demand with default timing and priority.
fn demand(source: &str, destination: &str, bandwidth_mbps: f64) -> TrafficDemand {
    TrafficDemand::new(source, destination, bandwidth_mbps)
}
