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

//! Test the topology data structure and its invariants.

use maplit::hashmap;
use pretty_assertions::assert_eq;

use super::{diamond, node, split, topo};
use crate::topology::Link;
use crate::types::{LinkKey, NetworkError, NodeId};

#[test]
fn canonical_link_key() {
    let ab = LinkKey::new("A", "B");
    let ba = LinkKey::new("B", "A");
    assert_eq!(ab, ba);
    assert_eq!(ab.end1(), &NodeId::from("A"));
    assert_eq!(ab.end2(), &NodeId::from("B"));
}

#[test]
fn get_link_is_order_insensitive() {
    let t = diamond();
    let l1 = t.get_link("A", "B").unwrap();
    let l2 = t.get_link("B", "A").unwrap();
    assert_eq!(l1, l2);
}

#[test]
fn add_link_rejects_missing_endpoints() {
    let mut t = topo(&["A"], &[]);
    let err = t.add_link(Link::new("A", "B", 10.0, 1.0)).unwrap_err();
    assert_eq!(
        err,
        NetworkError::MissingEndpoint(LinkKey::new("A", "B"), NodeId::from("B"))
    );
}

#[test]
fn adjacency_is_symmetric() {
    let mut t = diamond();
    for n in ["A", "B", "C", "D"].map(NodeId::from) {
        for m in t.neighbors(&n).cloned().collect::<Vec<_>>() {
            assert!(t.neighbors(&m).any(|x| *x == n));
        }
    }

    t.remove_link("A", "B");
    let a = NodeId::from("A");
    let b = NodeId::from("B");
    assert!(!t.neighbors(&a).any(|x| *x == b));
    assert!(!t.neighbors(&b).any(|x| *x == a));
}

#[test]
fn remove_link_is_a_noop_when_absent() {
    let mut t = diamond();
    let links_before = t.num_links();
    t.remove_link("A", "D");
    t.remove_link("A", "D");
    assert_eq!(t.num_links(), links_before);
}

#[test]
fn neighbors_skip_inactive_links() {
    let mut t = diamond();
    t.set_link_active("A", "B", false).unwrap();
    let a = NodeId::from("A");
    let neighbors: Vec<_> = t.neighbors(&a).cloned().collect();
    assert_eq!(neighbors, vec![NodeId::from("C")]);
    // the link still exists, it is only invisible
    assert!(t.has_link("A", "B"));
}

#[test]
fn clone_independence() {
    let t = diamond();
    let stats = t.statistics();
    let weight_before = t.get_link("A", "B").unwrap().weight();

    let mut clone = t.clone();
    clone.remove_link("A", "B");
    clone.update_link_weights(&hashmap! { LinkKey::new("A", "C") => 999.0 });

    assert_eq!(t.statistics(), stats);
    assert_eq!(t.get_link("A", "B").unwrap().weight(), weight_before);
    assert_eq!(t.get_link("A", "C").unwrap().weight(), 20.0);
    assert_ne!(clone.statistics(), stats);
}

#[test]
fn statistics_of_the_diamond() {
    let stats = diamond().statistics();
    assert_eq!(stats.total_nodes, 4);
    assert_eq!(stats.satellites, 4);
    assert_eq!(stats.ground_stations, 0);
    assert_eq!(stats.total_links, 5);
    assert_eq!(stats.average_degree, 2.5);
    assert!(stats.is_connected);
}

#[test]
fn statistics_detect_disconnection() {
    assert!(!split().statistics().is_connected);

    let mut t = diamond();
    t.remove_link("A", "B");
    t.remove_link("A", "C");
    assert!(!t.statistics().is_connected);
}

#[test]
fn weight_matrix_reflects_updates() {
    let mut t = diamond();
    let m = t.weight_matrix();
    let a = m.order().iter().position(|n| n.as_str() == "A").unwrap();
    let b = m.order().iter().position(|n| n.as_str() == "B").unwrap();
    let d = m.order().iter().position(|n| n.as_str() == "D").unwrap();
    assert_eq!(m.get(a, b), 10.0);
    assert_eq!(m.get(b, a), 10.0);
    assert_eq!(m.get(a, a), 0.0);
    assert_eq!(m.get(a, d), f64::INFINITY);

    // mutation invalidates the cache
    t.update_link_weights(&hashmap! { LinkKey::new("A", "B") => 42.0 });
    let m = t.weight_matrix();
    assert_eq!(m.get(a, b), 42.0);

    t.remove_link("A", "B");
    let m = t.weight_matrix();
    assert_eq!(m.get(a, b), f64::INFINITY);
}

#[test]
fn adjacency_matrix_matches_links() {
    let t = diamond();
    let m = t.adjacency_matrix();
    let idx = |s: &str| m.order().iter().position(|n| n.as_str() == s).unwrap();
    assert!(m.get(idx("A"), idx("B")));
    assert!(m.get(idx("B"), idx("A")));
    assert!(!m.get(idx("A"), idx("D")));
    assert!(!m.get(idx("A"), idx("A")));
}

#[test]
fn trace_path_recomputes_metrics() {
    let t = diamond();
    let path = t
        .trace_path(&["A", "B", "D"].map(NodeId::from))
        .unwrap();
    assert_eq!(path.total_delay_ms, 20.0);
    assert_eq!(path.hops(), 2);
    assert_eq!(path.bottleneck_bandwidth, 10.0);
    assert_eq!(
        path.links,
        vec![LinkKey::new("A", "B"), LinkKey::new("B", "D")]
    );

    // missing link
    assert_eq!(t.trace_path(&["A", "D"].map(NodeId::from)), None);
}

#[test]
fn apply_path_load_raises_utilization() {
    let mut t = diamond();
    let path = t.trace_path(&["A", "B", "D"].map(NodeId::from)).unwrap();
    t.apply_path_load(&path, 5000.0); // 5 Gbps on 10 Gbps links
    let link = t.get_link("A", "B").unwrap();
    assert_eq!(link.utilization(), 0.5);
    assert_eq!(link.available_bandwidth_gbps(), 5.0);
    // untouched link
    assert_eq!(t.get_link("B", "C").unwrap().utilization(), 0.0);
}

#[test]
fn readding_a_node_keeps_its_links() {
    let mut t = diamond();
    t.add_node(node("A"));
    assert!(t.has_link("A", "B"));
    assert_eq!(t.num_nodes(), 4);
}
