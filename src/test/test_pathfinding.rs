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

//! Test the shortest-path kernel and the K-shortest-path enumeration.

use std::collections::HashSet;

use maplit::hashmap;
use pretty_assertions::assert_eq;

use super::{chain, diamond, split, topo};
use crate::pathfinding::{
    all_link_disjoint, disjoint_shortest_paths, k_shortest_paths, path_cost, shortest_path,
};
use crate::types::{LinkKey, NodeId, WeightKind};

fn names(path: &crate::types::Path) -> Vec<&str> {
    path.nodes.iter().map(|n| n.as_str()).collect()
}

#[test]
fn shortest_by_delay() {
    let t = diamond();
    let path = shortest_path(
        &t,
        &NodeId::from("A"),
        &NodeId::from("D"),
        WeightKind::Delay,
        &HashSet::new(),
    )
    .unwrap();
    assert_eq!(names(&path), vec!["A", "B", "D"]);
    assert_eq!(path.total_delay_ms, 20.0);
}

#[test]
fn shortest_with_excluded_links() {
    let t = diamond();
    let excluded = HashSet::from([LinkKey::new("A", "B")]);
    let path = shortest_path(
        &t,
        &NodeId::from("A"),
        &NodeId::from("D"),
        WeightKind::Delay,
        &excluded,
    )
    .unwrap();
    assert_eq!(names(&path), vec!["A", "C", "D"]);
    assert_eq!(path.total_delay_ms, 35.0);
}

#[test]
fn source_equals_destination() {
    let t = diamond();
    let a = NodeId::from("A");
    let path = shortest_path(&t, &a, &a, WeightKind::Delay, &HashSet::new()).unwrap();
    assert_eq!(path.nodes, vec![a]);
    assert_eq!(path.hops(), 0);
    assert_eq!(path.total_delay_ms, 0.0);
}

#[test]
fn unreachable_destination() {
    let t = split();
    assert_eq!(
        shortest_path(
            &t,
            &NodeId::from("A"),
            &NodeId::from("D"),
            WeightKind::Delay,
            &HashSet::new()
        ),
        None
    );
}

#[test]
fn unknown_endpoints() {
    let t = diamond();
    assert_eq!(
        shortest_path(
            &t,
            &NodeId::from("A"),
            &NodeId::from("X"),
            WeightKind::Delay,
            &HashSet::new()
        ),
        None
    );
    assert_eq!(
        shortest_path(
            &t,
            &NodeId::from("X"),
            &NodeId::from("A"),
            WeightKind::Delay,
            &HashSet::new()
        ),
        None
    );
}

#[test]
fn hops_ignore_delay() {
    // the direct link is slow, the detour is fast
    let t = topo(
        &["A", "B", "C"],
        &[("A", "B", 1.0), ("B", "C", 1.0), ("A", "C", 10.0)],
    );
    let by_delay = shortest_path(
        &t,
        &NodeId::from("A"),
        &NodeId::from("C"),
        WeightKind::Delay,
        &HashSet::new(),
    )
    .unwrap();
    assert_eq!(names(&by_delay), vec!["A", "B", "C"]);

    let by_hops = shortest_path(
        &t,
        &NodeId::from("A"),
        &NodeId::from("C"),
        WeightKind::Hops,
        &HashSet::new(),
    )
    .unwrap();
    assert_eq!(names(&by_hops), vec!["A", "C"]);
}

#[test]
fn weight_kind_follows_mutated_weights() {
    let mut t = diamond();
    // make the A-B-D route expensive by weight while its delay stays optimal
    t.update_link_weights(&hashmap! {
        LinkKey::new("A", "B") => 100.0,
        LinkKey::new("B", "D") => 100.0,
    });
    let path = shortest_path(
        &t,
        &NodeId::from("A"),
        &NodeId::from("D"),
        WeightKind::Weight,
        &HashSet::new(),
    )
    .unwrap();
    assert_eq!(names(&path), vec!["A", "C", "D"]);
    assert_eq!(path.total_delay_ms, 35.0);
    assert_eq!(path_cost(&t, &path, WeightKind::Weight), 35.0);
}

#[test]
fn inactive_links_are_invisible() {
    let mut t = diamond();
    t.set_link_active("A", "B", false).unwrap();
    let path = shortest_path(
        &t,
        &NodeId::from("A"),
        &NodeId::from("D"),
        WeightKind::Delay,
        &HashSet::new(),
    )
    .unwrap();
    assert_eq!(names(&path), vec!["A", "C", "D"]);
}

#[test]
fn yen_enumerates_in_cost_order() {
    let t = diamond();
    let paths = k_shortest_paths(
        &t,
        &NodeId::from("A"),
        &NodeId::from("D"),
        3,
        WeightKind::Delay,
    );
    assert_eq!(paths.len(), 3);
    assert_eq!(names(&paths[0]), vec!["A", "B", "D"]);
    assert_eq!(names(&paths[1]), vec!["A", "B", "C", "D"]);
    assert_eq!(names(&paths[2]), vec!["A", "C", "D"]);
    assert_eq!(paths[0].total_delay_ms, 20.0);
    assert_eq!(paths[1].total_delay_ms, 30.0);
    assert_eq!(paths[2].total_delay_ms, 35.0);
}

#[test]
fn yen_runs_dry_without_duplicates() {
    let t = chain();
    let paths = k_shortest_paths(
        &t,
        &NodeId::from("A"),
        &NodeId::from("E"),
        5,
        WeightKind::Delay,
    );
    assert_eq!(paths.len(), 1);
    assert_eq!(names(&paths[0]), vec!["A", "B", "C", "D", "E"]);
}

#[test]
fn yen_on_unreachable_pairs() {
    let t = split();
    assert!(k_shortest_paths(
        &t,
        &NodeId::from("A"),
        &NodeId::from("D"),
        3,
        WeightKind::Delay
    )
    .is_empty());
}

#[test]
fn greedy_disjoint_paths() {
    let t = diamond();
    let paths = disjoint_shortest_paths(
        &t,
        &NodeId::from("A"),
        &NodeId::from("D"),
        3,
        WeightKind::Delay,
    );
    // after A-B-D and A-C-D, no third link-disjoint route exists
    assert_eq!(paths.len(), 2);
    assert_eq!(names(&paths[0]), vec!["A", "B", "D"]);
    assert_eq!(names(&paths[1]), vec!["A", "C", "D"]);
    assert!(all_link_disjoint(&paths));
}

#[test]
fn disjointness_check_spots_shared_links() {
    let t = diamond();
    let a = t.trace_path(&["A", "B", "D"].map(NodeId::from)).unwrap();
    let b = t.trace_path(&["A", "B", "C", "D"].map(NodeId::from)).unwrap();
    assert!(!all_link_disjoint(&[a.clone(), b]));
    assert!(all_link_disjoint(&[a]));
}
