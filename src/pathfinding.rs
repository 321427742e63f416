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

//! The shortest-path kernel and the algorithms built directly on top of it: Dijkstra with an
//! excluded-link set, Yen's K-shortest paths, and the greedy link-disjoint search. None of these
//! functions ever mutate the topology; exclusions are passed as parameters.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use ordered_float::NotNan;

use crate::topology::{Link, Topology};
use crate::types::{LinkKey, NodeId, Path, WeightKind};

/// Edge cost of a link under the given weight kind.
fn edge_cost(link: &Link, weight: WeightKind) -> f64 {
    match weight {
        WeightKind::Delay => link.delay_ms(),
        WeightKind::Weight => link.weight(),
        WeightKind::Hops => 1.0,
    }
}

/// Total cost of a path under the given weight kind, recomputed from the link objects. Links
/// missing from the topology cost infinity.
pub fn path_cost(topology: &Topology, path: &Path, weight: WeightKind) -> f64 {
    match weight {
        WeightKind::Delay => path.total_delay_ms,
        WeightKind::Hops => path.hops() as f64,
        WeightKind::Weight => path
            .links
            .iter()
            .map(|key| {
                topology
                    .get_link(key.end1(), key.end2())
                    .map(|l| l.weight())
                    .unwrap_or(f64::INFINITY)
            })
            .sum(),
    }
}

/// Dijkstra shortest path from `source` to `destination`.
///
/// Links in `excluded` (canonical keys) and inactive links are invisible to the search. Ties are
/// broken deterministically: the first predecessor discovered at the minimum cost is kept, and
/// the neighbor iteration order of [`Topology`] is stable. Returns `None` if the destination is
/// unreachable or either endpoint does not exist, and the trivial path if `source ==
/// destination`.
pub fn shortest_path(
    topology: &Topology,
    source: &NodeId,
    destination: &NodeId,
    weight: WeightKind,
    excluded: &HashSet<LinkKey>,
) -> Option<Path> {
    if !topology.contains_node(source) || !topology.contains_node(destination) {
        return None;
    }
    if source == destination {
        return Some(Path::trivial(source.clone()));
    }

    let zero = not_nan(0.0)?;
    let mut dist: HashMap<NodeId, NotNan<f64>> = HashMap::new();
    let mut predecessor: HashMap<NodeId, NodeId> = HashMap::new();
    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut queue: BinaryHeap<Reverse<(NotNan<f64>, NodeId)>> = BinaryHeap::new();
    dist.insert(source.clone(), zero);
    queue.push(Reverse((zero, source.clone())));

    while let Some(Reverse((d, current))) = queue.pop() {
        if !visited.insert(current.clone()) {
            continue;
        }
        if &current == destination {
            break;
        }
        let neighbors: Vec<NodeId> = topology.neighbors(&current).cloned().collect();
        for neighbor in neighbors {
            if visited.contains(&neighbor) {
                continue;
            }
            let key = LinkKey::new(&current, &neighbor);
            if excluded.contains(&key) {
                continue;
            }
            let link = match topology.get_link(&current, &neighbor) {
                Some(l) => l,
                None => continue,
            };
            let cost = match not_nan(edge_cost(link, weight)) {
                Some(c) => c,
                None => continue,
            };
            let next = d + cost;
            if dist.get(&neighbor).map(|best| next < *best).unwrap_or(true) {
                dist.insert(neighbor.clone(), next);
                predecessor.insert(neighbor.clone(), current.clone());
                queue.push(Reverse((next, neighbor)));
            }
        }
    }

    if !visited.contains(destination) {
        return None;
    }

    let mut sequence = vec![destination.clone()];
    let mut current = destination;
    while let Some(prev) = predecessor.get(current) {
        sequence.push(prev.clone());
        current = prev;
    }
    if &sequence[sequence.len() - 1] != source {
        return None;
    }
    sequence.reverse();
    topology.trace_path(&sequence)
}

/// Yen's K-shortest paths from `source` to `destination`: spur candidates are generated along
/// the most recently accepted path, edges that would reproduce an already accepted path with the
/// same root are forbidden, and the cheapest unseen simple candidate is accepted next. Candidate
/// metrics are recomputed from the link objects. Returns fewer than `k` paths if the candidate
/// set runs dry.
pub fn k_shortest_paths(
    topology: &Topology,
    source: &NodeId,
    destination: &NodeId,
    k: usize,
    weight: WeightKind,
) -> Vec<Path> {
    if k == 0 {
        return Vec::new();
    }
    let first = match shortest_path(topology, source, destination, weight, &HashSet::new()) {
        Some(p) => p,
        None => return Vec::new(),
    };
    let mut accepted = vec![first];
    let mut candidates: Vec<Path> = Vec::new();

    while accepted.len() < k {
        let prev = accepted[accepted.len() - 1].clone();
        for i in 0..prev.nodes.len().saturating_sub(1) {
            let spur_node = &prev.nodes[i];
            let root = &prev.nodes[..=i];

            // forbid the next edge of every accepted path sharing this root
            let mut excluded = HashSet::new();
            for p in &accepted {
                if p.nodes.len() > i + 1 && p.nodes[..=i] == *root {
                    excluded.insert(LinkKey::new(&p.nodes[i], &p.nodes[i + 1]));
                }
            }

            let spur = match shortest_path(topology, spur_node, destination, weight, &excluded) {
                Some(p) if p.nodes.len() > 1 => p,
                _ => continue,
            };

            let mut full = root[..i].to_vec();
            full.extend(spur.nodes.iter().cloned());
            // the spur path may lead back into the root; only simple paths are candidates
            if !all_distinct(&full) {
                continue;
            }
            let candidate = match topology.trace_path(&full) {
                Some(c) => c,
                None => continue,
            };
            let duplicate = accepted
                .iter()
                .chain(candidates.iter())
                .any(|p| p.nodes == candidate.nodes);
            if !duplicate {
                candidates.push(candidate);
            }
        }

        // accept the cheapest candidate; the first one wins on ties
        let mut best: Option<(usize, f64)> = None;
        for (idx, c) in candidates.iter().enumerate() {
            let cost = path_cost(topology, c, weight);
            if best.map(|(_, b)| cost < b).unwrap_or(true) {
                best = Some((idx, cost));
            }
        }
        match best {
            Some((idx, _)) => accepted.push(candidates.remove(idx)),
            None => break,
        }
    }
    accepted
}

/// Greedy link-disjoint search: repeatedly compute a shortest path and exclude all of its links
/// from the next round. Returns at most `k` pairwise link-disjoint paths. Unlike LDMR this never
/// re-randomizes weights, so it is cheap but blind to load.
pub fn disjoint_shortest_paths(
    topology: &Topology,
    source: &NodeId,
    destination: &NodeId,
    k: usize,
    weight: WeightKind,
) -> Vec<Path> {
    let mut excluded: HashSet<LinkKey> = HashSet::new();
    let mut paths = Vec::new();
    for _ in 0..k {
        match shortest_path(topology, source, destination, weight, &excluded) {
            Some(p) => {
                excluded.extend(p.links.iter().cloned());
                paths.push(p);
            }
            None => break,
        }
    }
    paths
}

/// Whether all given paths are pairwise link-disjoint.
pub fn all_link_disjoint(paths: &[Path]) -> bool {
    let mut seen: HashSet<&LinkKey> = HashSet::new();
    for path in paths {
        for key in &path.links {
            if !seen.insert(key) {
                return false;
            }
        }
    }
    true
}

fn not_nan(x: f64) -> Option<NotNan<f64>> {
    NotNan::new(x).ok()
}

fn all_distinct(nodes: &[NodeId]) -> bool {
    let mut seen: HashSet<&NodeId> = HashSet::with_capacity(nodes.len());
    nodes.iter().all(|n| seen.insert(n))
}
