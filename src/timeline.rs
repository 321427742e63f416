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

//! Time series of topology snapshots. A LEO network changes as the satellites move; the
//! [`Timeline`] holds the topology frozen at fixed time steps, each snapshot owning an
//! independent deep copy.

use crate::topology::Topology;

/// The topology at a fixed point in simulated time, valid for `duration_s` seconds. Snapshots
/// are immutable once added to a [`Timeline`].
#[derive(Clone, Debug)]
pub struct TopologySnapshot {
    timestamp_s: f64,
    duration_s: f64,
    topology: Topology,
}

impl TopologySnapshot {
    /// Create a snapshot owning the given topology.
    pub fn new(timestamp_s: f64, duration_s: f64, topology: Topology) -> Self {
        Self {
            timestamp_s,
            duration_s,
            topology,
        }
    }

    /// The simulation time at which this snapshot starts.
    pub fn timestamp_s(&self) -> f64 {
        self.timestamp_s
    }

    /// How long this snapshot remains valid.
    pub fn duration_s(&self) -> f64 {
        self.duration_s
    }

    /// The simulation time at which this snapshot ends.
    pub fn end_time_s(&self) -> f64 {
        self.timestamp_s + self.duration_s
    }

    /// Whether time `t` falls into the interval covered by this snapshot.
    pub fn covers(&self, t: f64) -> bool {
        self.timestamp_s <= t && t <= self.end_time_s()
    }

    /// The frozen topology.
    pub fn topology(&self) -> &Topology {
        &self.topology
    }
}

impl std::fmt::Display for TopologySnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TopologySnapshot(t={:.2}s, duration={:.2}s, links={})",
            self.timestamp_s,
            self.duration_s,
            self.topology.num_links()
        )
    }
}

/// An ordered list of topology snapshots covering a simulated window in fixed steps, with a
/// cursor for stepping through the simulation.
#[derive(Clone, Debug)]
pub struct Timeline {
    step_s: f64,
    snapshots: Vec<TopologySnapshot>,
    cursor: usize,
}

impl Timeline {
    /// Create an empty timeline with the given step (the duration of each snapshot).
    pub fn new(step_s: f64) -> Self {
        Self {
            step_s,
            snapshots: Vec::new(),
            cursor: 0,
        }
    }

    /// Append a snapshot starting right after the last one.
    pub fn push(&mut self, topology: Topology) -> &TopologySnapshot {
        let timestamp = self.snapshots.len() as f64 * self.step_s;
        self.push_at(topology, timestamp)
    }

    /// Append a snapshot starting at an explicit timestamp.
    pub fn push_at(&mut self, topology: Topology, timestamp_s: f64) -> &TopologySnapshot {
        self.snapshots
            .push(TopologySnapshot::new(timestamp_s, self.step_s, topology));
        &self.snapshots[self.snapshots.len() - 1]
    }

    /// The snapshot covering simulation time `t`, if any (linear scan).
    pub fn snapshot_at(&self, t: f64) -> Option<&TopologySnapshot> {
        self.snapshots.iter().find(|s| s.covers(t))
    }

    /// The snapshot the cursor currently points at.
    pub fn current(&self) -> Option<&TopologySnapshot> {
        self.snapshots.get(self.cursor)
    }

    /// Advance the cursor to the next snapshot and return it, or `None` (leaving the cursor
    /// unchanged) if the timeline is exhausted.
    pub fn advance(&mut self) -> Option<&TopologySnapshot> {
        if self.cursor + 1 < self.snapshots.len() {
            self.cursor += 1;
            self.current()
        } else {
            None
        }
    }

    /// Reset the cursor to the first snapshot.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// The snapshot step in seconds.
    pub fn step_s(&self) -> f64 {
        self.step_s
    }

    /// Number of snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether the timeline holds no snapshots.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Total simulated duration covered by all snapshots.
    pub fn total_duration_s(&self) -> f64 {
        self.snapshots.len() as f64 * self.step_s
    }

    /// Iterate over all snapshots in time order.
    pub fn iter(&self) -> impl Iterator<Item = &TopologySnapshot> {
        self.snapshots.iter()
    }
}
