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

//! Aggregation of per-demand routing results into per-algorithm metric bundles. The numbers
//! computed here are consumed by external exporters; formatting and persistence live outside
//! the core.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_with::{As, Same};

use crate::types::{LinkKey, MultiPathResult, NodeId};

/// Minimum, mean and maximum of a sample.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct SummaryStat {
    /// Smallest observed value.
    pub min: f64,
    /// Arithmetic mean.
    pub mean: f64,
    /// Largest observed value.
    pub max: f64,
}

impl SummaryStat {
    /// Summarize a sample, or `None` if it is empty.
    pub fn over(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for &v in values {
            min = min.min(v);
            max = max.max(v);
            sum += v;
        }
        Some(Self {
            min,
            mean: sum / values.len() as f64,
            max,
        })
    }
}

/// Mean, total and maximum of the per-demand computation times.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct TimingStat {
    /// Mean computation time per demand.
    pub mean: Duration,
    /// Total computation time over all demands.
    pub total: Duration,
    /// Longest computation time of a single demand.
    pub max: Duration,
}

impl TimingStat {
    /// Summarize the computation times, or `None` if the sample is empty.
    pub fn over(values: &[Duration]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let total: Duration = values.iter().sum();
        let max = values.iter().copied().max().unwrap_or_default();
        Some(Self {
            mean: total / values.len() as u32,
            total,
            max,
        })
    }
}

/// Distribution of link usage counts, as tracked by LDMR.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct LinkUsageSummary {
    /// Number of distinct links with a non-zero usage count.
    pub links_used: usize,
    /// Mean usage count over those links.
    pub mean_usage: f64,
    /// Highest usage count of any link.
    pub max_usage: u32,
    /// The full per-link distribution.
    #[serde(with = "As::<Vec<(Same, Same)>>")]
    pub distribution: HashMap<LinkKey, u32>,
}

impl LinkUsageSummary {
    /// Summarize a usage-counter map, or `None` if it is empty.
    pub fn over(usage: &HashMap<LinkKey, u32>) -> Option<Self> {
        if usage.is_empty() {
            return None;
        }
        let total: u64 = usage.values().map(|&u| u as u64).sum();
        Some(Self {
            links_used: usage.len(),
            mean_usage: total as f64 / usage.len() as f64,
            max_usage: usage.values().copied().max().unwrap_or_default(),
            distribution: usage.clone(),
        })
    }
}

/// A single violation found by the disjointness audit: a link appearing in more than one path
/// of the same result.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct DisjointnessConflict {
    /// Source of the offending result.
    pub source: NodeId,
    /// Destination of the offending result.
    pub destination: NodeId,
    /// Index of the path (within the result) that re-used the link.
    pub path_index: usize,
    /// The shared link.
    pub link: LinkKey,
}

/// Outcome of auditing the pairwise link-disjointness of all multi-path results. A correct LDMR
/// run has `violations == 0`; anything else is an internal bug, reported here rather than
/// silently dropped.
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct DisjointnessAudit {
    /// Number of results with at least two paths that were checked.
    pub results_checked: usize,
    /// Number of checked results whose paths are pairwise link-disjoint.
    pub disjoint_results: usize,
    /// Number of checked results with at least one shared link.
    pub violations: usize,
    /// Fraction of checked results that are disjoint (1 if nothing was checked).
    pub disjoint_rate: f64,
    /// Every shared link found.
    pub conflicts: Vec<DisjointnessConflict>,
}

/// Verify the pairwise link-disjointness of every multi-path result.
pub fn audit_disjointness(results: &[MultiPathResult]) -> DisjointnessAudit {
    let mut audit = DisjointnessAudit {
        disjoint_rate: 1.0,
        ..Default::default()
    };
    for result in results {
        if !result.success || result.paths.len() < 2 {
            continue;
        }
        audit.results_checked += 1;
        let mut seen: HashSet<&LinkKey> = HashSet::new();
        let mut disjoint = true;
        for (path_index, path) in result.paths.iter().enumerate() {
            for link in &path.links {
                if !seen.insert(link) {
                    disjoint = false;
                    audit.conflicts.push(DisjointnessConflict {
                        source: result.source.clone(),
                        destination: result.destination.clone(),
                        path_index,
                        link: link.clone(),
                    });
                }
            }
        }
        if disjoint {
            audit.disjoint_results += 1;
        } else {
            audit.violations += 1;
        }
    }
    if audit.results_checked > 0 {
        audit.disjoint_rate = audit.disjoint_results as f64 / audit.results_checked as f64;
    }
    audit
}

/// The metric bundle of a single algorithm run.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct AlgorithmReport {
    /// Name of the algorithm that produced the results.
    pub algorithm: String,
    /// Number of demands processed.
    pub total_demands: usize,
    /// Number of demands with at least one path.
    pub successful_demands: usize,
    /// Number of demands without a path.
    pub failed_demands: usize,
    /// Fraction of successful demands.
    pub success_rate: f64,
    /// Total number of paths over all successful demands.
    pub total_paths: usize,
    /// Mean number of paths per successful demand.
    pub avg_paths_per_demand: f64,
    /// Distribution of path lengths in hops (over all paths), if any path exists.
    pub path_hops: Option<SummaryStat>,
    /// Distribution of path delays in milliseconds (over all paths), if any path exists.
    pub path_delay_ms: Option<SummaryStat>,
    /// Computation-time statistics over all demands, if any demand was processed.
    pub computation_time: Option<TimingStat>,
    /// Jain fairness index of the per-link load implied by the returned paths.
    pub load_balance_index: f64,
    /// LDMR usage-counter distribution, when the algorithm tracks one.
    pub link_usage: Option<LinkUsageSummary>,
    /// Result of the link-disjointness audit.
    pub disjointness: DisjointnessAudit,
}

/// Aggregate the results of one algorithm run into a report.
pub fn summarize(algorithm: &str, results: &[MultiPathResult]) -> AlgorithmReport {
    let total_demands = results.len();
    let successful: Vec<&MultiPathResult> = results.iter().filter(|r| r.success).collect();
    let successful_demands = successful.len();

    let hops: Vec<f64> = successful
        .iter()
        .flat_map(|r| r.paths.iter().map(|p| p.hops() as f64))
        .collect();
    let delays: Vec<f64> = successful
        .iter()
        .flat_map(|r| r.paths.iter().map(|p| p.total_delay_ms))
        .collect();
    let times: Vec<Duration> = results.iter().map(|r| r.computation_time).collect();
    let total_paths = hops.len();

    AlgorithmReport {
        algorithm: algorithm.to_string(),
        total_demands,
        successful_demands,
        failed_demands: total_demands - successful_demands,
        success_rate: if total_demands == 0 {
            0.0
        } else {
            successful_demands as f64 / total_demands as f64
        },
        total_paths,
        avg_paths_per_demand: if successful_demands == 0 {
            0.0
        } else {
            total_paths as f64 / successful_demands as f64
        },
        path_hops: SummaryStat::over(&hops),
        path_delay_ms: SummaryStat::over(&delays),
        computation_time: TimingStat::over(&times),
        load_balance_index: jain_index(&link_load(results)),
        link_usage: None,
        disjointness: audit_disjointness(results),
    }
}

/// Aggregate the results of an LDMR run, attaching the usage-counter distribution.
pub fn summarize_with_usage(
    algorithm: &str,
    results: &[MultiPathResult],
    usage: &HashMap<LinkKey, u32>,
) -> AlgorithmReport {
    let mut report = summarize(algorithm, results);
    report.link_usage = LinkUsageSummary::over(usage);
    report
}

/// How often each link appears in any returned path.
fn link_load(results: &[MultiPathResult]) -> Vec<f64> {
    let mut counts: HashMap<&LinkKey, u64> = HashMap::new();
    for result in results.iter().filter(|r| r.success) {
        for path in &result.paths {
            for link in &path.links {
                *counts.entry(link).or_insert(0) += 1;
            }
        }
    }
    counts.values().map(|&c| c as f64).collect()
}

/// Jain fairness index of a load sample: `(Σx)² / (n · Σx²)`. One means perfectly even load,
/// `1/n` means all load on a single link. Zero for an empty sample.
pub fn jain_index(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sum: f64 = values.iter().sum();
    let sum_sq: f64 = values.iter().map(|v| v * v).sum();
    if sum_sq == 0.0 {
        return 0.0;
    }
    (sum * sum) / (values.len() as f64 * sum_sq)
}

/// The reports of several algorithms over the same demand set, keyed by algorithm name.
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct ReportBundle {
    reports: BTreeMap<String, AlgorithmReport>,
}

impl ReportBundle {
    /// Create an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a report, replacing any previous report of the same algorithm.
    pub fn insert(&mut self, report: AlgorithmReport) {
        self.reports.insert(report.algorithm.clone(), report);
    }

    /// Get the report of an algorithm by name.
    pub fn get(&self, algorithm: &str) -> Option<&AlgorithmReport> {
        self.reports.get(algorithm)
    }

    /// Iterate over all reports, ordered by algorithm name.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &AlgorithmReport)> {
        self.reports.iter()
    }

    /// Number of reports in the bundle.
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    /// Whether the bundle is empty.
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}
