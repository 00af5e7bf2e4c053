//! Cross-channel agreement on segment boundaries.

use std::collections::BTreeSet;

use super::SegmentSpan;

/// Merges the per-channel boundary candidates into one boundary list that
/// enough channels agree on.
///
/// Boundaries from different channels rarely land on the same index, so
/// nearby candidates are grouped within a tolerance and each surviving
/// group is collapsed to a single representative index.
pub struct ConsensusAggregator {
    tolerance: usize,
    threshold: f64,
}

/// A candidate boundary cluster and the channels that voted for it.
struct Cluster {
    members: Vec<usize>,
    channels: BTreeSet<usize>,
}

impl ConsensusAggregator {
    pub fn new(tolerance: usize, threshold: f64) -> Self {
        Self {
            tolerance,
            threshold,
        }
    }

    /// Reduce per-channel spans to consensus spans.
    ///
    /// Returns `None` when fewer than two boundary representatives survive,
    /// since a single index cannot bound a segment. The returned spans tile
    /// the index range between the first and last representative without
    /// gaps or overlap.
    pub fn consensus_ranges(&self, channels: &[Vec<SegmentSpan>]) -> Option<Vec<SegmentSpan>> {
        if channels.is_empty() {
            return None;
        }

        let mut clusters: Vec<Cluster> = Vec::new();
        for (channel_id, spans) in channels.iter().enumerate() {
            let indexes: Vec<usize> = spans
                .iter()
                .flat_map(|span| [span.start, span.end])
                .collect();
            for group in self.group_indexes(&indexes) {
                let found = clusters.iter().position(|cluster| {
                    cluster.members.iter().any(|member| {
                        group
                            .iter()
                            .any(|index| member.abs_diff(*index) <= self.tolerance)
                    })
                });
                match found {
                    Some(at) => {
                        clusters[at].members.extend(group.iter().copied());
                        clusters[at].channels.insert(channel_id);
                    }
                    None => clusters.push(Cluster {
                        members: group,
                        channels: BTreeSet::from([channel_id]),
                    }),
                }
            }
        }

        let required = (self.threshold * channels.len() as f64).round() as usize;
        clusters.retain(|cluster| cluster.channels.len() >= required);

        let mut representatives: Vec<usize> = clusters
            .iter()
            .map(|cluster| collapse(&cluster.members))
            .collect();
        representatives.sort_unstable();
        representatives.dedup();
        if representatives.len() < 2 {
            return None;
        }

        let mut ranges = vec![SegmentSpan {
            start: representatives[0],
            end: representatives[1],
        }];
        for pair in representatives[1..].windows(2) {
            ranges.push(SegmentSpan {
                start: pair[0] + 1,
                end: pair[1],
            });
        }
        Some(ranges)
    }

    /// Cluster sorted-ish boundary indexes from a single channel: an index
    /// joins the current group when it is within tolerance of any member.
    fn group_indexes(&self, indexes: &[usize]) -> Vec<Vec<usize>> {
        let mut groups: Vec<Vec<usize>> = Vec::new();
        let mut current: Vec<usize> = Vec::new();
        for index in indexes {
            if current.is_empty()
                || current
                    .iter()
                    .any(|member| member.abs_diff(*index) <= self.tolerance)
            {
                current.push(*index);
            } else {
                groups.push(std::mem::take(&mut current));
                current.push(*index);
            }
        }
        if !current.is_empty() {
            groups.push(current);
        }
        groups
    }
}

/// Pick one representative index for a cluster.
fn collapse(members: &[usize]) -> usize {
    let mut sorted = members.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    match sorted.len() {
        1 => sorted[0],
        2 => {
            let (a, b) = (sorted[0], sorted[1]);
            match b - a {
                1 => b,
                2 => a + 1,
                _ => (a + b).div_ceil(2),
            }
        }
        _ => (sorted[0] + sorted[sorted.len() - 1]) / 2,
    }
}
