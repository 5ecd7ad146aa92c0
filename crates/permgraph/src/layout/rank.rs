//! Rank assignment: places every node on an integer layer.
//!
//! Three steps, in order:
//! 1. A depth-first search over the canonical graph marks back edges. Those
//!    edges are reversed for ranking only.
//! 2. Longest-path ranking from the sources gives a feasible initial ranking.
//! 3. Tightening moves nodes toward the weighted median of their neighbours'
//!    preferred ranks while every ranking edge keeps a length of at least one.
//!
//! Self-loops constrain nothing and are skipped. Parallel edges each count
//! toward the length objective.

use std::collections::VecDeque;

use log::{debug, trace};

use crate::structure::{Graph, NodeIndex};

/// Sweep budget for tightening, per node.
const TIGHTEN_SWEEPS_PER_NODE: usize = 4;

/// A ranking edge: oriented from lower to higher rank, self-loops removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Link {
    pub(super) upper: usize,
    pub(super) lower: usize,
    pub(super) weight: u32,
}

/// Result of rank assignment.
#[derive(Debug, Clone)]
pub(super) struct Ranking {
    ranks: Vec<usize>,
    reversed: Vec<bool>,
    links: Vec<Link>,
}

impl Ranking {
    /// Rank of every node, by canonical node index.
    pub(super) fn ranks(&self) -> &[usize] {
        &self.ranks
    }

    /// Ranking edges in canonical order.
    pub(super) fn links(&self) -> &[Link] {
        &self.links
    }

    /// Input-order indices of the edges reversed to break cycles.
    pub(super) fn back_edges(&self) -> Vec<usize> {
        self.reversed
            .iter()
            .enumerate()
            .filter_map(|(idx, &reversed)| reversed.then_some(idx))
            .collect()
    }

    /// Number of ranks in use; zero for an empty graph.
    pub(super) fn rank_count(&self) -> usize {
        self.ranks.iter().max().map_or(0, |max| max + 1)
    }

    /// Nodes grouped by rank, each group in canonical order.
    pub(super) fn layers(&self) -> Vec<Vec<usize>> {
        let mut layers = vec![Vec::new(); self.rank_count()];
        for (node, &rank) in self.ranks.iter().enumerate() {
            layers[rank].push(node);
        }
        layers
    }
}

/// Assigns a rank to every node of `graph`.
pub(super) fn assign_ranks(graph: &Graph) -> Ranking {
    let node_count = graph.nodes_count();
    let reversed = find_back_edges(graph);

    let links: Vec<Link> = graph
        .canonical_edges()
        .filter_map(|edge| {
            let (source, target) = graph.endpoints(edge);
            if source == target {
                return None;
            }
            let (upper, lower) = if reversed[edge.index()] {
                (target, source)
            } else {
                (source, target)
            };
            Some(Link {
                upper: upper.index(),
                lower: lower.index(),
                weight: graph.edge_at(edge).weight(),
            })
        })
        .collect();

    let mut ranks = longest_path(node_count, &links);
    trace!(ranks:?; "Initial longest-path ranking");

    let sweeps = tighten(&mut ranks, &links, TIGHTEN_SWEEPS_PER_NODE * node_count);
    normalize(&mut ranks);

    let ranking = Ranking {
        ranks,
        reversed,
        links,
    };
    debug!(
        ranks = ranking.rank_count(),
        back_edges = ranking.back_edges().len(),
        tighten_sweeps = sweeps;
        "Ranks assigned"
    );
    ranking
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unvisited,
    Active,
    Done,
}

/// Marks every DFS back edge. Indexed by input-order edge index.
///
/// The search starts from each unvisited node in canonical order and follows
/// outgoing edges in canonical order, so the set of back edges depends only
/// on the graph's structure.
fn find_back_edges(graph: &Graph) -> Vec<bool> {
    let mut reversed = vec![false; graph.edges_count()];
    let mut state = vec![Visit::Unvisited; graph.nodes_count()];
    let mut stack: Vec<(NodeIndex, usize)> = Vec::new();

    for start in graph.node_indices() {
        if state[start.index()] != Visit::Unvisited {
            continue;
        }
        state[start.index()] = Visit::Active;
        stack.push((start, 0));

        while let Some(frame) = stack.last_mut() {
            let node = frame.0;
            let Some(&edge) = graph.outgoing(node).get(frame.1) else {
                state[node.index()] = Visit::Done;
                stack.pop();
                continue;
            };
            frame.1 += 1;

            let (_, target) = graph.endpoints(edge);
            if target == node {
                continue;
            }
            match state[target.index()] {
                Visit::Unvisited => {
                    state[target.index()] = Visit::Active;
                    stack.push((target, 0));
                }
                Visit::Active => reversed[edge.index()] = true,
                Visit::Done => {}
            }
        }
    }

    reversed
}

/// Longest path from the sources: sources get rank 0, every other node one
/// more than its highest-ranked predecessor.
///
/// `links` must be acyclic.
fn longest_path(node_count: usize, links: &[Link]) -> Vec<usize> {
    let mut successors = vec![Vec::new(); node_count];
    let mut in_degree = vec![0usize; node_count];
    for link in links {
        successors[link.upper].push(link.lower);
        in_degree[link.lower] += 1;
    }

    let mut ranks = vec![0usize; node_count];
    let mut queue: VecDeque<usize> = (0..node_count).filter(|&n| in_degree[n] == 0).collect();
    while let Some(node) = queue.pop_front() {
        for &next in &successors[node] {
            ranks[next] = ranks[next].max(ranks[node] + 1);
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                queue.push_back(next);
            }
        }
    }

    ranks
}

/// Pulls nodes toward the weighted median of their neighbours until no node
/// moves or `max_sweeps` sweeps have run. Returns the number of sweeps.
///
/// A node's in-neighbour `u` prefers it at `rank(u) + 1` and an out-neighbour
/// `w` at `rank(w) - 1`. The target is clamped to the interval allowed by the
/// node's current neighbours, and the move happens only if it strictly lowers
/// the weighted edge length around the node. Every move lowers the total, so
/// the loop terminates even without the sweep cap.
fn tighten(ranks: &mut [usize], links: &[Link], max_sweeps: usize) -> usize {
    let mut incoming = vec![Vec::new(); ranks.len()];
    let mut outgoing = vec![Vec::new(); ranks.len()];
    for link in links {
        incoming[link.lower].push((link.upper, link.weight));
        outgoing[link.upper].push((link.lower, link.weight));
    }

    let mut sweeps = 0;
    while sweeps < max_sweeps {
        sweeps += 1;
        let mut moved = false;

        for node in 0..ranks.len() {
            if incoming[node].is_empty() && outgoing[node].is_empty() {
                continue;
            }

            let lowest = incoming[node]
                .iter()
                .map(|&(upper, _)| ranks[upper] + 1)
                .max()
                .unwrap_or(0);
            let highest = outgoing[node]
                .iter()
                .map(|&(lower, _)| ranks[lower].saturating_sub(1))
                .min()
                .unwrap_or(usize::MAX);

            let preferred: Vec<(usize, u32)> = incoming[node]
                .iter()
                .map(|&(upper, weight)| (ranks[upper] + 1, weight))
                .chain(
                    outgoing[node]
                        .iter()
                        .map(|&(lower, weight)| (ranks[lower].saturating_sub(1), weight)),
                )
                .collect();
            let Some((median_low, median_high)) = weighted_median(preferred) else {
                continue;
            };

            let current = ranks[node];
            let target = current.clamp(median_low, median_high).clamp(lowest, highest);
            if target == current {
                continue;
            }

            let in_weight: i64 = incoming[node].iter().map(|&(_, w)| i64::from(w)).sum();
            let out_weight: i64 = outgoing[node].iter().map(|&(_, w)| i64::from(w)).sum();
            let shift = target as i64 - current as i64;
            if (in_weight - out_weight) * shift < 0 {
                ranks[node] = target;
                moved = true;
            }
        }

        if !moved {
            break;
        }
    }

    sweeps
}

/// Returns the interval of weighted medians of `samples`, or `None` if the
/// total weight is zero.
///
/// Any value in the returned interval minimises the weighted sum of
/// distances to the samples.
fn weighted_median(mut samples: Vec<(usize, u32)>) -> Option<(usize, usize)> {
    let total: u64 = samples.iter().map(|&(_, w)| u64::from(w)).sum();
    if total == 0 {
        return None;
    }
    samples.sort_unstable();

    let mut low = None;
    let mut high = None;
    let mut below = 0u64;
    for &(value, weight) in &samples {
        if weight == 0 {
            continue;
        }
        let above = total - below - u64::from(weight);
        if low.is_none() && 2 * (below + u64::from(weight)) >= total {
            low = Some(value);
        }
        if 2 * (above + u64::from(weight)) >= total {
            high = Some(value);
        }
        below += u64::from(weight);
    }

    low.zip(high)
}

/// Shifts ranks so the smallest is 0 and squeezes out unused ranks.
///
/// Removing an empty rank shortens every edge spanning it by one; edges that
/// span an empty rank are at least two long, so all constraints still hold.
fn normalize(ranks: &mut [usize]) {
    let mut used: Vec<usize> = ranks.to_vec();
    used.sort_unstable();
    used.dedup();

    for rank in ranks.iter_mut() {
        *rank = used.partition_point(|&r| r < *rank);
    }
}
