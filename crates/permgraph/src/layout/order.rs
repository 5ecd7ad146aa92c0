//! Crossing minimisation: chooses the left-to-right order inside each rank.
//!
//! Each iteration is one median sweep (downward on even iterations, upward on
//! odd ones) followed by a transpose step. The ordering with the fewest
//! crossings is kept; a later iteration only replaces it when it is strictly
//! better, so ties go to the earliest ordering.
//!
//! A link spanning several ranks is split into a chain of virtual nodes, one
//! on every rank it passes through. Virtual nodes are ordered and counted like
//! real ones. Ranks are never changed.

use log::{debug, trace};

use super::rank::Ranking;

/// The chosen order of every rank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Ordering {
    layers: Vec<Vec<usize>>,
    real: usize,
    crossings: usize,
}

impl Ordering {
    /// Node indices of every rank, left to right, virtual nodes included.
    pub(super) fn layers(&self) -> &[Vec<usize>] {
        &self.layers
    }

    /// Crossings between adjacent ranks in this ordering, counting the
    /// segments of split links.
    pub(super) fn crossings(&self) -> usize {
        self.crossings
    }

    /// Order index of every real node among the real nodes of its rank, by
    /// canonical node index.
    pub(super) fn positions(&self) -> Vec<usize> {
        let mut positions = vec![0; self.real];
        for layer in &self.layers {
            let real = layer.iter().filter(|&&node| node < self.real);
            for (idx, &node) in real.enumerate() {
                positions[node] = idx;
            }
        }
        positions
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Down,
    Up,
}

/// The ranked graph with every link cut into one-rank segments.
///
/// Real nodes keep their canonical indices; virtual nodes follow them.
/// Parallel links appear once per link.
#[derive(Debug)]
pub(super) struct Adjacency {
    layers: Vec<Vec<usize>>,
    real: usize,
    upper: Vec<Vec<usize>>,
    lower: Vec<Vec<usize>>,
}

impl Adjacency {
    pub(super) fn new(ranking: &Ranking) -> Self {
        let ranks = ranking.ranks();
        let real = ranks.len();
        let mut layers = ranking.layers();
        let mut upper = vec![Vec::new(); real];
        let mut lower = vec![Vec::new(); real];

        for link in ranking.links() {
            let mut above = link.upper;
            for rank in ranks[link.upper] + 1..ranks[link.lower] {
                let node = upper.len();
                upper.push(vec![above]);
                lower.push(Vec::new());
                lower[above].push(node);
                layers[rank].push(node);
                above = node;
            }
            upper[link.lower].push(above);
            lower[above].push(link.lower);
        }

        trace!(real, virtual_nodes = upper.len() - real; "Links split into segments");
        Self {
            layers,
            real,
            upper,
            lower,
        }
    }

    /// Number of real nodes. Indices at or above this are virtual.
    pub(super) fn real_count(&self) -> usize {
        self.real
    }

    /// Number of real and virtual nodes.
    pub(super) fn node_count(&self) -> usize {
        self.upper.len()
    }

    /// Neighbours of `node` in the rank above.
    pub(super) fn upper(&self, node: usize) -> &[usize] {
        &self.upper[node]
    }

    /// Neighbours of `node` in the rank below.
    pub(super) fn lower(&self, node: usize) -> &[usize] {
        &self.lower[node]
    }

    fn neighbours(&self, node: usize, direction: Direction) -> &[usize] {
        match direction {
            Direction::Down => &self.upper[node],
            Direction::Up => &self.lower[node],
        }
    }
}

/// Orders every rank of `adjacency`, running at most `max_iterations`
/// median + transpose iterations.
///
/// The starting order is canonical: real nodes in id order, then virtual
/// nodes in link order. Iteration stops early once an ordering without
/// crossings is found.
pub(super) fn order(adjacency: &Adjacency, max_iterations: usize) -> Ordering {
    let mut layers = adjacency.layers.clone();
    let mut positions = positions_of(&layers);

    let mut best = Ordering {
        crossings: count_crossings(&layers, &positions, adjacency),
        layers: layers.clone(),
        real: adjacency.real,
    };
    trace!(crossings = best.crossings; "Initial ordering");

    let mut iterations = 0;
    while iterations < max_iterations && best.crossings > 0 {
        let direction = if iterations % 2 == 0 {
            Direction::Down
        } else {
            Direction::Up
        };
        median_sweep(&mut layers, &mut positions, adjacency, direction);
        transpose(&mut layers, &mut positions, adjacency);

        let crossings = count_crossings(&layers, &positions, adjacency);
        trace!(iteration = iterations, direction:?, crossings; "Ordering iteration");
        if crossings < best.crossings {
            best = Ordering {
                layers: layers.clone(),
                real: adjacency.real,
                crossings,
            };
        }
        iterations += 1;
    }

    debug!(crossings = best.crossings, iterations; "Rank order chosen");
    best
}

/// Re-sorts each rank by the median position of its neighbours in the rank
/// processed just before it.
///
/// A node without such neighbours keys on its own current position. Equal
/// keys keep the current relative order.
fn median_sweep(
    layers: &mut [Vec<usize>],
    positions: &mut [usize],
    adjacency: &Adjacency,
    direction: Direction,
) {
    let ranks: Vec<usize> = match direction {
        Direction::Down => (1..layers.len()).collect(),
        Direction::Up => (0..layers.len().saturating_sub(1)).rev().collect(),
    };

    for rank in ranks {
        let mut keyed: Vec<(f64, usize, usize)> = layers[rank]
            .iter()
            .map(|&node| {
                let key = median(
                    adjacency
                        .neighbours(node, direction)
                        .iter()
                        .map(|&n| positions[n]),
                )
                .unwrap_or(positions[node] as f64);
                (key, positions[node], node)
            })
            .collect();
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        layers[rank] = keyed.into_iter().map(|(_, _, node)| node).collect();
        for (idx, &node) in layers[rank].iter().enumerate() {
            positions[node] = idx;
        }
    }
}

/// Median of `values`; the mean of the two middle values for an even count.
fn median(values: impl Iterator<Item = usize>) -> Option<f64> {
    let mut values: Vec<usize> = values.collect();
    if values.is_empty() {
        return None;
    }
    values.sort_unstable();

    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid] as f64)
    } else {
        Some((values[mid - 1] + values[mid]) as f64 / 2.0)
    }
}

/// Swaps adjacent nodes whenever that strictly lowers the crossings they take
/// part in. Each rank is swept at most `len + 1` times.
fn transpose(layers: &mut [Vec<usize>], positions: &mut [usize], adjacency: &Adjacency) {
    for layer in layers.iter_mut() {
        for _ in 0..=layer.len() {
            let mut improved = false;
            for idx in 1..layer.len() {
                let (left, right) = (layer[idx - 1], layer[idx]);
                let kept = pair_crossings(left, right, positions, adjacency);
                let swapped = pair_crossings(right, left, positions, adjacency);
                if swapped < kept {
                    layer.swap(idx - 1, idx);
                    positions[left] = idx;
                    positions[right] = idx - 1;
                    improved = true;
                }
            }
            if !improved {
                break;
            }
        }
    }
}

/// Crossings among the links of `left` and `right` when `left` is placed
/// directly before `right`.
fn pair_crossings(left: usize, right: usize, positions: &[usize], adjacency: &Adjacency) -> usize {
    let side = |left: &[usize], right: &[usize]| -> usize {
        left.iter()
            .map(|&a| right.iter().filter(|&&b| positions[b] < positions[a]).count())
            .sum()
    };
    side(adjacency.upper(left), adjacency.upper(right))
        + side(adjacency.lower(left), adjacency.lower(right))
}

/// Total crossings between every pair of adjacent ranks.
fn count_crossings(layers: &[Vec<usize>], positions: &[usize], adjacency: &Adjacency) -> usize {
    layers
        .iter()
        .zip(layers.iter().skip(1))
        .map(|(upper, lower)| {
            let mut pairs: Vec<(usize, usize)> = upper
                .iter()
                .flat_map(|&u| {
                    adjacency
                        .lower(u)
                        .iter()
                        .map(move |&l| (positions[u], positions[l]))
                })
                .collect();
            pairs.sort_unstable();
            count_inversions(pairs.into_iter().map(|(_, l)| l), lower.len())
        })
        .sum()
}

/// Counts pairs `i < j` with `values[i] > values[j]`, using a Fenwick tree.
/// Every value must be below `bound`.
fn count_inversions(values: impl Iterator<Item = usize>, bound: usize) -> usize {
    let mut tree = vec![0usize; bound + 1];
    let mut seen = 0;
    let mut inversions = 0;

    for value in values {
        let mut idx = value + 1;
        let mut not_greater = 0;
        while idx > 0 {
            not_greater += tree[idx];
            idx &= idx - 1;
        }
        inversions += seen - not_greater;

        let mut idx = value + 1;
        while idx <= bound {
            tree[idx] += 1;
            idx += idx & idx.wrapping_neg();
        }
        seen += 1;
    }

    inversions
}

fn positions_of(layers: &[Vec<usize>]) -> Vec<usize> {
    let mut positions = vec![0; layers.iter().map(Vec::len).sum()];
    for layer in layers {
        for (idx, &node) in layer.iter().enumerate() {
            positions[node] = idx;
        }
    }
    positions
}
