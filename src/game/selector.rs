//! Target selection without replacement.

use crate::dataset::RegionId;
use crate::rng::Rng;

const WORD_BITS: usize = 64;

/// Draws each region once per game.
///
/// The id list never changes order; visited regions are tracked in a bitset
/// indexed by position, so drawing never reshuffles the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundSelector {
    ids: Vec<RegionId>,
    visited: Vec<u64>,
    visited_count: usize,
}

impl RoundSelector {
    /// Create a selector over a fixed list of ids, none visited.
    #[must_use]
    pub fn new(ids: Vec<RegionId>) -> Self {
        let words = ids.len().div_ceil(WORD_BITS);
        Self {
            ids,
            visited: vec![0; words],
            visited_count: 0,
        }
    }

    /// Number of ids in the pool.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the pool has no ids at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Id at a position.
    #[must_use]
    pub fn id(&self, index: usize) -> Option<&str> {
        self.ids.get(index).map(String::as_str)
    }

    /// Number of ids drawn so far this game.
    #[must_use]
    pub const fn visited_count(&self) -> usize {
        self.visited_count
    }

    /// Whether every id has been drawn.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.visited_count >= self.ids.len()
    }

    /// Whether the id at `index` has been drawn.
    #[must_use]
    pub fn is_visited(&self, index: usize) -> bool {
        self.visited
            .get(index / WORD_BITS)
            .is_some_and(|w| w & (1u64 << (index % WORD_BITS)) != 0)
    }

    /// Whether an id has been drawn.
    #[must_use]
    pub fn is_visited_id(&self, id: &str) -> bool {
        self.ids
            .iter()
            .position(|i| i == id)
            .is_some_and(|index| self.is_visited(index))
    }

    /// Positions not yet drawn, in order.
    pub fn unvisited(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.ids.len()).filter(|i| !self.is_visited(*i))
    }

    /// Pick an unvisited position uniformly at random.
    ///
    /// Returns `None` once the pool is exhausted. Does not mark the pick.
    pub fn pick_unvisited(&self, rng: &mut Rng) -> Option<usize> {
        let remaining = self.ids.len() - self.visited_count;
        if remaining == 0 {
            return None;
        }
        let nth = rng.next_index(remaining);
        self.unvisited().nth(nth)
    }

    /// Mark a position as drawn. Returns false if it already was or is out of range.
    pub fn mark_visited(&mut self, index: usize) -> bool {
        if index >= self.ids.len() || self.is_visited(index) {
            return false;
        }
        self.visited[index / WORD_BITS] |= 1u64 << (index % WORD_BITS);
        self.visited_count += 1;
        true
    }

    /// Forget all draws.
    pub fn reset(&mut self) {
        self.visited.fill(0);
        self.visited_count = 0;
    }
}
