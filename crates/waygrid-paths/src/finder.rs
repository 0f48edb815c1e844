use std::cmp::Ordering;

use waygrid_core::{NavGrid, Point, Range, Vec3};

use crate::heap::{HeapItem, IndexedHeap};

/// A cell chain found by A*, from start to goal inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    pub cells: Vec<Point>,
    /// Accumulated cost of the goal cell.
    pub cost: i32,
}

/// A [`Path`] resolved against a [`NavGrid`], with its waypoints.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub path: Path,
    /// World positions of the cells where the path turns, then the goal.
    pub waypoints: Vec<Vec3>,
}

/// Lifecycle of the most recent search run by a [`PathFinder`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SearchState {
    #[default]
    Idle,
    Running,
    Succeeded,
    Failed,
}

// ---------------------------------------------------------------------------
// Per-run scratch
// ---------------------------------------------------------------------------

pub(crate) const NO_PARENT: usize = usize::MAX;

/// Search state of one cell. Only meaningful when `generation` matches the
/// finder's current run.
#[derive(Clone, Debug)]
pub(crate) struct SearchNode {
    pub(crate) g: i32,
    pub(crate) h: i32,
    pub(crate) parent: usize,
    pub(crate) heap_index: usize,
    pub(crate) generation: u32,
    pub(crate) closed: bool,
}

impl SearchNode {
    #[inline]
    pub(crate) fn f(&self) -> i32 {
        self.g.saturating_add(self.h)
    }
}

impl Default for SearchNode {
    fn default() -> Self {
        Self {
            g: 0,
            h: 0,
            parent: NO_PARENT,
            heap_index: usize::MAX,
            generation: 0,
            closed: false,
        }
    }
}

impl HeapItem for SearchNode {
    #[inline]
    fn heap_index(&self) -> usize {
        self.heap_index
    }

    #[inline]
    fn set_heap_index(&mut self, index: usize) {
        self.heap_index = index;
    }

    /// Lower `f` ranks higher; ties go to the lower `h`.
    #[inline]
    fn priority_cmp(&self, other: &Self) -> Ordering {
        other.f().cmp(&self.f()).then(other.h.cmp(&self.h))
    }
}

// ---------------------------------------------------------------------------
// PathFinder
// ---------------------------------------------------------------------------

/// Reusable A* state for one grid rectangle.
///
/// `PathFinder` owns the open list and a scratch node per cell, so repeated
/// searches allocate nothing beyond their result. Scratch nodes are
/// invalidated lazily by bumping a generation counter at the start of each
/// run.
pub struct PathFinder {
    pub(crate) rng: Range,
    pub(crate) width: usize,
    pub(crate) nodes: Vec<SearchNode>,
    pub(crate) generation: u32,
    pub(crate) open: IndexedHeap,
    pub(crate) nbuf: Vec<Point>,
    pub(crate) state: SearchState,
}

impl PathFinder {
    /// Create a finder for the given grid rectangle.
    pub fn new(rng: Range) -> Self {
        let len = rng.len();
        Self {
            rng,
            width: rng.width().max(0) as usize,
            nodes: vec![SearchNode::default(); len],
            generation: 0,
            open: IndexedHeap::with_capacity(len),
            nbuf: Vec::with_capacity(8),
            state: SearchState::Idle,
        }
    }

    /// Create a finder sized for `grid`.
    pub fn for_grid(grid: &NavGrid) -> Self {
        Self::new(grid.range())
    }

    /// The grid rectangle being searched.
    #[inline]
    pub fn range(&self) -> Range {
        self.rng
    }

    /// Outcome of the latest search, or `Idle` before the first one.
    #[inline]
    pub fn state(&self) -> SearchState {
        self.state
    }

    /// Convert a `Point` to a flat index. Returns `None` if out of range.
    #[inline]
    pub(crate) fn idx(&self, p: Point) -> Option<usize> {
        if !self.rng.contains(p) {
            return None;
        }
        let x = (p.x - self.rng.min.x) as usize;
        let y = (p.y - self.rng.min.y) as usize;
        Some(y * self.width + x)
    }

    /// Convert a flat index back to a `Point`.
    #[inline]
    pub(crate) fn point(&self, idx: usize) -> Point {
        let x = (idx % self.width) as i32 + self.rng.min.x;
        let y = (idx / self.width) as i32 + self.rng.min.y;
        Point::new(x, y)
    }

    /// Start a new run: every node from earlier runs becomes stale.
    pub(crate) fn next_generation(&mut self) -> u32 {
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            // Wrapped: stale nodes could alias the new generation.
            for node in &mut self.nodes {
                *node = SearchNode::default();
            }
            self.generation = 1;
        }
        self.open.clear();
        self.generation
    }

    /// Reset `idx` if it still carries data from an earlier run.
    #[inline]
    pub(crate) fn touch(&mut self, idx: usize, generation: u32) {
        let node = &mut self.nodes[idx];
        if node.generation != generation {
            *node = SearchNode {
                generation,
                ..SearchNode::default()
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idx_point_round_trip() {
        let pf = PathFinder::new(Range::new(2, 3, 7, 9));
        assert_eq!(pf.idx(Point::new(2, 3)), Some(0));
        assert_eq!(pf.idx(Point::new(7, 3)), None);
        for (i, p) in pf.range().iter().enumerate() {
            assert_eq!(pf.idx(p), Some(i));
            assert_eq!(pf.point(i), p);
        }
    }

    #[test]
    fn touch_resets_stale_nodes_only() {
        let mut pf = PathFinder::new(Range::new(0, 0, 2, 2));
        let g1 = pf.next_generation();
        pf.touch(0, g1);
        pf.nodes[0].g = 42;
        pf.touch(0, g1);
        assert_eq!(pf.nodes[0].g, 42);

        let g2 = pf.next_generation();
        pf.touch(0, g2);
        assert_eq!(pf.nodes[0].g, 0);
        assert_eq!(pf.nodes[0].parent, NO_PARENT);
        assert_eq!(pf.nodes[0].generation, g2);
    }

    #[test]
    fn generation_wrap_clears_nodes() {
        let mut pf = PathFinder::new(Range::new(0, 0, 2, 1));
        pf.generation = u32::MAX;
        pf.nodes[1].generation = 1;
        pf.nodes[1].g = 99;
        let generation = pf.next_generation();
        assert_eq!(generation, 1);
        pf.touch(1, generation);
        assert_eq!(pf.nodes[1].g, 0);
    }

    #[test]
    fn node_order_prefers_low_f_then_low_h() {
        let a = SearchNode { g: 10, h: 20, ..SearchNode::default() };
        let b = SearchNode { g: 20, h: 20, ..SearchNode::default() };
        let c = SearchNode { g: 20, h: 10, ..SearchNode::default() };
        assert_eq!(a.priority_cmp(&b), Ordering::Greater);
        // Same f (30): lower h wins.
        assert_eq!(c.priority_cmp(&a), Ordering::Greater);
        assert_eq!(a.priority_cmp(&a.clone()), Ordering::Equal);
    }
}
