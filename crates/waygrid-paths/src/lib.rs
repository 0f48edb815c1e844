//! A* pathfinding over a [`waygrid_core::NavGrid`].
//!
//! - [`IndexedHeap`]: a binary heap over arena handles, with O(1)
//!   membership and in-place priority improvement.
//! - [`PathFinder`]: owns per-run scratch and runs A* through
//!   [`PathFinder::astar_path`] (any [`AstarPather`]) or
//!   [`PathFinder::find_path`] (world positions on a `NavGrid`).
//! - [`simplify`]: reduces a cell chain to its turning points.
//!
//! # Trait hierarchy
//!
//! | Trait | Provides |
//! |---|---|
//! | [`Pather`] | neighbor enumeration, endpoint passability |
//! | [`WeightedPather`] : [`Pather`] | step cost |
//! | [`AstarPather`] : [`WeightedPather`] | admissible estimate |
//!
//! `NavGrid` implements all three with octile distances (10 straight,
//! 14 diagonal) and charges each cell's penalty on entry.

mod astar;
mod distance;
mod finder;
mod heap;
mod navgrid;
mod simplify;
mod traits;

pub use distance::{DIAGONAL_COST, STRAIGHT_COST, octile};
pub use finder::{Path, PathFinder, Route, SearchState};
pub use heap::{HeapItem, IndexedHeap};
pub use simplify::simplify;
pub use traits::{AstarPather, Pather, WeightedPather};
