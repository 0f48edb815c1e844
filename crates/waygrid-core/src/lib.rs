//! **waygrid-core**: the navigation grid shared by the waygrid crates.
//!
//! This crate lays a uniform cell lattice over a rectangular world area and
//! derives a per-cell traversal cost from an external scene:
//!
//! - [`geom`]: grid [`Point`]/[`Range`] and world-space [`Vec3`].
//! - [`TerrainSampler`]: the blocked-point and region-probe queries the grid
//!   is built from.
//! - [`GridConfig`]: build-time layout and penalty settings.
//! - [`NavGrid`]: the built lattice, with nearest-cell and 8-neighbor
//!   queries.
//! - [`box_blur`]: the separable penalty smoothing applied at build time.

pub mod blur;
pub mod config;
pub mod error;
pub mod geom;
pub mod grid;
pub mod terrain;

pub use blur::box_blur;
pub use config::{Extent, GridConfig, MAX_CELLS, MAX_PENALTY, RegionPenalty};
pub use error::GridError;
pub use geom::{Point, Range, RangeIter, Vec3};
pub use grid::{NavCell, NavGrid};
pub use terrain::{FnSampler, OpenTerrain, RegionHit, RegionId, TerrainSampler};
