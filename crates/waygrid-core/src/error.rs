//! Grid construction errors.

use thiserror::Error;

use crate::terrain::RegionId;

/// Reasons a [`GridConfig`](crate::GridConfig) cannot produce a grid.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    #[error("node radius must be finite and positive, got {0}")]
    InvalidNodeRadius(f32),

    #[error("world size must be finite and positive, got {width}x{height}")]
    InvalidWorldSize { width: f32, height: f32 },

    #[error("world origin must be finite")]
    InvalidOrigin,

    /// Rounding `world_size / (2 * node_radius)` left an axis with no cells.
    #[error("grid would have no cells ({size_x}x{size_y})")]
    EmptyGrid { size_x: usize, size_y: usize },

    /// More than [`MAX_CELLS`](crate::MAX_CELLS) cells.
    #[error("grid would have too many cells ({size_x}x{size_y})")]
    TooManyCells { size_x: usize, size_y: usize },

    #[error("region {region} penalty {penalty} is outside 0..=MAX_PENALTY")]
    PenaltyOutOfRange { region: RegionId, penalty: i32 },

    #[error("obstacle proximity penalty {0} is outside 0..=MAX_PENALTY")]
    ObstaclePenaltyOutOfRange(i32),

    #[error("region {0} is configured more than once")]
    DuplicateRegion(RegionId),
}
