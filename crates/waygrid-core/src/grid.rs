//! The [`NavGrid`]: a uniform cell lattice over the world rectangle, with a
//! walkability flag and a blurred movement penalty per cell.
//!
//! The grid is built once from a [`GridConfig`] and a [`TerrainSampler`] and
//! is read-only afterwards, so it can be shared freely between searches.

use crate::blur::box_blur;
use crate::config::{GridConfig, MAX_PENALTY};
use crate::error::GridError;
use crate::geom::{Point, Range, Vec3};
use crate::terrain::TerrainSampler;

/// Inset applied to the blocked-check radius so that geometry touching a
/// cell's border does not mark it blocked.
pub const BLOCKED_CHECK_INSET: f32 = 0.05;

/// One cell of the lattice.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NavCell {
    pub pos: Point,
    /// World-space centre of the cell.
    pub world: Vec3,
    pub walkable: bool,
    /// Extra cost charged for entering this cell; always ≥ 0.
    pub penalty: i32,
}

/// A rectangular lattice of [`NavCell`]s, stored row-major.
#[derive(Clone, Debug)]
pub struct NavGrid {
    config: GridConfig,
    size_x: usize,
    size_y: usize,
    cells: Vec<NavCell>,
    penalty_min: i32,
    penalty_max: i32,
}

impl NavGrid {
    /// Build the grid by querying `sampler` once per cell for blockage and
    /// once for the region under it, then blurring the penalty field.
    pub fn build<S: TerrainSampler>(config: GridConfig, sampler: &S) -> Result<Self, GridError> {
        let blocked_radius = (config.node_radius - BLOCKED_CHECK_INSET).max(0.0);
        let probe_offset = Vec3::UP * config.probe_height;
        let probe_distance = config.probe_distance;
        let lookup = config.clone();

        Self::build_with(config, |_, center| {
            let walkable = !sampler.is_blocked(center, blocked_radius);
            let penalty = sampler
                .probe_region(center + probe_offset, probe_distance)
                .and_then(|hit| lookup.region_penalty(hit.region))
                .unwrap_or(0);
            (walkable, penalty)
        })
    }

    /// Build the grid from a per-cell function returning walkability and
    /// base penalty. The obstacle penalty and the blur are applied as in
    /// [`build`](Self::build). Base penalties are clamped to
    /// `0..=MAX_PENALTY`.
    pub fn build_with<F>(config: GridConfig, mut cell_fn: F) -> Result<Self, GridError>
    where
        F: FnMut(Point, Vec3) -> (bool, i32),
    {
        config.validate()?;
        let (size_x, size_y) = config.grid_size();

        let mut cells = Vec::with_capacity(size_x * size_y);
        let mut penalties = Vec::with_capacity(size_x * size_y);
        for y in 0..size_y {
            for x in 0..size_x {
                let pos = Point::new(x as i32, y as i32);
                let world = cell_center(&config, pos);
                let (walkable, base) = cell_fn(pos, world);
                let mut penalty = base.clamp(0, MAX_PENALTY);
                if !walkable {
                    penalty += config.obstacle_proximity_penalty;
                }
                penalties.push(penalty);
                cells.push(NavCell {
                    pos,
                    world,
                    walkable,
                    penalty,
                });
            }
        }

        box_blur(&mut penalties, size_x, size_y, config.blur_size);

        let mut penalty_min = i32::MAX;
        let mut penalty_max = i32::MIN;
        for (cell, penalty) in cells.iter_mut().zip(penalties) {
            cell.penalty = penalty;
            penalty_min = penalty_min.min(penalty);
            penalty_max = penalty_max.max(penalty);
        }

        let grid = Self {
            config,
            size_x,
            size_y,
            cells,
            penalty_min,
            penalty_max,
        };
        log::debug!(
            "built {}x{} nav grid: {} walkable, penalties {}..={}",
            size_x,
            size_y,
            grid.cells.iter().filter(|c| c.walkable).count(),
            penalty_min,
            penalty_max
        );
        Ok(grid)
    }

    /// The configuration this grid was built from.
    #[inline]
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Number of cells along x.
    #[inline]
    pub fn size_x(&self) -> usize {
        self.size_x
    }

    /// Number of cells along y (world z).
    #[inline]
    pub fn size_y(&self) -> usize {
        self.size_y
    }

    /// Total number of cells; the most any search can ever enqueue.
    #[inline]
    pub fn max_size(&self) -> usize {
        self.cells.len()
    }

    /// The grid-coordinate rectangle `[0, size_x) × [0, size_y)`.
    #[inline]
    pub fn range(&self) -> Range {
        Range::new(0, 0, self.size_x as i32, self.size_y as i32)
    }

    /// Smallest and largest blurred penalty. For display only.
    #[inline]
    pub fn penalty_range(&self) -> (i32, i32) {
        (self.penalty_min, self.penalty_max)
    }

    /// Flat index of `p`, or `None` if out of bounds.
    #[inline]
    pub fn idx(&self, p: Point) -> Option<usize> {
        if !self.range().contains(p) {
            return None;
        }
        Some(p.y as usize * self.size_x + p.x as usize)
    }

    /// Grid coordinates of a flat index.
    #[inline]
    pub fn point(&self, idx: usize) -> Point {
        Point::new((idx % self.size_x) as i32, (idx / self.size_x) as i32)
    }

    #[inline]
    pub fn cell(&self, p: Point) -> Option<&NavCell> {
        self.idx(p).map(|i| &self.cells[i])
    }

    /// Whether `p` is in bounds and walkable.
    #[inline]
    pub fn is_walkable(&self, p: Point) -> bool {
        self.cell(p).is_some_and(|c| c.walkable)
    }

    /// Penalty of `p`, 0 when out of bounds.
    #[inline]
    pub fn penalty(&self, p: Point) -> i32 {
        self.cell(p).map_or(0, |c| c.penalty)
    }

    /// World-space centre of `p`. Works for out-of-bounds points too.
    #[inline]
    pub fn world_point(&self, p: Point) -> Vec3 {
        cell_center(&self.config, p)
    }

    /// The cell closest to a world position.
    ///
    /// The position is clamped into the world rectangle first, so queries
    /// outside the grid land on an edge cell instead of failing.
    pub fn nearest_cell(&self, world: Vec3) -> &NavCell {
        let origin = self.config.origin;
        let size = self.config.world_size;
        let percent_x = clamp01((world.x - origin.x) / size.width);
        let percent_y = clamp01((world.z - origin.z) / size.height);
        let x = ((self.size_x - 1) as f32 * percent_x).round() as usize;
        let y = ((self.size_y - 1) as f32 * percent_y).round() as usize;
        &self.cells[y * self.size_x + x]
    }

    /// In-bounds cells at Chebyshev distance 1 from `p`. Walkability is not
    /// checked, and diagonals are returned even between two blocked cells.
    pub fn neighbors(&self, p: Point) -> impl Iterator<Item = &NavCell> + '_ {
        p.neighbors_8().into_iter().filter_map(|n| self.cell(n))
    }

    /// Row-major iterator over all cells.
    pub fn iter(&self) -> std::slice::Iter<'_, NavCell> {
        self.cells.iter()
    }
}

impl<'a> IntoIterator for &'a NavGrid {
    type Item = &'a NavCell;
    type IntoIter = std::slice::Iter<'a, NavCell>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn cell_center(config: &GridConfig, p: Point) -> Vec3 {
    let d = config.node_diameter();
    let r = config.node_radius;
    Vec3::new(
        config.origin.x + p.x as f32 * d + r,
        config.origin.y,
        config.origin.z + p.y as f32 * d + r,
    )
}

#[inline]
fn clamp01(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}
