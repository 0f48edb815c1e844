//! ASCII terrain for the demo: one world unit per tile on the x/z plane.
//!
//! | Char | Meaning |
//! |---|---|
//! | `#` | blocked |
//! | `.` | open ground, region 0 |
//! | `1`..`9` | open ground in that region |

use rand::{Rng, RngExt};
use thiserror::Error;
use waygrid_core::{Extent, GridConfig, NavGrid, RegionHit, RegionId, TerrainSampler, Vec3};
use waygrid_paths::Route;

pub const BLOCKED: char = '#';
pub const OPEN: char = '.';

/// Penalty per region digit when no config file is given.
const REGION_PENALTY_STEP: i32 = 5;

#[derive(Debug, Error, PartialEq)]
pub enum MapError {
    #[error("map is empty")]
    Empty,
    #[error("line {line}: expected {expected} tiles, found {found}")]
    Ragged {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}, column {column}: unknown tile {tile:?}")]
    UnknownTile { line: usize, column: usize, tile: char },
}

#[derive(Clone, Debug)]
pub struct AsciiMap {
    width: usize,
    height: usize,
    tiles: Vec<char>,
}

impl AsciiMap {
    /// Parse a map; blank lines are skipped, every other line is one row
    /// of tiles along x, and successive rows step along z.
    pub fn parse(text: &str) -> Result<Self, MapError> {
        let mut width = 0;
        let mut tiles = Vec::new();
        let mut height = 0;
        for (n, line) in text.lines().enumerate() {
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }
            let row: Vec<char> = line.chars().collect();
            if height == 0 {
                width = row.len();
            } else if row.len() != width {
                return Err(MapError::Ragged {
                    line: n + 1,
                    expected: width,
                    found: row.len(),
                });
            }
            if let Some(column) = row.iter().position(|&c| !is_tile(c)) {
                return Err(MapError::UnknownTile {
                    line: n + 1,
                    column: column + 1,
                    tile: row[column],
                });
            }
            tiles.extend(row);
            height += 1;
        }
        if height == 0 {
            return Err(MapError::Empty);
        }
        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    /// A random map: each tile is blocked with probability `density`, and
    /// some open tiles land in regions 1..=3.
    pub fn random(width: usize, height: usize, density: f64, rng: &mut impl Rng) -> Self {
        let tiles = (0..width * height)
            .map(|_| {
                let roll: f64 = rng.random_range(0.0..1.0);
                if roll < density {
                    BLOCKED
                } else if roll < density + 0.1 {
                    char::from(b'1' + rng.random_range(0..3u8))
                } else {
                    OPEN
                }
            })
            .collect();
        Self {
            width,
            height,
            tiles,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Tile under world position (`x`, `z`), or `None` off the map.
    pub fn tile_at(&self, x: f32, z: f32) -> Option<char> {
        let (tx, tz) = (x.floor(), z.floor());
        if tx < 0.0 || tz < 0.0 || tx >= self.width as f32 || tz >= self.height as f32 {
            return None;
        }
        Some(self.tiles[tz as usize * self.width + tx as usize])
    }

    /// One cell per tile, regions costing `5 * digit`.
    pub fn default_config(&self) -> GridConfig {
        let extent = Extent::new(self.width as f32, self.height as f32);
        (1..=9).fold(GridConfig::new(Vec3::ZERO, extent, 0.5), |cfg, d| {
            cfg.with_region(RegionId(d), REGION_PENALTY_STEP * d as i32)
        })
    }

    /// The map with `route` drawn over it: `*` for path cells, `o` for
    /// waypoints, `S` and `E` for the endpoints.
    pub fn render(&self, grid: &NavGrid, route: &Route) -> String {
        let mut tiles = self.tiles.clone();
        let mut mark = |world: Vec3, c: char| {
            if self.tile_at(world.x, world.z).is_some() {
                tiles[world.z.floor() as usize * self.width + world.x.floor() as usize] = c;
            }
        };
        for &cell in &route.path.cells {
            mark(grid.world_point(cell), '*');
        }
        for &waypoint in &route.waypoints {
            mark(waypoint, 'o');
        }
        if let (Some(&first), Some(&last)) = (route.path.cells.first(), route.path.cells.last()) {
            mark(grid.world_point(first), 'S');
            mark(grid.world_point(last), 'E');
        }
        tiles
            .chunks(self.width.max(1))
            .map(|row| row.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn is_tile(c: char) -> bool {
    c == BLOCKED || c == OPEN || ('1'..='9').contains(&c)
}

impl TerrainSampler for AsciiMap {
    /// Blocked when any tile overlapping the square of half-size `radius`
    /// around `center` is a wall.
    fn is_blocked(&self, center: Vec3, radius: f32) -> bool {
        let x0 = (center.x - radius).floor() as i64;
        let x1 = (center.x + radius).floor() as i64;
        let z0 = (center.z - radius).floor() as i64;
        let z1 = (center.z + radius).floor() as i64;
        (z0..=z1).any(|z| {
            (x0..=x1).any(|x| self.tile_at(x as f32, z as f32) == Some(BLOCKED))
        })
    }

    /// The ground sits at `y = 0`; the probe hits it when it starts above
    /// the ground and is long enough to reach it.
    fn probe_region(&self, from: Vec3, max_distance: f32) -> Option<RegionHit> {
        if from.y < 0.0 || from.y > max_distance {
            return None;
        }
        let tile = self.tile_at(from.x, from.z)?;
        let region = tile.to_digit(10).unwrap_or(0);
        Some(RegionHit {
            region: RegionId(region),
            layer: 0,
        })
    }
}
