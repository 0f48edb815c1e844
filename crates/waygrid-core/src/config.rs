//! Build-time grid configuration.

use std::collections::HashSet;

use crate::error::GridError;
use crate::geom::Vec3;
use crate::terrain::RegionId;

/// Largest accepted region or obstacle penalty. Keeps every blurred cell
/// penalty, and a single search step, far from `i32` overflow.
pub const MAX_PENALTY: i32 = 1 << 16;

/// Largest accepted number of cells in one grid.
pub const MAX_CELLS: usize = 1 << 24;

/// Penalty charged for entering cells whose probe lands on `region`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionPenalty {
    pub region: RegionId,
    pub penalty: i32,
}

impl RegionPenalty {
    pub const fn new(region: RegionId, penalty: i32) -> Self {
        Self { region, penalty }
    }
}

/// Width and depth of the world rectangle on the x/z plane.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Extent {
    pub width: f32,
    pub height: f32,
}

impl Extent {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Everything needed to lay out and cost a [`NavGrid`](crate::NavGrid).
///
/// Read once at build time; the grid keeps a copy but never changes it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridConfig {
    /// Minimum corner of the world rectangle.
    pub origin: Vec3,
    pub world_size: Extent,
    /// Half the edge length of one cell.
    pub node_radius: f32,
    /// Added to the base penalty of every blocked cell.
    pub obstacle_proximity_penalty: i32,
    /// Box blur kernel radius; 0 disables blurring.
    pub blur_size: usize,
    /// Height above a cell centre the region probe starts from.
    pub probe_height: f32,
    /// Maximum length of the region probe.
    pub probe_distance: f32,
    pub regions: Vec<RegionPenalty>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            origin: Vec3::new(-50.0, 0.0, -50.0),
            world_size: Extent::new(100.0, 100.0),
            node_radius: 0.5,
            obstacle_proximity_penalty: 10,
            blur_size: 3,
            probe_height: 50.0,
            probe_distance: 100.0,
            regions: Vec::new(),
        }
    }
}

impl GridConfig {
    /// A config for a world rectangle starting at `origin`.
    pub fn new(origin: Vec3, world_size: Extent, node_radius: f32) -> Self {
        Self {
            origin,
            world_size,
            node_radius,
            ..Self::default()
        }
    }

    /// A config whose rectangle is centred on `center`.
    pub fn centered(center: Vec3, world_size: Extent, node_radius: f32) -> Self {
        let origin = Vec3::new(
            center.x - world_size.width / 2.0,
            center.y,
            center.z - world_size.height / 2.0,
        );
        Self::new(origin, world_size, node_radius)
    }

    pub fn with_obstacle_penalty(mut self, penalty: i32) -> Self {
        self.obstacle_proximity_penalty = penalty;
        self
    }

    pub fn with_blur_size(mut self, blur_size: usize) -> Self {
        self.blur_size = blur_size;
        self
    }

    pub fn with_probe(mut self, height: f32, distance: f32) -> Self {
        self.probe_height = height;
        self.probe_distance = distance;
        self
    }

    pub fn with_region(mut self, region: RegionId, penalty: i32) -> Self {
        self.regions.push(RegionPenalty::new(region, penalty));
        self
    }

    /// Edge length of one cell.
    #[inline]
    pub fn node_diameter(&self) -> f32 {
        self.node_radius * 2.0
    }

    /// Number of cells along x and y (world z). Saturates for sizes that
    /// [`validate`](Self::validate) rejects.
    pub fn grid_size(&self) -> (usize, usize) {
        let d = self.node_diameter();
        let sx = (self.world_size.width / d).round();
        let sy = (self.world_size.height / d).round();
        (sx.max(0.0) as usize, sy.max(0.0) as usize)
    }

    /// Check the configuration, including that it yields at least one cell.
    pub fn validate(&self) -> Result<(), GridError> {
        if !self.node_radius.is_finite() || self.node_radius <= 0.0 {
            return Err(GridError::InvalidNodeRadius(self.node_radius));
        }
        let Extent { width, height } = self.world_size;
        if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
            return Err(GridError::InvalidWorldSize { width, height });
        }
        if !self.origin.is_finite() {
            return Err(GridError::InvalidOrigin);
        }
        if !(0..=MAX_PENALTY).contains(&self.obstacle_proximity_penalty) {
            return Err(GridError::ObstaclePenaltyOutOfRange(
                self.obstacle_proximity_penalty,
            ));
        }
        let mut seen = HashSet::new();
        for rp in &self.regions {
            if !(0..=MAX_PENALTY).contains(&rp.penalty) {
                return Err(GridError::PenaltyOutOfRange {
                    region: rp.region,
                    penalty: rp.penalty,
                });
            }
            if !seen.insert(rp.region) {
                return Err(GridError::DuplicateRegion(rp.region));
            }
        }
        let (size_x, size_y) = self.grid_size();
        if size_x == 0 || size_y == 0 {
            return Err(GridError::EmptyGrid { size_x, size_y });
        }
        if size_x.checked_mul(size_y).is_none_or(|cells| cells > MAX_CELLS) {
            return Err(GridError::TooManyCells { size_x, size_y });
        }
        Ok(())
    }

    /// Penalty configured for `region`, if any.
    pub fn region_penalty(&self, region: RegionId) -> Option<i32> {
        self.regions
            .iter()
            .find(|rp| rp.region == region)
            .map(|rp| rp.penalty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_size_rounds_to_nearest() {
        let cfg = GridConfig::new(Vec3::ZERO, Extent::new(10.0, 4.4), 0.5);
        assert_eq!(cfg.grid_size(), (10, 4));
        let cfg = GridConfig::new(Vec3::ZERO, Extent::new(10.6, 4.0), 1.0);
        assert_eq!(cfg.grid_size(), (5, 2));
    }

    #[test]
    fn centered_origin() {
        let cfg = GridConfig::centered(Vec3::new(1.0, 2.0, 3.0), Extent::new(10.0, 20.0), 0.5);
        assert_eq!(cfg.origin, Vec3::new(-4.0, 2.0, -7.0));
    }

    #[test]
    fn default_is_valid() {
        let cfg = GridConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.grid_size(), (100, 100));
    }

    #[test]
    fn degenerate_sizes_are_rejected() {
        let cfg = GridConfig::new(Vec3::ZERO, Extent::new(0.4, 10.0), 0.5);
        assert_eq!(
            cfg.validate(),
            Err(GridError::EmptyGrid {
                size_x: 0,
                size_y: 10
            })
        );

        let cfg = GridConfig::new(Vec3::ZERO, Extent::new(10.0, 10.0), 0.0);
        assert_eq!(cfg.validate(), Err(GridError::InvalidNodeRadius(0.0)));

        let cfg = GridConfig::new(Vec3::ZERO, Extent::new(-1.0, 10.0), 0.5);
        assert!(matches!(
            cfg.validate(),
            Err(GridError::InvalidWorldSize { .. })
        ));
    }

    #[test]
    fn region_validation() {
        let cfg = GridConfig::default()
            .with_region(RegionId(1), 5)
            .with_region(RegionId(1), 7);
        assert_eq!(cfg.validate(), Err(GridError::DuplicateRegion(RegionId(1))));

        let cfg = GridConfig::default().with_region(RegionId(2), -3);
        assert_eq!(
            cfg.validate(),
            Err(GridError::PenaltyOutOfRange {
                region: RegionId(2),
                penalty: -3
            })
        );

        let cfg = GridConfig::default().with_obstacle_penalty(-1);
        assert_eq!(cfg.validate(), Err(GridError::ObstaclePenaltyOutOfRange(-1)));
    }

    #[test]
    fn oversized_penalties_are_rejected() {
        let cfg = GridConfig::default().with_region(RegionId(1), i32::MAX / 2);
        assert_eq!(
            cfg.validate(),
            Err(GridError::PenaltyOutOfRange {
                region: RegionId(1),
                penalty: i32::MAX / 2
            })
        );
        let cfg = GridConfig::default().with_obstacle_penalty(i32::MAX);
        assert_eq!(
            cfg.validate(),
            Err(GridError::ObstaclePenaltyOutOfRange(i32::MAX))
        );

        let cfg = GridConfig::default()
            .with_region(RegionId(1), MAX_PENALTY)
            .with_obstacle_penalty(MAX_PENALTY);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn huge_worlds_are_rejected() {
        let cfg = GridConfig::new(Vec3::ZERO, Extent::new(1e9, 1e9), 0.5);
        assert!(matches!(
            cfg.validate(),
            Err(GridError::TooManyCells { .. })
        ));
        // Fine on each axis alone, too many together.
        let cfg = GridConfig::new(Vec3::ZERO, Extent::new(8192.0, 4096.0), 0.5);
        assert_eq!(
            cfg.validate(),
            Err(GridError::TooManyCells {
                size_x: 8192,
                size_y: 4096
            })
        );
        let cfg = GridConfig::new(Vec3::ZERO, Extent::new(4096.0, 4096.0), 0.5);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn region_penalty_lookup() {
        let cfg = GridConfig::default()
            .with_region(RegionId(1), 5)
            .with_region(RegionId(4), 20);
        assert_eq!(cfg.region_penalty(RegionId(4)), Some(20));
        assert_eq!(cfg.region_penalty(RegionId(9)), None);
    }
}
