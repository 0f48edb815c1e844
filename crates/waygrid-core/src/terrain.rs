//! The scene-query seam the grid is built from.
//!
//! A [`TerrainSampler`] answers two questions per cell: is the space around
//! the cell centre blocked, and which region does a downward probe land on.

use std::fmt;

use crate::geom::Vec3;

/// Identifier of a terrain region (a material or layer in the host scene).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RegionId(pub u32);

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Result of a downward region probe.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RegionHit {
    pub region: RegionId,
    /// Scene layer of the hit surface, informational only.
    pub layer: u32,
}

/// External scene queries consumed while building a
/// [`NavGrid`](crate::NavGrid).
pub trait TerrainSampler {
    /// Whether anything blocking overlaps the sphere at `center`.
    fn is_blocked(&self, center: Vec3, radius: f32) -> bool;

    /// Cast a ray straight down from `from`, at most `max_distance` long.
    fn probe_region(&self, from: Vec3, max_distance: f32) -> Option<RegionHit>;
}

impl<T: TerrainSampler + ?Sized> TerrainSampler for &T {
    fn is_blocked(&self, center: Vec3, radius: f32) -> bool {
        (**self).is_blocked(center, radius)
    }

    fn probe_region(&self, from: Vec3, max_distance: f32) -> Option<RegionHit> {
        (**self).probe_region(from, max_distance)
    }
}

/// Flat, empty terrain: nothing is blocked and no region is ever hit.
#[derive(Copy, Clone, Debug, Default)]
pub struct OpenTerrain;

impl TerrainSampler for OpenTerrain {
    fn is_blocked(&self, _center: Vec3, _radius: f32) -> bool {
        false
    }

    fn probe_region(&self, _from: Vec3, _max_distance: f32) -> Option<RegionHit> {
        None
    }
}

/// A sampler assembled from two closures.
pub struct FnSampler<B, R> {
    blocked: B,
    region: R,
}

impl<B, R> FnSampler<B, R>
where
    B: Fn(Vec3, f32) -> bool,
    R: Fn(Vec3, f32) -> Option<RegionHit>,
{
    pub fn new(blocked: B, region: R) -> Self {
        Self { blocked, region }
    }
}

impl<B, R> TerrainSampler for FnSampler<B, R>
where
    B: Fn(Vec3, f32) -> bool,
    R: Fn(Vec3, f32) -> Option<RegionHit>,
{
    fn is_blocked(&self, center: Vec3, radius: f32) -> bool {
        (self.blocked)(center, radius)
    }

    fn probe_region(&self, from: Vec3, max_distance: f32) -> Option<RegionHit> {
        (self.region)(from, max_distance)
    }
}
