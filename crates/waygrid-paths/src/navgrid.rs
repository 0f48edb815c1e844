//! [`NavGrid`] as a pather: 8-connected over walkable cells, octile step
//! cost plus the penalty of the cell being entered.

use waygrid_core::{NavGrid, Point};

use crate::distance::octile;
use crate::traits::{AstarPather, Pather, WeightedPather};

impl Pather for NavGrid {
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        buf.extend(
            NavGrid::neighbors(self, p)
                .filter(|cell| cell.walkable)
                .map(|cell| cell.pos),
        );
    }

    fn passable(&self, p: Point) -> bool {
        self.is_walkable(p)
    }
}

impl WeightedPather for NavGrid {
    fn cost(&self, from: Point, to: Point) -> i32 {
        octile(from, to) + self.penalty(to)
    }
}

impl AstarPather for NavGrid {
    fn estimate(&self, from: Point, to: Point) -> i32 {
        octile(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waygrid_core::{Extent, GridConfig, Vec3};

    fn grid() -> NavGrid {
        let cfg = GridConfig::new(Vec3::ZERO, Extent::new(3.0, 3.0), 0.5).with_blur_size(0);
        NavGrid::build_with(cfg, |p, _| match (p.x, p.y) {
            (1, 0) => (false, 0),
            (2, 2) => (true, 6),
            _ => (true, 0),
        })
        .unwrap()
    }

    #[test]
    fn neighbors_skip_blocked_cells() {
        let g = grid();
        let mut buf = Vec::new();
        Pather::neighbors(&g, Point::new(0, 0), &mut buf);
        assert_eq!(buf, vec![Point::new(0, 1), Point::new(1, 1)]);
        assert!(!g.passable(Point::new(1, 0)));
        assert!(!g.passable(Point::new(3, 0)));
    }

    #[test]
    fn cost_charges_entered_cell() {
        let g = grid();
        assert_eq!(g.cost(Point::new(1, 1), Point::new(2, 2)), 14 + 6);
        assert_eq!(g.cost(Point::new(2, 2), Point::new(1, 1)), 14);
        assert_eq!(g.estimate(Point::new(0, 0), Point::new(2, 2)), 28);
    }
}
