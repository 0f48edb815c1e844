use waygrid_core::Point;

/// A graph over grid points.
pub trait Pather {
    /// Push the points reachable in one step from `p` onto `buf`, which the
    /// caller has already cleared.
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>);

    /// Whether a search may start or end on `p`.
    fn passable(&self, _p: Point) -> bool {
        true
    }
}

/// A [`Pather`] whose steps have a price.
pub trait WeightedPather: Pather {
    /// Price of stepping from `from` to its neighbor `to`; positive.
    fn cost(&self, from: Point, to: Point) -> i32;
}

/// A [`WeightedPather`] that can guess the remaining cost, as A* needs.
pub trait AstarPather: WeightedPather {
    /// Lower bound on the cost from `from` to `to`. Overestimating breaks
    /// optimality.
    fn estimate(&self, from: Point, to: Point) -> i32;
}
