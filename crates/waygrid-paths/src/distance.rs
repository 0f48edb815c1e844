use waygrid_core::Point;

/// Cost of one orthogonal step.
pub const STRAIGHT_COST: i32 = 10;
/// Cost of one diagonal step, 10·√2 rounded down.
pub const DIAGONAL_COST: i32 = 14;

/// Octile distance in tenths of a cell: diagonal moves cost
/// [`DIAGONAL_COST`], straight moves [`STRAIGHT_COST`].
#[inline]
pub fn octile(a: Point, b: Point) -> i32 {
    let dx = (a.x - b.x).abs();
    let dy = (a.y - b.y).abs();
    DIAGONAL_COST * dx.min(dy) + STRAIGHT_COST * (dx - dy).abs()
}
