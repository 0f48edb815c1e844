use waygrid_core::Point;

/// Collapse a cell chain into the cells where it changes direction.
///
/// Each straight run (orthogonal or diagonal) contributes its last cell, so
/// the result keeps every turn and always ends with the last cell of
/// `cells`. The first cell is never included: whoever follows the path is
/// already standing on it. A single-cell chain yields that cell.
pub fn simplify(cells: &[Point]) -> Vec<Point> {
    let mut turns = Vec::new();
    let mut heading: Option<Point> = None;
    for step in cells.windows(2) {
        let dir = step[1] - step[0];
        if heading.is_some_and(|h| h != dir) {
            turns.push(step[0]);
        }
        heading = Some(dir);
    }
    if let Some(&last) = cells.last() {
        turns.push(last);
    }
    turns
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(v: &[(i32, i32)]) -> Vec<Point> {
        v.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn straight_runs_collapse() {
        assert_eq!(
            simplify(&pts(&[(0, 0), (1, 0), (2, 0), (3, 0)])),
            pts(&[(3, 0)])
        );
        assert_eq!(
            simplify(&pts(&[(0, 0), (1, 1), (2, 2), (3, 3)])),
            pts(&[(3, 3)])
        );
    }

    #[test]
    fn every_turn_is_kept() {
        let chain = pts(&[(0, 0), (1, 0), (2, 1), (3, 0), (4, 0), (5, 0), (5, 1)]);
        assert_eq!(
            simplify(&chain),
            pts(&[(1, 0), (2, 1), (3, 0), (5, 0), (5, 1)])
        );
    }

    #[test]
    fn degenerate_chains() {
        assert!(simplify(&[]).is_empty());
        assert_eq!(simplify(&pts(&[(2, 2)])), pts(&[(2, 2)]));
        assert_eq!(simplify(&pts(&[(2, 2), (2, 3)])), pts(&[(2, 3)]));
    }
}
