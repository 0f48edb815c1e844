//! Separable box blur over an integer penalty field.

/// Blur `values` (row-major, `width * height`) in place with a
/// `(2r+1)×(2r+1)` box kernel.
///
/// Two sliding-window passes, horizontal then vertical, so the cost is
/// O(width·height) whatever the radius. Samples past an edge replicate the
/// edge row/column. Each output is the window sum divided by the kernel area
/// and rounded to the nearest integer.
///
/// # Panics
///
/// Panics if `values.len() != width * height`.
pub fn box_blur(values: &mut [i32], width: usize, height: usize, radius: usize) {
    assert_eq!(
        values.len(),
        width * height,
        "box_blur: field is not {width}x{height}"
    );
    if radius == 0 || values.is_empty() {
        return;
    }

    let r = radius as isize;
    let kernel = 2 * radius + 1;
    let area = (kernel * kernel) as f64;

    // Horizontal window sums, one row at a time.
    let mut horizontal = vec![0i64; values.len()];
    for y in 0..height {
        let row = y * width;
        let mut sum: i64 = (-r..=r)
            .map(|dx| values[row + clamp_index(dx, width)] as i64)
            .sum();
        horizontal[row] = sum;
        for x in 1..width {
            let leaving = clamp_index(x as isize - r - 1, width);
            let entering = clamp_index(x as isize + r, width);
            sum += values[row + entering] as i64 - values[row + leaving] as i64;
            horizontal[row + x] = sum;
        }
    }

    // Vertical window over the horizontal sums, written straight back.
    for x in 0..width {
        let mut sum: i64 = (-r..=r)
            .map(|dy| horizontal[clamp_index(dy, height) * width + x])
            .sum();
        values[x] = average(sum, area);
        for y in 1..height {
            let leaving = clamp_index(y as isize - r - 1, height);
            let entering = clamp_index(y as isize + r, height);
            sum += horizontal[entering * width + x] - horizontal[leaving * width + x];
            values[y * width + x] = average(sum, area);
        }
    }
}

#[inline]
fn clamp_index(i: isize, len: usize) -> usize {
    i.clamp(0, len as isize - 1) as usize
}

#[inline]
fn average(sum: i64, area: f64) -> i32 {
    (sum as f64 / area).round() as i32
}
