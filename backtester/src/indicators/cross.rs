/// True at each index where `a` moves from at-or-below to strictly above `b`.
///
/// NaN on either side never satisfies a comparison, so crossings are only
/// reported once both series have warmed up. Index 0 has no prior bar and is
/// always false.
pub fn crossover(a: &[f64], b: &[f64]) -> Vec<bool> {
    cross_points(a, b, |x, y| x > y, |x, y| x <= y)
}

/// True at each index where `a` moves from at-or-above to strictly below `b`.
pub fn crossunder(a: &[f64], b: &[f64]) -> Vec<bool> {
    cross_points(a, b, |x, y| x < y, |x, y| x >= y)
}

fn cross_points(
    a: &[f64],
    b: &[f64],
    now: impl Fn(f64, f64) -> bool,
    before: impl Fn(f64, f64) -> bool,
) -> Vec<bool> {
    let n = a.len().min(b.len());
    let mut out = vec![false; n];
    for i in 1..n {
        out[i] = now(a[i], b[i]) && before(a[i - 1], b[i - 1]);
    }
    out
}
