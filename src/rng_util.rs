/// Seeded generator when a seed is given, entropy-seeded otherwise.
pub(crate) fn rng(seed: Option<u64>) -> fastrand::Rng {
    seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed)
}

/// Generate a random `f64` in the range `[low, high)`.
#[inline]
pub(crate) fn f64_range(rng: &mut fastrand::Rng, low: f64, high: f64) -> f64 {
    low + rng.f64() * (high - low)
}

/// One point per stratum `[k/n, (k+1)/n)`, in shuffled order.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn stratified_column(rng: &mut fastrand::Rng, n: usize) -> Vec<f64> {
    let mut strata: Vec<usize> = (0..n).collect();
    rng.shuffle(&mut strata);
    let width = 1.0 / n as f64;
    strata
        .into_iter()
        .map(|k| f64_range(rng, k as f64 * width, (k + 1) as f64 * width))
        .collect()
}
