use crate::types::Metric;

/// Inner product of two vectors. When both sides are unit length this is the
/// cosine similarity, higher meaning more alike.
pub fn inner_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Linear (not squared) L2 distance. Thresholds are calibrated against the
/// linear form; callers comparing against squared distances will misclassify.
pub fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f32>()
        .sqrt()
}

/// Raw score between a prepared query and a stored vector under `metric`.
pub fn score(metric: Metric, a: &[f32], b: &[f32]) -> f32 {
    match metric {
        Metric::Cosine => inner_product(a, b),
        Metric::Euclidean => l2_distance(a, b),
    }
}

/// Key under which lower is always better, used to rank candidates uniformly
/// across both metrics.
pub fn ranking_key(metric: Metric, score: f32) -> f32 {
    match metric {
        Metric::Cosine => -score,
        Metric::Euclidean => score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inner_product_of_identical_unit_vectors_is_one() {
        let v = [1.0, 0.0, 0.0];
        assert!((inner_product(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn inner_product_of_orthogonal_vectors_is_zero() {
        assert!(inner_product(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
    }

    #[test]
    fn l2_distance_is_linear_not_squared() {
        // 3-4-5 triangle: squared distance would be 25
        let d = l2_distance(&[0.0, 0.0], &[3.0, 4.0]);
        assert!((d - 5.0).abs() < 1e-6);
    }

    #[test]
    fn ranking_key_orders_best_first_for_both_metrics() {
        assert!(ranking_key(Metric::Cosine, 0.9) < ranking_key(Metric::Cosine, 0.1));
        assert!(ranking_key(Metric::Euclidean, 0.1) < ranking_key(Metric::Euclidean, 0.9));
    }
}
