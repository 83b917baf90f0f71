//! Gini coefficient over a wait-time distribution.

/// Inequality of a non-negative distribution, in [0, 1].
///
/// 0 means perfectly equal (including the empty and all-zero distributions);
/// values approach 1 as the total concentrates on a single element.  Uses the
/// sorted-index formulation:
///
///   G = (2 Σᵢ i·xᵢ) / (n Σᵢ xᵢ) − (n + 1) / n        (i = 1..n, x sorted)
pub fn gini(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let total: f64 = values.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).expect("wait times are finite"));

    let n = sorted.len() as f64;
    let weighted: f64 = sorted
        .iter()
        .enumerate()
        .map(|(i, &x)| (i as f64 + 1.0) * x)
        .sum();

    ((2.0 * weighted) / (n * total) - (n + 1.0) / n).clamp(0.0, 1.0)
}
