//! Weight-vector helpers (softmax, top-K, cosine similarity).
//!
//! Deterministic utilities shared by the preference learner and the
//! recommendation engine. All operate on sparse `BTreeMap<String, f64>`
//! vectors where an absent label means weight zero.

use std::collections::BTreeMap;

/// Normalize accumulated scores into a probability-like distribution.
///
/// Subtracts the maximum before exponentiating (numerically stable for
/// large-magnitude reward totals) and divides by the sum. An empty input
/// yields an empty map; non-finite inputs degrade to uniform.
pub fn softmax_map(scores: &BTreeMap<String, f64>) -> BTreeMap<String, f64> {
    if scores.is_empty() {
        return BTreeMap::new();
    }
    let max_score = scores.values().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut out: BTreeMap<String, f64> = BTreeMap::new();
    let mut denom = 0.0;
    for (label, &score) in scores {
        let x = (score - max_score).exp();
        denom += x;
        out.insert(label.clone(), x);
    }
    if !denom.is_finite() || denom <= 0.0 {
        let n = scores.len() as f64;
        return scores.keys().map(|k| (k.clone(), 1.0 / n)).collect();
    }
    for v in out.values_mut() {
        *v /= denom;
    }
    out
}

/// The `k` heaviest entries, weight-descending, label-ascending on ties.
pub fn top_k(weights: &BTreeMap<String, f64>, k: usize) -> Vec<(String, f64)> {
    let mut ranked: Vec<(String, f64)> = weights.iter().map(|(l, &w)| (l.clone(), w)).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(k);
    ranked
}

/// Cosine similarity between two sparse weight vectors.
///
/// Labels missing from either side contribute zero; a zero-magnitude vector
/// on either side gives similarity 0. The result is clamped to `[-1, 1]`:
/// square-root rounding in the norms can otherwise land an ulp outside the
/// bound (identical unit-weight vectors are the usual trigger).
pub fn cosine_similarity(a: &BTreeMap<String, f64>, b: &BTreeMap<String, f64>) -> f64 {
    let mut dot = 0.0;
    for (label, &x) in a {
        if let Some(&y) = b.get(label) {
            dot += x * y;
        }
    }
    let norm_a = a.values().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.values().map(|y| y * y).sum::<f64>().sqrt();
    let denom = norm_a * norm_b;
    if !denom.is_finite() || denom <= 0.0 {
        return 0.0;
    }
    (dot / denom).clamp(-1.0, 1.0)
}
