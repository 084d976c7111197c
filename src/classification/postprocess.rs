//! Turn raw model scores into ranked predictions.

use crate::models::Prediction;

/// Numerically stable softmax
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    if logits.is_empty() {
        return Vec::new();
    }
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|x| x / sum).collect()
}

/// True if the scores already look like a probability distribution
pub fn is_distribution(scores: &[f32]) -> bool {
    if scores.is_empty() || scores.iter().any(|&s| !(0.0..=1.0).contains(&s)) {
        return false;
    }
    let sum: f32 = scores.iter().sum();
    (sum - 1.0).abs() < 1e-3
}

/// Rank `scores` and keep the best `k`. Ties keep the lower class index first.
pub fn top_k(scores: &[f32], labels: &[String], k: usize) -> Vec<Prediction> {
    let mut indices: Vec<usize> = (0..scores.len()).collect();
    indices.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    indices
        .into_iter()
        .take(k)
        .map(|idx| {
            let label = labels
                .get(idx)
                .filter(|label| !label.is_empty())
                .cloned()
                .unwrap_or_else(|| format!("class_{}", idx));
            Prediction::new(label, scores[idx])
        })
        .collect()
}

/// Full postprocessing of a single output row.
///
/// TensorFlow-exported classifiers emit an extra background class at index 0;
/// it is dropped when the output has exactly one more entry than there are labels.
pub fn to_predictions(raw: &[f32], labels: &[String], k: usize) -> Vec<Prediction> {
    let raw = if raw.len() == labels.len() + 1 {
        &raw[1..]
    } else {
        raw
    };

    if is_distribution(raw) {
        top_k(raw, labels, k)
    } else {
        top_k(&softmax(raw), labels, k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn softmax_sums_to_one() {
        let probs = softmax(&[1.0, 2.0, 3.0]);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(probs[2] > probs[1] && probs[1] > probs[0]);
    }

    #[test]
    fn top_k_is_descending_and_truncated() {
        let preds = top_k(&[0.1, 0.6, 0.3], &labels(&["a", "b", "c"]), 2);
        assert_eq!(preds.len(), 2);
        assert_eq!(preds[0].label, "b");
        assert_eq!(preds[1].label, "c");
    }

    #[test]
    fn ties_prefer_lower_index() {
        let preds = top_k(&[0.5, 0.5], &labels(&["first", "second"]), 2);
        assert_eq!(preds[0].label, "first");
    }

    #[test]
    fn missing_labels_fall_back_to_index() {
        let preds = top_k(&[0.2, 0.8], &labels(&["only"]), 1);
        assert_eq!(preds[0].label, "class_1");
    }

    #[test]
    fn empty_labels_fall_back_to_index() {
        let preds = top_k(&[0.2, 0.8], &labels(&["cat", ""]), 1);
        assert_eq!(preds[0].label, "class_1");
    }

    #[test]
    fn logits_are_softmaxed() {
        let preds = to_predictions(&[0.0, 5.0], &labels(&["cat", "dog"]), 1);
        assert_eq!(preds[0].label, "dog");
        assert!(preds[0].confidence > 0.99 && preds[0].confidence <= 1.0);
    }

    #[test]
    fn probabilities_pass_through() {
        let preds = to_predictions(&[0.25, 0.75], &labels(&["cat", "dog"]), 2);
        assert_eq!(preds[0].confidence, 0.75);
        assert_eq!(preds[1].confidence, 0.25);
    }

    #[test]
    fn background_class_is_dropped() {
        let preds = to_predictions(&[0.7, 0.1, 0.2], &labels(&["cat", "dog"]), 1);
        assert_eq!(preds[0].label, "dog");
    }
}
