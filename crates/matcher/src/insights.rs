use crate::similarity::{is_comparable, round2};
use crate::types::Insights;

impl Insights {
    /// Statistics over `scores`, skipping the no-comparison sentinel.
    pub fn from_scores<I: IntoIterator<Item = f64>>(scores: I) -> Self {
        let valid: Vec<f64> = scores.into_iter().filter(|s| is_comparable(*s)).collect();
        if valid.is_empty() {
            return Insights::default();
        }

        let n = valid.len() as f64;
        let mean = valid.iter().sum::<f64>() / n;
        let max = valid.iter().copied().fold(f64::MIN, f64::max);
        let min = valid.iter().copied().fold(f64::MAX, f64::min);
        let std_dev = (valid.len() >= 2).then(|| {
            let var = valid.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / (n - 1.0);
            round2(var.sqrt())
        });

        Insights {
            max: Some(max),
            min: Some(min),
            mean: Some(round2(mean)),
            std_dev,
        }
    }
}

/// `round((100 - mean) / 10, 2)` over the comparable scores; `None` when
/// there are none.
pub fn originality_score<I: IntoIterator<Item = f64>>(scores: I) -> Option<f64> {
    let (sum, count) = scores
        .into_iter()
        .filter(|s| is_comparable(*s))
        .fold((0.0, 0usize), |(sum, count), s| (sum + s, count + 1));
    if count == 0 {
        return None;
    }
    let mean = sum / count as f64;
    Some(round2((100.0 - mean) / 10.0))
}
