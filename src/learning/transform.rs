// File: src/learning/transform.rs
//! Per-partition reweighting fitted alongside the vocabularies.

use crate::learning::vectorizer::SparseRow;
use serde::{Deserialize, Serialize};

/// Scales below this are treated as constant columns.
const MIN_SCALE: f64 = 10.0 * f64::EPSILON;

/// Divides each column by its standard deviation. No centering: the numeric
/// features are non-negative counts and ratios, and rows stay sparse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scaler {
    scale: Vec<f64>,
}

impl Scaler {
    pub fn fit(rows: &[SparseRow], dim: usize) -> Self {
        let n = rows.len().max(1) as f64;
        let mut sum = vec![0.0; dim];
        let mut sum_sq = vec![0.0; dim];
        for row in rows {
            for &(c, v) in row {
                sum[c] += v;
                sum_sq[c] += v * v;
            }
        }
        let scale = sum
            .iter()
            .zip(&sum_sq)
            .map(|(&s, &sq)| {
                let mean = s / n;
                let std = (sq / n - mean * mean).max(0.0).sqrt();
                if std < MIN_SCALE {
                    1.0
                } else {
                    std
                }
            })
            .collect();
        Self { scale }
    }

    pub fn transform(&self, row: &mut SparseRow) {
        for (c, v) in row.iter_mut() {
            *v /= self.scale[*c];
        }
    }
}

/// Document-frequency reweighting: a column present in many training rows
/// contributes less than a rare one. Rows are L2-normalised afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TfidfWeights {
    idf: Vec<f64>,
}

impl TfidfWeights {
    /// Smoothed idf: `ln((1 + n) / (1 + df)) + 1`.
    pub fn fit(rows: &[SparseRow], dim: usize) -> Self {
        let n = rows.len() as f64;
        let mut df = vec![0usize; dim];
        for row in rows {
            for &(c, _) in row {
                df[c] += 1;
            }
        }
        let idf = df.iter().map(|&d| ((1.0 + n) / (1.0 + d as f64)).ln() + 1.0).collect();
        Self { idf }
    }

    pub fn idf(&self, column: usize) -> Option<f64> {
        self.idf.get(column).copied()
    }

    pub fn transform(&self, row: &mut SparseRow) {
        for (c, v) in row.iter_mut() {
            *v *= self.idf[*c];
        }
        let norm = row.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, v) in row.iter_mut() {
                *v /= norm;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaler_divides_by_population_std() {
        // column 0: [1, 3] -> std 1; column 1: [2, 2] -> constant
        let rows = vec![vec![(0, 1.0), (1, 2.0)], vec![(0, 3.0), (1, 2.0)]];
        let scaler = Scaler::fit(&rows, 2);
        let mut row = vec![(0, 3.0), (1, 2.0)];
        scaler.transform(&mut row);
        assert_eq!(row, vec![(0, 3.0), (1, 2.0)]);

        let rows = vec![vec![(0, 4.0)], vec![]];
        let scaler = Scaler::fit(&rows, 1);
        let mut row = vec![(0, 4.0)];
        scaler.transform(&mut row);
        assert_eq!(row, vec![(0, 2.0)]);
    }

    #[test]
    fn common_columns_weigh_less() {
        let rows = vec![vec![(0, 1.0), (1, 1.0)], vec![(0, 1.0)], vec![(0, 1.0)]];
        let tfidf = TfidfWeights::fit(&rows, 2);
        assert_eq!(tfidf.idf(0), Some(1.0));
        assert!(tfidf.idf(1).unwrap() > 1.0);

        let mut row = vec![(0, 1.0), (1, 1.0)];
        tfidf.transform(&mut row);
        assert!(row[1].1 > row[0].1);
        let norm: f64 = row.iter().map(|(_, v)| v * v).sum();
        assert!((norm - 1.0).abs() < 1e-12);
    }
}
