// File: src/learning/regressor.rs
use crate::config::SgdConfig;
use crate::learning::vectorizer::SparseRow;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Bound on the per-sample gradient, keeps a bad learning rate from overflowing.
const MAX_DLOSS: f64 = 1e12;
/// Weight-scale floor before the scale is folded back into the weights.
const MIN_WSCALE: f64 = 1e-9;

/// `score = weights · x + intercept`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearRegressor {
    weights: Vec<f64>,
    intercept: f64,
}

/// How a fit ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitReport {
    pub epochs: usize,
    /// Half squared error summed over the last epoch.
    pub final_loss: f64,
    pub converged: bool,
}

impl LinearRegressor {
    pub fn predict(&self, row: &SparseRow) -> f64 {
        dot(&self.weights, row, 1.0) + self.intercept
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Plain SGD on squared loss with L2 decay and an inverse-scaling learning
    /// rate. The shuffle is seeded from `config.seed`, so identical inputs
    /// produce identical weights.
    pub fn fit(rows: &[SparseRow], targets: &[f64], dim: usize, config: &SgdConfig) -> (Self, FitReport) {
        debug_assert_eq!(rows.len(), targets.len());
        let n = rows.len();
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut order: Vec<usize> = (0..n).collect();

        // weights = wscale * v, so L2 decay is O(1) per sample
        let mut v = vec![0.0; dim];
        let mut wscale = 1.0;
        let mut intercept = 0.0;
        let mut t = 1.0_f64;

        let mut best_loss = f64::INFINITY;
        let mut no_improvement = 0;
        let mut report = FitReport { epochs: 0, final_loss: 0.0, converged: false };

        for epoch in 0..config.max_iter {
            order.shuffle(&mut rng);
            let mut sum_loss = 0.0;
            for &i in &order {
                let row = &rows[i];
                let p = dot(&v, row, wscale) + intercept;
                let error = p - targets[i];
                sum_loss += 0.5 * error * error;
                let dloss = error.clamp(-MAX_DLOSS, MAX_DLOSS);

                let eta = config.eta0 / t.powf(config.power_t);
                if config.alpha > 0.0 {
                    wscale *= (1.0 - eta * config.alpha).max(0.0);
                }
                if wscale < MIN_WSCALE {
                    v.iter_mut().for_each(|w| *w *= wscale);
                    wscale = 1.0;
                }
                let step = eta * dloss;
                if wscale > 0.0 {
                    for &(c, x) in row {
                        v[c] -= step * x / wscale;
                    }
                }
                intercept -= step;
                t += 1.0;
            }

            report.epochs = epoch + 1;
            report.final_loss = sum_loss;
            if !sum_loss.is_finite() {
                break;
            }
            if sum_loss > best_loss - config.tol * n as f64 {
                no_improvement += 1;
            } else {
                no_improvement = 0;
            }
            if sum_loss < best_loss {
                best_loss = sum_loss;
            }
            if no_improvement >= config.n_iter_no_change {
                report.converged = true;
                break;
            }
        }

        let weights = v.into_iter().map(|w| w * wscale).collect();
        (Self { weights, intercept }, report)
    }
}

fn dot(weights: &[f64], row: &SparseRow, scale: f64) -> f64 {
    row.iter().map(|&(c, x)| weights[c] * x).sum::<f64>() * scale
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SgdConfig {
        SgdConfig { max_iter: 2000, ..SgdConfig::default() }
    }

    #[test]
    fn learns_a_monotone_relation() {
        // y = x on a single feature
        let rows: Vec<SparseRow> = (0..10).map(|i| vec![(0, i as f64 / 10.0)]).collect();
        let targets: Vec<f64> = (0..10).map(|i| i as f64 / 10.0).collect();
        let (model, report) = LinearRegressor::fit(&rows, &targets, 1, &config());
        assert!(report.epochs > 0);
        assert!(model.weights()[0] > 0.0);
        assert!(model.predict(&vec![(0, 0.9)]) > model.predict(&vec![(0, 0.1)]));
    }

    #[test]
    fn fitting_is_reproducible() {
        let rows: Vec<SparseRow> = vec![vec![(0, 1.0)], vec![(1, 1.0)], vec![(0, 0.5), (1, 0.5)]];
        let targets = [1.0, 0.0, 0.5];
        let (a, _) = LinearRegressor::fit(&rows, &targets, 2, &config());
        let (b, _) = LinearRegressor::fit(&rows, &targets, 2, &config());
        assert_eq!(a, b);
    }

    #[test]
    fn empty_row_predicts_intercept() {
        let rows: Vec<SparseRow> = vec![vec![(0, 1.0)], vec![]];
        let (model, _) = LinearRegressor::fit(&rows, &[1.0, 0.0], 1, &config());
        assert_eq!(model.predict(&Vec::new()), model.intercept());
    }
}
