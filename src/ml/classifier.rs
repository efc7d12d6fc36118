// ============================================================
// Layer 5 — Latent Feature Classifier (linfa)
// ============================================================
// Linear soft-margin SVM trained on [mu | logvar] rows.
//
// Multiclass is handled one-vs-rest: one binary SVM per label,
// and a sample goes to the label whose hyperplane scores highest.
//
//   w = Σ αᵢ·xᵢ            (αᵢ already carries the sign of yᵢ)
//   f(x) = w·x − rho
//
// With exactly two labels this picks the same side of the single
// separating hyperplane as a binary SVM would.

use std::collections::BTreeSet;

use anyhow::{bail, ensure, Context, Result};
use linfa::prelude::*;
use linfa_svm::Svm;
use ndarray::{Array1, Array2};

/// Penalty applied to margin violations when none is configured.
pub const DEFAULT_C: f64 = 100.0;

#[derive(Debug, Clone)]
struct Hyperplane {
    class:   i32,
    weights: Array1<f64>,
    rho:     f64,
}

impl Hyperplane {
    #[inline]
    fn decision(&self, x: &Array1<f64>) -> f64 {
        self.weights.dot(x) - self.rho
    }
}

#[derive(Debug, Clone)]
pub struct FeatureClassifier {
    planes:   Vec<Hyperplane>,
    /// Returned for every sample when training saw a single label
    fallback: i32,
    dim:      usize,
}

fn to_matrix(rows: &[Vec<f64>]) -> Result<Array2<f64>> {
    let dim = rows.first().map_or(0, Vec::len);
    ensure!(rows.iter().all(|r| r.len() == dim), "feature rows have differing widths");
    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    Array2::from_shape_vec((rows.len(), dim), flat).context("Failed to build feature matrix")
}

impl FeatureClassifier {
    pub fn fit(features: &[Vec<f64>], labels: &[i32], c: f64) -> Result<Self> {
        ensure!(
            features.len() == labels.len(),
            "{} feature rows for {} labels",
            features.len(),
            labels.len()
        );
        ensure!(!labels.is_empty(), "No training samples provided");
        ensure!(c > 0.0 && c.is_finite(), "penalty C must be positive, got {c}");

        let records = to_matrix(features)?;
        let dim     = records.ncols();
        let classes: Vec<i32> = labels.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();

        if let [only] = classes.as_slice() {
            tracing::warn!("Training labels contain only class {}; every prediction will be {}", only, only);
            return Ok(Self { planes: Vec::new(), fallback: *only, dim });
        }

        let mut planes = Vec::with_capacity(classes.len());
        for &class in &classes {
            let targets = Array1::from_iter(labels.iter().map(|&l| l == class));
            let dataset = Dataset::new(records.clone(), targets);

            let svm = Svm::<f64, bool>::params()
                .pos_neg_weights(c, c)
                .linear_kernel()
                .fit(&dataset)
                .with_context(|| format!("SVM training failed for class {class}"))?;

            let mut weights = Array1::<f64>::zeros(dim);
            for (alpha_i, x_i) in svm.alpha.iter().zip(records.rows()) {
                weights = weights + &(x_i.to_owned() * *alpha_i);
            }
            tracing::debug!("Class {} hyperplane: w={:?} rho={:.4}", class, weights.to_vec(), svm.rho);

            planes.push(Hyperplane { class, weights, rho: svm.rho });
        }

        tracing::info!("Fitted {} one-vs-rest hyperplanes on {} samples (C={})", planes.len(), labels.len(), c);
        Ok(Self { planes, fallback: classes[0], dim })
    }

    pub fn classes(&self) -> Vec<i32> {
        if self.planes.is_empty() {
            vec![self.fallback]
        } else {
            self.planes.iter().map(|p| p.class).collect()
        }
    }

    pub fn predict_one(&self, features: &[f64]) -> Result<i32> {
        if features.len() != self.dim {
            bail!("expected {} features, got {}", self.dim, features.len());
        }
        let x = Array1::from_vec(features.to_vec());
        let best = self
            .planes
            .iter()
            .map(|p| (p.class, p.decision(&x)))
            .fold(None, |best: Option<(i32, f64)>, (class, score)| match best {
                Some((_, s)) if s >= score => best,
                _ => Some((class, score)),
            });
        Ok(best.map_or(self.fallback, |(class, _)| class))
    }

    pub fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<i32>> {
        features.iter().map(|row| self.predict_one(row)).collect()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn rows(points: &[[f64; 4]]) -> Vec<Vec<f64>> {
        points.iter().map(|p| p.to_vec()).collect()
    }

    #[test]
    fn test_separable_two_classes() {
        let x = rows(&[
            [0.0, 0.0, -1.0, -1.0],
            [0.2, 0.1, -1.1, -0.9],
            [2.0, 2.0, -3.0, -3.0],
            [2.2, 1.9, -3.1, -2.9],
        ]);
        let y = [0, 0, 1, 1];
        let clf = FeatureClassifier::fit(&x, &y, DEFAULT_C).unwrap();
        assert_eq!(clf.classes(), vec![0, 1]);
        assert_eq!(clf.predict(&x).unwrap(), y.to_vec());
    }

    #[test]
    fn test_three_clusters() {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for (label, centre) in [(0, -4.0), (1, 0.0), (2, 4.0)] {
            for k in 0..5 {
                let d = k as f64 * 0.05;
                x.push(vec![centre + d, centre - d, 0.0, 0.0]);
                y.push(label);
            }
        }
        // Middle class is not linearly separable from the rest in one-vs-rest,
        // so only check the outer clusters.
        let clf  = FeatureClassifier::fit(&x, &y, DEFAULT_C).unwrap();
        let pred = clf.predict(&[vec![-4.0, -4.0, 0.0, 0.0], vec![4.0, 4.0, 0.0, 0.0]]).unwrap();
        assert_eq!(pred, vec![0, 2]);
    }

    #[test]
    fn test_single_class_uses_fallback() {
        let x = rows(&[[1.0, 0.0, 0.0, 0.0], [0.5, 0.5, 0.0, 0.0]]);
        let clf = FeatureClassifier::fit(&x, &[3, 3], DEFAULT_C).unwrap();
        assert_eq!(clf.predict(&[vec![9.0, 9.0, 9.0, 9.0]]).unwrap(), vec![3]);
    }

    #[test]
    fn test_invalid_inputs_are_errors() {
        let x = rows(&[[1.0, 0.0, 0.0, 0.0]]);
        assert!(FeatureClassifier::fit(&x, &[0, 1], DEFAULT_C).is_err());
        assert!(FeatureClassifier::fit(&[], &[], DEFAULT_C).is_err());
        assert!(FeatureClassifier::fit(&x, &[0], 0.0).is_err());

        let clf = FeatureClassifier::fit(&x, &[0], DEFAULT_C).unwrap();
        assert!(clf.predict_one(&[1.0]).is_err());
    }
}
