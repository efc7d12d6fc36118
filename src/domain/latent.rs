// ============================================================
// Layer 3 — Latent Features
// ============================================================
// The encoder maps every height to a Gaussian in latent space,
// described by a mean row `mu` and a log-variance row `logvar`.
//
// For classification those two rows are glued together:
//
//   mu     = [m0, m1]            shape [N, 2]
//   logvar = [v0, v1]            shape [N, 2]
//   row    = [m0, m1, v0, v1]    shape [N, 4]
//
// The rows are rebuilt on every classification pass and never
// stored on their own.

use anyhow::{bail, Result};

/// Encoder outputs for a whole input set, one row per sample.
#[derive(Debug, Clone, PartialEq)]
pub struct LatentFeatures {
    pub mu:     Vec<Vec<f32>>,
    pub logvar: Vec<Vec<f32>>,
}

impl LatentFeatures {
    /// Rebuild row-major outputs of shape [rows, latent_dim].
    pub fn from_flat(mu: Vec<f32>, logvar: Vec<f32>, latent_dim: usize) -> Result<Self> {
        if latent_dim == 0 || mu.len() != logvar.len() || mu.len() % latent_dim != 0 {
            bail!(
                "cannot split {} mu / {} logvar values into rows of {latent_dim}",
                mu.len(),
                logvar.len()
            );
        }
        let rows = |flat: Vec<f32>| flat.chunks(latent_dim).map(<[f32]>::to_vec).collect();
        Ok(Self { mu: rows(mu), logvar: rows(logvar) })
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.mu.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.mu.is_empty()
    }

    /// Concatenate `mu[i]` and `logvar[i]` along the feature axis.
    pub fn feature_rows(&self) -> Vec<Vec<f64>> {
        self.mu
            .iter()
            .zip(&self.logvar)
            .map(|(m, v)| m.iter().chain(v).map(|&x| f64::from(x)).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_rows_shape_and_order() {
        let features = LatentFeatures {
            mu:     vec![vec![0.5, -1.0], vec![2.0, 3.0], vec![0.0, 0.25]],
            logvar: vec![vec![-0.5, 0.1], vec![1.5, -2.0], vec![4.0, 0.0]],
        };
        let rows = features.feature_rows();

        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.len() == 4));
        assert_eq!(rows[1], vec![2.0, 3.0, 1.5, -2.0]);
        for (i, row) in rows.iter().enumerate() {
            let mu: Vec<f64> = features.mu[i].iter().map(|&x| x as f64).collect();
            let lv: Vec<f64> = features.logvar[i].iter().map(|&x| x as f64).collect();
            assert_eq!(row[..2], mu[..]);
            assert_eq!(row[2..], lv[..]);
        }
    }

    #[test]
    fn test_from_flat_splits_rows() {
        let f = LatentFeatures::from_flat(vec![1.0, 2.0, 3.0, 4.0], vec![5.0, 6.0, 7.0, 8.0], 2)
            .unwrap();
        assert_eq!(f.len(), 2);
        assert_eq!(f.mu[1], vec![3.0, 4.0]);
        assert_eq!(f.logvar[0], vec![5.0, 6.0]);
    }

    #[test]
    fn test_from_flat_rejects_ragged_input() {
        assert!(LatentFeatures::from_flat(vec![1.0, 2.0, 3.0], vec![1.0, 2.0, 3.0], 2).is_err());
        assert!(LatentFeatures::from_flat(vec![1.0, 2.0], vec![1.0], 1).is_err());
    }
}
