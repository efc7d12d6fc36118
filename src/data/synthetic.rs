// ============================================================
// Layer 4 — Synthetic Height Generator
// ============================================================
// Produces a two-class height dataset for demos and tests:
//
//   class 0 ~ N(1.62 m, 0.07 m)
//   class 1 ~ N(1.76 m, 0.07 m)
//
// Heights are kept in metres so the reconstruction target of the
// sigmoid cross-entropy stays close to the unit interval.
// Deterministic for a given seed.

use anyhow::Result;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::domain::sample::{DatasetSplit, HeightData};

const CLASS_MEANS: [f64; 2] = [1.62, 1.76];
const CLASS_STD:   f64      = 0.07;

/// Box-Muller transform for a normal draw.
fn gauss(rng: &mut StdRng, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(1e-15);
    let u2: f64 = rng.gen();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + std_dev * z
}

fn generate_split(name: &str, count: usize, rng: &mut StdRng) -> Result<DatasetSplit> {
    let (inputs, labels): (Vec<f32>, Vec<i32>) = (0..count)
        .map(|_| {
            let label = rng.gen_range(0..CLASS_MEANS.len());
            let height = gauss(rng, CLASS_MEANS[label], CLASS_STD);
            (height as f32, label as i32)
        })
        .unzip();
    DatasetSplit::new(name, inputs, labels)
}

pub fn generate_heights(train: usize, test: usize, seed: u64) -> Result<HeightData> {
    let mut rng = StdRng::seed_from_u64(seed);
    Ok(HeightData {
        train: generate_split("train", train, &mut rng)?,
        test:  generate_split("test", test, &mut rng)?,
    })
}
