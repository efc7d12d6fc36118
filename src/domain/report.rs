// ============================================================
// Layer 3 — Classification Report
// ============================================================
// Per-class precision / recall / F1 / support for integer class
// labels, followed by accuracy, macro average and support-weighted
// average rows.
//
//   precision = TP / (TP + FP)
//   recall    = TP / (TP + FN)
//   f1        = 2·P·R / (P + R)
//
// Any 0/0 division yields 0.0. Classes are the sorted union of
// labels that appear in either the predictions or the truth.

use std::collections::BTreeSet;
use std::fmt;

use anyhow::{ensure, Result};

/// Scores for a single class (or an averaged row).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassScores {
    pub precision: f64,
    pub recall:    f64,
    pub f1:        f64,
    pub support:   usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationReport {
    pub classes:      Vec<(i32, ClassScores)>,
    pub accuracy:     f64,
    pub macro_avg:    ClassScores,
    pub weighted_avg: ClassScores,
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

fn f1(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 { 0.0 } else { 2.0 * precision * recall / (precision + recall) }
}

impl ClassificationReport {
    pub fn new(predicted: &[i32], truth: &[i32]) -> Result<Self> {
        ensure!(
            predicted.len() == truth.len(),
            "{} predictions for {} true labels",
            predicted.len(),
            truth.len()
        );
        ensure!(!truth.is_empty(), "cannot report on an empty label set");

        let labels: BTreeSet<i32> = predicted.iter().chain(truth).copied().collect();

        let classes: Vec<(i32, ClassScores)> = labels
            .into_iter()
            .map(|label| {
                let mut tp = 0;
                let mut fp = 0;
                let mut fn_ = 0;
                for (&p, &t) in predicted.iter().zip(truth) {
                    match (p == label, t == label) {
                        (true, true)   => tp += 1,
                        (true, false)  => fp += 1,
                        (false, true)  => fn_ += 1,
                        (false, false) => {}
                    }
                }
                let precision = ratio(tp, tp + fp);
                let recall    = ratio(tp, tp + fn_);
                let scores = ClassScores { precision, recall, f1: f1(precision, recall), support: tp + fn_ };
                (label, scores)
            })
            .collect();

        let total = truth.len();
        let correct = predicted.iter().zip(truth).filter(|(p, t)| p == t).count();
        let n = classes.len() as f64;

        let macro_avg = ClassScores {
            precision: classes.iter().map(|(_, s)| s.precision).sum::<f64>() / n,
            recall:    classes.iter().map(|(_, s)| s.recall).sum::<f64>() / n,
            f1:        classes.iter().map(|(_, s)| s.f1).sum::<f64>() / n,
            support:   total,
        };

        let weighted = |field: fn(&ClassScores) -> f64| {
            classes.iter().map(|(_, s)| field(s) * s.support as f64).sum::<f64>() / total as f64
        };
        let weighted_avg = ClassScores {
            precision: weighted(|s| s.precision),
            recall:    weighted(|s| s.recall),
            f1:        weighted(|s| s.f1),
            support:   total,
        };

        Ok(Self { classes, accuracy: ratio(correct, total), macro_avg, weighted_avg })
    }

    pub fn total_support(&self) -> usize {
        self.macro_avg.support
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .classes
            .iter()
            .map(|(label, _)| label.to_string().len())
            .chain(std::iter::once("weighted avg".len()))
            .max()
            .unwrap_or(0);

        let row = |f: &mut fmt::Formatter<'_>, name: &str, s: &ClassScores| {
            writeln!(
                f,
                "{name:>width$}  {:>9.2} {:>9.2} {:>9.2} {:>9}",
                s.precision, s.recall, s.f1, s.support
            )
        };

        writeln!(f, "{:>width$}  {:>9} {:>9} {:>9} {:>9}", "", "precision", "recall", "f1-score", "support")?;
        writeln!(f)?;
        for (label, scores) in &self.classes {
            row(f, &label.to_string(), scores)?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>width$}  {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy", "", "", self.accuracy, self.total_support()
        )?;
        row(f, "macro avg", &self.macro_avg)?;
        row(f, "weighted avg", &self.weighted_avg)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_perfect_predictions() {
        let r = ClassificationReport::new(&[0, 1, 1, 0], &[0, 1, 1, 0]).unwrap();
        assert!(close(r.accuracy, 1.0));
        for (_, s) in &r.classes {
            assert!(close(s.precision, 1.0) && close(s.recall, 1.0) && close(s.f1, 1.0));
            assert_eq!(s.support, 2);
        }
    }

    #[test]
    fn test_per_class_counts() {
        // truth:     0 0 0 1 1
        // predicted: 0 0 1 1 0
        let r = ClassificationReport::new(&[0, 0, 1, 1, 0], &[0, 0, 0, 1, 1]).unwrap();
        let (_, zero) = r.classes[0];
        let (_, one)  = r.classes[1];

        // class 0: tp=2 fp=1 fn=1
        assert!(close(zero.precision, 2.0 / 3.0));
        assert!(close(zero.recall,    2.0 / 3.0));
        assert_eq!(zero.support, 3);
        // class 1: tp=1 fp=1 fn=1
        assert!(close(one.precision, 0.5));
        assert!(close(one.recall,    0.5));
        assert_eq!(one.support, 2);

        assert!(close(r.accuracy, 0.6));
        assert!(close(r.macro_avg.f1, (2.0 / 3.0 + 0.5) / 2.0));
        assert!(close(r.weighted_avg.recall, (2.0 / 3.0 * 3.0 + 0.5 * 2.0) / 5.0));
    }

    #[test]
    fn test_class_only_in_predictions_has_zero_scores() {
        let r = ClassificationReport::new(&[2, 0], &[0, 0]).unwrap();
        let (label, s) = r.classes[1];
        assert_eq!(label, 2);
        assert_eq!(s.support, 0);
        assert!(close(s.precision, 0.0) && close(s.recall, 0.0) && close(s.f1, 0.0));
    }

    #[test]
    fn test_length_mismatch_is_error() {
        assert!(ClassificationReport::new(&[0, 1], &[0]).is_err());
        assert!(ClassificationReport::new(&[], &[]).is_err());
    }

    #[test]
    fn test_rendered_table() {
        let text = ClassificationReport::new(&[0, 1], &[0, 1]).unwrap().to_string();
        assert!(text.contains("precision"));
        assert!(text.contains("weighted avg"));
        assert!(text.lines().any(|l| l.trim_start().starts_with("accuracy") && l.ends_with('2')));
        assert!(text.lines().any(|l| l.trim_start().starts_with("1 ") && l.contains("1.00")));
    }
}
