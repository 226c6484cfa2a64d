//! Dissimilarity between sparse feature vectors.
//!
//! Both metrics walk the two sorted entry lists with a merge join, visiting
//! features in the same order regardless of argument order. `distance(a, b)`
//! and `distance(b, a)` are therefore bit-identical, not merely close.

use std::cmp::Ordering;
use std::fmt;

use super::corpus::FeatureVector;

/// Dot products this close to zero are treated as orthogonal.
pub const ORTHOGONAL_EPSILON: f64 = 1e-9;

/// Distance metric used to compare documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Metric {
    /// Manhattan distance over the union of features.
    L1,
    /// `1 - cos(a, b)`.
    #[default]
    Cosine,
}

impl Metric {
    /// Distance between two vectors. Never negative.
    #[inline]
    pub fn distance(&self, a: &FeatureVector, b: &FeatureVector) -> f64 {
        match self {
            Metric::L1 => l1_distance(a, b),
            Metric::Cosine => cosine_distance(a, b),
        }
    }

    /// Short lowercase name, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Metric::L1 => "l1",
            Metric::Cosine => "cosine",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Manhattan distance. Absent features count as weight zero.
pub fn l1_distance(a: &FeatureVector, b: &FeatureVector) -> f64 {
    let (a, b) = (a.entries(), b.entries());
    let (mut i, mut j) = (0, 0);
    let mut dist = 0.0;

    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            Ordering::Less => {
                dist += a[i].1.abs();
                i += 1;
            }
            Ordering::Greater => {
                dist += b[j].1.abs();
                j += 1;
            }
            Ordering::Equal => {
                dist += (a[i].1 - b[j].1).abs();
                i += 1;
                j += 1;
            }
        }
    }
    // Only one of these tails is non-empty, so the summation order is the
    // same for (a, b) and (b, a).
    dist += a[i..].iter().map(|(_, w)| w.abs()).sum::<f64>();
    dist += b[j..].iter().map(|(_, w)| w.abs()).sum::<f64>();
    dist
}

/// Cosine distance `1 - dot / (|a| |b|)`.
///
/// The dot product only covers shared features. If it is within
/// [`ORTHOGONAL_EPSILON`] of zero the result is `1.0` and norms are never
/// consulted, so a zero-norm vector compares as maximally distant instead of
/// producing NaN.
///
/// The similarity itself sums `(a_f / |a|) * (b_f / |b|)`, so it stays finite
/// for weights whose raw products would overflow.
pub fn cosine_distance(a: &FeatureVector, b: &FeatureVector) -> f64 {
    let (dot, sim) = sparse_dot(a, b);
    if dot.abs() < ORTHOGONAL_EPSILON {
        return 1.0;
    }
    if sim.is_nan() {
        return 1.0;
    }
    (1.0 - sim).clamp(0.0, 2.0)
}

/// Raw and norm-scaled dot products over shared features.
fn sparse_dot(a: &FeatureVector, b: &FeatureVector) -> (f64, f64) {
    let (na, nb) = (a.norm(), b.norm());
    let (a, b) = (a.entries(), b.entries());
    let (mut i, mut j) = (0, 0);
    let (mut dot, mut sim) = (0.0, 0.0);

    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                dot += a[i].1 * b[j].1;
                sim += (a[i].1 / na) * (b[j].1 / nb);
                i += 1;
                j += 1;
            }
        }
    }
    (dot, sim)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fv(pairs: &[(&str, f64)]) -> FeatureVector {
        pairs.iter().map(|&(f, w)| (f, w)).collect()
    }

    #[test]
    fn l1_union_of_keys() {
        let a = fv(&[("x", 1.0), ("y", 2.0)]);
        let b = fv(&[("y", 0.5), ("z", 3.0)]);
        // |1 - 0| + |2 - 0.5| + |0 - 3|
        assert!((l1_distance(&a, &b) - 5.5).abs() < 1e-12);
        assert_eq!(l1_distance(&a, &b), l1_distance(&b, &a));
    }

    #[test]
    fn l1_identical_is_zero() {
        let a = fv(&[("x", 0.3), ("y", 1.7)]);
        assert_eq!(l1_distance(&a, &a), 0.0);
        assert_eq!(l1_distance(&FeatureVector::new(), &FeatureVector::new()), 0.0);
    }

    #[test]
    fn cosine_parallel_and_self() {
        let a = fv(&[("x", 1.0), ("y", 2.0)]);
        let b = fv(&[("x", 2.0), ("y", 4.0)]);
        assert!(cosine_distance(&a, &b) < 1e-12);
        assert!(cosine_distance(&a, &a) < 1e-12);
    }

    #[test]
    fn cosine_known_angle() {
        let a = fv(&[("x", 1.0)]);
        let b = fv(&[("x", 1.0), ("y", 1.0)]);
        let expected = 1.0 - 1.0 / 2f64.sqrt();
        assert!((cosine_distance(&a, &b) - expected).abs() < 1e-12);
        assert_eq!(cosine_distance(&a, &b), cosine_distance(&b, &a));
    }

    #[test]
    fn cosine_disjoint_keys_is_one() {
        let a = fv(&[("x", 1.0)]);
        let b = fv(&[("y", 1.0)]);
        assert_eq!(cosine_distance(&a, &b), 1.0);
    }

    #[test]
    fn cosine_zero_norm_short_circuits() {
        let zero = fv(&[("x", 0.0)]);
        let empty = FeatureVector::new();
        let a = fv(&[("x", 1.0)]);
        assert_eq!(zero.norm(), 0.0);
        assert_eq!(cosine_distance(&zero, &a), 1.0);
        assert_eq!(cosine_distance(&a, &empty), 1.0);
        assert_eq!(cosine_distance(&empty, &empty), 1.0);
    }

    #[test]
    fn cosine_large_weights_stay_finite() {
        let a = fv(&[("t", 1e160)]);
        let b = fv(&[("t", 1e160), ("u", 1e160)]);
        assert_eq!(cosine_distance(&a, &a), 0.0);
        let expected = 1.0 - 1.0 / 2f64.sqrt();
        assert!((cosine_distance(&a, &b) - expected).abs() < 1e-12);
        assert!(!cosine_distance(&b, &b).is_nan());
    }

    #[test]
    fn cosine_infinite_norm_is_not_nan() {
        // Finite weights whose norm overflows f64.
        let a = fv(&[("t", f64::MAX), ("u", f64::MAX)]);
        assert!(a.norm().is_infinite());
        assert!(!cosine_distance(&a, &a).is_nan());
    }

    #[test]
    fn cosine_tiny_weights_follow_raw_dot_cutoff() {
        // The raw dot product underflows below the orthogonal cutoff.
        let a = fv(&[("t", 1e-170)]);
        assert!(a.norm() > 0.0);
        assert_eq!(cosine_distance(&a, &a), 1.0);
    }

    #[test]
    fn metric_dispatch() {
        let a = fv(&[("x", 1.0)]);
        let b = fv(&[("y", 1.0)]);
        assert_eq!(Metric::L1.distance(&a, &b), 2.0);
        assert_eq!(Metric::Cosine.distance(&a, &b), 1.0);
        assert_eq!(Metric::default(), Metric::Cosine);
        assert_eq!(Metric::L1.to_string(), "l1");
    }
}
