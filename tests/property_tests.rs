use std::collections::{BTreeMap, BTreeSet};

use docclump::cluster::{
    cosine_distance, l1_distance, Clustering, Corpus, DensityClustering, DisjointSet,
    FeatureVector, Metric,
};
use proptest::prelude::*;

fn arb_vector(min_features: usize) -> impl Strategy<Value = FeatureVector> {
    prop::collection::btree_map(0usize..6, 0.1f64..3.0, min_features..5).prop_map(|m| {
        m.into_iter()
            .map(|(f, w)| (format!("f{f}"), w))
            .collect::<FeatureVector>()
    })
}

fn arb_corpus(min_features: usize) -> impl Strategy<Value = Corpus> {
    prop::collection::vec(arb_vector(min_features), 1..16).prop_map(|docs| {
        docs.into_iter()
            .enumerate()
            .map(|(i, v)| (format!("d{i}"), v))
            .collect::<Corpus>()
    })
}

fn ids(corpus: &Corpus) -> BTreeSet<String> {
    corpus.ids().map(str::to_string).collect()
}

fn outlier_count(corpus: &Corpus, metric: Metric, cut: f64, p_cut: usize) -> usize {
    let mut corpus = corpus.clone();
    DensityClustering::new(metric, cut, p_cut)
        .analyze_detailed(&mut corpus)
        .unwrap()
        .outlier_count()
}

proptest! {
    #[test]
    fn prop_clusters_partition_survivors(
        corpus in arb_corpus(0),
        cut in 0.0f64..6.0,
        p_cut in 1usize..5,
    ) {
        let before = ids(&corpus);
        let mut corpus = corpus;
        let analysis = DensityClustering::new(Metric::L1, cut, p_cut)
            .analyze_detailed(&mut corpus)
            .unwrap();
        let after = ids(&corpus);

        let mut seen = BTreeSet::new();
        for members in analysis.clusters.values() {
            prop_assert!(!members.is_empty());
            for m in members {
                prop_assert!(seen.insert(m.clone()), "{} in two clusters", m);
            }
        }
        prop_assert_eq!(&seen, &after);

        let outliers: BTreeSet<String> = analysis.outliers.iter().cloned().collect();
        prop_assert!(outliers.is_disjoint(&after));
        let all: BTreeSet<String> = after.union(&outliers).cloned().collect();
        prop_assert_eq!(all, before);
    }

    #[test]
    fn prop_cosine_clusters_partition_survivors(
        corpus in arb_corpus(1),
        cut in 0.0f64..1.0,
        p_cut in 1usize..4,
    ) {
        let mut corpus = corpus;
        let clusters = DensityClustering::new(Metric::Cosine, cut, p_cut)
            .analyze(&mut corpus)
            .unwrap();
        let members: usize = clusters.values().map(Vec::len).sum();
        prop_assert_eq!(members, corpus.len());
    }

    #[test]
    fn prop_metrics_symmetric(a in arb_vector(0), b in arb_vector(0)) {
        prop_assert_eq!(l1_distance(&a, &b), l1_distance(&b, &a));
        prop_assert_eq!(cosine_distance(&a, &b), cosine_distance(&b, &a));
        prop_assert!(l1_distance(&a, &b) >= 0.0);
        prop_assert!((0.0..=2.0).contains(&cosine_distance(&a, &b)));
    }

    #[test]
    fn prop_self_distance_zero(a in arb_vector(1)) {
        prop_assert_eq!(l1_distance(&a, &a), 0.0);
        prop_assert!(cosine_distance(&a, &a) < 1e-9);
    }

    #[test]
    fn prop_find_idempotent(
        n in 1usize..40,
        pairs in prop::collection::vec((0usize..40, 0usize..40), 0..60),
    ) {
        let mut sets = DisjointSet::new(n);
        for (i, j) in pairs {
            if i < n && j < n {
                sets.union(i, j);
                prop_assert!(sets.same_set(i, j));
            }
        }
        let first: Vec<usize> = (0..n).map(|x| sets.find(x)).collect();
        let second: Vec<usize> = (0..n).map(|x| sets.find(x)).collect();
        prop_assert_eq!(&first, &second);
        for (x, &root) in first.iter().enumerate() {
            prop_assert_eq!(first[root], root, "root of {} is not its own root", x);
        }
    }

    #[test]
    fn prop_outliers_monotone_in_cut(
        corpus in arb_corpus(0),
        cut in 0.0f64..4.0,
        extra in 0.0f64..2.0,
        p_cut in 1usize..5,
    ) {
        let lo = outlier_count(&corpus, Metric::L1, cut, p_cut);
        let hi = outlier_count(&corpus, Metric::L1, cut + extra, p_cut);
        prop_assert!(hi <= lo, "cut {} -> {}: outliers {} -> {}", cut, cut + extra, lo, hi);
    }

    #[test]
    fn prop_outliers_monotone_in_p_cut(
        corpus in arb_corpus(0),
        cut in 0.0f64..4.0,
        p_cut in 1usize..5,
        extra in 0usize..3,
    ) {
        let lo = outlier_count(&corpus, Metric::L1, cut, p_cut);
        let hi = outlier_count(&corpus, Metric::L1, cut, p_cut + extra);
        prop_assert!(hi >= lo);
    }
}

#[test]
fn identical_pair_and_stray() {
    let mut corpus: Corpus = vec![
        ("X", [("f1", 1.0)].into_iter().collect::<FeatureVector>()),
        ("Y", [("f1", 1.0)].into_iter().collect()),
        ("Z", [("f2", 1.0)].into_iter().collect()),
    ]
    .into_iter()
    .collect();

    let clusters = DensityClustering::new(Metric::L1, 0.0, 1)
        .analyze(&mut corpus)
        .unwrap();

    let expected: BTreeMap<String, Vec<String>> =
        [("Y".to_string(), vec!["X".to_string(), "Y".to_string()])].into_iter().collect();
    assert_eq!(clusters, expected);
    assert_eq!(ids(&corpus), ["X", "Y"].iter().map(|s| s.to_string()).collect::<BTreeSet<_>>());
}

#[test]
fn zero_overlap_cosine_is_max_distance() {
    let a: FeatureVector = [("left", 2.0)].into_iter().collect();
    let b: FeatureVector = [("right", 3.0)].into_iter().collect();
    let zero: FeatureVector = [("left", 0.0)].into_iter().collect();

    assert_eq!(Metric::Cosine.distance(&a, &b), 1.0);
    assert_eq!(Metric::Cosine.distance(&zero, &a), 1.0);
    assert!(!Metric::Cosine.distance(&zero, &zero).is_nan());
}
