//! Density clustering of a handful of tiny "documents".

use docclump::{Analysis, Clustering, Corpus, DensityClustering, FeatureVector, Metric, Role};

fn doc(terms: &[(&str, f64)]) -> FeatureVector {
    terms.iter().copied().collect()
}

fn print(title: &str, analysis: &Analysis) {
    println!("=== {title} ===");
    for (anchor, members) in &analysis.clusters {
        println!("  cluster {anchor:>10} => {}", members.join(", "));
    }
    for (id, role) in &analysis.roles {
        if *role == Role::Outlier {
            println!("  outlier {id:>10}");
        }
    }
    println!(
        "  {} core, {} border, {} pruned",
        analysis.core_count(),
        analysis.border_count(),
        analysis.outlier_count()
    );
}

fn main() {
    // Weights stand in for TF-IDF scores.
    let corpus: Corpus = vec![
        ("ownership", doc(&[("borrow", 2.1), ("lifetim", 1.4), ("compil", 0.6)])),
        ("lifetimes", doc(&[("borrow", 1.7), ("lifetim", 2.0)])),
        ("traits", doc(&[("borrow", 0.8), ("compil", 1.1), ("trait", 1.9)])),
        ("sourdough", doc(&[("flour", 2.2), ("starter", 1.8), ("oven", 0.9)])),
        ("baguette", doc(&[("flour", 2.0), ("oven", 1.5)])),
        ("brioche", doc(&[("flour", 1.6), ("butter", 1.9), ("oven", 1.0)])),
        ("comets", doc(&[("orbit", 2.5), ("ice", 1.2)])),
    ]
    .into_iter()
    .collect();

    let mut cosine_corpus = corpus.clone();
    let cosine = DensityClustering::new(Metric::Cosine, 0.6, 1);
    match cosine.analyze_detailed(&mut cosine_corpus) {
        Ok(analysis) => print("cosine (cut=0.6, p_cut=1)", &analysis),
        Err(e) => eprintln!("cosine run failed: {e}"),
    }

    let mut l1_corpus = corpus.clone();
    let l1 = DensityClustering::new(Metric::L1, 3.0, 1);
    match l1.analyze(&mut l1_corpus) {
        Ok(clusters) => {
            println!("\n=== l1 (cut=3.0, p_cut=1) ===");
            for (anchor, members) in clusters {
                println!("  cluster {anchor:>10} => {}", members.join(", "));
            }
            println!("  {} of {} documents kept", l1_corpus.len(), corpus.len());
        }
        Err(e) => eprintln!("l1 run failed: {e}"),
    }
}
