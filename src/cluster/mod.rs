//! Clustering sparse document vectors.
//!
//! ## Input Model
//!
//! A [`Corpus`] maps unique document identifiers to [`FeatureVector`]s. A
//! feature vector is sparse: any feature it does not store weighs zero.
//! Weights must be finite and non-negative. Producing them (tokenizing,
//! stemming, selecting features, computing TF-IDF) happens upstream.
//!
//! ## Metrics
//!
//! - **L1**: `Σ_f |a_f - b_f|` over the union of features.
//! - **Cosine**: `1 - a·b / (|a| |b|)`, where the dot product only visits
//!   shared features. Near-orthogonal pairs (`|a·b| < 1e-9`) are at distance
//!   exactly `1.0`.
//!
//! ## Density Clustering
//!
//! [`DensityClustering`] labels each document by how many others lie within
//! a distance `cut`:
//!
//! ```text
//! core      count >= p_cut
//! border    not core, some core document within cut
//! outlier   neither (removed from the corpus)
//! ```
//!
//! Core documents within `cut` of each other share a cluster, transitively.
//! Border documents join the cluster of their nearest core document.
//!
//! ## Usage
//!
//! ```rust
//! use docclump::cluster::{Clustering, Corpus, DensityClustering, FeatureVector, Metric};
//!
//! let doc = |pairs: &[(&str, f64)]| pairs.iter().copied().collect::<FeatureVector>();
//!
//! let mut corpus: Corpus = vec![
//!     ("a", doc(&[("rust", 1.0), ("crate", 0.5)])),
//!     ("b", doc(&[("rust", 0.9), ("crate", 0.6)])),
//!     ("c", doc(&[("bread", 2.0)])),
//! ]
//! .into_iter()
//! .collect();
//!
//! let engine = DensityClustering::new(Metric::Cosine, 0.2, 1);
//! let clusters = engine.analyze(&mut corpus).unwrap();
//!
//! assert_eq!(clusters.len(), 1);
//! assert!(!corpus.contains("c")); // outlier pruned
//! ```

mod corpus;
mod density;
mod metric;
mod traits;
mod util;

pub use corpus::{Corpus, FeatureVector};
pub use density::{Analysis, Clusters, DensityClustering, Phase, Role};
pub use metric::{cosine_distance, l1_distance, Metric, ORTHOGONAL_EPSILON};
pub use traits::Clustering;
pub use util::DisjointSet;
