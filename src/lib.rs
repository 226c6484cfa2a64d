//! Density clustering for sparse document vectors.
//!
//! `docclump` groups documents represented as sparse weighted-feature vectors
//! (for example TF-IDF scores) by counting close neighbors, merging dense
//! documents with a disjoint-set forest, pruning outliers, and attaching the
//! remaining border documents to their nearest dense neighbor.
//!
//! The primary public API is under [`cluster`], which provides:
//! - [`FeatureVector`] and [`Corpus`], the input model
//! - [`Metric`], L1 and cosine distances over sparse vectors
//! - [`DensityClustering`], the clustering engine
//! - [`DisjointSet`], the union-find forest used for merging

#![forbid(unsafe_code)]

pub mod cluster;
pub mod error;

pub use cluster::{
    Analysis, Clustering, Clusters, Corpus, DensityClustering, DisjointSet, FeatureVector, Metric,
    Phase, Role,
};
pub use error::{Error, Result};
