//! Density clustering of sparse documents with union-find merging.
//!
//! # The Algorithm
//!
//! A close relative of DBSCAN, specialised for document vectors:
//!
//! 1. **Density**: for every ordered pair `(i, j)`, `i != j`, compute the
//!    distance and count `j` as a neighbor of `i` when it is within `cut`.
//! 2. **Merge**: a document with at least `p_cut` neighbors is *core*. Core
//!    documents within `cut` of each other are unioned. A non-core document
//!    with a core neighbor is a *border* point; one without is an *outlier*.
//! 3. **Prune**: outliers are removed from the corpus.
//! 4. **Assign**: each core document belongs to its own set; each border
//!    document joins the set of its nearest surviving core document.
//!
//! Clusters are keyed by the identifier of their disjoint-set root.
//!
//! ## Complexity
//!
//! - **Time**: O(n²) distance evaluations, each linear in the number of
//!   stored features of the two documents. Phase 1 runs on the rayon pool.
//! - **Space**: O(n²) for the full distance matrix.
//!
//! ## Differences from DBSCAN
//!
//! - `p_cut` counts neighbors *excluding* the point itself.
//! - Border points are attached to the nearest core point overall rather
//!   than to whichever cluster reached them first, which makes the result
//!   independent of traversal order.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info, trace};
use rayon::prelude::*;

use super::corpus::Corpus;
use super::metric::Metric;
use super::traits::Clustering;
use super::util::DisjointSet;
use crate::error::{Error, Result};

/// Cluster anchor identifier mapped to member identifiers in corpus order.
pub type Clusters = BTreeMap<String, Vec<String>>;

/// Stages of a clustering run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Pairwise distances and neighbor counts.
    Density,
    /// Role classification and core merging.
    Merge,
    /// Outlier removal.
    Prune,
    /// Border assignment and grouping.
    Assign,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Density => "density computation",
            Phase::Merge => "core merging",
            Phase::Prune => "outlier pruning",
            Phase::Assign => "cluster assignment",
        })
    }
}

/// Role of a document, fixed once neighbor counts are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// At least `p_cut` neighbors within `cut`.
    Core,
    /// Not core, but within `cut` of a core document.
    Border,
    /// Not core and no core document within `cut`. Pruned.
    Outlier,
}

/// Full result of a clustering run.
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    /// The partition of surviving documents.
    pub clusters: Clusters,
    /// Pruned documents, in corpus order.
    pub outliers: Vec<String>,
    /// Role of every document that took part in the run, in corpus order.
    pub roles: Vec<(String, Role)>,
    /// Neighbor count of every document that took part in the run.
    pub densities: Vec<(String, usize)>,
}

impl Analysis {
    /// Number of clusters.
    pub fn n_clusters(&self) -> usize {
        self.clusters.len()
    }

    /// Number of core documents.
    pub fn core_count(&self) -> usize {
        self.count_role(Role::Core)
    }

    /// Number of border documents.
    pub fn border_count(&self) -> usize {
        self.count_role(Role::Border)
    }

    /// Number of pruned documents.
    pub fn outlier_count(&self) -> usize {
        self.outliers.len()
    }

    /// Role assigned to `id`, if it took part in the run.
    pub fn role_of(&self, id: &str) -> Option<Role> {
        self.roles.iter().find(|(doc, _)| doc == id).map(|(_, r)| *r)
    }

    /// Anchor of the cluster containing `id`.
    pub fn cluster_of(&self, id: &str) -> Option<&str> {
        self.clusters
            .iter()
            .find(|(_, members)| members.iter().any(|m| m == id))
            .map(|(anchor, _)| anchor.as_str())
    }

    fn count_role(&self, role: Role) -> usize {
        self.roles.iter().filter(|(_, r)| *r == role).count()
    }
}

/// Density clustering engine.
#[derive(Debug, Clone)]
pub struct DensityClustering {
    metric: Metric,
    /// Maximum distance for two documents to be neighbors.
    cut: f64,
    /// Minimum neighbor count (self excluded) for a core document.
    p_cut: usize,
}

impl DensityClustering {
    /// Create a new engine.
    ///
    /// # Arguments
    ///
    /// * `metric` - How documents are compared.
    /// * `cut` - Maximum distance between two neighbors. Zero is allowed and
    ///   makes only identical documents (under the metric) neighbors.
    /// * `p_cut` - Neighbors needed for a document to be core.
    ///
    /// # Typical Values
    ///
    /// For TF-IDF vectors under the cosine metric, `cut` around 0.6 and
    /// `p_cut` between 5 and 6 on a few thousand documents.
    pub fn new(metric: Metric, cut: f64, p_cut: usize) -> Self {
        Self { metric, cut, p_cut }
    }

    /// Set the distance metric.
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Set the neighbor distance threshold.
    pub fn with_cut(mut self, cut: f64) -> Self {
        self.cut = cut;
        self
    }

    /// Set the core neighbor count.
    pub fn with_p_cut(mut self, p_cut: usize) -> Self {
        self.p_cut = p_cut;
        self
    }

    /// Configured metric.
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Configured neighbor distance threshold.
    pub fn cut(&self) -> f64 {
        self.cut
    }

    /// Configured core neighbor count.
    pub fn p_cut(&self) -> usize {
        self.p_cut
    }

    /// Cluster `corpus`, pruning outliers from it, and report every stage.
    pub fn analyze_detailed(&self, corpus: &mut Corpus) -> Result<Analysis> {
        self.run(corpus, |_| false)
    }

    /// Like [`analyze_detailed`](Self::analyze_detailed), checking `cancel`
    /// before each phase.
    ///
    /// On any error, cancellation included, `corpus` is left unchanged.
    pub fn analyze_with_cancel(&self, corpus: &mut Corpus, cancel: &AtomicBool) -> Result<Analysis> {
        self.run(corpus, |_| cancel.load(Ordering::Relaxed))
    }

    /// `stop(phase)` is asked before each phase starts.
    fn run(&self, corpus: &mut Corpus, stop: impl Fn(Phase) -> bool) -> Result<Analysis> {
        self.validate_params()?;
        let docs: Vec<usize> = corpus.active_indices().collect();
        self.validate_corpus(corpus, &docs)?;

        let n = docs.len();
        debug!(
            "density clustering: {} documents, metric={}, cut={}, p_cut={}",
            n, self.metric, self.cut, self.p_cut
        );

        checkpoint(&stop, Phase::Density)?;
        let (dist, counts) = self.pairwise(corpus, &docs);

        checkpoint(&stop, Phase::Merge)?;
        let roles = self.classify(&dist, &counts);
        let mut sets = self.merge_cores(&dist, &roles);
        debug!(
            "merge: {} core, {} border",
            roles.iter().filter(|r| **r == Role::Core).count(),
            roles.iter().filter(|r| **r == Role::Border).count()
        );

        checkpoint(&stop, Phase::Prune)?;
        let alive: Vec<bool> = roles.iter().map(|r| *r != Role::Outlier).collect();
        let pruned = alive.iter().filter(|a| !**a).count();
        info!("pruned {} outlier documents of {}", pruned, n);

        checkpoint(&stop, Phase::Assign)?;
        let anchors = assign_anchors(&dist, &roles, &alive).map_err(|unresolved| {
            Error::UnresolvedBorder {
                documents: unresolved
                    .into_iter()
                    .map(|i| corpus.id_at(docs[i]).to_string())
                    .collect(),
            }
        })?;

        let mut clusters = Clusters::new();
        for (i, anchor) in anchors.iter().enumerate() {
            if let Some(anchor) = anchor {
                let root = sets.find(*anchor);
                clusters
                    .entry(corpus.id_at(docs[root]).to_string())
                    .or_default()
                    .push(corpus.id_at(docs[i]).to_string());
            }
        }
        info!("{} clusters over {} documents", clusters.len(), n - pruned);

        let id = |i: usize| corpus.id_at(docs[i]).to_string();
        let analysis = Analysis {
            clusters,
            outliers: (0..n).filter(|&i| !alive[i]).map(id).collect(),
            roles: roles.iter().enumerate().map(|(i, r)| (id(i), *r)).collect(),
            densities: counts.iter().enumerate().map(|(i, c)| (id(i), *c)).collect(),
        };

        for (i, &keep) in alive.iter().enumerate() {
            if !keep {
                corpus.deactivate(docs[i]);
            }
        }
        Ok(analysis)
    }

    fn validate_params(&self) -> Result<()> {
        if self.p_cut == 0 {
            return Err(Error::InvalidParameter {
                name: "p_cut",
                message: "must be at least 1",
            });
        }
        if !self.cut.is_finite() || self.cut < 0.0 {
            return Err(Error::InvalidParameter {
                name: "cut",
                message: "must be finite and non-negative",
            });
        }
        Ok(())
    }

    fn validate_corpus(&self, corpus: &Corpus, docs: &[usize]) -> Result<()> {
        if docs.is_empty() {
            return Err(Error::EmptyInput);
        }

        for &idx in docs {
            let id = corpus.id_at(idx);
            if id.is_empty() {
                return Err(Error::InvalidParameter {
                    name: "document id",
                    message: "must be non-empty",
                });
            }
            if let Some((feature, weight)) = corpus.vector_at(idx).first_invalid_weight() {
                return Err(Error::InvalidWeight {
                    document: id.to_string(),
                    feature: feature.to_string(),
                    weight,
                });
            }
        }

        if self.metric == Metric::Cosine {
            let degenerate: Vec<String> = docs
                .iter()
                .filter(|&&idx| {
                    let norm = corpus.vector_at(idx).norm();
                    norm == 0.0 || !norm.is_finite()
                })
                .map(|&idx| corpus.id_at(idx).to_string())
                .collect();
            if !degenerate.is_empty() {
                return Err(Error::DegenerateVector {
                    documents: degenerate,
                });
            }
        }
        Ok(())
    }

    /// Phase 1: row-major `n * n` distance matrix and neighbor counts.
    ///
    /// Each rayon task owns one row and one count slot.
    fn pairwise(&self, corpus: &Corpus, docs: &[usize]) -> (Vec<f64>, Vec<usize>) {
        let n = docs.len();
        let mut dist = vec![0.0f64; n * n];
        let mut counts = vec![0usize; n];

        dist.par_chunks_mut(n)
            .zip(counts.par_iter_mut())
            .enumerate()
            .for_each(|(i, (row, count))| {
                let a = corpus.vector_at(docs[i]);
                for (j, slot) in row.iter_mut().enumerate() {
                    if i == j {
                        continue;
                    }
                    let d = self.metric.distance(a, corpus.vector_at(docs[j]));
                    *slot = d;
                    if d <= self.cut {
                        *count += 1;
                    }
                }
            });

        (dist, counts)
    }

    fn classify(&self, dist: &[f64], counts: &[usize]) -> Vec<Role> {
        let n = counts.len();
        let is_core: Vec<bool> = counts.iter().map(|&c| c >= self.p_cut).collect();

        (0..n)
            .map(|i| {
                if is_core[i] {
                    Role::Core
                } else if (0..n).any(|j| j != i && is_core[j] && dist[i * n + j] <= self.cut) {
                    Role::Border
                } else {
                    Role::Outlier
                }
            })
            .collect()
    }

    /// Phase 2: union every pair of core documents within `cut`.
    fn merge_cores(&self, dist: &[f64], roles: &[Role]) -> DisjointSet {
        let n = roles.len();
        let mut sets = DisjointSet::new(n);
        for i in (0..n).filter(|&i| roles[i] == Role::Core) {
            for j in (0..n).filter(|&j| j != i && roles[j] == Role::Core) {
                if dist[i * n + j] <= self.cut {
                    sets.union(i, j);
                }
            }
        }
        sets
    }
}

impl Default for DensityClustering {
    fn default() -> Self {
        Self::new(Metric::Cosine, 0.6, 6)
    }
}

impl Clustering for DensityClustering {
    fn analyze(&self, corpus: &mut Corpus) -> Result<Clusters> {
        self.analyze_detailed(corpus).map(|a| a.clusters)
    }
}

fn checkpoint(stop: impl Fn(Phase) -> bool, next: Phase) -> Result<()> {
    if stop(next) {
        debug!("cancelled before {}", next);
        return Err(Error::Cancelled { phase: next });
    }
    Ok(())
}

/// Phase 4: pick the disjoint-set element each surviving document hangs off.
///
/// Core documents anchor on themselves. Border documents anchor on their
/// nearest surviving core document; on equal distance the earliest one wins.
/// Pruned documents get `None`. Border documents with no surviving core
/// document are returned as the error.
fn assign_anchors(
    dist: &[f64],
    roles: &[Role],
    alive: &[bool],
) -> std::result::Result<Vec<Option<usize>>, Vec<usize>> {
    let n = roles.len();
    let cores: Vec<usize> = (0..n)
        .filter(|&j| alive[j] && roles[j] == Role::Core)
        .collect();

    let mut anchors = vec![None; n];
    let mut unresolved = Vec::new();

    for i in (0..n).filter(|&i| alive[i]) {
        if roles[i] == Role::Core {
            anchors[i] = Some(i);
            continue;
        }

        let mut best = f64::INFINITY;
        for &j in cores.iter().filter(|&&j| j != i) {
            let d = dist[i * n + j];
            if d < best {
                best = d;
                anchors[i] = Some(j);
            }
        }

        match anchors[i] {
            Some(j) => trace!("border {} -> core {} at {}", i, j, best),
            None => unresolved.push(i),
        }
    }

    if unresolved.is_empty() {
        Ok(anchors)
    } else {
        Err(unresolved)
    }
}
