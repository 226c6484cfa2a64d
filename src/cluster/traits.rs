use super::corpus::Corpus;
use super::density::Clusters;
use crate::error::Result;

/// Common interface for corpus clustering algorithms.
pub trait Clustering {
    /// Partition `corpus` into clusters.
    ///
    /// Documents the algorithm treats as noise are removed from `corpus` and
    /// appear in no cluster. Every remaining document appears in exactly one.
    fn analyze(&self, corpus: &mut Corpus) -> Result<Clusters>;
}
