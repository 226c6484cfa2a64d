//! Sparse feature vectors and the document corpus they live in.
//!
//! A [`FeatureVector`] maps feature identifiers (terms) to non-negative
//! weights, typically TF-IDF scores. Absent features weigh zero. Entries are
//! kept sorted by feature so distance computations can merge-join two vectors
//! in a single pass.
//!
//! A [`Corpus`] maps document identifiers to feature vectors. Documents keep
//! the position they were inserted at; removing a document only marks its slot
//! inactive, so indices handed out during a clustering run stay valid.

use std::collections::{BTreeMap, HashMap};

/// Sparse mapping from feature identifier to weight.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureVector {
    /// Sorted by feature, no duplicates.
    entries: Vec<(String, f64)>,
    norm: f64,
}

impl FeatureVector {
    /// Create an empty vector.
    pub fn new() -> Self {
        Self::default()
    }

    fn from_sorted(entries: Vec<(String, f64)>) -> Self {
        let norm = scaled_norm(&entries);
        Self { entries, norm }
    }

    /// Weight of `feature`, zero when absent.
    pub fn get(&self, feature: &str) -> f64 {
        self.entries
            .binary_search_by(|(f, _)| f.as_str().cmp(feature))
            .map(|i| self.entries[i].1)
            .unwrap_or(0.0)
    }

    /// Number of stored features.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no feature is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(feature, weight)` pairs in feature order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.entries.iter().map(|(f, w)| (f.as_str(), *w))
    }

    /// Euclidean norm over all stored weights.
    pub fn norm(&self) -> f64 {
        self.norm
    }

    /// First entry whose weight is negative or not finite.
    pub fn first_invalid_weight(&self) -> Option<(&str, f64)> {
        self.iter().find(|(_, w)| !w.is_finite() || *w < 0.0)
    }

    pub(crate) fn entries(&self) -> &[(String, f64)] {
        &self.entries
    }
}

/// `max * sqrt(Σ (w / max)²)`, so squaring neither overflows for large
/// weights nor flushes small ones to zero.
fn scaled_norm(entries: &[(String, f64)]) -> f64 {
    let max = entries.iter().fold(0.0f64, |m, (_, w)| m.max(w.abs()));
    if max == 0.0 || !max.is_finite() {
        return max;
    }
    let sum: f64 = entries
        .iter()
        .map(|(_, w)| {
            let s = w / max;
            s * s
        })
        .sum();
    max * sum.sqrt()
}

impl<K: Into<String>> FromIterator<(K, f64)> for FeatureVector {
    /// A feature given more than once keeps its last weight.
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let map: BTreeMap<String, f64> = iter.into_iter().map(|(k, w)| (k.into(), w)).collect();
        Self::from_sorted(map.into_iter().collect())
    }
}

impl<K: Into<String>> From<HashMap<K, f64>> for FeatureVector {
    fn from(map: HashMap<K, f64>) -> Self {
        map.into_iter().collect()
    }
}

impl<K: Into<String>> From<BTreeMap<K, f64>> for FeatureVector {
    fn from(map: BTreeMap<K, f64>) -> Self {
        map.into_iter().collect()
    }
}

/// Documents keyed by identifier, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    ids: Vec<String>,
    vectors: Vec<FeatureVector>,
    active: Vec<bool>,
    index: HashMap<String, usize>,
    live: usize,
}

impl Corpus {
    /// Create an empty corpus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a document.
    ///
    /// Replacing keeps the document's original position. If the document had
    /// been removed it becomes active again and `None` is returned.
    pub fn insert(&mut self, id: impl Into<String>, vector: FeatureVector) -> Option<FeatureVector> {
        let id = id.into();
        match self.index.get(&id) {
            Some(&idx) => {
                let old = std::mem::replace(&mut self.vectors[idx], vector);
                if self.active[idx] {
                    Some(old)
                } else {
                    self.active[idx] = true;
                    self.live += 1;
                    None
                }
            }
            None => {
                self.index.insert(id.clone(), self.ids.len());
                self.ids.push(id);
                self.vectors.push(vector);
                self.active.push(true);
                self.live += 1;
                None
            }
        }
    }

    /// Feature vector of an active document.
    pub fn get(&self, id: &str) -> Option<&FeatureVector> {
        self.index
            .get(id)
            .filter(|&&idx| self.active[idx])
            .map(|&idx| &self.vectors[idx])
    }

    /// True when `id` is an active document.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Remove a document. Returns false when it was not present.
    pub fn remove(&mut self, id: &str) -> bool {
        match self.index.get(id) {
            Some(&idx) => self.deactivate(idx),
            None => false,
        }
    }

    /// Number of active documents.
    pub fn len(&self) -> usize {
        self.live
    }

    /// True when no document is active.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Iterate active documents in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureVector)> + '_ {
        self.active_indices()
            .map(move |idx| (self.ids[idx].as_str(), &self.vectors[idx]))
    }

    /// Identifiers of active documents in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter().map(|(id, _)| id)
    }

    pub(crate) fn active_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.active
            .iter()
            .enumerate()
            .filter(|(_, alive)| **alive)
            .map(|(idx, _)| idx)
    }

    pub(crate) fn id_at(&self, idx: usize) -> &str {
        &self.ids[idx]
    }

    pub(crate) fn vector_at(&self, idx: usize) -> &FeatureVector {
        &self.vectors[idx]
    }

    pub(crate) fn deactivate(&mut self, idx: usize) -> bool {
        if !self.active[idx] {
            return false;
        }
        self.active[idx] = false;
        self.live -= 1;
        true
    }
}

impl<K: Into<String>> FromIterator<(K, FeatureVector)> for Corpus {
    fn from_iter<I: IntoIterator<Item = (K, FeatureVector)>>(iter: I) -> Self {
        let mut corpus = Corpus::new();
        for (id, vector) in iter {
            corpus.insert(id, vector);
        }
        corpus
    }
}
