use thiserror::Error;

use crate::cluster::Phase;

/// Errors returned by the clustering engine.
#[derive(Debug, Error)]
pub enum Error {
    /// The corpus has no active documents.
    #[error("empty corpus")]
    EmptyInput,

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// A feature weight is negative or not finite.
    #[error("document {document:?}: feature {feature:?} has invalid weight {weight}")]
    InvalidWeight {
        /// Offending document identifier.
        document: String,
        /// Offending feature identifier.
        feature: String,
        /// The rejected weight.
        weight: f64,
    },

    /// Documents whose feature vector has zero norm under the cosine metric.
    #[error("zero-norm feature vectors under cosine metric: {}", documents.join(", "))]
    DegenerateVector {
        /// Offending document identifiers, in corpus order.
        documents: Vec<String>,
    },

    /// Border documents left without a surviving core document to attach to.
    #[error("border documents without a core neighbor after pruning: {}", documents.join(", "))]
    UnresolvedBorder {
        /// Offending document identifiers, in corpus order.
        documents: Vec<String>,
    },

    /// The run was cancelled before `phase` started.
    #[error("cancelled before {phase}")]
    Cancelled {
        /// The phase that did not run.
        phase: Phase,
    },
}

impl Error {
    /// True for errors caused by the run configuration or the input corpus
    /// rather than by the clustering itself.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::EmptyInput | Error::InvalidParameter { .. } | Error::InvalidWeight { .. }
        )
    }
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
