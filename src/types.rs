use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::embedding::Embedding;

/// Comparison function an index is configured with. Fixed for the index's
/// lifetime; stored vectors and thresholds are only meaningful relative to it.
#[repr(u8)]
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Inner product over unit-length vectors. Higher scores are better,
    /// range roughly [-1, 1].
    Cosine = 1,
    /// Linear L2 distance over raw vectors. Lower scores are better.
    Euclidean = 2,
}

impl Metric {
    /// Whether vectors are scaled to unit length before storage or comparison.
    pub fn unit_normalizes(self) -> bool {
        matches!(self, Metric::Cosine)
    }

    /// Inclusive, direction-aware threshold test. This is the only place the
    /// similarity-vs-distance direction is encoded.
    pub fn is_match(self, score: f32, threshold: f32) -> bool {
        match self {
            Metric::Cosine => score >= threshold,
            Metric::Euclidean => score <= threshold,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Cosine => write!(f, "cosine"),
            Metric::Euclidean => write!(f, "euclidean"),
        }
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cosine" => Ok(Metric::Cosine),
            "euclidean" => Ok(Metric::Euclidean),
            other => Err(format!("unknown metric {other:?}, expected cosine or euclidean")),
        }
    }
}

/// One enrolled face: the identity it was enrolled under, where the sample
/// came from, and the embedding as stored in the index.
///
/// A person enrolled from several photos has several records sharing a label.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct IdentityRecord {
    pub label: String,
    /// Free-form source tag, typically the originating filename. May be empty.
    pub provenance: String,
    pub embedding: Embedding,
}

impl IdentityRecord {
    pub fn new(label: impl Into<String>, provenance: impl Into<String>, embedding: Embedding) -> Self {
        Self {
            label: label.into(),
            provenance: provenance.into(),
            embedding,
        }
    }
}

/// Outcome of matching one query against the index.
///
/// `score` is always the best score found so near-misses stay observable;
/// `record` is populated only on a match. An empty index yields a NaN score,
/// which keeps "no data" distinguishable from "searched but below threshold".
#[derive(Clone, Debug)]
pub struct MatchVerdict {
    pub matched: bool,
    pub record: Option<IdentityRecord>,
    pub score: f32,
}

impl MatchVerdict {
    pub(crate) fn no_data() -> Self {
        Self {
            matched: false,
            record: None,
            score: f32::NAN,
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.record.as_ref().map(|r| r.label.as_str())
    }

    pub fn provenance(&self) -> Option<&str> {
        self.record.as_ref().map(|r| r.provenance.as_str())
    }
}
