use std::sync::RwLock;

use log::debug;
use ordered_float::NotNan;
use rayon::prelude::*;

use crate::embedding::Embedding;
use crate::error::DimensionError;
use crate::metrics::{ranking_key, score};
use crate::types::{IdentityRecord, MatchVerdict, Metric};

struct Entry {
    label: String,
    provenance: String,
}

/// Record metadata and stored vectors, kept in lock-step: entry `i` always
/// describes vector `i`, and both grow by one in the same write-lock hold.
#[derive(Default)]
struct Inner {
    entries: Vec<Entry>,
    vectors: Vec<Vec<f32>>,
}

/// Append-only in-memory index over enrolled face embeddings.
///
/// Search is an exact scan over every stored vector; enrollment sets in the
/// hundreds-to-thousands scan in microseconds, and results are exactly
/// reproducible. Ties go to the first-inserted record.
///
/// All methods take `&self`; a single reader-writer lock guards the combined
/// (entries, vectors) pair, so concurrent readers never observe a
/// half-applied insert.
pub struct FaceIndex {
    dim: usize,
    metric: Metric,
    inner: RwLock<Inner>,
}

impl FaceIndex {
    /// Panics if `dimension` is zero; that is a construction bug, not input.
    pub fn new(dimension: usize, metric: Metric) -> Self {
        assert!(dimension > 0, "index dimension must be non-zero");
        Self {
            dim: dimension,
            metric,
            inner: RwLock::new(Inner::default()),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dim
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends a record. The embedding is re-prepared for this index's
    /// metric (cosine indexes store unit-length vectors), so records built
    /// against another configuration are either adapted or rejected here.
    /// On a dimension mismatch the index is left unchanged.
    pub fn insert(&self, record: IdentityRecord) -> Result<(), DimensionError> {
        let prepared = Embedding::new(
            record.embedding.as_slice(),
            self.dim,
            self.metric.unit_normalizes(),
        )?;
        let mut inner = self.inner.write().unwrap();
        inner.entries.push(Entry {
            label: record.label,
            provenance: record.provenance,
        });
        inner.vectors.push(prepared.into_vec());
        Ok(())
    }

    /// Ordinal and raw score of the closest record, or `None` when the index
    /// holds no records. The query must be prepared for this index.
    pub fn search_nearest(&self, query: &Embedding) -> Option<(usize, f32)> {
        assert_eq!(
            query.len(),
            self.dim,
            "query prepared for a different dimensionality"
        );
        let inner = self.inner.read().unwrap();
        nearest(&inner, self.metric, query.as_slice())
    }

    /// The record stored at `ordinal`, if any.
    pub fn record(&self, ordinal: usize) -> Option<IdentityRecord> {
        let inner = self.inner.read().unwrap();
        record_at(&inner, ordinal)
    }

    /// Prepares `raw_query`, finds the nearest record, and applies the
    /// metric-aware inclusive threshold. Always yields a well-formed verdict
    /// for the empty-index and below-threshold paths; only a malformed query
    /// is an error.
    pub fn decide(&self, raw_query: &[f32], threshold: f32) -> Result<MatchVerdict, DimensionError> {
        let query = Embedding::new(raw_query, self.dim, self.metric.unit_normalizes())?;
        let inner = self.inner.read().unwrap();
        let Some((ordinal, best)) = nearest(&inner, self.metric, query.as_slice()) else {
            return Ok(MatchVerdict::no_data());
        };
        let matched = self.metric.is_match(best, threshold);
        debug!(
            "decide: nearest ordinal={ordinal} score={best} threshold={threshold} matched={matched}"
        );
        let record = if matched { record_at(&inner, ordinal) } else { None };
        Ok(MatchVerdict {
            matched,
            record,
            score: best,
        })
    }

    /// `decide` over many queries in parallel.
    pub fn decide_batch(
        &self,
        queries: &[Vec<f32>],
        threshold: f32,
    ) -> Result<Vec<MatchVerdict>, DimensionError> {
        queries
            .par_iter()
            .map(|q| self.decide(q, threshold))
            .collect()
    }
}

fn record_at(inner: &Inner, ordinal: usize) -> Option<IdentityRecord> {
    let entry = inner.entries.get(ordinal)?;
    let vector = inner.vectors.get(ordinal)?;
    Some(IdentityRecord {
        label: entry.label.clone(),
        provenance: entry.provenance.clone(),
        embedding: Embedding::from_canonical(vector.clone()),
    })
}

fn nearest(inner: &Inner, metric: Metric, query: &[f32]) -> Option<(usize, f32)> {
    inner
        .vectors
        .iter()
        .enumerate()
        .filter_map(|(ordinal, stored)| {
            let s = score(metric, query, stored);
            NotNan::new(ranking_key(metric, s))
                .ok()
                .map(|key| (key, ordinal, s))
        })
        .min_by_key(|&(key, ordinal, _)| (key, ordinal))
        .map(|(_, ordinal, s)| (ordinal, s))
}
