use log::{info, warn};

use crate::embedding::Embedding;
use crate::error::{EnrollError, StoreError};
use crate::index::FaceIndex;
use crate::storage::{FaceStore, StoredFace};
use crate::types::IdentityRecord;

/// What a bootstrap run actually loaded. `skipped` counts rows whose
/// embedding blob could not be decoded for the index's dimensionality; they
/// are logged and left behind rather than aborting the load.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    pub inserted: usize,
    pub skipped: usize,
}

/// Replays every persisted face into a freshly constructed index. One corrupt
/// row never prevents the rest of the dataset from loading.
pub fn bootstrap(store: &dyn FaceStore, index: &FaceIndex) -> Result<BootstrapReport, StoreError> {
    let faces = store.load_all()?;
    let mut report = BootstrapReport::default();
    for face in faces {
        let decoded = Embedding::from_le_bytes(
            &face.embedding,
            index.dimension(),
            index.metric().unit_normalizes(),
        );
        let embedding = match decoded {
            Ok(embedding) => embedding,
            Err(err) => {
                warn!("skipping stored face {:?}: {err}", face.label);
                report.skipped += 1;
                continue;
            }
        };
        match index.insert(IdentityRecord::new(face.label, face.provenance, embedding)) {
            Ok(()) => report.inserted += 1,
            Err(err) => {
                warn!("skipping stored face the index rejected: {err}");
                report.skipped += 1;
            }
        }
    }
    info!(
        "bootstrap complete: {} inserted, {} skipped",
        report.inserted, report.skipped
    );
    Ok(report)
}

/// Enrolls a new face: validate, persist, then make it searchable.
///
/// The store write comes first so the index never holds a record the store
/// cannot reproduce. If the store rejects the record the index is untouched;
/// if indexing fails after a successful persist the record is durable but
/// unsearchable until the next bootstrap, reported as
/// [`EnrollError::Unindexed`].
pub fn enroll(
    store: &dyn FaceStore,
    index: &FaceIndex,
    label: &str,
    provenance: &str,
    raw_embedding: &[f32],
) -> Result<(), EnrollError> {
    if label.is_empty() {
        return Err(EnrollError::EmptyLabel);
    }
    let embedding = Embedding::new(
        raw_embedding,
        index.dimension(),
        index.metric().unit_normalizes(),
    )?;
    let stored = StoredFace {
        label: label.to_string(),
        provenance: provenance.to_string(),
        embedding: Embedding::to_le_bytes(raw_embedding),
    };
    store.append(&stored).map_err(EnrollError::Persistence)?;
    index
        .insert(IdentityRecord::new(label, provenance, embedding))
        .map_err(EnrollError::Unindexed)?;
    Ok(())
}
