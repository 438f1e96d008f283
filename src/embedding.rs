use serde::{Deserialize, Serialize};

use crate::error::{BlobError, DimensionError};

/// A face embedding in canonical comparable form: exactly the configured
/// number of f32 components, unit-length when built for a cosine index.
///
/// Construction always goes through [`Embedding::new`] or
/// [`Embedding::from_rows`], so holding one means the dimension check has
/// already passed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Embedding(Vec<f32>);

impl Embedding {
    /// Validates `raw` against `dim` and, when `unit` is set, scales it to
    /// unit length. Pure; safe to call from any number of threads.
    pub fn new(raw: &[f32], dim: usize, unit: bool) -> Result<Self, DimensionError> {
        if raw.len() != dim {
            return Err(DimensionError {
                expected: dim,
                actual: raw.len(),
            });
        }
        let mut components = raw.to_vec();
        if unit {
            l2_normalize(&mut components);
        }
        Ok(Self(components))
    }

    /// Accepts the matrix shapes some producers hand out: a single 1×D row or
    /// a D×1 column, flattened transparently. Anything else is a dimension
    /// error carrying the total element count actually seen.
    pub fn from_rows(rows: &[Vec<f32>], dim: usize, unit: bool) -> Result<Self, DimensionError> {
        let total: usize = rows.iter().map(Vec::len).sum();
        let single_row = rows.len() == 1;
        let single_column = !rows.is_empty() && rows.iter().all(|r| r.len() == 1);
        if total != dim || !(single_row || single_column) {
            return Err(DimensionError {
                expected: dim,
                actual: total,
            });
        }
        let flat: Vec<f32> = rows.iter().flatten().copied().collect();
        Self::new(&flat, dim, unit)
    }

    /// Decodes a stored blob of little-endian f32s. The layout is exactly
    /// `dim * 4` bytes, no header; anything else is a corrupt record.
    pub fn from_le_bytes(bytes: &[u8], dim: usize, unit: bool) -> Result<Self, BlobError> {
        if bytes.len() % 4 != 0 {
            return Err(BlobError::Misaligned(bytes.len()));
        }
        let floats: Vec<f32> = bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        Ok(Self::new(&floats, dim, unit)?)
    }

    /// Little-endian blob form of a raw vector, the layout the store keeps.
    pub fn to_le_bytes(raw: &[f32]) -> Vec<u8> {
        raw.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    /// Wraps components already in canonical form (validated and, for cosine
    /// indexes, unit-normalized at insertion time).
    pub(crate) fn from_canonical(components: Vec<f32>) -> Self {
        Self(components)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.0
    }
}

/// Divides every component by the Euclidean norm, in place. A zero vector is
/// returned unchanged: all-zero embeddings are valid-but-meaningless input,
/// and dividing through would only manufacture NaNs.
pub fn l2_normalize(values: &mut [f32]) {
    let norm = values.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm == 0.0 {
        return;
    }
    for v in values {
        *v /= norm;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_length() {
        let err = Embedding::new(&[1.0, 2.0], 4, true).unwrap_err();
        assert_eq!(err, DimensionError { expected: 4, actual: 2 });
    }

    #[test]
    fn unit_normalization_is_idempotent() {
        let first = Embedding::new(&[3.0, 4.0], 2, true).unwrap();
        let second = Embedding::new(first.as_slice(), 2, true).unwrap();
        for (a, b) in first.as_slice().iter().zip(second.as_slice()) {
            assert!((a - b).abs() < 1e-6);
        }
        let norm = first.as_slice().iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-6);
    }

    #[test]
    fn validation_only_mode_copies_exactly() {
        let emb = Embedding::new(&[3.0, 4.0], 2, false).unwrap();
        assert_eq!(emb.as_slice(), &[3.0, 4.0]);
    }

    #[test]
    fn zero_vector_passes_through_unchanged() {
        let emb = Embedding::new(&[0.0, 0.0, 0.0], 3, true).unwrap();
        assert_eq!(emb.as_slice(), &[0.0, 0.0, 0.0]);
        assert!(emb.as_slice().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn flattens_single_row_and_single_column() {
        let row = Embedding::from_rows(&[vec![1.0, 0.0, 0.0]], 3, false).unwrap();
        assert_eq!(row.as_slice(), &[1.0, 0.0, 0.0]);

        let column = Embedding::from_rows(&[vec![1.0], vec![0.0], vec![0.0]], 3, false).unwrap();
        assert_eq!(column.as_slice(), &[1.0, 0.0, 0.0]);
    }

    #[test]
    fn rejects_other_matrix_shapes() {
        // 2x2 flattens to the right total but is not a row or column
        assert!(Embedding::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]], 4, false).is_err());
        assert!(Embedding::from_rows(&[], 3, false).is_err());
        assert!(Embedding::from_rows(&[vec![1.0, 2.0]], 3, false).is_err());
    }

    #[test]
    fn blob_round_trip() {
        let raw = [0.25f32, -1.5, 3.0];
        let bytes = Embedding::to_le_bytes(&raw);
        assert_eq!(bytes.len(), 12);
        let decoded = Embedding::from_le_bytes(&bytes, 3, false).unwrap();
        assert_eq!(decoded.as_slice(), &raw);
    }

    #[test]
    fn misaligned_blob_is_corrupt() {
        let err = Embedding::from_le_bytes(&[0u8; 7], 3, false).unwrap_err();
        assert_eq!(err, BlobError::Misaligned(7));
    }

    #[test]
    fn wrong_float_count_is_corrupt() {
        let bytes = Embedding::to_le_bytes(&[1.0, 2.0]);
        let err = Embedding::from_le_bytes(&bytes, 3, false).unwrap_err();
        assert!(matches!(err, BlobError::Dimension(_)));
    }
}
