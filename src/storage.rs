use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

pub const MAGIC: [u8; 4] = *b"FCE0";
pub const VERSION: u8 = 1;

/// A face as the durable store holds it. The embedding blob is exactly
/// `dim * 4` bytes of little-endian f32, no header; decoding and
/// corruption-checking happen at bootstrap against the index's
/// dimensionality.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct StoredFace {
    pub label: String,
    pub provenance: String,
    pub embedding: Vec<u8>,
}

/// Durable mapping from identity to embeddings, owned outside the engine.
/// Used only to repopulate the index at startup and to append enrollments.
pub trait FaceStore: Send + Sync {
    /// Every persisted face, in insertion order.
    fn load_all(&self) -> Result<Vec<StoredFace>, StoreError>;

    /// Durably appends one face.
    fn append(&self, face: &StoredFace) -> Result<(), StoreError>;
}

#[derive(Serialize, Deserialize)]
struct Header {
    magic: [u8; 4],
    version: u8,
}

/// Append-only single-file store: a magic+version header followed by
/// bincode-framed [`StoredFace`] records.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;
        let mut writer = BufWriter::new(file);
        let header = Header {
            magic: MAGIC,
            version: VERSION,
        };
        bincode::serialize_into(&mut writer, &header)
            .map_err(|e| StoreError::InvalidFormat(e.to_string()))?;
        writer.flush()?;
        Ok(Self { path })
    }

    /// Opens an existing store, validating the header.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        let mut reader = BufReader::new(file);
        read_header(&mut reader)?;
        Ok(Self { path })
    }

    pub fn open_or_create<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        if path.as_ref().exists() {
            Self::open(path)
        } else {
            Self::create(path)
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn read_header<R: std::io::Read>(reader: &mut R) -> Result<(), StoreError> {
    let header: Header = bincode::deserialize_from(reader)
        .map_err(|e| StoreError::InvalidFormat(e.to_string()))?;
    if header.magic != MAGIC {
        return Err(StoreError::InvalidFormat("bad magic".into()));
    }
    if header.version != VERSION {
        return Err(StoreError::InvalidFormat(format!(
            "unsupported version {}",
            header.version
        )));
    }
    Ok(())
}

impl FaceStore for FileStore {
    fn load_all(&self) -> Result<Vec<StoredFace>, StoreError> {
        let file = File::open(&self.path)?;
        let mut reader = BufReader::new(file);
        read_header(&mut reader)?;
        let mut faces = Vec::new();
        loop {
            match bincode::deserialize_from::<_, StoredFace>(&mut reader) {
                Ok(face) => faces.push(face),
                Err(e) => {
                    // a cleanly truncated tail ends the record stream
                    if let bincode::ErrorKind::Io(ref io_err) = *e {
                        if io_err.kind() == std::io::ErrorKind::UnexpectedEof {
                            break;
                        }
                    }
                    return Err(StoreError::InvalidFormat(e.to_string()));
                }
            }
        }
        Ok(faces)
    }

    fn append(&self, face: &StoredFace) -> Result<(), StoreError> {
        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = BufWriter::new(file);
        bincode::serialize_into(&mut writer, face)
            .map_err(|e| StoreError::InvalidFormat(e.to_string()))?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::Embedding;
    use std::fs;

    fn face(label: &str, raw: &[f32]) -> StoredFace {
        StoredFace {
            label: label.into(),
            provenance: format!("{label}.jpg"),
            embedding: Embedding::to_le_bytes(raw),
        }
    }

    #[test]
    fn append_and_load_round_trip() {
        let path = "store_roundtrip.fce";
        let _ = fs::remove_file(path);
        let store = FileStore::create(path).unwrap();
        store.append(&face("alice", &[1.0, 0.0])).unwrap();
        store.append(&face("bob", &[0.0, 1.0])).unwrap();

        let reopened = FileStore::open(path).unwrap();
        let faces = reopened.load_all().unwrap();
        assert_eq!(faces.len(), 2);
        assert_eq!(faces[0].label, "alice");
        assert_eq!(faces[1].provenance, "bob.jpg");
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn empty_store_loads_no_faces() {
        let path = "store_empty.fce";
        let _ = fs::remove_file(path);
        let store = FileStore::create(path).unwrap();
        assert!(store.load_all().unwrap().is_empty());
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn rejects_foreign_file() {
        let path = "store_foreign.fce";
        fs::write(path, b"not a face store at all").unwrap();
        let err = FileStore::open(path).unwrap_err();
        assert!(matches!(err, StoreError::InvalidFormat(_)));
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn open_or_create_is_idempotent() {
        let path = "store_ooc.fce";
        let _ = fs::remove_file(path);
        {
            let store = FileStore::open_or_create(path).unwrap();
            store.append(&face("alice", &[1.0])).unwrap();
        }
        let store = FileStore::open_or_create(path).unwrap();
        assert_eq!(store.load_all().unwrap().len(), 1);
        fs::remove_file(path).unwrap();
    }
}
