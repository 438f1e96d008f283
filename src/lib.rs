//! Face embedding matching engine.
//!
//! Stores fixed-dimensionality face embeddings with identity metadata,
//! answers "who is this?" by exact nearest-neighbor search, and turns the
//! raw result into a match/no-match verdict through a metric-aware
//! threshold. Face detection and embedding extraction live upstream: an
//! external model hands this crate `&[f32]` vectors and nothing else.
//!
//! The usual flow:
//!
//! 1. Construct a [`FaceIndex`] with the model's dimensionality and a
//!    [`Metric`].
//! 2. [`bootstrap`] it from a [`FaceStore`] at startup.
//! 3. Serve [`FaceIndex::decide`] for match requests and [`enroll`] for new
//!    faces, concurrently.

pub mod config;
pub mod embedding;
pub mod enroll;
pub mod error;
pub mod index;
pub mod metrics;
pub mod storage;
pub mod types;

pub use config::{load_config, save_config, EngineConfig};
pub use embedding::{l2_normalize, Embedding};
pub use enroll::{bootstrap, enroll, BootstrapReport};
pub use error::{BlobError, DimensionError, EnrollError, StoreError};
pub use index::FaceIndex;
pub use storage::{FaceStore, FileStore, StoredFace};
pub use types::{IdentityRecord, MatchVerdict, Metric};
