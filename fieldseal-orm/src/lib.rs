//! Transparent field-level encryption for a host persistence layer.
//!
//! Selected fields — including fields reached through one level of
//! association — are encrypted before being written to storage and decrypted
//! after being read back, without application code seeing ciphertext.
//!
//! # Architecture
//!
//! - [`EncryptionOrchestrator`] hooks the host's write-flush and read-load
//!   lifecycle: it encrypts configured fields of pending insertions and
//!   updates before persistence and decrypts them after materialization,
//!   keeping the host's change snapshots consistent after each in-place
//!   rewrite.
//! - [`PropertyPath`] / [`read_path`] / [`write_path`] locate a field by a
//!   dotted path crossing at most one to-one relation hop.
//! - [`UnitOfWork`] is the slice of the host's change-tracking machinery the
//!   orchestrator depends on; [`InMemoryUnitOfWork`] is the reference
//!   implementation used by tests and embedded consumers.
//! - [`EncryptedTextColumn`] / [`EncryptedArrayColumn`] are an alternative,
//!   coarser integration point that encrypts an entire column's values
//!   regardless of per-type configuration.
//!
//! The envelope format and the codec itself live in `fieldseal-crypto`.

mod column;
mod config;
mod error;
mod orchestrator;
mod path;
mod unit_of_work;

pub use column::{EncryptedArrayColumn, EncryptedTextColumn};
pub use config::{EncryptionConfig, PropertyRule, DEFAULT_METHOD};
pub use error::{OrmError, OrmResult};
pub use orchestrator::EncryptionOrchestrator;
pub use path::{read_path, write_path, PropertyPath, WriteTarget};
pub use unit_of_work::{InMemoryUnitOfWork, UnitOfWork};
