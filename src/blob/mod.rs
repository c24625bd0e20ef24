//! Blob storage
//!
//! Arbitrary file content is written to `<blob_dir>/<uuid>`. The returned
//! [`BlobObject`] may be stored in a row; the table store never inspects
//! or validates such references.

mod backend;
mod errors;
mod local;
mod object;
mod store;

pub use backend::BlobBackend;
pub use errors::{BlobError, BlobResult};
pub use local::LocalBackend;
pub use object::BlobObject;
pub use store::BlobStore;
