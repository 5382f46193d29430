pub mod normalizer;
pub mod sync;

pub use normalizer::{canonical_timestamp, normalize_batch};
pub use sync::{header_row, synchronize, RemoteStore};
