//! Path identifiers.
//!
//! Every node lookup keys on these types. Construction fully resolves the
//! path and equality ignores case, which is what de-duplicates nodes in the store.

mod directory;
mod file;
pub mod path;

pub use directory::DirectoryIdentifier;
pub use file::{FileIdentifier, FileName};
