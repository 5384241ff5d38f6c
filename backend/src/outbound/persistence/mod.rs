//! Exploration store adapters.
//!
//! - [`InMemoryExplorationRepository`]: process-local store, lost on restart.
//! - [`JsonFileExplorationRepository`]: the same layout snapshotted to a JSON
//!   file after every mutation.

mod in_memory;
mod json_file;
mod table;

pub use in_memory::InMemoryExplorationRepository;
pub use json_file::JsonFileExplorationRepository;
