#![allow(clippy::collapsible_if, clippy::manual_strip)]
//! Locating sidecar files: host-path string helpers, the candidate
//! resolver, and the file-system capability the reader and writer use.

pub mod fs;
pub mod lookup;
pub mod paths;
pub mod resolver;

pub use fs::{DirEntry, LocalFs, MetadataFs};
pub use lookup::find_existing;
pub use resolver::{Candidate, ItemLocation, resolve};
