//! Shared model for sidecar metadata files: the metadata record, its
//! per-kind extensions, provider ids, stream descriptors and options.

pub mod config;
pub mod error;
pub mod media;
pub mod provider_ids;
pub mod record;
pub mod types;

pub use config::{DateFormat, NfoOptions};
pub use error::CoreError;
pub use provider_ids::ProviderIds;
pub use record::{Extension, LinkedItem, MetadataRecord, Person};
pub use types::{ContainerKind, ItemKind, PersonType};
