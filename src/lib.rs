//! Tagged result values and the status tag registry that generates their accessors.

pub mod builtin;
pub mod catalog;
pub mod error;
pub mod global;
pub mod registry;
pub mod status;
pub mod value;

pub type Result<T> = anyhow::Result<T>;

pub use catalog::{apply_catalog, load_catalog, parse_catalog};
pub use error::TagError;
pub use registry::{
    AccessorKind, Constructor, Continuation, Predicate, TagDeclaration, TagEntry, TagRegistry,
};
pub use status::{ExportedStatus, StatusId};
pub use value::{Payload, ResultMapping, ResultValue};
