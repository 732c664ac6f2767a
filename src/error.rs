//! Conditions raised by the tag registry.

use thiserror::Error;

use crate::status::StatusId;

/// Programming-time failures when declaring or dispatching status tags.
///
/// Registry operations return `anyhow` errors wrapping one of these, so
/// callers can `downcast_ref::<TagError>()` to tell the conditions apart.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TagError {
    /// The accessor name is already bound to a different tag.
    #[error("accessor `{accessor}` already defined for tag `{existing}`, cannot bind it to `{requested}`")]
    AccessorDefined {
        accessor: String,
        existing: StatusId,
        requested: StatusId,
    },

    /// The accessor name would shadow a core result-value operation.
    #[error("accessor `{accessor}` is a reserved core operation")]
    ReservedAccessor { accessor: String },

    /// No accessor with this name was ever declared.
    #[error("unknown operation `{accessor}`")]
    UnknownOperation { accessor: String },

    #[error("tag name is empty after normalization")]
    EmptyTagName,

    #[error("registry is frozen; no further tags may be declared")]
    Frozen,
}
