//! Typed identifiers.

mod id;

pub use id::SessionId;
