//! Validation rules for device metadata.
//!
//! Only the policy-aware registration path validates; recording a session
//! through `add_device` accepts any metadata as given.

pub mod rules;

pub use validator::Validate;
