//! In-memory account record with per-device session tracking.
//!
//! The crate owns no storage and no transport: callers load an
//! [`AccountRecord`](models::account::AccountRecord), mutate its device
//! sessions through the methods here, and persist it however they like.

pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod telemetry;
pub mod types;
pub mod validation;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::DevicePolicy;
pub use error::AccountError;
pub use models::account::AccountRecord;
pub use models::device_session::{DeviceSession, NewDevice, SessionStatus};
pub use types::SessionId;
