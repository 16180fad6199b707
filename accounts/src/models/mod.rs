//! Data models for accounts and their device sessions.

pub mod account;
pub mod device_session;
