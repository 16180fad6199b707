//! Models for tracking per-device login sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use utoipa::ToSchema;
use validator::Validate;

use crate::types::SessionId;
use crate::validation::rules;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Lifecycle state of a device session.
///
/// `Inactive` is terminal: nothing moves a session back to `Active`.
pub enum SessionStatus {
    /// Session is currently valid.
    #[default]
    Active,
    /// Session was ended; kept for history.
    Inactive,
}

impl SessionStatus {
    pub fn is_active(self) -> bool {
        matches!(self, SessionStatus::Active)
    }
}

// Stored as the boolean `isActive` flag on the wire.
impl Serialize for SessionStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bool(self.is_active())
    }
}

impl<'de> Deserialize<'de> for SessionStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(if bool::deserialize(deserializer)? {
            SessionStatus::Active
        } else {
            SessionStatus::Inactive
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// One login session from one device or browser.
pub struct DeviceSession {
    /// Unique identifier for the session.
    #[serde(alias = "SessionId")]
    #[schema(value_type = String, format = Uuid)]
    pub session_id: SessionId,
    /// Network hardware address of the device, when known.
    #[serde(alias = "MacAddress")]
    pub mac_address: Option<String>,
    /// Client software identifier.
    #[serde(alias = "UserAgent")]
    pub user_agent: Option<String>,
    /// Client network address.
    #[serde(alias = "IpAddress")]
    pub ip_address: Option<String>,
    /// Human-readable label for the device.
    #[serde(alias = "DeviceName")]
    pub device_name: Option<String>,
    /// Timestamp when the session started.
    #[serde(alias = "LoginTime")]
    pub login_time: DateTime<Utc>,
    /// Timestamp when the session was last used.
    #[serde(alias = "LastActivity")]
    pub last_activity: DateTime<Utc>,
    /// Whether the session is still valid.
    #[serde(rename = "isActive", alias = "IsActive")]
    #[schema(value_type = bool)]
    pub status: SessionStatus,
}

impl DeviceSession {
    pub(crate) fn start(device: NewDevice, now: DateTime<Utc>) -> Self {
        Self {
            session_id: SessionId::new(),
            mac_address: device.mac_address,
            user_agent: device.user_agent,
            ip_address: device.ip_address,
            device_name: device.device_name,
            login_time: now,
            last_activity: now,
            status: SessionStatus::Active,
        }
    }

    /// Returns `true` while the session has not been ended.
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Refreshes `last_activity`, never moving it before `login_time`.
    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.last_activity = now.max(self.login_time);
    }

    pub(crate) fn deactivate(&mut self, now: DateTime<Utc>) {
        self.status = SessionStatus::Inactive;
        self.touch(now);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Metadata describing a device that is about to open a session.
pub struct NewDevice {
    #[validate(custom(function = "rules::validate_mac_address"))]
    pub mac_address: Option<String>,
    #[validate(length(max = 512))]
    pub user_agent: Option<String>,
    #[validate(ip)]
    pub ip_address: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub device_name: Option<String>,
}

impl NewDevice {
    pub fn with_mac_address(mut self, mac_address: impl Into<String>) -> Self {
        self.mac_address = Some(mac_address.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_ip_address(mut self, ip_address: impl Into<String>) -> Self {
        self.ip_address = Some(ip_address.into());
        self
    }

    pub fn with_device_name(mut self, device_name: impl Into<String>) -> Self {
        self.device_name = Some(device_name.into());
        self
    }
}
