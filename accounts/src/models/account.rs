//! The account record and its device-session bookkeeping.

use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;
use utoipa::openapi::schema::Schema;
use utoipa::openapi::RefOr;
use utoipa::{PartialSchema, ToSchema};
use validator::Validate;

use crate::clock::Clock;
use crate::config::DevicePolicy;
use crate::error::AccountError;
use crate::models::device_session::{DeviceSession, NewDevice};
use crate::types::SessionId;

/// Group identifier reserved for administrators.
pub const ADMIN_GROUP_ID: i32 = 1;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
/// One user account: identity, authorization flags and device sessions.
///
/// Sessions are only ever appended and flagged inactive, so `devices` is the
/// full login history of the account in insertion order.
pub struct AccountRecord {
    /// Primary identifier.
    #[serde(alias = "Id")]
    pub id: Option<String>,
    /// Legacy or federated identifiers.
    #[serde(alias = "ids", alias = "Ids")]
    pub alternate_ids: Vec<String>,
    /// Whether a password credential is set.
    #[serde(alias = "isPasswd", alias = "IsPasswd")]
    pub has_password: bool,
    /// Account or token expiry.
    #[serde(alias = "expires", alias = "Expires")]
    pub expires_at: DateTime<Utc>,
    /// Role/group classifier; see [`ADMIN_GROUP_ID`].
    #[serde(alias = "group", alias = "Group")]
    pub group_id: i32,
    /// Block flag.
    #[serde(alias = "ban", alias = "Ban")]
    pub banned: bool,
    /// Reason shown to a banned user.
    #[serde(alias = "banMsg", alias = "BanMsg")]
    pub ban_message: Option<String>,
    /// Administrator note.
    #[serde(alias = "Comment")]
    pub comment: Option<String>,
    /// Free-form extension data, kept verbatim.
    #[serde(alias = "Params")]
    pub params: Option<BTreeMap<String, Value>>,
    /// All sessions, active and ended, in insertion order.
    #[serde(alias = "Devices")]
    devices: Vec<DeviceSession>,
}

/// Serialized shape of [`AccountRecord`], including the computed counts.
///
/// Never constructed; it only feeds the OpenAPI description.
#[allow(dead_code)]
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
struct AccountRecordShape {
    /// Primary identifier.
    id: Option<String>,
    /// Legacy or federated identifiers.
    alternate_ids: Vec<String>,
    /// Whether a password credential is set.
    has_password: bool,
    /// Account or token expiry.
    expires_at: DateTime<Utc>,
    /// Role/group classifier.
    group_id: i32,
    /// Block flag.
    banned: bool,
    /// Reason shown to a banned user.
    ban_message: Option<String>,
    /// Administrator note.
    comment: Option<String>,
    /// Free-form extension data, kept verbatim.
    #[schema(value_type = Option<Object>)]
    params: Option<BTreeMap<String, Value>>,
    /// All sessions, active and ended, in insertion order.
    devices: Vec<DeviceSession>,
    /// Number of sessions that are still active.
    #[schema(read_only)]
    active_device_count: usize,
    /// Number of sessions ever recorded, including ended ones.
    #[schema(read_only)]
    total_device_count: usize,
}

impl PartialSchema for AccountRecord {
    fn schema() -> RefOr<Schema> {
        AccountRecordShape::schema()
    }
}

impl ToSchema for AccountRecord {
    fn name() -> Cow<'static, str> {
        Cow::Borrowed("AccountRecord")
    }

    fn schemas(schemas: &mut Vec<(String, RefOr<Schema>)>) {
        AccountRecordShape::schemas(schemas);
    }
}

// Hand-written so the derived counts go out with the record; deserialization
// ignores them like any other unknown field.
impl Serialize for AccountRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("AccountRecord", 12)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("alternateIds", &self.alternate_ids)?;
        state.serialize_field("hasPassword", &self.has_password)?;
        state.serialize_field("expiresAt", &self.expires_at)?;
        state.serialize_field("groupId", &self.group_id)?;
        state.serialize_field("banned", &self.banned)?;
        state.serialize_field("banMessage", &self.ban_message)?;
        state.serialize_field("comment", &self.comment)?;
        state.serialize_field("params", &self.params)?;
        state.serialize_field("devices", &self.devices)?;
        state.serialize_field("activeDeviceCount", &self.active_device_count())?;
        state.serialize_field("totalDeviceCount", &self.total_device_count())?;
        state.end()
    }
}

impl AccountRecord {
    /// Constructs an account with no sessions and no flags set.
    pub fn new(id: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            id: Some(id.into()),
            expires_at,
            ..Self::default()
        }
    }

    /// All sessions, active and historical, in the order they were added.
    pub fn devices(&self) -> &[DeviceSession] {
        &self.devices
    }

    pub fn active_devices(&self) -> impl Iterator<Item = &DeviceSession> {
        self.devices.iter().filter(|d| d.is_active())
    }

    pub fn find_device(&self, session_id: &SessionId) -> Option<&DeviceSession> {
        self.devices.iter().find(|d| d.session_id == *session_id)
    }

    /// Number of sessions that are still active.
    pub fn active_device_count(&self) -> usize {
        self.active_devices().count()
    }

    /// Number of sessions ever recorded, including ended ones.
    pub fn total_device_count(&self) -> usize {
        self.devices.len()
    }

    /// Records a new active session and returns its identifier.
    pub fn add_device<C: Clock + ?Sized>(&mut self, clock: &C, device: NewDevice) -> SessionId {
        let session = DeviceSession::start(device, clock.now());
        let session_id = session.session_id;
        self.devices.push(session);

        tracing::debug!(
            account_id = self.id.as_deref().unwrap_or_default(),
            session_id = %session_id,
            active_devices = self.active_device_count(),
            "device session added"
        );
        session_id
    }

    /// Ends the first session with `session_id`, whatever its current state.
    ///
    /// Ending an already ended session still succeeds and re-stamps
    /// `last_activity`. Returns `false` only when no session has that id.
    pub fn remove_device<C: Clock + ?Sized>(&mut self, clock: &C, session_id: &SessionId) -> bool {
        let Some(device) = self
            .devices
            .iter_mut()
            .find(|d| d.session_id == *session_id)
        else {
            return false;
        };

        device.deactivate(clock.now());
        tracing::debug!(session_id = %session_id, "device session ended");
        true
    }

    /// Refreshes `last_activity` of an active session.
    ///
    /// Ended sessions are not matched, so this returns `false` for them.
    pub fn update_last_activity<C: Clock + ?Sized>(
        &mut self,
        clock: &C,
        session_id: &SessionId,
    ) -> bool {
        match self
            .devices
            .iter_mut()
            .find(|d| d.session_id == *session_id && d.is_active())
        {
            Some(device) => {
                device.touch(clock.now());
                true
            }
            None => false,
        }
    }

    /// Returns `true` when the active session count is at or above `max_devices`.
    pub fn is_device_limit_exceeded(&self, max_devices: usize) -> bool {
        self.active_device_count() >= max_devices
    }

    /// Ends the active session with the earliest login time.
    ///
    /// Ties go to the session added first. Returns `false` when there is no
    /// active session.
    pub fn remove_oldest_device<C: Clock + ?Sized>(&mut self, clock: &C) -> bool {
        let Some(oldest) = self
            .devices
            .iter_mut()
            .filter(|d| d.is_active())
            .min_by_key(|d| d.login_time)
        else {
            return false;
        };

        oldest.deactivate(clock.now());
        tracing::info!(
            account_id = self.id.as_deref().unwrap_or_default(),
            session_id = %oldest.session_id,
            login_time = %oldest.login_time,
            "oldest device session evicted"
        );
        true
    }

    /// Ends every active session and returns how many were ended.
    pub fn deactivate_all_devices<C: Clock + ?Sized>(&mut self, clock: &C) -> usize {
        let now = clock.now();
        let mut ended = 0;
        for device in self.devices.iter_mut().filter(|d| d.is_active()) {
            device.deactivate(now);
            ended += 1;
        }

        tracing::info!(
            account_id = self.id.as_deref().unwrap_or_default(),
            ended,
            "all device sessions ended"
        );
        ended
    }

    /// Opens a session for `device` under the limits of `policy`.
    ///
    /// Banned or expired accounts and malformed device metadata are
    /// rejected. When the account is at its limit the oldest sessions are
    /// evicted if the policy allows it, otherwise the registration fails
    /// without touching existing sessions.
    pub fn register_device<C: Clock + ?Sized>(
        &mut self,
        clock: &C,
        policy: &DevicePolicy,
        device: NewDevice,
    ) -> Result<SessionId, AccountError> {
        if self.banned {
            tracing::warn!(
                account_id = self.id.as_deref().unwrap_or_default(),
                "device registration rejected for banned account"
            );
            return Err(AccountError::Banned {
                message: self.ban_message.clone(),
            });
        }

        if self.is_expired(clock) {
            tracing::warn!(
                account_id = self.id.as_deref().unwrap_or_default(),
                expires_at = %self.expires_at,
                "device registration rejected for expired account"
            );
            return Err(AccountError::Expired {
                expires_at: self.expires_at,
            });
        }

        device.validate()?;

        if policy.max_devices == 0
            || (!policy.evict_oldest && self.is_device_limit_exceeded(policy.max_devices))
        {
            tracing::warn!(
                account_id = self.id.as_deref().unwrap_or_default(),
                max_devices = policy.max_devices,
                "device registration rejected at device limit"
            );
            return Err(AccountError::DeviceLimitReached {
                max_devices: policy.max_devices,
            });
        }

        while self.is_device_limit_exceeded(policy.max_devices) {
            if !self.remove_oldest_device(clock) {
                break;
            }
        }

        Ok(self.add_device(clock, device))
    }

    /// Returns `true` once `expires_at` has been reached.
    pub fn is_expired<C: Clock + ?Sized>(&self, clock: &C) -> bool {
        clock.now() >= self.expires_at
    }

    /// Returns `true` when the account belongs to the administrator group.
    pub fn is_admin(&self) -> bool {
        self.group_id == ADMIN_GROUP_ID
    }

    /// Blocks the account, replacing any previous ban message.
    pub fn ban(&mut self, message: Option<String>) {
        self.banned = true;
        self.ban_message = message;
        tracing::info!(
            account_id = self.id.as_deref().unwrap_or_default(),
            "account banned"
        );
    }

    pub fn unban(&mut self) {
        self.banned = false;
        self.ban_message = None;
    }
}
