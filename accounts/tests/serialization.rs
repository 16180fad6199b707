use accounts_model::{AccountRecord, NewDevice, SessionStatus};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

#[path = "support/mod.rs"]
mod support;

#[test]
fn account_serializes_counts_as_computed_fields() {
    let clock = support::test_clock();
    let mut account = support::seed_account();
    let first = account.add_device(&clock, NewDevice::default());
    account.add_device(&clock, NewDevice::default());
    account.remove_device(&clock, &first);

    let json = serde_json::to_value(&account).unwrap();
    assert_eq!(json["id"], "acc-1");
    assert_eq!(json["activeDeviceCount"], 1);
    assert_eq!(json["totalDeviceCount"], 2);
    assert_eq!(json["devices"].as_array().unwrap().len(), 2);
    assert_eq!(json["devices"][0]["isActive"], false);
    assert_eq!(json["devices"][0]["sessionId"], first.to_string());
    assert_eq!(json["devices"][1]["isActive"], true);
}

#[test]
fn account_emits_every_field_in_camel_case() {
    let account = support::seed_account();
    let json = serde_json::to_value(&account).unwrap();
    let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();

    for key in [
        "id",
        "alternateIds",
        "hasPassword",
        "expiresAt",
        "groupId",
        "banned",
        "banMessage",
        "comment",
        "params",
        "devices",
        "activeDeviceCount",
        "totalDeviceCount",
    ] {
        assert!(keys.contains(&key), "missing {key}");
    }
    assert_eq!(keys.len(), 12);
    assert_eq!(json["banMessage"], Value::Null);
}

#[test]
fn account_round_trips_and_ignores_computed_fields_on_input() {
    let clock = support::test_clock();
    let mut account = support::seed_account();
    account.alternate_ids = vec!["legacy-7".to_string()];
    account.has_password = true;
    account.group_id = 2;
    account.comment = Some("vip".to_string());
    account.add_device(&clock, NewDevice::default().with_device_name("tv"));

    let mut json = serde_json::to_value(&account).unwrap();
    json["activeDeviceCount"] = json!(99);
    json["totalDeviceCount"] = json!(99);

    let back: AccountRecord = serde_json::from_value(json).unwrap();
    assert_eq!(back, account);
    assert_eq!(back.active_device_count(), 1);
    assert_eq!(back.total_device_count(), 1);
}

#[test]
fn params_are_preserved_verbatim() {
    let input = json!({
        "id": "acc-2",
        "params": {
            "theme": "dark",
            "quota": 12.5,
            "beta": true,
            "nothing": null,
            "tags": ["a", "b"],
            "nested": { "depth": 2 }
        }
    });

    let account: AccountRecord = serde_json::from_value(input.clone()).unwrap();
    let params = account.params.as_ref().unwrap();
    assert_eq!(params["quota"], json!(12.5));
    assert_eq!(params["nested"]["depth"], json!(2));

    let output = serde_json::to_value(&account).unwrap();
    assert_eq!(output["params"], input["params"]);
}

#[test]
fn missing_fields_take_defaults() {
    let account: AccountRecord = serde_json::from_str("{}").unwrap();
    assert!(account.id.is_none());
    assert!(account.alternate_ids.is_empty());
    assert!(!account.has_password);
    assert!(!account.banned);
    assert_eq!(account.group_id, 0);
    assert_eq!(account.expires_at, DateTime::<Utc>::default());
    assert_eq!(account.total_device_count(), 0);
}

#[test]
fn legacy_field_names_are_accepted() {
    let input = json!({
        "Id": "acc-3",
        "Ids": ["old-1", "old-2"],
        "IsPasswd": true,
        "Expires": "2030-01-01T00:00:00Z",
        "Group": 1,
        "Ban": true,
        "BanMsg": "fraud",
        "Comment": "manual review",
        "Devices": [{
            "SessionId": "6f1c1a52-8c1e-4c3b-9a55-3b5a9d7e4c21",
            "MacAddress": "00:1A:2B:3C:4D:5E",
            "UserAgent": "curl/8.0",
            "IpAddress": "10.1.2.3",
            "DeviceName": "build box",
            "LoginTime": "2029-12-01T10:00:00Z",
            "LastActivity": "2029-12-02T10:00:00Z",
            "IsActive": false
        }]
    });

    let account: AccountRecord = serde_json::from_value(input).unwrap();
    assert_eq!(account.id.as_deref(), Some("acc-3"));
    assert_eq!(account.alternate_ids, vec!["old-1", "old-2"]);
    assert!(account.has_password);
    assert!(account.is_admin());
    assert!(account.banned);
    assert_eq!(account.ban_message.as_deref(), Some("fraud"));
    assert_eq!(account.comment.as_deref(), Some("manual review"));

    let session = &account.devices()[0];
    assert_eq!(
        session.session_id.to_string(),
        "6f1c1a52-8c1e-4c3b-9a55-3b5a9d7e4c21"
    );
    assert_eq!(session.mac_address.as_deref(), Some("00:1A:2B:3C:4D:5E"));
    assert_eq!(session.user_agent.as_deref(), Some("curl/8.0"));
    assert_eq!(session.ip_address.as_deref(), Some("10.1.2.3"));
    assert_eq!(session.device_name.as_deref(), Some("build box"));
    assert_eq!(
        session.login_time,
        "2029-12-01T10:00:00Z".parse::<DateTime<Utc>>().unwrap()
    );
    assert_eq!(
        session.last_activity,
        "2029-12-02T10:00:00Z".parse::<DateTime<Utc>>().unwrap()
    );
    assert_eq!(session.status, SessionStatus::Inactive);
    assert_eq!(account.active_device_count(), 0);
    assert_eq!(account.total_device_count(), 1);
}

#[test]
fn malformed_session_id_is_rejected() {
    let input = json!({
        "devices": [{
            "sessionId": "not-a-uuid",
            "loginTime": "2029-12-01T10:00:00Z",
            "lastActivity": "2029-12-01T10:00:00Z",
            "isActive": true
        }]
    });
    assert!(serde_json::from_value::<AccountRecord>(input).is_err());
}
