#![allow(dead_code)]
use accounts_model::{AccountRecord, ManualClock};
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap()
}

pub fn test_clock() -> ManualClock {
    ManualClock::new(base_time())
}

pub fn seed_account() -> AccountRecord {
    AccountRecord::new("acc-1", base_time() + ChronoDuration::days(30))
}
