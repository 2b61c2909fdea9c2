//! User model and related functionality

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Layouts without an offset found in imported records, read as UTC
const NAIVE_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.fZ",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// User entity as stored
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub legacy_id: Option<i64>,
    pub username: String,
    pub password: String,
    pub full_name: Option<String>,
    pub role: Option<String>,
    pub register_date: Option<DateTime<Utc>>,
    pub register_date_raw: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Registration date in whichever form the record carries it
#[derive(Debug, Clone, PartialEq)]
pub enum RegisterDate {
    Timestamp(DateTime<Utc>),
    Text(String),
}

impl RegisterDate {
    /// RFC 3339 in UTC with millisecond precision.
    ///
    /// Text that matches no known layout is returned unchanged.
    pub fn normalize(&self) -> String {
        match self {
            RegisterDate::Timestamp(ts) => format_timestamp(ts),
            RegisterDate::Text(raw) => parse_date_text(raw)
                .map(|ts| format_timestamp(&ts))
                .unwrap_or_else(|| raw.clone()),
        }
    }
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_date_text(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    NAIVE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(raw, layout).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

impl User {
    /// Native timestamp wins over the imported text
    pub fn register_date(&self) -> Option<RegisterDate> {
        self.register_date
            .map(RegisterDate::Timestamp)
            .or_else(|| self.register_date_raw.clone().map(RegisterDate::Text))
    }
}

/// Profile returned to the account owner. Carries no password.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "id", skip_serializing_if = "Option::is_none")]
    pub legacy_id: Option<i64>,
    pub username: String,
    pub full_name: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub register_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            legacy_id: user.legacy_id,
            register_date: user.register_date().map(|date| date.normalize()),
            updated_at: user.updated_at.as_ref().map(format_timestamp),
            username: user.username,
            full_name: user.full_name.unwrap_or_default(),
            role: user.role.unwrap_or_default(),
        }
    }
}
