// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Yandex Tracker REST API request/response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Reference to a named entity (issue type, status, priority).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NamedRef {
    pub name: String,
}

/// Contact fields stored on the issue.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContactFields {
    pub full_name: String,
    pub phone: String,
    pub email: String,
}

/// Body of `POST /issues/`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateIssueRequest {
    pub queue: String,
    pub summary: String,
    pub description: String,
    #[serde(rename = "type")]
    pub issue_type: NamedRef,
    pub custom_fields: ContactFields,
}

/// The part of an issue the bot cares about.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueResponse {
    pub key: String,
}

/// A comment as returned by `GET /issues/{key}/comments`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: i64,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Error body returned on 4xx/5xx.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub error_messages: Vec<String>,
    #[serde(default)]
    pub status_code: Option<u16>,
}

/// Parses Tracker timestamps.
///
/// Tracker emits `2017-06-06T16:57:04.473+0000` (no colon in the offset);
/// plain RFC 3339 is accepted too.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .map(|dt| dt.with_timezone(&Utc))
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_tracker_offset_format() {
        let ts = parse_timestamp("2017-06-06T16:57:04.473+0000").unwrap();
        assert_eq!(
            ts,
            Utc.with_ymd_and_hms(2017, 6, 6, 16, 57, 4).unwrap()
                + chrono::Duration::milliseconds(473)
        );
    }

    #[test]
    fn parses_rfc3339_with_offset() {
        let ts = parse_timestamp("2024-01-01T15:00:00+03:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn create_request_serializes_tracker_field_names() {
        let req = CreateIssueRequest {
            queue: "SUPPORT".into(),
            summary: "Login issue — Acme".into(),
            description: "Cannot log in".into(),
            issue_type: NamedRef {
                name: "Обращение".into(),
            },
            custom_fields: ContactFields {
                full_name: "Jane Doe".into(),
                phone: "+19995551234".into(),
                email: "jane@acme.com".into(),
            },
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["type"]["name"], "Обращение");
        assert_eq!(json["customFields"]["fullName"], "Jane Doe");
        assert_eq!(json["queue"], "SUPPORT");
    }

    #[test]
    fn comment_without_text_deserializes() {
        let json = r#"{"id": 7, "createdAt": "2024-03-01T10:00:00.000+0000"}"#;
        let comment: CommentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(comment.id, 7);
        assert!(comment.text.is_none());
    }
}
