use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ComplaintId, EnumParsingError, ResultId, User, UserLogin};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplaintType {
    #[default]
    Complaint,
    MoreFeedback,
}

impl ComplaintType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Complaint => "COMPLAINT",
            Self::MoreFeedback => "MORE_FEEDBACK",
        }
    }
}

impl fmt::Display for ComplaintType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplaintType {
    type Err = EnumParsingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "COMPLAINT" => Ok(Self::Complaint),
            "MORE_FEEDBACK" => Ok(Self::MoreFeedback),
            other => Err(EnumParsingError::ParsingError(other.to_string())),
        }
    }
}

/// Assessment result which the complaint is about.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradingResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ResultId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::time::iso8601_option"
    )]
    pub completion_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_text: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::time::iso8601_option"
    )]
    pub submitted_time: Option<DateTime<Utc>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::time::iso8601_option"
    )]
    pub lock_end_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer: Option<User>,
    #[serde(default)]
    pub is_currently_locked: bool,
}

impl ComplaintResponse {
    /// Submitting the response releases the lock, so only unanswered
    /// responses can lock the complaint.
    pub fn is_actively_locking(&self) -> bool {
        self.is_currently_locked && self.submitted_time.is_none()
    }

    pub fn reviewer_login(&self) -> Option<&UserLogin> {
        self.reviewer.as_ref().and_then(|r| r.login.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ComplaintId>,
    #[serde(default)]
    pub complaint_type: ComplaintType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complaint_text: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::time::iso8601_option"
    )]
    pub submitted_time: Option<DateTime<Utc>>,
    /// Unset until the complaint is accepted or rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<GradingResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complaint_response: Option<ComplaintResponse>,
}

impl Complaint {
    /// Response which currently locks this complaint.
    pub fn active_lock(&self) -> Option<&ComplaintResponse> {
        self.complaint_response
            .as_ref()
            .filter(|response| response.is_actively_locking())
    }

    /// Accepted or rejected.
    pub fn is_handled(&self) -> bool {
        self.accepted.is_some()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn time_2022_04_14() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 4, 14, 10, 35, 12).unwrap()
            + chrono::Duration::milliseconds(332)
    }

    fn locked_response(reviewer: &str) -> ComplaintResponse {
        ComplaintResponse {
            reviewer: Some(User::with_login(UserLogin::new(reviewer))),
            is_currently_locked: true,
            ..ComplaintResponse::default()
        }
    }

    #[test]
    fn complaint_without_response_has_no_lock() {
        assert!(Complaint::default().active_lock().is_none());
    }

    #[test]
    fn unlocked_response_is_not_active_lock() {
        let response = ComplaintResponse::default();
        assert!(!response.is_actively_locking());
    }

    #[test]
    fn submitted_response_releases_lock() {
        let mut response = locked_response("tutor");
        assert!(response.is_actively_locking());
        response.submitted_time = Some(time_2022_04_14());
        assert!(!response.is_actively_locking());
    }

    #[test]
    fn timestamps_serialize_as_iso8601_with_milliseconds() {
        let complaint = Complaint {
            id: Some(ComplaintId(42)),
            complaint_type: ComplaintType::MoreFeedback,
            complaint_text: Some("Test text".to_string()),
            submitted_time: Some(time_2022_04_14()),
            result: Some(GradingResult::default()),
            ..Complaint::default()
        };

        let value = serde_json::to_value(&complaint).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 42,
                "complaintType": "MORE_FEEDBACK",
                "complaintText": "Test text",
                "submittedTime": "2022-04-14T10:35:12.332Z",
                "result": {},
            })
        );
    }

    #[test]
    fn server_json_deserializes_to_complaint() {
        let value = json!({
            "id": 7,
            "complaintType": "COMPLAINT",
            "submittedTime": "2022-04-14T10:35:12.332Z",
            "accepted": null,
            "complaintResponse": {
                "isCurrentlyLocked": true,
                "reviewer": { "login": "tutor", "groups": ["tutors"] },
                "lockEndDate": "2022-04-15T10:35:12.332Z"
            },
            "unknownField": "ignored"
        });

        let complaint: Complaint = serde_json::from_value(value).unwrap();
        assert_eq!(complaint.submitted_time, Some(time_2022_04_14()));
        assert_eq!(complaint.accepted, None);
        let response = complaint.complaint_response.as_ref().unwrap();
        assert_eq!(response.reviewer_login(), Some(&UserLogin::new("tutor")));
        assert!(complaint.active_lock().is_some());
    }

    #[test]
    fn invalid_timestamp_is_rejected() {
        let value = json!({ "submittedTime": "not a time" });
        assert!(serde_json::from_value::<Complaint>(value).is_err());
    }

    #[test]
    fn complaint_type_string_conversions() {
        assert_eq!(ComplaintType::MoreFeedback.to_string(), "MORE_FEEDBACK");
        assert_eq!(
            "COMPLAINT".parse::<ComplaintType>().unwrap(),
            ComplaintType::Complaint
        );
        assert!("complaint".parse::<ComplaintType>().is_err());
    }
}
