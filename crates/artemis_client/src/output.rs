//! Complaint output as JSON lines

use chrono::{DateTime, Utc};
use complaint::ComplaintService;
use model::{Complaint, Exercise};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintSummary<'a> {
    #[serde(flatten)]
    pub complaint: &'a Complaint,
    pub locked: bool,
    pub locked_by_logged_in_user: bool,
    /// Only known when the exercise is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked_for_logged_in_user: Option<bool>,
    pub highlighted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_seconds: Option<i64>,
}

impl<'a> ComplaintSummary<'a> {
    pub fn new(
        service: &ComplaintService,
        complaint: &'a Complaint,
        exercise: Option<&Exercise>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            complaint,
            locked: service.is_complaint_locked(complaint),
            locked_by_logged_in_user: service.is_complaint_locked_by_logged_in_user(complaint),
            locked_for_logged_in_user: exercise
                .map(|exercise| service.is_complaint_locked_for_logged_in_user(complaint, exercise)),
            highlighted: service.should_highlight_complaint(complaint, now),
            response_time_seconds: service.response_time(complaint).map(|t| t.num_seconds()),
        }
    }
}

pub fn complaint_lines(
    service: &ComplaintService,
    complaints: &[Complaint],
    exercise: Option<&Exercise>,
    now: DateTime<Utc>,
) -> Result<Vec<String>, serde_json::Error> {
    complaints
        .iter()
        .map(|complaint| {
            serde_json::to_string(&ComplaintSummary::new(service, complaint, exercise, now))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use api_client::{ApiClient, ApiError, ApiRequest, ApiResponse, HttpTransport};
    use async_trait::async_trait;
    use chrono::TimeZone;
    use complaint::Account;
    use model::{
        AUTHORITY_ADMIN, ComplaintId, ComplaintResponse, Course, ExerciseId, User, UserLogin,
    };

    use super::*;

    struct NoTransport;

    #[async_trait]
    impl HttpTransport for NoTransport {
        async fn send(
            &self,
            _request: ApiRequest,
        ) -> error_stack::Result<ApiResponse, ApiError> {
            Err(error_stack::report!(ApiError::RequestFailed))
        }
    }

    fn service_for(user: User) -> ComplaintService {
        ComplaintService::new(
            ApiClient::new(Arc::new(NoTransport)),
            Arc::new(Account::new(Some(user))),
        )
    }

    fn complaint_locked_by_tutor2() -> Complaint {
        Complaint {
            id: Some(ComplaintId(42)),
            submitted_time: Some(Utc.with_ymd_and_hms(2022, 4, 1, 10, 0, 0).unwrap()),
            complaint_response: Some(ComplaintResponse {
                reviewer: Some(User::with_login(UserLogin::new("tutor2"))),
                is_currently_locked: true,
                ..ComplaintResponse::default()
            }),
            ..Complaint::default()
        }
    }

    fn exercise_in_course(instructor_group: &str) -> Exercise {
        Exercise {
            id: Some(ExerciseId(1)),
            course: Some(Course {
                instructor_group_name: Some(instructor_group.to_string()),
                ..Course::default()
            }),
            ..Exercise::default()
        }
    }

    fn locked_for_logged_in_user(user: User, exercise: &Exercise) -> serde_json::Value {
        let service = service_for(user);
        let now = Utc.with_ymd_and_hms(2022, 4, 14, 10, 0, 0).unwrap();
        let lines =
            complaint_lines(&service, &[complaint_locked_by_tutor2()], Some(exercise), now)
                .unwrap();
        let value: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        value["lockedForLoggedInUser"].clone()
    }

    #[test]
    fn summary_contains_lock_state() {
        let service = service_for(User::with_login(UserLogin::new("tutor1")));
        let now = Utc.with_ymd_and_hms(2022, 4, 14, 10, 0, 0).unwrap();

        let lines = complaint_lines(
            &service,
            &[complaint_locked_by_tutor2()],
            Some(&exercise_in_course("instructors")),
            now,
        )
        .unwrap();

        let value: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(value["id"], 42);
        assert_eq!(value["locked"], true);
        assert_eq!(value["lockedByLoggedInUser"], false);
        assert_eq!(value["lockedForLoggedInUser"], true);
        assert_eq!(value["highlighted"], true);
        assert!(value.get("responseTimeSeconds").is_none());
    }

    #[test]
    fn instructor_group_member_is_not_locked_out() {
        let instructor = User {
            groups: vec!["instructors".to_string()],
            ..User::with_login(UserLogin::new("instructor1"))
        };
        assert_eq!(
            locked_for_logged_in_user(instructor, &exercise_in_course("instructors")),
            false
        );
    }

    #[test]
    fn admin_is_not_locked_out() {
        let admin = User {
            authorities: vec![AUTHORITY_ADMIN.to_string()],
            ..User::with_login(UserLogin::new("admin"))
        };
        let exercise = Exercise {
            id: Some(ExerciseId(1)),
            ..Exercise::default()
        };
        assert_eq!(locked_for_logged_in_user(admin, &exercise), false);
    }

    #[test]
    fn summary_without_exercise_omits_instructor_lock_state() {
        let service = service_for(User::with_login(UserLogin::new("tutor1")));
        let now = Utc.with_ymd_and_hms(2022, 4, 14, 10, 0, 0).unwrap();
        let lines = complaint_lines(&service, &[complaint_locked_by_tutor2()], None, now).unwrap();
        let value: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert!(value.get("lockedForLoggedInUser").is_none());
        assert_eq!(value["locked"], true);
    }
}
