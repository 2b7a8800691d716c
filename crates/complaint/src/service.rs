use std::sync::Arc;

use api_client::{ApiClient, ApiRequest};
use chrono::{DateTime, TimeDelta, Utc};
use error_stack::{Result, ResultExt};
use model::{
    Complaint, ComplaintType, CourseId, ExamId, Exercise, ExerciseId, SubmissionId, UserId,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{AccountService, lock};

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ComplaintApiError {
    #[error("API request failed")]
    ApiRequest,

    #[error("Serializing complaint failed")]
    Serialize,
}

/// Complaint REST API and lock checks for the logged in user.
#[derive(Clone)]
pub struct ComplaintService {
    api: ApiClient,
    account: Arc<dyn AccountService>,
}

impl ComplaintService {
    pub fn new(api: ApiClient, account: Arc<dyn AccountService>) -> Self {
        Self { api, account }
    }

    pub fn account(&self) -> &dyn AccountService {
        self.account.as_ref()
    }

    pub fn is_complaint_locked_for_logged_in_user(
        &self,
        complaint: &Complaint,
        exercise: &Exercise,
    ) -> bool {
        lock::is_complaint_locked_for_logged_in_user(self.account(), complaint, exercise)
    }

    pub fn is_complaint_locked_by_logged_in_user(&self, complaint: &Complaint) -> bool {
        lock::is_complaint_locked_by_logged_in_user(self.account(), complaint)
    }

    pub fn is_complaint_locked(&self, complaint: &Complaint) -> bool {
        lock::is_complaint_locked(complaint)
    }

    pub fn response_time(&self, complaint: &Complaint) -> Option<TimeDelta> {
        lock::response_time(complaint)
    }

    pub fn should_highlight_complaint(&self, complaint: &Complaint, now: DateTime<Utc>) -> bool {
        lock::should_highlight_complaint(complaint, now)
    }

    /// Create complaint for a course exercise or, if `exam_id` is set,
    /// for an exam exercise.
    pub async fn create(
        &self,
        complaint: &Complaint,
        exam_id: Option<ExamId>,
    ) -> Result<Complaint, ComplaintApiError> {
        let path = match exam_id {
            Some(exam_id) => format!("api/complaints/exam/{exam_id}"),
            None => "api/complaints".to_string(),
        };
        let body = serde_json::to_value(complaint).change_context(ComplaintApiError::Serialize)?;
        self.fetch(ApiRequest::post(path, body)).await
    }

    pub async fn find_by_submission_id(
        &self,
        submission_id: SubmissionId,
    ) -> Result<Option<Complaint>, ComplaintApiError> {
        let request = ApiRequest::get(format!("api/complaints/submissions/{submission_id}"));
        debug!("Find complaint for submission {}", submission_id);
        self.api
            .get_optional_json(request)
            .await
            .change_context(ComplaintApiError::ApiRequest)
    }

    pub async fn get_complaints_for_test_run(
        &self,
        exercise_id: ExerciseId,
    ) -> Result<Vec<Complaint>, ComplaintApiError> {
        self.fetch(ApiRequest::get(format!(
            "api/exercises/{exercise_id}/complaints-for-test-run-dashboard"
        )))
        .await
    }

    pub async fn get_more_feedback_requests_for_tutor(
        &self,
        exercise_id: ExerciseId,
    ) -> Result<Vec<Complaint>, ComplaintApiError> {
        self.fetch(ApiRequest::get(format!(
            "api/exercises/{exercise_id}/more-feedback-for-assessment-dashboard"
        )))
        .await
    }

    /// The server applies team rules if `team_mode` is true.
    pub async fn get_number_of_allowed_complaints_in_course(
        &self,
        course_id: CourseId,
        team_mode: bool,
    ) -> Result<i64, ComplaintApiError> {
        self.fetch(
            ApiRequest::get(format!("api/courses/{course_id}/allowed-complaints"))
                .with_query("teamMode", team_mode),
        )
        .await
    }

    pub async fn find_all_by_tutor_id_for_course_id(
        &self,
        tutor_id: UserId,
        course_id: CourseId,
        complaint_type: ComplaintType,
    ) -> Result<Vec<Complaint>, ComplaintApiError> {
        self.fetch(
            ApiRequest::get(format!("api/courses/{course_id}/complaints"))
                .with_query("complaintType", complaint_type)
                .with_query("tutorId", tutor_id),
        )
        .await
    }

    pub async fn find_all_by_tutor_id_for_exercise_id(
        &self,
        tutor_id: UserId,
        exercise_id: ExerciseId,
        complaint_type: ComplaintType,
    ) -> Result<Vec<Complaint>, ComplaintApiError> {
        self.fetch(
            ApiRequest::get(format!("api/exercises/{exercise_id}/complaints"))
                .with_query("complaintType", complaint_type)
                .with_query("tutorId", tutor_id),
        )
        .await
    }

    pub async fn find_all_by_course_id(
        &self,
        course_id: CourseId,
        complaint_type: Option<ComplaintType>,
    ) -> Result<Vec<Complaint>, ComplaintApiError> {
        let request = ApiRequest::get(format!("api/courses/{course_id}/complaints"));
        self.fetch(with_complaint_type(request, complaint_type)).await
    }

    pub async fn find_all_by_course_id_and_exam_id(
        &self,
        course_id: CourseId,
        exam_id: ExamId,
    ) -> Result<Vec<Complaint>, ComplaintApiError> {
        self.fetch(ApiRequest::get(format!(
            "api/courses/{course_id}/exams/{exam_id}/complaints"
        )))
        .await
    }

    pub async fn find_all_by_exercise_id(
        &self,
        exercise_id: ExerciseId,
        complaint_type: Option<ComplaintType>,
    ) -> Result<Vec<Complaint>, ComplaintApiError> {
        let request = ApiRequest::get(format!("api/exercises/{exercise_id}/complaints"));
        self.fetch(with_complaint_type(request, complaint_type)).await
    }

    /// Exercise with its course or exam. Instructor checks need the
    /// course.
    pub async fn find_exercise(
        &self,
        exercise_id: ExerciseId,
    ) -> Result<Exercise, ComplaintApiError> {
        self.fetch(ApiRequest::get(format!("api/exercises/{exercise_id}")))
            .await
    }

    async fn fetch<R: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<R, ComplaintApiError> {
        self.api
            .get_json(request)
            .await
            .change_context(ComplaintApiError::ApiRequest)
    }
}

fn with_complaint_type(request: ApiRequest, complaint_type: Option<ComplaintType>) -> ApiRequest {
    match complaint_type {
        Some(complaint_type) => request.with_query("complaintType", complaint_type),
        None => request,
    }
}
