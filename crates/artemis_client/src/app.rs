//! Run the selected command against the Artemis server

use std::sync::Arc;

use api_client::{ApiClient, Configuration, ReqwestTransport, ServerDateService};
use complaint::{Account, ComplaintService};
use config::{
    Config,
    args::{AppMode, ComplaintRequest},
};
use error_stack::{Result, ResultExt};
use model::{Complaint, GradingResult};
use tokio::sync::{broadcast, watch};
use tracing::info;
use version_check::{
    VersionCheckingTransport, VersionMonitor, VersionMonitorConfig, VersionMonitorDeps,
};

use crate::{
    output::complaint_lines,
    version_watch::{LogAlertService, LogReloader, ServerVersionCheck},
};

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("API client creation failed")]
    ApiClient,
    #[error("Complaint request failed")]
    Complaint,
    #[error("Server time request failed")]
    ServerTime,
    #[error("Writing output failed")]
    Output,
    #[error("Waiting quit signal failed")]
    Signal,
}

pub struct ArtemisClientApp {
    config: Arc<Config>,
}

impl ArtemisClientApp {
    pub fn new(config: Config) -> Self {
        Self {
            config: config.into(),
        }
    }

    pub async fn run(self, mode: AppMode) -> Result<(), AppError> {
        info!("Artemis client version: {}", self.config.client_version());

        let configuration =
            Configuration::new(self.config.api_url(), Some(self.config.user_agent()))
                .change_context(AppError::ApiClient)?
                .with_access_token(self.config.access_token().map(ToString::to_string));
        configuration.print_to_log();
        let transport = Arc::new(ReqwestTransport::new(configuration));
        // Requests which do not trigger version checks or time sync.
        let plain_api = ApiClient::new(transport.clone());
        let server_date = ServerDateService::new(plain_api.clone());

        let (quit_handle, quit_watcher) = broadcast::channel(1);
        let (readiness_sender, readiness) = watch::channel(false);
        let (monitor_handle, monitor_state) = VersionMonitor::new_channel();
        let monitor_quit_handle = VersionMonitor::new_manager(
            monitor_state,
            VersionMonitorDeps {
                readiness,
                update_service: Arc::new(ServerVersionCheck::new(
                    plain_api,
                    self.config.client_version(),
                )),
                reloader: Arc::new(LogReloader),
                alerts: Arc::new(LogAlertService),
            },
            self.version_monitor_config(),
            quit_watcher,
        );

        let api = ApiClient::new(Arc::new(
            VersionCheckingTransport::new(transport, self.config.client_version(), monitor_handle)
                .with_server_time(Arc::new(server_date.clone())),
        ));
        let complaints = ComplaintService::new(
            api,
            Arc::new(Account::new(self.config.account_identity())),
        );

        // Configuration is loaded and clients exist.
        let _ = readiness_sender.send(true);

        let result = match mode {
            AppMode::Complaint(command) => {
                run_complaint_request(&complaints, &server_date, command.request()).await
            }
            AppMode::ServerTime => print_server_time(&server_date).await,
            AppMode::WatchVersion => {
                info!("Watching server version, press Ctrl-C to quit");
                tokio::signal::ctrl_c()
                    .await
                    .change_context(AppError::Signal)
            }
        };

        drop(quit_handle);
        monitor_quit_handle.wait_quit().await;

        result
    }

    fn version_monitor_config(&self) -> VersionMonitorConfig {
        VersionMonitorConfig {
            readiness_timeout: self.config.readiness_timeout(),
            update_interval: self.config.update_interval(),
            ..VersionMonitorConfig::new(self.config.client_version())
        }
    }
}

async fn run_complaint_request(
    service: &ComplaintService,
    server_date: &ServerDateService,
    request: ComplaintRequest,
) -> Result<(), AppError> {
    let (complaints, exercise_id) = match request {
        ComplaintRequest::Create {
            result_id,
            text,
            exam_id,
            complaint_type,
        } => {
            let complaint = Complaint {
                complaint_type,
                complaint_text: Some(text),
                result: Some(GradingResult {
                    id: Some(result_id),
                    ..GradingResult::default()
                }),
                ..Complaint::default()
            };
            let created = service
                .create(&complaint, exam_id)
                .await
                .change_context(AppError::Complaint)?;
            (vec![created], None)
        }
        ComplaintRequest::Submission(submission_id) => {
            let complaint = service
                .find_by_submission_id(submission_id)
                .await
                .change_context(AppError::Complaint)?;
            if complaint.is_none() {
                info!("Submission {} has no complaint", submission_id);
            }
            (complaint.into_iter().collect(), None)
        }
        ComplaintRequest::TestRun(exercise_id) => (
            service
                .get_complaints_for_test_run(exercise_id)
                .await
                .change_context(AppError::Complaint)?,
            Some(exercise_id),
        ),
        ComplaintRequest::MoreFeedback(exercise_id) => (
            service
                .get_more_feedback_requests_for_tutor(exercise_id)
                .await
                .change_context(AppError::Complaint)?,
            Some(exercise_id),
        ),
        ComplaintRequest::Allowed {
            course_id,
            team_mode,
        } => {
            let allowed = service
                .get_number_of_allowed_complaints_in_course(course_id, team_mode)
                .await
                .change_context(AppError::Complaint)?;
            println!("{}", allowed);
            return Ok(());
        }
        ComplaintRequest::TutorCourse(tutor_id, course_id, complaint_type) => (
            service
                .find_all_by_tutor_id_for_course_id(tutor_id, course_id, complaint_type)
                .await
                .change_context(AppError::Complaint)?,
            None,
        ),
        ComplaintRequest::TutorExercise(tutor_id, exercise_id, complaint_type) => (
            service
                .find_all_by_tutor_id_for_exercise_id(tutor_id, exercise_id, complaint_type)
                .await
                .change_context(AppError::Complaint)?,
            Some(exercise_id),
        ),
        ComplaintRequest::Course(course_id, complaint_type) => (
            service
                .find_all_by_course_id(course_id, complaint_type)
                .await
                .change_context(AppError::Complaint)?,
            None,
        ),
        ComplaintRequest::Exam(course_id, exam_id) => (
            service
                .find_all_by_course_id_and_exam_id(course_id, exam_id)
                .await
                .change_context(AppError::Complaint)?,
            None,
        ),
        ComplaintRequest::Exercise(exercise_id, complaint_type) => (
            service
                .find_all_by_exercise_id(exercise_id, complaint_type)
                .await
                .change_context(AppError::Complaint)?,
            Some(exercise_id),
        ),
    };

    let exercise = match exercise_id {
        Some(exercise_id) => Some(
            service
                .find_exercise(exercise_id)
                .await
                .change_context(AppError::Complaint)?,
        ),
        None => None,
    };
    let lines = complaint_lines(service, &complaints, exercise.as_ref(), server_date.now().await)
        .change_context(AppError::Output)?;
    for line in lines {
        println!("{}", line);
    }
    Ok(())
}

async fn print_server_time(server_date: &ServerDateService) -> Result<(), AppError> {
    server_date
        .sync_if_needed()
        .await
        .change_context(AppError::ServerTime)?;
    match server_date.offset().await {
        Some(offset) => {
            println!("Server time: {}", server_date.now().await.to_rfc3339());
            println!("Offset: {} ms", offset.num_milliseconds());
        }
        None => info!("Server time is not known yet"),
    }
    Ok(())
}
