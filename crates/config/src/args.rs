//! Config given as command line arguments

use std::path::PathBuf;

use clap::{Args, Parser, ValueEnum};
use model::{ComplaintType, CourseId, ExamId, ExerciseId, ResultId, SubmissionId, UserId};
use url::Url;

#[derive(Args, Debug, Clone)]
pub struct ArgsConfig {
    /// Print build info and quit.
    #[arg(short, long)]
    pub build_info: bool,

    /// Directory containing the config file. If not present, current
    /// working directory is used.
    #[arg(short = 'd', long, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Artemis server URL. If not present, value from the config file
    /// is used.
    #[arg(short = 'u', long, value_name = "URL")]
    pub api_url: Option<Url>,

    #[command(subcommand)]
    pub mode: Option<AppMode>,
}

#[derive(Parser, Debug, Clone)]
pub enum AppMode {
    /// Complaint API requests
    #[command(subcommand)]
    Complaint(ComplaintCommand),
    /// Print the difference between server and client clocks
    ServerTime,
    /// Check server version changes until interrupted
    WatchVersion,
}

#[derive(Parser, Debug, Clone)]
pub enum ComplaintCommand {
    /// Create complaint for a result
    Create {
        result_id: i64,
        text: String,
        /// Create complaint for an exam exercise
        #[arg(long, value_name = "ID")]
        exam_id: Option<i64>,
        #[arg(long, value_enum, default_value_t = ComplaintTypeArg::Complaint)]
        complaint_type: ComplaintTypeArg,
    },
    /// Complaint of a submission
    Submission { submission_id: i64 },
    /// Complaints of the test run dashboard
    TestRun { exercise_id: i64 },
    /// More feedback requests of the assessment dashboard
    MoreFeedback { exercise_id: i64 },
    /// Number of complaints the logged in student can still submit
    Allowed {
        course_id: i64,
        #[arg(long)]
        team_mode: bool,
    },
    /// Complaints assigned to a tutor in a course
    TutorCourse {
        tutor_id: i64,
        course_id: i64,
        #[arg(long, value_enum, default_value_t = ComplaintTypeArg::Complaint)]
        complaint_type: ComplaintTypeArg,
    },
    /// Complaints assigned to a tutor in an exercise
    TutorExercise {
        tutor_id: i64,
        exercise_id: i64,
        #[arg(long, value_enum, default_value_t = ComplaintTypeArg::Complaint)]
        complaint_type: ComplaintTypeArg,
    },
    /// Complaints of a course
    Course {
        course_id: i64,
        #[arg(long, value_enum)]
        complaint_type: Option<ComplaintTypeArg>,
    },
    /// Complaints of an exam
    Exam { course_id: i64, exam_id: i64 },
    /// Complaints of an exercise
    Exercise {
        exercise_id: i64,
        #[arg(long, value_enum)]
        complaint_type: Option<ComplaintTypeArg>,
    },
}

/// Typed request parameters of [ComplaintCommand].
#[derive(Debug, Clone, PartialEq)]
pub enum ComplaintRequest {
    Create {
        result_id: ResultId,
        text: String,
        exam_id: Option<ExamId>,
        complaint_type: ComplaintType,
    },
    Submission(SubmissionId),
    TestRun(ExerciseId),
    MoreFeedback(ExerciseId),
    Allowed {
        course_id: CourseId,
        team_mode: bool,
    },
    TutorCourse(UserId, CourseId, ComplaintType),
    TutorExercise(UserId, ExerciseId, ComplaintType),
    Course(CourseId, Option<ComplaintType>),
    Exam(CourseId, ExamId),
    Exercise(ExerciseId, Option<ComplaintType>),
}

impl ComplaintCommand {
    pub fn request(&self) -> ComplaintRequest {
        match self.clone() {
            Self::Create {
                result_id,
                text,
                exam_id,
                complaint_type,
            } => ComplaintRequest::Create {
                result_id: ResultId(result_id),
                text,
                exam_id: exam_id.map(ExamId),
                complaint_type: complaint_type.into(),
            },
            Self::Submission { submission_id } => {
                ComplaintRequest::Submission(SubmissionId(submission_id))
            }
            Self::TestRun { exercise_id } => ComplaintRequest::TestRun(ExerciseId(exercise_id)),
            Self::MoreFeedback { exercise_id } => {
                ComplaintRequest::MoreFeedback(ExerciseId(exercise_id))
            }
            Self::Allowed {
                course_id,
                team_mode,
            } => ComplaintRequest::Allowed {
                course_id: CourseId(course_id),
                team_mode,
            },
            Self::TutorCourse {
                tutor_id,
                course_id,
                complaint_type,
            } => ComplaintRequest::TutorCourse(
                UserId(tutor_id),
                CourseId(course_id),
                complaint_type.into(),
            ),
            Self::TutorExercise {
                tutor_id,
                exercise_id,
                complaint_type,
            } => ComplaintRequest::TutorExercise(
                UserId(tutor_id),
                ExerciseId(exercise_id),
                complaint_type.into(),
            ),
            Self::Course {
                course_id,
                complaint_type,
            } => ComplaintRequest::Course(CourseId(course_id), complaint_type.map(Into::into)),
            Self::Exam { course_id, exam_id } => {
                ComplaintRequest::Exam(CourseId(course_id), ExamId(exam_id))
            }
            Self::Exercise {
                exercise_id,
                complaint_type,
            } => {
                ComplaintRequest::Exercise(ExerciseId(exercise_id), complaint_type.map(Into::into))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ComplaintTypeArg {
    Complaint,
    MoreFeedback,
}

impl From<ComplaintTypeArg> for ComplaintType {
    fn from(value: ComplaintTypeArg) -> Self {
        match value {
            ComplaintTypeArg::Complaint => ComplaintType::Complaint,
            ComplaintTypeArg::MoreFeedback => ComplaintType::MoreFeedback,
        }
    }
}
