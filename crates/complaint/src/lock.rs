//! Complaint lock checks
//!
//! Missing complaint response or missing user identity always means
//! "not locked". These checks only decide what the user interface shows.

use chrono::{DateTime, TimeDelta, Utc};
use model::{Complaint, Exercise};

use crate::AccountService;

/// Complaints without a decision are highlighted after this many
/// full days.
pub const HIGHLIGHT_COMPLAINTS_OLDER_THAN_DAYS: i64 = 7;

/// Another reviewer holds the lock and the logged in user can not
/// override it.
pub fn is_complaint_locked_for_logged_in_user(
    account: &dyn AccountService,
    complaint: &Complaint,
    exercise: &Exercise,
) -> bool {
    let Some(lock) = complaint.active_lock() else {
        return false;
    };
    let Some(login) = account.user_login() else {
        return false;
    };
    if lock.reviewer_login() == Some(login) {
        return false;
    }
    !account.is_at_least_instructor_for_exercise(exercise)
}

pub fn is_complaint_locked_by_logged_in_user(
    account: &dyn AccountService,
    complaint: &Complaint,
) -> bool {
    let Some(lock) = complaint.active_lock() else {
        return false;
    };
    match (account.user_login(), lock.reviewer_login()) {
        (Some(login), Some(reviewer)) => login == reviewer && !complaint.is_handled(),
        _ => false,
    }
}

pub fn is_complaint_locked(complaint: &Complaint) -> bool {
    complaint.active_lock().is_some()
}

/// Time between complaint and response. Only available for
/// handled complaints.
pub fn response_time(complaint: &Complaint) -> Option<TimeDelta> {
    if !complaint.is_handled() {
        return None;
    }
    let submitted = complaint.submitted_time?;
    let answered = complaint.complaint_response.as_ref()?.submitted_time?;
    Some(answered - submitted)
}

pub fn should_highlight_complaint(complaint: &Complaint, now: DateTime<Utc>) -> bool {
    if complaint.is_handled() {
        return false;
    }
    complaint
        .submitted_time
        .map(|submitted| (now - submitted).num_days() > HIGHLIGHT_COMPLAINTS_OLDER_THAN_DAYS)
        .unwrap_or(false)
}
