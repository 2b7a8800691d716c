use model::{Course, Exercise, User, UserLogin};

/// Information about the logged in user.
pub trait AccountService: Send + Sync {
    fn user_identity(&self) -> Option<&User>;

    fn is_at_least_instructor_for_exercise(&self, exercise: &Exercise) -> bool;

    fn user_login(&self) -> Option<&UserLogin> {
        self.user_identity().and_then(|user| user.login.as_ref())
    }
}

/// [AccountService] for a fixed user.
#[derive(Debug, Clone, Default)]
pub struct Account {
    identity: Option<User>,
}

impl Account {
    pub fn new(identity: Option<User>) -> Self {
        Self { identity }
    }

    pub fn is_at_least_instructor_in_course(&self, course: &Course) -> bool {
        if course.is_at_least_instructor == Some(true) {
            return true;
        }

        let Some(user) = &self.identity else {
            return false;
        };

        user.is_admin()
            || course
                .instructor_group_name
                .as_deref()
                .map(|group| user.is_member_of(group))
                .unwrap_or(false)
    }
}

impl AccountService for Account {
    fn user_identity(&self) -> Option<&User> {
        self.identity.as_ref()
    }

    fn is_at_least_instructor_for_exercise(&self, exercise: &Exercise) -> bool {
        if self.identity.as_ref().is_some_and(User::is_admin) {
            return true;
        }
        exercise
            .course_via_exam_or_directly()
            .map(|course| self.is_at_least_instructor_in_course(course))
            .unwrap_or(false)
    }
}
