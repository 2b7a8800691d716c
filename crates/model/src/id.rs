use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($( $(#[$meta:meta])* $name:ident ),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
            #[serde(transparent)]
            pub struct $name(pub i64);

            impl From<i64> for $name {
                fn from(value: i64) -> Self {
                    Self(value)
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }
        )*
    };
}

define_id!(
    ComplaintId,
    CourseId,
    ExamId,
    ExerciseId,
    ResultId,
    SubmissionId,
    /// Database ID of a user. Tutor filters use this.
    UserId,
);
