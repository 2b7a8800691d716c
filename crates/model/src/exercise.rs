use serde::{Deserialize, Serialize};

use crate::{CourseId, ExamId, ExerciseId};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CourseId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor_group_name: Option<String>,
    /// Server computed permission flag for the requesting user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_at_least_instructor: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ExamId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<Course>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exam: Option<Exam>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ExerciseId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Set for course exercises.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<Course>,
    /// Set for exam exercises.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise_group: Option<ExerciseGroup>,
}

impl Exercise {
    /// Course of a course exercise or the course of the exam which
    /// contains the exercise.
    pub fn course_via_exam_or_directly(&self) -> Option<&Course> {
        self.course.as_ref().or_else(|| {
            self.exercise_group
                .as_ref()
                .and_then(|g| g.exam.as_ref())
                .and_then(|e| e.course.as_ref())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(id: i64) -> Course {
        Course {
            id: Some(CourseId(id)),
            ..Course::default()
        }
    }

    #[test]
    fn course_exercise_uses_own_course() {
        let exercise = Exercise {
            course: Some(course(1)),
            ..Exercise::default()
        };
        assert_eq!(exercise.course_via_exam_or_directly(), Some(&course(1)));
    }

    #[test]
    fn exam_exercise_uses_exam_course() {
        let exercise = Exercise {
            exercise_group: Some(ExerciseGroup {
                exam: Some(Exam {
                    id: Some(ExamId(3)),
                    course: Some(course(2)),
                }),
            }),
            ..Exercise::default()
        };
        assert_eq!(exercise.course_via_exam_or_directly(), Some(&course(2)));
    }

    #[test]
    fn exercise_without_course_has_no_course() {
        assert_eq!(Exercise::default().course_via_exam_or_directly(), None);
    }
}
