use crate::data::student::{NewStudent, Student, StudentChanges};
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid")
});

pub const NAME_TOO_SHORT: &str = "Name must be at least 2 characters";
pub const BAD_EMAIL: &str = "Please enter a valid email address";
pub const NO_COURSE: &str = "Please select a course";

/// What the student form posts back, before anything has been checked.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct StudentForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub course: String,
    #[serde(default)]
    pub profile_image: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub name: Option<&'static str>,
    pub email: Option<&'static str>,
    pub course: Option<&'static str>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.course.is_none()
    }

    pub fn messages(&self) -> impl Iterator<Item = &'static str> {
        [self.name, self.email, self.course].into_iter().flatten()
    }
}

impl StudentForm {
    pub fn from_student(student: &Student) -> Self {
        Self {
            name: student.name.clone(),
            email: student.email.clone(),
            course: student.course.clone(),
            profile_image: student.profile_image.clone().unwrap_or_default(),
        }
    }

    ///`known_courses` is whatever the dashboard has loaded right now
    pub fn validate<'a>(&self, known_courses: impl IntoIterator<Item = &'a str>) -> FieldErrors {
        let course_exists = known_courses.into_iter().any(|c| c == self.course);

        FieldErrors {
            name: (self.name.trim().chars().count() < 2).then_some(NAME_TOO_SHORT),
            email: (!EMAIL.is_match(&self.email)).then_some(BAD_EMAIL),
            course: (self.course.is_empty() || !course_exists).then_some(NO_COURSE),
        }
    }

    pub fn into_new_student(self) -> NewStudent {
        let Self {
            name,
            email,
            course,
            profile_image,
        } = self;

        NewStudent {
            name,
            email,
            course,
            profile_image: Some(profile_image).filter(|url| !url.trim().is_empty()),
        }
    }

    ///every field is sent, so clearing the image field removes the image
    pub fn into_changes(self) -> StudentChanges {
        StudentChanges {
            name: Some(self.name),
            email: Some(self.email),
            course: Some(self.course),
            profile_image: Some(self.profile_image.trim().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COURSES: [&str; 2] = ["HTML Basics", "CSS Mastery"];

    fn form(name: &str, email: &str, course: &str) -> StudentForm {
        StudentForm {
            name: name.into(),
            email: email.into(),
            course: course.into(),
            profile_image: String::new(),
        }
    }

    #[test]
    fn good_form_passes() {
        let errors = form("Dana Lee", "dana@x.com", "CSS Mastery").validate(COURSES);
        assert!(errors.is_empty());
        assert_eq!(errors.messages().count(), 0);
    }

    #[test]
    fn name_is_trimmed_before_counting() {
        let errors = form("  D ", "dana@x.com", "CSS Mastery").validate(COURSES);
        assert_eq!(errors.name, Some(NAME_TOO_SHORT));
        assert!(errors.email.is_none());
    }

    #[test]
    fn email_needs_local_domain_and_tld() {
        for bad in ["", "dana", "dana@x", "da na@x.com", "@x.com", "dana@@x.com"] {
            let errors = form("Dana", bad, "CSS Mastery").validate(COURSES);
            assert_eq!(errors.email, Some(BAD_EMAIL), "{bad:?} should be rejected");
        }
        for good in ["dana@x.com", "d.lee+tag@mail.example.org"] {
            assert!(form("Dana", good, "CSS Mastery").validate(COURSES).is_empty());
        }
    }

    #[test]
    fn course_must_be_chosen_and_exist() {
        assert_eq!(
            form("Dana", "dana@x.com", "").validate(COURSES).course,
            Some(NO_COURSE)
        );
        assert_eq!(
            form("Dana", "dana@x.com", "Basket Weaving")
                .validate(COURSES)
                .course,
            Some(NO_COURSE)
        );
    }

    #[test]
    fn every_problem_is_reported() {
        let errors = form("D", "nope", "").validate(COURSES);
        assert_eq!(
            errors.messages().collect::<Vec<_>>(),
            vec![NAME_TOO_SHORT, BAD_EMAIL, NO_COURSE]
        );
    }

    #[test]
    fn blank_image_becomes_none() {
        let new_student = form("Dana Lee", "dana@x.com", "CSS Mastery").into_new_student();
        assert_eq!(new_student.profile_image, None);

        let with_image = StudentForm {
            profile_image: "https://example.com/d.png".into(),
            ..form("Dana Lee", "dana@x.com", "CSS Mastery")
        }
        .into_new_student();
        assert_eq!(
            with_image.profile_image.as_deref(),
            Some("https://example.com/d.png")
        );
    }

    #[test]
    fn edits_carry_a_cleared_image() {
        let changes = form("Dana Lee", "dana@x.com", "CSS Mastery").into_changes();
        assert_eq!(changes.profile_image.as_deref(), Some(""));
        assert_eq!(changes.name.as_deref(), Some("Dana Lee"));
    }
}
