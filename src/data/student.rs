use maud::{Markup, Render, html};
use rand::{Rng, rng};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub course: String,
    pub profile_image: Option<String>,
}

/// Fields for a student that hasn't been given an id yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStudent {
    pub name: String,
    pub email: String,
    pub course: String,
    pub profile_image: Option<String>,
}

/// A partial update - `None` means "leave this field alone", a blank
/// `profile_image` means "drop the image".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub course: Option<String>,
    pub profile_image: Option<String>,
}

impl Student {
    pub fn from_new(id: u32, new: NewStudent) -> Self {
        let NewStudent {
            name,
            email,
            course,
            profile_image,
        } = new;

        Self {
            id,
            name,
            email,
            course,
            profile_image: profile_image
                .filter(|url| !url.trim().is_empty())
                .or_else(|| Some(placeholder_profile_image())),
        }
    }

    pub fn apply(&mut self, changes: StudentChanges) {
        let StudentChanges {
            name,
            email,
            course,
            profile_image,
        } = changes;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(email) = email {
            self.email = email;
        }
        if let Some(course) = course {
            self.course = course;
        }
        //a blank image clears whatever was there before
        if let Some(profile_image) = profile_image {
            self.profile_image = Some(profile_image).filter(|url| !url.trim().is_empty());
        }
    }

    ///the configured image if there is one, otherwise the generated avatar
    pub fn image_url(&self) -> String {
        self.profile_image
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .map_or_else(|| avatar_url(&self.name), ToString::to_string)
    }
}

impl Render for Student {
    fn render(&self) -> Markup {
        let fallback = avatar_url(&self.name);

        html! {
            img src=(self.image_url()) alt=(self.name) class="w-10 h-10 rounded-full object-cover border-2 border-purple-400"
                data-fallback=(fallback) onerror="this.onerror=null;this.src=this.dataset.fallback" {}
        }
    }
}

pub fn avatar_url(name: &str) -> String {
    format!(
        "https://ui-avatars.com/api/?name={}&background=8b5cf6&color=ffffff&size=150",
        encode_uri_component(name)
    )
}

pub fn placeholder_profile_image() -> String {
    let photo_id = 1_500_000_000_000_u64 + rng().random_range(0..100_000_000_u64);
    format!("https://images.unsplash.com/photo-{photo_id}?w=150&h=150&fit=crop&crop=face")
}

///same escaping rules as JS's `encodeURIComponent`
fn encode_uri_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(char::from(byte)),
            _ => {
                let _ = write!(out, "%{byte:02X}"); //writing to a string can't fail
            }
        }
    }
    out
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentFilter {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub course: String,
}

impl StudentFilter {
    pub fn is_active(&self) -> bool {
        !self.search.trim().is_empty() || !self.course.is_empty()
    }

    pub fn matches(&self, student: &Student) -> bool {
        let term = self.search.trim().to_lowercase();
        let matches_search = term.is_empty()
            || student.name.to_lowercase().contains(&term)
            || student.email.to_lowercase().contains(&term);
        let matches_course = self.course.is_empty() || student.course == self.course;

        matches_search && matches_course
    }

    pub fn apply<'a>(&self, students: &'a [Student]) -> Vec<&'a Student> {
        students.iter().filter(|s| self.matches(s)).collect()
    }
}
