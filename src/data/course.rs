use maud::{Markup, Render, html};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: u32,
    pub name: String,
    pub description: Option<String>,
}

impl Course {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Render for Course {
    fn render(&self) -> Markup {
        html! {
            div class="bg-gray-800 rounded-2xl shadow-xl border border-gray-700 p-6 flex flex-col items-center text-center" {
                h3 class="text-xl font-bold text-gray-100 mb-2" {(self.name)}
                p class="text-gray-400 text-sm mb-2" {
                    "Course ID: "
                    span class="font-mono text-purple-300" {(self.id)}
                }
                @if let Some(description) = &self.description {
                    p class="text-gray-400 text-sm mt-2" {(description)}
                }
            }
        }
    }
}
