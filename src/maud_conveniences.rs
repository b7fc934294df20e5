use crate::dashboard::{Notification, NotificationKind};
use maud::{Markup, Render, html};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Tab {
    Students,
    Courses,
}

impl Tab {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Students => "Students",
            Self::Courses => "Courses",
        }
    }

    pub const fn href(self) -> &'static str {
        match self {
            Self::Students => "/",
            Self::Courses => "/courses",
        }
    }
}

pub fn render_sidebar(active: Tab) -> Markup {
    html! {
        aside class="h-screen w-64 bg-gray-900 border-r border-gray-800 shadow-xl flex flex-col fixed left-0 top-0" {
            div class="flex items-center gap-3 px-6 py-6" {
                span class="text-xl font-extrabold text-gray-100 tracking-tight" {"Rollbook"}
            }
            nav class="mt-8 space-y-2 px-4" {
                @for tab in [Tab::Students, Tab::Courses] {
                    @let class = if tab == active {
                        "text-purple-300 bg-gray-800"
                    } else {
                        "text-gray-400 hover:bg-gray-800 hover:text-purple-300"
                    };
                    a href=(tab.href()) class={"w-full flex items-center gap-3 px-4 py-2 rounded-lg font-semibold " (class)} {
                        (tab.name())
                    }
                }
            }
        }
    }
}

pub fn render_table<const N: usize>(titles: [&'static str; N], items: Vec<[Markup; N]>) -> Markup {
    html! {
        div class="overflow-x-auto" {
            table class="min-w-full bg-gray-800 rounded shadow-md" {
                thead class="bg-gray-700" {
                    tr {
                        @for title in titles {
                            th class="py-2 px-4 text-left text-xs font-semibold text-gray-300 uppercase" {(title)}
                        }
                    }
                }
                tbody {
                    @for row in items {
                        tr {
                            @for col in row {
                                td class="py-2 px-4 border-b border-gray-600 text-gray-200" {(col)}
                            }
                        }
                    }
                }
            }
        }
    }
}

pub fn title(s: impl Render) -> Markup {
    html! {
        h1 class="text-2xl font-semibold mb-4" {(s)}
    }
}

pub fn form_element(id: &'static str, label: &'static str, error: Option<&str>, input: Markup) -> Markup {
    html! {
        div class="mb-4" {
            label for=(id) class="block text-sm font-bold mb-2 text-gray-300" {(label)}
            (input)
            @if let Some(error) = error {
                p class="text-sm text-red-400 mt-1" {(error)}
            }
        }
    }
}

pub fn simple_form_element(
    id: &'static str,
    label: &'static str,
    input_type: Option<&'static str>,
    value: &str,
    error: Option<&str>,
) -> Markup {
    let border = if error.is_some() {
        "border-red-500"
    } else {
        "border-gray-600"
    };

    form_element(
        id,
        label,
        error,
        html! {
            input type=(input_type.unwrap_or("text")) id=(id) name=(id) value=(value)
                class={"shadow appearance-none border rounded w-full py-2 px-3 leading-tight focus:outline-none focus:shadow-outline bg-gray-700 " (border)} {}
        },
    )
}

pub fn form_submit_button(text: Option<&str>) -> Markup {
    html! {
        button type="submit" class="bg-purple-600 hover:bg-purple-800 font-bold py-2 px-4 rounded focus:outline-none focus:shadow-outline" {
            (text.unwrap_or("Submit"))
        }
    }
}

pub fn spinner(caption: &str) -> Markup {
    html! {
        div class="flex flex-col items-center justify-center py-12" {
            div class="animate-spin rounded-full h-8 w-8 border-b-2 border-purple-400 mb-2" {}
            p class="text-gray-400" {(caption)}
        }
    }
}

pub fn stat_card(label: &str, value: usize) -> Markup {
    html! {
        div class="bg-gray-800 rounded-xl shadow-md px-6 py-4 min-w-40" {
            div class="text-xs text-gray-400 font-semibold uppercase tracking-wide" {(label)}
            div class="text-2xl font-bold text-gray-100" {(value)}
        }
    }
}

///the persistent banner, with a retry that reloads the student list
pub fn error_banner(error: &str) -> Markup {
    html! {
        div role="alert" class="flex items-center gap-2 px-4 py-3 rounded mb-6 bg-red-600 text-white shadow-lg" {
            span {(error)}
            button class="ml-auto underline hover:text-gray-200" hx-post="/internal/students/refresh" hx-target="#student_list" hx-include="#student_filter" {
                "Retry"
            }
        }
    }
}

impl Render for Notification {
    fn render(&self) -> Markup {
        let colour = match self.kind {
            NotificationKind::Success => "bg-green-600",
            NotificationKind::Error => "bg-red-600",
        };

        //gone again after 3 seconds
        html! {
            div class={"flex items-center gap-2 px-4 py-3 rounded mb-6 text-white shadow-lg " (colour)}
                "hx-on::load"="setTimeout(() => this.remove(), 3000)" {
                span {(self.message)}
            }
        }
    }
}
