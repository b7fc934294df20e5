use crate::{
    data::{course::Course, student::StudentFilter},
    maud_conveniences::{Tab, spinner},
    state::DeskState,
};
use axum::extract::{Query, State};
use maud::{Markup, html};

pub async fn get_courses_page(State(state): State<DeskState>) -> Markup {
    state.render(Tab::Courses, html! {
        header class="sticky top-0 bg-gray-950 shadow flex items-center justify-between px-8 py-4 border-b border-gray-800" {
            h1 class="text-2xl font-extrabold text-gray-100 tracking-tight" {"Courses"}
        }
        main class="flex-1 px-8 pb-10" {
            div id="course_cards" hx-get="/internal/courses" hx-trigger="load, sse:courses_changed" {}
        }
    })
}

pub async fn internal_get_courses(State(state): State<DeskState>) -> Markup {
    let view = state.snapshot();

    if view.loading.courses && view.courses.is_empty() {
        return html! {
            div hx-get="/internal/courses" hx-trigger="every 1s" hx-target="#course_cards" {
                (spinner("Loading courses..."))
            }
        };
    }

    html! {
        @if view.courses.is_empty() {
            p class="italic text-gray-400 mt-8" {"No courses available"}
        } @else {
            div class="grid grid-cols-1 sm:grid-cols-2 md:grid-cols-3 gap-8 mt-8" {
                @for course in &view.courses {
                    (course)
                }
            }
        }
    }
}

pub async fn internal_get_course_options(
    State(state): State<DeskState>,
    Query(StudentFilter { course, .. }): Query<StudentFilter>,
) -> Markup {
    course_options(&state.snapshot().courses, &course)
}

pub fn course_options(courses: &[Course], selected: &str) -> Markup {
    html! {
        option value="" selected[selected.is_empty()] {"All Courses"}
        @for course in courses {
            option value=(course.name) selected[course.name == selected] {(course.name)}
        }
    }
}
