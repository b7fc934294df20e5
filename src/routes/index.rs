use crate::{
    maud_conveniences::{Tab, stat_card},
    routes::courses::course_options,
    state::DeskState,
};
use axum::extract::State;
use maud::{Markup, html};

pub async fn get_index_route(State(state): State<DeskState>) -> Markup {
    let view = state.snapshot();
    let stats = internal_get_stats(State(state.clone())).await;

    state.render(Tab::Students, html! {
        header class="sticky top-0 bg-gray-950 shadow flex items-center justify-between px-8 py-4 border-b border-gray-800" {
            h1 class="text-2xl font-extrabold text-gray-100 tracking-tight" {"Students"}
            button hx-get="/internal/students/new_form" hx-target="#in_focus" class="bg-purple-600 hover:bg-purple-800 font-semibold px-5 py-2 rounded-xl shadow-lg" {
                "Add Student"
            }
        }

        section id="stats" hx-get="/internal/stats" hx-trigger="sse:students_changed, sse:courses_changed" class="px-8 py-6 flex flex-wrap gap-6" {
            (stats)
        }

        div id="in_focus" class="px-8" {}

        main class="flex-1 px-8 pb-10" {
            form id="student_filter" hx-get="/internal/students" hx-target="#student_list" hx-trigger="input changed delay:300ms from:#search, change from:#course_filter" class="flex flex-col md:flex-row gap-2 mb-6" {
                input id="search" name="search" type="text" placeholder="Search students..." class="px-3 py-2 border border-gray-700 rounded-lg bg-gray-800 text-gray-200 w-full md:w-56" {}
                select id="course_filter" name="course" hx-get="/internal/courses/options" hx-trigger="sse:courses_changed" hx-target="this" class="border border-gray-700 rounded-lg px-3 py-2 bg-gray-800 text-gray-200" {
                    (course_options(&view.courses, ""))
                }
            }
            div id="student_list" hx-get="/internal/students" hx-include="#student_filter" hx-trigger="load, sse:students_changed" {}
        }
    })
}

pub async fn internal_get_stats(State(state): State<DeskState>) -> Markup {
    let view = state.snapshot();

    html! {
        (stat_card("Students", view.students.len()))
        (stat_card("Courses", view.courses.len()))
    }
}
