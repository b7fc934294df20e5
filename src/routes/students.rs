use crate::{
    data::{
        IdForm,
        course::Course,
        student::StudentFilter,
    },
    error::{DeskResult, MissingStudentSnafu},
    maud_conveniences::{
        error_banner, form_element, form_submit_button, render_table, simple_form_element, spinner,
        title,
    },
    state::DeskState,
    validation::{FieldErrors, StudentForm},
};
use axum::{
    Form,
    extract::{Query, State},
};
use maud::{Markup, Render, html};
use snafu::OptionExt;

pub async fn internal_get_students(
    State(state): State<DeskState>,
    Query(filter): Query<StudentFilter>,
) -> Markup {
    let view = state.snapshot();
    let busy = view.loading.action;

    //keep asking until the first load lands, in case its sse event came before we subscribed
    let list = if view.loading.students && view.students.is_empty() {
        html! {
            div hx-get="/internal/students" hx-include="#student_filter" hx-trigger="every 1s" hx-target="#student_list" {
                (spinner("Loading students..."))
            }
        }
    } else {
        let filtered = filter.apply(&view.students);

        html! {
            h2 class="flex items-center gap-2 text-xl font-bold text-gray-100 mb-4" {
                "Students "
                span class="text-gray-400 font-normal" {"(" (filtered.len()) ")"}
            }

            @if filtered.is_empty() {
                div class="flex flex-col items-center justify-center py-12 text-gray-500" {
                    h3 class="text-lg font-semibold mt-2 text-gray-300" {"No students found"}
                    p class="text-sm mt-1 text-center text-gray-400" {
                        @if filter.is_active() {
                            "Try adjusting your search or filter criteria"
                        } @else {
                            "Start by adding your first student"
                        }
                    }
                }
            } @else {
                (render_table(
                    ["Avatar", "Name", "Email", "Course", "Actions"],
                    filtered
                        .into_iter()
                        .map(|student| {
                            [
                                student.render(),
                                html! {(student.name)},
                                html! {(student.email)},
                                html! {(student.course)},
                                html! {
                                    div class="flex gap-2 justify-center" {
                                        button title="Edit student" disabled[busy] hx-get="/internal/students/edit_form" hx-vals={"{\"id\": " (student.id) "}"} hx-target="#in_focus" class="bg-gray-700 hover:bg-gray-600 py-1 px-3 rounded" {
                                            "Edit"
                                        }
                                        button title="Delete student" disabled[busy] hx-delete="/students" hx-vals={"{\"id\": " (student.id) "}"} hx-swap="none" hx-confirm={"Are you sure you want to delete " (student.name) "?"} class="bg-red-600 hover:bg-red-800 py-1 px-3 rounded" {
                                            "Delete"
                                        }
                                    }
                                },
                            ]
                        })
                        .collect(),
                ))
            }
        }
    };

    html! {
        @if let Some(error) = &view.error {
            (error_banner(error))
        }
        (list)
    }
}

pub async fn internal_post_refresh_students(
    State(state): State<DeskState>,
    Form(filter): Form<StudentFilter>,
) -> Markup {
    state.load_students().await;
    internal_get_students(State(state), Query(filter)).await
}

/// `editing` is the id of the student being edited, `None` for a new one.
fn render_student_form(
    editing: Option<u32>,
    form: &StudentForm,
    errors: &FieldErrors,
    courses: &[Course],
    busy: bool,
) -> Markup {
    let heading = if editing.is_some() {
        "Edit Student"
    } else {
        "Add New Student"
    };
    let course_border = if errors.course.is_some() {
        "border-red-500"
    } else {
        "border-gray-600"
    };

    let fields = html! {
        (title(heading))

        (simple_form_element("name", "Name *", None, &form.name, errors.name))
        (simple_form_element("email", "Email *", Some("email"), &form.email, errors.email))
        (form_element("course", "Course *", errors.course, html! {
            select id="course" name="course" class={"shadow appearance-none border rounded w-full py-2 px-3 leading-tight focus:outline-none focus:shadow-outline bg-gray-700 " (course_border)} {
                option value="" selected[form.course.is_empty()] {"Select a course"}
                @for course in courses {
                    option value=(course.name) selected[course.name == form.course] {(course.name)}
                }
            }
        }))
        (simple_form_element("profile_image", "Profile Image URL (optional)", Some("url"), &form.profile_image, None))

        div class="flex items-center justify-between" {
            button type="button" "hx-on:click"="document.getElementById('in_focus').innerHTML = ''" class="bg-gray-700 hover:bg-gray-600 font-bold py-2 px-4 rounded" {
                "Cancel"
            }
            @if busy {
                (spinner("Saving..."))
            } @else {
                (form_submit_button(Some(if editing.is_some() { "Update Student" } else { "Add Student" })))
            }
        }
    };

    html! {
        div class="bg-gray-900 border border-gray-700 rounded-xl shadow-xl p-6 w-full max-w-xl mx-auto mb-6" {
            @if let Some(id) = editing {
                form hx-post={"/internal/students/edit_form?id=" (id)} hx-target="#in_focus" hx-disabled-elt="find button[type='submit']" class="space-y-6" {
                    (fields)
                }
            } @else {
                form hx-put="/internal/students/new_form" hx-target="#in_focus" hx-disabled-elt="find button[type='submit']" class="space-y-6" {
                    (fields)
                }
            }
        }
    }
}

pub async fn internal_get_new_student_form(State(state): State<DeskState>) -> Markup {
    let view = state.snapshot();
    render_student_form(
        None,
        &StudentForm::default(),
        &FieldErrors::default(),
        &view.courses,
        view.loading.action,
    )
}

pub async fn internal_put_new_student(
    State(state): State<DeskState>,
    Form(form): Form<StudentForm>,
) -> Markup {
    let view = state.snapshot();

    let errors = form.validate(view.course_names());
    if !errors.is_empty() {
        debug!(errors = ?errors.messages().collect::<Vec<_>>(), "Rejected new student");
        return render_student_form(None, &form, &errors, &view.courses, false);
    }

    match state.add_student(form.clone().into_new_student()).await {
        Ok(student) => {
            info!(id = student.id, "Added student");
            html! {}
        }
        //the dashboard has already sent out the error notification
        Err(_) => render_student_form(None, &form, &FieldErrors::default(), &view.courses, false),
    }
}

pub async fn internal_get_edit_student_form(
    State(state): State<DeskState>,
    Query(IdForm { id }): Query<IdForm>,
) -> DeskResult<Markup> {
    let student = state.find_student(id).context(MissingStudentSnafu { id })?;
    let view = state.snapshot();

    Ok(render_student_form(
        Some(id),
        &StudentForm::from_student(&student),
        &FieldErrors::default(),
        &view.courses,
        view.loading.action,
    ))
}

pub async fn internal_post_edit_student(
    State(state): State<DeskState>,
    Query(IdForm { id }): Query<IdForm>,
    Form(form): Form<StudentForm>,
) -> Markup {
    let view = state.snapshot();

    let errors = form.validate(view.course_names());
    if !errors.is_empty() {
        debug!(id, errors = ?errors.messages().collect::<Vec<_>>(), "Rejected student changes");
        return render_student_form(Some(id), &form, &errors, &view.courses, false);
    }

    let changes = form.clone().into_changes();
    match state.update_student(id, changes).await {
        Ok(_) => {
            info!(id, "Updated student");
            html! {}
        }
        Err(_) => render_student_form(Some(id), &form, &FieldErrors::default(), &view.courses, false),
    }
}

pub async fn delete_student(
    State(state): State<DeskState>,
    Query(IdForm { id }): Query<IdForm>,
) -> Markup {
    if state.delete_student(id).await.is_ok() {
        info!(id, "Deleted student");
    }
    html! {}
}
