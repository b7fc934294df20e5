//! Client-side view of the records, kept in step with the store.
//!
//! [`Dashboard`] owns the local copies of the students and courses, the
//! per-operation loading flags and the last error. Loads replace the local
//! collection wholesale, mutations patch it with whatever the store handed
//! back, and failures leave the previous data where it was.

use crate::{
    api::{ApiError, ApiResult, DeskApi},
    data::{
        course::Course,
        student::{NewStudent, Student, StudentChanges},
    },
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast::{Receiver, Sender, channel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardEvent {
    StudentsChanged,
    CoursesChanged,
    Notification(Notification),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadingFlags {
    pub students: bool,
    pub courses: bool,
    pub action: bool,
}

#[derive(Debug, Clone, Default)]
pub struct DashboardView {
    pub students: Vec<Student>,
    pub courses: Vec<Course>,
    pub loading: LoadingFlags,
    pub error: Option<String>,
}

impl DashboardView {
    pub fn course_names(&self) -> impl Iterator<Item = &str> {
        self.courses.iter().map(|c| c.name.as_str())
    }
}

#[derive(Debug, Clone, Copy)]
enum LoadingKind {
    Students,
    Courses,
    Action,
}

///how many calls of each kind are outstanding
#[derive(Debug, Default)]
struct InFlight {
    students: usize,
    courses: usize,
    action: usize,
}

impl InFlight {
    fn counter(&mut self, kind: LoadingKind) -> &mut usize {
        match kind {
            LoadingKind::Students => &mut self.students,
            LoadingKind::Courses => &mut self.courses,
            LoadingKind::Action => &mut self.action,
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    students: Vec<Student>,
    courses: Vec<Course>,
    in_flight: InFlight,
    error: Option<String>,
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Keeps a loading flag raised until dropped, whether the call finished,
/// failed, or its future was thrown away half way through.
struct LoadingGuard {
    inner: Arc<Mutex<Inner>>,
    kind: LoadingKind,
}

impl LoadingGuard {
    fn raise(inner: &Arc<Mutex<Inner>>, kind: LoadingKind) -> Self {
        *lock(inner).in_flight.counter(kind) += 1;
        Self {
            inner: Arc::clone(inner),
            kind,
        }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        let mut inner = lock(&self.inner);
        let counter = inner.in_flight.counter(self.kind);
        *counter = counter.saturating_sub(1);
    }
}

#[derive(Clone, Debug)]
pub struct Dashboard {
    api: DeskApi,
    inner: Arc<Mutex<Inner>>,
    events: Sender<DashboardEvent>,
}

impl Dashboard {
    pub fn new(api: DeskApi) -> Self {
        let (tx, _rx) = channel(16);

        Self {
            api,
            inner: Arc::new(Mutex::new(Inner::default())),
            events: tx,
        }
    }

    pub fn snapshot(&self) -> DashboardView {
        let inner = lock(&self.inner);

        DashboardView {
            students: inner.students.clone(),
            courses: inner.courses.clone(),
            loading: LoadingFlags {
                students: inner.in_flight.students > 0,
                courses: inner.in_flight.courses > 0,
                action: inner.in_flight.action > 0,
            },
            error: inner.error.clone(),
        }
    }

    pub fn find_student(&self, id: u32) -> Option<Student> {
        lock(&self.inner)
            .students
            .iter()
            .find(|s| s.id == id)
            .cloned()
    }

    pub fn subscribe(&self) -> Receiver<DashboardEvent> {
        self.events.subscribe()
    }

    fn publish(&self, event: DashboardEvent) {
        let _ = self.events.send(event); //nobody listening is fine
    }

    fn begin(&self, kind: LoadingKind) -> LoadingGuard {
        LoadingGuard::raise(&self.inner, kind)
    }

    fn clear_error(&self) {
        lock(&self.inner).error = None;
    }

    fn record_failure(&self, what: &'static str, e: ApiError) -> ApiError {
        lock(&self.inner).error = Some(format!("{what}: {e}"));
        self.publish(DashboardEvent::Notification(Notification::error(what)));
        e
    }

    ///first load - both collections at once
    pub async fn startup(&self) {
        tokio::join!(self.load_students(), self.load_courses());
        info!("Dashboard loaded");
    }

    pub async fn load_students(&self) {
        let _loading = self.begin(LoadingKind::Students);
        self.clear_error();

        match self.api.get_students().await {
            Ok(students) => {
                lock(&self.inner).students = students;
                self.publish(DashboardEvent::StudentsChanged);
            }
            Err(e) => {
                error!(?e, "Failed to load students");
                lock(&self.inner).error = Some(format!("Failed to load students: {e}"));
                self.publish(DashboardEvent::StudentsChanged);
            }
        }
    }

    ///course failures only get logged, the dashboard works fine without them
    pub async fn load_courses(&self) {
        let _loading = self.begin(LoadingKind::Courses);

        match self.api.get_courses().await {
            Ok(courses) => {
                lock(&self.inner).courses = courses;
                self.publish(DashboardEvent::CoursesChanged);
            }
            Err(e) => {
                error!(?e, "Failed to load courses");
            }
        }
    }

    pub async fn add_student(&self, new_student: NewStudent) -> ApiResult<Student> {
        let _loading = self.begin(LoadingKind::Action);
        self.clear_error();

        match self.api.create_student(new_student).await {
            Ok(student) => {
                lock(&self.inner).students.push(student.clone());
                self.publish(DashboardEvent::Notification(Notification::success(
                    "Student added successfully!",
                )));
                self.publish(DashboardEvent::StudentsChanged);
                Ok(student)
            }
            Err(e) => Err(self.record_failure("Failed to add student", e)),
        }
    }

    pub async fn update_student(&self, id: u32, changes: StudentChanges) -> ApiResult<Student> {
        let _loading = self.begin(LoadingKind::Action);
        self.clear_error();

        match self.api.update_student(id, changes).await {
            Ok(updated) => {
                if let Some(slot) = lock(&self.inner).students.iter_mut().find(|s| s.id == id) {
                    *slot = updated.clone();
                }
                self.publish(DashboardEvent::Notification(Notification::success(
                    "Student updated successfully!",
                )));
                self.publish(DashboardEvent::StudentsChanged);
                Ok(updated)
            }
            Err(e) => Err(self.record_failure("Failed to update student", e)),
        }
    }

    pub async fn delete_student(&self, id: u32) -> ApiResult<()> {
        let _loading = self.begin(LoadingKind::Action);
        self.clear_error();

        match self.api.delete_student(id).await {
            Ok(_) => {
                lock(&self.inner).students.retain(|s| s.id != id);
                self.publish(DashboardEvent::Notification(Notification::success(
                    "Student deleted successfully!",
                )));
                self.publish(DashboardEvent::StudentsChanged);
                Ok(())
            }
            Err(e) => Err(self.record_failure("Failed to delete student", e)),
        }
    }
}
