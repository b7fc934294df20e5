//! The in-memory record store standing in for a remote backend.
//!
//! Every call sleeps for a while before it touches the data, and listing
//! students can be made to fail through a [`FaultInjector`] so the error paths
//! of everything above this get exercised.

use crate::{
    config::StoreConfig,
    data::{
        course::Course,
        student::{NewStudent, Student, StudentChanges},
    },
    error::{DeskResult, FetchStudentsSnafu, MissingStudentSnafu},
};
use rand::{Rng, rng};
use snafu::OptionExt;
use std::{fmt::Debug, time::Duration};
use tokio::{sync::RwLock, time::sleep};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StoreOperation {
    ListStudents,
    ListCourses,
    CreateStudent,
    UpdateStudent,
    DeleteStudent,
}

impl StoreOperation {
    pub const fn base_delay(self) -> Duration {
        Duration::from_millis(match self {
            Self::ListStudents => 600,
            Self::ListCourses => 400,
            Self::CreateStudent | Self::UpdateStudent => 500,
            Self::DeleteStudent => 300,
        })
    }
}

/// Decides whether a store call should pretend the network fell over.
pub trait FaultInjector: Send + Sync + Debug {
    fn should_fail(&self, operation: StoreOperation) -> bool;
}

impl<T: FaultInjector + ?Sized> FaultInjector for Box<T> {
    fn should_fail(&self, operation: StoreOperation) -> bool {
        (**self).should_fail(operation)
    }
}

#[derive(Debug, Copy, Clone, Default)]
pub struct NeverFail;

impl FaultInjector for NeverFail {
    fn should_fail(&self, _operation: StoreOperation) -> bool {
        false
    }
}

#[derive(Debug, Copy, Clone, Default)]
pub struct AlwaysFail;

impl FaultInjector for AlwaysFail {
    fn should_fail(&self, _operation: StoreOperation) -> bool {
        true
    }
}

///fails each call independently with the given probability
#[derive(Debug, Copy, Clone)]
pub struct FailWithProbability(pub f64);

impl FaultInjector for FailWithProbability {
    fn should_fail(&self, _operation: StoreOperation) -> bool {
        let Self(probability) = *self;
        if probability.is_nan() || probability <= 0.0 {
            return false;
        }
        if probability >= 1.0 {
            return true;
        }
        rng().random_bool(probability)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Latency {
    enabled: bool,
    jitter: Duration,
}

impl Latency {
    pub const fn simulated(jitter: Duration) -> Self {
        Self {
            enabled: true,
            jitter,
        }
    }

    pub const fn none() -> Self {
        Self {
            enabled: false,
            jitter: Duration::ZERO,
        }
    }

    pub fn delay_for(&self, operation: StoreOperation) -> Duration {
        if !self.enabled {
            return Duration::ZERO;
        }

        let jitter_ms = u64::try_from(self.jitter.as_millis()).unwrap_or(u64::MAX);
        let extra = if jitter_ms == 0 {
            0
        } else {
            rng().random_range(0..=jitter_ms)
        };
        operation.base_delay() + Duration::from_millis(extra)
    }

    async fn wait(&self, operation: StoreOperation) {
        let delay = self.delay_for(operation);
        if !delay.is_zero() {
            sleep(delay).await;
        }
    }
}

#[derive(Debug)]
pub struct MockStore {
    students: RwLock<Vec<Student>>,
    courses: Vec<Course>,
    latency: Latency,
    faults: Box<dyn FaultInjector>,
}

impl MockStore {
    pub fn new(students: Vec<Student>, courses: Vec<Course>) -> Self {
        Self {
            students: RwLock::new(students),
            courses,
            latency: Latency::simulated(Duration::ZERO),
            faults: Box::new(NeverFail),
        }
    }

    pub fn seeded() -> Self {
        Self::new(demo_students(), demo_courses())
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        let store = if config.seed_demo_data {
            Self::seeded()
        } else {
            Self::new(Vec::new(), demo_courses())
        };

        store
            .with_latency(config.latency())
            .with_fault_injector(config.fault_injector())
    }

    #[must_use]
    pub fn with_latency(mut self, latency: Latency) -> Self {
        self.latency = latency;
        self
    }

    #[must_use]
    pub fn with_fault_injector(mut self, faults: impl FaultInjector + 'static) -> Self {
        self.faults = Box::new(faults);
        self
    }

    pub async fn list_students(&self) -> DeskResult<Vec<Student>> {
        self.latency.wait(StoreOperation::ListStudents).await;

        snafu::ensure!(
            !self.faults.should_fail(StoreOperation::ListStudents),
            FetchStudentsSnafu
        );

        Ok(self.students.read().await.clone())
    }

    pub async fn list_courses(&self) -> DeskResult<Vec<Course>> {
        self.latency.wait(StoreOperation::ListCourses).await;
        Ok(self.courses.clone())
    }

    pub async fn create_student(&self, new_student: NewStudent) -> DeskResult<Student> {
        self.latency.wait(StoreOperation::CreateStudent).await;

        //id is picked under the same lock as the push so concurrent creates can't collide
        let mut students = self.students.write().await;
        let id = students.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        let student = Student::from_new(id, new_student);
        students.push(student.clone());

        debug!(id, "Created student");
        Ok(student)
    }

    pub async fn update_student(&self, id: u32, changes: StudentChanges) -> DeskResult<Student> {
        self.latency.wait(StoreOperation::UpdateStudent).await;

        let mut students = self.students.write().await;
        let student = students
            .iter_mut()
            .find(|s| s.id == id)
            .context(MissingStudentSnafu { id })?;
        student.apply(changes);

        debug!(id, "Updated student");
        Ok(student.clone())
    }

    pub async fn delete_student(&self, id: u32) -> DeskResult<Student> {
        self.latency.wait(StoreOperation::DeleteStudent).await;

        let mut students = self.students.write().await;
        let index = students
            .iter()
            .position(|s| s.id == id)
            .context(MissingStudentSnafu { id })?;

        debug!(id, "Deleted student");
        Ok(students.remove(index))
    }
}

fn demo_students() -> Vec<Student> {
    let student = |id, name: &str, email: &str, course: &str, photo: &str| Student {
        id,
        name: name.to_string(),
        email: email.to_string(),
        course: course.to_string(),
        profile_image: Some(format!(
            "https://images.unsplash.com/photo-{photo}?w=150&h=150&fit=crop&crop=face"
        )),
    };

    vec![
        student(
            1,
            "Alice Johnson",
            "alice@example.com",
            "React In Depth",
            "1494790108755-2616b612b765",
        ),
        student(
            2,
            "Bob Smith",
            "bob@example.com",
            "JavaScript Pro",
            "1507003211169-0a1dd7228f2d",
        ),
        student(
            3,
            "Carol Davis",
            "carol@example.com",
            "CSS Mastery",
            "1438761681033-6461ffad8d80",
        ),
    ]
}

fn demo_courses() -> Vec<Course> {
    vec![
        Course::new(1, "HTML Basics").with_description("Structure a page with semantic markup"),
        Course::new(2, "CSS Mastery").with_description("Layout, selectors and responsive design"),
        Course::new(3, "JavaScript Pro").with_description("The language, async code and the DOM"),
        Course::new(4, "React In Depth").with_description("Components, hooks and state"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeskError;
    use std::sync::Arc;
    use tokio::time::Instant;

    fn quiet_store() -> MockStore {
        MockStore::seeded().with_latency(Latency::none())
    }

    fn dana() -> NewStudent {
        NewStudent {
            name: "Dana Lee".into(),
            email: "dana@x.com".into(),
            course: "CSS Mastery".into(),
            profile_image: None,
        }
    }

    async fn ids(store: &MockStore) -> Vec<u32> {
        store
            .list_students()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect()
    }

    #[tokio::test]
    async fn create_assigns_next_id_and_stores_the_record() {
        let store = quiet_store();

        let created = store.create_student(dana()).await.unwrap();
        assert_eq!(created.id, 4);
        assert_eq!(created.name, "Dana Lee");
        assert_eq!(created.email, "dana@x.com");
        assert_eq!(created.course, "CSS Mastery");
        assert!(created.profile_image.is_some());

        assert_eq!(ids(&store).await, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn create_id_beats_every_existing_id() {
        let store = quiet_store();
        store.delete_student(2).await.unwrap();
        let before = ids(&store).await;

        let created = store.create_student(dana()).await.unwrap();
        assert!(before.iter().all(|&id| created.id > id));
    }

    #[tokio::test]
    async fn create_in_empty_store_starts_at_one() {
        let store = MockStore::new(Vec::new(), demo_courses()).with_latency(Latency::none());
        assert_eq!(store.create_student(dana()).await.unwrap().id, 1);
    }

    #[tokio::test]
    async fn create_keeps_a_supplied_image() {
        let store = quiet_store();
        let created = store
            .create_student(NewStudent {
                profile_image: Some("https://example.com/dana.png".into()),
                ..dana()
            })
            .await
            .unwrap();
        assert_eq!(
            created.profile_image.as_deref(),
            Some("https://example.com/dana.png")
        );
    }

    #[tokio::test]
    async fn concurrent_creates_never_share_an_id() {
        let store = Arc::new(quiet_store());
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.create_student(dana()).await.unwrap().id })
            })
            .collect();

        let mut created = Vec::new();
        for handle in handles {
            created.push(handle.await.unwrap());
        }
        created.sort_unstable();
        assert_eq!(created, (4..20).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn update_merges_only_supplied_fields() {
        let store = quiet_store();
        let before = store.list_students().await.unwrap()[1].clone();

        let changes = StudentChanges {
            course: Some("HTML Basics".into()),
            ..StudentChanges::default()
        };
        let updated = store.update_student(2, changes.clone()).await.unwrap();

        assert_eq!(
            updated,
            Student {
                course: "HTML Basics".into(),
                ..before
            }
        );
        assert_eq!(store.list_students().await.unwrap()[1], updated);

        let again = store.update_student(2, changes).await.unwrap();
        assert_eq!(again, updated);
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_not_found_and_changes_nothing() {
        let store = quiet_store();
        let before = store.list_students().await.unwrap();

        let err = store
            .update_student(
                99,
                StudentChanges {
                    name: Some("Nobody".into()),
                    ..StudentChanges::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DeskError::MissingStudent { id: 99 }));
        assert_eq!(store.list_students().await.unwrap(), before);
    }

    #[tokio::test]
    async fn delete_of_unknown_id_is_not_found_and_changes_nothing() {
        let store = quiet_store();

        let err = store.delete_student(99).await.unwrap_err();
        assert!(matches!(err, DeskError::MissingStudent { id: 99 }));
        assert_eq!(ids(&store).await, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn deleting_twice_fails_the_second_time() {
        let store = quiet_store();

        let removed = store.delete_student(2).await.unwrap();
        assert_eq!(removed.name, "Bob Smith");
        assert_eq!(ids(&store).await, vec![1, 3]);

        let err = store.delete_student(2).await.unwrap_err();
        assert!(matches!(err, DeskError::MissingStudent { id: 2 }));
    }

    #[tokio::test]
    async fn listing_hands_out_a_snapshot() {
        let store = quiet_store();

        let mut first = store.list_students().await.unwrap();
        first.clear();
        first.push(Student::from_new(42, dana()));

        assert_eq!(ids(&store).await, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn fault_injection_fails_student_listing_only() {
        let store = quiet_store().with_fault_injector(AlwaysFail);

        let err = store.list_students().await.unwrap_err();
        assert!(matches!(err, DeskError::FetchStudents));
        assert_eq!(err.to_string(), "Failed to fetch students");

        assert_eq!(store.list_courses().await.unwrap().len(), 4);
        assert!(store.create_student(dana()).await.is_ok());
    }

    #[test]
    fn probability_edges_are_deterministic() {
        assert!(!FailWithProbability(0.0).should_fail(StoreOperation::ListStudents));
        assert!(!FailWithProbability(f64::NAN).should_fail(StoreOperation::ListStudents));
        assert!(FailWithProbability(1.0).should_fail(StoreOperation::ListStudents));
    }

    fn assert_close(elapsed: Duration, expected_ms: u64) {
        let expected = Duration::from_millis(expected_ms);
        assert!(elapsed >= expected, "{elapsed:?} < {expected:?}");
        assert!(elapsed < expected + Duration::from_millis(5), "{elapsed:?} way past {expected:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn simulated_latency_follows_the_operation() {
        let store = MockStore::seeded();

        let start = Instant::now();
        store.list_students().await.unwrap();
        assert_close(start.elapsed(), 600);

        let start = Instant::now();
        store.list_courses().await.unwrap();
        assert_close(start.elapsed(), 400);

        let start = Instant::now();
        store.delete_student(1).await.unwrap();
        assert_close(start.elapsed(), 300);
    }

    #[test]
    fn jitter_stays_within_bounds() {
        let latency = Latency::simulated(Duration::from_millis(50));
        for _ in 0..100 {
            let delay = latency.delay_for(StoreOperation::CreateStudent);
            assert!(delay >= Duration::from_millis(500));
            assert!(delay <= Duration::from_millis(550));
        }
        assert_eq!(
            Latency::none().delay_for(StoreOperation::CreateStudent),
            Duration::ZERO
        );
    }
}
