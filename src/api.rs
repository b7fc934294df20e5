use crate::{
    data::{
        course::Course,
        student::{NewStudent, Student, StudentChanges},
    },
    error::DeskError,
    store::MockStore,
};
use snafu::Snafu;
use std::sync::Arc;

/// The one error shape callers of [`DeskApi`] ever see.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(display("{message}"))]
pub struct ApiError {
    pub message: String,
}

impl From<DeskError> for ApiError {
    fn from(value: DeskError) -> Self {
        ApiSnafu {
            message: value.to_string(),
        }
        .build()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Clone, Debug)]
pub struct DeskApi {
    store: Arc<MockStore>,
}

impl DeskApi {
    pub fn new(store: Arc<MockStore>) -> Self {
        Self { store }
    }

    pub async fn get_students(&self) -> ApiResult<Vec<Student>> {
        normalise("get_students", self.store.list_students().await)
    }

    pub async fn get_courses(&self) -> ApiResult<Vec<Course>> {
        normalise("get_courses", self.store.list_courses().await)
    }

    pub async fn create_student(&self, new_student: NewStudent) -> ApiResult<Student> {
        normalise("create_student", self.store.create_student(new_student).await)
    }

    pub async fn update_student(&self, id: u32, changes: StudentChanges) -> ApiResult<Student> {
        normalise("update_student", self.store.update_student(id, changes).await)
    }

    pub async fn delete_student(&self, id: u32) -> ApiResult<Student> {
        normalise("delete_student", self.store.delete_student(id).await)
    }
}

fn normalise<T>(operation: &'static str, result: Result<T, DeskError>) -> ApiResult<T> {
    result.map_err(|e| {
        warn!(operation, ?e, "Store call failed");
        e.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{AlwaysFail, Latency};

    #[tokio::test]
    async fn store_errors_come_out_as_plain_messages() {
        let api = DeskApi::new(Arc::new(
            MockStore::seeded()
                .with_latency(Latency::none())
                .with_fault_injector(AlwaysFail),
        ));

        assert_eq!(
            api.get_students().await.unwrap_err(),
            ApiError {
                message: "Failed to fetch students".into()
            }
        );
        assert_eq!(
            api.delete_student(99).await.unwrap_err().to_string(),
            "Student not found"
        );
        assert_eq!(
            api.update_student(99, StudentChanges::default())
                .await
                .unwrap_err()
                .message,
            "Student not found"
        );
    }

    #[tokio::test]
    async fn successes_pass_straight_through() {
        let store = Arc::new(MockStore::seeded().with_latency(Latency::none()));
        let api = DeskApi::new(store.clone());

        assert_eq!(api.get_courses().await.unwrap().len(), 4);
        let removed = api.delete_student(1).await.unwrap();
        assert_eq!(removed.id, 1);
        assert_eq!(store.list_students().await.unwrap().len(), 2);
    }
}
