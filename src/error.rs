use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use maud::html;
use snafu::Snafu;

pub type DeskResult<T> = Result<T, DeskError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum DeskError {
    #[snafu(display("Failed to fetch students"))]
    FetchStudents,
    #[snafu(display("Student not found"))]
    MissingStudent { id: u32 },
    #[snafu(display("Unable to retrieve env var `{}`", name))]
    BadEnvVar {
        source: dotenvy::Error,
        name: &'static str,
    },
    #[snafu(display("Unable to parse env var `{}` from {:?}", name, value))]
    ParseConfigValue { name: &'static str, value: String },
}

impl IntoResponse for DeskError {
    #[allow(clippy::match_same_arms)]
    fn into_response(self) -> Response {
        const ISE: StatusCode = StatusCode::INTERNAL_SERVER_ERROR; //internal server error
        const NF: StatusCode = StatusCode::NOT_FOUND; //not found
        const SU: StatusCode = StatusCode::SERVICE_UNAVAILABLE; //flaky upstream

        let basic_error = |desc| {
            html! {
                div class="bg-red-100 border border-red-400 text-red-700 px-4 py-3 rounded relative mb-4" role="alert" {
                    strong class="font-bold" {"Error: "}
                    span {(desc)}
                }
            }
        };

        let status_code = match &self {
            Self::FetchStudents => SU,
            Self::MissingStudent { .. } => NF,
            Self::BadEnvVar { .. } => ISE,
            Self::ParseConfigValue { .. } => ISE,
        };

        error!(?self, "Error!");
        (status_code, Html(basic_error(self.to_string()))).into_response()
    }
}
