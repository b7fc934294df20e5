#![warn(clippy::pedantic, clippy::all, clippy::nursery)]
#![allow(clippy::single_match_else)]

use crate::{
    config::RuntimeConfiguration,
    routes::{
        courses::{get_courses_page, internal_get_course_options, internal_get_courses},
        index::{get_index_route, internal_get_stats},
        sse::sse_feed,
        students::{
            delete_student, internal_get_edit_student_form, internal_get_new_student_form,
            internal_get_students, internal_post_edit_student, internal_post_refresh_students,
            internal_put_new_student,
        },
    },
    state::DeskState,
};
use axum::{
    Router,
    routing::{delete, get, post},
};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[macro_use]
extern crate tracing;

mod api;
mod config;
mod dashboard;
mod data;
mod error;
mod maud_conveniences;
mod routes;
mod state;
mod store;
mod validation;

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    warn!("signal received, starting graceful shutdown");
}

#[tokio::main]
async fn main() {
    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .finish(),
    )
    .expect("unable to set tracing subscriber");

    info!("`tracing` online");

    if let Err(e) = dotenvy::dotenv() {
        info!(?e, "No .env file loaded, using the environment as-is");
    }

    let config = RuntimeConfiguration::new().expect("unable to create config");
    info!(store_config = ?config.store_config(), "Loaded config");
    let state = DeskState::new(config);

    //the first load runs in the background, pages show their loading states until it lands
    tokio::spawn({
        let state = state.clone();
        async move { state.startup().await }
    });

    let trace_layer = TraceLayer::new_for_http();

    let app = Router::new()
        .route("/", get(get_index_route))
        .route("/courses", get(get_courses_page))
        .route("/students", delete(delete_student))
        .route("/internal/stats", get(internal_get_stats))
        .route("/internal/students", get(internal_get_students))
        .route(
            "/internal/students/refresh",
            post(internal_post_refresh_students),
        )
        .route(
            "/internal/students/new_form",
            get(internal_get_new_student_form).put(internal_put_new_student),
        )
        .route(
            "/internal/students/edit_form",
            get(internal_get_edit_student_form).post(internal_post_edit_student),
        )
        .route("/internal/courses", get(internal_get_courses))
        .route("/internal/courses/options", get(internal_get_course_options))
        .route("/sse_feed", get(sse_feed))
        .layer(CompressionLayer::new())
        .layer(trace_layer)
        .with_state(state.clone());

    let server_ip = state.config().server_ip().to_string();
    let listener = TcpListener::bind(&server_ip)
        .await
        .expect("unable to listen on server ip");

    info!(?server_ip, "Listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("unable to serve app");
}
