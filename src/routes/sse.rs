use crate::{dashboard::DashboardEvent, state::DeskState};
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::Stream;
use maud::Render;
use std::convert::Infallible;
use tokio_stream::{StreamExt, wrappers::BroadcastStream};

impl From<DashboardEvent> for Event {
    fn from(value: DashboardEvent) -> Self {
        match value {
            DashboardEvent::StudentsChanged => Self::default().event("students_changed").data(""),
            DashboardEvent::CoursesChanged => Self::default().event("courses_changed").data(""),
            DashboardEvent::Notification(notification) => Self::default()
                .event("notification")
                .data(notification.render().into_string()),
        }
    }
}

pub async fn sse_feed(
    State(state): State<DeskState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = BroadcastStream::new(state.subscribe()).filter_map(|event| match event {
        Ok(event) => Some(Ok(Event::from(event))),
        Err(e) => {
            warn!(?e, "SSE client fell behind, skipping events");
            None
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
