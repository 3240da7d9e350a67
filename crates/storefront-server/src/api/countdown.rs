use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
    Extension,
};
use chrono::{DateTime, Utc};
use futures::{stream, Stream};
use serde::Deserialize;
use storefront_core::next_window_boundary;

use crate::middleware::RequestId;
use crate::ticker::CountdownTicker;

use super::views::CountdownView;
use super::{parse_param, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct CountdownParams {
    /// RFC 3339 target; defaults to the end of the current deal window.
    pub target: Option<String>,
}

/// Streams one `countdown` event per second until the target passes. The
/// ticker is owned by the stream, so a client disconnect stops it.
pub(super) async fn countdown_stream(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<CountdownParams>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, ApiError> {
    let target = parse_param::<DateTime<Utc>>(&req_id.0, "target", params.target.as_deref())?
        .unwrap_or_else(|| next_window_boundary(state.clock.now(), state.countdown_window));
    tracing::debug!(%target, "opening countdown stream");

    let ticker = CountdownTicker::spawn(target, Arc::clone(&state.clock));
    let events = stream::unfold(ticker, move |mut ticker| async move {
        let countdown = ticker.next().await?;
        Some((countdown_event(target, countdown), ticker))
    });

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

fn countdown_event(
    target: DateTime<Utc>,
    state: storefront_core::CountdownState,
) -> Result<Event, axum::Error> {
    Event::default()
        .event("countdown")
        .json_data(CountdownView::new(target, state))
}
