// Live movement events pushed by the game server over server-sent events.
//
// One subscription per player. Frames that fail to decode are logged and
// dropped; a broken connection is logged and ends the subscription without
// reconnecting.

use futures_util::StreamExt;
use reqwest::header::{ACCEPT, HeaderValue};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::domain::events::MovementEvent;
use crate::interface_adapters::clients::{ClientBuildError, api_root};
use crate::interface_adapters::protocol::decode_movement_event;
use crate::interface_adapters::sse::{SseDecoder, SseFrame};
use crate::use_cases::SessionContext;

pub const MOVEMENT_CHANNELS: [&str; 3] = [
    "game.movement.jump",
    "game.movement.dock",
    "game.movement.undock",
];

#[derive(Clone)]
pub struct MovementEventListener {
    http: reqwest::Client,
    root: Url,
    session: SessionContext,
}

impl MovementEventListener {
    // The stream stays open indefinitely, so only the connect phase is bounded.
    pub fn new(
        base_url: &str,
        connect_timeout: Duration,
        session: SessionContext,
    ) -> Result<Self, ClientBuildError> {
        let http = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()?;
        Ok(Self {
            http,
            root: api_root(base_url)?,
            session,
        })
    }

    /// Stream URL for `player_id`: the player channel plus every movement channel.
    pub fn events_url(&self, player_id: &str) -> Result<Url, url::ParseError> {
        let mut url = self.root.join("events")?;
        let channels = std::iter::once(format!("player.{player_id}"))
            .chain(MOVEMENT_CHANNELS.iter().map(|channel| channel.to_string()))
            .collect::<Vec<_>>()
            .join(",");
        url.query_pairs_mut().append_pair("channels", &channels);
        Ok(url)
    }

    /// Opens the stream in a background task and hands every decoded movement
    /// event to `on_event`. The stream closes when the returned handle is closed
    /// or dropped.
    pub fn subscribe<F>(&self, player_id: &str, on_event: F) -> Subscription
    where
        F: FnMut(MovementEvent) + Send + 'static,
    {
        let task = match self.events_url(player_id) {
            Ok(url) => tokio::spawn(stream_events(
                self.http.clone(),
                url,
                self.session.clone(),
                on_event,
            )),
            Err(e) => {
                error!(player_id, error = %e, "cannot build event stream url");
                tokio::spawn(async {})
            }
        };

        Subscription {
            player_id: player_id.to_string(),
            task: Some(task),
        }
    }
}

#[tracing::instrument(name = "movement_events", skip_all, fields(url = %url))]
async fn stream_events<F>(http: reqwest::Client, url: Url, session: SessionContext, mut on_event: F)
where
    F: FnMut(MovementEvent) + Send + 'static,
{
    let mut request = http
        .get(url)
        .header(ACCEPT, HeaderValue::from_static("text/event-stream"));
    if let Some(token) = session.bearer_token().await {
        request = request.bearer_auth(token);
    }

    let response = match request.send().await {
        Ok(response) => response,
        Err(e) => {
            error!(error = %e, "event stream connection failed");
            return;
        }
    };

    let status = response.status();
    if !status.is_success() {
        error!(%status, "event stream refused");
        return;
    }
    info!("event stream open");

    let mut body = response.bytes_stream();
    let mut decoder = SseDecoder::new();
    while let Some(chunk) = body.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                error!(error = %e, "event stream error");
                return;
            }
        };

        for frame in decoder.push(&chunk) {
            dispatch(&frame, &mut on_event);
        }
    }

    warn!("event stream ended by server");
}

fn dispatch<F>(frame: &SseFrame, on_event: &mut F)
where
    F: FnMut(MovementEvent),
{
    match decode_movement_event(&frame.event, &frame.data) {
        Ok(Some(event)) => {
            debug!(event = frame.event.as_str(), ship_id = event.ship_id(), "movement event");
            on_event(event);
        }
        Ok(None) => debug!(event = frame.event.as_str(), "ignoring unrelated event"),
        Err(e) => warn!(event = frame.event.as_str(), error = %e, "dropping malformed event"),
    }
}

// Owner of one open event stream. Closing or dropping it aborts the task,
// which drops the underlying connection.
pub struct Subscription {
    player_id: String,
    task: Option<JoinHandle<()>>,
}

impl Subscription {
    pub fn player_id(&self) -> &str {
        &self.player_id
    }

    /// False once the stream has failed, ended, or been closed.
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    pub fn close(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!(player_id = %self.player_id, "event subscription closed");
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.shutdown();
    }
}
