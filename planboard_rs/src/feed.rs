use async_trait::async_trait;
use bytes::Bytes;
use futures_util::StreamExt;
use planboard_core::{ChangeFeed, Error as CoreError, FeedSubscription, ItemEvent, ItemId};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, Response};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::PlanboardClient;
use crate::error::{PlanboardError, PlanboardErrorKind};

/// Server-sent-events implementation of the change feed.
///
/// Subscribing opens a streaming GET against the feed endpoint and spawns a
/// pump that parses `text/event-stream` frames into item events. The pump
/// ends when the server closes the stream or the subscription drops;
/// reconnecting is the caller's decision.
#[derive(Debug, Clone)]
pub struct SseChangeFeed {
    client: PlanboardClient,
}

impl SseChangeFeed {
    pub fn new(client: PlanboardClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ChangeFeed for SseChangeFeed {
    #[tracing::instrument(level = "debug", skip_all, fields(channel = %channel))]
    async fn subscribe(&self, channel: &str) -> planboard_core::Result<FeedSubscription> {
        #[derive(Serialize)]
        struct Query<'a> {
            channel: &'a str,
        }

        let mut extra = HeaderMap::new();
        extra.insert(ACCEPT, HeaderValue::from_static("text/event-stream"));

        let resp = self
            .client
            .send(
                Method::GET,
                "/api/v1/plan/items/feed",
                Some(&Query { channel }),
                None::<&()>,
                Some(extra),
            )
            .await
            .map_err(|err| CoreError::transport("feed subscribe", err))?;

        if !resp.status().is_success() {
            let mapped = match self.client.map_error(resp).await {
                Ok(err) | Err(err) => err,
            };
            return Err(CoreError::transport("feed subscribe", mapped));
        }

        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        if !content_type.starts_with("text/event-stream") {
            return Err(CoreError::transport(
                "feed subscribe",
                PlanboardError::new(
                    PlanboardErrorKind::Stream,
                    None,
                    format!("expected text/event-stream, got {content_type:?}"),
                ),
            ));
        }

        let (tx, subscription) = FeedSubscription::channel(FeedSubscription::DEFAULT_CAPACITY);
        let pump = tokio::spawn(pump_events(resp, tx));
        Ok(subscription.with_pump(pump))
    }
}

async fn pump_events(resp: Response, tx: mpsc::Sender<ItemEvent>) {
    let mut parser = EventParser::default();
    let mut stream = resp.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk: Bytes = match chunk {
            Ok(chunk) => chunk,
            Err(err) => {
                tracing::warn!(error = %err, "feed stream failed");
                break;
            }
        };
        for event in parser.feed(&chunk) {
            if tx.send(event).await.is_err() {
                // Subscription dropped; nobody is listening anymore.
                return;
            }
        }
    }
    tracing::debug!("feed stream ended");
}

/// Incremental `text/event-stream` parser for the item feed.
///
/// Tracks the current `event:` name, emits one item event per `data:` line,
/// skips comments and anything it does not recognize (the channel may carry
/// other features' events).
#[derive(Debug, Default)]
struct EventParser {
    buf: Vec<u8>,
    cur_event: Option<String>,
}

impl EventParser {
    /// Feeds one chunk of the stream; returns the events it completed.
    fn feed(&mut self, chunk: &[u8]) -> Vec<ItemEvent> {
        let mut events = Vec::new();
        self.buf.extend_from_slice(chunk);

        while let Some(pos) = self.buf.iter().position(|b| *b == b'\n') {
            let mut line = self.buf.drain(..=pos).collect::<Vec<u8>>();
            if line.ends_with(b"\n") {
                line.pop();
            }
            if line.ends_with(b"\r") {
                line.pop();
            }
            let line = String::from_utf8_lossy(&line).to_string();

            if line.is_empty() {
                self.cur_event = None;
                continue;
            }
            if line.starts_with(':') {
                continue;
            }
            if let Some(rest) = line.strip_prefix("event:") {
                self.cur_event = Some(rest.trim().to_string());
                continue;
            }
            if let Some(rest) = line.strip_prefix("data:") {
                let data = rest.trim();
                if data.is_empty() {
                    continue;
                }
                match decode_event(self.cur_event.as_deref(), data) {
                    Some(event) => events.push(event),
                    None => {
                        tracing::debug!(data = %data, "ignoring unrecognized feed frame");
                    }
                }
            }
        }
        events
    }
}

fn decode_event(name: Option<&str>, data: &str) -> Option<ItemEvent> {
    let value: Value = serde_json::from_str(data).ok()?;
    match name? {
        "items-added" => decode_id(&value).map(ItemEvent::Added),
        "items-updated" => decode_id(&value).map(ItemEvent::Updated),
        "items-removed" => decode_ids(&value).map(ItemEvent::Removed),
        _ => None,
    }
}

/// Accepts `{"id": 7}` or a bare `7`.
fn decode_id(value: &Value) -> Option<ItemId> {
    match value {
        Value::Number(n) => n.as_i64().map(ItemId),
        Value::Object(map) => map.get("id").and_then(Value::as_i64).map(ItemId),
        _ => None,
    }
}

/// Accepts `[7, 8]` or `{"ids": [7, 8]}`.
fn decode_ids(value: &Value) -> Option<Vec<ItemId>> {
    let array = match value {
        Value::Array(entries) => entries,
        Value::Object(map) => map.get("ids")?.as_array()?,
        _ => return None,
    };
    let mut ids = Vec::with_capacity(array.len());
    for entry in array {
        ids.push(ItemId(entry.as_i64()?));
    }
    Some(ids)
}
