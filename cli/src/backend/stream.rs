// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! WebSocket push stream (`/ws/voice`, `/ws/chamber`)
//!
//! Frames are either JSON events (`{"type": "transcript" | "text" | "control", ...}`)
//! or plain text log lines. There is no reconnect: once either side closes,
//! the stream yields nothing further.

use std::collections::VecDeque;
use std::fmt;

use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info};
use url::Url;

use super::client::{extract_detail, LICENSE_HEADER};
use super::BackendError;

/// Which push endpoint to attach to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamChannel {
    Voice,
    Chamber,
}

impl StreamChannel {
    pub fn path(self) -> &'static str {
        match self {
            StreamChannel::Voice => "/ws/voice",
            StreamChannel::Chamber => "/ws/chamber",
        }
    }
}

impl fmt::Display for StreamChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamChannel::Voice => f.write_str("voice"),
            StreamChannel::Chamber => f.write_str("chamber"),
        }
    }
}

/// One pushed message
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Speech recognised from the user
    Transcript {
        #[serde(default)]
        text: String,
    },
    /// Text produced by the swarm
    #[serde(rename = "text")]
    AgentText {
        #[serde(default)]
        text: String,
    },
    Control {
        #[serde(default)]
        action: String,
    },
    /// Any other tag (`session_start`, audio chunks, ...)
    #[serde(other)]
    Other,
}

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub struct EventStream {
    channel: StreamChannel,
    socket: Option<Socket>,
    pending: VecDeque<StreamEvent>,
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("channel", &self.channel)
            .field("open", &self.socket.is_some())
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl EventStream {
    pub(crate) async fn connect(
        base_url: &str,
        channel: StreamChannel,
        license_key: Option<&str>,
    ) -> Result<Self, BackendError> {
        let url = stream_url(base_url, channel)?;
        info!("Connecting to {} stream at {}", channel, url);

        let mut request = url
            .as_str()
            .into_client_request()
            .map_err(|e| BackendError::Stream(e.to_string()))?;
        if let Some(key) = license_key {
            let value = HeaderValue::from_str(key).map_err(|e| BackendError::Stream(e.to_string()))?;
            request.headers_mut().insert(LICENSE_HEADER, value);
        }

        let (socket, _) = connect_async(request).await.map_err(|e| match e {
            WsError::Http(response) => BackendError::Rejected {
                status: response.status().as_u16(),
                detail: response
                    .body()
                    .as_ref()
                    .and_then(|body| extract_detail(&String::from_utf8_lossy(body))),
            },
            other => BackendError::Unreachable {
                url: url.to_string(),
                reason: other.to_string(),
            },
        })?;

        Ok(Self {
            channel,
            socket: Some(socket),
            pending: VecDeque::new(),
        })
    }

    pub fn channel(&self) -> StreamChannel {
        self.channel
    }

    pub fn is_closed(&self) -> bool {
        self.socket.is_none() && self.pending.is_empty()
    }

    /// Next event, `None` once the stream has ended
    pub async fn next_event(&mut self) -> Option<Result<StreamEvent, BackendError>> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(Ok(event));
            }

            let socket = self.socket.as_mut()?;
            match socket.next().await {
                Some(Ok(Message::Text(text))) => self.pending.extend(parse_frame(&text)),
                Some(Ok(Message::Binary(bytes))) => {
                    self.pending.extend(parse_frame(&String::from_utf8_lossy(&bytes)))
                }
                Some(Ok(Message::Close(frame))) => {
                    info!("{} stream closed by backend: {:?}", self.channel, frame);
                    self.socket = None;
                }
                // Ping/pong replies are queued by tungstenite itself
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    self.socket = None;
                    return Some(Err(BackendError::Stream(e.to_string())));
                }
                None => {
                    debug!("{} stream ended", self.channel);
                    self.socket = None;
                }
            }
        }
    }

    /// Close from our side. Terminal: the stream cannot be reopened.
    pub async fn close(&mut self) {
        self.pending.clear();
        if let Some(mut socket) = self.socket.take() {
            if let Err(e) = socket.close(None).await {
                debug!("Error closing {} stream: {}", self.channel, e);
            }
            // Drain until the peer acknowledges or drops
            while let Some(Ok(_)) = socket.next().await {}
            info!("{} stream closed", self.channel);
        }
    }
}

/// Translate the HTTP base URL into the WebSocket URL of `channel`
pub fn stream_url(base_url: &str, channel: StreamChannel) -> Result<Url, BackendError> {
    let mut url = Url::parse(base_url)
        .map_err(|e| BackendError::Stream(format!("invalid base URL '{}': {}", base_url, e)))?;

    let scheme = match url.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => {
            return Err(BackendError::Stream(format!(
                "cannot derive a stream URL from scheme '{}'",
                other
            )))
        }
    };
    url.set_scheme(scheme)
        .map_err(|_| BackendError::Stream(format!("cannot switch '{}' to {}", base_url, scheme)))?;

    let path = format!("{}{}", url.path().trim_end_matches('/'), channel.path());
    url.set_path(&path);
    Ok(url)
}

/// Split one frame into events. JSON frames carry one event; anything else is
/// treated as newline-separated lines, each a JSON event or plain agent text.
pub fn parse_frame(frame: &str) -> Vec<StreamEvent> {
    let frame = frame.trim();
    if frame.is_empty() {
        return Vec::new();
    }
    if let Ok(event) = serde_json::from_str::<StreamEvent>(frame) {
        return vec![event];
    }

    frame
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            serde_json::from_str::<StreamEvent>(line).unwrap_or_else(|_| StreamEvent::AgentText {
                text: line.to_string(),
            })
        })
        .collect()
}
