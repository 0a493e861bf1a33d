// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Interactive session state
//!
//! Owned by the dispatcher and mutated only between handler runs, so nothing
//! here needs locking.

use std::collections::VecDeque;
use tracing::debug;

use crate::backend::{BackendClient, BackendError, EventStream, StreamChannel, StreamEvent};

/// Visible scrollback kept in the transcript
pub const SCROLLBACK_LIMIT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Agent,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub speaker: Speaker,
    pub text: String,
}

/// Something that happened on the push stream
#[derive(Debug)]
pub enum StreamUpdate {
    Event(StreamEvent),
    Closed(StreamChannel),
    Failed(StreamChannel, BackendError),
}

#[derive(Debug)]
pub struct Session {
    client: BackendClient,
    skip_confirmations: bool,
    stream: Option<EventStream>,
    transcript: VecDeque<TranscriptEntry>,
}

impl Session {
    pub fn new(client: BackendClient, skip_confirmations: bool) -> Self {
        Self {
            client,
            skip_confirmations,
            stream: None,
            transcript: VecDeque::new(),
        }
    }

    pub fn client(&self) -> &BackendClient {
        &self.client
    }

    pub fn skip_confirmations(&self) -> bool {
        self.skip_confirmations
    }

    /// Flip yolo mode, returning the new value
    pub fn toggle_skip_confirmations(&mut self) -> bool {
        self.skip_confirmations = !self.skip_confirmations;
        self.skip_confirmations
    }

    pub fn stream_channel(&self) -> Option<StreamChannel> {
        self.stream.as_ref().map(EventStream::channel)
    }

    /// Replace any open stream with `stream`
    pub async fn attach_stream(&mut self, stream: EventStream) {
        self.close_stream().await;
        self.stream = Some(stream);
    }

    /// Close the open stream, if any, returning its channel
    pub async fn close_stream(&mut self) -> Option<StreamChannel> {
        let mut stream = self.stream.take()?;
        let channel = stream.channel();
        stream.close().await;
        Some(channel)
    }

    /// Wait for the next stream update. Pends forever when no stream is open.
    ///
    /// Cancel safe: dropping the future loses no events.
    pub async fn next_stream_update(&mut self) -> StreamUpdate {
        let Some(stream) = self.stream.as_mut() else {
            return std::future::pending().await;
        };
        let channel = stream.channel();

        match stream.next_event().await {
            Some(Ok(event)) => StreamUpdate::Event(event),
            Some(Err(e)) => {
                self.stream = None;
                StreamUpdate::Failed(channel, e)
            }
            None => {
                self.stream = None;
                StreamUpdate::Closed(channel)
            }
        }
    }

    /// Append a displayable event to the transcript and return the new entry
    pub fn record(&mut self, event: StreamEvent) -> Option<&TranscriptEntry> {
        let entry = match event {
            StreamEvent::Transcript { text } => TranscriptEntry {
                speaker: Speaker::User,
                text,
            },
            StreamEvent::AgentText { text } => TranscriptEntry {
                speaker: Speaker::Agent,
                text,
            },
            StreamEvent::Control { action } => TranscriptEntry {
                speaker: Speaker::System,
                text: action,
            },
            StreamEvent::Other => {
                debug!("Ignoring stream event with unrecognised type");
                return None;
            }
        };

        if self.transcript.len() == SCROLLBACK_LIMIT {
            self.transcript.pop_front();
        }
        self.transcript.push_back(entry);
        self.transcript.back()
    }

    pub fn transcript(&self) -> impl Iterator<Item = &TranscriptEntry> {
        self.transcript.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConsoleConfig;

    fn session() -> Session {
        let client = BackendClient::new(&ConsoleConfig::default()).unwrap();
        Session::new(client, false)
    }

    #[test]
    fn test_record_maps_speakers() {
        let mut session = session();
        session.record(StreamEvent::Transcript { text: "hi".to_string() });
        session.record(StreamEvent::AgentText { text: "hello".to_string() });
        session.record(StreamEvent::Control { action: "interrupt".to_string() });
        assert!(session.record(StreamEvent::Other).is_none());

        let speakers: Vec<_> = session.transcript().map(|e| e.speaker).collect();
        assert_eq!(speakers, vec![Speaker::User, Speaker::Agent, Speaker::System]);
    }

    #[test]
    fn test_scrollback_is_bounded() {
        let mut session = session();
        for i in 0..(SCROLLBACK_LIMIT + 5) {
            session.record(StreamEvent::AgentText { text: i.to_string() });
        }
        let texts: Vec<_> = session.transcript().map(|e| e.text.clone()).collect();
        assert_eq!(texts.len(), SCROLLBACK_LIMIT);
        assert_eq!(texts[0], "5");
        assert_eq!(texts.last().map(String::as_str), Some("104"));
    }

    #[test]
    fn test_toggle_yolo() {
        let mut session = session();
        assert!(!session.skip_confirmations());
        assert!(session.toggle_skip_confirmations());
        assert!(!session.toggle_skip_confirmations());
    }

    #[tokio::test]
    async fn test_close_without_stream() {
        let mut session = session();
        assert_eq!(session.close_stream().await, None);
        assert_eq!(session.stream_channel(), None);
    }
}
