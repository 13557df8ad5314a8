//! # Incremental SSE Frame Decoding
//!
//! The wire format both sides of this crate speak is newline-delimited
//! `data: <payload>` frames with an application-level `[DONE]` sentinel.
//! [`FrameDecoder`] is the shared state machine: bytes go in with arbitrary
//! chunk boundaries (network reads are not line-aligned), complete payloads
//! come out, and everything that is not a well-formed data line is skipped
//! silently — blank keep-alive lines and `event:`/`id:` fields are valid
//! SSE, never an error.
//!
//! What a payload *means* is deliberately kept out of the state machine.
//! The nested JSON shapes (`choices[0].delta.content` for OpenRouter-style
//! upstreams, candidate parts for Gemini) are provider conventions, not
//! contracts, so they live behind small adapter functions that can be
//! swapped without touching the decoder.

use bytes::{Bytes, BytesMut};
use futures_util::stream::{Stream, StreamExt};
use serde_json::Value;
use std::collections::VecDeque;
use tracing::debug;

/// Sentinel payload marking end-of-stream.
pub const DONE_SENTINEL: &str = "[DONE]";

const DATA_PREFIX: &str = "data: ";

/// Incremental decoder for `data: <payload>` framed streams.
///
/// Once the `[DONE]` sentinel has been seen the decoder is finished for
/// good: later input is dropped without buffering, no matter how many bytes
/// the transport still delivers.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: BytesMut,
    finished: bool,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the sentinel has been consumed.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Feed one chunk of raw bytes and collect every complete payload it
    /// completes. A trailing partial line stays buffered for the next call.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut payloads = Vec::new();
        if self.finished {
            return payloads;
        }

        self.buffer.extend_from_slice(chunk);

        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let mut line = self.buffer.split_to(pos + 1);
            line.truncate(pos);
            if line.last() == Some(&b'\r') {
                line.truncate(line.len() - 1);
            }

            let Ok(line) = std::str::from_utf8(&line) else {
                debug!("skipping non-UTF-8 SSE line");
                continue;
            };
            let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
                // Comments, field names, blank keep-alives: valid, ignored.
                continue;
            };

            if payload == DONE_SENTINEL {
                self.finished = true;
                self.buffer.clear();
                break;
            }
            payloads.push(payload.to_string());
        }

        payloads
    }
}

/// Extract the incremental text from an OpenRouter/OpenAI-style frame:
/// `choices[0].delta.content`. A malformed payload or an absent field means
/// "no text this frame" — skipped, never an error.
pub fn openai_delta(payload: &str) -> Option<String> {
    let value = parse_payload(payload)?;
    value["choices"][0]["delta"]["content"]
        .as_str()
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// Extract the incremental text from a Gemini streaming frame, concatenating
/// every part of the first candidate: `candidates[0].content.parts[*].text`.
pub fn gemini_text(payload: &str) -> Option<String> {
    let value = parse_payload(payload)?;
    let parts = value["candidates"][0]["content"]["parts"].as_array()?;
    let text: String = parts
        .iter()
        .filter_map(|part| part["text"].as_str())
        .collect();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn parse_payload(payload: &str) -> Option<Value> {
    match serde_json::from_str(payload) {
        Ok(value) => Some(value),
        Err(err) => {
            debug!(%err, "skipping malformed SSE frame");
            None
        }
    }
}

struct DeltaState<S> {
    transport: S,
    decoder: FrameDecoder,
    pending: VecDeque<String>,
    extract: fn(&str) -> Option<String>,
    failed: bool,
}

/// Adapt a raw byte stream into a lazy, single-pass stream of text deltas.
///
/// Pull-based all the way down: the transport is only read when the consumer
/// asks for the next delta, and dropping the returned stream drops the
/// transport, so cancellation stops all further reads. A transport error is
/// yielded exactly once and terminates the sequence; frames the extractor
/// rejects are skipped.
pub fn delta_stream<S, E>(
    transport: S,
    extract: fn(&str) -> Option<String>,
) -> impl Stream<Item = Result<String, E>> + Send
where
    S: Stream<Item = Result<Bytes, E>> + Send + Unpin + 'static,
    E: Send + 'static,
{
    let state = DeltaState {
        transport,
        decoder: FrameDecoder::new(),
        pending: VecDeque::new(),
        extract,
        failed: false,
    };

    futures_util::stream::unfold(state, |mut state| async move {
        loop {
            if let Some(text) = state.pending.pop_front() {
                return Some((Ok(text), state));
            }
            if state.decoder.is_finished() || state.failed {
                return None;
            }

            match state.transport.next().await {
                Some(Ok(chunk)) => {
                    for payload in state.decoder.feed(&chunk) {
                        if let Some(text) = (state.extract)(&payload) {
                            state.pending.push_back(text);
                        }
                    }
                }
                Some(Err(err)) => {
                    state.failed = true;
                    return Some((Err(err), state));
                }
                // Clean closure without a sentinel is also a normal end.
                None => return None,
            }
        }
    })
}
