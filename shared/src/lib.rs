//! Wire protocol shared between the text-shooter server and client.
//!
//! Every message travels as a fixed-size frame of [`FRAME_LEN`] bytes: a
//! JSON array holding exactly one string, right-padded with ASCII spaces up
//! to the frame size. Client-to-server frames carry one raw command line;
//! server-to-client frames carry the newline-joined block of log lines
//! accumulated for that player since the previous flush (an empty block if
//! none). Fixed-size frames keep the per-tick read path trivial: a session
//! is readable once [`FRAME_LEN`] bytes have arrived, with no delimiter
//! scanning.
//!
//! A payload whose encoding exceeds the frame budget is refused by
//! [`encode_frame`] and never transmitted. [`frames_for_block`] is the
//! outbound policy built on top of that rule: it splits a block of log lines
//! greedily across as many frames as needed, truncating a single line only
//! when the line alone cannot fit one frame.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Exact size in bytes of every frame in either direction.
pub const FRAME_LEN: usize = 4096;

/// Port the server listens on unless overridden.
pub const DEFAULT_PORT: u16 = 13337;

/// The decoded body of one frame: an array of strings that must hold
/// exactly one element on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WireMessage(pub Vec<String>);

/// Errors produced while encoding or decoding frames.
#[derive(Debug, Error)]
pub enum FrameError {
    /// The encoded payload is larger than [`FRAME_LEN`] bytes.
    #[error("encoded payload is {0} bytes, over the {FRAME_LEN} byte frame budget")]
    Oversized(usize),
    /// The frame bytes are not valid UTF-8.
    #[error("frame is not valid UTF-8")]
    InvalidUtf8,
    /// The frame body is not the expected JSON shape.
    #[error("malformed frame payload: {0}")]
    MalformedJson(#[from] serde_json::Error),
    /// The frame body held the wrong number of strings.
    #[error("frame contained {0} strings, expected exactly 1")]
    WrongArity(usize),
}

/// Encodes one text payload into a full frame of exactly [`FRAME_LEN`] bytes.
///
/// Fails with [`FrameError::Oversized`] when the JSON encoding of the
/// payload does not fit the frame budget; nothing is transmitted in that
/// case.
pub fn encode_frame(text: &str) -> Result<Vec<u8>, FrameError> {
    let message = WireMessage(vec![text.to_string()]);
    let mut bytes = serde_json::to_vec(&message)?;
    if bytes.len() > FRAME_LEN {
        return Err(FrameError::Oversized(bytes.len()));
    }
    bytes.resize(FRAME_LEN, b' ');
    Ok(bytes)
}

/// Decodes one received frame back into its text payload.
///
/// Trailing padding is stripped before the JSON body is parsed. The body
/// must be an array containing exactly one string.
pub fn decode_frame(frame: &[u8]) -> Result<String, FrameError> {
    let text = std::str::from_utf8(frame).map_err(|_| FrameError::InvalidUtf8)?;
    let mut message: WireMessage = serde_json::from_str(text.trim_end())?;
    if message.0.len() != 1 {
        return Err(FrameError::WrongArity(message.0.len()));
    }
    message.0.pop().ok_or(FrameError::WrongArity(0))
}

/// Splits a block of log lines into as many frames as it needs.
///
/// Lines are joined with newlines and packed greedily: each frame carries
/// the longest prefix of remaining lines that still encodes within the
/// budget. A single line too long for any frame is truncated to fit rather
/// than corrupting the frame or killing the session. An empty block still
/// produces one frame holding the empty string, which the protocol requires
/// the server to flush every tick.
pub fn frames_for_block(lines: &[String]) -> Vec<Vec<u8>> {
    let mut frames = Vec::new();
    let mut block = String::new();
    let mut encoded: Option<Vec<u8>> = None;

    for line in lines {
        let candidate = if encoded.is_some() {
            format!("{block}\n{line}")
        } else {
            line.clone()
        };

        match encode_frame(&candidate) {
            Ok(frame) => {
                block = candidate;
                encoded = Some(frame);
            }
            Err(_) => {
                if let Some(full) = encoded.take() {
                    frames.push(full);
                }
                match encode_frame(line) {
                    Ok(frame) => {
                        block = line.clone();
                        encoded = Some(frame);
                    }
                    Err(_) => frames.push(encode_truncated(line)),
                }
            }
        }
    }

    match encoded {
        Some(frame) => frames.push(frame),
        // An empty string always encodes, so this only fires for an empty
        // block (or when the final line was truncated and flushed above).
        None if frames.is_empty() => frames.extend(encode_frame("").ok()),
        None => {}
    }

    frames
}

/// Drops characters from the end of an overlong line until it fits a frame.
fn encode_truncated(line: &str) -> Vec<u8> {
    let mut text = line.to_string();
    loop {
        match encode_frame(&text) {
            Ok(frame) => return frame,
            Err(_) => {
                text.pop();
            }
        }
    }
}
