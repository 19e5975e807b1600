//! Decode-once input classification.
//!
//! - JSON message form => content + Key Ring from its media references
//! - binary with a supplied Key Ring => content root
//! - binary alone => persisted form

use bytes::Bytes;
use snapmedia_core::error::{Result, SnapMediaError};
use snapmedia_core::layout;
use snapmedia_core::proto::ProtoReader;
use snapmedia_core::{KeyRing, MessageContent, MessageKeys};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputForm {
    Json,
    Keyed,
    Persisted,
}

impl InputForm {
    /// Label used in reports and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            InputForm::Json => "json",
            InputForm::Keyed => "keyed",
            InputForm::Persisted => "persisted",
        }
    }
}

#[derive(Debug)]
pub struct Input {
    pub form: InputForm,
    pub message: MessageContent,
}

impl Input {
    /// Content root of the outer message, for type detection and text.
    pub fn content_root(&self) -> Option<ProtoReader> {
        let root = ProtoReader::new(self.message.content.clone());
        match self.form {
            InputForm::Persisted => root.descend(layout::envelope::CONTENT_ROOT),
            InputForm::Json | InputForm::Keyed => Some(root),
        }
    }
}

fn looks_like_json(raw: &[u8]) -> bool {
    raw.iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|b| *b == b'{')
}

/// Whitespace and `{` are also valid leading protobuf tag bytes, so only a
/// payload that parses as a JSON object takes the JSON path.
fn parse_json(raw: &[u8]) -> Option<serde_json::Value> {
    if !looks_like_json(raw) {
        return None;
    }
    let value = std::str::from_utf8(raw)
        .ok()
        .and_then(|text| serde_json::from_str::<serde_json::Value>(text).ok())
        .filter(serde_json::Value::is_object);
    if value.is_none() {
        tracing::trace!("json-looking payload did not parse, reading as binary");
    }
    value
}

pub fn classify(raw: Bytes, keys: Option<KeyRing>) -> Result<Input> {
    if let Some(value) = parse_json(&raw) {
        if keys.is_some() {
            return Err(SnapMediaError::BadInput(
                "json input carries its own media references; drop --keys".into(),
            ));
        }
        return Ok(Input {
            form: InputForm::Json,
            message: MessageContent::from_json_value(value)?,
        });
    }

    Ok(match keys {
        Some(ring) => Input {
            form: InputForm::Keyed,
            message: MessageContent::with_key_ring(raw, ring),
        },
        None => Input {
            form: InputForm::Persisted,
            message: MessageContent::persisted(raw),
        },
    })
}

/// Key Ring file: one token per line, blank lines ignored.
pub fn parse_key_ring(text: &str) -> KeyRing {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_owned)
        .collect()
}
