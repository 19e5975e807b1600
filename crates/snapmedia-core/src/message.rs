//! Message content as handed to the decoder, and its JSON form.
//!
//! The same logical message exists in two shapes:
//! - persisted: one binary payload; the Key Ring sits in its media envelope
//!   section and the content lives one level down;
//! - live (JSON): the content payload alone, with the keys enumerated
//!   separately as media references.
//!
//! The JSON form writes byte arrays as lists of signed bytes.

use bytes::Bytes;
use serde::{Deserialize, Deserializer};

use crate::encoding::encode_token;
use crate::error::{Result, SnapMediaError};
use crate::keys::KeyRing;

/// Where a message's indirect keys come from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MessageKeys {
    /// Persisted form: keys sit in the payload's media envelopes and the
    /// content lives under the content root.
    #[default]
    Persisted,
    /// Content payload with an externally derived Key Ring.
    Supplied(KeyRing),
    /// Content payload drawing from the quoting message's ring.
    Inherit,
}

/// One message's payload, where its keys come from, and the message it quotes.
#[derive(Debug, Clone, Default)]
pub struct MessageContent {
    pub content: Bytes,
    pub keys: MessageKeys,
    pub quoted: Option<Box<MessageContent>>,
}

impl MessageContent {
    /// Persisted binary form.
    pub fn persisted(payload: impl Into<Bytes>) -> Self {
        Self {
            content: payload.into(),
            keys: MessageKeys::Persisted,
            quoted: None,
        }
    }

    /// Content payload with an externally derived Key Ring.
    pub fn with_key_ring(content: impl Into<Bytes>, key_ring: KeyRing) -> Self {
        Self {
            content: content.into(),
            keys: MessageKeys::Supplied(key_ring),
            quoted: None,
        }
    }

    /// Content payload that draws keys from the quoting message's ring.
    pub fn inheriting(content: impl Into<Bytes>) -> Self {
        Self {
            content: content.into(),
            keys: MessageKeys::Inherit,
            quoted: None,
        }
    }

    /// The supplied Key Ring, if any.
    pub fn key_ring(&self) -> Option<&KeyRing> {
        match &self.keys {
            MessageKeys::Supplied(ring) => Some(ring),
            MessageKeys::Persisted | MessageKeys::Inherit => None,
        }
    }

    pub fn quoting(mut self, quoted: MessageContent) -> Self {
        self.quoted = Some(Box::new(quoted));
        self
    }

    /// Parse the JSON form. Accepts the content object itself or a message
    /// object wrapping it under `mMessageContent`.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| SnapMediaError::BadInput(format!("invalid message json: {e}")))?;
        Self::from_json_value(value)
    }

    pub fn from_json_value(mut value: serde_json::Value) -> Result<Self> {
        if let Some(inner) = value.get_mut("mMessageContent").map(serde_json::Value::take) {
            value = inner;
        }
        let raw: RawMessageContent = serde_json::from_value(value)
            .map_err(|e| SnapMediaError::BadInput(format!("invalid message content: {e}")))?;
        Ok(raw.into_content())
    }
}

#[derive(Debug, Deserialize)]
struct RawMessageContent {
    #[serde(rename = "mContent", default, deserialize_with = "signed_bytes_opt")]
    content: Option<Vec<u8>>,
    #[serde(rename = "mRemoteMediaReferences", default)]
    remote_media_references: Vec<RawRemoteMediaReference>,
    #[serde(rename = "mQuotedMessage", default)]
    quoted_message: Option<RawQuotedMessage>,
}

#[derive(Debug, Deserialize)]
struct RawQuotedMessage {
    #[serde(rename = "mContent", default)]
    content: Option<Box<RawMessageContent>>,
}

#[derive(Debug, Deserialize)]
struct RawRemoteMediaReference {
    #[serde(rename = "mMediaReferences", default)]
    media_references: Vec<RawMediaReference>,
}

#[derive(Debug, Deserialize)]
struct RawMediaReference {
    #[serde(rename = "mMediaListId", default)]
    media_list_id: i64,
    #[serde(rename = "mContentObject", deserialize_with = "signed_bytes")]
    content_object: Vec<u8>,
}

impl RawMessageContent {
    /// Flatten every media reference, ordered by list id. The sort is stable,
    /// so references sharing a list id keep their listed order.
    fn media_references(&self) -> Vec<String> {
        let mut refs: Vec<&RawMediaReference> = self
            .remote_media_references
            .iter()
            .flat_map(|r| r.media_references.iter())
            .collect();
        refs.sort_by_key(|r| r.media_list_id);
        refs.into_iter()
            .map(|r| encode_token(&r.content_object))
            .collect()
    }

    fn into_content(self) -> MessageContent {
        let key_ring = KeyRing::new(self.media_references());
        let quoted = self
            .quoted_message
            .and_then(|q| q.content)
            .filter(|c| c.content.as_ref().is_some_and(|b| !b.is_empty()))
            .map(|c| Box::new(c.into_content()));
        MessageContent {
            content: Bytes::from(self.content.unwrap_or_default()),
            keys: MessageKeys::Supplied(key_ring),
            quoted,
        }
    }
}

/// Byte arrays written as signed (`-128..=127`) or unsigned (`0..=255`) numbers.
fn signed_bytes<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Vec<u8>, D::Error> {
    let raw = Vec::<i64>::deserialize(d)?;
    raw.into_iter()
        .map(|v| {
            if (-128..=255).contains(&v) {
                Ok(v as u8)
            } else {
                Err(serde::de::Error::custom(format!("byte out of range: {v}")))
            }
        })
        .collect()
}

fn signed_bytes_opt<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<Vec<u8>>, D::Error> {
    signed_bytes(d).map(Some)
}
