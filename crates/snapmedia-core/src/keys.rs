//! Key Ring and key-material resolution.
//!
//! The Key Ring is the ordered side-channel list of indirect keys for one
//! message. Consumers take from it through a single cursor; every take moves
//! the cursor, including takes past the end, so a missing key never shifts
//! the keys owed to later branches.

use serde::{Deserialize, Serialize};

use crate::attachment::AttachmentInfo;
use crate::encoding::{decode_lenient, encode_token, serde_token};
use crate::layout;
use crate::proto::ProtoReader;

/// Media encryption key + initialization vector.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptionKeyPair {
    #[serde(with = "serde_token")]
    pub key: Vec<u8>,
    #[serde(with = "serde_token")]
    pub iv: Vec<u8>,
}

impl std::fmt::Debug for EncryptionKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionKeyPair")
            .field("key_len", &self.key.len())
            .field("iv_len", &self.iv.len())
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyRing {
    keys: Vec<String>,
    cursor: usize,
}

impl KeyRing {
    pub fn new(keys: Vec<String>) -> Self {
        Self { keys, cursor: 0 }
    }

    /// Append raw key bytes, URL-safe base64 encoded.
    pub fn push_raw(&mut self, raw: &[u8]) {
        self.keys.push(encode_token(raw));
    }

    /// Collect the keys of the persisted form's media envelope section.
    pub fn from_envelopes(root: &ProtoReader) -> Self {
        let mut ring = KeyRing::default();
        root.for_each_repeated(
            layout::envelope::MEDIA_ENVELOPES,
            layout::envelope::ENVELOPE_ENTRY,
            |entry| {
                if let Some(raw) = entry.bytes(layout::envelope::ENVELOPE_KEY) {
                    ring.push_raw(&raw);
                }
            },
        );
        ring
    }

    /// Take the key at the cursor and advance. `None` once exhausted; the
    /// cursor still moves.
    pub fn take(&mut self) -> Option<String> {
        let key = self.keys.get(self.cursor).cloned();
        if key.is_none() {
            tracing::warn!(
                cursor = self.cursor,
                len = self.keys.len(),
                "key ring exhausted, attachment dropped"
            );
        }
        self.cursor = self.cursor.saturating_add(1);
        key
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Keys not yet consumed.
    pub fn remaining(&self) -> usize {
        self.keys.len().saturating_sub(self.cursor)
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }
}

impl FromIterator<String> for KeyRing {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        KeyRing::new(iter.into_iter().collect())
    }
}

/// Read a key pair (field 1 = key, field 2 = iv) from `scope`.
///
/// With `encoded` both fields are trimmed base64 text; otherwise raw bytes.
/// `None` if either is absent or does not decode.
pub fn resolve_key_pair(scope: &ProtoReader, encoded: bool) -> Option<EncryptionKeyPair> {
    let (key, iv) = if encoded {
        (
            decode_lenient(scope.string(layout::key_pair::KEY)?.trim())?,
            decode_lenient(scope.string(layout::key_pair::IV)?.trim())?,
        )
    } else {
        (
            scope.bytes(layout::key_pair::KEY)?.to_vec(),
            scope.bytes(layout::key_pair::IV)?.to_vec(),
        )
    };
    Some(EncryptionKeyPair { key, iv })
}

/// Encryption pair, resolution and duration of one metadata block.
///
/// The base64 pair is tried first; the raw-bytes pair is used when the first
/// is missing or unreadable.
pub fn resolve_metadata(scope: &ProtoReader) -> AttachmentInfo {
    let encryption = scope
        .descend(layout::metadata::ENCODED_KEY_PAIR)
        .and_then(|r| resolve_key_pair(&r, true))
        .or_else(|| {
            scope
                .descend(layout::metadata::RAW_KEY_PAIR)
                .and_then(|r| resolve_key_pair(&r, false))
        });

    let resolution = scope.descend(layout::metadata::RESOLUTION).map(|r| {
        let dim = |path: &[u32]| {
            r.varint(path)
                .and_then(|v| u32::try_from(v).ok())
                .unwrap_or(0)
        };
        (dim(layout::metadata::WIDTH), dim(layout::metadata::HEIGHT))
    });

    let duration = scope
        .varint(layout::metadata::DURATION)
        .or_else(|| scope.varint(layout::metadata::NOTE_DURATION));

    AttachmentInfo {
        encryption,
        resolution,
        duration,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::proto::ProtoWriter;

    #[test]
    fn take_advances_past_exhaustion() {
        let mut ring = KeyRing::new(vec!["a".into()]);
        assert_eq!(ring.take().as_deref(), Some("a"));
        assert_eq!(ring.take(), None);
        assert_eq!(ring.take(), None);
        assert_eq!(ring.cursor(), 3);
        assert_eq!(ring.remaining(), 0);
    }

    #[test]
    fn envelopes_are_collected_in_order() {
        let mut w = ProtoWriter::new();
        w.message(4, |m| {
            m.message(5, |e| {
                e.message(1, |k| {
                    k.bytes(3, &[1, 2, 3]);
                });
            })
            .message(5, |e| {
                e.varint(2, 0);
            })
            .message(5, |e| {
                e.message(1, |k| {
                    k.bytes(3, &[4]);
                });
            });
        });
        let ring = KeyRing::from_envelopes(&ProtoReader::new(w.finish()));
        assert_eq!(ring.keys(), &[encode_token(&[1, 2, 3]), encode_token(&[4])]);
    }

    #[test]
    fn encoded_pair_is_trimmed_and_decoded() {
        let mut w = ProtoWriter::new();
        w.string(1, " AAEC \n").string(2, "AwQ=");
        let pair = resolve_key_pair(&ProtoReader::new(w.finish()), true).unwrap();
        assert_eq!(pair.key, vec![0, 1, 2]);
        assert_eq!(pair.iv, vec![3, 4]);
    }

    #[test]
    fn pair_missing_iv_is_none() {
        let mut w = ProtoWriter::new();
        w.bytes(1, &[9]);
        assert!(resolve_key_pair(&ProtoReader::new(w.finish()), false).is_none());
    }

    #[test]
    fn bad_base64_is_none() {
        let mut w = ProtoWriter::new();
        w.string(1, "***").string(2, "AwQ=");
        assert!(resolve_key_pair(&ProtoReader::new(w.finish()), true).is_none());
    }

    #[test]
    fn metadata_falls_back_to_raw_pair() {
        let mut w = ProtoWriter::new();
        w.message(19, |p| {
            p.bytes(1, &[7; 32]).bytes(2, &[8; 16]);
        })
        .message(5, |r| {
            r.varint(1, 1080);
        })
        .varint(13, 4200);
        let info = resolve_metadata(&ProtoReader::new(w.finish()));
        let pair = info.encryption.unwrap();
        assert_eq!(pair.key, vec![7; 32]);
        assert_eq!(pair.iv, vec![8; 16]);
        assert_eq!(info.resolution, Some((1080, 0)));
        assert_eq!(info.duration, Some(4200));
    }

    #[test]
    fn metadata_prefers_encoded_pair_and_media_duration() {
        let mut w = ProtoWriter::new();
        w.message(4, |p| {
            p.string(1, "AAEC").string(2, "AwQ=");
        })
        .message(19, |p| {
            p.bytes(1, &[7]).bytes(2, &[8]);
        })
        .varint(15, 10)
        .varint(13, 20);
        let info = resolve_metadata(&ProtoReader::new(w.finish()));
        assert_eq!(info.encryption.unwrap().key, vec![0, 1, 2]);
        assert_eq!(info.duration, Some(10));
        assert!(info.resolution.is_none());
    }

    #[test]
    fn empty_scope_yields_empty_metadata() {
        assert_eq!(resolve_metadata(&ProtoReader::default()), AttachmentInfo::default());
    }
}
