//! Attachment descriptors: the decoder's output unit.

use serde::{Deserialize, Serialize};

use crate::encoding::{decode_lenient, encode_token};
use crate::keys::EncryptionKeyPair;
use crate::layout;
use crate::proto::ProtoReader;

/// Where the attachment bytes come from. Exactly one form per descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "value")]
pub enum MediaKey {
    /// Opaque token exchanged with a remote resolver (URL-safe base64).
    Indirect(String),
    /// Ready-to-fetch URL.
    Direct(String),
}

impl MediaKey {
    pub fn as_str(&self) -> &str {
        match self {
            MediaKey::Indirect(s) | MediaKey::Direct(s) => s,
        }
    }
}

/// Sticker catalogs with a known URL scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StickerPack {
    /// The platform's own catalog (`"snap"`).
    Platform,
    /// Avatar renders (`"bitmoji"`).
    Avatar,
    /// A pack resolved through a configured template.
    Other(String),
}

impl StickerPack {
    pub fn id(&self) -> &str {
        match self {
            StickerPack::Platform => "snap",
            StickerPack::Avatar => "bitmoji",
            StickerPack::Other(id) => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "source")]
pub enum StickerSource {
    /// Catalog sticker addressed by pack + reference; unencrypted.
    Catalog { pack: StickerPack, reference: String },
    /// Uploaded sticker fetched through an indirect key.
    Custom,
}

/// Content kind. Picks the downstream file extension / content type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum AttachmentKind {
    ExternalMedia,
    OriginalStory,
    Snap,
    Note,
    Gif,
    Sticker(StickerSource),
}

impl AttachmentKind {
    /// Stable key used by the download layer.
    pub fn key(&self) -> &'static str {
        match self {
            AttachmentKind::ExternalMedia => "external_media",
            AttachmentKind::OriginalStory => "original_story",
            AttachmentKind::Snap => "snap",
            AttachmentKind::Note => "note",
            AttachmentKind::Gif => "gif",
            AttachmentKind::Sticker(_) => "sticker",
        }
    }
}

/// Optional metadata: encryption pair, (width, height), duration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption: Option<EncryptionKeyPair>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<(u32, u32)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub key: MediaKey,
    #[serde(flatten)]
    pub kind: AttachmentKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<AttachmentInfo>,
}

/// How the download layer should interpret [`DownloadRequest::content`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DownloadMediaType {
    /// Indirect key to resolve remotely.
    ProtoMedia,
    /// Plain URL.
    RemoteMedia,
}

/// Hand-off record for the download queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadRequest {
    pub content: String,
    pub media_type: DownloadMediaType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption: Option<EncryptionKeyPair>,
    pub attachment_type: String,
    pub is_overlay: bool,
}

impl Attachment {
    pub fn encryption(&self) -> Option<&EncryptionKeyPair> {
        self.info.as_ref().and_then(|i| i.encryption.as_ref())
    }

    /// Deduplication id, computed on demand.
    ///
    /// Indirect keys embed `<media id>.<suffix>` at a fixed path; direct URLs
    /// use their last path segment without query or extension, re-encoded.
    pub fn stable_id(&self) -> Option<String> {
        match &self.key {
            MediaKey::Indirect(token) => {
                let raw = decode_lenient(token)?;
                let media_id = ProtoReader::new(raw).string(layout::key_token::MEDIA_ID)?;
                let id = media_id.split('.').next().unwrap_or_default();
                Some(id.to_owned())
            }
            MediaKey::Direct(url) => {
                let segment = url.rsplit('/').next()?;
                let segment = segment.rsplit_once('?').map_or(segment, |(s, _)| s);
                let stem = segment.rsplit_once('.').map_or(segment, |(s, _)| s);
                Some(encode_token(stem.as_bytes()))
            }
        }
    }

    pub fn download_request(&self, is_overlay: bool) -> DownloadRequest {
        let media_type = match self.key {
            MediaKey::Indirect(_) => DownloadMediaType::ProtoMedia,
            MediaKey::Direct(_) => DownloadMediaType::RemoteMedia,
        };
        DownloadRequest {
            content: self.key.as_str().to_owned(),
            media_type,
            encryption: self.encryption().cloned(),
            attachment_type: self.kind.key().to_owned(),
            is_overlay,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::proto::ProtoWriter;

    fn indirect_token(media_id: &str) -> String {
        let mut w = ProtoWriter::new();
        w.varint(1, 1).message(2, |m| {
            m.varint(1, 3).string(2, media_id);
        });
        encode_token(&w.finish())
    }

    #[test]
    fn stable_id_from_indirect_key() {
        let a = Attachment {
            key: MediaKey::Indirect(indirect_token("AbCd123.mp4")),
            kind: AttachmentKind::Snap,
            info: None,
        };
        assert_eq!(a.stable_id().as_deref(), Some("AbCd123"));
    }

    #[test]
    fn stable_id_from_direct_url() {
        let a = Attachment {
            key: MediaKey::Direct("https://cf-st.sc-cdn.net/3d/render/1-2-v5.webp?ua=2".into()),
            kind: AttachmentKind::Gif,
            info: None,
        };
        assert_eq!(a.stable_id(), Some(encode_token(b"1-2-v5")));
    }

    #[test]
    fn stable_id_absent_for_garbage_token() {
        let a = Attachment {
            key: MediaKey::Indirect("%%%".into()),
            kind: AttachmentKind::Note,
            info: None,
        };
        assert!(a.stable_id().is_none());
    }

    #[test]
    fn download_request_carries_kind_and_key() {
        let a = Attachment {
            key: MediaKey::Direct("https://example.invalid/x.png".into()),
            kind: AttachmentKind::Sticker(StickerSource::Catalog {
                pack: StickerPack::Platform,
                reference: "x.png".into(),
            }),
            info: None,
        };
        let req = a.download_request(true);
        assert_eq!(req.media_type, DownloadMediaType::RemoteMedia);
        assert_eq!(req.attachment_type, "sticker");
        assert_eq!(req.content, "https://example.invalid/x.png");
        assert!(req.is_overlay);
        assert!(req.encryption.is_none());
    }

    #[test]
    fn serializes_kind_inline() {
        let a = Attachment {
            key: MediaKey::Indirect("tok".into()),
            kind: AttachmentKind::Snap,
            info: None,
        };
        let v = serde_json::to_value(&a).unwrap();
        assert_eq!(v["kind"], "snap");
        assert_eq!(v["key"]["type"], "indirect");
        assert_eq!(v["key"]["value"], "tok");
    }
}
