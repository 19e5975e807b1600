//! Attachment Decoder.
//!
//! Walks the content kinds of a message payload in a fixed order and emits
//! one [`Attachment`] per keyed medium found. Indirectly keyed branches draw
//! from one Key Ring cursor shared by the whole top-level message, so the
//! visiting order below is load-bearing:
//!
//! 1. external media (repeated)
//! 2. stickers (catalog, then custom)
//! 3. shares (saved story, then memories)
//! 4. audio note
//! 5. story reply (original story, media, sticker, shares, note, snap)
//! 6. snap
//! 7. creative-tool items (custom sticker, then gifs)
//! 8. map reaction
//!
//! Inline-keyed branches (creative-tool sticker with an embedded key, gifs)
//! never touch the ring. Nothing here returns an error: an absent or damaged
//! branch contributes no descriptor.

use bytes::Bytes;

use crate::attachment::{Attachment, AttachmentInfo, AttachmentKind, MediaKey, StickerSource};
use crate::catalog::StickerCatalog;
use crate::encoding::encode_token;
use crate::keys::{resolve_key_pair, resolve_metadata, KeyRing};
use crate::layout;
use crate::message::{MessageContent, MessageKeys};
use crate::proto::ProtoReader;

/// Decoder settings.
#[derive(Debug, Clone, Default)]
pub struct DecodeOptions {
    pub stickers: StickerCatalog,
}

#[derive(Debug, Clone, Default)]
pub struct Decoder {
    options: DecodeOptions,
}

/// Decode a persisted payload with default options.
pub fn decode(payload: impl Into<Bytes>) -> Vec<Attachment> {
    Decoder::default().decode_persisted(payload)
}

/// Decode a content payload against a supplied Key Ring with default options.
pub fn decode_with_key_ring(content: impl Into<Bytes>, ring: &mut KeyRing) -> Vec<Attachment> {
    Decoder::default().decode_content(&ProtoReader::new(content), ring)
}

impl Decoder {
    pub fn new(options: DecodeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Persisted form: extract the Key Ring from the media envelopes, then
    /// decode the canonical content root.
    pub fn decode_persisted(&self, payload: impl Into<Bytes>) -> Vec<Attachment> {
        let root = ProtoReader::new(payload);
        let mut ring = KeyRing::from_envelopes(&root);
        let Some(content) = root.descend(layout::envelope::CONTENT_ROOT) else {
            tracing::debug!("no content root in persisted payload");
            return Vec::new();
        };
        self.decode_content(&content, &mut ring)
    }

    /// Decode one content root, consuming from `ring`.
    pub fn decode_content(&self, content: &ProtoReader, ring: &mut KeyRing) -> Vec<Attachment> {
        let mut walk = Walk {
            ring,
            stickers: &self.options.stickers,
            out: Vec::new(),
        };
        walk.content(content);
        tracing::debug!(
            attachments = walk.out.len(),
            cursor = walk.ring.cursor(),
            ring_len = walk.ring.len(),
            "content decoded"
        );
        walk.out
    }

    /// Decode a message and, first, the message it quotes.
    ///
    /// Quoted descriptors precede the message's own. A quoted message marked
    /// [`MessageKeys::Inherit`] draws from the quoting message's ring, ahead of
    /// the quoting message. A persisted quoted message always reads its own
    /// envelopes.
    pub fn decode_message(&self, message: &MessageContent) -> Vec<Attachment> {
        self.decode_message_with(message, None)
    }

    fn decode_message_with(&self, message: &MessageContent, inherited: Option<&mut KeyRing>) -> Vec<Attachment> {
        let payload = ProtoReader::new(message.content.clone());
        match &message.keys {
            MessageKeys::Supplied(ring) => {
                let mut ring = ring.clone();
                self.decode_scoped(message, Some(payload), &mut ring)
            }
            MessageKeys::Inherit => match inherited {
                Some(ring) => self.decode_scoped(message, Some(payload), ring),
                None => {
                    tracing::warn!("inheriting message decoded without a quoting ring");
                    self.decode_scoped(message, Some(payload), &mut KeyRing::default())
                }
            },
            MessageKeys::Persisted => {
                let mut ring = KeyRing::from_envelopes(&payload);
                let content = payload.descend(layout::envelope::CONTENT_ROOT);
                if content.is_none() {
                    tracing::debug!("no content root in persisted payload");
                }
                self.decode_scoped(message, content, &mut ring)
            }
        }
    }

    /// Quoted message first, then `content`, both against `ring`.
    fn decode_scoped(&self, message: &MessageContent, content: Option<ProtoReader>, ring: &mut KeyRing) -> Vec<Attachment> {
        let mut out = match message.quoted.as_deref() {
            Some(quoted) => self.decode_message_with(quoted, Some(&mut *ring)),
            None => Vec::new(),
        };
        if let Some(content) = content {
            out.extend(self.decode_content(&content, ring));
        }
        out
    }
}

/// Per-call traversal state: the shared cursor and the output list.
struct Walk<'a> {
    ring: &'a mut KeyRing,
    stickers: &'a StickerCatalog,
    out: Vec<Attachment>,
}

impl Walk<'_> {
    fn content(&mut self, root: &ProtoReader) {
        use crate::layout::content as c;

        root.for_each_repeated(c::EXTERNAL_MEDIA, c::EXTERNAL_MEDIA_ENTRY, |doc| {
            self.media_document(doc, AttachmentKind::ExternalMedia)
        });
        if let Some(section) = root.descend(c::STICKER) {
            self.stickers(&section);
        }
        if let Some(section) = root.descend(c::SHARE) {
            self.shares(&section);
        }
        if let Some(section) = root.descend(c::NOTE) {
            self.note(&section);
        }
        if let Some(section) = root.descend(c::STORY_REPLY) {
            self.story_reply(&section);
        }
        if let Some(doc) = root.descend(c::SNAP) {
            self.media_document(&doc, AttachmentKind::Snap);
        }
        if let Some(section) = root.descend(c::CREATIVE_TOOL) {
            self.creative_tool(&section);
        }
        if let Some(doc) = root.descend(c::MAP_REACTION) {
            self.media_document(&doc, AttachmentKind::ExternalMedia);
        }
    }

    fn push(&mut self, key: MediaKey, kind: AttachmentKind, info: Option<AttachmentInfo>) {
        self.out.push(Attachment { key, kind, info });
    }

    fn push_indirect(&mut self, key: Option<String>, kind: AttachmentKind, info: Option<AttachmentInfo>) {
        if let Some(key) = key {
            self.push(MediaKey::Indirect(key), kind, info);
        }
    }

    /// Media document: descend into its playback section, if any.
    fn media_document(&mut self, doc: &ProtoReader, kind: AttachmentKind) {
        if let Some(playback) = doc.descend(layout::media::PLAYBACK) {
            self.playback(&playback, kind);
        }
    }

    /// Consumes a key first; the descriptor is dropped when the metadata
    /// block is missing, but the key stays consumed.
    fn playback(&mut self, playback: &ProtoReader, kind: AttachmentKind) {
        let key = self.ring.take();
        let Some(metadata) = playback.descend(layout::media::METADATA) else {
            tracing::debug!(kind = kind.key(), "playback without metadata skipped");
            return;
        };
        self.push_indirect(key, kind, Some(resolve_metadata(&metadata)));
    }

    /// Top-level audio note: checks metadata before consuming.
    fn note(&mut self, section: &ProtoReader) {
        let Some(metadata) = section.descend(layout::media::METADATA) else {
            return;
        };
        let info = resolve_metadata(&metadata);
        let key = self.ring.take();
        self.push_indirect(key, AttachmentKind::Note, Some(info));
    }

    fn stickers(&mut self, section: &ProtoReader) {
        use crate::layout::sticker as s;

        if let Some(catalog) = section.descend(s::CATALOG) {
            self.catalog_sticker(&catalog);
        }
        if let Some(custom) = section.descend(s::CUSTOM) {
            let key = self.ring.take();
            let info = resolve_metadata(&custom);
            self.push_indirect(key, AttachmentKind::Sticker(StickerSource::Custom), Some(info));
        }
    }

    fn catalog_sticker(&mut self, scope: &ProtoReader) {
        use crate::layout::sticker as s;

        let Some(reference) = scope.string(s::REFERENCE) else {
            return;
        };
        let Some(pack_id) = scope.string(s::PACK_ID) else {
            tracing::debug!(%reference, "catalog sticker without pack id skipped");
            return;
        };
        let Some((pack, url)) = self.stickers.resolve(&pack_id, &reference) else {
            tracing::warn!(pack = %pack_id, %reference, "unresolvable sticker pack skipped");
            return;
        };
        self.push(
            MediaKey::Direct(url),
            AttachmentKind::Sticker(StickerSource::Catalog { pack, reference }),
            None,
        );
    }

    fn shares(&mut self, section: &ProtoReader) {
        use crate::layout::share as s;

        if let Some(doc) = section.descend(s::SAVED_STORY) {
            self.media_document(&doc, AttachmentKind::ExternalMedia);
        }
        section.for_each_repeated(s::MEMORIES, s::MEMORIES_ENTRY, |doc| {
            self.media_document(doc, AttachmentKind::ExternalMedia)
        });
    }

    fn story_reply(&mut self, section: &ProtoReader) {
        use crate::layout::story_reply as r;

        if let Some(doc) = section.descend(r::ORIGINAL_STORY) {
            self.media_document(&doc, AttachmentKind::OriginalStory);
        }
        section.for_each_repeated(r::EXTERNAL_MEDIA, r::EXTERNAL_MEDIA_ENTRY, |doc| {
            self.media_document(doc, AttachmentKind::ExternalMedia)
        });
        if let Some(stickers) = section.descend(r::STICKER) {
            self.stickers(&stickers);
        }
        if let Some(shares) = section.descend(r::SHARE) {
            self.shares(&shares);
        }
        // Unlike the top-level note this consumes before checking metadata.
        if let Some(playback) = section.descend(r::NOTE) {
            self.playback(&playback, AttachmentKind::Note);
        }
        if let Some(doc) = section.descend(r::SNAP) {
            self.media_document(&doc, AttachmentKind::Snap);
        }
    }

    fn creative_tool(&mut self, section: &ProtoReader) {
        use crate::layout::creative_tool as t;

        if let Some(sticker) = section.descend(t::CUSTOM_STICKER) {
            self.creative_sticker(&sticker);
        }
        if let Some(gifs) = section.descend(t::GIFS) {
            gifs.for_each_repeated(&[], t::GIF_ENTRY, |entry| {
                let Some(media) = entry.descend(t::GIF_MEDIA) else {
                    return;
                };
                match media.bytes(t::GIF_KEY) {
                    Some(raw) => self.push(MediaKey::Indirect(encode_token(&raw)), AttachmentKind::Gif, None),
                    None => tracing::debug!("gif without embedded key skipped"),
                }
            });
        }
    }

    fn creative_sticker(&mut self, sticker: &ProtoReader) {
        use crate::layout::creative_tool as t;

        let key = if sticker.contains(t::INLINE_KEY_MARKER) {
            match sticker.bytes(t::INLINE_KEY) {
                Some(raw) => Some(encode_token(&raw)),
                None => {
                    tracing::debug!("inline sticker key marker without key bytes");
                    return;
                }
            }
        } else {
            self.ring.take()
        };

        let encryption = resolve_key_pair(sticker, true).or_else(|| {
            sticker
                .descend(t::RAW_KEY_PAIR)
                .and_then(|pair| resolve_key_pair(&pair, false))
        });
        let info = AttachmentInfo {
            encryption,
            ..AttachmentInfo::default()
        };
        self.push_indirect(key, AttachmentKind::Sticker(StickerSource::Custom), Some(info));
    }
}
