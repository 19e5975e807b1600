//! Field-number paths of the message payload, and what each one means.
//!
//! The payload has no published schema. Every path the decoder reads lives
//! here so the mapping can be audited in one place. Paths are relative to the
//! scope named in each module's doc line.

/// Persisted (binary) form, relative to the payload root.
pub mod envelope {
    /// Section holding the media envelopes.
    pub const MEDIA_ENVELOPES: &[u32] = &[4];
    /// Repeated envelope entry inside [`MEDIA_ENVELOPES`].
    pub const ENVELOPE_ENTRY: u32 = 5;
    /// Indirect-key bytes inside one envelope entry.
    pub const ENVELOPE_KEY: &[u32] = &[1, 3];
    /// Canonical content root.
    pub const CONTENT_ROOT: &[u32] = &[4, 4];
}

/// Relative to the content root.
pub mod content {
    pub const EXTERNAL_MEDIA: &[u32] = &[3];
    pub const EXTERNAL_MEDIA_ENTRY: u32 = 3;
    pub const STICKER: &[u32] = &[4];
    pub const SHARE: &[u32] = &[5];
    pub const NOTE: &[u32] = &[6];
    pub const STORY_REPLY: &[u32] = &[7];
    pub const SNAP: &[u32] = &[11];
    pub const CREATIVE_TOOL: &[u32] = &[14, 2, 2];
    pub const MAP_REACTION: &[u32] = &[20, 2];
}

/// Relative to a media document (external media entry, snap, story...).
pub mod media {
    /// Playback section; presence means the document carries a keyed medium.
    pub const PLAYBACK: &[u32] = &[5];
    /// Metadata block inside a playback section.
    pub const METADATA: &[u32] = &[1, 1];
}

/// Relative to a metadata block.
pub mod metadata {
    /// Key pair stored as base64 text.
    pub const ENCODED_KEY_PAIR: &[u32] = &[4];
    /// Key pair stored as raw bytes.
    pub const RAW_KEY_PAIR: &[u32] = &[19];
    pub const RESOLUTION: &[u32] = &[5];
    pub const WIDTH: &[u32] = &[1];
    pub const HEIGHT: &[u32] = &[2];
    /// Duration of external media.
    pub const DURATION: &[u32] = &[15];
    /// Duration of audio notes.
    pub const NOTE_DURATION: &[u32] = &[13];
}

/// Relative to a key pair block.
pub mod key_pair {
    pub const KEY: &[u32] = &[1];
    pub const IV: &[u32] = &[2];
}

/// Relative to a sticker section.
pub mod sticker {
    pub const CATALOG: &[u32] = &[1];
    pub const PACK_ID: &[u32] = &[1];
    pub const REFERENCE: &[u32] = &[2];
    pub const CUSTOM: &[u32] = &[2, 1];
}

/// Relative to a share section.
pub mod share {
    pub const SAVED_STORY: &[u32] = &[24, 2];
    pub const MEMORIES: &[u32] = &[11];
    pub const MEMORIES_ENTRY: u32 = 3;
}

/// Relative to a story reply section.
pub mod story_reply {
    pub const ORIGINAL_STORY: &[u32] = &[3];
    pub const EXTERNAL_MEDIA: &[u32] = &[12];
    pub const EXTERNAL_MEDIA_ENTRY: u32 = 3;
    pub const STICKER: &[u32] = &[13];
    pub const SHARE: &[u32] = &[14];
    /// Attached note: a playback section directly, no [`super::media::PLAYBACK`] hop.
    pub const NOTE: &[u32] = &[15];
    pub const SNAP: &[u32] = &[17];
}

/// Relative to a creative-tool section.
pub mod creative_tool {
    pub const CUSTOM_STICKER: &[u32] = &[3];
    /// Presence of this field selects the inline-key encoding.
    pub const INLINE_KEY_MARKER: u32 = 4;
    pub const INLINE_KEY: &[u32] = &[4, 4];
    /// Fallback key pair (raw bytes) when none sits in the sticker scope itself.
    pub const RAW_KEY_PAIR: &[u32] = &[5];
    pub const GIFS: &[u32] = &[13];
    pub const GIF_ENTRY: u32 = 4;
    pub const GIF_MEDIA: &[u32] = &[2];
    pub const GIF_KEY: &[u32] = &[4];
}

/// Relative to a decoded indirect-key token.
pub mod key_token {
    /// `<media id>.<suffix>` string.
    pub const MEDIA_ID: &[u32] = &[2, 2];
}

/// Text-bearing fields, relative to the content root.
pub mod text {
    pub const CHAT: &[u32] = &[2, 1];
    pub const TINY_SNAP: &[u32] = &[19, 1, 1];
    pub const EXTERNAL_MEDIA: &[u32] = &[7, 11, 1];
    /// Snap overlay list; each entry holds its caption under [`SNAP_CAPTION`].
    pub const SNAP_OVERLAYS: &[u32] = &[11, 5];
    pub const SNAP_OVERLAY_ENTRY: u32 = 1;
    pub const SNAP_CAPTION_BLOCK: &[u32] = &[4];
    pub const SNAP_CAPTION: &[u32] = &[3, 2, 1];
}
