//! Content type detection and message text extraction.

use serde::Serialize;

use crate::proto::ProtoReader;

/// Message content types with the platform's numeric ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentType {
    Unknown,
    Snap,
    Chat,
    ExternalMedia,
    Share,
    Note,
    Sticker,
    Status,
    Location,
    StatusSaveToCameraRoll,
    StatusConversationCaptureScreenshot,
    StatusConversationCaptureRecord,
    StatusCallMissedVideo,
    StatusCallMissedAudio,
    LiveLocationShare,
    CreativeToolItem,
    FamilyCenterInvite,
    FamilyCenterAccept,
    FamilyCenterLeave,
    StatusPlusGift,
    TinySnap,
}

const BY_ID: [ContentType; 20] = [
    ContentType::Snap,
    ContentType::Chat,
    ContentType::ExternalMedia,
    ContentType::Share,
    ContentType::Note,
    ContentType::Sticker,
    ContentType::Status,
    ContentType::Location,
    ContentType::StatusSaveToCameraRoll,
    ContentType::StatusConversationCaptureScreenshot,
    ContentType::StatusConversationCaptureRecord,
    ContentType::StatusCallMissedVideo,
    ContentType::StatusCallMissedAudio,
    ContentType::LiveLocationShare,
    ContentType::CreativeToolItem,
    ContentType::FamilyCenterInvite,
    ContentType::FamilyCenterAccept,
    ContentType::FamilyCenterLeave,
    ContentType::StatusPlusGift,
    ContentType::TinySnap,
];

/// Presence fork on the content root: first listed field present wins.
const PRESENCE_ORDER: [(u32, ContentType); 9] = [
    (8, ContentType::Status),
    (2, ContentType::Chat),
    (11, ContentType::Snap),
    (6, ContentType::Note),
    (3, ContentType::ExternalMedia),
    (4, ContentType::Sticker),
    (5, ContentType::Share),
    // story replies are shown as external media
    (7, ContentType::ExternalMedia),
    (14, ContentType::CreativeToolItem),
];

impl ContentType {
    pub fn id(self) -> i32 {
        BY_ID
            .iter()
            .position(|t| *t == self)
            .and_then(|i| i32::try_from(i).ok())
            .unwrap_or(-1)
    }

    pub fn from_id(id: i32) -> Self {
        usize::try_from(id)
            .ok()
            .and_then(|i| BY_ID.get(i).copied())
            .unwrap_or(ContentType::Unknown)
    }

    /// Infer the type from which content kinds are present.
    pub fn from_content(root: &ProtoReader) -> Option<Self> {
        PRESENCE_ORDER
            .iter()
            .find(|(field, _)| root.contains(*field))
            .map(|(_, t)| *t)
    }
}

/// Human-readable text of a message, when its type carries any.
///
/// Snaps yield their captions, one per line.
pub fn message_text(root: &ProtoReader, content_type: ContentType) -> Option<String> {
    use crate::layout::text as t;

    match content_type {
        ContentType::Chat => root.string(t::CHAT),
        ContentType::TinySnap => root.string(t::TINY_SNAP),
        ContentType::ExternalMedia => root.string(t::EXTERNAL_MEDIA),
        ContentType::Snap => {
            let overlays = root.descend(t::SNAP_OVERLAYS)?;
            let mut captions = Vec::new();
            overlays.for_each_repeated(&[], t::SNAP_OVERLAY_ENTRY, |entry| {
                if let Some(caption) = entry
                    .descend(t::SNAP_CAPTION_BLOCK)
                    .and_then(|block| block.string(t::SNAP_CAPTION))
                {
                    captions.push(caption);
                }
            });
            (!captions.is_empty()).then(|| captions.join("\n"))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::proto::ProtoWriter;

    #[test]
    fn ids_round_trip_known_values() {
        assert_eq!(ContentType::from_id(0), ContentType::Snap);
        assert_eq!(ContentType::from_id(1), ContentType::Chat);
        assert_eq!(ContentType::from_id(19), ContentType::TinySnap);
        assert_eq!(ContentType::from_id(99), ContentType::Unknown);
        assert_eq!(ContentType::from_id(-5), ContentType::Unknown);
        assert_eq!(ContentType::CreativeToolItem.id(), 14);
        assert_eq!(ContentType::Unknown.id(), -1);
    }

    #[test]
    fn presence_fork_prefers_status_then_chat() {
        let mut w = ProtoWriter::new();
        w.message(11, |_| {}).message(2, |_| {});
        let r = ProtoReader::new(w.finish());
        assert_eq!(ContentType::from_content(&r), Some(ContentType::Chat));

        let mut w = ProtoWriter::new();
        w.message(7, |_| {});
        let r = ProtoReader::new(w.finish());
        assert_eq!(ContentType::from_content(&r), Some(ContentType::ExternalMedia));

        assert_eq!(ContentType::from_content(&ProtoReader::default()), None);
    }

    #[test]
    fn creative_tool_item_is_last_in_the_fork() {
        let mut w = ProtoWriter::new();
        w.message(14, |_| {});
        let r = ProtoReader::new(w.finish());
        assert_eq!(ContentType::from_content(&r), Some(ContentType::CreativeToolItem));

        let mut w = ProtoWriter::new();
        w.message(14, |_| {}).message(5, |_| {});
        let r = ProtoReader::new(w.finish());
        assert_eq!(ContentType::from_content(&r), Some(ContentType::Share));
    }

    #[test]
    fn chat_text() {
        let mut w = ProtoWriter::new();
        w.message(2, |m| {
            m.string(1, "hi there");
        });
        let r = ProtoReader::new(w.finish());
        assert_eq!(message_text(&r, ContentType::Chat).as_deref(), Some("hi there"));
        assert!(message_text(&r, ContentType::Note).is_none());
    }

    #[test]
    fn snap_captions_are_joined() {
        let mut w = ProtoWriter::new();
        w.message(11, |snap| {
            snap.message(5, |overlays| {
                for caption in ["first", "second"] {
                    overlays.message(1, |entry| {
                        entry.message(4, |block| {
                            block.message(3, |a| {
                                a.message(2, |b| {
                                    b.string(1, caption);
                                });
                            });
                        });
                    });
                }
                overlays.message(1, |_| {});
            });
        });
        let r = ProtoReader::new(w.finish());
        assert_eq!(message_text(&r, ContentType::Snap).as_deref(), Some("first\nsecond"));
    }
}
