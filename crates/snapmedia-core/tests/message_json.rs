//! JSON message form end-to-end.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use serde_json::json;

use snapmedia_core::encoding::encode_token;
use snapmedia_core::proto::ProtoWriter;
use snapmedia_core::{AttachmentKind, Decoder, MediaKey, MessageContent};

fn signed(bytes: &[u8]) -> Vec<i8> {
    bytes.iter().map(|b| *b as i8).collect()
}

fn snap_content() -> Vec<u8> {
    let mut w = ProtoWriter::new();
    w.message(11, |snap| {
        snap.message(5, |p| {
            p.message(1, |a| {
                a.message(1, |m| {
                    m.message(5, |r| {
                        r.varint(1, 720).varint(2, 1280);
                    });
                });
            });
        });
    });
    w.finish().to_vec()
}

fn note_content() -> Vec<u8> {
    let mut w = ProtoWriter::new();
    w.message(6, |note| {
        note.message(1, |a| {
            a.message(1, |m| {
                m.varint(13, 3000);
            });
        });
    });
    w.finish().to_vec()
}

#[test]
fn quoted_snap_then_outer_note() {
    let message = json!({
        "mContent": signed(&note_content()),
        "mRemoteMediaReferences": [
            { "mMediaReferences": [ { "mMediaListId": 0, "mContentObject": signed(&[0xaa, 0xbb]) } ] }
        ],
        "mQuotedMessage": {
            "mContent": {
                "mContent": signed(&snap_content()),
                "mRemoteMediaReferences": [
                    { "mMediaReferences": [ { "mMediaListId": 0, "mContentObject": signed(&[0xcc]) } ] }
                ]
            }
        }
    });

    let content = MessageContent::from_json(&message.to_string()).unwrap();
    let out = Decoder::default().decode_message(&content);

    assert_eq!(out.len(), 2);
    assert_eq!(out[0].kind, AttachmentKind::Snap);
    assert_eq!(out[0].key, MediaKey::Indirect(encode_token(&[0xcc])));
    assert_eq!(out[0].info.as_ref().unwrap().resolution, Some((720, 1280)));
    assert_eq!(out[1].kind, AttachmentKind::Note);
    assert_eq!(out[1].key, MediaKey::Indirect(encode_token(&[0xaa, 0xbb])));
    assert_eq!(out[1].info.as_ref().unwrap().duration, Some(3000));
}

#[test]
fn json_form_without_references_drops_keyed_media() {
    let message = json!({ "mContent": signed(&snap_content()) });
    let content = MessageContent::from_json(&message.to_string()).unwrap();
    let out = Decoder::default().decode_message(&content);
    assert!(out.is_empty(), "no references means the snap has no key");
}

#[test]
fn descriptors_serialize_for_consumers() {
    let message = json!({
        "mContent": signed(&note_content()),
        "mRemoteMediaReferences": [
            { "mMediaReferences": [ { "mMediaListId": 0, "mContentObject": [1] } ] }
        ]
    });
    let content = MessageContent::from_json(&message.to_string()).unwrap();
    let out = Decoder::default().decode_message(&content);
    let v = serde_json::to_value(&out).unwrap();
    assert_eq!(v[0]["kind"], "note");
    assert_eq!(v[0]["key"]["type"], "indirect");
    assert_eq!(v[0]["info"]["duration"], 3000);

    let req = out[0].download_request(false);
    assert_eq!(req.attachment_type, "note");
    assert_eq!(req.content, encode_token(&[1]));
}
