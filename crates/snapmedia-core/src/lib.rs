//! snapmedia core: recover media attachments from schema-less message payloads.
//!
//! The payload is a tag/length/value buffer with no published schema. This
//! crate provides a fail-soft reader over it, the field-path table for each
//! content kind, and the decoder that turns a payload (plus its Key Ring) into
//! an ordered list of attachment descriptors. It performs no I/O.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Malformed input shrinks the decoded output; it never aborts a decode.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod attachment;
pub mod catalog;
pub mod content;
pub mod decoder;
pub mod encoding;
pub mod error;
pub mod fetch;
pub mod keys;
pub mod layout;
pub mod message;
pub mod proto;

pub use attachment::{Attachment, AttachmentInfo, AttachmentKind, MediaKey, StickerPack, StickerSource};
pub use decoder::{decode, decode_with_key_ring, DecodeOptions, Decoder};
/// Shared result type.
pub use error::{Result, SnapMediaError};
pub use keys::{EncryptionKeyPair, KeyRing};
pub use message::{MessageContent, MessageKeys};
