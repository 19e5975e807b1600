//! Structured Reader: schema-free access to tag/length/value payloads.
//!
//! - `wire`: varint / zigzag / fixed primitives and the field iterator.
//! - `reader`: path-addressed, fail-soft navigation (`ProtoReader`).
//! - `writer`: a small encoder for building payloads.
//!
//! Nothing here knows about attachments. All parsing is panic-free: malformed
//! input shrinks what is visible instead of raising.

pub mod reader;
pub mod wire;
pub mod writer;

pub use reader::ProtoReader;
pub use writer::ProtoWriter;
