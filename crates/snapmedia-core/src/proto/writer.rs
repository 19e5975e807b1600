//! Minimal tag/length/value encoder, used to build payloads in tests and tooling.

use bytes::{BufMut, Bytes, BytesMut};

use super::wire::{zigzag_encode, WireKind};

#[derive(Debug, Default)]
pub struct ProtoWriter {
    buf: BytesMut,
}

fn put_varint(buf: &mut BytesMut, mut value: u64) {
    while value >= 0x80 {
        buf.put_u8((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    buf.put_u8(value as u8);
}

impl ProtoWriter {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(&mut self, number: u32, kind: WireKind) {
        put_varint(&mut self.buf, (u64::from(number) << 3) | kind.bits());
    }

    pub fn varint(&mut self, number: u32, value: u64) -> &mut Self {
        self.key(number, WireKind::Varint);
        put_varint(&mut self.buf, value);
        self
    }

    pub fn sint64(&mut self, number: u32, value: i64) -> &mut Self {
        self.varint(number, zigzag_encode(value))
    }

    pub fn fixed32(&mut self, number: u32, value: u32) -> &mut Self {
        self.key(number, WireKind::Fixed32);
        self.buf.put_u32_le(value);
        self
    }

    pub fn fixed64(&mut self, number: u32, value: u64) -> &mut Self {
        self.key(number, WireKind::Fixed64);
        self.buf.put_u64_le(value);
        self
    }

    pub fn bytes(&mut self, number: u32, value: &[u8]) -> &mut Self {
        self.key(number, WireKind::LengthDelimited);
        put_varint(&mut self.buf, value.len() as u64);
        self.buf.put_slice(value);
        self
    }

    pub fn string(&mut self, number: u32, value: &str) -> &mut Self {
        self.bytes(number, value.as_bytes())
    }

    /// Encode a nested message built by `build`.
    pub fn message(&mut self, number: u32, build: impl FnOnce(&mut ProtoWriter)) -> &mut Self {
        let mut inner = ProtoWriter::new();
        build(&mut inner);
        let inner = inner.finish();
        self.bytes(number, &inner)
    }

    pub fn finish(self) -> Bytes {
        self.buf.freeze()
    }
}
