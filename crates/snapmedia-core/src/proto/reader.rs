//! Schema-less, path-addressed view over a tag/length/value buffer.
//!
//! Every accessor fails soft: a missing path segment, a truncated buffer or a
//! leaf of the wrong wire kind all read as `None`. Unknown field paths are
//! expected in this format and are never an error.
//!
//! Paths are slices of field numbers. For typed accessors the last number is
//! the leaf inside the message reached by the preceding ones. When a number
//! repeats inside a scope, navigation follows the first occurrence.

use bytes::Bytes;

use super::wire::{Field, FieldIter, WireValue};

#[derive(Debug, Clone, Default)]
pub struct ProtoReader {
    fields: Vec<Field>,
}

impl ProtoReader {
    /// Parse one message scope. Parsing stops at the first malformed field.
    pub fn new(buf: impl Into<Bytes>) -> Self {
        Self {
            fields: FieldIter::new(buf.into()).collect(),
        }
    }

    /// All fields of this scope, in buffer order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Presence test in the current scope, without decoding the value.
    pub fn contains(&self, number: u32) -> bool {
        self.fields.iter().any(|f| f.number == number)
    }

    fn first(&self, number: u32) -> Option<&WireValue> {
        self.fields
            .iter()
            .find(|f| f.number == number)
            .map(|f| &f.value)
    }

    fn first_message(&self, number: u32) -> Option<ProtoReader> {
        match self.first(number)? {
            WireValue::LengthDelimited(b) => Some(ProtoReader::new(b.clone())),
            _ => None,
        }
    }

    /// Scope into the sub-message reached by `path`. An empty path yields a
    /// copy of this scope.
    pub fn descend(&self, path: &[u32]) -> Option<ProtoReader> {
        let Some((head, rest)) = path.split_first() else {
            return Some(self.clone());
        };
        let mut current = self.first_message(*head)?;
        for number in rest {
            current = current.first_message(*number)?;
        }
        Some(current)
    }

    fn leaf(&self, path: &[u32]) -> Option<WireValue> {
        let (last, parent) = path.split_last()?;
        if parent.is_empty() {
            return self.first(*last).cloned();
        }
        self.descend(parent)?.first(*last).cloned()
    }

    pub fn varint(&self, path: &[u32]) -> Option<u64> {
        match self.leaf(path)? {
            WireValue::Varint(v) => Some(v),
            _ => None,
        }
    }

    /// Zigzag-decoded varint (`sint64` fields).
    pub fn sint64(&self, path: &[u32]) -> Option<i64> {
        self.varint(path).map(super::wire::zigzag_decode)
    }

    /// Raw 32-bit pattern; callers reinterpret (e.g. `f32::from_bits`).
    pub fn fixed32(&self, path: &[u32]) -> Option<u32> {
        match self.leaf(path)? {
            WireValue::Fixed32(v) => Some(v),
            _ => None,
        }
    }

    pub fn fixed64(&self, path: &[u32]) -> Option<u64> {
        match self.leaf(path)? {
            WireValue::Fixed64(v) => Some(v),
            _ => None,
        }
    }

    /// A 64-bit value stored as two fixed32 component fields: `high` holds
    /// the upper half, `low` the lower half. `None` unless both are present.
    pub fn fixed64_pair(&self, high: &[u32], low: &[u32]) -> Option<u64> {
        let high = self.fixed32(high)?;
        let low = self.fixed32(low)?;
        Some((u64::from(high) << 32) | u64::from(low))
    }

    pub fn bytes(&self, path: &[u32]) -> Option<Bytes> {
        match self.leaf(path)? {
            WireValue::LengthDelimited(b) => Some(b),
            _ => None,
        }
    }

    /// Length-delimited leaf decoded as UTF-8; invalid text reads as absent.
    pub fn string(&self, path: &[u32]) -> Option<String> {
        let raw = self.bytes(path)?;
        String::from_utf8(raw.to_vec()).ok()
    }

    /// Invoke `body` once per occurrence of `leaf` inside the message reached
    /// by `path`, in buffer order. Non length-delimited occurrences are skipped.
    pub fn for_each_repeated(&self, path: &[u32], leaf: u32, mut body: impl FnMut(&ProtoReader)) {
        let Some(scope) = self.descend(path) else {
            return;
        };
        for field in scope.fields.iter().filter(|f| f.number == leaf) {
            if let WireValue::LengthDelimited(b) = &field.value {
                body(&ProtoReader::new(b.clone()));
            }
        }
    }
}
