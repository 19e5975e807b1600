//! Tag/length/value wire primitives (panic-free).
//!
//! Parsing rules:
//! - Never index (`buf[0]`); use `Buf` and `remaining()` checks.
//! - Every malformed primitive resolves to `None`; the caller decides what
//!   "absent" means.

use bytes::{Buf, Bytes};

/// Longest legal varint encoding of a `u64`.
pub const MAX_VARINT_LEN: usize = 10;

/// Largest field number the key varint may carry.
pub const MAX_FIELD_NUMBER: u64 = (1 << 29) - 1;

/// Wire kind stored in the low three bits of a field key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireKind {
    Varint,
    Fixed64,
    LengthDelimited,
    Fixed32,
}

impl WireKind {
    /// Map the key's low bits to a kind. Group kinds (3, 4) are not supported.
    pub fn from_bits(bits: u64) -> Option<Self> {
        match bits {
            0 => Some(WireKind::Varint),
            1 => Some(WireKind::Fixed64),
            2 => Some(WireKind::LengthDelimited),
            5 => Some(WireKind::Fixed32),
            _ => None,
        }
    }

    pub fn bits(self) -> u64 {
        match self {
            WireKind::Varint => 0,
            WireKind::Fixed64 => 1,
            WireKind::LengthDelimited => 2,
            WireKind::Fixed32 => 5,
        }
    }
}

/// Raw, uninterpreted field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireValue {
    Varint(u64),
    Fixed64(u64),
    /// Zero-copy slice of the parent buffer.
    LengthDelimited(Bytes),
    Fixed32(u32),
}

impl WireValue {
    pub fn kind(&self) -> WireKind {
        match self {
            WireValue::Varint(_) => WireKind::Varint,
            WireValue::Fixed64(_) => WireKind::Fixed64,
            WireValue::LengthDelimited(_) => WireKind::LengthDelimited,
            WireValue::Fixed32(_) => WireKind::Fixed32,
        }
    }
}

/// One (field number, value) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub number: u32,
    pub value: WireValue,
}

/// Decode a base-128 varint, advancing `buf`.
pub fn read_varint(buf: &mut Bytes) -> Option<u64> {
    let mut value = 0u64;
    for i in 0..MAX_VARINT_LEN {
        if !buf.has_remaining() {
            return None;
        }
        let byte = buf.get_u8();
        value |= u64::from(byte & 0x7f) << (7 * i);
        if byte & 0x80 == 0 {
            return Some(value);
        }
    }
    None
}

/// Zigzag-decode a signed varint (`sint32`/`sint64`).
pub fn zigzag_decode(raw: u64) -> i64 {
    ((raw >> 1) as i64) ^ -((raw & 1) as i64)
}

/// Zigzag-encode a signed integer.
pub fn zigzag_encode(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

/// Decode one field (key + value), advancing `buf`.
///
/// Returns `None` on a zero/oversized field number, an unsupported wire kind,
/// or a value that runs past the end of the buffer.
pub fn read_field(buf: &mut Bytes) -> Option<Field> {
    let key = read_varint(buf)?;
    let number = key >> 3;
    if number == 0 || number > MAX_FIELD_NUMBER {
        return None;
    }
    let number = u32::try_from(number).ok()?;

    let value = match WireKind::from_bits(key & 0x07)? {
        WireKind::Varint => WireValue::Varint(read_varint(buf)?),
        WireKind::Fixed64 => {
            if buf.remaining() < 8 {
                return None;
            }
            WireValue::Fixed64(buf.get_u64_le())
        }
        WireKind::LengthDelimited => {
            let len = usize::try_from(read_varint(buf)?).ok()?;
            if len > buf.remaining() {
                return None;
            }
            WireValue::LengthDelimited(buf.split_to(len))
        }
        WireKind::Fixed32 => {
            if buf.remaining() < 4 {
                return None;
            }
            WireValue::Fixed32(buf.get_u32_le())
        }
    };

    Some(Field { number, value })
}

/// Iterates the fields of one message scope, stopping at the first malformed
/// field. Fields before the damage are still yielded.
#[derive(Debug, Clone)]
pub struct FieldIter {
    buf: Bytes,
}

impl FieldIter {
    pub fn new(buf: Bytes) -> Self {
        Self { buf }
    }
}

impl Iterator for FieldIter {
    type Item = Field;

    fn next(&mut self) -> Option<Field> {
        if !self.buf.has_remaining() {
            return None;
        }
        match read_field(&mut self.buf) {
            Some(field) => Some(field),
            None => {
                tracing::trace!(left = self.buf.remaining(), "malformed field, scope truncated");
                self.buf.clear();
                None
            }
        }
    }
}
