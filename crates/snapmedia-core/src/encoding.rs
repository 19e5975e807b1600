//! Base64 helpers for key tokens and key material.
//!
//! Tokens are emitted URL-safe with padding. Decoding accepts either alphabet,
//! padded or not, because key pairs embedded in payloads are not consistent
//! about which one they use.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, URL_SAFE};
use base64::engine::DecodePaddingMode;
use base64::Engine;

const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);

/// URL-safe, padded.
pub fn encode_token(raw: &[u8]) -> String {
    URL_SAFE.encode(raw)
}

/// Decode text in either base64 alphabet; `None` if neither accepts it.
pub fn decode_lenient(text: &str) -> Option<Vec<u8>> {
    URL_SAFE_LENIENT
        .decode(text)
        .or_else(|_| STANDARD_LENIENT.decode(text))
        .ok()
}

/// Serde adapter storing byte vectors as URL-safe base64 strings.
pub mod serde_token {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(raw: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::encode_token(raw))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(d)?;
        super::decode_lenient(&text).ok_or_else(|| serde::de::Error::custom("invalid base64"))
    }
}
