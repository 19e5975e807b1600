//! Consumer-side stream plumbing.
//!
//! Resolving indirect keys, opening URLs and decrypting are owned by the
//! download layer; this module only routes a descriptor to the right
//! collaborator and applies the decrypt wrapper when key material exists.

use std::io::Read;

use crate::attachment::{Attachment, MediaKey};
use crate::encoding::decode_lenient;
use crate::error::{Result, SnapMediaError};
use crate::keys::EncryptionKeyPair;

pub type MediaStream = Box<dyn Read + Send>;

/// Source of attachment bytes.
pub trait MediaFetcher {
    /// Exchange raw indirect-key bytes for the media stream.
    fn fetch_indirect(&self, key: &[u8]) -> Result<MediaStream>;

    fn fetch_url(&self, url: &str) -> Result<MediaStream>;
}

/// Wraps an encrypted stream with its decrypting reader.
pub trait StreamDecryptor {
    fn decrypt(&self, pair: &EncryptionKeyPair, stream: MediaStream) -> Result<MediaStream>;
}

/// Passes streams through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDecrypt;

impl StreamDecryptor for NoDecrypt {
    fn decrypt(&self, _pair: &EncryptionKeyPair, stream: MediaStream) -> Result<MediaStream> {
        Ok(stream)
    }
}

impl Attachment {
    /// Open the attachment's byte stream, decrypted when it carries a key pair.
    pub fn open_stream(
        &self,
        fetcher: &dyn MediaFetcher,
        decryptor: &dyn StreamDecryptor,
    ) -> Result<MediaStream> {
        let stream = match &self.key {
            MediaKey::Indirect(token) => {
                let raw = decode_lenient(token)
                    .ok_or_else(|| SnapMediaError::BadInput("indirect key is not base64".into()))?;
                fetcher.fetch_indirect(&raw)?
            }
            MediaKey::Direct(url) => fetcher.fetch_url(url)?,
        };
        match self.encryption() {
            Some(pair) => decryptor.decrypt(pair, stream),
            None => Ok(stream),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::io::Cursor;

    use super::*;
    use crate::attachment::{AttachmentInfo, AttachmentKind};
    use crate::encoding::encode_token;

    struct Fixed;

    impl MediaFetcher for Fixed {
        fn fetch_indirect(&self, key: &[u8]) -> Result<MediaStream> {
            Ok(Box::new(Cursor::new(key.to_vec())))
        }

        fn fetch_url(&self, url: &str) -> Result<MediaStream> {
            if url.starts_with("https://") {
                Ok(Box::new(Cursor::new(url.as_bytes().to_vec())))
            } else {
                Err(SnapMediaError::FetchFailed(url.to_owned()))
            }
        }
    }

    /// XORs every byte with the first key byte.
    struct Xor;

    impl StreamDecryptor for Xor {
        fn decrypt(&self, pair: &EncryptionKeyPair, mut stream: MediaStream) -> Result<MediaStream> {
            let mask = pair.key.first().copied().unwrap_or(0);
            let mut buf = Vec::new();
            stream.read_to_end(&mut buf)?;
            Ok(Box::new(Cursor::new(buf.into_iter().map(|b| b ^ mask).collect::<Vec<_>>())))
        }
    }

    fn read_all(mut s: MediaStream) -> Vec<u8> {
        let mut out = Vec::new();
        s.read_to_end(&mut out).unwrap();
        out
    }

    #[test]
    fn indirect_key_is_decoded_and_decrypted() {
        let a = Attachment {
            key: MediaKey::Indirect(encode_token(&[1, 2, 3])),
            kind: AttachmentKind::Snap,
            info: Some(AttachmentInfo {
                encryption: Some(EncryptionKeyPair { key: vec![0xff], iv: vec![0] }),
                ..AttachmentInfo::default()
            }),
        };
        let out = read_all(a.open_stream(&Fixed, &Xor).unwrap());
        assert_eq!(out, vec![0xfe, 0xfd, 0xfc]);
    }

    #[test]
    fn unencrypted_direct_url_is_untouched() {
        let a = Attachment {
            key: MediaKey::Direct("https://x".into()),
            kind: AttachmentKind::Gif,
            info: None,
        };
        assert_eq!(read_all(a.open_stream(&Fixed, &Xor).unwrap()), b"https://x".to_vec());
    }

    #[test]
    fn fetch_errors_propagate() {
        let a = Attachment {
            key: MediaKey::Direct("ftp://x".into()),
            kind: AttachmentKind::Gif,
            info: None,
        };
        let err = a.open_stream(&Fixed, &NoDecrypt).err().unwrap();
        assert_eq!(err.code().as_str(), "FETCH_FAILED");
    }
}
