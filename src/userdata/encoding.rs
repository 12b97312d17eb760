//! Output encoding for rendered user data
//!
//! Cloud APIs usually take user data base64 encoded, and cloud-init accepts
//! gzip compressed payloads, which helps with the 16 KiB user-data limit.

use crate::UserDataError;
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::Write;
use tracing::debug;

/// How to encode a rendered document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Encoding {
    pub gzip: bool,
    pub base64: bool,
}

/// Encode a rendered document, compressing before base64 encoding
pub fn encode(data: &[u8], encoding: Encoding) -> Result<Vec<u8>, UserDataError> {
    let mut output = data.to_vec();

    if encoding.gzip {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&output)?;
        output = encoder.finish()?;
        debug!("Compressed user data from {} to {} bytes", data.len(), output.len());
    }

    if encoding.base64 {
        output = BASE64.encode(&output).into_bytes();
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    const DOCUMENT: &[u8] = b"MIME-Version: 1.0\nContent-Type: multipart/mixed; boundary=\"//\"\n\n";

    #[test]
    fn test_plain_passthrough() {
        assert_eq!(encode(DOCUMENT, Encoding::default()).unwrap(), DOCUMENT);
    }

    #[test]
    fn test_base64() {
        let encoded = encode(
            b"hello",
            Encoding {
                gzip: false,
                base64: true,
            },
        )
        .unwrap();
        assert_eq!(encoded, b"aGVsbG8=");
    }

    #[test]
    fn test_gzip_then_base64() {
        let encoded = encode(
            DOCUMENT,
            Encoding {
                gzip: true,
                base64: true,
            },
        )
        .unwrap();

        let compressed = BASE64.decode(&encoded).unwrap();
        assert_eq!(&compressed[..2], &[0x1f, 0x8b]);

        let mut decoder = GzDecoder::new(compressed.as_slice());
        let mut decompressed = Vec::new();
        decoder.read_to_end(&mut decompressed).unwrap();
        assert_eq!(decompressed, DOCUMENT);
    }
}
