//! MIME multipart framing for nodeadm user data
//!
//! Writes the multipart envelope header and splits rendered documents back
//! into their parts for inspection.

use super::types::ContentType;
use crate::UserDataError;
use std::collections::HashMap;
use std::fmt::Write;
use tracing::debug;

/// Boundary used when the caller does not provide one
pub const DEFAULT_BOUNDARY: &str = "//";

/// One part of a rendered user-data document
#[derive(Debug, Clone)]
pub struct MimePart {
    pub content_type: ContentType,
    /// `Content-Type` header as written, parameters included
    pub mime_type: String,
    /// Body after the blank line that ends the part headers
    pub content: String,
    /// `filename` parameter of `Content-Disposition`, if any
    pub filename: Option<String>,
    /// Part headers keyed by lowercased name
    pub headers: HashMap<String, String>,
}

/// Write the multipart envelope header that precedes every part
pub fn write_envelope_header(out: &mut String, boundary: &str) {
    // Writing into a String cannot fail
    let _ = write!(
        out,
        "MIME-Version: 1.0\nContent-Type: multipart/mixed; boundary={:?}\n\n",
        boundary
    );
}

/// Split a rendered document back into its parts
///
/// A close marker (`--boundary--`) may follow any part, not only the last
/// one. The text between a close marker and the next delimiter is dropped.
pub fn parse_multipart(document: &str) -> Result<Vec<MimePart>, UserDataError> {
    let boundary = envelope_boundary(document).ok_or_else(|| {
        UserDataError::InvalidData("document has no multipart boundary".to_string())
    })?;
    debug!("Splitting user data on boundary {:?}", boundary);

    let delimiter = format!("--{}", boundary);
    let parts: Vec<MimePart> = document
        .split(delimiter.as_str())
        .skip(1)
        .filter(|section| {
            let section = section.trim();
            !section.is_empty() && !section.starts_with("--")
        })
        .map(|section| read_part(section.trim_start_matches(['\r', '\n'])))
        .collect();

    debug!("Found {} parts", parts.len());
    Ok(parts)
}

/// Boundary declared in the envelope headers
fn envelope_boundary(document: &str) -> Option<String> {
    document
        .lines()
        .take_while(|line| !line.trim().is_empty())
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-type"))
        .and_then(|(_, value)| header_param(value, "boundary"))
}

/// Read the headers and body of a single part
fn read_part(section: &str) -> MimePart {
    let (head, body) = section
        .split_once("\r\n\r\n")
        .or_else(|| section.split_once("\n\n"))
        .unwrap_or(("", section));

    let headers: HashMap<String, String> = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_lowercase(), value.trim().to_string()))
        .collect();

    let mime_type = headers
        .get("content-type")
        .map_or("text/plain", String::as_str)
        .to_string();
    let filename = headers
        .get("content-disposition")
        .and_then(|value| header_param(value, "filename"));

    MimePart {
        content_type: ContentType::from_mime(&mime_type),
        mime_type,
        content: body.to_string(),
        filename,
        headers,
    }
}

/// Value of a `name=value` header parameter, quoted or bare
fn header_param(value: &str, name: &str) -> Option<String> {
    value.split(';').find_map(|param| {
        let (key, raw) = param.trim().split_once('=')?;
        if !key.trim().eq_ignore_ascii_case(name) {
            return None;
        }
        let raw = raw.trim();
        let unquoted = match raw.strip_prefix('"') {
            Some(quoted) => &quoted[..quoted.find('"')?],
            None => raw,
        };
        Some(unquoted.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_envelope_header() {
        let mut out = String::new();
        write_envelope_header(&mut out, DEFAULT_BOUNDARY);
        assert_eq!(
            out,
            "MIME-Version: 1.0\nContent-Type: multipart/mixed; boundary=\"//\"\n\n"
        );
    }

    #[test]
    fn test_parse_with_mid_document_close_marker() {
        let data = r#"MIME-Version: 1.0
Content-Type: multipart/mixed; boundary="//"


--//
Content-Type: text/x-shellscript; charset="us-ascii"
Content-Disposition: attachment; filename="commands.sh"

#!/bin/bash
echo hello
--//--

--//
Content-Type: application/node.eks.aws

---
kind: NodeConfig

--//--"#;

        let parts = parse_multipart(data).unwrap();
        assert_eq!(parts.len(), 2);

        assert_eq!(parts[0].content_type, ContentType::Script);
        assert_eq!(parts[0].filename.as_deref(), Some("commands.sh"));
        assert!(parts[0].content.contains("echo hello"));

        assert_eq!(parts[1].content_type, ContentType::NodeConfig);
        assert!(parts[1].content.contains("kind: NodeConfig"));
    }

    #[test]
    fn test_envelope_boundary() {
        assert_eq!(
            envelope_boundary("MIME-Version: 1.0\nContent-Type: multipart/mixed; boundary=\"==B==\"\n\n"),
            Some("==B==".to_string())
        );
        assert_eq!(
            envelope_boundary("content-type: multipart/mixed; boundary=plain\n"),
            Some("plain".to_string())
        );
        // Only the envelope headers are searched
        assert_eq!(
            envelope_boundary("MIME-Version: 1.0\n\nContent-Type: multipart/mixed; boundary=x"),
            None
        );
    }

    #[test]
    fn test_parse_without_boundary() {
        let result = parse_multipart("Content-Type: text/plain\n\nbody");
        assert!(matches!(result, Err(UserDataError::InvalidData(_))));
    }

    #[test]
    fn test_header_param() {
        assert_eq!(
            header_param("attachment; filename=\"cloud-config.yaml\"", "filename"),
            Some("cloud-config.yaml".to_string())
        );
        assert_eq!(
            header_param("attachment; FILENAME=commands.sh", "filename"),
            Some("commands.sh".to_string())
        );
        assert_eq!(header_param("text/x-shellscript; charset=\"us-ascii\"", "filename"), None);
    }
}
