//! Response body decoding
//!
//! The server announces how body lines are transformed through a
//! `colenc=<code>` parameter on the content-type header: `B` (base64),
//! `Q` (quoted-printable), `U` (URL percent-encoding), or no parameter at all
//! (raw). Each non-empty line decodes as a whole, then splits on the first
//! tab into a key and a value.
//!
//! Everything here is pure: header string in, scheme out; bytes in, ordered
//! pairs out.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use percent_encoding::percent_decode;

use crate::error::{Result, TycoonError};

use super::params::Params;

/// Body line transformation scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColEnc {
    /// No transformation; lines are raw `key\tvalue` text
    Raw,

    /// `colenc=B`: each line is standard base64
    Base64,

    /// `colenc=Q`: each line is quoted-printable
    QuotedPrintable,

    /// `colenc=U`: each line is URL percent-encoded
    Url,
}

/// Extract the colenc scheme from a content-type header value.
///
/// Absence of the marker, or an unknown code, means raw. The marker is a
/// trailing `colenc=<X>` parameter, e.g.
/// `text/tab-separated-values; colenc=B`.
pub fn parse_colenc(content_type: &str) -> ColEnc {
    for param in content_type.split(';').skip(1) {
        let param = param.trim();
        if let Some(code) = param.strip_prefix("colenc=") {
            return match code {
                "B" => ColEnc::Base64,
                "Q" => ColEnc::QuotedPrintable,
                "U" => ColEnc::Url,
                _ => ColEnc::Raw,
            };
        }
    }
    ColEnc::Raw
}

/// Decode a response body into ordered key-value pairs.
///
/// An empty body decodes to `None`: the explicit no-content sentinel, never
/// an empty map. Each line decodes as a whole under `colenc`, then splits on
/// the first tab; a line without a tab, or one that decodes to invalid UTF-8,
/// is a [`TycoonError::Decode`].
pub fn decode_body(colenc: ColEnc, body: &[u8]) -> Result<Option<Params>> {
    // The server terminates the body with a newline; strip it before
    // splitting so it does not read as a trailing empty line.
    let body = trim_trailing_newlines(body);
    if body.is_empty() {
        return Ok(None);
    }

    let mut pairs = Params::new();
    for line in body.split(|b| *b == b'\n') {
        let decoded = decode_line(colenc, line)?;
        let tab = decoded
            .iter()
            .position(|b| *b == b'\t')
            .ok_or_else(|| TycoonError::Decode(format!("line has no tab separator: {:?}", as_lossy(&decoded))))?;
        let key = utf8(&decoded[..tab])?;
        let value = utf8(&decoded[tab + 1..])?;
        pairs.insert(key, value);
    }
    Ok(Some(pairs))
}

/// Decode one whole line under the given scheme
fn decode_line(colenc: ColEnc, line: &[u8]) -> Result<Vec<u8>> {
    match colenc {
        ColEnc::Raw => Ok(line.to_vec()),
        ColEnc::Base64 => BASE64
            .decode(line)
            .map_err(|e| TycoonError::Decode(format!("invalid base64 line: {}", e))),
        ColEnc::QuotedPrintable => Ok(qp_decode(line)),
        ColEnc::Url => Ok(percent_decode(line).collect()),
    }
}

/// Quoted-printable decode: `=XX` hex escapes become bytes, a `=` followed by
/// anything else passes through literally. Soft line breaks cannot occur here
/// since the body is split on newlines before decoding.
fn qp_decode(line: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(line.len());
    let mut i = 0;
    while i < line.len() {
        let b = line[i];
        if b == b'=' {
            if let (Some(hi), Some(lo)) = (
                line.get(i + 1).and_then(|c| hex_val(*c)),
                line.get(i + 2).and_then(|c| hex_val(*c)),
            ) {
                out.push((hi << 4) | lo);
                i += 3;
                continue;
            }
        }
        out.push(b);
        i += 1;
    }
    out
}

fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'A'..=b'F' => Some(c - b'A' + 10),
        b'a'..=b'f' => Some(c - b'a' + 10),
        _ => None,
    }
}

fn trim_trailing_newlines(body: &[u8]) -> &[u8] {
    let mut end = body.len();
    while end > 0 && (body[end - 1] == b'\n' || body[end - 1] == b'\r') {
        end -= 1;
    }
    &body[..end]
}

fn utf8(bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|_| TycoonError::Decode(format!("invalid UTF-8 in body: {:?}", as_lossy(bytes))))
}

fn as_lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_colenc_variants() {
        assert_eq!(parse_colenc("text/tab-separated-values"), ColEnc::Raw);
        assert_eq!(parse_colenc("text/tab-separated-values; colenc=B"), ColEnc::Base64);
        assert_eq!(parse_colenc("text/tab-separated-values; colenc=Q"), ColEnc::QuotedPrintable);
        assert_eq!(parse_colenc("text/tab-separated-values; colenc=U"), ColEnc::Url);
    }

    #[test]
    fn test_empty_body_is_no_content() {
        assert_eq!(decode_body(ColEnc::Raw, b"").unwrap(), None);
        assert_eq!(decode_body(ColEnc::Raw, b"\n").unwrap(), None);
    }

    #[test]
    fn test_raw_lines_split_on_first_tab() {
        let body = b"key\thoge\nvalue\tha\tge\n";
        let pairs = decode_body(ColEnc::Raw, body).unwrap().unwrap();
        assert_eq!(pairs.get("key"), Some("hoge"));
        // Only the first tab separates; the rest belongs to the value.
        assert_eq!(pairs.get("value"), Some("ha\tge"));
    }

    #[test]
    fn test_base64_lines() {
        // base64("key\thoge") and base64("value\thage")
        let body = b"a2V5CWhvZ2U=\ndmFsdWUJaGFnZQ==";
        let pairs = decode_body(ColEnc::Base64, body).unwrap().unwrap();
        assert_eq!(pairs.get("key"), Some("hoge"));
        assert_eq!(pairs.get("value"), Some("hage"));
    }

    #[test]
    fn test_quoted_printable_lines() {
        let body = b"key=09hoge\nvalue=09ha=3Dge";
        let pairs = decode_body(ColEnc::QuotedPrintable, body).unwrap().unwrap();
        assert_eq!(pairs.get("key"), Some("hoge"));
        assert_eq!(pairs.get("value"), Some("ha=ge"));
    }

    #[test]
    fn test_url_lines() {
        let body = b"key%09ho%20ge";
        let pairs = decode_body(ColEnc::Url, body).unwrap().unwrap();
        assert_eq!(pairs.get("key"), Some("ho ge"));
    }

    #[test]
    fn test_line_without_tab_is_decode_error() {
        let err = decode_body(ColEnc::Raw, b"no-separator-here").unwrap_err();
        assert!(matches!(err, TycoonError::Decode(_)));
    }

    #[test]
    fn test_invalid_base64_is_decode_error() {
        let err = decode_body(ColEnc::Base64, b"!!!not-base64!!!").unwrap_err();
        assert!(matches!(err, TycoonError::Decode(_)));
    }
}
