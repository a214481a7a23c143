//! Query-string grammar for payment URIs.
//!
//! `key=value` pairs are separated by `&`; the first `=` splits key from value
//! (later `=` characters belong to the value). Components are
//! `application/x-www-form-urlencoded`: `+` means space and `%XX` is a
//! percent-escaped byte. Unlike lenient form decoders, a `%` that is not
//! followed by two hex digits is an error, as is a decoded byte sequence that
//! is not UTF-8.

use percent_encoding::percent_decode_str;
use std::borrow::Cow;
use url::form_urlencoded;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("invalid percent-encoding in {0:?}")]
    BadEscape(String),
    #[error("percent-decoded {0:?} is not valid UTF-8")]
    NotUtf8(String),
}

/// Splits and decodes a raw query string into ordered `(key, value)` pairs.
///
/// Empty segments (`a=1&&b=2`) are skipped and a key without `=` gets an
/// empty value. Repeated keys are all returned; resolution is up to the caller.
pub fn parse_query(query: &str) -> Result<Vec<(String, String)>, QueryError> {
    query
        .split('&')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let (key, value) = segment.split_once('=').unwrap_or((segment, ""));
            Ok((decode_component(key)?, decode_component(value)?))
        })
        .collect()
}

/// Decodes one form-urlencoded component.
pub fn decode_component(raw: &str) -> Result<String, QueryError> {
    let spaced: Cow<'_, str> = if raw.contains('+') {
        Cow::Owned(raw.replace('+', " "))
    } else {
        Cow::Borrowed(raw)
    };
    percent_decode(raw, &spaced)
}

/// Decodes one path component: `%XX` escapes only, `+` stays literal.
pub fn decode_path_component(raw: &str) -> Result<String, QueryError> {
    percent_decode(raw, raw)
}

fn percent_decode(raw: &str, input: &str) -> Result<String, QueryError> {
    check_escapes(raw)?;
    percent_decode_str(input)
        .decode_utf8()
        .map(Cow::into_owned)
        .map_err(|_| QueryError::NotUtf8(raw.to_string()))
}

/// Form-urlencodes one component. Alphanumerics and `*-._` pass unchanged,
/// so decimal integers and `0x` hex strings are emitted verbatim.
pub fn encode_component(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

fn check_escapes(raw: &str) -> Result<(), QueryError> {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let well_formed = bytes
                .get(i + 1..i + 3)
                .is_some_and(|pair| pair.iter().all(u8::is_ascii_hexdigit));
            if !well_formed {
                return Err(QueryError::BadEscape(raw.to_string()));
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    Ok(())
}
