//! Percent-encoding of wiki page names.
//!
//! Page names arrive either verbatim (`Getting Started`, `Überblick`) or
//! already escaped (`Getting%20Started`). [`EncodedPageName`] normalizes both
//! into a name that is escaped exactly once, plus its human-readable form.

use std::borrow::Cow;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

/// Bytes left as-is when escaping a page name: unreserved characters and `/`.
const PAGE_NAME: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// Percent-encode a page name. Existing `%` characters are escaped too.
pub fn encode(name: &str) -> String {
    utf8_percent_encode(name, PAGE_NAME).to_string()
}

/// Percent-decode a page name, or `None` if the escapes do not form UTF-8.
///
/// Malformed escapes such as `%zz` are kept literally.
pub fn decode(name: &str) -> Option<String> {
    percent_decode_str(name)
        .decode_utf8()
        .ok()
        .map(Cow::into_owned)
}

/// Whether `name` already looks percent-encoded.
///
/// A name counts as encoded when it contains `%` and decoding then
/// re-encoding it reproduces the exact input.
pub fn is_percent_encoded(name: &str) -> bool {
    if !name.contains('%') {
        return false;
    }
    match decode(name) {
        Some(decoded) => encode(&decoded) == name,
        None => false,
    }
}

/// A page name escaped exactly once, alongside its decoded form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPageName {
    encoded: String,
    decoded: String,
}

impl EncodedPageName {
    /// Normalize a raw page name taken from a wiki URL.
    pub fn from_raw(raw: &str) -> Self {
        if is_percent_encoded(raw) {
            let decoded = percent_decode_str(raw).decode_utf8_lossy().into_owned();
            Self {
                encoded: raw.to_string(),
                decoded,
            }
        } else {
            Self {
                encoded: encode(raw),
                decoded: raw.to_string(),
            }
        }
    }

    /// The escaped form, safe to splice into a URL path.
    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    /// The human-readable form.
    pub fn decoded(&self) -> &str {
        &self.decoded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_spaces_and_non_ascii() {
        assert_eq!(encode("Getting Started"), "Getting%20Started");
        assert_eq!(encode("Überblick"), "%C3%9Cberblick");
        assert_eq!(encode("C++ (Guide)"), "C%2B%2B%20%28Guide%29");
    }

    #[test]
    fn keeps_unreserved_and_slash() {
        assert_eq!(encode("a-b_c.d~e/f"), "a-b_c.d~e/f");
    }

    #[test]
    fn decode_without_percent_is_noop() {
        assert_eq!(decode("Getting Started").as_deref(), Some("Getting Started"));
        assert_eq!(decode("Home").as_deref(), Some("Home"));
    }

    #[test]
    fn decode_keeps_malformed_escapes() {
        assert_eq!(decode("100%").as_deref(), Some("100%"));
        assert_eq!(decode("a%zzb").as_deref(), Some("a%zzb"));
    }

    #[test]
    fn decode_rejects_invalid_utf8() {
        assert!(decode("%FF%FE").is_none());
    }

    #[test]
    fn detects_encoded_names() {
        assert!(is_percent_encoded("Getting%20Started"));
        assert!(is_percent_encoded("%C3%9Cberblick"));
        assert!(!is_percent_encoded("Getting Started"));
        assert!(!is_percent_encoded("Home"));
        // literal percent sign is not a valid escape
        assert!(!is_percent_encoded("100%"));
        // lowercase hex does not survive the re-encode comparison
        assert!(!is_percent_encoded("%c3%9cberblick"));
        assert!(!is_percent_encoded("%FF"));
    }

    #[test]
    fn from_raw_unencoded() {
        let name = EncodedPageName::from_raw("Getting Started");
        assert_eq!(name.encoded(), "Getting%20Started");
        assert_eq!(name.decoded(), "Getting Started");
    }

    #[test]
    fn from_raw_already_encoded() {
        let name = EncodedPageName::from_raw("Getting%20Started");
        assert_eq!(name.encoded(), "Getting%20Started");
        assert_eq!(name.decoded(), "Getting Started");
    }

    #[test]
    fn encoding_is_idempotent() {
        for raw in ["Getting Started", "Überblick", "FAQ & Tips", "Home", "100%"] {
            let once = EncodedPageName::from_raw(raw);
            let twice = EncodedPageName::from_raw(once.encoded());
            assert_eq!(once.encoded(), twice.encoded(), "double-encoded {raw:?}");
            assert_eq!(once.decoded(), twice.decoded());
        }
    }

    #[test]
    fn decode_inverts_encode() {
        for name in ["Home", "Getting Started", "Release Notes 2.0", "Überblick"] {
            assert_eq!(decode(&encode(name)).as_deref(), Some(name));
        }
    }

    #[test]
    fn literal_percent_is_escaped() {
        let name = EncodedPageName::from_raw("100%");
        assert_eq!(name.encoded(), "100%25");
        assert_eq!(name.decoded(), "100%");
    }
}
