use chardetng::EncodingDetector;
use encoding_rs::Encoding;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    pub encoding_label: String,
    /// Malformed sequences were replaced with U+FFFD.
    pub lossy: bool,
}

/// Decode a response body to UTF-8: BOM, then Content-Type charset, then a
/// chardetng guess. Never fails; undecodable bytes become replacement chars.
pub fn decode_text(bytes: &[u8], content_type: Option<&str>) -> DecodedText {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    if let Some(encoding) = content_type
        .and_then(charset_label)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
    {
        return decode_with(bytes, encoding);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    decode_with(bytes, detector.guess(None, true))
}

fn charset_label(content_type: &str) -> Option<String> {
    content_type.split(';').find_map(|part| {
        let (key, value) = part.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches(&['"', '\''][..]).to_string())
    })
}

fn decode_with(bytes: &[u8], encoding: &'static Encoding) -> DecodedText {
    // `decode` strips a matching BOM itself.
    let (text, used, had_errors) = encoding.decode(bytes);
    DecodedText {
        text: text.into_owned(),
        encoding_label: used.name().to_string(),
        lossy: had_errors,
    }
}

#[cfg(test)]
mod tests {
    use super::decode_text;

    #[test]
    fn charset_header_wins_over_detection() {
        let decoded = decode_text(b"caf\xe9", Some("text/html; Charset=\"ISO-8859-1\""));
        assert_eq!(decoded.text, "caf\u{e9}");
        assert!(!decoded.lossy);
    }

    #[test]
    fn utf8_bom_is_stripped() {
        let decoded = decode_text(b"\xEF\xBB\xBF<title>x</title>", Some("text/html"));
        assert_eq!(decoded.text, "<title>x</title>");
        assert_eq!(decoded.encoding_label, "UTF-8");
    }

    #[test]
    fn korean_utf8_without_header_is_detected() {
        let html = "<title>서울 카페 추천</title>";
        let decoded = decode_text(html.as_bytes(), None);
        assert_eq!(decoded.text, html);
    }
}
