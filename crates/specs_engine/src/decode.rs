use chardetng::EncodingDetector;
use encoding_rs::Encoding;

/// How far into the body we look for a `<meta charset>` declaration.
const META_SNIFF_LIMIT: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBody {
    pub text: String,
    pub encoding_label: String,
    /// Malformed sequences were replaced with U+FFFD.
    pub had_errors: bool,
}

/// Decode raw bytes to UTF-8: BOM -> Content-Type charset -> meta charset -> chardetng guess.
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> DecodedBody {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    let declared = content_type
        .and_then(charset_param)
        .or_else(|| sniff_meta_charset(bytes));
    if let Some(enc) = declared.and_then(|label| Encoding::for_label(label.as_bytes())) {
        return decode_with(bytes, enc);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    decode_with(bytes, detector.guess(None, true))
}

fn charset_param(content_type: &str) -> Option<String> {
    content_type.split(';').find_map(|part| {
        let (key, value) = part.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim_matches(&[' ', '"', '\''][..]).to_string())
    })
}

fn sniff_meta_charset(bytes: &[u8]) -> Option<String> {
    let head = &bytes[..bytes.len().min(META_SNIFF_LIMIT)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();
    let start = head.find("charset=")? + "charset=".len();
    let label: String = head[start..]
        .trim_start_matches(&['"', '\''][..])
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
        .collect();
    (!label.is_empty()).then_some(label)
}

fn decode_with(bytes: &[u8], enc: &'static Encoding) -> DecodedBody {
    let (text, actual, had_errors) = enc.decode(bytes);
    DecodedBody {
        text: text.into_owned(),
        encoding_label: actual.name().to_string(),
        had_errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charset_header_wins_over_detection() {
        let decoded = decode_body(b"caf\xe9", Some("text/html; Charset=\"ISO-8859-1\""));
        assert_eq!(decoded.text, "café");
        assert_eq!(decoded.encoding_label, "windows-1252");
    }

    #[test]
    fn bom_is_honoured() {
        let decoded = decode_body(b"\xEF\xBB\xBFhello", Some("text/html"));
        assert_eq!(decoded.text, "hello");
        assert_eq!(decoded.encoding_label, "UTF-8");
    }

    #[test]
    fn meta_charset_is_sniffed() {
        let html = b"<html><head><meta charset=\"iso-8859-1\"></head><body>caf\xe9</body></html>";
        let decoded = decode_body(html, Some("text/html"));
        assert!(decoded.text.contains("café"));
        assert!(!decoded.had_errors);
    }

    #[test]
    fn malformed_utf8_is_replaced_not_rejected() {
        let decoded = decode_body(b"ok \xff\xfe done", Some("text/html; charset=utf-8"));
        assert!(decoded.had_errors);
        assert!(decoded.text.starts_with("ok "));
        assert!(decoded.text.ends_with(" done"));
    }
}
