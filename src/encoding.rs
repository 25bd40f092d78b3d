//! Input decoding: BOM stripping and transcoding to UTF-8 using chardetng
//! and `encoding_rs`.

use std::borrow::Cow;

use chardetng::EncodingDetector;
use log::debug;
use simdutf8::basic::from_utf8;

/// Check if the given bytes are valid UTF-8.
pub fn is_utf8(data: &[u8]) -> bool {
    from_utf8(data).is_ok()
}

/// Check if the data starts with a UTF-8 BOM (EF BB BF).
fn has_utf8_bom(data: &[u8]) -> bool {
    data.len() >= 3 && data[0] == 0xEF && data[1] == 0xBB && data[2] == 0xBF
}

/// Skip the UTF-8 BOM if present and return the remaining data.
fn skip_bom(data: &[u8]) -> &[u8] {
    if has_utf8_bom(data) { &data[3..] } else { data }
}

/// Decode raw input bytes into text.
///
/// UTF-8 input (with or without BOM) is borrowed as-is. UTF-16 with a BOM
/// and legacy single/multi-byte encodings detected by chardetng are
/// transcoded.
pub fn decode_text(data: &[u8]) -> Cow<'_, str> {
    // UTF-16 BOMs first, chardetng doesn't handle these well
    if data.len() >= 2 {
        if data[0] == 0xFF && data[1] == 0xFE {
            let (decoded, _, _) = encoding_rs::UTF_16LE.decode(data);
            debug!("transcoded input from UTF-16LE");
            return Cow::Owned(decoded.into_owned());
        }
        if data[0] == 0xFE && data[1] == 0xFF {
            let (decoded, _, _) = encoding_rs::UTF_16BE.decode(data);
            debug!("transcoded input from UTF-16BE");
            return Cow::Owned(decoded.into_owned());
        }
    }

    let data = skip_bom(data);
    if let Ok(text) = from_utf8(data) {
        return Cow::Borrowed(text);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(data, true);
    let encoding = detector.guess(None, true);
    debug!("transcoded input from {}", encoding.name());

    let (decoded, _, _) = encoding.decode(data);
    Cow::Owned(decoded.into_owned())
}
