use crate::error::admission::AdmissionError;

use std::borrow::Cow;

use percent_encoding::percent_decode_str;

/// Query-unescape a value: `+` becomes a space and `%XX` a byte.
///
/// Strict, unlike form decoding: a `%` not followed by two hex digits is an
/// error, as is a result that is not UTF-8 or contains NUL (neither can be
/// passed through an environment variable).
pub fn query_unescape(raw: &str) -> Result<String, AdmissionError> {
    let bytes = raw.as_bytes();
    let mut index = 0;
    while index < bytes.len() {
        if bytes[index] == b'%' {
            let well_formed = bytes.get(index + 1).is_some_and(u8::is_ascii_hexdigit)
                && bytes.get(index + 2).is_some_and(u8::is_ascii_hexdigit);
            if !well_formed {
                return Err(AdmissionError::bad_input(format!(
                    "invalid escape sequence at byte {index}"
                )));
            }
            index += 3;
        } else {
            index += 1;
        }
    }

    let spaced = raw.replace('+', " ");
    let decoded = percent_decode_str(&spaced)
        .decode_utf8()
        .map(Cow::into_owned)
        .map_err(|e| AdmissionError::bad_input(format!("data is not valid UTF-8: {e}")))?;

    if decoded.contains('\0') {
        return Err(AdmissionError::bad_input("data contains a NUL byte"));
    }

    Ok(decoded)
}
