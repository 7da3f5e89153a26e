// src/gps/checksum.rs
//! NMEA checksum computation and validation

/// XOR of the code points in `payload` (the text between `$` and `*`).
///
/// Identical to the byte-wise XOR for ASCII. Characters above U+00FF push the
/// result past two hex digits, so such sentences never validate.
pub fn checksum(payload: &str) -> u32 {
    payload.chars().fold(0, |sum, c| sum ^ u32::from(c))
}

/// Build a complete sentence `$<payload>*CC` from its payload
pub fn frame_sentence(payload: &str) -> String {
    format!("${}*{:02X}", payload, checksum(payload))
}

/// Split a sentence into payload and checksum digits.
///
/// Returns `None` unless the sentence starts with `$` and has exactly one `*`.
pub fn split_sentence(sentence: &str) -> Option<(&str, &str)> {
    let body = sentence.strip_prefix('$')?;
    let (payload, digits) = body.split_once('*')?;
    if digits.contains('*') {
        return None;
    }
    Some((payload, digits))
}

/// Check whether a sentence carries a correct two hex digit checksum
pub fn validate_checksum(sentence: &str) -> bool {
    let Some((payload, digits)) = split_sentence(sentence) else {
        return false;
    };

    if digits.len() != 2 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return false;
    }

    match u32::from_str_radix(digits, 16) {
        Ok(expected) => expected == checksum(payload),
        Err(_) => false,
    }
}
